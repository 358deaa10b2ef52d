/// Number of nearest neighbours on the square lattice.
pub const N_NEIGHBORS: usize = 4;

/// `(drow, dcol)` displacement of each neighbour direction, in visitation order:
/// right, down, left, up.
///
/// Both update engines and the energy model walk neighbours in this order, so
/// for a fixed RNG stream the sequence of random draws is reproducible.
pub const NEIGHBOR_OFFSETS: [(isize, isize); N_NEIGHBORS] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Direction indices into [`NEIGHBOR_OFFSETS`] used by the forward-bond sums.
pub const RIGHT: usize = 0;
pub const DOWN: usize = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_directions() {
        assert_eq!(NEIGHBOR_OFFSETS[RIGHT], (0, 1));
        assert_eq!(NEIGHBOR_OFFSETS[DOWN], (1, 0));
    }
}
