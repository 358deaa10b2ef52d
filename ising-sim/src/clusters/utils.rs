use crate::geometry::{Lattice, N_NEIGHBORS};

/// Grow a cluster from `seed` with an explicit to-visit stack.
///
/// A popped site joins the cluster unless it already belongs to it; each of
/// its neighbors not yet in the cluster is pushed when `should_add(site, nb)`
/// returns true. A site may sit on the stack more than once, but it enters
/// `members` exactly once.
///
/// Caller owns buffers: `in_cluster` must be all-false, `stack` must be empty.
#[inline]
pub(super) fn grow_cluster(
    lattice: &Lattice,
    seed: usize,
    in_cluster: &mut [bool],
    stack: &mut Vec<usize>,
    members: &mut Vec<usize>,
    mut should_add: impl FnMut(usize, usize) -> bool,
) {
    stack.push(seed);

    while let Some(site) = stack.pop() {
        if in_cluster[site] {
            continue;
        }
        in_cluster[site] = true;
        members.push(site);
        for d in 0..N_NEIGHBORS {
            let nb = lattice.neighbor(site, d);
            if !in_cluster[nb] && should_add(site, nb) {
                stack.push(nb);
            }
        }
    }
}
