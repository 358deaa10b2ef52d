use log::debug;
use rand::Rng;

use super::utils::grow_cluster;
use crate::config::SimulationParameters;
use crate::geometry::Lattice;
use crate::spins::Spin;

/// Sites flipped together by one Wolff update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Seed coordinate `(row, col)`.
    pub seed: (usize, usize),
    /// Spin shared by every member before the flip.
    pub spin: Spin,
    /// Member coordinates in the order they joined. Never contains duplicates.
    pub sites: Vec<(usize, usize)>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Always false: the seed is a member.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Bond activation probability `1 - exp(-2 J beta)`, clamped to `[0, 1]`.
///
/// Non-ferromagnetic couplings give 0, so the cluster is the seed alone. At
/// zero temperature the probability is 1 for `J > 0` and 0 otherwise.
pub fn bond_probability(params: &SimulationParameters) -> f64 {
    let p = match params.beta() {
        Some(beta) => 1.0 - (-2.0 * params.coupling * beta).exp(),
        None if params.coupling > 0.0 => 1.0,
        None => 0.0,
    };
    p.clamp(0.0, 1.0)
}

/// Grow one Wolff cluster from a uniformly random seed and flip it.
///
/// A neighbor joins when it carries the seed's spin and a Bernoulli trial
/// with [`bond_probability`] succeeds. The external field does not enter the
/// bond probability.
#[cfg_attr(feature = "profile", inline(never))]
pub fn wolff_step<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    params: &SimulationParameters,
    rng: &mut R,
) -> Cluster {
    let n = lattice.size;
    let n_spins = lattice.n_spins;
    let seed_row = rng.gen_range(0..n);
    let seed_col = rng.gen_range(0..n);
    let seed = seed_row * n + seed_col;
    let reference = lattice.spin(seed);
    let p_add = bond_probability(params);

    let mut in_cluster = vec![false; n_spins];
    let mut stack = Vec::with_capacity(n_spins);
    let mut members = Vec::new();

    let lat: &Lattice = lattice;
    grow_cluster(
        lat,
        seed,
        &mut in_cluster,
        &mut stack,
        &mut members,
        |_site, nb| lat.spin(nb) == reference && rng.gen::<f64>() < p_add,
    );

    for &site in &members {
        lattice.flip_site(site);
    }
    debug!(
        "wolff: seed=({seed_row}, {seed_col}) p_add={p_add:.4} size={}",
        members.len()
    );

    Cluster {
        seed: (seed_row, seed_col),
        spin: reference,
        sites: members.iter().map(|&s| lattice.coords(s)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_bond_probability() {
        // beta = 1, J = 1: 1 - e^-2
        let p = bond_probability(&SimulationParameters::new(10.0, 1.0, 0.0));
        assert!((p - (1.0 - (-2.0f64).exp())).abs() < 1e-12);

        assert_eq!(bond_probability(&SimulationParameters::new(10.0, 0.0, 0.0)), 0.0);
        assert_eq!(bond_probability(&SimulationParameters::new(10.0, -1.0, 0.0)), 0.0);
        assert_eq!(bond_probability(&SimulationParameters::new(0.0, 1.0, 0.0)), 1.0);
        assert_eq!(bond_probability(&SimulationParameters::new(-5.0, -1.0, 0.0)), 0.0);

        let p = bond_probability(&SimulationParameters::new(1e-9, 1e6, 0.0));
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_certain_bonds_flip_whole_domain() {
        let mut lat = Lattice::uniform(5, Spin::Up).unwrap();
        let params = SimulationParameters::new(0.0, 1.0, 0.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let cluster = wolff_step(&mut lat, &params, &mut rng);
        assert_eq!(cluster.len(), 25);
        assert_eq!(cluster.spin, Spin::Up);
        assert!(lat.spins().iter().all(|&s| s == Spin::Down));
    }

    #[test]
    fn test_antiferromagnetic_flips_only_seed() {
        let mut lat = Lattice::uniform(5, Spin::Up).unwrap();
        let params = SimulationParameters::new(20.0, -1.0, 0.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(2);
        let cluster = wolff_step(&mut lat, &params, &mut rng);
        assert_eq!(cluster.len(), 1);
        assert_eq!(cluster.sites[0], cluster.seed);
        let (r, c) = cluster.seed;
        assert_eq!(lat.get(r, c), Ok(Spin::Down));
        let n_down = lat.spins().iter().filter(|&&s| s == Spin::Down).count();
        assert_eq!(n_down, 1);
    }

    #[test]
    fn test_cluster_respects_domain_wall() {
        // Left half up, right half down; with certain bonds the cluster is
        // exactly the seed's half.
        let mut lat = Lattice::new(6, |_, c| if c < 3 { Spin::Up } else { Spin::Down }).unwrap();
        let params = SimulationParameters::new(0.0, 1.0, 0.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let cluster = wolff_step(&mut lat, &params, &mut rng);
        assert_eq!(cluster.len(), 18);
        let seed_left = cluster.seed.1 < 3;
        for &(_, c) in &cluster.sites {
            assert_eq!(c < 3, seed_left);
        }
        // Whole lattice is now uniform.
        let first = lat.spins()[0];
        assert!(lat.spins().iter().all(|&s| s == first));
    }

    #[test]
    fn test_singleton_rate_matches_bond_probability() {
        // The seed stays alone iff all 4 of its bond trials fail: (1 - p)^4.
        let params = SimulationParameters::new(10.0, 0.25, 0.0);
        let p = bond_probability(&params);
        let mut rng = Xoshiro256StarStar::seed_from_u64(17);
        let n_trials = 20_000;
        let mut singles = 0usize;
        for _ in 0..n_trials {
            let mut lat = Lattice::uniform(8, Spin::Up).unwrap();
            if wolff_step(&mut lat, &params, &mut rng).len() == 1 {
                singles += 1;
            }
        }
        let expected = (1.0 - p).powi(4);
        let observed = singles as f64 / n_trials as f64;
        assert!(
            (observed - expected).abs() < 0.02,
            "observed {observed:.4}, expected {expected:.4}"
        );
    }
}
