use std::sync::atomic::AtomicBool;

use ising_sim::spins::energy::energy_density;
use ising_sim::{
    run_temperature_scan, Algorithm, InitialFill, Lattice, LatticeConfig, RunConfig, ScanConfig,
    SimulationParameters, SimulationState, Spin,
};

fn state(
    size: usize,
    params: SimulationParameters,
    fill: InitialFill,
    seed: u64,
) -> SimulationState {
    let config = LatticeConfig {
        size,
        history_capacity: 100,
    };
    SimulationState::new(&config, params, fill, seed).unwrap()
}

#[test]
fn four_by_four_all_up_then_toggle() {
    // T = 10 gives beta = 1
    let params = SimulationParameters::new(10.0, 1.0, 0.0);
    assert_eq!(params.beta(), Some(1.0));
    let mut sim = state(4, params, InitialFill::Uniform(Spin::Up), 0);

    assert_eq!(sim.magnetization(), 1.0);
    assert_eq!(sim.nearest_neighbor_correlation(), 1.0);
    assert_eq!(sim.pair_correlation(1), 1.0);
    assert_eq!(sim.pair_correlation(2), 1.0);

    sim.toggle(0, 0).unwrap();
    assert_eq!(sim.magnetization(), 0.875);
    let ups = sim
        .snapshot()
        .spins()
        .iter()
        .filter(|&&s| s == Spin::Up)
        .count();
    assert_eq!(ups, 15);
}

#[test]
fn aligned_energy_below_checkerboard() {
    for size in [2, 3, 4, 7] {
        let aligned = Lattice::uniform(size, Spin::Up).unwrap();
        let alternating = Lattice::checkerboard(size).unwrap();
        let e_aligned = energy_density(&aligned, 1.0, 0.0);
        let e_alt = energy_density(&alternating, 1.0, 0.0);
        assert!(e_aligned < e_alt, "N={size}: {e_aligned} !< {e_alt}");
    }
}

#[test]
fn structure_factor_origin_is_site_count() {
    for size in [1, 3, 6] {
        let sim = state(
            size,
            SimulationParameters::default(),
            InitialFill::Uniform(Spin::Up),
            0,
        );
        let sf = sim.structure_factor();
        assert_eq!(sf.len(), size);
        assert!(sf.iter().all(|row| row.len() == size));
        assert_eq!(sf[0][0], (size * size) as f64);
    }
}

#[test]
fn magnetization_extremes() {
    let params = SimulationParameters::default();
    let up = state(5, params, InitialFill::Uniform(Spin::Up), 0);
    let down = state(5, params, InitialFill::Uniform(Spin::Down), 0);
    assert_eq!(up.magnetization(), 1.0);
    assert_eq!(down.magnetization(), -1.0);
}

#[test]
fn history_caps_at_one_hundred() {
    let params = SimulationParameters::default();
    let mut sim = state(6, params, InitialFill::Random, 11);
    for _ in 0..130 {
        sim.step(Algorithm::Metropolis, &params).unwrap();
    }
    assert_eq!(sim.history_len(), 100);
    assert_eq!(sim.steps_taken(), 130);
    assert_eq!(sim.temporal_correlation(100), 0.0);
}

#[test]
fn same_seed_same_trajectory() {
    let params = SimulationParameters::new(25.0, 1.0, 0.3);
    let mut a = state(8, params, InitialFill::Random, 5);
    let mut b = state(8, params, InitialFill::Random, 5);
    for k in 0..50 {
        let algorithm = if k % 3 == 0 {
            Algorithm::Wolff
        } else {
            Algorithm::Metropolis
        };
        assert_eq!(
            a.step(algorithm, &params).unwrap(),
            b.step(algorithm, &params).unwrap()
        );
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.observables(), b.observables());
}

#[test]
fn export_two_point_waits_for_history() {
    let params = SimulationParameters::new(10.0, 1.0, 0.0);
    let mut sim = state(4, params, InitialFill::Uniform(Spin::Up), 2);
    assert_eq!(sim.export_record().observables.two_point_correlation, 0.0);
    assert_eq!(sim.pair_correlation(1), 1.0);

    sim.step(Algorithm::Metropolis, &params).unwrap();
    assert_eq!(sim.history_len(), 1);
    assert_eq!(sim.export_record().observables.two_point_correlation, 0.0);

    sim.step(Algorithm::Metropolis, &params).unwrap();
    assert_eq!(
        sim.export_record().observables.two_point_correlation,
        sim.pair_correlation(1)
    );
}

#[test]
fn export_record_reflects_state() {
    let params = SimulationParameters::new(30.0, 0.5, -0.25);
    let mut sim = state(4, params, InitialFill::Checkerboard, 1);
    for _ in 0..12 {
        sim.step(Algorithm::Metropolis, &params).unwrap();
    }
    let record = sim.export_record();
    assert_eq!(record.spins, sim.snapshot().rows());
    assert_eq!(record.temperature, 30.0);
    assert_eq!(record.interaction_strength, 0.5);
    assert_eq!(record.magnetic_field, -0.25);
    assert_eq!(record.observables, record.simulation_results);
    assert_eq!(record.observables.magnetization, sim.magnetization());
    // Twelve snapshots recorded, so the export reports the live value.
    assert_eq!(sim.history_len(), 12);
    assert_eq!(record.observables.two_point_correlation, sim.pair_correlation(1));
    assert_eq!(record.observables.temporal_correlation, sim.temporal_correlation(10));
    assert_eq!(record.observables.pair_correlation.len(), 2);
}

#[test]
fn scan_cools_into_order() {
    let config = ScanConfig {
        lattice: LatticeConfig {
            size: 8,
            history_capacity: 20,
        },
        params: SimulationParameters::default(),
        temperatures: vec![5.0, 200.0],
        fill: InitialFill::Uniform(Spin::Up),
        run: RunConfig {
            n_steps: 300,
            warmup_steps: 100,
            algorithm: Algorithm::Wolff,
            autocorrelation_max_lag: Some(20),
            temporal_lag: 5,
        },
        base_seed: 3,
        sequential: false,
    };
    let summaries = run_temperature_scan(&config, &AtomicBool::new(false), &|| {}).unwrap();
    assert_eq!(summaries.len(), 2);
    let (cold, hot) = (&summaries[0], &summaries[1]);
    assert_eq!(cold.n_recorded, 200);
    // T_eff = 0.5 is far below the critical point, T_eff = 20 far above.
    assert!(cold.abs_mags > 0.9, "cold <|m|> = {}", cold.abs_mags);
    assert!(hot.abs_mags < cold.abs_mags);
    assert!(cold.energies < hot.energies);
    assert_eq!(cold.mags_autocorrelation.len(), 21);
}
