use faas_stacks::engine::{Convergence, Readiness, ScanStep};
use proptest::prelude::*;

/// Drive the core to convergence where unit `i` reports ready from tick
/// `ready_at[i]` on. Returns the probes issued per tick.
fn drive(ready_at: &[u64]) -> (Convergence, Vec<Vec<usize>>) {
    let mut state = Convergence::new(ready_at.len());
    let mut ticks = Vec::new();

    while !state.is_converged() {
        let mut probed = Vec::new();
        let mut step = state.start_tick();
        while let ScanStep::Probe(unit) = step {
            probed.push(unit);
            let ready = state.ticks() >= ready_at[unit];
            step = state.record(unit, Readiness::from(ready));
        }
        ticks.push(probed);

        assert!(ticks.len() <= 64, "did not converge");
    }

    (state, ticks)
}

proptest! {
    #[test]
    fn converges_after_the_slowest_unit(ready_at in proptest::collection::vec(1u64..8, 0..8)) {
        let (state, ticks) = drive(&ready_at);

        let slowest = ready_at.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(state.ticks(), slowest);
        prop_assert!(state.statuses().iter().all(|ready| *ready));
        prop_assert_eq!(ticks.len() as u64, slowest);
    }

    #[test]
    fn each_tick_probes_a_prefix_ending_at_first_not_ready(
        ready_at in proptest::collection::vec(1u64..8, 1..8)
    ) {
        let (_, ticks) = drive(&ready_at);

        for (index, probed) in ticks.iter().enumerate() {
            let tick = index as u64 + 1;

            // Probes go in construction order starting from the first unit.
            let expected_prefix: Vec<usize> = (0..probed.len()).collect();
            prop_assert_eq!(probed, &expected_prefix);

            // Every probed unit but the last was ready; the scan only goes
            // past a unit that was ready.
            for unit in &probed[..probed.len() - 1] {
                prop_assert!(tick >= ready_at[*unit]);
            }

            // A short scan ends on a unit that was not ready.
            if probed.len() < ready_at.len() {
                let last = *probed.last().unwrap();
                prop_assert!(tick < ready_at[last]);
            }
        }
    }

    #[test]
    fn every_unit_is_probed_on_the_tick_it_first_becomes_ready(
        ready_at in proptest::collection::vec(1u64..8, 1..8)
    ) {
        let (_, ticks) = drive(&ready_at);

        // On the final tick every unit is probed and found ready.
        let last = ticks.last().unwrap();
        prop_assert_eq!(last.len(), ready_at.len());
    }
}

#[test]
fn zero_units_are_converged_from_the_start() {
    let mut state = Convergence::new(0);

    assert!(state.is_converged());
    assert_eq!(state.start_tick(), ScanStep::EndOfTick);
}

#[test]
fn not_ready_ends_the_tick() {
    let mut state = Convergence::new(3);

    assert_eq!(state.start_tick(), ScanStep::Probe(0));
    assert_eq!(state.record(0, Readiness::Ready), ScanStep::Probe(1));
    assert_eq!(state.record(1, Readiness::NotReady), ScanStep::EndOfTick);
    assert_eq!(state.statuses(), &[true, false, false]);
    assert!(!state.is_converged());

    assert_eq!(state.start_tick(), ScanStep::Probe(0));
    assert_eq!(state.record(0, Readiness::Ready), ScanStep::Probe(1));
    assert_eq!(state.record(1, Readiness::Ready), ScanStep::Probe(2));
    assert_eq!(state.record(2, Readiness::Ready), ScanStep::EndOfTick);
    assert!(state.is_converged());
    assert_eq!(state.ticks(), 2);
}
