use pptop::cells::anti::{DIMENSIONS, compound};
use pptop::cells::business::{BusinessLine, price};
use pptop::cells::merge::merged_power;
use pptop::cells::obstacle::Accumulator;
use pptop::model::{Contribution, POWER_DIST_FACTOR, base_strength};
use pptop::{CellKind, CellObject};
use proptest::prelude::*;

fn boss_neighbor(d: f64) -> Vec<Contribution> {
    vec![Contribution { dis_power: d, ..Default::default() }]
}

fn line() -> impl Strategy<Value = BusinessLine> {
    prop::sample::select(BusinessLine::ALL.to_vec())
}

proptest! {
    #[test]
    fn accumulator_keeps_each_interval_at_its_rate(
        t0 in 0.0f64..1e4,
        d1 in 0.1f64..1e3,
        d2 in 0.1f64..1e3,
        r1 in 0.0f64..100.0,
        r2 in 0.0f64..100.0,
        splits in 1usize..20,
    ) {
        let t1 = t0 + d1;
        let t2 = t1 + d2;
        let mut acc = Accumulator::idle();
        acc.begin(t0);
        // extra rebases at an unchanged rate must not change anything
        for i in 1..splits {
            acc.rebase(t0 + d1 * i as f64 / splits as f64, r1);
        }
        acc.rebase(t1, r1);
        let expected = d1 * r1 + d2 * r2;
        let got = acc.progress(t2, r2);
        prop_assert!((got - expected).abs() <= 1e-7 * expected.max(1.0), "got {} expected {}", got, expected);
    }

    #[test]
    fn wall_progress_is_monotonic_and_completes_on_time(
        dist in 0u32..12,
        d in 0.5f64..50.0,
        steps in 2usize..40,
    ) {
        let mut wall = CellObject::new(CellKind::Wall, dist);
        let neighbors = boss_neighbor(d);
        let rate = d * POWER_DIST_FACTOR.powi(dist as i32 - 4);
        let duration = base_strength(dist) / rate;
        prop_assert!(wall.update(0.0, &neighbors).is_none());
        let mut last = wall.percent();
        for i in 1..steps {
            let now = duration * i as f64 / steps as f64 * 0.999;
            prop_assert!(wall.update(now, &neighbors).is_none());
            let percent = wall.percent();
            prop_assert!(percent <= last + 1e-9);
            last = percent;
        }
        let done = wall.update(duration * (1.0 + 1e-9) + 1e-9, &neighbors);
        prop_assert!(done.is_some());
    }

    #[test]
    fn merge_adds_forty_percent_of_the_weakest(powers in prop::collection::vec(0.001f64..1e6, 0..8)) {
        match merged_power(&powers) {
            Some(merged) => {
                prop_assert!(powers.len() >= 2);
                let sum: f64 = powers.iter().sum();
                let min = powers.iter().copied().fold(f64::INFINITY, f64::min);
                prop_assert!((merged - (sum + 0.4 * min)).abs() <= 1e-9 * merged);
            }
            None => prop_assert!(powers.len() < 2),
        }
    }

    #[test]
    fn business_price_is_a_geometric_sum(line in line(), owned in 0u32..60, count in 1u32..20) {
        prop_assume!(!(line == BusinessLine::Limeade && owned == 0 && count == 1));
        let info = line.info();
        let f = info.price_factor;
        let expected = info.price_base * (f.powi((owned + count) as i32) - f.powi(owned as i32)) / (f - 1.0);
        let got = price(line, owned, count);
        prop_assert!((got - expected).abs() <= 0.005 + 1e-12 * expected, "got {} expected {}", got, expected);
    }

    #[test]
    fn first_dimension_alone_is_linear(t in 0.0f64..1e4) {
        let mut dims = [0.0; DIMENSIONS];
        dims[0] = 1.0;
        let got = compound(&dims, &[1.0; DIMENSIONS], t);
        prop_assert!((got - t).abs() <= 1e-9 * t.max(1.0));
    }

    #[test]
    fn each_dimension_alone_counts_binomially(k in 0usize..DIMENSIONS, extra in 0u32..20) {
        let t = (k as u32 + 1 + extra) as f64;
        let mut dims = [0.0; DIMENSIONS];
        dims[k] = 1.0;
        let got = compound(&dims, &[1.0; DIMENSIONS], t);
        // C(t, k + 1)
        let expected = (0..=k).fold(1.0, |acc, i| acc * (t - i as f64) / (i + 1) as f64);
        prop_assert!((got - expected).abs() <= 1e-6 * expected.max(1.0), "k {} t {}: got {} expected {}", k, t, got, expected);
    }
}

#[test]
fn first_limeade_is_free() {
    assert_eq!(price(BusinessLine::Limeade, 0, 1), 0.0);
    assert!(price(BusinessLine::Limeade, 0, 2) > 0.0);
}
