// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate independence of the count-up.

use proptest::prelude::*;
use unveil_core::count_up::CountUp;
use unveil_core::time::{Duration, HostTime};

#[test]
fn portfolio_metric_reaches_exact_target() {
    let count = CountUp::new(250, Duration::from_millis(2000), "+", HostTime(0));
    assert_eq!(count.text_at(HostTime::from_millis(1000)), "125+");
    assert_eq!(count.text_at(HostTime::from_millis(2000)), "250+");
    assert_eq!(count.text_at(HostTime::from_millis(9000)), "250+");
}

proptest! {
    #[test]
    fn values_never_decrease_and_end_on_target(
        target in 0i64..1_000_000,
        duration_ms in 1u64..10_000,
        mut frames in proptest::collection::vec(0u64..12_000, 1..64),
    ) {
        let count = CountUp::new(target, Duration::from_millis(duration_ms), "", HostTime(0));
        frames.sort_unstable();
        let mut prev = 0;
        for ms in frames {
            let value = count.value_at(HostTime::from_millis(ms));
            prop_assert!(value >= prev);
            prop_assert!(value <= target);
            prev = value;
        }
        prop_assert_eq!(count.value_at(HostTime::from_millis(duration_ms)), target);
    }

    #[test]
    fn negative_targets_count_down_monotonically(
        target in -100_000i64..0,
        a in 0u64..3_000,
        b in 0u64..3_000,
    ) {
        let count = CountUp::new(target, Duration::from_millis(2000), "", HostTime(0));
        let (early, late) = (a.min(b), a.max(b));
        let v_early = count.value_at(HostTime::from_millis(early));
        let v_late = count.value_at(HostTime::from_millis(late));
        prop_assert!(v_late <= v_early);
        prop_assert!(v_late >= target);
    }
}
