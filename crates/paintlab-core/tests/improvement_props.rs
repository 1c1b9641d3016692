use paintlab_core::improvement_pct;
use proptest::prelude::*;

proptest! {
    #[test]
    fn tabu_never_worse_means_non_negative(greedy in 0.001f64..1.0e6, ratio in 0.0f64..=1.0) {
        let tabu = greedy * ratio;
        let pct = improvement_pct(greedy, tabu);
        prop_assert!(pct >= -1e-9);
        prop_assert!(pct <= 100.0 + 1e-9);
    }

    #[test]
    fn non_positive_greedy_is_zero(greedy in -1.0e6f64..=0.0, tabu in -1.0e6f64..1.0e6) {
        prop_assert_eq!(improvement_pct(greedy, tabu), 0.0);
    }

    #[test]
    fn identical_mse_is_zero(greedy in 0.001f64..1.0e6) {
        prop_assert!(improvement_pct(greedy, greedy).abs() < 1e-12);
    }
}
