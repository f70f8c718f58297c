use proptest::prelude::*;
use tailfit_stats::{
    goodness_of_fit::KsTest,
    numeric::{normal_cdf, normal_inverse_cdf},
    regression::LinearRegression,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_ks_identity(cdf in prop::collection::vec(0.0f64..=1.0, 1..100)) {
        let test = KsTest::new(&cdf, &cdf).unwrap();
        prop_assert_eq!(test.statistic, 0.0);
        prop_assert!(!test.significant);
        prop_assert!((test.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_normal_round_trip(p in 0.001f64..0.999) {
        let z = normal_inverse_cdf(p).unwrap();
        prop_assert!((normal_cdf(z) - p).abs() < 1e-3);
    }

    #[test]
    fn prop_regression_recovers_line(
        slope in 0.5f64..100.0,
        intercept in -100.0f64..100.0,
        n in 2usize..30,
    ) {
        let points = (0..n).map(|i| {
            #[expect(clippy::cast_precision_loss)]
            let x = i as f64;
            (x, slope * x + intercept)
        });
        let fit = LinearRegression::fit(points).unwrap();
        prop_assert!((fit.slope - slope).abs() < 1e-6);
        prop_assert!((fit.intercept - intercept).abs() < 1e-6);
        prop_assert!(fit.r_squared > 1.0 - 1e-9);
    }
}
