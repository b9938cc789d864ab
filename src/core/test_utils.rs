use float_cmp::{approx_eq, F64Margin};

/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(calculated_values: &[f64], expected_values: &[f64]) {
    if calculated_values.len() != expected_values.len() {
        panic!(
            "assertion failed: the arrays have different lengths ({} and {})",
            calculated_values.len(),
            expected_values.len()
        );
    }
    let margins = F64Margin {
        epsilon: 1e-12,
        ulps: 4,
    };
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}

/// Get the values of a solution encoded with real numbers.
pub(crate) fn real_values(solution: &crate::core::Solution) -> Vec<f64> {
    let view = crate::core::NumericView::new(solution).unwrap();
    (0..view.size()).map(|i| view.get_value(i)).collect()
}
