use crate::core::FunctionComplexity;

pub fn average_complexity(complexities: &[FunctionComplexity]) -> f64 {
    if complexities.is_empty() {
        return 0.0;
    }

    let total: u32 = complexities.iter().map(|c| c.cc).sum();
    total as f64 / complexities.len() as f64
}

pub fn max_complexity(complexities: &[FunctionComplexity]) -> u32 {
    complexities.iter().map(|c| c.cc).max().unwrap_or(0)
}

/// Report-boundary rounding to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean over an explicit denominator, 0 when the denominator is 0. Used by
/// the aggregator, which excludes non-contributing files from averages.
pub fn mean_over(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fc(cc: u32) -> FunctionComplexity {
        FunctionComplexity {
            function: "f".to_string(),
            start_line: 1,
            cc,
        }
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average_complexity(&[]), 0.0);
        assert_eq!(max_complexity(&[]), 0);
    }

    #[test]
    fn average_and_max() {
        let cs = vec![fc(1), fc(4), fc(2)];
        assert!((average_complexity(&cs) - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(max_complexity(&cs), 4);
    }

    #[test]
    fn round2_truncates_to_two_places() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }

    #[test]
    fn mean_over_zero_denominator() {
        assert_eq!(mean_over(10.0, 0), 0.0);
        assert_eq!(mean_over(10.0, 4), 2.5);
    }
}
