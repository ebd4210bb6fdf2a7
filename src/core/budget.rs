/// Fraction of the range bound that a total may drift before the fit reaches zero
const BUDGET_TOLERANCE: f64 = 0.4;

/// Calculate budget fit (0-1) of a bundle total against a price range
///
/// Inside `[min, max]` the fit is exactly 1. Below the range it decays
/// linearly to 0 at `0.6 * min`, above the range to 0 at `1.4 * max`.
/// A zero bound leaves no tolerance, so anything outside scores 0.
#[inline]
pub fn budget_fit(total: i64, min: i64, max: i64) -> f64 {
    if total >= min && total <= max {
        return 1.0;
    }

    let (diff, tolerance) = if total < min {
        ((min - total) as f64, min as f64 * BUDGET_TOLERANCE)
    } else {
        ((total - max) as f64, max as f64 * BUDGET_TOLERANCE)
    };

    if tolerance == 0.0 {
        return 0.0;
    }

    (1.0 - diff / tolerance).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_score_within_range() {
        assert_eq!(budget_fit(10000, 8000, 12000), 1.0);
        assert_eq!(budget_fit(8000, 8000, 12000), 1.0);
        assert_eq!(budget_fit(12000, 8000, 12000), 1.0);
    }

    #[test]
    fn test_decays_to_zero_forty_percent_below() {
        assert!(budget_fit(4800, 8000, 12000).abs() < 1e-9);
        assert_eq!(budget_fit(1000, 8000, 12000), 0.0);
    }

    #[test]
    fn test_linear_below_range() {
        // Halfway between 0.6 * min and min
        let fit = budget_fit(6400, 8000, 12000);
        assert!((fit - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_decays_above_range() {
        assert!(budget_fit(16000, 8000, 12000) < 0.4);
        assert!(budget_fit(16800, 8000, 12000).abs() < 1e-9);
        assert_eq!(budget_fit(50000, 8000, 12000), 0.0);
    }

    #[test]
    fn test_zero_bounds_have_no_tolerance() {
        assert_eq!(budget_fit(100, 0, 0), 0.0);
        assert_eq!(budget_fit(0, 0, 0), 1.0);
    }
}
