/// Absorbs float error in differences of two-decimal percentages, e.g. `4.02 - 1.02`.
const THRESHOLD_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertDecision {
    pub first: f64,
    pub second: f64,
    /// Always non-negative
    pub difference: f64,
    pub should_alert: bool,
}

/// Compares the first two values in document order; `None` when fewer than two exist.
///
/// The threshold is inclusive: a difference exactly equal to it alerts.
pub fn evaluate(values: &[f64], threshold: f64) -> Option<AlertDecision> {
    let (first, second) = match values {
        [first, second, ..] => (*first, *second),
        _ => return None,
    };

    let difference = (first - second).abs();

    Some(AlertDecision {
        first,
        second,
        difference,
        should_alert: difference >= threshold - THRESHOLD_TOLERANCE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_evaluate_above_threshold() {
        let decision = evaluate(&[44.80, 41.50], 3.0).unwrap();
        assert_close(decision.difference, 3.30);
        assert!(decision.should_alert);
    }

    #[test]
    fn test_evaluate_below_threshold() {
        let decision = evaluate(&[44.80, 43.50], 3.0).unwrap();
        assert_close(decision.difference, 1.30);
        assert!(!decision.should_alert);
    }

    #[test]
    fn test_evaluate_threshold_is_inclusive() {
        let decision = evaluate(&[10.0, 7.0], 3.0).unwrap();
        assert_eq!(decision.difference, 3.0);
        assert!(decision.should_alert);
    }

    #[test]
    fn test_evaluate_threshold_survives_float_rounding() {
        let decision = evaluate(&[4.02, 1.02], 3.0).unwrap();
        assert!(decision.difference < 3.0);
        assert!(decision.should_alert);
    }

    #[test]
    fn test_evaluate_just_below_threshold() {
        let decision = evaluate(&[4.01, 1.02], 3.0).unwrap();
        assert!(!decision.should_alert);
    }

    #[test]
    fn test_evaluate_uses_first_two_in_order() {
        let decision = evaluate(&[41.50, 44.80, 0.0], 3.0).unwrap();
        assert_eq!(decision.first, 41.50);
        assert_eq!(decision.second, 44.80);
        assert!(decision.difference > 0.0);
    }

    #[test]
    fn test_evaluate_needs_two_values() {
        assert_eq!(evaluate(&[], 3.0), None);
        assert_eq!(evaluate(&[44.80], 3.0), None);
    }
}
