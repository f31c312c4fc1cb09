/// Tolerance used throughout the geometry kernel and search engine for every
/// comparison that would otherwise be an exact floating-point equality:
/// point/vertex equality, orientation sign, boundedness, and the history
/// dedupe's quantisation bucket. Tuned for degree-scale values rather than
/// [f64::EPSILON], which is too tight for quantities accumulated through
/// several trigonometric operations.
pub(crate) const EPSILON: f64 = 1e-9;

/// Determines if the two given values are effectively equal, within [`EPSILON`].
pub(crate) fn eq(left: f64, right: f64) -> bool {
    (right - left).abs() <= EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_within_epsilon() {
        assert!(eq(1.0, 1.0 + EPSILON / 2.0));
        assert!(!eq(1.0, 1.0 + EPSILON * 10.0));
    }
}
