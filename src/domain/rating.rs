//! Product rating aggregation.

/// Arithmetic mean of a set of review grades.
///
/// An empty set yields `0.0`, the rating every product starts with.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_grade(grades: &[i32]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }

    let total: i64 = grades.iter().map(|&g| i64::from(g)).sum();
    total as f64 / grades.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_two_grades() {
        assert!((mean_grade(&[4, 2]) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mean_keeps_fraction() {
        assert!((mean_grade(&[5, 4]) - 4.5).abs() < f64::EPSILON);
        assert!((mean_grade(&[1, 2, 2]) - 5.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_set_is_zero() {
        assert!(mean_grade(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_grade() {
        assert!((mean_grade(&[5]) - 5.0).abs() < f64::EPSILON);
    }
}
