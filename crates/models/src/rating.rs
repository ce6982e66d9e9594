/// Review statistics derived from a course's reviews at read time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReviewStats {
    /// Every review counts, rated or not
    pub review_count: u64,
    /// Rounded to one decimal, `0.0` when there are no reviews
    pub avg_rating: f64,
}

impl ReviewStats {
    /// Aggregates the ratings of one course's reviews.
    ///
    /// The sum only includes reviews that carry a rating, but the divisor is
    /// the total number of reviews, so an unrated review pulls the average
    /// towards zero.
    pub fn from_ratings(ratings: &[Option<i32>]) -> Self {
        let review_count = ratings.len() as u64;
        if review_count == 0 {
            return Self::default();
        }

        let sum: i64 = ratings.iter().flatten().map(|&r| i64::from(r)).sum();

        Self {
            review_count,
            avg_rating: round_to_tenth(sum as f64 / review_count as f64),
        }
    }
}

/// Rounds to one decimal
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reviews() {
        let stats = ReviewStats::from_ratings(&[]);
        assert_eq!(stats.review_count, 0);
        assert_eq!(stats.avg_rating, 0.0);
    }

    #[test]
    fn test_unrated_review_counts_towards_divisor() {
        // (5 + 4 + 3) / 4, not (5 + 4 + 3) / 3
        let stats = ReviewStats::from_ratings(&[Some(5), Some(4), None, Some(3)]);
        assert_eq!(stats.review_count, 4);
        assert_eq!(stats.avg_rating, 3.0);
    }

    #[test]
    fn test_only_unrated_reviews() {
        let stats = ReviewStats::from_ratings(&[None, None]);
        assert_eq!(stats.review_count, 2);
        assert_eq!(stats.avg_rating, 0.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        // 14 / 3 = 4.666..
        assert_eq!(
            ReviewStats::from_ratings(&[Some(5), Some(5), Some(4)]).avg_rating,
            4.7
        );
        // 13 / 3 = 4.333..
        assert_eq!(
            ReviewStats::from_ratings(&[Some(5), Some(4), Some(4)]).avg_rating,
            4.3
        );
        // 9 / 4 = 2.25
        assert_eq!(
            ReviewStats::from_ratings(&[Some(3), Some(2), Some(2), Some(2)]).avg_rating,
            2.3
        );
    }
}
