use crate::course_record::CourseSummary;
use icu_collator::{Collator, CollatorOptions};
use icu_locid::{Locale, locale};
use log::warn;
use std::cmp::Ordering;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Named ordering rules for course listings
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum SortPolicy {
    /// Most reviewed first, then code
    #[default]
    ReviewsDesc,
    /// Highest average first, then most reviewed
    RatingDesc,
    /// Lowest average first, then least reviewed, unreviewed courses last
    RatingAsc,
    /// Thai name, Thai collation
    NameAsc,
    NameDesc,
    CodeAsc,
}

impl SortPolicy {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<SortPolicy> {
        SortPolicy::iter().collect()
    }

    /// Unknown or missing policy names fall back to the default
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_default()
    }

    /// Sorts in place. The sort is stable, and every policy ends with a
    /// byte-wise comparison of course codes, so the result does not depend
    /// on input order.
    pub fn sort(self, courses: &mut [CourseSummary]) {
        match self {
            Self::NameAsc | Self::NameDesc => {
                let collator = thai_collator();
                courses.sort_by(|a, b| {
                    let by_name = compare_names(collator.as_ref(), &a.name_th, &b.name_th);
                    let by_name = if self == Self::NameDesc {
                        by_name.reverse()
                    } else {
                        by_name
                    };
                    by_name.then_with(|| a.code.cmp(&b.code))
                });
            }
            _ => courses.sort_by(|a, b| self.compare(a, b)),
        }
    }

    /// Compares two courses under a policy that does not need a collator
    fn compare(self, a: &CourseSummary, b: &CourseSummary) -> Ordering {
        let ordering = match self {
            Self::ReviewsDesc => b.review_count.cmp(&a.review_count),
            Self::RatingDesc => b
                .avg_rating
                .total_cmp(&a.avg_rating)
                .then_with(|| b.review_count.cmp(&a.review_count)),
            Self::RatingAsc => match (a.review_count == 0, b.review_count == 0) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (true, true) => Ordering::Equal,
                (false, false) => a
                    .avg_rating
                    .total_cmp(&b.avg_rating)
                    .then_with(|| a.review_count.cmp(&b.review_count)),
            },
            Self::CodeAsc | Self::NameAsc | Self::NameDesc => Ordering::Equal,
        };

        ordering.then_with(|| a.code.cmp(&b.code))
    }
}

fn thai_collator() -> Option<Collator> {
    let thai: Locale = locale!("th");

    match Collator::try_new(&thai.into(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!("Thai collator unavailable, sorting names by code point: {e:?}");
            None
        }
    }
}

fn compare_names(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    }
}
