//! Rating aggregation for landmark feedback.
//!
//! Visitors leave feedback records with a numeric `rating` (nominally 1-5).
//! Records come from a loosely-typed store, so the rating field may hold
//! anything; non-numeric values are skipped rather than rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean rating and number of ratings for a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean rounded to one decimal place; `None` when there are no ratings.
    pub average: Option<f64>,
    /// Number of ratings counted.
    pub count: usize,
}

impl RatingSummary {
    /// The summary of no ratings.
    pub const EMPTY: Self = Self {
        average: None,
        count: 0,
    };
}

impl fmt::Display for RatingSummary {
    /// "4.3 / 5 (12 reviews)", or "No reviews yet".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.average {
            None => f.write_str("No reviews yet"),
            Some(average) => {
                let plural = if self.count > 1 { "s" } else { "" };
                write!(f, "{average:.1} / 5 ({} review{plural})", self.count)
            }
        }
    }
}

/// Summarize a set of ratings.
///
/// Non-finite values are ignored. Out-of-range values are counted as given.
///
/// # Examples
///
/// ```
/// use landmark_server::ratings::summarize;
///
/// let summary = summarize([3.0, 4.0, 5.0]);
/// assert_eq!(summary.average, Some(4.0));
/// assert_eq!(summary.count, 3);
///
/// assert_eq!(summarize([]).average, None);
/// ```
pub fn summarize(ratings: impl IntoIterator<Item = f64>) -> RatingSummary {
    let (sum, count) = ratings
        .into_iter()
        .filter(|r| r.is_finite())
        .fold((0.0, 0usize), |(sum, count), r| (sum + r, count + 1));

    if count == 0 {
        return RatingSummary::EMPTY;
    }

    let mean = sum / count as f64;
    RatingSummary {
        average: Some(round_to_tenth(mean)),
        count,
    }
}

/// Round to one decimal place using the exact value of `x`, ties away
/// from zero.
///
/// `(x * 10.0).round()` is not enough: 1.45 is stored as 1.4499..., but
/// `1.45 * 10.0` rounds up to exactly 14.5.
fn round_to_tenth(x: f64) -> f64 {
    let scaled = x * 10.0;
    // Only quarters land exactly halfway between two tenths
    if (x * 4.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        return scaled.round() / 10.0;
    }
    format!("{x:.1}").parse().unwrap_or(x)
}

/// A feedback record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Name of the landmark the feedback is about.
    pub location: String,

    /// Rating as stored. Expected to be a number but not guaranteed.
    #[serde(default)]
    pub rating: serde_json::Value,

    /// Free-text comment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Feedback {
    /// The rating, if it is a JSON number.
    ///
    /// Numeric strings such as `"4"` are not accepted.
    pub fn numeric_rating(&self) -> Option<f64> {
        self.rating.as_f64()
    }
}

/// Summarize the ratings of all feedback about `landmark_name`.
pub fn summarize_feedback<'a>(
    feedback: impl IntoIterator<Item = &'a Feedback>,
    landmark_name: &str,
) -> RatingSummary {
    summarize(
        feedback
            .into_iter()
            .filter(|f| f.location == landmark_name)
            .filter_map(Feedback::numeric_rating),
    )
}
