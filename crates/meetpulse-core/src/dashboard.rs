//! Dashboard statistics.
//!
//! The dashboard shows, for the signed-in user, how many meetings they own
//! and the mean overall-satisfaction score of the feedback left on those
//! meetings.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::record::{Feedback, Meeting};

/// Rendering of an average with no qualifying ratings.
pub const NO_DATA: &str = "-";

/// Mean satisfaction score, or nothing to average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AverageRating {
    NoData,
    Value(f64),
}

impl AverageRating {
    /// Averages the given ratings.
    pub fn from_ratings(ratings: &[f64]) -> Self {
        if ratings.is_empty() {
            return Self::NoData;
        }
        let sum: f64 = ratings.iter().sum();
        Self::Value(sum / ratings.len() as f64)
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => f.write_str(NO_DATA),
            Self::Value(v) => f.write_str(&to_fixed(*v, 2)),
        }
    }
}

impl Serialize for AverageRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Summary statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_meetings: usize,
    pub average_rating: AverageRating,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            total_meetings: 0,
            average_rating: AverageRating::NoData,
        }
    }
}

/// Computes dashboard statistics for `user_id`.
///
/// Feedback counts toward the average when its meeting id (string-normalized)
/// matches a meeting owned by the user. Non-numeric scores are ignored.
pub fn aggregate(user_id: &str, meetings: &[Meeting], feedback: &[Feedback]) -> DashboardStats {
    let mine: Vec<&Meeting> = meetings.iter().filter(|m| m.is_owned_by(user_id)).collect();
    let owned: HashSet<String> = mine.iter().filter_map(|m| m.key()).collect();
    let total_meetings = mine.len();

    let ratings: Vec<f64> = feedback
        .iter()
        .filter(|fb| owned.contains(&fb.meeting_id.key()))
        .filter_map(Feedback::rating)
        .collect();

    DashboardStats {
        total_meetings,
        average_rating: AverageRating::from_ratings(&ratings),
    }
}

/// Formats `value` with exactly `digits` fractional digits.
///
/// Rounding follows JavaScript's `Number.prototype.toFixed`: the exact binary
/// value is rounded half away from zero, so `4.125` becomes `"4.13"` while
/// `1.005` (stored as `1.00499…`) becomes `"1.00"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.min(100);

    // 1074 fractional digits print any finite f64 exactly.
    let exact = format!("{:.1074}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();

    if frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let int_len = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    for (i, b) in kept.iter().enumerate() {
        if i == int_len {
            out.push('.');
        }
        out.push(char::from(*b));
    }
    out
}
