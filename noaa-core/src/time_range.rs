use chrono::NaiveDateTime;
use std::fmt;

use crate::{
    error::{Result, TidesError},
    model::NamedDate,
};

/// Format the API expects for `begin_date` and `end_date`.
pub const QUERY_TIME_FORMAT: &str = "%Y%m%d %H:%M";

/// Time range of a request.
///
/// The API accepts five shapes:
/// - a beginning and an end;
/// - a beginning and a duration;
/// - an end and a duration;
/// - a duration alone, ending now;
/// - one of the [`NamedDate`] values.
///
/// Durations are in hours. Any other combination is rejected before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub begin: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub hours: Option<u32>,
    pub date: Option<NamedDate>,
}

impl TimeRange {
    pub fn between(begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            begin: Some(begin),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn last_hours(hours: u32) -> Self {
        Self {
            hours: Some(hours),
            ..Self::default()
        }
    }

    pub fn named(date: NamedDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks that this range has exactly one of the accepted shapes.
    pub fn validate(&self) -> Result<()> {
        let hours = self.hours.map(|h| h > 0);

        match (self.begin, self.end, hours, self.date) {
            (Some(begin), Some(end), None, None) => {
                if begin < end {
                    Ok(())
                } else {
                    Err(invalid("end date must come after begin date"))
                }
            }
            (Some(_), None, Some(positive), None)
            | (None, Some(_), Some(positive), None)
            | (None, None, Some(positive), None) => {
                if positive {
                    Ok(())
                } else {
                    Err(invalid("range must be a positive number of hours"))
                }
            }
            (None, None, None, Some(_)) => Ok(()),
            (None, None, None, None) => Err(invalid("no time range given")),
            _ => Err(invalid(
                "use begin and end, begin or end with a range, a range alone, or a named date",
            )),
        }
    }

    /// Query parameters for this range, in API order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(begin) = self.begin {
            pairs.push(("begin_date", begin.format(QUERY_TIME_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end_date", end.format(QUERY_TIME_FORMAT).to_string()));
        }
        if let Some(hours) = self.hours {
            pairs.push(("range", hours.to_string()));
        }
        if let Some(date) = self.date {
            pairs.push(("date", date.as_str().to_string()));
        }
        pairs
    }
}

/// Unencoded `key=value&...` form, as it reads in the API documentation.
impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.query_pairs().iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> TidesError {
    TidesError::InvalidRequest(format!("invalid time range: {msg}"))
}
