//! String encodings for edited values.
//!
//! Two record fields are stored as short display strings and edited as
//! structured values:
//!
//! - queue timeouts: `<integer><unit>` where the unit suffix is `s`, `min` or `h`
//!   (`"30s"`, `"5min"`, `"1h"`)
//! - scale counts: a single integer (`"4"`) or an inclusive range (`"4~8"`)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors produced when decoding an encoded field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The duration string did not contain any digits.
    #[error("no numeric value in duration {0:?}")]
    MissingNumber(String),

    /// A number was present but did not fit or did not parse.
    #[error("invalid number in {0:?}")]
    InvalidNumber(String),

    /// A range had its bounds the wrong way round.
    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedRange {
        /// Lower bound as written.
        min: u32,
        /// Upper bound as written.
        max: u32,
    },
}

/// Unit of a queue timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Seconds, suffix `s`.
    #[default]
    Seconds,
    /// Minutes, suffix `min`.
    Minutes,
    /// Hours, suffix `h`.
    Hours,
}

impl TimeUnit {
    /// The suffix used in the encoded form.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Minutes => "min",
            Self::Hours => "h",
        }
    }

    const fn seconds(self) -> u64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 3600,
        }
    }

    /// Infer the unit from an encoded string.
    ///
    /// `min` wins over `h`; anything else is seconds.
    #[must_use]
    pub fn infer(encoded: &str) -> Self {
        if encoded.contains("min") {
            Self::Minutes
        } else if encoded.contains('h') {
            Self::Hours
        } else {
            Self::Seconds
        }
    }
}

/// A queue timeout such as `30s` or `5min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueTimeout {
    /// The numeric part.
    pub value: u32,
    /// The unit of `value`.
    pub unit: TimeUnit,
}

impl QueueTimeout {
    /// Create a timeout from a value and unit.
    #[must_use]
    pub const fn new(value: u32, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// The timeout as a standard duration.
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.value) * self.unit.seconds())
    }
}

impl fmt::Display for QueueTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for QueueTimeout {
    type Err = EncodingError;

    /// Decode a timeout.
    ///
    /// The first run of ASCII digits is the value; the unit is inferred from
    /// the suffix text (see [`TimeUnit::infer`]).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        if digits.is_empty() {
            return Err(EncodingError::MissingNumber(s.to_string()));
        }
        let value = digits
            .parse()
            .map_err(|_| EncodingError::InvalidNumber(s.to_string()))?;
        Ok(Self::new(value, TimeUnit::infer(s)))
    }
}

impl TryFrom<String> for QueueTimeout {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QueueTimeout> for String {
    fn from(timeout: QueueTimeout) -> Self {
        timeout.to_string()
    }
}

/// The node count of an engine scale: fixed, or an autoscaling range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScaleCount {
    /// A fixed number of nodes.
    Fixed(u32),
    /// An inclusive autoscaling range.
    Range {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
}

impl ScaleCount {
    /// Build a count from bounds, collapsing equal bounds to `Fixed`.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError::InvertedRange` if `min > max`.
    pub const fn from_bounds(min: u32, max: u32) -> Result<Self, EncodingError> {
        if min > max {
            return Err(EncodingError::InvertedRange { min, max });
        }
        if min == max {
            Ok(Self::Fixed(min))
        } else {
            Ok(Self::Range { min, max })
        }
    }

    /// Lower bound (the count itself when fixed).
    #[must_use]
    pub const fn min(&self) -> u32 {
        match *self {
            Self::Fixed(n) => n,
            Self::Range { min, .. } => min,
        }
    }

    /// Upper bound (the count itself when fixed).
    #[must_use]
    pub const fn max(&self) -> u32 {
        match *self {
            Self::Fixed(n) => n,
            Self::Range { max, .. } => max,
        }
    }
}

impl fmt::Display for ScaleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Range { min, max } => write!(f, "{min}~{max}"),
        }
    }
}

fn parse_count(part: &str, whole: &str) -> Result<u32, EncodingError> {
    part.trim()
        .parse()
        .map_err(|_| EncodingError::InvalidNumber(whole.to_string()))
}

impl FromStr for ScaleCount {
    type Err = EncodingError;

    /// Decode a count. Both the ASCII `~` and the full-width `～` separator
    /// are accepted; encoding always writes `~`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(['~', '～']) {
            Some((min, max)) => Self::from_bounds(parse_count(min, s)?, parse_count(max, s)?),
            None => Ok(Self::Fixed(parse_count(s, s)?)),
        }
    }
}

impl TryFrom<String> for ScaleCount {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScaleCount> for String {
    fn from(count: ScaleCount) -> Self {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_minutes_encodes_as_min_suffix() {
        let timeout = QueueTimeout::new(5, TimeUnit::Minutes);
        assert_eq!(timeout.to_string(), "5min");

        let decoded: QueueTimeout = "5min".parse().unwrap();
        assert_eq!(decoded.value, 5);
        assert_eq!(decoded.unit, TimeUnit::Minutes);
    }

    #[test]
    fn unit_inference() {
        assert_eq!("30s".parse::<QueueTimeout>().unwrap().unit, TimeUnit::Seconds);
        assert_eq!("1h".parse::<QueueTimeout>().unwrap().unit, TimeUnit::Hours);
        assert_eq!("12".parse::<QueueTimeout>().unwrap().unit, TimeUnit::Seconds);
        assert_eq!("10 sec".parse::<QueueTimeout>().unwrap().unit, TimeUnit::Seconds);
    }

    #[test]
    fn timeout_duration() {
        let timeout: QueueTimeout = "2h".parse().unwrap();
        assert_eq!(timeout.as_duration(), Duration::from_secs(7200));
    }

    #[test]
    fn timeout_without_digits_is_rejected() {
        assert_eq!(
            "forever".parse::<QueueTimeout>(),
            Err(EncodingError::MissingNumber("forever".to_string()))
        );
    }

    #[test]
    fn timeout_serde_uses_encoded_string() {
        let json = serde_json::to_string(&QueueTimeout::new(45, TimeUnit::Seconds)).unwrap();
        assert_eq!(json, "\"45s\"");
        let back: QueueTimeout = serde_json::from_str("\"3min\"").unwrap();
        assert_eq!(back, QueueTimeout::new(3, TimeUnit::Minutes));
    }

    #[test]
    fn scale_count_fixed_and_range() {
        assert_eq!("4".parse::<ScaleCount>().unwrap(), ScaleCount::Fixed(4));
        assert_eq!(
            "4~8".parse::<ScaleCount>().unwrap(),
            ScaleCount::Range { min: 4, max: 8 }
        );
        assert_eq!(
            "2～6".parse::<ScaleCount>().unwrap(),
            ScaleCount::Range { min: 2, max: 6 }
        );
        assert_eq!(ScaleCount::Range { min: 2, max: 6 }.to_string(), "2~6");
    }

    #[test]
    fn scale_count_from_equal_bounds_is_fixed() {
        assert_eq!(ScaleCount::from_bounds(3, 3).unwrap(), ScaleCount::Fixed(3));
        assert_eq!(ScaleCount::from_bounds(3, 3).unwrap().to_string(), "3");
        assert_eq!(
            ScaleCount::from_bounds(5, 2),
            Err(EncodingError::InvertedRange { min: 5, max: 2 })
        );
    }

    #[test]
    fn scale_count_rejects_garbage() {
        assert!("four".parse::<ScaleCount>().is_err());
        assert!("8~4".parse::<ScaleCount>().is_err());
    }
}
