//! Recurrence specification: "every N days/weeks/months/years".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, ValidationError};

/// Upper bound on the frequency multiplier.
pub const MAX_FREQUENCY: u32 = 1000;

/// Calendar unit a recurring task repeats on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
    Year,
}

impl RecurrenceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceUnit::Day => "day",
            RecurrenceUnit::Week => "week",
            RecurrenceUnit::Month => "month",
            RecurrenceUnit::Year => "year",
        }
    }
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "days" | "daily" => Ok(RecurrenceUnit::Day),
            "w" | "week" | "weeks" | "weekly" => Ok(RecurrenceUnit::Week),
            "m" | "month" | "months" | "monthly" => Ok(RecurrenceUnit::Month),
            "y" | "year" | "years" | "yearly" => Ok(RecurrenceUnit::Year),
            _ => Err(CoreError::invalid_recurrence(s)),
        }
    }
}

/// A `(unit, frequency)` pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RecurrenceSpec {
    pub unit: RecurrenceUnit,
    pub frequency: u32,
}

impl RecurrenceSpec {
    /// Build a spec, rejecting a frequency outside `1..=MAX_FREQUENCY`.
    pub fn new(unit: RecurrenceUnit, frequency: u32) -> Result<Self, CoreError> {
        let spec = Self { unit, frequency };
        spec.validate()?;
        Ok(spec)
    }

    pub fn daily() -> Self {
        Self {
            unit: RecurrenceUnit::Day,
            frequency: 1,
        }
    }

    pub fn weekly() -> Self {
        Self {
            unit: RecurrenceUnit::Week,
            frequency: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.frequency == 0 || self.frequency > MAX_FREQUENCY {
            return Err(ValidationError::InvalidValue {
                field: "frequency".into(),
                message: format!(
                    "must be between 1 and {MAX_FREQUENCY}, got {}",
                    self.frequency
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for RecurrenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frequency == 1 {
            write!(f, "every {}", self.unit)
        } else {
            write!(f, "every {} {}s", self.frequency, self.unit)
        }
    }
}

impl FromStr for RecurrenceSpec {
    type Err = CoreError;

    /// Formats:
    /// - `"daily"`, `"weekly"`, `"monthly"`, `"yearly"`
    /// - `"3d"`, `"2w"`, `"1m"`, `"1y"`
    /// - `"every 3 days"`, `"every week"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let body = lower.strip_prefix("every").map(str::trim).unwrap_or(&lower);

        let split_at = body
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(body.len());
        let (digits, unit) = body.split_at(split_at);
        let unit = unit.trim();
        if unit.is_empty() {
            return Err(CoreError::invalid_recurrence(s));
        }

        let frequency = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|_| CoreError::invalid_recurrence(s))?
        };

        let unit = unit
            .parse::<RecurrenceUnit>()
            .map_err(|_| CoreError::invalid_recurrence(s))?;
        RecurrenceSpec::new(unit, frequency)
    }
}
