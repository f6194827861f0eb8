// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Wall-clock time arithmetic.
//!
//! [`ClockTime`] is a signed minute offset from local midnight.  It is the
//! only time representation used by slot derivation and the views; the
//! `HH:MM` strings of the payload are parsed into it and formatted back out
//! of it.
//!
//! Arithmetic is deliberately *unnormalised*:
//!
//! - parsing does not range-check (`"25:70"` is `25*60 + 70`),
//! - formatting never wraps past a day (`1500` is `"25:00"`),
//! - negative offsets format as `-HH:MM` (`-30` is `"-00:30"`), and the
//!   parser accepts that same form back.
//!
//! Callers that need an in-range time of day must check
//! [`ClockTime::is_within_day`] themselves.

use crate::error::ClockError;
use qtty::{Day, Days, Minutes};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of minutes in a civil day.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Which side of a prayer a padding is applied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingSide {
    /// Subtract the padding (preparation before the prayer).
    Before,
    /// Add the padding (wind-down after the prayer).
    After,
}

/// A wall-clock time with minute resolution, stored as minutes from midnight.
///
/// The value may transiently leave `0..1440` after padding arithmetic; see
/// the module docs for the formatting rules in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime {
    minutes: i32,
}

impl ClockTime {
    /// `00:00`.
    pub const MIDNIGHT: ClockTime = ClockTime::from_minutes(0);

    /// `23:59`, the last minute of the day, used to close pre-midnight half slots.
    pub const END_OF_DAY: ClockTime = ClockTime::from_minutes(MINUTES_PER_DAY - 1);

    /// Create from a raw minute offset.
    #[inline]
    pub const fn from_minutes(minutes: i32) -> Self {
        Self { minutes }
    }

    /// Create from hour and minute components without range checks.
    #[inline]
    pub const fn from_hm(hours: i32, minutes: i32) -> Self {
        Self::from_minutes(hours.saturating_mul(60).saturating_add(minutes))
    }

    /// The raw minute offset.
    #[inline]
    pub const fn minutes(&self) -> i32 {
        self.minutes
    }

    /// The offset as a typed [`Minutes`] quantity.
    #[inline]
    pub fn quantity(&self) -> Minutes {
        Minutes::new(self.minutes as f64)
    }

    /// Fraction of a civil day represented by this offset (`12:00` is `0.5`).
    #[inline]
    pub fn day_fraction(&self) -> f64 {
        let days: Days = self.quantity().to::<Day>();
        days.value()
    }

    /// `true` when the offset lies in `00:00..=23:59`.
    #[inline]
    pub const fn is_within_day(&self) -> bool {
        self.minutes >= 0 && self.minutes < MINUTES_PER_DAY
    }

    /// Shift by `padding` minutes on the given side.
    ///
    /// A zero padding returns `self` unchanged.  The result is not wrapped
    /// and saturates at the `i32` range.
    #[inline]
    pub const fn padded(self, padding: i32, side: PaddingSide) -> Self {
        match side {
            PaddingSide::Before => Self::from_minutes(self.minutes.saturating_sub(padding)),
            PaddingSide::After => Self::from_minutes(self.minutes.saturating_add(padding)),
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { "-" } else { "" };
        let abs = self.minutes.unsigned_abs();
        write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ClockError::Empty);
        }

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut parts = body.split(':');
        let (Some(h), Some(m), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ClockError::Malformed(s.to_string()));
        };

        let component = |part: &str| -> Result<i32, ClockError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ClockError::Malformed(s.to_string()));
            }
            part.parse::<i32>()
                .map_err(|_| ClockError::Malformed(s.to_string()))
        };

        let (hours, minutes) = (component(h)?, component(m)?);
        let total = hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .ok_or_else(|| ClockError::Malformed(s.to_string()))?;
        Ok(Self::from_minutes(if negative { -total } else { total }))
    }
}

impl Add<i32> for ClockTime {
    type Output = ClockTime;
    #[inline]
    fn add(self, rhs: i32) -> Self::Output {
        Self::from_minutes(self.minutes.saturating_add(rhs))
    }
}

impl Sub<i32> for ClockTime {
    type Output = ClockTime;
    #[inline]
    fn sub(self, rhs: i32) -> Self::Output {
        Self::from_minutes(self.minutes.saturating_sub(rhs))
    }
}

/// Difference between two clock times, in minutes.
impl Sub for ClockTime {
    type Output = i32;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.minutes.saturating_sub(rhs.minutes)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ClockTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ClockTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── String-level helpers ──────────────────────────────────────────────────

/// Parse `HH:MM` into minutes from midnight, without range validation.
///
/// ```
/// assert_eq!(prayerplan::to_minutes("14:30"), Ok(870));
/// assert_eq!(prayerplan::to_minutes("25:70"), Ok(1570));
/// assert!(prayerplan::to_minutes("").is_err());
/// ```
pub fn to_minutes(time: &str) -> Result<i32, ClockError> {
    time.parse::<ClockTime>().map(|t| t.minutes())
}

/// Format minutes from midnight as `HH:MM` (or `-HH:MM`), never wrapping.
///
/// ```
/// assert_eq!(prayerplan::to_time_string(870), "14:30");
/// assert_eq!(prayerplan::to_time_string(1500), "25:00");
/// assert_eq!(prayerplan::to_time_string(-30), "-00:30");
/// ```
pub fn to_time_string(minutes: i32) -> String {
    ClockTime::from_minutes(minutes).to_string()
}

/// Apply a padding to an `HH:MM` string.
///
/// Zero padding returns the input untouched, even when it would not parse.
pub fn apply_padding(time: &str, padding: i32, side: PaddingSide) -> Result<String, ClockError> {
    if padding == 0 {
        return Ok(time.to_string());
    }
    let parsed: ClockTime = time.parse()?;
    Ok(parsed.padded(padding, side).to_string())
}

/// `apply_padding(time, padding, PaddingSide::After)`.
pub fn add_padding(time: &str, padding: i32) -> Result<String, ClockError> {
    apply_padding(time, padding, PaddingSide::After)
}

/// `apply_padding(time, padding, PaddingSide::Before)`.
pub fn subtract_padding(time: &str, padding: i32) -> Result<String, ClockError> {
    apply_padding(time, padding, PaddingSide::Before)
}
