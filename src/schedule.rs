// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Generated schedules: per-day segments and their lookup by date.
//!
//! The planning server returns an array of day segments.  For the `year`
//! scope it may group them into month buckets (`{"days": [...]}`); those are
//! flattened on ingestion, so every scope ends up as one dated sequence and
//! every view resolves a date through [`Schedule::segment_for`].

use crate::clock_time::ClockTime;
use crate::error::{PlanError, PlanResult};
use crate::prayer::PrayerSet;
use crate::slots::Slot;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Payload date format.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a `DD/MM/YYYY` date.
pub fn parse_day_date(s: &str) -> PlanResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| PlanError::InvalidDate(s.to_string()))
}

/// Format a date as `DD/MM/YYYY`.
pub fn format_day_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Time horizon of a generated schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScheduleScope {
    #[default]
    Today,
    Month,
    Year,
}

impl fmt::Display for ScheduleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleScope::Today => "today",
            ScheduleScope::Month => "month",
            ScheduleScope::Year => "year",
        })
    }
}

impl FromStr for ScheduleScope {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(ScheduleScope::Today),
            "month" => Ok(ScheduleScope::Month),
            "year" => Ok(ScheduleScope::Year),
            other => Err(PlanError::Config(format!("unknown schedule scope {:?}", other))),
        }
    }
}

/// A precomputed slot as sent by the server. Bounds stay raw until used.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PayloadSlot {
    #[cfg_attr(feature = "serde", serde(alias = "start_time", alias = "startTime"))]
    pub start: String,
    #[cfg_attr(feature = "serde", serde(alias = "end_time", alias = "endTime"))]
    pub end: String,
}

impl PayloadSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The slot, if both bounds parse.
    pub fn to_slot(&self) -> Option<Slot> {
        let start: ClockTime = self.start.parse().ok()?;
        let end: ClockTime = self.end.parse().ok()?;
        Some(Slot::from_bounds(start, end))
    }
}

/// One calendar day of schedule data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DaySegment {
    #[cfg_attr(feature = "serde", serde(with = "dmy"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub prayer_times: PrayerSet,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub slots: Option<Vec<PayloadSlot>>,
}

impl DaySegment {
    pub fn new(date: NaiveDate, prayer_times: PrayerSet) -> Self {
        Self {
            date,
            prayer_times,
            slots: None,
        }
    }

    pub fn with_slots(mut self, slots: Vec<PayloadSlot>) -> Self {
        self.slots = Some(slots);
        self
    }
}

/// A schedule held for the session.  Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    scope: ScheduleScope,
    segments: Vec<DaySegment>,
}

impl Schedule {
    pub fn new(scope: ScheduleScope, segments: Vec<DaySegment>) -> Self {
        Self { scope, segments }
    }

    /// An empty schedule (nothing generated yet).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> ScheduleScope {
        self.scope
    }

    pub fn segments(&self) -> &[DaySegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DaySegment> {
        self.segments.get(index)
    }

    /// Position of the segment shown for `date`.
    ///
    /// `today` schedules always show their single segment; `month` and
    /// `year` schedules match the segment's own date.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        match self.scope {
            ScheduleScope::Today => (!self.segments.is_empty()).then_some(0),
            ScheduleScope::Month | ScheduleScope::Year => {
                self.segments.iter().position(|s| s.date == date)
            }
        }
    }

    /// Segment shown for `date`, if any.
    pub fn segment_for(&self, date: NaiveDate) -> Option<&DaySegment> {
        self.index_of(date).and_then(|i| self.segments.get(i))
    }

    /// Parse a planning payload for `scope`.
    ///
    /// The payload must be a JSON array.  Year payloads may group days in
    /// `{"days": [...]}` month buckets.  A day that does not decode (bad
    /// date, wrong shape) is skipped with a warning; the rest is kept.
    #[cfg(feature = "serde")]
    pub fn from_json(scope: ScheduleScope, json: &str) -> PlanResult<Self> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut segments = Vec::new();
        let mut skipped = 0usize;
        for entry in entries {
            match entry.get("days").and_then(serde_json::Value::as_array) {
                Some(days) => {
                    for day in days {
                        push_segment(&mut segments, &mut skipped, day.clone());
                    }
                }
                None => push_segment(&mut segments, &mut skipped, entry),
            }
        }
        log::debug!(
            "Loaded {} day segments for scope {} ({} skipped)",
            segments.len(),
            scope,
            skipped
        );
        Ok(Self::new(scope, segments))
    }
}

#[cfg(feature = "serde")]
fn push_segment(segments: &mut Vec<DaySegment>, skipped: &mut usize, value: serde_json::Value) {
    match serde_json::from_value::<DaySegment>(value) {
        Ok(segment) => segments.push(segment),
        Err(e) => {
            *skipped += 1;
            log::warn!("Skipping payload day: {}", e);
        }
    }
}

#[cfg(feature = "serde")]
mod dmy {
    use super::{format_day_date, parse_day_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_day_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_day_date(&raw).map_err(serde::de::Error::custom)
    }
}
