// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Prayer-time planning
//!
//! This crate derives free-time slots from a day's prayer times and keeps
//! three views of the schedule (timeline, clock, calendar) on the same
//! selected day.
//!
//! # Core types
//!
//! - [`ClockTime`]: signed minute offset from midnight, formatted `HH:MM`.
//! - [`Prayer`] / [`PrayerSet`]: the six prayers and one day's times.
//! - [`PaddingConfig`]: buffer minutes around prayers, real and effective.
//! - [`Slot`]: a free window, produced by [`derive_slots`].
//! - [`Schedule`]: the generated days of a [`ScheduleScope`].
//! - [`DayPlan`]: markers and slots of one day, as every view draws them.
//! - [`DaySelector`]: the single owner of the selected day.
//! - [`Planner`]: wires a schedule, a selector and the views together.
//!
//! # Views
//!
//! | View | Encoding |
//! |------|----------|
//! | [`TimelineView`] | vertical day bar |
//! | [`ClockView`] | 24-hour dial |
//! | [`CalendarView`] | six-week month grid |
//!
//! # Example
//!
//! ```
//! use prayerplan::{derive_slots, PaddingConfig, Prayer, PrayerSet, SlotRules};
//!
//! let prayers = PrayerSet::from_pairs([
//!     (Prayer::Dohr, "12:30"),
//!     (Prayer::Asr, "15:30"),
//! ]);
//! let slots = derive_slots(&prayers, &PaddingConfig::default(), &SlotRules::default());
//! assert_eq!(slots[0].to_string(), "12:50 - 15:30 (3h)");
//! ```

pub mod clock_time;
#[cfg(feature = "serde")]
pub mod config;
pub mod dial;
pub mod error;
pub mod hover;
pub mod padding;
pub mod plan;
pub mod planner;
pub mod prayer;
pub mod schedule;
pub mod slots;
pub mod sync;
pub mod views;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use clock_time::{
    add_padding, apply_padding, subtract_padding, to_minutes, to_time_string, ClockTime,
    PaddingSide, MINUTES_PER_DAY,
};
#[cfg(feature = "serde")]
pub use config::PlannerConfig;
pub use dial::{clock_angle, dial_point, minute_of_day_to_angle, DialPoint, DIAL_ROTATION};
pub use error::{ClockError, PlanError, PlanResult};
pub use hover::{HoverBus, HoverEvent, HoverListener, SlotKey};
pub use padding::{PaddingConfig, PrayerPadding, MIN_PADDING_AFTER, MIN_PADDING_BEFORE};
pub use plan::{DayPlan, PlanContext, PrayerMarker};
pub use planner::{Planner, PlannerTargets};
pub use prayer::{Prayer, PrayerSet, LOGICAL_ORDER};
pub use schedule::{DaySegment, PayloadSlot, Schedule, ScheduleScope};
pub use slots::{derive_slots, format_duration, Slot, SlotGroup, SlotKind, SlotRules, MIN_SLOT_MINUTES};
pub use sync::{DateView, DaySelector, ViewKind, FANOUT_ORDER};
pub use views::{CalendarView, ClockView, FrameSink, RenderTarget, TimelineView};
