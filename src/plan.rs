// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Per-day render input shared by all views.
//!
//! [`DayPlan`] is what every view draws: the prayer markers and the slots of
//! one day.  It is rebuilt on demand from the schedule and the *current*
//! padding held by [`PlanContext`], never cached across padding changes.

use crate::clock_time::{ClockTime, PaddingSide};
use crate::padding::PaddingConfig;
use crate::prayer::{Prayer, LOGICAL_ORDER};
use crate::schedule::{DaySegment, Schedule};
use crate::slots::{derive_slots, Slot, SlotRules};
use chrono::{Datelike, NaiveDate, Weekday};
use std::cell::{Ref, RefCell};

/// A prayer as placed on a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerMarker {
    pub prayer: Prayer,
    /// Exact prayer time.
    pub time: ClockTime,
    /// `time` minus the real before-padding.
    pub block_start: ClockTime,
    /// `time` plus the real after-padding.
    pub block_end: ClockTime,
    pub label: String,
}

impl PrayerMarker {
    fn new(prayer: Prayer, time: ClockTime, date: NaiveDate, padding: &PaddingConfig) -> Self {
        let pad = padding.for_prayer(prayer);
        let mut label = format!("{} ({})", prayer.label(), time);
        if prayer == Prayer::Dohr && date.weekday() == Weekday::Fri {
            label = format!("Jummah - {}", label);
        }
        Self {
            prayer,
            time,
            block_start: time.padded(pad.real_before(), PaddingSide::Before),
            block_end: time.padded(pad.real_after(), PaddingSide::After),
            label,
        }
    }
}

/// Everything a view needs to draw one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub markers: Vec<PrayerMarker>,
    pub slots: Vec<Slot>,
}

impl DayPlan {
    /// Build from a segment.
    ///
    /// Slots are derived from the prayer times; a segment without prayer
    /// times falls back to its precomputed payload slots.
    pub fn build(segment: &DaySegment, padding: &PaddingConfig, rules: &SlotRules) -> Self {
        let prayers = &segment.prayer_times;
        let markers = LOGICAL_ORDER
            .iter()
            .filter_map(|&p| prayers.time(p).map(|t| PrayerMarker::new(p, t, segment.date, padding)))
            .collect();

        let slots = if prayers.is_empty() {
            segment
                .slots
                .iter()
                .flatten()
                .filter_map(|raw| raw.to_slot())
                .collect()
        } else {
            derive_slots(prayers, padding, rules)
        };

        Self {
            date: segment.date,
            markers,
            slots,
        }
    }

    pub fn has_slots(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn marker(&self, prayer: Prayer) -> Option<&PrayerMarker> {
        self.markers.iter().find(|m| m.prayer == prayer)
    }
}

/// Schedule and padding shared by the views of one planner.
///
/// Single-threaded by construction: views hold it behind an `Rc`.
#[derive(Debug, Default)]
pub struct PlanContext {
    schedule: RefCell<Schedule>,
    padding: RefCell<PaddingConfig>,
    rules: RefCell<SlotRules>,
}

impl PlanContext {
    pub fn new(schedule: Schedule, padding: PaddingConfig, rules: SlotRules) -> Self {
        Self {
            schedule: RefCell::new(schedule),
            padding: RefCell::new(padding),
            rules: RefCell::new(rules),
        }
    }

    pub fn schedule(&self) -> Ref<'_, Schedule> {
        self.schedule.borrow()
    }

    /// Swap in a freshly generated schedule.
    pub fn replace_schedule(&self, schedule: Schedule) {
        *self.schedule.borrow_mut() = schedule;
    }

    pub fn padding(&self) -> PaddingConfig {
        self.padding.borrow().clone()
    }

    pub fn set_padding(&self, padding: PaddingConfig) {
        *self.padding.borrow_mut() = padding;
    }

    pub fn rules(&self) -> SlotRules {
        *self.rules.borrow()
    }

    pub fn set_rules(&self, rules: SlotRules) {
        *self.rules.borrow_mut() = rules;
    }

    /// Plan of the segment at `index`.
    pub fn plan_at(&self, index: usize) -> Option<DayPlan> {
        let schedule = self.schedule.borrow();
        let segment = schedule.get(index)?;
        Some(DayPlan::build(segment, &self.padding.borrow(), &self.rules.borrow()))
    }

    /// Plan shown for `date`; `None` when the schedule has no such day.
    pub fn plan_for(&self, date: NaiveDate) -> Option<DayPlan> {
        let index = self.schedule.borrow().index_of(date)?;
        self.plan_at(index)
    }
}
