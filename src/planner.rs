// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Top-level planner: one schedule, one selected day, three views.
//!
//! [`Planner`] owns the shared [`PlanContext`], the [`DaySelector`], the
//! [`HoverBus`] and the views, and wires them together.  Views only hold
//! weak links to each other through the selector and the bus.

use crate::hover::{HoverBus, HoverEvent};
use crate::padding::PaddingConfig;
use crate::plan::{DayPlan, PlanContext};
use crate::schedule::{Schedule, ScheduleScope};
use crate::slots::SlotRules;
use crate::sync::{DaySelector, ViewKind};
use crate::views::{
    BoxedTarget, CalendarFrame, CalendarView, ClockFrame, ClockView, TimelineFrame, TimelineView,
};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "serde")]
use crate::config::PlannerConfig;
#[cfg(feature = "serde")]
use crate::error::PlanResult;

/// Render targets of the three views.  A missing target disables its view.
#[derive(Default)]
pub struct PlannerTargets {
    pub timeline: Option<BoxedTarget<TimelineFrame>>,
    pub clock: Option<BoxedTarget<ClockFrame>>,
    pub calendar: Option<BoxedTarget<CalendarFrame>>,
}

pub struct Planner {
    context: Rc<PlanContext>,
    selector: Rc<DaySelector>,
    hover: HoverBus,
    timeline: Rc<RefCell<TimelineView>>,
    clock: Rc<RefCell<ClockView>>,
    calendar: Rc<RefCell<CalendarView>>,
}

impl Planner {
    /// Build a planner on `initial` with an empty schedule and render once.
    pub fn new(initial: NaiveDate, padding: PaddingConfig, rules: SlotRules, targets: PlannerTargets) -> Self {
        let context = Rc::new(PlanContext::new(Schedule::empty(), padding, rules));
        let selector = Rc::new(DaySelector::new(initial));
        let hover = HoverBus::new();

        let timeline = Rc::new(RefCell::new(TimelineView::new(
            Rc::clone(&context),
            Rc::clone(&selector),
            targets.timeline,
        )));
        let clock = Rc::new(RefCell::new(ClockView::new(
            Rc::clone(&context),
            Rc::clone(&selector),
            targets.clock,
        )));
        let calendar = Rc::new(RefCell::new(CalendarView::new(
            Rc::clone(&context),
            Rc::clone(&selector),
            targets.calendar,
        )));

        selector.register(ViewKind::Timeline, &timeline);
        selector.register(ViewKind::Clock, &clock);
        selector.register(ViewKind::Calendar, &calendar);
        hover.subscribe(&timeline);
        hover.subscribe(&clock);
        hover.subscribe(&calendar);

        let planner = Self {
            context,
            selector,
            hover,
            timeline,
            clock,
            calendar,
        };
        planner.selector.refresh();
        planner
    }

    /// Planner configured from a [`PlannerConfig`].
    #[cfg(feature = "serde")]
    pub fn from_config(initial: NaiveDate, config: &PlannerConfig, targets: PlannerTargets) -> Self {
        Self::new(initial, config.padding.clone(), config.slots, targets)
    }

    pub fn context(&self) -> &Rc<PlanContext> {
        &self.context
    }

    pub fn selector(&self) -> &Rc<DaySelector> {
        &self.selector
    }

    pub fn timeline(&self) -> &Rc<RefCell<TimelineView>> {
        &self.timeline
    }

    pub fn clock(&self) -> &Rc<RefCell<ClockView>> {
        &self.clock
    }

    pub fn calendar(&self) -> &Rc<RefCell<CalendarView>> {
        &self.calendar
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selector.selected_date()
    }

    /// Plan of the selected day, if the schedule has one.
    pub fn current_plan(&self) -> Option<DayPlan> {
        self.context.plan_for(self.selected_date())
    }

    pub fn select_date(&self, date: impl Into<Option<NaiveDate>>) -> bool {
        self.selector.set_selected_date(date)
    }

    /// Install a new schedule.
    ///
    /// When a dated schedule does not cover the selected day, its first day
    /// is selected; otherwise the views are refreshed in place.
    pub fn load_schedule(&self, schedule: Schedule) {
        let jump = match schedule.scope() {
            ScheduleScope::Today => None,
            ScheduleScope::Month | ScheduleScope::Year => {
                if schedule.index_of(self.selected_date()).is_some() {
                    None
                } else {
                    schedule.get(0).map(|s| s.date)
                }
            }
        };
        log::debug!(
            "Installing {} schedule with {} day(s)",
            schedule.scope(),
            schedule.len()
        );
        self.context.replace_schedule(schedule);

        if !jump.is_some_and(|date| self.selector.set_selected_date(date)) {
            self.selector.refresh();
        }
    }

    /// Parse a planning payload and install it.
    #[cfg(feature = "serde")]
    pub fn load_json(&self, scope: ScheduleScope, json: &str) -> PlanResult<()> {
        let schedule = Schedule::from_json(scope, json)?;
        self.load_schedule(schedule);
        Ok(())
    }

    /// Change padding and re-render every view for the selected day.
    pub fn set_padding(&self, padding: PaddingConfig) {
        self.context.set_padding(padding);
        self.selector.refresh();
    }

    pub fn set_rules(&self, rules: SlotRules) {
        self.context.set_rules(rules);
        self.selector.refresh();
    }

    /// Publish a slot hover to every view.
    pub fn hover(&self, event: HoverEvent) -> usize {
        self.hover.publish(event)
    }

    pub fn navigate_timeline(&self, days: i64) -> bool {
        TimelineView::navigate(&self.timeline, days)
    }

    pub fn navigate_clock(&self, direction: i64) -> bool {
        ClockView::navigate(&self.clock, direction)
    }

    pub fn select_calendar_day(&self, day: u32) -> bool {
        CalendarView::select_day(&self.calendar, day)
    }

    pub fn navigate_month(&self, delta: i32) -> bool {
        CalendarView::navigate_month(&self.calendar, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer::{Prayer, PrayerSet};
    use crate::schedule::DaySegment;
    use crate::views::FrameSink;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn schedule(days: &[u32]) -> Schedule {
        Schedule::new(
            ScheduleScope::Month,
            days.iter()
                .map(|&d| {
                    DaySegment::new(
                        day(d),
                        PrayerSet::from_pairs([(Prayer::Dohr, "13:50"), (Prayer::Asr, "18:00")]),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn load_jumps_to_first_day_when_uncovered() {
        let sink = FrameSink::<TimelineFrame>::new();
        let planner = Planner::new(
            day(20),
            PaddingConfig::default(),
            SlotRules::default(),
            PlannerTargets {
                timeline: Some(Box::new(sink.clone())),
                ..Default::default()
            },
        );
        assert!(sink.last().unwrap().is_empty());

        planner.load_schedule(schedule(&[1, 2]));
        assert_eq!(planner.selected_date(), day(1));
        assert!(!sink.last().unwrap().is_empty());
    }

    #[test]
    fn load_keeps_covered_day() {
        let sink = FrameSink::<ClockFrame>::new();
        let planner = Planner::new(
            day(2),
            PaddingConfig::default(),
            SlotRules::default(),
            PlannerTargets {
                clock: Some(Box::new(sink.clone())),
                ..Default::default()
            },
        );
        planner.load_schedule(schedule(&[1, 2]));
        assert_eq!(planner.selected_date(), day(2));
        assert_eq!(sink.last().unwrap().date(), day(2));
        assert!(sink.last().unwrap().face().is_some());
    }

    #[test]
    fn padding_change_rerenders_same_day() {
        let sink = FrameSink::<ClockFrame>::new();
        let planner = Planner::new(
            day(1),
            PaddingConfig::default(),
            SlotRules::default(),
            PlannerTargets {
                clock: Some(Box::new(sink.clone())),
                ..Default::default()
            },
        );
        planner.load_schedule(schedule(&[1]));
        let before = sink.len();

        planner.set_padding(PaddingConfig::global(0, 60));
        assert_eq!(sink.len(), before + 1);
        let frame = sink.last().unwrap();
        assert_eq!(frame.face().unwrap().slot_list[0].range, "14:50 - 18:00");
    }

    #[test]
    fn views_without_targets_stay_silent() {
        let planner = Planner::new(day(1), PaddingConfig::default(), SlotRules::default(), PlannerTargets::default());
        planner.load_schedule(schedule(&[1, 2]));
        assert!(planner.select_date(day(2)));
        assert!(!planner.timeline().borrow().is_enabled());
        assert_eq!(planner.current_plan().map(|p| p.slots.len()), Some(1));
    }
}
