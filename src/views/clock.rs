// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Circular 24-hour clock.
//!
//! Prayer blocks sit on an outer ring, slots on an inner one, both placed
//! through [`crate::dial`].  A list of the day's slots with their duration
//! text accompanies the dial.

use super::{present, warn_if_detached, BoxedTarget};
use crate::clock_time::ClockTime;
use crate::dial::{clock_angle, dial_point, sweep, DialPoint};
use crate::hover::{HoverEvent, HoverListener, SlotKey};
use crate::plan::{DayPlan, PlanContext};
use crate::prayer::Prayer;
use crate::schedule::ScheduleScope;
use crate::slots::{Slot, SlotKind};
use crate::sync::{DateView, DaySelector};
use chrono::NaiveDate;
use qtty::Degrees;
use std::cell::RefCell;
use std::rc::Rc;

/// Dial dimensions, in target units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockGeometry {
    pub center: DialPoint,
    pub prayer_radius: f64,
    pub slot_radius: f64,
    /// Distance between an arc and its label.
    pub label_offset: f64,
}

impl Default for ClockGeometry {
    fn default() -> Self {
        Self {
            center: DialPoint { x: 150.0, y: 150.0 },
            prayer_radius: 135.0,
            slot_radius: 120.0,
            label_offset: 25.0,
        }
    }
}

/// A clockwise arc on the dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialArc {
    pub radius: f64,
    pub start_angle: Degrees,
    pub sweep: Degrees,
    pub from: DialPoint,
    pub to: DialPoint,
    /// The arc covers more than half the dial.
    pub large_arc: bool,
    pub label_point: DialPoint,
}

impl DialArc {
    fn new(center: DialPoint, radius: f64, label_radius: f64, start: ClockTime, end: ClockTime) -> Self {
        let start_angle = clock_angle(start);
        let end_angle = clock_angle(end);
        let sweep = sweep(start, end);
        let mid = Degrees::new((start_angle.value() + end_angle.value()) / 2.0);
        Self {
            radius,
            start_angle,
            sweep,
            from: dial_point(center, radius, start_angle),
            to: dial_point(center, radius, end_angle),
            large_arc: sweep.value() > 180.0,
            label_point: dial_point(center, label_radius, mid),
        }
    }
}

/// A prayer on the outer ring.
#[derive(Debug, Clone, PartialEq)]
pub struct DialMarker {
    pub prayer: Prayer,
    pub label: String,
    pub time: ClockTime,
    pub angle: Degrees,
    /// The padded block around the prayer.
    pub arc: DialArc,
}

/// A slot on the inner ring.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotArc {
    pub key: SlotKey,
    pub kind: SlotKind,
    pub label: String,
    pub arc: DialArc,
    pub active: bool,
}

/// A row of the slot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    pub key: SlotKey,
    pub range: String,
    pub duration: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockFace {
    pub date: NaiveDate,
    pub markers: Vec<DialMarker>,
    pub arcs: Vec<SlotArc>,
    pub slot_list: Vec<SlotEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClockFrame {
    Empty { date: NaiveDate },
    Face(ClockFace),
}

impl ClockFrame {
    pub fn date(&self) -> NaiveDate {
        match self {
            ClockFrame::Empty { date } => *date,
            ClockFrame::Face(face) => face.date,
        }
    }

    pub fn face(&self) -> Option<&ClockFace> {
        match self {
            ClockFrame::Face(face) => Some(face),
            ClockFrame::Empty { .. } => None,
        }
    }
}

pub struct ClockView {
    context: Rc<PlanContext>,
    selector: Rc<DaySelector>,
    target: Option<BoxedTarget<ClockFrame>>,
    geometry: ClockGeometry,
    date: NaiveDate,
    /// Position of the shown segment in the schedule.
    index: Option<usize>,
    active: Option<SlotKey>,
}

impl ClockView {
    pub fn new(
        context: Rc<PlanContext>,
        selector: Rc<DaySelector>,
        target: Option<BoxedTarget<ClockFrame>>,
    ) -> Self {
        warn_if_detached("clock", &target);
        let date = selector.selected_date();
        let index = context.schedule().index_of(date);
        Self {
            context,
            selector,
            target,
            geometry: ClockGeometry::default(),
            date,
            index,
            active: None,
        }
    }

    pub fn with_geometry(mut self, geometry: ClockGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn frame(&self) -> ClockFrame {
        let plan = self.index.and_then(|i| self.context.plan_at(i));
        match plan {
            Some(plan) if !plan.markers.is_empty() || plan.has_slots() => {
                ClockFrame::Face(build_face(&plan, &self.geometry, self.active.as_ref()))
            }
            _ => ClockFrame::Empty { date: self.date },
        }
    }

    pub fn render(&mut self) {
        if !self.is_enabled() {
            return;
        }
        let frame = self.frame();
        present(&mut self.target, &frame);
    }

    /// Date of the segment `direction` positions away, clamped to the
    /// schedule.  `None` for `today` schedules and empty ones.
    pub fn step(&self, direction: i64) -> Option<NaiveDate> {
        let schedule = self.context.schedule();
        if schedule.scope() == ScheduleScope::Today || schedule.is_empty() {
            return None;
        }
        let last = schedule.len() as i64 - 1;
        let base = self.index.unwrap_or(0) as i64;
        let target = (base + direction).clamp(0, last) as usize;
        schedule.get(target).map(|s| s.date)
    }

    /// Move through the schedule via the shared selector.
    pub fn navigate(view: &RefCell<Self>, direction: i64) -> bool {
        let (selector, target) = {
            let v = view.borrow();
            (Rc::clone(&v.selector), v.step(direction))
        };
        selector.set_selected_date(target)
    }
}

impl DateView for ClockView {
    fn set_date(&mut self, date: NaiveDate) {
        if !self.is_enabled() {
            return;
        }
        self.date = date;
        self.index = self.context.schedule().index_of(date);
        self.active = None;
        self.render();
    }
}

impl HoverListener for ClockView {
    fn on_hover(&mut self, event: &HoverEvent) {
        if !self.is_enabled() {
            return;
        }
        self.active = match event {
            HoverEvent::Enter(key) => Some(*key),
            HoverEvent::Leave(_) => None,
        };
        self.render();
    }
}

fn build_face(plan: &DayPlan, geometry: &ClockGeometry, active: Option<&SlotKey>) -> ClockFace {
    let center = geometry.center;

    let markers = plan
        .markers
        .iter()
        .map(|m| DialMarker {
            prayer: m.prayer,
            label: m.label.clone(),
            time: m.time,
            angle: clock_angle(m.time),
            arc: DialArc::new(
                center,
                geometry.prayer_radius,
                geometry.prayer_radius + geometry.label_offset,
                m.block_start,
                m.block_end,
            ),
        })
        .collect();

    let is_active = |slot: &Slot| active.is_some_and(|k| k.matches(slot));

    let arcs = plan
        .slots
        .iter()
        .map(|slot| SlotArc {
            key: SlotKey::of(slot),
            kind: slot.kind,
            label: format!("{} - {}", slot.start, slot.end),
            arc: DialArc::new(
                center,
                geometry.slot_radius,
                geometry.slot_radius - geometry.label_offset,
                slot.start,
                slot.end,
            ),
            active: is_active(slot),
        })
        .collect();

    let slot_list = plan
        .slots
        .iter()
        .map(|slot| SlotEntry {
            key: SlotKey::of(slot),
            range: format!("{} - {}", slot.start, slot.end),
            duration: slot.duration_text(),
            active: is_active(slot),
        })
        .collect();

    ClockFace {
        date: plan.date,
        markers,
        arcs,
        slot_list,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::PaddingConfig;
    use crate::prayer::PrayerSet;
    use crate::schedule::{DaySegment, Schedule};
    use crate::slots::SlotRules;
    use crate::sync::ViewKind;
    use crate::views::FrameSink;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn segment(d: u32) -> DaySegment {
        DaySegment::new(
            day(d),
            PrayerSet::from_pairs([
                (Prayer::Fajr, "03:50"),
                (Prayer::Dohr, "13:50"),
                (Prayer::Asr, "18:00"),
                (Prayer::Maghreb, "21:55"),
                (Prayer::Icha, "23:40"),
            ]),
        )
    }

    fn context(scope: ScheduleScope, days: &[u32]) -> Rc<PlanContext> {
        Rc::new(PlanContext::new(
            Schedule::new(scope, days.iter().map(|&d| segment(d)).collect()),
            PaddingConfig::default(),
            SlotRules::default(),
        ))
    }

    fn attached(
        ctx: Rc<PlanContext>,
        start: NaiveDate,
    ) -> (Rc<DaySelector>, Rc<RefCell<ClockView>>, FrameSink<ClockFrame>) {
        let selector = Rc::new(DaySelector::new(start));
        let sink = FrameSink::new();
        let clock = Rc::new(RefCell::new(ClockView::new(
            ctx,
            selector.clone(),
            Some(Box::new(sink.clone())),
        )));
        selector.register(ViewKind::Clock, &clock);
        (selector, clock, sink)
    }

    #[test]
    fn face_places_markers_and_slots() {
        let (_, clock, sink) = attached(context(ScheduleScope::Month, &[1, 2]), day(1));
        clock.borrow_mut().set_date(day(2));
        let frame = sink.last().unwrap();
        let face = frame.face().unwrap();

        assert_eq!(face.markers.len(), 5);
        let dohr = &face.markers[1];
        assert!((dohr.angle.value() - 207.5).abs() < 1e-9);

        // dohr→asr, asr→maghreb, maghreb→icha
        assert_eq!(face.arcs.len(), 3);
        assert_eq!(face.slot_list[0].range, "14:10 - 18:00");
        assert_eq!(face.slot_list[0].duration, "4h 10min");
        assert!(!face.arcs[0].arc.large_arc);
    }

    #[test]
    fn unknown_date_is_empty_not_first_segment() {
        let (_, clock, sink) = attached(context(ScheduleScope::Month, &[1, 2]), day(1));
        clock.borrow_mut().set_date(day(20));
        assert_eq!(sink.last(), Some(ClockFrame::Empty { date: day(20) }));
        assert_eq!(clock.borrow().index(), None);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let (selector, clock, _) = attached(context(ScheduleScope::Month, &[1, 2, 3]), day(1));

        assert!(!ClockView::navigate(&clock, -1));
        assert_eq!(selector.selected_date(), day(1));

        assert!(ClockView::navigate(&clock, 5));
        assert_eq!(selector.selected_date(), day(3));
        assert_eq!(clock.borrow().index(), Some(2));

        assert!(!ClockView::navigate(&clock, 1));
        assert!(ClockView::navigate(&clock, -1));
        assert_eq!(clock.borrow().date(), day(2));
    }

    #[test]
    fn today_scope_does_not_navigate() {
        let (selector, clock, _) = attached(context(ScheduleScope::Today, &[1]), day(1));
        assert!(!ClockView::navigate(&clock, 1));
        assert_eq!(selector.selected_date(), day(1));
    }

    #[test]
    fn hover_highlights_arc_and_list_row() {
        let (_, clock, sink) = attached(context(ScheduleScope::Month, &[1]), day(5));
        clock.borrow_mut().set_date(day(1));
        let key = clock.borrow().frame().face().unwrap().arcs[1].key;
        clock.borrow_mut().on_hover(&HoverEvent::Enter(key));

        let frame = sink.last().unwrap();
        let face = frame.face().unwrap();
        assert!(face.arcs[1].active && face.slot_list[1].active);
        assert!(!face.arcs[0].active && !face.slot_list[2].active);
    }
}
