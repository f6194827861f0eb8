// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Vertical day timeline.
//!
//! The day runs top to bottom; positions are fractions of the day so the
//! target can scale them to any height.  Prayer blocks span the real
//! padding around each prayer.  Slot bars are inset by
//! [`TIMELINE_INSET_MINUTES`] at each end to leave a visible gap between
//! neighbours; the inset only affects the bar, never the slot it draws.

use super::{present, warn_if_detached, BoxedTarget};
use crate::clock_time::ClockTime;
use crate::hover::{HoverEvent, HoverListener, SlotKey};
use crate::plan::{DayPlan, PlanContext};
use crate::prayer::Prayer;
use crate::slots::{Slot, SlotKind};
use crate::sync::{DateView, DaySelector};
use chrono::{Days, NaiveDate};
use std::cell::RefCell;
use std::rc::Rc;

/// Gap shaved off each end of a slot bar.
pub const TIMELINE_INSET_MINUTES: i32 = 1;

/// Text shown when the selected day has no data.
pub const EMPTY_TIMELINE_TEXT: &str = "No events for this day";

/// A prayer and its padding, as drawn on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerBlock {
    pub prayer: Prayer,
    pub title: String,
    /// Exact prayer time, the block's sync anchor.
    pub time: ClockTime,
    pub top: f64,
    pub height: f64,
}

/// A slot bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBar {
    /// Identity of the semantic slot, not of the inset bar.
    pub key: SlotKey,
    pub kind: SlotKind,
    pub title: String,
    /// Inset bounds actually drawn.
    pub start: ClockTime,
    pub end: ClockTime,
    pub top: f64,
    pub height: f64,
    /// Only one half of a split slot carries the title.
    pub show_title: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineFrame {
    Empty { date: NaiveDate, message: &'static str },
    Day {
        date: NaiveDate,
        blocks: Vec<PrayerBlock>,
        bars: Vec<SlotBar>,
    },
}

impl TimelineFrame {
    pub fn date(&self) -> NaiveDate {
        match self {
            TimelineFrame::Empty { date, .. } | TimelineFrame::Day { date, .. } => *date,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TimelineFrame::Empty { .. })
    }

    pub fn bars(&self) -> &[SlotBar] {
        match self {
            TimelineFrame::Day { bars, .. } => bars,
            TimelineFrame::Empty { .. } => &[],
        }
    }

    pub fn blocks(&self) -> &[PrayerBlock] {
        match self {
            TimelineFrame::Day { blocks, .. } => blocks,
            TimelineFrame::Empty { .. } => &[],
        }
    }
}

pub struct TimelineView {
    context: Rc<PlanContext>,
    selector: Rc<DaySelector>,
    target: Option<BoxedTarget<TimelineFrame>>,
    date: NaiveDate,
    active: Option<SlotKey>,
}

impl TimelineView {
    pub fn new(
        context: Rc<PlanContext>,
        selector: Rc<DaySelector>,
        target: Option<BoxedTarget<TimelineFrame>>,
    ) -> Self {
        warn_if_detached("timeline", &target);
        let date = selector.selected_date();
        Self {
            context,
            selector,
            target,
            date,
            active: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Frame for the current date.
    pub fn frame(&self) -> TimelineFrame {
        match self.context.plan_for(self.date) {
            Some(plan) if !plan.markers.is_empty() || plan.has_slots() => {
                build_frame(&plan, self.active.as_ref())
            }
            _ => TimelineFrame::Empty {
                date: self.date,
                message: EMPTY_TIMELINE_TEXT,
            },
        }
    }

    pub fn render(&mut self) {
        if !self.is_enabled() {
            return;
        }
        let frame = self.frame();
        present(&mut self.target, &frame);
    }

    /// Date `days` away from the shown one.
    pub fn step(&self, days: i64) -> Option<NaiveDate> {
        let magnitude = Days::new(days.unsigned_abs());
        if days >= 0 {
            self.date.checked_add_days(magnitude)
        } else {
            self.date.checked_sub_days(magnitude)
        }
    }

    /// Move the selection `days` away through the shared selector.
    ///
    /// Takes the cell rather than `&self` so the view is not borrowed while
    /// the selector notifies it.
    pub fn navigate(view: &RefCell<Self>, days: i64) -> bool {
        let (selector, target) = {
            let v = view.borrow();
            (Rc::clone(&v.selector), v.step(days))
        };
        selector.set_selected_date(target)
    }

    pub fn previous_day(view: &RefCell<Self>) -> bool {
        Self::navigate(view, -1)
    }

    pub fn next_day(view: &RefCell<Self>) -> bool {
        Self::navigate(view, 1)
    }
}

impl DateView for TimelineView {
    fn set_date(&mut self, date: NaiveDate) {
        if !self.is_enabled() {
            return;
        }
        self.date = date;
        self.active = None;
        self.render();
    }
}

impl HoverListener for TimelineView {
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

fn build_frame(plan: &DayPlan, active: Option<&SlotKey>) -> TimelineFrame {
    let blocks = plan
        .markers
        .iter()
        .map(|m| PrayerBlock {
            prayer: m.prayer,
            title: m.label.clone(),
            time: m.time,
            top: m.block_start.day_fraction(),
            height: m.block_end.day_fraction() - m.block_start.day_fraction(),
        })
        .collect();

    let bars = plan
        .slots
        .iter()
        .filter_map(|slot| {
            let start = slot.start + TIMELINE_INSET_MINUTES;
            let end = slot.end - TIMELINE_INSET_MINUTES;
            if end <= start {
                return None;
            }
            Some(SlotBar {
                key: SlotKey::of(slot),
                kind: slot.kind,
                title: format!("Available ({})", slot.duration_text()),
                start,
                end,
                top: start.day_fraction(),
                height: end.day_fraction() - start.day_fraction(),
                show_title: carries_title(slot, &plan.slots),
                active: active.is_some_and(|k| k.matches(slot)),
            })
        })
        .collect();

    TimelineFrame::Day {
        date: plan.date,
        blocks,
        bars,
    }
}

/// Whether `slot` is the half of its group that shows the title: the
/// wider one, the first on a tie.
fn carries_title(slot: &Slot, all: &[Slot]) -> bool {
    let Some(group) = slot.group else {
        return true;
    };
    let widest = all
        .iter()
        .filter(|s| s.group == Some(group))
        .reduce(|best, s| if s.width() > best.width() { s } else { best });
    widest.map_or(true, |w| std::ptr::eq(w, slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::PaddingConfig;
    use crate::prayer::PrayerSet;
    use crate::schedule::{DaySegment, Schedule, ScheduleScope};
    use crate::slots::SlotRules;
    use crate::views::FrameSink;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn context(segments: Vec<DaySegment>) -> Rc<PlanContext> {
        Rc::new(PlanContext::new(
            Schedule::new(ScheduleScope::Month, segments),
            PaddingConfig::default(),
            SlotRules::default(),
        ))
    }

    fn late_icha(d: u32) -> DaySegment {
        DaySegment::new(
            day(d),
            PrayerSet::from_pairs([
                (Prayer::Asr, "18:00"),
                (Prayer::Maghreb, "22:30"),
                (Prayer::Icha, "00:40"),
            ]),
        )
    }

    fn view(ctx: Rc<PlanContext>, sink: &FrameSink<TimelineFrame>) -> TimelineView {
        let selector = Rc::new(DaySelector::new(day(1)));
        TimelineView::new(ctx, selector, Some(Box::new(sink.clone())))
    }

    #[test]
    fn bars_are_inset_but_keys_are_not() {
        let sink = FrameSink::new();
        let mut tl = view(context(vec![late_icha(2)]), &sink);
        tl.set_date(day(2));

        let frame = sink.last().unwrap();
        let bars = frame.bars();
        assert_eq!(bars.len(), 3);
        // asr→maghreb: 18:20 → 22:30, drawn 18:21 → 22:29.
        assert_eq!(bars[0].start, ClockTime::from_hm(18, 21));
        assert_eq!(bars[0].end, ClockTime::from_hm(22, 29));
        assert_eq!(bars[0].key.start, ClockTime::from_hm(18, 20));
        assert_eq!(bars[0].title, "Available (4h 30min)");
    }

    #[test]
    fn wider_half_carries_the_title() {
        let sink = FrameSink::new();
        let mut tl = view(context(vec![late_icha(2)]), &sink);
        tl.set_date(day(2));
        let frame = sink.last().unwrap();
        let night: Vec<&SlotBar> = frame.bars().iter().filter(|b| b.kind == SlotKind::Night).collect();
        // 22:50 → 23:59 is wider than 00:00 → 00:40.
        assert!(night[0].show_title);
        assert!(!night[1].show_title);
    }

    #[test]
    fn missing_day_renders_empty_state() {
        let sink = FrameSink::new();
        let mut tl = view(context(vec![late_icha(2)]), &sink);
        tl.set_date(day(3));
        assert_eq!(
            sink.last(),
            Some(TimelineFrame::Empty {
                date: day(3),
                message: EMPTY_TIMELINE_TEXT
            })
        );
    }

    #[test]
    fn hover_marks_both_halves() {
        let sink = FrameSink::new();
        let mut tl = view(context(vec![late_icha(2)]), &sink);
        tl.set_date(day(2));
        let key = tl.frame().bars()[2].key;
        tl.on_hover(&HoverEvent::Enter(key));
        let active: Vec<bool> = sink.last().unwrap().bars().iter().map(|b| b.active).collect();
        assert_eq!(active, vec![false, true, true]);

        tl.on_hover(&HoverEvent::Leave(key));
        assert!(sink.last().unwrap().bars().iter().all(|b| !b.active));
    }

    #[test]
    fn detached_view_is_inert() {
        let selector = Rc::new(DaySelector::new(day(1)));
        let mut tl = TimelineView::new(context(vec![late_icha(2)]), selector, None);
        tl.set_date(day(2));
        assert!(!tl.is_enabled());
        assert_eq!(tl.date(), day(1));
    }

    #[test]
    fn navigation_goes_through_selector() {
        let selector = Rc::new(DaySelector::new(day(1)));
        let sink = FrameSink::new();
        let tl = Rc::new(RefCell::new(TimelineView::new(
            context(vec![late_icha(2)]),
            selector.clone(),
            Some(Box::new(sink.clone())),
        )));
        selector.register(crate::sync::ViewKind::Timeline, &tl);

        assert!(TimelineView::next_day(&tl));
        assert_eq!(selector.selected_date(), day(2));
        assert_eq!(tl.borrow().date(), day(2));
        assert!(!sink.last().unwrap().is_empty());

        assert!(TimelineView::previous_day(&tl));
        assert_eq!(tl.borrow().date(), day(1));
    }
}
