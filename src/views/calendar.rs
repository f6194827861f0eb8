// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Month calendar.
//!
//! Always six weeks of seven days, starting on the Monday on or before the
//! 1st of the shown month, so the grid never changes shape between months.

use super::clock::SlotEntry;
use super::{present, warn_if_detached, BoxedTarget};
use crate::hover::{HoverEvent, HoverListener, SlotKey};
use crate::plan::PlanContext;
use crate::sync::{DateView, DaySelector};
use chrono::{Datelike, Days, Local, NaiveDate};
use std::cell::RefCell;
use std::rc::Rc;

/// Cells in a month grid.
pub const GRID_CELLS: usize = 6 * 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    /// Padding cell from the previous or next month.
    pub other_month: bool,
    pub today: bool,
    pub selected: bool,
    /// Slots of the segment shown for that day; `0` when there is none.
    pub slot_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFrame {
    pub year: i32,
    pub month: u32,
    /// `"June 2025"`.
    pub title: String,
    pub cells: Vec<CalendarCell>,
    /// Slots of the selected day.
    pub slot_list: Vec<SlotEntry>,
}

impl CalendarFrame {
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    pub fn selected(&self) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.selected)
    }
}

pub struct CalendarView {
    context: Rc<PlanContext>,
    selector: Rc<DaySelector>,
    target: Option<BoxedTarget<CalendarFrame>>,
    year: i32,
    month: u32,
    selected: NaiveDate,
    today: NaiveDate,
    active: Option<SlotKey>,
}

impl CalendarView {
    pub fn new(
        context: Rc<PlanContext>,
        selector: Rc<DaySelector>,
        target: Option<BoxedTarget<CalendarFrame>>,
    ) -> Self {
        warn_if_detached("calendar", &target);
        let selected = selector.selected_date();
        Self {
            context,
            selector,
            target,
            year: selected.year(),
            month: selected.month(),
            selected,
            today: Local::now().date_naive(),
            active: None,
        }
    }

    /// Override the day flagged as today.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Shown `(year, month)`.
    pub fn month(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn frame(&self) -> CalendarFrame {
        let first = first_of_month(self.year, self.month).unwrap_or(self.selected);
        let start = grid_start(first);

        let cells = start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| CalendarCell {
                date,
                day: date.day(),
                other_month: date.month() != first.month() || date.year() != first.year(),
                today: date == self.today,
                selected: date == self.selected,
                slot_count: self.slot_count(date),
            })
            .collect();

        let slot_list = self
            .context
            .plan_for(self.selected)
            .map(|plan| {
                plan.slots
                    .iter()
                    .map(|slot| SlotEntry {
                        key: SlotKey::of(slot),
                        range: format!("{} - {}", slot.start, slot.end),
                        duration: slot.duration_text(),
                        active: self.active.is_some_and(|k| k.matches(slot)),
                    })
                    .collect()
            })
            .unwrap_or_default();

        CalendarFrame {
            year: first.year(),
            month: first.month(),
            title: first.format("%B %Y").to_string(),
            cells,
            slot_list,
        }
    }

    pub fn render(&mut self) {
        if !self.is_enabled() {
            return;
        }
        let frame = self.frame();
        present(&mut self.target, &frame);
    }

    /// Select `day` of the shown month.  Days that do not exist in the
    /// month are ignored.
    pub fn select_day(view: &RefCell<Self>, day: u32) -> bool {
        let (selector, target) = {
            let v = view.borrow();
            (Rc::clone(&v.selector), NaiveDate::from_ymd_opt(v.year, v.month, day))
        };
        selector.set_selected_date(target)
    }

    /// Show the month `delta` months away and select its 1st.
    pub fn navigate_month(view: &RefCell<Self>, delta: i32) -> bool {
        let (selector, target) = {
            let mut v = view.borrow_mut();
            let (year, month) = shift_month(v.year, v.month, delta);
            v.year = year;
            v.month = month;
            (Rc::clone(&v.selector), first_of_month(year, month))
        };
        let changed = selector.set_selected_date(target);
        if !changed {
            view.borrow_mut().render();
        }
        changed
    }

    fn slot_count(&self, date: NaiveDate) -> usize {
        self.context
            .plan_for(date)
            .map_or(0, |plan| plan.slots.len())
    }
}

impl DateView for CalendarView {
    fn set_date(&mut self, date: NaiveDate) {
        if !self.is_enabled() {
            return;
        }
        self.selected = date;
        self.year = date.year();
        self.month = date.month();
        self.active = None;
        self.render();
    }
}

impl HoverListener for CalendarView {
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

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Monday on or before `first`.
fn grid_start(first: NaiveDate) -> NaiveDate {
    let back = Days::new(u64::from(first.weekday().num_days_from_monday()));
    first.checked_sub_days(back).unwrap_or(first)
}

/// `(year, month)` moved by `delta` months, wrapping years.
fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}
