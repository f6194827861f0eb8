// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Selected-date synchronisation between views.
//!
//! [`DaySelector`] owns the single "currently selected day" and is the only
//! way to change it.  Views register under a [`ViewKind`] and are told about
//! every change through [`DateView::set_date`], in [`FANOUT_ORDER`].
//!
//! Views typically react to user input by calling back into
//! [`DaySelector::set_selected_date`], including from inside their own
//! `set_date`.  Two rules keep that from looping:
//!
//! 1. selecting the day that is already selected is a no-op;
//! 2. the new day is stored *before* any view is notified, so a view that
//!    echoes the date back hits rule 1.
//!
//! A view that is gone (dropped) is skipped.  If a view selects a
//! *different* day mid-fan-out, the newer fan-out wins and the outer one
//! stops.  A view that is still busy in an outer notification when a newer
//! day goes out is deferred, and receives the latest day as soon as its
//! borrow is released.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::{Rc, Weak};

/// A view that can be moved to a given day.
pub trait DateView {
    /// Re-render for `date`.  Must render an empty state when the schedule
    /// has no data for it.
    fn set_date(&mut self, date: NaiveDate);
}

/// Registration slot of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewKind {
    Timeline,
    Clock,
    Calendar,
}

/// Order in which registered views are notified.
pub const FANOUT_ORDER: [ViewKind; 3] = [ViewKind::Timeline, ViewKind::Clock, ViewKind::Calendar];

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewKind::Timeline => "timeline",
            ViewKind::Clock => "clock",
            ViewKind::Calendar => "calendar",
        })
    }
}

type ViewHandle = Weak<RefCell<dyn DateView>>;

/// Owner of the selected day.
pub struct DaySelector {
    selected: Cell<NaiveDate>,
    views: RefCell<BTreeMap<ViewKind, ViewHandle>>,
    /// Views that were busy when a day went out.
    deferred: RefCell<BTreeSet<ViewKind>>,
}

impl DaySelector {
    pub fn new(initial: NaiveDate) -> Self {
        Self {
            selected: Cell::new(initial),
            views: RefCell::new(BTreeMap::new()),
            deferred: RefCell::new(BTreeSet::new()),
        }
    }

    /// Selector starting on the local calendar day.
    pub fn starting_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected.get()
    }

    /// Register `view` under `kind`, replacing any previous one.
    ///
    /// The selector only keeps a weak reference; the caller owns the view.
    pub fn register<V>(&self, kind: ViewKind, view: &Rc<RefCell<V>>)
    where
        V: DateView + 'static,
    {
        let view: Rc<RefCell<dyn DateView>> = view.clone();
        self.views.borrow_mut().insert(kind, Rc::downgrade(&view));
        log::debug!("Registered {} view", kind);
    }

    pub fn unregister(&self, kind: ViewKind) {
        self.views.borrow_mut().remove(&kind);
    }

    /// Whether a live view is registered under `kind`.
    pub fn is_registered(&self, kind: ViewKind) -> bool {
        self.views
            .borrow()
            .get(&kind)
            .is_some_and(|v| v.strong_count() > 0)
    }

    /// Select a day and notify every registered view.
    ///
    /// `None` and the already-selected day are no-ops.  Returns whether a
    /// fan-out took place.
    pub fn set_selected_date(&self, date: impl Into<Option<NaiveDate>>) -> bool {
        let Some(date) = date.into() else {
            return false;
        };
        if date == self.selected.get() {
            log::debug!("Day {} already selected, skipping sync", date);
            return false;
        }
        self.selected.set(date);
        self.fan_out(date);
        true
    }

    /// Select the calendar day of a timestamp; the time part is ignored.
    pub fn select_instant(&self, instant: NaiveDateTime) -> bool {
        self.set_selected_date(instant.date())
    }

    /// Notify every view of the current day without the equality check,
    /// after data they render from has changed.
    pub fn refresh(&self) {
        self.fan_out(self.selected.get());
    }

    fn fan_out(&self, date: NaiveDate) {
        let views: Vec<(ViewKind, ViewHandle)> = {
            let map = self.views.borrow();
            FANOUT_ORDER
                .iter()
                .filter_map(|kind| map.get(kind).map(|v| (*kind, v.clone())))
                .collect()
        };

        log::debug!("Syncing {} view(s) to {}", views.len(), date);
        for (kind, handle) in views {
            if self.selected.get() != date {
                log::debug!("Sync to {} superseded before {} view", date, kind);
                break;
            }
            let Some(view) = handle.upgrade() else {
                log::warn!("{} view no longer available for sync", kind);
                continue;
            };
            let Ok(mut view) = view.try_borrow_mut() else {
                log::warn!("{} view busy, deferring sync to {}", kind, date);
                self.deferred.borrow_mut().insert(kind);
                continue;
            };
            view.set_date(date);
        }

        self.deliver_deferred();
    }

    /// Send the current day to deferred views that are free again.  Views
    /// still borrowed stay deferred for an outer fan-out to retry.
    fn deliver_deferred(&self) {
        loop {
            let kinds = std::mem::take(&mut *self.deferred.borrow_mut());
            if kinds.is_empty() {
                return;
            }

            let mut delivered = false;
            for kind in kinds {
                let handle = self.views.borrow().get(&kind).cloned();
                let Some(view) = handle.and_then(|h| h.upgrade()) else {
                    continue;
                };
                let Ok(mut view) = view.try_borrow_mut() else {
                    self.deferred.borrow_mut().insert(kind);
                    continue;
                };
                let date = self.selected.get();
                log::debug!("Delivering deferred sync to {} view for {}", kind, date);
                view.set_date(date);
                delivered = true;
            }

            if !delivered {
                return;
            }
        }
    }
}

impl fmt::Debug for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<ViewKind> = self.views.borrow().keys().copied().collect();
        f.debug_struct("DaySelector")
            .field("selected", &self.selected.get())
            .field("views", &kinds)
            .finish()
    }
}
