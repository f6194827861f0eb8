// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The three day views.
//!
//! Each view turns the [`DayPlan`](crate::DayPlan) of the selected day into
//! a frame and hands it to a [`RenderTarget`].  Drawing the frame is the
//! target's business.  A view built without a target logs a warning and
//! stays inert, since not every page hosts every view.
//!
//! | View | Frame |
//! |------|-------|
//! | [`TimelineView`] | [`TimelineFrame`]: vertical day bar |
//! | [`ClockView`] | [`ClockFrame`]: 24-hour dial |
//! | [`CalendarView`] | [`CalendarFrame`]: 6×7 month grid |

pub mod calendar;
pub mod clock;
pub mod timeline;

pub use calendar::{CalendarCell, CalendarFrame, CalendarView, GRID_CELLS};
pub use clock::{
    ClockFace, ClockFrame, ClockGeometry, ClockView, DialArc, DialMarker, SlotArc, SlotEntry,
};
pub use timeline::{
    PrayerBlock, SlotBar, TimelineFrame, TimelineView, EMPTY_TIMELINE_TEXT, TIMELINE_INSET_MINUTES,
};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Where a view presents its frames.
pub trait RenderTarget<F> {
    fn present(&mut self, frame: &F);
}

/// Boxed render target, as views store it.
pub type BoxedTarget<F> = Box<dyn RenderTarget<F>>;

/// A render target that keeps every frame it is given.
///
/// Clones share the same storage, so one clone can be handed to a view
/// and another kept to read the frames back.
pub struct FrameSink<F> {
    frames: Rc<RefCell<Vec<F>>>,
}

impl<F> FrameSink<F> {
    pub fn new() -> Self {
        Self {
            frames: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.frames.borrow_mut().clear();
    }
}

impl<F: Clone> FrameSink<F> {
    pub fn last(&self) -> Option<F> {
        self.frames.borrow().last().cloned()
    }

    pub fn frames(&self) -> Vec<F> {
        self.frames.borrow().clone()
    }
}

impl<F> Clone for FrameSink<F> {
    fn clone(&self) -> Self {
        Self {
            frames: Rc::clone(&self.frames),
        }
    }
}

impl<F> Default for FrameSink<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for FrameSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSink").field("frames", &self.len()).finish()
    }
}

impl<F: Clone> RenderTarget<F> for FrameSink<F> {
    fn present(&mut self, frame: &F) {
        self.frames.borrow_mut().push(frame.clone());
    }
}

/// Hand `frame` to `target`, if there is one.
pub(crate) fn present<F>(target: &mut Option<BoxedTarget<F>>, frame: &F) {
    if let Some(target) = target.as_mut() {
        target.present(frame);
    }
}

/// Log the disabled state of a view built without a target.
pub(crate) fn warn_if_detached<F>(view: &str, target: &Option<BoxedTarget<F>>) {
    if target.is_none() {
        log::warn!("No render target for the {} view, view disabled", view);
    }
}
