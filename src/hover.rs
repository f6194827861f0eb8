// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Slot hover events shared between views.
//!
//! Hovering a slot in one view highlights the same slot in every other
//! view.  The event carries a [`SlotKey`]; listeners compare it with their
//! own slots through [`SlotKey::matches`], which treats both halves of a
//! split night slot as the same slot.

use crate::clock_time::ClockTime;
use crate::slots::{Slot, SlotGroup};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identity of a hovered slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub start: ClockTime,
    pub end: ClockTime,
    pub group: Option<SlotGroup>,
}

impl SlotKey {
    pub fn of(slot: &Slot) -> Self {
        Self {
            start: slot.start,
            end: slot.end,
            group: slot.group,
        }
    }

    /// Whether `slot` should react to this key.
    pub fn matches(&self, slot: &Slot) -> bool {
        match (self.group, slot.group) {
            (Some(a), Some(b)) => a == b,
            _ => self.start == slot.start && self.end == slot.end,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl From<&Slot> for SlotKey {
    fn from(slot: &Slot) -> Self {
        Self::of(slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Enter(SlotKey),
    Leave(SlotKey),
}

impl HoverEvent {
    pub fn key(&self) -> &SlotKey {
        match self {
            HoverEvent::Enter(key) | HoverEvent::Leave(key) => key,
        }
    }
}

/// Receiver of hover events.
pub trait HoverListener {
    fn on_hover(&mut self, event: &HoverEvent);
}

/// Fans hover events out to every live listener, in subscription order.
#[derive(Default)]
pub struct HoverBus {
    listeners: RefCell<Vec<Weak<RefCell<dyn HoverListener>>>>,
}

impl HoverBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&self, listener: &Rc<RefCell<L>>)
    where
        L: HoverListener + 'static,
    {
        let listener: Rc<RefCell<dyn HoverListener>> = listener.clone();
        self.listeners.borrow_mut().push(Rc::downgrade(&listener));
    }

    /// Deliver `event`; returns how many listeners received it.
    ///
    /// Dropped listeners are pruned.  A listener that is currently borrowed
    /// (it is the one publishing) does not receive its own event.
    pub fn publish(&self, event: HoverEvent) -> usize {
        let live: Vec<_> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|l| l.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        let mut delivered = 0;
        for listener in live {
            match listener.try_borrow_mut() {
                Ok(mut l) => {
                    l.on_hover(&event);
                    delivered += 1;
                }
                Err(_) => log::debug!("Hover listener busy, skipping {:?}", event),
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }
}

impl fmt::Debug for HoverBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
