// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Padding (buffer minutes) around prayers.
//!
//! Every configured padding has two readings:
//!
//! - the **real** value, exactly what the user configured (absent is `0`),
//!   used only for the duration text shown next to a slot;
//! - the **effective** value, clamped to a floor ([`MIN_PADDING_BEFORE`],
//!   [`MIN_PADDING_AFTER`]), used for every slot boundary.
//!
//! Both are computed on read from the same stored value, so changing the
//! configuration changes the next derivation and nothing cached.

use crate::prayer::Prayer;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Floor applied to the effective before-padding.
pub const MIN_PADDING_BEFORE: i32 = 0;

/// Floor applied to the effective after-padding.
pub const MIN_PADDING_AFTER: i32 = 20;

/// A before/after padding pair. `None` means "not configured".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrayerPadding {
    #[cfg_attr(feature = "serde", serde(default))]
    pub before: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub after: Option<i32>,
}

impl PrayerPadding {
    pub const fn new(before: i32, after: i32) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    /// Configured before-padding, `0` when absent.
    #[inline]
    pub fn real_before(&self) -> i32 {
        self.before.unwrap_or(0)
    }

    /// Configured after-padding, `0` when absent.
    #[inline]
    pub fn real_after(&self) -> i32 {
        self.after.unwrap_or(0)
    }

    /// Before-padding used for slot boundaries; never below [`MIN_PADDING_BEFORE`].
    #[inline]
    pub fn effective_before(&self) -> i32 {
        self.real_before().max(MIN_PADDING_BEFORE)
    }

    /// After-padding used for slot boundaries; never below [`MIN_PADDING_AFTER`].
    #[inline]
    pub fn effective_after(&self) -> i32 {
        self.real_after().max(MIN_PADDING_AFTER)
    }
}

/// Global padding plus optional per-prayer overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaddingConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub before: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub after: Option<i32>,
    /// Overrides keyed by prayer; a present override replaces the global pair.
    #[cfg_attr(feature = "serde", serde(default, with = "prayer_keys"))]
    pub prayers: BTreeMap<Prayer, PrayerPadding>,
}

impl PaddingConfig {
    /// Global padding only.
    pub const fn global(before: i32, after: i32) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
            prayers: BTreeMap::new(),
        }
    }

    /// Add or replace the override for `prayer`.
    pub fn with_prayer(mut self, prayer: Prayer, padding: PrayerPadding) -> Self {
        self.prayers.insert(prayer, padding);
        self
    }

    /// The global pair.
    pub fn global_padding(&self) -> PrayerPadding {
        PrayerPadding {
            before: self.before,
            after: self.after,
        }
    }

    /// Padding in force around `prayer`.
    pub fn for_prayer(&self, prayer: Prayer) -> PrayerPadding {
        self.prayers
            .get(&prayer)
            .copied()
            .unwrap_or_else(|| self.global_padding())
    }

    pub fn real_before(&self) -> i32 {
        self.global_padding().real_before()
    }

    pub fn real_after(&self) -> i32 {
        self.global_padding().real_after()
    }

    pub fn effective_before(&self) -> i32 {
        self.global_padding().effective_before()
    }

    pub fn effective_after(&self) -> i32 {
        self.global_padding().effective_after()
    }
}

#[cfg(feature = "serde")]
mod prayer_keys {
    use super::PrayerPadding;
    use crate::prayer::Prayer;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(map: &BTreeMap<Prayer, PrayerPadding>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let keyed: BTreeMap<&str, &PrayerPadding> = map.iter().map(|(p, v)| (p.key(), v)).collect();
        keyed.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<Prayer, PrayerPadding>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, PrayerPadding>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, padding)| {
                key.parse::<Prayer>()
                    .map(|p| (p, padding))
                    .map_err(D::Error::custom)
            })
            .collect()
    }
}
