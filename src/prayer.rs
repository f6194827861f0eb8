// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Prayer names and per-day prayer time sets.

use crate::clock_time::ClockTime;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of daily prayer keys.
///
/// The derive order *is* the logical order used for slot derivation, which
/// is not chronological: `Sunset` sits between `Fajr` and `Dohr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Prayer {
    Fajr,
    Sunset,
    Dohr,
    Asr,
    Maghreb,
    Icha,
}

/// Logical iteration order for slot derivation.
pub const LOGICAL_ORDER: [Prayer; 6] = [
    Prayer::Fajr,
    Prayer::Sunset,
    Prayer::Dohr,
    Prayer::Asr,
    Prayer::Maghreb,
    Prayer::Icha,
];

impl Prayer {
    /// Payload key.
    pub const fn key(self) -> &'static str {
        match self {
            Prayer::Fajr => "fajr",
            Prayer::Sunset => "sunset",
            Prayer::Dohr => "dohr",
            Prayer::Asr => "asr",
            Prayer::Maghreb => "maghreb",
            Prayer::Icha => "icha",
        }
    }

    /// Human-facing name. Sunset is shown under its liturgical name.
    pub const fn label(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunset => "Chourouk",
            Prayer::Dohr => "Dohr",
            Prayer::Asr => "Asr",
            Prayer::Maghreb => "Maghreb",
            Prayer::Icha => "Icha",
        }
    }

    /// The prayer that follows in [`LOGICAL_ORDER`], if any.
    pub fn next(self) -> Option<Prayer> {
        let idx = LOGICAL_ORDER.iter().position(|p| *p == self)?;
        LOGICAL_ORDER.get(idx + 1).copied()
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a key is not one of the six prayers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown prayer key {0:?}")]
pub struct UnknownPrayer(pub String);

impl FromStr for Prayer {
    type Err = UnknownPrayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LOGICAL_ORDER
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPrayer(s.to_string()))
    }
}

/// One day's prayer times, keyed by [`Prayer`].
///
/// Times are kept as the raw payload strings: a malformed entry is not an
/// ingestion error, it simply never takes part in a slot.  Missing keys are
/// allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrayerSet {
    times: BTreeMap<Prayer, String>,
}

impl PrayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(prayer, "HH:MM")` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Prayer, &'a str)>,
    {
        let mut set = Self::new();
        for (prayer, time) in pairs {
            set.insert(prayer, time);
        }
        set
    }

    /// Set a prayer time. Blank strings count as absent.
    pub fn insert(&mut self, prayer: Prayer, time: impl Into<String>) {
        let time = time.into();
        if time.trim().is_empty() {
            self.times.remove(&prayer);
        } else {
            self.times.insert(prayer, time);
        }
    }

    /// Raw time string for `prayer`.
    pub fn raw(&self, prayer: Prayer) -> Option<&str> {
        self.times.get(&prayer).map(String::as_str)
    }

    /// Parsed time for `prayer`; `None` if absent or malformed.
    pub fn time(&self, prayer: Prayer) -> Option<ClockTime> {
        self.raw(prayer)?.parse().ok()
    }

    pub fn contains(&self, prayer: Prayer) -> bool {
        self.times.contains_key(&prayer)
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Present prayers in logical order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, &str)> {
        self.times.iter().map(|(p, t)| (*p, t.as_str()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PrayerSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.times.len()))?;
        for (prayer, time) in &self.times {
            map.serialize_entry(prayer.key(), time)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PrayerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        let mut set = PrayerSet::new();
        for (key, time) in raw {
            match key.parse::<Prayer>() {
                Ok(prayer) => {
                    if let Some(time) = time {
                        set.insert(prayer, time);
                    }
                }
                Err(e) => log::warn!("Ignoring prayer time entry: {}", e),
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_order_matches_ord() {
        let mut sorted = LOGICAL_ORDER;
        sorted.sort();
        assert_eq!(sorted, LOGICAL_ORDER);
        assert_eq!(Prayer::Fajr.next(), Some(Prayer::Sunset));
        assert_eq!(Prayer::Icha.next(), None);
    }

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!("Maghreb".parse::<Prayer>(), Ok(Prayer::Maghreb));
        assert!("jumua".parse::<Prayer>().is_err());
    }

    #[test]
    fn unknown_key_error_message() {
        let err = "witr".parse::<Prayer>().unwrap_err();
        assert_eq!(err.to_string(), "unknown prayer key \"witr\"");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn blank_times_are_absent() {
        let set = PrayerSet::from_pairs([(Prayer::Fajr, "05:30"), (Prayer::Sunset, "  ")]);
        assert!(set.contains(Prayer::Fajr));
        assert!(!set.contains(Prayer::Sunset));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn malformed_time_is_kept_but_unparsed() {
        let set = PrayerSet::from_pairs([(Prayer::Asr, "15h30")]);
        assert_eq!(set.raw(Prayer::Asr), Some("15h30"));
        assert_eq!(set.time(Prayer::Asr), None);
    }

    #[test]
    fn iterates_in_logical_order() {
        let set = PrayerSet::from_pairs([
            (Prayer::Icha, "20:30"),
            (Prayer::Fajr, "05:30"),
            (Prayer::Dohr, "12:30"),
        ]);
        let order: Vec<Prayer> = set.iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec![Prayer::Fajr, Prayer::Dohr, Prayer::Icha]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_skipping_unknown_and_null() {
        let json = r#"{"fajr":"05:30","jumua":"13:00","sunset":null,"icha":"20:30"}"#;
        let set: PrayerSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.raw(Prayer::Icha), Some("20:30"));
    }
}
