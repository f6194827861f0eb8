// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Free-time slot derivation.
//!
//! A slot is the window between two prayers that are adjacent in
//! [`LOGICAL_ORDER`], shrunk by the effective after-padding of the first and
//! the effective before-padding of the second:
//!
//! ```text
//! P[i] ──+after──▶ [ slot ] ◀──−before── P[i+1]
//! ```
//!
//! The maghreb→icha pair is split into `[maghreb+after, 23:59]` and
//! `[00:00, icha−before]` when icha's clock value is smaller than
//! maghreb's (icha after midnight).  The optional icha→fajr pair follows
//! the same rule.  Windows narrower than [`MIN_SLOT_MINUTES`] are dropped.
//!
//! This is the single implementation every view consumes; cosmetic
//! adjustments belong to the renderers.

use crate::clock_time::{ClockTime, PaddingSide, MINUTES_PER_DAY};
use crate::padding::PaddingConfig;
use crate::prayer::{Prayer, PrayerSet, LOGICAL_ORDER};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Narrowest window that is still reported as a slot.
pub const MIN_SLOT_MINUTES: i32 = 5;

/// Visual category of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SlotKind {
    Regular,
    /// Lies between fajr and sunset.
    Day,
    /// Maghreb → icha.
    Night,
    /// Icha → fajr.
    DeepNight,
}

/// Identity shared by the slots derived from the same night pair, so that
/// both halves of a split react together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SlotGroup {
    MaghrebIcha,
    IchaFajr,
}

/// Derivation switches beyond padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlotRules {
    /// Also derive the icha → fajr window.
    pub overnight: bool,
}

/// A derived free-time window.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slot {
    pub start: ClockTime,
    pub end: ClockTime,
    pub kind: SlotKind,
    pub group: Option<SlotGroup>,
    /// Source prayer pair; `None` for slots taken verbatim from a payload.
    pub between: Option<(Prayer, Prayer)>,
    /// Duration shown to the user, from the real (unclamped) padding.
    /// For a split night pair this is the combined length of both halves.
    pub display_minutes: i32,
}

impl Slot {
    /// A slot copied from precomputed bounds. Its display duration wraps
    /// past midnight when `end` precedes `start`.
    pub fn from_bounds(start: ClockTime, end: ClockTime) -> Self {
        let mut display = end - start;
        if display < 0 {
            display += MINUTES_PER_DAY;
        }
        Self {
            start,
            end,
            kind: SlotKind::Regular,
            group: None,
            between: None,
            display_minutes: display,
        }
    }

    /// Semantic width in minutes.
    #[inline]
    pub fn width(&self) -> i32 {
        self.end - self.start
    }

    /// `"2h 05min"`, `"3h"` or `"45min"`.
    pub fn duration_text(&self) -> String {
        format_duration(self.display_minutes)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.start, self.end, self.duration_text())
    }
}

/// Human-readable duration.
///
/// ```
/// use prayerplan::format_duration;
/// assert_eq!(format_duration(125), "2h 05min");
/// assert_eq!(format_duration(180), "3h");
/// assert_eq!(format_duration(45), "45min");
/// ```
pub fn format_duration(minutes: i32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {:02}min", h, m),
    }
}

/// Derive the slots of one day.
///
/// Pairs with a missing or malformed time are skipped; windows that
/// collapse or fall under [`MIN_SLOT_MINUTES`] are dropped.  The result
/// follows the logical prayer order.
pub fn derive_slots(prayers: &PrayerSet, padding: &PaddingConfig, rules: &SlotRules) -> Vec<Slot> {
    let mut slots = Vec::new();

    for pair in LOGICAL_ORDER.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let (Some(from_time), Some(to_time)) = (prayers.time(from), prayers.time(to)) else {
            continue;
        };

        if (from, to) == (Prayer::Maghreb, Prayer::Icha) {
            let pair = PairBounds::new(from, to, from_time, to_time, padding);
            push_night_pair(&mut slots, pair, SlotKind::Night, SlotGroup::MaghrebIcha);
            continue;
        }

        let kind = if is_day_pair(prayers, from_time, to_time) {
            SlotKind::Day
        } else {
            SlotKind::Regular
        };
        let pair = PairBounds::new(from, to, from_time, to_time, padding);
        push_single(&mut slots, &pair, kind, None);
    }

    if rules.overnight {
        if let (Some(icha), Some(fajr)) = (prayers.time(Prayer::Icha), prayers.time(Prayer::Fajr)) {
            let pair = PairBounds::new(Prayer::Icha, Prayer::Fajr, icha, fajr, padding);
            push_night_pair(&mut slots, pair, SlotKind::DeepNight, SlotGroup::IchaFajr);
        }
    }

    slots
}

/// Padded bounds of one prayer pair.
struct PairBounds {
    between: (Prayer, Prayer),
    from_time: ClockTime,
    to_time: ClockTime,
    /// Effective bounds, used for the slot itself.
    start: ClockTime,
    end: ClockTime,
    /// Real bounds, used for the displayed duration.
    real_start: ClockTime,
    real_end: ClockTime,
}

impl PairBounds {
    fn new(
        from: Prayer,
        to: Prayer,
        from_time: ClockTime,
        to_time: ClockTime,
        padding: &PaddingConfig,
    ) -> Self {
        let after = padding.for_prayer(from);
        let before = padding.for_prayer(to);
        Self {
            between: (from, to),
            from_time,
            to_time,
            start: from_time.padded(after.effective_after(), PaddingSide::After),
            end: to_time.padded(before.effective_before(), PaddingSide::Before),
            real_start: from_time.padded(after.real_after(), PaddingSide::After),
            real_end: to_time.padded(before.real_before(), PaddingSide::Before),
        }
    }

    /// The second prayer's clock value is below the first's.
    fn crosses_midnight(&self) -> bool {
        self.to_time < self.from_time
    }
}

fn push_single(slots: &mut Vec<Slot>, pair: &PairBounds, kind: SlotKind, group: Option<SlotGroup>) {
    let display = pair.real_end - pair.real_start;
    push_checked(slots, pair.start, pair.end, kind, group, Some(pair.between), display);
}

fn push_night_pair(slots: &mut Vec<Slot>, pair: PairBounds, kind: SlotKind, group: SlotGroup) {
    if !pair.crosses_midnight() {
        push_single(slots, &pair, kind, Some(group));
        return;
    }

    let mut combined = pair.real_end - pair.real_start;
    if pair.real_end <= pair.real_start {
        combined += MINUTES_PER_DAY;
    }

    let between = Some(pair.between);
    push_checked(slots, pair.start, ClockTime::END_OF_DAY, kind, Some(group), between, combined);
    push_checked(slots, ClockTime::MIDNIGHT, pair.end, kind, Some(group), between, combined);
}

fn push_checked(
    slots: &mut Vec<Slot>,
    start: ClockTime,
    end: ClockTime,
    kind: SlotKind,
    group: Option<SlotGroup>,
    between: Option<(Prayer, Prayer)>,
    display_minutes: i32,
) {
    if end <= start || end - start < MIN_SLOT_MINUTES {
        return;
    }
    slots.push(Slot {
        start,
        end,
        kind,
        group,
        between,
        display_minutes,
    });
}

/// Whether a pair lies between fajr and sunset.  When fajr is not before
/// sunset (polar days) the window wraps.
fn is_day_pair(prayers: &PrayerSet, from: ClockTime, to: ClockTime) -> bool {
    let (Some(fajr), Some(sunset)) = (prayers.time(Prayer::Fajr), prayers.time(Prayer::Sunset)) else {
        return false;
    };
    if fajr < sunset {
        from >= fajr && to <= sunset
    } else {
        from >= fajr || to <= sunset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::PrayerPadding;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn bounds(slots: &[Slot]) -> Vec<(String, String)> {
        slots
            .iter()
            .map(|s| (s.start.to_string(), s.end.to_string()))
            .collect()
    }

    fn typical_day() -> PrayerSet {
        PrayerSet::from_pairs([
            (Prayer::Fajr, "05:30"),
            (Prayer::Dohr, "12:30"),
            (Prayer::Asr, "15:30"),
            (Prayer::Maghreb, "18:30"),
            (Prayer::Icha, "20:30"),
        ])
    }

    #[test]
    fn scenario_without_sunset() {
        let slots = derive_slots(&typical_day(), &PaddingConfig::default(), &SlotRules::default());
        assert_eq!(
            bounds(&slots),
            vec![
                ("12:50".into(), "15:30".into()),
                ("15:50".into(), "18:30".into()),
                ("18:50".into(), "20:30".into()),
            ]
        );
        assert_eq!(slots[2].kind, SlotKind::Night);
        assert_eq!(slots[2].group, Some(SlotGroup::MaghrebIcha));
        assert_eq!(slots[0].between, Some((Prayer::Dohr, Prayer::Asr)));
    }

    #[test]
    fn duration_text_uses_real_padding() {
        // Effective after-padding is 20, real is 0: shown durations are the raw gaps.
        let slots = derive_slots(&typical_day(), &PaddingConfig::default(), &SlotRules::default());
        assert_eq!(slots[0].width(), 160);
        assert_eq!(slots[0].display_minutes, 180);
        assert_eq!(slots[0].duration_text(), "3h");

        let slots = derive_slots(&typical_day(), &PaddingConfig::global(10, 25), &SlotRules::default());
        assert_eq!(bounds(&slots)[0], ("12:55".to_string(), "15:20".to_string()));
        assert_eq!(slots[0].duration_text(), "2h 25min");
    }

    #[test]
    fn sunset_pairs_are_day_slots() {
        let mut prayers = typical_day();
        prayers.insert(Prayer::Sunset, "07:00");
        let slots = derive_slots(&prayers, &PaddingConfig::default(), &SlotRules::default());
        // fajr→sunset and sunset→dohr now exist.
        assert_eq!(slots.len(), 5);
        assert_eq!(bounds(&slots)[0], ("05:50".to_string(), "07:00".to_string()));
        assert_eq!(slots[0].kind, SlotKind::Day);
        assert_eq!(slots[1].kind, SlotKind::Regular);
    }

    #[test]
    fn missing_or_malformed_time_skips_pair() {
        let mut prayers = typical_day();
        prayers.insert(Prayer::Asr, "15h30");
        let slots = derive_slots(&prayers, &PaddingConfig::default(), &SlotRules::default());
        // dohr→asr and asr→maghreb both vanish.
        assert_eq!(bounds(&slots), vec![("18:50".to_string(), "20:30".to_string())]);
    }

    #[test]
    fn narrow_windows_are_dropped() {
        let prayers = PrayerSet::from_pairs([(Prayer::Dohr, "12:30"), (Prayer::Asr, "12:54")]);
        // 12:50 → 12:54 is four minutes.
        assert!(derive_slots(&prayers, &PaddingConfig::default(), &SlotRules::default()).is_empty());

        let prayers = PrayerSet::from_pairs([(Prayer::Dohr, "12:30"), (Prayer::Asr, "12:55")]);
        let slots = derive_slots(&prayers, &PaddingConfig::default(), &SlotRules::default());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].width(), MIN_SLOT_MINUTES);
    }

    #[test]
    fn collapsed_windows_are_dropped() {
        let prayers = PrayerSet::from_pairs([(Prayer::Dohr, "12:30"), (Prayer::Asr, "12:40")]);
        assert!(derive_slots(&prayers, &PaddingConfig::global(30, 30), &SlotRules::default()).is_empty());
    }

    #[test]
    fn maghreb_icha_split_after_midnight() {
        let prayers = PrayerSet::from_pairs([(Prayer::Maghreb, "22:30"), (Prayer::Icha, "00:40")]);
        let slots = derive_slots(&prayers, &PaddingConfig::global(10, 20), &SlotRules::default());
        assert_eq!(
            bounds(&slots),
            vec![
                ("22:50".to_string(), "23:59".to_string()),
                ("00:00".to_string(), "00:30".to_string()),
            ]
        );
        // Real after = 20, real before = 10: 22:50 → 00:30 next day.
        assert!(slots.iter().all(|s| s.display_minutes == 100));
        assert!(slots.iter().all(|s| s.group == Some(SlotGroup::MaghrebIcha)));
    }

    #[test]
    fn maghreb_icha_boundary_uses_unwrapped_padding() {
        // 23:50 + 20 is 24:10, so the pre-midnight half collapses.
        let prayers = PrayerSet::from_pairs([(Prayer::Maghreb, "23:50"), (Prayer::Icha, "00:20")]);
        let slots = derive_slots(&prayers, &PaddingConfig::global(10, 20), &SlotRules::default());
        assert_eq!(bounds(&slots), vec![("00:00".to_string(), "00:10".to_string())]);
        assert_eq!(slots[0].width(), 10);
    }

    #[test]
    fn overnight_slot_is_opt_in() {
        let prayers = typical_day();
        let rules = SlotRules { overnight: true };
        let slots = derive_slots(&prayers, &PaddingConfig::default(), &rules);
        // icha 20:30 → fajr 05:30 wraps, so it is split.
        let deep: Vec<&Slot> = slots.iter().filter(|s| s.kind == SlotKind::DeepNight).collect();
        assert_eq!(deep.len(), 2);
        assert_eq!(deep[0].start, t("20:50"));
        assert_eq!(deep[0].end, ClockTime::END_OF_DAY);
        assert_eq!(deep[1].start, ClockTime::MIDNIGHT);
        assert_eq!(deep[1].end, t("05:30"));
        assert_eq!(deep[0].display_minutes, 9 * 60);
    }

    #[test]
    fn per_prayer_padding_applies_to_its_side() {
        let padding = PaddingConfig::default()
            .with_prayer(Prayer::Dohr, PrayerPadding::new(0, 45))
            .with_prayer(Prayer::Asr, PrayerPadding::new(15, 0));
        let slots = derive_slots(&typical_day(), &padding, &SlotRules::default());
        assert_eq!(bounds(&slots)[0], ("13:15".to_string(), "15:15".to_string()));
        // asr's own after-padding (0) is floored to 20.
        assert_eq!(bounds(&slots)[1], ("15:50".to_string(), "18:30".to_string()));
    }

    #[test]
    fn from_bounds_wraps_display() {
        let slot = Slot::from_bounds(t("22:00"), t("01:00"));
        assert_eq!(slot.display_minutes, 180);
        assert_eq!(slot.to_string(), "22:00 - 01:00 (3h)");
    }

    #[test]
    fn extreme_padding_does_not_overflow() {
        let prayers = typical_day();
        assert!(derive_slots(&prayers, &PaddingConfig::global(0, i32::MAX), &SlotRules::default()).is_empty());
        assert!(derive_slots(&prayers, &PaddingConfig::global(i32::MAX, 0), &SlotRules::default()).is_empty());

        // Negative extremes fall back to the floors for the bounds; only the
        // displayed duration sees the raw values.
        let padding = PaddingConfig::global(i32::MIN, i32::MIN);
        let slots = derive_slots(&prayers, &padding, &SlotRules { overnight: true });
        assert_eq!(bounds(&slots)[0], ("12:50".to_string(), "15:30".to_string()));
        assert_eq!(slots[0].display_minutes, i32::MAX);
        assert_eq!(slots.iter().filter(|s| s.kind == SlotKind::DeepNight).count(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn slot_serde_round_trip() {
        let prayers = PrayerSet::from_pairs([(Prayer::Maghreb, "23:00"), (Prayer::Icha, "00:50")]);
        let slots = derive_slots(&prayers, &PaddingConfig::default(), &SlotRules::default());
        assert_eq!(slots.len(), 2);

        let json = serde_json::to_value(&slots[1]).unwrap();
        assert_eq!(json["start"], "00:00");
        assert_eq!(json["kind"], "night");
        assert_eq!(json["group"], "maghreb-icha");
        assert_eq!(json["between"], serde_json::json!(["maghreb", "icha"]));

        let back: Slot = serde_json::from_value(json).unwrap();
        assert_eq!(back, slots[1]);
    }

    #[test]
    fn slots_follow_non_decreasing_start() {
        let slots = derive_slots(&typical_day(), &PaddingConfig::global(5, 30), &SlotRules::default());
        assert!(slots.windows(2).all(|w| w[0].start <= w[1].start));
        assert!(slots.iter().all(|s| s.width() >= MIN_SLOT_MINUTES));
    }
}
