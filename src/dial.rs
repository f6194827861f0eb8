// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! 24-hour dial geometry.
//!
//! A day maps linearly onto one turn: `00:00` is 0°, `06:00` is 90°,
//! angles increase clockwise.  Screen placement rotates by
//! [`DIAL_ROTATION`] so that midnight sits at the top of the dial.

use crate::clock_time::ClockTime;
use qtty::Degrees;

/// Fixed rotation from dial angle to screen angle (0° at 12 o'clock).
pub const DIAL_ROTATION: Degrees = Degrees::new(-90.0);

/// A point in screen space (y grows downwards, as in SVG).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialPoint {
    pub x: f64,
    pub y: f64,
}

/// Dial angle of a minute-of-day offset, `minutes * 360 / 1440`.
///
/// The map is not wrapped: `1440` is 360°, negative offsets are negative.
#[inline]
pub fn minute_of_day_to_angle(minutes: i32) -> Degrees {
    Degrees::new(minutes as f64 * 360.0 / 1440.0)
}

/// Dial angle of a [`ClockTime`].
#[inline]
pub fn clock_angle(time: ClockTime) -> Degrees {
    minute_of_day_to_angle(time.minutes())
}

/// Screen position of `angle` on a circle of `radius` around `center`.
pub fn dial_point(center: DialPoint, radius: f64, angle: Degrees) -> DialPoint {
    let screen = (angle + DIAL_ROTATION).value().to_radians();
    DialPoint {
        x: center.x + radius * screen.cos(),
        y: center.y + radius * screen.sin(),
    }
}

/// Angular sweep from `start` to `end`, clockwise, in `[0°, 360°)`.
pub fn sweep(start: ClockTime, end: ClockTime) -> Degrees {
    let delta = (clock_angle(end) - clock_angle(start)).value();
    Degrees::new(delta.rem_euclid(360.0))
}
