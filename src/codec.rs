//! Conversions between wall-clock time and display angle.
//!
//! Angles are degrees in the framebuffer convention (0 along +x, growing
//! clockwise because y points down). A fixed 270 degree offset places
//! midnight at the top of the dial; it is applied symmetrically in both
//! directions, so the pair of conversions is exact up to snapping.

use crate::range::{normalize_day, TimeOfDay, SECONDS_PER_DAY};

/// Rotation applied so that 0:00 sits at twelve o'clock.
pub const ANGLE_OFFSET: f64 = 270.0;

/// Reduce an angle into [0, 360).
pub fn normalize_360(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Shortest signed arc from `from` to `to`, in (-180, 180].
pub fn signed_arc_to(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Scale a duration in seconds to the angular span it covers on the dial.
pub fn seconds_to_degrees(seconds: f64) -> f64 {
    seconds / SECONDS_PER_DAY * 360.0
}

/// Display angle for a time of day. Not pre-normalized; callers reduce
/// mod 360 as needed.
pub fn time_to_angle(t: TimeOfDay) -> f64 {
    t / SECONDS_PER_DAY * 360.0 + ANGLE_OFFSET
}

/// Time of day for a display angle, normalized into [0, 86400).
pub fn angle_to_time(angle: f64) -> TimeOfDay {
    normalize_day((angle - ANGLE_OFFSET) / 360.0 * SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::round_to_quantum;

    const EPS: f64 = 1e-9;

    #[test]
    fn midnight_sits_at_the_top() {
        assert!((time_to_angle(0.0) - 270.0).abs() < EPS);
        // 06:00 is a quarter turn later.
        assert!((normalize_360(time_to_angle(21_600.0)) - 0.0).abs() < EPS);
        // 12:00 is opposite midnight.
        assert!((normalize_360(time_to_angle(43_200.0)) - 90.0).abs() < EPS);
    }

    #[test]
    fn round_trip_on_quantum_multiples() {
        let quantum = 300.0;
        let mut t = 0.0;
        while t < SECONDS_PER_DAY {
            let back = round_to_quantum(angle_to_time(time_to_angle(t)), quantum);
            assert!(
                (normalize_day(back) - t).abs() < 1e-6,
                "round trip failed at t={t}"
            );
            t += quantum * 7.0;
        }
    }

    #[test]
    fn conversions_are_periodic() {
        for &t in &[0.0, 3600.0, 43_200.0, 82_800.0] {
            let a = normalize_360(time_to_angle(t));
            let b = normalize_360(time_to_angle(t + SECONDS_PER_DAY));
            assert!((a - b).abs() < EPS);
        }
        for &a in &[0.0, 45.0, 270.0, 359.0] {
            let t1 = angle_to_time(a);
            let t2 = angle_to_time(a + 360.0);
            assert!((t1 - t2).abs() < 1e-6);
        }
    }

    #[test]
    fn angle_to_time_normalizes_into_one_day() {
        for &a in &[-720.0, -90.0, 0.0, 270.0, 630.0, 1000.0] {
            let t = angle_to_time(a);
            assert!((0.0..SECONDS_PER_DAY).contains(&t), "t={t} out of day");
        }
    }

    #[test]
    fn signed_arc_takes_the_short_way() {
        assert!((signed_arc_to(10.0, 30.0) - 20.0).abs() < EPS);
        assert!((signed_arc_to(30.0, 10.0) + 20.0).abs() < EPS);
        assert!((signed_arc_to(350.0, 10.0) - 20.0).abs() < EPS);
        assert!((signed_arc_to(10.0, 350.0) + 20.0).abs() < EPS);
        assert!((signed_arc_to(0.0, 180.0) - 180.0).abs() < EPS);
    }

    #[test]
    fn duration_scale_matches_the_dial() {
        assert!((seconds_to_degrees(3600.0) - 15.0).abs() < EPS);
        assert!((seconds_to_degrees(SECONDS_PER_DAY) - 360.0).abs() < EPS);
        // The two-hour wrap case: 23:00 to 01:00 spans 30 degrees.
        assert!((seconds_to_degrees(7200.0) - 30.0).abs() < EPS);
    }
}
