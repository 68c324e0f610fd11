//! Gesture interpretation for the two-handle dial.
//!
//! The controller owns no angles of its own: `start_angle`/`end_angle` are
//! views computed from the bound [`TimeRange`] through the codec, so a host
//! write to the shared cell is picked up on the next read. Writes snap to
//! the time quantum and run the span constraint against the opposite
//! handle.

use std::ops::Range;

use thiserror::Error;

use crate::codec::{
    angle_to_time, normalize_360, seconds_to_degrees, signed_arc_to, time_to_angle,
};
use crate::range::{normalize_day, round_to_quantum, RangeHandle, TimeRange, SECONDS_PER_DAY};

/// Pointer position relative to the dial center, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(self, other: Vec2) -> f64 {
        Vec2::new(self.x - other.x, self.y - other.y).length()
    }

    /// Polar angle in degrees, normalized into [0, 360).
    pub fn angle_deg(self) -> f64 {
        normalize_360(self.y.atan2(self.x).to_degrees())
    }
}

/// Dial geometry for one layout pass, supplied by the rendering side.
#[derive(Debug, Clone, Copy)]
pub struct DialLayout {
    pub center_x: f64,
    pub center_y: f64,
    /// Radius of the track the knobs ride on.
    pub radius: f64,
    /// Hit radius of each knob disk.
    pub knob_radius: f64,
}

impl DialLayout {
    /// Window coordinates to the dial-centered space.
    pub fn centered(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(x - self.center_x, y - self.center_y)
    }

    /// Center of a knob sitting at `angle` degrees on the track.
    pub fn knob_center(&self, angle: f64) -> Vec2 {
        let rad = angle.to_radians();
        Vec2::new(self.radius * rad.cos(), self.radius * rad.sin())
    }
}

/// What a gesture drives, fixed at press time for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Rotate the whole selection, span unchanged.
    Rotate,
    /// The start knob follows the pointer.
    DragStart,
    /// The end knob follows the pointer.
    DragEnd,
}

/// Per-gesture state: angle snapshots from press time plus the rotation
/// accumulator. Cleared on release.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    mode: DragMode,
    initial_start_angle: f64,
    initial_end_angle: f64,
    /// Pointer angle of the previous sample, for incremental deltas.
    last_pointer_angle: f64,
    /// Total signed rotation since press.
    drag_amount: f64,
    active: bool,
}

/// Which handle drove the change currently being validated.
#[derive(Debug, Clone, Copy)]
enum Handle {
    Start,
    End,
}

/// Rejected configuration at construction time.
#[derive(Debug, Error)]
pub enum DialError {
    #[error("allowed duration range is empty: {lower}..{upper}")]
    EmptyDurationRange { lower: f64, upper: f64 },
    #[error("duration bound {0} outside 0..=86400 seconds")]
    DurationOutOfBounds(f64),
    #[error("snap quantum must be positive, got {0}")]
    NonPositiveQuantum(f64),
}

/// Interprets pointer samples into committed range updates.
pub struct RangeGestureController {
    value: RangeHandle,
    minimum_difference: f64,
    maximum_difference: f64,
    quantum: f64,
    session: Option<DragSession>,
    detent: Option<Box<dyn FnMut()>>,
}

impl RangeGestureController {
    /// Creates a controller over `value`. `allowed_duration` bounds the
    /// selectable span in seconds and is converted once to degrees.
    pub fn new(
        value: RangeHandle,
        allowed_duration: Range<f64>,
        quantum: f64,
    ) -> Result<Self, DialError> {
        if !(quantum > 0.0) {
            return Err(DialError::NonPositiveQuantum(quantum));
        }
        for bound in [allowed_duration.start, allowed_duration.end] {
            if !(0.0..=SECONDS_PER_DAY).contains(&bound) {
                return Err(DialError::DurationOutOfBounds(bound));
            }
        }
        if allowed_duration.start >= allowed_duration.end {
            return Err(DialError::EmptyDurationRange {
                lower: allowed_duration.start,
                upper: allowed_duration.end,
            });
        }
        Ok(Self {
            value,
            minimum_difference: seconds_to_degrees(allowed_duration.start),
            maximum_difference: seconds_to_degrees(allowed_duration.end),
            quantum,
            session: None,
            detent: None,
        })
    }

    /// Install the detent callback, fired once per committed change that
    /// moves either bound by at least one quantum.
    pub fn set_detent_handler(&mut self, handler: impl FnMut() + 'static) {
        self.detent = Some(Box::new(handler));
    }

    pub fn value(&self) -> TimeRange {
        self.value.get()
    }

    /// The mode of the gesture in flight, if any.
    pub fn drag_mode(&self) -> Option<DragMode> {
        self.session.map(|s| s.mode)
    }

    /// Display angle of the start handle, derived from the bound value.
    pub fn start_angle(&self) -> f64 {
        time_to_angle(self.value.get().start)
    }

    /// Display angle of the end handle, derived from the bound value.
    pub fn end_angle(&self) -> f64 {
        time_to_angle(self.value.get().end)
    }

    /// Move the start handle. The written time snaps to the quantum; the
    /// end handle is corrected if the span leaves the allowed window.
    pub fn set_start_angle(&mut self, angle: f64) {
        self.write_start(angle);
        self.enforce_constraints(Handle::Start);
    }

    /// Move the end handle. The written time snaps to the quantum; the
    /// start handle is corrected if the span leaves the allowed window.
    pub fn set_end_angle(&mut self, angle: f64) {
        self.write_end(angle);
        self.enforce_constraints(Handle::End);
    }

    /// Re-run constraint enforcement after the host wrote the bound value
    /// directly. Angles are always re-derived from the cell, so only the
    /// span check is needed; both driving directions are applied, the
    /// second a no-op once the first restores the window.
    pub fn revalidate(&mut self) {
        self.enforce_constraints(Handle::Start);
        self.enforce_constraints(Handle::End);
    }

    /// A press arms a gesture: the mode comes from where the press landed
    /// and both angles are snapshotted for rotation.
    pub fn press_began(&mut self, pos: Vec2, layout: &DialLayout) {
        let mode = self.hit_test(pos, layout);
        self.session = Some(DragSession {
            mode,
            initial_start_angle: self.start_angle(),
            initial_end_angle: self.end_angle(),
            last_pointer_angle: pos.angle_deg(),
            drag_amount: 0.0,
            active: false,
        });
        log::debug!("gesture armed: {mode:?}");
    }

    /// Feed one movement sample. The first sample activates the gesture;
    /// every sample is applied fully, constraint pass included, before the
    /// caller hands over the next one.
    pub fn drag_moved(&mut self, pos: Vec2) {
        let Some(mut session) = self.session else {
            return;
        };
        if !session.active {
            session.active = true;
            log::debug!("gesture active: {:?}", session.mode);
        }
        match session.mode {
            DragMode::Rotate => {
                let pointer = pos.angle_deg();
                session.drag_amount += signed_arc_to(session.last_pointer_angle, pointer);
                session.last_pointer_angle = pointer;
                log::trace!("rotate by {:.2} deg total", session.drag_amount);
                self.set_start_angle(normalize_360(
                    session.initial_start_angle + session.drag_amount,
                ));
                self.set_end_angle(normalize_360(
                    session.initial_end_angle + session.drag_amount,
                ));
            }
            DragMode::DragStart => {
                log::trace!("start knob to {:.2} deg", pos.angle_deg());
                self.set_start_angle(pos.angle_deg());
            }
            DragMode::DragEnd => {
                log::trace!("end knob to {:.2} deg", pos.angle_deg());
                self.set_end_angle(pos.angle_deg());
            }
        }
        self.session = Some(session);
    }

    /// Release clears the session; the committed value stays.
    pub fn drag_ended(&mut self) {
        if self.session.take().is_some() {
            log::debug!("gesture ended at {:?}", self.value.get());
        }
    }

    /// The end knob is drawn above the start knob, so it wins when the two
    /// disks overlap. Anything outside both disks rotates the whole range.
    fn hit_test(&self, pos: Vec2, layout: &DialLayout) -> DragMode {
        let end_center = layout.knob_center(normalize_360(self.end_angle()));
        if pos.distance_to(end_center) <= layout.knob_radius {
            return DragMode::DragEnd;
        }
        let start_center = layout.knob_center(normalize_360(self.start_angle()));
        if pos.distance_to(start_center) <= layout.knob_radius {
            return DragMode::DragStart;
        }
        DragMode::Rotate
    }

    fn write_start(&mut self, angle: f64) {
        let mut range = self.value.get();
        range.start = normalize_day(round_to_quantum(angle_to_time(angle), self.quantum));
        self.commit(range);
    }

    fn write_end(&mut self, angle: f64) {
        let mut range = self.value.get();
        range.end = normalize_day(round_to_quantum(angle_to_time(angle), self.quantum));
        self.commit(range);
    }

    fn commit(&mut self, next: TimeRange) {
        let prev = self.value.get();
        self.value.set(next);
        let crossed = (next.start - prev.start).abs() >= self.quantum
            || (next.end - prev.end).abs() >= self.quantum;
        if crossed {
            if let Some(detent) = self.detent.as_mut() {
                detent();
            }
        }
    }

    /// Single-pass span correction: the driving handle keeps its value,
    /// the passive one is pushed back inside the allowed window.
    fn enforce_constraints(&mut self, driving: Handle) {
        let diff = normalize_360(self.end_angle() - self.start_angle());
        match driving {
            Handle::Start => {
                if diff < self.minimum_difference {
                    self.write_end(normalize_360(self.start_angle() + self.minimum_difference));
                } else if diff > self.maximum_difference {
                    self.write_end(normalize_360(self.start_angle() + self.maximum_difference));
                }
            }
            Handle::End => {
                if diff < self.minimum_difference {
                    self.write_start(normalize_360(self.end_angle() - self.minimum_difference));
                } else if diff > self.maximum_difference {
                    self.write_start(normalize_360(self.end_angle() - self.maximum_difference));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPS: f64 = 1e-6;

    fn layout() -> DialLayout {
        DialLayout {
            center_x: 0.0,
            center_y: 0.0,
            radius: 100.0,
            knob_radius: 22.0,
        }
    }

    fn on_track(angle_deg: f64) -> Vec2 {
        let rad = angle_deg.to_radians();
        Vec2::new(100.0 * rad.cos(), 100.0 * rad.sin())
    }

    fn controller(
        start: f64,
        end: f64,
        allowed: Range<f64>,
    ) -> (RangeGestureController, RangeHandle) {
        let handle = RangeHandle::new(TimeRange::new(start, end));
        let ctrl = RangeGestureController::new(handle.clone(), allowed, 300.0).unwrap();
        (ctrl, handle)
    }

    fn display_start(ctrl: &RangeGestureController) -> f64 {
        normalize_360(ctrl.start_angle())
    }

    fn display_end(ctrl: &RangeGestureController) -> f64 {
        normalize_360(ctrl.end_angle())
    }

    fn span(ctrl: &RangeGestureController) -> f64 {
        normalize_360(ctrl.end_angle() - ctrl.start_angle())
    }

    #[test]
    fn construction_rejects_empty_duration_range() {
        let handle = RangeHandle::new(TimeRange::new(0.0, 3600.0));
        assert!(matches!(
            RangeGestureController::new(handle.clone(), 5000.0..5000.0, 300.0),
            Err(DialError::EmptyDurationRange { .. })
        ));
        assert!(matches!(
            RangeGestureController::new(handle, 6000.0..3000.0, 300.0),
            Err(DialError::EmptyDurationRange { .. })
        ));
    }

    #[test]
    fn construction_rejects_out_of_day_bounds() {
        let handle = RangeHandle::new(TimeRange::new(0.0, 3600.0));
        assert!(matches!(
            RangeGestureController::new(handle.clone(), -1.0..3600.0, 300.0),
            Err(DialError::DurationOutOfBounds(_))
        ));
        assert!(matches!(
            RangeGestureController::new(handle, 3600.0..90_000.0, 300.0),
            Err(DialError::DurationOutOfBounds(_))
        ));
    }

    #[test]
    fn construction_rejects_non_positive_quantum() {
        let handle = RangeHandle::new(TimeRange::new(0.0, 3600.0));
        assert!(matches!(
            RangeGestureController::new(handle.clone(), 3600.0..7200.0, 0.0),
            Err(DialError::NonPositiveQuantum(_))
        ));
        assert!(matches!(
            RangeGestureController::new(handle, 3600.0..7200.0, -5.0),
            Err(DialError::NonPositiveQuantum(_))
        ));
    }

    #[test]
    fn wraparound_range_has_small_forward_difference() {
        // 23:00 to 01:00: two hours, 30 degrees, not negative and not the
        // long way round.
        let (ctrl, _) = controller(82_800.0, 3600.0, 3600.0..82_800.0);
        assert!((span(&ctrl) - 30.0).abs() < EPS);
    }

    #[test]
    fn driving_start_corrects_end_not_start() {
        // Display angles 0 and 10 with a 15 degree minimum.
        let (mut ctrl, handle) = controller(21_600.0, 24_000.0, 3600.0..82_800.0);
        assert!((span(&ctrl) - 10.0).abs() < EPS);

        ctrl.set_start_angle(0.0);

        assert!((display_start(&ctrl) - 0.0).abs() < EPS, "start must hold");
        assert!((display_end(&ctrl) - 15.0).abs() < EPS, "end must move");
        assert_eq!(handle.get().start, 21_600.0);
        assert_eq!(handle.get().end, 25_200.0);
    }

    #[test]
    fn driving_end_corrects_start_not_end() {
        let (mut ctrl, _) = controller(21_600.0, 24_000.0, 3600.0..82_800.0);

        ctrl.set_end_angle(10.0);

        assert!((display_end(&ctrl) - 10.0).abs() < EPS, "end must hold");
        // Start pulled back to keep the 15 degree minimum.
        assert!((display_start(&ctrl) - 355.0).abs() < EPS);
    }

    #[test]
    fn rotation_preserves_span() {
        // Display angles 30 and 90, span 60 degrees.
        let (mut ctrl, _) = controller(28_800.0, 43_200.0, 3600.0..82_800.0);
        let lay = layout();

        // Press well away from both knobs, then rotate 45 degrees in three
        // uneven samples.
        ctrl.press_began(on_track(200.0), &lay);
        assert_eq!(ctrl.drag_mode(), Some(DragMode::Rotate));
        for pointer in [212.0, 230.0, 245.0] {
            ctrl.drag_moved(on_track(pointer));
        }
        ctrl.drag_ended();

        assert!((display_start(&ctrl) - 75.0).abs() < EPS);
        assert!((display_end(&ctrl) - 135.0).abs() < EPS);
        assert!((span(&ctrl) - 60.0).abs() < EPS);
    }

    #[test]
    fn rotation_is_continuous_across_the_zero_boundary() {
        let (mut ctrl, _) = controller(28_800.0, 43_200.0, 3600.0..82_800.0);
        let lay = layout();

        // The pointer walks 350 -> 355 -> 2 -> 10, a net +20 degrees.
        ctrl.press_began(on_track(350.0), &lay);
        for pointer in [355.0, 2.0, 10.0] {
            ctrl.drag_moved(on_track(pointer));
        }
        ctrl.drag_ended();

        assert!((display_start(&ctrl) - 50.0).abs() < EPS);
        assert!((display_end(&ctrl) - 110.0).abs() < EPS);
        assert!((span(&ctrl) - 60.0).abs() < EPS);
    }

    #[test]
    fn knob_drag_follows_pointer_absolutely() {
        let (mut ctrl, _) = controller(28_800.0, 43_200.0, 3600.0..82_800.0);
        let lay = layout();

        // Press on the start knob (display angle 30), drag it to 20.
        ctrl.press_began(on_track(30.0), &lay);
        assert_eq!(ctrl.drag_mode(), Some(DragMode::DragStart));
        ctrl.drag_moved(on_track(20.0));
        ctrl.drag_ended();

        assert!((display_start(&ctrl) - 20.0).abs() < EPS);
        assert!((display_end(&ctrl) - 90.0).abs() < EPS);
    }

    #[test]
    fn constraint_invariant_holds_through_mixed_gestures() {
        // Display angles 0 and 60; span window 15..90 degrees, both
        // quantum aligned.
        let (mut ctrl, _) = controller(21_600.0, 36_000.0, 3600.0..21_600.0);
        let lay = layout();
        let minimum = seconds_to_degrees(3600.0);
        let maximum = seconds_to_degrees(21_600.0);

        let check = |ctrl: &RangeGestureController| {
            let diff = span(ctrl);
            assert!(
                diff >= minimum - EPS && diff <= maximum + EPS,
                "span {diff} escaped [{minimum}, {maximum}]"
            );
        };

        ctrl.press_began(on_track(60.0), &lay);
        assert_eq!(ctrl.drag_mode(), Some(DragMode::DragEnd));
        for pointer in [70.0, 100.0, 160.0, 250.0, 340.0, 30.0, 5.0] {
            ctrl.drag_moved(on_track(pointer));
            check(&ctrl);
        }
        ctrl.drag_ended();

        // Rotate from an interior point, far from both knobs.
        ctrl.press_began(Vec2::new(-20.0, -25.0), &lay);
        assert_eq!(ctrl.drag_mode(), Some(DragMode::Rotate));
        for pointer in [Vec2::new(-25.0, -20.0), Vec2::new(-30.0, -5.0)] {
            ctrl.drag_moved(pointer);
            check(&ctrl);
        }
        ctrl.drag_ended();
    }

    #[test]
    fn mode_is_fixed_for_the_whole_gesture() {
        let (mut ctrl, _) = controller(28_800.0, 43_200.0, 3600.0..82_800.0);
        let lay = layout();

        ctrl.press_began(on_track(30.0), &lay);
        assert_eq!(ctrl.drag_mode(), Some(DragMode::DragStart));
        // Sweep across the end knob's position; the gesture stays on the
        // start knob.
        for pointer in [60.0, 90.0, 120.0] {
            ctrl.drag_moved(on_track(pointer));
            assert_eq!(ctrl.drag_mode(), Some(DragMode::DragStart));
        }
        ctrl.drag_ended();
        assert_eq!(ctrl.drag_mode(), None);
    }

    #[test]
    fn overlapping_knobs_resolve_to_the_end_knob() {
        // Display angles 0 and 15: knob centers 26 units apart on the
        // track, so a midpoint press lands inside both disks.
        let (mut ctrl, _) = controller(21_600.0, 25_200.0, 3600.0..82_800.0);
        let lay = layout();

        ctrl.press_began(on_track(7.5), &lay);
        assert_eq!(ctrl.drag_mode(), Some(DragMode::DragEnd));
        ctrl.drag_ended();

        // Dead center is on neither knob.
        ctrl.press_began(Vec2::new(0.0, 0.0), &lay);
        assert_eq!(ctrl.drag_mode(), Some(DragMode::Rotate));
        ctrl.drag_ended();
    }

    #[test]
    fn sub_quantum_moves_fire_no_detent() {
        let (mut ctrl, _) = controller(21_600.0, 43_200.0, 3600.0..82_800.0);
        let lay = layout();
        let hits = Rc::new(Cell::new(0usize));
        let counter = hits.clone();
        ctrl.set_detent_handler(move || counter.set(counter.get() + 1));

        // Start knob sits at display angle 0. Wiggle it within the same
        // 5-minute cell.
        ctrl.press_began(on_track(0.0), &lay);
        ctrl.drag_moved(on_track(0.3));
        ctrl.drag_moved(on_track(0.5));
        assert_eq!(hits.get(), 0);

        // One step over the cell midpoint commits the next quantum.
        ctrl.drag_moved(on_track(0.7));
        assert_eq!(hits.get(), 1);

        // Staying in the new cell is silent again.
        ctrl.drag_moved(on_track(0.8));
        assert_eq!(hits.get(), 1);
        ctrl.drag_ended();
    }

    #[test]
    fn host_write_is_visible_without_any_controller_call() {
        let (ctrl, handle) = controller(21_600.0, 43_200.0, 3600.0..82_800.0);
        handle.set(TimeRange::new(28_800.0, 36_000.0));
        // Angles are views over the cell, never cached.
        assert!((display_start(&ctrl) - 30.0).abs() < EPS);
        assert!((display_end(&ctrl) - 60.0).abs() < EPS);
    }

    #[test]
    fn revalidate_restores_the_window_after_a_host_write() {
        let (mut ctrl, handle) = controller(21_600.0, 43_200.0, 3600.0..82_800.0);
        // Ten minutes is under the one-hour minimum.
        handle.set(TimeRange::new(21_600.0, 22_200.0));
        ctrl.revalidate();
        assert!((span(&ctrl) - 15.0).abs() < EPS);
        assert_eq!(handle.get().start, 21_600.0);
        assert_eq!(handle.get().end, 25_200.0);
    }

    #[test]
    fn samples_without_a_press_are_ignored() {
        let (mut ctrl, handle) = controller(21_600.0, 43_200.0, 3600.0..82_800.0);
        let before = handle.get();
        ctrl.drag_moved(on_track(123.0));
        assert_eq!(handle.get(), before);

        let lay = layout();
        ctrl.press_began(on_track(0.0), &lay);
        ctrl.drag_ended();
        ctrl.drag_moved(on_track(123.0));
        assert_eq!(handle.get(), before);
    }
}
