//! Drag handling for the wheel and the bar.
//!
//! A gesture is `begin` / `update`* / `end`. Releasing produces a
//! [`DecayTrajectory`] that carries the offset back to rest; the trajectory
//! is consumed one frame at a time and a new `begin` drops it on the spot.

use super::FULL_TURN;
use super::geometry::{Point, angle_delta};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const FRAME_STEP: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanMode {
    #[default]
    Idle,
    Dragging,
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanState {
    /// Accumulated offset: radians for the wheel, pixels for the bar.
    pub offset: f64,
    /// Offset units per second, set on release.
    pub velocity: f64,
    pub mode: PanMode,
    pub last_point: Option<Point>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn project(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalPan {
    pub axis: Axis,
    pub settle: Duration,
    /// Spring rate, per second.
    pub stiffness: f64,
    /// Release speed (px/s) that counts as a fling.
    pub fling_velocity: f64,
}

impl Default for DirectionalPan {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            settle: Duration::from_millis(400),
            stiffness: 18.0,
            fling_velocity: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularPan {
    pub center: Point,
    pub settle: Duration,
    pub stiffness: f64,
    /// Friction coefficient used to project how far a fling would coast.
    pub friction: f64,
    /// Rest on the nearest whole revolution instead of unwinding every turn.
    pub snap: bool,
    /// Release speed (rad/s) that counts as a fling.
    pub fling_velocity: f64,
}

impl Default for CircularPan {
    fn default() -> Self {
        Self {
            center: Point::default(),
            settle: Duration::from_millis(800),
            stiffness: 10.0,
            friction: 2.5,
            snap: true,
            fling_velocity: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanPhysics {
    #[default]
    None,
    Directional(DirectionalPan),
    Circular(CircularPan),
}

impl PanPhysics {
    pub fn begin(&self, state: &mut PanState, point: Point) {
        if matches!(self, Self::None) {
            return;
        }
        state.mode = PanMode::Dragging;
        state.velocity = 0.0;
        state.last_point = Some(point);
    }

    /// Folds the pointer move into the offset and returns the delta applied.
    pub fn update(&self, state: &mut PanState, point: Point) -> f64 {
        if state.mode != PanMode::Dragging {
            return 0.0;
        }
        let Some(last) = state.last_point.replace(point) else {
            return 0.0;
        };

        let delta = match self {
            Self::None => 0.0,
            Self::Directional(pan) => pan.axis.project(point) - pan.axis.project(last),
            Self::Circular(pan) => {
                angle_delta(point.angle_from(pan.center), last.angle_from(pan.center))
            }
        };
        state.offset += delta;
        delta
    }

    /// Ends the drag. `velocity` is the pointer velocity in px/s.
    pub fn end(&self, state: &mut PanState, velocity: Point) -> Option<DecayTrajectory> {
        if state.mode != PanMode::Dragging {
            return None;
        }
        let release = self.release_velocity(state, velocity);
        state.velocity = release;
        state.last_point = None;

        let trajectory = match self {
            Self::None => None,
            Self::Directional(pan) => Some(DecayTrajectory::spring(
                state.offset,
                release,
                0.0,
                pan.stiffness,
                pan.settle,
            )),
            Self::Circular(pan) => {
                let coast = state.offset + release / pan.friction;
                let target = if pan.snap {
                    (coast / FULL_TURN).round() * FULL_TURN
                } else {
                    0.0
                };
                Some(DecayTrajectory::spring(
                    state.offset,
                    release,
                    target,
                    pan.stiffness,
                    pan.settle,
                ))
            }
        };

        state.mode = if trajectory.is_some() {
            PanMode::Settling
        } else {
            PanMode::Idle
        };
        trajectory
    }

    fn release_velocity(&self, state: &PanState, velocity: Point) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Directional(pan) => pan.axis.project(velocity),
            Self::Circular(pan) => {
                let Some(at) = state.last_point else {
                    return 0.0;
                };
                let (rx, ry) = (at.x - pan.center.x, at.y - pan.center.y);
                let r2 = rx * rx + ry * ry;
                if r2 <= f64::EPSILON {
                    0.0
                } else {
                    (rx * velocity.y - ry * velocity.x) / r2
                }
            }
        }
    }

    pub fn fling_velocity(&self) -> f64 {
        match self {
            Self::None => f64::INFINITY,
            Self::Directional(pan) => pan.fling_velocity,
            Self::Circular(pan) => pan.fling_velocity,
        }
    }
}

/// Critically damped return to `target`, sampled once per frame.
///
/// Finite and single-use: once exhausted it yields nothing again, and it
/// cannot be cloned to replay.
#[derive(Debug)]
pub struct DecayTrajectory {
    displacement: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    elapsed: Duration,
    duration: Duration,
    done: bool,
}

impl DecayTrajectory {
    pub fn spring(
        from: f64,
        velocity: f64,
        target: f64,
        stiffness: f64,
        duration: Duration,
    ) -> Self {
        Self {
            displacement: from - target,
            velocity,
            target,
            stiffness,
            elapsed: Duration::ZERO,
            duration,
            done: false,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn value_at(&self, t: f64) -> f64 {
        let w = self.stiffness;
        let x0 = self.displacement;
        self.target + (x0 + (self.velocity + w * x0) * t) * (-w * t).exp()
    }
}

impl Iterator for DecayTrajectory {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }
        self.elapsed += FRAME_STEP;
        if self.elapsed >= self.duration {
            self.done = true;
            return Some(self.target);
        }
        Some(self.value_at(self.elapsed.as_secs_f64()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    /// Offset units per second at release.
    pub velocity: f64,
    pub fling: bool,
}

/// Owns the pan state and the active trajectory for one component.
#[derive(Debug, Default)]
pub struct PanController {
    physics: PanPhysics,
    state: PanState,
    trajectory: Option<DecayTrajectory>,
}

impl PanController {
    pub fn new(physics: PanPhysics) -> Self {
        Self {
            physics,
            state: PanState::default(),
            trajectory: None,
        }
    }

    pub fn physics(&self) -> &PanPhysics {
        &self.physics
    }

    pub fn set_physics(&mut self, physics: PanPhysics) {
        self.physics = physics;
        self.reset();
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    pub fn is_active(&self) -> bool {
        self.state.mode != PanMode::Idle
    }

    pub fn set_center(&mut self, center: Point) {
        if let PanPhysics::Circular(pan) = &mut self.physics {
            pan.center = center;
        }
    }

    pub fn reset(&mut self) {
        self.state = PanState::default();
        self.trajectory = None;
    }

    pub fn begin(&mut self, point: Point) {
        if self.trajectory.take().is_some() {
            log::debug!("Pan trajectory cancelled by new gesture");
        }
        self.physics.begin(&mut self.state, point);
    }

    pub fn update(&mut self, point: Point) -> f64 {
        if self.state.mode != PanMode::Dragging {
            log::debug!("Ignoring pan update without an active gesture");
            return 0.0;
        }
        self.physics.update(&mut self.state, point)
    }

    pub fn end(&mut self, velocity: Point) -> Option<Release> {
        if self.state.mode != PanMode::Dragging {
            log::debug!("Ignoring pan end without an active gesture");
            return None;
        }
        let trajectory = self.physics.end(&mut self.state, velocity);
        let release = Release {
            velocity: self.state.velocity,
            fling: self.state.velocity.abs() > self.physics.fling_velocity(),
        };
        self.trajectory = trajectory;
        Some(release)
    }

    /// Applies the next trajectory sample. Returns `true` while settling.
    pub fn tick(&mut self) -> bool {
        let Some(trajectory) = self.trajectory.as_mut() else {
            return false;
        };
        match trajectory.next() {
            Some(value) => {
                self.state.offset = value;
                true
            }
            None => {
                // every target is a whole number of turns or zero
                self.trajectory = None;
                self.state = PanState::default();
                false
            }
        }
    }
}
