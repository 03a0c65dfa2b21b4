use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::future::Future;
use std::str::FromStr;
use std::time::{Duration, Instant};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

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
pub enum AnimationKind {
    /// One eased pass through the items.
    Roll,
    /// `rotation_count` full turns layered on top of the settle.
    #[default]
    Spin,
}

impl AnimationKind {
    pub fn default_curve(self) -> Curve {
        match self {
            Self::Roll => Curve::ROLL,
            Self::Spin => Curve::SPIN,
        }
    }

    /// Number of full passes the geometry should layer over the settle.
    pub fn effective_rotations(self, rotation_count: u32) -> u32 {
        match self {
            Self::Roll => rotation_count.min(1),
            Self::Spin => rotation_count,
        }
    }
}

/// Cubic bezier easing through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    const PRECISION: f64 = 1e-7;

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn evaluate(a: f64, b: f64, m: f64) -> f64 {
        3.0 * a * (1.0 - m) * (1.0 - m) * m + 3.0 * b * (1.0 - m) * m * m + m * m * m
    }

    pub fn transform(&self, t: f64) -> f64 {
        // bisect on x, then read y at the same parameter
        let (mut start, mut end) = (0.0_f64, 1.0_f64);
        for _ in 0..64 {
            let mid = (start + end) / 2.0;
            let x = Self::evaluate(self.x1, self.x2, mid);
            if (t - x).abs() < Self::PRECISION {
                return Self::evaluate(self.y1, self.y2, mid);
            }
            if x < t {
                start = mid;
            } else {
                end = mid;
            }
        }
        Self::evaluate(self.y1, self.y2, (start + end) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    EaseOutCubic,
    Cubic(CubicBezier),
}

impl Curve {
    /// Fast start, long deceleration into the target.
    pub const SPIN: Curve = Curve::Cubic(CubicBezier::new(0.0, 1.0, 0.0, 1.0));
    /// Gentle start and stop, biased towards the end.
    pub const ROLL: Curve = Curve::Cubic(CubicBezier::new(0.65, 0.0, 0.35, 1.0));

    pub fn transform(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let eased = match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::Cubic(bezier) => bezier.transform(t),
        };
        eased.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown curve '{0}' (expected linear, ease-out, spin, roll or cubic(x1, y1, x2, y2))")]
pub struct ParseCurveError(String);

impl FromStr for Curve {
    type Err = ParseCurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "linear" => return Ok(Self::Linear),
            "ease-out" | "easeout" => return Ok(Self::EaseOutCubic),
            "spin" => return Ok(Self::SPIN),
            "roll" => return Ok(Self::ROLL),
            _ => {}
        }

        let args = lower
            .strip_prefix("cubic(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParseCurveError(s.to_string()))?;
        let values = args
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseCurveError(s.to_string()))?;

        match values.as_slice() {
            &[x1, y1, x2, y2] if (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2) => {
                Ok(Self::Cubic(CubicBezier::new(x1, y1, x2, y2)))
            }
            _ => Err(ParseCurveError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Running { started_at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub progress: f64,
    pub finished: bool,
}

/// Source of frame timestamps for [`Animator::drive`].
pub trait FrameClock {
    fn now(&self) -> Instant;

    /// Resolves on the next presented frame.
    fn next_frame(&mut self) -> impl Future<Output = Instant>;
}

/// Emits normalized progress over a fixed duration. Only one run is active
/// at a time; a `start` while running is dropped.
#[derive(Debug, Clone)]
pub struct Animator {
    duration: Duration,
    curve: Curve,
    state: AnimationState,
    progress: f64,
}

impl Animator {
    pub fn new(duration: Duration, curve: Curve) -> Self {
        Self {
            duration,
            curve,
            state: AnimationState::Idle,
            progress: 0.0,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Running { .. })
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn set_curve(&mut self, curve: Curve) {
        self.curve = curve;
    }

    /// Returns `false` without touching any state when a run is in flight.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.progress = 0.0;
        self.state = AnimationState::Running { started_at: now };
        true
    }

    pub fn tick(&mut self, now: Instant) -> Option<Frame> {
        let AnimationState::Running { started_at } = self.state else {
            return None;
        };

        let elapsed = now.saturating_duration_since(started_at);
        if elapsed >= self.duration {
            self.progress = 1.0;
            return Some(Frame {
                progress: 1.0,
                finished: true,
            });
        }

        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.progress = self.progress.max(self.curve.transform(t));
        Some(Frame {
            progress: self.progress,
            finished: false,
        })
    }

    /// Returns to idle once the final frame has been observed.
    pub fn reset(&mut self) {
        self.state = AnimationState::Idle;
        self.progress = 0.0;
    }

    /// Runs one animation to completion on `clock`, handing every frame to
    /// `on_frame`. Resolves to `false` if a run was already in flight.
    pub async fn drive<C: FrameClock>(
        &mut self,
        clock: &mut C,
        mut on_frame: impl FnMut(Frame),
    ) -> bool {
        if !self.start(clock.now()) {
            return false;
        }
        loop {
            let now = clock.next_frame().await;
            if let Some(frame) = self.tick(now) {
                on_frame(frame);
                if frame.finished {
                    self.reset();
                    return true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ManualClock {
        now: Instant,
        step: Duration,
    }

    impl FrameClock for ManualClock {
        fn now(&self) -> Instant {
            self.now
        }

        fn next_frame(&mut self) -> impl Future<Output = Instant> {
            self.now += self.step;
            let now = self.now;
            async move {
                tokio::task::yield_now().await;
                now
            }
        }
    }

    #[test]
    fn test_curves_hit_endpoints_and_increase() {
        for curve in [Curve::Linear, Curve::EaseOutCubic, Curve::SPIN, Curve::ROLL] {
            assert_eq!(curve.transform(0.0), 0.0);
            assert_eq!(curve.transform(1.0), 1.0);
            let mut last = 0.0;
            for i in 1..100 {
                let v = curve.transform(i as f64 / 100.0);
                assert!(v >= last - 1e-9, "{curve:?} dipped at {i}");
                last = v;
            }
        }
    }

    #[test]
    fn test_spin_curve_front_loaded() {
        assert!(Curve::SPIN.transform(0.25) > 0.5);
    }

    #[test]
    fn test_curve_parsing() {
        assert_eq!("Spin".parse::<Curve>(), Ok(Curve::SPIN));
        assert_eq!("linear".parse::<Curve>(), Ok(Curve::Linear));
        assert_eq!(
            "cubic(0.1, 0.2, 0.3, 0.4)".parse::<Curve>(),
            Ok(Curve::Cubic(CubicBezier::new(0.1, 0.2, 0.3, 0.4)))
        );
        assert!("cubic(2, 0, 0, 1)".parse::<Curve>().is_err());
        assert!("bouncy".parse::<Curve>().is_err());
    }

    #[test]
    fn test_roll_caps_rotations() {
        assert_eq!(AnimationKind::Roll.effective_rotations(100), 1);
        assert_eq!(AnimationKind::Roll.effective_rotations(0), 0);
        assert_eq!(AnimationKind::Spin.effective_rotations(100), 100);
    }

    #[test]
    fn test_progress_runs_to_one() {
        let t0 = Instant::now();
        let mut animator = Animator::new(Duration::from_millis(100), Curve::Linear);
        assert!(animator.start(t0));

        let mid = animator.tick(t0 + Duration::from_millis(50)).unwrap();
        assert!((mid.progress - 0.5).abs() < 1e-9);
        assert!(!mid.finished);

        let end = animator.tick(t0 + Duration::from_millis(150)).unwrap();
        assert_eq!(end.progress, 1.0);
        assert!(end.finished);

        animator.reset();
        assert_eq!(animator.state(), AnimationState::Idle);
        assert_eq!(animator.tick(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_start_while_running_is_dropped() {
        let t0 = Instant::now();
        let mut animator = Animator::new(Duration::from_secs(1), Curve::Linear);
        assert!(animator.start(t0));
        animator.tick(t0 + Duration::from_millis(400));

        assert!(!animator.start(t0 + Duration::from_millis(500)));
        assert_eq!(
            animator.state(),
            AnimationState::Running { started_at: t0 }
        );
        assert!((animator.progress() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_progress_never_decreases() {
        let t0 = Instant::now();
        let mut animator = Animator::new(Duration::from_secs(1), Curve::Linear);
        animator.start(t0);
        animator.tick(t0 + Duration::from_millis(600));
        // out-of-order timestamp
        let frame = animator.tick(t0 + Duration::from_millis(300)).unwrap();
        assert!((frame.progress - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_drive_completes_once() {
        let mut clock = ManualClock {
            now: Instant::now(),
            step: Duration::from_millis(16),
        };
        let mut animator = Animator::new(Duration::from_millis(160), Curve::SPIN);
        let mut frames = Vec::new();

        let ran = animator.drive(&mut clock, |f| frames.push(f)).await;

        assert!(ran);
        assert_eq!(frames.iter().filter(|f| f.finished).count(), 1);
        assert_eq!(frames.last().map(|f| f.progress), Some(1.0));
        assert!(frames.windows(2).all(|w| w[0].progress <= w[1].progress));
        assert!(!animator.is_running());
    }

    #[tokio::test]
    async fn test_drive_rejected_while_running() {
        let mut clock = ManualClock {
            now: Instant::now(),
            step: Duration::from_millis(16),
        };
        let mut animator = Animator::new(Duration::from_millis(160), Curve::Linear);
        animator.start(clock.now());
        let mut calls = 0;

        let ran = animator.drive(&mut clock, |_| calls += 1).await;

        assert!(!ran);
        assert_eq!(calls, 0);
    }
}
