use super::{FULL_TURN, SLICE_START_OFFSET};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of `self` seen from `center`, in screen space (y grows downwards).
    pub fn angle_from(self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Largest square centered inside this rect.
    pub fn centered_square(&self) -> Rect {
        let side = self.width.min(self.height);
        let c = self.center();
        Rect::new(c.x - side / 2.0, c.y - side / 2.0, side, side)
    }
}

/// Wraps an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(FULL_TURN)
}

/// Shortest signed difference `a - b`, wrapped into `(-π, π]`.
pub fn angle_delta(a: f64, b: f64) -> f64 {
    let d = (a - b + PI).rem_euclid(FULL_TURN) - PI;
    if d == -PI { PI } else { d }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelTransform {
    /// Screen angle where the slice starts.
    pub start_angle: f64,
    pub sweep: f64,
}

impl WheelTransform {
    pub fn center_angle(&self) -> f64 {
        self.start_angle + self.sweep / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarTransform {
    /// Offset of the segment relative to the selected segment's rest position.
    pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Wheel(WheelTransform),
    Bar(BarTransform),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub item_count: usize,
    pub selected: usize,
    pub rotation_count: u32,
}

impl WheelGeometry {
    pub fn new(item_count: usize, selected: usize, rotation_count: u32) -> Self {
        Self {
            item_count,
            selected,
            rotation_count,
        }
    }

    pub fn slice_angle(&self) -> f64 {
        FULL_TURN / self.item_count.max(1) as f64
    }

    /// Static rotation that brings the selected slice under the top anchor.
    pub fn alignment_angle(&self) -> f64 {
        if self.item_count <= 1 {
            return 0.0;
        }
        -FULL_TURN * self.selected as f64 / self.item_count as f64
    }

    pub fn spin_angle(&self, progress: f64) -> f64 {
        FULL_TURN * self.rotation_count as f64 * progress.clamp(0.0, 1.0)
    }

    /// Net rotation of the whole assembly.
    pub fn rotation(&self, progress: f64, pan: f64) -> f64 {
        if self.item_count <= 1 {
            return 0.0;
        }
        self.alignment_angle() + self.spin_angle(progress) + pan
    }

    pub fn item_transform(&self, index: usize, progress: f64, pan: f64) -> WheelTransform {
        let slice = self.slice_angle();
        if self.item_count <= 1 {
            return WheelTransform {
                start_angle: SLICE_START_OFFSET - slice / 2.0,
                sweep: slice,
            };
        }
        WheelTransform {
            start_angle: SLICE_START_OFFSET - slice / 2.0
                + index as f64 * slice
                + self.rotation(progress, pan),
            sweep: slice,
        }
    }

    /// Index of the slice covering screen angle `angle` for an assembly
    /// rotated by `rotation`.
    pub fn item_at_angle(&self, angle: f64, rotation: f64) -> usize {
        if self.item_count <= 1 {
            return 0;
        }
        let relative = angle - SLICE_START_OFFSET - rotation;
        let slot = (relative / self.slice_angle()).round() as i64;
        slot.rem_euclid(self.item_count as i64) as usize
    }

    /// Slice currently under the top anchor.
    pub fn focused_item(&self, rotation: f64) -> usize {
        self.item_at_angle(SLICE_START_OFFSET, rotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub item_count: usize,
    pub selected: usize,
    pub rotation_count: u32,
    pub item_width: f64,
}

impl BarGeometry {
    pub fn new(item_count: usize, selected: usize, rotation_count: u32, item_width: f64) -> Self {
        Self {
            item_count,
            selected,
            rotation_count,
            item_width,
        }
    }

    /// Width of one full pass through all items.
    pub fn rotation_width(&self) -> f64 {
        self.item_width * self.item_count as f64
    }

    /// Progress splits into `rotation_count` equal segments, each one a full pass.
    pub fn rotation_progress(&self, progress: f64) -> f64 {
        if self.rotation_count == 0 {
            return 0.0;
        }
        (progress.clamp(0.0, 1.0) / (1.0 / self.rotation_count as f64)).fract()
    }

    pub fn animation_value(&self, progress: f64) -> f64 {
        self.rotation_progress(progress) * self.rotation_width()
    }

    /// Wraps a user offset to one pass of the strip.
    pub fn wrap_offset(&self, offset: f64) -> f64 {
        let width = self.rotation_width();
        if width > 0.0 { offset.rem_euclid(width) } else { 0.0 }
    }

    pub fn item_transform(&self, index: usize, progress: f64, user_offset: f64) -> BarTransform {
        if self.item_count <= 1 {
            return BarTransform { x: 0.0 };
        }
        let n = self.item_count as i64;
        let position = (index as i64 - self.selected as i64).rem_euclid(n) as f64;
        let animation_value = self.animation_value(progress);

        let mut x = self.item_width * position - animation_value - user_offset;
        if self.item_width * (position + 1.0) < animation_value {
            x += self.rotation_width();
        }
        BarTransform { x }
    }

    /// Segment closest to the anchor cell, where the selected segment rests.
    pub fn focused_item(&self, progress: f64, user_offset: f64) -> usize {
        if self.item_count <= 1 {
            return 0;
        }
        let width = self.rotation_width();
        (0..self.item_count)
            .min_by(|&a, &b| {
                let da = self.item_transform(a, progress, user_offset).x.rem_euclid(width);
                let db = self.item_transform(b, progress, user_offset).x.rem_euclid(width);
                wrapped_distance(da, width).total_cmp(&wrapped_distance(db, width))
            })
            .unwrap_or(self.selected)
    }
}

fn wrapped_distance(x: f64, width: f64) -> f64 {
    x.min(width - x).abs()
}

/// Stateless entry point over both presentations.
pub fn item_transform(
    presentation: Presentation,
    index: usize,
    item_count: usize,
    selected: usize,
    progress: f64,
    rotation_count: u32,
    pan_offset: f64,
) -> Transform {
    match presentation {
        Presentation::Wheel => Transform::Wheel(
            WheelGeometry::new(item_count, selected, rotation_count)
                .item_transform(index, progress, pan_offset),
        ),
        Presentation::Bar { item_width } => Transform::Bar(
            BarGeometry::new(item_count, selected, rotation_count, item_width)
                .item_transform(index, progress, pan_offset),
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation {
    Wheel,
    Bar { item_width: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn same_angle(a: f64, b: f64) -> bool {
        angle_delta(a, b).abs() < 1e-7
    }

    #[test]
    fn test_selected_slice_rests_at_top() {
        for n in 2..=12 {
            for selected in 0..n {
                for r in [0, 1, 2, 7, 100] {
                    let g = WheelGeometry::new(n, selected, r);
                    let t = g.item_transform(selected, 1.0, 0.0);
                    assert!(
                        same_angle(t.center_angle(), SLICE_START_OFFSET),
                        "n={n} selected={selected} r={r}"
                    );
                    assert_eq!(g.focused_item(g.rotation(1.0, 0.0)), selected);
                }
            }
        }
    }

    #[test]
    fn test_extra_turns_invisible_at_rest() {
        for r in [1, 3, 100] {
            let spun = WheelGeometry::new(7, 4, r);
            let still = WheelGeometry::new(7, 4, 0);
            assert!(same_angle(spun.rotation(1.0, 0.0), still.rotation(1.0, 0.0)));
        }
    }

    #[test]
    fn test_three_item_wheel_scenario() {
        let g = WheelGeometry::new(3, 1, 2);
        let at_start = g.rotation(0.0, 0.0);
        let at_end = g.rotation(1.0, 0.0);

        assert!((at_start - (-FULL_TURN / 3.0)).abs() < EPS);
        assert!((at_end - (-FULL_TURN / 3.0 + 4.0 * PI)).abs() < EPS);
        assert!(same_angle(at_start, at_end));
    }

    #[test]
    fn test_first_slice_centered_at_top() {
        let g = WheelGeometry::new(4, 0, 0);
        let t = g.item_transform(0, 0.0, 0.0);
        assert!((t.start_angle - (-(PI / 2.0 + PI / 4.0))).abs() < EPS);
        assert!((t.center_angle() + PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_pan_adds_to_rotation() {
        let g = WheelGeometry::new(6, 2, 5);
        let base = g.rotation(0.3, 0.0);
        assert!((g.rotation(0.3, 0.25) - base - 0.25).abs() < EPS);
    }

    #[test]
    fn test_single_item_is_identity() {
        let g = WheelGeometry::new(1, 0, 10);
        assert_eq!(g.rotation(0.5, 1.0), 0.0);
        let b = BarGeometry::new(1, 0, 10, 100.0);
        assert_eq!(b.item_transform(0, 0.5, 30.0).x, 0.0);
    }

    #[test]
    fn test_item_at_angle_matches_drawn_slice() {
        let g = WheelGeometry::new(5, 3, 1);
        let rotation = g.rotation(0.37, 0.4);
        for i in 0..5 {
            let t = g.item_transform(i, 0.37, 0.4);
            assert_eq!(g.item_at_angle(t.center_angle(), rotation), i);
        }
    }

    #[test]
    fn test_five_item_bar_scenario() {
        let g = BarGeometry::new(5, 0, 1, 100.0);
        assert!((g.rotation_progress(0.5) - 0.5).abs() < EPS);
        assert!((g.animation_value(0.5) - 250.0).abs() < EPS);
        assert!((g.item_transform(0, 0.5, 0.0).x - 250.0).abs() < EPS);
        // not past the threshold, no wrap
        assert!((g.item_transform(3, 0.5, 0.0).x - 50.0).abs() < EPS);
    }

    #[test]
    fn test_bar_wrap_invariant_to_rotation_count() {
        let reference = BarGeometry::new(7, 2, 1, 80.0);
        let width = reference.rotation_width();
        for r in [0, 2, 5, 100] {
            let g = BarGeometry::new(7, 2, r, 80.0);
            for i in 0..7 {
                let a = g.item_transform(i, 1.0, 0.0).x.rem_euclid(width);
                let b = reference.item_transform(i, 1.0, 0.0).x.rem_euclid(width);
                assert!((a - b).abs() < 1e-6, "r={r} i={i}");
            }
        }
    }

    #[test]
    fn test_bar_selected_at_origin_at_rest() {
        let g = BarGeometry::new(4, 3, 3, 50.0);
        assert_eq!(g.item_transform(3, 1.0, 0.0).x, 0.0);
        assert_eq!(g.item_transform(0, 1.0, 0.0).x, 50.0);
        assert_eq!(g.focused_item(1.0, 0.0), 3);
    }

    #[test]
    fn test_zero_rotations_never_scroll() {
        let g = BarGeometry::new(4, 1, 0, 50.0);
        assert_eq!(g.animation_value(0.6), 0.0);
        let w = WheelGeometry::new(4, 1, 0);
        assert_eq!(w.rotation(0.6, 0.0), w.alignment_angle());
    }

    #[test]
    fn test_angle_delta_wraps() {
        assert!((angle_delta(0.1, FULL_TURN - 0.1) - 0.2).abs() < EPS);
        assert!((angle_delta(-PI + 0.1, PI - 0.1) - 0.2).abs() < EPS);
        assert_eq!(angle_delta(PI, 0.0), PI);
    }

    #[test]
    fn test_free_function_dispatches() {
        match item_transform(Presentation::Bar { item_width: 100.0 }, 0, 5, 0, 0.5, 1, 0.0) {
            Transform::Bar(t) => assert!((t.x - 250.0).abs() < EPS),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            item_transform(Presentation::Wheel, 0, 3, 1, 0.0, 2, 0.0),
            Transform::Wheel(_)
        ));
    }
}
