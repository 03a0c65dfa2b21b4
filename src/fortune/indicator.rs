use super::geometry::{Point, Rect};
use palette::Srgba;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[strum(serialize = "top-left", serialize = "TopLeft")]
    TopLeft,
    #[strum(serialize = "top-center", serialize = "TopCenter", serialize = "top")]
    TopCenter,
    #[strum(serialize = "top-right", serialize = "TopRight")]
    TopRight,
    #[strum(serialize = "center-left", serialize = "CenterLeft", serialize = "left")]
    CenterLeft,
    #[strum(serialize = "center", serialize = "Center")]
    Center,
    #[strum(serialize = "center-right", serialize = "CenterRight", serialize = "right")]
    CenterRight,
    #[strum(serialize = "bottom-left", serialize = "BottomLeft")]
    BottomLeft,
    #[strum(serialize = "bottom-center", serialize = "BottomCenter", serialize = "bottom")]
    BottomCenter,
    #[strum(serialize = "bottom-right", serialize = "BottomRight")]
    BottomRight,
}

impl Anchor {
    /// Relative position in `[-1, 1]` on both axes.
    pub fn alignment(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (-1.0, -1.0),
            Self::TopCenter => (0.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::CenterLeft => (-1.0, 0.0),
            Self::Center => (0.0, 0.0),
            Self::CenterRight => (1.0, 0.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomCenter => (0.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    pub fn resolve(self, bounds: Rect) -> Point {
        let (ax, ay) = self.alignment();
        let c = bounds.center();
        Point::new(c.x + ax * bounds.width / 2.0, c.y + ay * bounds.height / 2.0)
    }

    /// Direction an indicator at this anchor points, towards the center.
    pub fn inward_angle(self) -> f64 {
        let (ax, ay) = self.alignment();
        if ax == 0.0 && ay == 0.0 {
            PI / 2.0
        } else {
            (0.0 - ay).atan2(0.0 - ax)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorShape {
    Triangle {
        color: Option<Srgba<f64>>,
        width: f64,
        height: f64,
    },
    /// Outlines one segment; sized from the layout, not from the shape.
    Rectangle {
        border: Option<Srgba<f64>>,
        border_width: f64,
    },
}

impl IndicatorShape {
    pub fn triangle() -> Self {
        Self::Triangle {
            color: None,
            width: 24.0,
            height: 20.0,
        }
    }

    pub fn rectangle() -> Self {
        Self::Rectangle {
            border: None,
            border_width: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub anchor: Anchor,
    pub shape: IndicatorShape,
}

impl Indicator {
    pub fn new(anchor: Anchor, shape: IndicatorShape) -> Self {
        Self { anchor, shape }
    }

    pub fn wheel_defaults() -> Vec<Indicator> {
        vec![Indicator::new(Anchor::TopCenter, IndicatorShape::triangle())]
    }

    pub fn bar_defaults() -> Vec<Indicator> {
        vec![
            Indicator::new(Anchor::Center, IndicatorShape::rectangle()),
            Indicator::new(Anchor::TopCenter, IndicatorShape::triangle()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_parsing() {
        let cases = vec![
            ("top-center", Anchor::TopCenter),
            ("TopCenter", Anchor::TopCenter),
            ("TOP", Anchor::TopCenter),
            ("bottom-right", Anchor::BottomRight),
            ("center", Anchor::Center),
        ];
        for (s, expected) in cases {
            assert_eq!(s.parse::<Anchor>().unwrap(), expected);
        }
    }

    #[test]
    fn test_anchor_points() {
        let bounds = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(Anchor::TopCenter.resolve(bounds), Point::new(60.0, 20.0));
        assert_eq!(Anchor::Center.resolve(bounds), Point::new(60.0, 45.0));
        assert_eq!(Anchor::BottomRight.resolve(bounds), Point::new(110.0, 70.0));
    }

    #[test]
    fn test_top_points_down() {
        assert!((Anchor::TopCenter.inward_angle() - PI / 2.0).abs() < 1e-12);
        assert!((Anchor::CenterRight.inward_angle() - PI).abs() < 1e-12);
    }
}
