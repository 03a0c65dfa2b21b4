use std::f64::consts::PI;
use std::time::Duration;

pub mod animation;
pub mod geometry;
pub mod indicator;
pub mod item;
pub mod model;
pub mod physics;
pub mod style;

pub use animation::{AnimationKind, Animator, Curve, FrameClock};
pub use geometry::{BarGeometry, Point, Rect, Transform, WheelGeometry};
pub use indicator::{Anchor, Indicator, IndicatorShape};
pub use item::{FortuneItem, IconName, ItemContent, StyleOverride};
pub use model::{
    Fortune, FortuneConfig, FortuneError, FortuneEvent, Layout, PresentationKind, Selection,
};
pub use physics::{PanController, PanMode, PanPhysics};
pub use style::{Style, StyleStrategy, Theme};

pub const FULL_TURN: f64 = 2.0 * PI;
pub const SLICE_START_OFFSET: f64 = -PI / 2.0; // screen angle of the top anchor
pub const DEFAULT_ROTATION_COUNT: u32 = 100;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);
pub const DEFAULT_BAR_HEIGHT: f64 = 56.0;
pub const DEFAULT_VISIBLE_COUNT: usize = 3;
pub const WHEEL_PADDING: f64 = 24.0; // room for indicators around the rim
pub const DEFAULT_ITEM_WIDTH: f64 = 100.0;
