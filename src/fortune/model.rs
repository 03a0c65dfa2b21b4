use super::animation::{AnimationKind, Animator, Curve};
use super::geometry::{BarGeometry, Point, Rect, WheelGeometry};
use super::indicator::{Indicator, IndicatorShape};
use super::item::FortuneItem;
use super::physics::{CircularPan, DirectionalPan, PanController, PanPhysics};
use super::style::{Style, StyleStrategy, Theme};
use super::{
    DEFAULT_BAR_HEIGHT, DEFAULT_DURATION, DEFAULT_ITEM_WIDTH, DEFAULT_ROTATION_COUNT,
    DEFAULT_VISIBLE_COUNT, WHEEL_PADDING,
};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FortuneError {
    #[error("No items to choose from")]
    NoItems,
    #[error("A wheel needs at least two items, got {count}")]
    TooFewItems { count: usize },
    #[error("Selected index {selected} is out of range for {count} items")]
    SelectedOutOfRange { selected: usize, count: usize },
    #[error("Item {index} has no content")]
    EmptyItem { index: usize },
    #[error("Animation duration must be positive")]
    ZeroDuration,
}

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
#[serde(rename_all = "lowercase")]
pub enum PresentationKind {
    Wheel,
    Bar,
}

impl PresentationKind {
    /// Odd item counts get the bar, even counts the wheel.
    pub fn for_item_count(count: usize) -> Self {
        if count % 2 == 1 { Self::Bar } else { Self::Wheel }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FortuneConfig {
    pub rotation_count: u32,
    pub duration: Duration,
    pub kind: AnimationKind,
    /// `None` picks the curve that goes with `kind`.
    pub curve: Option<Curve>,
    pub indicators: Vec<Indicator>,
    pub style: StyleStrategy,
    pub physics: PanPhysics,
    pub animate_first: bool,
    pub bar_height: f64,
    pub full_width: bool,
    pub visible_count: usize,
}

impl FortuneConfig {
    pub fn wheel() -> Self {
        Self {
            rotation_count: DEFAULT_ROTATION_COUNT,
            duration: DEFAULT_DURATION,
            kind: AnimationKind::Spin,
            curve: None,
            indicators: Indicator::wheel_defaults(),
            style: StyleStrategy::default(),
            physics: PanPhysics::Circular(CircularPan::default()),
            animate_first: true,
            bar_height: DEFAULT_BAR_HEIGHT,
            full_width: false,
            visible_count: DEFAULT_VISIBLE_COUNT,
        }
    }

    pub fn bar() -> Self {
        Self {
            kind: AnimationKind::Roll,
            indicators: Indicator::bar_defaults(),
            physics: PanPhysics::Directional(DirectionalPan::default()),
            ..Self::wheel()
        }
    }

    pub fn for_presentation(presentation: PresentationKind) -> Self {
        match presentation {
            PresentationKind::Wheel => Self::wheel(),
            PresentationKind::Bar => Self::bar(),
        }
    }

    pub fn curve(&self) -> Curve {
        self.curve.unwrap_or_else(|| self.kind.default_curve())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FortuneEvent {
    AnimationStarted { selected: usize },
    AnimationEnded { selected: usize },
    /// The item under the anchor changed while moving.
    FocusChanged(usize),
    /// A drag was released fast enough to count as a throw.
    Fling { velocity: f64 },
    ItemTapped(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Started,
    /// Dropped because an animation is in flight.
    Ignored,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceLayout {
    pub index: usize,
    pub start_angle: f64,
    pub sweep: f64,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    pub center: Point,
    pub radius: f64,
    pub rotation: f64,
    pub slices: Vec<SliceLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLayout {
    pub index: usize,
    pub rect: Rect,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub viewport: Rect,
    pub item_width: f64,
    pub segments: Vec<SegmentLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Wheel(WheelLayout),
    Bar(BarLayout),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedIndicator {
    pub indicator: Indicator,
    pub at: Point,
    /// Area a rectangle indicator outlines.
    pub frame: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub body: Body,
    pub indicators: Vec<PlacedIndicator>,
}

impl Layout {
    pub fn item_at(&self, point: Point) -> Option<usize> {
        match &self.body {
            Body::Wheel(wheel) => {
                let count = wheel.slices.len();
                if count == 0 || point.distance(wheel.center) > wheel.radius {
                    return None;
                }
                let geometry = WheelGeometry::new(count, 0, 0);
                Some(geometry.item_at_angle(point.angle_from(wheel.center), wheel.rotation))
            }
            Body::Bar(bar) => {
                if !bar.viewport.contains(point) {
                    return None;
                }
                bar.segments
                    .iter()
                    .find(|s| s.rect.contains(point))
                    .map(|s| s.index)
            }
        }
    }
}

/// One wheel or bar instance: items, selection, animation and drag state.
#[derive(Debug)]
pub struct Fortune {
    presentation: PresentationKind,
    items: Vec<FortuneItem>,
    selected: usize,
    config: FortuneConfig,
    animator: Animator,
    pan: PanController,
    events: VecDeque<FortuneEvent>,
    focused: usize,
    viewport: Rect,
}

impl Fortune {
    /// Picks the presentation from the item count, see
    /// [`PresentationKind::for_item_count`].
    pub fn new(items: Vec<FortuneItem>, selected: usize) -> Result<Self, FortuneError> {
        let presentation = PresentationKind::for_item_count(items.len());
        Self::build(
            presentation,
            items,
            selected,
            FortuneConfig::for_presentation(presentation),
        )
    }

    pub fn wheel(
        items: Vec<FortuneItem>,
        selected: usize,
        config: FortuneConfig,
    ) -> Result<Self, FortuneError> {
        Self::build(PresentationKind::Wheel, items, selected, config)
    }

    pub fn bar(
        items: Vec<FortuneItem>,
        selected: usize,
        config: FortuneConfig,
    ) -> Result<Self, FortuneError> {
        Self::build(PresentationKind::Bar, items, selected, config)
    }

    pub fn build(
        presentation: PresentationKind,
        items: Vec<FortuneItem>,
        selected: usize,
        config: FortuneConfig,
    ) -> Result<Self, FortuneError> {
        Self::validate(presentation, &items, selected, &config)?;

        Ok(Self {
            presentation,
            animator: Animator::new(config.duration, config.curve()),
            pan: PanController::new(config.physics),
            items,
            selected,
            config,
            events: VecDeque::new(),
            focused: selected,
            viewport: Rect::default(),
        })
    }

    fn validate(
        presentation: PresentationKind,
        items: &[FortuneItem],
        selected: usize,
        config: &FortuneConfig,
    ) -> Result<(), FortuneError> {
        let count = items.len();
        if count == 0 {
            return Err(FortuneError::NoItems);
        }
        if presentation == PresentationKind::Wheel && count <= 1 {
            return Err(FortuneError::TooFewItems { count });
        }
        if selected >= count {
            return Err(FortuneError::SelectedOutOfRange { selected, count });
        }
        if let Some(index) = items.iter().position(|item| item.content.is_empty()) {
            return Err(FortuneError::EmptyItem { index });
        }
        if config.duration.is_zero() {
            return Err(FortuneError::ZeroDuration);
        }
        Ok(())
    }

    pub fn presentation(&self) -> PresentationKind {
        self.presentation
    }

    pub fn items(&self) -> &[FortuneItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn config(&self) -> &FortuneConfig {
        &self.config
    }

    pub fn progress(&self) -> f64 {
        self.animator.progress()
    }

    pub fn pan_offset(&self) -> f64 {
        self.pan.offset()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn is_moving(&self) -> bool {
        self.is_animating() || self.pan.is_active()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = FortuneEvent> + '_ {
        self.events.drain(..)
    }

    /// First presentation: runs the settle once if `animate_first` is set.
    pub fn mount(&mut self, now: Instant) {
        if self.config.animate_first {
            self.animate(now);
        }
    }

    /// Starts a settle animation. Returns `false` if one is already running.
    pub fn animate(&mut self, now: Instant) -> bool {
        if !self.animator.start(now) {
            log::debug!("Animation already running, request dropped");
            return false;
        }
        log::info!(
            "Animating to item {} ({})",
            self.selected,
            self.items[self.selected].label()
        );
        self.events.push_back(FortuneEvent::AnimationStarted {
            selected: self.selected,
        });
        true
    }

    // NOTE: a selection made mid-animation is dropped rather than queued.
    pub fn select(&mut self, index: usize, now: Instant) -> Result<Selection, FortuneError> {
        let count = self.items.len();
        if index >= count {
            return Err(FortuneError::SelectedOutOfRange {
                selected: index,
                count,
            });
        }
        if index == self.selected {
            return Ok(Selection::Unchanged);
        }
        if self.animator.is_running() {
            log::debug!("Selection of {} dropped while animating", index);
            return Ok(Selection::Ignored);
        }

        self.selected = index;
        self.animate(now);
        Ok(Selection::Started)
    }

    /// Applies new items and config. Returns `Ok(false)` when nothing changed.
    pub fn reconfigure(
        &mut self,
        items: Vec<FortuneItem>,
        config: FortuneConfig,
    ) -> Result<bool, FortuneError> {
        if items == self.items && config == self.config {
            return Ok(false);
        }
        Self::validate(self.presentation, &items, self.selected, &config)?;

        self.animator.set_duration(config.duration);
        self.animator.set_curve(config.curve());
        if config.physics != self.config.physics {
            self.pan.set_physics(config.physics);
        }
        self.items = items;
        self.config = config;
        self.focused = self.selected;
        Ok(true)
    }

    fn effective_rotations(&self) -> u32 {
        self.config
            .kind
            .effective_rotations(self.config.rotation_count)
    }

    pub fn wheel_geometry(&self) -> WheelGeometry {
        WheelGeometry::new(self.items.len(), self.selected, self.effective_rotations())
    }

    pub fn bar_geometry(&self) -> BarGeometry {
        BarGeometry::new(
            self.items.len(),
            self.selected,
            self.effective_rotations(),
            self.item_width(),
        )
    }

    /// Net wheel rotation for the current frame.
    pub fn rotation(&self) -> f64 {
        self.wheel_geometry()
            .rotation(self.progress(), self.pan_offset())
    }

    // the strip formula subtracts its offset; negate so it follows the pointer
    fn bar_offset(&self) -> f64 {
        -self.pan_offset()
    }

    fn item_width(&self) -> f64 {
        let width = self.viewport.width / self.config.visible_count.max(1) as f64;
        if width > 0.0 { width } else { DEFAULT_ITEM_WIDTH }
    }

    /// Advances animation and drag settling. Returns whether a redraw is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut dirty = false;

        if let Some(frame) = self.animator.tick(now) {
            dirty = true;
            if frame.finished {
                log::info!("Settled on item {}", self.selected);
                self.events.push_back(FortuneEvent::AnimationEnded {
                    selected: self.selected,
                });
                self.animator.reset();
            }
        }

        let was_panning = self.pan.is_active();
        dirty |= self.pan.tick() || was_panning != self.pan.is_active();

        if dirty {
            self.update_focus();
        }
        dirty
    }

    fn update_focus(&mut self) {
        let focused = match self.presentation {
            PresentationKind::Wheel => self.wheel_geometry().focused_item(self.rotation()),
            PresentationKind::Bar => self
                .bar_geometry()
                .focused_item(self.progress(), self.bar_offset()),
        };
        if focused != self.focused {
            self.focused = focused;
            self.events.push_back(FortuneEvent::FocusChanged(focused));
        }
    }

    pub fn pan_begin(&mut self, point: Point) {
        self.pan.begin(point);
    }

    pub fn pan_update(&mut self, point: Point) -> f64 {
        let delta = self.pan.update(point);
        if delta != 0.0 {
            self.update_focus();
        }
        delta
    }

    pub fn pan_end(&mut self, velocity: Point) {
        if let Some(release) = self.pan.end(velocity)
            && release.fling
        {
            self.events.push_back(FortuneEvent::Fling {
                velocity: release.velocity,
            });
        }
    }

    /// Reports the item under `point`, if any, as tapped.
    pub fn tap(&mut self, point: Point, theme: &Theme) -> Option<usize> {
        let index = self.layout(theme).item_at(point)?;
        self.events.push_back(FortuneEvent::ItemTapped(index));
        Some(index)
    }

    /// Sizes the component to `bounds`. `screen_width` is what a full-width
    /// bar expands to.
    pub fn set_viewport(&mut self, bounds: Rect, screen_width: f64) {
        self.viewport = match self.presentation {
            PresentationKind::Wheel => bounds.centered_square(),
            PresentationKind::Bar => {
                let width = if self.config.full_width {
                    screen_width.max(bounds.width)
                } else {
                    bounds.width
                };
                let height = self.config.bar_height.min(bounds.height.max(0.0));
                let c = bounds.center();
                Rect::new(c.x - width / 2.0, c.y - height / 2.0, width, height)
            }
        };
        self.pan.set_center(self.viewport.center());
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    fn resolve_style(&self, theme: &Theme, index: usize) -> Style {
        self.config.style.resolve(
            theme,
            index,
            self.items.len(),
            self.items[index].style.as_ref(),
        )
    }

    pub fn layout(&self, theme: &Theme) -> Layout {
        let body = match self.presentation {
            PresentationKind::Wheel => Body::Wheel(self.layout_wheel(theme)),
            PresentationKind::Bar => Body::Bar(self.layout_bar(theme)),
        };
        Layout {
            indicators: self.place_indicators(&body),
            body,
        }
    }

    fn layout_wheel(&self, theme: &Theme) -> WheelLayout {
        let geometry = self.wheel_geometry();
        let (progress, pan) = (self.progress(), self.pan_offset());

        let slices = (0..self.items.len())
            .map(|index| {
                let t = geometry.item_transform(index, progress, pan);
                SliceLayout {
                    index,
                    start_angle: t.start_angle,
                    sweep: t.sweep,
                    style: self.resolve_style(theme, index),
                }
            })
            .collect();

        WheelLayout {
            center: self.viewport.center(),
            radius: (self.viewport.width / 2.0 - WHEEL_PADDING).max(0.0),
            rotation: geometry.rotation(progress, pan),
            slices,
        }
    }

    fn layout_bar(&self, theme: &Theme) -> BarLayout {
        let geometry = self.bar_geometry();
        let item_width = geometry.item_width;
        let strip = geometry.rotation_width();
        let user_offset = geometry.wrap_offset(self.bar_offset());
        let viewport = self.viewport;
        let center_x = viewport.center().x;

        // copies either side so a short strip still fills the viewport
        let reach = if self.items.len() > 1 {
            (viewport.width / 2.0 / strip).ceil() as i64 + 1
        } else {
            0
        };

        let mut segments = Vec::new();
        for index in 0..self.items.len() {
            let x = geometry
                .item_transform(index, self.progress(), user_offset)
                .x
                .rem_euclid(strip.max(f64::EPSILON));
            for copy in -reach..=reach {
                let left = center_x + x + copy as f64 * strip - item_width / 2.0;
                if left + item_width <= viewport.x || left >= viewport.right() {
                    continue;
                }
                segments.push(SegmentLayout {
                    index,
                    rect: Rect::new(left, viewport.y, item_width, viewport.height),
                    style: self.resolve_style(theme, index),
                });
            }
        }

        BarLayout {
            viewport,
            item_width,
            segments,
        }
    }

    fn place_indicators(&self, body: &Body) -> Vec<PlacedIndicator> {
        let viewport = self.viewport;
        self.config
            .indicators
            .iter()
            .map(|indicator| {
                let at = indicator.anchor.resolve(viewport);
                let frame = match (&indicator.shape, body) {
                    (IndicatorShape::Rectangle { .. }, Body::Bar(bar)) => Rect::new(
                        at.x - bar.item_width / 2.0,
                        viewport.y,
                        bar.item_width,
                        viewport.height,
                    ),
                    _ => viewport,
                };
                PlacedIndicator {
                    indicator: *indicator,
                    at,
                    frame,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fortune::FULL_TURN;
    use crate::fortune::geometry::angle_delta;
    use crate::fortune::item::ItemContent;

    fn items(n: usize) -> Vec<FortuneItem> {
        (0..n).map(|i| FortuneItem::text(format!("Item {i}"))).collect()
    }

    fn quick(mut config: FortuneConfig) -> FortuneConfig {
        config.duration = Duration::from_millis(100);
        config.animate_first = false;
        config
    }

    fn run_to_end(fortune: &mut Fortune, t0: Instant) {
        for ms in (0..=200).step_by(10) {
            fortune.tick(t0 + Duration::from_millis(ms));
        }
    }

    fn lifecycle(events: &[FortuneEvent]) -> Vec<FortuneEvent> {
        events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    FortuneEvent::AnimationStarted { .. } | FortuneEvent::AnimationEnded { .. }
                )
            })
            .cloned()
            .collect()
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            Fortune::wheel(items(1), 0, FortuneConfig::wheel()).unwrap_err(),
            FortuneError::TooFewItems { count: 1 }
        );
        assert_eq!(
            Fortune::bar(items(3), 3, FortuneConfig::bar()).unwrap_err(),
            FortuneError::SelectedOutOfRange {
                selected: 3,
                count: 3
            }
        );
        assert_eq!(
            Fortune::bar(Vec::new(), 0, FortuneConfig::bar()).unwrap_err(),
            FortuneError::NoItems
        );

        let mut with_blank = items(3);
        with_blank[1] = FortuneItem::new(ItemContent::Text(String::new()));
        assert_eq!(
            Fortune::wheel(with_blank, 0, FortuneConfig::wheel()).unwrap_err(),
            FortuneError::EmptyItem { index: 1 }
        );

        let mut config = FortuneConfig::wheel();
        config.duration = Duration::ZERO;
        assert_eq!(
            Fortune::wheel(items(2), 0, config).unwrap_err(),
            FortuneError::ZeroDuration
        );
    }

    #[test]
    fn test_single_item_bar_allowed() {
        assert!(Fortune::bar(items(1), 0, FortuneConfig::bar()).is_ok());
    }

    #[test]
    fn test_factory_picks_by_parity() {
        assert_eq!(
            Fortune::new(items(5), 0).unwrap().presentation(),
            PresentationKind::Bar
        );
        let wheel = Fortune::new(items(4), 0).unwrap();
        assert_eq!(wheel.presentation(), PresentationKind::Wheel);
        assert_eq!(wheel.config().kind, AnimationKind::Spin);
    }

    #[test]
    fn test_mount_animates_first_when_configured() {
        let t0 = Instant::now();
        let mut eager = Fortune::wheel(items(4), 2, FortuneConfig::wheel()).unwrap();
        eager.mount(t0);
        assert!(eager.is_animating());

        let mut lazy = Fortune::wheel(items(4), 2, quick(FortuneConfig::wheel())).unwrap();
        lazy.mount(t0);
        assert!(!lazy.is_animating());
        assert_eq!(lazy.drain_events().count(), 0);
    }

    #[test]
    fn test_selection_runs_one_animation() {
        let t0 = Instant::now();
        let mut fortune = Fortune::wheel(items(6), 0, quick(FortuneConfig::wheel())).unwrap();

        assert_eq!(fortune.select(4, t0), Ok(Selection::Started));
        run_to_end(&mut fortune, t0);

        let events: Vec<_> = fortune.drain_events().collect();
        assert_eq!(
            lifecycle(&events),
            vec![
                FortuneEvent::AnimationStarted { selected: 4 },
                FortuneEvent::AnimationEnded { selected: 4 },
            ]
        );
        assert!(!fortune.is_animating());
        assert_eq!(fortune.focused(), 4);
    }

    #[test]
    fn test_selection_while_animating_is_dropped() {
        let t0 = Instant::now();
        let mut fortune = Fortune::wheel(items(6), 0, quick(FortuneConfig::wheel())).unwrap();
        fortune.select(2, t0).unwrap();
        fortune.tick(t0 + Duration::from_millis(30));

        assert_eq!(
            fortune.select(5, t0 + Duration::from_millis(40)),
            Ok(Selection::Ignored)
        );
        assert_eq!(fortune.selected(), 2);

        run_to_end(&mut fortune, t0);
        let events: Vec<_> = fortune.drain_events().collect();
        assert_eq!(lifecycle(&events).len(), 2);
    }

    #[test]
    fn test_select_validates_and_skips_same_index() {
        let t0 = Instant::now();
        let mut fortune = Fortune::wheel(items(4), 1, quick(FortuneConfig::wheel())).unwrap();
        assert_eq!(fortune.select(1, t0), Ok(Selection::Unchanged));
        assert!(fortune.select(9, t0).is_err());
        assert_eq!(fortune.drain_events().count(), 0);
    }

    #[test]
    fn test_wheel_rests_on_selected() {
        let t0 = Instant::now();
        let mut fortune = Fortune::wheel(items(8), 0, quick(FortuneConfig::wheel())).unwrap();
        fortune.select(3, t0).unwrap();
        fortune.tick(t0 + Duration::from_millis(100));
        // final frame observed, driver back to idle
        assert_eq!(fortune.progress(), 0.0);
        let expected = -FULL_TURN * 3.0 / 8.0;
        assert!(angle_delta(fortune.rotation(), expected).abs() < 1e-9);
    }

    #[test]
    fn test_reconfigure_detects_changes() {
        let mut fortune = Fortune::wheel(items(4), 3, quick(FortuneConfig::wheel())).unwrap();
        let config = fortune.config().clone();
        assert_eq!(fortune.reconfigure(items(4), config.clone()), Ok(false));
        assert_eq!(
            fortune.reconfigure(items(2), config.clone()),
            Err(FortuneError::SelectedOutOfRange {
                selected: 3,
                count: 2
            })
        );
        assert_eq!(fortune.items().len(), 4);

        let mut slower = config;
        slower.duration = Duration::from_secs(2);
        assert_eq!(fortune.reconfigure(items(6), slower), Ok(true));
        assert_eq!(fortune.items().len(), 6);
    }

    #[test]
    fn test_wheel_layout_and_hit_test() {
        let mut fortune = Fortune::wheel(items(4), 0, quick(FortuneConfig::wheel())).unwrap();
        fortune.set_viewport(Rect::new(0.0, 0.0, 400.0, 300.0), 1920.0);
        let theme = Theme::default();
        let layout = fortune.layout(&theme);

        let Body::Wheel(wheel) = &layout.body else {
            panic!("expected a wheel");
        };
        assert_eq!(wheel.center, Point::new(200.0, 150.0));
        assert_eq!(wheel.radius, 150.0 - WHEEL_PADDING);
        assert_eq!(wheel.slices.len(), 4);

        // straight up from the center is item 0, to the right is item 1
        assert_eq!(layout.item_at(Point::new(200.0, 60.0)), Some(0));
        assert_eq!(layout.item_at(Point::new(290.0, 150.0)), Some(1));
        assert_eq!(layout.item_at(Point::new(399.0, 299.0)), None);

        assert_eq!(layout.indicators.len(), 1);
        assert_eq!(layout.indicators[0].at, Point::new(200.0, 0.0));
    }

    #[test]
    fn test_bar_layout_shows_window() {
        let mut fortune = Fortune::bar(items(5), 2, quick(FortuneConfig::bar())).unwrap();
        fortune.set_viewport(Rect::new(0.0, 0.0, 300.0, 100.0), 1920.0);
        let layout = fortune.layout(&Theme::default());

        let Body::Bar(bar) = &layout.body else {
            panic!("expected a bar");
        };
        assert_eq!(bar.item_width, 100.0);
        assert_eq!(bar.viewport, Rect::new(0.0, 22.0, 300.0, 56.0));

        let mut shown: Vec<(usize, f64)> =
            bar.segments.iter().map(|s| (s.index, s.rect.x)).collect();
        shown.sort_by(|a, b| a.1.total_cmp(&b.1));
        assert_eq!(shown, vec![(1, 0.0), (2, 100.0), (3, 200.0)]);

        assert_eq!(layout.item_at(Point::new(150.0, 50.0)), Some(2));
        assert_eq!(layout.indicators[0].frame, Rect::new(100.0, 22.0, 100.0, 56.0));
    }

    #[test]
    fn test_full_width_bar_centers_on_parent() {
        let mut config = quick(FortuneConfig::bar());
        config.full_width = true;
        let mut fortune = Fortune::bar(items(3), 0, config).unwrap();
        fortune.set_viewport(Rect::new(500.0, 0.0, 200.0, 56.0), 1000.0);
        assert_eq!(fortune.viewport(), Rect::new(100.0, 0.0, 1000.0, 56.0));
    }

    #[test]
    fn test_single_item_bar_draws_once() {
        let mut fortune = Fortune::bar(items(1), 0, quick(FortuneConfig::bar())).unwrap();
        fortune.set_viewport(Rect::new(0.0, 0.0, 300.0, 56.0), 300.0);
        let Body::Bar(bar) = fortune.layout(&Theme::default()).body else {
            panic!("expected a bar");
        };
        assert_eq!(bar.segments.len(), 1);
    }

    #[test]
    fn test_fling_is_reported() {
        let mut fortune = Fortune::bar(items(5), 0, quick(FortuneConfig::bar())).unwrap();
        fortune.pan_begin(Point::new(0.0, 0.0));
        fortune.pan_update(Point::new(-40.0, 0.0));
        fortune.pan_end(Point::new(-2000.0, 0.0));

        let flings: Vec<_> = fortune
            .drain_events()
            .filter(|e| matches!(e, FortuneEvent::Fling { .. }))
            .collect();
        assert_eq!(flings, vec![FortuneEvent::Fling { velocity: -2000.0 }]);
    }

    #[test]
    fn test_bar_follows_drag_direction() {
        let mut fortune = Fortune::bar(items(5), 2, quick(FortuneConfig::bar())).unwrap();
        fortune.set_viewport(Rect::new(0.0, 0.0, 300.0, 100.0), 300.0);
        fortune.pan_begin(Point::new(0.0, 0.0));
        fortune.pan_update(Point::new(40.0, 0.0));

        let Body::Bar(bar) = fortune.layout(&Theme::default()).body else {
            panic!("expected a bar");
        };
        let selected: Vec<f64> = bar
            .segments
            .iter()
            .filter(|s| s.index == 2)
            .map(|s| s.rect.x)
            .collect();
        assert_eq!(selected, vec![140.0]);
    }

    #[test]
    fn test_pan_settles_during_ticks() {
        let t0 = Instant::now();
        let mut fortune = Fortune::bar(items(5), 0, quick(FortuneConfig::bar())).unwrap();
        fortune.pan_begin(Point::new(0.0, 0.0));
        fortune.pan_update(Point::new(60.0, 0.0));
        fortune.pan_end(Point::default());

        assert!(fortune.is_moving());
        for frame in 0..60 {
            fortune.tick(t0 + Duration::from_millis(frame * 16));
        }
        assert!(!fortune.is_moving());
        assert_eq!(fortune.pan_offset(), 0.0);
    }

    #[test]
    fn test_tap_reports_item() {
        let mut fortune = Fortune::wheel(items(4), 0, quick(FortuneConfig::wheel())).unwrap();
        fortune.set_viewport(Rect::new(0.0, 0.0, 200.0, 200.0), 200.0);
        assert_eq!(
            fortune.tap(Point::new(100.0, 160.0), &Theme::default()),
            Some(2)
        );
        assert_eq!(
            fortune.drain_events().collect::<Vec<_>>(),
            vec![FortuneEvent::ItemTapped(2)]
        );
    }
}
