use crate::events::AppEvent;
use crate::fortune::animation::{AnimationKind, ParseCurveError};
use crate::fortune::indicator::{Anchor, Indicator, IndicatorShape};
use crate::fortune::item::{FortuneItem, IconName, ItemContent, StyleOverride};
use crate::fortune::physics::{CircularPan, DirectionalPan, PanPhysics};
use crate::fortune::style::{AlternatingStyle, StyleStrategy, TextAlign, UniformStyle};
use crate::fortune::{
    Curve, DEFAULT_BAR_HEIGHT, DEFAULT_DURATION, DEFAULT_ROTATION_COUNT, DEFAULT_VISIBLE_COUNT,
    Fortune, FortuneConfig, FortuneError, PresentationKind,
};
use async_channel::Sender;
use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DurationMilliSeconds, SerializeDisplay, serde_as};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
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
pub enum PresentationChoice {
    #[default]
    Auto,
    Wheel,
    Bar,
}

impl PresentationChoice {
    pub fn resolve(self, item_count: usize) -> PresentationKind {
        match self {
            Self::Auto => PresentationKind::for_item_count(item_count),
            Self::Wheel => PresentationKind::Wheel,
            Self::Bar => PresentationKind::Bar,
        }
    }
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
pub enum StyleKind {
    Uniform,
    #[default]
    Alternating,
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
pub enum ShapeKind {
    #[default]
    Triangle,
    Rectangle,
}

/// `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn to_srgba(self) -> Srgba<f64> {
        self.0.into_format::<f64>().with_alpha(1.0)
    }
}

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemConfig {
    pub text: Option<String>,
    pub icon: Option<String>,
    pub fill: Option<HexColor>,
    pub border: Option<HexColor>,
    pub border_width: Option<f64>,
    pub text_align: Option<TextAlign>,
}

impl ItemConfig {
    pub fn to_item(&self) -> FortuneItem {
        let content = match (&self.text, &self.icon) {
            (Some(text), Some(icon)) => ItemContent::IconText {
                icon: IconName::new(icon.clone()),
                text: text.clone(),
            },
            (None, Some(icon)) => ItemContent::Icon(IconName::new(icon.clone())),
            (text, None) => ItemContent::Text(text.clone().unwrap_or_default()),
        };

        let style = StyleOverride {
            fill: self.fill.map(HexColor::to_srgba),
            border: self.border.map(HexColor::to_srgba),
            border_width: self.border_width,
            text_align: self.text_align,
        };
        let item = FortuneItem::new(content);
        if style == StyleOverride::default() {
            item
        } else {
            item.with_style(style)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndicatorConfig {
    pub anchor: Anchor,
    #[serde(default)]
    pub shape: ShapeKind,
    pub color: Option<HexColor>,
}

impl IndicatorConfig {
    pub fn to_indicator(&self) -> Indicator {
        let color = self.color.map(HexColor::to_srgba);
        let mut shape = match self.shape {
            ShapeKind::Triangle => IndicatorShape::triangle(),
            ShapeKind::Rectangle => IndicatorShape::rectangle(),
        };
        match &mut shape {
            IndicatorShape::Triangle { color: c, .. } => *c = color,
            IndicatorShape::Rectangle { border, .. } => *border = color,
        }
        Indicator::new(self.anchor, shape)
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub presentation: PresentationChoice,
    pub selected: usize,
    /// Spin for the wheel and Roll for the bar when unset.
    pub animation: Option<AnimationKind>,
    pub rotation_count: u32,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "duration_ms")]
    pub duration: Duration,
    pub curve: Option<String>,
    pub style: StyleKind,
    pub fill: Option<HexColor>,
    pub border: Option<HexColor>,
    pub border_width: f64,
    pub animate_first: bool,
    pub full_width: bool,
    pub bar_height: f64,
    pub visible_count: usize,
    pub pan: bool,
    pub snap: bool,
    pub indicators: Vec<IndicatorConfig>,
    pub items: Vec<ItemConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presentation: PresentationChoice::Auto,
            selected: 0,
            animation: None,
            rotation_count: DEFAULT_ROTATION_COUNT,
            duration: DEFAULT_DURATION,
            curve: None,
            style: StyleKind::Alternating,
            fill: None,
            border: None,
            border_width: 1.0,
            animate_first: true,
            full_width: false,
            bar_height: DEFAULT_BAR_HEIGHT,
            visible_count: DEFAULT_VISIBLE_COUNT,
            pan: true,
            snap: true,
            indicators: Vec::new(),
            items: Vec::new(),
        }
    }
}

impl Config {
    pub fn items(&self) -> Vec<FortuneItem> {
        self.items.iter().map(ItemConfig::to_item).collect()
    }

    pub fn presentation(&self) -> PresentationKind {
        self.presentation.resolve(self.items.len())
    }

    pub fn fortune_config(
        &self,
        presentation: PresentationKind,
    ) -> Result<FortuneConfig, ConfigError> {
        let curve = self.curve.as_deref().map(Curve::from_str).transpose()?;
        let defaults = FortuneConfig::for_presentation(presentation);

        let style = match self.style {
            StyleKind::Uniform => StyleStrategy::Uniform(UniformStyle {
                fill: self.fill.map(HexColor::to_srgba),
                border: self.border.map(HexColor::to_srgba),
                border_width: self.border_width,
            }),
            StyleKind::Alternating => StyleStrategy::Alternating(AlternatingStyle {
                border_width: self.border_width,
            }),
        };

        let physics = match (self.pan, presentation) {
            (false, _) => PanPhysics::None,
            (true, PresentationKind::Wheel) => PanPhysics::Circular(CircularPan {
                snap: self.snap,
                ..CircularPan::default()
            }),
            (true, PresentationKind::Bar) => PanPhysics::Directional(DirectionalPan::default()),
        };

        let indicators = if self.indicators.is_empty() {
            defaults.indicators
        } else {
            self.indicators
                .iter()
                .map(IndicatorConfig::to_indicator)
                .collect()
        };

        Ok(FortuneConfig {
            rotation_count: self.rotation_count,
            duration: self.duration,
            kind: self.animation.unwrap_or(defaults.kind),
            curve,
            indicators,
            style,
            physics,
            animate_first: self.animate_first,
            bar_height: self.bar_height,
            full_width: self.full_width,
            visible_count: self.visible_count.max(1),
        })
    }

    pub fn build(&self, presentation: PresentationKind) -> Result<Fortune, ConfigError> {
        let config = self.fortune_config(presentation)?;
        Ok(Fortune::build(presentation, self.items(), self.selected, config)?)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid curve: {0}")]
    Curve(#[from] ParseCurveError),
    #[error("Invalid fortune: {0}")]
    Fortune(#[from] FortuneError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "fortune", "fortune-wheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("FORTUNE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn builtin_config() -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Falls back to the bundled demo set when the file is missing or broken.
pub fn load_or_builtin(path: &Path) -> Config {
    if path.exists() {
        match load_config(path) {
            Ok(c) => return c,
            Err(e) => log::error!("Failed to load {}: {}", path.display(), e),
        }
    }

    builtin_config().unwrap_or_else(|e| {
        log::error!("Bundled config is invalid: {}", e);
        Config::default()
    })
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn watch_dir(
    dir: &Path,
    bridge_tx: Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, ConfigError> {
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    // dropping the watcher stops the notifications
    let _watcher = match watch_dir(&config_dir, bridge_tx) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch {}: {}", config_dir.display(), e);
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
