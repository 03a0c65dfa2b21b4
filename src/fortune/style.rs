use super::item::StyleOverride;
use palette::{Mix, Srgba, WithAlpha};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Colors the strategies derive item styles from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub primary: Srgba<f64>,
    pub background: Srgba<f64>,
    pub on_primary: Srgba<f64>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Srgba::new(0.4, 0.4, 0.8, 1.0),
            background: Srgba::new(0.15, 0.15, 0.15, 1.0),
            on_primary: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl Theme {
    /// Primary laid over the background at `opacity`, fully opaque.
    pub fn tint(&self, opacity: f64) -> Srgba<f64> {
        self.background
            .color
            .mix(self.primary.color, opacity.clamp(0.0, 1.0))
            .with_alpha(1.0)
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
pub enum TextAlign {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Srgba<f64>,
    pub border: Srgba<f64>,
    pub border_width: f64,
    pub text_color: Srgba<f64>,
    pub text_align: TextAlign,
}

impl Style {
    pub fn with_override(mut self, over: &StyleOverride) -> Self {
        if let Some(fill) = over.fill {
            self.fill = fill;
        }
        if let Some(border) = over.border {
            self.border = border;
        }
        if let Some(width) = over.border_width {
            self.border_width = width;
        }
        if let Some(align) = over.text_align {
            self.text_align = align;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformStyle {
    /// Falls back to a light tint of the theme's primary color.
    pub fill: Option<Srgba<f64>>,
    pub border: Option<Srgba<f64>>,
    pub border_width: f64,
}

impl Default for UniformStyle {
    fn default() -> Self {
        Self {
            fill: None,
            border: None,
            border_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlternatingStyle {
    pub border_width: f64,
}

impl Default for AlternatingStyle {
    fn default() -> Self {
        Self { border_width: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleStrategy {
    Uniform(UniformStyle),
    Alternating(AlternatingStyle),
}

impl Default for StyleStrategy {
    fn default() -> Self {
        Self::Alternating(AlternatingStyle::default())
    }
}

impl StyleStrategy {
    pub fn item_style(&self, theme: &Theme, index: usize, _item_count: usize) -> Style {
        match self {
            Self::Uniform(uniform) => Style {
                fill: uniform.fill.unwrap_or_else(|| theme.tint(0.3)),
                border: uniform.border.unwrap_or(theme.primary),
                border_width: uniform.border_width,
                text_color: theme.on_primary,
                text_align: TextAlign::Center,
            },
            Self::Alternating(alternating) => Style {
                fill: if index % 2 == 0 {
                    theme.tint(0.5)
                } else {
                    theme.tint(1.0)
                },
                border: theme.primary,
                border_width: alternating.border_width,
                text_color: theme.on_primary,
                text_align: TextAlign::Center,
            },
        }
    }

    /// Strategy output with the item's own override on top.
    pub fn resolve(
        &self,
        theme: &Theme,
        index: usize,
        item_count: usize,
        over: Option<&StyleOverride>,
    ) -> Style {
        let style = self.item_style(theme, index, item_count);
        match over {
            Some(over) => style.with_override(over),
            None => style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_ignores_index() {
        let theme = Theme::default();
        let strategy = StyleStrategy::Uniform(UniformStyle::default());
        let first = strategy.item_style(&theme, 0, 5);
        for i in 1..5 {
            assert_eq!(strategy.item_style(&theme, i, 5), first);
        }
    }

    #[test]
    fn test_alternating_keyed_by_parity() {
        let theme = Theme::default();
        let strategy = StyleStrategy::default();
        for count in [2, 3, 7] {
            for i in 0..count {
                assert_eq!(
                    strategy.item_style(&theme, i, count),
                    strategy.item_style(&theme, i + 2, count)
                );
            }
        }
        assert_ne!(
            strategy.item_style(&theme, 0, 4).fill,
            strategy.item_style(&theme, 1, 4).fill
        );
    }

    #[test]
    fn test_repeatable() {
        let theme = Theme::default();
        let strategy = StyleStrategy::Uniform(UniformStyle {
            border_width: 3.0,
            ..UniformStyle::default()
        });
        assert_eq!(
            strategy.item_style(&theme, 4, 9),
            strategy.item_style(&theme, 4, 9)
        );
        assert_eq!(strategy.item_style(&theme, 4, 9).border_width, 3.0);
    }

    #[test]
    fn test_override_wins() {
        let theme = Theme::default();
        let red = Srgba::new(1.0, 0.0, 0.0, 1.0);
        let over = StyleOverride {
            fill: Some(red),
            border_width: Some(4.0),
            ..StyleOverride::default()
        };
        let style = StyleStrategy::default().resolve(&theme, 1, 3, Some(&over));
        assert_eq!(style.fill, red);
        assert_eq!(style.border_width, 4.0);
        assert_eq!(style.border, theme.primary);
    }

    #[test]
    fn test_full_tint_is_primary() {
        let theme = Theme::default();
        let full = theme.tint(1.0);
        assert!((full.red - theme.primary.red).abs() < 1e-12);
        assert_eq!(full.alpha, 1.0);
    }
}
