use super::style::TextAlign;
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgba;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct IconName(String);

impl IconName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// What an item shows; the host decides how to draw it.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemContent {
    Text(String),
    Icon(IconName),
    IconText { icon: IconName, text: String },
}

impl ItemContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::IconText { text, .. } => Some(text),
            Self::Icon(_) => None,
        }
    }

    pub fn icon(&self) -> Option<&IconName> {
        match self {
            Self::Icon(icon) | Self::IconText { icon, .. } => Some(icon),
            Self::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Icon(icon) => icon.trim().is_empty(),
            Self::IconText { icon, text } => icon.trim().is_empty() && text.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleOverride {
    pub fill: Option<Srgba<f64>>,
    pub border: Option<Srgba<f64>>,
    pub border_width: Option<f64>,
    pub text_align: Option<TextAlign>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FortuneItem {
    pub content: ItemContent,
    pub style: Option<StyleOverride>,
}

impl FortuneItem {
    pub fn new(content: ItemContent) -> Self {
        Self {
            content,
            style: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ItemContent::Text(text.into()))
    }

    pub fn icon(name: impl Into<String>) -> Self {
        Self::new(ItemContent::Icon(IconName::new(name)))
    }

    pub fn with_style(mut self, style: StyleOverride) -> Self {
        self.style = Some(style);
        self
    }

    /// Short label for logs and events.
    pub fn label(&self) -> &str {
        self.content
            .text()
            .or_else(|| self.content.icon().map(|i| i.as_str()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payloads() {
        assert!(ItemContent::Text("  ".into()).is_empty());
        assert!(ItemContent::Icon(IconName::new("")).is_empty());
        assert!(!ItemContent::IconText {
            icon: IconName::new(""),
            text: "Tea".into()
        }
        .is_empty());
    }

    #[test]
    fn test_equality_covers_style() {
        let plain = FortuneItem::text("Pizza");
        let styled = FortuneItem::text("Pizza").with_style(StyleOverride {
            border_width: Some(2.0),
            ..StyleOverride::default()
        });
        assert_eq!(plain, FortuneItem::text("Pizza"));
        assert_ne!(plain, styled);
    }

    #[test]
    fn test_label_prefers_text() {
        let item = FortuneItem::new(ItemContent::IconText {
            icon: IconName::new("firefox"),
            text: "Browser".into(),
        });
        assert_eq!(item.label(), "Browser");
        assert_eq!(FortuneItem::icon("firefox").label(), "firefox");
    }
}
