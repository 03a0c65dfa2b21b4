use crate::fortune::geometry::{Point, Rect};
use crate::fortune::model::{
    BarLayout, Body, PlacedIndicator, SegmentLayout, SliceLayout, WheelLayout,
};
use crate::fortune::style::{Style, TextAlign};
use crate::fortune::{FortuneItem, IndicatorShape, ItemContent, Layout, Theme};
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;

const FONT_SIZE: f64 = 14.0;
const CONTENT_PADDING: f64 = 8.0;
const ICON_GAP: f64 = 6.0;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// What one wheel slice or bar segment draws inside its area.
struct Content<'a> {
    text: Option<&'a str>,
    icon: Option<&'a Pixbuf>,
    style: &'a Style,
}

impl<'a> Content<'a> {
    fn new(item: &'a FortuneItem, icon: Option<&'a Pixbuf>, style: &'a Style) -> Self {
        let text = match &item.content {
            ItemContent::Text(text) | ItemContent::IconText { text, .. } => Some(text.as_str()),
            ItemContent::Icon(_) => None,
        };
        Self { text, icon, style }
    }

    fn icon_width(&self, size: f64) -> f64 {
        if self.icon.is_some() { size } else { 0.0 }
    }

    /// Draws icon then text on a horizontal line through `y`, aligned within
    /// `[x0, x1]`.
    fn draw_line(
        &self,
        cr: &Context,
        x0: f64,
        x1: f64,
        y: f64,
        icon_size: f64,
    ) -> Result<(), cairo::Error> {
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(FONT_SIZE);

        let extents = match self.text {
            Some(text) => Some(cr.text_extents(text)?),
            None => None,
        };
        let text_width = extents.map_or(0.0, |e| e.x_advance());
        let gap = if self.icon.is_some() && self.text.is_some() {
            ICON_GAP
        } else {
            0.0
        };
        let total = self.icon_width(icon_size) + gap + text_width;

        let left = match self.style.text_align {
            TextAlign::Start => x0 + CONTENT_PADDING,
            TextAlign::Center => (x0 + x1 - total) / 2.0,
            TextAlign::End => x1 - CONTENT_PADDING - total,
        };

        if let Some(pixbuf) = self.icon {
            draw_icon(cr, pixbuf, Point::new(left + icon_size / 2.0, y), icon_size)?;
        }

        if let (Some(text), Some(ext)) = (self.text, extents) {
            set_color(cr, self.style.text_color);
            cr.move_to(
                left + self.icon_width(icon_size) + gap - ext.x_bearing(),
                y - ext.y_bearing() - ext.height() / 2.0,
            );
            cr.show_text(text)?;
        }
        Ok(())
    }
}

fn draw_icon(
    cr: &Context,
    pixbuf: &Pixbuf,
    center: Point,
    size: f64,
) -> Result<(), cairo::Error> {
    let scale = size / pixbuf.width().max(pixbuf.height()).max(1) as f64;
    let (w, h) = (pixbuf.width() as f64 * scale, pixbuf.height() as f64 * scale);

    cr.save()?;
    cr.translate(center.x - w / 2.0, center.y - h / 2.0);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn fill_and_stroke(cr: &Context, style: &Style) -> Result<(), cairo::Error> {
    set_color(cr, style.fill);
    cr.fill_preserve()?;
    if style.border_width > 0.0 {
        set_color(cr, style.border);
        cr.set_line_width(style.border_width);
        cr.stroke()
    } else {
        cr.new_path();
        Ok(())
    }
}

struct SliceRenderer<'a> {
    wheel: &'a WheelLayout,
    slice: &'a SliceLayout,
    content: Content<'a>,
}

impl SliceRenderer<'_> {
    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        let WheelLayout { center, radius, .. } = *self.wheel;
        let SliceLayout {
            start_angle, sweep, ..
        } = *self.slice;

        cr.move_to(center.x, center.y);
        cr.arc(center.x, center.y, radius, start_angle, start_angle + sweep);
        cr.close_path();
        fill_and_stroke(cr, &self.slice.style)?;

        // content runs outwards along the middle of the slice
        let chord = 2.0 * radius * 0.6 * (sweep / 2.0).sin().abs();
        let icon_size = chord.min(radius * 0.3).min(48.0);

        cr.save()?;
        cr.translate(center.x, center.y);
        cr.rotate(start_angle + sweep / 2.0);
        self.content.draw_line(cr, radius * 0.2, radius, 0.0, icon_size)?;
        cr.restore()
    }
}

struct SegmentRenderer<'a> {
    segment: &'a SegmentLayout,
    content: Content<'a>,
}

impl SegmentRenderer<'_> {
    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.segment.rect;

        cr.rectangle(x, y, width, height);
        fill_and_stroke(cr, &self.segment.style)?;

        let icon_size = (height - 2.0 * CONTENT_PADDING).max(0.0);
        self.content
            .draw_line(cr, x, x + width, y + height / 2.0, icon_size)
    }
}

fn draw_wheel(
    cr: &Context,
    wheel: &WheelLayout,
    items: &[FortuneItem],
    icons: &[Option<Pixbuf>],
) -> Result<(), cairo::Error> {
    for slice in &wheel.slices {
        let Some(item) = items.get(slice.index) else {
            continue;
        };
        let icon = icons.get(slice.index).and_then(Option::as_ref);
        SliceRenderer {
            wheel,
            slice,
            content: Content::new(item, icon, &slice.style),
        }
        .draw(cr)?;
    }
    Ok(())
}

fn draw_bar(
    cr: &Context,
    bar: &BarLayout,
    items: &[FortuneItem],
    icons: &[Option<Pixbuf>],
) -> Result<(), cairo::Error> {
    let v = bar.viewport;
    cr.save()?;
    cr.rectangle(v.x, v.y, v.width, v.height);
    cr.clip();

    for segment in &bar.segments {
        let Some(item) = items.get(segment.index) else {
            continue;
        };
        let icon = icons.get(segment.index).and_then(Option::as_ref);
        SegmentRenderer {
            segment,
            content: Content::new(item, icon, &segment.style),
        }
        .draw(cr)?;
    }
    cr.restore()
}

fn draw_indicator(
    cr: &Context,
    placed: &PlacedIndicator,
    theme: &Theme,
) -> Result<(), cairo::Error> {
    match placed.indicator.shape {
        IndicatorShape::Triangle {
            color,
            width,
            height,
        } => {
            let angle = placed.indicator.anchor.inward_angle();
            let (dx, dy) = (angle.cos(), angle.sin());
            let at = placed.at;

            cr.move_to(at.x + dx * height, at.y + dy * height);
            cr.line_to(at.x - dy * width / 2.0, at.y + dx * width / 2.0);
            cr.line_to(at.x + dy * width / 2.0, at.y - dx * width / 2.0);
            cr.close_path();
            set_color(cr, color.unwrap_or(theme.primary));
            cr.fill()
        }
        IndicatorShape::Rectangle {
            border,
            border_width,
        } => {
            let f = placed.frame;
            let inset = border_width / 2.0;
            cr.rectangle(
                f.x + inset,
                f.y + inset,
                (f.width - border_width).max(0.0),
                (f.height - border_width).max(0.0),
            );
            set_color(cr, border.unwrap_or(theme.primary));
            cr.set_line_width(border_width);
            cr.stroke()
        }
    }
}

/// Paints a computed layout. `icons` is indexed like `items`.
pub fn draw(
    cr: &Context,
    layout: &Layout,
    items: &[FortuneItem],
    icons: &[Option<Pixbuf>],
    theme: &Theme,
) -> Result<(), cairo::Error> {
    match &layout.body {
        Body::Wheel(wheel) => draw_wheel(cr, wheel, items, icons)?,
        Body::Bar(bar) => draw_bar(cr, bar, items, icons)?,
    }

    for placed in &layout.indicators {
        draw_indicator(cr, placed, theme)?;
    }
    Ok(())
}
