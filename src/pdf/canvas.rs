use std::collections::HashMap;

use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontEntry, FontRole};
use crate::model::Alignment;
use crate::palette::Color;

/// Bézier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontRole,
    pub size: f32,
    pub color: Color,
}

/// Where a text block goes. `y` is the top of the first line; `width` enables
/// wrapping and is the box that `align` works within.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFrame {
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub align: Alignment,
}

impl TextFrame {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: None,
            align: Alignment::Left,
        }
    }

    pub fn wrapped(x: f32, y: f32, width: f32, align: Alignment) -> Self {
        Self {
            x,
            y,
            width: Some(width),
            align,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

impl Paint {
    /// Fill and stroke in the same color.
    pub fn solid(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: Some(color),
        }
    }
}

/// Drawing operations the report needs. Coordinates are in points with the
/// origin at the top-left corner of the page and y growing downwards.
pub trait Surface {
    /// Draw `text` and return the height it took.
    fn text(&mut self, text: &str, style: &TextStyle, frame: TextFrame) -> f32;
    /// Height `text` would take when drawn with `style` wrapped to `width`.
    fn text_height(&self, text: &str, style: &TextStyle, width: Option<f32>) -> f32;
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint);
    fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, paint: Paint);
    fn circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint);
    /// Draw a previously embedded image XObject scaled into the box.
    fn image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32);
}

pub(crate) struct PdfCanvas<'a> {
    content: Content,
    fonts: &'a HashMap<FontRole, FontEntry>,
    page_height: f32,
}

impl<'a> PdfCanvas<'a> {
    pub(crate) fn new(fonts: &'a HashMap<FontRole, FontEntry>, page_height: f32) -> Self {
        Self {
            content: Content::new(),
            fonts,
            page_height,
        }
    }

    /// Zlib-compressed content stream.
    pub(crate) fn finish(self) -> Vec<u8> {
        let raw = self.content.finish();
        miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6)
    }

    fn font(&self, role: FontRole) -> &'a FontEntry {
        // Both roles are registered before drawing starts.
        let fonts: &'a HashMap<FontRole, FontEntry> = self.fonts;
        &fonts[&role]
    }

    fn flip(&self, y: f32) -> f32 {
        self.page_height - y
    }

    fn apply_paint(&mut self, paint: Paint) {
        if let Some(fill) = paint.fill {
            let [r, g, b] = fill.to_unit();
            self.content.set_fill_rgb(r, g, b);
        }
        if let Some(stroke) = paint.stroke {
            let [r, g, b] = stroke.to_unit();
            self.content.set_stroke_rgb(r, g, b);
        }
    }

    fn paint_path(&mut self, paint: Paint) {
        match (paint.fill, paint.stroke) {
            (Some(_), Some(_)) => self.content.fill_nonzero_and_stroke(),
            (Some(_), None) => self.content.fill_nonzero(),
            (None, Some(_)) => self.content.stroke(),
            (None, None) => self.content.end_path(),
        };
    }
}

/// Greedy word wrap. Words wider than the box get a line of their own.
pub(crate) fn wrap_lines(entry: &FontEntry, text: &str, size: f32, width: Option<f32>) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let Some(max_width) = width else {
            lines.push(paragraph.to_string());
            continue;
        };
        let space_w = entry.text_width(" ", size);
        let mut line = String::new();
        let mut line_w = 0.0f32;
        for word in paragraph.split_whitespace() {
            let word_w = entry.text_width(word, size);
            if line.is_empty() {
                line.push_str(word);
                line_w = word_w;
            } else if line_w + space_w + word_w <= max_width {
                line.push(' ');
                line.push_str(word);
                line_w += space_w + word_w;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_w = word_w;
            }
        }
        lines.push(line);
    }
    lines
}

impl Surface for PdfCanvas<'_> {
    fn text(&mut self, text: &str, style: &TextStyle, frame: TextFrame) -> f32 {
        let entry = self.font(style.font);
        let lines = wrap_lines(entry, text, style.size, frame.width);
        let line_h = entry.line_height(style.size);
        let ascent = entry.ascent(style.size);

        let [r, g, b] = style.color.to_unit();
        self.content.set_fill_rgb(r, g, b);
        self.content.begin_text();
        self.content
            .set_font(Name(entry.pdf_name.as_bytes()), style.size);
        for (i, line) in lines.iter().enumerate() {
            let line_w = entry.text_width(line, style.size);
            let slack = frame.width.map(|w| w - line_w).unwrap_or(0.0);
            let x = frame.x
                + match frame.align {
                    Alignment::Left => 0.0,
                    Alignment::Center => slack / 2.0,
                    Alignment::Right => slack,
                }
                .max(0.0);
            let baseline = self.flip(frame.y + i as f32 * line_h + ascent);
            self.content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, baseline]);
            self.content.show(Str(&entry.encode(line)));
        }
        self.content.end_text();

        lines.len() as f32 * line_h
    }

    fn text_height(&self, text: &str, style: &TextStyle, width: Option<f32>) -> f32 {
        let entry = self.font(style.font);
        wrap_lines(entry, text, style.size, width).len() as f32 * entry.line_height(style.size)
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        let bottom = self.flip(y + height);
        self.apply_paint(paint);
        self.content.rect(x, bottom, width, height);
        self.paint_path(paint);
    }

    fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, paint: Paint) {
        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        let k = r * KAPPA;
        let (left, right) = (x, x + width);
        let (top, bottom) = (self.flip(y), self.flip(y + height));

        self.apply_paint(paint);
        let c = &mut self.content;
        c.move_to(left + r, top);
        c.line_to(right - r, top);
        c.cubic_to(right - r + k, top, right, top - r + k, right, top - r);
        c.line_to(right, bottom + r);
        c.cubic_to(right, bottom + r - k, right - r + k, bottom, right - r, bottom);
        c.line_to(left + r, bottom);
        c.cubic_to(left + r - k, bottom, left, bottom + r - k, left, bottom + r);
        c.line_to(left, top - r);
        c.cubic_to(left, top - r + k, left + r - k, top, left + r, top);
        c.close_path();
        self.paint_path(paint);
    }

    fn circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint) {
        let cy = self.flip(cy);
        let k = radius * KAPPA;

        self.apply_paint(paint);
        let c = &mut self.content;
        c.move_to(cx + radius, cy);
        c.cubic_to(cx + radius, cy + k, cx + k, cy + radius, cx, cy + radius);
        c.cubic_to(cx - k, cy + radius, cx - radius, cy + k, cx - radius, cy);
        c.cubic_to(cx - radius, cy - k, cx - k, cy - radius, cx, cy - radius);
        c.cubic_to(cx + k, cy - radius, cx + radius, cy - k, cx + radius, cy);
        c.close_path();
        self.paint_path(paint);
    }

    fn image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        let bottom = self.flip(y + height);
        self.content.save_state();
        self.content.transform([width, 0.0, 0.0, height, x, bottom]);
        self.content.x_object(Name(name.as_bytes()));
        self.content.restore_state();
    }
}
