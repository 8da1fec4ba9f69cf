use crate::config::PageSetup;
use crate::fonts::FontRole;
use crate::model::{Alignment, GridPosition, Report, RenderNode};
use crate::palette::{Color, Palette};
use crate::text::split_sentence;

use super::canvas::{Paint, Surface, TextFrame, TextStyle};

const LOGO_X: f32 = 40.0;
const LOGO_WIDTH: f32 = 200.0;
const LOGO_HEIGHT: f32 = 70.0;
const INFO_TOP: f32 = 30.0;

const BOX_RADIUS: f32 = 5.0;
const TITLE_BOX_WIDTH: f32 = 230.0;
const TITLE_BOX_HEIGHT: f32 = 50.0;
const TITLE_SIZE: f32 = 28.0;

const SUMMARY_HEIGHT: f32 = 180.0;
const SUMMARY_SIZE: f32 = 31.0;
const SUMMARY_TEXT_WIDTH: f32 = 230.0;
const SUMMARY_INSET_X: f32 = 20.0;
const SUMMARY_INSET_Y: f32 = 15.0;
const SUMMARY_LINE_SPACING: f32 = 1.1;

const LEGEND_RADIUS: f32 = 10.0;
const LEGEND_GAP: f32 = 30.0;
const LEGEND_SIZE: f32 = 12.0;

const CATEGORY_SIZE: f32 = 25.0;
const QUESTION_SIZE: f32 = 9.0;
const BAR_HEIGHT: f32 = 17.5;
const BAR_LABEL_INSET: f32 = 5.0;

/// Page geometry for one placement: column width depends on how many columns are in use.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportLayout {
    pub margin_x: f32,
    pub margin_y: f32,
    pub column_gap: f32,
    pub column_width: f32,
    pub cell_height: f32,
}

impl ReportLayout {
    pub fn new(page: &PageSetup, total_columns: u32) -> Self {
        Self {
            margin_x: page.margin_x,
            margin_y: page.margin_y,
            column_gap: page.column_gap,
            column_width: page.column_width(total_columns),
            cell_height: page.cell_height(),
        }
    }

    /// Top-left corner of a grid cell.
    pub fn origin(&self, position: GridPosition) -> (f32, f32) {
        (
            self.margin_x + position.column as f32 * (self.column_width + self.column_gap),
            self.margin_y + position.row as f32 * self.cell_height,
        )
    }
}

pub fn draw_report<S: Surface>(
    surface: &mut S,
    report: &Report,
    nodes: &[RenderNode],
    layout: &ReportLayout,
    palette: &Palette,
    logo: Option<&str>,
) {
    draw_general_info(surface, report, layout, palette, logo);
    for node in nodes {
        draw_node(surface, node, layout, palette);
    }
}

/// Logo, title box, summary box and color legend in the top of column 0.
pub fn draw_general_info<S: Surface>(
    surface: &mut S,
    report: &Report,
    layout: &ReportLayout,
    palette: &Palette,
    logo: Option<&str>,
) {
    if let Some(name) = logo {
        surface.image(name, LOGO_X, INFO_TOP, LOGO_WIDTH, LOGO_HEIGHT);
    }

    let title_y = INFO_TOP + LOGO_HEIGHT + 10.0;
    surface.rounded_rect(
        layout.margin_x,
        title_y,
        TITLE_BOX_WIDTH,
        TITLE_BOX_HEIGHT,
        BOX_RADIUS,
        Paint::solid(palette.title_box),
    );
    let title = report.title.to_uppercase();
    let title_style = TextStyle {
        font: FontRole::Heading,
        size: TITLE_SIZE,
        color: Color::WHITE,
    };
    let title_h = surface.text_height(&title, &title_style, Some(TITLE_BOX_WIDTH));
    surface.text(
        &title,
        &title_style,
        TextFrame::wrapped(
            layout.margin_x,
            title_y + TITLE_BOX_HEIGHT / 2.0 - title_h / 2.0,
            TITLE_BOX_WIDTH,
            Alignment::Center,
        ),
    );

    let summary_y = title_y + TITLE_BOX_HEIGHT + 20.0;
    surface.rounded_rect(
        layout.margin_x,
        summary_y,
        layout.column_width,
        SUMMARY_HEIGHT,
        BOX_RADIUS,
        Paint::solid(palette.summary),
    );
    let summary_style = TextStyle {
        font: FontRole::Body,
        size: SUMMARY_SIZE,
        color: Color::WHITE,
    };
    let mut line_y = summary_y + SUMMARY_INSET_Y;
    for line in &report.summary {
        let h = surface.text(
            line,
            &summary_style,
            TextFrame::wrapped(
                layout.margin_x + SUMMARY_INSET_X,
                line_y,
                SUMMARY_TEXT_WIDTH,
                Alignment::Left,
            ),
        );
        line_y += h * SUMMARY_LINE_SPACING;
    }

    let legend_x = layout.margin_x + 2.0 * LEGEND_RADIUS;
    let legend_y = summary_y + SUMMARY_HEIGHT + 20.0;
    let legend_style = TextStyle {
        font: FontRole::Body,
        size: LEGEND_SIZE,
        color: Color::BLACK,
    };
    let entries = [
        (palette.positive, "Good"),
        (palette.negative, "To be improved"),
        (palette.neutral, "No benchmark"),
    ];
    for (i, (color, label)) in entries.into_iter().enumerate() {
        let cy = legend_y + i as f32 * LEGEND_GAP;
        surface.circle(legend_x, cy, LEGEND_RADIUS, Paint::solid(color));
        surface.text(
            label,
            &legend_style,
            TextFrame::at(legend_x + 2.0 * LEGEND_RADIUS, cy - 0.5 * LEGEND_RADIUS),
        );
    }
}

pub fn draw_node<S: Surface>(
    surface: &mut S,
    node: &RenderNode,
    layout: &ReportLayout,
    palette: &Palette,
) {
    let (x, y) = layout.origin(node.position());
    match node {
        RenderNode::Category { label, .. } => {
            let style = TextStyle {
                font: FontRole::Body,
                size: CATEGORY_SIZE,
                color: palette.category,
            };
            let label = label.to_uppercase();
            let h = surface.text_height(&label, &style, None);
            surface.text(&label, &style, TextFrame::at(x, y + 0.5 * h));
        }
        RenderNode::Question {
            label,
            percentage,
            benchmark,
            ..
        } => {
            let style = TextStyle {
                font: FontRole::Body,
                size: QUESTION_SIZE,
                color: Color::BLACK,
            };
            let frame = |y| TextFrame::wrapped(x, y, layout.column_width, Alignment::Left);
            let text_h = match split_sentence(label) {
                Ok((first, second)) => {
                    let h1 = surface.text(first, &style, frame(y));
                    h1 + surface.text(second, &style, frame(y + h1))
                }
                Err(e) => {
                    log::debug!("{e}, drawing on one line");
                    surface.text(label, &style, frame(y))
                }
            };

            let bar_y = y + text_h;
            let bar_w = layout.column_width * percentage / 100.0;
            surface.rect(
                x,
                bar_y,
                bar_w,
                BAR_HEIGHT,
                Paint::solid(palette.bar_color(*percentage, *benchmark)),
            );

            let value_style = TextStyle {
                color: Color::WHITE,
                ..style
            };
            let value = format!("{percentage}%");
            let value_h = surface.text_height(&value, &value_style, None);
            surface.text(
                &value,
                &value_style,
                TextFrame::wrapped(x, bar_y + 0.5 * value_h, bar_w - BAR_LABEL_INSET, Alignment::Right),
            );
        }
    }
}
