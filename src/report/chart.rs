//! Vector charts drawn directly onto a PDF layer: the horizontal risk gauge
//! and the symptom presence bars. Geometry is computed by small pure helpers
//! so it can be checked without rendering.

use printpdf::path::PaintMode;
use printpdf::{Color, IndirectFontRef, Line, Mm, PdfLayerReference, Point, Rect, Rgb};

use crate::models::RiskCategory;
use crate::risk::{HIGH_THRESHOLD, MAX_SCORE, MEDIUM_THRESHOLD};

// ─── Palette ──────────────────────────────────────────────────────────────────

pub const HEADER_BLUE: u32 = 0x1976d2;
pub const TEXT_DARK: u32 = 0x212121;
pub const TEXT_MUTED: u32 = 0x616161;
pub const WHITE: u32 = 0xffffff;

pub const GAUGE_LOW: u32 = 0x81c784;
pub const GAUGE_MEDIUM: u32 = 0xfff59d;
pub const GAUGE_HIGH: u32 = 0xef9a9a;

pub const SYMPTOM_PRESENT: u32 = 0xef5350;
pub const SYMPTOM_ABSENT: u32 = 0xe0e0e0;

pub const BOX_LOW: u32 = 0x4caf50;
pub const BOX_MEDIUM: u32 = 0xfbc02d;
pub const BOX_HIGH: u32 = 0xf44336;

/// `0xRRGGBB` to a printpdf colour.
pub fn rgb(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Color::Rgb(Rgb::new(channel(16), channel(8), channel(0), None))
}

/// Recommendation box colour for a category.
pub fn category_box_color(category: RiskCategory) -> u32 {
    match category {
        RiskCategory::Low => BOX_LOW,
        RiskCategory::Medium => BOX_MEDIUM,
        RiskCategory::High => BOX_HIGH,
    }
}

pub fn fill_rect(layer: &PdfLayerReference, x: Mm, y: Mm, width: Mm, height: Mm, color: u32) {
    layer.set_fill_color(rgb(color));
    layer.add_rect(Rect::new(x, y, x + width, y + height).with_mode(PaintMode::Fill));
}

pub fn stroke_line(layer: &PdfLayerReference, from: (Mm, Mm), to: (Mm, Mm), thickness: f32, color: u32) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(thickness);
    layer.add_line(Line {
        points: vec![
            (Point::new(from.0, from.1), false),
            (Point::new(to.0, to.1), false),
        ],
        is_closed: false,
    });
}

/// Rough width of builtin Helvetica text. Good enough to centre labels.
pub fn approx_text_width(text: &str, font_size: f32) -> Mm {
    const PT_TO_MM: f32 = 0.3528;
    Mm(text.chars().count() as f32 * font_size * 0.5 * PT_TO_MM)
}

// ─── Risk gauge ───────────────────────────────────────────────────────────────

/// Vertical space the gauge occupies below its top edge.
pub const GAUGE_HEIGHT: Mm = Mm(30.0);
const GAUGE_BAR_HEIGHT: f32 = 8.0;

/// A coloured band of the gauge, as a score interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeBand {
    pub category: RiskCategory,
    pub from: u32,
    pub to: u32,
    pub color: u32,
}

pub fn gauge_bands() -> [GaugeBand; 3] {
    [
        GaugeBand {
            category: RiskCategory::Low,
            from: 0,
            to: MEDIUM_THRESHOLD,
            color: GAUGE_LOW,
        },
        GaugeBand {
            category: RiskCategory::Medium,
            from: MEDIUM_THRESHOLD,
            to: HIGH_THRESHOLD,
            color: GAUGE_MEDIUM,
        },
        GaugeBand {
            category: RiskCategory::High,
            from: HIGH_THRESHOLD,
            to: MAX_SCORE,
            color: GAUGE_HIGH,
        },
    ]
}

/// Horizontal offset of a score along a gauge of `width`.
pub fn score_offset(score: u32, width: Mm) -> Mm {
    Mm(width.0 * score.min(MAX_SCORE) as f32 / MAX_SCORE as f32)
}

/// Draw the gauge with its top edge at `top`. Returns the y below it.
#[allow(clippy::too_many_arguments)]
pub fn draw_risk_gauge(
    layer: &PdfLayerReference,
    x: Mm,
    top: Mm,
    width: Mm,
    score: u32,
    category: RiskCategory,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) -> Mm {
    let score_text = format!("{score}/{MAX_SCORE}");
    let score_size = 16.0;
    layer.set_fill_color(rgb(TEXT_DARK));
    layer.use_text(
        &score_text,
        score_size,
        x + Mm((width.0 - approx_text_width(&score_text, score_size).0) / 2.0),
        top - Mm(6.0),
        bold,
    );

    let bar_bottom = top - Mm(10.0 + GAUGE_BAR_HEIGHT);
    for band in gauge_bands() {
        let start = score_offset(band.from, width);
        let end = score_offset(band.to, width);
        fill_rect(layer, x + start, bar_bottom, end - start, Mm(GAUGE_BAR_HEIGHT), band.color);
    }

    let pointer_x = x + score_offset(score, width);
    stroke_line(
        layer,
        (pointer_x, bar_bottom - Mm(2.0)),
        (pointer_x, bar_bottom + Mm(GAUGE_BAR_HEIGHT + 2.0)),
        2.0,
        TEXT_DARK,
    );

    layer.set_fill_color(rgb(TEXT_MUTED));
    for tick in [0, MEDIUM_THRESHOLD, HIGH_THRESHOLD, MAX_SCORE] {
        let label = tick.to_string();
        let tick_x = x + score_offset(tick, width) - Mm(approx_text_width(&label, 7.0).0 / 2.0);
        layer.use_text(&label, 7.0, tick_x, bar_bottom - Mm(5.0), font);
    }

    let label = format!("{category} RISK");
    layer.set_fill_color(rgb(TEXT_DARK));
    layer.use_text(
        &label,
        11.0,
        x + Mm((width.0 - approx_text_width(&label, 11.0).0) / 2.0),
        bar_bottom - Mm(11.0),
        bold,
    );

    top - GAUGE_HEIGHT
}

// ─── Symptom chart ────────────────────────────────────────────────────────────

const ROW_HEIGHT: f32 = 7.0;
const BAR_HEIGHT: f32 = 4.5;
const LABEL_WIDTH: f32 = 45.0;

/// Bar colour and caption for one indicator.
pub fn symptom_style(present: bool) -> (u32, &'static str) {
    if present {
        (SYMPTOM_PRESENT, "PRESENT")
    } else {
        (SYMPTOM_ABSENT, "ABSENT")
    }
}

pub fn symptom_chart_height(rows: usize) -> Mm {
    Mm(rows as f32 * ROW_HEIGHT)
}

/// One row per indicator: label, full-width bar when present, a short grey
/// bar when absent. Returns the y below the chart.
pub fn draw_symptom_chart(
    layer: &PdfLayerReference,
    x: Mm,
    top: Mm,
    width: Mm,
    indicators: &[(&str, bool)],
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) -> Mm {
    let bar_x = x + Mm(LABEL_WIDTH);
    let bar_max = width - Mm(LABEL_WIDTH + 22.0);
    let mut y = top;

    for (label, present) in indicators {
        let (color, caption) = symptom_style(*present);
        let row_bottom = y - Mm(ROW_HEIGHT);
        let bar_bottom = row_bottom + Mm((ROW_HEIGHT - BAR_HEIGHT) / 2.0);
        let bar_width = if *present { bar_max } else { Mm(bar_max.0 * 0.15) };

        layer.set_fill_color(rgb(TEXT_DARK));
        layer.use_text(*label, 9.0, x, bar_bottom + Mm(1.0), font);
        fill_rect(layer, bar_x, bar_bottom, bar_width, Mm(BAR_HEIGHT), color);
        layer.set_fill_color(rgb(if *present { SYMPTOM_PRESENT } else { TEXT_MUTED }));
        layer.use_text(caption, 8.0, bar_x + bar_width + Mm(2.0), bar_bottom + Mm(1.0), bold);

        y = row_bottom;
    }

    y
}
