//! The printable report region: summary cards, the per-specialty bar chart
//! and the status pie, drawn with plotters into one RGB bitmap.

use chrono::{DateTime, Utc};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use printpdf::image_crate::RgbImage;
use serde::{Deserialize, Serialize};

use super::stats::AggregateStats;
use super::ExportError;
use crate::models::ThemeMode;

pub const REGION_WIDTH_PX: u32 = 1000;

pub const BAR_COLOR: &str = "#1976d2";
pub const ACTIVE_COLOR: &str = "#1976d2";
pub const SUSPENDED_COLOR: &str = "#f44336";
/// Status chips on the summary cards.
pub const ACTIVE_CHIP: &str = "#2e7d32";
pub const SUSPENDED_CHIP: &str = "#e0e0e0";
pub const SUSPENDED_CHIP_TEXT: &str = "#212121";
const GRID_COLOR: &str = "#bdbdbd";
const BORDER_LIGHT: &str = "#e0e0e0";
const BORDER_DARK: &str = "#424242";

const FONT: &str = "sans-serif";

const PADDING: u32 = 32;
const GAP: u32 = 24;
const CAPTION_BLOCK: u32 = 28;
const HEADING_BLOCK: u32 = 40;
const CARD_HEIGHT: u32 = 160;
const CHART_HEIGHT: u32 = 360;
const SECTION_GAP: u32 = 40;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Delegates to the wrapped f64 key-point axis; only exists so the axis gets
/// a `ValueFormatter` impl, which `configure_mesh` requires and plotters does
/// not provide for f64 axes.
struct KeyPointsF64(plotters::coord::combinators::WithKeyPoints<plotters::coord::types::RangedCoordf64>);

impl Ranged for KeyPointsF64 {
    type ValueType = f64;
    type FormatOption = DefaultFormatting;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

/// Snapshot of what one Reports page displayed.
///
/// Export captures this snapshot rather than recomputing, so the PDF matches
/// what the user was looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRegion {
    pub stats: AggregateStats,
    pub theme: ThemeMode,
    pub rendered_at: DateTime<Utc>,
}

impl ReportRegion {
    pub fn new(stats: AggregateStats, theme: ThemeMode) -> Self {
        Self {
            stats,
            theme,
            rendered_at: Utc::now(),
        }
    }

    /// Pixel height of the captured region.
    pub fn height_px(&self) -> u32 {
        PADDING
            + CAPTION_BLOCK
            + HEADING_BLOCK
            + CARD_HEIGHT
            + SECTION_GAP
            + HEADING_BLOCK
            + CHART_HEIGHT
            + SECTION_GAP
            + HEADING_BLOCK
            + CHART_HEIGHT
            + PADDING
    }

    /// Draw the region at [`REGION_WIDTH_PX`] wide.
    pub fn rasterize(&self) -> Result<RgbImage, ExportError> {
        let (width, height) = (REGION_WIDTH_PX, self.height_px());
        let palette = Palette::for_theme(self.theme);
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&palette.background).map_err(raster_err)?;

            let mut y = PADDING;
            let captured = format!("Captured {}", self.rendered_at.format("%Y-%m-%d %H:%M UTC"));
            root.draw_text(&captured, &text_style(14.0, &palette.muted), (PADDING as i32, y as i32))
                .map_err(raster_err)?;
            y += CAPTION_BLOCK;

            heading(&root, y, "Summary", &palette)?;
            y += HEADING_BLOCK;
            self.draw_cards(&root, y, &palette)?;
            y += CARD_HEIGHT + SECTION_GAP;

            heading(&root, y, "Doctors by Specialty", &palette)?;
            y += HEADING_BLOCK;
            self.draw_bar_chart(&chart_panel(&root, y, &palette)?, &palette)?;
            y += CHART_HEIGHT + SECTION_GAP;

            heading(&root, y, "Status Breakdown", &palette)?;
            y += HEADING_BLOCK;
            self.draw_pie_chart(&chart_panel(&root, y, &palette)?, &palette)?;

            root.present().map_err(raster_err)?;
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ExportError::Raster("bitmap buffer size mismatch".into()))
    }

    fn draw_cards(&self, root: &Area, y: u32, palette: &Palette) -> Result<(), ExportError> {
        let card_w = (REGION_WIDTH_PX - 2 * PADDING - 2 * GAP) / 3;
        let value_style = text_style(40.0, &palette.text);
        let label_style = text_style(16.0, &palette.muted);

        // Total: label and a large count.
        let total = panel(root, (PADDING, y), (card_w, CARD_HEIGHT), palette)?;
        total.draw_text("Total Doctors", &label_style, (20, 20)).map_err(raster_err)?;
        total
            .draw_text(&self.stats.total.to_string(), &value_style, (20, 56))
            .map_err(raster_err)?;

        // Status cards: label, a labelled chip, then the count below it.
        let statuses = [
            ("Active", self.stats.active, rgb(ACTIVE_CHIP), WHITE),
            ("Suspended", self.stats.suspended, rgb(SUSPENDED_CHIP), rgb(SUSPENDED_CHIP_TEXT)),
        ];
        let count_style = text_style(28.0, &palette.text);
        for (i, (label, count, chip_fill, chip_text)) in statuses.into_iter().enumerate() {
            let x = PADDING + (i as u32 + 1) * (card_w + GAP);
            let area = panel(root, (x, y), (card_w, CARD_HEIGHT), palette)?;
            area.draw_text(label, &label_style, (20, 20)).map_err(raster_err)?;

            let chip_style = text_style(15.0, &chip_text);
            let (tw, th) = area.estimate_text_size(label, &chip_style).map_err(raster_err)?;
            let (chip_w, chip_h) = (tw as i32 + 24, th as i32 + 12);
            area.draw(&Rectangle::new([(20, 50), (20 + chip_w, 50 + chip_h)], chip_fill.filled()))
                .map_err(raster_err)?;
            area.draw_text(label, &chip_style, (32, 56)).map_err(raster_err)?;

            area.draw_text(&count.to_string(), &count_style, (20, 60 + chip_h))
                .map_err(raster_err)?;
        }
        Ok(())
    }

    fn draw_bar_chart(&self, area: &Area, palette: &Palette) -> Result<(), ExportError> {
        let bars = &self.stats.per_specialty;
        let slots = bars.len().max(1) as f64;
        let centers: Vec<f64> = (0..bars.len()).map(|i| i as f64 + 0.5).collect();
        let (axis_max, step) = integer_axis(self.stats.max_specialty_count());
        let ticks: Vec<u32> = (0..=axis_max).step_by(step as usize).collect();

        let mut chart = ChartBuilder::on(area)
            .margin(24)
            .x_label_area_size(36)
            .y_label_area_size(48)
            .build_cartesian_2d(
                KeyPointsF64((0f64..slots).with_key_points(centers.clone())),
                (0u32..axis_max).with_key_points(ticks.clone()),
            )
            .map_err(raster_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_label_formatter(&|x: &f64| {
                bars.get(x.floor() as usize)
                    .map(|b| b.specialty_name.clone())
                    .unwrap_or_default()
            })
            .y_label_formatter(&|v: &u32| v.to_string())
            .axis_style(palette.text)
            .label_style(text_style(14.0, &palette.text))
            .draw()
            .map_err(raster_err)?;

        // Dashed grid under the bars.
        let grid = rgb(GRID_COLOR).stroke_width(1);
        chart
            .draw_series(ticks.iter().map(|&t| {
                DashedPathElement::new(vec![(0.0, t), (slots, t)], 3, 3, grid)
            }))
            .map_err(raster_err)?;
        chart
            .draw_series(centers.iter().map(|&x| {
                DashedPathElement::new(vec![(x, 0), (x, axis_max)], 3, 3, grid)
            }))
            .map_err(raster_err)?;

        let bar_style = rgb(BAR_COLOR).filled();
        chart
            .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let left = i as f64 + 0.2;
                Rectangle::new([(left, 0), (left + 0.6, bar.count)], bar_style)
            }))
            .map_err(raster_err)?;
        Ok(())
    }

    fn draw_pie_chart(&self, area: &Area, palette: &Palette) -> Result<(), ExportError> {
        let (w, _) = area.dim_in_pixel();
        let center = (w as i32 / 2, 150);
        let radius = 110.0;

        let slices: Vec<(f64, RGBColor, String)> = [
            (self.stats.active, rgb(ACTIVE_COLOR)),
            (self.stats.suspended, rgb(SUSPENDED_COLOR)),
        ]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, color)| (f64::from(value), color, value.to_string()))
        .collect();

        if slices.is_empty() {
            area.draw(&Circle::new(center, radius as i32, rgb(GRID_COLOR).stroke_width(1)))
                .map_err(raster_err)?;
        } else {
            let sizes: Vec<f64> = slices.iter().map(|s| s.0).collect();
            let colors: Vec<RGBColor> = slices.iter().map(|s| s.1).collect();
            let labels: Vec<&str> = slices.iter().map(|s| s.2.as_str()).collect();
            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(-90.0);
            pie.label_style(text_style(16.0, &palette.text));
            pie.label_offset(14.0);
            area.draw(&pie).map_err(raster_err)?;
        }

        // Legend
        let legend_style = text_style(15.0, &palette.text);
        let legend_y = center.1 + radius as i32 + 40;
        let mut x = center.0 - 110;
        for (label, color) in [("Active", ACTIVE_COLOR), ("Suspended", SUSPENDED_COLOR)] {
            area.draw(&Rectangle::new([(x, legend_y), (x + 14, legend_y + 14)], rgb(color).filled()))
                .map_err(raster_err)?;
            area.draw_text(label, &legend_style, (x + 22, legend_y)).map_err(raster_err)?;
            x += 130;
        }
        Ok(())
    }
}

struct Palette {
    background: RGBColor,
    paper: RGBColor,
    border: RGBColor,
    text: RGBColor,
    muted: RGBColor,
}

impl Palette {
    fn for_theme(theme: ThemeMode) -> Self {
        let (border, muted) = match theme {
            ThemeMode::Light => (BORDER_LIGHT, "#666"),
            ThemeMode::Dark => (BORDER_DARK, "#aaa"),
        };
        Self {
            background: rgb(theme.background()),
            paper: rgb(theme.paper()),
            border: rgb(border),
            text: rgb(theme.text()),
            muted: rgb(muted),
        }
    }
}

/// `#rgb` / `#rrggbb` to a plotters colour. Malformed input is black.
pub fn rgb(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => digits.to_string(),
    };
    let channel = |i: usize| {
        expanded
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(0), channel(2), channel(4))
}

fn text_style(size: f64, color: &RGBColor) -> TextStyle<'static> {
    (FONT, size).into_font().color(color)
}

fn raster_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Raster(e.to_string())
}

fn chart_panel<'a>(root: &Area<'a>, y: u32, palette: &Palette) -> Result<Area<'a>, ExportError> {
    panel(root, (PADDING, y), (REGION_WIDTH_PX - 2 * PADDING, CHART_HEIGHT), palette)
}

fn heading(root: &Area, y: u32, text: &str, palette: &Palette) -> Result<(), ExportError> {
    let style = text_style(22.0, &palette.text).pos(Pos::new(HPos::Left, VPos::Top));
    root.draw_text(text, &style, (PADDING as i32, y as i32))
        .map_err(raster_err)
}

/// Bordered paper panel, returned as its own drawing area.
fn panel<'a>(
    root: &Area<'a>,
    (x, y): (u32, u32),
    (width, height): (u32, u32),
    palette: &Palette,
) -> Result<Area<'a>, ExportError> {
    let area = root.clone().shrink((x, y), (width, height));
    area.fill(&palette.paper).map_err(raster_err)?;
    area.draw(&Rectangle::new(
        [(0, 0), (width as i32 - 1, height as i32 - 1)],
        palette.border.stroke_width(1),
    ))
    .map_err(raster_err)?;
    Ok(area)
}

/// Integer-only axis: returns `(max, step)` with at most five intervals.
pub fn integer_axis(max_value: u32) -> (u32, u32) {
    let top = max_value.max(1);
    let step = top.div_ceil(5).max(1);
    (top.div_ceil(step) * step, step)
}
