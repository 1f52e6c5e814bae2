use std::f64::consts::{FRAC_PI_2, TAU};

use anyhow::{anyhow, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::money::Amount;
use crate::report::ComparisonSeries;

const PASTEL_BLUE: RGBColor = RGBColor(0xAE, 0xC6, 0xCF);
const PASTEL_GREEN: RGBColor = RGBColor(0x77, 0xDD, 0x77);
const PASTEL_PALETTE: [RGBColor; 10] = [
    RGBColor(0xF9, 0xA7, 0xB0),
    RGBColor(0xD8, 0xBF, 0xD8),
    RGBColor(0xC3, 0xE6, 0xCB),
    RGBColor(0xF0, 0xE6, 0x8C),
    RGBColor(0xB0, 0xC4, 0xDE),
    RGBColor(0xFF, 0xB3, 0x47),
    RGBColor(0xC6, 0xE2, 0xFF),
    RGBColor(0xE0, 0xBB, 0xE4),
    RGBColor(0xB1, 0x9C, 0xD9),
    RGBColor(0xFF, 0xD1, 0xDC),
];

/// Half of a category band taken by each of its two bars
const BAR_HEIGHT: f64 = 0.4;

/// A rendered chart, opaque to the transport
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Image {
    pub(crate) file_name: String,
    pub(crate) mime: &'static str,
    pub(crate) bytes: Vec<u8>,
}

impl Image {
    fn svg(file_name: &str, svg: String) -> Image {
        Image { file_name: file_name.to_string(), mime: "image/svg+xml", bytes: svg.into_bytes() }
    }
}

/// Draws report datasets. Nothing to draw yields `None`.
pub(crate) trait ChartRenderer {
    /// Planned vs actual expenses per category as grouped horizontal bars
    fn comparison_chart(&self, series: &ComparisonSeries) -> Result<Option<Image>>;

    /// Share of each category in actual expenses as a pie
    fn share_chart(&self, shares: &[(String, Amount)]) -> Result<Option<Image>>;
}

pub(crate) struct SvgChartRenderer {
    size: (u32, u32),
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        SvgChartRenderer { size: (800, 600) }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn comparison_chart(&self, series: &ComparisonSeries) -> Result<Option<Image>> {
        if series.is_empty() {
            return Ok(None);
        }
        let mut svg = String::new();
        draw_comparison(&mut svg, self.size, series)?;
        Ok(Some(Image::svg("expenses-by-category.svg", svg)))
    }

    fn share_chart(&self, shares: &[(String, Amount)]) -> Result<Option<Image>> {
        let total = Amount::checked_sum(shares.iter().map(|(_, amount)| amount))
            .ok_or_else(|| anyhow!("Expense total is too large to chart"))?;
        if shares.is_empty() || total.cents() <= 0 {
            return Ok(None);
        }
        let mut svg = String::new();
        draw_shares(&mut svg, self.size, shares, total)?;
        Ok(Some(Image::svg("expense-categories.svg", svg)))
    }
}

fn draw_comparison(svg: &mut String, size: (u32, u32), series: &ComparisonSeries) -> Result<()> {
    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;

    let count = series.categories.len();
    let max = series.planned.iter().chain(series.actual.iter())
        .map(|amount| amount.as_f64())
        .fold(0.0, f64::max);
    let x_max = if max > 0.0 { max * 1.1 } else { 1.0 };

    // Categories sit on integer y values, each band spans one unit around it
    let mut chart = ChartBuilder::on(&root)
        .caption("Expenses by category", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(30)
        .y_label_area_size(140)
        .build_cartesian_2d(0f64..x_max, -0.5f64..(count as f64 - 0.5))?;

    let category_label = |y: &f64| {
        let index = y.round();
        if (y - index).abs() < 1e-6 && index >= 0.0 && (index as usize) < count {
            series.categories[index as usize].clone()
        } else {
            String::new()
        }
    };
    chart.configure_mesh()
        .disable_y_mesh()
        .y_labels(count)
        .y_label_formatter(&category_label)
        .draw()?;

    chart.draw_series(series.planned.iter().enumerate().map(|(i, amount)| {
        let y = i as f64;
        Rectangle::new([(0.0, y - BAR_HEIGHT), (amount.as_f64(), y)], PASTEL_BLUE.filled())
    }))?
        .label("Planned expenses")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], PASTEL_BLUE.filled()));

    chart.draw_series(series.actual.iter().enumerate().map(|(i, amount)| {
        let y = i as f64;
        Rectangle::new([(0.0, y), (amount.as_f64(), y + BAR_HEIGHT)], PASTEL_GREEN.filled())
    }))?
        .label("Expenses")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], PASTEL_GREEN.filled()));

    chart.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_shares(svg: &mut String, size: (u32, u32), shares: &[(String, Amount)], total: Amount) -> Result<()> {
    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled("Expense categories", ("sans-serif", 24))?;

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = width.min(height) as f64 * 0.35;

    // First slice starts at twelve o'clock
    let mut start = -FRAC_PI_2;
    for (i, (category, amount)) in shares.iter().enumerate() {
        let fraction = amount.as_f64() / total.as_f64();
        let sweep = fraction * TAU;
        let color = PASTEL_PALETTE[i % PASTEL_PALETTE.len()];
        area.draw(&Polygon::new(slice_points(center, radius, start, sweep), color.filled()))?;

        let middle = start + sweep / 2.0;
        let anchor = if middle.cos() < 0.0 { HPos::Right } else { HPos::Left };
        let style = TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(anchor, VPos::Center));
        let label_at = point_on_circle(center, radius * 1.1, middle);
        area.draw(&Text::new(format!("{} ({:.1}%)", category, fraction * 100.0), label_at, style))?;

        start += sweep;
    }

    root.present()?;
    Ok(())
}

fn point_on_circle(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

/// Outline of one pie slice: the center followed by points along its arc
fn slice_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / TAU) * 120.0).ceil().max(1.0) as usize;
    let mut points = vec![center];
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push(point_on_circle(center, radius, angle));
    }
    points
}
