// src/core/charts.rs

//! PNG charts for both reports.
//!
//! Charts are drawn with the plotters bitmap backend into an RGB buffer and
//! encoded to PNG in memory, nothing touches the filesystem.

use crate::core::error::{ReportError, Result};
use crate::core::models::{WeeklyColumn, WeeklyTable};
use chrono::{Datelike, NaiveDate};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Square canvas, 10x10 at 100 px per unit.
pub const CHART_SIZE: (u32, u32) = (1000, 1000);

const FONT: &str = "sans-serif";
const LEGEND_HEADING: &str = "Год";
/// Top-left of the legend block inside the plotting area, in pixels.
const LEGEND_OFFSET: (i32, i32) = (12, 10);
const LEGEND_HEADING_HEIGHT: i32 = 36;
const WEEKLY_LINE_COLOR: RGBColor = RGBColor(0x0d, 0x0d, 0xde);

/// Oldest to newest: thin and pale to thick and saturated.
const YEAR_STYLES: [(RGBColor, u32); 4] = [
    (RGBColor(0xc8, 0xc8, 0xe6), 1),
    (RGBColor(0x98, 0x98, 0xd9), 2),
    (RGBColor(0x64, 0x64, 0xd1), 3),
    (RGBColor(0x0d, 0x0d, 0xde), 4),
];

/// One smoothed line of the comparison chart, as (week, volume) points.
#[derive(Clone, Debug, PartialEq)]
pub struct YearSeries {
    pub year: u16,
    pub points: Vec<(f64, f64)>,
}

fn encode_png(rgb: &[u8], (width, height): (u32, u32)) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(rgb, width, height, ColorType::Rgb8)
        .map_err(ReportError::render)?;
    Ok(png)
}

fn render_png<F>(draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    let (width, height) = CHART_SIZE;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(ReportError::render)?;
        draw(&root)?;
        root.present().map_err(ReportError::render)?;
    }
    encode_png(&buffer, CHART_SIZE)
}

fn month_label(days_from_ce: i32) -> String {
    NaiveDate::from_num_days_from_ce_opt(days_from_ce)
        .map(|date| date.format("%m.%Y").to_string())
        .unwrap_or_default()
}

/// Series labels carry no heading of their own, so it is drawn above the label box.
fn draw_legend_heading(root: &DrawingArea<BitMapBackend<'_>, Shift>, (left, top): (i32, i32)) -> Result<()> {
    root.draw(&Text::new(
        LEGEND_HEADING,
        (left + LEGEND_OFFSET.0, top + LEGEND_OFFSET.1),
        (FONT, 28).into_text_style(root),
    ))
    .map_err(ReportError::render)
}

/// Upper bound with some headroom above the highest value.
fn y_ceiling(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Total volume per week from the start of the table through row `prev_week`.
///
/// Rows are cut by position, not by week number. Rows without a date or a total are skipped.
pub fn weekly_points(table: &WeeklyTable, prev_week: i32) -> Result<Vec<(NaiveDate, i16)>> {
    for column in [WeeklyColumn::DeltaDate, WeeklyColumn::TotalForWeek] {
        if !table.has_column(column) {
            return Err(ReportError::MissingColumn(column.name().to_string()));
        }
    }

    let row_count = usize::try_from(prev_week).map(|last| last + 1).unwrap_or(0);
    Ok(table
        .records()
        .iter()
        .take(row_count)
        .filter_map(|r| Some((r.date?, r.total_for_week?)))
        .collect())
}

pub fn render_weekly_chart(table: &WeeklyTable, prev_week: i32) -> Result<Vec<u8>> {
    let points = weekly_points(table, prev_week)?;
    let (first_date, _) = *points
        .first()
        .ok_or_else(|| ReportError::Render(format!("нет данных для графика до строки {}", prev_week)))?;

    let days: Vec<(i32, f64)> = points
        .iter()
        .map(|(date, total)| (date.num_days_from_ce(), f64::from(*total)))
        .collect();
    let x_min = days.iter().map(|(x, _)| *x).min().unwrap_or_default() - 3;
    let x_max = days.iter().map(|(x, _)| *x).max().unwrap_or_default() + 3;
    let y_min = days.iter().map(|(_, y)| *y).fold(0.0, f64::min);
    let y_max = y_ceiling(days.iter().map(|(_, y)| *y).fold(0.0, f64::max));

    let title = format!("Общая заготовка зерна с начала {}", first_date.year());

    let png = render_png(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, (FONT, 40))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(90)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(ReportError::render)?;

        chart
            .configure_mesh()
            .x_desc("Месяц")
            .y_desc("Объем(тонн)")
            .axis_desc_style((FONT, 30))
            .label_style((FONT, 22))
            .x_label_formatter(&|days| month_label(*days))
            .bold_line_style(BLACK.mix(0.2))
            .light_line_style(BLACK.mix(0.05))
            .draw()
            .map_err(ReportError::render)?;

        chart
            .draw_series(LineSeries::new(days.iter().copied(), WEEKLY_LINE_COLOR.stroke_width(3)))
            .map_err(ReportError::render)?;
        chart
            .draw_series(days.iter().map(|&point| Circle::new(point, 6, WEEKLY_LINE_COLOR.filled())))
            .map_err(ReportError::render)?;
        Ok(())
    })?;

    info!("Weekly chart rendered ({} points, {} bytes)", days.len(), png.len());
    Ok(png)
}

pub fn render_comparison_chart(series: &[YearSeries]) -> Result<Vec<u8>> {
    let all_points = || series.iter().flat_map(|s| s.points.iter());
    if all_points().next().is_none() {
        return Err(ReportError::Render("нет сглаженных значений для графика".to_string()));
    }

    let x_min = all_points().map(|(x, _)| *x).fold(f64::INFINITY, f64::min) - 1.0;
    let x_max = all_points().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max) + 1.0;
    let y_min = all_points().map(|(_, y)| *y).fold(0.0, f64::min);
    let y_max = y_ceiling(all_points().map(|(_, y)| *y).fold(0.0, f64::max));

    let title = match (series.first(), series.last()) {
        (Some(first), Some(last)) if first.year != last.year => {
            format!("Сравнение общей заготовки ({}-{})", first.year, last.year)
        }
        (Some(only), _) => format!("Общая заготовка ({})", only.year),
        _ => "Сравнение общей заготовки".to_string(),
    };

    // The newest year always gets the boldest style.
    let style_offset = YEAR_STYLES.len().saturating_sub(series.len());

    let png = render_png(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, (FONT, 40))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(90)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(ReportError::render)?;

        chart
            .configure_mesh()
            .x_desc("Неделя")
            .y_desc("Объем(тонн)")
            .axis_desc_style((FONT, 30))
            .label_style((FONT, 22))
            .x_label_formatter(&|week| format!("{:.0}", week))
            .bold_line_style(BLACK.mix(0.2))
            .light_line_style(BLACK.mix(0.05))
            .draw()
            .map_err(ReportError::render)?;

        for (i, line) in series.iter().enumerate() {
            let (color, width) = YEAR_STYLES[(style_offset + i).min(YEAR_STYLES.len() - 1)];
            chart
                .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(width)))
                .map_err(ReportError::render)?
                .label(line.year.to_string())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(width)));
            chart
                .draw_series(
                    line.points
                        .iter()
                        .map(|&point| Circle::new(point, 2 + width, color.filled())),
                )
                .map_err(ReportError::render)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::Coordinate(LEGEND_OFFSET.0, LEGEND_OFFSET.1 + LEGEND_HEADING_HEIGHT))
            .label_font((FONT, 26))
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()
            .map_err(ReportError::render)?;

        draw_legend_heading(root, chart.plotting_area().get_base_pixel())
    })?;

    info!("Comparison chart rendered ({} series, {} bytes)", series.len(), png.len());
    Ok(png)
}
