use crate::report::error::ReportError;
use crate::report::series::ChartSeries;
use crate::types::observation::Observation;
use log::debug;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

pub const CHART_TITLE: &str = "Weather Data (Last 48 Hours)";
const CHART_SIZE: (u32, u32) = (1000, 450);
const TEMPERATURE_LABEL: &str = "Temperature (°C)";
const HUMIDITY_LABEL: &str = "Humidity (%)";

/// Renders the dual-axis chart as an SVG image.
pub fn render_chart_image(rows: &[Observation]) -> Result<Vec<u8>, ReportError> {
    let series = ChartSeries::from_observations(rows)?;
    Ok(render_chart_svg(&series)?.into_bytes())
}

/// Temperature on the left axis as a solid red line, humidity on the right
/// axis as a dashed blue line. Gaps in either series stay gaps.
pub fn render_chart_svg(series: &ChartSeries) -> Result<String, ReportError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_TITLE, ("sans-serif", 22))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .right_y_label_area_size(60)
            .build_cartesian_2d(series.x_range(), series.temperature_range.clone())
            .map_err(chart_error)?
            .set_secondary_coord(series.x_range(), series.humidity_range.clone());

        let hour_label = |h: &f64| series.hour_label(*h);
        chart
            .configure_mesh()
            .x_desc("Time (UTC)")
            .y_desc(TEMPERATURE_LABEL)
            .x_labels(8)
            .x_label_formatter(&hour_label)
            .draw()
            .map_err(chart_error)?;
        chart
            .configure_secondary_axes()
            .y_desc(HUMIDITY_LABEL)
            .draw()
            .map_err(chart_error)?;

        for (i, segment) in series.temperature.iter().enumerate() {
            let drawn = chart
                .draw_series(LineSeries::new(
                    segment.iter().copied(),
                    RED.stroke_width(2),
                ))
                .map_err(chart_error)?;
            if i == 0 {
                drawn.label(TEMPERATURE_LABEL).legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2))
                });
            }
        }

        for (i, segment) in series.humidity.iter().enumerate() {
            let drawn = chart
                .draw_secondary_series(DashedLineSeries::new(
                    segment.iter().copied(),
                    6,
                    4,
                    BLUE.stroke_width(2),
                ))
                .map_err(chart_error)?;
            if i == 0 {
                drawn.label(HUMIDITY_LABEL).legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2))
                });
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;
        root.present().map_err(chart_error)?;
    }

    debug!(
        "Rendered chart for {} ({} bytes of SVG)",
        series.range_label(),
        svg.len()
    );
    Ok(svg)
}

fn chart_error<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart(e.to_string())
}
