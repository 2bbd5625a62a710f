//! PDF export.
//!
//! The page carries the same SVG chart the HTML views show, embedded as a
//! form XObject. Built-in PDF fonts only cover Latin-1, so the page text
//! sticks to ASCII.

use crate::report::chart::{render_chart_svg, CHART_TITLE};
use crate::report::error::ReportError;
use crate::report::series::ChartSeries;
use crate::types::observation::Observation;
use crate::types::timestamp::canonical_timestamp;
use log::debug;
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt, Svg, SvgTransform};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN_LEFT: f32 = 20.0;

/// Resolution the chart's pixel size is read at; 1000 px comes out ~176 mm wide.
const CHART_DPI: f32 = 144.0;
/// Bottom edge of the chart, just under the summary paragraph.
const CHART_BOTTOM: f32 = 145.0;

/// Letter-size report: title, a location and range summary, then the chart.
pub fn render_pdf(rows: &[Observation]) -> Result<Vec<u8>, ReportError> {
    let series = ChartSeries::from_observations(rows)?;
    let chart = Svg::parse(&render_chart_svg(&series)?).map_err(pdf_error)?;

    let (doc, page, layer) =
        PdfDocument::new(CHART_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
    let layer = doc.get_page(page).get_layer(layer);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    layer.use_text(CHART_TITLE, 18.0, Mm(MARGIN_LEFT), Mm(255.0), &bold);
    let summary = [
        format!(
            "Location: latitude {}, longitude {}",
            series.location.lat(),
            series.location.lon()
        ),
        format!(
            "Range (UTC): {} to {}",
            canonical_timestamp(&series.start),
            canonical_timestamp(&series.end)
        ),
        format!("Observations: {}", rows.len()),
        "Temperature (deg C): solid red, left axis. Humidity (%): dashed blue, right axis."
            .to_string(),
    ];
    for (i, line) in summary.iter().enumerate() {
        let y = 243.0 - 6.0 * i as f32;
        layer.use_text(line.as_str(), 11.0, Mm(MARGIN_LEFT), Mm(y), &regular);
    }

    chart.into_xobject(&layer).add_to_layer(
        &layer,
        SvgTransform {
            translate_x: Some(Pt::from(Mm(MARGIN_LEFT))),
            translate_y: Some(Pt::from(Mm(CHART_BOTTOM))),
            dpi: Some(CHART_DPI),
            ..Default::default()
        },
    );

    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    debug!("Rendered PDF report ({} bytes)", bytes.len());
    Ok(bytes)
}

fn pdf_error<E: std::fmt::Debug>(e: E) -> ReportError {
    ReportError::Pdf(format!("{e:?}"))
}
