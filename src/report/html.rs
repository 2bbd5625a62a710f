use crate::report::chart::{render_chart_svg, CHART_TITLE};
use crate::report::error::ReportError;
use crate::report::series::ChartSeries;
use crate::types::observation::Observation;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
img{max-width:100%;border:1px solid #ddd}\
.meta{color:#555}form{margin:1rem 0}";

/// Standalone chart page with a location and time range header.
pub fn render_chart_page(rows: &[Observation]) -> Result<String, ReportError> {
    let series = ChartSeries::from_observations(rows)?;
    Ok(page(CHART_TITLE, &chart_section(&series, rows.len())?))
}

/// Landing page: the chart when data exists, a placeholder otherwise, plus
/// an ingest form and links to the exports.
pub fn render_index_page(rows: &[Observation]) -> Result<String, ReportError> {
    let body = match ChartSeries::from_observations(rows) {
        Ok(series) => chart_section(&series, rows.len())?,
        Err(ReportError::NoData) => placeholder(),
        Err(e) => return Err(e),
    };

    let content = format!(
        "{body}\n\
         <h2>Fetch observations</h2>\n\
         <form action=\"/weather-report\" method=\"get\">\n\
         <label>Latitude <input name=\"lat\" type=\"number\" step=\"any\" min=\"-90\" max=\"90\" required></label>\n\
         <label>Longitude <input name=\"lon\" type=\"number\" step=\"any\" min=\"-180\" max=\"180\" required></label>\n\
         <button type=\"submit\">Fetch</button>\n\
         </form>\n\
         <ul>\n\
         <li><a href=\"/chart\">Chart</a></li>\n\
         <li><a href=\"/export/excel\">Download spreadsheet</a></li>\n\
         <li><a href=\"/export/pdf\">Download PDF report</a></li>\n\
         </ul>"
    );
    Ok(page("Weather Report", &content))
}

/// Page served by `/chart` when the window is empty.
pub fn render_no_data_page() -> String {
    page(CHART_TITLE, &placeholder())
}

fn placeholder() -> String {
    format!(
        "<h1>{CHART_TITLE}</h1>\n<p>{}</p>",
        ReportError::NoData
    )
}

fn chart_section(series: &ChartSeries, count: usize) -> Result<String, ReportError> {
    let svg = render_chart_svg(series)?;
    let encoded = STANDARD.encode(svg.as_bytes());
    Ok(format!(
        "<h1>{CHART_TITLE}</h1>\n\
         <p class=\"meta\">Location: lat {lat}, lon {lon}<br>\n\
         Range (UTC): {range}<br>\n\
         Observations: {count}</p>\n\
         <img alt=\"{CHART_TITLE}\" src=\"data:image/svg+xml;base64,{encoded}\">",
        lat = series.location.lat(),
        lon = series.location.lon(),
        range = series.range_label(),
    ))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}
