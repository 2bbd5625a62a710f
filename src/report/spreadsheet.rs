use crate::report::error::ReportError;
use crate::types::observation::Observation;
use rust_xlsxwriter::{Format, Workbook};

pub const SHEET_NAME: &str = "last_48h";
pub const SPREADSHEET_COLUMNS: [&str; 3] = ["timestamp", "temperature_2m", "relative_humidity_2m"];

/// One sheet, one row per observation in ascending time order. Missing
/// readings are left as empty cells.
pub fn render_spreadsheet(rows: &[Observation]) -> Result<Vec<u8>, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoData);
    }
    let mut ordered: Vec<&Observation> = rows.iter().collect();
    ordered.sort_by_key(|o| o.timestamp);

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in SPREADSHEET_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (i, obs) in ordered.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, obs.canonical_timestamp())?;
        if let Some(temperature) = obs.temperature {
            sheet.write_number(row, 1, temperature)?;
        }
        if let Some(humidity) = obs.humidity {
            sheet.write_number(row, 2, humidity)?;
        }
    }
    sheet.set_column_width(0, 28)?;
    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(2, 22)?;

    Ok(workbook.save_to_buffer()?)
}
