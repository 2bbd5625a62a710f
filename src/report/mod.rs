//! Renders a window of stored observations as a chart, a spreadsheet or a PDF.
//!
//! Every renderer fails with [`error::ReportError::NoData`] on an empty window.

pub mod chart;
pub mod error;
pub mod html;
pub mod pdf;
pub mod series;
pub mod spreadsheet;
