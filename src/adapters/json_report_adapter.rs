//! JSON report adapter implementing ReportPort.
//!
//! Serializes the typed result as-is; numbers stay numbers and formatting is
//! left to whatever consumes the file.

use std::fs;
use std::path::Path;

use crate::domain::error::FincrossError;
use crate::domain::metrics::BacktestResult;
use crate::domain::series::IndicatorSeries;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        _series: &IndicatorSeries,
        output_path: &str,
    ) -> Result<(), FincrossError> {
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| FincrossError::Io(std::io::Error::other(e.to_string())))?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(FincrossError::Io)?;
            }
        }
        fs::write(path, json).map_err(FincrossError::Io)?;

        Ok(())
    }
}
