//! JSON output format.

use gaslamp_types::TimeSeries;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
///
/// Each record is written as `{"timestamp": "...", "value": ...}`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_series<W: Write>(&self, series: &TimeSeries, mut writer: W) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                let records = series.records();
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, &records)?;
                } else {
                    serde_json::to_writer(&mut writer, &records)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for record in series {
                    serde_json::to_writer(&mut writer, &record)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use gaslamp_types::HistoryRecord;

    fn create_test_series(len: u32) -> TimeSeries {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        (0..len)
            .map(|i| {
                let ts = offset.with_ymd_and_hms(2013, 1, 1, 0, i * 15, 0).unwrap();
                HistoryRecord::new(ts, f64::from(i) + 0.5)
            })
            .collect()
    }

    fn render(formatter: &JsonFormatter, series: &TimeSeries) -> String {
        let mut output = Vec::new();
        formatter.write_series(series, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_json_array() {
        let result = render(&JsonFormatter::new(), &create_test_series(1));
        assert!(result.starts_with('['));
        assert!(result.contains("\"value\":0.5"));

        let parsed: Vec<HistoryRecord> = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed, create_test_series(1).records());
    }

    #[test]
    fn test_json_empty_series() {
        assert_eq!(render(&JsonFormatter::new(), &TimeSeries::new()), "[]\n");
        assert_eq!(render(&JsonFormatter::ndjson(), &TimeSeries::new()), "");
    }

    #[test]
    fn test_ndjson() {
        let result = render(&JsonFormatter::ndjson(), &create_test_series(2));
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('{'));
        assert!(lines[1].contains("\"value\":1.5"));
    }

    #[test]
    fn test_pretty_json() {
        let formatter = JsonFormatter::new().with_pretty(true);
        let result = render(&formatter, &create_test_series(1));
        assert!(result.contains('\n'));
        assert!(result.contains("  ")); // Indentation
    }

    #[test]
    fn test_style_sets_extension() {
        assert_eq!(JsonFormatter::new().extension(), "json");
        assert_eq!(JsonFormatter::new().with_style(JsonStyle::Ndjson).extension(), "ndjson");
    }
}
