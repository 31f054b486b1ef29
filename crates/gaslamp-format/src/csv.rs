//! CSV output format.

use gaslamp_types::{TimeSeries, format_timestamp};
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
///
/// Timestamps keep the offset the server reported them with.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_series<W: Write>(&self, series: &TimeSeries, mut writer: W) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}value")?;
        }

        for record in series {
            writeln!(writer, "{}{d}{}", format_timestamp(&record.timestamp), record.value)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaslamp_types::{HistoryRecord, parse_timestamp};

    fn create_test_series() -> TimeSeries {
        [
            ("2013-01-01T00:00:00.000-05:00", 21.5),
            ("2013-01-01T00:15:00.000-05:00", 22.0),
        ]
        .into_iter()
        .map(|(ts, value)| HistoryRecord::new(parse_timestamp(ts).unwrap(), value))
        .collect()
    }

    fn render(formatter: &CsvFormatter, series: &TimeSeries) -> String {
        let mut output = Vec::new();
        formatter.write_series(series, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_csv_series() {
        let result = render(&CsvFormatter::new(), &create_test_series());
        assert_eq!(
            result,
            "timestamp,value\n\
             2013-01-01T00:00:00.000-05:00,21.5\n\
             2013-01-01T00:15:00.000-05:00,22\n"
        );
    }

    #[test]
    fn test_csv_no_header() {
        let result = render(&CsvFormatter::new().with_header(false), &create_test_series());
        assert!(!result.contains("timestamp,value"));
        assert_eq!(result.lines().count(), 2);
    }

    #[test]
    fn test_csv_empty_series() {
        assert_eq!(render(&CsvFormatter::new(), &TimeSeries::new()), "timestamp,value\n");
    }

    #[test]
    fn test_tsv() {
        let formatter = CsvFormatter::tsv();
        let result = render(&formatter, &create_test_series());
        assert!(result.starts_with("timestamp\tvalue\n"));
        assert_eq!(formatter.extension(), "tsv");
        assert_eq!(CsvFormatter::new().with_delimiter(';').extension(), "csv");
    }
}
