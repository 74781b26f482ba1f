// file: src/exporter/csv.rs
// description: csv rendering and file export for scraped organization rows
// reference: https://docs.rs/csv

use crate::error::{Result, ScraperError};
use crate::models::OrgRow;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const HEADER: [&str; 2] = ["Organization Name", "Email Address"];
pub const HEADER_WITH_DESCRIPTION: [&str; 3] =
    ["Organization Name", "Email Address", "Description"];

pub const FILE_NAME: &str = "rso_emails.csv";
pub const FILE_NAME_WITH_DESCRIPTION: &str = "rso_emails_and_descriptions.csv";

#[derive(Debug, Clone)]
pub struct CsvExporter {
    include_description: bool,
    file_name: Option<String>,
}

impl CsvExporter {
    pub fn new(include_description: bool) -> Self {
        Self {
            include_description,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn file_name(&self) -> &str {
        match &self.file_name {
            Some(name) => name,
            None if self.include_description => FILE_NAME_WITH_DESCRIPTION,
            None => FILE_NAME,
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        if self.include_description {
            &HEADER_WITH_DESCRIPTION
        } else {
            &HEADER
        }
    }

    /// Bare header line, then every field quoted with inner quotes doubled.
    pub fn render(&self, rows: &[OrgRow]) -> Result<String> {
        let mut header = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        header.write_record(self.header())?;
        let buffer = header
            .into_inner()
            .map_err(|e| ScraperError::Io(e.into_error()))?;

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(buffer);

        for row in rows {
            if self.include_description {
                let description = row.description.as_deref().unwrap_or_default();
                writer.write_record([row.name.as_str(), row.email.as_str(), description])?;
            } else {
                writer.write_record([row.name.as_str(), row.email.as_str()])?;
            }
        }

        let buffer = writer
            .into_inner()
            .map_err(|e| ScraperError::Io(e.into_error()))?;

        String::from_utf8(buffer)
            .map_err(|e| ScraperError::Validation(format!("CSV output is not UTF-8: {}", e)))
    }

    /// Renders everything in memory, then writes `<output_dir>/<file_name>` in one go.
    pub fn export(&self, rows: &[OrgRow], output_dir: &Path) -> Result<PathBuf> {
        let csv = self.render(rows)?;

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(self.file_name());
        fs::write(&path, csv)?;

        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_two_column_render() {
        let rows = vec![
            OrgRow::new("Alpha Club", "foo@uw.edu"),
            OrgRow::new("Beta League", ""),
        ];

        let csv = CsvExporter::new(false).render(&rows).unwrap();
        assert_eq!(
            csv,
            "Organization Name,Email Address\n\"Alpha Club\",\"foo@uw.edu\"\n\"Beta League\",\"\"\n"
        );
    }

    #[test]
    fn test_three_column_render() {
        let rows = vec![
            OrgRow::new("Alpha Club", "foo@uw.edu").with_description("A tech club."),
            OrgRow::new("Beta League", "").with_description(""),
        ];

        let csv = CsvExporter::new(true).render(&rows).unwrap();
        assert_eq!(
            csv,
            "Organization Name,Email Address,Description\n\
             \"Alpha Club\",\"foo@uw.edu\",\"A tech club.\"\n\
             \"Beta League\",\"\",\"\"\n"
        );
    }

    #[test]
    fn test_quotes_are_doubled() {
        let rows = vec![OrgRow::new("The \"Best\" Club", "")];
        let csv = CsvExporter::new(false).render(&rows).unwrap();
        assert!(csv.ends_with("\"The \"\"Best\"\" Club\",\"\"\n"));
    }

    #[test]
    fn test_commas_and_newlines_stay_inside_quotes() {
        let rows = vec![OrgRow::new("Chess, Go & More", "").with_description("line one\nline two")];
        let csv = CsvExporter::new(true).render(&rows).unwrap();
        assert!(csv.ends_with("\"Chess, Go & More\",\"\",\"line one\nline two\"\n"));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Chess, Go & More");
        assert_eq!(&record[2], "line one\nline two");
    }

    #[test]
    fn test_empty_rows_render_header_only() {
        let csv = CsvExporter::new(false).render(&[]).unwrap();
        assert_eq!(csv, "Organization Name,Email Address\n");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(CsvExporter::new(false).file_name(), "rso_emails.csv");
        assert_eq!(
            CsvExporter::new(true).file_name(),
            "rso_emails_and_descriptions.csv"
        );
        assert_eq!(
            CsvExporter::new(true)
                .with_file_name(Some("clubs.csv".to_string()))
                .file_name(),
            "clubs.csv"
        );
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("exports");
        let rows = vec![OrgRow::new("Alpha Club", "foo@uw.edu")];

        let path = CsvExporter::new(false).export(&rows, &out).unwrap();
        assert_eq!(path, out.join("rso_emails.csv"));

        let written = fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            "Organization Name,Email Address\n\"Alpha Club\",\"foo@uw.edu\"\n"
        );
    }
}
