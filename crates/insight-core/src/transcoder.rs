//! CSV transcoder for insight records
//!
//! Export writes one header row and one row per record. List fields are
//! joined with `;`, dates are `YYYY-MM-DD`, absent values are empty cells.
//! The document starts with a UTF-8 BOM so spreadsheet tools pick the
//! right encoding.
//!
//! Import matches columns by header name, so column order does not matter
//! and unknown columns are ignored.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use insight_persistence::{Insight, InsightData};

use crate::lookup::LookupTable;
pub use crate::validation::LIST_DELIMITER;
use crate::validation::validate_insight;

pub const UTF8_BOM: &str = "\u{feff}";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Exported columns, in order
pub const HEADERS: [&str; 33] = [
    "creationNumber",
    "subject",
    "insightId",
    "status",
    "startDate",
    "updateDate",
    "endDate",
    "type",
    "mainCategory",
    "subCategory",
    "dataCategory",
    "targetBanks",
    "logicFormula",
    "targetTables",
    "targetUsers",
    "relatedInsight",
    "revenueCategory",
    "iconType",
    "score",
    "relevancePolicy",
    "relevanceScore",
    "displayCount",
    "selectCount",
    "nextPolicy",
    "nextValue",
    "appLink",
    "externalLink",
    "teaserImage",
    "storyImages",
    "maintenanceDate",
    "maintenanceReason",
    "remarks",
    "updatedBy",
];

/// File-level import failures
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TranscodeError {
    #[error("import file is empty")]
    Empty,

    #[error("import file is invalid: {0}")]
    Invalid(String),
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn list(values: &[String]) -> String {
    values.join(&LIST_DELIMITER.to_string())
}

fn record_fields(data: &InsightData) -> [String; 33] {
    [
        data.creation_number.to_string(),
        text(&data.subject),
        text(&data.insight_id),
        text(&data.status),
        date(data.start_date),
        date(data.update_date),
        date(data.end_date),
        text(&data.insight_type),
        text(&data.main_category),
        text(&data.sub_category),
        text(&data.data_category),
        list(&data.target_banks),
        text(&data.logic_formula),
        list(&data.target_tables),
        text(&data.target_users),
        text(&data.related_insight),
        text(&data.revenue_category),
        text(&data.icon_type),
        number(data.score.map(|s| s.normalize())),
        text(&data.relevance_policy),
        text(&data.relevance_score),
        number(data.display_count),
        number(data.select_count),
        text(&data.next_policy),
        text(&data.next_value),
        text(&data.app_link),
        text(&data.external_link),
        text(&data.teaser_image),
        list(&data.story_images),
        date(data.maintenance_date),
        text(&data.maintenance_reason),
        text(&data.remarks),
        text(&data.updated_by),
    ]
}

/// Serialize records to a CSV document
pub fn write_csv(records: &[Insight]) -> anyhow::Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.as_bytes().to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(HEADERS)?;
        for record in records {
            writer.write_record(record_fields(&record.data))?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// One data row of an import file
#[derive(Debug, Clone)]
pub struct CsvRow {
    /// 1-based, header excluded
    pub number: usize,
    cells: Vec<String>,
}

impl CsvRow {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// A parsed import file
#[derive(Debug, Clone)]
pub struct CsvDocument {
    columns: HashMap<String, usize>,
    pub rows: Vec<CsvRow>,
}

/// Read an import file. Rows whose cells are all empty are dropped here.
pub fn read_csv(bytes: &[u8]) -> Result<CsvDocument, TranscodeError> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| TranscodeError::Invalid(format!("not UTF-8 ({})", e)))?;
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    if content.trim().is_empty() {
        return Err(TranscodeError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| TranscodeError::Invalid(e.to_string()))?;

    let mut columns = HashMap::new();
    for (index, name) in headers.iter().enumerate() {
        columns.entry(name.trim().to_string()).or_insert(index);
    }

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| TranscodeError::Invalid(e.to_string()))?;
        let row = CsvRow {
            number: index + 1,
            cells: record.iter().map(str::to_string).collect(),
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(CsvDocument { columns, rows })
}

impl CsvDocument {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    fn cell<'a>(&self, row: &'a CsvRow, name: &str) -> Option<&'a str> {
        self.columns
            .get(name)
            .and_then(|&index| row.cells.get(index))
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn text(&self, row: &CsvRow, name: &str) -> Option<String> {
        self.cell(row, name).map(str::to_string)
    }

    fn list(&self, row: &CsvRow, name: &str) -> Vec<String> {
        self.cell(row, name)
            .map(|v| {
                v.split(LIST_DELIMITER)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parsed<T: FromStr>(&self, row: &CsvRow, name: &str) -> Result<Option<T>, String> {
        match self.cell(row, name) {
            None => Ok(None),
            Some(v) => v
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| format!("invalid {}: {}", name, v)),
        }
    }

    /// Whole numbers that do not fit an `i32` are out of range, not invalid
    fn integer(&self, row: &CsvRow, name: &str) -> Result<Option<i32>, String> {
        let Some(v) = self.cell(row, name) else {
            return Ok(None);
        };
        let digits = v.trim().trim_start_matches(['+', '-']);
        match v.trim().parse::<i64>() {
            Ok(n) => i32::try_from(n)
                .map(Some)
                .map_err(|_| format!("{} out of range", name)),
            Err(_) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                Err(format!("{} out of range", name))
            }
            Err(_) => Err(format!("invalid {}: {}", name, v)),
        }
    }

    fn date(&self, row: &CsvRow, name: &str) -> Result<Option<NaiveDate>, String> {
        match self.cell(row, name) {
            None => Ok(None),
            Some(v) => DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(v.trim(), format).ok())
                .map(Some)
                .ok_or_else(|| format!("invalid {}: {}", name, v)),
        }
    }

    /// Parse a row into a validated insight payload.
    ///
    /// The error is the row-level reason reported in the import summary.
    pub fn parse_row(&self, row: &CsvRow, lookup: &LookupTable) -> Result<InsightData, String> {
        let creation_number = self
            .integer(row, "creationNumber")?
            .ok_or_else(|| "missing required field: creationNumber".to_string())?;

        let data = InsightData {
            creation_number,
            subject: self.text(row, "subject"),
            insight_id: self.text(row, "insightId"),
            status: self.text(row, "status"),
            start_date: self.date(row, "startDate")?,
            update_date: self.date(row, "updateDate")?,
            end_date: self.date(row, "endDate")?,
            insight_type: self.text(row, "type"),
            main_category: self.text(row, "mainCategory"),
            sub_category: self.text(row, "subCategory"),
            data_category: self.text(row, "dataCategory"),
            target_banks: self.list(row, "targetBanks"),
            logic_formula: self.text(row, "logicFormula"),
            target_tables: self.list(row, "targetTables"),
            target_users: self.text(row, "targetUsers"),
            related_insight: self.text(row, "relatedInsight"),
            revenue_category: self.text(row, "revenueCategory"),
            icon_type: self.text(row, "iconType"),
            score: self.parsed::<Decimal>(row, "score")?,
            relevance_policy: self.text(row, "relevancePolicy"),
            relevance_score: self.text(row, "relevanceScore"),
            display_count: self.integer(row, "displayCount")?,
            select_count: self.integer(row, "selectCount")?,
            next_policy: self.text(row, "nextPolicy"),
            next_value: self.text(row, "nextValue"),
            app_link: self.text(row, "appLink"),
            external_link: self.text(row, "externalLink"),
            teaser_image: self.text(row, "teaserImage"),
            story_images: self.list(row, "storyImages"),
            maintenance_date: self.date(row, "maintenanceDate")?,
            maintenance_reason: self.text(row, "maintenanceReason"),
            remarks: self.text(row, "remarks"),
            updated_by: self.text(row, "updatedBy"),
        };

        validate_insight(data, lookup).map_err(|e| e.to_string())
    }
}
