use crate::domain::model::{RawOfferRecord, TrainingRow};
use crate::utils::error::{HousingError, Result};
use std::io::Read;
use std::path::PathBuf;

pub const REQUIRED_COLUMNS: [&str; 3] = ["rooms", "area_m2", "price_total_zl"];

const AREA_RANGE: (f64, f64) = (10.0, 500.0);
const PRICE_RANGE: (f64, f64) = (100_000.0, 5_000_000.0);
const MAX_ROOMS: f64 = 10.0;

/// Counts of rows read and dropped, by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub missing_values: usize,
    pub unparsable_price: usize,
    pub out_of_range: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub price_range: (f64, f64),
    pub area_range: (f64, f64),
    pub rooms_range: (f64, f64),
}

impl DatasetSummary {
    pub fn from_rows(rows: &[TrainingRow]) -> Option<Self> {
        let first = rows.first()?;
        let init = (
            (first.price_total_zl, first.price_total_zl),
            (first.area_m2, first.area_m2),
            (first.rooms, first.rooms),
        );
        let (price_range, area_range, rooms_range) =
            rows.iter().fold(init, |(p, a, r), row| {
                (
                    (p.0.min(row.price_total_zl), p.1.max(row.price_total_zl)),
                    (a.0.min(row.area_m2), a.1.max(row.area_m2)),
                    (r.0.min(row.rooms), r.1.max(row.rooms)),
                )
            });

        Some(Self {
            rows: rows.len(),
            price_range,
            area_range,
            rooms_range,
        })
    }
}

/// Parses a price such as `"800 000"`, `"800,000"` or `"800000"`.
///
/// Whitespace and commas are thousands separators and are stripped before parsing.
/// Returns `None` for anything that is not a finite number afterwards.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    parse_number(&cleaned)
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

pub fn in_training_range(row: &TrainingRow) -> bool {
    row.area_m2 > AREA_RANGE.0
        && row.area_m2 < AREA_RANGE.1
        && row.price_total_zl > PRICE_RANGE.0
        && row.price_total_zl < PRICE_RANGE.1
        && row.rooms > 0.0
        && row.rooms <= MAX_ROOMS
}

enum RowOutcome {
    Keep(TrainingRow),
    Missing,
    BadPrice,
    OutOfRange,
}

fn clean_record(record: &RawOfferRecord) -> RowOutcome {
    let (Some(rooms), Some(area), Some(price)) = (
        present(&record.rooms),
        present(&record.area_m2),
        present(&record.price_total_zl),
    ) else {
        return RowOutcome::Missing;
    };

    let Some(price_total_zl) = parse_price(price) else {
        return RowOutcome::BadPrice;
    };

    let (Some(rooms), Some(area_m2)) = (parse_number(rooms), parse_number(area)) else {
        return RowOutcome::Missing;
    };

    let row = TrainingRow {
        rooms,
        area_m2,
        price_total_zl,
    };
    if in_training_range(&row) {
        RowOutcome::Keep(row)
    } else {
        RowOutcome::OutOfRange
    }
}

pub fn clean_records<R: Read>(reader: R) -> Result<(Vec<TrainingRow>, CleaningReport)> {
    // short rows count as missing values instead of aborting the whole load
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(HousingError::DataFormat {
            message: format!("missing required column(s): {}", missing.join(", ")),
        });
    }

    let mut rows = Vec::new();
    let mut report = CleaningReport::default();

    for result in csv_reader.deserialize::<RawOfferRecord>() {
        let record = result?;
        report.rows_read += 1;
        match clean_record(&record) {
            RowOutcome::Keep(row) => rows.push(row),
            RowOutcome::Missing => report.missing_values += 1,
            RowOutcome::BadPrice => report.unparsable_price += 1,
            RowOutcome::OutOfRange => report.out_of_range += 1,
        }
    }

    Ok((rows, report))
}

#[derive(Debug, Clone)]
pub struct DatasetLoader {
    path: PathBuf,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads, cleans and range-filters the offers CSV, keeping source order.
    pub fn load_data(&self) -> Result<Vec<TrainingRow>> {
        if !self.path.exists() {
            return Err(HousingError::DataSourceMissing {
                path: self.path.display().to_string(),
            });
        }

        let file = std::fs::File::open(&self.path)?;
        let (rows, report) = clean_records(file)?;

        tracing::debug!(
            "Cleaning {}: read {}, dropped {} missing, {} bad price, {} out of range",
            self.path.display(),
            report.rows_read,
            report.missing_values,
            report.unparsable_price,
            report.out_of_range
        );

        match DatasetSummary::from_rows(&rows) {
            Some(summary) => {
                tracing::info!("Loaded {} apartments from CSV", summary.rows);
                tracing::info!(
                    "Price range: {:.0} - {:.0} PLN",
                    summary.price_range.0,
                    summary.price_range.1
                );
                tracing::info!(
                    "Area range: {:.1} - {:.1} m²",
                    summary.area_range.0,
                    summary.area_range.1
                );
                tracing::info!(
                    "Rooms range: {} - {}",
                    summary.rooms_range.0,
                    summary.rooms_range.1
                );
            }
            None => tracing::warn!("No apartments left after cleaning {}", self.path.display()),
        }

        Ok(rows)
    }
}
