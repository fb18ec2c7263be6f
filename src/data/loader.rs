use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{
    AGE_GROUP, CATEGORY, Dataset, FREQUENCY_LABEL, PAYMENT_METHOD, PURCHASE_AMOUNT,
    PURCHASE_FREQUENCY, REQUIRED_COLUMNS, REVIEW_RATING, Record, SEASON, TOTAL_PURCHASE_AMOUNT,
};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset through the process-wide cache.
pub fn load(path: &Path) -> Result<Arc<Dataset>, DashboardError> {
    DatasetCache::global().get_or_load(path)
}

/// Load a dataset from a file, bypassing the cache.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the required columns (default)
/// * `.json`    – `[{ "Category": "...", "Age Group": "...", ... }, ...]`
/// * `.parquet` – one column per field; numeric columns of any numeric type
pub fn load_file(path: &Path) -> Result<Dataset, DashboardError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        "" => {
            log::warn!("{} has no extension, reading it as CSV", path.display());
            load_csv(path)
        }
        other => Err(anyhow::anyhow!("unsupported file extension: .{other}")),
    };

    loaded.map_err(|e| DashboardError::data_unavailable(path, &e))
}

// ---------------------------------------------------------------------------
// Memoized datasets
// ---------------------------------------------------------------------------

/// Parsed datasets keyed by canonical path.
///
/// Only successful loads are cached. Entries live until [`DatasetCache::clear`]
/// or [`DatasetCache::evict`].
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static DatasetCache {
        static CACHE: OnceLock<DatasetCache> = OnceLock::new();
        CACHE.get_or_init(DatasetCache::new)
    }

    /// Return the cached dataset for `path` or read it from disk.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>, DashboardError> {
        let key = cache_key(path);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = entries.get(&key) {
            log::debug!("dataset cache hit for {}", key.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(path)?);
        log::info!("Loaded {} records from {}", dataset.len(), key.display());
        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(&cache_key(path))
    }

    /// Drop one cached dataset so the next load re-reads the file.
    pub fn evict(&self, path: &Path) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&cache_key(path)).is_some()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: Vec<&str> = present.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one transaction per row.
/// Columns beyond the required ones are ignored.
fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

pub(crate) fn read_csv<R: std::io::Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(headers.iter())?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<Record>().enumerate() {
        // +2: one-based and the header line.
        let record = result.with_context(|| format!("CSV line {}", row_no + 2))?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Category": "Clothing", "Age Group": "18-25", "Season": "Winter", ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

pub(crate) fn read_json(text: &str) -> Result<Dataset> {
    let root: serde_json::Value = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;
    if rows.is_empty() {
        // No row means no columns at all.
        check_columns(std::iter::empty())?;
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        check_columns(obj.keys().map(String::as_str)).with_context(|| format!("Row {i}"))?;
        let record: Record =
            serde_json::from_value(row.clone()).with_context(|| format!("Row {i}"))?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per record field.
///
/// String columns may be Utf8 or LargeUtf8; numeric columns may be any
/// integer or float type and are cast to Float64. Works with files written
/// by both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    check_columns(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(batch_records(&batch, records.len())?);
    }

    Ok(Dataset::from_records(records))
}

fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<Record>> {
    let category = string_column(batch, CATEGORY)?;
    let age_group = string_column(batch, AGE_GROUP)?;
    let season = string_column(batch, SEASON)?;
    let payment_method = string_column(batch, PAYMENT_METHOD)?;
    let frequency_label = string_column(batch, FREQUENCY_LABEL)?;
    let review_rating = float_column(batch, REVIEW_RATING)?;
    let purchase_amount = float_column(batch, PURCHASE_AMOUNT)?;
    let purchase_frequency = float_column(batch, PURCHASE_FREQUENCY)?;
    let total_purchase_amount = float_column(batch, TOTAL_PURCHASE_AMOUNT)?;

    let strings = [&category, &age_group, &season, &payment_method, &frequency_label];
    let floats = [
        &review_rating,
        &purchase_amount,
        &purchase_frequency,
        &total_purchase_amount,
    ];

    (0..batch.num_rows())
        .map(|row| {
            if strings.iter().any(|c| c.is_null(row)) || floats.iter().any(|c| c.is_null(row)) {
                bail!("Row {}: null value in a required column", offset + row);
            }
            let text = |c: &ArrayRef| c.as_string::<i32>().value(row).to_string();
            let number = |c: &ArrayRef| c.as_primitive::<Float64Type>().value(row);
            Ok(Record {
                category: text(&category),
                age_group: text(&age_group),
                season: text(&season),
                review_rating: number(&review_rating),
                purchase_amount: number(&purchase_amount),
                purchase_frequency: number(&purchase_frequency),
                total_purchase_amount: number(&total_purchase_amount),
                payment_method: text(&payment_method),
                frequency_label: text(&frequency_label),
            })
        })
        .collect()
}

// -- Parquet / Arrow helpers --

/// Column `name` cast to Utf8.
fn string_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    typed_column(batch, name, &DataType::Utf8)
}

/// Column `name` cast to Float64.
fn float_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))?;
    if !col.data_type().is_numeric() {
        bail!("column '{name}' is {:?}, expected a numeric type", col.data_type());
    }
    typed_column(batch, name, &DataType::Float64)
}

fn typed_column(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))?;
    cast(col.as_ref(), to)
        .with_context(|| format!("column '{name}': cannot read {:?} as {to:?}", col.data_type()))
}
