use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{
    Record, AGE_GROUP, CATEGORY, FREQUENCY_LABEL, PAYMENT_METHOD, PURCHASE_AMOUNT,
    PURCHASE_FREQUENCY, REVIEW_RATING, SEASON, TOTAL_PURCHASE_AMOUNT,
};

/// Write records as CSV with the standard column headers.
pub fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for r in records {
        writer.serialize(r).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write records as a single-batch Parquet file, one column per field.
pub fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let strings = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    let floats = |f: fn(&Record) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(CATEGORY, DataType::Utf8, false),
        Field::new(AGE_GROUP, DataType::Utf8, false),
        Field::new(SEASON, DataType::Utf8, false),
        Field::new(REVIEW_RATING, DataType::Float64, false),
        Field::new(PURCHASE_AMOUNT, DataType::Float64, false),
        Field::new(PURCHASE_FREQUENCY, DataType::Float64, false),
        Field::new(TOTAL_PURCHASE_AMOUNT, DataType::Float64, false),
        Field::new(PAYMENT_METHOD, DataType::Utf8, false),
        Field::new(FREQUENCY_LABEL, DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(|r| &r.category),
            strings(|r| &r.age_group),
            strings(|r| &r.season),
            floats(|r| r.review_rating),
            floats(|r| r.purchase_amount),
            floats(|r| r.purchase_frequency),
            floats(|r| r.total_purchase_amount),
            strings(|r| &r.payment_method),
            strings(|r| &r.frequency_label),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::{record, Dataset};

    fn records() -> Vec<Record> {
        vec![
            record("Clothing", "18-25", "Winter", 100.0),
            record("Footwear", "56-65", "Spring", 12.5),
        ]
    }

    #[test]
    fn parquet_files_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.parquet");
        write_parquet(&path, &records()).unwrap();
        assert_eq!(load_file(&path).unwrap(), Dataset::from_records(records()));
    }

    #[test]
    fn csv_files_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.csv");
        write_csv(&path, &records()).unwrap();
        assert_eq!(load_file(&path).unwrap(), Dataset::from_records(records()));
    }
}
