use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names as they appear in the processed dataset
// ---------------------------------------------------------------------------

pub const CATEGORY: &str = "Category";
pub const AGE_GROUP: &str = "Age Group";
pub const SEASON: &str = "Season";
pub const REVIEW_RATING: &str = "Review Rating";
pub const PURCHASE_AMOUNT: &str = "Purchase Amount (USD)";
pub const PURCHASE_FREQUENCY: &str = "Purchase Frequency (Yearly)";
pub const TOTAL_PURCHASE_AMOUNT: &str = "Total Purchase Amount";
pub const PAYMENT_METHOD: &str = "Preferred Payment Method";
pub const FREQUENCY_LABEL: &str = "Frequency of Purchases";

/// Every column a source file must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    CATEGORY,
    AGE_GROUP,
    SEASON,
    REVIEW_RATING,
    PURCHASE_AMOUNT,
    PURCHASE_FREQUENCY,
    TOTAL_PURCHASE_AMOUNT,
    PAYMENT_METHOD,
    FREQUENCY_LABEL,
];

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// A single transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Age Group")]
    pub age_group: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Review Rating")]
    pub review_rating: f64,
    #[serde(rename = "Purchase Amount (USD)")]
    pub purchase_amount: f64,
    #[serde(rename = "Purchase Frequency (Yearly)")]
    pub purchase_frequency: f64,
    #[serde(rename = "Total Purchase Amount")]
    pub total_purchase_amount: f64,
    #[serde(rename = "Preferred Payment Method")]
    pub payment_method: String,
    #[serde(rename = "Frequency of Purchases")]
    pub frequency_label: String,
}

// ---------------------------------------------------------------------------
// Dimension / Measure – typed column access
// ---------------------------------------------------------------------------

/// A categorical column that records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Category,
    AgeGroup,
    Season,
    PaymentMethod,
    FrequencyLabel,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Category,
        Dimension::AgeGroup,
        Dimension::Season,
        Dimension::PaymentMethod,
        Dimension::FrequencyLabel,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Dimension::Category => CATEGORY,
            Dimension::AgeGroup => AGE_GROUP,
            Dimension::Season => SEASON,
            Dimension::PaymentMethod => PAYMENT_METHOD,
            Dimension::FrequencyLabel => FREQUENCY_LABEL,
        }
    }

    pub fn of(self, record: &Record) -> &str {
        match self {
            Dimension::Category => &record.category,
            Dimension::AgeGroup => &record.age_group,
            Dimension::Season => &record.season,
            Dimension::PaymentMethod => &record.payment_method,
            Dimension::FrequencyLabel => &record.frequency_label,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A numeric column that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Measure {
    ReviewRating,
    PurchaseAmount,
    PurchaseFrequency,
    TotalPurchaseAmount,
}

impl Measure {
    pub fn column(self) -> &'static str {
        match self {
            Measure::ReviewRating => REVIEW_RATING,
            Measure::PurchaseAmount => PURCHASE_AMOUNT,
            Measure::PurchaseFrequency => PURCHASE_FREQUENCY,
            Measure::TotalPurchaseAmount => TOTAL_PURCHASE_AMOUNT,
        }
    }

    pub fn of(self, record: &Record) -> f64 {
        match self {
            Measure::ReviewRating => record.review_rating,
            Measure::PurchaseAmount => record.purchase_amount,
            Measure::PurchaseFrequency => record.purchase_frequency,
            Measure::TotalPurchaseAmount => record.total_purchase_amount,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values of a column in order of first appearance.
    pub fn distinct(&self, dimension: Dimension) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .map(|r| dimension.of(r))
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) fn record(category: &str, age_group: &str, season: &str, total: f64) -> Record {
    Record {
        category: category.to_string(),
        age_group: age_group.to_string(),
        season: season.to_string(),
        review_rating: 3.5,
        purchase_amount: total / 2.0,
        purchase_frequency: 2.0,
        total_purchase_amount: total,
        payment_method: "Cash".to_string(),
        frequency_label: "Monthly".to_string(),
    }
}
