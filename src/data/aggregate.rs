use std::collections::BTreeMap;

use super::model::{Dimension, Measure, Record};

// ---------------------------------------------------------------------------
// AggregationResult – grouping key → numeric summary
// ---------------------------------------------------------------------------

/// How each group is summarised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    Sum(Measure),
    Count,
}

impl Summary {
    pub fn label(self) -> &'static str {
        match self {
            Summary::Sum(measure) => measure.column(),
            Summary::Count => "Count",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub value: f64,
}

/// Grouped sums or counts, in display order.
///
/// Keys are exactly the distinct values present in the input; a key with no
/// rows never appears.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub dimension: Dimension,
    pub summary: Summary,
    pub groups: Vec<Group>,
}

impl AggregationResult {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.groups.iter().find(|g| g.key == key).map(|g| g.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of all group values.
    pub fn total(&self) -> f64 {
        self.groups.iter().map(|g| g.value).sum()
    }

    /// Group with the largest value; the first one wins a tie.
    pub fn top(&self) -> Option<&Group> {
        self.groups
            .iter()
            .fold(None, |best: Option<&Group>, g| match best {
                Some(b) if b.value >= g.value => Some(b),
                _ => Some(g),
            })
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.groups
            .iter()
            .map(|g| (g.key.clone(), g.value))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Generic reductions
// ---------------------------------------------------------------------------

/// Sum `measure` per distinct `dimension` value. Groups are sorted by key.
pub fn sum_by<'a, I>(records: I, dimension: Dimension, measure: Measure) -> AggregationResult
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sums: BTreeMap<&'a str, f64> = BTreeMap::new();
    for r in records {
        *sums.entry(dimension.of(r)).or_insert(0.0) += measure.of(r);
    }
    AggregationResult {
        dimension,
        summary: Summary::Sum(measure),
        groups: sums
            .into_iter()
            .map(|(key, value)| Group {
                key: key.to_string(),
                value,
            })
            .collect(),
    }
}

/// Count rows per distinct `dimension` value, most frequent first.
pub fn count_by<'a, I>(records: I, dimension: Dimension) -> AggregationResult
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(dimension.of(r)).or_insert(0) += 1;
    }
    let mut groups: Vec<Group> = counts
        .into_iter()
        .map(|(key, n)| Group {
            key: key.to_string(),
            value: n as f64,
        })
        .collect();
    // Stable sort keeps ties in key order.
    groups.sort_by(|a, b| b.value.total_cmp(&a.value));
    AggregationResult {
        dimension,
        summary: Summary::Count,
        groups,
    }
}

// ---------------------------------------------------------------------------
// Dashboard reductions
// ---------------------------------------------------------------------------

/// Season → total purchase amount.
pub fn sum_by_season<'a>(records: impl IntoIterator<Item = &'a Record>) -> AggregationResult {
    sum_by(records, Dimension::Season, Measure::TotalPurchaseAmount)
}

/// Age group → total purchase amount.
pub fn sum_by_age_group<'a>(records: impl IntoIterator<Item = &'a Record>) -> AggregationResult {
    sum_by(records, Dimension::AgeGroup, Measure::TotalPurchaseAmount)
}

/// Frequency label → number of records.
///
/// The dashboard calls this with the full dataset, so the distribution does
/// not follow the active filters.
pub fn count_by_frequency_label<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> AggregationResult {
    count_by(records, Dimension::FrequencyLabel)
}

/// Category → purchase amount.
pub fn sum_purchase_by_category<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> AggregationResult {
    sum_by(records, Dimension::Category, Measure::PurchaseAmount)
}

/// Payment method → yearly purchase frequency.
pub fn purchase_frequency_by_payment_method<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> AggregationResult {
    sum_by(records, Dimension::PaymentMethod, Measure::PurchaseFrequency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{record, Dataset};

    fn dataset() -> Dataset {
        let mut weekly = record("Shoes", "26-35", "Summer", 50.0);
        weekly.frequency_label = "Weekly".to_string();
        Dataset::from_records(vec![
            record("Clothing", "18-25", "Winter", 100.0),
            weekly,
            record("Clothing", "26-35", "Winter", 25.5),
            record("Accessories", "46-55", "Fall", 10.0),
        ])
    }

    #[test]
    fn season_sums_cover_exactly_present_seasons() {
        let ds = dataset();
        let res = sum_by_season(&ds);
        assert_eq!(res.keys().collect::<Vec<_>>(), vec!["Fall", "Summer", "Winter"]);
        assert_eq!(res.get("Winter"), Some(125.5));
        assert_eq!(res.get("Spring"), None);
        assert_eq!(res.summary, Summary::Sum(Measure::TotalPurchaseAmount));
    }

    #[test]
    fn counts_are_sorted_most_frequent_first() {
        let ds = dataset();
        let res = count_by_frequency_label(&ds);
        assert_eq!(res.keys().collect::<Vec<_>>(), vec!["Monthly", "Weekly"]);
        assert_eq!(res.get("Monthly"), Some(3.0));
        assert_eq!(res.total(), 4.0);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let empty: Vec<Record> = Vec::new();
        assert!(sum_by_age_group(&empty).is_empty());
        assert!(count_by_frequency_label(&empty).is_empty());
        assert!(sum_by_season(&empty).top().is_none());
    }

    #[test]
    fn top_prefers_first_on_tie() {
        let ds = Dataset::from_records(vec![
            record("A", "18-25", "Winter", 10.0),
            record("B", "18-25", "Summer", 10.0),
        ]);
        let res = sum_purchase_by_category(&ds);
        assert_eq!(res.top().map(|g| g.key.as_str()), Some("A"));
        let pie = purchase_frequency_by_payment_method(&ds);
        assert_eq!(pie.to_map().get("Cash"), Some(&4.0));
    }
}
