use std::collections::BTreeSet;
use std::fmt;

use super::model::{Dataset, Dimension, Record};

/// Label of the age-group option that disables the age filter.
pub const ALL_AGE_GROUPS: &str = "All";

// ---------------------------------------------------------------------------
// Filter predicate: selected categories and an optional age group
// ---------------------------------------------------------------------------

/// Age-group half of the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum AgeGroupFilter {
    #[default]
    All,
    Only(String),
}

impl AgeGroupFilter {
    pub fn matches(&self, age_group: &str) -> bool {
        match self {
            AgeGroupFilter::All => true,
            AgeGroupFilter::Only(selected) => selected == age_group,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AgeGroupFilter::All => ALL_AGE_GROUPS,
            AgeGroupFilter::Only(selected) => selected,
        }
    }
}

impl From<&str> for AgeGroupFilter {
    fn from(value: &str) -> Self {
        if value == ALL_AGE_GROUPS {
            AgeGroupFilter::All
        } else {
            AgeGroupFilter::Only(value.to_string())
        }
    }
}

impl fmt::Display for AgeGroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user picked in the side panel.
///
/// An empty category set is legal and selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub age_group: AgeGroupFilter,
}

impl FilterSelection {
    pub fn new<I, S>(categories: I, age_group: impl Into<AgeGroupFilter>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSelection {
            categories: categories.into_iter().map(Into::into).collect(),
            age_group: age_group.into(),
        }
    }

    /// Every category and all age groups: the initial selection.
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            categories: dataset.distinct(Dimension::Category).into_iter().collect(),
            age_group: AgeGroupFilter::All,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.categories.contains(&record.category) && self.age_group.matches(&record.age_group)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – rows passing the current selection
// ---------------------------------------------------------------------------

/// Read-only subset of a dataset, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Dataset row indices of the visible records.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records()[i])
    }
}

/// Apply the selection to every record.
///
/// A record is kept when its category is selected and the age filter is
/// "All" or equals its age group exactly. An age group that never occurs
/// yields an empty view.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Clothing", "18-25", "Winter", 100.0),
            record("Shoes", "26-35", "Summer", 50.0),
            record("Clothing", "26-35", "Spring", 70.0),
            record("Accessories", "18-25", "Winter", 20.0),
        ])
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = dataset();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.indices(), &[0, 1, 2, 3]);
        let rows: Vec<&Record> = view.records().collect();
        assert_eq!(rows, ds.records().iter().collect::<Vec<_>>());
    }

    #[test]
    fn categories_and_age_group_combine() {
        let ds = dataset();
        let sel = FilterSelection::new(["Clothing", "Accessories"], "18-25");
        let view = filter(&ds, &sel);
        assert_eq!(view.indices(), &[0, 3]);
        assert!(view.records().all(|r| sel.categories.contains(&r.category)));
    }

    #[test]
    fn empty_categories_yield_empty_view() {
        let ds = dataset();
        let sel = FilterSelection::new(Vec::<String>::new(), ALL_AGE_GROUPS);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn unknown_age_group_yields_empty_view() {
        let ds = dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.age_group = AgeGroupFilter::from("99-120");
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn all_sentinel_maps_to_no_age_filter() {
        assert_eq!(AgeGroupFilter::from("All"), AgeGroupFilter::All);
        assert_eq!(
            AgeGroupFilter::from("18-25"),
            AgeGroupFilter::Only("18-25".to_string())
        );
        assert_eq!(AgeGroupFilter::All.to_string(), "All");
    }
}
