use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use shopping_trends::data::aggregate::{count_by_frequency_label, sum_by_age_group, sum_by_season};
use shopping_trends::data::filter::{filter, AgeGroupFilter, FilterSelection};
use shopping_trends::data::loader::{load, load_file, DatasetCache};
use shopping_trends::data::model::{Dataset, Dimension, Record};
use shopping_trends::view::{render, ChartData};
use shopping_trends::DashboardError;
use tempfile::NamedTempFile;

const HEADER: &str = "Category,Age Group,Season,Review Rating,Purchase Amount (USD),\
Purchase Frequency (Yearly),Total Purchase Amount,Preferred Payment Method,Frequency of Purchases";

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(tmp, "{HEADER}").unwrap();
    for row in rows {
        writeln!(tmp, "{row}").unwrap();
    }
    tmp.flush().unwrap();
    tmp
}

fn shop_rows() -> Vec<&'static str> {
    vec![
        "Clothing,18-25,Winter,4.1,50,2,100,PayPal,Fortnightly",
        "Shoes,26-35,Summer,3.0,25,2,50,Cash,Weekly",
        "Clothing,26-35,Fall,2.7,40,12,480,Venmo,Monthly",
        "Accessories,36-45,Winter,4.9,80,4,320,Cash,Quarterly",
        "Shoes,18-25,Spring,3.8,60,52,3120,Credit Card,Weekly",
        "Clothing,46-55,Summer,4.4,30,1,30,PayPal,Annually",
    ]
}

fn shop_dataset() -> (NamedTempFile, Arc<Dataset>) {
    let tmp = csv_file(&shop_rows());
    let ds = DatasetCache::new().get_or_load(tmp.path()).unwrap();
    (tmp, ds)
}

fn scenario_record(category: &str, age_group: &str, season: &str, total: f64) -> Record {
    Record {
        category: category.into(),
        age_group: age_group.into(),
        season: season.into(),
        review_rating: 4.0,
        purchase_amount: total,
        purchase_frequency: 1.0,
        total_purchase_amount: total,
        payment_method: "Cash".into(),
        frequency_label: "Monthly".into(),
    }
}

fn selections(ds: &Dataset) -> Vec<FilterSelection> {
    let categories = ds.distinct(Dimension::Category);
    let mut age_groups: Vec<AgeGroupFilter> = vec![AgeGroupFilter::All];
    age_groups.extend(
        ds.distinct(Dimension::AgeGroup)
            .iter()
            .map(|a| AgeGroupFilter::from(a.as_str())),
    );
    age_groups.push(AgeGroupFilter::from("99-120"));

    // Every subset of categories crossed with every age option.
    let mut out = Vec::new();
    for mask in 0..(1u32 << categories.len()) {
        let chosen: Vec<&String> = categories
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << *i) != 0)
            .map(|(_, c)| c)
            .collect();
        for age in &age_groups {
            out.push(FilterSelection {
                categories: chosen.iter().map(|c| c.to_string()).collect(),
                age_group: age.clone(),
            });
        }
    }
    out
}

#[test]
fn filtered_records_always_match_the_selection() {
    let (_tmp, ds) = shop_dataset();
    for sel in selections(&ds) {
        let view = filter(&ds, &sel);
        assert!(view.records().all(|r| sel.categories.contains(&r.category)));
        assert!(view.records().all(|r| sel.age_group.matches(&r.age_group)));
        // Order-preserving subset.
        assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        let expected = ds.records().iter().filter(|r| sel.matches(r)).count();
        assert_eq!(view.len(), expected);
    }
}

#[test]
fn full_selection_returns_the_dataset_unchanged() {
    let (_tmp, ds) = shop_dataset();
    let view = filter(&ds, &FilterSelection::all(&ds));
    let rows: Vec<Record> = view.records().cloned().collect();
    assert_eq!(rows, ds.records());
}

#[test]
fn season_keys_are_exactly_the_seasons_in_view() {
    let (_tmp, ds) = shop_dataset();
    for sel in selections(&ds) {
        let view = filter(&ds, &sel);
        let mut expected: Vec<&str> = view.records().map(|r| r.season.as_str()).collect();
        expected.sort_unstable();
        expected.dedup();
        let res = sum_by_season(view.records());
        assert_eq!(res.keys().collect::<Vec<_>>(), expected);
    }
}

#[test]
fn frequency_counts_do_not_depend_on_the_selection() {
    let (_tmp, ds) = shop_dataset();
    let baseline = count_by_frequency_label(&*ds);
    assert_eq!(baseline.get("Weekly"), Some(2.0));
    for sel in selections(&ds) {
        let vm = render(&ds, &sel);
        let Some(ChartData::Bars(counts)) = vm.chart("purchase_frequency").map(|c| &c.data)
        else {
            panic!("frequency chart missing");
        };
        assert_eq!(counts, &baseline);
    }
}

#[test]
fn scenario_a_single_category() {
    let ds = Dataset::from_records(vec![
        scenario_record("Clothing", "18-25", "Winter", 100.0),
        scenario_record("Shoes", "26-35", "Summer", 50.0),
    ]);
    let sel = FilterSelection::new(["Clothing"], "All");
    let view = filter(&ds, &sel);
    assert_eq!(view.indices(), &[0]);
    assert_eq!(
        sum_by_season(view.records()).to_map(),
        BTreeMap::from([("Winter".to_string(), 100.0)])
    );
}

#[test]
fn scenario_b_empty_categories() {
    let (_tmp, ds) = shop_dataset();
    let sel = FilterSelection::new(Vec::<String>::new(), "All");
    let view = filter(&ds, &sel);
    assert!(view.is_empty());
    assert!(sum_by_season(view.records()).is_empty());
    assert!(sum_by_age_group(view.records()).is_empty());
    assert!(count_by_frequency_label(view.records()).is_empty());
}

#[test]
fn scenario_c_unknown_age_group() {
    let (_tmp, ds) = shop_dataset();
    let mut sel = FilterSelection::all(&ds);
    sel.age_group = AgeGroupFilter::from("99-120");
    assert!(filter(&ds, &sel).is_empty());
}

#[test]
fn scenario_d_missing_category_column() {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        tmp,
        "Age Group,Season,Review Rating,Purchase Amount (USD),Purchase Frequency (Yearly),\
Total Purchase Amount,Preferred Payment Method,Frequency of Purchases"
    )
    .unwrap();
    writeln!(tmp, "18-25,Winter,4.1,50,2,100,PayPal,Fortnightly").unwrap();
    tmp.flush().unwrap();

    match load_file(tmp.path()) {
        Err(DashboardError::DataUnavailable { reason, .. }) => {
            assert!(reason.contains("Category"), "{reason}");
        }
        Ok(_) => panic!("dataset without a Category column loaded"),
    }
}

#[test]
fn missing_file_is_unavailable() {
    let err = load_file(std::path::Path::new("/no/such/processed_dataset.csv")).unwrap_err();
    assert!(matches!(err, DashboardError::DataUnavailable { .. }));
}

#[test]
fn global_load_is_memoized() {
    let tmp = csv_file(&shop_rows());
    let first = load(tmp.path()).unwrap();
    let second = load(tmp.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 6);
}

#[test]
fn json_and_csv_sources_agree() {
    let (_tmp, ds) = shop_dataset();
    let json = serde_json::to_string(ds.records()).unwrap();
    let mut tmp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    tmp.write_all(json.as_bytes()).unwrap();
    tmp.flush().unwrap();
    assert_eq!(load_file(tmp.path()).unwrap(), *ds);
}
