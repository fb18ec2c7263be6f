//! Selection → chart specifications.
//!
//! [`render`] is the only entry point: the UI calls it after every selection
//! change and draws whatever it returns. Nothing here touches egui.

use std::fmt;

use crate::data::aggregate::{
    count_by_frequency_label, purchase_frequency_by_payment_method, sum_by_age_group,
    sum_by_season, sum_purchase_by_category, AggregationResult, Group,
};
use crate::data::filter::{filter, FilterSelection, FilteredView};
use crate::data::model::{
    Dataset, Dimension, AGE_GROUP, CATEGORY, FREQUENCY_LABEL, PAYMENT_METHOD, PURCHASE_AMOUNT,
    PURCHASE_FREQUENCY, REVIEW_RATING, SEASON, TOTAL_PURCHASE_AMOUNT,
};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Overview,
    Seasonal,
    Customer,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Seasonal, Tab::Customer];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Seasonal => "Seasonal Analysis",
            Tab::Customer => "Customer Performance",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Tab::Overview => "1. Purchase Trends",
            Tab::Seasonal => "2. Seasonal Analysis",
            Tab::Customer => "3. Customer Performance",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Scatter,
    Pie,
}

/// Source column feeding each visual channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Channels {
    pub x: Option<&'static str>,
    pub y: Option<&'static str>,
    pub color: Option<&'static str>,
    pub size: Option<&'static str>,
    pub animation_frame: Option<&'static str>,
    pub text: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color_key: String,
}

/// Points sharing one animation-frame value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFrame {
    pub label: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bars(AggregationResult),
    Points(Vec<ScatterFrame>),
    Slices(AggregationResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    pub channels: Channels,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Dimension whose palette colours the marks.
    pub color_by: Option<Dimension>,
    pub data: ChartData,
}

impl ChartSpec {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Bars(res) | ChartData::Slices(res) => res.is_empty(),
            ChartData::Points(frames) => frames.iter().all(|f| f.points.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub tab: Tab,
    pub charts: Vec<ChartSpec>,
}

/// Highlights derived from the visible rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub visible_rows: usize,
    pub total_rows: usize,
    pub top_category: Option<Group>,
    pub top_season: Option<Group>,
    pub top_age_group: Option<Group>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub selection: FilterSelection,
    /// Dataset indices of the visible rows, in dataset order.
    pub visible: Vec<usize>,
    pub tabs: Vec<TabView>,
    pub insights: Insights,
}

impl ViewModel {
    pub fn tab(&self, tab: Tab) -> Option<&TabView> {
        self.tabs.iter().find(|t| t.tab == tab)
    }

    pub fn chart(&self, id: &str) -> Option<&ChartSpec> {
        self.tabs
            .iter()
            .flat_map(|t| t.charts.iter())
            .find(|c| c.id == id)
    }
}

/// Filter, aggregate and lay out every chart for `selection`.
pub fn render(dataset: &Dataset, selection: &FilterSelection) -> ViewModel {
    let view = filter(dataset, selection);

    let by_category = sum_purchase_by_category(view.records());
    let by_season = sum_by_season(view.records());
    let by_age_group = sum_by_age_group(view.records());

    let insights = Insights {
        visible_rows: view.len(),
        total_rows: dataset.len(),
        top_category: by_category.top().cloned(),
        top_season: by_season.top().cloned(),
        top_age_group: by_age_group.top().cloned(),
    };

    let overview = TabView {
        tab: Tab::Overview,
        charts: vec![
            ChartSpec {
                id: "category_purchases",
                title: "Purchases by Category",
                kind: ChartKind::Bar,
                channels: Channels {
                    x: Some(CATEGORY),
                    y: Some(PURCHASE_AMOUNT),
                    color: Some(CATEGORY),
                    ..Channels::default()
                },
                x_label: "Product Category",
                y_label: "Total Purchase ($)",
                color_by: Some(Dimension::Category),
                data: ChartData::Bars(by_category),
            },
            ChartSpec {
                id: "rating_vs_amount",
                title: "Rating vs Purchase Amount (by Age Group)",
                kind: ChartKind::Scatter,
                channels: Channels {
                    x: Some(REVIEW_RATING),
                    y: Some(PURCHASE_AMOUNT),
                    color: Some(CATEGORY),
                    size: Some(PURCHASE_FREQUENCY),
                    animation_frame: Some(AGE_GROUP),
                    text: None,
                },
                x_label: "Rating",
                y_label: "Total Purchase ($)",
                color_by: Some(Dimension::Category),
                data: ChartData::Points(scatter_frames(&view)),
            },
            ChartSpec {
                id: "payment_methods",
                title: "Purchase Frequency by Payment Method",
                kind: ChartKind::Pie,
                channels: Channels {
                    x: Some(PAYMENT_METHOD),
                    y: Some(PURCHASE_FREQUENCY),
                    color: Some(PAYMENT_METHOD),
                    ..Channels::default()
                },
                x_label: "",
                y_label: "",
                color_by: Some(Dimension::PaymentMethod),
                data: ChartData::Slices(purchase_frequency_by_payment_method(view.records())),
            },
        ],
    };

    let seasonal = TabView {
        tab: Tab::Seasonal,
        charts: vec![ChartSpec {
            id: "season_totals",
            title: "Total Purchase Amount by Season",
            kind: ChartKind::Bar,
            channels: Channels {
                x: Some(SEASON),
                y: Some(TOTAL_PURCHASE_AMOUNT),
                color: Some(SEASON),
                ..Channels::default()
            },
            x_label: "Season",
            y_label: "Total Purchase ($)",
            color_by: Some(Dimension::Season),
            data: ChartData::Bars(by_season),
        }],
    };

    let customer = TabView {
        tab: Tab::Customer,
        charts: vec![
            ChartSpec {
                id: "purchase_frequency",
                title: "Purchase Frequency",
                kind: ChartKind::Bar,
                channels: Channels {
                    x: Some(FREQUENCY_LABEL),
                    y: Some("Count"),
                    color: Some(FREQUENCY_LABEL),
                    text: Some("Count"),
                    ..Channels::default()
                },
                x_label: "Frequency",
                y_label: "Number of Customers",
                color_by: Some(Dimension::FrequencyLabel),
                // Always the whole dataset, whatever the selection.
                data: ChartData::Bars(count_by_frequency_label(dataset)),
            },
            ChartSpec {
                id: "age_group_totals",
                title: "Purchase Amount by Age Group",
                kind: ChartKind::Bar,
                channels: Channels {
                    x: Some(AGE_GROUP),
                    y: Some(TOTAL_PURCHASE_AMOUNT),
                    color: Some(AGE_GROUP),
                    text: Some(TOTAL_PURCHASE_AMOUNT),
                    ..Channels::default()
                },
                x_label: "Age Group",
                y_label: "Total Purchase ($)",
                color_by: Some(Dimension::AgeGroup),
                data: ChartData::Bars(by_age_group),
            },
        ],
    };

    let visible = view.into_indices();
    log::debug!(
        "rendered {} of {} rows for {:?}",
        visible.len(),
        dataset.len(),
        selection
    );

    ViewModel {
        selection: selection.clone(),
        visible,
        tabs: vec![overview, seasonal, customer],
        insights,
    }
}

/// One frame per age group, in order of first appearance in the view.
fn scatter_frames(view: &FilteredView<'_>) -> Vec<ScatterFrame> {
    let mut frames: Vec<ScatterFrame> = Vec::new();
    for r in view.records() {
        let point = ScatterPoint {
            x: r.review_rating,
            y: r.purchase_amount,
            size: r.purchase_frequency,
            color_key: r.category.clone(),
        };
        match frames.iter_mut().find(|f| f.label == r.age_group) {
            Some(frame) => frame.points.push(point),
            None => frames.push(ScatterFrame {
                label: r.age_group.clone(),
                points: vec![point],
            }),
        }
    }
    frames
}
