use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Dataset, Record, REQUIRED_COLUMNS};

const ROW_HEIGHT: f32 = 18.0;

/// Table of the visible rows, one column per record field.
pub fn filtered_rows(ui: &mut Ui, dataset: &Dataset, visible: &[usize]) {
    ui.label(format!("{} rows", visible.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(60.0), REQUIRED_COLUMNS.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in REQUIRED_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                let Some(record) = dataset.get(visible[row.index()]) else {
                    return;
                };
                for cell in cells(record) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

/// Display strings in [`REQUIRED_COLUMNS`] order.
fn cells(r: &Record) -> [String; 9] {
    [
        r.category.clone(),
        r.age_group.clone(),
        r.season.clone(),
        format!("{:.1}", r.review_rating),
        format!("{:.2}", r.purchase_amount),
        format!("{:.0}", r.purchase_frequency),
        format!("{:.2}", r.total_purchase_amount),
        r.payment_method.clone(),
        r.frequency_label.clone(),
    ]
}
