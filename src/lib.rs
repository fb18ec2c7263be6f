//! Consumer shopping trends dashboard.
//!
//! The [`data`] layer loads, filters and aggregates the dataset; [`view`]
//! turns a selection into chart specifications; the egui front end in
//! [`app`] and [`ui`] draws them.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
pub mod view;

pub use error::DashboardError;
