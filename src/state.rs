use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::Palettes;
use crate::data::filter::{AgeGroupFilter, FilterSelection};
use crate::data::loader::DatasetCache;
use crate::data::model::{Dataset, Dimension};
use crate::view::{render, ChartData, Tab, ViewModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Current category / age-group selection.
    pub selection: FilterSelection,

    /// Charts for the current selection (recomputed on change).
    pub view: Option<ViewModel>,

    /// Options offered by the side panel, in first-appearance order.
    pub categories: Vec<String>,
    pub age_groups: Vec<String>,

    /// Stable colours per column value.
    pub palettes: Palettes,

    pub active_tab: Tab,

    /// Age-group animation of the scatter chart.
    pub animation: ScatterAnimation,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` through `cache` and show it, or keep the error for display.
    pub fn open(&mut self, cache: &DatasetCache, path: &Path) {
        match cache.get_or_load(path) {
            Ok(dataset) => {
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached copy of the current file and read it again.
    pub fn reload(&mut self, cache: &DatasetCache) {
        if let Some(path) = self.source.clone() {
            cache.evict(&path);
            self.open(cache, &path);
        }
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::all(&dataset);
        self.categories = dataset.distinct(Dimension::Category);
        self.age_groups = dataset.distinct(Dimension::AgeGroup);
        self.palettes = Palettes::for_dataset(&dataset);
        self.animation = ScatterAnimation::default();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the view model after a selection change.
    pub fn refresh(&mut self) {
        if let Some(ds) = &self.dataset {
            let view = render(ds, &self.selection);
            self.animation.clamp(frame_count(&view));
            self.view = Some(view);
        }
    }

    /// Toggle a single category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.selection.categories.remove(category) {
            self.selection.categories.insert(category.to_string());
        }
        self.refresh();
    }

    /// Select all categories.
    pub fn select_all_categories(&mut self) {
        self.selection.categories = self.categories.iter().cloned().collect();
        self.refresh();
    }

    /// Deselect all categories.
    pub fn select_no_categories(&mut self) {
        self.selection.categories.clear();
        self.refresh();
    }

    pub fn set_age_group(&mut self, age_group: AgeGroupFilter) {
        if self.selection.age_group != age_group {
            self.selection.age_group = age_group;
            self.refresh();
        }
    }

    /// Number of age-group frames in the scatter chart.
    pub fn frame_count(&self) -> usize {
        self.view.as_ref().map(frame_count).unwrap_or(0)
    }

    /// Advance the animation if it is playing and its frame time is up.
    pub fn tick(&mut self, now: f64) -> bool {
        let frames = self.frame_count();
        self.animation.tick(now, frames)
    }
}

// ---------------------------------------------------------------------------
// Scatter animation
// ---------------------------------------------------------------------------

/// Seconds each age-group frame stays on screen while playing.
pub const FRAME_SECONDS: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScatterAnimation {
    pub frame: usize,
    pub playing: bool,
    last_step: f64,
}

impl ScatterAnimation {
    /// Move one frame forward, wrapping around.
    pub fn step(&mut self, frames: usize) {
        self.frame = if frames == 0 {
            0
        } else {
            (self.frame + 1) % frames
        };
    }

    pub fn tick(&mut self, now: f64, frames: usize) -> bool {
        if !self.playing || now - self.last_step < FRAME_SECONDS {
            return false;
        }
        self.last_step = now;
        self.step(frames);
        true
    }

    pub fn toggle(&mut self, now: f64) {
        self.playing = !self.playing;
        self.last_step = now;
    }

    /// Restart from the first frame when the current one no longer exists.
    pub fn clamp(&mut self, frames: usize) {
        if self.frame >= frames {
            self.frame = 0;
        }
    }
}

fn frame_count(view: &ViewModel) -> usize {
    view.chart("rating_vs_amount")
        .and_then(|c| match &c.data {
            ChartData::Points(frames) => Some(frames.len()),
            _ => None,
        })
        .unwrap_or(0)
}
