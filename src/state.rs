use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::loader::load_file;
use crate::data::model::CustomerTable;
use crate::data::pipeline::{self, DashboardFrame, EDUCATION, MARITAL_STATUS, Selections};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until a file loads successfully).
    pub table: Option<CustomerTable>,

    /// File the table was read from.
    pub source: Option<PathBuf>,

    /// Widget values; the only state kept between runs.
    pub selections: Selections,

    /// Output of the last successful pipeline run. A failed run keeps the
    /// previous frame so its widgets stay on screen.
    pub frame: Option<DashboardFrame>,

    pub education_colors: ColorMap,
    pub marital_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            source: None,
            selections: Selections::default(),
            frame: None,
            education_colors: ColorMap::default(),
            marital_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load, prepare and ingest a data file. Failures end up in
    /// `status_message` and leave the previous table in place.
    pub fn load_path(&mut self, path: &Path) {
        match read_table(path) {
            Ok(table) => {
                if table.is_empty() {
                    log::warn!("{} contains no customers", path.display());
                }
                log::info!(
                    "Loaded {} customers with columns {:?}",
                    table.len(),
                    table.column_names()
                );
                self.source = Some(path.to_path_buf());
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a prepared table, reset widgets and run the pipeline.
    pub fn set_table(&mut self, table: CustomerTable) {
        self.education_colors = ColorMap::new(&table.unique_values(EDUCATION).unwrap_or_default());
        self.marital_colors =
            ColorMap::new(&table.unique_values(MARITAL_STATUS).unwrap_or_default());
        self.selections = Selections::default();
        self.frame = None;
        self.table = Some(table);
        self.status_message = None;
        self.rerun();
    }

    /// Re-run the whole filter chain against the current widget values.
    pub fn rerun(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        match pipeline::run(table, &mut self.selections) {
            Ok(frame) => {
                self.frame = Some(frame);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Dashboard run failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

fn read_table(path: &Path) -> Result<CustomerTable> {
    let mut table = load_file(path)?;
    pipeline::prepare(&mut table)?;
    Ok(table)
}
