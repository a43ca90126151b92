//! Exploratory figures of a cleaned table.
//!
//! The core computes every figure as data ([`Figure`]); drawing it is left to
//! a [`PlotBackend`]. Two backends ship with the crate:
//! - [`FigureRecorder`] keeps the figures in memory
//! - [`LoggingBackend`] writes a one-line summary per panel through `tracing`

mod histogram;

pub use histogram::{
    HistogramBins, categorical_histogram, gaussian_kde, numeric_histogram, sturges_bins,
};

use crate::config::CleanerConfig;
use crate::error::Result;
use crate::profiler::ColumnClasses;
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Rotation applied to categorical x labels, in degrees.
pub const CATEGORICAL_LABEL_ROTATION: f64 = 45.0;

/// A row of panels drawn together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
}

impl Figure {
    fn row(title: &str, panels: Vec<Panel>) -> Self {
        Self {
            title: title.to_string(),
            rows: 1,
            cols: panels.len(),
            panels,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Histogram {
        column: String,
        bins: HistogramBins,
        /// Density curve scaled to counts; empty when it cannot be estimated.
        density: Vec<[f64; 2]>,
        rotate_x_labels: Option<f64>,
    },
    Scatter {
        x: String,
        y: String,
        points: ScatterPoints,
    },
}

impl Panel {
    /// Short text describing the panel.
    pub fn summary(&self) -> String {
        match self {
            Self::Histogram { column, bins, .. } => {
                format!("histogram of {} ({} bins, {} values)", column, bins.len(), bins.total())
            }
            Self::Scatter { x, y, points } => {
                format!("scatter {} vs {} ({} points)", x, y, points.len())
            }
        }
    }
}

/// Paired non-null values of two adjacent columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pairs", rename_all = "snake_case")]
pub enum ScatterPoints {
    Numeric(Vec<(f64, f64)>),
    Categorical(Vec<(String, String)>),
}

impl ScatterPoints {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(points) => points.len(),
            Self::Categorical(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Something that can draw figures.
pub trait PlotBackend {
    /// Draw one figure.
    fn render(&mut self, figure: &Figure) -> Result<()>;

    /// Called once after every figure has been rendered.
    fn show(&mut self) -> Result<()>;
}

/// Keeps rendered figures in memory.
#[derive(Debug, Default)]
pub struct FigureRecorder {
    pub figures: Vec<Figure>,
    pub shown: bool,
}

impl PlotBackend for FigureRecorder {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.shown = true;
        Ok(())
    }
}

/// Describes each panel through `tracing` instead of drawing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBackend;

impl PlotBackend for LoggingBackend {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        info!("{} ({}x{})", figure.title, figure.rows, figure.cols);
        for panel in &figure.panels {
            info!("  {}", panel.summary());
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Builds the figures for a table.
pub struct PlotPlanner<'a> {
    config: &'a CleanerConfig,
}

impl<'a> PlotPlanner<'a> {
    pub fn new(config: &'a CleanerConfig) -> Self {
        Self { config }
    }

    /// Plan every figure, skipping groups without panels.
    ///
    /// Order: numeric histograms, categorical histograms, then adjacent-pair
    /// scatter plots for numeric and for categorical columns when a group
    /// has more than two columns.
    pub fn plan(&self, df: &DataFrame) -> Result<Vec<Figure>> {
        let classes = ColumnClasses::of(df);
        let numeric = classes.numeric();
        let categorical = classes.categorical();
        let mut figures = Vec::new();

        let panels = numeric
            .iter()
            .map(|col| self.numeric_histogram_panel(df, col))
            .collect::<Result<Vec<_>>>()?;
        if !panels.is_empty() {
            figures.push(Figure::row("Numerical columns", panels));
        }

        let panels = categorical
            .iter()
            .map(|col| self.categorical_histogram_panel(df, col))
            .collect::<Result<Vec<_>>>()?;
        if !panels.is_empty() {
            figures.push(Figure::row("Categorical columns", panels));
        }

        if numeric.len() > 2 {
            let panels = numeric
                .windows(2)
                .map(|pair| numeric_scatter_panel(df, &pair[0], &pair[1]))
                .collect::<Result<Vec<_>>>()?;
            figures.push(Figure::row("Scatter plot numeric column", panels));
        }

        if categorical.len() > 2 {
            let panels = categorical
                .windows(2)
                .map(|pair| categorical_scatter_panel(df, &pair[0], &pair[1]))
                .collect::<Result<Vec<_>>>()?;
            figures.push(Figure::row("Scatter plot categorical column", panels));
        }

        Ok(figures)
    }

    fn numeric_histogram_panel(&self, df: &DataFrame, column: &str) -> Result<Panel> {
        let values = numeric_values(df.column(column)?.as_materialized_series())?;
        let bin_count = self
            .config
            .histogram_bins
            .unwrap_or_else(|| sturges_bins(values.len()));
        let bins = numeric_histogram(&values, bin_count);
        let width = match &bins {
            HistogramBins::Numeric { width, .. } => *width,
            HistogramBins::Categorical { .. } => 1.0,
        };

        Ok(Panel::Histogram {
            column: column.to_string(),
            density: gaussian_kde(&values, width, self.config.kde_points),
            bins,
            rotate_x_labels: None,
        })
    }

    fn categorical_histogram_panel(&self, df: &DataFrame, column: &str) -> Result<Panel> {
        let values = string_values(df, column)?;
        let bins = categorical_histogram(values.iter().flatten().map(String::as_str));
        let density = match &bins {
            HistogramBins::Categorical { counts, .. } => counts
                .iter()
                .enumerate()
                .map(|(idx, count)| [idx as f64, *count as f64])
                .collect(),
            HistogramBins::Numeric { .. } => Vec::new(),
        };

        Ok(Panel::Histogram {
            column: column.to_string(),
            bins,
            density,
            rotate_x_labels: Some(CATEGORICAL_LABEL_ROTATION),
        })
    }
}

fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn numeric_scatter_panel(df: &DataFrame, x: &str, y: &str) -> Result<Panel> {
    let xs = df.column(x)?.as_materialized_series().cast(&DataType::Float64)?;
    let ys = df.column(y)?.as_materialized_series().cast(&DataType::Float64)?;
    let points = xs
        .f64()?
        .into_iter()
        .zip(ys.f64()?)
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect();

    Ok(Panel::Scatter {
        x: x.to_string(),
        y: y.to_string(),
        points: ScatterPoints::Numeric(points),
    })
}

fn categorical_scatter_panel(df: &DataFrame, x: &str, y: &str) -> Result<Panel> {
    let points = string_values(df, x)?
        .into_iter()
        .zip(string_values(df, y)?)
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect();

    Ok(Panel::Scatter {
        x: x.to_string(),
        y: y.to_string(),
        points: ScatterPoints::Categorical(points),
    })
}
