//! Parity plot of predicted versus measured Eseg
//!
//! [`ParityFigure`] holds everything needed to draw the figure, so callers
//! can inspect or tweak it before rendering to SVG.

use std::collections::BTreeMap;
use std::path::Path;

use plotters::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::dataset::Table;
use crate::errors::{EsegError, Result};
use crate::features::{TrainingData, HOST_COLUMN};
use crate::pipeline::MODEL_DESCRIPTION;

/// Column added to the working copy of the table for plotting
pub const PREDICTED_COLUMN: &str = "predicted_Eseg";

/// Number of points on the parity reference line
const PARITY_POINTS: usize = 50;

const FONT: &str = "sans-serif";

/// Host entries per legend row
const LEGEND_COLUMNS: usize = 2;
const LEGEND_COLUMN_WIDTH: i32 = 110;
const LINE_HEIGHT: i32 = 16;

/// Matplotlib's default color cycle
const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Points for one host metal, in dataset row order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HostGroup {
    pub host: String,
    /// (actual, predicted)
    pub points: Vec<(f64, f64)>,
}

impl HostGroup {
    pub fn label(&self) -> String {
        format!("{} Host", self.host)
    }
}

/// Renderable parity plot
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParityFigure {
    /// Groups sorted by host name
    pub groups: Vec<HostGroup>,
    /// Evenly spaced values from the smallest to the largest actual Eseg
    pub parity_line: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: Vec<String>,
    pub width: u32,
    pub height: u32,
}

impl ParityFigure {
    /// Lay out the figure from the table, in-sample predictions and LOOCV-MAE
    pub fn build(table: &Table, predictions: &[f64], loocv_mae: f64) -> Result<Self> {
        let working = table.with_numeric_column(PREDICTED_COLUMN, predictions.to_vec())?;
        let actual = TrainingData::from_table(&working)?.targets;
        let predicted = working.numeric(PREDICTED_COLUMN)?;
        let hosts = working.labels(HOST_COLUMN)?;

        let mut grouped: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
        for ((host, &y), &y_hat) in hosts.into_iter().zip(&actual).zip(predicted) {
            grouped.entry(host).or_default().push((y, y_hat));
        }
        let groups = grouped
            .into_iter()
            .map(|(host, points)| HostGroup { host, points })
            .collect();

        let (lo, hi) = actual
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| {
                (lo.min(y), hi.max(y))
            });
        if !lo.is_finite() || !hi.is_finite() {
            return Err(EsegError::TooFewRows { needed: 1, got: 0 });
        }

        Ok(Self {
            groups,
            parity_line: linspace(lo, hi, PARITY_POINTS),
            x_label: "E_seg,DFT (eV)".to_string(),
            y_label: "E_seg,model (eV)".to_string(),
            legend_title: vec![
                MODEL_DESCRIPTION.to_string(),
                format!("LOOCV-MAE= {loocv_mae:.3} eV"),
            ],
            width: 640,
            height: 480,
        })
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Number of plotted points across all groups
    pub fn point_count(&self) -> usize {
        self.groups.iter().map(|g| g.points.len()).sum()
    }

    /// Axis limits with a 5% margin, shared by both axes
    fn axis_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .groups
            .iter()
            .flat_map(|g| g.points.iter())
            .flat_map(|&(y, y_hat)| [y, y_hat])
            .chain(self.parity_line.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 };
        (lo - pad, hi + pad)
    }

    /// Render to an SVG document held in memory
    pub fn render_svg_string(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let backend = SVGBackend::with_string(&mut svg, (self.width, self.height));
            self.draw(backend.into_drawing_area())?;
        }
        Ok(svg)
    }

    /// Render to an SVG file
    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        {
            let backend = SVGBackend::new(path, (self.width, self.height));
            self.draw(backend.into_drawing_area())?;
        }
        info!("Parity plot saved to {}", path.display());
        Ok(())
    }

    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, plotters::coord::Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(plot_err)?;

        let (lo, hi) = self.axis_range();
        let margin: u32 = 15;
        let y_label_area: u32 = 60;
        let mut chart = ChartBuilder::on(&root)
            .margin(margin)
            .x_label_area_size(45)
            .y_label_area_size(y_label_area)
            .build_cartesian_2d(lo..hi, lo..hi)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .axis_desc_style((FONT, 14))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(LineSeries::new(
                self.parity_line.iter().map(|&v| (v, v)),
                &BLACK,
            ))
            .map_err(plot_err)?;

        for (idx, group) in self.groups.iter().enumerate() {
            let color = TAB10[idx % TAB10.len()];
            chart
                .draw_series(
                    group
                        .points
                        .iter()
                        .map(move |&point| Circle::new(point, 4, color.mix(0.8).filled())),
                )
                .map_err(plot_err)?;
        }

        // Frameless legend in the upper left of the plotting area
        let legend_x = (margin + y_label_area + 12) as i32;
        let legend_y = margin as i32 + 8;
        for (line, text) in self.legend_title.iter().enumerate() {
            root.draw(&Text::new(
                text.as_str(),
                (legend_x, legend_y + LINE_HEIGHT * line as i32),
                (FONT, 13).into_font(),
            ))
            .map_err(plot_err)?;
        }

        let entries_y = legend_y + LINE_HEIGHT * self.legend_title.len() as i32 + 4;
        for (idx, group) in self.groups.iter().enumerate() {
            let color = TAB10[idx % TAB10.len()];
            let (dx, dy) = legend_slot(idx);
            let (x, y) = (legend_x + dx, entries_y + dy);
            root.draw(&Circle::new((x + 4, y + 6), 4, color.mix(0.8).filled()))
                .map_err(plot_err)?;
            root.draw(&Text::new(
                group.label(),
                (x + 14, y),
                (FONT, 12).into_font(),
            ))
            .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
        Ok(())
    }
}

fn plot_err<E: std::fmt::Display>(err: E) -> EsegError {
    EsegError::Plot(err.to_string())
}

/// Pixel offset of the `idx`-th host entry, filling rows left to right
fn legend_slot(idx: usize) -> (i32, i32) {
    let column = (idx % LEGEND_COLUMNS) as i32;
    let row = (idx / LEGEND_COLUMNS) as i32;
    (column * LEGEND_COLUMN_WIDTH, row * LINE_HEIGHT)
}

fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
