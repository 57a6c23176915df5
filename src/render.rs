//! Multi-panel grade distribution exhibits.
//!
//! Draws one bar-chart panel per assignment using the [`plotters`] bitmap
//! backend and saves the figure as a 1100x500 PNG. Panel order follows the
//! assignment ordinal; panel colors are sampled across a named colormap.

use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::stats::{AssignmentDistribution, ModuleSummary};

/// Errors that can occur during exhibit generation
#[derive(Debug, Error)]
pub enum ExhibitError {
    #[error("module summary has no assignments to draw")]
    NoPanels,

    #[error("failed to draw exhibit: {0}")]
    Drawing(String),
}

fn draw_err(e: impl std::fmt::Display) -> ExhibitError {
    ExhibitError::Drawing(e.to_string())
}

const FIG_SIZE: (u32, u32) = (1100, 500);
const ANNOT_X: i32 = 40;
const ANNOT_Y: i32 = 46;
const ANNOT_STEP: i32 = 14;

/// Ensures the output path ends in `.png`, trimming stray trailing dots.
pub fn normalize_img_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.ends_with(".png") {
        path.to_path_buf()
    } else {
        PathBuf::from(format!("{}.png", raw.trim_end_matches('.')))
    }
}

/// Renders the module exhibit and returns the path the PNG was written to.
pub fn render_exhibit(
    summary: &ModuleSummary,
    course_desc: &str,
    cmap: &str,
    img_path: &Path,
) -> Result<PathBuf, ExhibitError> {
    if summary.distributions.is_empty() {
        return Err(ExhibitError::NoPanels);
    }

    let out = normalize_img_path(img_path);
    let colors = colormap_colors(cmap, summary.distributions.len());

    let title = format!("{} Module {} Assignments", course_desc, summary.module);
    let title = title.trim();

    // The backend borrows the output path; drawing is scoped so the borrow
    // ends before the path is returned.
    {
        let root = BitMapBackend::new(&out, FIG_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let root = root
            .titled(title, ("sans-serif", 22).into_font().style(FontStyle::Bold))
            .map_err(draw_err)?;

        let panels = root.split_evenly((1, summary.distributions.len()));
        for ((dist, panel), color) in summary.distributions.iter().zip(&panels).zip(colors) {
            draw_panel(panel, dist, color)?;
        }

        root.present().map_err(draw_err)?;
    }

    info!(path = %out.display(), panels = summary.distributions.len(), "Exhibit written");
    Ok(out)
}

fn draw_panel<DB: DrawingBackend>(
    panel: &DrawingArea<DB, plotters::coord::Shift>,
    dist: &AssignmentDistribution,
    color: RGBColor,
) -> Result<(), ExhibitError> {
    let axis_end = dist.counts.len() as i64;
    let y_max = dist.counts.iter().copied().max().unwrap_or(0).max(1) + 1;

    let mut chart = ChartBuilder::on(panel)
        .caption(&dist.desc, ("sans-serif", 14))
        .margin(6)
        .x_label_area_size(30)
        .y_label_area_size(34)
        .build_cartesian_2d((0i64..axis_end).into_segmented(), 0u32..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("score")
        .y_desc("nbr. students")
        .axis_desc_style(("sans-serif", 11))
        .label_style(("sans-serif", 10))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(2)
                .data(dist.counts.iter().enumerate().map(|(s, n)| (s as i64, *n))),
        )
        .map_err(draw_err)?;

    let avg_desc = format!("- avg. score : {}", fmt_opt(dist.mean_of_submitted, 2));
    let min_desc = format!("- min. score : {}", fmt_opt(dist.min_of_submitted, 1));
    let max_desc = format!("- max. score : {}", fmt_opt(dist.max_of_all_present, 1));
    let lines = [
        (avg_desc, BLACK),
        (min_desc, BLACK),
        (max_desc, BLACK),
        (
            format!(
                "- non-submits: {} ({:.0}%)",
                dist.non_submission_count,
                dist.non_submission_rate * 100.0
            ),
            RED,
        ),
    ];

    for (i, (label, color)) in lines.into_iter().enumerate() {
        let style = ("sans-serif", 11)
            .into_font()
            .style(FontStyle::Bold)
            .color(&color);
        panel
            .draw(&Text::new(label, (ANNOT_X, ANNOT_Y + ANNOT_STEP * i as i32), style))
            .map_err(draw_err)?;
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

/// Anchor points (RGB) of the supported colormaps, matched to their
/// matplotlib namesakes closely enough for panel coloring.
fn colormap_anchors(name: &str) -> Option<&'static [(u8, u8, u8)]> {
    match name {
        "winter" => Some(&[(0, 0, 255), (0, 255, 128)]),
        "cool" => Some(&[(0, 255, 255), (255, 0, 255)]),
        "viridis" => Some(&[
            (68, 1, 84),
            (59, 82, 139),
            (33, 145, 140),
            (94, 201, 98),
            (253, 231, 37),
        ]),
        _ => None,
    }
}

/// Samples `n` evenly spaced colors from the named colormap. An unknown name
/// falls back to `winter` with a warning, like the original tool did.
pub fn colormap_colors(name: &str, n: usize) -> Vec<RGBColor> {
    let anchors = colormap_anchors(name).unwrap_or_else(|| {
        warn!(cmap = name, "No such colormap; using winter");
        colormap_anchors("winter").unwrap()
    });

    (0..n)
        .map(|i| {
            let t = if n <= 1 {
                0.0
            } else {
                i as f64 / (n - 1) as f64
            };
            sample(anchors, t)
        })
        .collect()
}

fn sample(anchors: &[(u8, u8, u8)], t: f64) -> RGBColor {
    let segments = anchors.len() - 1;
    let pos = t.clamp(0.0, 1.0) * segments as f64;
    let idx = (pos.floor() as usize).min(segments - 1);
    let frac = pos - idx as f64;

    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    let (a, b) = (anchors[idx], anchors[idx + 1]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}
