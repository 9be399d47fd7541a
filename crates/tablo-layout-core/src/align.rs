//! Alignment, distribution and grid arrangement of the selection.
//!
//! Every command works on the selected layers, skipping name and position labels when anything
//! else is selected (labels follow their image through coupling). Results are position updates
//! with coupled partners included; the caller commits them.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::cluster::{ROW_THRESHOLD, cluster_sorted};
use crate::grid::GridSettings;
use crate::layers::{Layer, LayerId, median};
use crate::model::{LayoutModel, PositionUpdates};
use crate::selection::Selection;

/// Spacing added to the largest image when arranging without a grid.
const FREE_ARRANGE_GAP: f64 = 20.0;

/// Edge or center line to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignEdge {
    Left,
    Right,
    Top,
    Bottom,
    /// Common vertical center line (x of the centers).
    CenterHorizontal,
    /// Common horizontal center line (y of the centers).
    CenterVertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

fn operands<'a>(model: &'a LayoutModel, selection: &Selection) -> Vec<&'a Layer> {
    let selected = selection.selected_layers(model);
    let primary: Vec<&Layer> = selected.iter().copied().filter(|l| !l.category.is_label()).collect();
    if primary.is_empty() { selected } else { primary }
}

fn finish(model: &LayoutModel, targets: Vec<(LayerId, Point)>) -> PositionUpdates {
    model.plan_moves(&targets)
}

/// Align the selection to a common edge or center line. Needs two layers.
pub fn align(model: &LayoutModel, selection: &Selection, edge: AlignEdge) -> Option<PositionUpdates> {
    let layers = operands(model, selection);
    if layers.len() < 2 {
        return None;
    }
    let bounds: Vec<_> = layers.iter().map(|l| l.effective_bounds()).collect();
    let min_of = |f: fn(&Rect) -> f64| bounds.iter().map(f).fold(f64::INFINITY, f64::min);
    let max_of = |f: fn(&Rect) -> f64| bounds.iter().map(f).fold(f64::NEG_INFINITY, f64::max);
    let mean_of = |f: fn(&Rect) -> f64| bounds.iter().map(f).sum::<f64>() / bounds.len() as f64;

    let targets = match edge {
        AlignEdge::Left => {
            let x = min_of(|r| r.x0);
            layers.iter().map(|l| (l.id, Point::new(x, l.origin().y))).collect()
        }
        AlignEdge::Right => {
            let right = max_of(|r| r.x1);
            layers
                .iter()
                .map(|l| (l.id, Point::new(right - l.width(), l.origin().y)))
                .collect()
        }
        AlignEdge::Top => {
            let y = min_of(|r| r.y0);
            layers.iter().map(|l| (l.id, Point::new(l.origin().x, y))).collect()
        }
        AlignEdge::Bottom => {
            let bottom = max_of(|r| r.y1);
            layers
                .iter()
                .map(|l| (l.id, Point::new(l.origin().x, bottom - l.height())))
                .collect()
        }
        AlignEdge::CenterHorizontal => {
            let cx = mean_of(|r| r.center().x);
            layers
                .iter()
                .map(|l| (l.id, Point::new(cx - l.width() / 2.0, l.origin().y)))
                .collect()
        }
        AlignEdge::CenterVertical => {
            let cy = mean_of(|r| r.center().y);
            layers
                .iter()
                .map(|l| (l.id, Point::new(l.origin().x, cy - l.height() / 2.0)))
                .collect()
        }
    };

    log::debug!("Align {:?}: {} layer(s)", edge, layers.len());
    Some(finish(model, targets))
}

/// Space the selection evenly between its first and last member. Needs three layers.
pub fn distribute(model: &LayoutModel, selection: &Selection, axis: Axis) -> Option<PositionUpdates> {
    let mut layers = operands(model, selection);
    if layers.len() < 3 {
        return None;
    }
    let coord = |p: Point| match axis {
        Axis::Horizontal => p.x,
        Axis::Vertical => p.y,
    };
    layers.sort_by(|a, b| coord(a.origin()).total_cmp(&coord(b.origin())));

    let first = coord(layers[0].origin());
    let last = coord(layers[layers.len() - 1].origin());
    let step = (last - first) / (layers.len() - 1) as f64;

    let targets = layers
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let value = first + step * i as f64;
            let origin = l.origin();
            let target = match axis {
                Axis::Horizontal => Point::new(value, origin.y),
                Axis::Vertical => Point::new(origin.x, value),
            };
            (l.id, target)
        })
        .collect();

    log::debug!("Distribute {:?}: {} layer(s), step {}", axis, layers.len(), step);
    Some(finish(model, targets))
}

/// Lay the selected images out on a regular grid, reading order preserved.
///
/// Uses the group's grid pitch and column count when the grid is enabled, otherwise a square-ish
/// layout spaced by the largest image plus a fixed gap.
pub fn arrange_to_grid(model: &LayoutModel, selection: &Selection, grid: &GridSettings) -> Option<PositionUpdates> {
    let images: Vec<&Layer> = selection
        .selected_layers(model)
        .into_iter()
        .filter(|l| l.category.is_image())
        .collect();
    if images.len() < 2 {
        return None;
    }

    let origin = Point::new(
        images.iter().map(|l| l.origin().x).fold(f64::INFINITY, f64::min),
        images.iter().map(|l| l.origin().y).fold(f64::INFINITY, f64::min),
    );

    let group_grid = images[0]
        .category
        .group()
        .filter(|_| grid.enabled)
        .and_then(|g| grid.grid_for(g, model));
    let (cols, pitch) = match group_grid {
        Some(g) => (g.cols, g.pitch),
        None => {
            let cols = (images.len() as f64).sqrt().ceil() as usize;
            let max_w = images.iter().map(|l| l.width()).fold(0.0, f64::max);
            let max_h = images.iter().map(|l| l.height()).fold(0.0, f64::max);
            (cols, Size::new(max_w + FREE_ARRANGE_GAP, max_h + FREE_ARRANGE_GAP))
        }
    };
    let cols = cols.max(1);

    let ordered: Vec<&Layer> = cluster_sorted(images, |l| l.origin().y, ROW_THRESHOLD)
        .into_iter()
        .flat_map(|mut row| {
            row.sort_by(|a, b| a.origin().x.total_cmp(&b.origin().x));
            row
        })
        .collect();

    let targets = ordered
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let (row, col) = (i / cols, i % cols);
            let target = Point::new(
                origin.x + col as f64 * pitch.width,
                origin.y + row as f64 * pitch.height,
            );
            (l.id, target)
        })
        .collect();

    log::debug!("Arrange {} image(s) in {} column(s)", ordered.len(), cols);
    Some(finish(model, targets))
}

/// Snap layers sharing a row to the row's top. Needs two layers.
pub fn align_rows(model: &LayoutModel, selection: &Selection, threshold: f64) -> Option<PositionUpdates> {
    let layers = operands(model, selection);
    if layers.len() < 2 {
        return None;
    }

    let mut targets = Vec::new();
    for row in cluster_sorted(layers, |l| l.origin().y, threshold) {
        if row.len() < 2 {
            continue;
        }
        let top = row.iter().map(|l| l.origin().y).fold(f64::INFINITY, f64::min);
        targets.extend(row.iter().map(|l| (l.id, Point::new(l.origin().x, top))));
    }
    Some(finish(model, targets))
}

/// Snap layers sharing a column to the column's left edge. Needs two layers.
pub fn align_columns(model: &LayoutModel, selection: &Selection) -> Option<PositionUpdates> {
    let layers = operands(model, selection);
    if layers.len() < 2 {
        return None;
    }
    let widths: Vec<f64> = layers.iter().map(|l| l.width()).collect();
    let threshold = median(&widths).map_or(ROW_THRESHOLD, |w| (w / 2.0).max(ROW_THRESHOLD));

    let mut targets = Vec::new();
    for column in cluster_sorted(layers, |l| l.origin().x, threshold) {
        if column.len() < 2 {
            continue;
        }
        let left = column.iter().map(|l| l.origin().x).fold(f64::INFINITY, f64::min);
        targets.extend(column.iter().map(|l| (l.id, Point::new(left, l.origin().y))));
    }
    Some(finish(model, targets))
}
