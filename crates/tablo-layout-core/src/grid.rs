//! Placement grid and nearest-cell snapping.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::layers::{Document, Group, LayerCategory};
use crate::model::LayoutModel;

/// Horizontal placement of the grid inside the margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Convert centimetres to whole pixels at the given resolution.
pub fn cm_to_px(cm: f64, dpi: f64) -> f64 {
    (cm / 2.54 * dpi).round()
}

/// Grid parameters in document pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub margin_px: f64,
    /// Image width of a cell (without the gap).
    pub cell_width_px: f64,
    pub gap_h_px: f64,
    pub gap_v_px: f64,
    pub align: HorizontalAlign,
}

/// Grid parameters in centimetres, as an operator enters them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfigCm {
    pub margin_cm: f64,
    pub image_width_cm: f64,
    pub gap_h_cm: f64,
    pub gap_v_cm: f64,
    pub align: HorizontalAlign,
}

impl Default for GridConfigCm {
    fn default() -> Self {
        Self {
            margin_cm: 2.0,
            image_width_cm: 6.0,
            gap_h_cm: 2.0,
            gap_v_cm: 3.0,
            align: HorizontalAlign::Center,
        }
    }
}

impl GridConfigCm {
    pub fn to_px(&self, dpi: f64) -> GridConfig {
        GridConfig {
            margin_px: cm_to_px(self.margin_cm, dpi),
            cell_width_px: cm_to_px(self.image_width_cm, dpi),
            gap_h_px: cm_to_px(self.gap_h_cm, dpi),
            gap_v_px: cm_to_px(self.gap_v_cm, dpi),
            align: self.align,
        }
    }
}

/// A regular grid of image cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Top-left of the first cell.
    pub origin: Point,
    /// Distance between neighbouring cells (image size plus gap).
    pub pitch: Size,
    /// Image size of a cell.
    pub image_size: Size,
    pub cols: usize,
    pub rows: usize,
}

impl Grid {
    /// Build the grid for a document.
    ///
    /// `image_height` is the measured image height of the group; the cell width is used when the
    /// group has no images. Returns `None` when not even one cell fits.
    pub fn build(config: &GridConfig, document: &Document, image_height: Option<f64>) -> Option<Self> {
        let image_w = config.cell_width_px;
        if image_w <= 0.0 {
            return None;
        }
        let image_h = image_height.unwrap_or(image_w);
        if image_h <= 0.0 {
            return None;
        }

        let margin = config.margin_px;
        let avail_w = document.width_px - margin * 2.0;
        let avail_h = document.height_px - margin * 2.0;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return None;
        }

        let pitch_x = image_w + config.gap_h_px;
        let pitch_y = image_h + config.gap_v_px;
        let cols = ((avail_w + config.gap_h_px) / pitch_x).floor().max(0.0) as usize;
        let rows = ((avail_h + config.gap_v_px) / pitch_y).floor().max(0.0) as usize;
        if cols == 0 || rows == 0 {
            return None;
        }

        let grid_w = cols as f64 * image_w + (cols as f64 - 1.0) * config.gap_h_px;
        let origin_x = match config.align {
            HorizontalAlign::Left => margin,
            HorizontalAlign::Right => document.width_px - margin - grid_w,
            HorizontalAlign::Center => margin + (avail_w - grid_w) / 2.0,
        };

        Some(Self {
            origin: Point::new(origin_x.round(), margin.round()),
            pitch: Size::new(pitch_x.round(), pitch_y.round()),
            image_size: Size::new(image_w.round(), image_h.round()),
            cols,
            rows,
        })
    }

    /// Top-left of the cell at `(col, row)`.
    pub fn cell(&self, col: usize, row: usize) -> Point {
        Point::new(
            self.origin.x + col as f64 * self.pitch.width,
            self.origin.y + row as f64 * self.pitch.height,
        )
    }

    /// All cells, row-major.
    pub fn cells(&self) -> Vec<Point> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (col, row)))
            .map(|(col, row)| self.cell(col, row))
            .collect()
    }

    /// Top-left of the cell whose image center is nearest to the center of `rect`.
    pub fn snap(&self, rect: Rect) -> Option<Point> {
        let center = rect.center();
        let half = self.image_size.to_vec2() / 2.0;

        let mut best: Option<(Point, f64)> = None;
        for cell in self.cells() {
            let dist = (cell + half).distance(center);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((cell, dist));
            }
        }
        best.map(|(cell, _)| cell)
    }
}

/// Grid state of the editor: one configuration per group and a visibility/snapping toggle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub enabled: bool,
    pub student: GridConfigCm,
    pub teacher: GridConfigCm,
}

impl GridSettings {
    /// Flip the grid on or off. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn config_for(&self, group: Group) -> &GridConfigCm {
        match group {
            Group::Student => &self.student,
            Group::Teacher => &self.teacher,
        }
    }

    /// The grid of a group for the loaded document.
    pub fn grid_for(&self, group: Group, model: &LayoutModel) -> Option<Grid> {
        let document = model.document()?;
        let config = self.config_for(group).to_px(document.dpi);
        Grid::build(&config, document, model.median_image_height(group))
    }

    /// Snap a candidate rectangle to the nearest cell of its category's grid.
    pub fn snap_to_nearest_cell(
        &self,
        model: &LayoutModel,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        category: LayerCategory,
    ) -> Option<Point> {
        let grid = self.grid_for(category.group()?, model)?;
        grid.snap(Rect::from_origin_size(Point::new(x, y), Size::new(width, height)))
    }
}
