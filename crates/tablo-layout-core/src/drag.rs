//! Pointer gesture handling: click vs. drag, live swap preview and drop.

use kurbo::{Point, Vec2};

use crate::config::LabelGaps;
use crate::grid::GridSettings;
use crate::layers::{LayerId, stack_labels};
use crate::model::{LayoutModel, PositionUpdates};
use crate::selection::Selection;
use crate::swap::{SWAP_OVERLAP_THRESHOLD, SwapCandidate, SwapPair, find_swap_candidate, plan_swap};
use crate::viewport::Viewport;

/// Screen pixels the pointer must travel before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down but has not moved far enough yet.
    Pending,
    Dragging,
}

/// Result of pressing the pointer on a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDown {
    /// A gesture started on the selection.
    Started,
    /// Additive press on a selected layer removed it; no gesture.
    Deselected,
    /// Unknown or fixed layer.
    Ignored,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Nothing to commit.
    Ignored,
    /// Pointer never left the threshold.
    Click,
    Swapped {
        pairs: Vec<SwapPair>,
        updates: PositionUpdates,
    },
    Moved {
        updates: PositionUpdates,
    },
}

impl DragOutcome {
    /// Position updates to commit, if any.
    pub fn updates(&self) -> Option<&PositionUpdates> {
        match self {
            DragOutcome::Swapped { updates, .. } | DragOutcome::Moved { updates } => Some(updates),
            DragOutcome::Ignored | DragOutcome::Click => None,
        }
    }
}

/// State of the current pointer gesture.
///
/// The engine never mutates the model. `pointer_up` returns the updates for the caller to commit.
#[derive(Debug, Clone)]
pub struct DragEngine {
    phase: DragPhase,
    start: Point,
    viewport: Viewport,
    dragged: Vec<LayerId>,
    /// Document-space delta, rounded to whole pixels. `None` until a valid move was seen.
    delta: Option<Vec2>,
    swap: Option<SwapCandidate>,
    threshold_px: f64,
    swap_overlap: f64,
}

impl Default for DragEngine {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD_PX, SWAP_OVERLAP_THRESHOLD)
    }
}

impl DragEngine {
    pub fn new(threshold_px: f64, swap_overlap: f64) -> Self {
        Self {
            phase: DragPhase::Idle,
            start: Point::ZERO,
            viewport: Viewport::default(),
            dragged: Vec::new(),
            delta: None,
            swap: None,
            threshold_px,
            swap_overlap,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// Layers moving with the gesture (selection plus coupled partners), in model order.
    pub fn dragged_ids(&self) -> &[LayerId] {
        &self.dragged
    }

    /// Live document-space delta while dragging.
    pub fn preview_delta(&self) -> Option<Vec2> {
        match self.phase {
            DragPhase::Dragging => self.delta,
            _ => None,
        }
    }

    /// Live swap preview while dragging.
    pub fn swap_candidate(&self) -> Option<&SwapCandidate> {
        match self.phase {
            DragPhase::Dragging => self.swap.as_ref(),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.dragged.clear();
        self.delta = None;
        self.swap = None;
    }

    /// Press on `layer` at screen position `screen`.
    pub fn pointer_down(
        &mut self,
        layer: LayerId,
        screen: Point,
        additive: bool,
        model: &LayoutModel,
        selection: &mut Selection,
        viewport: &Viewport,
    ) -> PointerDown {
        self.reset();

        let Some(target) = model.layer(layer) else {
            return PointerDown::Ignored;
        };
        if target.category.is_fixed() {
            return PointerDown::Ignored;
        }

        if selection.contains(layer) {
            if additive {
                selection.remove(layer);
                return PointerDown::Deselected;
            }
        } else {
            selection.toggle(model, layer, additive);
        }

        self.dragged = model.expand_with_coupled(selection.ids().iter().copied());
        self.start = screen;
        self.viewport = *viewport;
        self.phase = DragPhase::Pending;
        PointerDown::Started
    }

    /// Pointer moved to `screen`. Updates the preview only.
    pub fn pointer_move(&mut self, screen: Point, model: &LayoutModel) {
        if self.phase == DragPhase::Idle {
            return;
        }

        let screen_delta = screen - self.start;
        if self.phase == DragPhase::Pending {
            if screen_delta.hypot() < self.threshold_px {
                return;
            }
            self.phase = DragPhase::Dragging;
        }

        let Some(doc_delta) = self.viewport.screen_delta_to_doc(screen_delta) else {
            return;
        };
        let delta = Vec2::new(doc_delta.x.round(), doc_delta.y.round());
        self.delta = Some(delta);
        self.swap = find_swap_candidate(model, &self.dragged, delta, self.swap_overlap);
    }

    /// Release at `screen`. Returns what to commit and ends the gesture.
    pub fn pointer_up(
        &mut self,
        screen: Point,
        model: &LayoutModel,
        grid: &GridSettings,
        gaps: &LabelGaps,
    ) -> DragOutcome {
        self.pointer_move(screen, model);
        let outcome = self.finish(model, grid, gaps);
        self.reset();
        outcome
    }

    fn finish(&self, model: &LayoutModel, grid: &GridSettings, gaps: &LabelGaps) -> DragOutcome {
        match self.phase {
            DragPhase::Idle => return DragOutcome::Ignored,
            DragPhase::Pending => return DragOutcome::Click,
            DragPhase::Dragging => {}
        }

        if let Some(candidate) = &self.swap {
            let updates = plan_swap(model, candidate);
            log::debug!("Swapping {} pair(s)", candidate.pairs.len());
            return DragOutcome::Swapped {
                pairs: candidate.pairs.clone(),
                updates,
            };
        }

        let Some(delta) = self.delta else {
            return DragOutcome::Ignored;
        };
        if delta == Vec2::ZERO {
            return DragOutcome::Ignored;
        }

        let mut updates: PositionUpdates = self
            .dragged
            .iter()
            .filter_map(|&id| model.layer(id))
            .map(|l| (l.id, l.origin() + delta))
            .collect();

        if grid.enabled {
            let mut images = PositionUpdates::new();
            for layer in self.dragged.iter().filter_map(|&id| model.layer(id)) {
                if !layer.category.is_image() {
                    continue;
                }
                let moved = layer.origin() + delta;
                let snapped = grid
                    .snap_to_nearest_cell(model, moved.x, moved.y, layer.width(), layer.height(), layer.category)
                    .unwrap_or(moved);
                images.insert(layer.id, snapped);
            }
            let labels = stack_labels(model.layers(), &images, gaps);
            updates.extend(images);
            updates.extend(labels.into_iter().filter(|(id, _)| self.dragged.contains(id)));
        }

        log::debug!("Moving {} layer(s) by ({}, {})", updates.len(), delta.x, delta.y);
        DragOutcome::Moved { updates }
    }
}
