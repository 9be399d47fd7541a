//! The layout editor: owns all editing state and is the only thing that mutates the model.

use kurbo::{Point, Rect, Size, Vec2};

use crate::align::{self, AlignEdge, Axis};
use crate::config::LayoutConfig;
use crate::drag::{DragEngine, DragOutcome, PointerDown};
use crate::history::History;
use crate::layers::{Document, Identity, Layer, LayerId, SnapshotLayer, stack_labels};
use crate::model::{LayoutExport, LayoutModel, PositionUpdates};
use crate::selection::Selection;
use crate::sort::{
    NameResolver, ReadingPattern, RemoteStrategy, ResolveError, ResolverResponse, SortEngine, SortError, SortOutcome,
    SortPlan, SortRequest,
};
use crate::viewport::Viewport;

/// Editing session for one board.
#[derive(Debug, Clone)]
pub struct LayoutEditor {
    config: LayoutConfig,
    model: LayoutModel,
    selection: Selection,
    history: History,
    viewport: Viewport,
    /// Size of the host's drawing area.
    container: Size,
    drag: DragEngine,
    sort: SortEngine,
}

impl Default for LayoutEditor {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEditor {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            drag: DragEngine::new(config.drag_threshold_px, config.swap_overlap),
            sort: SortEngine::new(config.reading_pattern, config.row_threshold),
            config,
            model: LayoutModel::new(),
            selection: Selection::new(),
            history: History::new(),
            viewport: Viewport::default(),
            container: Size::ZERO,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn model(&self) -> &LayoutModel {
        &self.model
    }

    pub fn layers(&self) -> &[Layer] {
        self.model.layers()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.model.layer(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drag(&self) -> &DragEngine {
        &self.drag
    }

    /// Replace the board. Clears selection and history, then records the loaded state.
    pub fn load_document(&mut self, document: Document, layers: &[SnapshotLayer], identities: &[Identity]) {
        self.model.load_document(document, layers, identities);
        self.selection.clear();
        self.drag.reset();
        self.sort.reset();
        self.history.clear();
        self.history.push(self.model.layers());
        self.refit();
    }

    /// Resize the drawing area.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container = Size::new(width, height);
        self.refit();
    }

    fn refit(&mut self) {
        self.viewport = match self.model.document() {
            Some(doc) => Viewport::fit(doc.size(), self.container, &self.config.chrome),
            None => Viewport::default(),
        };
    }

    /// Apply updates and record one history entry. Returns whether anything moved.
    fn commit(&mut self, updates: &PositionUpdates, label: &str) -> bool {
        let changed: PositionUpdates = updates
            .iter()
            .filter(|&(&id, &target)| self.model.layer(id).is_some_and(|l| l.origin() != target))
            .map(|(&id, &target)| (id, target))
            .collect();
        if changed.is_empty() {
            return false;
        }
        let applied = self.model.apply_positions(&changed);
        self.history.push(self.model.layers());
        log::debug!("{}: {} layer(s) updated", label, applied);
        true
    }

    fn commit_option(&mut self, updates: Option<PositionUpdates>, label: &str) -> bool {
        match updates {
            Some(updates) => self.commit(&updates, label),
            None => false,
        }
    }

    // --- Selection ---

    pub fn toggle_selection(&mut self, id: LayerId, additive: bool) {
        self.selection.toggle(&self.model, id, additive);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.model);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Replace the selection, e.g. from a marquee.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = LayerId>) {
        self.selection.select_many(&self.model, ids);
    }

    /// Extend the selection, e.g. from an additive marquee.
    pub fn add_to_selection(&mut self, ids: impl IntoIterator<Item = LayerId>) {
        self.selection.add_many(&self.model, ids);
    }

    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selection.bounds(&self.model)
    }

    pub fn selection_screen_bounds(&self) -> Option<Rect> {
        self.selection.screen_bounds(&self.model, &self.viewport)
    }

    // --- Pointer gestures ---

    pub fn pointer_down(&mut self, layer: LayerId, screen: Point, additive: bool) -> PointerDown {
        self.drag
            .pointer_down(layer, screen, additive, &self.model, &mut self.selection, &self.viewport)
    }

    pub fn pointer_move(&mut self, screen: Point) {
        self.drag.pointer_move(screen, &self.model);
    }

    /// Finish the gesture and commit its result.
    pub fn pointer_up(&mut self, screen: Point) -> DragOutcome {
        let outcome = self
            .drag
            .pointer_up(screen, &self.model, &self.config.grid, &self.config.gaps);
        if let Some(updates) = outcome.updates() {
            let label = match outcome {
                DragOutcome::Swapped { .. } => "swap",
                _ => "drag",
            };
            self.commit(updates, label);
        }
        outcome
    }

    // --- Commands ---

    pub fn align(&mut self, edge: AlignEdge) -> bool {
        let updates = align::align(&self.model, &self.selection, edge);
        self.commit_option(updates, "align")
    }

    pub fn distribute(&mut self, axis: Axis) -> bool {
        let updates = align::distribute(&self.model, &self.selection, axis);
        self.commit_option(updates, "distribute")
    }

    pub fn arrange_to_grid(&mut self) -> bool {
        let updates = align::arrange_to_grid(&self.model, &self.selection, &self.config.grid);
        self.commit_option(updates, "arrange")
    }

    pub fn align_rows(&mut self) -> bool {
        let updates = align::align_rows(&self.model, &self.selection, self.config.row_threshold);
        self.commit_option(updates, "align rows")
    }

    pub fn align_columns(&mut self) -> bool {
        let updates = align::align_columns(&self.model, &self.selection);
        self.commit_option(updates, "align columns")
    }

    /// Move the selection and its coupled labels by a document-space delta.
    pub fn nudge_selection(&mut self, dx: f64, dy: f64) -> bool {
        let delta = Vec2::new(dx, dy);
        if delta == Vec2::ZERO {
            return false;
        }
        let ids = self.model.expand_with_coupled(self.selection.ids().iter().copied());
        let updates: PositionUpdates = ids
            .iter()
            .filter_map(|&id| self.model.layer(id))
            .map(|l| (l.id, l.origin() + delta))
            .collect();
        self.commit(&updates, "nudge")
    }

    /// Put names and positions back beneath their images.
    ///
    /// Works on the selected images, or on every image when none is selected.
    pub fn restack_labels(&mut self) -> bool {
        let selected: Vec<&Layer> = self
            .selection
            .selected_layers(&self.model)
            .into_iter()
            .filter(|l| l.category.is_image())
            .collect();
        let images: PositionUpdates = if selected.is_empty() {
            self.model
                .layers()
                .iter()
                .filter(|l| l.category.is_image())
                .map(|l| (l.id, l.origin()))
                .collect()
        } else {
            selected.iter().map(|l| (l.id, l.origin())).collect()
        };

        let updates = stack_labels(self.model.layers(), &images, &self.config.gaps);
        self.commit(&updates, "restack labels")
    }

    // --- Sorting ---

    pub fn reading_pattern(&self) -> ReadingPattern {
        self.sort.pattern()
    }

    pub fn set_reading_pattern(&mut self, pattern: ReadingPattern) {
        self.sort.set_pattern(pattern);
    }

    fn commit_sort(&mut self, plan: SortPlan) -> SortOutcome {
        self.commit(&plan.updates, "sort");
        plan.outcome
    }

    /// Sort the selected images alphabetically.
    pub fn sort_alphabetical(&mut self) -> Result<SortOutcome, SortError> {
        let plan = self.sort.plan_alphabetical(&self.model, &self.selection)?;
        Ok(self.commit_sort(plan))
    }

    /// Start a remote sort. The host resolves the request and calls [`LayoutEditor::complete_sort`].
    pub fn begin_sort(&mut self, strategy: RemoteStrategy) -> Result<SortRequest, SortError> {
        self.sort.begin(&self.model, &self.selection, strategy)
    }

    /// Apply the resolver's answer to a request from [`LayoutEditor::begin_sort`].
    pub fn complete_sort(
        &mut self,
        request: &SortRequest,
        response: Result<ResolverResponse, ResolveError>,
    ) -> SortOutcome {
        let plan = self.sort.complete(request, response, &self.model);
        self.commit_sort(plan)
    }

    /// Run a remote sort end to end.
    ///
    /// Dropping the future before it finishes cancels the sort.
    pub async fn sort_with(
        &mut self,
        strategy: RemoteStrategy,
        resolver: &dyn NameResolver,
    ) -> Result<SortOutcome, SortError> {
        let request = self.begin_sort(strategy)?;
        let mut guard = CancelOnDrop(Some(&mut self.sort));
        let response = request.resolve(resolver).await;
        let Some(sort) = guard.0.take() else {
            return Ok(SortOutcome::Skipped);
        };
        let plan = sort.complete(&request, response, &self.model);
        drop(guard);
        Ok(self.commit_sort(plan))
    }

    /// Abandon an outstanding remote sort started with [`LayoutEditor::begin_sort`].
    pub fn cancel_sort(&mut self) {
        self.sort.cancel();
    }

    pub fn is_sorting(&self) -> bool {
        self.sort.is_sorting()
    }

    pub fn last_sort_outcome(&self) -> Option<&SortOutcome> {
        self.sort.last_outcome()
    }

    // --- Grid ---

    /// Flip grid snapping. Returns the new state.
    pub fn toggle_grid(&mut self) -> bool {
        self.config.grid.toggle()
    }

    pub fn grid_enabled(&self) -> bool {
        self.config.grid.enabled
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(layers) => {
                self.restore(layers);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(layers) => {
                self.restore(layers);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, layers: Vec<Layer>) {
        self.model.replace_layers(layers);
        self.selection.retain_existing(&self.model);
        self.drag.reset();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Output ---

    pub fn export_layout(&self) -> LayoutExport {
        self.model.export_layout()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.model.has_unsaved_changes()
    }
}

/// Cancels the outstanding sort unless disarmed by taking the engine back out.
struct CancelOnDrop<'a>(Option<&'a mut SortEngine>);

impl Drop for CancelOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(sort) = self.0.take() {
            sort.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKind;

    fn snap(id: u64, name: &str, path: &[&str], x: f64, y: f64, w: f64, h: f64) -> SnapshotLayer {
        SnapshotLayer {
            layer_id: id,
            layer_name: name.into(),
            group_path: path.iter().map(|s| s.to_string()).collect(),
            x,
            y,
            width: w,
            height: h,
            kind: LayerKind::Normal,
            text: None,
            justification: None,
            linked: false,
            visible: None,
        }
    }

    fn editor() -> LayoutEditor {
        let identities = vec![
            Identity {
                id: 1,
                name: "Anna".into(),
                thumbnail: None,
            },
            Identity {
                id: 2,
                name: "Bela".into(),
                thumbnail: None,
            },
        ];
        let mut editor = LayoutEditor::default();
        editor.load_document(
            Document::new(1000.0, 1000.0, 300.0),
            &[
                snap(1, "bg", &["Background"], 0.0, 0.0, 1000.0, 1000.0),
                snap(2, "a---1", &["Images", "Students"], 100.0, 100.0, 100.0, 100.0),
                snap(3, "a---1", &["Names", "Students"], 90.0, 230.0, 100.0, 20.0),
                snap(4, "b---2", &["Images", "Students"], 400.0, 100.0, 100.0, 100.0),
                snap(5, "b---2", &["Positions", "Students"], 400.0, 260.0, 100.0, 20.0),
            ],
            &identities,
        );
        editor.set_container_size(1000.0, 1000.0);
        editor
    }

    #[test]
    fn test_load_seeds_history() {
        let editor = editor();
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
        assert!(editor.viewport().is_valid());
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_nudge_and_undo() {
        let mut editor = editor();
        editor.select_many([2]);
        assert!(editor.nudge_selection(5.0, -2.0));
        assert_eq!(editor.layer(2).unwrap().origin(), Point::new(105.0, 98.0));
        assert_eq!(editor.layer(3).unwrap().origin(), Point::new(95.0, 228.0));
        assert!(editor.can_undo());

        assert!(editor.undo());
        assert_eq!(editor.layer(2).unwrap().origin(), Point::new(100.0, 100.0));
        assert!(!editor.has_unsaved_changes());
        assert!(editor.redo());
        assert_eq!(editor.layer(3).unwrap().origin(), Point::new(95.0, 228.0));
        assert!(!editor.redo());
    }

    #[test]
    fn test_repeated_align_records_once() {
        let mut editor = editor();
        editor.select_many([2, 4]);
        assert!(editor.align(AlignEdge::Left));
        assert!(!editor.align(AlignEdge::Left));
        assert!(editor.undo());
        assert_eq!(editor.layer(4).unwrap().origin(), Point::new(400.0, 100.0));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_insufficient_selection_is_noop() {
        let mut editor = editor();
        editor.select_many([2]);
        assert!(!editor.align(AlignEdge::Left));
        assert!(!editor.distribute(Axis::Horizontal));
        assert!(!editor.arrange_to_grid());
        assert!(!editor.can_undo());
        assert_eq!(editor.sort_alphabetical(), Err(SortError::NotEnoughLayers(1)));
    }

    #[test]
    fn test_restack_labels() {
        let mut editor = editor();
        assert!(editor.restack_labels());
        assert_eq!(editor.layer(3).unwrap().origin(), Point::new(100.0, 208.0));
        // No name layer for Bela: position goes 8 px below the image.
        assert_eq!(editor.layer(5).unwrap().origin(), Point::new(400.0, 208.0));
        // Already stacked: nothing to do.
        assert!(!editor.restack_labels());
    }

    #[test]
    fn test_pointer_click_toggles() {
        let mut editor = editor();
        let screen = Point::new(150.0, 150.0);
        assert_eq!(editor.pointer_down(2, screen, false), PointerDown::Started);
        assert_eq!(editor.pointer_up(screen), DragOutcome::Click);
        assert!(editor.selection().contains(2));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_toggle_grid() {
        let mut editor = editor();
        assert!(!editor.grid_enabled());
        assert!(editor.toggle_grid());
        assert!(editor.grid_enabled());
    }
}
