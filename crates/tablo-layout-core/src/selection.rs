//! Layer selection.

use std::collections::HashSet;

use kurbo::Rect;

use crate::layers::{Layer, LayerId};
use crate::model::LayoutModel;
use crate::viewport::Viewport;

/// The set of selected layer ids. Fixed layers never enter it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: HashSet<LayerId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_selectable(model: &LayoutModel, id: LayerId) -> bool {
        model.layer(id).is_some_and(|l| !l.category.is_fixed())
    }

    /// Click semantics.
    ///
    /// Additive clicks toggle membership. A plain click on the only selected layer clears the
    /// selection, a plain click anywhere else selects just that layer.
    pub fn toggle(&mut self, model: &LayoutModel, id: LayerId, additive: bool) {
        if !Self::is_selectable(model, id) {
            return;
        }
        if additive {
            if !self.ids.remove(&id) {
                self.ids.insert(id);
            }
        } else if self.ids.len() == 1 && self.ids.contains(&id) {
            self.ids.clear();
        } else {
            self.ids.clear();
            self.ids.insert(id);
        }
    }

    /// Select every non-fixed layer.
    pub fn select_all(&mut self, model: &LayoutModel) {
        self.ids = model
            .layers()
            .iter()
            .filter(|l| !l.category.is_fixed())
            .map(|l| l.id)
            .collect();
    }

    /// Replace the selection (marquee).
    pub fn select_many(&mut self, model: &LayoutModel, ids: impl IntoIterator<Item = LayerId>) {
        self.ids.clear();
        self.add_many(model, ids);
    }

    /// Extend the selection (additive marquee).
    pub fn add_many(&mut self, model: &LayoutModel, ids: impl IntoIterator<Item = LayerId>) {
        self.ids
            .extend(ids.into_iter().filter(|&id| Self::is_selectable(model, id)));
    }

    pub fn remove(&mut self, id: LayerId) -> bool {
        self.ids.remove(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &HashSet<LayerId> {
        &self.ids
    }

    /// Selected layers in model order.
    pub fn selected_layers<'a>(&self, model: &'a LayoutModel) -> Vec<&'a Layer> {
        model
            .layers()
            .iter()
            .filter(|l| self.ids.contains(&l.id))
            .collect()
    }

    /// Drop ids that no longer exist (after undo/redo or reload).
    pub fn retain_existing(&mut self, model: &LayoutModel) {
        self.ids.retain(|&id| Self::is_selectable(model, id));
    }

    /// Document-space bounding box of the selection, ignoring name and position labels.
    pub fn bounds(&self, model: &LayoutModel) -> Option<Rect> {
        self.selected_layers(model)
            .into_iter()
            .filter(|l| !l.category.is_label())
            .map(Layer::effective_bounds)
            .reduce(|acc, r| acc.union(r))
    }

    /// The selection box in screen space.
    pub fn screen_bounds(&self, model: &LayoutModel, viewport: &Viewport) -> Option<Rect> {
        viewport.doc_rect_to_screen(self.bounds(model)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{Document, Identity, LayerKind, SnapshotLayer};
    use crate::viewport::ViewportChrome;
    use kurbo::Size;

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

    fn model() -> LayoutModel {
        let identities = vec![Identity {
            id: 1,
            name: "Anna".into(),
            thumbnail: None,
        }];
        let mut model = LayoutModel::new();
        model.load_document(
            Document::new(1000.0, 1000.0, 300.0),
            &[
                snap(1, "bg", &["Background"], 0.0, 0.0, 1000.0, 1000.0),
                snap(2, "anna---1", &["Images", "Students"], 100.0, 100.0, 100.0, 100.0),
                snap(3, "anna---1", &["Names", "Students"], 0.0, 900.0, 400.0, 20.0),
                snap(4, "x", &["Images", "Students"], 300.0, 400.0, 100.0, 100.0),
            ],
            &identities,
        );
        model
    }

    #[test]
    fn test_toggle_rules() {
        let model = model();
        let mut sel = Selection::new();

        sel.toggle(&model, 2, false);
        assert_eq!(sel.len(), 1);
        // Plain click on the sole selected layer clears.
        sel.toggle(&model, 2, false);
        assert!(sel.is_empty());

        sel.toggle(&model, 2, false);
        sel.toggle(&model, 4, true);
        assert_eq!(sel.len(), 2);
        sel.toggle(&model, 2, true);
        assert!(!sel.contains(2));
        assert!(sel.contains(4));

        // Plain click elsewhere replaces.
        sel.toggle(&model, 4, true);
        sel.toggle(&model, 2, true);
        sel.toggle(&model, 3, true);
        sel.toggle(&model, 4, false);
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(4));
    }

    #[test]
    fn test_fixed_never_selected() {
        let model = model();
        let mut sel = Selection::new();
        sel.toggle(&model, 1, false);
        sel.toggle(&model, 404, true);
        assert!(sel.is_empty());

        sel.select_all(&model);
        assert_eq!(sel.len(), 3);
        assert!(!sel.contains(1));

        sel.select_many(&model, [1, 2, 404]);
        assert_eq!(sel.len(), 1);
        sel.add_many(&model, [3]);
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn test_bounds_ignore_labels() {
        let model = model();
        let mut sel = Selection::new();
        sel.select_all(&model);
        assert_eq!(sel.bounds(&model), Some(Rect::new(100.0, 100.0, 400.0, 500.0)));

        sel.select_many(&model, [3]);
        assert_eq!(sel.bounds(&model), None);
    }

    #[test]
    fn test_screen_bounds() {
        let model = model();
        let mut sel = Selection::new();
        sel.select_many(&model, [2]);
        let vp = Viewport::fit(Size::new(1000.0, 1000.0), Size::new(500.0, 500.0), &ViewportChrome::default());
        let r = sel.screen_bounds(&model, &vp).unwrap();
        assert!((r.x0 - 50.0).abs() < 1e-9);
        assert!((r.width() - 50.0).abs() < 1e-9);
        assert!(sel.screen_bounds(&model, &Viewport::default()).is_none());
    }
}
