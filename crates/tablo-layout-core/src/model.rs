//! The layer collection of a loaded board.

use std::collections::{HashMap, HashSet};

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::layers::{
    Document, Group, Identity, IdentityDirectory, IdentityId, Layer, LayerCategory, LayerId, SnapshotLayer, median,
    normalize_sizes,
};

/// New top-left corners keyed by layer id.
pub type PositionUpdates = HashMap<LayerId, Point>;

/// Final arrangement handed to the rendering pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutExport {
    pub document: Option<Document>,
    pub layers: Vec<SnapshotLayer>,
}

impl LayoutExport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Document, editable layers and the lookup indexes built over them.
#[derive(Debug, Clone, Default)]
pub struct LayoutModel {
    document: Option<Document>,
    layers: Vec<Layer>,
    /// Invisible or empty layers, kept only for export.
    hidden: Vec<SnapshotLayer>,
    index: HashMap<LayerId, usize>,
    identity_index: HashMap<IdentityId, Vec<LayerId>>,
}

impl LayoutModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with a freshly loaded document.
    pub fn load_document(&mut self, document: Document, snapshots: &[SnapshotLayer], identities: &[Identity]) {
        let directory = IdentityDirectory::new(identities);
        let (editable, hidden): (Vec<&SnapshotLayer>, Vec<&SnapshotLayer>) =
            snapshots.iter().partition(|s| s.is_editable());

        let layers: Vec<Layer> = editable
            .into_iter()
            .map(|s| Layer::from_snapshot(s, &directory))
            .collect();

        self.document = Some(document);
        self.hidden = hidden.into_iter().cloned().collect();
        self.replace_layers(normalize_sizes(layers));

        let linked = self.layers.iter().filter(|l| l.identity.is_some()).count();
        log::info!(
            "Loaded document {}x{} @ {} dpi: {} layers ({} linked, {} hidden)",
            document.width_px,
            document.height_px,
            document.dpi,
            self.layers.len(),
            linked,
            self.hidden.len()
        );
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.index.get(&id).map(|&i| &self.layers[i])
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn hidden_layers(&self) -> &[SnapshotLayer] {
        &self.hidden
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Layers of one category in model order.
    pub fn layers_in(&self, category: LayerCategory) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(move |l| l.category == category)
    }

    /// Swap in a whole layer collection (used by undo/redo) and rebuild the indexes.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) {
        self.layers = layers;
        self.rebuild_indexes();
    }

    fn rebuild_indexes(&mut self) {
        self.index = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id, i))
            .collect();

        self.identity_index.clear();
        for layer in &self.layers {
            if let Some(identity) = layer.identity_id() {
                self.identity_index.entry(identity).or_default().push(layer.id);
            }
        }
    }

    /// Set position overrides. Unknown ids are skipped. Returns how many layers were updated.
    pub fn apply_positions(&mut self, updates: &PositionUpdates) -> usize {
        let mut applied = 0;
        for (id, origin) in updates {
            if let Some(&i) = self.index.get(id) {
                self.layers[i].position_override = Some(*origin);
                applied += 1;
            }
        }
        applied
    }

    /// Effective layout with hidden layers appended unchanged.
    pub fn export_layout(&self) -> LayoutExport {
        let layers = self
            .layers
            .iter()
            .map(Layer::to_snapshot)
            .chain(self.hidden.iter().cloned())
            .collect();
        LayoutExport {
            document: self.document,
            layers,
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.layers.iter().any(Layer::is_modified)
    }

    /// Layers that move together with `id`, in model order.
    pub fn coupled_partners(&self, id: LayerId) -> Vec<LayerId> {
        let Some(layer) = self.layer(id) else {
            return Vec::new();
        };
        let Some(identity) = layer.identity_id() else {
            return Vec::new();
        };
        let category = layer.category;

        self.identity_index
            .get(&identity)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&other| other != id)
            .filter(|&other| {
                self.layer(other)
                    .is_some_and(|l| category.is_coupled_with(l.category))
            })
            .collect()
    }

    /// The given ids plus all their coupled partners, deduplicated, in model order.
    pub fn expand_with_coupled(&self, ids: impl IntoIterator<Item = LayerId>) -> Vec<LayerId> {
        let mut set: HashSet<LayerId> = HashSet::new();
        for id in ids {
            if !self.contains(id) {
                continue;
            }
            set.insert(id);
            set.extend(self.coupled_partners(id));
        }
        self.layers
            .iter()
            .map(|l| l.id)
            .filter(|id| set.contains(id))
            .collect()
    }

    /// Median image height of a group, if it has images.
    pub fn median_image_height(&self, group: Group) -> Option<f64> {
        let heights: Vec<f64> = self
            .layers_in(LayerCategory::Image(group))
            .map(Layer::height)
            .collect();
        median(&heights)
    }

    /// Turn explicit targets into a full update set with coupled propagation.
    ///
    /// Each explicitly moved layer keeps its own target. Partners that are not moved explicitly
    /// receive the delta of the first explicit layer they are coupled with.
    pub fn plan_moves(&self, targets: &[(LayerId, Point)]) -> PositionUpdates {
        let mut updates: PositionUpdates = targets
            .iter()
            .filter(|(id, _)| self.contains(*id))
            .copied()
            .collect();

        for &(id, target) in targets {
            let Some(layer) = self.layer(id) else {
                continue;
            };
            let delta = target - layer.origin();
            for partner in self.coupled_partners(id) {
                if updates.contains_key(&partner) {
                    continue;
                }
                if let Some(p) = self.layer(partner) {
                    updates.insert(partner, p.origin() + delta);
                }
            }
        }

        updates
    }
}
