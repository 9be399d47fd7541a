//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use tablo_layout_core::{Document, Identity, LayerKind, LayoutEditor, SnapshotLayer};

pub const IMAGES: &[&str] = &["Images", "Students"];
pub const NAMES: &[&str] = &["Names", "Students"];
pub const POSITIONS: &[&str] = &["Positions", "Students"];
pub const TEACHER_IMAGES: &[&str] = &["Images", "Teachers"];

pub fn layer(id: u64, name: &str, path: &[&str], x: f64, y: f64, w: f64, h: f64) -> SnapshotLayer {
    SnapshotLayer {
        layer_id: id,
        layer_name: name.to_string(),
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

pub fn identity(id: u64, name: &str) -> Identity {
    Identity {
        id,
        name: name.to_string(),
        thumbnail: None,
    }
}

/// Editor over a 1000x1000 board shown at scale 1 with no chrome.
pub fn editor_with(layers: &[SnapshotLayer], identities: &[Identity]) -> LayoutEditor {
    let mut editor = LayoutEditor::default();
    editor.load_document(Document::new(1000.0, 1000.0, 300.0), layers, identities);
    editor.set_container_size(1000.0, 1000.0);
    editor
}

/// A row of students, each with an image, a name below it and a position below the name.
///
/// Person `i` has identity `i + 1`, image id `i + 1`, name id `i + 101`, position id `i + 201`.
pub fn class_row(names: &[&str], y: f64) -> (Vec<SnapshotLayer>, Vec<Identity>) {
    let mut layers = vec![layer(999, "background", &["Background"], 0.0, 0.0, 1000.0, 1000.0)];
    let mut identities = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let id = i as u64 + 1;
        let x = i as f64 * 150.0;
        let layer_name = format!("{}---{}", name.to_lowercase(), id);
        identities.push(identity(id, name));
        layers.push(layer(id, &layer_name, IMAGES, x, y, 100.0, 120.0));
        layers.push(layer(id + 100, &layer_name, NAMES, x, y + 128.0, 100.0, 20.0));
        layers.push(layer(id + 200, &layer_name, POSITIONS, x, y + 152.0, 100.0, 16.0));
    }
    (layers, identities)
}
