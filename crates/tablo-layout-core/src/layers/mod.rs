//! Layer definitions for the board.

mod identity;
mod normalize;

pub use identity::{IdentityDirectory, parse_identity_suffix};
pub use normalize::{median, normalize_sizes, stack_labels};

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Unique identifier for layers (the loader's layer id).
pub type LayerId = u64;

/// Unique identifier for a real-world person.
pub type IdentityId = u64;

/// The board being laid out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub width_px: f64,
    pub height_px: f64,
    /// Resolution in dots per inch.
    pub dpi: f64,
}

impl Document {
    pub fn new(width_px: f64, height_px: f64, dpi: f64) -> Self {
        Self {
            width_px,
            height_px,
            dpi,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width_px, self.height_px)
    }

    /// Physical size in centimetres, rounded to one decimal.
    pub fn size_cm(&self) -> Option<Size> {
        if self.dpi <= 0.0 {
            return None;
        }
        let to_cm = |px: f64| (px / self.dpi * 2.54 * 10.0).round() / 10.0;
        Some(Size::new(to_cm(self.width_px), to_cm(self.height_px)))
    }
}

/// The two parallel populations on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Student,
    Teacher,
}

impl Group {
    fn from_folder(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("Students") {
            Some(Group::Student)
        } else if name.eq_ignore_ascii_case("Teachers") {
            Some(Group::Teacher)
        } else {
            None
        }
    }
}

/// What a layer shows, assigned once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerCategory {
    /// Portrait photo.
    Image(Group),
    /// Name caption under a portrait.
    Name(Group),
    /// Position/title caption under a name.
    Position(Group),
    /// Background, decoration, headings. Never selectable.
    Fixed,
}

impl LayerCategory {
    /// Categorize from the layer's folder path, e.g. `["Images", "Students"]`.
    pub fn from_group_path(path: &[String]) -> Self {
        let (Some(kind), Some(folder)) = (path.first(), path.get(1)) else {
            return LayerCategory::Fixed;
        };
        let Some(group) = Group::from_folder(folder) else {
            return LayerCategory::Fixed;
        };

        if kind.eq_ignore_ascii_case("Images") {
            LayerCategory::Image(group)
        } else if kind.eq_ignore_ascii_case("Names") {
            LayerCategory::Name(group)
        } else if kind.eq_ignore_ascii_case("Positions") {
            LayerCategory::Position(group)
        } else {
            LayerCategory::Fixed
        }
    }

    pub fn group(self) -> Option<Group> {
        match self {
            LayerCategory::Image(g) | LayerCategory::Name(g) | LayerCategory::Position(g) => Some(g),
            LayerCategory::Fixed => None,
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, LayerCategory::Image(_))
    }

    pub fn is_name(self) -> bool {
        matches!(self, LayerCategory::Name(_))
    }

    pub fn is_position(self) -> bool {
        matches!(self, LayerCategory::Position(_))
    }

    /// Name or position caption.
    pub fn is_label(self) -> bool {
        self.is_name() || self.is_position()
    }

    pub fn is_fixed(self) -> bool {
        self == LayerCategory::Fixed
    }

    /// Whether two categories move together when they share an identity.
    pub fn is_coupled_with(self, other: LayerCategory) -> bool {
        match (self.group(), other.group()) {
            (Some(a), Some(b)) => a == b && self != other,
            _ => false,
        }
    }
}

/// Kind of source layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    Normal,
    Text,
}

/// Paragraph justification of a text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    Left,
    Center,
    Right,
}

/// A layer as supplied by the document loader and handed back on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLayer {
    pub layer_id: LayerId,
    pub layer_name: String,
    #[serde(default)]
    pub group_path: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub linked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl SnapshotLayer {
    /// Hidden and zero-size layers are not editable.
    pub fn is_editable(&self) -> bool {
        self.visible != Some(false) && self.width > 0.0 && self.height > 0.0
    }
}

/// A known person the board is built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// The person a layer belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedIdentity {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub thumbnail: Option<String>,
}

impl From<&Identity> for LinkedIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            identity_id: identity.id,
            display_name: identity.name.clone(),
            thumbnail: identity.thumbnail.clone(),
        }
    }
}

/// The atomic placeable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    /// Raw layer name, may end in `---<identity id>`.
    pub name: String,
    pub group_path: Vec<String>,
    pub category: LayerCategory,
    /// Geometry as loaded (after size normalization).
    pub bounds: Rect,
    /// Position set by editing; supersedes `bounds` origin when present.
    pub position_override: Option<Point>,
    pub identity: Option<LinkedIdentity>,
    pub kind: LayerKind,
    pub text: Option<String>,
    pub justification: Option<Justification>,
    pub linked: bool,
}

impl Layer {
    /// Build an editable layer from loader data.
    pub fn from_snapshot(snapshot: &SnapshotLayer, directory: &IdentityDirectory) -> Self {
        let category = LayerCategory::from_group_path(&snapshot.group_path);
        let identity = if category.is_fixed() {
            None
        } else {
            directory.resolve(&snapshot.layer_name)
        };

        Self {
            id: snapshot.layer_id,
            name: snapshot.layer_name.clone(),
            group_path: snapshot.group_path.clone(),
            category,
            bounds: Rect::from_origin_size(
                Point::new(snapshot.x, snapshot.y),
                Size::new(snapshot.width, snapshot.height),
            ),
            position_override: None,
            identity,
            kind: snapshot.kind,
            text: snapshot.text.clone(),
            justification: snapshot.justification,
            linked: snapshot.linked,
        }
    }

    /// Effective top-left corner.
    pub fn origin(&self) -> Point {
        self.position_override.unwrap_or(self.bounds.origin())
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    /// Bounds at the effective position.
    pub fn effective_bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Effective bounds moved by `delta`.
    pub fn shifted_bounds(&self, delta: Vec2) -> Rect {
        self.effective_bounds() + delta
    }

    pub fn center(&self) -> Point {
        self.effective_bounds().center()
    }

    pub fn identity_id(&self) -> Option<IdentityId> {
        self.identity.as_ref().map(|i| i.identity_id)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.display_name.as_str())
    }

    pub fn is_modified(&self) -> bool {
        self.position_override.is_some()
    }

    /// Loader representation at the effective position.
    pub fn to_snapshot(&self) -> SnapshotLayer {
        let origin = self.origin();
        SnapshotLayer {
            layer_id: self.id,
            layer_name: self.name.clone(),
            group_path: self.group_path.clone(),
            x: origin.x,
            y: origin.y,
            width: self.width(),
            height: self.height(),
            kind: self.kind,
            text: self.text.clone(),
            justification: self.justification,
            linked: self.linked,
            visible: Some(true),
        }
    }
}
