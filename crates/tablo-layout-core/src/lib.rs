//! Tablo Layout Core
//!
//! Platform-agnostic layout engine for arranging portrait boards: the layer model, selection,
//! drag with position swapping, grid snapping, alignment, automated sorting and undo/redo.

pub mod align;
pub mod cluster;
pub mod config;
pub mod drag;
pub mod editor;
pub mod grid;
pub mod history;
pub mod layers;
pub mod model;
pub mod selection;
pub mod sort;
pub mod swap;
pub mod viewport;

pub use align::{AlignEdge, Axis};
pub use config::{ConfigError, LabelGaps, LayoutConfig};
pub use drag::{DragEngine, DragOutcome, DragPhase, PointerDown};
pub use editor::LayoutEditor;
pub use grid::{Grid, GridConfig, GridConfigCm, GridSettings, HorizontalAlign};
pub use history::{History, MAX_HISTORY};
pub use layers::{
    Document, Group, Identity, IdentityDirectory, IdentityId, Justification, Layer, LayerCategory, LayerId, LayerKind,
    LinkedIdentity, SnapshotLayer,
};
pub use model::{LayoutExport, LayoutModel, PositionUpdates};
pub use selection::Selection;
pub use sort::{
    BoxFuture, Classification, FixedResolver, Gender, NameResolver, OrderMatch, ReadingPattern, RemoteStrategy, ResolveError,
    ResolverResponse, SortEngine, SortError, SortOutcome, SortPlan, SortRequest,
};
pub use swap::{SwapCandidate, SwapPair};
pub use viewport::{Viewport, ViewportChrome};
