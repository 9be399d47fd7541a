//! Fit-to-viewport transform between document space and screen space.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Screen space reserved around the board by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportChrome {
    /// Width of the sidebar docked to the left edge.
    pub sidebar_width: f64,
    /// Height of the toolbar docked to the top edge.
    pub toolbar_height: f64,
    /// Uniform padding kept around the board.
    pub padding: f64,
}

impl ViewportChrome {
    /// Chrome of the full designer screen (sort sidebar on the left, toolbar on top).
    pub fn designer() -> Self {
        Self {
            sidebar_width: 220.0,
            toolbar_height: 56.0,
            padding: 40.0,
        }
    }
}

/// The view transform for the board.
///
/// Scales the document uniformly so it fits the available area and centers it. A scale of zero
/// means there is no usable viewport yet; every conversion then returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Document pixels to screen pixels.
    pub scale: f64,
    /// Screen position of the document origin.
    pub offset: Vec2,
    /// Size of the whole document on screen.
    pub display_size: Size,
}

impl Viewport {
    /// Fit a document of `document` size into a container of `container` size.
    pub fn fit(document: Size, container: Size, chrome: &ViewportChrome) -> Self {
        if document.width <= 0.0 || document.height <= 0.0 {
            return Self::default();
        }

        let avail_w = container.width - chrome.sidebar_width - chrome.padding * 2.0;
        let avail_h = container.height - chrome.toolbar_height - chrome.padding * 2.0;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return Self::default();
        }

        let scale = (avail_w / document.width).min(avail_h / document.height);
        let display_size = Size::new(document.width * scale, document.height * scale);
        let offset = Vec2::new(
            chrome.sidebar_width + (container.width - chrome.sidebar_width - display_size.width) / 2.0,
            chrome.toolbar_height + (container.height - chrome.toolbar_height - display_size.height) / 2.0,
        );

        Self {
            scale,
            offset,
            display_size,
        }
    }

    /// Whether conversions are possible.
    pub fn is_valid(&self) -> bool {
        self.scale > 0.0 && self.scale.is_finite()
    }

    /// Document-to-screen transform.
    pub fn transform(&self) -> Option<Affine> {
        self.is_valid()
            .then(|| Affine::translate(self.offset) * Affine::scale(self.scale))
    }

    /// Screen-to-document transform.
    pub fn inverse_transform(&self) -> Option<Affine> {
        self.is_valid()
            .then(|| Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset))
    }

    /// Convert a document point to screen coordinates.
    pub fn doc_to_screen(&self, point: Point) -> Option<Point> {
        self.transform().map(|t| t * point)
    }

    /// Convert a screen point to document coordinates.
    pub fn screen_to_doc(&self, point: Point) -> Option<Point> {
        self.inverse_transform().map(|t| t * point)
    }

    /// Convert a pointer movement on screen into a document-space delta.
    pub fn screen_delta_to_doc(&self, delta: Vec2) -> Option<Vec2> {
        self.is_valid().then(|| delta / self.scale)
    }

    /// Convert a document rectangle to screen coordinates.
    pub fn doc_rect_to_screen(&self, rect: Rect) -> Option<Rect> {
        let p0 = self.doc_to_screen(Point::new(rect.x0, rect.y0))?;
        let p1 = self.doc_to_screen(Point::new(rect.x1, rect.y1))?;
        Some(Rect::from_points(p0, p1))
    }
}
