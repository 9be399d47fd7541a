//! Pure layer transformations: size normalization and label stacking.

use kurbo::{Point, Rect, Size};

use super::{Group, Layer, LayerCategory};
use crate::config::LabelGaps;
use crate::model::PositionUpdates;

/// Median as the element at `floor(n/2)` of the sorted values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[sorted.len() / 2])
}

/// Give every image of a category the median width and every name the median height.
///
/// Images keep their horizontal center, names keep their bottom edge.
pub fn normalize_sizes(mut layers: Vec<Layer>) -> Vec<Layer> {
    for group in [Group::Student, Group::Teacher] {
        let image = LayerCategory::Image(group);
        let widths: Vec<f64> = layers
            .iter()
            .filter(|l| l.category == image)
            .map(Layer::width)
            .collect();
        if let Some(median_w) = median(&widths) {
            for layer in layers.iter_mut().filter(|l| l.category == image) {
                let b = layer.bounds;
                let x = b.x0 + (b.width() - median_w) / 2.0;
                layer.bounds = Rect::from_origin_size(Point::new(x, b.y0), Size::new(median_w, b.height()));
            }
        }

        let name = LayerCategory::Name(group);
        let heights: Vec<f64> = layers
            .iter()
            .filter(|l| l.category == name)
            .map(Layer::height)
            .collect();
        if let Some(median_h) = median(&heights) {
            for layer in layers.iter_mut().filter(|l| l.category == name) {
                let b = layer.bounds;
                let y = b.y1 - median_h;
                layer.bounds = Rect::from_origin_size(Point::new(b.x0, y), Size::new(b.width(), median_h));
            }
        }
    }
    layers
}

/// Place the labels of the given images beneath them.
///
/// `images` maps image layer ids to their (new) top-left corner. Names go `name_gap` below their
/// image; positions go `position_gap` below their name, or `name_gap` below the image when the
/// person has no name layer. Only labels sharing the image's group and identity are touched.
pub fn stack_labels(layers: &[Layer], images: &PositionUpdates, gaps: &LabelGaps) -> PositionUpdates {
    let mut updates = PositionUpdates::new();

    for image in layers.iter().filter(|l| l.category.is_image()) {
        let Some(&origin) = images.get(&image.id) else {
            continue;
        };
        let (Some(identity), Some(group)) = (image.identity_id(), image.category.group()) else {
            continue;
        };
        let partner = |category: LayerCategory| {
            layers
                .iter()
                .find(|l| l.category == category && l.identity_id() == Some(identity))
        };

        let image_bottom = origin.y + image.height();
        let name = partner(LayerCategory::Name(group));
        if let Some(name) = name {
            let name_origin = Point::new(origin.x, image_bottom + gaps.name_gap);
            updates.insert(name.id, name_origin);
            if let Some(position) = partner(LayerCategory::Position(group)) {
                let y = name_origin.y + name.height() + gaps.position_gap;
                updates.insert(position.id, Point::new(origin.x, y));
            }
        } else if let Some(position) = partner(LayerCategory::Position(group)) {
            updates.insert(position.id, Point::new(origin.x, image_bottom + gaps.name_gap));
        }
    }

    updates
}
