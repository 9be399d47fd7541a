//! Position slots: the places a sort may reassign images to.

use kurbo::Point;

use super::ReadingPattern;
use crate::cluster::cluster_sorted;
use crate::layers::Layer;

fn rows<'a>(layers: &[&'a Layer], threshold: f64) -> Vec<Vec<&'a Layer>> {
    cluster_sorted(layers.to_vec(), |l| l.origin().y, threshold)
        .into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.origin().x.total_cmp(&b.origin().x));
            row
        })
        .collect()
}

/// Current positions of `layers` in reading order.
///
/// Rows are clustered by Y and read left to right. With the U-shape pattern the last row is read
/// right to left: its X values are reversed while each slot keeps its Y.
pub fn row_slots(layers: &[&Layer], threshold: f64, pattern: ReadingPattern) -> Vec<Point> {
    let rows = rows(layers, threshold);
    let row_count = rows.len();

    let mut slots = Vec::with_capacity(layers.len());
    for (i, row) in rows.into_iter().enumerate() {
        let mut row_slots: Vec<Point> = row.iter().map(|l| l.origin()).collect();
        if pattern == ReadingPattern::UShape && i + 1 == row_count && row_slots.len() > 1 {
            let xs: Vec<f64> = row_slots.iter().rev().map(|p| p.x).collect();
            for (slot, x) in row_slots.iter_mut().zip(xs) {
                slot.x = x;
            }
        }
        slots.extend(row_slots);
    }
    slots
}

/// Number of layers in each row, top to bottom.
pub fn row_sizes(layers: &[&Layer], threshold: f64) -> Vec<usize> {
    rows(layers, threshold).iter().map(Vec::len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{LayerCategory, LayerKind};
    use kurbo::Rect;

    fn at(id: u64, x: f64, y: f64) -> Layer {
        Layer {
            id,
            name: String::new(),
            group_path: Vec::new(),
            category: LayerCategory::Fixed,
            bounds: Rect::new(x, y, x + 10.0, y + 10.0),
            position_override: None,
            identity: None,
            kind: LayerKind::Normal,
            text: None,
            justification: None,
            linked: false,
        }
    }

    #[test]
    fn test_reading_order() {
        let layers = [at(1, 200.0, 5.0), at(2, 0.0, 0.0), at(3, 100.0, 300.0), at(4, 0.0, 310.0)];
        let refs: Vec<&Layer> = layers.iter().collect();
        let slots = row_slots(&refs, 20.0, ReadingPattern::LeftToRight);
        assert_eq!(
            slots,
            vec![
                Point::new(0.0, 0.0),
                Point::new(200.0, 5.0),
                Point::new(0.0, 310.0),
                Point::new(100.0, 300.0),
            ]
        );
        assert_eq!(row_sizes(&refs, 20.0), vec![2, 2]);
    }

    #[test]
    fn test_u_shape_reverses_last_row() {
        let layers = [at(1, 0.0, 0.0), at(2, 100.0, 0.0), at(3, 0.0, 300.0), at(4, 100.0, 305.0), at(5, 200.0, 300.0)];
        let refs: Vec<&Layer> = layers.iter().collect();
        let slots = row_slots(&refs, 20.0, ReadingPattern::UShape);
        assert_eq!(slots[0], Point::new(0.0, 0.0));
        assert_eq!(slots[1], Point::new(100.0, 0.0));
        assert_eq!(slots[2], Point::new(200.0, 300.0));
        assert_eq!(slots[3], Point::new(100.0, 305.0));
        assert_eq!(slots[4], Point::new(0.0, 300.0));
    }

    #[test]
    fn test_single_row_u_shape() {
        let layers = [at(1, 0.0, 0.0), at(2, 100.0, 0.0)];
        let refs: Vec<&Layer> = layers.iter().collect();
        let slots = row_slots(&refs, 20.0, ReadingPattern::UShape);
        assert_eq!(slots, vec![Point::new(100.0, 0.0), Point::new(0.0, 0.0)]);
    }
}
