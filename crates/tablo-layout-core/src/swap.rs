//! Position swapping between dragged and resting portraits.

use std::collections::HashSet;

use kurbo::{Rect, Vec2};

use crate::layers::LayerId;
use crate::model::{LayoutModel, PositionUpdates};

/// Minimum overlap fraction for a swap.
pub const SWAP_OVERLAP_THRESHOLD: f64 = 0.3;

/// Intersection area divided by the smaller of the two areas.
pub fn overlap_fraction(a: Rect, b: Rect) -> f64 {
    let min_area = a.area().min(b.area());
    if min_area <= 0.0 {
        return 0.0;
    }
    let inter = a.intersect(b);
    if inter.width() <= 0.0 || inter.height() <= 0.0 {
        return 0.0;
    }
    inter.area() / min_area
}

/// A dragged image and the resting image it would trade places with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapPair {
    pub dragged: LayerId,
    pub target: LayerId,
    pub overlap: f64,
}

/// The one-to-one pairs a drop would swap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwapCandidate {
    pub pairs: Vec<SwapPair>,
}

impl SwapCandidate {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn involves(&self, id: LayerId) -> bool {
        self.pairs.iter().any(|p| p.dragged == id || p.target == id)
    }
}

/// Find the swaps a drop at `delta` would cause.
///
/// Every dragged image is tested against every non-dragged image. Pairs are taken by descending
/// overlap, ties in model order of the dragged layer and then the target; each layer pairs at most
/// once.
pub fn find_swap_candidate(
    model: &LayoutModel,
    dragged: &[LayerId],
    delta: Vec2,
    threshold: f64,
) -> Option<SwapCandidate> {
    let dragged_set: HashSet<LayerId> = dragged.iter().copied().collect();
    let images = || model.layers().iter().filter(|l| l.category.is_image());

    let mut hits: Vec<SwapPair> = Vec::new();
    for moving in images().filter(|l| dragged_set.contains(&l.id)) {
        let moved = moving.shifted_bounds(delta);
        for resting in images().filter(|l| !dragged_set.contains(&l.id)) {
            let overlap = overlap_fraction(moved, resting.effective_bounds());
            if overlap >= threshold {
                hits.push(SwapPair {
                    dragged: moving.id,
                    target: resting.id,
                    overlap,
                });
            }
        }
    }

    // Stable sort keeps the model-order tie-break.
    hits.sort_by(|a, b| b.overlap.total_cmp(&a.overlap));

    let mut used_dragged = HashSet::new();
    let mut used_target = HashSet::new();
    let pairs: Vec<SwapPair> = hits
        .into_iter()
        .filter(|p| {
            if used_dragged.contains(&p.dragged) || used_target.contains(&p.target) {
                return false;
            }
            used_dragged.insert(p.dragged);
            used_target.insert(p.target);
            true
        })
        .collect();

    (!pairs.is_empty()).then_some(SwapCandidate { pairs })
}

/// Position updates that exchange every pair, with coupled labels following.
pub fn plan_swap(model: &LayoutModel, candidate: &SwapCandidate) -> PositionUpdates {
    let mut targets = Vec::with_capacity(candidate.pairs.len() * 2);
    for pair in &candidate.pairs {
        let (Some(a), Some(b)) = (model.layer(pair.dragged), model.layer(pair.target)) else {
            continue;
        };
        targets.push((a.id, b.origin()));
        targets.push((b.id, a.origin()));
    }
    model.plan_moves(&targets)
}
