//! Automated reordering of selected portraits.
//!
//! A sort never invents positions: it reads the current positions of the selected images as
//! slots in reading order and hands them out again in the requested name order. Coupled labels
//! follow their image.

mod order;
mod resolver;
mod slots;

pub use order::{collate, collation_key, distribute_symmetric, group_order, sort_alphabetical, symmetric_positions};
pub use resolver::{
    BoxFuture, Classification, FixedResolver, Gender, NameResolver, OrderMatch, ResolveError, ResolverResponse,
};
pub use slots::{row_sizes, row_slots};

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::ROW_THRESHOLD;
use crate::layers::{Layer, LayerId};
use crate::model::{LayoutModel, PositionUpdates};
use crate::selection::Selection;

/// Order in which rows of slots are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadingPattern {
    /// Every row left to right.
    #[default]
    LeftToRight,
    /// Every row left to right except the last, which runs right to left.
    UShape,
}

/// Sorts that need a remote resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteStrategy {
    /// Classify names, then place the smaller group symmetrically at the row edges.
    Symmetric,
    /// Classify names, then place one group entirely before the other.
    GroupFirst(Gender),
    /// Follow an order described in free text.
    Custom(String),
}

/// Reasons a sort request is refused up front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("A sort is already in progress")]
    Busy,
    #[error("Sorting needs at least 2 linked images, got {0}")]
    NotEnoughLayers(usize),
}

/// How a sort ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortOutcome {
    Sorted {
        /// Images assigned to a slot.
        moved: usize,
        /// Names the resolver could not place.
        unmatched: Vec<String>,
    },
    /// Resolution failed; the layout is unchanged.
    Failed(String),
    /// Nothing to apply.
    Skipped,
}

/// Position updates produced by a sort, plus its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SortPlan {
    pub updates: PositionUpdates,
    pub outcome: SortOutcome,
}

impl SortPlan {
    fn failed(message: String) -> Self {
        Self {
            updates: PositionUpdates::new(),
            outcome: SortOutcome::Failed(message),
        }
    }
}

/// An outstanding remote sort.
#[derive(Debug, Clone, PartialEq)]
pub struct SortRequest {
    pub strategy: RemoteStrategy,
    /// Display names of the images being sorted.
    pub names: Vec<String>,
    images: Vec<LayerId>,
    ticket: u64,
}

impl SortRequest {
    /// Ask `resolver` for the data this request needs.
    pub fn resolve<'a>(&'a self, resolver: &'a dyn NameResolver) -> BoxFuture<'a, Result<ResolverResponse, ResolveError>> {
        Box::pin(async move {
            match &self.strategy {
                RemoteStrategy::Symmetric | RemoteStrategy::GroupFirst(_) => {
                    resolver.classify(&self.names).await.map(ResolverResponse::Classified)
                }
                RemoteStrategy::Custom(text) => resolver
                    .match_order(&self.names, text)
                    .await
                    .map(ResolverResponse::Ordered),
            }
        })
    }
}

/// Sort state: reading pattern, outstanding request and last outcome.
#[derive(Debug, Clone)]
pub struct SortEngine {
    pattern: ReadingPattern,
    row_threshold: f64,
    /// Ticket of the outstanding remote request, if any.
    pending: Option<u64>,
    next_ticket: u64,
    last_outcome: Option<SortOutcome>,
}

impl Default for SortEngine {
    fn default() -> Self {
        Self::new(ReadingPattern::default(), ROW_THRESHOLD)
    }
}

impl SortEngine {
    pub fn new(pattern: ReadingPattern, row_threshold: f64) -> Self {
        Self {
            pattern,
            row_threshold,
            pending: None,
            next_ticket: 0,
            last_outcome: None,
        }
    }

    pub fn pattern(&self) -> ReadingPattern {
        self.pattern
    }

    pub fn set_pattern(&mut self, pattern: ReadingPattern) {
        self.pattern = pattern;
    }

    /// Whether a remote resolution is outstanding.
    pub fn is_sorting(&self) -> bool {
        self.pending.is_some()
    }

    /// Abandon the outstanding request. A later `complete` for it is ignored.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            log::info!("Remote sort cancelled");
        }
    }

    /// Forget the outstanding request and the last outcome, e.g. when a new board is loaded.
    pub fn reset(&mut self) {
        self.cancel();
        self.last_outcome = None;
    }

    pub fn last_outcome(&self) -> Option<&SortOutcome> {
        self.last_outcome.as_ref()
    }

    fn sortable<'a>(&self, model: &'a LayoutModel, selection: &Selection) -> Result<Vec<&'a Layer>, SortError> {
        if self.pending.is_some() {
            log::warn!("Sort rejected: another sort is in progress");
            return Err(SortError::Busy);
        }
        let images: Vec<&Layer> = selection
            .selected_layers(model)
            .into_iter()
            .filter(|l| l.category.is_image() && l.identity.is_some())
            .collect();
        if images.len() < 2 {
            return Err(SortError::NotEnoughLayers(images.len()));
        }
        Ok(images)
    }

    /// Alphabetical sort of the selected images. Runs locally.
    pub fn plan_alphabetical(&mut self, model: &LayoutModel, selection: &Selection) -> Result<SortPlan, SortError> {
        let images = self.sortable(model, selection)?;
        let mut names: Vec<String> = images.iter().filter_map(|l| l.display_name()).map(String::from).collect();
        sort_alphabetical(&mut names);

        let ordered: Vec<Option<String>> = names.into_iter().map(Some).collect();
        let plan = self.apply(model, &images, &ordered, Vec::new());
        log::info!("Alphabetical sort of {} image(s)", images.len());
        self.last_outcome = Some(plan.outcome.clone());
        Ok(plan)
    }

    /// Start a remote sort. Marks the engine busy until [`SortEngine::complete`] is called.
    pub fn begin(
        &mut self,
        model: &LayoutModel,
        selection: &Selection,
        strategy: RemoteStrategy,
    ) -> Result<SortRequest, SortError> {
        let images = self.sortable(model, selection)?;
        let names = images.iter().filter_map(|l| l.display_name()).map(String::from).collect();

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.last_outcome = None;
        log::info!("Remote sort {:?} of {} image(s) started", strategy, images.len());
        Ok(SortRequest {
            strategy,
            names,
            images: images.iter().map(|l| l.id).collect(),
            ticket,
        })
    }

    /// Finish a remote sort with the resolver's answer. Clears the busy flag.
    ///
    /// Answers to a request that was cancelled or superseded by a reload are dropped.
    pub fn complete(
        &mut self,
        request: &SortRequest,
        response: Result<ResolverResponse, ResolveError>,
        model: &LayoutModel,
    ) -> SortPlan {
        if self.pending != Some(request.ticket) {
            log::warn!("Ignoring the answer to a stale sort request");
            return SortPlan {
                updates: PositionUpdates::new(),
                outcome: SortOutcome::Skipped,
            };
        }
        self.pending = None;

        let plan = match response {
            Ok(response) => self.plan_remote(request, response, model),
            Err(err) => {
                log::warn!("Remote sort failed: {}", err);
                SortPlan::failed(err.to_string())
            }
        };
        self.last_outcome = Some(plan.outcome.clone());
        plan
    }

    fn plan_remote(&self, request: &SortRequest, response: ResolverResponse, model: &LayoutModel) -> SortPlan {
        let images: Vec<&Layer> = request.images.iter().filter_map(|&id| model.layer(id)).collect();

        match (&request.strategy, response) {
            (RemoteStrategy::Custom(_), ResolverResponse::Ordered(matched)) => {
                let ordered: Vec<Option<String>> = matched.ordered_names.into_iter().map(Some).collect();
                self.apply(model, &images, &ordered, matched.unmatched)
            }
            (RemoteStrategy::Symmetric | RemoteStrategy::GroupFirst(_), ResolverResponse::Classified(list)) => {
                let genders: HashMap<String, Gender> = list.into_iter().map(|c| (c.name, c.gender)).collect();
                let group = |gender: Gender| {
                    let mut names: Vec<String> = request
                        .names
                        .iter()
                        .filter(|n| genders.get(*n) == Some(&gender))
                        .cloned()
                        .collect();
                    sort_alphabetical(&mut names);
                    names
                };
                let boys = group(Gender::Boy);
                let girls = group(Gender::Girl);
                let unmatched: Vec<String> = request
                    .names
                    .iter()
                    .filter(|n| !genders.contains_key(*n))
                    .cloned()
                    .collect();

                let ordered = match request.strategy {
                    RemoteStrategy::GroupFirst(Gender::Boy) => group_order(&boys, &girls),
                    RemoteStrategy::GroupFirst(Gender::Girl) => group_order(&girls, &boys),
                    _ => distribute_symmetric(&boys, &girls, &row_sizes(&images, self.row_threshold)),
                };
                log::debug!("Classified {} boy(s), {} girl(s)", boys.len(), girls.len());
                self.apply(model, &images, &ordered, unmatched)
            }
            _ => {
                let err = ResolveError::InvalidResponse("response does not match the sort strategy".into());
                log::warn!("Remote sort failed: {}", err);
                SortPlan::failed(err.to_string())
            }
        }
    }

    /// Hand out the slots of `images` in `ordered` name order.
    fn apply(
        &self,
        model: &LayoutModel,
        images: &[&Layer],
        ordered: &[Option<String>],
        unmatched: Vec<String>,
    ) -> SortPlan {
        let slots = row_slots(images, self.row_threshold, self.pattern);

        // Same-named people each take one entry, in model order.
        let mut by_name: HashMap<&str, VecDeque<&Layer>> = HashMap::new();
        for &layer in images {
            if let Some(name) = layer.display_name() {
                by_name.entry(name).or_default().push_back(layer);
            }
        }

        let targets: Vec<_> = ordered
            .iter()
            .zip(&slots)
            .filter_map(|(name, slot)| {
                let layer = by_name.get_mut(name.as_deref()?)?.pop_front()?;
                Some((layer.id, *slot))
            })
            .collect();

        if targets.is_empty() {
            return SortPlan {
                updates: PositionUpdates::new(),
                outcome: SortOutcome::Skipped,
            };
        }

        SortPlan {
            updates: model.plan_moves(&targets),
            outcome: SortOutcome::Sorted {
                moved: targets.len(),
                unmatched,
            },
        }
    }
}
