//! Remote name resolution: classification and free-text ordering.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::order::collation_key;

/// Boxed future for resolver calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Resolver failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Binary classification used by the symmetric and group-order sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Boy,
    Girl,
}

/// One classified name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub name: String,
    pub gender: Gender,
}

/// Names put in the order described by a free text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderMatch {
    pub ordered_names: Vec<String>,
    /// Entries of the text that matched no name.
    pub unmatched: Vec<String>,
}

/// What a resolver returned for a sort request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverResponse {
    Classified(Vec<Classification>),
    Ordered(OrderMatch),
}

/// A service that resolves names for the remote sort strategies.
pub trait NameResolver {
    /// Classify each name into one of two groups. Names it cannot classify are left out.
    fn classify(&self, names: &[String]) -> BoxFuture<'_, Result<Vec<Classification>, ResolveError>>;

    /// Order `names` as described by `target_text`.
    fn match_order(&self, names: &[String], target_text: &str) -> BoxFuture<'_, Result<OrderMatch, ResolveError>>;
}

/// In-memory resolver for tests and offline use.
///
/// Classifies from a fixed table and orders by matching the lines (or commas) of the target text
/// against the names, ignoring case and accents.
#[derive(Debug, Clone, Default)]
pub struct FixedResolver {
    genders: HashMap<String, Gender>,
    failure: Option<ResolveError>,
}

impl FixedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gender(mut self, name: impl Into<String>, gender: Gender) -> Self {
        self.genders.insert(name.into(), gender);
        self
    }

    /// Make every call fail with `error`.
    pub fn failing(error: ResolveError) -> Self {
        Self {
            genders: HashMap::new(),
            failure: Some(error),
        }
    }

    fn check(&self) -> Result<(), ResolveError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl NameResolver for FixedResolver {
    fn classify(&self, names: &[String]) -> BoxFuture<'_, Result<Vec<Classification>, ResolveError>> {
        let names = names.to_vec();
        Box::pin(async move {
            self.check()?;
            Ok(names
                .into_iter()
                .filter_map(|name| {
                    let gender = *self.genders.get(&name)?;
                    Some(Classification { name, gender })
                })
                .collect())
        })
    }

    fn match_order(&self, names: &[String], target_text: &str) -> BoxFuture<'_, Result<OrderMatch, ResolveError>> {
        let names = names.to_vec();
        let text = target_text.to_string();
        Box::pin(async move {
            self.check()?;

            let mut remaining: Vec<(String, String)> =
                names.into_iter().map(|n| (collation_key(&n), n)).collect();
            let mut result = OrderMatch::default();

            for entry in text.split(['\n', ',', ';']).map(str::trim).filter(|e| !e.is_empty()) {
                let key = collation_key(entry);
                match remaining.iter().position(|(k, _)| *k == key) {
                    Some(i) => result.ordered_names.push(remaining.remove(i).1),
                    None => result.unmatched.push(entry.to_string()),
                }
            }
            Ok(result)
        })
    }
}
