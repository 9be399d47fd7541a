//! Linking layers to the people they show.

use std::collections::HashMap;

use super::{Identity, IdentityId, LinkedIdentity};

/// Separator between a layer's display part and its identity id, e.g. `kiss-janos---42`.
const ID_SEPARATOR: &str = "---";

/// Parse the trailing `---<id>` suffix of a layer name.
pub fn parse_identity_suffix(name: &str) -> Option<IdentityId> {
    let (_, suffix) = name.rsplit_once(ID_SEPARATOR)?;
    suffix.trim().parse().ok()
}

/// Lookup table of the identities known for a document.
#[derive(Debug, Clone, Default)]
pub struct IdentityDirectory {
    by_id: HashMap<IdentityId, Identity>,
    by_name: HashMap<String, IdentityId>,
}

impl IdentityDirectory {
    pub fn new(identities: &[Identity]) -> Self {
        let mut directory = Self::default();
        for identity in identities {
            directory.by_id.entry(identity.id).or_insert_with(|| identity.clone());
            directory.by_name.entry(identity.name.clone()).or_insert(identity.id);
        }
        directory
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolve a layer name: id suffix first, then exact display-name match.
    pub fn resolve(&self, layer_name: &str) -> Option<LinkedIdentity> {
        let by_suffix = parse_identity_suffix(layer_name).and_then(|id| self.by_id.get(&id));
        let identity = by_suffix.or_else(|| {
            self.by_name
                .get(layer_name)
                .and_then(|id| self.by_id.get(id))
        })?;
        Some(LinkedIdentity::from(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Identity> {
        vec![
            Identity {
                id: 42,
                name: "Kiss János".into(),
                thumbnail: Some("thumbs/42.jpg".into()),
            },
            Identity {
                id: 7,
                name: "Nagy Anna".into(),
                thumbnail: None,
            },
        ]
    }

    #[test]
    fn test_parse_suffix() {
        assert_eq!(parse_identity_suffix("kiss-janos---42"), Some(42));
        assert_eq!(parse_identity_suffix("a---b---7"), Some(7));
        assert_eq!(parse_identity_suffix("kiss-janos"), None);
        assert_eq!(parse_identity_suffix("kiss-janos---x"), None);
    }

    #[test]
    fn test_resolve_by_suffix() {
        let dir = IdentityDirectory::new(&people());
        let linked = dir.resolve("kiss-janos---42").unwrap();
        assert_eq!(linked.identity_id, 42);
        assert_eq!(linked.display_name, "Kiss János");
        assert_eq!(linked.thumbnail.as_deref(), Some("thumbs/42.jpg"));
    }

    #[test]
    fn test_resolve_falls_back_to_name() {
        let dir = IdentityDirectory::new(&people());
        assert_eq!(dir.resolve("Nagy Anna").unwrap().identity_id, 7);
        // Unknown id in the suffix falls back to the full name, which does not match either.
        assert!(dir.resolve("nagy-anna---999").is_none());
        assert!(dir.resolve("Unknown Person").is_none());
    }

    #[test]
    fn test_first_name_wins() {
        let mut list = people();
        list.push(Identity {
            id: 8,
            name: "Nagy Anna".into(),
            thumbnail: None,
        });
        let dir = IdentityDirectory::new(&list);
        assert_eq!(dir.resolve("Nagy Anna").unwrap().identity_id, 7);
        assert_eq!(dir.len(), 3);
    }
}
