use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DRAFT_ID: AtomicU64 = AtomicU64::new(1);

/// Session-scoped identity of a draft, used by the orchestrator's in-flight
/// guard. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftId(u64);

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-entered, unsubmitted listing parameters.
///
/// Discarded after a successful submission; there is no persisted record of
/// partial progress.
#[derive(Debug, Clone)]
pub struct AssetDraft {
    id: DraftId,
    pub name: String,
    pub description: String,
    /// Human-readable decimal price (e.g. `"1.5"`), validated by the
    /// listing registrar before any contract call.
    pub price: String,
    /// Raw bytes of the selected asset file.
    pub file: Option<Vec<u8>>,
}

impl AssetDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id: DraftId(NEXT_DRAFT_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            description: description.into(),
            price: price.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, bytes: Vec<u8>) -> Self {
        self.file = Some(bytes);
        self
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    /// The first required field that is absent or blank, if any.
    ///
    /// Submission must not issue any network call while this returns `Some`.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            return Some("name");
        }
        if self.description.trim().is_empty() {
            return Some("description");
        }
        if self.price.trim().is_empty() {
            return Some("price");
        }
        match &self.file {
            None => Some("file"),
            Some(bytes) if bytes.is_empty() => Some("file"),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_ids_are_unique() {
        let a = AssetDraft::new("a", "b", "1");
        let b = AssetDraft::new("a", "b", "1");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn missing_field_checks_in_order() {
        let draft = AssetDraft::new("", "", "");
        assert_eq!(draft.missing_field(), Some("name"));

        let draft = AssetDraft::new("Art", " ", "");
        assert_eq!(draft.missing_field(), Some("description"));

        let draft = AssetDraft::new("Art", "desc", "  ");
        assert_eq!(draft.missing_field(), Some("price"));

        let draft = AssetDraft::new("Art", "desc", "1.5");
        assert_eq!(draft.missing_field(), Some("file"));

        let draft = AssetDraft::new("Art", "desc", "1.5").with_file(vec![]);
        assert_eq!(draft.missing_field(), Some("file"));

        let draft = AssetDraft::new("Art", "desc", "1.5").with_file(vec![1, 2, 3]);
        assert_eq!(draft.missing_field(), None);
    }
}
