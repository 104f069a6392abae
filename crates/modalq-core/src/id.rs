#![forbid(unsafe_code)]

//! Natural keys for modal registrations.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generated modal ids.
static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Prefix used by [`ModalId::generate`].
pub const GENERATED_ID_PREFIX: &str = "modal-";

/// Identifier of a modal registration.
///
/// Ids are supplied by the caller and compared by value. Two logically
/// distinct modals that share an id collide: the first registration wins and
/// later `show` calls are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModalId(String);

impl ModalId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a process-unique id for a modal that was not given a name.
    ///
    /// Generated ids have the form `modal-<n>`. Callers that also pick names
    /// of that shape can still collide with them.
    #[must_use]
    pub fn generate() -> Self {
        let n = MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{GENERATED_ID_PREFIX}{n}"))
    }

    /// Use `name` when it is non-empty, otherwise generate an id.
    #[must_use]
    pub fn from_name_or_generate(name: &str) -> Self {
        if name.is_empty() {
            Self::generate()
        } else {
            Self::new(name)
        }
    }

    /// Borrow the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModalId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModalId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for ModalId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl PartialEq<str> for ModalId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModalId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
