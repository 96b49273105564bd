//! Capability tokens and their interning registry.
//!
//! A capability names a class of work (`ALU`, `MEM`, ...) that a unit can
//! perform and that an instruction requires. Capabilities are
//! case-insensitive with the spelling preserved for diagnostics, and they
//! are interned: the registry hands out one canonical handle per folded
//! spelling, so the first spelling seen anywhere in a processor description
//! is the one every later message displays.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::ident::Ident;

/// A case-insensitive capability token.
///
/// Equality, ordering, and hashing fold ASCII case; `Display` shows the
/// spelling the token was created with.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Ident);

impl Capability {
    /// Wraps a spelling as a capability token.
    pub fn new(text: &str) -> Self {
        Self(Ident::new(text))
    }

    /// The spelling this capability was created with.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl From<&str> for Capability {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Interns capability spellings to canonical handles.
///
/// Folding already makes differently-cased spellings equal; the registry
/// additionally collapses them to one shared handle so that every part of a
/// canonical processor graph displays the same spelling for the same
/// capability.
#[derive(Debug, Default)]
pub struct CapRegistry {
    canon: HashMap<String, Capability>,
}

impl CapRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical handle for a spelling, creating it on first use.
    pub fn intern(&mut self, text: &str) -> Capability {
        self.canon
            .entry(text.to_ascii_lowercase())
            .or_insert_with(|| Capability::new(text))
            .clone()
    }

    /// Re-interns an existing token, collapsing it onto the canonical handle.
    pub fn canonicalize(&mut self, cap: &Capability) -> Capability {
        self.intern(cap.as_str())
    }

    /// Number of distinct capabilities seen so far.
    pub fn len(&self) -> usize {
        self.canon.len()
    }

    /// Whether the registry has seen no capabilities yet.
    pub fn is_empty(&self) -> bool {
        self.canon.is_empty()
    }
}
