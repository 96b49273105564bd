//! Case-insensitive identifier types.
//!
//! Unit names and mnemonics are case-insensitive in this domain: `ALU` and
//! `alu` name the same thing, but diagnostics must echo the spelling the
//! user wrote. `Ident` folds ASCII case for equality, ordering, and hashing
//! while keeping the original spelling for display. The `UnitName` and
//! `Mnemonic` newtypes stop the two namespaces from mixing, in the same way
//! the address-space newtypes do in a memory simulator.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A case-insensitive identifier that remembers how it was written.
///
/// Two idents compare equal iff their ASCII-lowercased forms are equal.
/// Ordering and hashing fold case the same way, so an `Ident` can key a
/// `BTreeMap` or `HashMap` without a separate canonicalization step.
/// Cloning is cheap (shared storage).
#[derive(Clone)]
pub struct Ident(Arc<str>);

impl Ident {
    /// Wraps a spelling as an identifier.
    pub fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    /// The spelling this identifier was created with.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Ident {}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ident {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xFF);
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl From<&str> for Ident {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Ident {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

macro_rules! ident_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ident);

        impl $name {
            /// Wraps a spelling.
            pub fn new(text: &str) -> Self {
                Self(Ident::new(text))
            }

            /// The spelling this name was created with.
            #[inline]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self::new(text)
            }
        }
    };
}

ident_newtype! {
    /// The case-insensitive name of a functional unit.
    UnitName
}

ident_newtype! {
    /// The case-insensitive mnemonic of an instruction.
    Mnemonic
}
