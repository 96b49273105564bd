//! Register operand names.
//!
//! Registers are opaque to the simulator: no values are ever computed, the
//! engine only tracks which instruction writes and reads which name. Unlike
//! unit names and mnemonics, register names compare exactly as written.

use std::fmt;
use std::sync::Arc;

/// A register operand name, compared exactly.
///
/// Cloning is cheap (shared storage); the same name appears once per
/// instruction operand and many times in hazard bookkeeping.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reg(Arc<str>);

impl Reg {
    /// Wraps a register name.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The register name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl From<&str> for Reg {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
