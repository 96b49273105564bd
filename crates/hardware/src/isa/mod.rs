//! Instruction-set table and capability tokens.
//!
//! An instruction set here is nothing more than a mapping from mnemonics to
//! required capabilities; instruction *semantics* are out of scope. Loading
//! a table validates it against the capabilities a processor can actually
//! carry end to end, so a program that assembles is a program the engine
//! can route.

/// Capability tokens and their interning registry.
pub mod capability;

use std::collections::{BTreeSet, HashMap};

use crate::common::error::{Result, SimError};
use crate::common::ident::Mnemonic;
use crate::config::IsaRow;

pub use capability::{CapRegistry, Capability};

/// A loaded, validated instruction-set table.
///
/// Lookup is case-insensitive on the mnemonic. Construction goes through
/// [`Isa::load`], which checks every row against the processor's supported
/// capability set, so a resolved instruction always carries a routable
/// capability.
#[derive(Debug, Clone, Default)]
pub struct Isa {
    by_mnemonic: HashMap<Mnemonic, Capability>,
}

impl Isa {
    /// Loads an instruction-set table against a set of supported
    /// capabilities (the union a processor can carry from an entry to an
    /// exit; see [`Processor::supported_capabilities`]).
    ///
    /// Rows are checked in order; the first offending row wins. A row whose
    /// capability is outside `supported` fails with
    /// [`SimError::UnsupportedCapability`]; a case-folded mnemonic repeat
    /// fails with [`SimError::DuplicateMnemonic`].
    ///
    /// [`Processor::supported_capabilities`]: crate::topology::Processor::supported_capabilities
    pub fn load(rows: &[IsaRow], supported: &BTreeSet<Capability>) -> Result<Self> {
        let mut by_mnemonic = HashMap::with_capacity(rows.len());
        for row in rows {
            if !supported.contains(&row.capability) {
                return Err(SimError::UnsupportedCapability {
                    mnemonic: row.mnemonic.clone(),
                    capability: row.capability.clone(),
                });
            }
            if by_mnemonic
                .insert(row.mnemonic.clone(), row.capability.clone())
                .is_some()
            {
                return Err(SimError::DuplicateMnemonic {
                    mnemonic: row.mnemonic.clone(),
                });
            }
        }
        Ok(Self { by_mnemonic })
    }

    /// Resolves a mnemonic to its required capability.
    pub fn capability_of(&self, mnemonic: &Mnemonic) -> Option<&Capability> {
        self.by_mnemonic.get(mnemonic)
    }

    /// Number of mnemonics in the table.
    pub fn len(&self) -> usize {
        self.by_mnemonic.len()
    }

    /// Whether the table has no mnemonics.
    pub fn is_empty(&self) -> bool {
        self.by_mnemonic.is_empty()
    }
}
