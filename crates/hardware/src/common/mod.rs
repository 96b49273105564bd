//! Common types shared across the simulator.
//!
//! The fundamental building blocks every other module leans on:
//! 1. **Identifiers:** Case-insensitive unit names and mnemonics.
//! 2. **Registers:** Opaque register operand names for hazard tracking.
//! 3. **Errors:** The tagged error surface and result alias.

/// Error types and the result alias.
pub mod error;

/// Case-insensitive identifier types.
pub mod ident;

/// Register operand names.
pub mod reg;

pub use error::{Result, SimError, StallReason};
pub use ident::{Ident, Mnemonic, UnitName};
pub use reg::Reg;
