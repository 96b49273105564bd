//! Program assembly.
//!
//! The source format is line-oriented: one instruction per non-blank line,
//! tokens separated by whitespace and commas, `#`-prefixed lines skipped.
//! The first token is the mnemonic, the first operand the destination, and
//! the remaining operands the sources. A parenthesized operand such as
//! `(R2)` (or `8(R2)`) is a memory-addressing source; it is stripped to the
//! bare register name, which is all hazard tracking needs.

/// Typed instructions.
pub mod instruction;

use crate::common::error::{Result, SimError};
use crate::common::ident::Mnemonic;
use crate::common::reg::Reg;
use crate::isa::Isa;

pub use instruction::Instruction;

/// An assembled program: instructions in program order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Assembles source lines against an instruction-set table.
    ///
    /// Line numbers in errors are one-based over the input as given,
    /// counting blank and comment lines.
    pub fn assemble<I, S>(lines: I, isa: &Isa) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut instructions = Vec::new();
        for (idx, raw) in lines.into_iter().enumerate() {
            let line = idx + 1;
            let text = raw.as_ref().trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            instructions.push(assemble_line(text, line, isa)?);
        }
        Ok(Self { instructions })
    }

    /// The instructions, in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

fn assemble_line(text: &str, line: usize, isa: &Isa) -> Result<Instruction> {
    let mut tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    let Some(first) = tokens.next() else {
        return Err(SimError::EmptyInstruction { line });
    };
    let mnemonic = Mnemonic::new(first);
    let Some(capability) = isa.capability_of(&mnemonic) else {
        return Err(SimError::UnknownMnemonic { line, mnemonic });
    };

    let Some(dst) = tokens.next() else {
        return Err(SimError::MissingDestination { line, mnemonic });
    };

    Ok(Instruction {
        dst: operand_register(dst),
        srcs: tokens.map(operand_register).collect(),
        capability: capability.clone(),
        mnemonic,
    })
}

/// Strips memory-addressing decoration from an operand.
///
/// `(R2)` and `8(R2)` both denote the register `R2`; anything without a
/// parenthesized tail is taken verbatim.
fn operand_register(token: &str) -> Reg {
    match (token.find('('), token.ends_with(')')) {
        (Some(open), true) => Reg::new(&token[open + 1..token.len() - 1]),
        _ => Reg::new(token),
    }
}
