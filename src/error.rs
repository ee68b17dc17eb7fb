//! Crate error taxonomy.
//!
//! Mirrors `EmulatorError` / `MemoryError` / `OpcodeError` /
//! `InvalidOpcodeError` from the Python original this core was distilled
//! from, flattened into a single enum the way the rest of the Rust
//! emulator corpus does it (`thiserror`-derived, one variant per failure
//! family). Every fallible core operation returns `Result<T, Error>`; the
//! run loop is the only place that should ever format one for a human.

use thiserror::Error as ThisError;

/// A single register or memory location that failed post-boot
/// verification, along with the value the core actually found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationFailure {
    pub location: String,
    pub expected: u16,
    pub actual: u16,
}

impl std::fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: expected {:#06x}, got {:#06x}", self.location, self.expected, self.actual)
    }
}

/// Fatal errors the core can raise. All of them stop the run loop; the
/// debugger (an external collaborator) is the only thing that may catch
/// one to offer post-mortem inspection.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Unknown or explicitly illegal opcode reached the decoder.
    #[error(
        "decode error at ${pc:04x}: unknown {} opcode {opcode:#04x} (raw: {raw:02x?})",
        if *prefixed { "CB-prefixed" } else { "primary" }
    )]
    Decode { pc: u16, opcode: u8, raw: Vec<u8>, prefixed: bool },

    /// Out-of-range access to a named region, or a write to a read-only one.
    #[error("memory error in region '{region}' at ${address:04x}: {message}")]
    Memory { region: &'static str, address: u16, message: &'static str },

    /// HALT, STOP, or any other instruction this core does not emulate.
    #[error("not implemented: {mnemonic} (opcode {opcode:#04x} at ${pc:04x})")]
    NotImplemented { mnemonic: &'static str, opcode: u8, pc: u16 },

    /// Post-boot register/memory snapshot did not match.
    #[error("post-boot verification failed:\n{}", join_failures(.0))]
    Verification(Vec<VerificationFailure>),
}

fn join_failures(failures: &[VerificationFailure]) -> String {
    failures.iter().map(|f| format!("  - {f}")).collect::<Vec<_>>().join("\n")
}

impl Error {
    pub fn memory(region: &'static str, address: u16, message: &'static str) -> Error {
        Error::Memory { region, address, message }
    }
}
