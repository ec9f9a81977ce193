//! Toolchain invocation for the memeasm compiler.
//!
//! `memeasm_ir` only ever produces assembly text; this crate is the
//! downstream collaborator (distilled spec §1's "out of scope") that shells
//! out to a platform assembler and linker driver to turn that text into a
//! runnable binary.

pub mod process;
pub mod toolchain;

pub use process::{ExitStatus, ProcessBuilder};
pub use toolchain::Toolchain;
