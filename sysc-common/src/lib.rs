//! SysY Compiler - Common Types and Utilities
//!
//! This crate contains the error type shared by every phase of the
//! compiler.

pub mod error;

pub use error::CompilerError;
