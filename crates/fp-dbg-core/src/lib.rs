//! Build-time engine behind `fp_dbg::dbg!` and `#[fp_dbg::instrument]`.
//!
//! The front end lowers a host expression into [`ast::Node`]; [`instrument::instrument`]
//! turns it into a [`instrument::TracePlan`] (or a bypass in production builds) and the
//! generated code reports through [`emit`] at run time.

#[macro_use]
pub mod macros;

pub mod ast;
pub mod config;
pub mod doc;
pub mod emit;
pub mod error;
pub mod extract;
pub mod instrument;
pub mod locate;
pub mod reconstruct;
pub mod render;
pub mod source;
pub mod value;

// Re-export commonly used items for convenience
pub use tracing;

pub use ast::{Name, Node, NodeKind};
pub use config::{BuildMode, Config, Options};
pub use instrument::{instrument, Instrumentation, TracePlan};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
