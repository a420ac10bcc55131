//! Expression tracing for debugging.
//!
//! ```ignore
//! use fp_dbg::dbg;
//!
//! let x = 7;
//! let y = 5;
//! let sum = dbg!(x + y, show_vars);
//! ```
//!
//! prints to standard error
//!
//! ```text
//! src/main.rs:6
//!   x = 7
//!   y = 5
//!   x + y #=> 12
//! ```
//!
//! Method chains keep their layout when traced through [`instrument`]:
//!
//! ```ignore
//! #[fp_dbg::instrument]
//! fn doubled(list: Vec<i32>) -> Vec<i32> {
//!     list.into_iter()
//!         .map(|x| x * 2)
//!         .collect::<Vec<_>>()
//!         .dbg()
//! }
//! ```
//!
//! Building with `FP_DBG_ENV=prod` (or `production`) removes all tracing at compile time.

pub use fp_dbg_core::emit::{capture, reset_sink, set_sink};
pub use fp_dbg_macro::{dbg, instrument};

#[doc(hidden)]
pub mod __private {
    pub use fp_dbg_core::emit::{trace, Binding, Location};
    pub use fp_dbg_core::value::{Probe, RenderDebug, RenderOpaque};
}
