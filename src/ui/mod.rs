//! UI module for consistent CLI output
//!
//! Uses `cliclack` for styled output in terminals, with automatic fallback
//! to plain output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use swbuild::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect();
//!
//! ui::intro(&ctx, "Precache manifest");
//! ui::step_warn(&ctx, "big.js is 3000000 bytes, and won't be precached.");
//! ui::outro_success(&ctx, "12 entries, 40213 bytes");
//! ```

mod context;
mod output;

pub use context::UiContext;
pub use output::{intro, outro_success, step_info, step_ok_detail, step_warn};
