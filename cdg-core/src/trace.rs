//! Instruction tracing using the Rust tracing crate.
//!
//! Every instruction applied to the frame buffer is reported as a TRACE level
//! event on the `cdg_render` target. Nothing is recorded unless a subscriber
//! enables that target, so the cost when tracing is off is a filter check.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, EnvFilter};
//!
//! tracing::subscriber::with_default(
//!     fmt::Subscriber::builder()
//!         .with_env_filter(EnvFilter::new("cdg_render=trace"))
//!         .finish(),
//!     || {
//!         let mut renderer = cdg_core::Renderer::default();
//!         for timed in cdg_core::decode(&bytes).instructions() {
//!             renderer.apply(&timed.instruction);
//!         }
//!     },
//! );
//! ```

use crate::Instruction;

pub const RENDER_TARGET: &str = "cdg_render";

/// Trace event for a single applied instruction.
#[inline]
pub fn instruction(instruction: &Instruction) {
    tracing::event!(
        target: RENDER_TARGET,
        tracing::Level::TRACE,
        instruction = instruction.name(),
        "APPLY_INSTRUCTION"
    );
}
