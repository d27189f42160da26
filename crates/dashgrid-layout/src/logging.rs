//! Structured logging shims.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it they
//! expand to nothing, so the engine carries no logging dependency by default.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {debug, trace};
