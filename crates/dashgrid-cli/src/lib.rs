#![forbid(unsafe_code)]

//! `dashgrid`: inspect and edit a persisted two-column dashboard layout from
//! the command line.
//!
//! The layout lives in a state directory as the two JSON values the layout
//! engine persists (`module-layout.json`, `module-spans.json`). Every
//! mutating command loads, applies one [`dashgrid_layout::LayoutOperation`]
//! and writes back only when the layout actually changed.

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod store;

pub use cli::{Cli, Commands, run, run_from_env, run_with_output};
pub use config::DashgridConfig;
pub use error::{CliError, Result};
pub use store::DirStore;
