//! # visreg-core
//!
//! Core types for the visreg visual-regression system.
//!
//! A comparison takes a selector and a named baseline, asks the diffing engine
//! to check the located region against the stored baseline, and reports
//! whether the two match.
//!
//! ## Contents
//!
//! - [`VisregError`] and [`EngineError`]: the unified error taxonomy
//! - [`CompareOptions`] and [`CompareConfig`]: per-call options and the merged
//!   configuration handed to the diffing engine
//! - [`DiffReport`], [`Region`], [`Selector`], [`SessionId`]: comparison data
//! - [`config::VisregSettings`]: repository-level settings from `.visreg/config.toml`
//! - [`logging`]: tracing subscriber setup for hosts and tests

pub mod config;
mod error;
pub mod logging;
mod types;

pub use config::VisregSettings;
pub use error::{EngineError, Result, VisregError};
pub use types::*;
