//! # Swimtime Client
//!
//! The `swimtime` command-line client. It talks to the club backend through
//! [`api::ApiStore`], or to a local JSON snapshot, and drives
//! `swimtime_engine` for listing, exports, imports and personal bests.

pub mod api;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

pub use error::{AppError, Result};
