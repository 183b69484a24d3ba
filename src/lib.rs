//! Loading core for a self-hosted start page.
//!
//! Five independent JSON documents (apps, bookmarks, search providers, themes
//! and imprint) are loaded concurrently by a [`ResourceLoader`] and published
//! as one [`DashboardState`] by a [`DashboardStore`]. A document that fails to
//! load only affects its own slice of the state.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod services;

pub use config::{AppConfig, LoadStrategy};
pub use dashboard::{DashboardState, DashboardStore, Slice};
pub use services::{ResourceKind, ResourceLoader};
