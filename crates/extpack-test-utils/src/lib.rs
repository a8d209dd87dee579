//! Shared test utilities for the extpack workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`tree`]: directory trees with explicit modes, and snapshots to compare them
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace) with a manifest,
//!   an extension directory and a working directory

pub mod tree;
pub mod workspace;
