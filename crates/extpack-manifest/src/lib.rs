//! Dependency manifest handling for extpack.
//!
//! This crate loads the dependency manifest (once per process), resolves a
//! package's entry to an ordered token list, classifies those tokens and
//! expands extension locators into concrete archive locations.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod locator;
pub mod manifest;
pub mod package;
pub mod plan;
pub mod resolver;
pub mod token;
pub mod version;

/// Placeholder substituted with the package list in the install command.
pub const PACKAGES_PLACEHOLDER: &str = "${packages}";

pub use cache::ManifestCache;
pub use error::{Error, Result};
pub use fetch::{Fetch, FetchOptions, Fetcher};
pub use locator::LocatorTemplate;
pub use manifest::{DependencySpec, Manifest};
pub use package::PackageDescriptor;
pub use plan::{BuildMode, DependencyPlan, classify_and_expand};
pub use resolver::resolve;
pub use token::Token;
pub use version::{Version, VersionRequirement};
