//! Network access for the catalog API.
//!
//! This module provides:
//! - An HTTP client wrapper with timeouts, identity headers, and status checks
//! - The catalog client and the [`CatalogSource`] seam the session talks to

mod catalog;
mod client;

pub use catalog::{CatalogClient, CatalogSource};
pub use client::{extract_domain, HttpClient};
