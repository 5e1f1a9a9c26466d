//! Data models for the artwork catalog.
//!
//! Field names follow the catalog API's JSON so the types decode directly;
//! the response envelopes are converted into [`Page`] before they leave the
//! network layer.

mod artwork;
mod response;
mod scope;

pub use artwork::*;
pub use response::*;
pub use scope::*;
