//! Which endpoint and parameters a catalog fetch uses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Browsing the full listing or searching by term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Browsing,
    Searching,
}

/// The (mode, query) pair a fetch is issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Browse,
    Search(String),
}

impl Scope {
    /// Scope for a search box value: empty text browses.
    pub fn from_term(term: &str) -> Self {
        if term.is_empty() {
            Scope::Browse
        } else {
            Scope::Search(term.to_string())
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Scope::Browse => Mode::Browsing,
            Scope::Search(_) => Mode::Searching,
        }
    }

    /// The search term, or `""` while browsing.
    pub fn query(&self) -> &str {
        match self {
            Scope::Browse => "",
            Scope::Search(term) => term,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Browse => write!(f, "browse"),
            Scope::Search(term) => write!(f, "search '{}'", term),
        }
    }
}
