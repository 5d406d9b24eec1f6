//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Endpoint groups the benchmark compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Single-location endpoints spread over different regions
    Centralized,
    /// Anycast endpoints routed to the nearest location
    Distributed,
    /// Distributed endpoints behind a web application firewall
    Secured,
}

impl Category {
    /// Categories in the order they are meant to be run
    pub const ALL: [Category; 3] = [Category::Centralized, Category::Distributed, Category::Secured];

    /// Tag matched (as a substring) against catalog records
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Centralized => "centralized",
            Category::Distributed => "distributed",
            Category::Secured => "secured",
        }
    }

    /// Category a run of this one is compared against, if any
    pub fn baseline(&self) -> Option<Category> {
        match self {
            Category::Secured => Some(Category::Distributed),
            Category::Centralized | Category::Distributed => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "centralized" => Ok(Category::Centralized),
            "distributed" => Ok(Category::Distributed),
            "secured" => Ok(Category::Secured),
            other => Err(AppError::validation(format!(
                "Unknown category '{}' (expected centralized, distributed or secured)",
                other
            ))),
        }
    }
}

/// Which categories a single invocation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelection {
    One(Category),
    /// Centralized, then distributed, then secured
    All,
}

impl CategorySelection {
    pub fn categories(&self) -> Vec<Category> {
        match self {
            CategorySelection::One(category) => vec![*category],
            CategorySelection::All => Category::ALL.to_vec(),
        }
    }
}

impl FromStr for CategorySelection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategorySelection::All)
        } else {
            s.parse().map(CategorySelection::One)
        }
    }
}

/// How failed measured batches enter an endpoint's average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Failed batches are left out of the mean; no successful measured
    /// batch means no average
    #[default]
    Exclude,
    /// Any failed measured batch leaves the endpoint without an average
    Invalidate,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Exclude => "exclude",
            FailurePolicy::Invalidate => "invalidate",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exclude" => Ok(FailurePolicy::Exclude),
            "invalidate" => Ok(FailurePolicy::Invalidate),
            other => Err(AppError::validation(format!(
                "Unknown failure policy '{}' (expected exclude or invalidate)",
                other
            ))),
        }
    }
}
