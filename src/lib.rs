//! Stable identifier resolution for a taxonomic backbone.
//!
//! `backbone_lookup` decides whether a freshly parsed scientific name denotes a
//! record already known to the backbone and, if so, which one. Identifiers are
//! never reassigned, so the resolver prefers to return nothing over guessing.
//!
//! # Key Features
//!
//! - **Name normalization**: diacritics, ligatures, hybrid markers and common
//!   epithet spelling variants collapse to one lookup key
//! - **Fuzzy authorship comparison**: abbreviations, common substrings and a
//!   one year tolerance for publication dates
//! - **Rank and kingdom compatibility**: wildcard ranks, unknown kingdoms and
//!   historically paraphyletic kingdoms
//! - **Conservative ambiguity policy**: among several candidates only a single
//!   live record wins
//! - **Bulk loading** from tab separated backbone dumps, and export back to it
//!
//! # Basic Usage
//!
//! ```rust
//! use backbone_lookup::{BackboneRecord, IdLookupBuilder, Kingdom, QueryName, Rank};
//!
//! let lookup = IdLookupBuilder::new()
//!     .load([
//!         BackboneRecord::new(2, "Oenanthe", Rank::Genus, Kingdom::Animalia)
//!             .with_authorship("Vieillot")
//!             .with_year("1816"),
//!         BackboneRecord::new(3, "Oenanthe", Rank::Genus, Kingdom::Plantae)
//!             .with_authorship("Linnaeus")
//!             .with_year("1753"),
//!     ])
//!     .build();
//!
//! let query = QueryName::new("Œnanthe").with_rank(Rank::Genus).with_kingdom(Kingdom::Plantae);
//! assert_eq!(lookup.resolve(&query).map(|r| r.key), Some(3));
//!
//! // both records are live, so an unqualified query is ambiguous
//! assert_eq!(lookup.match_name("Oenanthe", Some(Rank::Genus), None), None);
//! ```
//!
//! # Loading a Backbone Dump
//!
//! ```rust
//! use backbone_lookup::{IdLookupBuilder, feed::FeedConfig};
//!
//! let dump = "1\tAnimalia\t\t\tKINGDOM\t1\tf\n7\tRodentia\tBowdich\t1821\tORDER\t1\tf\n";
//! let lookup = IdLookupBuilder::new()
//!     .load_reader(dump.as_bytes(), &FeedConfig::new())
//!     .unwrap()
//!     .build();
//! assert_eq!(lookup.size(), 2);
//! assert_eq!(lookup.key_max(), 7);
//! ```
//!
//! # Error Handling
//!
//! Only loading can fail. Queries never return errors, they return `None`
//! instead. Loading uses the crate [`Result`] type wrapping [`LookupError`]:
//!
//! ```rust
//! use backbone_lookup::{IdLookupBuilder, LookupError, feed::FeedConfig};
//!
//! let result = IdLookupBuilder::new().load_reader("1\tAbies\t\t\tGENUSS\t6\tf".as_bytes(), &FeedConfig::new());
//! match result {
//!     Err(LookupError::InvalidRank { line, value }) => eprintln!("bad rank {value} on line {line}"),
//!     Err(e) => eprintln!("load failed: {e}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! # Thread Safety
//!
//! A built [`IdLookup`] is immutable and can be shared between threads, e.g.
//! behind an `Arc`. With the `parallel` feature [`IdLookup::resolve_all`]
//! resolves batches of queries on the rayon thread pool.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub mod authorship;
pub mod compat;
pub mod feed;
pub mod lookup;
pub mod normalize;
mod regex;
pub mod suffix_array;
pub mod vocabulary;

// Reexports
pub use authorship::{AuthorComparator, AuthorConfig};
pub use lookup::{IdLookup, IdLookupBuilder, LookupStats};
pub use vocabulary::{Kingdom, Rank};

/// A specialized Result type for loading operations.
pub type Result<T> = std::result::Result<T, LookupError>;

/// Errors raised while building a lookup index.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Loading failed after {consumed} records: {message}")]
    LoadFailed { consumed: usize, message: String },

    #[error("Unknown rank {value:?} at line {line}")]
    InvalidRank { line: usize, value: String },

    #[error("Unknown kingdom {value:?} at line {line}")]
    InvalidKingdom { line: usize, value: String },

    #[error("Invalid field value: {field} - {message} at line {line}")]
    InvalidField {
        line: usize,
        field: String,
        message: String,
    },
}

/// Outcome of a fuzzy comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equality {
    Equal,
    Different,
    /// Not enough information to decide.
    Unknown,
}

impl Equality {
    /// Combines two verdicts: any `Different` wins, two `Equal` stay equal,
    /// everything else is `Unknown`.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Equality::Different, _) | (_, Equality::Different) => Equality::Different,
            (Equality::Equal, Equality::Equal) => Equality::Equal,
            _ => Equality::Unknown,
        }
    }
}

/// A name usage of the backbone bound to a stable identifier.
///
/// Deleted records are kept. Their identifier must never be reused and they
/// can still be matched if nothing better exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackboneRecord {
    /// Stable identifier
    pub key: u32,
    /// Canonical name without authorship
    pub canonical: String,
    pub authorship: Option<String>,
    /// Publication year, possibly with `?` placeholders
    pub year: Option<String>,
    pub rank: Rank,
    pub kingdom: Kingdom,
    /// Logically retired record
    pub deleted: bool,
}

impl BackboneRecord {
    /// Creates a live record without authorship and year.
    #[must_use]
    pub fn new(key: u32, canonical: impl Into<String>, rank: Rank, kingdom: Kingdom) -> Self {
        Self {
            key,
            canonical: canonical.into(),
            authorship: None,
            year: None,
            rank,
            kingdom,
            deleted: false,
        }
    }

    pub fn with_authorship(mut self, authorship: impl Into<String>) -> Self {
        self.authorship = Some(authorship.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }
}

/// A parsed name to be resolved against the backbone.
///
/// Absent rank and kingdom match anything.
///
/// # Examples
///
/// ```
/// use backbone_lookup::{Kingdom, QueryName, Rank};
///
/// let query = QueryName::new("Abies alba")
///     .with_authorship("Mill.")
///     .with_rank(Rank::Species)
///     .with_kingdom(Kingdom::Plantae)
///     .excluding([10, 11]);
/// assert!(query.excluded.contains(&10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryName {
    pub canonical: String,
    pub authorship: Option<String>,
    pub year: Option<String>,
    pub rank: Option<Rank>,
    pub kingdom: Option<Kingdom>,
    /// Identifiers that must not be returned, e.g. already assigned ones
    pub excluded: HashSet<u32>,
}

impl QueryName {
    #[must_use]
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            ..Default::default()
        }
    }

    pub fn with_authorship(mut self, authorship: impl Into<String>) -> Self {
        self.authorship = Some(authorship.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_kingdom(mut self, kingdom: Kingdom) -> Self {
        self.kingdom = Some(kingdom);
        self
    }

    pub fn excluding(mut self, keys: impl IntoIterator<Item = u32>) -> Self {
        self.excluded.extend(keys);
        self
    }
}
