//! Lookup index from normalized canonical names to backbone records.
//!
//! The index is filled by an [`IdLookupBuilder`] and then frozen into an
//! immutable [`IdLookup`] that answers queries. Resolution is an exact lookup
//! of the normalized canonical name followed by lenient filtering on rank,
//! kingdom and authorship:
//!
//! 1. Candidates with an excluded identifier are dropped.
//! 2. Candidates with an incompatible rank or kingdom are dropped.
//! 3. If the query carries an authorship or year, candidates whose
//!    authorship is [`Equality::Different`] are dropped. Unknown stays.
//! 4. A single remaining candidate is the match.
//! 5. Among several candidates a single live one wins. With no or several
//!    live candidates the query is ambiguous and nothing is returned.
//!
//! # Example
//!
//! ```
//! use backbone_lookup::{BackboneRecord, IdLookupBuilder, Kingdom, Rank};
//!
//! let lookup = IdLookupBuilder::new()
//!     .load([
//!         BackboneRecord::new(9, "Abies alba", Rank::Species, Kingdom::Plantae),
//!         BackboneRecord::new(10, "Abies alba", Rank::Species, Kingdom::Plantae)
//!             .with_authorship("Mumpf.")
//!             .with_deleted(true),
//!     ])
//!     .build();
//!
//! let hit = lookup.match_authorship("Abies alba", Some("Mill."), None, Some(Rank::Species), None);
//! assert_eq!(hit.map(|r| r.key), Some(9));
//! assert_eq!(lookup.match_all("Abies  álba").len(), 2);
//! ```

use crate::authorship::{AuthorComparator, AuthorConfig};
use crate::compat::{kingdom_compatible, rank_compatible};
use crate::feed::{FeedConfig, FeedReader, FeedWriter};
use crate::normalize::normalize;
use crate::{BackboneRecord, Equality, Kingdom, QueryName, Rank, Result};
use compact_str::CompactString;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Values;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::iter::Flatten;
use std::path::Path;

/// Counters collected while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LookupStats {
    /// Indexed records
    pub records: usize,
    /// Indexed records flagged as deleted
    pub deleted: usize,
    /// Distinct normalized names
    pub names: usize,
    /// Records skipped because their name normalized to nothing
    pub skipped: usize,
    /// Largest identifier seen, skipped records included
    pub key_max: u32,
}

/// Collects backbone records into a lookup index.
///
/// Loading methods consume the builder, so a failed load never leaves a
/// partially filled index behind.
#[derive(Debug, Default)]
pub struct IdLookupBuilder {
    comparator: AuthorComparator,
    usages: HashMap<CompactString, Vec<BackboneRecord>>,
    stats: LookupStats,
}

impl IdLookupBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the author comparison of the resulting index.
    #[must_use]
    pub fn with_author_config(mut self, config: AuthorConfig) -> Self {
        self.comparator = AuthorComparator::new().with_config(config);
        self
    }

    /// Adds a single record.
    ///
    /// Returns false if the canonical name is blank after normalization, in
    /// which case the record is skipped.
    pub fn add(&mut self, record: BackboneRecord) -> bool {
        // skipped keys stay taken
        self.stats.key_max = self.stats.key_max.max(record.key);
        let Some(key) = normalize(&record.canonical) else {
            warn!(
                "Missing canonical name for {} usage {}, skipped",
                record.kingdom, record.key
            );
            self.stats.skipped += 1;
            return false;
        };

        self.stats.records += 1;
        if record.deleted {
            self.stats.deleted += 1;
        }
        self.usages
            .entry(CompactString::from(key))
            .or_default()
            .push(record);
        true
    }

    /// Adds all records of an iterator.
    #[must_use]
    pub fn load<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = BackboneRecord>,
    {
        self.extend(records);
        self
    }

    /// Adds all records of a fallible stream, aborting on the first error.
    pub fn try_load<I>(mut self, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<BackboneRecord>>,
    {
        for record in records {
            self.add(record?);
        }
        Ok(self)
    }

    /// Adds all records of a bulk feed.
    pub fn load_reader<R: Read>(self, input: R, config: &FeedConfig) -> Result<Self> {
        self.try_load(FeedReader::new(input, config))
    }

    /// Adds all records of a bulk feed file.
    pub fn load_path<P: AsRef<Path>>(self, path: P, config: &FeedConfig) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        info!("Loading backbone usages from {}", path.as_ref().display());
        self.load_reader(BufReader::new(file), config)
    }

    /// Freezes the collected records into a queryable index.
    pub fn build(mut self) -> IdLookup {
        self.stats.names = self.usages.len();
        info!(
            "Loaded {} backbone usages with {} names, {} deleted, {} skipped, max key {}",
            self.stats.records,
            self.stats.names,
            self.stats.deleted,
            self.stats.skipped,
            self.stats.key_max
        );
        IdLookup {
            comparator: self.comparator,
            usages: self.usages,
            stats: self.stats,
        }
    }
}

impl Extend<BackboneRecord> for IdLookupBuilder {
    fn extend<I: IntoIterator<Item = BackboneRecord>>(&mut self, records: I) {
        for record in records {
            self.add(record);
        }
    }
}

/// Immutable index resolving names to backbone records.
#[derive(Debug)]
pub struct IdLookup {
    comparator: AuthorComparator,
    usages: HashMap<CompactString, Vec<BackboneRecord>>,
    stats: LookupStats,
}

impl IdLookup {
    /// Resolves a query to at most one backbone record.
    pub fn resolve(&self, query: &QueryName) -> Option<&BackboneRecord> {
        let candidates = self.candidates(query)?;
        match candidates.as_slice() {
            [] => {
                debug!(
                    "No match for {:?} {:?} {} {:?} {:?}",
                    query.kingdom, query.rank, query.canonical, query.authorship, query.year
                );
                None
            }
            &[single] => Some(single),
            _ => Self::select_live(query, &candidates),
        }
    }

    /// Matches a canonical name with optional rank and kingdom.
    pub fn match_name(
        &self,
        canonical: &str,
        rank: Option<Rank>,
        kingdom: Option<Kingdom>,
    ) -> Option<&BackboneRecord> {
        self.match_authorship(canonical, None, None, rank, kingdom)
    }

    /// Matches a canonical name with authorship, year, rank and kingdom.
    pub fn match_authorship(
        &self,
        canonical: &str,
        authorship: Option<&str>,
        year: Option<&str>,
        rank: Option<Rank>,
        kingdom: Option<Kingdom>,
    ) -> Option<&BackboneRecord> {
        let query = QueryName {
            canonical: canonical.to_string(),
            authorship: authorship.map(str::to_string),
            year: year.map(str::to_string),
            rank,
            kingdom,
            ..Default::default()
        };
        self.resolve(&query)
    }

    /// All records sharing the normalized canonical name, without any filtering.
    pub fn match_all(&self, canonical: &str) -> &[BackboneRecord] {
        normalize(canonical)
            .and_then(|key| self.usages.get(key.as_str()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The single live record with exactly the query's canonical name,
    /// authorship and year and a compatible rank and kingdom.
    pub fn exact_current_match(&self, query: &QueryName) -> Option<&BackboneRecord> {
        self.match_all(&query.canonical)
            .iter()
            .filter(|r| {
                !r.deleted
                    && !query.excluded.contains(&r.key)
                    && Self::compatible(query, r)
                    && r.canonical == query.canonical
                    && r.authorship == query.authorship
                    && r.year == query.year
            })
            .exactly_one()
            .ok()
    }

    /// Resolves a batch of queries, in parallel with the `parallel` feature.
    pub fn resolve_all(&self, queries: &[QueryName]) -> Vec<Option<&BackboneRecord>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            queries.par_iter().map(|q| self.resolve(q)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            queries.iter().map(|q| self.resolve(q)).collect()
        }
    }

    /// Number of indexed records, deleted ones included.
    pub fn size(&self) -> usize {
        self.stats.records
    }

    pub fn deleted_count(&self) -> usize {
        self.stats.deleted
    }

    /// Largest identifier in the index, 0 if empty.
    pub fn key_max(&self) -> u32 {
        self.stats.key_max
    }

    pub fn stats(&self) -> LookupStats {
        self.stats
    }

    pub fn author_comparator(&self) -> &AuthorComparator {
        &self.comparator
    }

    /// Iterates over all records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &BackboneRecord> {
        self.into_iter()
    }

    /// Writes all records ordered by key in the bulk feed format.
    ///
    /// Loading the output again yields an equivalent index. Fails with
    /// [`LookupError::InvalidField`](crate::LookupError::InvalidField) if a
    /// text field holds the delimiter or a line break, as the feed has no
    /// quoting.
    pub fn export<W: Write>(&self, output: W, config: &FeedConfig) -> Result<()> {
        let mut writer = FeedWriter::new(output, config)?;
        for record in self.iter().sorted_by_key(|r| r.key) {
            writer.write(record)?;
        }
        writer.flush()
    }

    fn candidates(&self, query: &QueryName) -> Option<Vec<&BackboneRecord>> {
        let hits = self.match_all(&query.canonical);
        if hits.is_empty() {
            debug!("No usages with canonical name {}", query.canonical);
            return None;
        }

        let with_authorship = query.authorship.is_some() || query.year.is_some();
        Some(
            hits.iter()
                .filter(|r| !query.excluded.contains(&r.key))
                .filter(|r| Self::compatible(query, r))
                .filter(|r| {
                    !with_authorship
                        || self.comparator.compare(
                            query.authorship.as_deref(),
                            query.year.as_deref(),
                            r.authorship.as_deref(),
                            r.year.as_deref(),
                        ) != Equality::Different
                })
                .collect(),
        )
    }

    fn compatible(query: &QueryName, record: &BackboneRecord) -> bool {
        query.rank.is_none_or(|rank| rank_compatible(rank, record.rank))
            && query
                .kingdom
                .is_none_or(|kingdom| kingdom_compatible(kingdom, record.kingdom))
    }

    fn select_live<'a>(
        query: &QueryName,
        candidates: &[&'a BackboneRecord],
    ) -> Option<&'a BackboneRecord> {
        let live: Vec<&BackboneRecord> = candidates
            .iter()
            .copied()
            .filter(|r| !r.deleted)
            .collect();
        match live.as_slice() {
            &[current] => {
                debug!(
                    "{} matches, but only 1 current usage {} for {:?} {:?} {} {:?} {:?}",
                    candidates.len(),
                    current.key,
                    query.kingdom,
                    query.rank,
                    query.canonical,
                    query.authorship,
                    query.year
                );
                Some(current)
            }
            [] => {
                debug!(
                    "{} deleted matches only for {:?} {:?} {}",
                    candidates.len(),
                    query.kingdom,
                    query.rank,
                    query.canonical
                );
                None
            }
            _ => {
                debug!(
                    "Ambiguous match with {} current usages {:?} for {:?} {:?} {} {:?} {:?}",
                    live.len(),
                    live.iter().map(|r| r.key).collect::<Vec<_>>(),
                    query.kingdom,
                    query.rank,
                    query.canonical,
                    query.authorship,
                    query.year
                );
                None
            }
        }
    }
}

impl<'a> IntoIterator for &'a IdLookup {
    type Item = &'a BackboneRecord;
    type IntoIter = Flatten<Values<'a, CompactString, Vec<BackboneRecord>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.usages.values().flatten()
    }
}
