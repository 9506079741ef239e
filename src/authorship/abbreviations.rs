//! Dictionary of abbreviated author names.

use super::AuthorComparator;
use std::collections::HashMap;
use std::sync::LazyLock;

static BUNDLED: LazyLock<AuthorMap> = LazyLock::new(|| AuthorMap::from_tsv(BUNDLED_TSV));

const BUNDLED_TSV: &str = include_str!("authormap.tsv");

/// Maps abbreviated author strings to their full form.
///
/// Keys and values are stored in their normalized form, see
/// [`AuthorComparator::normalize`]. Pairs where either side normalizes to
/// nothing are dropped.
///
/// # Examples
///
/// ```
/// use backbone_lookup::authorship::AuthorMap;
///
/// let map = AuthorMap::from_pairs([("Rchb.", "Reichenbach"), ("", "Nobody")]);
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.expand("rchb"), "reichenbach");
/// assert_eq!(map.expand("rchb f"), "rchb f");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorMap {
    entries: HashMap<String, String>,
}

impl AuthorMap {
    /// A map without entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dictionary compiled into the crate.
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .filter_map(|(abbr, full)| {
                let abbr = AuthorComparator::normalize(abbr.as_ref())?;
                let full = AuthorComparator::normalize(full.as_ref())?;
                Some((abbr, full))
            })
            .collect();
        Self { entries }
    }

    /// Reads tab separated `abbreviation<TAB>full name` lines.
    ///
    /// Blank lines, lines starting with `#` and lines without a tab are skipped.
    pub fn from_tsv(text: &str) -> Self {
        Self::from_pairs(
            text.lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .filter_map(|line| line.split_once('\t')),
        )
    }

    /// Returns the full form of a normalized author string, or the input itself.
    pub fn expand<'a>(&'a self, normalized: &'a str) -> &'a str {
        self.entries
            .get(normalized)
            .map_or(normalized, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for AuthorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
