//! Fuzzy comparison of authorships and publication years.
//!
//! Author strings are abbreviated in countless ways, so an exact comparison is
//! useless for matching names from different sources. [`AuthorComparator`]
//! folds authors to lower-case ASCII without punctuation and then accepts
//! either a long common substring or an abbreviation that is a prefix of the
//! full name. A dictionary of known abbreviations is consulted when the plain
//! comparison fails.
//!
//! # Example
//!
//! ```
//! use backbone_lookup::Equality;
//! use backbone_lookup::authorship::AuthorComparator;
//!
//! let comp = AuthorComparator::new();
//! assert_eq!(comp.compare_author(Some("Mill."), Some("Miller")), Equality::Equal);
//! assert_eq!(comp.compare_author(Some("A. Nelson"), Some("E. Nelson")), Equality::Different);
//! assert_eq!(comp.compare_author(Some("L."), None), Equality::Unknown);
//! ```

mod abbreviations;
mod year;

pub use abbreviations::AuthorMap;
pub use year::compare_year;

use crate::Equality;
use crate::normalize::fold_to_ascii;
use crate::regex::Regex;
use crate::suffix_array::longest_common_substring;
use itertools::Itertools;
use std::sync::LazyLock;

static AND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)( et | and |&amp;|&)").unwrap());
static SINGLE_INITIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])(?:\.\s*|\s+)([A-Z][a-z]+)\.?$").unwrap());

/// Configuration for [`AuthorComparator`].
#[derive(Debug, Clone)]
pub struct AuthorConfig {
    /// Minimum length of a common substring for two authors to be considered equal.
    pub min_common_substring: usize,
    /// Abbreviation dictionary. `None` uses the bundled one.
    pub abbreviations: Option<AuthorMap>,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            min_common_substring: 4,
            abbreviations: None,
        }
    }
}

/// Compares authorships and years of two names.
///
/// The comparator is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct AuthorComparator {
    min_common_substring: usize,
    abbreviations: AuthorMap,
}

impl Default for AuthorComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorComparator {
    /// Creates a comparator with the default configuration and the bundled
    /// abbreviation dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_common_substring: AuthorConfig::default().min_common_substring,
            abbreviations: AuthorMap::bundled(),
        }
    }

    pub fn with_config(mut self, config: AuthorConfig) -> Self {
        self.min_common_substring = config.min_common_substring;
        self.abbreviations = config.abbreviations.unwrap_or_else(AuthorMap::bundled);
        log::debug!(
            "Author comparator with {} abbreviation entries, min common substring {}",
            self.abbreviations.len(),
            self.min_common_substring
        );
        self
    }

    /// Compares author and year of two names.
    ///
    /// Authors decide if they are equal. Otherwise a known year verdict
    /// overrides the author verdict, as years are the more reliable signal.
    pub fn compare(
        &self,
        author1: Option<&str>,
        year1: Option<&str>,
        author2: Option<&str>,
        year2: Option<&str>,
    ) -> Equality {
        let authors = self.compare_author(author1, author2);
        if authors == Equality::Equal {
            return authors;
        }
        match compare_year(year1, year2) {
            Equality::Unknown => authors,
            years => years,
        }
    }

    /// Like [`compare`](Self::compare), but requires the authors to be equal
    /// and, if any year is given, the years as well.
    pub fn compare_strict(
        &self,
        author1: Option<&str>,
        year1: Option<&str>,
        author2: Option<&str>,
        year2: Option<&str>,
    ) -> bool {
        if self.compare_author(author1, author2) != Equality::Equal {
            return false;
        }
        if year1.is_none() && year2.is_none() {
            return true;
        }
        compare_year(year1, year2) == Equality::Equal
    }

    /// Compares two authorships, ignoring years.
    pub fn compare_author(&self, author1: Option<&str>, author2: Option<&str>) -> Equality {
        let (Some(raw1), Some(raw2)) = (author1, author2) else {
            return Equality::Unknown;
        };
        let (Some(a1), Some(a2)) = (Self::normalize(raw1), Self::normalize(raw2)) else {
            return Equality::Unknown;
        };

        let equality = self.compare_normalized(raw1, raw2, &a1, &a2);
        if equality == Equality::Equal {
            return equality;
        }

        // retry with known abbreviations expanded
        let (e1, e2) = (self.abbreviations.expand(&a1), self.abbreviations.expand(&a2));
        if e1 != a1 || e2 != a2 {
            return self.compare_normalized(raw1, raw2, e1, e2);
        }
        equality
    }

    /// Normalizes an authorship to lower-case ASCII words without punctuation.
    ///
    /// Author conjunctions (`et`, `and`, `&`) are dropped. Returns `None` if
    /// nothing is left.
    ///
    /// ```
    /// use backbone_lookup::authorship::AuthorComparator;
    ///
    /// assert_eq!(
    ///     AuthorComparator::normalize("A.J. White, Herbert et P.J. Harvey").as_deref(),
    ///     Some("a j white herbert p j harvey")
    /// );
    /// assert_eq!(AuthorComparator::normalize(" (-) "), None);
    /// ```
    pub fn normalize(author: &str) -> Option<String> {
        let author = AND.replace_all(author, " ");
        let ascii: String = fold_to_ascii(&author)
            .chars()
            .filter(char::is_ascii)
            .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
            .collect();
        let normalized = ascii.split_whitespace().join(" ").to_ascii_lowercase();
        (!normalized.is_empty()).then_some(normalized)
    }

    fn compare_normalized(&self, raw1: &str, raw2: &str, a1: &str, a2: &str) -> Equality {
        if a1 == a2 {
            return Equality::Equal;
        }

        let common = longest_common_substring(a1, a2);
        if common.len() >= self.min_common_substring {
            // relatives such as "A. Nelson" and "E. Nelson" share their surname
            match (single_initial(raw1), single_initial(raw2)) {
                (Some(i1), Some(i2)) if i1 != i2 => Equality::Different,
                _ => Equality::Equal,
            }
        } else if (common == a1 && a2.starts_with(a1)) || (common == a2 && a1.starts_with(a2)) {
            Equality::Equal
        } else {
            Equality::Different
        }
    }
}

/// Initial of an authorship consisting of exactly one initial and a surname.
fn single_initial(author: &str) -> Option<char> {
    let folded = fold_to_ascii(author.trim());
    let caps = SINGLE_INITIAL.captures(&folded)?;
    caps[1].chars().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn plain() -> AuthorComparator {
        AuthorComparator::new().with_config(AuthorConfig {
            abbreviations: Some(AuthorMap::empty()),
            ..Default::default()
        })
    }

    #[rstest]
    #[case("Döring", Some("doring"))]
    #[case("Désírèñø", Some("desireno"))]
    #[case("A.J. White", Some("a j white"))]
    #[case("J A  WHITE", Some("j a white"))]
    #[case("A-J-White", Some("a j white"))]
    #[case("(A.J. White)", Some("a j white"))]
    #[case("A. J. White, Herbert  &  P. J. Harvey", Some("a j white herbert p j harvey"))]
    #[case("A.J. White, Herbert et P.J. Harvey", Some("a j white herbert p j harvey"))]
    #[case("A.J. White, Herbert and P.J. Harvey", Some("a j white herbert p j harvey"))]
    #[case("Smith &amp; Wesson", Some("smith wesson"))]
    #[case(" ", None)]
    #[case(".", None)]
    #[case(" (-) ", None)]
    fn test_normalize(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(AuthorComparator::normalize(input).as_deref(), expected);
    }

    #[rstest]
    #[case(Some("L."), Some("Linne"), Equality::Equal)]
    #[case(Some("Linné"), Some("Linne"), Equality::Equal)]
    #[case(Some("Linné"), Some("Carl von Linne"), Equality::Equal)]
    #[case(Some("L."), Some("Lin."), Equality::Equal)]
    #[case(Some("DC."), Some("De Candolle"), Equality::Different)]
    #[case(Some("DC."), Some("DCandolle"), Equality::Equal)]
    #[case(Some("Miller"), Some("Mill."), Equality::Equal)]
    #[case(Some("Hern."), Some("Hernandez"), Equality::Equal)]
    #[case(Some("Robertson, T., Miller, P. et Jameson, R. J."), Some("Miller"), Equality::Equal)]
    #[case(Some("T. Robertson, P. Miller & R.J. Jameson"), Some("Miller"), Equality::Equal)]
    #[case(Some("T. Robertson, P. Miller & R.J. Jameson"), Some("Mülles"), Equality::Different)]
    #[case(Some("Voet"), Some("Weyenbergh"), Equality::Different)]
    #[case(Some("Voet"), Some("Voetington"), Equality::Equal)]
    #[case(Some("Voet"), Some("Vellington"), Equality::Different)]
    #[case(Some("A. Nelson"), Some("E. Nelson"), Equality::Different)]
    #[case(Some("A. Nelson"), Some("A.Nelson"), Equality::Equal)]
    #[case(Some("A. Nelson"), Some("Nelson"), Equality::Equal)]
    #[case(Some("L."), None, Equality::Unknown)]
    #[case(None, None, Equality::Unknown)]
    #[case(Some("."), Some("Miller"), Equality::Unknown)]
    fn test_compare_author(
        #[case] a1: Option<&str>,
        #[case] a2: Option<&str>,
        #[case] expected: Equality,
    ) {
        let comp = plain();
        assert_eq!(comp.compare_author(a1, a2), expected);
        assert_eq!(comp.compare_author(a2, a1), expected);
    }

    #[rstest]
    #[case("DC.", "De Candolle")]
    #[case("Rchb.", "Reichenbach")]
    #[case("R.Br.", "Brown")]
    fn test_compare_author_with_abbreviations(#[case] a1: &str, #[case] a2: &str) {
        let comp = AuthorComparator::new();
        assert_eq!(comp.compare_author(Some(a1), Some(a2)), Equality::Equal);
        assert_eq!(comp.compare_author(Some(a2), Some(a1)), Equality::Equal);
        assert_eq!(plain().compare_author(Some(a1), Some(a2)), Equality::Different);
    }

    #[test]
    fn test_min_common_substring() {
        let comp = AuthorComparator::new().with_config(AuthorConfig {
            min_common_substring: 6,
            abbreviations: Some(AuthorMap::empty()),
        });
        assert_eq!(comp.compare_author(Some("Voet"), Some("Voetington")), Equality::Equal);
        assert_eq!(comp.compare_author(Some("Hern."), Some("Hernandez")), Equality::Equal);
        assert_eq!(comp.compare_author(Some("Bernard"), Some("Hernandez")), Equality::Different);
        assert_eq!(plain().compare_author(Some("Bernard"), Some("Hernandez")), Equality::Equal);
    }

    #[rstest]
    #[case(Some("L."), Some("1847"), Some("Linne"), Some("1877"), Equality::Equal)]
    #[case(Some("Linné"), Some("1847"), Some("Carl von Linne"), Some("1847"), Equality::Equal)]
    #[case(Some("P. Miller"), Some("1754"), Some("O. Kuntze"), Some("1891"), Equality::Different)]
    #[case(Some("P. Miller"), Some("1754"), Some("Voet, ?"), Some("1806"), Equality::Different)]
    #[case(Some("Voet, ?"), Some("1806"), Some("Weyenbergh"), Some("1874"), Equality::Different)]
    #[case(Some("Voet, ?"), Some("1806"), Some("Weyenbergh"), Some("1806"), Equality::Equal)]
    #[case(Some("Mill."), Some("1823"), Some("Bowdich"), Some("1821"), Equality::Different)]
    #[case(Some("Bowdich"), Some("1221"), Some("Bowdich"), Some("1821"), Equality::Equal)]
    #[case(None, Some("1821"), Some("Bowdich"), Some("1821"), Equality::Equal)]
    #[case(None, Some("1778"), Some("Mumpf."), None, Equality::Unknown)]
    #[case(Some("Döring"), Some("1778"), None, Some("1778"), Equality::Equal)]
    #[case(Some("Döring"), Some("1778"), Some("Mumpf."), None, Equality::Different)]
    #[case(None, None, None, None, Equality::Unknown)]
    fn test_compare(
        #[case] a1: Option<&str>,
        #[case] y1: Option<&str>,
        #[case] a2: Option<&str>,
        #[case] y2: Option<&str>,
        #[case] expected: Equality,
    ) {
        let comp = AuthorComparator::new();
        assert_eq!(comp.compare(a1, y1, a2, y2), expected);
        assert_eq!(comp.compare(a2, y2, a1, y1), expected);
    }

    #[rstest]
    #[case(Some("Mill."), None, Some("Miller"), None, true)]
    #[case(Some("Mill."), Some("1768"), Some("Miller"), None, false)]
    #[case(Some("Mill."), Some("1768"), Some("Miller"), Some("1767"), true)]
    #[case(Some("Mill."), Some("1768"), Some("Miller"), Some("1770"), false)]
    #[case(Some("Mill."), None, Some("Bowdich"), None, false)]
    #[case(None, Some("1768"), None, Some("1768"), false)]
    fn test_compare_strict(
        #[case] a1: Option<&str>,
        #[case] y1: Option<&str>,
        #[case] a2: Option<&str>,
        #[case] y2: Option<&str>,
        #[case] expected: bool,
    ) {
        let comp = AuthorComparator::new();
        assert_eq!(comp.compare_strict(a1, y1, a2, y2), expected);
    }

    #[rstest]
    #[case("A. Nelson", Some('A'))]
    #[case("E.Nelson", Some('E'))]
    #[case("É. Nelson", Some('E'))]
    #[case("A.J. Nelson", None)]
    #[case("Nelson", None)]
    #[case("A. Nelson & B. Miller", None)]
    fn test_single_initial(#[case] author: &str, #[case] expected: Option<char>) {
        assert_eq!(single_initial(author), expected);
    }
}
