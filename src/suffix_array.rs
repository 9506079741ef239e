//! Suffix array over a character sequence.
//!
//! Suffixes are sorted by plain lexicographic comparison of the remaining
//! characters. That is quadratic in the worst case, which is fine for the short
//! strings (author names, tens of characters) this crate feeds it.
//!
//! The main consumer is [`longest_common_substring`], which concatenates two
//! strings around a unique sentinel and scans neighbouring suffixes that start
//! in different halves.

use std::cmp::Ordering;
use std::iter;

/// A sorted array of all suffixes of a text.
#[derive(Debug, Clone)]
pub struct SuffixArray {
    text: Vec<char>,
    /// Start positions of the suffixes in sorted order
    suffixes: Vec<usize>,
}

impl SuffixArray {
    /// Builds the suffix array for `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use backbone_lookup::suffix_array::SuffixArray;
    ///
    /// let sa = SuffixArray::new("abracadabra");
    /// assert_eq!(sa.select(0).as_deref(), Some("a"));
    /// assert_eq!(sa.lcp(2), Some(4));
    /// ```
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::from_chars(text.chars().collect())
    }

    fn from_chars(text: Vec<char>) -> Self {
        let mut suffixes: Vec<usize> = (0..text.len()).collect();
        suffixes.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        Self { text, suffixes }
    }

    /// Number of suffixes, i.e. the length of the text in characters.
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Start position in the text of the `i`th smallest suffix.
    pub fn index(&self, i: usize) -> Option<usize> {
        self.suffixes.get(i).copied()
    }

    /// Length of the longest common prefix of the `i`th and `i-1`st smallest suffix.
    ///
    /// Returns `None` for `i == 0` or `i >= len()`.
    pub fn lcp(&self, i: usize) -> Option<usize> {
        if i == 0 || i >= self.suffixes.len() {
            return None;
        }
        Some(self.common_prefix(self.suffixes[i], self.suffixes[i - 1]))
    }

    /// The `i`th smallest suffix as a string.
    pub fn select(&self, i: usize) -> Option<String> {
        self.index(i).map(|start| self.text[start..].iter().collect())
    }

    /// Number of suffixes strictly smaller than `query`.
    ///
    /// If `query` is itself a suffix its position in the array is returned.
    pub fn rank(&self, query: &str) -> usize {
        let query: Vec<char> = query.chars().collect();
        let (mut lo, mut hi) = (0usize, self.suffixes.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match query.as_slice().cmp(&self.text[self.suffixes[mid]..]) {
                Ordering::Less => hi = mid,
                Ordering::Greater => lo = mid + 1,
                Ordering::Equal => return mid,
            }
        }
        lo
    }

    fn common_prefix(&self, a: usize, b: usize) -> usize {
        self.text[a..]
            .iter()
            .zip(&self.text[b..])
            .take_while(|(x, y)| x == y)
            .count()
    }
}

/// Returns the longest contiguous run of characters shared by `s1` and `s2`.
///
/// Ties are resolved by the first candidate found while scanning the sorted
/// suffixes, so the result is deterministic. Returns an empty string if the
/// inputs share no character.
///
/// # Examples
///
/// ```
/// use backbone_lookup::suffix_array::longest_common_substring;
///
/// assert_eq!(longest_common_substring("markus", "mama"), "ma");
/// assert_eq!(longest_common_substring("a", "node"), "");
/// ```
pub fn longest_common_substring(s1: &str, s2: &str) -> String {
    if s1.is_empty() || s2.is_empty() {
        return String::new();
    }

    let sentinel = (0u32..)
        .filter_map(char::from_u32)
        .find(|c| !s1.contains(*c) && !s2.contains(*c))
        .unwrap_or(char::MAX);
    let split = s1.chars().count();
    let text: Vec<char> = s1
        .chars()
        .chain(iter::once(sentinel))
        .chain(s2.chars())
        .collect();
    let sa = SuffixArray::from_chars(text);

    let mut best_len = 0;
    let mut best_start = 0;
    for i in 1..sa.len() {
        let (a, b) = (sa.suffixes[i], sa.suffixes[i - 1]);
        // only pairs with one suffix from each input count
        if (a < split) == (b < split) {
            continue;
        }
        let len = sa.common_prefix(a, b);
        if len > best_len {
            best_len = len;
            best_start = a;
        }
    }

    sa.text[best_start..best_start + best_len].iter().collect()
}
