//! Canonical name normalization.
//!
//! Turns a parsed canonical name into the key used by the lookup index. The key
//! folds diacritics and ligatures to ASCII, drops hybrid markers and
//! punctuation, collapses whitespace and is lower-cased. Bi- and trinomials
//! additionally get their epithets normalized so that common orthographic and
//! gender variants collide:
//!
//! ```
//! use backbone_lookup::normalize::normalize;
//!
//! assert_eq!(normalize("Abies albus"), normalize("Abies alba"));
//! assert_eq!(normalize("Carex ×cayouettei").as_deref(), Some("carex caioueti"));
//! assert_eq!(normalize("  "), None);
//! ```
//!
//! Monomials are left alone apart from the basic folding, otherwise genus and
//! family names of different ranks would start to collide.

use crate::regex::Regex;
use itertools::Itertools;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static HYBRID_GENUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[×xX]\s*([A-Z])").unwrap());
static HYBRID_EPITHET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(?:×\s*|[xX]\s+)([^A-Z])").unwrap());
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['‘’"`_-]"#).unwrap());
static SUFFIX_A: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:on|um|us|a)$").unwrap());
static SUFFIX_I: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ei$").unwrap());
static I_VARIANTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\B[jyi]+").unwrap());
static TRH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([tr])h").unwrap());

/// Letters that canonical decomposition leaves untouched.
const SPECIAL_FOLDS: [(char, &str); 20] = [
    ('æ', "ae"),
    ('Æ', "AE"),
    ('œ', "oe"),
    ('Œ', "OE"),
    ('ø', "o"),
    ('Ø', "O"),
    ('ß', "ss"),
    ('ẞ', "SS"),
    ('ł', "l"),
    ('Ł', "L"),
    ('đ', "d"),
    ('Đ', "D"),
    ('ð', "d"),
    ('Ð', "D"),
    ('þ', "th"),
    ('Þ', "TH"),
    ('ı', "i"),
    ('ħ', "h"),
    ('Ħ', "H"),
    ('ŀ', "l"),
];

/// Normalizes a canonical name into its lookup key.
///
/// Returns `None` for blank input or if nothing is left after normalization.
/// Applying `normalize` to its own output returns the same key.
///
/// Keys are lower-case, so a separate `x` word before an epithet always counts
/// as a hybrid cross here, even where [`remove_hybrid_cross`] keeps it because
/// a capitalized word follows.
///
/// ```
/// use backbone_lookup::normalize::normalize;
///
/// assert_eq!(normalize("Salix x Alba"), normalize("Salix alba"));
/// ```
pub fn normalize(name: &str) -> Option<String> {
    normalize_to_fixpoint(name, false)
}

/// Like [`normalize`], but also applies the epithet rules to monomials and to
/// the genus part of a name.
///
/// ```
/// use backbone_lookup::normalize::normalize_all;
///
/// assert_eq!(normalize_all("Rhododendron").as_deref(), Some("rododendra"));
/// ```
pub fn normalize_all(name: &str) -> Option<String> {
    normalize_to_fixpoint(name, true)
}

/// Removes an explicit hybrid cross from a name.
///
/// A leading `×` or `x` in front of a capitalized genus is dropped, as is a
/// `×` (or a separate `x` word) in front of a lower-case epithet.
///
/// ```
/// use backbone_lookup::normalize::remove_hybrid_cross;
///
/// assert_eq!(remove_hybrid_cross("×Carex cayouettei"), "Carex cayouettei");
/// assert_eq!(remove_hybrid_cross("Carex ×cayouettei"), "Carex cayouettei");
/// ```
pub fn remove_hybrid_cross(name: &str) -> String {
    let name = HYBRID_GENUS.replace(name, "${1}");
    HYBRID_EPITHET.replace_all(&name, " ${1}").into_owned()
}

/// Stems a latin epithet to its female form ending in `a`.
pub fn stem_epithet(epithet: &str) -> String {
    SUFFIX_A.replace(epithet.trim(), "a").into_owned()
}

/// Folds letters to their closest ASCII form.
///
/// Combining marks are removed after canonical decomposition and a few
/// ligatures and crossed letters are spelled out. Characters without an ASCII
/// counterpart, e.g. `†`, are kept.
pub fn fold_to_ascii(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
        match SPECIAL_FOLDS.iter().find(|(special, _)| *special == c) {
            Some((_, replacement)) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }
    folded
}

// Each round only ever shortens the key or turns j/y into i, so this terminates.
fn normalize_to_fixpoint(name: &str, monomials: bool) -> Option<String> {
    let mut key = normalize_once(name, monomials)?;
    loop {
        let next = normalize_once(&key, monomials)?;
        if next == key {
            return Some(key);
        }
        key = next;
    }
}

fn normalize_once(name: &str, monomials: bool) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let name = remove_hybrid_cross(name);
    let name = fold_to_ascii(&name);
    let name = PUNCTUATION.replace_all(&name, "");
    let name = name.split_whitespace().join(" ").to_lowercase();

    let key = if monomials {
        normalize_strongly(&name)
    } else {
        match name.split_once(' ') {
            Some((genus, rest)) if genus.chars().count() > 2 => {
                format!("{genus} {}", normalize_strongly(rest))
            }
            _ => name,
        }
    };

    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

fn normalize_strongly(s: &str) -> String {
    // leters, not letters
    let s: String = s
        .chars()
        .dedup_by(|a, b| a == b && a.is_alphabetic())
        .collect();
    let s = stem_epithet(&s);
    let s = I_VARIANTS.replace_all(&s, "i");
    let s = SUFFIX_I.replace(&s, "i");
    TRH.replace_all(&s, "${1}").into_owned()
}
