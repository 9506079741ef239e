//! Publication year comparison.

use super::AuthorComparator;
use crate::Equality;
use crate::regex::Regex;
use std::sync::LazyLock;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9?]{4})(?:[^0-9]|$)").unwrap());

/// Compares two publication years.
///
/// Years are reduced to their first run of four digits, `?` placeholders
/// included. Strings without such a run are compared after author-style
/// normalization. Integer years may differ by one, since imprint and
/// publication dates are frequently confused. A single `?` placeholder masks
/// that position in both years; placeholders at different positions never
/// match.
///
/// Missing or blank years on either side yield [`Equality::Unknown`].
///
/// # Examples
///
/// ```
/// use backbone_lookup::Equality;
/// use backbone_lookup::authorship::compare_year;
///
/// assert_eq!(compare_year(Some("2001"), Some("2000")), Equality::Equal);
/// assert_eq!(compare_year(Some("1878"), Some("187?")), Equality::Equal);
/// assert_eq!(compare_year(Some("2001"), Some("1999")), Equality::Different);
/// assert_eq!(compare_year(Some("1878"), None), Equality::Unknown);
/// ```
pub fn compare_year(year1: Option<&str>, year2: Option<&str>) -> Equality {
    let (Some(y1), Some(y2)) = (year1.and_then(normalize_year), year2.and_then(normalize_year))
    else {
        return Equality::Unknown;
    };

    if y1 == y2 {
        return Equality::Equal;
    }

    if let (Ok(i1), Ok(i2)) = (y1.parse::<i64>(), y2.parse::<i64>()) {
        return if (i1 - i2).abs() <= 1 {
            Equality::Equal
        } else {
            Equality::Different
        };
    }

    match (y1.find('?'), y2.find('?')) {
        (None, None) => Equality::Different,
        (Some(p1), Some(p2)) if p1 != p2 => Equality::Different,
        (Some(pos), _) | (_, Some(pos)) => {
            if mask(&y1, pos) == mask(&y2, pos) {
                Equality::Equal
            } else {
                Equality::Different
            }
        }
    }
}

fn normalize_year(year: &str) -> Option<String> {
    let compact: String = year.chars().filter(|c| !c.is_whitespace()).collect();
    match YEAR.captures(&compact) {
        Some(caps) => Some(caps[1].to_string()),
        None => AuthorComparator::normalize(year),
    }
}

// Normalized years are ASCII, so byte and char positions agree.
fn mask(year: &str, pos: usize) -> String {
    year.char_indices()
        .map(|(i, c)| if i == pos { '_' } else { c })
        .collect()
}
