//! Discovery of background variations stored next to the default image.
//!
//! A file counts as a variation of `maps/tavern.webp` when its own name, minus
//! the extension, contains `tavern` (ignoring case). The remainder of the name
//! becomes the proposed label, so `maps/tavern_night-rain.webp` is offered as
//! "night rain".

use std::cmp::Ordering;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::variation::Variation;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]+").expect("static regex"));
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("static regex"));

/// Proposes variations for `reference_path` out of `listing`.
///
/// Paths already present in `existing` are skipped. The result is sorted by
/// label in dictionary order; entries with equal labels keep
/// their listing order.
pub fn scan<E, L>(reference_path: &str, existing: &[E], listing: &[L]) -> Vec<Variation>
where
    E: AsRef<str>,
    L: AsRef<str>,
{
    let base = file_stem(reference_path);
    let base_lower = base.to_lowercase();
    let existing: HashSet<&str> = existing.iter().map(|path| path.as_ref()).collect();

    let mut found: Vec<Variation> = listing
        .iter()
        .map(|file| file.as_ref())
        .filter(|file| !existing.contains(file))
        .filter_map(|file| {
            let stem = file_stem(file);
            if !stem.to_lowercase().contains(&base_lower) {
                return None;
            }
            Some(Variation::new(derive_label(stem, base), file))
        })
        .collect();

    found.sort_by(|a, b| collate(&a.name, &b.name));
    log::debug!(
        "scan for '{base}' matched {} of {} listed file(s)",
        found.len(),
        listing.len()
    );
    found
}

/// File name after the last `/` with the final extension removed.
///
/// A name without any `.` has no stem and yields an empty string.
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => "",
    }
}

/// Dictionary order for labels: letters compare without regard to case first,
/// and only labels that differ by case alone put lowercase before uppercase.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| {
            let case = |label: &str| label.chars().map(char::is_uppercase).collect::<Vec<_>>();
            case(a).cmp(&case(b))
        })
        .then_with(|| a.cmp(b))
}

fn derive_label(stem: &str, base: &str) -> String {
    let remainder = stem.replacen(base, "", 1);
    let decoded = percent_decode(&remainder);
    let spaced = SEPARATORS.replace_all(&decoded, " ");
    WHITESPACE_RUNS.replace_all(&spaced, " ").trim().to_string()
}

/// Decodes `%XX` escapes as UTF-8. Input that does not decode cleanly is
/// returned unchanged.
fn percent_decode(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(from_hex);
            let lo = bytes.get(i + 2).copied().and_then(from_hex);
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                    continue;
                }
                _ => return value.to_string(),
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

fn from_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn tavern_listing_yields_sorted_derivatives() {
        let found = scan(
            "maps/tavern.webp",
            &["maps/tavern.webp"],
            &[
                "maps/tavern.webp",
                "maps/tavern_night.webp",
                "maps/tavern-rain.webp",
                "maps/other.webp",
            ],
        );
        assert_eq!(
            found,
            vec![
                Variation::new("night", "maps/tavern_night.webp"),
                Variation::new("rain", "maps/tavern-rain.webp"),
            ]
        );
    }

    #[test]
    fn existing_paths_are_never_proposed() {
        let listing = ["maps/tavern_night.webp", "maps/tavern_day.webp"];
        let found = scan("maps/tavern.webp", &["maps/tavern_night.webp"], &listing);
        assert_eq!(found, vec![Variation::new("day", "maps/tavern_day.webp")]);
    }

    #[test]
    fn exclusion_is_case_sensitive() {
        let found = scan(
            "maps/tavern.webp",
            &["maps/Tavern_Night.webp"],
            &["maps/tavern_night.webp"],
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn containment_ignores_case_but_removal_does_not() {
        let found = scan(
            "maps/tavern.webp",
            &NONE,
            &["maps/Old_Tavern_Day.webp", "maps/big-tavern.png"],
        );
        assert_eq!(
            found,
            vec![
                Variation::new("big", "maps/big-tavern.png"),
                Variation::new("Old Tavern Day", "maps/Old_Tavern_Day.webp"),
            ]
        );
    }

    #[test]
    fn labels_are_decoded_and_collapsed() {
        let found = scan(
            "maps/tavern.webp",
            &NONE,
            &["maps/tavern%20__%20late--night%C3%A9.webp", "maps/tavern___.webp"],
        );
        assert_eq!(found[0].name, "");
        assert_eq!(found[0].file, "maps/tavern___.webp");
        assert_eq!(found[1].name, "late nighté");
    }

    #[test]
    fn malformed_escapes_are_left_alone() {
        assert_eq!(percent_decode("50%_off"), "50%_off");
        assert_eq!(percent_decode("%ff"), "%ff");
        assert_eq!(percent_decode("a%2Db"), "a-b");
    }

    #[test]
    fn output_is_in_dictionary_order_and_keeps_duplicates() {
        let listing = [
            "maps/tavern_b.webp",
            "maps/tavern-B.webp",
            "maps/tavern_a.webp",
            "maps/tavern_a.png",
        ];
        let found = scan("maps/tavern.webp", &NONE, &listing);
        let names: Vec<&str> = found.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a", "b", "B"]);
        assert_eq!(found[0].file, "maps/tavern_a.webp");
        assert_eq!(found[1].file, "maps/tavern_a.png");
        assert_eq!(scan("maps/tavern.webp", &NONE, &listing), found);
    }

    #[test]
    fn capitalised_labels_do_not_jump_ahead() {
        let found = scan(
            "maps/tavern.webp",
            &NONE,
            &["maps/tavern_Night.webp", "maps/tavern_day.webp", "maps/tavern_Rain.webp"],
        );
        let names: Vec<&str> = found.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["day", "Night", "Rain"]);
    }

    #[test]
    fn collate_breaks_case_ties_lowercase_first() {
        assert_eq!(collate("day", "Night"), Ordering::Less);
        assert_eq!(collate("night", "Night"), Ordering::Less);
        assert_eq!(collate("Night", "night"), Ordering::Greater);
        assert_eq!(collate("Night", "Night"), Ordering::Equal);
        assert_eq!(collate("night", "nights"), Ordering::Less);
    }

    #[test]
    fn reference_without_extension_matches_everything() {
        let found = scan("maps/tavern", &NONE, &["maps/x.webp", "maps/y_z.webp"]);
        assert_eq!(
            found,
            vec![
                Variation::new("x", "maps/x.webp"),
                Variation::new("y z", "maps/y_z.webp"),
            ]
        );
    }

    #[test]
    fn stem_keeps_inner_dots() {
        assert_eq!(file_stem("maps/tavern.night.webp"), "tavern.night");
        assert_eq!(file_stem("tavern.webp"), "tavern");
        assert_eq!(file_stem("maps/README"), "");
    }
}
