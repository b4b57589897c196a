//! Locale-style ordering for recipe headlines.
//!
//! Headlines are compared the way a collator with default strength would
//! compare them, in three passes:
//!
//! 1. **Primary**: base letters only. Case is folded and common Latin
//!    diacritics are reduced to their base letter, so `"Éclair"` sorts next
//!    to `"eclair"` rather than after `"zucchini"`.
//! 2. **Secondary**: accents. When the base letters tie, the unaccented form
//!    comes first (`"creme"` < `"crème"`).
//! 3. **Tertiary**: case. When everything else ties, lowercase comes first
//!    (`"apple pie"` < `"Apple pie"`).
//!
//! Strings equal at all three levels compare [`Ordering::Equal`], which lets a
//! stable sort keep their enumeration order.
//!
//! ```text
//! apple pie
//! Apple pie
//! Banana bread
//! Crème brûlée
//! Jalapeño poppers
//! zucchini fritters
//! ```

use std::cmp::Ordering;

use crate::types::Record;

/// Collation key for a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CharKey {
    accented: bool,
    upper: bool,
}

/// Fold a character to its base letter(s), appending them to `out`.
///
/// Returns whether the character carried a diacritic. Characters without a
/// folding rule pass through lowercased.
fn fold(c: char, out: &mut Vec<char>) -> bool {
    let lower = c.to_lowercase().next().unwrap_or(c);
    let base = match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        'ß' => {
            out.extend(['s', 's']);
            return false;
        }
        'æ' => {
            out.extend(['a', 'e']);
            return false;
        }
        'œ' => {
            out.extend(['o', 'e']);
            return false;
        }
        _ => {
            out.push(lower);
            return false;
        }
    };
    out.push(base);
    true
}

/// Expand a headline into its primary sequence plus one key per primary char.
fn collation_key(s: &str) -> (Vec<char>, Vec<CharKey>) {
    let mut primary = Vec::with_capacity(s.len());
    let mut keys = Vec::with_capacity(s.len());
    for c in s.chars() {
        let before = primary.len();
        let accented = fold(c, &mut primary);
        let upper = c.is_uppercase();
        // Ligatures expand to several primary chars; each gets the same key.
        for _ in before..primary.len() {
            keys.push(CharKey { accented, upper });
        }
    }
    (primary, keys)
}

/// Compare two headlines with locale-style collation.
pub fn compare_headlines(a: &str, b: &str) -> Ordering {
    let (primary_a, keys_a) = collation_key(a);
    let (primary_b, keys_b) = collation_key(b);

    primary_a
        .cmp(&primary_b)
        .then_with(|| {
            let accents_a = keys_a.iter().map(|k| k.accented);
            let accents_b = keys_b.iter().map(|k| k.accented);
            accents_a.cmp(accents_b)
        })
        .then_with(|| {
            let case_a = keys_a.iter().map(|k| k.upper);
            let case_b = keys_b.iter().map(|k| k.upper);
            case_a.cmp(case_b)
        })
}

/// Sort records ascending by headline.
///
/// `sort_by` is stable, so records whose headlines collate equal keep the
/// order they were loaded in.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| compare_headlines(&a.headline, &b.headline));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn record(slug: &str, headline: &str) -> Record {
        Record {
            slug: slug.to_string(),
            headline: headline.to_string(),
            fields: Map::new(),
        }
    }

    #[test]
    fn case_is_ignored_at_primary_level() {
        assert_eq!(compare_headlines("banana", "Apple"), Ordering::Greater);
        assert_eq!(compare_headlines("apple", "Banana"), Ordering::Less);
    }

    #[test]
    fn lowercase_before_uppercase_on_tie() {
        assert_eq!(compare_headlines("apple pie", "Apple pie"), Ordering::Less);
        assert_eq!(compare_headlines("Apple pie", "apple pie"), Ordering::Greater);
    }

    #[test]
    fn accents_fold_to_base_letter() {
        // Without folding, 'É' (U+00C9) would sort after every ASCII letter.
        assert_eq!(compare_headlines("Éclair", "Fudge"), Ordering::Less);
        assert_eq!(compare_headlines("Crème brûlée", "Cupcakes"), Ordering::Less);
    }

    #[test]
    fn unaccented_before_accented_on_tie() {
        assert_eq!(compare_headlines("creme", "crème"), Ordering::Less);
        assert_eq!(compare_headlines("crème", "creme"), Ordering::Greater);
    }

    #[test]
    fn ligatures_expand() {
        assert_eq!(compare_headlines("Strasse", "Straße"), Ordering::Equal);
    }

    #[test]
    fn identical_strings_are_equal() {
        assert_eq!(compare_headlines("Soup", "Soup"), Ordering::Equal);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(compare_headlines("Pie", "Pie crust"), Ordering::Less);
    }

    #[test]
    fn sort_is_stable_for_equal_headlines() {
        let mut records = vec![
            record("second-soup", "Soup"),
            record("apple", "Apple"),
            record("first-soup", "Soup"),
        ];
        sort_records(&mut records);
        let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["apple", "second-soup", "first-soup"]);
    }

    #[test]
    fn sort_orders_mixed_headlines() {
        let mut records = vec![
            record("z", "zucchini fritters"),
            record("j", "Jalapeño poppers"),
            record("a2", "Apple pie"),
            record("c", "Crème brûlée"),
            record("a1", "apple pie"),
            record("b", "Banana bread"),
        ];
        sort_records(&mut records);
        let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a1", "a2", "b", "c", "j", "z"]);
    }
}
