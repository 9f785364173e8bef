//! Ahnentafel numbering helpers.
//!
//! The subject is 1, the father of `n` is `2n` and the mother is `2n + 1`, so
//! the generation of an ancestor is the bit length of its number.

use crate::translate::Translations;

/// Generation of an Ahnentafel number: 1 for the subject, 2 for the parents
/// and so on. Zero is not a valid number and yields generation 0.
pub fn generation(anum: u64) -> u32 {
    u64::BITS - anum.leading_zeros()
}

pub fn father_number(anum: u64) -> u64 {
    anum * 2
}

pub fn mother_number(anum: u64) -> u64 {
    father_number(anum) + 1
}

/// Parent-side number of the child this ancestor belongs to.
pub fn child_number(anum: u64) -> Option<u64> {
    if anum > 1 { Some(anum / 2) } else { None }
}

pub fn is_female(anum: u64) -> bool {
    anum % 2 == 1
}

/// English ordinal suffix ("st", "nd", "rd", "th"), with 11-13 taking "th".
pub fn ordinal_suffix(value: u32) -> &'static str {
    if (11..=13).contains(&(value % 100)) {
        return "th";
    }
    match value % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Relationship of ancestor `anum` to the subject, e.g. "Mother" or
/// "3rd Great Grandfather". Each word goes through the translation table.
pub fn relationship_label(anum: u64, strings: &Translations) -> String {
    match anum {
        1 => return strings.get("Self").to_string(),
        2 => return strings.get("Father").to_string(),
        3 => return strings.get("Mother").to_string(),
        _ => {}
    }

    let grandparent = if is_female(anum) {
        strings.get("Grandmother")
    } else {
        strings.get("Grandfather")
    };
    let greats = generation(anum).saturating_sub(3);
    match greats {
        0 => grandparent.to_string(),
        1 => format!("{} {}", strings.get("Great"), grandparent),
        n => format!(
            "{}{} {} {}",
            n,
            ordinal_suffix(n),
            strings.get("Great"),
            grandparent
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_counts_bits() {
        assert_eq!(generation(1), 1);
        assert_eq!(generation(2), 2);
        assert_eq!(generation(3), 2);
        assert_eq!(generation(4), 3);
        assert_eq!(generation(7), 3);
        assert_eq!(generation(8), 4);
        assert_eq!(generation(0), 0);
    }

    #[test]
    fn parents_are_one_generation_up() {
        for n in 1..2048u64 {
            assert_eq!(generation(father_number(n)), generation(n) + 1);
            assert_eq!(generation(mother_number(n)), generation(n) + 1);
            assert_eq!(father_number(n) % 2, 0);
            assert!(is_female(mother_number(n)));
            assert_eq!(child_number(father_number(n)), Some(n));
            assert_eq!(child_number(mother_number(n)), Some(n));
        }
        assert_eq!(child_number(1), None);
    }

    #[test]
    fn ordinal_suffixes() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (101, "st"),
            (111, "th"),
            (112, "th"),
        ];
        for (value, suffix) in cases {
            assert_eq!(ordinal_suffix(value), suffix, "ordinal of {value}");
        }
    }

    #[test]
    fn relationship_labels() {
        let strings = Translations::default();
        assert_eq!(relationship_label(1, &strings), "Self");
        assert_eq!(relationship_label(2, &strings), "Father");
        assert_eq!(relationship_label(3, &strings), "Mother");
        assert_eq!(relationship_label(4, &strings), "Grandfather");
        assert_eq!(relationship_label(7, &strings), "Grandmother");
        assert_eq!(relationship_label(8, &strings), "Great Grandfather");
        assert_eq!(relationship_label(15, &strings), "Great Grandmother");
        assert_eq!(relationship_label(16, &strings), "2nd Great Grandfather");
        assert_eq!(relationship_label(33, &strings), "3rd Great Grandmother");
        assert_eq!(relationship_label(64, &strings), "4th Great Grandfather");
    }

    #[test]
    fn relationship_labels_are_translated() {
        let strings = Translations::from_pairs([
            ("Great", "Ur"),
            ("Grandmother", "Grossmutter"),
            ("Mother", "Mutter"),
        ]);
        assert_eq!(relationship_label(3, &strings), "Mutter");
        assert_eq!(relationship_label(15, &strings), "Ur Grossmutter");
        assert_eq!(relationship_label(2, &strings), "Father");
    }
}
