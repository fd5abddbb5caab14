//! Skill-class descriptors.
//!
//! Members are ranked in seven classes, `A` (strongest) to `G` (weakest).
//! Calendar titles and sheet rows describe the classes an entry targets with
//! hand-typed fragments like `E以上`, `DBC`, `B級` or `全級`. This module turns
//! those fragments into a canonical [`ClassSet`].
//!
//! Two parsers:
//! - [`parse_strict`] always yields a set (empty when the text is not a class
//!   descriptor). Used when an entry must land in per-class buckets.
//! - [`parse_lenient`] keeps text it does not understand as a raw label, so a
//!   display string like `G級①②③以上` survives untouched.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Suffix meaning "or above" (`D以上` = D and every stronger class).
pub const AT_LEAST_SUFFIX: &str = "以上";
/// Descriptor for every class.
pub const ALL_CLASSES_LABEL: &str = "全級";

/// One skill class. `Ord` follows skill order, so ascending means strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrdinalClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl OrdinalClass {
    pub const ALL: [OrdinalClass; 7] = [
        OrdinalClass::A,
        OrdinalClass::B,
        OrdinalClass::C,
        OrdinalClass::D,
        OrdinalClass::E,
        OrdinalClass::F,
        OrdinalClass::G,
    ];

    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|class| class.letter() == c)
    }
}

impl fmt::Display for OrdinalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Ordered, deduplicated set of classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSet(BTreeSet<OrdinalClass>);

impl ClassSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self(OrdinalClass::ALL.into_iter().collect())
    }

    /// Every class from `A` up to and including `weakest`.
    pub fn through(weakest: OrdinalClass) -> Self {
        Self(
            OrdinalClass::ALL
                .into_iter()
                .filter(|c| *c <= weakest)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_all(&self) -> bool {
        self.0.len() == OrdinalClass::ALL.len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, class: OrdinalClass) -> bool {
        self.0.contains(&class)
    }

    /// Classes in ascending (strongest first) order.
    pub fn iter(&self) -> impl Iterator<Item = OrdinalClass> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<OrdinalClass> {
        self.iter().collect()
    }
}

impl FromIterator<OrdinalClass> for ClassSet {
    fn from_iter<I: IntoIterator<Item = OrdinalClass>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str(ALL_CLASSES_LABEL);
        }
        for class in self.iter() {
            write!(f, "{}", class)?;
        }
        Ok(())
    }
}

/// Result of [`parse_lenient`]: a canonical set, or the original text when it
/// could not be read as a class descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ClassLabel {
    Set(ClassSet),
    Raw(String),
}

impl ClassLabel {
    /// True for an empty set or a blank raw label.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Set(set) => set.is_empty(),
            Self::Raw(raw) => raw.trim().is_empty(),
        }
    }

    /// Canonical set for bucketing. Raw labels go through [`parse_strict`].
    pub fn to_class_set(&self) -> ClassSet {
        match self {
            Self::Set(set) => set.clone(),
            Self::Raw(raw) => parse_strict(raw),
        }
    }
}

impl Default for ClassLabel {
    fn default() -> Self {
        Self::Set(ClassSet::empty())
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(set) => write!(f, "{}", set),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

// ============================================================================
// Parsers
// ============================================================================

fn re_at_least() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-G]+)級?以上$").unwrap())
}

fn re_letter_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[A-G]+級?(?:以上)?|全級)$").unwrap())
}

/// Full-width letters and separators fold to ASCII.
fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_string()
}

fn is_list_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '、' | '・' | '/' | '|' | '級')
}

fn letters_in(text: &str) -> ClassSet {
    text.chars().filter_map(OrdinalClass::from_letter).collect()
}

/// Parse a class descriptor into a set, never failing.
///
/// - `D以上` / `D級以上` → A, B, C, D
/// - `DBC`, `B, D・C` → B, C, D (order and duplicates do not matter)
/// - `全級` → every class
/// - anything else, including the empty string → empty set
pub fn parse_strict(text: &str) -> ClassSet {
    let text = normalize(text);
    if text.is_empty() {
        return ClassSet::empty();
    }
    if text == ALL_CLASSES_LABEL {
        return ClassSet::all();
    }

    if let Some(caps) = re_at_least().captures(&text) {
        return letters_in(&caps[1])
            .iter()
            .max()
            .map(ClassSet::through)
            .unwrap_or_default();
    }

    let is_letter_list = text
        .chars()
        .all(|c| OrdinalClass::from_letter(c).is_some() || is_list_noise(c));
    if !is_letter_list {
        return ClassSet::empty();
    }
    letters_in(&text)
}

/// Parse a class descriptor, keeping unrecognized text as [`ClassLabel::Raw`].
///
/// Only a bare letter run (optionally followed by `級` and/or `以上`) or `全級`
/// becomes a set. Blank input is an empty set.
pub fn parse_lenient(text: &str) -> ClassLabel {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return ClassLabel::Set(ClassSet::empty());
    }
    if re_letter_run().is_match(&normalized) {
        ClassLabel::Set(parse_strict(&normalized))
    } else {
        ClassLabel::Raw(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use OrdinalClass::*;

    #[test]
    fn test_strict_single_letter() {
        assert_eq!(parse_strict("B").to_vec(), vec![B]);
        assert_eq!(parse_strict("B級").to_vec(), vec![B]);
    }

    #[test]
    fn test_strict_letter_run_is_sorted() {
        assert_eq!(parse_strict("DBC").to_vec(), vec![B, C, D]);
        assert_eq!(parse_strict("DDBC").to_vec(), vec![B, C, D]);
    }

    #[test]
    fn test_strict_at_least() {
        assert_eq!(parse_strict("D以上").to_vec(), vec![A, B, C, D]);
        assert_eq!(parse_strict("D級以上").to_vec(), vec![A, B, C, D]);
        assert_eq!(parse_strict("A以上").to_vec(), vec![A]);
    }

    #[test]
    fn test_strict_at_least_uses_weakest_letter() {
        assert_eq!(parse_strict("ED以上").to_vec(), vec![A, B, C, D, E]);
    }

    #[test]
    fn test_strict_full_width_input() {
        assert_eq!(parse_strict("Ｅ以上").to_vec(), vec![A, B, C, D, E]);
        assert_eq!(parse_strict("Ｂ，Ｃ").to_vec(), vec![B, C]);
    }

    #[test]
    fn test_strict_separated_list() {
        assert_eq!(parse_strict("A級, C級").to_vec(), vec![A, C]);
        assert_eq!(parse_strict("F・E/G").to_vec(), vec![E, F, G]);
    }

    #[test]
    fn test_strict_all_classes() {
        assert!(parse_strict("全級").is_all());
    }

    #[test]
    fn test_strict_rejects_non_descriptors() {
        assert!(parse_strict("").is_empty());
        assert!(parse_strict("   ").is_empty());
        assert!(parse_strict("①②③").is_empty());
        assert!(parse_strict("G級①②③以上").is_empty());
        assert!(parse_strict("初心者向け").is_empty());
    }

    #[test]
    fn test_lenient_parses_letter_runs() {
        assert_eq!(parse_lenient("E以上"), ClassLabel::Set(ClassSet::through(E)));
        assert_eq!(
            parse_lenient("CDE"),
            ClassLabel::Set([C, D, E].into_iter().collect())
        );
        assert_eq!(parse_lenient(" B級 "), ClassLabel::Set([B].into_iter().collect()));
    }

    #[test]
    fn test_lenient_keeps_raw_text() {
        assert_eq!(
            parse_lenient("G級①②③以上"),
            ClassLabel::Raw("G級①②③以上".to_string())
        );
        assert_eq!(
            parse_lenient("A, C"),
            ClassLabel::Raw("A, C".to_string())
        );
    }

    #[test]
    fn test_lenient_blank_is_empty_set() {
        assert_eq!(parse_lenient(""), ClassLabel::Set(ClassSet::empty()));
        assert!(parse_lenient("  ").is_empty());
    }

    #[test]
    fn test_raw_label_expands_strictly() {
        let label = ClassLabel::Raw("A, C".to_string());
        assert_eq!(label.to_class_set().to_vec(), vec![A, C]);
    }

    #[test]
    fn test_display() {
        assert_eq!(parse_strict("DBC").to_string(), "BCD");
        assert_eq!(ClassSet::all().to_string(), "全級");
        assert_eq!(ClassLabel::Raw("G級①".into()).to_string(), "G級①");
    }

    #[test]
    fn test_class_set_serde() {
        let json = serde_json::to_string(&ClassSet::through(C)).unwrap();
        assert_eq!(json, r#"["A","B","C"]"#);
        let label: ClassLabel = serde_json::from_str(r#"{"kind":"raw","value":"x"}"#).unwrap();
        assert_eq!(label, ClassLabel::Raw("x".to_string()));
    }

    fn letters(indices: &[usize]) -> String {
        indices
            .iter()
            .map(|i| OrdinalClass::ALL[*i].letter())
            .collect()
    }

    proptest! {
        #[test]
        fn prop_at_least_is_prefix(idx in 0usize..7) {
            let class = OrdinalClass::ALL[idx];
            let parsed = parse_strict(&format!("{}以上", class));
            prop_assert_eq!(parsed.to_vec(), OrdinalClass::ALL[..=idx].to_vec());
        }

        #[test]
        fn prop_letter_order_does_not_matter(indices in prop::collection::vec(0usize..7, 1..12)) {
            let forward = letters(&indices);
            let mut reversed = indices.clone();
            reversed.reverse();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            sorted.dedup();

            let parsed = parse_strict(&forward);
            prop_assert_eq!(&parsed, &parse_strict(&letters(&reversed)));
            prop_assert_eq!(parsed.to_vec(), sorted.iter().map(|i| OrdinalClass::ALL[*i]).collect::<Vec<_>>());
        }

        #[test]
        fn prop_lenient_agrees_with_strict_on_letter_runs(indices in prop::collection::vec(0usize..7, 1..8)) {
            let text = letters(&indices);
            prop_assert_eq!(parse_lenient(&text), ClassLabel::Set(parse_strict(&text)));
        }
    }
}
