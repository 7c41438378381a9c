//! Orthographic case-form classification and compatibility.
//!
//! A phrase's capitalization pattern is weak but useful evidence for
//! disambiguation: "apple" and "Apple" tend to evoke different entities.
//! Case forms observed in the phrase table are compared against the
//! mention's surface form, with `None` acting as a wildcard.

use serde::{Deserialize, Serialize};

/// Orthographic case-form of a surface phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CaseForm {
    /// No consistent case pattern (wildcard in comparisons).
    #[default]
    None,
    /// All letters uppercase ("NASA").
    Upper,
    /// All letters lowercase ("electron").
    Lower,
    /// Each word capitalized ("New York").
    Title,
}

impl CaseForm {
    /// Convert to the two-character label used in diagnostic listings.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            CaseForm::None => "  ",
            CaseForm::Upper => "UP",
            CaseForm::Lower => "lo",
            CaseForm::Title => "Ca",
        }
    }

    /// Parse from a label string.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "UP" | "UPPER" => CaseForm::Upper,
            "LO" | "LOWER" => CaseForm::Lower,
            "CA" | "TITLE" => CaseForm::Title,
            _ => CaseForm::None,
        }
    }

    /// Classify the case-form of a surface string.
    ///
    /// A phrase with no alphabetic characters has no case-form. Title case
    /// requires every word to start uppercase with the remainder lowercase.
    #[must_use]
    pub fn of(phrase: &str) -> Self {
        let mut any_alpha = false;
        let mut all_upper = true;
        let mut all_lower = true;
        for c in phrase.chars().filter(|c| c.is_alphabetic()) {
            any_alpha = true;
            if !c.is_uppercase() {
                all_upper = false;
            }
            if !c.is_lowercase() {
                all_lower = false;
            }
        }
        if !any_alpha {
            return CaseForm::None;
        }
        if all_upper {
            return CaseForm::Upper;
        }
        if all_lower {
            return CaseForm::Lower;
        }
        let title = phrase.split_whitespace().all(|word| {
            let mut letters = word.chars().filter(|c| c.is_alphabetic());
            match letters.next() {
                Some(first) => first.is_uppercase() && letters.all(|c| c.is_lowercase()),
                None => true,
            }
        });
        if title {
            CaseForm::Title
        } else {
            CaseForm::None
        }
    }

    /// Discard sentence-initial title case.
    ///
    /// Title case at the start of a sentence is capitalization noise rather
    /// than a naming convention, so it is treated as the wildcard form.
    #[must_use]
    pub fn normalized(self, sentence_initial: bool) -> Self {
        if sentence_initial && self == CaseForm::Title {
            CaseForm::None
        } else {
            self
        }
    }
}

impl std::fmt::Display for CaseForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// Check whether two case-forms are compatible.
///
/// `None` is compatible with everything; otherwise the forms must be equal.
#[must_use]
pub fn compatible(a: CaseForm, b: CaseForm) -> bool {
    a == CaseForm::None || b == CaseForm::None || a == b
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_form() -> impl Strategy<Value = CaseForm> {
        prop_oneof![
            Just(CaseForm::None),
            Just(CaseForm::Upper),
            Just(CaseForm::Lower),
            Just(CaseForm::Title),
        ]
    }

    proptest! {
        #[test]
        fn compatible_is_symmetric(a in any_form(), b in any_form()) {
            prop_assert_eq!(compatible(a, b), compatible(b, a));
        }

        #[test]
        fn none_compatible_with_anything(form in any_form()) {
            prop_assert!(compatible(CaseForm::None, form));
            prop_assert!(compatible(form, CaseForm::None));
        }

        #[test]
        fn compatible_is_reflexive(form in any_form()) {
            prop_assert!(compatible(form, form));
        }

        #[test]
        fn classification_never_panics(phrase in "\\PC{0,40}") {
            let _ = CaseForm::of(&phrase);
        }
    }
}
