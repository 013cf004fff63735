//! Plural rules for numerus form selection.
//!
//! Each rule maps a count to the index of a numerus form. Rules are chosen
//! from the primary subtag of the catalog language (`fr_FR` → `fr`).
//! Negative counts select the same form as their absolute value.

use serde::Serialize;

/// Plural rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralRule {
    /// One form for every count (Japanese, Chinese, Korean, ...).
    Invariant,
    /// Singular for exactly 1 (English, German, Spanish, ...).
    Germanic,
    /// Singular for 0 and 1 (French, Brazilian Portuguese, ...).
    French,
    /// Three forms keyed on the last digits (Russian, Ukrainian, ...).
    EastSlavic,
    /// Three forms: 1, 2-4 (except 12-14), rest.
    Polish,
    /// Three forms: 1, 2-4, rest (Czech, Slovak).
    Czech,
}

const INVARIANT: &[&str] = &["ja", "zh", "ko", "vi", "th", "id", "ms", "lo", "km", "my"];
const FRENCH: &[&str] = &["fr", "oc", "ln", "mg", "ti", "fil", "wa"];
const EAST_SLAVIC: &[&str] = &["ru", "uk", "be", "sr", "hr", "bs"];
const CZECH: &[&str] = &["cs", "sk"];

impl PluralRule {
    /// Detect the rule for a language tag such as `fr_FR`, `pt-BR`, or `ru`.
    pub fn for_language(language: &str) -> Self {
        let normalized = language.replace('-', "_").to_ascii_lowercase();
        let primary = normalized.split('_').next().unwrap_or_default();

        if normalized == "pt_br" || FRENCH.contains(&primary) {
            Self::French
        } else if INVARIANT.contains(&primary) {
            Self::Invariant
        } else if EAST_SLAVIC.contains(&primary) {
            Self::EastSlavic
        } else if primary == "pl" {
            Self::Polish
        } else if CZECH.contains(&primary) {
            Self::Czech
        } else {
            Self::Germanic
        }
    }

    /// Number of numerus forms a message must carry.
    pub fn form_count(self) -> usize {
        match self {
            Self::Invariant => 1,
            Self::Germanic | Self::French => 2,
            Self::EastSlavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// Index of the numerus form for `count`.
    pub fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let (n10, n100) = (n % 10, n % 100);
        let few = (2..=4).contains(&n10) && !(12..=14).contains(&n100);
        match self {
            Self::Invariant => 0,
            Self::Germanic => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::EastSlavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if few {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if few {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
        }
    }

    /// Select the form for `count`, clamping to the last available form.
    ///
    /// Returns `None` only when `forms` is empty.
    pub fn select<S: AsRef<str>>(self, forms: &[S], count: i64) -> Option<&str> {
        let last = forms.len().checked_sub(1)?;
        Some(forms[self.form_index(count).min(last)].as_ref())
    }
}
