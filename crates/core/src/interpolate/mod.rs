//! Template tree interpolation.
//!
//! [`walk::enumerate`] lists the regular files under a root,
//! [`substitute::TemplateSubstitutor`] rewrites one eligible file, and
//! [`driver::interpolate`] ties the two together with a per-file callback.

pub mod driver;
pub mod substitute;
pub mod walk;

use std::fmt;

/// A `(key, value)` pair: every literal `${key}` in a template becomes `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderBinding {
    pub key: String,
    pub value: String,
}

impl PlaceholderBinding {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The literal token searched for in template text, e.g. `${userName}`.
    pub fn token(&self) -> String {
        format!("${{{}}}", self.key)
    }

    /// Replace every occurrence of [`token`](Self::token) in `text`.
    ///
    /// Plain substring replacement: no recursion into the substituted value,
    /// no escaping. Returns the new text and the number of replacements.
    pub fn apply(&self, text: &str) -> (String, usize) {
        substitute_tokens(text, std::slice::from_ref(self))
    }
}

/// Replace the tokens of every binding in `text` in one left-to-right scan.
///
/// Only the original text is searched: a value inserted for one key is never
/// rescanned, so it cannot expand into another binding's value. Tokens with no
/// binding are copied through. Returns the new text and the total number of
/// replacements.
pub fn substitute_tokens(text: &str, bindings: &[PlaceholderBinding]) -> (String, usize) {
    let tokens: Vec<(String, &str)> = bindings
        .iter()
        .map(|b| (b.token(), b.value.as_str()))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut occurrences = 0;
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match tokens.iter().find(|(token, _)| candidate.starts_with(token.as_str())) {
            Some((token, value)) => {
                out.push_str(value);
                occurrences += 1;
                rest = &candidate[token.len()..];
            }
            None => {
                out.push_str("${");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);

    (out, occurrences)
}

// Values are usually credentials, so they never reach logs.
impl fmt::Display for PlaceholderBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}}} -> <redacted>", self.key)
    }
}
