//! Option resolution: classifies the tokens following a verb into long
//! options, short-option groups and ignored bare words.
//!
//! Grammar:
//! - `--key [value]`: exact-match long option.
//! - `-abc [value]`: short group; `a` and `b` are flags, only `c` may take
//!   the following token as its value.
//! - A value is the next token when it exists and does not start with `-`.
//! - Any other bare token is dropped.
//! - The first occurrence of a key wins; later ones are discarded together
//!   with their values.

use crate::lexer::Token;
use log::debug;

/// An explicit value, or `None` for a bare flag.
pub type OptionValue = Option<String>;

/// Resolved key/value pairs for one line, kept in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    entries: Vec<(String, OptionValue)>,
}

impl ResolvedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` only if it is not present yet. Returns whether it was
    /// inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: OptionValue) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            debug!("duplicate option `{key}` ignored");
            return false;
        }
        self.entries.push((key, value));
        true
    }

    /// Looks up a key. `Some(None)` means the key is present as a flag.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in the order keys were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K: Into<String>> FromIterator<(K, OptionValue)> for ResolvedOptions {
    fn from_iter<I: IntoIterator<Item = (K, OptionValue)>>(iter: I) -> Self {
        let mut options = ResolvedOptions::new();
        for (key, value) in iter {
            options.insert_if_absent(key, value);
        }
        options
    }
}

struct Resolver<'a> {
    tokens: &'a [Token],
    pos: usize,
    options: ResolvedOptions,
}

impl<'a> Resolver<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Resolver {
            tokens,
            pos: 0,
            options: ResolvedOptions::new(),
        }
    }

    fn resolve(mut self) -> ResolvedOptions {
        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.pos) {
            self.pos += 1;
            let text = token.as_str();

            if let Some(key) = text.strip_prefix("--") {
                let value = self.take_value();
                self.options.insert_if_absent(key, value);
            } else if let Some(body) = text.strip_prefix('-') {
                self.resolve_short_group(body);
            } else {
                debug!("dropping stray token {text:?}");
            }
        }
        self.options
    }

    fn resolve_short_group(&mut self, body: &str) {
        let mut keys = body.chars();
        let Some(last) = keys.next_back() else {
            debug!("ignoring bare `-`");
            return;
        };

        // Everything before the last character is a flag.
        for flag in keys {
            self.options.insert_if_absent(flag.to_string(), None);
        }

        let value = self.take_value();
        self.options.insert_if_absent(last.to_string(), value);
    }

    /// Consumes the next token as a value unless it is missing or an option.
    fn take_value(&mut self) -> OptionValue {
        let tokens = self.tokens;
        match tokens.get(self.pos) {
            Some(next) if !next.is_option() => {
                self.pos += 1;
                Some(next.as_str().to_string())
            }
            _ => None,
        }
    }
}

/// Resolves the tokens that follow the verb word into an option mapping.
///
/// The caller strips the verb token first. Never fails.
///
/// ```
/// use sally::lexer::split_into_tokens;
/// use sally::options::resolve;
///
/// let options = resolve(&split_into_tokens("-sn 20 --text words_no_spaces"));
/// assert_eq!(options.get("s"), Some(None));
/// assert_eq!(options.get("n"), Some(Some("20")));
/// assert_eq!(options.get("text"), Some(Some("words_no_spaces")));
/// ```
pub fn resolve(tokens: &[Token]) -> ResolvedOptions {
    let options = Resolver::new(tokens).resolve();
    debug!("resolved options = {options:?}");
    options
}
