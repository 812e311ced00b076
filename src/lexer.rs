//! Lexical analysis for a single command line.
//!
//! A line is first split into whitespace-delimited words, then words that open
//! with a quote (`"` or `'`) are joined with the words that follow them until
//! the matching closing quote is found. Escaped quotes (`\"`, `\'`) never close
//! a span and are unescaped in the final tokens.

use log::debug;
use std::fmt;

/// Characters that may open (and close) a quoted span.
const QUOTES: [char; 2] = ['"', '\''];

/// A logical unit of input after quote-joining and escape resolution.
///
/// Tokens produced by [`split_into_tokens`] are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the token looks like an option (`-x` or `--long`).
    pub fn is_option(&self) -> bool {
        self.0.starts_with('-')
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token(text.to_string())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token(text)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Walks the words of a line, joining quoted spans back together.
struct QuoteLinker<'a> {
    words: &'a [&'a str],
    pos: usize,
}

impl<'a> QuoteLinker<'a> {
    fn new(words: &'a [&'a str]) -> Self {
        QuoteLinker { words, pos: 0 }
    }

    /// Produces the raw (not yet filtered or unescaped) token texts.
    fn link(mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(word) = self.read_word() {
            match opening_quote(word) {
                Some(quote) => out.push(self.read_quoted(word, quote)),
                None => out.push(word.to_string()),
            }
        }

        out
    }

    fn read_word(&mut self) -> Option<&'a str> {
        let word = self.words.get(self.pos).copied();
        if word.is_some() {
            self.pos += 1;
        }
        word
    }

    /// Accumulates a quoted span starting at `first`, consuming words until one
    /// ends with an unescaped `quote`. Words are rejoined with single spaces.
    ///
    /// An unterminated span absorbs the rest of the line and keeps the
    /// separator after its last word.
    fn read_quoted(&mut self, first: &str, quote: char) -> String {
        let body = &first[quote.len_utf8()..];

        // `"word"` opens and closes within a single word.
        if let Some(inner) = strip_closing(body, quote) {
            return inner.to_string();
        }

        // Every word but the closing one keeps a trailing separator.
        let mut buffer = format!("{body} ");
        while let Some(word) = self.read_word() {
            if let Some(inner) = strip_closing(word, quote) {
                buffer.push_str(inner);
                return buffer;
            }
            buffer.push_str(word);
            buffer.push(' ');
        }

        debug!("unterminated {quote} quote, absorbing the rest of the line");
        buffer
    }
}

fn opening_quote(word: &str) -> Option<char> {
    word.chars().next().filter(|c| QUOTES.contains(c))
}

/// Returns `word` without its closing `quote`, or `None` when the word does not
/// end the span (no trailing quote, or the trailing quote is escaped).
fn strip_closing(word: &str, quote: char) -> Option<&str> {
    word.strip_suffix(quote)
        .filter(|rest| !rest.ends_with('\\'))
}

/// Replaces `\"` and `\'` with the bare quote character, whichever delimiter
/// opened the token.
fn unescape(text: &str) -> String {
    text.replace("\\\"", "\"").replace("\\'", "'")
}

/// Splits a raw line into whitespace-delimited words. Never yields empty words.
pub fn split_words(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Joins quoted spans of `words` into logical tokens.
///
/// Tokens that are empty once their quote markers are stripped (e.g. `""`) are
/// dropped, and escaped quotes are resolved in every surviving token.
pub fn link_quoted(words: &[&str]) -> Vec<Token> {
    QuoteLinker::new(words)
        .link()
        .into_iter()
        .filter(|text| !text.is_empty())
        .map(|text| Token(unescape(&text)))
        .collect()
}

/// The main entry point to perform lexical analysis on a line.
///
/// Never fails: unterminated quotes are absorbed into the last token.
///
/// ```
/// use sally::lexer::split_into_tokens;
///
/// let tokens = split_into_tokens(r#"greet --name "Ada Lovelace" -v"#);
/// assert_eq!(tokens, ["greet", "--name", "Ada Lovelace", "-v"]);
/// ```
pub fn split_into_tokens(line: &str) -> Vec<Token> {
    let words = split_words(line);
    let tokens = link_quoted(&words);
    debug!("tokens = {tokens:?}");
    tokens
}
