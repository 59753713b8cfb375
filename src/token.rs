//! Token-level types shared between lexer construction and the scanner
//! runtime.

/// A single declared token rule: a pattern plus what the scanner should do
/// when it wins the maximal-munch race.
#[derive(Clone, Debug)]
pub struct TokenDef {
    pub name: String,
    pub pattern: String,
    pub accept: Accept,
}

/// What happens when a token's pattern produces the longest match at the
/// current scan position: a tagged variant rather than a nullable token-kind
/// sentinel, so "this match should be swallowed silently" is a type a caller
/// can match on instead of a magic null kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Accept {
    /// Produce a token of this kind.
    Emit(String),
    /// Consume the match but produce no token (whitespace, comments, ...).
    Skip,
}

impl TokenDef {
    pub fn emit(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        let name = name.into();
        TokenDef { accept: Accept::Emit(name.clone()), name, pattern: pattern.into() }
    }

    pub fn skip(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        let name = name.into();
        TokenDef { accept: Accept::Skip, name, pattern: pattern.into() }
    }

    /// A token whose pattern is an exact literal string rather than a regex:
    /// every regex metacharacter in `text` is escaped before it reaches the
    /// parser, so `text` is matched verbatim.
    pub fn literal(name: impl Into<String>, text: &str) -> Self {
        Self::emit(name, crate::regex::escape(text))
    }

    /// Like [`TokenDef::literal`], but the match is consumed without being
    /// emitted (e.g. a fixed comment delimiter).
    pub fn literal_skip(name: impl Into<String>, text: &str) -> Self {
        Self::skip(name, crate::regex::escape(text))
    }
}

/// One token produced by the scanner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The name of the `Accept::Emit` kind that matched.
    pub kind: String,
    /// The exact matched text.
    pub text: String,
    /// Byte offset of the first character of the match.
    pub start: usize,
    /// Byte offset one past the last character of the match.
    pub end: usize,
    pub line: usize,
    pub column: usize,
}
