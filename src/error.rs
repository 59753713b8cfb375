//! Error taxonomy for the lexer construction pipeline.
//!
//! Everything here is a *construction-time* failure. The scanner runtime
//! never fails: an unrecognized character is reported through the ordinary
//! token stream as the caller's designated error-kind token, not as a `Result`
//! error (see [`crate::scanner`]).

use thiserror::Error;

/// Failures that can occur while building a [`crate::LexerDescription`] into
/// a [`crate::Lexer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A token's pattern failed to parse as a regular expression.
    #[error("invalid regular expression for token {token:?} at byte {position}: {reason}")]
    RegexSyntax {
        token: String,
        position: usize,
        reason: String,
    },

    /// No token in the description was marked as the end-of-input or
    /// error-fallback kind, and the scanner requires both to be addressable.
    #[error("lexer description must designate an end-of-input token and an error token")]
    NoEndOrErrorKind,

    /// Two tokens were declared with the same sentinel role (both claiming to
    /// be the end kind, or both claiming to be the error kind).
    #[error("more than one token declared as the {kind} sentinel")]
    DuplicateSentinel { kind: &'static str },
}

/// A non-fatal diagnostic: a declared token's pattern can match the empty
/// string (e.g. `a*` or `a{0}`). The scanner never treats a zero-length
/// match as an accept (otherwise a token like this would let it loop forever
/// without consuming input), so a token whose pattern is nullable can never
/// actually be produced, no matter where it's declared relative to other
/// tokens. Construction still succeeds; this is collected into
/// `LexerDescription::build`'s return value and also logged via
/// [`log::warn!`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyLanguageWarning {
    pub token: String,
}

impl std::fmt::Display for EmptyLanguageWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "token {:?} can match the empty string and can never be produced", self.token)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
