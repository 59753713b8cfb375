//! Builds scanners from per-token regular expressions.
//!
//! A caller declares a [`LexerDescription`] (an ordered list of
//! [`TokenDef`]s plus the designated end-of-input and error token kinds),
//! `build()`s it into a [`Lexer`] once, and then drives as many
//! [`Scanner`]s as needed over that one compiled [`Lexer`] — construction
//! (parse → desugar → Thompson → determinize → minimize → resolve accepts)
//! happens exactly once; scanning is just a table walk.

pub mod dfa;
pub mod error;
pub mod interval;
pub mod nfa;
pub mod regex;
pub mod scanner;
pub mod token;

pub use error::{EmptyLanguageWarning, Error};
pub use scanner::{CharStream, Scanner, StrCharStream};
pub use token::{Accept, Token, TokenDef};

use dfa::Dfa;
use nfa::Nfa;
use regex::desugar::desugar;
use regex::syntax;

/// An ordered set of token rules, not yet compiled.
#[derive(Clone, Debug, Default)]
pub struct LexerDescription {
    tokens: Vec<TokenDef>,
    end_kind: Option<String>,
    error_kind: Option<String>,
}

impl LexerDescription {
    pub fn new() -> Self {
        LexerDescription::default()
    }

    /// Appends a token rule. Order matters: when two patterns both produce
    /// the longest match at a position, the earliest-declared one wins.
    pub fn token(mut self, def: TokenDef) -> Self {
        self.tokens.push(def);
        self
    }

    /// The token kind the scanner reports exactly once, at end of input.
    pub fn end_kind(mut self, name: impl Into<String>) -> Self {
        self.end_kind = Some(name.into());
        self
    }

    /// The token kind the scanner reports for an unrecognized character.
    pub fn error_kind(mut self, name: impl Into<String>) -> Self {
        self.error_kind = Some(name.into());
        self
    }

    /// Runs the full construction pipeline: parse every pattern, desugar to
    /// the core grammar, Thompson-construct a combined NFA, determinize,
    /// minimize (preserving which token each accepting state resolves to),
    /// and resolve accept classes by declaration order.
    ///
    /// Returns the compiled [`Lexer`] together with any
    /// [`EmptyLanguageWarning`]s — tokens whose pattern can match the empty
    /// string are not an error, just dead weight in the description (the
    /// scanner never accepts a zero-length match, so such a token can never
    /// actually win a scan).
    pub fn build(self) -> Result<(Lexer, Vec<EmptyLanguageWarning>), Error> {
        let end_kind = self.end_kind.ok_or(Error::NoEndOrErrorKind)?;
        let error_kind = self.error_kind.ok_or(Error::NoEndOrErrorKind)?;
        if end_kind == error_kind {
            return Err(Error::DuplicateSentinel { kind: "end/error" });
        }

        let mut cores = Vec::with_capacity(self.tokens.len());
        for (index, def) in self.tokens.iter().enumerate() {
            let ast = syntax::parse_with_position(&def.pattern).map_err(|(position, reason)| {
                Error::RegexSyntax { token: def.name.clone(), position, reason }
            })?;
            cores.push((index, desugar(&ast)));
        }

        log::debug!("building lexer from {} token patterns", cores.len());

        let nfa = Nfa::from_tokens(&cores);
        log::debug!("thompson construction: {} nfa states", nfa.num_states());

        let dfa = dfa::determinize(&nfa);
        log::debug!("determinization: {} dfa states", dfa.num_states());

        let min = dfa::minimize(&dfa);
        log::debug!("minimization: {} states ({} before)", min.num_states(), dfa.num_states());

        let mut warnings = Vec::new();
        for (index, def) in self.tokens.iter().enumerate() {
            if regex::is_nullable(&cores[index].1) {
                let warning = EmptyLanguageWarning { token: def.name.clone() };
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }

        Ok((Lexer { dfa: min, tokens: self.tokens, end_kind, error_kind }, warnings))
    }
}

/// A compiled, immutable lexer: a minimized DFA plus the token table it
/// resolves accept states against. Plain owned data, so it is `Send + Sync`
/// for free and can be shared across threads or reused for any number of
/// [`Scanner`]s without synchronization.
#[derive(Clone, Debug)]
pub struct Lexer {
    dfa: Dfa,
    tokens: Vec<TokenDef>,
    end_kind: String,
    error_kind: String,
}

impl Lexer {
    /// Starts scanning an in-memory string.
    pub fn scan<'a>(&'a self, input: &'a str) -> Scanner<'a, StrCharStream<'a>> {
        self.scan_stream(StrCharStream::new(input))
    }

    /// Starts scanning an arbitrary [`CharStream`].
    pub fn scan_stream<'a, S: CharStream>(&'a self, stream: S) -> Scanner<'a, S> {
        Scanner::new(&self.dfa, &self.tokens, &self.end_kind, &self.error_kind, stream)
    }
}
