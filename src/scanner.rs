//! The scanner runtime: a maximal-munch tokenizer driven by a minimized DFA.
//! Tracks the last position at which the walk passed through an accepting
//! state, rather than stopping at the first accept, so the longest match
//! always wins.

use crate::dfa::Dfa;
use crate::token::{Accept, Token, TokenDef};

/// The character source a [`Scanner`] pulls from.
///
/// `checkpoint`/`restore` exist because maximal munch must look past the
/// last accepting position to confirm no longer match is available, then
/// roll the stream back to that last accept point before emitting a token.
/// An arbitrary stream (e.g. a socket) can't generally seek to any byte
/// offset, but it can always save/restore the small amount of state a
/// lexer's single lookahead run needs.
pub trait CharStream {
    type Checkpoint: Clone;

    fn checkpoint(&self) -> Self::Checkpoint;
    fn restore(&mut self, checkpoint: Self::Checkpoint);

    /// The next character without consuming it.
    fn peek(&self) -> Option<char>;
    /// Consumes and returns the next character, advancing position.
    fn bump(&mut self) -> Option<char>;

    fn offset(&self) -> usize;
    fn line(&self) -> usize;
    fn column(&self) -> usize;
}

/// A [`CharStream`] over an in-memory `&str`, tracking byte offset, 1-based
/// line and 1-based column.
#[derive(Clone, Debug)]
pub struct StrCharStream<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> StrCharStream<'a> {
    pub fn new(input: &'a str) -> Self {
        StrCharStream { input, offset: 0, line: 1, column: 1 }
    }
}

impl<'a> CharStream for StrCharStream<'a> {
    type Checkpoint = (usize, usize, usize);

    fn checkpoint(&self) -> Self::Checkpoint {
        (self.offset, self.line, self.column)
    }

    fn restore(&mut self, checkpoint: Self::Checkpoint) {
        (self.offset, self.line, self.column) = checkpoint;
    }

    fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn line(&self) -> usize {
        self.line
    }

    fn column(&self) -> usize {
        self.column
    }
}

/// Drives a [`CharStream`] against a compiled [`Dfa`], one token at a time.
pub struct Scanner<'a, S: CharStream> {
    dfa: &'a Dfa,
    tokens: &'a [TokenDef],
    end_kind: &'a str,
    error_kind: &'a str,
    stream: S,
    emitted_end: bool,
}

impl<'a, S: CharStream> Scanner<'a, S> {
    pub fn new(dfa: &'a Dfa, tokens: &'a [TokenDef], end_kind: &'a str, error_kind: &'a str, stream: S) -> Self {
        Scanner { dfa, tokens, end_kind, error_kind, stream, emitted_end: false }
    }

    /// Produces the next token, or `None` once the designated end-of-input
    /// token has already been returned once.
    ///
    /// Walks the DFA, remembering the last position at which the current
    /// state was accepting (skipping zero-length matches, which would
    /// otherwise let an always-nullable token loop forever without consuming
    /// input); on running out of matching transitions, rolls back to that
    /// last accept point. If no accept point was ever reached, the stream
    /// doesn't advance on its own, so recovery consumes exactly one
    /// character as the designated error kind — a deliberately simple,
    /// tunable policy, not claimed to be optimal for every grammar.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if self.stream.peek().is_none() {
                if self.emitted_end {
                    return None;
                }
                self.emitted_end = true;
                let offset = self.stream.offset();
                return Some(Token {
                    kind: self.end_kind.to_string(),
                    text: String::new(),
                    start: offset,
                    end: offset,
                    line: self.stream.line(),
                    column: self.stream.column(),
                });
            }

            let start_checkpoint = self.stream.checkpoint();
            let start_offset = self.stream.offset();
            let start_line = self.stream.line();
            let start_column = self.stream.column();

            let mut state = self.dfa.start;
            let mut text = String::new();
            let mut last_accept: Option<(S::Checkpoint, String, usize)> = None;

            loop {
                if let Some(token_idx) = self.dfa.accept[state] {
                    if !text.is_empty() {
                        last_accept = Some((self.stream.checkpoint(), text.clone(), token_idx));
                    }
                }

                match self.stream.peek() {
                    None => break,
                    Some(c) => match self.dfa.step(state, c as u32) {
                        Some(next) => {
                            self.stream.bump();
                            text.push(c);
                            state = next;
                        }
                        None => break,
                    },
                }
            }

            match last_accept {
                Some((checkpoint, matched_text, token_idx)) => {
                    self.stream.restore(checkpoint);
                    let end = self.stream.offset();
                    match &self.tokens[token_idx].accept {
                        Accept::Emit(name) => {
                            return Some(Token {
                                kind: name.clone(),
                                text: matched_text,
                                start: start_offset,
                                end,
                                line: start_line,
                                column: start_column,
                            });
                        }
                        Accept::Skip => {
                            log::trace!(
                                "skipped {:?} as {}",
                                matched_text,
                                self.tokens[token_idx].name
                            );
                            continue;
                        }
                    }
                }
                None => {
                    self.stream.restore(start_checkpoint);
                    let c = self.stream.bump().expect("peek already confirmed a character");
                    log::debug!("no token matches at byte {}: {:?}", start_offset, c);
                    let mut text = String::new();
                    text.push(c);
                    return Some(Token {
                        kind: self.error_kind.to_string(),
                        text,
                        start: start_offset,
                        end: self.stream.offset(),
                        line: start_line,
                        column: start_column,
                    });
                }
            }
        }
    }
}

impl<'a, S: CharStream> Iterator for Scanner<'a, S> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lexer, LexerDescription};

    fn word_number_lexer() -> Lexer {
        let (lexer, warnings) = LexerDescription::new()
            .token(TokenDef::skip("whitespace", "[ \\t\\n]+"))
            .token(TokenDef::emit("number", "[0-9]+"))
            .token(TokenDef::emit("word", "[a-zA-Z]+"))
            .end_kind("EOF")
            .error_kind("ERROR")
            .build()
            .unwrap();
        assert!(warnings.is_empty());
        lexer
    }

    #[test]
    fn skips_whitespace_and_tags_kinds() {
        let lexer = word_number_lexer();
        let mut scanner = lexer.scan("foo 123  bar");
        let kinds: Vec<(String, String)> =
            std::iter::from_fn(|| scanner.next_token()).map(|t| (t.kind, t.text)).collect();
        assert_eq!(
            kinds,
            vec![
                ("word".into(), "foo".into()),
                ("number".into(), "123".into()),
                ("word".into(), "bar".into()),
                ("EOF".into(), "".into()),
            ]
        );
    }

    #[test]
    fn maximal_munch_prefers_longest_match() {
        let (lexer, _) = LexerDescription::new()
            .token(TokenDef::emit("ab", "ab"))
            .token(TokenDef::emit("abc", "abc"))
            .end_kind("EOF")
            .error_kind("ERROR")
            .build()
            .unwrap();
        let mut scanner = lexer.scan("abc");
        let tok = scanner.next_token().unwrap();
        assert_eq!(tok.kind, "abc");
        assert_eq!(tok.text, "abc");
    }

    #[test]
    fn unrecognized_character_emits_error_kind_and_advances_one_char() {
        let lexer = word_number_lexer();
        let mut scanner = lexer.scan("foo#bar");
        let first = scanner.next_token().unwrap();
        assert_eq!(first.kind, "word");
        let err = scanner.next_token().unwrap();
        assert_eq!(err.kind, "ERROR");
        assert_eq!(err.text, "#");
        let next = scanner.next_token().unwrap();
        assert_eq!(next.kind, "word");
        assert_eq!(next.text, "bar");
    }

    #[test]
    fn end_token_is_emitted_exactly_once() {
        let lexer = word_number_lexer();
        let mut scanner = lexer.scan("x");
        let _ = scanner.next_token();
        let end = scanner.next_token().unwrap();
        assert_eq!(end.kind, "EOF");
        assert!(scanner.next_token().is_none());
    }

    #[test]
    fn an_always_nullable_token_never_causes_an_infinite_loop() {
        let (lexer, _) = LexerDescription::new()
            .token(TokenDef::skip("maybe-spaces", " *"))
            .token(TokenDef::emit("word", "[a-z]+"))
            .end_kind("EOF")
            .error_kind("ERROR")
            .build()
            .unwrap();
        let mut scanner = lexer.scan("ab");
        let tok = scanner.next_token().unwrap();
        assert_eq!(tok.kind, "word");
        assert_eq!(tok.text, "ab");
    }
}
