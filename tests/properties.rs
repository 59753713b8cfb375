//! Property-based tests for the invariants a lexer construction pipeline is
//! expected to uphold regardless of which tokens a caller declares.

use lexgen::interval::{cover, Interval};
use lexgen::{LexerDescription, TokenDef};
use proptest::prelude::*;

fn arb_interval() -> impl Strategy<Value = Interval> {
    (0u32..200, 0u32..20).prop_map(|(lo, len)| Interval::new(lo, lo + len))
}

proptest! {
    /// Every piece `cover` produces is disjoint from every other piece, and
    /// the union of all pieces equals the union of the inputs.
    #[test]
    fn cover_pieces_are_disjoint_and_cover_every_input_point(
        intervals in proptest::collection::vec(arb_interval(), 1..8)
    ) {
        let pieces = cover(&intervals);

        for i in 0..pieces.len() {
            for j in (i + 1)..pieces.len() {
                prop_assert!(!pieces[i].interval.intersects(&pieces[j].interval));
            }
        }

        for sample in 0u32..220 {
            let in_any_input = intervals.iter().any(|iv| iv.contains(sample));
            let in_any_piece = pieces.iter().any(|p| p.interval.contains(sample));
            prop_assert_eq!(in_any_input, in_any_piece);
        }
    }

    /// Minimizing never increases the number of DFA states.
    #[test]
    fn minimization_never_grows_the_automaton(
        n in 1u32..6
    ) {
        let tokens: Vec<(usize, lexgen::regex::Core)> = (0..n)
            .map(|i| {
                let pattern = format!("{}a*b", "x".repeat(i as usize));
                let ast = lexgen::regex::syntax::parse(&pattern).unwrap();
                (i as usize, lexgen::regex::desugar::desugar(&ast))
            })
            .collect();
        let nfa = lexgen::nfa::Nfa::from_tokens(&tokens);
        let dfa = lexgen::dfa::determinize(&nfa);
        let min = lexgen::dfa::minimize(&dfa);
        prop_assert!(min.num_states() <= dfa.num_states());
    }
}

/// A fixed small-language lexer used by the maximal-munch property below.
fn digits_and_words_lexer() -> lexgen::Lexer {
    let (lexer, _) = LexerDescription::new()
        .token(TokenDef::skip("ws", " +"))
        .token(TokenDef::emit("num", "[0-9]+"))
        .token(TokenDef::emit("word", "[a-z]+"))
        .end_kind("EOF")
        .error_kind("ERROR")
        .build()
        .unwrap();
    lexer
}

fn arb_token() -> impl Strategy<Value = (String, &'static str)> {
    prop_oneof![
        "[0-9]{1,4}".prop_map(|s| (s, "num")),
        "[a-z]{1,4}".prop_map(|s| (s, "word")),
    ]
}

proptest! {
    /// For any sequence of space-separated words/numbers, the scanner
    /// recovers exactly that sequence of kinds and texts: maximal munch
    /// never lets one token's match bleed into the next, and the
    /// single-space separators are fully invisible.
    #[test]
    fn space_separated_tokens_round_trip_through_the_scanner(
        pieces in proptest::collection::vec(arb_token(), 1..8)
    ) {
        let lexer = digits_and_words_lexer();
        let input = pieces.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>().join(" ");
        let got: Vec<(String, String)> = lexer.scan(&input).map(|t| (t.kind, t.text)).collect();

        let mut expected: Vec<(String, String)> = pieces
            .iter()
            .map(|(s, kind)| (kind.to_string(), s.clone()))
            .collect();
        expected.push(("EOF".to_string(), String::new()));

        prop_assert_eq!(got, expected);
    }
}

/// A lexer over a tiny alphabet (`a`, `b`, space) with no `ignore` tokens, so
/// every character is accounted for by exactly one emitted token (a run, or
/// a single-character error) — exercising the scanner's totality property,
/// which only holds when no text is silently swallowed by an ignore token.
fn no_ignore_lexer() -> lexgen::Lexer {
    let (lexer, _) = LexerDescription::new()
        .token(TokenDef::emit("run", "a+"))
        .token(TokenDef::emit("space", " +"))
        .end_kind("EOF")
        .error_kind("ERROR")
        .build()
        .unwrap();
    lexer
}

proptest! {
    /// Concatenating every emitted token's text (including error tokens, but
    /// the end token contributes nothing) always reconstructs the input
    /// exactly, and the stream always ends in exactly one end-kind token.
    #[test]
    fn scanner_is_total_and_reconstructs_the_input(
        input in "[ab c]{0,20}"
    ) {
        let lexer = no_ignore_lexer();
        let tokens: Vec<_> = lexer.scan(&input).collect();

        let (last, rest) = tokens.split_last().expect("always at least the EOF token");
        prop_assert_eq!(&last.kind, "EOF");
        prop_assert_eq!(&last.text, "");
        prop_assert!(rest.iter().all(|t| t.kind != "EOF"));

        let reconstructed: String = rest.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(reconstructed, input);
    }
}
