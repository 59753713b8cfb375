//! Recursive-descent parser for the regex surface grammar, written in
//! `nom`'s function-combinator style.

use nom::branch::alt;
use nom::bytes::complete::{tag, take};
use nom::character::complete::{char as nchar, digit1};
use nom::combinator::{map, map_res, opt, value, verify};
use nom::multi::{many1, separated_list1};
use nom::sequence::{delimited, pair, preceded, tuple};
use nom::IResult;

use super::ast::{Ast, ClassItem, Shortcut};

const RESERVED: &[char] = &['(', ')', '[', ']', '{', '}', '|', '*', '+', '?', '.', '\\'];

/// Escapes every regex metacharacter in `text` so that feeding the result to
/// [`parse`] matches `text` literally. This is how a caller-declared
/// plain-string token is turned into a pattern: back-slash every character
/// in [`RESERVED`].
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Parses a full pattern, requiring the entire input to be consumed.
pub fn parse(input: &str) -> Result<Ast, String> {
    parse_with_position(input).map_err(|(_, reason)| reason)
}

/// Same as [`parse`], but on failure also reports the byte offset into
/// `input` where parsing stopped making progress.
pub fn parse_with_position(input: &str) -> Result<Ast, (usize, String)> {
    match alternation(input) {
        Ok(("", ast)) => Ok(ast),
        Ok((rest, _)) => {
            Err((input.len() - rest.len(), format!("unexpected trailing input: {:?}", rest)))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err((input.len() - e.input.len(), format!("{:?}", e.code)))
        }
        Err(nom::Err::Incomplete(_)) => Err((input.len(), "incomplete input".to_string())),
    }
}

fn alternation(input: &str) -> IResult<&str, Ast> {
    map(separated_list1(nchar('|'), concat), |mut branches| {
        if branches.len() == 1 {
            branches.remove(0)
        } else {
            Ast::Alt(branches)
        }
    })(input)
}

fn concat(input: &str) -> IResult<&str, Ast> {
    map(many1(quantified), |mut items| {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Ast::Concat(items)
        }
    })(input)
}

fn quantified(input: &str) -> IResult<&str, Ast> {
    map(pair(atom, opt(quantifier)), |(a, q)| match q {
        None => a,
        Some(Quant::Star) => Ast::Star(Box::new(a)),
        Some(Quant::Plus) => Ast::Plus(Box::new(a)),
        Some(Quant::Opt) => Ast::Opt(Box::new(a)),
        Some(Quant::Repeat(min, max)) => Ast::Repeat { inner: Box::new(a), min, max },
    })(input)
}

enum Quant {
    Star,
    Plus,
    Opt,
    Repeat(u32, Option<u32>),
}

fn quantifier(input: &str) -> IResult<&str, Quant> {
    alt((
        value(Quant::Star, nchar('*')),
        value(Quant::Plus, nchar('+')),
        value(Quant::Opt, nchar('?')),
        bounded_repeat,
    ))(input)
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

fn bounded_repeat(input: &str) -> IResult<&str, Quant> {
    map(
        verify(
            delimited(
                nchar('{'),
                pair(number, opt(preceded(nchar(','), opt(number)))),
                nchar('}'),
            ),
            |(min, rest): &(u32, Option<Option<u32>>)| !matches!(rest, Some(Some(max)) if max < min),
        ),
        |(min, rest)| match rest {
            None => Quant::Repeat(min, Some(min)),
            Some(None) => Quant::Repeat(min, None),
            Some(Some(max)) => Quant::Repeat(min, Some(max)),
        },
    )(input)
}

fn atom(input: &str) -> IResult<&str, Ast> {
    alt((group, class, any_char, shortcut_atom, escaped_literal, plain_literal))(input)
}

/// Maps the character following a `\` to the value it denotes: `\n \r \t \0`
/// are named escapes; `\\ \' \"` and any escaped regex metacharacter
/// (`\. \( \) \[ \] \{ \} \| \* \+ \?`) denote themselves.
fn resolve_escape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        other => other,
    }
}

fn hex_digit(input: &str) -> IResult<&str, char> {
    verify(take_one_char, |c: &char| c.is_ascii_hexdigit())(input)
}

fn code_point_from_digits(digits: &[char]) -> char {
    let hex: String = digits.iter().collect();
    let v = u32::from_str_radix(&hex, 16).unwrap();
    char::from_u32(v).unwrap_or('\u{FFFD}')
}

/// `\xHH` — an exactly-two-hex-digit code point escape.
fn hex_escape_char(input: &str) -> IResult<&str, char> {
    map(preceded(tag("\\x"), pair(hex_digit, hex_digit)), |(a, b)| {
        code_point_from_digits(&[a, b])
    })(input)
}

/// `\uHHHH` — an exactly-four-hex-digit code point escape.
fn unicode_escape_char(input: &str) -> IResult<&str, char> {
    map(
        preceded(tag("\\u"), tuple((hex_digit, hex_digit, hex_digit, hex_digit))),
        |(a, b, c, d)| code_point_from_digits(&[a, b, c, d]),
    )(input)
}

fn group(input: &str) -> IResult<&str, Ast> {
    map(
        delimited(nchar('('), alternation, nchar(')')),
        |inner| Ast::Group(Box::new(inner)),
    )(input)
}

fn any_char(input: &str) -> IResult<&str, Ast> {
    value(Ast::AnyChar, nchar('.'))(input)
}

fn shortcut_atom(input: &str) -> IResult<&str, Ast> {
    map(shortcut, |s| Ast::Class { items: vec![ClassItem::Shortcut(s)], negated: false })(input)
}

fn shortcut(input: &str) -> IResult<&str, Shortcut> {
    preceded(
        nchar('\\'),
        alt((
            value(Shortcut::Digit, nchar('d')),
            value(Shortcut::NotDigit, nchar('D')),
            value(Shortcut::Word, nchar('w')),
            value(Shortcut::NotWord, nchar('W')),
            value(Shortcut::Whitespace, nchar('s')),
            value(Shortcut::NotWhitespace, nchar('S')),
        )),
    )(input)
}

fn escaped_literal(input: &str) -> IResult<&str, Ast> {
    alt((
        map(unicode_escape_char, Ast::Literal),
        map(hex_escape_char, Ast::Literal),
        map(preceded(nchar('\\'), take_one_char), |c| Ast::Literal(resolve_escape(c))),
    ))(input)
}

fn plain_literal(input: &str) -> IResult<&str, Ast> {
    map(
        verify(take_one_char, |c: &char| !RESERVED.contains(c)),
        Ast::Literal,
    )(input)
}

fn take_one_char(input: &str) -> IResult<&str, char> {
    map(take(1usize), |s: &str| s.chars().next().unwrap())(input)
}

fn class(input: &str) -> IResult<&str, Ast> {
    map(
        delimited(
            nchar('['),
            pair(opt(nchar('^')), many1(class_item)),
            nchar(']'),
        ),
        |(neg, items)| Ast::Class { items, negated: neg.is_some() },
    )(input)
}

fn class_item(input: &str) -> IResult<&str, ClassItem> {
    alt((
        map(shortcut, ClassItem::Shortcut),
        class_range,
        map(class_char, ClassItem::Char),
    ))(input)
}

/// A `lo-hi` range. Once `lo-` has been matched and a `hi` character found,
/// `hi < lo` (e.g. `[b-a]`) is reported as a hard parse failure rather than
/// an ordinary backtrackable error: if it backtracked, `class_item`'s `alt`
/// would just reinterpret `lo`, `-` and `hi` as three unrelated literal
/// characters instead of flagging the malformed range, and a reversed range
/// would never reach `Interval::new`'s `lo <= hi` assertion as a parse error
/// at all.
fn class_range(input: &str) -> IResult<&str, ClassItem> {
    let (rest, (lo, _)) = pair(class_char, nchar('-'))(input)?;
    let (rest, hi) = class_char(rest)?;
    if hi < lo {
        return Err(nom::Err::Failure(nom::error::Error::new(rest, nom::error::ErrorKind::Verify)));
    }
    Ok((rest, ClassItem::Range(lo, hi)))
}

fn class_char(input: &str) -> IResult<&str, char> {
    alt((
        unicode_escape_char,
        hex_escape_char,
        map(preceded(nchar('\\'), take_one_char), resolve_escape),
        verify(take_one_char, |c: &char| *c != ']' && *c != '\\'),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_concat() {
        assert_eq!(
            parse("abc").unwrap(),
            Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('b'), Ast::Literal('c')])
        );
    }

    #[test]
    fn parses_alternation_and_star() {
        let ast = parse("a|b*").unwrap();
        match ast {
            Ast::Alt(branches) => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0], Ast::Literal('a'));
                assert_eq!(branches[1], Ast::Star(Box::new(Ast::Literal('b'))));
            }
            other => panic!("expected Alt, got {:?}", other),
        }
    }

    #[test]
    fn parses_bounded_repeat_forms() {
        assert_eq!(
            parse("a{2,4}").unwrap(),
            Ast::Repeat { inner: Box::new(Ast::Literal('a')), min: 2, max: Some(4) }
        );
        assert_eq!(
            parse("a{3}").unwrap(),
            Ast::Repeat { inner: Box::new(Ast::Literal('a')), min: 3, max: Some(3) }
        );
        assert_eq!(
            parse("a{2,}").unwrap(),
            Ast::Repeat { inner: Box::new(Ast::Literal('a')), min: 2, max: None }
        );
    }

    #[test]
    fn parses_negated_class_with_range_and_shortcut() {
        let ast = parse("[^a-z\\d]").unwrap();
        match ast {
            Ast::Class { items, negated } => {
                assert!(negated);
                assert_eq!(
                    items,
                    vec![ClassItem::Range('a', 'z'), ClassItem::Shortcut(Shortcut::Digit)]
                );
            }
            other => panic!("expected Class, got {:?}", other),
        }
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("a)").is_err());
    }

    #[test]
    fn rejects_reversed_class_range() {
        assert!(parse("[b-a]").is_err());
    }

    #[test]
    fn named_escapes_denote_their_control_characters() {
        assert_eq!(parse("\\n").unwrap(), Ast::Literal('\n'));
        assert_eq!(parse("\\r").unwrap(), Ast::Literal('\r'));
        assert_eq!(parse("\\t").unwrap(), Ast::Literal('\t'));
        assert_eq!(parse("\\0").unwrap(), Ast::Literal('\0'));
    }

    #[test]
    fn escaped_metacharacters_denote_themselves() {
        assert_eq!(parse("\\.").unwrap(), Ast::Literal('.'));
        assert_eq!(parse("\\\\").unwrap(), Ast::Literal('\\'));
        assert_eq!(parse("\\'").unwrap(), Ast::Literal('\''));
        assert_eq!(parse("\\\"").unwrap(), Ast::Literal('"'));
    }

    #[test]
    fn hex_and_unicode_code_point_escapes() {
        assert_eq!(parse("\\x41").unwrap(), Ast::Literal('A'));
        assert_eq!(parse("\\u0041").unwrap(), Ast::Literal('A'));
        assert_eq!(parse("\\u00e9").unwrap(), Ast::Literal('\u{e9}'));
    }

    #[test]
    fn class_accepts_named_and_code_point_escapes() {
        let ast = parse("[\\n\\x41-\\x5a]").unwrap();
        match ast {
            Ast::Class { items, negated } => {
                assert!(!negated);
                assert_eq!(items, vec![ClassItem::Char('\n'), ClassItem::Range('A', 'Z')]);
            }
            other => panic!("expected Class, got {:?}", other),
        }
    }
}
