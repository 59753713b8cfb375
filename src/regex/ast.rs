//! Surface syntax tree for the regex grammar. No capture groups or `^`/`$`
//! anchors: this grammar only ever needs to describe what a token matches,
//! never where in a larger string to search for it.

/// A single member of a character class: either one character or an
/// inclusive range of characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassItem {
    Char(char),
    Range(char, char),
    /// One of the built-in escape shortcuts (`\d`, `\w`, `\s`, and their
    /// negations), usable both bare and inside `[...]`.
    Shortcut(Shortcut),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Digit,
    NotDigit,
    Word,
    NotWord,
    Whitespace,
    NotWhitespace,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ast {
    /// A literal character, e.g. `a`.
    Literal(char),

    /// `.` — any character except `\n`.
    AnyChar,

    /// `[abc]`, `[a-z]`, `[^a-z]`, or a bare escape shortcut such as `\d`.
    Class { items: Vec<ClassItem>, negated: bool },

    /// Adjacent expressions, e.g. `ab`.
    Concat(Vec<Ast>),

    /// `a|b`.
    Alt(Vec<Ast>),

    /// `a*`.
    Star(Box<Ast>),

    /// `a+`.
    Plus(Box<Ast>),

    /// `a?`.
    Opt(Box<Ast>),

    /// `a{m,n}`. `max = None` means unbounded (`a{m,}`); `min == max` is
    /// exactly `m` repetitions (`a{m}`).
    Repeat { inner: Box<Ast>, min: u32, max: Option<u32> },

    /// `(a)` — grouping only, no capture semantics.
    Group(Box<Ast>),
}
