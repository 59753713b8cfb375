//! Rewrites a surface [`Ast`] into the minimal [`Core`] set:
//! `Epsilon | Interval | Concat | Alt | Star`, kept as a separate pass here
//! rather than fused with Thompson construction.

use super::ast::{Ast, ClassItem, Shortcut};
use super::core::Core;
use crate::interval::Interval;

pub fn desugar(ast: &Ast) -> Core {
    match ast {
        Ast::Literal(c) => Core::Interval(Interval::single(*c)),

        Ast::AnyChar => any_char_core(),

        Ast::Class { items, negated } => class_core(items, *negated),

        Ast::Concat(parts) => {
            let mut flat = Vec::new();
            for p in parts {
                match desugar(p) {
                    Core::Concat(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            Core::Concat(flat)
        }

        Ast::Alt(branches) => {
            let mut flat = Vec::new();
            for b in branches {
                match desugar(b) {
                    Core::Alt(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            Core::Alt(flat)
        }

        Ast::Star(inner) => Core::Star(Box::new(desugar(inner))),

        Ast::Plus(inner) => {
            let d = desugar(inner);
            Core::Concat(vec![d.clone(), Core::Star(Box::new(d))])
        }

        Ast::Opt(inner) => Core::Alt(vec![Core::Epsilon, desugar(inner)]),

        Ast::Repeat { inner, min, max } => repeat_core(&desugar(inner), *min, *max),

        Ast::Group(inner) => desugar(inner),
    }
}

/// `.` desugars to "any code point except `\n`", split into the two
/// intervals that flank the excluded newline.
fn any_char_core() -> Core {
    let pieces = Interval::everything().minus(&Interval::single('\n'));
    match pieces.len() {
        1 => Core::Interval(pieces[0]),
        _ => Core::Alt(pieces.into_iter().map(Core::Interval).collect()),
    }
}

fn shortcut_intervals(s: Shortcut) -> Vec<Interval> {
    match s {
        Shortcut::Digit => vec![Interval::new('0' as u32, '9' as u32)],
        Shortcut::NotDigit => complement(&[Interval::new('0' as u32, '9' as u32)]),
        Shortcut::Word => vec![
            Interval::new('a' as u32, 'z' as u32),
            Interval::new('A' as u32, 'Z' as u32),
            Interval::new('0' as u32, '9' as u32),
            Interval::single('_'),
        ],
        Shortcut::NotWord => complement(&[
            Interval::new('a' as u32, 'z' as u32),
            Interval::new('A' as u32, 'Z' as u32),
            Interval::new('0' as u32, '9' as u32),
            Interval::single('_'),
        ]),
        Shortcut::Whitespace => vec![
            Interval::single(' '),
            Interval::single('\t'),
            Interval::single('\n'),
            Interval::single('\r'),
            Interval::single('\x0B'),
            Interval::single('\x0C'),
        ],
        Shortcut::NotWhitespace => complement(&[
            Interval::single(' '),
            Interval::single('\t'),
            Interval::single('\n'),
            Interval::single('\r'),
            Interval::single('\x0B'),
            Interval::single('\x0C'),
        ]),
    }
}

/// Merges a set of (possibly overlapping) intervals into sorted, disjoint
/// runs.
fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.to_vec();
    sorted.sort_by_key(|iv| iv.lo);
    let mut out: Vec<Interval> = Vec::new();
    for iv in sorted {
        if let Some(last) = out.last_mut() {
            if last.touches(&iv) {
                *last = Interval::new(last.lo.min(iv.lo), last.hi.max(iv.hi));
                continue;
            }
        }
        out.push(iv);
    }
    out
}

fn complement(intervals: &[Interval]) -> Vec<Interval> {
    let merged = merge(intervals);
    let mut remaining = vec![Interval::everything()];
    for hole in merged {
        remaining = remaining
            .into_iter()
            .flat_map(|r| r.minus(&hole))
            .collect();
    }
    remaining
}

fn class_core(items: &[ClassItem], negated: bool) -> Core {
    let mut raw = Vec::new();
    for item in items {
        match item {
            ClassItem::Char(c) => raw.push(Interval::single(*c)),
            ClassItem::Range(lo, hi) => raw.push(Interval::new(*lo as u32, *hi as u32)),
            ClassItem::Shortcut(s) => raw.extend(shortcut_intervals(*s)),
        }
    }

    let merged = merge(&raw);
    let final_intervals = if negated { complement(&merged) } else { merged };

    match final_intervals.len() {
        0 => Core::Alt(Vec::new()), // matches nothing
        1 => Core::Interval(final_intervals[0]),
        _ => Core::Alt(final_intervals.into_iter().map(Core::Interval).collect()),
    }
}

/// `a{min,max}`. `max = None` means unbounded: `min` mandatory copies
/// followed by a `Star` tail. A finite `max` expands the optional part as
/// nested `Alt(Epsilon, Concat(inner, ...))`, which is the standard
/// bounded-repetition expansion (each optional copy only "activates" if
/// every copy before it did).
fn repeat_core(inner: &Core, min: u32, max: Option<u32>) -> Core {
    let mandatory: Vec<Core> = (0..min).map(|_| inner.clone()).collect();

    let tail = match max {
        None => Some(Core::Star(Box::new(inner.clone()))),
        Some(max) => {
            debug_assert!(max >= min, "regex repeat upper bound below lower bound");
            let optional_count = max - min;
            if optional_count == 0 {
                None
            } else {
                let mut acc = Core::Epsilon;
                for _ in 0..optional_count {
                    acc = Core::Alt(vec![Core::Epsilon, Core::Concat(vec![inner.clone(), acc])]);
                }
                Some(acc)
            }
        }
    };

    let mut parts = mandatory;
    if let Some(t) = tail {
        parts.push(t);
    }

    match parts.len() {
        0 => Core::Epsilon,
        1 => parts.into_iter().next().unwrap(),
        _ => Core::Concat(parts),
    }
}
