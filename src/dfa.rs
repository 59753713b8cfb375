//! Determinization (subset construction), minimization, and accept-class
//! resolution.
//!
//! `determinize` runs a standard worklist-over-subsets construction,
//! generalized from a single shared alphabet to a disjoint interval cover
//! recomputed per DFA state (`crate::interval::cover`). `minimize` implements
//! textbook Hopcroft-style partition refinement rather than a double-reversal
//! (Brzozowski) minimizer: reversal-based minimization can conflate the
//! accept states of two different tokens into one DFA state with no way to
//! tell them apart, and per-accept-state token identity must survive
//! minimization here (see DESIGN.md), so the blocks are seeded such that two
//! states accepting different tokens can never end up merged.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::interval::{cover, Interval};
use crate::nfa::{Nfa, StateId as NfaStateId};

pub type DState = usize;

#[derive(Clone, Debug)]
pub struct Dfa {
    /// Outgoing transitions per state, as a disjoint set of intervals (no two
    /// intervals in one state's row overlap).
    pub transitions: Vec<Vec<(Interval, DState)>>,
    /// `Some(token_index)` for an accepting state, resolved to the
    /// lowest-declared-index token whose NFA accept state appears in that
    /// DFA state's subset; `None` for a non-accepting state.
    pub accept: Vec<Option<usize>>,
    pub start: DState,
}

impl Dfa {
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    pub fn step(&self, state: DState, c: u32) -> Option<DState> {
        self.transitions[state]
            .iter()
            .find(|(iv, _)| iv.contains(c))
            .map(|(_, to)| *to)
    }
}

/// Picks, for a set of candidate token indices, the one declared earliest
/// (lowest index). `None` if the set is empty.
fn first_declared(candidates: impl IntoIterator<Item = usize>) -> Option<usize> {
    candidates.into_iter().min()
}

pub fn determinize(nfa: &Nfa) -> Dfa {
    let start_set = nfa.epsilon_closure(&BTreeSet::from([nfa.start]));

    let mut subset_to_id: BTreeMap<BTreeSet<NfaStateId>, DState> = BTreeMap::new();
    let mut transitions: Vec<Vec<(Interval, DState)>> = Vec::new();
    let mut accept: Vec<Option<usize>> = Vec::new();

    let start_id = intern(&start_set, &mut subset_to_id, &mut transitions, &mut accept, nfa);

    let mut worklist = vec![start_set];
    while let Some(set) = worklist.pop() {
        let id = *subset_to_id.get(&set).unwrap();
        let outgoing = nfa.outgoing_intervals(&set);
        let pieces = cover(&outgoing);

        let mut row = Vec::new();
        for piece in pieces {
            let moved = nfa.mv(&set, piece.interval.lo);
            let closure = nfa.epsilon_closure(&moved);
            if closure.is_empty() {
                continue;
            }
            let is_new = !subset_to_id.contains_key(&closure);
            let target_id = intern(&closure, &mut subset_to_id, &mut transitions, &mut accept, nfa);
            if is_new {
                worklist.push(closure);
            }
            row.push((piece.interval, target_id));
        }
        transitions[id] = row;
    }

    Dfa { transitions, accept, start: start_id }
}

fn intern(
    set: &BTreeSet<NfaStateId>,
    subset_to_id: &mut BTreeMap<BTreeSet<NfaStateId>, DState>,
    transitions: &mut Vec<Vec<(Interval, DState)>>,
    accept: &mut Vec<Option<usize>>,
    nfa: &Nfa,
) -> DState {
    if let Some(&id) = subset_to_id.get(set) {
        return id;
    }
    let id = transitions.len();
    transitions.push(Vec::new());
    let resolved = first_declared(set.iter().filter_map(|s| nfa.accept[*s]));
    accept.push(resolved);
    subset_to_id.insert(set.clone(), id);
    id
}

const DEAD: i64 = -1;

/// Partition refinement seeded by accept-token identity, then split until
/// every block is transition-consistent across a common alphabet.
pub fn minimize(dfa: &Dfa) -> Dfa {
    let n = dfa.num_states();
    if n == 0 {
        return dfa.clone();
    }

    // A single alphabet shared by every state, so blocks can be compared
    // piece-by-piece. Recomputing this globally (rather than reusing each
    // state's own per-state cover from determinization) is what lets two
    // states with differently-shaped transition rows be compared at all.
    let all_intervals: Vec<Interval> = dfa
        .transitions
        .iter()
        .flat_map(|row| row.iter().map(|(iv, _)| *iv))
        .collect();
    let pieces: Vec<Interval> = cover(&all_intervals).into_iter().map(|p| p.interval).collect();

    // Initial blocks: one per distinct accept identity (including the
    // non-accepting block), keyed so two states accepting different tokens
    // start in different blocks and can never be merged by refinement.
    let mut block_of: Vec<usize> = vec![0; n];
    {
        let mut seen: HashMap<Option<usize>, usize> = HashMap::new();
        for s in 0..n {
            let key = dfa.accept[s];
            let next_id = seen.len();
            let id = *seen.entry(key).or_insert(next_id);
            block_of[s] = id;
        }
    }

    loop {
        let mut signature_of: Vec<(usize, Vec<i64>)> = Vec::with_capacity(n);
        for s in 0..n {
            let sig: Vec<i64> = pieces
                .iter()
                .map(|piece| match dfa.step(s, piece.lo) {
                    Some(to) => block_of[to] as i64,
                    None => DEAD,
                })
                .collect();
            signature_of.push((block_of[s], sig));
        }

        let mut next_block_ids: HashMap<(usize, Vec<i64>), usize> = HashMap::new();
        let mut new_block_of = vec![0usize; n];
        for s in 0..n {
            let key = signature_of[s].clone();
            let next_id = next_block_ids.len();
            let id = *next_block_ids.entry(key).or_insert(next_id);
            new_block_of[s] = id;
        }

        if new_block_of == block_of {
            break;
        }
        block_of = new_block_of;
    }

    build_minimized(dfa, &block_of, &pieces)
}

fn build_minimized(dfa: &Dfa, block_of: &[usize], pieces: &[Interval]) -> Dfa {
    let num_blocks = block_of.iter().max().map(|m| m + 1).unwrap_or(0);

    let mut accept = vec![None; num_blocks];
    for s in 0..dfa.num_states() {
        accept[block_of[s]] = dfa.accept[s];
    }

    let mut transitions: Vec<Vec<(Interval, DState)>> = vec![Vec::new(); num_blocks];
    for block in 0..num_blocks {
        // Any representative state works: refinement guarantees every state
        // in a block agrees on its target block for every alphabet piece.
        let representative = block_of.iter().position(|&b| b == block).unwrap();
        let mut raw: Vec<(Interval, DState)> = Vec::new();
        for piece in pieces {
            if let Some(to) = dfa.step(representative, piece.lo) {
                raw.push((*piece, block_of[to]));
            }
        }
        transitions[block] = merge_adjacent_same_target(raw);
    }

    Dfa { transitions, accept, start: block_of[dfa.start] }
}

/// Coalesces adjacent pieces that land on the same target state back into
/// single intervals, so minimization doesn't leave the transition table more
/// fragmented than it needs to be.
fn merge_adjacent_same_target(mut row: Vec<(Interval, DState)>) -> Vec<(Interval, DState)> {
    row.sort_by_key(|(iv, _)| iv.lo);
    let mut out: Vec<(Interval, DState)> = Vec::new();
    for (iv, to) in row {
        if let Some((last_iv, last_to)) = out.last_mut() {
            if *last_to == to && last_iv.hi + 1 == iv.lo {
                *last_iv = Interval::new(last_iv.lo, iv.hi);
                continue;
            }
        }
        out.push((iv, to));
    }
    out
}
