//! Thompson construction: builds an NFA with dense integer state ids from a
//! set of per-token [`Core`] trees.
//!
//! States are plain array indices and transitions are a `Vec`-of-`Vec`
//! adjacency list, rather than anything keyed by reference identity, so
//! every state map is a flat array lookup.

use std::collections::BTreeSet;

use crate::interval::Interval;
use crate::regex::Core;

pub type StateId = usize;

#[derive(Clone, Debug)]
pub enum Edge {
    Epsilon,
    Interval(Interval),
}

/// An NFA with one designated start state (epsilon-joining every token's own
/// sub-automaton) and a side table recording, for each accepting state, which
/// token declaration it accepts for.
#[derive(Clone, Debug)]
pub struct Nfa {
    transitions: Vec<Vec<(Edge, StateId)>>,
    pub start: StateId,
    /// Maps an accepting NFA state to the index of the token it accepts.
    /// A state can only ever accept one token: each token gets its own
    /// private accept state before being epsilon-joined into the whole.
    pub accept: Vec<Option<usize>>,
}

/// Entry/exit pair for a sub-automaton under construction. Every Thompson
/// construction case below composes fragments purely through their `start`
/// and `end` states.
struct Fragment {
    start: StateId,
    end: StateId,
}

impl Nfa {
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    pub fn transitions_from(&self, state: StateId) -> &[(Edge, StateId)] {
        &self.transitions[state]
    }

    fn add_state(&mut self) -> StateId {
        self.transitions.push(Vec::new());
        self.accept.push(None);
        self.transitions.len() - 1
    }

    fn add_edge(&mut self, from: StateId, edge: Edge, to: StateId) {
        self.transitions[from].push((edge, to));
    }

    /// Builds the combined NFA for a list of `(token_index, pattern)` pairs,
    /// in declaration order. Declaration order itself is not resolved here
    /// (see `dfa::resolve_accepts`) — this only records, per accepting
    /// state, which single token it was built for.
    pub fn from_tokens(tokens: &[(usize, Core)]) -> Nfa {
        let mut nfa = Nfa { transitions: Vec::new(), start: 0, accept: Vec::new() };
        let super_start = nfa.add_state();
        nfa.start = super_start;

        for (token_index, core) in tokens {
            let frag = nfa.build(core);
            nfa.add_edge(super_start, Edge::Epsilon, frag.start);
            nfa.accept[frag.end] = Some(*token_index);
        }

        nfa
    }

    fn build(&mut self, core: &Core) -> Fragment {
        match core {
            Core::Epsilon => {
                let start = self.add_state();
                let end = self.add_state();
                self.add_edge(start, Edge::Epsilon, end);
                Fragment { start, end }
            }

            Core::Interval(iv) => {
                let start = self.add_state();
                let end = self.add_state();
                self.add_edge(start, Edge::Interval(*iv), end);
                Fragment { start, end }
            }

            Core::Concat(parts) => {
                if parts.is_empty() {
                    return self.build(&Core::Epsilon);
                }
                let mut frags: Vec<Fragment> = parts.iter().map(|p| self.build(p)).collect();
                let start = frags[0].start;
                for window in frags.windows(2) {
                    self.add_edge(window[0].end, Edge::Epsilon, window[1].start);
                }
                let end = frags.pop().unwrap().end;
                Fragment { start, end }
            }

            Core::Alt(branches) => {
                let start = self.add_state();
                let end = self.add_state();
                if branches.is_empty() {
                    // Matches nothing: start has no path to end at all.
                    return Fragment { start, end };
                }
                for b in branches {
                    let frag = self.build(b);
                    self.add_edge(start, Edge::Epsilon, frag.start);
                    self.add_edge(frag.end, Edge::Epsilon, end);
                }
                Fragment { start, end }
            }

            Core::Star(inner) => {
                let start = self.add_state();
                let end = self.add_state();
                let frag = self.build(inner);
                self.add_edge(start, Edge::Epsilon, frag.start);
                self.add_edge(start, Edge::Epsilon, end);
                self.add_edge(frag.end, Edge::Epsilon, frag.start);
                self.add_edge(frag.end, Edge::Epsilon, end);
                Fragment { start, end }
            }
        }
    }

    /// Fixpoint BFS over epsilon edges. A plain worklist is enough here:
    /// subset construction only ever needs a transient closure of a given
    /// state set, with nothing kept merged between calls.
    pub fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = states.clone();
        let mut worklist: Vec<StateId> = states.iter().copied().collect();
        while let Some(s) = worklist.pop() {
            for (edge, to) in &self.transitions[s] {
                if matches!(edge, Edge::Epsilon) && closure.insert(*to) {
                    worklist.push(*to);
                }
            }
        }
        closure
    }

    /// All interval edges leading out of any state in `states`, used by
    /// determinization to build the per-subset-state alphabet cover.
    pub fn outgoing_intervals(&self, states: &BTreeSet<StateId>) -> Vec<Interval> {
        states
            .iter()
            .flat_map(|s| self.transitions[*s].iter())
            .filter_map(|(edge, _)| match edge {
                Edge::Interval(iv) => Some(*iv),
                Edge::Epsilon => None,
            })
            .collect()
    }

    pub fn mv(&self, states: &BTreeSet<StateId>, c: u32) -> BTreeSet<StateId> {
        let mut out = BTreeSet::new();
        for s in states {
            for (edge, to) in &self.transitions[*s] {
                if let Edge::Interval(iv) = edge {
                    if iv.contains(c) {
                        out.insert(*to);
                    }
                }
            }
        }
        out
    }
}
