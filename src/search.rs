//! Generic A* over value-keyed nodes, with a wall-clock timeout.
//!
//! The open set is a binary heap ordered by `g + h` with insertion-order
//! tie-breaking, so runs are deterministic given a deterministic successor
//! function. The timeout is checked cooperatively inside the loop; there is
//! no other suspension point in the engine.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Results and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SearchResult<N> {
    /// Node path from the start to a goal, inclusive.
    pub path: Vec<N>,
    /// Total edge cost of the path.
    pub cost: usize,
    /// Number of nodes expanded, for diagnostics.
    pub expanded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The wall-clock budget ran out before a goal was found.
    Timeout,
    /// The reachable space was exhausted without reaching a goal.
    Exhausted,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "search timed out"),
            Self::Exhausted => write!(f, "search space exhausted without reaching a goal"),
        }
    }
}

impl std::error::Error for SearchError {}

// ---------------------------------------------------------------------------
// Heap entry
// ---------------------------------------------------------------------------

/// Min-heap entry: lower f first, earlier insertion wins ties.
struct HeapEntry {
    f: usize,
    seq: u64,
    node_idx: usize,
    g: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for BinaryHeap's max-heap semantics
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// A*
// ---------------------------------------------------------------------------

/// Run A* from `start`. Every edge returned by `successors` costs 1.
///
/// Returns the cheapest path to the first node satisfying `is_goal`, or a
/// [`SearchError`] on timeout / exhaustion.
pub fn a_star<N, S, G, H>(
    start: N,
    mut successors: S,
    mut is_goal: G,
    mut heuristic: H,
    timeout: Duration,
) -> Result<SearchResult<N>, SearchError>
where
    N: Clone + Eq + Hash,
    S: FnMut(&N) -> Vec<N>,
    G: FnMut(&N) -> bool,
    H: FnMut(&N) -> usize,
{
    let deadline = Instant::now() + timeout;

    // node arena keyed by value; indices are stable handles
    let mut nodes: Vec<N> = vec![start.clone()];
    let mut index: HashMap<N, usize> = HashMap::new();
    index.insert(start.clone(), 0);

    let mut g_score: Vec<usize> = vec![0];
    let mut parent: Vec<Option<usize>> = vec![None];
    let mut closed: Vec<bool> = vec![false];

    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;
    heap.push(HeapEntry { f: heuristic(&start), seq, node_idx: 0, g: 0 });

    let mut expanded = 0;

    while let Some(entry) = heap.pop() {
        if Instant::now() > deadline {
            return Err(SearchError::Timeout);
        }
        let idx = entry.node_idx;
        if closed[idx] || entry.g > g_score[idx] {
            continue; // stale heap entry
        }
        closed[idx] = true;
        expanded += 1;

        if is_goal(&nodes[idx]) {
            return Ok(SearchResult { path: reconstruct(&nodes, &parent, idx), cost: g_score[idx], expanded });
        }

        let current = nodes[idx].clone();
        let next_g = g_score[idx] + 1;
        for succ in successors(&current) {
            let succ_idx = match index.get(&succ) {
                Some(&i) => i,
                None => {
                    let i = nodes.len();
                    nodes.push(succ.clone());
                    index.insert(succ, i);
                    g_score.push(usize::MAX);
                    parent.push(None);
                    closed.push(false);
                    i
                }
            };
            if closed[succ_idx] || next_g >= g_score[succ_idx] {
                continue;
            }
            g_score[succ_idx] = next_g;
            parent[succ_idx] = Some(idx);
            seq += 1;
            heap.push(HeapEntry {
                f: next_g + heuristic(&nodes[succ_idx]),
                seq,
                node_idx: succ_idx,
                g: next_g,
            });
        }
    }

    Err(SearchError::Exhausted)
}

fn reconstruct<N: Clone>(nodes: &[N], parent: &[Option<usize>], goal: usize) -> Vec<N> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(idx) = cursor {
        path.push(nodes[idx].clone());
        cursor = parent[idx];
    }
    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
