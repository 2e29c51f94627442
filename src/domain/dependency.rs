//! Pure dependency graph functions for cycle detection and topological sorting.
//!
//! Graphs are adjacency lists over node indices: `deps[i]` lists the nodes
//! that node `i` depends on (its outgoing "cites" edges). Callers decide which
//! edges take part; the functions here never look at labels or positions.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

/// A cycle found in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath {
    /// Closed walk through the cycle, starting at the earliest member. The
    /// first node is not repeated at the end.
    pub path: Vec<usize>,
    /// Every node of the strongly connected component the cycle lives in,
    /// sorted by key.
    pub members: Vec<usize>,
}

/// Detects cycles in the dependency graph.
///
/// Returns one [`CyclePath`] per strongly connected component with more than
/// one node, ordered by the key of each component's earliest member. Self
/// edges are expected to have been removed by the caller.
pub fn detect_cycles<K: Ord>(deps: &[Vec<usize>], keys: &[K]) -> Vec<CyclePath> {
    let mut cycles: Vec<CyclePath> = strongly_connected_components(deps)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|mut members| {
            members.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
            let path = shortest_cycle_through(members[0], &members, deps, keys);
            CyclePath { path, members }
        })
        .collect();

    cycles.sort_by(|a, b| keys[a.members[0]].cmp(&keys[b.members[0]]));
    cycles
}

/// Tarjan's algorithm. Components come out in reverse topological order.
pub fn strongly_connected_components(deps: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut tarjan = Tarjan {
        deps,
        next_index: 0,
        indices: vec![None; deps.len()],
        lowlink: vec![0; deps.len()],
        on_stack: vec![false; deps.len()],
        stack: Vec::new(),
        components: Vec::new(),
    };

    for node in 0..deps.len() {
        if tarjan.indices[node].is_none() {
            tarjan.visit(node);
        }
    }

    tarjan.components
}

struct Tarjan<'a> {
    deps: &'a [Vec<usize>],
    next_index: usize,
    indices: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    /// Depth-first walk from `root` with an explicit call stack of
    /// (node, next dependency to look at), so long citation chains cannot
    /// exhaust the thread stack.
    fn visit(&mut self, root: usize) {
        let deps = self.deps;
        let mut calls: Vec<(usize, usize)> = Vec::new();
        self.open(root);
        calls.push((root, 0));

        while let Some(frame) = calls.last_mut() {
            let (node, next) = *frame;
            if let Some(&dep) = deps[node].get(next) {
                frame.1 += 1;
                match self.indices[dep] {
                    None => {
                        self.open(dep);
                        calls.push((dep, 0));
                    }
                    Some(dep_index) if self.on_stack[dep] => {
                        self.lowlink[node] = self.lowlink[node].min(dep_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            calls.pop();
            if let Some(&(parent, _)) = calls.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
            }
            if self.indices[node] == Some(self.lowlink[node]) {
                self.close(node);
            }
        }
    }

    fn open(&mut self, node: usize) {
        self.indices[node] = Some(self.next_index);
        self.lowlink[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Pop the component rooted at `node`.
    fn close(&mut self, node: usize) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            component.push(member);
            if member == node {
                break;
            }
        }
        self.components.push(component);
    }
}

/// Breadth-first search for the shortest walk from `start` back to itself,
/// staying inside `members`. Neighbours are explored in key order so the
/// result is deterministic.
fn shortest_cycle_through<K: Ord>(
    start: usize,
    members: &[usize],
    deps: &[Vec<usize>],
    keys: &[K],
) -> Vec<usize> {
    let in_component = |node: usize| members.contains(&node);
    let sorted_deps = |node: usize| {
        let mut next: Vec<usize> = deps[node]
            .iter()
            .copied()
            .filter(|n| in_component(*n))
            .collect();
        next.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
        next
    };

    let mut parent: Vec<Option<usize>> = vec![None; deps.len()];
    let mut seen = vec![false; deps.len()];
    let mut queue = VecDeque::new();
    seen[start] = true;
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        for next in sorted_deps(node) {
            if next == start {
                // Walk the parent chain back to the start
                let mut path = vec![node];
                let mut current = node;
                while let Some(prev) = parent[current] {
                    path.push(prev);
                    current = prev;
                }
                path.reverse();
                return path;
            }
            if !seen[next] {
                seen[next] = true;
                parent[next] = Some(node);
                queue.push_back(next);
            }
        }
    }

    // Unreachable for a genuine component; fall back to the member list.
    members.to_vec()
}

/// Topological sort that stays as close as possible to an existing order.
///
/// Kahn's algorithm with a min-heap: among all nodes whose dependencies have
/// been emitted, the one with the smallest key goes next. Dependencies come
/// before their dependents. Returns `Err` with the nodes that could never be
/// emitted when the graph has a cycle.
pub fn stable_topological_sort<K: Ord>(
    deps: &[Vec<usize>],
    keys: &[K],
) -> Result<Vec<usize>, Vec<usize>> {
    let n = deps.len();
    let mut unsatisfied = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (node, targets) in deps.iter().enumerate() {
        for &target in targets {
            unsatisfied[node] += 1;
            dependents[target].push(node);
        }
    }

    let mut ready: BinaryHeap<Reverse<(&K, usize)>> = (0..n)
        .filter(|node| unsatisfied[*node] == 0)
        .map(|node| Reverse((&keys[node], node)))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse((_, node))) = ready.pop() {
        order.push(node);
        for &dependent in &dependents[node] {
            unsatisfied[dependent] -= 1;
            if unsatisfied[dependent] == 0 {
                ready.push(Reverse((&keys[dependent], dependent)));
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        Err((0..n).filter(|node| unsatisfied[*node] > 0).collect())
    }
}
