/*!
# Path Engine

Six concrete search strategies over [`crate::core::graph::Graph`], all sharing a
single contract: the caller has just run [`Graph::clear`](crate::core::graph::Graph::clear);
each algorithm writes only into a vertex's planner scratch fields (`path`,
`cost`, `priority`); [`get_path`] walks `path` back from target to source once
the algorithm returns.

Every strategy but [`bfs`] is built on the same indexed-heap skeleton: seed the
source, pop the least-priority vertex, relax its active outgoing edges. They
differ only in what they use as priority and when they stop, which is exactly
what each function's doc comment calls out.
*/

use std::collections::VecDeque;

use crate::core::graph::{EdgeId, Graph, NodeId};
use crate::core::heap::IndexedHeap;

/// Reconstructs the source-to-target path written by a planner run.
///
/// Walks `path` back from `target` until it reaches `source` (success) or a
/// vertex with no back-pointer (the planner never reached it). `source ==
/// target` is legal and yields the single-vertex path `[source]`.
///
/// Returns an empty vector if `target` is unreachable.
pub fn get_path(graph: &Graph, source: NodeId, target: NodeId) -> Vec<NodeId> {
    if source == target {
        return vec![source];
    }
    let mut path = vec![target];
    let mut cur = target;
    loop {
        let prev = match graph.vertex(cur).and_then(|v| v.scratch.path) {
            Some(p) => p,
            None => return Vec::new(),
        };
        if prev == cur {
            // Only `source` carries the self-pointing sentinel; reaching it
            // any other way means the walk looped without ever hitting `source`.
            if cur == source {
                break;
            }
            return Vec::new();
        }
        path.push(prev);
        if prev == source {
            break;
        }
        cur = prev;
    }
    path.reverse();
    path
}

/// Breadth-first search from `source`, used for reachability only.
///
/// Seeds `source.path` with itself as a sentinel so [`get_path`] can tell
/// "reached, no predecessor" apart from "never reached". Sets no costs.
/// Post-condition: `v.path.is_some()` iff `v` is reachable from `source` via
/// non-accidented edges.
pub fn bfs(graph: &mut Graph, source: NodeId) {
    if let Some(v) = graph.vertex_mut(source) {
        v.scratch.path = Some(source);
    } else {
        return;
    }
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(u) = queue.pop_front() {
        let neighbors: Vec<(EdgeId, NodeId)> = graph.active_out(u).collect();
        for (_e, v) in neighbors {
            let unseen = graph.vertex(v).map(|vv| vv.scratch.path.is_none()).unwrap_or(false);
            if unseen {
                graph.vertex_mut(v).unwrap().scratch.path = Some(u);
                queue.push_back(v);
            }
        }
    }
}

/// Greedy Best-First Search: priority is the straight-line distance from the
/// *current* vertex to the candidate neighbor, never to `target`.
///
/// This is the source repository's own algorithm, reproduced faithfully: it
/// is not guaranteed optimal (see [`super::super::core::paths::astar`] for
/// the admissible variant) and is bench-marked against A* by the driver,
/// which reports "not the best path" when the two disagree. Never calls
/// `decrease_key`: a vertex is inserted into the heap at most once, the
/// moment it is first discovered.
pub fn greedy_best_first(graph: &mut Graph, source: NodeId, target: NodeId) {
    let mut heap: IndexedHeap<NodeId> = IndexedHeap::new();
    if let Some(v) = graph.vertex_mut(source) {
        v.scratch.path = Some(source);
    } else {
        return;
    }
    heap.insert(source, |n| graph.vertex(n).map(|v| v.scratch.priority).unwrap_or(f64::INFINITY));

    while !heap.is_empty() {
        let u = heap
            .extract_min(|n| graph.vertex(n).map(|v| v.scratch.priority).unwrap_or(f64::INFINITY))
            .expect("heap reported non-empty");
        if u == target {
            break;
        }
        let neighbors: Vec<(EdgeId, NodeId)> = graph.active_out(u).collect();
        for (_e, v) in neighbors {
            let unseen = graph.vertex(v).map(|vv| vv.scratch.path.is_none()).unwrap_or(false);
            if unseen {
                let priority = graph.distance(v, u);
                let vv = graph.vertex_mut(v).unwrap();
                vv.scratch.priority = priority;
                vv.scratch.path = Some(u);
                heap.insert(v, |n| {
                    graph.vertex(n).map(|v| v.scratch.priority).unwrap_or(f64::INFINITY)
                });
            }
        }
    }
}

/// Shared relax-and-extract skeleton for the three Dijkstra-family planners
/// and A*. `cost_of` maps an edge to the cost Dijkstra should accumulate
/// (Euclidean length, or `edge.weight` for the by-weight variant). `extra` is
/// added on top of the accumulated cost to form the heap priority: zero for
/// plain Dijkstra, `distance(v, target)` for A*. `early_exit` stops the loop
/// the moment `target` is popped.
fn dijkstra_like(
    graph: &mut Graph,
    source: NodeId,
    target: Option<NodeId>,
    early_exit: bool,
    cost_of: impl Fn(&Graph, EdgeId) -> f64,
    extra: impl Fn(&Graph, NodeId) -> f64,
) {
    let mut heap: IndexedHeap<NodeId> = IndexedHeap::new();
    if let Some(v) = graph.vertex_mut(source) {
        v.scratch.path = Some(source);
        v.scratch.cost = 0.0;
        v.scratch.priority = extra(graph, source);
    } else {
        return;
    }
    heap.insert(source, |n| graph.vertex(n).map(|v| v.scratch.priority).unwrap_or(f64::INFINITY));

    while !heap.is_empty() {
        let u = heap
            .extract_min(|n| graph.vertex(n).map(|v| v.scratch.priority).unwrap_or(f64::INFINITY))
            .expect("heap reported non-empty");
        if early_exit && Some(u) == target {
            break;
        }
        let u_cost = graph.vertex(u).unwrap().scratch.cost;
        let edges: Vec<(EdgeId, NodeId)> = graph.active_out(u).collect();
        for (e, v) in edges {
            let newcost = u_cost + cost_of(graph, e);
            let v_path_set = graph.vertex(v).unwrap().scratch.path.is_some();
            if !v_path_set {
                let priority = newcost + extra(graph, v);
                let vv = graph.vertex_mut(v).unwrap();
                vv.scratch.cost = newcost;
                vv.scratch.priority = priority;
                vv.scratch.path = Some(u);
                heap.insert(v, |n| {
                    graph.vertex(n).map(|v| v.scratch.priority).unwrap_or(f64::INFINITY)
                });
            } else if newcost < graph.vertex(v).unwrap().scratch.cost {
                let priority = newcost + extra(graph, v);
                let vv = graph.vertex_mut(v).unwrap();
                vv.scratch.cost = newcost;
                vv.scratch.priority = priority;
                vv.scratch.path = Some(u);
                heap.decrease_key(v, |n| {
                    graph.vertex(n).map(|v| v.scratch.priority).unwrap_or(f64::INFINITY)
                })
                .expect("v was inserted above and not yet extracted");
            }
        }
    }
}

/// Dijkstra, late exit: priority is cumulative Euclidean cost from `source`.
/// Runs the heap dry even after `target` is popped, so it explores strictly
/// more of the graph than [`dijkstra_early`] while computing the identical
/// optimal cost to every reachable vertex, not just `target`.
pub fn dijkstra_late(graph: &mut Graph, source: NodeId) {
    dijkstra_like(
        graph,
        source,
        None,
        false,
        |g, e| g.edge(e).map(|edge| edge.length).unwrap_or(f64::INFINITY),
        |_, _| 0.0,
    );
}

/// Dijkstra, early exit: identical to [`dijkstra_late`] but stops the moment
/// `target` is extracted from the heap. Optimal because Euclidean edge
/// lengths are never negative.
pub fn dijkstra_early(graph: &mut Graph, source: NodeId, target: NodeId) {
    dijkstra_like(
        graph,
        source,
        Some(target),
        true,
        |g, e| g.edge(e).map(|edge| edge.length).unwrap_or(f64::INFINITY),
        |_, _| 0.0,
    );
}

/// A*: identical skeleton to [`dijkstra_early`], but the heap priority adds
/// the straight-line distance from the candidate vertex to `target`. That
/// heuristic never overestimates the true remaining cost (it *is* the true
/// cost of the direct, unobstructed edge), so A* remains optimal while
/// typically expanding far fewer vertices than Dijkstra.
pub fn astar(graph: &mut Graph, source: NodeId, target: NodeId) {
    dijkstra_like(
        graph,
        source,
        Some(target),
        true,
        |g, e| g.edge(e).map(|edge| edge.length).unwrap_or(f64::INFINITY),
        move |g, v| g.distance(v, target),
    );
}

/// Dijkstra over `edge.weight` instead of Euclidean length: otherwise
/// identical to [`dijkstra_early`]. Used by the simulation driver, whose
/// weights drift via [`crate::core::graph::Graph::regenerate`].
pub fn dijkstra_by_weight(graph: &mut Graph, source: NodeId, target: NodeId) {
    dijkstra_like(
        graph,
        source,
        Some(target),
        true,
        |g, e| g.edge(e).map(|edge| edge.weight).unwrap_or(f64::INFINITY),
        |_, _| 0.0,
    );
}

/// Total Euclidean length of a vertex sequence as traced by consecutive
/// active edges, used to compare planner outputs (e.g. A* vs GBFS).
pub fn path_cost(graph: &Graph, path: &[NodeId]) -> f64 {
    path.windows(2).map(|w| graph.distance(w[0], w[1])).sum()
}
