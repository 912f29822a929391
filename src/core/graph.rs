/*!
# Graph Model

The road network: vertices positioned on a 2-D canvas, directed edges between
them grouped into named roads, and the "accident" state machine that suspends a
vertex or edge from the topology the planners see without ever deleting it.

Ownership is tree-structured and arena-based: the [`Graph`] owns every
[`Vertex`], [`Edge`] and [`Road`] by id; nothing here holds a raw pointer to
anything else, so there is no destructor-order hazard and no reference cycle to
break by hand. Vertices and edges refer to each other only through the
[`NodeId`]/[`EdgeId`] handles a [`Graph`] hands out; those handles are
meaningless once the graph that produced them is dropped, same as iterators
outliving their collection.
*/

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rand::Rng;

use crate::core::error::{Result, RoadscribeError};
use crate::core::viewer::{NullViewer, Viewer};

/// Handle to a vertex, valid only for the [`Graph`] that produced it.
pub type NodeId = petgraph::stable_graph::NodeIndex<u32>;
/// Handle to an edge, valid only for the [`Graph`] that produced it.
pub type EdgeId = petgraph::stable_graph::EdgeIndex<u32>;

/// The stable, user/loader-assigned identifier of a vertex, distinct from the
/// internal [`NodeId`] handle petgraph hands out when the vertex is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub i64);

/// The stable, user/loader-assigned identifier of a road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadId(pub i64);

/// Scratch fields written by exactly one planner run at a time (see
/// [`Graph::clear`]). Never touched by topology-mutating operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scratch {
    /// Back-pointer toward the source, walked by the path reconstructor.
    pub path: Option<NodeId>,
    /// Accumulated cost from the source.
    pub cost: f64,
    /// Heap key; smaller is expanded first.
    pub priority: f64,
}

/// A vertex: a point on the canvas with incident edges split into the active
/// and accident-suspended sets described in the module docs.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub x: i32,
    pub y: i32,
    accidented: bool,
    out: HashSet<EdgeId>,
    inn: HashSet<EdgeId>,
    acc_out: HashSet<EdgeId>,
    acc_in: HashSet<EdgeId>,
    pub scratch: Scratch,
}

impl Vertex {
    pub fn is_accidented(&self) -> bool {
        self.accidented
    }

    pub fn is_clear(&self) -> bool {
        !self.accidented
    }

    /// Active outgoing edges: the only ones a planner may step through.
    pub fn out(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.out.iter().copied()
    }

    pub fn in_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.inn.iter().copied()
    }

    pub fn out_degree(&self) -> usize {
        self.out.len()
    }

    pub fn in_degree(&self) -> usize {
        self.inn.len()
    }
}

/// A directed edge belonging to exactly one [`Road`], as either its `forward`
/// or `backward` entry.
#[derive(Debug, Clone)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub road: RoadId,
    accidented: bool,
    /// Mutable cost used by Dijkstra-by-weight and perturbed by [`Graph::regenerate`].
    pub weight: f64,
    /// `scale * hypot(dx, dy)` between the endpoints at insertion time; constant.
    pub length: f64,
}

impl Edge {
    pub fn is_accidented(&self) -> bool {
        self.accidented
    }

    pub fn is_clear(&self) -> bool {
        !self.accidented
    }
}

/// A named, ordered sequence of directed edges sharing a logical identity.
#[derive(Debug, Clone)]
pub struct Road {
    pub id: RoadId,
    pub name: String,
    pub bothways: bool,
    /// Edges tracing the road start to end, `forward[i].target == forward[i+1].source`.
    pub forward: Vec<EdgeId>,
    /// Mirror of `forward` when `bothways`; empty otherwise.
    pub backward: Vec<EdgeId>,
}

impl Road {
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Total Euclidean length of the forward trace.
    pub fn total_length(&self, graph: &Graph) -> f64 {
        self.forward
            .iter()
            .filter_map(|e| graph.edge(*e))
            .map(|e| e.length)
            .sum()
    }

    /// A road is clear forward iff every forward edge is clear.
    pub fn is_clear(&self, graph: &Graph) -> bool {
        self.forward
            .iter()
            .filter_map(|e| graph.edge(*e))
            .all(|e| e.is_clear())
    }

    pub fn is_accidented(&self, graph: &Graph) -> bool {
        !self.is_clear(graph)
    }

    pub fn start_vertex(&self, graph: &Graph) -> Option<NodeId> {
        self.forward.first().and_then(|e| graph.edge(*e)).map(|e| e.source)
    }

    pub fn end_vertex(&self, graph: &Graph) -> Option<NodeId> {
        self.forward.last().and_then(|e| graph.edge(*e)).map(|e| e.target)
    }
}

/// Owns every vertex, edge and road; the sole source of Euclidean distance.
pub struct Graph {
    inner: StableDiGraph<Vertex, Edge>,
    id_to_node: HashMap<VertexId, NodeId>,
    roads: HashMap<RoadId, Road>,
    pub width: i32,
    pub height: i32,
    /// Meters per canvas unit; multiplies every Euclidean distance.
    pub scale: f64,
    viewer: Box<dyn Viewer>,
    modified_vertices: HashSet<NodeId>,
    modified_edges: HashSet<EdgeId>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(1000, 1000, 1.0)
    }
}

impl Graph {
    pub fn new(width: i32, height: i32, scale: f64) -> Self {
        Graph {
            inner: StableDiGraph::new(),
            id_to_node: HashMap::new(),
            roads: HashMap::new(),
            width,
            height,
            scale,
            viewer: Box::new(NullViewer),
            modified_vertices: HashSet::new(),
            modified_edges: HashSet::new(),
        }
    }

    pub fn with_viewer(mut self, viewer: Box<dyn Viewer>) -> Self {
        self.viewer = viewer;
        self
    }

    fn within_bounds(&self, x: i32, y: i32) -> bool {
        (0..=self.width).contains(&x) && (0..=self.height).contains(&y)
    }

    /// Adds a vertex, failing if its coordinates fall outside the canvas or
    /// `id` is already in use.
    pub fn add_vertex(&mut self, id: VertexId, x: i32, y: i32) -> Result<NodeId> {
        if !self.within_bounds(x, y) {
            return Err(RoadscribeError::out_of_bounds(format!(
                "vertex {:?} at ({x}, {y}) falls outside the [0..{}] x [0..{}] canvas",
                id, self.width, self.height
            )));
        }
        if self.id_to_node.contains_key(&id) {
            return Err(RoadscribeError::out_of_bounds(format!(
                "vertex id {:?} already exists",
                id
            )));
        }

        let node = self.inner.add_node(Vertex {
            id,
            x,
            y,
            accidented: false,
            out: HashSet::new(),
            inn: HashSet::new(),
            acc_out: HashSet::new(),
            acc_in: HashSet::new(),
            scratch: Scratch::default(),
        });
        self.id_to_node.insert(id, node);
        self.viewer.add_node(id.0 as u64, x, y);
        Ok(node)
    }

    /// Euclidean distance between two vertices, scaled to meters.
    pub fn distance(&self, u: NodeId, v: NodeId) -> f64 {
        let (ux, uy) = self.inner[u].x_y();
        let (vx, vy) = self.inner[v].x_y();
        self.scale * (((ux - vx).pow(2) + (uy - vy).pow(2)) as f64).sqrt()
    }

    /// Links `source -> target` into a new edge belonging to `road`, registers
    /// it with the viewer and returns its handle.
    ///
    /// If `source` or `target` is already accidented (e.g. a snapshot is
    /// being rebuilt vertex-accidents-first, edges-second), the edge is
    /// inserted directly into that endpoint's suspended set rather than its
    /// active one, preserving the invariant that an accidented vertex's
    /// incident edges never appear in `out`/`in`.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, road: RoadId) -> EdgeId {
        let length = self.distance(source, target);
        let edge = self.inner.add_edge(
            source,
            target,
            Edge {
                source,
                target,
                road,
                accidented: false,
                weight: length,
                length,
            },
        );
        if self.inner[source].accidented {
            self.inner[source].acc_out.insert(edge);
        } else {
            self.inner[source].out.insert(edge);
        }
        if self.inner[target].accidented {
            self.inner[target].acc_in.insert(edge);
        } else {
            self.inner[target].inn.insert(edge);
        }
        self.viewer
            .add_edge(edge.index() as u64, source.index() as u64, target.index() as u64, true);
        edge
    }

    pub fn add_road(&mut self, id: RoadId, name: impl Into<String>, bothways: bool) -> RoadId {
        self.roads.insert(
            id,
            Road {
                id,
                name: name.into(),
                bothways,
                forward: Vec::new(),
                backward: Vec::new(),
            },
        );
        id
    }

    /// Appends `edge` to a road's forward (or backward) trace.
    pub fn road_add_edge(&mut self, road: RoadId, edge: EdgeId, forward: bool) -> Result<()> {
        let road = self
            .roads
            .get_mut(&road)
            .ok_or_else(|| RoadscribeError::not_found(format!("road {:?}", road)))?;
        if forward {
            road.forward.push(edge);
        } else {
            road.backward.push(edge);
        }
        Ok(())
    }

    pub fn get_vertex(&self, id: VertexId) -> Option<NodeId> {
        self.id_to_node.get(&id).copied()
    }

    pub fn vertex(&self, node: NodeId) -> Option<&Vertex> {
        self.inner.node_weight(node)
    }

    pub fn vertex_mut(&mut self, node: NodeId) -> Option<&mut Vertex> {
        self.inner.node_weight_mut(node)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.inner.edge_weight(id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.inner.edge_weight_mut(id)
    }

    /// The active (non-accidented) edge from `u` to `v`, scanning only `u`'s
    /// own adjacency sets as the original did, not the whole edge set.
    pub fn get_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.inner[u]
            .out
            .iter()
            .chain(self.inner[u].acc_out.iter())
            .find(|&&e| self.inner[e].target == v)
            .copied()
    }

    pub fn get_road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(&id)
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.inner.edge_indices()
    }

    /// Zeroes planner scratch fields across all vertices; never touches topology.
    pub fn clear(&mut self) {
        for node in self.inner.node_weights_mut() {
            node.scratch = Scratch::default();
        }
    }

    /// Resets every vertex/edge touched since the last reset to its baseline
    /// viewer style, then forgets the modified set. Idempotent.
    pub fn reset(&mut self) {
        for node in self.modified_vertices.drain() {
            self.viewer.set_vertex_color(node.index() as u64, "default");
        }
        for edge in self.modified_edges.drain() {
            self.viewer.set_edge_color(edge.index() as u64, "default");
        }
    }

    fn mark_vertex_modified(&mut self, node: NodeId, color: &str) {
        self.modified_vertices.insert(node);
        self.viewer.set_vertex_color(node.index() as u64, color);
    }

    fn mark_edge_modified(&mut self, edge: EdgeId, color: &str) {
        self.modified_edges.insert(edge);
        self.viewer.set_edge_color(edge.index() as u64, color);
    }

    pub fn select_vertex(&mut self, node: NodeId) {
        self.mark_vertex_modified(node, "selected");
    }

    /// `clear -> accidented`. No-op (returns false) if already accidented.
    ///
    /// A vertex accident is contagious: every edge incident on it is moved to
    /// its own accident-suspended set too, same as an explicit
    /// [`edge_accident`](Graph::edge_accident) on that edge, so the planner
    /// never observes an edge whose endpoint is logically absent.
    pub fn vertex_accident(&mut self, node: NodeId) -> bool {
        if self.inner[node].accidented {
            return false;
        }
        self.inner[node].accidented = true;
        let incident: Vec<EdgeId> = self.inner[node]
            .out
            .iter()
            .chain(self.inner[node].inn.iter())
            .copied()
            .collect();
        for e in incident {
            self.suspend_edge_adjacency(e);
        }
        self.mark_vertex_modified(node, "accidented");
        true
    }

    /// `accidented -> clear`. No-op (returns false) if already clear.
    ///
    /// Restores adjacency for every incident edge that was only suspended
    /// because of *this* vertex (an edge explicitly accidented on its own
    /// stays suspended).
    pub fn vertex_fix(&mut self, node: NodeId) -> bool {
        if !self.inner[node].accidented {
            return false;
        }
        self.inner[node].accidented = false;
        let incident: Vec<EdgeId> = self.inner[node]
            .acc_out
            .iter()
            .chain(self.inner[node].acc_in.iter())
            .copied()
            .collect();
        for e in incident {
            if !self.inner[e].accidented {
                self.restore_edge_adjacency(e);
            }
        }
        self.mark_vertex_modified(node, "default");
        true
    }

    fn suspend_edge_adjacency(&mut self, edge: EdgeId) {
        let (source, target) = (self.inner[edge].source, self.inner[edge].target);
        if self.inner[source].out.remove(&edge) {
            self.inner[source].acc_out.insert(edge);
        }
        if self.inner[target].inn.remove(&edge) {
            self.inner[target].acc_in.insert(edge);
        }
    }

    fn restore_edge_adjacency(&mut self, edge: EdgeId) {
        let (source, target) = (self.inner[edge].source, self.inner[edge].target);
        if !self.inner[source].accidented && self.inner[source].acc_out.remove(&edge) {
            self.inner[source].out.insert(edge);
        }
        if !self.inner[target].accidented && self.inner[target].acc_in.remove(&edge) {
            self.inner[target].inn.insert(edge);
        }
    }

    /// `clear -> accidented`: moves `edge` from the active to the suspended
    /// adjacency sets of both endpoints. No-op if already accidented.
    pub fn edge_accident(&mut self, edge: EdgeId) -> bool {
        if self.inner[edge].accidented {
            return false;
        }
        self.inner[edge].accidented = true;
        let (source, target) = (self.inner[edge].source, self.inner[edge].target);
        self.inner[source].out.remove(&edge);
        self.inner[source].acc_out.insert(edge);
        self.inner[target].inn.remove(&edge);
        self.inner[target].acc_in.insert(edge);
        self.mark_edge_modified(edge, "accidented");
        true
    }

    /// `accidented -> clear`: the inverse of [`edge_accident`](Graph::edge_accident).
    pub fn edge_fix(&mut self, edge: EdgeId) -> bool {
        if !self.inner[edge].accidented {
            return false;
        }
        self.inner[edge].accidented = false;
        let (source, target) = (self.inner[edge].source, self.inner[edge].target);
        self.inner[source].acc_out.remove(&edge);
        self.inner[source].out.insert(edge);
        self.inner[target].acc_in.remove(&edge);
        self.inner[target].inn.insert(edge);
        self.mark_edge_modified(edge, "default");
        true
    }

    /// Perturbs every edge's mutable weight by a bounded random walk within
    /// `[0, length(e))`, reproducing the source's literal (and, near the
    /// boundaries of `w`, slightly lossy) formula:
    /// `w' = ((rand mod w) - w/2 + w) mod length(e)`.
    ///
    /// Deterministic given `rng`'s seed. Edges whose current weight is `0`
    /// are left untouched: the source computes `fmod(rand(), 0)`, which is
    /// undefined, and we decline to guess at the intended behavior there
    /// rather than silently "fix" it (see design notes on this formula).
    pub fn regenerate(&mut self, rng: &mut impl rand::Rng) {
        let edges: Vec<EdgeId> = self.inner.edge_indices().collect();
        for e in edges {
            let (w, len) = {
                let edge = &self.inner[e];
                (edge.weight, edge.length)
            };
            if w <= 0.0 || len <= 0.0 {
                continue;
            }
            let r = rng.random::<u32>() as f64;
            let step = r % w;
            let candidate = step - w / 2.0 + w;
            self.inner[e].weight = candidate.rem_euclid(len);
        }
    }

    /// Active outgoing `(edge, target)` pairs, the only ones a planner may step through.
    pub fn active_out(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.inner[node]
            .out
            .iter()
            .map(move |&e| (e, self.inner[e].target))
    }

    /// All edges incident on `node` regardless of accident state, for diagnostics.
    pub fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.inner.edges_directed(node, Direction::Outgoing).map(|e| e.id())
    }
}

trait XY {
    fn x_y(&self) -> (i32, i32);
}

impl XY for Vertex {
    fn x_y(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn coin_graph() -> (Graph, NodeId, NodeId, NodeId) {
        let mut g = Graph::new(100, 100, 1.0);
        let a = g.add_vertex(VertexId(1), 0, 0).unwrap();
        let b = g.add_vertex(VertexId(2), 3, 4).unwrap();
        let c = g.add_vertex(VertexId(3), 6, 0).unwrap();
        let road = g.add_road(RoadId(1), "loop", true);
        g.add_edge(a, b, road);
        g.add_edge(b, c, road);
        g.add_edge(a, c, road);
        (g, a, b, c)
    }

    #[test]
    fn add_vertex_rejects_out_of_bounds() {
        let mut g = Graph::new(10, 10, 1.0);
        assert!(g.add_vertex(VertexId(1), 11, 0).is_err());
        assert!(g.add_vertex(VertexId(1), 0, 0).is_ok());
        assert!(g.add_vertex(VertexId(1), 1, 1).is_err(), "id collision");
    }

    #[test]
    fn distance_matches_scaled_hypot() {
        let (g, a, b, _c) = coin_graph();
        assert_eq!(g.distance(a, b), 5.0);
    }

    #[test]
    fn accident_symmetry_round_trips_adjacency() {
        let (mut g, a, b, _c) = coin_graph();
        let edge = g.get_edge(a, b).unwrap();

        let out_before: HashSet<_> = g.vertex(a).unwrap().out().collect();
        let in_before: HashSet<_> = g.vertex(b).unwrap().in_edges().collect();

        assert!(g.edge_accident(edge));
        assert!(g.edge_fix(edge));

        let out_after: HashSet<_> = g.vertex(a).unwrap().out().collect();
        let in_after: HashSet<_> = g.vertex(b).unwrap().in_edges().collect();

        assert_eq!(out_before, out_after);
        assert_eq!(in_before, in_after);
    }

    #[test]
    fn edge_accident_moves_between_active_and_suspended_sets() {
        let (mut g, a, b, _c) = coin_graph();
        let edge = g.get_edge(a, b).unwrap();

        assert!(g.vertex(a).unwrap().out().any(|e| e == edge));
        g.edge_accident(edge);
        assert!(!g.vertex(a).unwrap().out().any(|e| e == edge));
        assert!(!g.active_out(a).any(|(e, _)| e == edge));
    }

    #[test]
    fn clear_resets_scratch_but_not_topology() {
        let (mut g, a, b, _c) = coin_graph();
        g.vertex_mut(a).unwrap().scratch.cost = 42.0;
        g.clear();
        assert_eq!(g.vertex(a).unwrap().scratch.cost, 0.0);
        assert!(g.get_edge(a, b).is_some());
    }

    #[test]
    fn vertex_accident_suspends_incident_edges() {
        let (mut g, a, b, _c) = coin_graph();
        let edge = g.get_edge(a, b).unwrap();

        assert!(g.vertex_accident(a));
        assert!(!g.vertex(a).unwrap().out().any(|e| e == edge));
        assert!(!g.vertex(b).unwrap().in_edges().any(|e| e == edge));

        assert!(g.vertex_fix(a));
        assert!(g.vertex(a).unwrap().out().any(|e| e == edge));
        assert!(g.vertex(b).unwrap().in_edges().any(|e| e == edge));
    }

    #[test]
    fn vertex_accident_does_not_resurrect_explicitly_accidented_edge() {
        let (mut g, a, b, _c) = coin_graph();
        let edge = g.get_edge(a, b).unwrap();

        g.edge_accident(edge);
        g.vertex_accident(a);
        g.vertex_fix(a);

        assert!(!g.vertex(a).unwrap().out().any(|e| e == edge), "edge is still explicitly accidented");
    }

    #[test]
    fn add_edge_onto_an_already_accidented_vertex_lands_in_the_suspended_set() {
        let mut g = Graph::new(100, 100, 1.0);
        let a = g.add_vertex(VertexId(1), 0, 0).unwrap();
        let b = g.add_vertex(VertexId(2), 3, 4).unwrap();
        g.vertex_accident(a);
        let road = g.add_road(RoadId(1), "late", false);
        let edge = g.add_edge(a, b, road);

        assert!(!g.vertex(a).unwrap().out().any(|e| e == edge));
        assert!(!g.active_out(a).any(|(e, _)| e == edge));

        g.vertex_fix(a);
        assert!(g.vertex(a).unwrap().out().any(|e| e == edge));
    }

    #[test]
    fn regenerate_keeps_weight_within_length_when_nonzero() {
        let (mut g, a, b, _c) = coin_graph();
        let edge = g.get_edge(a, b).unwrap();
        let len = g.edge(edge).unwrap().length;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..50 {
            g.regenerate(&mut rng);
            let w = g.edge(edge).unwrap().weight;
            assert!(w >= 0.0 && w < len);
        }
    }
}
