/*!
# Graph Serialization

JSON and binary (bincode) snapshots of a [`Graph`]'s topology: vertices,
edges and roads, plus the canvas geometry. Planner scratch fields are
intentionally excluded — the system has no persistence story for in-progress
planning (see the non-goals), only for the map itself, so a reload always
starts from a freshly [`Graph::clear`]-ed state.
*/

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::graph::{Graph, RoadId, VertexId};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializableVertex {
    id: i64,
    x: i32,
    y: i32,
    accidented: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializableRoad {
    id: i64,
    name: String,
    bothways: bool,
}

/// A flat, serializable snapshot of a [`Graph`]'s topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableGraph {
    width: i32,
    height: i32,
    scale: f64,
    vertices: Vec<SerializableVertex>,
    roads: Vec<SerializableRoad>,
    /// `(road_id, forward_or_backward, source_id, target_id, weight, accidented)`,
    /// in each road's original traversal order so re-loading reconstructs
    /// `road.forward`/`road.backward` identically.
    edges: Vec<(i64, bool, i64, i64, f64, bool)>,
}

impl SerializableGraph {
    pub fn from_graph(graph: &Graph) -> Self {
        let vertices = graph
            .node_ids()
            .map(|n| {
                let v = graph.vertex(n).expect("node id came from this graph");
                SerializableVertex { id: v.id.0, x: v.x, y: v.y, accidented: v.is_accidented() }
            })
            .collect();

        let mut roads = Vec::new();
        let mut edges = Vec::new();
        for road in graph.roads() {
            roads.push(SerializableRoad {
                id: road.id.0,
                name: road.name.clone(),
                bothways: road.bothways,
            });
            for &e in &road.forward {
                let edge = graph.edge(e).expect("edge id came from this graph's road");
                let src = graph.vertex(edge.source).unwrap().id.0;
                let tgt = graph.vertex(edge.target).unwrap().id.0;
                edges.push((road.id.0, true, src, tgt, edge.weight, edge.is_accidented()));
            }
            for &e in &road.backward {
                let edge = graph.edge(e).expect("edge id came from this graph's road");
                let src = graph.vertex(edge.source).unwrap().id.0;
                let tgt = graph.vertex(edge.target).unwrap().id.0;
                edges.push((road.id.0, false, src, tgt, edge.weight, edge.is_accidented()));
            }
        }

        SerializableGraph {
            width: graph.width,
            height: graph.height,
            scale: graph.scale,
            vertices,
            roads,
            edges,
        }
    }

    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::new(self.width, self.height, self.scale);
        for v in &self.vertices {
            let node = graph.add_vertex(VertexId(v.id), v.x, v.y)?;
            if v.accidented {
                graph.vertex_accident(node);
            }
        }
        for r in &self.roads {
            graph.add_road(RoadId(r.id), r.name.clone(), r.bothways);
        }
        for &(road_id, forward, src, tgt, weight, accidented) in &self.edges {
            let src = graph.get_vertex(VertexId(src)).ok_or_else(|| {
                crate::core::error::RoadscribeError::not_found(format!("vertex {src}"))
            })?;
            let tgt = graph.get_vertex(VertexId(tgt)).ok_or_else(|| {
                crate::core::error::RoadscribeError::not_found(format!("vertex {tgt}"))
            })?;
            let edge = graph.add_edge(src, tgt, RoadId(road_id));
            graph.edge_mut(edge).unwrap().weight = weight;
            if accidented {
                graph.edge_accident(edge);
            }
            graph.road_add_edge(RoadId(road_id), edge, forward)?;
        }
        Ok(graph)
    }
}

/// Saves `graph`'s topology as pretty-printed JSON.
pub fn save_json(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &SerializableGraph::from_graph(graph))?;
    Ok(())
}

/// Loads a graph topology previously written by [`save_json`].
pub fn load_json(path: impl AsRef<Path>) -> Result<Graph> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: SerializableGraph = serde_json::from_reader(reader)?;
    snapshot.into_graph()
}

/// Saves `graph`'s topology as a compact bincode blob.
pub fn save_binary(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, &SerializableGraph::from_graph(graph))?;
    Ok(())
}

/// Loads a graph topology previously written by [`save_binary`].
pub fn load_binary(path: impl AsRef<Path>) -> Result<Graph> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: SerializableGraph = bincode::deserialize_from(reader)?;
    snapshot.into_graph()
}
