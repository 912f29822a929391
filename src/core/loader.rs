/*!
# Map Loader

Reads the four-file map format described in the project's external
interfaces: a `<prefix>_meta.txt`, `<prefix>_nodes.txt`, `<prefix>_roads.txt`
and `<prefix>_subroads.txt`, and assembles a [`Graph`] from them. This module
only ingests the *shape* of that data; it is not a general-purpose GIS
importer, and any field the core has no use for (`boundaries`, `background`,
`straightedges`, the trailing free-form columns on a node line) is parsed far
enough to validate the line and then discarded.

Geographic coordinates are projected linearly onto a `[0, width] x [0,
height]` canvas; north is up, so latitude increases as the projected `y`
decreases. Canvas dimensions, when not given explicitly in the meta file, are
derived from the longitude/latitude spans and the requested node density (see
[`derive_canvas`]).
*/

use std::f64::consts::PI;
use std::path::Path;

use crate::core::error::{Result, RoadscribeError};
use crate::core::graph::{Graph, NodeId, RoadId, VertexId};

const KM_PER_DEGREE_LATITUDE: f64 = 110.574;
const KM_PER_DEGREE_LONGITUDE_AT_EQUATOR: f64 = 111.320;
const DEFAULT_DENSITY: f64 = 0.0001;

/// Parsed `<prefix>_meta.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMeta {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub boundaries: Option<String>,
    pub background: Option<String>,
    pub oneway: bool,
    pub bothways: bool,
    pub straightedges: bool,
}

fn parse_bool_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

/// Parses `key=value` pairs terminated by `;` or `,`.
pub fn parse_meta(text: &str) -> Result<MapMeta> {
    let mut min_longitude = None;
    let mut max_longitude = None;
    let mut min_latitude = None;
    let mut max_latitude = None;
    let mut nodes = None;
    let mut edges = None;
    let mut density = DEFAULT_DENSITY;
    let mut width = None;
    let mut height = None;
    let mut boundaries = None;
    let mut background = None;
    let mut oneway = false;
    let mut bothways = false;
    let mut straightedges = false;

    for token in text.split([';', ',', '\n']) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let Some((key, value)) = token.split_once('=') else {
            return Err(RoadscribeError::parse(format!(
                "malformed meta entry (expected key=value): {token:?}"
            )));
        };
        let key = key.trim();
        let value = value.trim();
        let parse_f64 = |v: &str| -> Result<f64> {
            v.parse::<f64>()
                .map_err(|e| RoadscribeError::parse(format!("meta field {key}={v:?}: {e}")))
        };
        let parse_usize = |v: &str| -> Result<usize> {
            v.parse::<usize>()
                .map_err(|e| RoadscribeError::parse(format!("meta field {key}={v:?}: {e}")))
        };
        match key {
            "min_longitude" => min_longitude = Some(parse_f64(value)?),
            "max_longitude" => max_longitude = Some(parse_f64(value)?),
            "min_latitude" => min_latitude = Some(parse_f64(value)?),
            "max_latitude" => max_latitude = Some(parse_f64(value)?),
            "nodes" => nodes = Some(parse_usize(value)?),
            "edges" => edges = Some(parse_usize(value)?),
            "density" => density = parse_f64(value)?,
            "width" => width = Some(parse_f64(value)? as i32),
            "height" => height = Some(parse_f64(value)? as i32),
            "boundaries" => boundaries = Some(value.to_string()),
            "background" => background = Some(value.to_string()),
            "oneway" => oneway = parse_bool_flag(value),
            "bothways" => bothways = parse_bool_flag(value),
            "straightedges" => straightedges = parse_bool_flag(value),
            other => {
                return Err(RoadscribeError::parse(format!("unknown meta key {other:?}")));
            }
        }
    }

    Ok(MapMeta {
        min_longitude: min_longitude
            .ok_or_else(|| RoadscribeError::parse("meta missing min_longitude"))?,
        max_longitude: max_longitude
            .ok_or_else(|| RoadscribeError::parse("meta missing max_longitude"))?,
        min_latitude: min_latitude
            .ok_or_else(|| RoadscribeError::parse("meta missing min_latitude"))?,
        max_latitude: max_latitude
            .ok_or_else(|| RoadscribeError::parse("meta missing max_latitude"))?,
        nodes: nodes.ok_or_else(|| RoadscribeError::parse("meta missing nodes"))?,
        edges: edges.ok_or_else(|| RoadscribeError::parse("meta missing edges"))?,
        density,
        width,
        height,
        boundaries,
        background,
        oneway,
        bothways,
        straightedges,
    })
}

/// Canvas dimensions (pixels) and scale (meters per pixel) derived from the
/// meta file.
///
/// When `width`/`height` are given explicitly they are used verbatim and the
/// scale is back-derived from the latitude span alone (the axis that maps
/// most directly to meters via [`KM_PER_DEGREE_LATITUDE`]).
///
/// Otherwise: the longitude/latitude spans are converted to kilometers using
/// the standard `110.574 km/deg lat` and `111.320 * cos(mean_lat) km/deg
/// long` approximations, and a canvas is sized so that its pixel area
/// matches `nodes / density` while preserving the spans' aspect ratio. This
/// is a deliberate resolution of an open question the distillation left
/// unspecified (see `DESIGN.md`); it keeps both axes at the same
/// meters-per-pixel scale rather than distorting the projection.
pub fn derive_canvas(meta: &MapMeta) -> (i32, i32, f64) {
    let mean_lat_rad = (meta.min_latitude + meta.max_latitude) / 2.0 * PI / 180.0;
    let lat_span_km = (meta.max_latitude - meta.min_latitude).abs() * KM_PER_DEGREE_LATITUDE;
    let long_span_km = (meta.max_longitude - meta.min_longitude).abs()
        * KM_PER_DEGREE_LONGITUDE_AT_EQUATOR
        * mean_lat_rad.cos().abs();

    if let (Some(width), Some(height)) = (meta.width, meta.height) {
        let scale = if height > 0 {
            (lat_span_km * 1000.0) / height as f64
        } else {
            1.0
        };
        return (width, height, scale.max(f64::MIN_POSITIVE));
    }

    let lat_span_km = lat_span_km.max(1e-9);
    let long_span_km = long_span_km.max(1e-9);
    let aspect = long_span_km / lat_span_km;
    let target_area_px = (meta.nodes as f64 / meta.density).max(1.0);
    let height_px = (target_area_px / aspect).sqrt().max(1.0);
    let width_px = (aspect * height_px).max(1.0);

    let scale = (lat_span_km * 1000.0) / height_px;
    (width_px.round() as i32, height_px.round() as i32, scale)
}

/// A node line: `id;lat;long` with any further columns ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawNode {
    pub id: VertexId,
    pub latitude: f64,
    pub longitude: f64,
}

pub fn parse_nodes(text: &str) -> Result<Vec<RawNode>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 3 {
            return Err(RoadscribeError::parse(format!(
                "nodes line {}: expected at least id;lat;long, got {:?}",
                lineno + 1,
                line
            )));
        }
        let id: i64 = fields[0].trim().parse().map_err(|e| {
            RoadscribeError::parse(format!("nodes line {}: bad id: {e}", lineno + 1))
        })?;
        let latitude: f64 = fields[1].trim().parse().map_err(|e| {
            RoadscribeError::parse(format!("nodes line {}: bad latitude: {e}", lineno + 1))
        })?;
        let longitude: f64 = fields[2].trim().parse().map_err(|e| {
            RoadscribeError::parse(format!("nodes line {}: bad longitude: {e}", lineno + 1))
        })?;
        out.push(RawNode { id: VertexId(id), latitude, longitude });
    }
    Ok(out)
}

/// A road line: `id;name;bothways`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoad {
    pub id: RoadId,
    pub name: String,
    pub bothways: bool,
}

pub fn parse_roads(text: &str) -> Result<Vec<RawRoad>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.splitn(3, ';').collect();
        if fields.len() != 3 {
            return Err(RoadscribeError::parse(format!(
                "roads line {}: expected id;name;bothways, got {:?}",
                lineno + 1,
                line
            )));
        }
        let id: i64 = fields[0].trim().parse().map_err(|e| {
            RoadscribeError::parse(format!("roads line {}: bad id: {e}", lineno + 1))
        })?;
        out.push(RawRoad {
            id: RoadId(id),
            name: fields[1].trim().to_string(),
            bothways: parse_bool_flag(fields[2]),
        });
    }
    Ok(out)
}

/// A subroad (edge) line: `road_id;from_vertex_id;to_vertex_id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSubroad {
    pub road_id: RoadId,
    pub from: VertexId,
    pub to: VertexId,
}

pub fn parse_subroads(text: &str) -> Result<Vec<RawSubroad>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() != 3 {
            return Err(RoadscribeError::parse(format!(
                "subroads line {}: expected road_id;from;to, got {:?}",
                lineno + 1,
                line
            )));
        }
        let parse_id = |v: &str| -> Result<i64> {
            v.trim()
                .parse()
                .map_err(|e| RoadscribeError::parse(format!("subroads line {}: {e}", lineno + 1)))
        };
        out.push(RawSubroad {
            road_id: RoadId(parse_id(fields[0])?),
            from: VertexId(parse_id(fields[1])?),
            to: VertexId(parse_id(fields[2])?),
        });
    }
    Ok(out)
}

/// Projects `(latitude, longitude)` linearly onto `[0, width] x [0, height]`,
/// north-up (higher latitude maps to a smaller `y`).
fn project(meta: &MapMeta, width: i32, height: i32, lat: f64, long: f64) -> (i32, i32) {
    let long_span = (meta.max_longitude - meta.min_longitude).max(1e-12);
    let lat_span = (meta.max_latitude - meta.min_latitude).max(1e-12);
    let x = ((long - meta.min_longitude) / long_span * width as f64).round() as i32;
    let y = ((meta.max_latitude - lat) / lat_span * height as f64).round() as i32;
    (x.clamp(0, width), y.clamp(0, height))
}

/// Assembles a [`Graph`] from the four already-read map files.
///
/// `meta.oneway`/`meta.bothways`, when set, override every road's own
/// `bothways` column (oneway wins if both are somehow set).
pub fn load_map(
    meta_text: &str,
    nodes_text: &str,
    roads_text: &str,
    subroads_text: &str,
) -> Result<Graph> {
    let meta = parse_meta(meta_text)?;
    let (width, height, scale) = derive_canvas(&meta);
    let mut graph = Graph::new(width, height, scale);

    let mut id_to_node = std::collections::HashMap::new();
    for raw in parse_nodes(nodes_text)? {
        let (x, y) = project(&meta, width, height, raw.latitude, raw.longitude);
        let node = graph.add_vertex(raw.id, x, y)?;
        id_to_node.insert(raw.id, node);
    }

    let mut road_info = std::collections::HashMap::new();
    for raw in parse_roads(roads_text)? {
        let bothways = if meta.oneway {
            false
        } else if meta.bothways {
            true
        } else {
            raw.bothways
        };
        graph.add_road(raw.id, raw.name, bothways);
        road_info.insert(raw.id, bothways);
    }

    for raw in parse_subroads(subroads_text)? {
        let bothways = *road_info
            .get(&raw.road_id)
            .ok_or_else(|| RoadscribeError::not_found(format!("road {:?}", raw.road_id)))?;
        let from: NodeId = *id_to_node
            .get(&raw.from)
            .ok_or_else(|| RoadscribeError::not_found(format!("vertex {:?}", raw.from)))?;
        let to: NodeId = *id_to_node
            .get(&raw.to)
            .ok_or_else(|| RoadscribeError::not_found(format!("vertex {:?}", raw.to)))?;

        let forward_edge = graph.add_edge(from, to, raw.road_id);
        graph.road_add_edge(raw.road_id, forward_edge, true)?;

        if bothways {
            let backward_edge = graph.add_edge(to, from, raw.road_id);
            graph.road_add_edge(raw.road_id, backward_edge, false)?;
        }
    }

    Ok(graph)
}

/// Reads `<prefix>_meta.txt`, `<prefix>_nodes.txt`, `<prefix>_roads.txt` and
/// `<prefix>_subroads.txt` from disk and assembles a [`Graph`].
pub fn load_map_files(prefix: impl AsRef<Path>) -> Result<Graph> {
    let prefix = prefix.as_ref();
    let read = |suffix: &str| -> Result<String> {
        let mut path = prefix.as_os_str().to_owned();
        path.push(suffix);
        std::fs::read_to_string(Path::new(&path)).map_err(RoadscribeError::from)
    };
    let meta_text = read("_meta.txt")?;
    let nodes_text = read("_nodes.txt")?;
    let roads_text = read("_roads.txt")?;
    let subroads_text = read("_subroads.txt")?;
    load_map(&meta_text, &nodes_text, &roads_text, &subroads_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = "min_longitude=0.0;max_longitude=1.0;min_latitude=0.0;max_latitude=1.0;nodes=3;edges=2;width=100;height=100;";
    const NODES: &str = "1;0.0;0.0\n2;1.0;1.0\n3;0.0;1.0\n";
    const ROADS: &str = "1;Rua do Sol;false\n";
    const SUBROADS: &str = "1;1;2\n1;2;3\n";

    #[test]
    fn parse_meta_reads_mandatory_and_optional_fields() {
        let meta = parse_meta(META).unwrap();
        assert_eq!(meta.nodes, 3);
        assert_eq!(meta.width, Some(100));
        assert_eq!(meta.density, DEFAULT_DENSITY);
    }

    #[test]
    fn parse_meta_rejects_unknown_key() {
        assert!(parse_meta("bogus=1;").is_err());
    }

    #[test]
    fn load_map_builds_connected_graph() {
        let graph = load_map(META, NODES, ROADS, SUBROADS).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let road = graph.get_road(RoadId(1)).unwrap();
        assert_eq!(road.forward.len(), 2);
        assert!(road.backward.is_empty());
    }

    #[test]
    fn bothways_road_gets_a_backward_trace() {
        let roads = "1;Avenida Central;true\n";
        let graph = load_map(META, NODES, roads, SUBROADS).unwrap();
        let road = graph.get_road(RoadId(1)).unwrap();
        assert_eq!(road.forward.len(), 2);
        assert_eq!(road.backward.len(), 2);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn meta_oneway_overrides_per_road_bothways() {
        let meta = "min_longitude=0.0;max_longitude=1.0;min_latitude=0.0;max_latitude=1.0;nodes=3;edges=2;width=100;height=100;oneway=true;";
        let roads = "1;Avenida Central;true\n";
        let graph = load_map(meta, NODES, roads, SUBROADS).unwrap();
        let road = graph.get_road(RoadId(1)).unwrap();
        assert!(road.backward.is_empty());
    }

    #[test]
    fn derive_canvas_without_explicit_dims_is_positive_and_square_ish() {
        let meta = parse_meta(
            "min_longitude=0.0;max_longitude=0.1;min_latitude=0.0;max_latitude=0.1;nodes=1000;edges=1000;",
        )
        .unwrap();
        let (width, height, scale) = derive_canvas(&meta);
        assert!(width > 0 && height > 0);
        assert!(scale > 0.0);
    }

    #[test]
    fn malformed_subroads_line_is_a_parse_error() {
        assert!(load_map(META, NODES, ROADS, "1;1\n").is_err());
    }
}
