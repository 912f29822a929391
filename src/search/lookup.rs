/*!
# Road Lookup

Three wrappers that reduce a choice of string-matching algorithm to road
selection over [`crate::core::graph::Graph`]: exact substring search, plain
edit distance, and fuzzy (Sellers) substring distance. Each returns every
road tied for best under the chosen metric, since which one the caller wants
when several tie is a driver decision, not this library's.
*/

use crate::core::graph::{Graph, RoadId};

/// Every road whose name contains at least one occurrence of `pattern`,
/// using whatever exact matcher `matcher` wraps (naive, a Boyer–Moore
/// variant, or KMP — they all agree on the occurrence list, see
/// [`crate::search::exact`]'s tests).
pub fn exact_match(graph: &Graph, matcher: impl Fn(&[u8], &[u8]) -> Vec<usize>, pattern: &[u8]) -> Vec<RoadId> {
    graph
        .roads()
        .filter(|road| !matcher(road.name.as_bytes(), pattern).is_empty())
        .map(|road| road.id)
        .collect()
    // Note: `matcher(text, pattern)` — the exact-matcher signature takes
    // `text` first, `pattern` second, consistent with `crate::search::exact`.
}

/// Every road minimizing `distance(road.name, query)` under an edit-distance
/// metric; ties are all returned rather than arbitrarily broken.
pub fn distance_lookup(
    graph: &Graph,
    distance: impl Fn(&[u8], &[u8]) -> u64,
    query: &[u8],
) -> Vec<RoadId> {
    best_by_score(graph, |road| distance(road.name.as_bytes(), query))
}

/// Every road minimizing the Sellers fuzzy distance of `query` to any
/// substring of `road.name`.
pub fn fuzzy_lookup(graph: &Graph, fuzzy: impl Fn(&[u8], &[u8]) -> u64, query: &[u8]) -> Vec<RoadId> {
    best_by_score(graph, |road| fuzzy(query, road.name.as_bytes()))
}

fn best_by_score(graph: &Graph, score: impl Fn(&crate::core::graph::Road) -> u64) -> Vec<RoadId> {
    let mut best: Option<u64> = None;
    let mut winners = Vec::new();
    for road in graph.roads() {
        let s = score(road);
        match best {
            None => {
                best = Some(s);
                winners = vec![road.id];
            }
            Some(b) if s < b => {
                best = Some(s);
                winners = vec![road.id];
            }
            Some(b) if s == b => {
                winners.push(road.id);
            }
            _ => {}
        }
    }
    winners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{Graph, RoadId, VertexId};
    use crate::search::edit_distance::levenshtein_matrix;
    use crate::search::exact::kmp_search;
    use crate::search::fuzzy::fuzzy_levenshtein_matrix;

    fn road_graph() -> Graph {
        let mut g = Graph::new(1000, 1000, 1.0);
        let a = g.add_vertex(VertexId(1), 0, 0).unwrap();
        let b = g.add_vertex(VertexId(2), 10, 0).unwrap();
        let r1 = g.add_road(RoadId(1), "Rua do Sol", false);
        let r2 = g.add_road(RoadId(2), "Rua do Mar", false);
        let r3 = g.add_road(RoadId(3), "Avenida Central", false);
        g.add_edge(a, b, r1);
        g.add_edge(a, b, r2);
        g.add_edge(a, b, r3);
        g
    }

    #[test]
    fn exact_match_finds_roads_containing_pattern() {
        let g = road_graph();
        let mut hits = exact_match(&g, kmp_search, b"Rua");
        hits.sort_by_key(|r| r.0);
        assert_eq!(hits, vec![RoadId(1), RoadId(2)]);
    }

    #[test]
    fn exact_match_is_empty_match_when_nothing_hits() {
        let g = road_graph();
        assert!(exact_match(&g, kmp_search, b"Nonexistent").is_empty());
    }

    #[test]
    fn distance_lookup_picks_the_single_closest_name() {
        let g = road_graph();
        let hits = distance_lookup(&g, |a, b| levenshtein_matrix(a, b) as u64, b"Rua do Sal");
        assert_eq!(hits, vec![RoadId(1)]);
    }

    #[test]
    fn fuzzy_lookup_can_return_a_tie() {
        let mut g = Graph::new(1000, 1000, 1.0);
        let a = g.add_vertex(VertexId(1), 0, 0).unwrap();
        let b = g.add_vertex(VertexId(2), 10, 0).unwrap();
        let r1 = g.add_road(RoadId(1), "rua do sol", false);
        let r2 = g.add_road(RoadId(2), "rua do sel", false);
        g.add_edge(a, b, r1);
        g.add_edge(a, b, r2);

        let mut hits = fuzzy_lookup(&g, |p, t| fuzzy_levenshtein_matrix(p, t) as u64, b"rua do sul");
        hits.sort_by_key(|r| r.0);
        assert_eq!(hits, vec![RoadId(1), RoadId(2)]);
    }
}
