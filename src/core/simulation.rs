/*!
# Simulation Driver

Two re-planning loops that consume the path engine under continuously
drifting edge weights: a driver that commits to one hop at a time
([`edge_step`]), and one that commits a whole road at a time
([`road_step`]). Both terminate when `source == target` or the caller's
`continue_fn` callback declines to continue, modeling the menu-driven
"press enter to keep going" loop of the original CLI without tying this
crate to any particular I/O.
*/

use crate::core::error::{Result, RoadscribeError};
use crate::core::graph::{Graph, NodeId};
use crate::core::paths::{dijkstra_by_weight, get_path};

/// One step of a re-planned drive: the new source after advancing, and the
/// full plan that step was taken from (for the caller to display).
#[derive(Debug, Clone)]
pub struct SimulationStep {
    pub plan: Vec<NodeId>,
    pub source: NodeId,
}

/// Re-plans with [`dijkstra_by_weight`] after every single hop.
///
/// Each iteration: plan source -> target; if unreachable, report and stop;
/// otherwise advance `source` to `plan[1]`, hand the step to `on_step`, and
/// if it returns `true`, regenerate every edge weight and loop. Stops
/// immediately (without regenerating) once `source == target`.
pub fn edge_step(
    graph: &mut Graph,
    mut source: NodeId,
    target: NodeId,
    rng: &mut impl rand::Rng,
    mut on_step: impl FnMut(&SimulationStep) -> bool,
) -> Result<Vec<SimulationStep>> {
    let mut steps = Vec::new();
    while source != target {
        graph.clear();
        dijkstra_by_weight(graph, source, target);
        let plan = get_path(graph, source, target);
        if plan.len() < 2 {
            return Err(RoadscribeError::unreachable(format!(
                "no weighted path from {:?} to {:?}",
                source, target
            )));
        }
        let next = plan[1];
        let step = SimulationStep { plan, source: next };
        let keep_going = on_step(&step);
        steps.push(step);
        source = next;
        if source == target || !keep_going {
            break;
        }
        graph.regenerate(rng);
    }
    Ok(steps)
}

/// Re-plans one road at a time: advances `source` to the vertex where the
/// current plan first changes roads (the *transition vertex*), or straight to
/// `target` if the whole remaining plan lies on a single road.
pub fn road_step(
    graph: &mut Graph,
    mut source: NodeId,
    target: NodeId,
    rng: &mut impl rand::Rng,
    mut on_step: impl FnMut(&SimulationStep) -> bool,
) -> Result<Vec<SimulationStep>> {
    let mut steps = Vec::new();
    while source != target {
        graph.clear();
        dijkstra_by_weight(graph, source, target);
        let plan = get_path(graph, source, target);
        if plan.len() < 2 {
            return Err(RoadscribeError::unreachable(format!(
                "no weighted path from {:?} to {:?}",
                source, target
            )));
        }
        let transition = transition_vertex(graph, &plan).unwrap_or(target);
        let step = SimulationStep { plan, source: transition };
        let keep_going = on_step(&step);
        steps.push(step);
        source = transition;
        if source == target || !keep_going {
            break;
        }
        graph.regenerate(rng);
    }
    Ok(steps)
}

/// The vertex at which `plan`'s road changes from the first edge's road,
/// or `None` if the entire plan is traced by a single road.
fn transition_vertex(graph: &Graph, plan: &[NodeId]) -> Option<NodeId> {
    if plan.len() < 2 {
        return None;
    }
    let first_edge = graph.get_edge(plan[0], plan[1])?;
    let first_road = graph.edge(first_edge)?.road;
    for window in plan.windows(2).skip(1) {
        let e = graph.get_edge(window[0], window[1])?;
        let road = graph.edge(e)?.road;
        if road != first_road {
            return Some(window[0]);
        }
    }
    None
}
