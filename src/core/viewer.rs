/*!
# Viewer Interface

The path engine and the simulation driver are headless: they never decide how a
vertex or edge should be painted. Instead they call out to a small [`Viewer`]
trait whenever a vertex/edge is selected, marked accidented, or placed on a
reported path. A [`NullViewer`] answers every call with nothing, which is what
the test suite and any batch/offline use of this crate runs against.

No method on this trait returns a value the core consumes; the contract is
purely "notify and move on".
*/

/// Outbound notification sink for graph visualization.
///
/// Implementors may ignore any or all calls; the core never inspects what a
/// viewer does with them; it only guarantees it *will* call them, and at what
/// moments (see [`crate::core::graph::Graph::reset`]).
pub trait Viewer {
    /// A vertex was created at the given canvas coordinates.
    fn add_node(&mut self, id: u64, x: i32, y: i32) {
        let _ = (id, x, y);
    }

    /// A directed (or, if `directed` is false, bidirectional) edge was created.
    fn add_edge(&mut self, id: u64, source: u64, target: u64, directed: bool) {
        let _ = (id, source, target, directed);
    }

    fn set_vertex_color(&mut self, id: u64, color: &str) {
        let _ = (id, color);
    }

    fn set_vertex_size(&mut self, id: u64, size: f64) {
        let _ = (id, size);
    }

    fn set_vertex_label(&mut self, id: u64, label: &str) {
        let _ = (id, label);
    }

    fn set_edge_color(&mut self, id: u64, color: &str) {
        let _ = (id, color);
    }

    fn set_edge_thickness(&mut self, id: u64, thickness: f64) {
        let _ = (id, thickness);
    }

    fn set_edge_label(&mut self, id: u64, label: &str) {
        let _ = (id, label);
    }

    fn rearrange(&mut self) {}

    fn close_window(&mut self) {}

    fn set_background(&mut self, path: &str) {
        let _ = path;
    }

    fn define_edge_curved(&mut self, id: u64, curved: bool) {
        let _ = (id, curved);
    }
}

/// A [`Viewer`] that performs no observable action for any call.
///
/// Used for headless planning, simulation, and tests, and as the default
/// viewer a freshly constructed [`crate::core::graph::Graph`] opens with.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullViewer;

impl Viewer for NullViewer {}
