use crate::data::graph_ir::NodeId;
use crate::graph::Graph;
use crate::util::progress_logger::{ProgressLogger, ProgressSession};

/// Outcome of reducing one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// Nothing learned; the node and its recorded state are unchanged.
    NoChange,
    /// The information recorded at the node changed; its users must be
    /// revisited.
    Changed(NodeId),
    /// The node is semantically redundant; all of its uses are to be
    /// redirected to the given value and the node killed.
    Replace(NodeId),
}

pub trait Reducer {
    fn reduce(&mut self, graph: &mut Graph, node: NodeId) -> Reduction;
}

/// Drive `reducer` over every live node, in id order, until a full sweep
/// makes no progress. Replacements are applied as they are discovered:
/// value and effect edges of a replaced node are rewired by the reducer
/// itself (via `Graph::replace_with_value`) or, failing that, all edges
/// are redirected to the replacement value here. Returns the list of
/// `(replaced, replacement)` pairs in application order.
///
/// Termination: recorded states only move down the fact-subset lattice at
/// confluence points and each replacement strictly shrinks the live graph,
/// so only finitely many sweeps can report progress.
pub fn run_to_fixed_point<R: Reducer, P: ProgressLogger>(
    graph: &mut Graph,
    reducer: &mut R,
    progress: P,
) -> Vec<(NodeId, NodeId)> {
    let mut session = progress.start_session(graph.node_count());
    let mut replacements = Vec::new();
    let mut rounds = 0;
    loop {
        rounds += 1;
        let mut reduced = 0;
        let node_count = graph.node_count();
        for index in 0..node_count {
            let node = NodeId(index as u32);
            if graph.is_dead(node) {
                continue;
            }
            match reducer.reduce(graph, node) {
                Reduction::NoChange => {}
                Reduction::Changed(_) => reduced += 1,
                Reduction::Replace(value) => {
                    graph.replace_all_uses(node, value);
                    graph.kill_node(node);
                    replacements.push((node, value));
                    reduced += 1;
                }
            }
        }
        session.round(reduced);
        if reduced == 0 {
            break;
        }
    }
    session.finish(rounds);
    replacements
}
