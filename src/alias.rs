use crate::data::graph_ir::{NodeId, OpCode};
use crate::graph::Graph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aliasing {
    No,
    May,
    Must,
}

/// Shallow structural alias query over value nodes. Pure and total; `Must`
/// is only produced for identical nodes, `No` for provably disjoint ones.
pub fn query_alias(graph: &Graph, a: NodeId, b: NodeId) -> Aliasing {
    if a == b {
        return Aliasing::Must;
    }
    if !graph.ty(a).maybe(graph.ty(b)) {
        return Aliasing::No;
    }
    if graph.opcode(b) == OpCode::Allocate {
        // A fresh allocation cannot alias any value that existed before it.
        match graph.opcode(a) {
            OpCode::Allocate | OpCode::HeapConstant | OpCode::Parameter => {
                return Aliasing::No;
            }
            OpCode::FinishRegion => {
                return query_alias(graph, graph.value_input(a, 0), b);
            }
            _ => {}
        }
    }
    if graph.opcode(a) == OpCode::Allocate {
        match graph.opcode(b) {
            OpCode::HeapConstant | OpCode::Parameter => {
                return Aliasing::No;
            }
            OpCode::FinishRegion => {
                return query_alias(graph, a, graph.value_input(b, 0));
            }
            _ => {}
        }
    }
    Aliasing::May
}

pub fn may_alias(graph: &Graph, a: NodeId, b: NodeId) -> bool {
    query_alias(graph, a, b) != Aliasing::No
}

pub fn must_alias(graph: &Graph, a: NodeId, b: NodeId) -> bool {
    query_alias(graph, a, b) == Aliasing::Must
}
