use thiserror::Error;

use crate::data::graph_ir::{NodeId, OpCode};
use crate::graph::Graph;

#[derive(Clone, Debug, Error)]
pub enum VerifyError {
    #[error("node {node:?} has {got} inputs but its operator expects {want}")]
    InputCountMismatch { node: NodeId, got: usize, want: usize },
    #[error("node {node:?} effect input {index} is {input:?}, which produces no effect")]
    NonEffectInput {
        node: NodeId,
        index: usize,
        input: NodeId,
    },
    #[error(
        "effect phi {node:?} has {effects} effect inputs but its control \
         {control:?} has {controls} inputs"
    )]
    EffectPhiArityMismatch {
        node: NodeId,
        effects: usize,
        control: NodeId,
        controls: usize,
    },
}

/// Check the structural wiring the load elimination pass relies on: input
/// lists sized to their operators, effect edges coming from
/// effect-producing nodes, and effect phis matching their control's arity.
pub fn verify_graph(graph: &Graph) -> Result<(), VerifyError> {
    for node in graph.node_ids() {
        let op = *graph.operator(node);
        if graph.input_count(node) != op.total_input_count() {
            return Err(VerifyError::InputCountMismatch {
                node,
                got: graph.input_count(node),
                want: op.total_input_count(),
            });
        }
        for index in 0..op.effect_input_count {
            let input = graph.effect_input(node, index);
            if graph.operator(input).effect_output_count == 0 {
                return Err(VerifyError::NonEffectInput { node, index, input });
            }
        }
        if op.opcode == OpCode::EffectPhi {
            let control = graph.control_input(node);
            let controls = graph.operator(control).control_input_count;
            if op.effect_input_count != controls {
                return Err(VerifyError::EffectPhiArityMismatch {
                    node,
                    effects: op.effect_input_count,
                    control,
                    controls,
                });
            }
        }
    }
    Ok(())
}
