use id_collections::IdVec;

use crate::data::graph_ir::{NodeId, OpCode, Operator};
use crate::data::value_type::ValueType;

#[derive(Clone, Debug)]
struct NodeInfo {
    op: Operator,
    ty: ValueType,
    // Flat input list, partitioned by the operator's declared counts:
    // value inputs, then effect inputs, then control inputs.
    inputs: Vec<NodeId>,
    uses: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Graph {
    nodes: IdVec<NodeId, NodeInfo>,
}

impl Graph {
    pub fn new() -> Graph {
        Graph {
            nodes: IdVec::new(),
        }
    }

    pub fn add_node(&mut self, op: Operator, ty: ValueType, inputs: &[NodeId]) -> NodeId {
        assert_eq!(inputs.len(), op.total_input_count());
        let id = self.nodes.push(NodeInfo {
            op,
            ty,
            inputs: inputs.to_vec(),
            uses: Vec::new(),
        });
        for &input in inputs {
            self.nodes[input].uses.push(id);
        }
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn operator(&self, node: NodeId) -> &Operator {
        &self.nodes[node].op
    }

    pub fn opcode(&self, node: NodeId) -> OpCode {
        self.nodes[node].op.opcode
    }

    pub fn ty(&self, node: NodeId) -> ValueType {
        self.nodes[node].ty
    }

    pub fn is_dead(&self, node: NodeId) -> bool {
        self.opcode(node) == OpCode::Dead
    }

    pub fn input(&self, node: NodeId, index: usize) -> NodeId {
        self.nodes[node].inputs[index]
    }

    pub fn input_count(&self, node: NodeId) -> usize {
        self.nodes[node].inputs.len()
    }

    pub fn value_input(&self, node: NodeId, index: usize) -> NodeId {
        debug_assert!(index < self.nodes[node].op.value_input_count);
        self.nodes[node].inputs[index]
    }

    pub fn effect_input(&self, node: NodeId, index: usize) -> NodeId {
        let op = &self.nodes[node].op;
        debug_assert!(index < op.effect_input_count);
        self.nodes[node].inputs[op.value_input_count + index]
    }

    pub fn control_input(&self, node: NodeId) -> NodeId {
        let op = &self.nodes[node].op;
        debug_assert!(op.control_input_count > 0);
        self.nodes[node].inputs[op.value_input_count + op.effect_input_count]
    }

    pub fn uses(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].uses
    }

    pub fn replace_input(&mut self, node: NodeId, index: usize, new_input: NodeId) {
        let old_input = self.nodes[node].inputs[index];
        if old_input == new_input {
            return;
        }
        self.nodes[node].inputs[index] = new_input;
        self.remove_one_use(old_input, node);
        self.nodes[new_input].uses.push(node);
    }

    /// Redirect every edge into `node` to `replacement`, regardless of edge
    /// kind.
    pub fn replace_all_uses(&mut self, node: NodeId, replacement: NodeId) {
        let users = self.nodes[node].uses.clone();
        for user in users {
            for index in 0..self.nodes[user].inputs.len() {
                if self.nodes[user].inputs[index] == node {
                    self.replace_input(user, index, replacement);
                }
            }
        }
    }

    /// Redirect value edges into `node` to `value` and, when `effect` is
    /// given, effect edges to `effect`.
    pub fn replace_with_value(&mut self, node: NodeId, value: NodeId, effect: Option<NodeId>) {
        let users = self.nodes[node].uses.clone();
        for user in users {
            let op = self.nodes[user].op;
            let effect_start = op.value_input_count;
            let effect_end = effect_start + op.effect_input_count;
            for index in 0..self.nodes[user].inputs.len() {
                if self.nodes[user].inputs[index] != node {
                    continue;
                }
                let new_input = match effect {
                    Some(effect) if index >= effect_start && index < effect_end => effect,
                    _ => value,
                };
                self.replace_input(user, index, new_input);
            }
        }
    }

    pub fn kill_node(&mut self, node: NodeId) {
        let inputs = std::mem::take(&mut self.nodes[node].inputs);
        for input in inputs {
            self.remove_one_use(input, node);
        }
        self.nodes[node].op = Operator::dead();
        self.nodes[node].ty = ValueType::NONE;
    }

    fn remove_one_use(&mut self, node: NodeId, user: NodeId) {
        let uses = &mut self.nodes[node].uses;
        if let Some(position) = uses.iter().position(|&u| u == user) {
            uses.swap_remove(position);
        }
    }
}

impl Default for Graph {
    fn default() -> Graph {
        Graph::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::graph_ir::{BaseTaggedness, FieldAccess, MachineRepresentation};

    fn tagged_access(offset: usize) -> FieldAccess {
        FieldAccess {
            base_is_tagged: BaseTaggedness::TaggedBase,
            offset,
            representation: MachineRepresentation::Tagged,
        }
    }

    #[test]
    fn replace_with_value_splits_value_and_effect_edges() {
        let mut graph = Graph::new();
        let start = graph.add_node(Operator::start(), ValueType::NONE, &[]);
        let object = graph.add_node(Operator::parameter(), ValueType::OTHER_OBJECT, &[]);
        let load = graph.add_node(
            Operator::load_field(tagged_access(8)),
            ValueType::ANY,
            &[object, start],
        );
        // A user with `load` on both a value edge and the effect edge.
        let store = graph.add_node(
            Operator::store_field(tagged_access(16)),
            ValueType::NONE,
            &[object, load, load],
        );

        graph.replace_with_value(load, object, Some(start));

        assert_eq!(graph.value_input(store, 1), object);
        assert_eq!(graph.effect_input(store, 0), start);
        assert!(graph.uses(load).is_empty());
        assert!(graph.uses(object).contains(&store));
        assert!(graph.uses(start).contains(&store));
    }

    #[test]
    fn kill_node_clears_inputs_and_uses() {
        let mut graph = Graph::new();
        let start = graph.add_node(Operator::start(), ValueType::NONE, &[]);
        let object = graph.add_node(Operator::parameter(), ValueType::OTHER_OBJECT, &[]);
        let load = graph.add_node(
            Operator::load_field(tagged_access(8)),
            ValueType::ANY,
            &[object, start],
        );

        graph.kill_node(load);

        assert!(graph.is_dead(load));
        assert!(!graph.uses(object).contains(&load));
        assert!(!graph.uses(start).contains(&load));
    }
}
