use std::collections::{BTreeSet, VecDeque};
use std::ptr;

use bumpalo::Bump;
use id_collections::IdVec;

use crate::alias::{may_alias, must_alias};
use crate::config::{
    ELEMENTS_RING_CAPACITY, MAX_TRACKED_FIELDS, POINTER_REPRESENTATION, POINTER_SIZE,
};
use crate::data::graph_ir::{
    BaseTaggedness, ElementsTransition, FieldAccess, GrowFastElementsFlags, MachineRepresentation,
    NodeId, OpCode, Properties,
};
use crate::graph::Graph;
use crate::reduce::{run_to_fixed_point, Reducer, Reduction};
use crate::util::progress_logger::ProgressLogger;

/// The two runtime map constants consulted when reasoning about elements
/// backing stores. Both must be `HeapConstant` nodes of the host graph.
#[derive(Clone, Copy, Debug)]
pub struct CommonMaps {
    pub fixed_array_map: NodeId,
    pub fixed_double_array_map: NodeId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Element {
    object: NodeId,
    index: NodeId,
    value: NodeId,
}

/// Bounded ring of `(object, index, value)` facts: reading `index` of
/// `object` at this point in the effect chain yields `value`. When the ring
/// is full, new facts overwrite the oldest.
#[derive(Clone, Copy, Debug)]
struct AbstractElements {
    elements: [Option<Element>; ELEMENTS_RING_CAPACITY],
    next_index: usize,
}

impl AbstractElements {
    fn empty() -> AbstractElements {
        AbstractElements {
            elements: [None; ELEMENTS_RING_CAPACITY],
            next_index: 0,
        }
    }

    fn with(object: NodeId, index: NodeId, value: NodeId) -> AbstractElements {
        let mut that = AbstractElements::empty();
        that.elements[0] = Some(Element {
            object,
            index,
            value,
        });
        that.next_index = 1;
        that
    }

    fn facts(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().flatten()
    }

    fn lookup(&self, graph: &Graph, object: NodeId, index: NodeId) -> Option<NodeId> {
        self.facts()
            .find(|element| {
                must_alias(graph, object, element.object) && must_alias(graph, index, element.index)
            })
            .map(|element| element.value)
    }

    fn extend<'zone>(
        &'zone self,
        graph: &Graph,
        object: NodeId,
        index: NodeId,
        value: NodeId,
        zone: &'zone Bump,
    ) -> &'zone AbstractElements {
        // Killing first keeps the ring free of multiple entries for the
        // same must-alias (object, index) pair.
        let killed = self.kill(graph, object, index, zone);
        let mut that = *killed;
        that.elements[that.next_index] = Some(Element {
            object,
            index,
            value,
        });
        that.next_index = (that.next_index + 1) % ELEMENTS_RING_CAPACITY;
        zone.alloc(that)
    }

    fn kill<'zone>(
        &'zone self,
        graph: &Graph,
        object: NodeId,
        index: NodeId,
        zone: &'zone Bump,
    ) -> &'zone AbstractElements {
        if !self
            .facts()
            .any(|element| may_alias(graph, object, element.object))
        {
            return self;
        }
        let mut that = AbstractElements::empty();
        for element in self.facts() {
            // An entry survives if it is distinguishable from the killed
            // location on at least one coordinate.
            if !may_alias(graph, object, element.object)
                || !may_alias(graph, index, element.index)
            {
                that.elements[that.next_index] = Some(*element);
                that.next_index += 1;
            }
        }
        that.next_index %= ELEMENTS_RING_CAPACITY;
        zone.alloc(that)
    }

    fn subset_of(&self, that: &AbstractElements) -> bool {
        self.facts()
            .all(|element| that.facts().any(|other| other == element))
    }

    // Order and cursor position are irrelevant; only the set of facts
    // matters.
    fn equals(&self, that: &AbstractElements) -> bool {
        ptr::eq(self, that) || (self.subset_of(that) && that.subset_of(self))
    }

    fn merge<'zone>(
        &'zone self,
        that: &AbstractElements,
        zone: &'zone Bump,
    ) -> &'zone AbstractElements {
        if self.equals(that) {
            return self;
        }
        let mut copy = AbstractElements::empty();
        for element in self.facts() {
            if that.facts().any(|other| other == element) {
                copy.elements[copy.next_index] = Some(*element);
                copy.next_index += 1;
            }
        }
        copy.next_index %= ELEMENTS_RING_CAPACITY;
        zone.alloc(copy)
    }
}

/// `(object, value)` facts for a single tracked field slot, at most one per
/// must-alias class of objects.
#[derive(Debug)]
struct AbstractField<'zone> {
    info_for_node: bumpalo::collections::Vec<'zone, (NodeId, NodeId)>,
}

impl<'zone> AbstractField<'zone> {
    fn with(object: NodeId, value: NodeId, zone: &'zone Bump) -> AbstractField<'zone> {
        let mut info_for_node = bumpalo::collections::Vec::new_in(zone);
        info_for_node.push((object, value));
        AbstractField { info_for_node }
    }

    fn lookup(&self, graph: &Graph, object: NodeId) -> Option<NodeId> {
        self.info_for_node
            .iter()
            .find(|(key, _)| must_alias(graph, object, *key))
            .map(|(_, value)| *value)
    }

    fn extend(
        &'zone self,
        graph: &Graph,
        object: NodeId,
        value: NodeId,
        zone: &'zone Bump,
    ) -> &'zone AbstractField<'zone> {
        let killed = self.kill(graph, object, zone);
        let mut info_for_node =
            bumpalo::collections::Vec::from_iter_in(killed.info_for_node.iter().copied(), zone);
        info_for_node.push((object, value));
        zone.alloc(AbstractField { info_for_node })
    }

    fn kill(
        &'zone self,
        graph: &Graph,
        object: NodeId,
        zone: &'zone Bump,
    ) -> &'zone AbstractField<'zone> {
        if !self
            .info_for_node
            .iter()
            .any(|(key, _)| may_alias(graph, object, *key))
        {
            return self;
        }
        let info_for_node = bumpalo::collections::Vec::from_iter_in(
            self.info_for_node
                .iter()
                .copied()
                .filter(|(key, _)| !may_alias(graph, object, *key)),
            zone,
        );
        zone.alloc(AbstractField { info_for_node })
    }

    fn equals(&self, that: &AbstractField<'zone>) -> bool {
        self.info_for_node.len() == that.info_for_node.len()
            && self
                .info_for_node
                .iter()
                .all(|pair| that.info_for_node.contains(pair))
    }

    fn merge(
        &'zone self,
        that: &AbstractField<'zone>,
        zone: &'zone Bump,
    ) -> &'zone AbstractField<'zone> {
        if self.equals(that) {
            return self;
        }
        let info_for_node = bumpalo::collections::Vec::from_iter_in(
            self.info_for_node
                .iter()
                .copied()
                .filter(|pair| that.info_for_node.contains(pair)),
            zone,
        );
        zone.alloc(AbstractField { info_for_node })
    }
}

/// What is known about fields and elements at one point of the effect
/// chain. `None` on an axis means no information. Values are immutable once
/// published; modifiers return fresh zone allocations sharing structure
/// with the old state.
#[derive(Clone, Copy, Debug)]
struct AbstractState<'zone> {
    elements: Option<&'zone AbstractElements>,
    fields: [Option<&'zone AbstractField<'zone>>; MAX_TRACKED_FIELDS],
}

impl<'zone> AbstractState<'zone> {
    fn empty() -> AbstractState<'zone> {
        AbstractState {
            elements: None,
            fields: [None; MAX_TRACKED_FIELDS],
        }
    }

    fn equals(&self, that: &AbstractState<'zone>) -> bool {
        match (self.elements, that.elements) {
            (Some(these), Some(those)) => {
                if !these.equals(those) {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }
        for slot in 0..MAX_TRACKED_FIELDS {
            match (self.fields[slot], that.fields[slot]) {
                (Some(this_field), Some(that_field)) => {
                    if !this_field.equals(that_field) {
                        return false;
                    }
                }
                (None, None) => {}
                _ => return false,
            }
        }
        true
    }

    // Meet in the fact-subset lattice: an axis with no information on
    // either side has no information afterwards.
    fn merge(&mut self, that: &AbstractState<'zone>, zone: &'zone Bump) {
        self.elements = match (self.elements, that.elements) {
            (Some(these), Some(those)) => Some(these.merge(those, zone)),
            _ => None,
        };
        for slot in 0..MAX_TRACKED_FIELDS {
            self.fields[slot] = match (self.fields[slot], that.fields[slot]) {
                (Some(this_field), Some(that_field)) => Some(this_field.merge(that_field, zone)),
                _ => None,
            };
        }
    }

    fn lookup_element(&self, graph: &Graph, object: NodeId, index: NodeId) -> Option<NodeId> {
        self.elements
            .and_then(|elements| elements.lookup(graph, object, index))
    }

    fn add_element(
        &self,
        graph: &Graph,
        object: NodeId,
        index: NodeId,
        value: NodeId,
        zone: &'zone Bump,
    ) -> &'zone AbstractState<'zone> {
        let mut that = *self;
        that.elements = Some(match self.elements {
            Some(elements) => elements.extend(graph, object, index, value, zone),
            None => zone.alloc(AbstractElements::with(object, index, value)),
        });
        zone.alloc(that)
    }

    fn kill_element(
        &'zone self,
        graph: &Graph,
        object: NodeId,
        index: NodeId,
        zone: &'zone Bump,
    ) -> &'zone AbstractState<'zone> {
        if let Some(elements) = self.elements {
            let killed = elements.kill(graph, object, index, zone);
            if !ptr::eq(elements, killed) {
                let mut that = *self;
                that.elements = Some(killed);
                return zone.alloc(that);
            }
        }
        self
    }

    fn lookup_field(&self, graph: &Graph, object: NodeId, slot: usize) -> Option<NodeId> {
        self.fields[slot].and_then(|field| field.lookup(graph, object))
    }

    fn add_field(
        &self,
        graph: &Graph,
        object: NodeId,
        slot: usize,
        value: NodeId,
        zone: &'zone Bump,
    ) -> &'zone AbstractState<'zone> {
        let mut that = *self;
        that.fields[slot] = Some(match self.fields[slot] {
            Some(field) => field.extend(graph, object, value, zone),
            None => zone.alloc(AbstractField::with(object, value, zone)),
        });
        zone.alloc(that)
    }

    fn kill_field(
        &'zone self,
        graph: &Graph,
        object: NodeId,
        slot: usize,
        zone: &'zone Bump,
    ) -> &'zone AbstractState<'zone> {
        if let Some(field) = self.fields[slot] {
            let killed = field.kill(graph, object, zone);
            if !ptr::eq(field, killed) {
                let mut that = *self;
                that.fields[slot] = Some(killed);
                return zone.alloc(that);
            }
        }
        self
    }
}

/// Post-states recorded at effect-producing nodes. A missing entry means
/// the node has not been analyzed yet, which is how incomplete loops and
/// merges are detected.
struct NodeStateTable<'zone> {
    info_for_node: IdVec<NodeId, Option<&'zone AbstractState<'zone>>>,
}

impl<'zone> NodeStateTable<'zone> {
    fn new() -> NodeStateTable<'zone> {
        NodeStateTable {
            info_for_node: IdVec::new(),
        }
    }

    fn get(&self, node: NodeId) -> Option<&'zone AbstractState<'zone>> {
        if (node.0 as usize) < self.info_for_node.len() {
            self.info_for_node[node]
        } else {
            None
        }
    }

    fn set(&mut self, node: NodeId, state: &'zone AbstractState<'zone>) {
        while self.info_for_node.len() <= node.0 as usize {
            let _ = self.info_for_node.push(None);
        }
        self.info_for_node[node] = Some(state);
    }
}

pub struct LoadElimination<'zone> {
    zone: &'zone Bump,
    empty_state: &'zone AbstractState<'zone>,
    node_states: NodeStateTable<'zone>,
    common_maps: CommonMaps,
}

impl<'zone> LoadElimination<'zone> {
    pub fn new(zone: &'zone Bump, common_maps: CommonMaps) -> LoadElimination<'zone> {
        LoadElimination {
            zone,
            empty_state: zone.alloc(AbstractState::empty()),
            node_states: NodeStateTable::new(),
            common_maps,
        }
    }

    fn reduce_check_maps(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let object = graph.value_input(node, 0);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        let map_input_count = graph.operator(node).value_input_count - 1;
        if let Some(object_map) = state.lookup_field(graph, object, 0) {
            for i in 0..map_input_count {
                if graph.value_input(node, 1 + i) == object_map {
                    // The object is already known to have one of the maps
                    // this node checks for.
                    return Reduction::Replace(effect);
                }
            }
        }
        let state = if map_input_count == 1 {
            let map0 = graph.value_input(node, 1);
            state.add_field(graph, object, 0, map0, zone)
        } else {
            state
        };
        self.update_state(node, state)
    }

    fn reduce_ensure_writable_fast_elements(
        &mut self,
        graph: &mut Graph,
        node: NodeId,
    ) -> Reduction {
        let zone = self.zone;
        let object = graph.value_input(node, 0);
        let elements = graph.value_input(node, 1);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        let fixed_array_map = self.common_maps.fixed_array_map;
        if let Some(elements_map) = state.lookup_field(graph, elements, 0) {
            if elements_map == fixed_array_map {
                // The elements backing store is already a writable plain
                // fixed array.
                graph.replace_with_value(node, elements, Some(effect));
                return Reduction::Replace(elements);
            }
        }
        // The result is known to carry the plain fixed-array map, and it
        // becomes the elements backing store of the object.
        let state = state.add_field(graph, node, 0, fixed_array_map, zone);
        let state = state.kill_field(graph, object, 2, zone);
        let state = state.add_field(graph, object, 2, node, zone);
        self.update_state(node, state)
    }

    fn reduce_maybe_grow_fast_elements(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let flags = graph.operator(node).grow_fast_elements_flags();
        let object = graph.value_input(node, 0);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        let result_map = if flags.contains(GrowFastElementsFlags::DOUBLE_ELEMENTS) {
            self.common_maps.fixed_double_array_map
        } else {
            self.common_maps.fixed_array_map
        };
        let state = state.add_field(graph, node, 0, result_map, zone);
        let state = if flags.contains(GrowFastElementsFlags::ARRAY_OBJECT) {
            // Growing an array object updates its length as well.
            state.kill_field(graph, object, 3, zone)
        } else {
            state
        };
        let state = state.kill_field(graph, object, 2, zone);
        let state = state.add_field(graph, object, 2, node, zone);
        self.update_state(node, state)
    }

    fn reduce_transition_elements_kind(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let object = graph.value_input(node, 0);
        let source_map = graph.value_input(node, 1);
        let target_map = graph.value_input(node, 2);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        let state = match state.lookup_field(graph, object, 0) {
            Some(object_map) => {
                if object_map == target_map {
                    // The object already has the target map; the transition
                    // is fully redundant no matter the source map.
                    return Reduction::Replace(effect);
                }
                let state = state.kill_field(graph, object, 0, zone);
                if object_map == source_map {
                    state.add_field(graph, object, 0, target_map, zone)
                } else {
                    state
                }
            }
            None => state.kill_field(graph, object, 0, zone),
        };
        let state = match graph.operator(node).elements_transition() {
            ElementsTransition::FastTransition => state,
            ElementsTransition::SlowTransition => {
                // The transition may reallocate the backing store.
                state.kill_field(graph, object, 2, zone)
            }
        };
        self.update_state(node, state)
    }

    fn reduce_load_field(&mut self, graph: &mut Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let access = graph.operator(node).field_access();
        let object = graph.value_input(node, 0);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        let state = match field_index_of(&access) {
            Some(field_index) => {
                if let Some(replacement) = state.lookup_field(graph, object, field_index) {
                    // Only forward a value whose static type is at least as
                    // precise as this load's.
                    if !graph.is_dead(replacement) && graph.ty(replacement).is(graph.ty(node)) {
                        graph.replace_with_value(node, replacement, Some(effect));
                        return Reduction::Replace(replacement);
                    }
                }
                state.add_field(graph, object, field_index, node, zone)
            }
            None => state,
        };
        self.update_state(node, state)
    }

    fn reduce_store_field(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let access = graph.operator(node).field_access();
        let object = graph.value_input(node, 0);
        let new_value = graph.value_input(node, 1);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        let state = match field_index_of(&access) {
            Some(field_index) => {
                if state.lookup_field(graph, object, field_index) == Some(new_value) {
                    // The slot already holds this exact value.
                    return Reduction::Replace(effect);
                }
                let state = state.kill_field(graph, object, field_index, zone);
                state.add_field(graph, object, field_index, new_value, zone)
            }
            // A store through an untracked field shape could overlap any
            // slot we model.
            None => self.empty_state,
        };
        self.update_state(node, state)
    }

    fn reduce_load_element(&mut self, graph: &mut Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let object = graph.value_input(node, 0);
        let index = graph.value_input(node, 1);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        if let Some(replacement) = state.lookup_element(graph, object, index) {
            if !graph.is_dead(replacement) && graph.ty(replacement).is(graph.ty(node)) {
                graph.replace_with_value(node, replacement, Some(effect));
                return Reduction::Replace(replacement);
            }
        }
        let state = state.add_element(graph, object, index, node, zone);
        self.update_state(node, state)
    }

    fn reduce_store_element(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let access = graph.operator(node).element_access();
        let object = graph.value_input(node, 0);
        let index = graph.value_input(node, 1);
        let new_value = graph.value_input(node, 2);
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        if state.lookup_element(graph, object, index) == Some(new_value) {
            // The element already holds this exact value.
            return Reduction::Replace(effect);
        }
        let state = state.kill_element(graph, object, index, zone);
        let state = match access.representation {
            MachineRepresentation::None | MachineRepresentation::Bit => {
                unreachable!("element access with unstorable representation")
            }
            // The store truncates, so the stored bits are not the stored
            // node; record nothing.
            MachineRepresentation::Word8
            | MachineRepresentation::Word16
            | MachineRepresentation::Word32
            | MachineRepresentation::Word64
            | MachineRepresentation::Float32 => state,
            MachineRepresentation::Float64
            | MachineRepresentation::Simd128
            | MachineRepresentation::TaggedSigned
            | MachineRepresentation::TaggedPointer
            | MachineRepresentation::Tagged => {
                state.add_element(graph, object, index, new_value, zone)
            }
        };
        self.update_state(node, state)
    }

    fn reduce_store_typed_element(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        // Writes outside the tracked heap; the state passes through.
        let effect = graph.effect_input(node, 0);
        let state = match self.node_states.get(effect) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        self.update_state(node, state)
    }

    fn reduce_effect_phi(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        let zone = self.zone;
        let effect0 = graph.effect_input(node, 0);
        let state0 = match self.node_states.get(effect0) {
            Some(state) => state,
            None => return Reduction::NoChange,
        };
        let control = graph.control_input(node);
        if graph.opcode(control) == OpCode::Loop {
            // With reducible loops the entry edge dominates the header, so
            // the header state is the entry state minus everything the loop
            // body may overwrite.
            let state = self.compute_loop_state(graph, node, state0);
            return self.update_state(node, state);
        }
        debug_assert_eq!(graph.opcode(control), OpCode::Merge);

        let input_count = graph.operator(node).effect_input_count;
        let mut input_states = Vec::with_capacity(input_count - 1);
        for i in 1..input_count {
            match self.node_states.get(graph.effect_input(node, i)) {
                Some(state) => input_states.push(state),
                // The merge is incomplete; revisit once every predecessor
                // has been analyzed.
                None => return Reduction::NoChange,
            }
        }
        let mut state = *state0;
        for input_state in input_states {
            state.merge(input_state, zone);
        }
        self.update_state(node, zone.alloc(state))
    }

    fn reduce_start(&mut self, node: NodeId) -> Reduction {
        self.update_state(node, self.empty_state)
    }

    fn reduce_other_node(&mut self, graph: &Graph, node: NodeId) -> Reduction {
        let op = *graph.operator(node);
        if op.effect_input_count == 1 {
            if op.effect_output_count == 1 {
                let effect = graph.effect_input(node, 0);
                let state = match self.node_states.get(effect) {
                    Some(state) => state,
                    None => return Reduction::NoChange,
                };
                let state = if op.has_property(Properties::NO_WRITE) {
                    state
                } else {
                    // Uncontrolled side effects invalidate everything we
                    // know.
                    self.empty_state
                };
                self.update_state(node, state)
            } else {
                // Effect terminators are handled specially.
                Reduction::NoChange
            }
        } else {
            debug_assert_eq!(op.effect_input_count, 0);
            debug_assert_eq!(op.effect_output_count, 0);
            Reduction::NoChange
        }
    }

    fn update_state(&mut self, node: NodeId, state: &'zone AbstractState<'zone>) -> Reduction {
        match self.node_states.get(node) {
            Some(original) if ptr::eq(original, state) => Reduction::NoChange,
            Some(original) if state.equals(original) => Reduction::NoChange,
            _ => {
                self.node_states.set(node, state);
                Reduction::Changed(node)
            }
        }
    }

    /// Conservative header state for a loop phi: scan every effect node
    /// reachable through the back edges once and apply the kills its writes
    /// imply to the entry state. Any writer we cannot summarize drops the
    /// whole state.
    fn compute_loop_state(
        &self,
        graph: &Graph,
        node: NodeId,
        state: &'zone AbstractState<'zone>,
    ) -> &'zone AbstractState<'zone> {
        let zone = self.zone;
        let mut state = state;
        let mut queue = VecDeque::new();
        let mut visited = BTreeSet::new();
        visited.insert(node);
        for i in 1..graph.operator(node).effect_input_count {
            queue.push_back(graph.effect_input(node, i));
        }
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if !graph.operator(current).has_property(Properties::NO_WRITE) {
                match graph.opcode(current) {
                    OpCode::EnsureWritableFastElements => {
                        let object = graph.value_input(current, 0);
                        state = state.kill_field(graph, object, 2, zone);
                    }
                    OpCode::MaybeGrowFastElements => {
                        let flags = graph.operator(current).grow_fast_elements_flags();
                        let object = graph.value_input(current, 0);
                        state = state.kill_field(graph, object, 2, zone);
                        if flags.contains(GrowFastElementsFlags::ARRAY_OBJECT) {
                            state = state.kill_field(graph, object, 3, zone);
                        }
                    }
                    OpCode::TransitionElementsKind => {
                        let object = graph.value_input(current, 0);
                        state = state.kill_field(graph, object, 0, zone);
                        state = state.kill_field(graph, object, 2, zone);
                    }
                    OpCode::StoreField => {
                        let access = graph.operator(current).field_access();
                        let object = graph.value_input(current, 0);
                        match field_index_of(&access) {
                            Some(field_index) => {
                                state = state.kill_field(graph, object, field_index, zone);
                            }
                            None => return self.empty_state,
                        }
                    }
                    OpCode::StoreElement => {
                        let object = graph.value_input(current, 0);
                        let index = graph.value_input(current, 1);
                        state = state.kill_element(graph, object, index, zone);
                    }
                    OpCode::StoreBuffer | OpCode::StoreTypedElement => {
                        // Writes outside the tracked heap.
                    }
                    _ => return self.empty_state,
                }
            }
            for i in 0..graph.operator(current).effect_input_count {
                queue.push_back(graph.effect_input(current, i));
            }
        }
        state
    }
}

impl<'zone> Reducer for LoadElimination<'zone> {
    fn reduce(&mut self, graph: &mut Graph, node: NodeId) -> Reduction {
        match graph.opcode(node) {
            OpCode::CheckMaps => self.reduce_check_maps(graph, node),
            OpCode::EnsureWritableFastElements => {
                self.reduce_ensure_writable_fast_elements(graph, node)
            }
            OpCode::MaybeGrowFastElements => self.reduce_maybe_grow_fast_elements(graph, node),
            OpCode::TransitionElementsKind => self.reduce_transition_elements_kind(graph, node),
            OpCode::LoadField => self.reduce_load_field(graph, node),
            OpCode::StoreField => self.reduce_store_field(graph, node),
            OpCode::LoadElement => self.reduce_load_element(graph, node),
            OpCode::StoreElement => self.reduce_store_element(graph, node),
            OpCode::StoreTypedElement => self.reduce_store_typed_element(graph, node),
            OpCode::EffectPhi => self.reduce_effect_phi(graph, node),
            OpCode::Dead => Reduction::NoChange,
            OpCode::Start => self.reduce_start(node),
            _ => self.reduce_other_node(graph, node),
        }
    }
}

/// Run load elimination over `graph` until a fixed point is reached,
/// applying every discovered replacement. Returns the `(replaced,
/// replacement)` pairs in application order.
pub fn eliminate_loads<P: ProgressLogger>(
    graph: &mut Graph,
    common_maps: CommonMaps,
    progress: P,
) -> Vec<(NodeId, NodeId)> {
    let zone = Bump::new();
    let mut pass = LoadElimination::new(&zone, common_maps);
    run_to_fixed_point(graph, &mut pass, progress)
}

/// Map a field access to the slot it occupies, or `None` when the access
/// shape is not tracked.
fn field_index_of(access: &FieldAccess) -> Option<usize> {
    let rep = access.representation;
    match rep {
        MachineRepresentation::None | MachineRepresentation::Bit => {
            unreachable!("field access with unstorable representation")
        }
        MachineRepresentation::Word32 | MachineRepresentation::Word64 => {
            if rep != POINTER_REPRESENTATION {
                // Only pointer-size word fields are tracked.
                return None;
            }
        }
        MachineRepresentation::Word8
        | MachineRepresentation::Word16
        | MachineRepresentation::Float32 => return None,
        MachineRepresentation::Float64 | MachineRepresentation::Simd128 => {
            // Wider than one pointer slot.
            return None;
        }
        MachineRepresentation::TaggedSigned
        | MachineRepresentation::TaggedPointer
        | MachineRepresentation::Tagged => {}
    }
    debug_assert_eq!(access.base_is_tagged, BaseTaggedness::TaggedBase);
    debug_assert_eq!(access.offset % POINTER_SIZE, 0);
    let field_index = access.offset / POINTER_SIZE;
    if field_index >= MAX_TRACKED_FIELDS {
        return None;
    }
    Some(field_index)
}
