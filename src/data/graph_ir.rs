use bitflags::bitflags;
use id_collections::id_type;

#[id_type]
pub struct NodeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpCode {
    Start,
    Dead,
    Merge,
    Loop,
    EffectPhi,
    Parameter,
    HeapConstant,
    Allocate,
    FinishRegion,
    CheckMaps,
    EnsureWritableFastElements,
    MaybeGrowFastElements,
    TransitionElementsKind,
    LoadField,
    StoreField,
    LoadElement,
    StoreElement,
    StoreTypedElement,
    StoreBuffer,
    TypeGuard,
    Call,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Properties: u8 {
        const NO_READ = 1 << 0;
        const NO_WRITE = 1 << 1;
        const PURE = Self::NO_READ.bits() | Self::NO_WRITE.bits();
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GrowFastElementsFlags: u8 {
        const DOUBLE_ELEMENTS = 1 << 0;
        const ARRAY_OBJECT = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementsTransition {
    FastTransition,
    /// The transition may reallocate the elements backing store.
    SlowTransition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineRepresentation {
    None,
    Bit,
    Word8,
    Word16,
    Word32,
    Word64,
    Float32,
    Float64,
    Simd128,
    TaggedSigned,
    TaggedPointer,
    Tagged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseTaggedness {
    UntaggedBase,
    TaggedBase,
}

/// One machine-level field access: a byte offset from the object base plus
/// the representation stored there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldAccess {
    pub base_is_tagged: BaseTaggedness,
    pub offset: usize,
    pub representation: MachineRepresentation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementAccess {
    pub base_is_tagged: BaseTaggedness,
    pub header_size: usize,
    pub representation: MachineRepresentation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpPayload {
    None,
    Field(FieldAccess),
    Element(ElementAccess),
    GrowFastElements(GrowFastElementsFlags),
    Transition(ElementsTransition),
}

/// Static operator descriptor. Input counts determine how a node's flat
/// input list is partitioned (values, then effects, then controls).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operator {
    pub opcode: OpCode,
    pub properties: Properties,
    pub value_input_count: usize,
    pub effect_input_count: usize,
    pub effect_output_count: usize,
    pub control_input_count: usize,
    payload: OpPayload,
}

impl Operator {
    const fn new(
        opcode: OpCode,
        properties: Properties,
        value_input_count: usize,
        effect_input_count: usize,
        effect_output_count: usize,
        control_input_count: usize,
        payload: OpPayload,
    ) -> Self {
        Operator {
            opcode,
            properties,
            value_input_count,
            effect_input_count,
            effect_output_count,
            control_input_count,
            payload,
        }
    }

    pub fn start() -> Self {
        Self::new(OpCode::Start, Properties::PURE, 0, 0, 1, 0, OpPayload::None)
    }

    pub fn dead() -> Self {
        Self::new(OpCode::Dead, Properties::PURE, 0, 0, 0, 0, OpPayload::None)
    }

    pub fn merge(control_input_count: usize) -> Self {
        Self::new(
            OpCode::Merge,
            Properties::PURE,
            0,
            0,
            0,
            control_input_count,
            OpPayload::None,
        )
    }

    pub fn loop_(control_input_count: usize) -> Self {
        Self::new(
            OpCode::Loop,
            Properties::PURE,
            0,
            0,
            0,
            control_input_count,
            OpPayload::None,
        )
    }

    pub fn effect_phi(effect_input_count: usize) -> Self {
        Self::new(
            OpCode::EffectPhi,
            Properties::PURE,
            0,
            effect_input_count,
            1,
            1,
            OpPayload::None,
        )
    }

    pub fn parameter() -> Self {
        Self::new(
            OpCode::Parameter,
            Properties::PURE,
            0,
            0,
            0,
            0,
            OpPayload::None,
        )
    }

    pub fn heap_constant() -> Self {
        Self::new(
            OpCode::HeapConstant,
            Properties::PURE,
            0,
            0,
            0,
            0,
            OpPayload::None,
        )
    }

    // Allocation introduces a fresh object but writes no field the pass
    // tracks, so it carries NO_WRITE and threads the effect chain through.
    pub fn allocate() -> Self {
        Self::new(
            OpCode::Allocate,
            Properties::NO_WRITE,
            1,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn finish_region() -> Self {
        Self::new(
            OpCode::FinishRegion,
            Properties::NO_WRITE,
            1,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn check_maps(map_count: usize) -> Self {
        Self::new(
            OpCode::CheckMaps,
            Properties::NO_WRITE,
            1 + map_count,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn ensure_writable_fast_elements() -> Self {
        Self::new(
            OpCode::EnsureWritableFastElements,
            Properties::empty(),
            2,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn maybe_grow_fast_elements(flags: GrowFastElementsFlags) -> Self {
        Self::new(
            OpCode::MaybeGrowFastElements,
            Properties::empty(),
            4,
            1,
            1,
            0,
            OpPayload::GrowFastElements(flags),
        )
    }

    pub fn transition_elements_kind(transition: ElementsTransition) -> Self {
        Self::new(
            OpCode::TransitionElementsKind,
            Properties::empty(),
            3,
            1,
            1,
            0,
            OpPayload::Transition(transition),
        )
    }

    pub fn load_field(access: FieldAccess) -> Self {
        Self::new(
            OpCode::LoadField,
            Properties::NO_WRITE,
            1,
            1,
            1,
            0,
            OpPayload::Field(access),
        )
    }

    pub fn store_field(access: FieldAccess) -> Self {
        Self::new(
            OpCode::StoreField,
            Properties::empty(),
            2,
            1,
            1,
            0,
            OpPayload::Field(access),
        )
    }

    pub fn load_element(access: ElementAccess) -> Self {
        Self::new(
            OpCode::LoadElement,
            Properties::NO_WRITE,
            2,
            1,
            1,
            0,
            OpPayload::Element(access),
        )
    }

    pub fn store_element(access: ElementAccess) -> Self {
        Self::new(
            OpCode::StoreElement,
            Properties::empty(),
            3,
            1,
            1,
            0,
            OpPayload::Element(access),
        )
    }

    pub fn store_typed_element() -> Self {
        Self::new(
            OpCode::StoreTypedElement,
            Properties::empty(),
            5,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn store_buffer() -> Self {
        Self::new(
            OpCode::StoreBuffer,
            Properties::empty(),
            4,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn type_guard() -> Self {
        Self::new(
            OpCode::TypeGuard,
            Properties::NO_WRITE,
            1,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn call(arity: usize) -> Self {
        Self::new(
            OpCode::Call,
            Properties::empty(),
            arity,
            1,
            1,
            0,
            OpPayload::None,
        )
    }

    pub fn has_property(&self, properties: Properties) -> bool {
        self.properties.contains(properties)
    }

    pub fn field_access(&self) -> FieldAccess {
        match self.payload {
            OpPayload::Field(access) => access,
            _ => unreachable!("operator {:?} carries no field access", self.opcode),
        }
    }

    pub fn element_access(&self) -> ElementAccess {
        match self.payload {
            OpPayload::Element(access) => access,
            _ => unreachable!("operator {:?} carries no element access", self.opcode),
        }
    }

    pub fn grow_fast_elements_flags(&self) -> GrowFastElementsFlags {
        match self.payload {
            OpPayload::GrowFastElements(flags) => flags,
            _ => unreachable!("operator {:?} carries no grow flags", self.opcode),
        }
    }

    pub fn elements_transition(&self) -> ElementsTransition {
        match self.payload {
            OpPayload::Transition(transition) => transition,
            _ => unreachable!("operator {:?} carries no transition", self.opcode),
        }
    }

    pub fn total_input_count(&self) -> usize {
        self.value_input_count + self.effect_input_count + self.control_input_count
    }
}
