use crate::data::graph_ir::MachineRepresentation;

/// Number of pointer-sized field slots tracked per object. Accesses at
/// offsets past this bound are treated as untracked.
pub const MAX_TRACKED_FIELDS: usize = 32;

/// Capacity of the element-fact ring; when full, new facts overwrite the
/// oldest.
pub const ELEMENTS_RING_CAPACITY: usize = 8;

pub const POINTER_SIZE: usize = std::mem::size_of::<usize>();

#[cfg(target_pointer_width = "64")]
pub const POINTER_REPRESENTATION: MachineRepresentation = MachineRepresentation::Word64;

#[cfg(target_pointer_width = "32")]
pub const POINTER_REPRESENTATION: MachineRepresentation = MachineRepresentation::Word32;
