use bitflags::bitflags;

bitflags! {
    /// Static type of a value node: the set of runtime value classes it may
    /// hold. Two nodes whose types are disjoint can never refer to the same
    /// heap object.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ValueType: u32 {
        const SIGNED_SMALL = 1 << 0;
        const OTHER_NUMBER = 1 << 1;
        const BOOLEAN = 1 << 2;
        const STRING = 1 << 3;
        const SYMBOL = 1 << 4;
        const FUNCTION = 1 << 5;
        const ARRAY = 1 << 6;
        const OTHER_OBJECT = 1 << 7;
        /// Runtime-internal objects: maps, backing stores.
        const INTERNAL = 1 << 8;

        const NUMBER = Self::SIGNED_SMALL.bits() | Self::OTHER_NUMBER.bits();
        const RECEIVER =
            Self::FUNCTION.bits() | Self::ARRAY.bits() | Self::OTHER_OBJECT.bits();
    }
}

impl ValueType {
    pub const ANY: ValueType = ValueType::all();
    pub const NONE: ValueType = ValueType::empty();

    /// Non-empty intersection: the two types share at least one value class.
    pub fn maybe(self, other: ValueType) -> bool {
        self.intersects(other)
    }

    /// Subtype check: every class of `self` is a class of `other`.
    pub fn is(self, other: ValueType) -> bool {
        other.contains(self)
    }
}
