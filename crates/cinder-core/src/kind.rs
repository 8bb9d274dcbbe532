//! The closed set of value kinds.

use std::fmt;

/// Type tag of a variant value.
///
/// Stored as a single byte inside value records. The discriminants are
/// part of the record layout and must not be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    /// Insertion-ordered key/value container.
    Map = 0,
    /// Ordered sequence.
    List = 1,
    /// NUL-terminated byte string.
    String = 2,
    /// 32-bit signed integer.
    Int32 = 3,
    /// 64-bit signed integer.
    Int64 = 4,
    /// One-byte boolean flag.
    Bool = 5,
    /// 64-bit IEEE-754 float.
    Float = 6,
}

impl ValueKind {
    /// All kinds, in tag order.
    pub const ALL: [ValueKind; 7] = [
        ValueKind::Map,
        ValueKind::List,
        ValueKind::String,
        ValueKind::Int32,
        ValueKind::Int64,
        ValueKind::Bool,
        ValueKind::Float,
    ];

    /// The on-arena tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a tag byte. Returns `None` for unknown tags.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Payload width in bytes for fixed-size primitives.
    ///
    /// `None` for strings (variable length) and containers (payload is a
    /// record handle, not inline data).
    pub fn primitive_width(self) -> Option<usize> {
        match self {
            ValueKind::Int32 => Some(4),
            ValueKind::Int64 | ValueKind::Float => Some(8),
            ValueKind::Bool => Some(1),
            ValueKind::Map | ValueKind::List | ValueKind::String => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Map => "map",
            ValueKind::List => "list",
            ValueKind::String => "string",
            ValueKind::Int32 => "int32",
            ValueKind::Int64 => "int64",
            ValueKind::Bool => "bool",
            ValueKind::Float => "float",
        };
        f.write_str(name)
    }
}
