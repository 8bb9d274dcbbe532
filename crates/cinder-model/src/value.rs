//! Tagged-union values.
//!
//! A value is a small header record `{ kind, payload, len }` whose payload
//! lives elsewhere in the same arena: inline primitive bytes, a
//! NUL-terminated string, or a container record. [`ValueRef`] is the
//! handle; [`Value`] is the decoded view and the constructor input.
//!
//! Typed accessors fail closed. Asking an `Int32` value for a float
//! yields `0.0`, asking a string for its map yields `None`. Callers that
//! need to tell a real zero from a mismatch check [`ValueRef::kind`] first.

use cinder_arena::{Arena, ArenaError, Ref};
use cinder_core::{ByteReader, ByteWriter, Record, ValueKind};

use crate::list::List;
use crate::map::Map;

/// On-arena layout of a value header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ValueHeader {
    pub(crate) kind: u8,
    pub(crate) payload: u32,
    pub(crate) len: u32,
}

impl Record for ValueHeader {
    const SIZE: usize = 12;

    fn encode(&self, w: &mut ByteWriter<'_>) {
        w.put_u8(self.kind);
        w.pad(3);
        w.put_u32(self.payload);
        w.put_u32(self.len);
    }

    fn decode(r: &mut ByteReader<'_>) -> Self {
        let kind = r.get_u8();
        r.skip(3);
        Self {
            kind,
            payload: r.get_u32(),
            len: r.get_u32(),
        }
    }
}

/// Decoded contents of a value.
///
/// Equality follows the value model: strings compare bytewise, numbers
/// and booleans natively (so `NaN != NaN`), containers by identity, and
/// different kinds never compare equal (`Int32(1) != Int64(1)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    /// A map container.
    Map(Map),
    /// A list container.
    List(List),
    /// String bytes, without the trailing NUL. When stored, the string ends
    /// at its first NUL byte.
    String(&'a [u8]),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Boolean, stored as a one-byte flag.
    Bool(bool),
    /// 64-bit float.
    Float(f64),
}

impl Value<'_> {
    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Map(_) => ValueKind::Map,
            Value::List(_) => ValueKind::List,
            Value::String(_) => ValueKind::String,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Bool(_) => ValueKind::Bool,
            Value::Float(_) => ValueKind::Float,
        }
    }
}

impl From<Map> for Value<'_> {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<List> for Value<'_> {
    fn from(v: List) -> Self {
        Value::List(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::String(v.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::String(v)
    }
}

impl From<i32> for Value<'_> {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

/// Handle to an arena-resident value.
///
/// Handle equality (`==`) is identity. Use [`ValueRef::compare`] for value
/// equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueRef(pub(crate) Ref<ValueHeader>);

impl ValueRef {
    /// Allocate a value and its payload.
    pub fn new(arena: &mut Arena<'_>, value: Value<'_>) -> Result<Self, ArenaError> {
        let header = store_payload(arena, value)?;
        Ok(Self(arena.alloc(&header)?))
    }

    /// Wrap an existing map.
    pub fn new_map(arena: &mut Arena<'_>, map: Map) -> Result<Self, ArenaError> {
        Self::new(arena, Value::Map(map))
    }

    /// Wrap an existing list.
    pub fn new_list(arena: &mut Arena<'_>, list: List) -> Result<Self, ArenaError> {
        Self::new(arena, Value::List(list))
    }

    /// Copy `s` into the arena as a NUL-terminated string.
    ///
    /// Bytes from the first NUL in `s` onward are dropped, so the stored
    /// string reads the same to C consumers as to [`ValueRef::compare`].
    pub fn new_string(arena: &mut Arena<'_>, s: impl AsRef<[u8]>) -> Result<Self, ArenaError> {
        Self::new(arena, Value::String(s.as_ref()))
    }

    /// A 32-bit integer value.
    pub fn new_int(arena: &mut Arena<'_>, v: i32) -> Result<Self, ArenaError> {
        Self::new(arena, Value::Int32(v))
    }

    /// A 64-bit integer value.
    pub fn new_long(arena: &mut Arena<'_>, v: i64) -> Result<Self, ArenaError> {
        Self::new(arena, Value::Int64(v))
    }

    /// A boolean value.
    pub fn new_bool(arena: &mut Arena<'_>, v: bool) -> Result<Self, ArenaError> {
        Self::new(arena, Value::Bool(v))
    }

    /// A float value.
    pub fn new_float(arena: &mut Arena<'_>, v: f64) -> Result<Self, ArenaError> {
        Self::new(arena, Value::Float(v))
    }

    /// Replace kind and payload in place. Strings are cut at the first NUL,
    /// as in [`ValueRef::new_string`].
    ///
    /// The handle keeps its identity, so containers holding it observe the
    /// new contents. The old payload is not reclaimed.
    pub fn set(self, arena: &mut Arena<'_>, value: Value<'_>) -> Result<(), ArenaError> {
        arena.verify(self.0)?;
        let header = store_payload(arena, value)?;
        arena.write(self.0, &header)
    }

    /// Decode the value. `None` for stale or foreign handles.
    pub fn get<'a>(self, arena: &'a Arena<'_>) -> Option<Value<'a>> {
        let header = arena.read(self.0).ok()?;
        let kind = ValueKind::from_tag(header.kind)?;
        let value = match kind {
            ValueKind::Map => Value::Map(Map(arena.rebind(header.payload))),
            ValueKind::List => Value::List(List(arena.rebind(header.payload))),
            ValueKind::String => Value::String(payload(arena, &header)?),
            ValueKind::Int32 => Value::Int32(i32::from_le_bytes(fixed(arena, &header, kind)?)),
            ValueKind::Int64 => Value::Int64(i64::from_le_bytes(fixed(arena, &header, kind)?)),
            ValueKind::Bool => Value::Bool(fixed::<1>(arena, &header, kind)?[0] != 0),
            ValueKind::Float => Value::Float(f64::from_le_bytes(fixed(arena, &header, kind)?)),
        };
        Some(value)
    }

    /// The kind tag, or `None` for stale or foreign handles.
    pub fn kind(self, arena: &Arena<'_>) -> Option<ValueKind> {
        let header = arena.read(self.0).ok()?;
        ValueKind::from_tag(header.kind)
    }

    /// The map payload, or `None` if this is not a map.
    pub fn get_map(self, arena: &Arena<'_>) -> Option<Map> {
        match self.get(arena) {
            Some(Value::Map(m)) => Some(m),
            _ => None,
        }
    }

    /// The list payload, or `None` if this is not a list.
    pub fn get_list(self, arena: &Arena<'_>) -> Option<List> {
        match self.get(arena) {
            Some(Value::List(l)) => Some(l),
            _ => None,
        }
    }

    /// String bytes without the trailing NUL, or `None` if this is not a string.
    pub fn get_string<'a>(self, arena: &'a Arena<'_>) -> Option<&'a [u8]> {
        match self.get(arena) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The string as UTF-8, or `None` if this is not a valid UTF-8 string.
    pub fn get_str<'a>(self, arena: &'a Arena<'_>) -> Option<&'a str> {
        std::str::from_utf8(self.get_string(arena)?).ok()
    }

    /// The 32-bit integer, or `0` on kind mismatch.
    pub fn get_int(self, arena: &Arena<'_>) -> i32 {
        match self.get(arena) {
            Some(Value::Int32(v)) => v,
            _ => 0,
        }
    }

    /// The 64-bit integer, or `0` on kind mismatch.
    pub fn get_long(self, arena: &Arena<'_>) -> i64 {
        match self.get(arena) {
            Some(Value::Int64(v)) => v,
            _ => 0,
        }
    }

    /// The boolean, or `false` on kind mismatch.
    pub fn get_bool(self, arena: &Arena<'_>) -> bool {
        match self.get(arena) {
            Some(Value::Bool(v)) => v,
            _ => false,
        }
    }

    /// The float, or `0.0` on kind mismatch.
    pub fn get_float(self, arena: &Arena<'_>) -> f64 {
        match self.get(arena) {
            Some(Value::Float(v)) => v,
            _ => 0.0,
        }
    }

    /// Value equality.
    ///
    /// Identical handles are always equal, even for `NaN` floats. Otherwise
    /// both values must decode and compare equal under [`Value`]'s rules.
    pub fn compare(arena: &Arena<'_>, a: ValueRef, b: ValueRef) -> bool {
        if a == b {
            return true;
        }
        match (a.get(arena), b.get(arena)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

/// Write the payload for `value` and return the header describing it.
fn store_payload(arena: &mut Arena<'_>, value: Value<'_>) -> Result<ValueHeader, ArenaError> {
    let kind = value.kind();
    let (payload, len) = match value {
        Value::Map(m) => {
            arena.verify(m.0)?;
            (m.0.offset(), 0)
        }
        Value::List(l) => {
            arena.verify(l.0)?;
            (l.0.offset(), 0)
        }
        Value::String(s) => {
            let s = until_nul(s);
            let region = arena.allocate_bytes(s.len() + 1)?;
            let out = arena.bytes_mut(region)?;
            out[..s.len()].copy_from_slice(s);
            out[s.len()] = 0;
            (region.offset(), s.len() as u32)
        }
        Value::Int32(v) => store_fixed(arena, &v.to_le_bytes())?,
        Value::Int64(v) => store_fixed(arena, &v.to_le_bytes())?,
        Value::Bool(v) => store_fixed(arena, &[u8::from(v)])?,
        Value::Float(v) => store_fixed(arena, &v.to_le_bytes())?,
    };
    Ok(ValueHeader {
        kind: kind.tag(),
        payload,
        len,
    })
}

/// The C-string view of `s`: everything before the first NUL.
fn until_nul(s: &[u8]) -> &[u8] {
    match s.iter().position(|&b| b == 0) {
        Some(end) => &s[..end],
        None => s,
    }
}

fn store_fixed(arena: &mut Arena<'_>, bytes: &[u8]) -> Result<(u32, u32), ArenaError> {
    let region = arena.allocate_var(bytes.len())?;
    arena.bytes_mut(region)?.copy_from_slice(bytes);
    Ok((region.offset(), bytes.len() as u32))
}

fn payload<'a>(arena: &'a Arena<'_>, header: &ValueHeader) -> Option<&'a [u8]> {
    arena
        .bytes(arena.rebind_region(header.payload, header.len))
        .ok()
}

/// Inline payload of a primitive. `None` unless both the kind's width
/// and the stored length are `N`.
fn fixed<const N: usize>(
    arena: &Arena<'_>,
    header: &ValueHeader,
    kind: ValueKind,
) -> Option<[u8; N]> {
    if kind.primitive_width() != Some(N) || header.len as usize != N {
        return None;
    }
    payload(arena, header)?.try_into().ok()
}
