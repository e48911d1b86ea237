//! Primitive, size, string, and array decoders.
//!
//! All multi-byte values are little-endian. The same tag table drives both
//! top-level values and array elements; only the top level accepts the array
//! tag.

use std::io::Read;

use crate::cursor::ByteCursor;
use crate::error::{GgufError, Result, TagContext};
use crate::value::{GgufValue, GgufValueType, GgufVersion};

/// Upper bound on the capacity reserved up front for an array.
const ARRAY_PREALLOC_LIMIT: u64 = 4096;

#[inline]
pub fn read_u8<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u8> {
    Ok(u8::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_i8<R: Read>(cursor: &mut ByteCursor<R>) -> Result<i8> {
    Ok(i8::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_u16<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u16> {
    Ok(u16::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_i16<R: Read>(cursor: &mut ByteCursor<R>) -> Result<i16> {
    Ok(i16::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_u32<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u32> {
    Ok(u32::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_i32<R: Read>(cursor: &mut ByteCursor<R>) -> Result<i32> {
    Ok(i32::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_u64<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u64> {
    Ok(u64::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_i64<R: Read>(cursor: &mut ByteCursor<R>) -> Result<i64> {
    Ok(i64::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_f32<R: Read>(cursor: &mut ByteCursor<R>) -> Result<f32> {
    Ok(f32::from_le_bytes(cursor.read_array()?))
}

#[inline]
pub fn read_f64<R: Read>(cursor: &mut ByteCursor<R>) -> Result<f64> {
    Ok(f64::from_le_bytes(cursor.read_array()?))
}

/// One byte; any nonzero value is `true`.
#[inline]
pub fn read_bool<R: Read>(cursor: &mut ByteCursor<R>) -> Result<bool> {
    Ok(read_u8(cursor)? != 0)
}

/// Count or length field whose width depends on the format version.
pub fn read_size<R: Read>(cursor: &mut ByteCursor<R>, version: GgufVersion) -> Result<u64> {
    match version {
        GgufVersion::V1 => read_u32(cursor).map(u64::from),
        GgufVersion::V2 | GgufVersion::V3 => read_u64(cursor),
    }
}

/// Length-prefixed text with every NUL byte removed.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_string<R: Read>(cursor: &mut ByteCursor<R>, version: GgufVersion) -> Result<String> {
    let len = read_size(cursor, version)?;
    let bytes = cursor.read_len(len)?;
    Ok(strip_nul(&String::from_utf8_lossy(bytes)))
}

/// Remove NUL padding some writers leave inside strings.
#[inline]
pub fn strip_nul(s: &str) -> String {
    s.replace('\0', "")
}

/// Array body: element tag, versioned count, then that many elements.
pub fn read_array<R: Read>(cursor: &mut ByteCursor<R>, version: GgufVersion) -> Result<GgufValue> {
    let tag = read_u32(cursor)?;
    let (element_type, decode) = GgufValueType::from_u32(tag)
        .and_then(|ty| scalar_decoder::<R>(ty).map(|decode| (ty, decode)))
        .ok_or(GgufError::UnknownType { tag, context: TagContext::ArrayElement })?;

    let count = read_size(cursor, version)?;
    let mut items = Vec::with_capacity(count.min(ARRAY_PREALLOC_LIMIT) as usize);
    for _ in 0..count {
        items.push(decode(cursor, version)?);
    }
    Ok(GgufValue::Array(element_type, items))
}

/// Decode the value following a top-level type tag.
pub fn read_value<R: Read>(
    cursor: &mut ByteCursor<R>,
    version: GgufVersion,
    tag: u32,
) -> Result<GgufValue> {
    match GgufValueType::from_u32(tag) {
        Some(GgufValueType::Array) => read_array(cursor, version),
        Some(ty) => match scalar_decoder::<R>(ty) {
            Some(decode) => decode(cursor, version),
            None => Err(GgufError::UnknownType { tag, context: TagContext::Value }),
        },
        None => Err(GgufError::UnknownType { tag, context: TagContext::Value }),
    }
}

type Decoder<R> = fn(&mut ByteCursor<R>, GgufVersion) -> Result<GgufValue>;

/// Tag table shared by top-level values and array elements.
///
/// Returns `None` for [`GgufValueType::Array`]: arrays only appear at the top
/// level and are handled by [`read_array`].
fn scalar_decoder<R: Read>(ty: GgufValueType) -> Option<Decoder<R>> {
    let decode: Decoder<R> = match ty {
        GgufValueType::Uint8 => |c, _| read_u8(c).map(GgufValue::U8),
        GgufValueType::Int8 => |c, _| read_i8(c).map(GgufValue::I8),
        GgufValueType::Uint16 => |c, _| read_u16(c).map(GgufValue::U16),
        GgufValueType::Int16 => |c, _| read_i16(c).map(GgufValue::I16),
        GgufValueType::Uint32 => |c, _| read_u32(c).map(GgufValue::U32),
        GgufValueType::Int32 => |c, _| read_i32(c).map(GgufValue::I32),
        GgufValueType::Float32 => |c, _| read_f32(c).map(GgufValue::F32),
        GgufValueType::Bool => |c, _| read_bool(c).map(GgufValue::Bool),
        GgufValueType::String => |c, v| read_string(c, v).map(GgufValue::String),
        GgufValueType::Uint64 => |c, _| read_u64(c).map(GgufValue::U64),
        GgufValueType::Int64 => |c, _| read_i64(c).map(GgufValue::I64),
        GgufValueType::Float64 => |c, _| read_f64(c).map(GgufValue::F64),
        GgufValueType::Array => return None,
    };
    Some(decode)
}
