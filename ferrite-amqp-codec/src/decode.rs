//! Dispatch-driven decoder over the AMQP 1.0 format-code table.
//!
//! Every decoder consumes a window positioned immediately after its format
//! code and returns the decoded [`Value`] together with the remaining
//! window. The table is dense: direct indexing by the 8-bit code, with
//! absent slots surfacing [`Error::InvalidFormatCode`].

use bytes::Bytes;

use crate::{
    error::Error,
    primitives::{Array, OrderedMap, Symbol, Timestamp, Uuid},
    value::Value,
};

/// Compounds (list, map, array, described) recurse through the dispatch
/// table; the depth bound keeps adversarial nesting from exhausting the
/// stack.
pub const MAX_NESTING_DEPTH: u8 = 64;

type DecodeFn = for<'a> fn(&'a [u8], u8) -> Result<(Value, &'a [u8]), Error>;

static DECODE_BY_CONSTRUCTOR: [Option<DecodeFn>; 256] = {
    let mut table: [Option<DecodeFn>; 256] = [None; 256];
    table[0x00] = Some(decode_described as DecodeFn);
    table[0x40] = Some(decode_null as DecodeFn);
    table[0x41] = Some(decode_true as DecodeFn);
    table[0x42] = Some(decode_false as DecodeFn);
    table[0x43] = Some(decode_uint0 as DecodeFn);
    table[0x44] = Some(decode_ulong0 as DecodeFn);
    table[0x45] = Some(decode_list0 as DecodeFn);
    table[0x50] = Some(decode_ubyte as DecodeFn);
    table[0x51] = Some(decode_byte as DecodeFn);
    table[0x52] = Some(decode_small_uint as DecodeFn);
    table[0x53] = Some(decode_small_ulong as DecodeFn);
    table[0x54] = Some(decode_small_int as DecodeFn);
    table[0x55] = Some(decode_small_long as DecodeFn);
    table[0x56] = Some(decode_boolean as DecodeFn);
    table[0x60] = Some(decode_ushort as DecodeFn);
    table[0x61] = Some(decode_short as DecodeFn);
    table[0x70] = Some(decode_uint as DecodeFn);
    table[0x71] = Some(decode_int as DecodeFn);
    table[0x72] = Some(decode_float as DecodeFn);
    table[0x80] = Some(decode_ulong as DecodeFn);
    table[0x81] = Some(decode_long as DecodeFn);
    table[0x82] = Some(decode_double as DecodeFn);
    table[0x83] = Some(decode_timestamp as DecodeFn);
    table[0x98] = Some(decode_uuid as DecodeFn);
    table[0xa0] = Some(decode_binary8 as DecodeFn);
    table[0xa1] = Some(decode_string8 as DecodeFn);
    table[0xa3] = Some(decode_symbol8 as DecodeFn);
    table[0xb0] = Some(decode_binary32 as DecodeFn);
    table[0xb1] = Some(decode_string32 as DecodeFn);
    table[0xb3] = Some(decode_symbol32 as DecodeFn);
    table[0xc0] = Some(decode_list8 as DecodeFn);
    table[0xc1] = Some(decode_map8 as DecodeFn);
    table[0xd0] = Some(decode_list32 as DecodeFn);
    table[0xd1] = Some(decode_map32 as DecodeFn);
    table[0xe0] = Some(decode_array8 as DecodeFn);
    table[0xf0] = Some(decode_array32 as DecodeFn);
    table
};

/// Decode one constructor-prefixed value from the front of `buf`.
///
/// Returns the value and the window remaining after all consumed bytes.
pub fn decode_value(buf: &[u8]) -> Result<(Value, &[u8]), Error> {
    decode_value_depth(buf, 0)
}

pub(crate) fn decode_value_depth(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    let (&code, rest) = buf.split_first().ok_or(Error::UnexpectedEnd)?;
    decode_with_constructor(code, rest, depth)
}

/// Dispatch the body of a value whose constructor byte has already been read.
pub(crate) fn decode_with_constructor(
    code: u8,
    buf: &[u8],
    depth: u8,
) -> Result<(Value, &[u8]), Error> {
    match DECODE_BY_CONSTRUCTOR[code as usize] {
        Some(decoder) => decoder(buf, depth),
        None => Err(Error::InvalidFormatCode(code)),
    }
}

#[inline]
fn take(buf: &[u8], n: usize, code: u8) -> Result<(&[u8], &[u8]), Error> {
    if buf.len() < n {
        return Err(Error::Truncated { code });
    }
    Ok(buf.split_at(n))
}

#[inline]
fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn decode_null(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    Ok((Value::Null, buf))
}

fn decode_true(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    Ok((Value::Bool(true), buf))
}

fn decode_false(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    Ok((Value::Bool(false), buf))
}

fn decode_uint0(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    Ok((Value::UInt(0), buf))
}

fn decode_ulong0(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    Ok((Value::ULong(0), buf))
}

fn decode_list0(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    Ok((Value::List(Vec::new()), buf))
}

fn decode_boolean(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 1, 0x56)?;
    Ok((Value::Bool(body[0] == 0x01), rest))
}

fn decode_ubyte(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 1, 0x50)?;
    Ok((Value::UByte(body[0]), rest))
}

fn decode_byte(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 1, 0x51)?;
    Ok((Value::Byte(body[0] as i8), rest))
}

fn decode_small_uint(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 1, 0x52)?;
    Ok((Value::UInt(u32::from(body[0])), rest))
}

fn decode_small_ulong(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 1, 0x53)?;
    Ok((Value::ULong(u64::from(body[0])), rest))
}

fn decode_small_int(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 1, 0x54)?;
    Ok((Value::Int(i32::from(body[0] as i8)), rest))
}

fn decode_small_long(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 1, 0x55)?;
    Ok((Value::Long(i64::from(body[0] as i8)), rest))
}

fn decode_ushort(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 2, 0x60)?;
    Ok((Value::UShort(u16::from_be_bytes([body[0], body[1]])), rest))
}

fn decode_short(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 2, 0x61)?;
    Ok((Value::Short(i16::from_be_bytes([body[0], body[1]])), rest))
}

fn decode_uint(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 4, 0x70)?;
    Ok((Value::UInt(be_u32(body)), rest))
}

fn decode_int(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 4, 0x71)?;
    Ok((
        Value::Int(i32::from_be_bytes([body[0], body[1], body[2], body[3]])),
        rest,
    ))
}

fn decode_float(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 4, 0x72)?;
    let bits = f32::from_be_bytes([body[0], body[1], body[2], body[3]]);
    Ok((Value::Float(bits.into()), rest))
}

fn decode_ulong(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 8, 0x80)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(body);
    Ok((Value::ULong(u64::from_be_bytes(raw)), rest))
}

fn decode_long(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 8, 0x81)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(body);
    Ok((Value::Long(i64::from_be_bytes(raw)), rest))
}

fn decode_double(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 8, 0x82)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(body);
    Ok((Value::Double(f64::from_be_bytes(raw).into()), rest))
}

fn decode_timestamp(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 8, 0x83)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(body);
    Ok((
        Value::Timestamp(Timestamp::from(i64::from_be_bytes(raw))),
        rest,
    ))
}

fn decode_uuid(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (body, rest) = take(buf, 16, 0x98)?;
    let mut raw = [0u8; 16];
    raw.copy_from_slice(body);
    Ok((Value::Uuid(Uuid::from(raw)), rest))
}

/// Zero-length binary decodes to the absent value, not an empty blob.
fn decode_binary8(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 1, 0xa0)?;
    let (body, rest) = take(rest, head[0] as usize, 0xa0)?;
    Ok((binary_or_absent(body), rest))
}

fn decode_binary32(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 4, 0xb0)?;
    let (body, rest) = take(rest, be_u32(head) as usize, 0xb0)?;
    Ok((binary_or_absent(body), rest))
}

fn binary_or_absent(body: &[u8]) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        Value::Binary(Bytes::copy_from_slice(body))
    }
}

fn decode_string8(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 1, 0xa1)?;
    let (body, rest) = take(rest, head[0] as usize, 0xa1)?;
    Ok((string_or_absent(body)?, rest))
}

fn decode_string32(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 4, 0xb1)?;
    let (body, rest) = take(rest, be_u32(head) as usize, 0xb1)?;
    Ok((string_or_absent(body)?, rest))
}

fn string_or_absent(body: &[u8]) -> Result<Value, Error> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(Value::String(std::str::from_utf8(body)?.to_string()))
}

fn decode_symbol8(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 1, 0xa3)?;
    let (body, rest) = take(rest, head[0] as usize, 0xa3)?;
    Ok((symbol_or_absent(body)?, rest))
}

fn decode_symbol32(buf: &[u8], _depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 4, 0xb3)?;
    let (body, rest) = take(rest, be_u32(head) as usize, 0xb3)?;
    Ok((symbol_or_absent(body)?, rest))
}

fn symbol_or_absent(body: &[u8]) -> Result<Value, Error> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(Value::Symbol(Symbol::new(std::str::from_utf8(body)?)))
}

fn decode_list8(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    // head = [size, count]; the size byte is not re-validated, the per-item
    // decoders bound every read
    let (head, rest) = take(buf, 2, 0xc0)?;
    decode_list_items(rest, head[1] as usize, depth)
}

fn decode_list32(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 8, 0xd0)?;
    decode_list_items(rest, be_u32(&head[4..8]) as usize, depth)
}

fn decode_list_items(mut buf: &[u8], count: usize, depth: u8) -> Result<(Value, &[u8]), Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::NestingLimit);
    }
    let mut values = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let (value, rest) = decode_value_depth(buf, depth + 1)?;
        values.push(value);
        buf = rest;
    }
    Ok((Value::List(values), buf))
}

fn decode_map8(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 2, 0xc1)?;
    decode_map_items(rest, u32::from(head[1]), depth)
}

fn decode_map32(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 8, 0xd1)?;
    decode_map_items(rest, be_u32(&head[4..8]), depth)
}

fn decode_map_items(mut buf: &[u8], count: u32, depth: u8) -> Result<(Value, &[u8]), Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::NestingLimit);
    }
    // The wire count is keys plus values; a key without a value is malformed
    if count % 2 != 0 {
        return Err(Error::OddMapCount(count));
    }
    let entries = (count / 2) as usize;
    let mut values = OrderedMap::with_capacity(entries.min(64));
    for _ in 0..entries {
        let (key, rest) = decode_value_depth(buf, depth + 1)?;
        let (value, rest) = decode_value_depth(rest, depth + 1)?;
        values.insert(key, value);
        buf = rest;
    }
    Ok((Value::Map(values), buf))
}

fn decode_array8(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    // head = [size, count, subconstructor]
    let (head, rest) = take(buf, 3, 0xe0)?;
    decode_array_items(rest, head[1] as usize, head[2], depth)
}

fn decode_array32(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    let (head, rest) = take(buf, 9, 0xf0)?;
    decode_array_items(rest, be_u32(&head[4..8]) as usize, head[8], depth)
}

/// The single sub-constructor governs every element; element bodies follow
/// without per-element constructor bytes.
fn decode_array_items(
    mut buf: &[u8],
    count: usize,
    subconstructor: u8,
    depth: u8,
) -> Result<(Value, &[u8]), Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::NestingLimit);
    }
    let mut values = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let (value, rest) = decode_with_constructor(subconstructor, buf, depth + 1)?;
        values.push(value);
        buf = rest;
    }
    Ok((Value::Array(Array(values)), buf))
}

/// Layout: descriptor value then body value, each constructor-prefixed.
///
/// A small-ulong descriptor naming one of the delivery outcomes is projected
/// to a single-entry map keyed by the outcome name; any other descriptor is
/// dropped and the body returned unwrapped.
fn decode_described(buf: &[u8], depth: u8) -> Result<(Value, &[u8]), Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::NestingLimit);
    }
    let (descriptor, buf) = decode_value_depth(buf, depth + 1)?;
    let (value, buf) = decode_value_depth(buf, depth + 1)?;
    match descriptor {
        Value::ULong(code @ 35..=39) => {
            let mut composite = OrderedMap::with_capacity(1);
            composite.insert(Value::String(outcome_name(code).to_string()), value);
            Ok((Value::Map(composite), buf))
        }
        _ => Ok((value, buf)),
    }
}

fn outcome_name(code: u64) -> &'static str {
    match code {
        35 => "received",
        36 => "accepted",
        37 => "rejected",
        38 => "released",
        _ => "modified",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_scalars() {
        let (value, rest) = decode_value(&[0x40]).unwrap();
        assert_eq!(value, Value::Null);
        assert!(rest.is_empty());

        let (value, _) = decode_value(&[0x41]).unwrap();
        assert_eq!(value, Value::Bool(true));
        let (value, _) = decode_value(&[0x56, 0x01]).unwrap();
        assert_eq!(value, Value::Bool(true));
        let (value, _) = decode_value(&[0x56, 0x00]).unwrap();
        assert_eq!(value, Value::Bool(false));

        let (value, _) = decode_value(&[0x60, 0x13, 0x88]).unwrap();
        assert_eq!(value, Value::UShort(5000));

        let (value, _) = decode_value(&[0x54, 0xff]).unwrap();
        assert_eq!(value, Value::Int(-1));

        let (value, _) = decode_value(&[0x70, 0x00, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(value, Value::UInt(65536));

        let (value, _) = decode_value(&[0x83, 0, 0, 0, 0, 0, 0, 0x04, 0xd2]).unwrap();
        assert_eq!(value, Value::Timestamp(Timestamp::from(1234)));
    }

    #[test]
    fn remaining_window_is_returned() {
        let (value, rest) = decode_value(&[0x52, 0x09, 0xde, 0xad]).unwrap();
        assert_eq!(value, Value::UInt(9));
        assert_eq!(rest, &[0xde, 0xad]);
    }

    #[test]
    fn unknown_format_code_is_rejected() {
        // char (0x73) sits between listed codes but has no table entry
        assert_eq!(
            decode_value(&[0x73, 0, 0, 0, 0x61]),
            Err(Error::InvalidFormatCode(0x73))
        );
    }

    #[test]
    fn truncated_scalar_names_the_code() {
        assert_eq!(
            decode_value(&[0x70, 0x00, 0x01]),
            Err(Error::Truncated { code: 0x70 })
        );
    }

    #[test]
    fn zero_length_variable_values_decode_to_absent() {
        let (value, _) = decode_value(&[0xa0, 0x00]).unwrap();
        assert_eq!(value, Value::Null);
        let (value, _) = decode_value(&[0xa1, 0x00]).unwrap();
        assert_eq!(value, Value::Null);
        let (value, _) = decode_value(&[0xa3, 0x00]).unwrap();
        assert_eq!(value, Value::Null);
        let (value, _) = decode_value(&[0xb0, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn variable_values() {
        let (value, rest) = decode_value(&[0xa0, 0x03, 1, 2, 3]).unwrap();
        assert_eq!(value, Value::Binary(Bytes::from_static(&[1, 2, 3])));
        assert!(rest.is_empty());

        let (value, _) = decode_value(&[0xa1, 0x04, b'a', b'm', b'q', b'p']).unwrap();
        assert_eq!(value, Value::String("amqp".to_string()));

        let (value, _) = decode_value(&[0xa3, 0x02, b'o', b'k']).unwrap();
        assert_eq!(value, Value::Symbol(Symbol::new("ok")));
    }

    #[test]
    fn truncated_variable_value() {
        assert_eq!(
            decode_value(&[0xa1, 0x05, b'a']),
            Err(Error::Truncated { code: 0xa1 })
        );
    }

    #[test]
    fn list8_reads_count_items() {
        // size is 5, count 2: smalluint 7, true
        let buf = [0xc0, 0x05, 0x02, 0x52, 0x07, 0x41];
        let (value, rest) = decode_value(&buf).unwrap();
        assert_eq!(value, Value::List(vec![Value::UInt(7), Value::Bool(true)]));
        assert!(rest.is_empty());
    }

    #[test]
    fn list32_count_is_read_after_size() {
        let buf = [
            0xd0, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x01, 0x53, 0x2a,
        ];
        let (value, _) = decode_value(&buf).unwrap();
        assert_eq!(value, Value::List(vec![Value::ULong(42)]));
    }

    #[test]
    fn map_preserves_insertion_order() {
        // two entries (wire count 4): "b" -> 2, "a" -> 1
        let buf = [
            0xc1, 0x0b, 0x04, 0xa1, 0x01, b'b', 0x52, 0x02, 0xa1, 0x01, b'a', 0x52, 0x01,
        ];
        let (value, _) = decode_value(&buf).unwrap();
        let map = match value {
            Value::Map(map) => map,
            other => panic!("expected map, got {:?}", other),
        };
        let keys: Vec<_> = map.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![
                Value::String("b".to_string()),
                Value::String("a".to_string())
            ]
        );
    }

    #[test]
    fn odd_map_count_is_rejected() {
        let buf = [0xc1, 0x05, 0x03, 0x52, 0x01, 0x52, 0x02, 0x52, 0x03];
        assert_eq!(decode_value(&buf), Err(Error::OddMapCount(3)));
    }

    #[test]
    fn array_elements_share_the_subconstructor() {
        // size 6, count 3, subconstructor smalluint
        let buf = [0xe0, 0x06, 0x03, 0x52, 0x01, 0x02, 0x03];
        let (value, rest) = decode_value(&buf).unwrap();
        assert_eq!(
            value,
            Value::Array(Array(vec![
                Value::UInt(1),
                Value::UInt(2),
                Value::UInt(3)
            ]))
        );
        assert!(rest.is_empty());

        // same bodies under a different subconstructor decode differently
        let buf = [0xe0, 0x06, 0x03, 0x54, 0x01, 0x02, 0x03];
        let (value, _) = decode_value(&buf).unwrap();
        assert_eq!(
            value,
            Value::Array(Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );
    }

    #[test]
    fn array32_layout() {
        let buf = [
            0xf0, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x02, 0x60, 0x00, 0x01, 0x00, 0x02,
        ];
        let (value, _) = decode_value(&buf).unwrap();
        assert_eq!(
            value,
            Value::Array(Array(vec![Value::UShort(1), Value::UShort(2)]))
        );
    }

    #[test]
    fn described_outcome_projects_to_named_map() {
        // 0x00, smallulong 36 (accepted), list0
        let buf = [0x00, 0x53, 0x24, 0x45];
        let (value, rest) = decode_value(&buf).unwrap();
        let mut expected = OrderedMap::new();
        expected.insert(
            Value::String("accepted".to_string()),
            Value::List(Vec::new()),
        );
        assert_eq!(value, Value::Map(expected));
        assert!(rest.is_empty());
    }

    #[test]
    fn every_outcome_code_has_its_name() {
        for (code, name) in [
            (0x23u8, "received"),
            (0x24, "accepted"),
            (0x25, "rejected"),
            (0x26, "released"),
            (0x27, "modified"),
        ] {
            let buf = [0x00, 0x53, code, 0x45];
            let (value, _) = decode_value(&buf).unwrap();
            let map = match value {
                Value::Map(map) => map,
                other => panic!("expected map, got {:?}", other),
            };
            assert!(map.contains_key(&Value::String(name.to_string())));
        }
    }

    #[test]
    fn unrecognized_descriptor_unwraps_the_body() {
        // descriptor smallulong 0x28 (source composite) is not an outcome
        let buf = [0x00, 0x53, 0x28, 0x52, 0x0d];
        let (value, _) = decode_value(&buf).unwrap();
        assert_eq!(value, Value::UInt(13));
    }

    #[test]
    fn nesting_is_bounded() {
        // list8 of one element which is itself a list8 of one element, ...
        let mut buf = Vec::new();
        for _ in 0..(MAX_NESTING_DEPTH as usize + 2) {
            buf.extend_from_slice(&[0xc0, 0x02, 0x01]);
        }
        buf.push(0x40);
        assert_eq!(decode_value(&buf), Err(Error::NestingLimit));
    }

    #[test]
    fn empty_window_is_unexpected_end() {
        assert_eq!(decode_value(&[]), Err(Error::UnexpectedEnd));
    }
}
