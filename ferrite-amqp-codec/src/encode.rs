//! Encoder for [`Value`], symmetric with the decoder.
//!
//! Scalars take the smallest wire encoding that can carry them (uint0,
//! smalluint, the zero-width booleans). Compounds are sized bottom-up so
//! the 8-bit forms are used whenever both the count and the body fit.

use bytes::{BufMut, BytesMut};

use crate::{
    described::Described,
    error::Error,
    format_code::FormatCode,
    primitives::{Array, OrderedMap},
    value::Value,
};

/// Encode one constructor-prefixed value to the end of `buf`.
pub fn encode_value(value: &Value, buf: &mut BytesMut) -> Result<(), Error> {
    match value {
        Value::Described(described) => encode_described(described, buf),
        Value::Null => {
            buf.put_u8(FormatCode::Null as u8);
            Ok(())
        }
        Value::Bool(val) => {
            let code = match val {
                true => FormatCode::BooleanTrue,
                false => FormatCode::BooleanFalse,
            };
            buf.put_u8(code as u8);
            Ok(())
        }
        Value::UByte(val) => {
            buf.put_u8(FormatCode::UByte as u8);
            buf.put_u8(*val);
            Ok(())
        }
        Value::UShort(val) => {
            buf.put_u8(FormatCode::UShort as u8);
            buf.put_u16(*val);
            Ok(())
        }
        Value::UInt(val) => {
            match val {
                0 => buf.put_u8(FormatCode::UInt0 as u8),
                1..=255 => {
                    buf.put_u8(FormatCode::SmallUInt as u8);
                    buf.put_u8(*val as u8);
                }
                _ => {
                    buf.put_u8(FormatCode::UInt as u8);
                    buf.put_u32(*val);
                }
            }
            Ok(())
        }
        Value::ULong(val) => {
            match val {
                0 => buf.put_u8(FormatCode::ULong0 as u8),
                1..=255 => {
                    buf.put_u8(FormatCode::SmallULong as u8);
                    buf.put_u8(*val as u8);
                }
                _ => {
                    buf.put_u8(FormatCode::ULong as u8);
                    buf.put_u64(*val);
                }
            }
            Ok(())
        }
        Value::Byte(val) => {
            buf.put_u8(FormatCode::Byte as u8);
            buf.put_i8(*val);
            Ok(())
        }
        Value::Short(val) => {
            buf.put_u8(FormatCode::Short as u8);
            buf.put_i16(*val);
            Ok(())
        }
        Value::Int(val) => {
            if (-128..=127).contains(val) {
                buf.put_u8(FormatCode::SmallInt as u8);
                buf.put_i8(*val as i8);
            } else {
                buf.put_u8(FormatCode::Int as u8);
                buf.put_i32(*val);
            }
            Ok(())
        }
        Value::Long(val) => {
            if (-128..=127).contains(val) {
                buf.put_u8(FormatCode::SmallLong as u8);
                buf.put_i8(*val as i8);
            } else {
                buf.put_u8(FormatCode::Long as u8);
                buf.put_i64(*val);
            }
            Ok(())
        }
        Value::Float(val) => {
            buf.put_u8(FormatCode::Float as u8);
            buf.put_f32(val.0);
            Ok(())
        }
        Value::Double(val) => {
            buf.put_u8(FormatCode::Double as u8);
            buf.put_f64(val.0);
            Ok(())
        }
        Value::Timestamp(val) => {
            buf.put_u8(FormatCode::Timestamp as u8);
            buf.put_i64(val.milliseconds());
            Ok(())
        }
        Value::Uuid(val) => {
            buf.put_u8(FormatCode::Uuid as u8);
            buf.put_slice(val.as_bytes());
            Ok(())
        }
        Value::Binary(val) => {
            encode_variable(val, FormatCode::VBin8, FormatCode::VBin32, buf)
        }
        Value::String(val) => {
            encode_variable(val.as_bytes(), FormatCode::Str8, FormatCode::Str32, buf)
        }
        Value::Symbol(val) => encode_variable(
            val.as_str().as_bytes(),
            FormatCode::Sym8,
            FormatCode::Sym32,
            buf,
        ),
        Value::List(values) => encode_list(values, buf),
        Value::Map(map) => encode_map(map, buf),
        Value::Array(values) => encode_array(values, buf),
    }
}

/// Encode a value into a fresh byte vector.
pub fn to_vec(value: &Value) -> Result<Vec<u8>, Error> {
    let mut buf = BytesMut::new();
    encode_value(value, &mut buf)?;
    Ok(buf.to_vec())
}

fn encode_variable(
    body: &[u8],
    code8: FormatCode,
    code32: FormatCode,
    buf: &mut BytesMut,
) -> Result<(), Error> {
    if body.len() <= u8::MAX as usize {
        buf.put_u8(code8 as u8);
        buf.put_u8(body.len() as u8);
    } else if body.len() <= u32::MAX as usize {
        buf.put_u8(code32 as u8);
        buf.put_u32(body.len() as u32);
    } else {
        return Err(Error::InvalidLength);
    }
    buf.put_slice(body);
    Ok(())
}

/// Body of a variable-width array element: the wide sub-constructors
/// (Str32/Sym32/VBin32) always carry a four-byte length prefix.
fn encode_wide_variable(body: &[u8], buf: &mut BytesMut) -> Result<(), Error> {
    if body.len() > u32::MAX as usize {
        return Err(Error::InvalidLength);
    }
    buf.put_u32(body.len() as u32);
    buf.put_slice(body);
    Ok(())
}

fn encode_list(values: &[Value], buf: &mut BytesMut) -> Result<(), Error> {
    if values.is_empty() {
        buf.put_u8(FormatCode::List0 as u8);
        return Ok(());
    }

    let mut items = BytesMut::new();
    for value in values {
        encode_value(value, &mut items)?;
    }
    encode_compound(FormatCode::List8, FormatCode::List32, values.len(), &items, buf)
}

fn encode_map(map: &OrderedMap<Value, Value>, buf: &mut BytesMut) -> Result<(), Error> {
    let mut items = BytesMut::new();
    for (key, value) in map {
        encode_value(key, &mut items)?;
        encode_value(value, &mut items)?;
    }
    // the wire count is keys plus values
    encode_compound(FormatCode::Map8, FormatCode::Map32, map.len() * 2, &items, buf)
}

fn encode_compound(
    code8: FormatCode,
    code32: FormatCode,
    count: usize,
    items: &BytesMut,
    buf: &mut BytesMut,
) -> Result<(), Error> {
    // the size field counts everything after itself: the count field plus
    // the encoded items
    if count <= u8::MAX as usize && items.len() + 1 <= u8::MAX as usize {
        buf.put_u8(code8 as u8);
        buf.put_u8((items.len() + 1) as u8);
        buf.put_u8(count as u8);
    } else if count <= u32::MAX as usize && items.len() + 4 <= u32::MAX as usize {
        buf.put_u8(code32 as u8);
        buf.put_u32((items.len() + 4) as u32);
        buf.put_u32(count as u32);
    } else {
        return Err(Error::InvalidLength);
    }
    buf.put_slice(items);
    Ok(())
}

fn encode_array(values: &Array<Value>, buf: &mut BytesMut) -> Result<(), Error> {
    let subconstructor = values
        .first()
        .map(Value::wide_format_code)
        .unwrap_or(FormatCode::Null);

    let mut bodies = BytesMut::new();
    for value in values.iter() {
        if value.wide_format_code() != subconstructor {
            return Err(Error::HeterogeneousArray);
        }
        encode_wide_body(value, &mut bodies)?;
    }

    let count = values.len();
    // size counts the count field, the sub-constructor, and the bodies
    if count <= u8::MAX as usize && bodies.len() + 2 <= u8::MAX as usize {
        buf.put_u8(FormatCode::Array8 as u8);
        buf.put_u8((bodies.len() + 2) as u8);
        buf.put_u8(count as u8);
    } else if count <= u32::MAX as usize && bodies.len() + 5 <= u32::MAX as usize {
        buf.put_u8(FormatCode::Array32 as u8);
        buf.put_u32((bodies.len() + 5) as u32);
        buf.put_u32(count as u32);
    } else {
        return Err(Error::InvalidLength);
    }
    buf.put_u8(subconstructor as u8);
    buf.put_slice(&bodies);
    Ok(())
}

/// Encode the body of an array element under its shared wide constructor.
fn encode_wide_body(value: &Value, buf: &mut BytesMut) -> Result<(), Error> {
    match value {
        Value::Null => Ok(()),
        Value::Bool(val) => {
            buf.put_u8(u8::from(*val));
            Ok(())
        }
        Value::UByte(val) => {
            buf.put_u8(*val);
            Ok(())
        }
        Value::UShort(val) => {
            buf.put_u16(*val);
            Ok(())
        }
        Value::UInt(val) => {
            buf.put_u32(*val);
            Ok(())
        }
        Value::ULong(val) => {
            buf.put_u64(*val);
            Ok(())
        }
        Value::Byte(val) => {
            buf.put_i8(*val);
            Ok(())
        }
        Value::Short(val) => {
            buf.put_i16(*val);
            Ok(())
        }
        Value::Int(val) => {
            buf.put_i32(*val);
            Ok(())
        }
        Value::Long(val) => {
            buf.put_i64(*val);
            Ok(())
        }
        Value::Float(val) => {
            buf.put_f32(val.0);
            Ok(())
        }
        Value::Double(val) => {
            buf.put_f64(val.0);
            Ok(())
        }
        Value::Timestamp(val) => {
            buf.put_i64(val.milliseconds());
            Ok(())
        }
        Value::Uuid(val) => {
            buf.put_slice(val.as_bytes());
            Ok(())
        }
        Value::Binary(val) => encode_wide_variable(val, buf),
        Value::String(val) => encode_wide_variable(val.as_bytes(), buf),
        Value::Symbol(val) => encode_wide_variable(val.as_str().as_bytes(), buf),
        Value::List(values) => {
            let mut items = BytesMut::new();
            for value in values {
                encode_value(value, &mut items)?;
            }
            if items.len() + 4 > u32::MAX as usize {
                return Err(Error::InvalidLength);
            }
            buf.put_u32((items.len() + 4) as u32);
            buf.put_u32(values.len() as u32);
            buf.put_slice(&items);
            Ok(())
        }
        Value::Map(map) => {
            let mut items = BytesMut::new();
            for (key, value) in map {
                encode_value(key, &mut items)?;
                encode_value(value, &mut items)?;
            }
            if items.len() + 4 > u32::MAX as usize {
                return Err(Error::InvalidLength);
            }
            buf.put_u32((items.len() + 4) as u32);
            buf.put_u32((map.len() * 2) as u32);
            buf.put_slice(&items);
            Ok(())
        }
        Value::Array(values) => {
            // nested arrays keep the full array32 body layout; the caller's
            // sub-constructor already names the 0xf0 code
            let sub = values
                .first()
                .map(Value::wide_format_code)
                .unwrap_or(FormatCode::Null);
            let mut bodies = BytesMut::new();
            for value in values.iter() {
                if value.wide_format_code() != sub {
                    return Err(Error::HeterogeneousArray);
                }
                encode_wide_body(value, &mut bodies)?;
            }
            buf.put_u32((bodies.len() + 5) as u32);
            buf.put_u32(values.len() as u32);
            buf.put_u8(sub as u8);
            buf.put_slice(&bodies);
            Ok(())
        }
        Value::Described(described) => {
            encode_value(&described.descriptor, buf)?;
            encode_value(&described.value, buf)
        }
    }
}

fn encode_described(described: &Described, buf: &mut BytesMut) -> Result<(), Error> {
    buf.put_u8(FormatCode::Described as u8);
    encode_value(&described.descriptor, buf)?;
    encode_value(&described.value, buf)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::decode::decode_value;
    use crate::primitives::{Symbol, Timestamp, Uuid};

    fn assert_round_trip(value: Value) {
        let buf = to_vec(&value).unwrap();
        let (decoded, rest) = decode_value(&buf).unwrap();
        assert_eq!(decoded, value, "bytes {:02x?}", buf);
        assert!(rest.is_empty());
    }

    #[test]
    fn scalar_round_trips() {
        assert_round_trip(Value::Null);
        assert_round_trip(Value::Bool(true));
        assert_round_trip(Value::Bool(false));
        assert_round_trip(Value::UByte(13));
        assert_round_trip(Value::UShort(1313));
        assert_round_trip(Value::UInt(0));
        assert_round_trip(Value::UInt(255));
        assert_round_trip(Value::UInt(u32::MAX));
        assert_round_trip(Value::ULong(0));
        assert_round_trip(Value::ULong(255));
        assert_round_trip(Value::ULong(u64::MAX));
        assert_round_trip(Value::Byte(-13));
        assert_round_trip(Value::Short(-1313));
        assert_round_trip(Value::Int(-1));
        assert_round_trip(Value::Int(i32::MIN));
        assert_round_trip(Value::Long(127));
        assert_round_trip(Value::Long(i64::MIN));
        assert_round_trip(Value::from(1.313f32));
        assert_round_trip(Value::from(13.13f64));
        assert_round_trip(Value::Timestamp(Timestamp::from(1_624_000_000_000)));
        assert_round_trip(Value::Uuid(Uuid::from([7u8; 16])));
    }

    #[test]
    fn variable_round_trips() {
        assert_round_trip(Value::Binary(Bytes::from_static(&[1, 2, 3, 4])));
        assert_round_trip(Value::String("amqp".to_string()));
        assert_round_trip(Value::Symbol(Symbol::new("amqp:link:stolen")));
        // a body longer than 255 bytes forces the 32-bit form
        assert_round_trip(Value::String("x".repeat(300)));
    }

    #[test]
    fn zero_length_values_round_trip_to_absent() {
        let buf = to_vec(&Value::Binary(Bytes::new())).unwrap();
        let (decoded, _) = decode_value(&buf).unwrap();
        assert_eq!(decoded, Value::Null);

        let buf = to_vec(&Value::String(String::new())).unwrap();
        let (decoded, _) = decode_value(&buf).unwrap();
        assert_eq!(decoded, Value::Null);

        let buf = to_vec(&Value::Symbol(Symbol::new(""))).unwrap();
        let (decoded, _) = decode_value(&buf).unwrap();
        assert_eq!(decoded, Value::Null);
    }

    #[test]
    fn compound_round_trips() {
        assert_round_trip(Value::List(Vec::new()));
        assert_round_trip(Value::List(vec![
            Value::UInt(1),
            Value::String("two".to_string()),
            Value::Null,
        ]));

        let mut map = OrderedMap::new();
        map.insert(Value::Symbol(Symbol::new("b")), Value::UInt(2));
        map.insert(Value::Symbol(Symbol::new("a")), Value::UInt(1));
        assert_round_trip(Value::Map(map));

        assert_round_trip(Value::Array(Array(vec![
            Value::Int(1),
            Value::Int(-300),
            Value::Int(3),
        ])));
    }

    #[test]
    fn long_list_uses_list32() {
        let values: Vec<Value> = (0..300u32).map(Value::UInt).collect();
        let buf = to_vec(&Value::List(values.clone())).unwrap();
        assert_eq!(buf[0], 0xd0);
        let (decoded, _) = decode_value(&buf).unwrap();
        assert_eq!(decoded, Value::List(values));
    }

    #[test]
    fn array_has_no_per_element_constructor() {
        let buf = to_vec(&Value::Array(Array(vec![
            Value::UInt(1),
            Value::UInt(2),
        ])))
        .unwrap();
        // array8, size, count, sub-constructor (wide uint), then two bare bodies
        assert_eq!(
            buf,
            vec![0xe0, 0x0a, 0x02, 0x70, 0, 0, 0, 1, 0, 0, 0, 2]
        );
    }

    #[test]
    fn variable_element_arrays_round_trip() {
        assert_round_trip(Value::Array(Array(vec![
            Value::String("first".to_string()),
            Value::String("second".to_string()),
            Value::String("x".repeat(300)),
        ])));
        assert_round_trip(Value::Array(Array(vec![
            Value::Binary(Bytes::from_static(&[1, 2, 3])),
            Value::Binary(Bytes::from_static(&[4])),
        ])));
        assert_round_trip(Value::Array(Array(vec![
            Value::Symbol(Symbol::new("amqp:link:stolen")),
            Value::Symbol(Symbol::new("amqp:link:redirect")),
        ])));
    }

    #[test]
    fn string_array_elements_carry_wide_length_prefixes() {
        let buf = to_vec(&Value::Array(Array(vec![
            Value::String("ab".to_string()),
            Value::String("c".to_string()),
        ])))
        .unwrap();
        // array8, size, count, sub-constructor str32, then two
        // length-prefixed bodies without per-element constructors
        assert_eq!(
            buf,
            vec![
                0xe0, 0x0d, 0x02, 0xb1, 0, 0, 0, 2, b'a', b'b', 0, 0, 0, 1, b'c'
            ]
        );
    }

    #[test]
    fn nested_arrays_round_trip() {
        assert_round_trip(Value::Array(Array(vec![
            Value::Array(Array(vec![Value::UInt(1), Value::UInt(2)])),
            Value::Array(Array(vec![Value::UInt(3)])),
        ])));
    }

    #[test]
    fn heterogeneous_array_is_rejected() {
        let result = to_vec(&Value::Array(Array(vec![
            Value::UInt(1),
            Value::Bool(true),
        ])));
        assert_eq!(result, Err(Error::HeterogeneousArray));
    }

    #[test]
    fn described_outcome_round_trips_to_projection() {
        let value = Value::from(Described::from_code(38, Value::List(Vec::new())));
        let buf = to_vec(&value).unwrap();
        assert_eq!(&buf[..3], &[0x00, 0x53, 0x26]);
        let (decoded, _) = decode_value(&buf).unwrap();
        let mut expected = OrderedMap::new();
        expected.insert(
            Value::String("released".to_string()),
            Value::List(Vec::new()),
        );
        assert_eq!(decoded, Value::Map(expected));
    }

    #[test]
    fn described_non_outcome_unwraps_on_decode() {
        let value = Value::from(Described::from_code(0x28, Value::String("q1".to_string())));
        let buf = to_vec(&value).unwrap();
        let (decoded, _) = decode_value(&buf).unwrap();
        assert_eq!(decoded, Value::String("q1".to_string()));
    }
}
