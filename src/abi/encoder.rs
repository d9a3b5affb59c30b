//! ABI encoding: the head/tail walk over a value tuple.

use crate::abi::tokens::MappingError;
use crate::abi::value::Value;
use crate::abi::word::{Word, Words, WORD_LEN};
use crate::abi::AbiError;
use crate::types::{Bytes, U256};

/// ABI-encodes an ordered list of values as a tuple.
pub fn encode(values: &[Value]) -> Result<Bytes, AbiError> {
    let refs: Vec<&Value> = values.iter().collect();
    Ok(encode_tuple(&refs)?.to_bytes().into())
}

/// Encodes a single value. Equivalent to a one-element tuple only for static
/// values; dynamic values are encoded without the leading offset slot.
pub fn encode_value(value: &Value) -> Result<Words, AbiError> {
    match value {
        Value::Address(address) => single(Word::left_padded(address.as_bytes())?),
        Value::Bool(b) => single(Word::left_padded(&[*b as u8])?),
        Value::Uint(uint) => single(Word::from_uint(uint.value())),
        Value::Int(int) => single(Word::from_int(int.value())),
        Value::FixedBytes(bytes) => single(Word::right_padded(bytes)?),
        Value::Bytes(bytes) => packed(bytes),
        Value::String(s) => packed(s.as_bytes()),
        Value::Array(values, elem) => {
            check_elements(values, &elem.canonical())?;
            let mut words = Words::with_capacity(1 + values.len());
            words.push(Word::from_uint(U256::from(values.len())));
            let refs: Vec<&Value> = values.iter().collect();
            words.extend(encode_tuple(&refs)?);
            Ok(words)
        }
        Value::FixedArray(values, elem) => {
            check_elements(values, &elem.canonical())?;
            let refs: Vec<&Value> = values.iter().collect();
            encode_tuple(&refs)
        }
        Value::Tuple(elems) => {
            let refs: Vec<&Value> = elems.iter().map(|(_, v)| v).collect();
            encode_tuple(&refs)
        }
    }
}

/// The head/tail walk. Static values encode into the head; each dynamic value
/// reserves one offset slot in the head and appends its encoding to the tail.
/// Offsets are byte distances from the start of this tuple's encoding.
pub(crate) fn encode_tuple(values: &[&Value]) -> Result<Words, AbiError> {
    let mut head_len = 0usize;
    for value in values {
        let size = if value.is_dynamic() { WORD_LEN } else { value.kind().head_size() };
        head_len = head_len.checked_add(size).ok_or(AbiError::OffsetOverflow)?;
    }

    let mut head = Words::with_capacity(head_len / WORD_LEN);
    let mut tail = Words::new();
    for value in values {
        if value.is_dynamic() {
            let offset =
                head_len.checked_add(tail.byte_len()).ok_or(AbiError::OffsetOverflow)?;
            head.push(Word::from_uint(U256::from(offset)));
            tail.extend(encode_value(value)?);
        } else {
            head.extend(encode_value(value)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn single(word: Word) -> Result<Words, AbiError> {
    let mut words = Words::with_capacity(1);
    words.push(word);
    Ok(words)
}

/// `length || payload`, the payload right-padded to a word boundary.
fn packed(bytes: &[u8]) -> Result<Words, AbiError> {
    let mut words = Words::with_capacity(1 + crate::abi::word::required_words(bytes.len()));
    words.push(Word::from_uint(U256::from(bytes.len())));
    words.append_bytes(bytes);
    Ok(words)
}

fn check_elements(values: &[Value], elem_canonical: &str) -> Result<(), AbiError> {
    for value in values {
        let got = value.kind().canonical();
        if got != elem_canonical {
            return Err(MappingError(format!(
                "array element type mismatch: expected `{elem_canonical}`, got `{got}`"
            ))
            .into())
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ty::Type;
    use crate::types::Address;

    fn encode_hex(values: &[Value]) -> String {
        hex::encode(encode(values).unwrap())
    }

    #[test]
    fn encodes_uint256_zero() {
        let value = Type::Uint(256).zero();
        assert_eq!(encode_hex(&[value]), "00".repeat(32));
    }

    #[test]
    fn encodes_int256_minus_one() {
        let value = Value::int(256, -1).unwrap();
        assert_eq!(encode_hex(&[value]), "ff".repeat(32));
    }

    #[test]
    fn encodes_bool_true() {
        assert_eq!(
            encode_hex(&[Value::Bool(true)]),
            format!("{}01", "00".repeat(31))
        );
    }

    #[test]
    fn encodes_dynamic_bytes() {
        let encoded = encode_hex(&[Value::Bytes(vec![1, 2, 3])]);
        let expected = format!(
            "{offset}{len}{payload}",
            offset = format!("{}20", "00".repeat(31)),
            len = format!("{}03", "00".repeat(31)),
            payload = format!("010203{}", "00".repeat(29)),
        );
        assert_eq!(encoded, expected);
    }

    #[test]
    fn encodes_mixed_static_dynamic_tuple() {
        // (bool=true, bytes=0x010203): bool word, offset 0x40, length, payload
        let encoded =
            encode_hex(&[Value::Bool(true), Value::Bytes(vec![1, 2, 3])]);
        let expected = [
            format!("{}01", "00".repeat(31)),
            format!("{}40", "00".repeat(31)),
            format!("{}03", "00".repeat(31)),
            format!("010203{}", "00".repeat(29)),
        ]
        .concat();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn encodes_nested_dynamic_tuples() {
        // ((bytes=010203), (bytes=040506)) is 8 words
        let inner = |payload: Vec<u8>| {
            Value::Tuple(vec![(String::new(), Value::Bytes(payload))])
        };
        let encoded = encode_hex(&[inner(vec![1, 2, 3]), inner(vec![4, 5, 6])]);
        let expected = [
            format!("{}40", "00".repeat(31)), // offset to first inner
            format!("{}a0", "00".repeat(31)), // offset to second inner
            format!("{}20", "00".repeat(31)), // first inner's inner offset
            format!("{}03", "00".repeat(31)),
            format!("010203{}", "00".repeat(29)),
            format!("{}20", "00".repeat(31)), // second inner's inner offset
            format!("{}03", "00".repeat(31)),
            format!("040506{}", "00".repeat(29)),
        ]
        .concat();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn encodes_address_left_padded() {
        let address = Address::from_slice(&[0x11u8; 20]);
        let encoded = encode_hex(&[Value::Address(address)]);
        assert_eq!(encoded, format!("{}{}", "00".repeat(12), "11".repeat(20)));
    }

    #[test]
    fn encodes_fixed_bytes_right_padded() {
        let encoded = encode_hex(&[Value::FixedBytes(vec![0xab, 0xcd])]);
        assert_eq!(encoded, format!("abcd{}", "00".repeat(30)));
    }

    #[test]
    fn encodes_nested_fixed_arrays_flat() {
        // uint256[2][3] encodes as 6 consecutive words
        let pair = |a: u64, b: u64| {
            Value::FixedArray(
                vec![Value::uint(256, a).unwrap(), Value::uint(256, b).unwrap()],
                Type::Uint(256),
            )
        };
        let value = Value::FixedArray(
            vec![pair(1, 2), pair(3, 4), pair(5, 6)],
            Type::fixed_array(Type::Uint(256), 2),
        );
        let encoded = encode(&[value]).unwrap();
        assert_eq!(encoded.len(), 6 * 32);
        for (i, expected) in (1u8..=6).enumerate() {
            assert_eq!(encoded[i * 32 + 31], expected);
        }
    }

    #[test]
    fn encodes_dynamic_array_with_length_prefix() {
        let value = Value::Array(
            vec![Value::uint(8, 7u64).unwrap(), Value::uint(8, 9u64).unwrap()],
            Type::Uint(8),
        );
        let encoded = encode(&[value]).unwrap();
        assert_eq!(encoded.len(), 4 * 32);
        assert_eq!(encoded[31], 0x20); // offset
        assert_eq!(encoded[63], 2); // length
        assert_eq!(encoded[95], 7);
        assert_eq!(encoded[127], 9);
    }

    #[test]
    fn static_tuple_length_is_sum_of_head_sizes() {
        let values =
            [Value::Bool(true), Value::Address(Address::zero()), Value::uint(32, 9u64).unwrap()];
        let encoded = encode(&values).unwrap();
        assert_eq!(encoded.len(), 96);
    }

    #[test]
    fn rejects_mixed_array_elements() {
        let value = Value::Array(
            vec![Value::Bool(true), Value::uint(8, 1u64).unwrap()],
            Type::Bool,
        );
        assert!(encode(&[value]).is_err());
    }
}
