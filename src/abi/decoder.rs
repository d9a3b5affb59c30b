//! ABI decoding: the mirror of the head/tail walk.

use crate::abi::ty::{event_value_params, Type};
use crate::abi::number::{Int, Uint};
use crate::abi::value::Value;
use crate::abi::word::{required_words, Word, Words, WORD_LEN};
use crate::abi::AbiError;
use crate::types::Address;

/// ABI-decodes `data` against an ordered list of types.
///
/// The input length is rounded up to a whole number of words; a final partial
/// word is treated as zero-padded.
pub fn decode(types: &[Type], data: &[u8]) -> Result<Vec<Value>, AbiError> {
    let words = Words::from_bytes(data);
    let (values, _) = decode_tuple(types.iter(), &words)?;
    Ok(values)
}

/// Decodes a single value from the front of `words`, returning the value and
/// the number of words consumed, counting any tail region it reached into.
pub fn decode_value(ty: &Type, words: &[Word]) -> Result<(Value, usize), AbiError> {
    match ty {
        Type::Address => {
            let word = take_word(words)?;
            Ok((Value::Address(Address::from_slice(&word.0[12..])), 1))
        }
        Type::Bool => {
            let word = take_word(words)?;
            Ok((Value::Bool(!word.is_zero()), 1))
        }
        Type::Uint(size) => {
            let word = take_word(words)?;
            Ok((Value::Uint(Uint::from_word(*size, word)?), 1))
        }
        Type::Int(size) => {
            let word = take_word(words)?;
            Ok((Value::Int(Int::from_word(*size, word)?), 1))
        }
        Type::FixedBytes(len) => {
            if *len > WORD_LEN {
                return Err(AbiError::out_of_range(format!("bytes{len} exceeds a word")))
            }
            let word = take_word(words)?;
            Ok((Value::FixedBytes(word.0[..*len].to_vec()), 1))
        }
        Type::Bytes => {
            let (bytes, read) = take_packed(words)?;
            Ok((Value::Bytes(bytes), read))
        }
        Type::String => {
            let (bytes, read) = take_packed(words)?;
            Ok((Value::String(String::from_utf8(bytes)?), read))
        }
        Type::Array(elem) => {
            let len = take_word(words)?.to_usize()?;
            let rest = &words[1..];
            // each element needs at least one head word
            if len > rest.len() {
                return Err(AbiError::TruncatedInput)
            }
            let (values, read) =
                decode_tuple(std::iter::repeat(elem.as_ref()).take(len), rest)?;
            Ok((Value::Array(values, (**elem).clone()), 1 + read))
        }
        Type::FixedArray(elem, len) => {
            let (values, read) =
                decode_tuple(std::iter::repeat(elem.as_ref()).take(*len), words)?;
            Ok((Value::FixedArray(values, (**elem).clone()), read))
        }
        Type::Tuple(params) => {
            let (values, read) = decode_tuple(params.iter().map(|p| &p.kind), words)?;
            let elems =
                params.iter().map(|p| p.name.clone()).zip(values).collect::<Vec<_>>();
            Ok((Value::Tuple(elems), read))
        }
        Type::EventTuple(params) => {
            // decodes as its reordered value tuple
            let params = event_value_params(params);
            let (values, read) = decode_tuple(params.iter().map(|p| &p.kind), words)?;
            let elems = params.into_iter().map(|p| p.name).zip(values).collect::<Vec<_>>();
            Ok((Value::Tuple(elems), read))
        }
        Type::Alias(_, inner) => decode_value(inner, words),
    }
}

/// Walks the declared element types in order. Static elements decode in
/// place; dynamic elements decode through a byte offset read from their head
/// slot. Returns the values and the largest word index any element touched,
/// plus one — enclosing decoders resume past that point. Offsets are not
/// required to be monotonic and dynamic regions may overlap.
pub(crate) fn decode_tuple<'a, I>(kinds: I, words: &[Word]) -> Result<(Vec<Value>, usize), AbiError>
where
    I: IntoIterator<Item = &'a Type>,
{
    let mut values = Vec::new();
    let mut cursor = 0usize;
    let mut words_read = 0usize;

    for ty in kinds {
        if ty.is_dynamic() {
            let offset = take_word(&words[cursor.min(words.len())..])?.to_usize()?;
            if offset % WORD_LEN != 0 {
                return Err(AbiError::Misalignment(offset))
            }
            let offset_words = offset / WORD_LEN;
            if offset_words >= words.len() {
                return Err(AbiError::OffsetOutOfRange(offset))
            }
            let (value, read) = decode_value(ty, &words[offset_words..])?;
            values.push(value);
            cursor += 1;
            words_read = words_read.max(offset_words + read);
        } else {
            let (value, read) = decode_value(ty, &words[cursor.min(words.len())..])?;
            values.push(value);
            cursor += read;
            if cursor > words.len() {
                return Err(AbiError::TruncatedInput)
            }
        }
        words_read = words_read.max(cursor);
    }

    Ok((values, words_read))
}

fn take_word(words: &[Word]) -> Result<Word, AbiError> {
    words.first().copied().ok_or(AbiError::TruncatedInput)
}

/// Reads `length || payload` for `bytes`/`string`.
fn take_packed(words: &[Word]) -> Result<(Vec<u8>, usize), AbiError> {
    let len = take_word(words)?.to_usize()?;
    let need = required_words(len);
    if need + 1 > words.len() {
        return Err(AbiError::TruncatedInput)
    }
    let mut bytes = Vec::with_capacity(need * WORD_LEN);
    for word in &words[1..1 + need] {
        bytes.extend_from_slice(&word.0);
    }
    bytes.truncate(len);
    Ok((bytes, 1 + need))
}
