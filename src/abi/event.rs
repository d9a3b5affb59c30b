//! Contract events: topic hashing and log decoding.

use crate::abi::decoder::{decode, decode_value};
use crate::abi::ty::{event_value_params, EventParam, Type};
use crate::abi::value::Value;
use crate::abi::word::Words;
use crate::abi::AbiError;
use crate::types::H256;
use crate::utils::topic;
use std::fmt;

/// A contract event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Event name.
    pub name: String,
    /// Event inputs in declaration order.
    pub inputs: Vec<EventParam>,
    /// Whether the event omits `topic0` in emitted logs.
    pub anonymous: bool,
}

/// The raw topics and data of an emitted log.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawLog {
    /// Indexed topics, including `topic0` for non-anonymous events.
    pub topics: Vec<H256>,
    /// ABI-encoded non-indexed inputs.
    pub data: Vec<u8>,
}

impl From<(Vec<H256>, Vec<u8>)> for RawLog {
    fn from((topics, data): (Vec<H256>, Vec<u8>)) -> Self {
        Self { topics, data }
    }
}

impl Event {
    /// The canonical signature string, e.g.
    /// `Transfer(address,address,uint256)`.
    pub fn abi_signature(&self) -> String {
        let types =
            self.inputs.iter().map(|p| p.kind.canonical()).collect::<Vec<_>>().join(",");
        format!("{}({types})", self.name)
    }

    /// The full 32-byte Keccak-256 hash of the signature, stored as
    /// `topics[0]` in logs of non-anonymous events.
    pub fn signature(&self) -> H256 {
        topic(self.abi_signature())
    }

    /// The type a topic of the given input decodes against: dynamic inputs
    /// are hashed by the EVM, so only the raw 32-byte hash can be surfaced.
    fn topic_kind(kind: &Type) -> Type {
        if kind.is_dynamic() {
            Type::FixedBytes(32)
        } else {
            kind.clone()
        }
    }

    /// Decodes a log into the event's value tuple: indexed inputs first in
    /// declaration order, then the non-indexed ones. Unnamed inputs get
    /// `topic{i}` / `data{i}` synthetic names.
    pub fn parse_log(&self, log: RawLog) -> Result<Value, AbiError> {
        let topics = if self.anonymous {
            &log.topics[..]
        } else {
            match log.topics.first() {
                Some(first) if *first == self.signature() => &log.topics[1..],
                _ => return Err(AbiError::SelectorMismatch),
            }
        };

        let indexed: Vec<&EventParam> = self.inputs.iter().filter(|p| p.indexed).collect();
        if topics.len() != indexed.len() {
            return Err(AbiError::TopicArityMismatch {
                expected: indexed.len(),
                got: topics.len(),
            })
        }

        let mut values = Vec::with_capacity(self.inputs.len());
        for (input, raw) in indexed.iter().zip(topics) {
            let words = Words::from_bytes(raw.as_bytes());
            let (value, _) = decode_value(&Self::topic_kind(&input.kind), &words)?;
            values.push(value);
        }

        let data_kinds: Vec<Type> =
            self.inputs.iter().filter(|p| !p.indexed).map(|p| p.kind.clone()).collect();
        values.extend(decode(&data_kinds, &log.data)?);

        let names = event_value_params(&self.inputs).into_iter().map(|p| p.name);
        Ok(Value::Tuple(names.zip(values).collect()))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event {}{}", self.name, Type::EventTuple(self.inputs.clone()))?;
        if self.anonymous {
            f.write_str(" anonymous")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encoder::encode;
    use crate::abi::human_readable::lexer::HumanReadableParser;
    use crate::types::Address;

    fn transfer() -> Event {
        HumanReadableParser::parse_event(
            "event Transfer(address indexed from, address indexed to, uint256 value)",
        )
        .unwrap()
    }

    fn address_topic(byte: u8) -> H256 {
        let mut raw = [0u8; 32];
        raw[12..].copy_from_slice(&[byte; 20]);
        H256(raw)
    }

    #[test]
    fn computes_topic0() {
        assert_eq!(transfer().abi_signature(), "Transfer(address,address,uint256)");
        assert_eq!(
            hex::encode(transfer().signature()),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn decodes_transfer_log() {
        let event = transfer();
        let log = RawLog {
            topics: vec![event.signature(), address_topic(0xaa), address_topic(0xbb)],
            data: encode(&[Value::uint(256, 100u64).unwrap()]).unwrap().to_vec(),
        };
        let decoded = event.parse_log(log).unwrap();
        let elems = decoded.into_tuple().unwrap();
        assert_eq!(elems[0].0, "from");
        assert_eq!(elems[0].1, Value::Address(Address::from_slice(&[0xaa; 20])));
        assert_eq!(elems[1].0, "to");
        assert_eq!(elems[1].1, Value::Address(Address::from_slice(&[0xbb; 20])));
        assert_eq!(elems[2].0, "value");
        assert_eq!(elems[2].1, Value::uint(256, 100u64).unwrap());
    }

    #[test]
    fn rejects_wrong_topic0() {
        let event = transfer();
        let log = RawLog {
            topics: vec![H256::zero(), address_topic(1), address_topic(2)],
            data: vec![0u8; 32],
        };
        assert!(matches!(event.parse_log(log), Err(AbiError::SelectorMismatch)));
    }

    #[test]
    fn rejects_topic_arity_mismatch() {
        let event = transfer();
        let log = RawLog {
            topics: vec![event.signature(), address_topic(1)],
            data: vec![0u8; 32],
        };
        assert!(matches!(
            event.parse_log(log),
            Err(AbiError::TopicArityMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn surfaces_hash_for_dynamic_indexed_inputs() {
        let event =
            HumanReadableParser::parse_event("event Named(string indexed name, uint8 kind)")
                .unwrap();
        let hash = H256(crate::utils::keccak256(b"alice"));
        let log = RawLog {
            topics: vec![event.signature(), hash],
            data: encode(&[Value::uint(8, 3u64).unwrap()]).unwrap().to_vec(),
        };
        let decoded = event.parse_log(log).unwrap();
        let elems = decoded.into_tuple().unwrap();
        assert_eq!(elems[0].1, Value::FixedBytes(hash.as_bytes().to_vec()));
        assert_eq!(elems[1].1, Value::uint(8, 3u64).unwrap());
    }

    #[test]
    fn anonymous_event_uses_all_topics() {
        let event = HumanReadableParser::parse_event(
            "event Ping(address indexed) anonymous",
        )
        .unwrap();
        let log = RawLog { topics: vec![address_topic(0x77)], data: Vec::new() };
        let decoded = event.parse_log(log).unwrap();
        let elems = decoded.into_tuple().unwrap();
        assert_eq!(elems[0].0, "topic1");
        assert_eq!(elems[0].1, Value::Address(Address::from_slice(&[0x77; 20])));
    }

    #[test]
    fn decodes_dynamic_data_inputs_from_their_own_region() {
        let event = HumanReadableParser::parse_event(
            "event Message(address indexed from, string text, uint256 nonce)",
        )
        .unwrap();
        let data = encode(&[
            Value::String("hello".into()),
            Value::uint(256, 7u64).unwrap(),
        ])
        .unwrap();
        let log = RawLog {
            topics: vec![event.signature(), address_topic(0x01)],
            data: data.to_vec(),
        };
        let decoded = event.parse_log(log).unwrap();
        let elems = decoded.into_tuple().unwrap();
        assert_eq!(elems[1].1, Value::String("hello".into()));
        assert_eq!(elems[2].1, Value::uint(256, 7u64).unwrap());
    }

    #[test]
    fn displays_declaration() {
        assert_eq!(
            transfer().to_string(),
            "event Transfer(address indexed from, address indexed to, uint256 value)"
        );
    }
}
