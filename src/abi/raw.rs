//! The raw JSON ABI descriptor format, without any post processing.

use crate::types::Bytes;
use serde::{
    de::{MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

/// Contract ABI as a list of items where each item can be a function,
/// constructor, event or error.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RawAbi(Vec<Item>);

impl RawAbi {
    /// The descriptor items.
    pub fn items(&self) -> &[Item] {
        &self.0
    }
}

impl IntoIterator for RawAbi {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

struct RawAbiVisitor;

impl<'de> Visitor<'de> for RawAbiVisitor {
    type Value = RawAbi;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence or map with `abi` key")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut vec = Vec::new();

        while let Some(element) = seq.next_element()? {
            vec.push(element);
        }

        Ok(RawAbi(vec))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut vec = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == "abi" {
                vec = Some(RawAbi(map.next_value::<Vec<Item>>()?));
            } else {
                map.next_value::<serde::de::IgnoredAny>()?;
            }
        }

        vec.ok_or_else(|| serde::de::Error::missing_field("abi"))
    }
}

impl<'de> Deserialize<'de> for RawAbi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawAbiVisitor)
    }
}

/// A single ABI descriptor object. Missing fields take their zero values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub inputs: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// One of `constructor`, `function`, `event`, `error`, `fallback`,
    /// `receive` or the empty string, which counts as `function`.
    #[serde(rename = "type", default)]
    pub type_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub outputs: Vec<Component>,
    // required to satisfy solidity events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
    /// Pre-0.6 mutability flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
}

/// Either an input/output or a nested component of an input/output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "internalType", default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_field: String,
    #[serde(default)]
    pub components: Vec<Component>,
    /// Indexed flag, for solidity events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

/// Represents contract ABI input variants
#[derive(Deserialize)]
#[serde(untagged)]
pub enum JsonAbi {
    /// json object input as `{"abi": [..], "bin": "..."}`
    Object(AbiObject),
    /// json array input as `[]`
    #[serde(deserialize_with = "deserialize_abi_array")]
    Array(RawAbi),
}

// === impl JsonAbi ===

impl JsonAbi {
    /// Returns the descriptor items regardless of the input shape.
    pub fn into_raw(self) -> RawAbi {
        match self {
            JsonAbi::Object(obj) => obj.abi,
            JsonAbi::Array(raw) => raw,
        }
    }

    /// Returns the bytecode object
    pub fn bytecode(&self) -> Option<Bytes> {
        match self {
            JsonAbi::Object(abi) => abi.bytecode.clone(),
            JsonAbi::Array(_) => None,
        }
    }
}

fn deserialize_abi_array<'de, D>(deserializer: D) -> Result<RawAbi, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_seq(RawAbiVisitor)
}

/// Contract ABI and optional bytecode as JSON object
pub struct AbiObject {
    pub abi: RawAbi,
    pub bytecode: Option<Bytes>,
}

struct AbiObjectVisitor;

impl<'de> Visitor<'de> for AbiObjectVisitor {
    type Value = AbiObject;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence or map with `abi` key")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut abi = None;
        let mut bytecode = None;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Bytecode {
            Object { object: Bytes },
            Bytes(Bytes),
        }

        impl Bytecode {
            fn into_bytes(self) -> Option<Bytes> {
                let bytecode = match self {
                    Bytecode::Object { object } => object,
                    Bytecode::Bytes(bytes) => bytes,
                };
                if bytecode.is_empty() {
                    None
                } else {
                    Some(bytecode)
                }
            }
        }

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "abi" => {
                    abi = Some(RawAbi(map.next_value::<Vec<Item>>()?));
                }
                "bytecode" | "byteCode" | "bin" => {
                    bytecode = map.next_value::<Bytecode>().ok().and_then(|b| b.into_bytes());
                }
                _ => {
                    map.next_value::<serde::de::IgnoredAny>()?;
                }
            }
        }

        let abi = abi.ok_or_else(|| serde::de::Error::missing_field("abi"))?;
        Ok(AbiObject { abi, bytecode })
    }
}

impl<'de> Deserialize<'de> for AbiObject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AbiObjectVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_FRAGMENT: &str = r#"[
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
        {"anonymous":false,"inputs":[{"indexed":true,"name":"from","type":"address"},{"indexed":true,"name":"to","type":"address"},{"indexed":false,"name":"value","type":"uint256"}],"name":"Transfer","type":"event"}
    ]"#;

    #[test]
    fn can_parse_raw_array() {
        let raw = serde_json::from_str::<RawAbi>(ERC20_FRAGMENT).unwrap();
        assert_eq!(raw.items().len(), 2);
        assert_eq!(raw.items()[0].name.as_deref(), Some("transfer"));
        assert_eq!(raw.items()[1].inputs[0].indexed, Some(true));
    }

    #[test]
    fn empty_type_and_missing_fields_are_tolerated() {
        let raw =
            serde_json::from_str::<RawAbi>(r#"[{"name":"poke","inputs":[]}]"#).unwrap();
        assert_eq!(raw.items()[0].type_field, "");
        assert!(raw.items()[0].outputs.is_empty());
    }

    #[test]
    fn can_parse_tuple_components() {
        let s = r#"[{"type":"function","name":"greet","inputs":[{"internalType":"struct Greeter.Stuff","name":"stuff","type":"tuple","components":[{"type":"bool","name":"ok"}]}],"outputs":[],"stateMutability":"view"}]"#;
        let raw = serde_json::from_str::<RawAbi>(s).unwrap();
        let input = &raw.items()[0].inputs[0];
        assert_eq!(input.type_field, "tuple");
        assert_eq!(input.components.len(), 1);
        assert_eq!(input.internal_type.as_deref(), Some("struct Greeter.Stuff"));
    }

    #[test]
    fn can_deserialize_abi_object() {
        let s = format!(r#"{{"abi": {ERC20_FRAGMENT}, "bin": "0x6080"}}"#);
        match serde_json::from_str::<JsonAbi>(&s).unwrap() {
            JsonAbi::Object(obj) => {
                assert_eq!(obj.abi.items().len(), 2);
                assert_eq!(obj.bytecode.unwrap().as_ref(), &[0x60, 0x80][..]);
            }
            _ => panic!("expected abi object"),
        }

        match serde_json::from_str::<JsonAbi>(ERC20_FRAGMENT).unwrap() {
            JsonAbi::Array(raw) => assert_eq!(raw.items().len(), 2),
            _ => panic!("expected abi array"),
        }
    }

    #[test]
    fn ignores_empty_bytecode() {
        let s = format!(r#"{{"abi": {ERC20_FRAGMENT}, "bytecode": {{"object": "0x"}}}}"#);
        match serde_json::from_str::<JsonAbi>(&s).unwrap() {
            JsonAbi::Object(obj) => assert!(obj.bytecode.is_none()),
            _ => panic!("expected abi object"),
        }
    }
}
