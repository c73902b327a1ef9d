//! Compose document model
//!
//! The filter understands exactly two things about a compose document: the
//! `services` map and each service's `ports`. Every other top-level section
//! (name, networks, volumes, configs, secrets, x-* extensions) and every
//! other service field rides along in a flattened map, untouched and in
//! document order.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::Result;

/// A parsed compose document
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Project {
    /// Named services, in document order
    #[serde(default)]
    pub services: IndexMap<String, Service>,

    /// Top-level sections the filter never inspects
    #[serde(flatten)]
    pub rest: IndexMap<String, Value>,
}

impl Project {
    /// Serialize the document back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// One service definition
///
/// Opaque except for its port bindings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Service {
    /// Published port bindings, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortBinding>,

    /// Service fields the filter never inspects
    #[serde(flatten)]
    pub rest: IndexMap<String, Value>,
}

/// One port binding, normalized to compose long syntax
///
/// `published` stays a string because compose permits ranges and
/// host-IP-qualified forms (`"8080-8090"`, `"127.0.0.1:8080"`) on the host
/// side. The container side is a single port.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortBinding {
    pub target: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Long-syntax keys the filter never inspects (host_ip, mode, name, ...)
    #[serde(flatten)]
    pub rest: IndexMap<String, Value>,
}

impl PortBinding {
    /// Create a tcp binding, as used for inserted port overrides
    pub fn tcp(target: u32, published: impl Into<String>) -> Self {
        Self {
            target,
            published: Some(published.into()),
            protocol: Some("tcp".to_string()),
            rest: IndexMap::new(),
        }
    }
}

/// Raw wire forms a ports entry may take
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPort {
    Long(LongPort),
    Short(String),
    Number(u32),
}

/// Compose long-syntax port map; target may be written as an integer or a
/// numeric string
#[derive(Deserialize)]
struct LongPort {
    target: StringOrNum,
    #[serde(default)]
    published: Option<StringOrNum>,
    #[serde(default)]
    protocol: Option<String>,
    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNum {
    Num(u64),
    String(String),
}

impl StringOrNum {
    fn into_string(self) -> String {
        match self {
            StringOrNum::Num(n) => n.to_string(),
            StringOrNum::String(s) => s,
        }
    }

    fn into_port(self) -> std::result::Result<u32, String> {
        let parsed = match &self {
            StringOrNum::Num(n) => u32::try_from(*n).ok(),
            StringOrNum::String(s) => s.trim().parse().ok(),
        };
        parsed.ok_or_else(|| {
            let text = match self {
                StringOrNum::Num(n) => n.to_string(),
                StringOrNum::String(s) => s,
            };
            format!("port target '{text}' must be a single integer")
        })
    }
}

impl<'de> Deserialize<'de> for PortBinding {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match RawPort::deserialize(deserializer)? {
            RawPort::Long(long) => {
                let target = long.target.into_port().map_err(D::Error::custom)?;
                Ok(PortBinding {
                    target,
                    published: long.published.map(StringOrNum::into_string),
                    protocol: long.protocol,
                    rest: long.rest,
                })
            }
            RawPort::Short(entry) => parse_short_syntax(&entry).map_err(D::Error::custom),
            RawPort::Number(target) => Ok(PortBinding {
                target,
                published: None,
                protocol: None,
                rest: IndexMap::new(),
            }),
        }
    }
}

/// Normalize a short-syntax scalar entry into a structured binding
///
/// Accepted forms: `CONTAINER`, `HOST:CONTAINER`, `IP:HOST:CONTAINER`, each
/// with an optional `/PROTOCOL` suffix. Everything left of the last colon is
/// the published side and stays verbatim.
fn parse_short_syntax(entry: &str) -> std::result::Result<PortBinding, String> {
    let (published, container_part) = match entry.rsplit_once(':') {
        Some((head, tail)) => {
            if head.is_empty() {
                return Err(format!("unsupported ports entry '{entry}': empty host side"));
            }
            (Some(head), tail)
        }
        None => (None, entry),
    };

    let (target_str, protocol) = match container_part.split_once('/') {
        Some((target, protocol)) => (target, Some(protocol)),
        None => (container_part, None),
    };

    let target: u32 = target_str.parse().map_err(|_| {
        format!("unsupported ports entry '{entry}': container port must be a single integer")
    })?;

    Ok(PortBinding {
        target,
        published: published.map(str::to_string),
        protocol: protocol.map(str::to_string),
        rest: IndexMap::new(),
    })
}
