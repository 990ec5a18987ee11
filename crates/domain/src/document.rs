//! Stored resource documents and their link maps.
//!
//! Every persisted resource has the same envelope: an `id` plus a `data`
//! object holding `links`, `etag`, `kind` and the resource-specific fields.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Link name every persisted resource carries.
pub const SELF_LINK: &str = "self";

/// Named hyperlinks held by a resource. Insertion order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, String>);

impl Links {
    pub fn new() -> Self {
        Links(BTreeMap::new())
    }

    /// A link map holding only the `self` link.
    pub fn with_self(url: impl Into<String>) -> Self {
        let mut links = Links::new();
        links.insert(SELF_LINK, url);
        links
    }

    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), url.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn self_link(&self) -> Option<&str> {
        self.get(SELF_LINK)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Links {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Links(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The `data` block of a stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    pub links: Links,
    pub etag: String,
    pub kind: String,
    /// Resource-specific fields, stored alongside the metadata.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl DocumentData {
    /// Stamp a body with links, a fresh etag and its kind.
    ///
    /// The body must serialize to a JSON object.
    pub fn stamp<T: Serialize>(body: &T, links: Links, kind: &str) -> Result<Self, serde_json::Error> {
        let mut fields = match serde_json::to_value(body)? {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "resource body must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };
        // Metadata is owned by the envelope, never by the body.
        for reserved in ["links", "etag", "kind"] {
            fields.remove(reserved);
        }
        Ok(DocumentData {
            links,
            etag: generate_etag(),
            kind: kind.to_string(),
            fields,
        })
    }

    /// Decode the resource-specific fields into a typed body.
    pub fn body<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.fields.clone()))
    }

    /// Look up a nested field with a JSON pointer, e.g. `/current_period/total`.
    pub fn field(&self, pointer: &str) -> Option<&serde_json::Value> {
        let trimmed = pointer.strip_prefix('/').unwrap_or(pointer);
        let (head, rest) = match trimmed.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (trimmed, None),
        };
        let value = self.fields.get(head)?;
        match rest {
            Some(rest) => value.pointer(&format!("/{}", rest)),
            None => Some(value),
        }
    }

    /// Refresh the etag after an in-place mutation.
    pub fn touch(&mut self) {
        self.etag = generate_etag();
    }
}

/// A persisted resource: its store key plus the stamped data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDocument {
    pub id: String,
    pub data: DocumentData,
}

impl ResourceDocument {
    pub fn new(id: impl Into<String>, data: DocumentData) -> Self {
        ResourceDocument {
            id: id.into(),
            data,
        }
    }

    pub fn links(&self) -> &Links {
        &self.data.links
    }

    pub fn links_mut(&mut self) -> &mut Links {
        &mut self.data.links
    }

    /// The client-facing representation: the `data` block with metadata inline.
    pub fn to_response(&self) -> serde_json::Value {
        serde_json::to_value(&self.data).unwrap_or(serde_json::Value::Null)
    }
}

/// A new opaque version tag. Changes on every write.
pub fn generate_etag() -> String {
    let entropy: [u8; 32] = rand::random();
    Sha256::digest(entropy)
        .iter()
        .take(20)
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
