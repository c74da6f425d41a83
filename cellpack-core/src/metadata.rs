use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CodecError, Result};
use crate::manifest::{Manifest, Sizes};

pub const PROP_SIZE: &str = "size";
pub const PROP_SIZE_NUMERIC: &str = "size_numeric";
pub const PROP_ENCODED_SIZE: &str = "encoded_size";
pub const PROP_CHUNK_COUNT: &str = "chunk_count";
pub const PROP_CHUNK_LENGTH_BOUND: &str = "chunk_length_bound";
pub const PROP_CHECKSUM: &str = "checksum";
/// Listing-level flag kept beside the codec properties.
pub const PROP_SHARED: &str = "shared";

/// Document-level metadata stored next to the cell grid.
///
/// Remote documents keep these as string-valued properties; see
/// [`SheetMetadata::to_properties`] for the key names.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SheetMetadata {
    pub name: String,
    #[serde(rename = "size")]
    pub declared_size: u64,
    #[serde(rename = "size_numeric")]
    pub numeric_size: u64,
    pub encoded_size: u64,
    pub chunk_count: u64,
    pub chunk_length_bound: usize,
    pub checksum: String,
}

impl SheetMetadata {
    pub fn describe(name: &str, manifest: &Manifest) -> Self {
        Self {
            name: name.to_string(),
            declared_size: manifest.sizes.declared,
            numeric_size: manifest.sizes.numeric,
            encoded_size: manifest.sizes.encoded,
            chunk_count: manifest.chunk_count,
            chunk_length_bound: manifest.chunk_length_bound,
            checksum: manifest.checksum_hex.clone(),
        }
    }

    pub fn sizes(&self) -> Sizes {
        Sizes {
            declared: self.declared_size,
            numeric: self.numeric_size,
            encoded: self.encoded_size,
        }
    }

    pub fn manifest(&self) -> Manifest {
        Manifest {
            sizes: self.sizes(),
            chunk_count: self.chunk_count,
            chunk_length_bound: self.chunk_length_bound,
            checksum_hex: self.checksum.clone(),
        }
    }

    pub fn to_properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        props.insert(PROP_SIZE.to_string(), self.declared_size.to_string());
        props.insert(PROP_SIZE_NUMERIC.to_string(), self.numeric_size.to_string());
        props.insert(PROP_ENCODED_SIZE.to_string(), self.encoded_size.to_string());
        props.insert(PROP_CHUNK_COUNT.to_string(), self.chunk_count.to_string());
        props.insert(PROP_CHUNK_LENGTH_BOUND.to_string(), self.chunk_length_bound.to_string());
        props.insert(PROP_CHECKSUM.to_string(), self.checksum.clone());
        props
    }

    pub fn from_properties(name: &str, props: &BTreeMap<String, String>) -> Result<Self> {
        let checksum = required(props, PROP_CHECKSUM)?.to_string();
        if checksum.len() != 64 || !checksum.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodecError::Metadata(format!("bad {PROP_CHECKSUM}: {checksum:?}")));
        }
        Ok(Self {
            name: name.to_string(),
            declared_size: number(props, PROP_SIZE)?,
            numeric_size: number(props, PROP_SIZE_NUMERIC)?,
            encoded_size: number(props, PROP_ENCODED_SIZE)?,
            chunk_count: number(props, PROP_CHUNK_COUNT)?,
            chunk_length_bound: number(props, PROP_CHUNK_LENGTH_BOUND)?,
            checksum: checksum.to_ascii_lowercase(),
        })
    }
}

fn required<'a>(props: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
    props
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| CodecError::Metadata(format!("missing property {key}")))
}

fn number<T: std::str::FromStr>(props: &BTreeMap<String, String>, key: &str) -> Result<T> {
    let raw = required(props, key)?;
    raw.trim()
        .parse()
        .map_err(|_| CodecError::Metadata(format!("bad {key}: {raw:?}")))
}
