use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::CodecConfig;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{CodecError, Result};
use crate::layout::{self, Grid};
use crate::manifest::{Manifest, Sizes};
use crate::metadata::{
    SheetMetadata, PROP_ENCODED_SIZE, PROP_SHARED, PROP_SIZE, PROP_SIZE_NUMERIC,
};
use crate::numeric;
use crate::source::ByteSource;

/// One storable file: its name, the three size fields, and optionally its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub sizes: Sizes,
    /// Present after `build` / `rebuild`; absent for listing entries.
    pub payload: Option<Vec<u8>>,
    /// Remote document id, when known.
    pub id: Option<String>,
    pub mime: Option<String>,
    pub parents: Vec<String>,
    pub shared: bool,
}

impl FileRecord {
    /// Record for `payload`, with all sizes computed from the bytes.
    pub fn from_payload(name: impl Into<String>, payload: Vec<u8>) -> Self {
        let sizes = measure(&payload);
        Self {
            name: name.into(),
            sizes,
            payload: Some(payload),
            id: None,
            mime: None,
            parents: Vec::new(),
            shared: false,
        }
    }

    /// Metadata-only record from a remote listing entry: its own attributes
    /// plus the property map written at upload.
    pub fn from_listing(
        id: impl Into<String>,
        name: impl Into<String>,
        mime: Option<String>,
        parents: Vec<String>,
        props: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let field = |key: &str| -> Result<u64> {
            let raw = props
                .get(key)
                .ok_or_else(|| CodecError::Metadata(format!("missing property {key}")))?;
            raw.trim().parse().map_err(|_| CodecError::Metadata(format!("bad {key}: {raw:?}")))
        };
        Ok(Self {
            name: name.into(),
            sizes: Sizes {
                declared: field(PROP_SIZE)?,
                numeric: field(PROP_SIZE_NUMERIC)?,
                encoded: field(PROP_ENCODED_SIZE)?,
            },
            payload: None,
            id: Some(id.into()),
            mime,
            parents,
            shared: props.get(PROP_SHARED).map(|v| v == "true").unwrap_or(false),
        })
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Attach bytes fetched later, after re-measuring them against the recorded sizes.
    pub fn attach_payload(&mut self, payload: Vec<u8>) -> Result<()> {
        let measured = measure(&payload);
        if measured != self.sizes {
            return Err(CodecError::Metadata(format!(
                "payload sizes {:?} do not match record {:?}",
                measured, self.sizes
            )));
        }
        self.payload = Some(payload);
        Ok(())
    }
}

/// Sizes as the encoder would report them for `bytes`.
fn measure(bytes: &[u8]) -> Sizes {
    if bytes.is_empty() {
        return Sizes::default();
    }
    let digits = numeric::to_decimal(bytes).len() as u64;
    Sizes { declared: bytes.len() as u64, numeric: digits, encoded: digits }
}

/// A built file ready for upload: the record, its manifest and the filled grid.
#[derive(Clone, Debug)]
pub struct Packed {
    pub record: FileRecord,
    pub manifest: Manifest,
    pub grid: Grid,
}

impl Packed {
    pub fn metadata(&self) -> SheetMetadata {
        SheetMetadata::describe(&self.record.name, &self.manifest)
    }
}

/// Read `source` fully, encode it and lay the chunks out for `cfg`'s grid.
pub fn build(source: &dyn ByteSource, cfg: &CodecConfig) -> Result<Packed> {
    cfg.validate()?;
    let name = source.name();
    let bytes = source.read()?;
    let encoded = Encoder::from_config(cfg)?.encode(&bytes);
    let grid = layout::layout(&encoded.chunks, cfg)?;
    debug!(name = %name, cells = grid.len(), "build: done");
    let record = FileRecord {
        name,
        sizes: encoded.manifest.sizes,
        payload: Some(bytes),
        id: None,
        mime: None,
        parents: Vec::new(),
        shared: false,
    };
    Ok(Packed { record, manifest: encoded.manifest, grid })
}

/// Build many sources in parallel; results keep the input order.
pub fn build_all<S>(sources: &[S], cfg: &CodecConfig) -> Vec<Result<Packed>>
where
    S: ByteSource + Sync,
{
    sources.par_iter().map(|s| build(s, cfg)).collect()
}

/// Reconstruct a file from already-fetched sheet metadata and cell values.
///
/// `cfg` must describe the grid the file was built into.
pub fn rebuild(
    meta: &SheetMetadata,
    grid_data: &[Vec<String>],
    cfg: &CodecConfig,
) -> Result<FileRecord> {
    let manifest = meta.manifest();
    let chunks = layout::unlayout(grid_data, &manifest, cfg)?;
    let bytes = Decoder::decode(&manifest, &chunks)?;
    debug!(name = %meta.name, bytes = bytes.len(), "rebuild: done");
    Ok(FileRecord {
        name: meta.name.clone(),
        sizes: manifest.sizes,
        payload: Some(bytes),
        id: None,
        mime: None,
        parents: Vec::new(),
        shared: false,
    })
}
