use anyhow::{anyhow, Context};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::layout::Grid;
use crate::manifest::Manifest;
use crate::metadata::{SheetMetadata, PROP_SHARED};
use crate::record::{self, FileRecord, Packed};
use crate::source::ByteSource;

/// Remote document store holding one grid per file.
///
/// Transport, auth and retries live behind this trait; the codec only sees
/// whatever error comes back.
pub trait StorageAdapter {
    fn fetch(&self, handle: &str) -> anyhow::Result<(SheetMetadata, Vec<Vec<String>>)>;
    fn store(
        &self,
        record: &FileRecord,
        manifest: &Manifest,
        grid: &Grid,
    ) -> anyhow::Result<String>;
}

#[derive(Clone, Debug)]
struct StoredSheet {
    name: String,
    mime: Option<String>,
    parents: Vec<String>,
    properties: BTreeMap<String, String>,
    rows: Vec<Vec<String>>,
}

/// In-process store; sheets keep properties as strings, like the remote side.
#[derive(Default)]
pub struct MemoryAdapter {
    sheets: Mutex<HashMap<String, StoredSheet>>,
    next_id: AtomicUsize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> anyhow::Result<usize> {
        let sheets = self.sheets.lock().map_err(|_| anyhow!("sheet store poisoned"))?;
        Ok(sheets.len())
    }

    pub fn is_empty(&self) -> anyhow::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Metadata-only records for every stored sheet, sorted by handle.
    pub fn list(&self) -> anyhow::Result<Vec<FileRecord>> {
        let sheets = self.sheets.lock().map_err(|_| anyhow!("sheet store poisoned"))?;
        let mut handles: Vec<&String> = sheets.keys().collect();
        handles.sort();
        handles
            .into_iter()
            .map(|h| {
                let s = &sheets[h];
                FileRecord::from_listing(
                    h.as_str(),
                    s.name.as_str(),
                    s.mime.clone(),
                    s.parents.clone(),
                    &s.properties,
                )
                .with_context(|| format!("listing {h}"))
            })
            .collect()
    }

    /// Mutate the stored cells of `handle` in place.
    pub fn edit_cells<F>(&self, handle: &str, f: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Vec<Vec<String>>),
    {
        let mut sheets = self.sheets.lock().map_err(|_| anyhow!("sheet store poisoned"))?;
        let sheet = sheets.get_mut(handle).ok_or_else(|| anyhow!("no sheet {handle}"))?;
        f(&mut sheet.rows);
        Ok(())
    }

    /// Mutate the stored property map of `handle` in place.
    pub fn edit_properties<F>(&self, handle: &str, f: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut sheets = self.sheets.lock().map_err(|_| anyhow!("sheet store poisoned"))?;
        let sheet = sheets.get_mut(handle).ok_or_else(|| anyhow!("no sheet {handle}"))?;
        f(&mut sheet.properties);
        Ok(())
    }
}

impl StorageAdapter for MemoryAdapter {
    fn fetch(&self, handle: &str) -> anyhow::Result<(SheetMetadata, Vec<Vec<String>>)> {
        let sheets = self.sheets.lock().map_err(|_| anyhow!("sheet store poisoned"))?;
        let sheet = sheets.get(handle).ok_or_else(|| anyhow!("no sheet {handle}"))?;
        let meta = SheetMetadata::from_properties(&sheet.name, &sheet.properties)
            .with_context(|| format!("properties of {handle}"))?;
        Ok((meta, sheet.rows.clone()))
    }

    fn store(
        &self,
        record: &FileRecord,
        manifest: &Manifest,
        grid: &Grid,
    ) -> anyhow::Result<String> {
        let meta = SheetMetadata::describe(&record.name, manifest);
        let handle = format!("sheet-{:04}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut properties = meta.to_properties();
        properties.insert(PROP_SHARED.to_string(), record.shared.to_string());
        let sheet = StoredSheet {
            name: record.name.clone(),
            mime: record.mime.clone(),
            parents: record.parents.clone(),
            properties,
            rows: grid.to_rows(),
        };
        self.sheets
            .lock()
            .map_err(|_| anyhow!("sheet store poisoned"))?
            .insert(handle.clone(), sheet);
        Ok(handle)
    }
}

/// Build `source` and hand the result to `adapter`; returns the new handle.
pub fn upload(
    adapter: &dyn StorageAdapter,
    source: &dyn ByteSource,
    cfg: &CodecConfig,
) -> Result<(String, Packed)> {
    let packed = record::build(source, cfg)?;
    let handle = adapter
        .store(&packed.record, &packed.manifest, &packed.grid)
        .map_err(CodecError::Adapter)?;
    debug!(handle = %handle, name = %packed.record.name, "upload: stored");
    Ok((handle, packed))
}

/// Fetch `handle` from `adapter` and rebuild the file it holds.
pub fn download(
    adapter: &dyn StorageAdapter,
    handle: &str,
    cfg: &CodecConfig,
) -> Result<FileRecord> {
    let (meta, grid_data) = adapter.fetch(handle).map_err(CodecError::Adapter)?;
    let mut rec = record::rebuild(&meta, &grid_data, cfg)?;
    rec.id = Some(handle.to_string());
    Ok(rec)
}
