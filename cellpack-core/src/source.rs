use std::path::{Path, PathBuf};

use crate::error::Result;

/// Something that can hand over a file's full contents and its logical name.
pub trait ByteSource {
    fn name(&self) -> String;
    fn read(&self) -> Result<Vec<u8>>;
}

/// A file on local disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    /// Named after the final path component.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, name }
    }

    /// Named by its path relative to `root`, with `/` separators.
    pub fn relative_to(path: impl Into<PathBuf>, root: &Path) -> Self {
        let path = path.into();
        let name = match pathdiff::diff_paths(&path, root) {
            Some(rel) => rel.to_string_lossy().replace('\\', "/"),
            None => return Self::new(path),
        };
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// Bytes already in memory.
#[derive(Clone, Debug)]
pub struct MemorySource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }
}

impl ByteSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Collect every regular file under `root` (sorted), named relative to it.
pub fn discover(root: &Path) -> Result<Vec<FileSource>> {
    let mut out = Vec::new();
    for ent in walkdir::WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let ent = ent.map_err(std::io::Error::from)?;
        if !ent.file_type().is_file() {
            continue;
        }
        out.push(FileSource::relative_to(ent.path(), root));
    }
    Ok(out)
}
