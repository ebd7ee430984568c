use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::index::Index;

/// Bumped whenever the on-disk layout of index.bin/docs.bin changes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

/// File layout inside an index directory.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    fn index(&self) -> PathBuf {
        self.root.join("index.bin")
    }
    fn docs(&self) -> PathBuf {
        self.root.join("docs.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

/// Write a built index to its directory: binary postings and store, plus a
/// human-readable meta.json. meta.json is written last so its presence marks
/// a completed build.
pub fn save_index(paths: &IndexPaths, index: &Index, created_at: &str) -> Result<()> {
    fs::create_dir_all(&paths.root)?;
    write_bincode(paths.index(), &index.inverted)?;
    write_bincode(paths.docs(), &index.store)?;
    let meta = MetaFile {
        num_docs: index.store.len() as u32,
        created_at: created_at.to_string(),
        version: FORMAT_VERSION,
    };
    let mut f = File::create(paths.meta())?;
    f.write_all(serde_json::to_string_pretty(&meta)?.as_bytes())?;
    Ok(())
}

/// Load a previously built index. Fails with [`SearchError::IndexNotBuilt`]
/// when the directory holds no completed build (missing meta.json or a
/// foreign format version).
pub fn load_index(paths: &IndexPaths) -> Result<(Index, MetaFile)> {
    let meta_raw = match fs::read_to_string(paths.meta()) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SearchError::IndexNotBuilt {
                path: paths.root.clone(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    let meta: MetaFile = serde_json::from_str(&meta_raw)?;
    if meta.version != FORMAT_VERSION {
        return Err(SearchError::IndexNotBuilt {
            path: paths.root.clone(),
        });
    }
    let inverted = read_bincode(paths.index())?;
    let store = read_bincode(paths.docs())?;
    Ok((Index { inverted, store }, meta))
}

fn write_bincode<T: Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: for<'de> Deserialize<'de>>(path: PathBuf) -> Result<T> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}
