use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Object store seam: string bodies keyed by flat string keys.
pub trait ObjectStore {
    fn get(&self, key: &str) -> Result<String, StoreError>;
    fn put(&mut self, key: &str, body: &str) -> Result<(), StoreError>;
}

/// Filesystem-backed store: one file per object in a flat directory.
#[derive(Debug)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl ObjectStore for DirStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        match fs::read_to_string(self.dir.join(key)) {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, body: &str) -> Result<(), StoreError> {
        fs::write(self.dir.join(key), body)?;
        Ok(())
    }
}

/// In-memory store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&mut self, key: &str, body: &str) -> Result<(), StoreError> {
        self.objects.insert(key.to_string(), body.to_string());
        Ok(())
    }
}
