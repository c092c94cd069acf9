//! Asset sources: map a logical asset name to a readable text stream.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader, Cursor},
    path::{Path, PathBuf},
};

use corelib::{LoadError, LoadResult};

/// Opens named assets. The returned stream is owned by the caller and closed on drop.
pub trait AssetSource {
    fn open(&self, name: &str) -> LoadResult<Box<dyn BufRead + '_>>;
}

impl<S: AssetSource + ?Sized> AssetSource for &S {
    fn open(&self, name: &str) -> LoadResult<Box<dyn BufRead + '_>> {
        (**self).open(name)
    }
}

/// Assets stored as files below a root directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectorySource {
    fn open(&self, name: &str) -> LoadResult<Box<dyn BufRead + '_>> {
        let path = self.root.join(name);
        log::debug!("Opening asset '{}' at {}", name, path.display());
        let file = File::open(&path).map_err(|source| LoadError::AssetNotFound {
            name: name.to_owned(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory assets, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    assets: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.assets.insert(name.into(), contents.into());
    }
}

impl AssetSource for MemorySource {
    fn open(&self, name: &str) -> LoadResult<Box<dyn BufRead + '_>> {
        let contents = self
            .assets
            .get(name)
            .ok_or_else(|| LoadError::AssetNotFound {
                name: name.to_owned(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such in-memory asset"),
            })?;
        Ok(Box::new(Cursor::new(contents.as_bytes())))
    }
}

/// Resolve a library name referenced from `obj_name` relative to the OBJ's directory.
pub fn sibling_asset(obj_name: &str, lib_name: &str) -> String {
    match Path::new(obj_name).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            dir.join(lib_name).to_string_lossy().into_owned()
        }
        _ => lib_name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn memory_source_hit_and_miss() {
        let src = MemorySource::new().with("cube.obj", "v 0 0 0\n");
        let mut text = String::new();
        src.open("cube.obj")
            .expect("open cube")
            .read_to_string(&mut text)
            .expect("read cube");
        assert_eq!(text, "v 0 0 0\n");

        let err = src.open("missing.obj").err().expect("miss");
        match err {
            LoadError::AssetNotFound { name, source } => {
                assert_eq!(name, "missing.obj");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_source_reads_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.mtl"), "newmtl A\n").expect("write");
        let src = DirectorySource::new(dir.path());

        let mut text = String::new();
        src.open("a.mtl")
            .expect("open")
            .read_to_string(&mut text)
            .expect("read");
        assert_eq!(text, "newmtl A\n");
        assert!(matches!(
            src.open("b.mtl"),
            Err(LoadError::AssetNotFound { .. })
        ));
    }

    #[test]
    fn sibling_resolution() {
        assert_eq!(sibling_asset("ship.obj", "ship.mtl"), "ship.mtl");
        let nested = sibling_asset("models/ship.obj", "ship.mtl");
        assert_eq!(Path::new(&nested), Path::new("models").join("ship.mtl"));
    }
}
