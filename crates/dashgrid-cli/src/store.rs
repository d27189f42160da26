//! Directory-backed layout storage: one `<key>.json` file per storage key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dashgrid_layout::LayoutStore;

use crate::error::CliError;

#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl LayoutStore for DirStore {
    type Error = CliError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        tracing::debug!(path = %path.display(), bytes = value.len(), "writing layout value");
        fs::write(path, value)?;
        Ok(())
    }
}
