use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use questforge_game::SnapshotStore;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Snapshot store keeping one JSON file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path, source: io::Error) -> FileStoreError {
    FileStoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SnapshotStore for FileStore {
    type Error = FileStoreError;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path, err)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir).map_err(|err| io_error(&self.dir, err))?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(|err| io_error(&staging, err))?;
        fs::rename(&staging, &path).map_err(|err| io_error(&path, err))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "questforge-store-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn save_load_remove_cycle() {
        let store = FileStore::new(temp_dir("cycle"));
        assert_eq!(store.load("questforge.stats").unwrap(), None);
        store.save("questforge.stats", "{\"xp\":3}").unwrap();
        assert_eq!(
            store.load("questforge.stats").unwrap().as_deref(),
            Some("{\"xp\":3}")
        );
        assert!(store.dir().join("questforge.stats.json").exists());
        store.remove("questforge.stats").unwrap();
        store.remove("questforge.stats").unwrap();
        assert_eq!(store.load("questforge.stats").unwrap(), None);
        let _ = fs::remove_dir_all(store.dir());
    }
}
