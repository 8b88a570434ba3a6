//! Durable bearer-token persistence.
//!
//! One key, one raw token string. The browser keeps it in `localStorage`, the
//! terminal front end in a file.

use std::cell::RefCell;

use crate::error::Result;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "authToken";

pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps the token for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.borrow().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.token.borrow_mut().take();
        Ok(())
    }
}

#[cfg(feature = "no-wasm")]
pub use file::FileTokenStore;

#[cfg(feature = "no-wasm")]
mod file {
    use std::io::ErrorKind as IoErrorKind;
    use std::path::{Path, PathBuf};

    use super::TokenStore;
    use crate::error::Result;

    #[derive(Debug, Clone)]
    pub struct FileTokenStore {
        path: PathBuf,
    }

    impl FileTokenStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl TokenStore for FileTokenStore {
        fn load(&self) -> Result<Option<String>> {
            match std::fs::read_to_string(&self.path) {
                Ok(contents) => {
                    let token = contents.trim();
                    Ok((!token.is_empty()).then(|| token.to_string()))
                }
                Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&self, token: &str) -> Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, token)?;
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != IoErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(feature = "wasm")]
pub use local::LocalStorageTokenStore;

#[cfg(feature = "wasm")]
mod local {
    use gloo_storage::{LocalStorage, Storage};

    use super::{TokenStore, TOKEN_KEY};
    use crate::error::{ErrorKind, Result};

    /// Raw `localStorage` item. `gloo_storage` would JSON-encode values, so the
    /// underlying `web_sys::Storage` is used to keep the plain token string.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageTokenStore;

    fn storage_err(e: wasm_bindgen::JsValue) -> crate::error::Error {
        ErrorKind::StorageError(format!("{e:?}")).into()
    }

    impl TokenStore for LocalStorageTokenStore {
        fn load(&self) -> Result<Option<String>> {
            LocalStorage::raw().get_item(TOKEN_KEY).map_err(storage_err)
        }

        fn save(&self, token: &str) -> Result<()> {
            LocalStorage::raw()
                .set_item(TOKEN_KEY, token)
                .map_err(storage_err)
        }

        fn clear(&self) -> Result<()> {
            LocalStorage::raw().remove_item(TOKEN_KEY).map_err(storage_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::default();
        assert_eq!(store.load().unwrap(), None);
        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(feature = "no-wasm")]
    #[test]
    fn file_store_treats_missing_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();

        store.save("secret-token").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("secret-token"));

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(feature = "no-wasm")]
    #[test]
    fn file_store_ignores_blank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::new(path).load().unwrap(), None);
    }
}
