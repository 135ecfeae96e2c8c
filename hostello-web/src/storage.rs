//! `localStorage` behind the credential store seam.

use gloo_storage::{LocalStorage, Storage};
use shared::session::{KeyValueStore, StorageError};

/// Browser `localStorage`, values stored as plain strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|error| StorageError::Write {
                key: key.to_string(),
                reason: error.as_string().unwrap_or_else(|| format!("{error:?}")),
            })
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use shared::session::CredentialStore;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn values_are_stored_verbatim() {
        BrowserStorage.set("hostello-test", "tok").unwrap();
        assert_eq!(
            LocalStorage::raw().get_item("hostello-test").unwrap().as_deref(),
            Some("tok")
        );
        BrowserStorage.remove("hostello-test");
        assert_eq!(BrowserStorage.get("hostello-test"), None);
    }

    #[wasm_bindgen_test]
    fn stringified_undefined_reads_as_absent() {
        BrowserStorage.set("accessToken", "undefined").unwrap();
        let credentials = CredentialStore::new(Rc::new(BrowserStorage));
        assert_eq!(credentials.access_token(), None);
        credentials.clear();
    }
}
