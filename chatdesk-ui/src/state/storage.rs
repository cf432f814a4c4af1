//! `window.localStorage` as durable session storage

use std::rc::Rc;

use chatdesk::session::{DurableStorage, MemoryStorage, StorageError, StorageResult};
use wasm_bindgen::JsValue;

/// Storage handle shared by the session store and the API client
pub type SharedStorage = Rc<dyn DurableStorage>;

/// Browser local storage
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { inner })
    }
}

impl DurableStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key).map_err(js_error)
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner.clear().map_err(js_error)
    }
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", err))
}

/// Local storage when the browser allows it, otherwise an in-memory
/// store that lasts until the page is closed
pub fn shared_storage() -> SharedStorage {
    match BrowserStorage::local() {
        Ok(storage) => Rc::new(storage),
        Err(e) => {
            tracing::warn!(error = %e, "localStorage unavailable, session will not persist");
            Rc::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_round_trip() {
        let storage = BrowserStorage::local().unwrap();
        storage.set_item("chatdesk-test", "1").unwrap();
        assert_eq!(storage.get_item("chatdesk-test").unwrap().as_deref(), Some("1"));

        storage.remove_item("chatdesk-test").unwrap();
        assert_eq!(storage.get_item("chatdesk-test").unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn shared_storage_is_usable() {
        let storage = shared_storage();
        storage.set_item("chatdesk-shared", "x").unwrap();
        assert_eq!(storage.get_item("chatdesk-shared").unwrap().as_deref(), Some("x"));
        storage.remove_item("chatdesk-shared").unwrap();
    }
}
