//! LocalStorage wrapper.
//!
//! Values are stored raw (not JSON-encoded) so other tools reading
//! `localStorage` see plain strings like `dark`.

use dinawin::KeyValueStore;

/// Browser `localStorage`. Every method degrades to "nothing stored" when
/// storage is unavailable (private mode, disabled cookies).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

