use std::cell::RefCell;

use map_sketcher_model::AuthSession;

/// Process-wide auth state with an explicit lifecycle: written on successful
/// login, read when a dashboard mounts, cleared on logout. Injected rather
/// than reached for as an ambient global.
pub trait SessionStore {
    fn save(&self, session: &AuthSession);
    fn load(&self) -> Option<AuthSession>;
    fn clear(&self);
}

/// In-memory store for native use and tests.
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<AuthSession>>,
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &AuthSession) {
        *self.slot.borrow_mut() = Some(session.clone());
    }

    fn load(&self) -> Option<AuthSession> {
        self.slot.borrow().clone()
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

/// Browser localStorage under the `token`/`user` keys. Storage failures are
/// logged and swallowed; losing the session just means logging in again.
#[cfg(target_arch = "wasm32")]
pub struct BrowserStore;

#[cfg(target_arch = "wasm32")]
const TOKEN_KEY: &str = "token";
#[cfg(target_arch = "wasm32")]
const USER_KEY: &str = "user";

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for BrowserStore {
    fn save(&self, session: &AuthSession) {
        let Some(storage) = Self::storage() else {
            log::warn!("localStorage unavailable, session not persisted");
            return;
        };
        let user = match serde_json::to_string(&session.user) {
            Ok(user) => user,
            Err(err) => {
                log::warn!("failed to serialize user: {err}");
                return;
            }
        };
        if storage.set_item(TOKEN_KEY, &session.token).is_err()
            || storage.set_item(USER_KEY, &user).is_err()
        {
            log::warn!("failed to write session to localStorage");
        }
    }

    fn load(&self) -> Option<AuthSession> {
        let storage = Self::storage()?;
        let token = storage.get_item(TOKEN_KEY).ok()??;
        let user = storage.get_item(USER_KEY).ok()??;
        let user = serde_json::from_str(&user).ok()?;
        Some(AuthSession { token, user })
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }
}
