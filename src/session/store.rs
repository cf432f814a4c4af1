//! Session store
//!
//! Holds the signed-in user in memory and mirrors it into durable storage
//! under fixed keys. The store is owned by the UI thread and passed
//! explicitly to whoever needs it (the navigation guard in particular).

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::storage::{DurableStorage, StorageResult};

pub const KEY_TOKEN: &str = "token";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_USERNAME: &str = "username";
pub const KEY_EMAIL: &str = "userEmail";
pub const KEY_ROLE: &str = "userRole";
pub const KEY_IS_ACTIVE: &str = "isActive";
pub const KEY_VIP_UNTIL: &str = "vipUntil";
pub const KEY_CREATED_AT: &str = "createdAt";

/// Every durable key the session owns
pub const SESSION_KEYS: [&str; 8] = [
    KEY_TOKEN,
    KEY_USER_ID,
    KEY_USERNAME,
    KEY_EMAIL,
    KEY_ROLE,
    KEY_IS_ACTIVE,
    KEY_VIP_UNTIL,
    KEY_CREATED_AT,
];

/// Account role as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Other(String),
}

impl Role {
    pub fn parse(role: &str) -> Self {
        match role {
            "admin" => Role::Admin,
            "user" => Role::User,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Other(role) => role,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Role::parse(&role)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a successful `POST /api/token`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub vip_until: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: bool,
    pub vip_until: Option<String>,
    pub created_at: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_admin)
    }

    /// VIP expiry, if one is recorded and parseable
    pub fn vip_expiry(&self) -> Option<DateTime<Utc>> {
        self.vip_until.as_deref().and_then(parse_timestamp)
    }

    /// Whether VIP benefits apply at `now`
    pub fn vip_active(&self, now: DateTime<Utc>) -> bool {
        self.vip_expiry().is_some_and(|until| until > now)
    }
}

impl From<&LoginResponse> for Session {
    fn from(response: &LoginResponse) -> Self {
        Self {
            token: response.access_token.clone(),
            user_id: Some(response.id),
            username: Some(response.username.clone()),
            email: response.email.clone(),
            role: Some(response.role.clone()),
            is_active: response.is_active,
            vip_until: response.vip_until.clone(),
            created_at: response.created_at.clone(),
        }
    }
}

/// Timestamps arrive as RFC 3339, or naive ISO 8601 meaning UTC
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// In-memory session mirrored into durable storage
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    session: Option<Session>,
}

impl<S: DurableStorage> SessionStore<S> {
    /// Empty store over `storage`; nothing is read yet
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    /// Rebuild the in-memory session from durable storage
    pub fn restore(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.session = store.read_session();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Record a successful login in memory and in durable storage
    pub fn set_user_info(&mut self, response: &LoginResponse) -> StorageResult<()> {
        let session = Session::from(response);

        self.storage.set_item(KEY_TOKEN, &session.token)?;
        self.storage.set_item(KEY_USER_ID, &response.id.to_string())?;
        self.storage.set_item(KEY_USERNAME, &response.username)?;
        self.put_optional(KEY_EMAIL, session.email.as_deref())?;
        self.storage.set_item(KEY_ROLE, response.role.as_str())?;
        self.storage
            .set_item(KEY_IS_ACTIVE, if session.is_active { "true" } else { "false" })?;
        self.put_optional(KEY_VIP_UNTIL, session.vip_until.as_deref())?;
        self.put_optional(KEY_CREATED_AT, session.created_at.as_deref())?;

        tracing::info!(username = %response.username, role = %response.role, "Session started");
        self.session = Some(session);
        Ok(())
    }

    /// Drop the in-memory session and erase every session key.
    ///
    /// Every key is attempted even if one fails; the first error is
    /// returned.
    pub fn clear_user_info(&mut self) -> StorageResult<()> {
        self.session = None;

        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, error = %e, "Failed to remove session key");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Token as currently persisted, read at call time
    pub fn stored_token(&self) -> Option<String> {
        self.read_key(KEY_TOKEN)
    }

    /// Role as currently persisted, read at call time
    pub fn stored_role(&self) -> Option<Role> {
        self.read_key(KEY_ROLE).map(Role::from)
    }

    fn put_optional(&self, key: &str, value: Option<&str>) -> StorageResult<()> {
        match value {
            Some(value) => self.storage.set_item(key, value),
            None => self.storage.remove_item(key),
        }
    }

    /// Read errors are logged and treated as absence
    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read session key");
                None
            }
        }
    }

    fn read_session(&self) -> Option<Session> {
        let token = self.stored_token()?;
        Some(Session {
            token,
            user_id: self.read_key(KEY_USER_ID).and_then(|id| id.parse().ok()),
            username: self.read_key(KEY_USERNAME),
            email: self.read_key(KEY_EMAIL),
            role: self.stored_role(),
            is_active: self.read_key(KEY_IS_ACTIVE).as_deref() == Some("true"),
            vip_until: self.read_key(KEY_VIP_UNTIL),
            created_at: self.read_key(KEY_CREATED_AT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::{MemoryStorage, StorageError};
    use chrono::TimeZone;

    fn login_response(role: Role) -> LoginResponse {
        LoginResponse {
            access_token: "tok-123".to_string(),
            token_type: Some("bearer".to_string()),
            id: 42,
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            role,
            is_active: true,
            vip_until: Some("2030-01-01T00:00:00+00:00".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("vip"), Role::Other("vip".to_string()));
        assert_eq!(Role::Other("vip".to_string()).as_str(), "vip");
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_login_response_deserializes() {
        let response: LoginResponse = serde_json::from_str(
            r#"{
                "access_token": "abc",
                "token_type": "bearer",
                "id": 7,
                "username": "bob",
                "email": "bob@example.com",
                "role": "admin",
                "is_active": true,
                "vip_until": null
            }"#,
        )
        .unwrap();
        assert_eq!(response.role, Role::Admin);
        assert_eq!(response.vip_until, None);
        assert_eq!(response.created_at, None);
    }

    #[test]
    fn test_set_user_info_writes_keys() {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::new(&storage);
        store.set_user_info(&login_response(Role::User)).unwrap();

        assert!(store.is_authenticated());
        assert!(!store.is_admin());
        assert_eq!(storage.get_item(KEY_TOKEN).unwrap().as_deref(), Some("tok-123"));
        assert_eq!(storage.get_item(KEY_USER_ID).unwrap().as_deref(), Some("42"));
        assert_eq!(storage.get_item(KEY_ROLE).unwrap().as_deref(), Some("user"));
        assert_eq!(storage.get_item(KEY_IS_ACTIVE).unwrap().as_deref(), Some("true"));
        assert_eq!(storage.get_item(KEY_CREATED_AT).unwrap(), None);
    }

    #[test]
    fn test_clear_user_info_erases_session_keys_only() {
        let storage = MemoryStorage::new();
        storage.set_item("apiUrl", "http://example.test").unwrap();

        let mut store = SessionStore::new(&storage);
        store.set_user_info(&login_response(Role::Admin)).unwrap();
        store.clear_user_info().unwrap();

        assert!(store.session().is_none());
        for key in SESSION_KEYS {
            assert_eq!(storage.get_item(key).unwrap(), None, "{} survived", key);
        }
        assert!(storage.get_item("apiUrl").unwrap().is_some());
    }

    #[test]
    fn test_restore_from_storage() {
        let storage = MemoryStorage::new();
        {
            let mut store = SessionStore::new(&storage);
            store.set_user_info(&login_response(Role::Admin)).unwrap();
        }

        let store = SessionStore::restore(&storage);
        let session = store.session().unwrap();
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.user_id, Some(42));
        assert_eq!(session.username.as_deref(), Some("alice"));
        assert!(session.is_active);
        assert!(store.is_admin());
    }

    #[test]
    fn test_restore_without_token_is_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(KEY_USERNAME, "ghost").unwrap();
        let store = SessionStore::restore(&storage);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_stored_values_are_read_live() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(&storage);
        assert_eq!(store.stored_token(), None);

        storage.set_item(KEY_TOKEN, "late").unwrap();
        storage.set_item(KEY_ROLE, "admin").unwrap();
        assert_eq!(store.stored_token().as_deref(), Some("late"));
        assert_eq!(store.stored_role(), Some(Role::Admin));
        // The in-memory session is untouched
        assert!(!store.is_authenticated());

        storage.set_item(KEY_TOKEN, "").unwrap();
        assert_eq!(store.stored_token(), None);
    }

    #[test]
    fn test_vip_active() {
        let session = Session::from(&login_response(Role::User));
        let before = Utc.with_ymd_and_hms(2029, 6, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
        assert!(session.vip_active(before));
        assert!(!session.vip_active(after));

        let naive = Session {
            vip_until: Some("2030-01-01T00:00:00.123".to_string()),
            ..session.clone()
        };
        assert!(naive.vip_active(before));

        let none = Session {
            vip_until: None,
            ..session
        };
        assert!(!none.vip_active(before));
    }

    /// Storage whose removals always fail
    struct StickyStorage(MemoryStorage);

    impl DurableStorage for StickyStorage {
        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            self.0.set_item(key, value)
        }

        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }

        fn clear(&self) -> StorageResult<()> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_clear_reports_storage_failure_but_drops_memory() {
        let mut store = SessionStore::restore(StickyStorage(MemoryStorage::new()));
        store.storage().set_item(KEY_TOKEN, "t").unwrap();
        store.session = store.read_session();
        assert!(store.is_authenticated());

        assert!(store.clear_user_info().is_err());
        assert!(!store.is_authenticated());
    }
}
