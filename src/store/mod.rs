//!
//! hostbook store module
//! ---------------------
//! Document-style persistence for the two record kinds the API serves:
//! user accounts (keyed by email) and server inventory entries (keyed by an
//! opaque `RecordId` assigned at insert time). Two interchangeable backends
//! implement the same traits: an in-memory map store and a JSON file store
//! for durable single-node deployments.
//!
//! Key responsibilities:
//! - Assign internal identifiers and keep their external string form stable.
//! - Enforce email uniqueness on account creation.
//! - Apply partial updates, touching only the fields a patch carries.
//! - Scope server lookups and mutations by owner in a single predicate.
//!
//! The HTTP layer consumes these traits as `Arc<dyn UserStore>` and
//! `Arc<dyn ServerStore>`; nothing above this module knows which backend is
//! live.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod file;
pub mod memory;

/// Internal key of a server record. Callers only ever see its `Display`
/// form; `parse` is the single road back, so every endpoint shares the same
/// notion of a malformed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Mint a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the external string form back into an identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidRecordId> {
        Uuid::parse_str(s).map(Self).map_err(|_| InvalidRecordId)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The supplied string is not a well-formed record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid record identifier")]
pub struct InvalidRecordId;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule was violated. The message is caller-presentable.
    #[error("{0}")]
    Duplicate(String),
    /// The backend itself failed (I/O, corrupt data). Not a domain outcome.
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A registered account. Emails compare byte-for-byte; no case folding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

impl UserRecord {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
            first_name: None,
            last_name: None,
            age: None,
            phone: None,
            profile_photo: None,
        }
    }
}

/// A stored inventory entry. `owner_email` is stamped at insert and never
/// rewritten by any patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: RecordId,
    pub name: String,
    pub ip_address: String,
    pub status: String,
    pub owner_email: String,
}

/// Insert payload for a server record; the store assigns the identifier.
#[derive(Debug, Clone)]
pub struct NewServer {
    pub name: String,
    pub ip_address: String,
    pub status: String,
    pub owner_email: String,
}

impl NewServer {
    /// Materialize as a stored record under a freshly assigned identifier.
    pub fn into_record(self) -> ServerRecord {
        ServerRecord {
            id: RecordId::new(),
            name: self.name,
            ip_address: self.ip_address,
            status: self.status,
            owner_email: self.owner_email,
        }
    }
}

/// Partial update for a server record. `None` means "leave untouched", so a
/// field can be rewritten but never cleared through this type. Patches only
/// travel request-side; they are never persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerPatch {
    pub name: Option<String>,
    pub ip_address: Option<String>,
    pub status: Option<String>,
}

impl ServerPatch {
    /// True when no field is set and the write can be skipped entirely.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.ip_address.is_none() && self.status.is_none()
    }

    pub fn apply(&self, server: &mut ServerRecord) {
        if let Some(v) = &self.name {
            server.name = v.clone();
        }
        if let Some(v) = &self.ip_address {
            server.ip_address = v.clone();
        }
        if let Some(v) = &self.status {
            server.status = v.clone();
        }
    }
}

/// Partial update for an account's profile fields. Same present-field
/// semantics as [`ServerPatch`]; credentials are not reachable from here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub profile_photo: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.age.is_none()
            && self.phone.is_none()
            && self.profile_photo.is_none()
    }

    pub fn apply(&self, user: &mut UserRecord) {
        if let Some(v) = &self.first_name {
            user.first_name = Some(v.clone());
        }
        if let Some(v) = &self.last_name {
            user.last_name = Some(v.clone());
        }
        if let Some(v) = self.age {
            user.age = Some(v);
        }
        if let Some(v) = &self.phone {
            user.phone = Some(v.clone());
        }
        if let Some(v) = &self.profile_photo {
            user.profile_photo = Some(v.clone());
        }
    }
}

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::Duplicate`] when the
    /// email is already registered.
    async fn insert_user(&self, user: UserRecord) -> StoreResult<()>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Apply the set fields of `patch` to the account. Returns the number of
    /// matched records: 0 when the email is unknown, 1 otherwise, even for a
    /// patch with nothing set.
    async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> StoreResult<u64>;
}

/// Server inventory persistence. Methods that take an `owner_email` match on
/// (id AND owner) as one predicate, so a record owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait ServerStore: Send + Sync {
    /// Persist a new record and return it with its assigned identifier.
    async fn insert_server(&self, server: NewServer) -> StoreResult<ServerRecord>;

    /// All records owned by `owner_email`, at most `limit` of them. Ordering
    /// is backend-defined.
    async fn list_owned(&self, owner_email: &str, limit: usize) -> StoreResult<Vec<ServerRecord>>;

    /// Lookup by identifier alone, regardless of owner.
    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<ServerRecord>>;

    /// Lookup by (id AND owner).
    async fn find_owned(&self, id: RecordId, owner_email: &str)
        -> StoreResult<Option<ServerRecord>>;

    /// Apply `patch` to the record matching (id AND owner). Returns the
    /// matched count, 0 or 1.
    async fn update_owned(
        &self,
        id: RecordId,
        owner_email: &str,
        patch: &ServerPatch,
    ) -> StoreResult<u64>;

    /// Delete the record matching (id AND owner). Returns the deleted count,
    /// 0 or 1.
    async fn delete_owned(&self, id: RecordId, owner_email: &str) -> StoreResult<u64>;
}

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
