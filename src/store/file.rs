//! JSON file store backend. One file per collection under a configured
//! folder; every mutation rewrites the owning file in full. Collections are
//! also held in memory, so reads never touch disk after startup. Suits the
//! small single-node inventories this serves; anything bigger belongs in a
//! real database behind the same traits.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{
    NewServer, ProfilePatch, RecordId, ServerPatch, ServerRecord, ServerStore, StoreError,
    StoreResult, UserRecord, UserStore,
};

pub struct FileStore {
    users_path: PathBuf,
    servers_path: PathBuf,
    users: RwLock<HashMap<String, UserRecord>>,
    servers: RwLock<HashMap<RecordId, ServerRecord>>,
}

impl FileStore {
    /// Open (or create) a store rooted at `root`. Existing collection files
    /// are loaded eagerly; a file that fails to parse aborts the open rather
    /// than silently starting empty.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .map_err(|e| StoreError::Backend(format!("create {}: {e}", root.display())))?;
        let users_path = root.join("users.json");
        let servers_path = root.join("servers.json");
        let users: Vec<UserRecord> = read_collection(&users_path)?;
        let servers: Vec<ServerRecord> = read_collection(&servers_path)?;
        tracing::debug!(target: "hostbook::store", "file store open root={} users={} servers={}",
            root.display(), users.len(), servers.len());
        Ok(Self {
            users_path,
            servers_path,
            users: RwLock::new(users.into_iter().map(|u| (u.email.clone(), u)).collect()),
            servers: RwLock::new(servers.into_iter().map(|s| (s.id, s)).collect()),
        })
    }

    // Callers hold the matching write lock, so file writes are serialized.
    fn persist_users(&self, users: &HashMap<String, UserRecord>) -> StoreResult<()> {
        let mut items: Vec<&UserRecord> = users.values().collect();
        items.sort_by(|a, b| a.email.cmp(&b.email));
        write_collection(&self.users_path, &items)
    }

    fn persist_servers(&self, servers: &HashMap<RecordId, ServerRecord>) -> StoreResult<()> {
        let mut items: Vec<&ServerRecord> = servers.values().collect();
        items.sort_by_key(|s| s.id);
        write_collection(&self.servers_path, &items)
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(path)
        .map_err(|e| StoreError::Backend(format!("read {}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::Backend(format!("parse {}: {e}", path.display())))
}

fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(items)
        .map_err(|e| StoreError::Backend(format!("encode {}: {e}", path.display())))?;
    fs::write(path, bytes)
        .map_err(|e| StoreError::Backend(format!("write {}: {e}", path.display())))
}

#[async_trait]
impl UserStore for FileStore {
    async fn insert_user(&self, user: UserRecord) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.email) {
            return Err(StoreError::Duplicate("Email already registered".into()));
        }
        users.insert(user.email.clone(), user);
        self.persist_users(&users)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().get(email).cloned())
    }

    async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> StoreResult<u64> {
        let mut users = self.users.write();
        let matched = match users.get_mut(email) {
            Some(user) => {
                patch.apply(user);
                true
            }
            None => false,
        };
        if !matched {
            return Ok(0);
        }
        self.persist_users(&users)?;
        Ok(1)
    }
}

#[async_trait]
impl ServerStore for FileStore {
    async fn insert_server(&self, server: NewServer) -> StoreResult<ServerRecord> {
        let rec = server.into_record();
        let mut servers = self.servers.write();
        servers.insert(rec.id, rec.clone());
        self.persist_servers(&servers)?;
        Ok(rec)
    }

    async fn list_owned(&self, owner_email: &str, limit: usize) -> StoreResult<Vec<ServerRecord>> {
        let servers = self.servers.read();
        Ok(servers
            .values()
            .filter(|s| s.owner_email == owner_email)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<ServerRecord>> {
        Ok(self.servers.read().get(&id).cloned())
    }

    async fn find_owned(
        &self,
        id: RecordId,
        owner_email: &str,
    ) -> StoreResult<Option<ServerRecord>> {
        let servers = self.servers.read();
        Ok(servers
            .get(&id)
            .filter(|s| s.owner_email == owner_email)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: RecordId,
        owner_email: &str,
        patch: &ServerPatch,
    ) -> StoreResult<u64> {
        let mut servers = self.servers.write();
        let matched = match servers.get_mut(&id).filter(|s| s.owner_email == owner_email) {
            Some(rec) => {
                patch.apply(rec);
                true
            }
            None => false,
        };
        if !matched {
            return Ok(0);
        }
        self.persist_servers(&servers)?;
        Ok(1)
    }

    async fn delete_owned(&self, id: RecordId, owner_email: &str) -> StoreResult<u64> {
        let mut servers = self.servers.write();
        let owned = servers
            .get(&id)
            .map(|s| s.owner_email == owner_email)
            .unwrap_or(false);
        if owned {
            servers.remove(&id);
            self.persist_servers(&servers)?;
            Ok(1)
        } else {
            Ok(0)
        }
    }
}
