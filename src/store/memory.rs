//! In-memory store backend. State lives in process maps and is gone on
//! restart; the integration tests run on this, and it serves as the
//! reference behavior for any other backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{
    NewServer, ProfilePatch, RecordId, ServerPatch, ServerRecord, ServerStore, StoreError,
    StoreResult, UserRecord, UserStore,
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    servers: RwLock<HashMap<RecordId, ServerRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: UserRecord) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.email) {
            return Err(StoreError::Duplicate("Email already registered".into()));
        }
        users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().get(email).cloned())
    }

    async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> StoreResult<u64> {
        let mut users = self.users.write();
        match users.get_mut(email) {
            Some(user) => {
                patch.apply(user);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl ServerStore for MemoryStore {
    async fn insert_server(&self, server: NewServer) -> StoreResult<ServerRecord> {
        let rec = server.into_record();
        self.servers.write().insert(rec.id, rec.clone());
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
        match servers.get_mut(&id).filter(|s| s.owner_email == owner_email) {
            Some(rec) => {
                patch.apply(rec);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_owned(&self, id: RecordId, owner_email: &str) -> StoreResult<u64> {
        let mut servers = self.servers.write();
        let owned = servers
            .get(&id)
            .map(|s| s.owner_email == owner_email)
            .unwrap_or(false);
        if owned {
            servers.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}
