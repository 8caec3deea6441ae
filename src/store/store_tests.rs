use super::*;

#[test]
fn test_record_id_roundtrip() {
    let id = RecordId::new();
    let rendered = id.to_string();
    // canonical hyphenated form
    assert_eq!(rendered.len(), 36);
    assert_eq!(rendered.matches('-').count(), 4);
    let parsed = RecordId::parse(&rendered).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_record_id_rejects_garbage() {
    for bad in ["", "abc", "not-a-uuid-at-all", "0123456789abcdef01234567", "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"] {
        assert!(RecordId::parse(bad).is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn test_server_patch_applies_only_set_fields() {
    let mut rec = ServerRecord {
        id: RecordId::new(),
        name: "web-1".into(),
        ip_address: "10.0.0.1".into(),
        status: "active".into(),
        owner_email: "a@example.com".into(),
    };
    let patch = ServerPatch { status: Some("retired".into()), ..Default::default() };
    assert!(!patch.is_empty());
    patch.apply(&mut rec);
    assert_eq!(rec.status, "retired");
    assert_eq!(rec.name, "web-1");
    assert_eq!(rec.ip_address, "10.0.0.1");
    assert_eq!(rec.owner_email, "a@example.com");

    assert!(ServerPatch::default().is_empty());
}

#[test]
fn test_profile_patch_never_clears() {
    let mut user = UserRecord::new("a@example.com", "$argon2$fake");
    user.first_name = Some("Ada".into());
    let patch = ProfilePatch { age: Some(25), ..Default::default() };
    patch.apply(&mut user);
    assert_eq!(user.age, Some(25));
    // absent fields stay put
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert!(ProfilePatch::default().is_empty());
}

#[tokio::test]
async fn test_memory_user_insert_find_and_duplicate() {
    let store = MemoryStore::new();
    store.insert_user(UserRecord::new("a@example.com", "h1")).await.unwrap();
    let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
    assert_eq!(found.password_hash, "h1");
    assert!(store.find_by_email("b@example.com").await.unwrap().is_none());

    let dup = store.insert_user(UserRecord::new("a@example.com", "h2")).await;
    assert!(matches!(dup, Err(StoreError::Duplicate(_))));
    // original untouched
    let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
    assert_eq!(found.password_hash, "h1");
}

#[tokio::test]
async fn test_memory_update_profile_matched_counts() {
    let store = MemoryStore::new();
    store.insert_user(UserRecord::new("a@example.com", "h")).await.unwrap();

    let patch = ProfilePatch { first_name: Some("Ada".into()), ..Default::default() };
    assert_eq!(store.update_profile("a@example.com", &patch).await.unwrap(), 1);
    assert_eq!(store.update_profile("nobody@example.com", &patch).await.unwrap(), 0);

    let user = store.find_by_email("a@example.com").await.unwrap().unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_memory_server_ownership_scoping() {
    let store = MemoryStore::new();
    let rec = store
        .insert_server(NewServer {
            name: "web-1".into(),
            ip_address: "10.0.0.1".into(),
            status: "active".into(),
            owner_email: "a@example.com".into(),
        })
        .await
        .unwrap();

    // owner sees it, everyone else does not
    assert!(store.find_owned(rec.id, "a@example.com").await.unwrap().is_some());
    assert!(store.find_owned(rec.id, "b@example.com").await.unwrap().is_none());
    assert!(store.find_by_id(rec.id).await.unwrap().is_some());
    assert_eq!(store.list_owned("a@example.com", 100).await.unwrap().len(), 1);
    assert!(store.list_owned("b@example.com", 100).await.unwrap().is_empty());

    let patch = ServerPatch { status: Some("down".into()), ..Default::default() };
    assert_eq!(store.update_owned(rec.id, "b@example.com", &patch).await.unwrap(), 0);
    assert_eq!(store.update_owned(rec.id, "a@example.com", &patch).await.unwrap(), 1);
    let seen = store.find_by_id(rec.id).await.unwrap().unwrap();
    assert_eq!(seen.status, "down");

    assert_eq!(store.delete_owned(rec.id, "b@example.com").await.unwrap(), 0);
    assert_eq!(store.delete_owned(rec.id, "a@example.com").await.unwrap(), 1);
    assert!(store.find_by_id(rec.id).await.unwrap().is_none());
    assert_eq!(store.delete_owned(rec.id, "a@example.com").await.unwrap(), 0);
}

#[tokio::test]
async fn test_memory_list_owned_honors_limit() {
    let store = MemoryStore::new();
    for i in 0..5 {
        store
            .insert_server(NewServer {
                name: format!("srv-{i}"),
                ip_address: format!("10.0.0.{i}"),
                status: "active".into(),
                owner_email: "a@example.com".into(),
            })
            .await
            .unwrap();
    }
    assert_eq!(store.list_owned("a@example.com", 3).await.unwrap().len(), 3);
    assert_eq!(store.list_owned("a@example.com", 100).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_file_store_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();

    let rec_id = {
        let store = FileStore::open(tmp.path()).unwrap();
        store.insert_user(UserRecord::new("a@example.com", "h1")).await.unwrap();
        let patch = ProfilePatch { first_name: Some("Ada".into()), ..Default::default() };
        store.update_profile("a@example.com", &patch).await.unwrap();
        let rec = store
            .insert_server(NewServer {
                name: "web-1".into(),
                ip_address: "10.0.0.1".into(),
                status: "active".into(),
                owner_email: "a@example.com".into(),
            })
            .await
            .unwrap();
        rec.id
    };

    let store = FileStore::open(tmp.path()).unwrap();
    let user = store.find_by_email("a@example.com").await.unwrap().unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    let rec = store.find_owned(rec_id, "a@example.com").await.unwrap().unwrap();
    assert_eq!(rec.name, "web-1");
    assert_eq!(rec.ip_address, "10.0.0.1");
}

#[tokio::test]
async fn test_file_store_duplicate_and_delete() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileStore::open(tmp.path()).unwrap();

    store.insert_user(UserRecord::new("a@example.com", "h1")).await.unwrap();
    let dup = store.insert_user(UserRecord::new("a@example.com", "h2")).await;
    assert!(matches!(dup, Err(StoreError::Duplicate(_))));

    let rec = store
        .insert_server(NewServer {
            name: "web-1".into(),
            ip_address: "10.0.0.1".into(),
            status: "active".into(),
            owner_email: "a@example.com".into(),
        })
        .await
        .unwrap();
    assert_eq!(store.delete_owned(rec.id, "b@example.com").await.unwrap(), 0);
    assert_eq!(store.delete_owned(rec.id, "a@example.com").await.unwrap(), 1);

    // deletion reaches disk, not just the in-memory map
    let reopened = FileStore::open(tmp.path()).unwrap();
    assert!(reopened.find_by_id(rec.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_rejects_corrupt_collection() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("servers.json"), b"{ not json").unwrap();
    let res = FileStore::open(tmp.path());
    assert!(matches!(res, Err(StoreError::Backend(_))));
}
