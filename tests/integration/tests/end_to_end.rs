//! End-to-end tests across the file operations, the store cache and lookup.

use std::fs;
use std::sync::Arc;
use std::thread;

use secretfile_db::lookup::{self, LookupOutcome};
use secretfile_db::{ops, SecretError, SecretStore};
use secretfile_integration_tests::{eager_cache, read_json, Workspace};

#[test]
fn test_init_add_keys_show_remove() {
    let ws = Workspace::new();
    let file = ws.secrets_file("secrets.json");

    ops::init(&file).unwrap();
    ops::add(&file, "user", "alice").unwrap();
    ops::add(&file, "pass", "s3cr3t").unwrap();

    let mut keys = ops::keys(&file).unwrap();
    keys.sort();
    assert_eq!(keys, vec!["pass", "user"]);

    assert_eq!(ops::show(&file, "user").unwrap().unwrap().expose(), "alice");

    assert!(ops::remove(&file, "pass").unwrap());
    assert!(ops::show(&file, "pass").unwrap().is_none());
    assert!(!ops::remove(&file, "pass").unwrap());
}

#[test]
fn test_persisted_layout() {
    let ws = Workspace::new();
    let file = ws.secrets_file("secrets.json");

    ops::init(&file).unwrap();
    ops::add(&file, "zeta", "1").unwrap();
    ops::add(&file, "alpha", "2").unwrap();

    let json = read_json(&file);
    assert!(json["secret_key"].is_string());

    let secrets = json["secrets"].as_object().unwrap();
    let names: Vec<&str> = secrets.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);

    for envelope in secrets.values() {
        let fields: Vec<&str> = envelope.as_str().unwrap().split(':').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "AES");
    }
}

#[test]
fn test_add_to_missing_file_fails() {
    let ws = Workspace::new();
    let file = ws.secrets_file("missing.json");

    let err = ops::add(&file, "user", "alice").unwrap_err();
    assert!(matches!(err, SecretError::FileAccess { .. }));
    assert!(!file.exists());
}

#[test]
fn test_garbage_file_is_malformed() {
    let ws = Workspace::new();
    let file = ws.secrets_file("garbage.json");
    fs::write(&file, "this is not a secrets file").unwrap();

    let err = ops::keys(&file).unwrap_err();
    assert!(matches!(err, SecretError::MalformedStore(_)));
}

#[test]
fn test_lookup_sees_cli_writes() {
    let ws = Workspace::new();
    let file = ws.secrets_file("secrets.json");
    let cache = eager_cache();

    ops::init(&file).unwrap();
    ops::add(&file, "user", "alice").unwrap();

    let outcome = lookup::lookup(&cache, &file, &["user"]).unwrap();
    match outcome {
        LookupOutcome::Found(values) => {
            assert_eq!(values.len(), 1);
            assert_eq!(values[0].key, "user");
            assert_eq!(values[0].value, "alice");
        }
        other => panic!("expected Found, got {other:?}"),
    }

    ops::add(&file, "user", "bob").unwrap();
    let outcome = lookup::lookup(&cache, &file, &["user"]).unwrap();
    match outcome {
        LookupOutcome::Found(values) => assert_eq!(values[0].value, "bob"),
        other => panic!("expected Found, got {other:?}"),
    }
    assert_eq!(cache.loads(), 2);
}

#[test]
fn test_lookup_reports_every_missing_name() {
    let ws = Workspace::new();
    let file = ws.secrets_file("secrets.json");
    let cache = eager_cache();

    ops::init(&file).unwrap();
    ops::add(&file, "user", "alice").unwrap();

    let outcome = lookup::lookup(&cache, &file, &["host", "user", "port"]).unwrap();
    assert_eq!(
        outcome,
        LookupOutcome::NotFound(vec!["host".to_string(), "port".to_string()])
    );
    assert_eq!(
        outcome.message().unwrap(),
        "Secrets with keys [host, port] not found."
    );
}

#[test]
fn test_lookup_missing_file_then_created() {
    let ws = Workspace::new();
    let file = ws.secrets_file("later.json");
    let cache = eager_cache();

    let err = lookup::lookup(&cache, &file, &["user"]).unwrap_err();
    assert!(lookup::error_message(&err).starts_with("Error while looking up secrets: "));

    ops::init(&file).unwrap();
    ops::add(&file, "user", "alice").unwrap();
    assert!(lookup::lookup(&cache, &file, &["user"]).unwrap().is_found());
}

#[test]
fn test_lookup_fails_on_tampered_entry() {
    let ws = Workspace::new();
    let file = ws.secrets_file("secrets.json");
    let cache = eager_cache();

    ops::init(&file).unwrap();
    ops::add(&file, "user", "alice").unwrap();

    let mut json = read_json(&file);
    json["secrets"]["user"] = serde_json::Value::String("AES:not:valid".to_string());
    fs::write(&file, serde_json::to_vec_pretty(&json).unwrap()).unwrap();

    assert!(lookup::lookup(&cache, &file, &["user"]).is_err());
}

#[test]
fn test_store_key_survives_reload() {
    let ws = Workspace::new();
    let file = ws.secrets_file("secrets.json");

    let store = ops::init(&file).unwrap();
    store.add_secret("token", "abc123").unwrap();
    store.save_to(&file).unwrap();

    let reloaded = SecretStore::read_from(&file).unwrap();
    assert_eq!(reloaded.get_secret("token").unwrap().unwrap().expose(), "abc123");
}

#[test]
fn test_concurrent_lookups_share_one_load() {
    let ws = Workspace::new();
    let file = ws.secrets_file("secrets.json");
    ops::init(&file).unwrap();
    ops::add(&file, "user", "alice").unwrap();

    let cache = Arc::new(secretfile_db::StoreCache::new(
        4,
        std::time::Duration::from_secs(60),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let file = file.clone();
            thread::spawn(move || lookup::lookup(&cache, &file, &["user"]).unwrap())
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_found());
    }
    assert_eq!(cache.loads(), 1);
}

#[test]
fn test_files_are_cached_independently() {
    let ws = Workspace::new();
    let cache = eager_cache();

    let first = ws.secrets_file("first.json");
    let second = ws.secrets_file("second.json");
    for (file, value) in [(&first, "one"), (&second, "two")] {
        ops::init(file).unwrap();
        ops::add(file, "name", value).unwrap();
    }

    let a = cache.get(&first).unwrap();
    let b = cache.get(&second).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.get_secret("name").unwrap().unwrap().expose(), "one");
    assert_eq!(b.get_secret("name").unwrap().unwrap().expose(), "two");
    assert_eq!(cache.len(), 2);
    assert!(ws.root().join("first.json").exists());
}
