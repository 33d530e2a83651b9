use chainlens_core::registry::{read_chain_registry, read_deployed_addresses};
use chainlens_core::{ChainIdValue, LocalConfig, RegistryError, config_files_present};
use std::fs;

#[test]
fn test_duplicate_chain_ids_resolve_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    // "zeta" sorts after "alpha" but comes first in the file.
    fs::write(
        dir.path().join("chains.json"),
        r#"{
            "zeta": { "name": "zeta", "chainId": 777 },
            "alpha": { "name": "alpha", "chainId": "777" }
        }"#,
    )
    .unwrap();

    let local = LocalConfig::load(Some(dir.path()));
    let (name, entry) = local.lookup_local("777").unwrap();
    assert_eq!(name, "zeta");
    assert_eq!(entry.chain_id, ChainIdValue::Number(777));

    let names: Vec<_> = local.chains().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
}

#[test]
fn test_malformed_entries_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("chains.json"),
        r#"{
            "broken": { "name": "broken" },
            "ok": { "name": "ok", "chainId": 31337 }
        }"#,
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("artifacts")).unwrap();
    fs::write(
        dir.path().join("artifacts/addresses.json"),
        r#"{ "ok": { "mailbox": 12 }, "other": { "mailbox": "0x1" } }"#,
    )
    .unwrap();

    let chains = read_chain_registry(dir.path()).unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].0, "ok");

    let addresses = read_deployed_addresses(dir.path()).unwrap();
    assert!(addresses.get("ok").is_none());
    assert_eq!(addresses["other"].mailbox.as_deref(), Some("0x1"));
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!config_files_present(dir.path()));
    assert!(matches!(
        read_chain_registry(dir.path()),
        Err(RegistryError::Missing(_))
    ));

    fs::write(dir.path().join("chains.json"), "[1, 2]").unwrap();
    assert!(matches!(
        read_chain_registry(dir.path()),
        Err(RegistryError::NotAnObject(_))
    ));

    fs::write(dir.path().join("chains.json"), "{").unwrap();
    let err = read_chain_registry(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Json { .. }));
    assert!(err.to_string().contains("chains.json"));

    let local = LocalConfig::load(Some(dir.path()));
    assert!(local.chains().is_empty());
    assert!(!local.config_files_present());
}

#[test]
fn test_missing_config_dir_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let local = LocalConfig::load(Some(&missing));
    assert!(!local.config_files_present());
    assert!(local.lookup_local("31337").is_none());
    assert!(local.lookup_deployed("anvil1").is_none());
}
