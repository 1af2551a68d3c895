//! End-to-end tests across the trust boundary: canonical identity,
//! attestation, write admission, and validation gates working together.

use attest_kernel::{
    AuditKernel, ContentAddress, KernelConfig, Keypair, MemoryStore, SqliteStore, Value,
};

fn kernel_with_memory() -> AuditKernel<MemoryStore> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    AuditKernel::new(
        Keypair::from_seed(&[0x42; 32]),
        MemoryStore::new(),
        KernelConfig::default(),
    )
}

#[tokio::test]
async fn attested_record_survives_store_and_verifies() {
    let kernel = kernel_with_memory();
    let event = Value::from_json_str(
        r#"{"event": "tool_call", "tool_server": "db", "tool_name": "upsert", "seq": 7}"#,
    )
    .unwrap();

    let record = kernel.record(&event).await.unwrap();
    assert_eq!(
        record.address,
        ContentAddress::digest(&record.payload),
        "address is the digest of the canonical payload"
    );

    let fetched = kernel.fetch(&record.address).await.unwrap().unwrap();
    assert!(kernel.verify_record(&fetched));
}

#[tokio::test]
async fn semantically_equal_events_share_identity() {
    let kernel = kernel_with_memory();
    let e1 = Value::from_json_str(r#"{"seq": 10, "event": "tool_call"}"#).unwrap();
    let e2 = Value::from_json_str(r#"{"event": "tool_call", "seq": 1e1}"#).unwrap();

    let r1 = kernel.record(&e1).await.unwrap();
    let r2 = kernel.record(&e2).await.unwrap();
    assert_eq!(r1.address, r2.address);
    assert_eq!(r1.signature, r2.signature, "deterministic signing");
}

#[tokio::test]
async fn gated_write_executes_at_most_once() {
    let kernel = kernel_with_memory();
    let event = Value::from_json_str(r#"{"op": "transfer", "amount": 10}"#).unwrap();

    let first = kernel.record_write("txn-001", &event).await.unwrap();
    let second = kernel.record_write("txn-001", &event).await.unwrap();
    assert_eq!(first, second);

    // A different key is a different write.
    let third = kernel.record_write("txn-002", &event).await.unwrap();
    assert_eq!(third.address, first.address);
}

#[tokio::test]
async fn gated_write_replays_even_with_changed_payload() {
    let kernel = kernel_with_memory();
    let v1 = Value::from_json_str(r#"{"op": "transfer", "amount": 10}"#).unwrap();
    let v2 = Value::from_json_str(r#"{"op": "transfer", "amount": 9999}"#).unwrap();

    let first = kernel.record_write("txn-001", &v1).await.unwrap();
    let replayed = kernel.record_write("txn-001", &v2).await.unwrap();
    assert_eq!(
        replayed.address, first.address,
        "resubmission returns the first outcome, not a new effect"
    );
}

#[tokio::test]
async fn idempotency_ledger_is_durable_across_reopen() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("kernel.db");
    let seed = [0x42u8; 32];
    let event = Value::from_json_str(r#"{"op": "transfer"}"#)?;

    let first = {
        let kernel = AuditKernel::new(
            Keypair::from_seed(&seed),
            SqliteStore::open(&path)?,
            KernelConfig::default(),
        );
        kernel.record_write("txn-001", &event).await?
    };

    // A new process over the same database must still replay, not re-run.
    let kernel = AuditKernel::new(
        Keypair::from_seed(&seed),
        SqliteStore::open(&path)?,
        KernelConfig::default(),
    );
    let poisoned = Value::from_json_str(r#"{"op": "transfer", "amount": -1}"#)?;
    let replayed = kernel.record_write("txn-001", &poisoned).await?;
    assert_eq!(replayed.address, first.address);
    Ok(())
}

#[tokio::test]
async fn registry_and_config_gates_hold() {
    let kernel = kernel_with_memory();

    let registry = kernel
        .load_registry(
            r#"{"tools":[
                {"tool_server":"fs","tool_name":"read_file","tool_class":"read"},
                {"tool_server":"fs","tool_name":"write_file","tool_class":"write",
                 "requires_idempotency_key":true}
            ]}"#,
        )
        .unwrap();
    assert_eq!(registry.tools.len(), 2);

    let rejected = kernel.load_registry(
        r#"{"tools":[
            {"tool_server":"fs","tool_name":"write_file","tool_class":"write"}
        ]}"#,
    );
    let msg = rejected.unwrap_err().to_string();
    assert!(msg.contains("fs/write_file"));

    let config = kernel
        .load_config(r#"{"config_version":"1.0","global":{"env":"production"}}"#)
        .unwrap();
    assert_eq!(config.digest_hex().len(), 64);
}
