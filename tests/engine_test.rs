use historian::{
    Actor, DiffKind, Document, Fields, HistoryEngine, HistoryError, HistoryRecord, HistorySink,
    MemoryHistorySink, Operation, RecordData, Result, TrackOptions,
};
use serde_json::{Value, json};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// A primary store standing in for the persistence framework: it commits
/// a mutation only after the history engine has accepted it.
#[derive(Default)]
struct PrimaryStore {
    committed: std::cell::RefCell<Vec<String>>,
}

impl PrimaryStore {
    fn save<S: HistorySink>(&self, engine: &HistoryEngine<S>, doc: &Document) -> Result<()> {
        engine.on_save(doc)?;
        self.committed.borrow_mut().push(doc.collection.clone());
        Ok(())
    }
}

/// A sink whose appends always fail, for the fail-closed property.
struct BrokenSink;

impl HistorySink for BrokenSink {
    fn append(&self, collection: &str, _record: &HistoryRecord) -> Result<()> {
        Err(HistoryError::SinkWriteFailure {
            collection: collection.to_string(),
            detail: "storage unavailable".into(),
        })
    }

    fn read_all(&self, _collection: &str) -> Result<Vec<HistoryRecord>> {
        Ok(Vec::new())
    }

    fn clear(&self, _collection: &str) -> Result<()> {
        Ok(())
    }
}

// ─── Diff mode ───────────────────────────────────────────────────

#[test]
fn create_then_update_yields_snapshot_then_single_edit() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::diffs());

    // Create: never persisted, so a full snapshot is recorded.
    let doc = Document::fresh("accounts", fields(json!({"_id": 7, "f": "a"})));
    engine.on_save(&doc).unwrap();

    // Simulate reload, capture, then mutate f: a -> b.
    let mut doc = Document::loaded("accounts", fields(json!({"_id": 7, "f": "a"})));
    engine.on_load(&mut doc);
    doc.fields.insert("f".into(), json!("b"));
    engine.on_save(&doc).unwrap();

    let records = engine.history_log("accounts").read_all().unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].operation, Operation::Create);
    match &records[0].data {
        RecordData::Snapshot(map) => assert_eq!(map.get("_id"), Some(&json!(7))),
        RecordData::Diff { .. } => panic!("create should record a full snapshot"),
    }

    assert_eq!(records[1].operation, Operation::Update);
    match &records[1].data {
        RecordData::Diff { id, changes } => {
            assert_eq!(id, &json!(7));
            assert_eq!(changes.len(), 1);
            assert_eq!(changes[0].path, vec!["f"]);
            assert_eq!(
                changes[0].kind,
                DiffKind::Edited {
                    old: json!("a"),
                    new: json!("b"),
                }
            );
        }
        RecordData::Snapshot(_) => panic!("update should record a diff"),
    }
}

#[test]
fn saving_unchanged_state_records_empty_change_set_with_id() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::diffs());

    let mut doc = Document::loaded("accounts", fields(json!({"_id": 3, "f": "x"})));
    engine.on_load(&mut doc);
    engine.on_save(&doc).unwrap();

    let records = engine.history_log("accounts").read_all().unwrap();
    match &records[0].data {
        RecordData::Diff { id, changes } => {
            assert!(changes.is_empty());
            assert_eq!(id, &json!(3));
        }
        RecordData::Snapshot(_) => panic!("expected diff data"),
    }
}

#[test]
fn records_are_ordered_by_created_at_within_a_table() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::diffs());

    for n in 0..5 {
        let mut doc = Document::loaded("accounts", fields(json!({"_id": 1, "n": n})));
        engine.on_load(&mut doc);
        doc.fields.insert("n".into(), json!(n + 1));
        engine.on_save(&doc).unwrap();
    }

    let records = engine.history_log("accounts").read_all().unwrap();
    assert_eq!(records.len(), 5);
    for pair in records.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

// ─── Snapshot mode ───────────────────────────────────────────────

#[test]
fn snapshot_mode_records_full_state_on_every_mutation() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::snapshots());

    let doc = Document::fresh("accounts", fields(json!({"_id": 1, "f": "a"})));
    engine.on_save(&doc).unwrap();

    let mut updated = Document::loaded("accounts", fields(json!({"_id": 1, "f": "a"})));
    engine.on_load(&mut updated); // no-op in snapshot mode
    updated.fields.insert("f".into(), json!("b"));
    engine.on_save(&updated).unwrap();

    let records = engine.history_log("accounts").read_all().unwrap();
    assert_eq!(records.len(), 2);
    for (record, expected) in records.iter().zip([json!("a"), json!("b")]) {
        match &record.data {
            RecordData::Snapshot(map) => assert_eq!(map.get("f"), Some(&expected)),
            RecordData::Diff { .. } => panic!("snapshot mode must store full state"),
        }
    }
}

#[test]
fn snapshot_mode_extracts_reserved_metadata_field() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::snapshots());

    let doc = Document::fresh(
        "accounts",
        fields(json!({"_id": 1, "f": "a", "history": {"user": {"id": "9"}}})),
    );
    engine.on_save(&doc).unwrap();

    let records = engine.history_log("accounts").read_all().unwrap();
    assert_eq!(records[0].additional, Some(json!({"user": {"id": "9"}})));
    match &records[0].data {
        RecordData::Snapshot(map) => assert!(!map.contains_key("history")),
        RecordData::Diff { .. } => panic!("expected snapshot data"),
    }
}

// ─── Delete path ─────────────────────────────────────────────────

#[test]
fn delete_produces_one_remove_record_over_the_id() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::diffs());
    let actor = Actor::new("u-9", "ops@example.com", "partner-3");

    let condition = fields(json!({"_id": 42}));
    engine.on_delete("accounts", &condition, &actor).unwrap();

    let records = engine.history_log("accounts").read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].operation, Operation::Remove);

    match &records[0].data {
        RecordData::Diff { id, changes } => {
            assert_eq!(id, &json!(42));
            assert_eq!(changes.len(), 1);
            assert_eq!(changes[0].path, vec!["_id"]);
            assert_eq!(changes[0].kind, DiffKind::Deleted { old: json!(42) });
        }
        RecordData::Snapshot(_) => panic!("expected diff data"),
    }

    assert_eq!(
        records[0].additional,
        Some(json!({
            "user": {"id": "u-9", "name": "ops@example.com"},
            "partnerId": "partner-3",
        }))
    );
}

// ─── Custom per-field diff overrides ─────────────────────────────

#[test]
fn custom_override_result_appears_literally_in_every_record() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::diffs())
        .with_override("g", |_, _, _| Some(json!("CUSTOM")));

    for n in 0..3 {
        let mut doc = Document::loaded("accounts", fields(json!({"_id": 1, "g": n})));
        engine.on_load(&mut doc);
        doc.fields.insert("g".into(), json!(n + 10));
        engine.on_save(&doc).unwrap();
    }

    let records = engine.history_log("accounts").read_all().unwrap();
    assert_eq!(records.len(), 3);
    for record in &records {
        match &record.data {
            RecordData::Diff { changes, .. } => {
                assert_eq!(changes.len(), 1);
                assert_eq!(changes[0].path, vec!["g"]);
                assert_eq!(
                    changes[0].kind,
                    DiffKind::Custom {
                        value: json!("CUSTOM"),
                    }
                );
            }
            RecordData::Snapshot(_) => panic!("expected diff data"),
        }
    }
}

// ─── Fail-closed ─────────────────────────────────────────────────

#[test]
fn failing_sink_blocks_the_primary_mutation() {
    let engine = HistoryEngine::new(BrokenSink, TrackOptions::snapshots());
    let primary = PrimaryStore::default();

    let doc = Document::fresh("accounts", fields(json!({"_id": 1})));
    let err = primary.save(&engine, &doc).unwrap_err();

    assert!(matches!(err, HistoryError::SinkWriteFailure { .. }));
    assert!(primary.committed.borrow().is_empty(), "primary must not commit");
}

#[test]
fn no_baseline_blocks_the_primary_mutation() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::diffs());
    let primary = PrimaryStore::default();

    // Loaded but never passed through on_load: capture was skipped.
    let doc = Document::loaded("accounts", fields(json!({"_id": 1})));
    let err = primary.save(&engine, &doc).unwrap_err();

    assert!(matches!(err, HistoryError::NoBaseline { .. }));
    assert!(primary.committed.borrow().is_empty());
    assert!(engine.history_log("accounts").read_all().unwrap().is_empty());
}

// ─── Administrative operations ───────────────────────────────────

#[test]
fn clear_history_empties_one_collection_only() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::snapshots());

    engine
        .on_save(&Document::fresh("accounts", fields(json!({"_id": 1}))))
        .unwrap();
    engine
        .on_save(&Document::fresh("orders", fields(json!({"_id": 2}))))
        .unwrap();

    engine.clear_history("accounts").unwrap();

    assert!(engine.history_log("accounts").read_all().unwrap().is_empty());
    assert_eq!(engine.history_log("orders").read_all().unwrap().len(), 1);
}

#[test]
fn history_log_resolves_the_default_suffix() {
    let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::snapshots());
    assert_eq!(
        engine.history_log("accounts").collection(),
        "accounts_history"
    );
}
