use dermlog_core::{RecordId, ScanRecord, SelfExamFlag};
use dermlog_engine::{ScanLog, StoreConfig};
use dermlog_harness::{
    TestLog,
    drafts::{draft, full_draft},
};
use dermlog_storage::{ScanStore, SqliteStorage, StorageError, UnavailableCause};

#[tokio::test]
async fn forearm_walkthrough() -> Result<(), Box<dyn std::error::Error>> {
    let log = ScanLog::open(StoreConfig::in_memory()).await?;
    log.ensure_schema().await?;

    let record = ScanRecord {
        body_part_name: "Forearm".into(),
        risk: "Low".into(),
        has_asymmetry: true,
        timestamp: 1000,
        self_exam_flag: SelfExamFlag::Raw("1".into()),
        ..Default::default()
    };
    let id = log.insert(record.clone()).await?;
    assert_eq!(id, RecordId::from_i64(1));

    let all = log.fetch_all().await?;
    assert_eq!(
        all,
        vec![ScanRecord {
            id: Some(id),
            ..record
        }]
    );
    log.close().await?;
    Ok(())
}

#[tokio::test]
async fn crud_before_schema_fails_with_schema_not_ready() -> Result<(), Box<dyn std::error::Error>> {
    let log = ScanLog::open(StoreConfig::in_memory()).await?;

    let err = log.insert(draft("Arm", "Low", 1)).await.unwrap_err();
    assert!(matches!(err.storage(), Some(StorageError::SchemaNotReady)));
    let err = log
        .update(RecordId::from_i64(1), draft("Arm", "Low", 1))
        .await
        .unwrap_err();
    assert!(matches!(err.storage(), Some(StorageError::SchemaNotReady)));
    let err = log.delete_by_id(RecordId::from_i64(1)).await.unwrap_err();
    assert!(matches!(err.storage(), Some(StorageError::SchemaNotReady)));

    log.ensure_schema().await?;
    log.insert(draft("Arm", "Low", 1)).await?;
    assert_eq!(log.count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn ensure_schema_twice_keeps_data() -> Result<(), Box<dyn std::error::Error>> {
    let t = TestLog::in_memory().await?;
    t.seed(vec![draft("Arm", "Low", 1), draft("Leg", "Low", 2)])
        .await?;
    t.log.ensure_schema().await?;
    assert_eq!(t.log.count().await?, 2);
    Ok(())
}

#[tokio::test]
async fn records_survive_reopen() -> Result<(), Box<dyn std::error::Error>> {
    let t = TestLog::on_disk().await?;
    let id = t.log.insert(full_draft(42)).await?;

    let t = t.reopen().await?;
    let fetched = t.get(id).await?.expect("record persisted");
    assert_eq!(fetched.body_part_name, "Left shoulder");
    assert!(fetched.has_asymmetry);
    assert_eq!(
        fetched.image_data.map(|img| img.to_bytes()).transpose()?,
        Some(vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x43])
    );
    Ok(())
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() -> Result<(), Box<dyn std::error::Error>> {
    let t = TestLog::on_disk().await?;
    let ids = t
        .seed(vec![draft("Arm", "Low", 1), draft("Leg", "Low", 2)])
        .await?;
    t.log.delete_by_id(ids[1]).await?;
    let next = t.log.insert(draft("Back", "Low", 3)).await?;
    assert!(next > ids[1], "{next:?} should be above {:?}", ids[1]);

    // Still true across a restart.
    t.log.delete_by_id(next).await?;
    let t = t.reopen().await?;
    let after_restart = t.log.insert(draft("Neck", "Low", 4)).await?;
    assert!(after_restart > next);
    Ok(())
}

#[tokio::test]
async fn corrupt_flag_decodes_false_without_failing_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let t = TestLog::on_disk().await?;
    let mut record = draft("Arm", "Low", 1);
    record.has_asymmetry = true;
    record.has_varied_colors = true;
    let id = t.log.insert(record).await?;
    t.seed(vec![draft("Leg", "Low", 2)]).await?;

    let path = t.path().expect("file-backed");
    let raw = SqliteStorage::open(&path)?;
    raw.conn().execute(
        "UPDATE scanned_data SET assymetry = 2 WHERE id = ?1",
        [id.as_i64()],
    )?;
    raw.close()?;

    let all = t.log.fetch_all().await?;
    assert_eq!(all.len(), 2);
    let corrupted = all.iter().find(|r| r.id == Some(id)).expect("row present");
    assert!(!corrupted.has_asymmetry);
    assert!(corrupted.has_varied_colors);
    assert_eq!(corrupted.body_part_name, "Arm");
    Ok(())
}

#[tokio::test]
async fn unopenable_store_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    // A regular file where a directory is expected.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory")?;

    let result = ScanLog::open(StoreConfig::file(blocker.join("scanned_data.db"))).await;
    let err = match result {
        Ok(_) => panic!("open should fail"),
        Err(e) => e,
    };
    assert!(
        matches!(
            err.storage(),
            Some(StorageError::Unavailable(UnavailableCause::Io(_)))
        ),
        "{err}"
    );
    assert!(err.storage().is_some_and(StorageError::is_fatal));
    Ok(())
}

#[test]
fn sync_store_matches_async_gateway() -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = SqliteStorage::open_in_memory()?;
    storage.ensure_schema()?;
    let id = storage.insert(&draft("Arm", "Low", 1))?;
    assert_eq!(storage.update(id, &draft("Arm", "High", 1))?, 1);
    assert_eq!(storage.update(RecordId::from_i64(77), &draft("X", "Y", 1))?, 0);
    assert_eq!(storage.delete_by_id(RecordId::from_i64(77))?, 0);
    assert_eq!(storage.delete_by_id(id)?, 1);
    assert_eq!(storage.count()?, 0);
    Ok(())
}
