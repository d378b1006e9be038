use cli::{AppConfig, MergeMode, run};
use tempfile::TempDir;

async fn campaign_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    tokio::fs::write(
        dir.path().join("session_1.md"),
        "# Session 1\n\nDurnan the barkeep greeted the party at the Yawning Portal.\n",
    )
    .await
    .unwrap();
    tokio::fs::write(
        dir.path().join("session_2.md"),
        "# Session 2\n\nDurnan, a Zhentarim spy, refused to talk.\n",
    )
    .await
    .unwrap();
    dir
}

#[tokio::test]
async fn test_report_mode_lists_duplicates_without_merging() {
    let dir = campaign_dir().await;
    let report = run(&AppConfig::report_mode(), dir.path()).await.unwrap();

    assert_eq!(report.documents.len(), 2);
    assert!(report.merges.is_empty());

    let durnan = report
        .duplicates
        .iter()
        .find(|g| g.key == "npc-durnan")
        .expect("durnan is in both sessions");
    assert_eq!(durnan.member_ids.len(), 2);
    assert_eq!(durnan.primary_id, durnan.member_ids[0]);
    assert!(durnan.exposed_fields.iter().any(|f| f.spec.name == "sourceSessions"));

    let entities = report.entities.unwrap();
    assert_eq!(entities.len(), report.metrics.entities_extracted);
}

#[tokio::test]
async fn test_auto_mode_removes_merged_members() {
    let dir = campaign_dir().await;
    let config = AppConfig {
        merge: MergeMode::Auto,
        ..AppConfig::default()
    };
    let report = run(&config, dir.path()).await.unwrap();

    assert_eq!(report.merges.len(), report.duplicates.len());
    let entities = report.entities.unwrap();
    let removed: usize = report.merges.iter().map(|m| m.removable_ids.len()).sum();
    assert_eq!(entities.len(), report.metrics.entities_extracted - removed);

    let durnans: Vec<_> = entities
        .iter()
        .filter(|e| e.title() == "Durnan")
        .collect();
    assert_eq!(durnans.len(), 1);
    assert_eq!(durnans[0].entity.source_sessions, Some(vec![1]));
}

#[tokio::test]
async fn test_missing_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = run(&AppConfig::default(), &dir.path().join("nope.md")).await;
    assert!(result.is_err());
}
