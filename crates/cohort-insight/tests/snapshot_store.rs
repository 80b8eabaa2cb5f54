use cohort_insight::config::DataConfig;
use cohort_insight::dataset::{DatasetSnapshot, SnapshotStore};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cohort-insight-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("residency")).expect("scratch dir created");
    dir
}

fn data_config(dir: &PathBuf) -> DataConfig {
    DataConfig {
        scores_path: dir.join("scores.csv"),
        ranks_path: dir.join("ranks.csv"),
        residency_dir: dir.join("residency"),
        id_column: "ID".to_string(),
    }
}

#[test]
fn reload_swaps_snapshot_while_old_readers_keep_their_view() {
    let dir = scratch_dir("reload");
    let config = data_config(&dir);
    fs::write(&config.scores_path, "ID,NAME,TOTAL\nA1,Rana,100\n").expect("scores written");

    let store = SnapshotStore::new(DatasetSnapshot::load(&config));
    let before = store.current();
    assert!(before.scores.lookup("A1").is_some());
    assert!(before.ranks.is_empty());

    fs::write(
        &config.scores_path,
        "ID,NAME,TOTAL\nB1,Tarek,90\nB2,Dina,80\n",
    )
    .expect("scores rewritten");
    let reloaded = store.reload(&config);

    assert_eq!(reloaded.scores.count(), 2);
    assert!(before.scores.lookup("A1").is_some());
    assert!(before.scores.lookup("B1").is_none());
    let after = store.current();
    assert_eq!(after.scores.count(), 2);
    assert!(after.scores.lookup("A1").is_none());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn residency_rosters_load_by_year_with_default_fallback() {
    let dir = scratch_dir("residency");
    let config = data_config(&dir);
    fs::write(
        config.residency_dir.join("2024.csv"),
        "RANK,RESIDENCY,STATUS\n1,Cardiology,بوست\n2,Dermatology,بدون بوست\n",
    )
    .expect("2024 roster written");
    fs::write(
        config.residency_dir.join("2023.csv"),
        "RANK,RESIDENCY,STATUS\n1,Neurology,بوست\n",
    )
    .expect("2023 roster written");
    fs::write(config.residency_dir.join("notes.txt"), "ignored").expect("notes written");

    let snapshot = DatasetSnapshot::load(&config);
    let years = snapshot.residency.years().collect::<Vec<_>>();
    assert_eq!(years, vec!["2023", "2024"]);

    let older = snapshot.residency.summary(Some("2023"));
    assert_eq!(older.year, "2023");
    assert_eq!(older.total, 1);

    let fallback = snapshot.residency.summary(Some("1999"));
    assert_eq!(fallback.year, "2024");
    assert_eq!(fallback.with_post, 1);
    assert_eq!(fallback.without_post, 1);

    let _ = fs::remove_dir_all(&dir);
}
