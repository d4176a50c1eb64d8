//! The observer-facing facade: exclusion before recording, bootstrap on open,
//! and save/reload cycles.

use std::path::Path;

use frecent::{Config, Error, Tracker};
use tempfile::tempdir;

fn config_at(path: &Path, patterns: &[&str]) -> Config {
    Config {
        history_location: path.to_path_buf(),
        exclude_patterns: patterns.iter().map(|p| (*p).to_owned()).collect(),
        ..Config::default()
    }
}

#[test]
fn open_bootstraps_history_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/history.json");

    let tracker = Tracker::open(config_at(&path, &[])).unwrap();

    assert!(path.exists());
    assert!(tracker.store().is_empty());
    assert_eq!(tracker.location(), path);
}

#[test]
fn excluded_ids_never_reach_the_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let mut tracker = Tracker::open(config_at(&path, &["COMMIT_EDITMSG$", "^/tmp/"])).unwrap();

    assert!(tracker.visit("/repo/src/main.rs").unwrap());
    assert!(!tracker.visit("/repo/.git/COMMIT_EDITMSG").unwrap());
    assert!(!tracker.visit("/tmp/scratch").unwrap());
    assert!(tracker.visit("/home/me/tmp/notes").unwrap());

    assert_eq!(
        tracker.list_ranked().collect::<Vec<_>>(),
        ["/home/me/tmp/notes", "/repo/src/main.rs"]
    );
    for id in tracker.list_ranked() {
        assert!(!tracker.filter().is_excluded(id));
    }
}

#[test]
fn empty_id_is_rejected() {
    let dir = tempdir().unwrap();
    let mut tracker = Tracker::open(config_at(&dir.path().join("h.json"), &[])).unwrap();
    assert!(matches!(tracker.visit(""), Err(Error::InvalidIdentifier)));
    assert!(tracker.store().is_empty());
}

#[test]
fn save_then_reopen_restores_ranking() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    {
        let mut tracker = Tracker::open(config_at(&path, &[])).unwrap();
        for id in ["/a", "/b", "/b", "/c", "/b", "/a"] {
            tracker.visit(id).unwrap();
        }
        tracker.save().unwrap();
    }

    let tracker = Tracker::open(config_at(&path, &[])).unwrap();
    assert_eq!(
        tracker.list_ranked_with_score().collect::<Vec<_>>(),
        [("/b", 3.0), ("/a", 2.0), ("/c", 1.0)]
    );
}

#[test]
fn reload_discards_unsaved_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let mut tracker = Tracker::open(config_at(&path, &[])).unwrap();

    tracker.visit("/kept").unwrap();
    tracker.save().unwrap();
    tracker.visit("/lost").unwrap();
    assert!(tracker.forget("/kept"));
    assert!(!tracker.forget("/never"));

    tracker.reload().unwrap();
    assert_eq!(tracker.list_ranked().collect::<Vec<_>>(), ["/kept"]);
}

#[test]
fn reset_is_persisted_only_on_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let mut tracker = Tracker::open(config_at(&path, &[])).unwrap();

    tracker.visit("/a").unwrap();
    tracker.save().unwrap();
    tracker.reset();
    assert!(tracker.store().is_empty());

    tracker.reload().unwrap();
    assert_eq!(tracker.store().len(), 1);

    tracker.reset();
    tracker.save().unwrap();
    tracker.reload().unwrap();
    assert!(tracker.store().is_empty());
}

#[test]
fn invalid_configuration_is_rejected_before_touching_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut config = config_at(&path, &["("]);
    assert!(matches!(
        Tracker::open(config.clone()),
        Err(Error::InvalidPattern { .. })
    ));

    config.exclude_patterns.clear();
    config.aging_multiplier = 1.5;
    assert!(matches!(
        Tracker::open(config),
        Err(Error::InvalidConfig {
            field: "aging_multiplier",
            ..
        })
    ));
    assert!(!path.exists());
}

#[test]
fn configured_aging_applies() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let config = Config {
        aging_threshold: 3.0,
        aging_multiplier: 0.5,
        ..config_at(&path, &[])
    };
    let mut tracker = Tracker::open(config).unwrap();

    for id in ["/hot", "/hot", "/cold", "/hot"] {
        tracker.visit(id).unwrap();
    }

    assert_eq!(tracker.list_ranked().collect::<Vec<_>>(), ["/hot"]);
    assert_eq!(tracker.store().score_of("/hot"), Some(1.5));
}
