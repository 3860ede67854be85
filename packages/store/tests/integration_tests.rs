//! Integration tests for snapshot persistence across store lifetimes

use anyhow::Result;
use cvflow_model::{sample_cv, Bullet, Cv, Section};
use cvflow_store::{CvStore, FileStorage, Mutation, STORE_NAME, STORE_VERSION};
use std::sync::Arc;

#[test]
fn test_file_backed_store_survives_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;

    {
        let sample = sample_cv();
        let mut store = CvStore::open(FileStorage::new(dir.path()), STORE_NAME);
        store.apply(Mutation::ReplaceCv {
            meta: None,
            header: Some(sample.header),
            sections: Some(sample.sections),
        });
        store.apply(Mutation::AddSection {
            section: Arc::new(Section::list(
                "Languages",
                vec![Arc::new(Bullet::text("English, German"))],
            )),
            index: None,
        });
    }

    let reopened = CvStore::open(FileStorage::new(dir.path()), STORE_NAME);
    let cv = reopened.cv();
    assert_eq!(cv.header.name, "Alex Smith");
    assert_eq!(cv.sections.len(), 4);
    assert_eq!(cv.sections[3].title, "Languages");
    Ok(())
}

#[test]
fn test_snapshot_written_on_every_commit() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let slot = dir.path().join(format!("{STORE_NAME}.json"));

    let mut store = CvStore::open(FileStorage::new(dir.path()), STORE_NAME);
    assert!(!slot.exists());

    store.apply(Mutation::AddSection {
        section: Arc::new(Section::list("Skills", vec![])),
        index: None,
    });
    let first = std::fs::read_to_string(&slot)?;

    store.apply(Mutation::AddListBullet {
        section: 0,
        bullet: Arc::new(Bullet::text("Rust")),
        index: None,
    });
    let second = std::fs::read_to_string(&slot)?;

    assert_ne!(first, second);
    let parsed: serde_json::Value = serde_json::from_str(&second)?;
    assert_eq!(parsed["version"], u64::from(STORE_VERSION));
    assert_eq!(parsed["sections"][0]["type"], "ListSection");
    Ok(())
}

#[test]
fn test_incompatible_snapshot_falls_back_to_default() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let slot = dir.path().join(format!("{STORE_NAME}.json"));

    std::fs::write(
        &slot,
        format!(
            r#"{{"version":{},"meta":{{"filename":"old"}},"header":{{"name":"x","contacts":[]}},"sections":[]}}"#,
            STORE_VERSION + 1
        ),
    )?;

    let store = CvStore::open(FileStorage::new(dir.path()), STORE_NAME);
    assert_eq!(*store.cv(), Cv::default());
    Ok(())
}
