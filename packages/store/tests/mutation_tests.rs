//! Comprehensive mutation tests

use cvflow_model::{Bullet, Contact, Cv, Entity, Header, Role, Section, SectionContent};
use cvflow_store::{CvStore, MemoryStorage, Mutation, STORE_NAME};
use std::sync::Arc;

fn store_with(cv: Cv) -> CvStore<MemoryStorage> {
    let mut store = CvStore::open(MemoryStorage::new(), STORE_NAME);
    store.apply(Mutation::ReplaceCv {
        meta: None,
        header: Some(cv.header),
        sections: Some(cv.sections),
    });
    store
}

fn contacts(labels: &[&str]) -> Vec<Contact> {
    labels.iter().map(|l| Contact::new(*l, "x")).collect()
}

#[test]
fn test_skills_scenario_builds_in_order() {
    let mut store = store_with(Cv {
        header: Header {
            name: "Alex Smith".to_string(),
            contacts: vec![],
        },
        ..Cv::default()
    });

    assert!(store.apply(Mutation::AddSection {
        section: Arc::new(Section::list("Skills", vec![])),
        index: None,
    }));
    assert!(store.apply(Mutation::AddListBullet {
        section: 0,
        bullet: Arc::new(Bullet::text("Python")),
        index: None,
    }));
    assert!(store.apply(Mutation::AddListBullet {
        section: 0,
        bullet: Arc::new(Bullet::text("Go")),
        index: Some(0),
    }));

    let cv = store.cv();
    let SectionContent::List { bullets } = &cv.sections[0].content else {
        panic!("expected list section");
    };
    let texts: Vec<&str> = bullets.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["Go", "Python"]);
}

#[test]
fn test_move_contact_to_front() {
    let mut store = store_with(Cv {
        header: Header {
            name: String::new(),
            contacts: contacts(&["A", "B", "C"]),
        },
        ..Cv::default()
    });

    assert!(store.apply(Mutation::MoveContact { from: 2, to: 0 }));

    let cv = store.cv();
    let labels: Vec<&str> = cv
        .header
        .contacts
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(labels, vec!["C", "A", "B"]);
}

#[test]
fn test_out_of_range_indices_are_noops() {
    let cv = Cv {
        header: Header {
            name: String::new(),
            contacts: contacts(&["A", "B"]),
        },
        sections: vec![
            Arc::new(Section::list("Skills", vec![Arc::new(Bullet::text("x"))])),
            Arc::new(Section::entities(
                "Education",
                vec![Arc::new(Entity::new("Uni"))],
            )),
        ],
        ..Cv::default()
    };
    let mut store = store_with(cv);
    let before = store.cv();

    let noops = vec![
        Mutation::UpdateContact {
            index: 2,
            contact: Contact::new("Z", "z"),
        },
        Mutation::RemoveContact { index: 2 },
        Mutation::MoveContact { from: 0, to: 2 },
        Mutation::MoveContact { from: 2, to: 0 },
        Mutation::MoveContact { from: 1, to: 1 },
        Mutation::UpdateSection {
            index: 5,
            section: Arc::new(Section::list("X", vec![])),
        },
        Mutation::RemoveSection { index: 5 },
        Mutation::MoveSection { from: 0, to: 2 },
        Mutation::UpdateListBullet {
            section: 0,
            bullet: 1,
            next: Arc::new(Bullet::text("y")),
        },
        Mutation::RemoveListBullet {
            section: 0,
            bullet: 1,
        },
        Mutation::MoveListBullet {
            section: 0,
            from: 0,
            to: 1,
        },
        Mutation::RemoveEntity {
            section: 1,
            entity: 1,
        },
        Mutation::RemoveRoleInEntity {
            section: 1,
            entity: 0,
            role: 0,
        },
    ];

    for mutation in noops {
        assert!(
            !store.apply(mutation.clone()),
            "expected no-op for {mutation:?}"
        );
        assert_eq!(*store.cv(), *before, "state changed for {mutation:?}");
        assert!(Arc::ptr_eq(&before, &store.cv()));
    }
}

#[test]
fn test_add_with_out_of_range_index_appends() {
    let mut store = store_with(Cv {
        header: Header {
            name: String::new(),
            contacts: contacts(&["A"]),
        },
        ..Cv::default()
    });

    assert!(store.apply(Mutation::AddContact {
        contact: Contact::new("B", "b"),
        index: Some(99),
    }));
    assert!(store.apply(Mutation::AddContact {
        contact: Contact::new("C", "c"),
        index: Some(2),
    }));

    let cv = store.cv();
    let labels: Vec<&str> = cv
        .header
        .contacts
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
}

#[test]
fn test_wrong_variant_is_noop() {
    let mut store = store_with(Cv {
        sections: vec![Arc::new(Section::list("Skills", vec![]))],
        ..Cv::default()
    });
    let before = store.cv();

    // Entity ops against a list section must not apply.
    assert!(!store.apply(Mutation::AddEntity {
        section: 0,
        entity: Arc::new(Entity::new("Uni")),
        index: None,
    }));
    assert!(!store.apply(Mutation::AddItemRole {
        section: 0,
        role: Arc::new(Role::new("Engineer")),
        index: None,
    }));
    assert!(Arc::ptr_eq(&before, &store.cv()));
}

#[test]
fn test_patch_section_base_keeps_content() {
    let mut store = store_with(Cv {
        sections: vec![Arc::new(Section::list(
            "Skills",
            vec![Arc::new(Bullet::text("Rust"))],
        ))],
        ..Cv::default()
    });

    assert!(store.apply(Mutation::PatchSectionBase {
        index: 0,
        patch: cvflow_model::SectionBasePatch {
            title: Some("Core Skills".to_string()),
            tags: Some(vec!["skills".to_string()]),
        },
    }));

    let cv = store.cv();
    assert_eq!(cv.sections[0].title, "Core Skills");
    assert_eq!(cv.sections[0].tags, vec!["skills".to_string()]);
    let SectionContent::List { bullets } = &cv.sections[0].content else {
        panic!("content replaced");
    };
    assert_eq!(bullets[0].text, "Rust");
}

#[test]
fn test_move_supports_end_position_after_removal() {
    // move(0, 2) on a three-element list lands the item at the end of the
    // shortened list, i.e. "move to end".
    let mut store = store_with(Cv {
        header: Header {
            name: String::new(),
            contacts: contacts(&["A", "B", "C"]),
        },
        ..Cv::default()
    });

    assert!(store.apply(Mutation::MoveContact { from: 0, to: 2 }));
    let cv = store.cv();
    let labels: Vec<&str> = cv
        .header
        .contacts
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(labels, vec!["B", "C", "A"]);
}

#[test]
fn test_reset_restores_default_document() {
    let mut store = store_with(cvflow_model::sample_cv());
    assert!(!store.cv().sections.is_empty());

    assert!(store.apply(Mutation::Reset));
    assert_eq!(*store.cv(), Cv::default());
}
