//! A realistic sample document, used as a seed/demo fixture and in tests.

use crate::document::{Bullet, Contact, Cv, Entity, Header, Meta, Role, Section};
use std::sync::Arc;

/// A small but fully populated CV exercising all three section kinds.
pub fn sample_cv() -> Cv {
    let thesis = Bullet::labeled(
        "Thesis",
        "Developed a machine learning pipeline for early disease detection \
         using medical imaging data.",
    );

    let msc = Role {
        title: "Master of Science in Data Science".to_string(),
        duration: Some("September 2021 - June 2023".to_string()),
        bullets: vec![
            Arc::new(thesis),
            Arc::new(Bullet::labeled("GPA", "3.9/4.0")),
        ],
        tags: Vec::new(),
    };

    let bsc = Role {
        title: "Bachelor of Science in Computer Science".to_string(),
        duration: Some("September 2017 - May 2021".to_string()),
        bullets: vec![Arc::new(Bullet::text(
            "Graduated with honors and received the departmental award for \
             outstanding undergraduate research.",
        ))],
        tags: Vec::new(),
    };

    let education = Section {
        tags: vec!["education".to_string()],
        ..Section::entities(
            "Education",
            vec![
                Arc::new(Entity {
                    name: "Global Institute of Technology".to_string(),
                    location: Some("Techville, USA".to_string()),
                    roles: vec![Arc::new(msc)],
                    tags: vec!["university".to_string()],
                }),
                Arc::new(Entity {
                    name: "Techville University".to_string(),
                    location: Some("Techville, USA".to_string()),
                    roles: vec![Arc::new(bsc)],
                    tags: vec!["university".to_string()],
                }),
            ],
        )
    };

    let projects = Section {
        tags: vec!["projects".to_string()],
        ..Section::items(
            "Projects",
            vec![Arc::new(Role {
                title: "Open-source contributor".to_string(),
                duration: Some("2020 - present".to_string()),
                bullets: vec![Arc::new(Bullet::text(
                    "Maintains a popular data validation library.",
                ))],
                tags: vec!["maintainer".to_string()],
            })],
        )
    };

    let skills = Section {
        tags: vec!["skills".to_string()],
        ..Section::list(
            "Skills",
            vec![
                Arc::new(Bullet::labeled(
                    "Languages",
                    "Python, Rust, SQL, TypeScript",
                )),
                Arc::new(Bullet::labeled("Tools", "Docker, Git, PostgreSQL")),
            ],
        )
    };

    Cv {
        meta: Meta {
            filename: "sample_CV".to_string(),
            locale: None,
        },
        header: Header {
            name: "Alex Smith".to_string(),
            contacts: vec![
                Contact::new("address", "123 Innovation Drive, 54321 Techville"),
                Contact::new("email", "alex.smith@example.com"),
                Contact::new("phone", "+1 234 567 8900"),
            ],
        },
        sections: vec![Arc::new(education), Arc::new(projects), Arc::new(skills)],
    }
}
