//! # Document Mutations
//!
//! High-level semantic operations on CV documents.
//!
//! ## Design Principles
//!
//! 1. **Total**: every mutation is a total function over document state.
//!    Invalid targets (stale index, wrong section variant) degrade to a
//!    no-op instead of an error, so UI code driven by possibly-stale
//!    indices never crashes.
//! 2. **Persistent**: `apply` never mutates in place. It returns a new
//!    document whose `Arc` spine is rebuilt from the changed node up to
//!    the root; untouched siblings keep their prior `Arc`.
//! 3. **Atomic**: cross-parent moves commit removal and insertion as one
//!    state transition, so subscribers never observe the moved item in
//!    zero or two places.
//!
//! ## Index Semantics
//!
//! - add: `index` of `None` or past the end appends.
//! - update/remove: out-of-range index is a no-op.
//! - move within a list: no-op when `from == to` or either index is out of
//!   range; otherwise a single splice-remove + splice-insert.
//! - cross-parent move: out-of-range source is a no-op; destination index
//!   of `None` or past the end appends.

use cvflow_model::{
    Bullet, Contact, Cv, Entity, Header, HeaderPatch, MetaPatch, Role, Section, SectionBasePatch,
    SectionContent,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Semantic mutations over the CV document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    // --- CV-level ---
    /// Replace the document wholesale; absent parts keep their current
    /// value, `meta` merges shallowly.
    ReplaceCv {
        meta: Option<MetaPatch>,
        header: Option<Header>,
        sections: Option<Vec<Arc<Section>>>,
    },

    /// Shallow-merge the document metadata.
    PatchMeta(MetaPatch),

    /// Restore the default empty document.
    Reset,

    // --- Header ---
    ReplaceHeader(Header),

    /// Shallow-merge the header.
    PatchHeader(HeaderPatch),

    AddContact {
        contact: Contact,
        index: Option<usize>,
    },
    UpdateContact {
        index: usize,
        contact: Contact,
    },
    RemoveContact {
        index: usize,
    },
    MoveContact {
        from: usize,
        to: usize,
    },

    // --- Sections (top-level) ---
    SetSections(Vec<Arc<Section>>),
    AddSection {
        section: Arc<Section>,
        index: Option<usize>,
    },
    UpdateSection {
        index: usize,
        section: Arc<Section>,
    },
    RemoveSection {
        index: usize,
    },
    MoveSection {
        from: usize,
        to: usize,
    },

    /// Patch title/tags without touching the content.
    PatchSectionBase {
        index: usize,
        patch: SectionBasePatch,
    },

    /// Replace the content of a section. No-op unless the section's
    /// current variant matches the supplied content's variant.
    PatchSectionContent {
        index: usize,
        content: SectionContent,
    },

    // --- EntitiesSection: entities ---
    AddEntity {
        section: usize,
        entity: Arc<Entity>,
        index: Option<usize>,
    },
    UpdateEntity {
        section: usize,
        entity: usize,
        next: Arc<Entity>,
    },
    RemoveEntity {
        section: usize,
        entity: usize,
    },
    MoveEntity {
        section: usize,
        from: usize,
        to: usize,
    },

    // --- EntitiesSection: roles within an entity ---
    AddRoleInEntity {
        section: usize,
        entity: usize,
        role: Arc<Role>,
        index: Option<usize>,
    },
    UpdateRoleInEntity {
        section: usize,
        entity: usize,
        role: usize,
        next: Arc<Role>,
    },
    RemoveRoleInEntity {
        section: usize,
        entity: usize,
        role: usize,
    },
    MoveRoleInEntity {
        section: usize,
        entity: usize,
        from: usize,
        to: usize,
    },

    /// Atomically relocate a role from one entity to another within the
    /// same section. Destination index of `None` appends.
    MoveRoleBetweenEntities {
        section: usize,
        from_entity: usize,
        from_role: usize,
        to_entity: usize,
        to_index: Option<usize>,
    },

    // --- EntitiesSection: bullets within an entity's role ---
    AddBulletInEntityRole {
        section: usize,
        entity: usize,
        role: usize,
        bullet: Arc<Bullet>,
        index: Option<usize>,
    },
    UpdateBulletInEntityRole {
        section: usize,
        entity: usize,
        role: usize,
        bullet: usize,
        next: Arc<Bullet>,
    },
    RemoveBulletInEntityRole {
        section: usize,
        entity: usize,
        role: usize,
        bullet: usize,
    },
    MoveBulletInEntityRole {
        section: usize,
        entity: usize,
        role: usize,
        from: usize,
        to: usize,
    },

    /// Atomically relocate a bullet between two roles (possibly in
    /// different entities) within the same section.
    MoveBulletBetweenEntityRoles {
        section: usize,
        from_entity: usize,
        from_role: usize,
        from_bullet: usize,
        to_entity: usize,
        to_role: usize,
        to_index: Option<usize>,
    },

    // --- ItemsSection: standalone roles ---
    AddItemRole {
        section: usize,
        role: Arc<Role>,
        index: Option<usize>,
    },
    UpdateItemRole {
        section: usize,
        role: usize,
        next: Arc<Role>,
    },
    RemoveItemRole {
        section: usize,
        role: usize,
    },
    MoveItemRole {
        section: usize,
        from: usize,
        to: usize,
    },

    // --- ItemsSection: bullets within a role ---
    AddBulletInItemRole {
        section: usize,
        role: usize,
        bullet: Arc<Bullet>,
        index: Option<usize>,
    },
    UpdateBulletInItemRole {
        section: usize,
        role: usize,
        bullet: usize,
        next: Arc<Bullet>,
    },
    RemoveBulletInItemRole {
        section: usize,
        role: usize,
        bullet: usize,
    },
    MoveBulletInItemRole {
        section: usize,
        role: usize,
        from: usize,
        to: usize,
    },

    // --- ListSection: flat bullets ---
    AddListBullet {
        section: usize,
        bullet: Arc<Bullet>,
        index: Option<usize>,
    },
    UpdateListBullet {
        section: usize,
        bullet: usize,
        next: Arc<Bullet>,
    },
    RemoveListBullet {
        section: usize,
        bullet: usize,
    },
    MoveListBullet {
        section: usize,
        from: usize,
        to: usize,
    },
}

impl Mutation {
    /// Apply the mutation to `cv`, returning the next document.
    ///
    /// Returns `None` when the mutation is a no-op (invalid index, wrong
    /// section variant, degenerate move); the caller keeps the prior state
    /// and must not notify subscribers.
    pub fn apply(&self, cv: &Cv) -> Option<Cv> {
        match self {
            // --- CV-level ---
            Mutation::ReplaceCv {
                meta,
                header,
                sections,
            } => Some(Cv {
                meta: match meta {
                    Some(patch) => merge_meta(cv, patch),
                    None => cv.meta.clone(),
                },
                header: header.clone().unwrap_or_else(|| cv.header.clone()),
                sections: sections.clone().unwrap_or_else(|| cv.sections.clone()),
            }),

            Mutation::PatchMeta(patch) => Some(Cv {
                meta: merge_meta(cv, patch),
                ..shallow(cv)
            }),

            Mutation::Reset => Some(Cv::default()),

            // --- Header ---
            Mutation::ReplaceHeader(next) => Some(Cv {
                header: next.clone(),
                ..shallow(cv)
            }),

            Mutation::PatchHeader(patch) => Some(Cv {
                header: Header {
                    name: patch.name.clone().unwrap_or_else(|| cv.header.name.clone()),
                    contacts: patch
                        .contacts
                        .clone()
                        .unwrap_or_else(|| cv.header.contacts.clone()),
                },
                ..shallow(cv)
            }),

            Mutation::AddContact { contact, index } => {
                with_contacts(cv, |contacts| Some(insert_clamped(contacts, *index, contact.clone())))
            }

            Mutation::UpdateContact { index, contact } => {
                with_contacts(cv, |contacts| replace_at(contacts, *index, contact.clone()))
            }

            Mutation::RemoveContact { index } => {
                with_contacts(cv, |contacts| remove_at(contacts, *index))
            }

            Mutation::MoveContact { from, to } => {
                with_contacts(cv, |contacts| reorder(contacts, *from, *to))
            }

            // --- Sections ---
            Mutation::SetSections(next) => Some(Cv {
                sections: next.clone(),
                ..shallow(cv)
            }),

            Mutation::AddSection { section, index } => {
                with_sections(cv, |sections| Some(insert_clamped(sections, *index, section.clone())))
            }

            Mutation::UpdateSection { index, section } => {
                with_sections(cv, |sections| replace_at(sections, *index, section.clone()))
            }

            Mutation::RemoveSection { index } => {
                with_sections(cv, |sections| remove_at(sections, *index))
            }

            Mutation::MoveSection { from, to } => {
                with_sections(cv, |sections| reorder(sections, *from, *to))
            }

            Mutation::PatchSectionBase { index, patch } => with_section(cv, *index, |sec| {
                Some(Section {
                    title: patch.title.clone().unwrap_or_else(|| sec.title.clone()),
                    tags: patch.tags.clone().unwrap_or_else(|| sec.tags.clone()),
                    content: sec.content.clone(),
                })
            }),

            Mutation::PatchSectionContent { index, content } => with_section(cv, *index, |sec| {
                if std::mem::discriminant(&sec.content) != std::mem::discriminant(content) {
                    return None;
                }
                Some(Section {
                    title: sec.title.clone(),
                    tags: sec.tags.clone(),
                    content: content.clone(),
                })
            }),

            // --- EntitiesSection: entities ---
            Mutation::AddEntity {
                section,
                entity,
                index,
            } => with_entities(cv, *section, |ents| {
                Some(insert_clamped(ents, *index, entity.clone()))
            }),

            Mutation::UpdateEntity {
                section,
                entity,
                next,
            } => with_entities(cv, *section, |ents| replace_at(ents, *entity, next.clone())),

            Mutation::RemoveEntity { section, entity } => {
                with_entities(cv, *section, |ents| remove_at(ents, *entity))
            }

            Mutation::MoveEntity { section, from, to } => {
                with_entities(cv, *section, |ents| reorder(ents, *from, *to))
            }

            // --- EntitiesSection: roles ---
            Mutation::AddRoleInEntity {
                section,
                entity,
                role,
                index,
            } => with_entity_roles(cv, *section, *entity, |roles| {
                Some(insert_clamped(roles, *index, role.clone()))
            }),

            Mutation::UpdateRoleInEntity {
                section,
                entity,
                role,
                next,
            } => with_entity_roles(cv, *section, *entity, |roles| {
                replace_at(roles, *role, next.clone())
            }),

            Mutation::RemoveRoleInEntity {
                section,
                entity,
                role,
            } => with_entity_roles(cv, *section, *entity, |roles| remove_at(roles, *role)),

            Mutation::MoveRoleInEntity {
                section,
                entity,
                from,
                to,
            } => with_entity_roles(cv, *section, *entity, |roles| reorder(roles, *from, *to)),

            Mutation::MoveRoleBetweenEntities {
                section,
                from_entity,
                from_role,
                to_entity,
                to_index,
            } => with_entities(cv, *section, |ents| {
                move_role_between(ents, *from_entity, *from_role, *to_entity, *to_index)
            }),

            // --- EntitiesSection: bullets ---
            Mutation::AddBulletInEntityRole {
                section,
                entity,
                role,
                bullet,
                index,
            } => with_entity_role_bullets(cv, *section, *entity, *role, |bullets| {
                Some(insert_clamped(bullets, *index, bullet.clone()))
            }),

            Mutation::UpdateBulletInEntityRole {
                section,
                entity,
                role,
                bullet,
                next,
            } => with_entity_role_bullets(cv, *section, *entity, *role, |bullets| {
                replace_at(bullets, *bullet, next.clone())
            }),

            Mutation::RemoveBulletInEntityRole {
                section,
                entity,
                role,
                bullet,
            } => with_entity_role_bullets(cv, *section, *entity, *role, |bullets| {
                remove_at(bullets, *bullet)
            }),

            Mutation::MoveBulletInEntityRole {
                section,
                entity,
                role,
                from,
                to,
            } => with_entity_role_bullets(cv, *section, *entity, *role, |bullets| {
                reorder(bullets, *from, *to)
            }),

            Mutation::MoveBulletBetweenEntityRoles {
                section,
                from_entity,
                from_role,
                from_bullet,
                to_entity,
                to_role,
                to_index,
            } => with_entities(cv, *section, |ents| {
                move_bullet_between(
                    ents,
                    (*from_entity, *from_role, *from_bullet),
                    (*to_entity, *to_role),
                    *to_index,
                )
            }),

            // --- ItemsSection ---
            Mutation::AddItemRole {
                section,
                role,
                index,
            } => with_items(cv, *section, |items| {
                Some(insert_clamped(items, *index, role.clone()))
            }),

            Mutation::UpdateItemRole {
                section,
                role,
                next,
            } => with_items(cv, *section, |items| replace_at(items, *role, next.clone())),

            Mutation::RemoveItemRole { section, role } => {
                with_items(cv, *section, |items| remove_at(items, *role))
            }

            Mutation::MoveItemRole { section, from, to } => {
                with_items(cv, *section, |items| reorder(items, *from, *to))
            }

            Mutation::AddBulletInItemRole {
                section,
                role,
                bullet,
                index,
            } => with_item_role_bullets(cv, *section, *role, |bullets| {
                Some(insert_clamped(bullets, *index, bullet.clone()))
            }),

            Mutation::UpdateBulletInItemRole {
                section,
                role,
                bullet,
                next,
            } => with_item_role_bullets(cv, *section, *role, |bullets| {
                replace_at(bullets, *bullet, next.clone())
            }),

            Mutation::RemoveBulletInItemRole {
                section,
                role,
                bullet,
            } => with_item_role_bullets(cv, *section, *role, |bullets| remove_at(bullets, *bullet)),

            Mutation::MoveBulletInItemRole {
                section,
                role,
                from,
                to,
            } => with_item_role_bullets(cv, *section, *role, |bullets| reorder(bullets, *from, *to)),

            // --- ListSection ---
            Mutation::AddListBullet {
                section,
                bullet,
                index,
            } => with_list_bullets(cv, *section, |bullets| {
                Some(insert_clamped(bullets, *index, bullet.clone()))
            }),

            Mutation::UpdateListBullet {
                section,
                bullet,
                next,
            } => with_list_bullets(cv, *section, |bullets| {
                replace_at(bullets, *bullet, next.clone())
            }),

            Mutation::RemoveListBullet { section, bullet } => {
                with_list_bullets(cv, *section, |bullets| remove_at(bullets, *bullet))
            }

            Mutation::MoveListBullet { section, from, to } => {
                with_list_bullets(cv, *section, |bullets| reorder(bullets, *from, *to))
            }
        }
    }
}

// ---- list primitives ----

fn clamp_insert_index(index: Option<usize>, len: usize) -> usize {
    match index {
        Some(i) if i <= len => i,
        _ => len,
    }
}

fn insert_clamped<T: Clone>(items: &[T], index: Option<usize>, item: T) -> Vec<T> {
    let mut next = items.to_vec();
    let at = clamp_insert_index(index, next.len());
    next.insert(at, item);
    next
}

fn replace_at<T: Clone>(items: &[T], index: usize, item: T) -> Option<Vec<T>> {
    if index >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    next[index] = item;
    Some(next)
}

fn remove_at<T: Clone>(items: &[T], index: usize) -> Option<Vec<T>> {
    if index >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    next.remove(index);
    Some(next)
}

/// Splice-remove + splice-insert within one list. `None` when the move is
/// degenerate (`from == to`) or either index is out of range.
fn reorder<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from == to || from >= items.len() || to >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    let item = next.remove(from);
    next.insert(to, item);
    Some(next)
}

// ---- spine rebuilders ----
//
// Each helper resolves one nesting level, delegates to a closure producing
// the next list, and rebuilds only the ancestors of the change. A `None`
// from the closure (or a failed lookup) propagates as a no-op.

fn shallow(cv: &Cv) -> Cv {
    cv.clone()
}

fn merge_meta(cv: &Cv, patch: &MetaPatch) -> cvflow_model::Meta {
    cvflow_model::Meta {
        filename: patch
            .filename
            .clone()
            .unwrap_or_else(|| cv.meta.filename.clone()),
        locale: patch.locale.clone().or_else(|| cv.meta.locale.clone()),
    }
}

fn with_contacts(
    cv: &Cv,
    f: impl FnOnce(&[Contact]) -> Option<Vec<Contact>>,
) -> Option<Cv> {
    let contacts = f(&cv.header.contacts)?;
    Some(Cv {
        header: Header {
            name: cv.header.name.clone(),
            contacts,
        },
        ..shallow(cv)
    })
}

fn with_sections(
    cv: &Cv,
    f: impl FnOnce(&[Arc<Section>]) -> Option<Vec<Arc<Section>>>,
) -> Option<Cv> {
    let sections = f(&cv.sections)?;
    Some(Cv {
        sections,
        ..shallow(cv)
    })
}

fn with_section(cv: &Cv, index: usize, f: impl FnOnce(&Section) -> Option<Section>) -> Option<Cv> {
    let section = cv.sections.get(index)?;
    let next = f(section)?;
    let mut sections = cv.sections.clone();
    sections[index] = Arc::new(next);
    Some(Cv {
        sections,
        ..shallow(cv)
    })
}

fn with_entities(
    cv: &Cv,
    index: usize,
    f: impl FnOnce(&[Arc<Entity>]) -> Option<Vec<Arc<Entity>>>,
) -> Option<Cv> {
    with_section(cv, index, |sec| {
        let SectionContent::Entities { entities } = &sec.content else {
            return None;
        };
        let entities = f(entities)?;
        Some(Section {
            title: sec.title.clone(),
            tags: sec.tags.clone(),
            content: SectionContent::Entities { entities },
        })
    })
}

fn with_items(
    cv: &Cv,
    index: usize,
    f: impl FnOnce(&[Arc<Role>]) -> Option<Vec<Arc<Role>>>,
) -> Option<Cv> {
    with_section(cv, index, |sec| {
        let SectionContent::Items { items } = &sec.content else {
            return None;
        };
        let items = f(items)?;
        Some(Section {
            title: sec.title.clone(),
            tags: sec.tags.clone(),
            content: SectionContent::Items { items },
        })
    })
}

fn with_list_bullets(
    cv: &Cv,
    index: usize,
    f: impl FnOnce(&[Arc<Bullet>]) -> Option<Vec<Arc<Bullet>>>,
) -> Option<Cv> {
    with_section(cv, index, |sec| {
        let SectionContent::List { bullets } = &sec.content else {
            return None;
        };
        let bullets = f(bullets)?;
        Some(Section {
            title: sec.title.clone(),
            tags: sec.tags.clone(),
            content: SectionContent::List { bullets },
        })
    })
}

fn with_entity_roles(
    cv: &Cv,
    section: usize,
    entity: usize,
    f: impl FnOnce(&[Arc<Role>]) -> Option<Vec<Arc<Role>>>,
) -> Option<Cv> {
    with_entities(cv, section, |ents| {
        let ent = ents.get(entity)?;
        let roles = f(&ent.roles)?;
        let mut next_ent = Entity::clone(ent);
        next_ent.roles = roles;
        replace_at(ents, entity, Arc::new(next_ent))
    })
}

fn with_entity_role_bullets(
    cv: &Cv,
    section: usize,
    entity: usize,
    role: usize,
    f: impl FnOnce(&[Arc<Bullet>]) -> Option<Vec<Arc<Bullet>>>,
) -> Option<Cv> {
    with_entity_roles(cv, section, entity, |roles| {
        let r = roles.get(role)?;
        let bullets = f(&r.bullets)?;
        let mut next_role = Role::clone(r);
        next_role.bullets = bullets;
        replace_at(roles, role, Arc::new(next_role))
    })
}

fn with_item_role_bullets(
    cv: &Cv,
    section: usize,
    role: usize,
    f: impl FnOnce(&[Arc<Bullet>]) -> Option<Vec<Arc<Bullet>>>,
) -> Option<Cv> {
    with_items(cv, section, |items| {
        let r = items.get(role)?;
        let bullets = f(&r.bullets)?;
        let mut next_role = Role::clone(r);
        next_role.bullets = bullets;
        replace_at(items, role, Arc::new(next_role))
    })
}

// ---- cross-parent moves ----

fn move_role_between(
    ents: &[Arc<Entity>],
    from_entity: usize,
    from_role: usize,
    to_entity: usize,
    to_index: Option<usize>,
) -> Option<Vec<Arc<Entity>>> {
    let src = ents.get(from_entity)?;
    ents.get(to_entity)?;
    if from_role >= src.roles.len() {
        return None;
    }

    if from_entity == to_entity {
        // Same parent: a plain splice keeps the role present exactly once.
        let mut roles = src.roles.clone();
        let moved = roles.remove(from_role);
        let at = clamp_insert_index(to_index, roles.len());
        roles.insert(at, moved);
        let mut next_ent = Entity::clone(src);
        next_ent.roles = roles;
        return replace_at(ents, from_entity, Arc::new(next_ent));
    }

    let dst = &ents[to_entity];
    let mut src_roles = src.roles.clone();
    let moved = src_roles.remove(from_role);
    let mut dst_roles = dst.roles.clone();
    let at = clamp_insert_index(to_index, dst_roles.len());
    dst_roles.insert(at, moved);

    let mut next = ents.to_vec();
    let mut next_src = Entity::clone(src);
    next_src.roles = src_roles;
    let mut next_dst = Entity::clone(dst);
    next_dst.roles = dst_roles;
    next[from_entity] = Arc::new(next_src);
    next[to_entity] = Arc::new(next_dst);
    Some(next)
}

fn move_bullet_between(
    ents: &[Arc<Entity>],
    (from_entity, from_role, from_bullet): (usize, usize, usize),
    (to_entity, to_role): (usize, usize),
    to_index: Option<usize>,
) -> Option<Vec<Arc<Entity>>> {
    let src_ent = ents.get(from_entity)?;
    let dst_ent = ents.get(to_entity)?;
    let src_role = src_ent.roles.get(from_role)?;
    dst_ent.roles.get(to_role)?;
    if from_bullet >= src_role.bullets.len() {
        return None;
    }

    if from_entity == to_entity && from_role == to_role {
        let mut bullets = src_role.bullets.clone();
        let moved = bullets.remove(from_bullet);
        let at = clamp_insert_index(to_index, bullets.len());
        bullets.insert(at, moved);
        return rebuild_entity_role(ents, from_entity, from_role, bullets);
    }

    let mut src_bullets = src_role.bullets.clone();
    let moved = src_bullets.remove(from_bullet);
    let dst_bullets = {
        let dst_role = &dst_ent.roles[to_role];
        let mut bullets = dst_role.bullets.clone();
        let at = clamp_insert_index(to_index, bullets.len());
        bullets.insert(at, moved);
        bullets
    };

    if from_entity == to_entity {
        // Two roles inside the same entity: rebuild that entity once with
        // both role slots updated, so neither update clobbers the other.
        let mut roles = src_ent.roles.clone();
        let mut next_src_role = Role::clone(&roles[from_role]);
        next_src_role.bullets = src_bullets;
        roles[from_role] = Arc::new(next_src_role);
        let mut next_dst_role = Role::clone(&roles[to_role]);
        next_dst_role.bullets = dst_bullets;
        roles[to_role] = Arc::new(next_dst_role);

        let mut next_ent = Entity::clone(src_ent);
        next_ent.roles = roles;
        return replace_at(ents, from_entity, Arc::new(next_ent));
    }

    let next = rebuild_entity_role(ents, from_entity, from_role, src_bullets)?;
    rebuild_entity_role(&next, to_entity, to_role, dst_bullets)
}

fn rebuild_entity_role(
    ents: &[Arc<Entity>],
    entity: usize,
    role: usize,
    bullets: Vec<Arc<Bullet>>,
) -> Option<Vec<Arc<Entity>>> {
    let ent = ents.get(entity)?;
    let r = ent.roles.get(role)?;
    let mut next_role = Role::clone(r);
    next_role.bullets = bullets;
    let mut roles = ent.roles.clone();
    roles[role] = Arc::new(next_role);
    let mut next_ent = Entity::clone(ent);
    next_ent.roles = roles;
    replace_at(ents, entity, Arc::new(next_ent))
}
