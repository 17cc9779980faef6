use crate::{
    error::Error,
    model::{
        DescriptorId,
        field::{ElementKind, FieldDescriptor},
        object::ObjectDescriptor,
    },
    registry::Registry,
};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::trace;

///
/// ExpansionCache
///
/// Field lists keyed by descriptor, path prefix and remaining depth.
/// Descriptors never change after publication, so entries stay valid for
/// the registry's lifetime.
///

#[derive(Default)]
pub struct ExpansionCache {
    entries: RwLock<HashMap<ExpansionKey, Arc<str>>>,
}

impl ExpansionCache {
    fn get(&self, key: &ExpansionKey) -> Option<Arc<str>> {
        self.entries
            .read()
            .expect("expansion cache poisoned")
            .get(key)
            .cloned()
    }

    fn insert(&self, key: ExpansionKey, list: Arc<str>) {
        self.entries
            .write()
            .expect("expansion cache poisoned")
            .insert(key, list);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().expect("expansion cache poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct ExpansionKey {
    descriptor: DescriptorId,
    prefix: String,
    depth: usize,
}

/// Expand every queryable field of `descriptor` under `prefix`.
///
/// Relationships recurse one level deeper; a relationship whose recursion
/// would need a negative depth is left out, which bounds expansion of
/// cyclic schemas.
pub(crate) fn expand(
    registry: &Registry,
    descriptor: &ObjectDescriptor,
    prefix: &str,
    depth: usize,
) -> Result<Arc<str>, Error> {
    let key = ExpansionKey {
        descriptor: descriptor.id(),
        prefix: prefix.to_string(),
        depth,
    };
    if let Some(list) = registry.expansions.get(&key) {
        return Ok(list);
    }
    trace!(ty = descriptor.name(), prefix, depth, "expanding field list");

    let mut parts = Vec::with_capacity(descriptor.fields().len());
    for field in descriptor.ordered_fields() {
        if field.is_attributes() {
            continue;
        }

        match field.kind() {
            ElementKind::Simple => parts.push(format!("{prefix}{}", field.name())),
            ElementKind::Collection if !field.is_child_relationship() => {
                parts.push(format!("{prefix}{}", field.name()));
            }
            ElementKind::Collection => {
                // subqueries only open at the root of a select
                if prefix.is_empty()
                    && let Some(next) = depth.checked_sub(1)
                {
                    let element = resolve(registry, field.related(), field)?;
                    let inner = expand(registry, &element, "", next)?;
                    if !inner.is_empty() {
                        parts.push(format!("(SELECT {inner} FROM {})", field.name()));
                    }
                }
            }
            ElementKind::Relationship => {
                let Some(next) = depth.checked_sub(1) else {
                    continue;
                };
                if field.is_polymorphic() && prefix.is_empty() {
                    if let Some(clause) = type_of(registry, field, next)? {
                        parts.push(clause);
                    }
                } else if let Some(related) = field.related() {
                    let related = resolve(registry, Some(related), field)?;
                    let nested = format!("{prefix}{}.", field.name());
                    let inner = expand(registry, &related, &nested, next)?;
                    if !inner.is_empty() {
                        parts.push(inner.to_string());
                    }
                }
            }
        }
    }

    let list: Arc<str> = Arc::from(parts.join(","));
    registry.expansions.insert(key, Arc::clone(&list));

    Ok(list)
}

// TYPEOF <field> WHEN <Alt> THEN <fields> ... [ELSE <fields>] END
// Branches that expand to nothing are left out, and so is a clause with no
// branch left.
fn type_of(
    registry: &Registry,
    field: &FieldDescriptor,
    depth: usize,
) -> Result<Option<String>, Error> {
    let mut branches = Vec::with_capacity(field.alternatives().len() + 1);

    for alternative in field.alternatives() {
        let descriptor = resolve(registry, Some(*alternative), field)?;
        let inner = expand(registry, &descriptor, "", depth)?;
        if !inner.is_empty() {
            branches.push(format!("WHEN {} THEN {inner}", descriptor.name()));
        }
    }
    if let Some(default) = field.related() {
        let descriptor = resolve(registry, Some(default), field)?;
        let inner = expand(registry, &descriptor, "", depth)?;
        if !inner.is_empty() {
            branches.push(format!("ELSE {inner}"));
        }
    }

    if branches.iter().all(|branch| branch.starts_with("ELSE")) {
        return Ok(None);
    }

    Ok(Some(format!("TYPEOF {} {} END", field.name(), branches.join(" "))))
}

fn resolve(
    registry: &Registry,
    id: Option<DescriptorId>,
    field: &FieldDescriptor,
) -> Result<Arc<ObjectDescriptor>, Error> {
    id.and_then(|id| registry.get(id)).ok_or_else(|| {
        Error::QueryCompile(format!(
            "field '{}' refers to an unpublished descriptor",
            field.name()
        ))
    })
}
