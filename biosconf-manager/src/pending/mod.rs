//! Pending change set
//!
//! Staged attribute writes, reconciled against the schema table on every
//! write. Reconciliation is all-or-nothing: every entry is validated before
//! any entry is merged.

use crate::schema::SchemaTable;
use crate::validation;
use biosconf_api::{AttributeValue, Error, PendingAttribute, PendingAttributes, Result};

/// Staged changes keyed by attribute name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChangeSet {
    changes: PendingAttributes,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a previously persisted change set without revalidating it
    pub fn from_changes(changes: PendingAttributes) -> Self {
        Self { changes }
    }

    /// Discard every staged change
    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// Validate `proposed` against `schema` and merge it
    ///
    /// An empty `proposed` set discards all staged changes. On any failure
    /// nothing is merged. Entries not named in `proposed` are kept.
    pub fn reconcile(&mut self, schema: &SchemaTable, proposed: PendingAttributes) -> Result<&PendingAttributes> {
        if proposed.is_empty() {
            log::debug!("Empty pending set, discarding {} staged changes", self.changes.len());
            self.changes.clear();
            return Ok(&self.changes);
        }

        for (name, change) in &proposed {
            let attribute = schema.attribute(name)?;

            if attribute.attribute_type != change.attribute_type {
                log::error!(
                    "{} staged as {:?} but declared {:?} in the base table",
                    name,
                    change.attribute_type,
                    attribute.attribute_type
                );
                return Err(Error::InvalidArgument(format!("{} type mismatch", name)));
            }

            validation::validate_pending(name, attribute.attribute_type, &change.value, &attribute.bounds)?;
        }

        log::debug!("Staging {} attribute changes", proposed.len());
        self.changes.extend(proposed);
        Ok(&self.changes)
    }

    /// Proposed set for a single write: the staged set with `name` overwritten
    ///
    /// An already staged entry keeps its type and takes the new value; a new
    /// entry's type is inferred from the value shape.
    pub fn with_single(&self, name: &str, value: AttributeValue) -> PendingAttributes {
        let mut proposed = self.changes.clone();
        match proposed.get_mut(name) {
            Some(change) => change.value = value,
            None => {
                let change = PendingAttribute::new(value.inferred_type(), value);
                proposed.insert(name.to_string(), change);
            }
        }
        proposed
    }

    pub fn get(&self, name: &str) -> Option<&PendingAttribute> {
        self.changes.get(name)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Borrow the staged changes
    pub fn changes(&self) -> &PendingAttributes {
        &self.changes
    }
}
