//! Attribute schema table
//!
//! Authoritative definitions and current values. Current values only change
//! through [`SchemaTable::replace_all`]; staged writes live in
//! [`PendingChangeSet`](crate::pending::PendingChangeSet).

use biosconf_api::{
    Attribute, AttributeDetails, AttributeType, AttributeValue, BaseTable, Error, PendingAttributes, Result,
};

/// Names of attributes whose current value shape contradicts their type
pub fn mistyped_attributes(attributes: &BaseTable) -> Vec<&str> {
    attributes
        .iter()
        .filter(|(_, attribute)| {
            let textual = matches!(attribute.attribute_type, AttributeType::Enumeration | AttributeType::String);
            attribute.current_value.is_string() != textual
        })
        .map(|(name, _)| name.as_str())
        .collect()
}

/// Base table wrapper
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTable {
    attributes: BaseTable,
}

impl SchemaTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing table
    pub fn from_table(attributes: BaseTable) -> Self {
        Self { attributes }
    }

    /// Look up an attribute definition
    pub fn attribute(&self, name: &str) -> Result<&Attribute> {
        self.attributes.get(name).ok_or_else(|| {
            log::error!("BIOS attribute {} not found in the base table", name);
            Error::AttributeNotFound(name.to_string())
        })
    }

    /// Type, current value and effective pending value of `name`
    ///
    /// Without a staged change the pending value is `""` for string-valued
    /// attributes and the default `Integer(0)` otherwise.
    pub fn get(&self, name: &str, pending: &PendingAttributes) -> Result<AttributeDetails> {
        let attribute = self.attribute(name)?;

        let pending_value = match pending.get(name) {
            Some(change) => change.value.clone(),
            None if attribute.current_value.is_string() => AttributeValue::String(String::new()),
            None => AttributeValue::default(),
        };

        Ok(AttributeDetails {
            attribute_type: attribute.attribute_type,
            current_value: attribute.current_value.clone(),
            pending_value,
        })
    }

    /// Install a whole new table, returning the installed table
    ///
    /// Attributes whose current value contradicts their declared type are
    /// installed as given and logged.
    pub fn replace_all(&mut self, attributes: BaseTable) -> &BaseTable {
        log::info!("Replacing base table with {} attributes", attributes.len());
        for name in mistyped_attributes(&attributes) {
            log::warn!("{} current value does not match its declared type", name);
        }
        self.attributes = attributes;
        &self.attributes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Borrow the underlying table
    pub fn table(&self) -> &BaseTable {
        &self.attributes
    }
}
