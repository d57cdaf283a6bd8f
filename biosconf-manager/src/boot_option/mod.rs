//! Boot option registry
//!
//! Dynamic collection of named boot option records. Each record is a field
//! map persisted with the store and published through an [`ObjectExposer`]
//! at `<prefix>/<key>`.

use biosconf_api::{
    BootOptionField, BootOptionProperty, BootOptionValues, BootOptions, Error, ObjectExposer, Result,
};
use hashbrown::HashMap;

/// Replace every byte outside `[A-Za-z0-9_]` with `_`
///
/// Multibyte characters yield one `_` per byte.
pub fn sanitize_key(id: &str) -> String {
    id.bytes()
        .map(|b| if b.is_ascii_alphanumeric() || b == b'_' { char::from(b) } else { '_' })
        .collect()
}

/// Field map of a freshly created boot option
pub fn initial_values() -> BootOptionValues {
    let mut values = BootOptionValues::new();
    values.insert(BootOptionField::Enabled.name().to_string(), true.into());
    values.insert(BootOptionField::Description.name().to_string(), "".into());
    values.insert(BootOptionField::DisplayName.name().to_string(), "".into());
    values.insert(BootOptionField::UefiDevicePath.name().to_string(), "".into());
    values
}

/// Boot option records and their exposed objects
#[derive(Debug, Default)]
pub struct BootOptionRegistry {
    /// Path prefix for exposed objects
    prefix: String,
    /// Persisted records
    options: BootOptions,
    /// Exposed object path by key
    exposed: HashMap<String, String>,
}

impl BootOptionRegistry {
    /// Create an empty registry exposing objects under `prefix`
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            options: BootOptions::new(),
            exposed: HashMap::new(),
        }
    }

    /// Object path for `key`
    pub fn object_path(&self, key: &str) -> String {
        format!("{}/{}", self.prefix, key)
    }

    /// Create a record for `id` and expose it, returning the sanitized key
    pub fn create(&mut self, id: &str, exposer: &mut dyn ObjectExposer) -> Result<String> {
        let key = sanitize_key(id);
        if self.options.contains_key(&key) {
            log::error!("Boot option {} already exists", key);
            return Err(Error::InvalidArgument(format!("Boot option {} already exists", key)));
        }

        let values = initial_values();
        self.expose(&key, &values, exposer);
        self.options.insert(key.clone(), values);

        log::info!("Created boot option {}", key);
        Ok(key)
    }

    /// Remove a record and withdraw its object; returns false if `key` is unknown
    pub fn delete(&mut self, key: &str, exposer: &mut dyn ObjectExposer) -> bool {
        if let Some(path) = self.exposed.remove(key) {
            exposer.withdraw(&path);
        }

        let removed = self.options.remove(key).is_some();
        if removed {
            log::info!("Deleted boot option {}", key);
        } else {
            log::debug!("Delete of unknown boot option {} ignored", key);
        }
        removed
    }

    /// Update one field of an existing record and refresh its exposed object
    ///
    /// Setting `Enabled` also sets `PendingEnabled`.
    pub fn set_field(
        &mut self,
        key: &str,
        field: BootOptionField,
        value: BootOptionProperty,
        exposer: &mut dyn ObjectExposer,
    ) -> Result<()> {
        let values = self.options.get_mut(key).ok_or_else(|| {
            log::error!("Boot option {} not found", key);
            Error::InvalidArgument(format!("Boot option {} not found", key))
        })?;

        if field == BootOptionField::Enabled {
            values.insert(BootOptionField::PendingEnabled.name().to_string(), value.clone());
        }
        values.insert(field.name().to_string(), value);

        if let Some(path) = self.exposed.get(key) {
            exposer.expose(path, values);
        }
        Ok(())
    }

    /// Replace every record from a persisted snapshot, re-creating every exposure
    pub fn restore_all(&mut self, loaded: BootOptions, exposer: &mut dyn ObjectExposer) {
        for (_, path) in self.exposed.drain() {
            exposer.withdraw(&path);
        }

        for (key, values) in &loaded {
            self.expose(key, values, exposer);
        }
        self.options = loaded;

        log::debug!("Restored {} boot options", self.options.len());
    }

    fn expose(&mut self, key: &str, values: &BootOptionValues, exposer: &mut dyn ObjectExposer) {
        let path = self.object_path(key);
        exposer.expose(&path, values);
        self.exposed.insert(key.to_string(), path);
    }

    pub fn get(&self, key: &str) -> Option<&BootOptionValues> {
        self.options.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn is_exposed(&self, key: &str) -> bool {
        self.exposed.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Borrow every record
    pub fn options(&self) -> &BootOptions {
        &self.options
    }
}
