//! Top-level store
//!
//! [`Manager`] owns every record and is the only writer. Each successful
//! mutation updates memory, saves the whole store, then returns the accepted
//! value. Save failures are logged and never reach the caller.

use crate::boot_option::BootOptionRegistry;
use crate::boot_order::BootOrderState;
use crate::config::ManagerConfig;
use crate::events::{self, property, LogNotifier, NullExposer};
use crate::pending::PendingChangeSet;
use crate::persistence::{self, LoadOutcome, PersistedState, StateView};
use crate::schema::SchemaTable;
use crate::secure_boot::SecureBootState;
use biosconf_api::{
    AttributeDetails, AttributeStore, AttributeValue, BaseTable, BootOptionField, BootOptionProperty,
    BootOptionStore, BootOptionValues, BootOptions, BootOrder, BootOrderStore, CurrentBoot, EventNotifier,
    ObjectExposer, PendingAttributes, ResetFlag, Result, SecureBootMode, SecureBootStore,
};
use std::path::{Path, PathBuf};

/// BIOS attribute and boot option store
pub struct Manager {
    config: ManagerConfig,
    persist_path: PathBuf,
    schema: SchemaTable,
    pending: PendingChangeSet,
    enable_after_reset: bool,
    reset_flag: ResetFlag,
    boot_order: BootOrderState,
    secure_boot: SecureBootState,
    boot_options: BootOptionRegistry,
    exposer: Box<dyn ObjectExposer>,
    notifier: Box<dyn EventNotifier>,
}

impl Manager {
    /// Build the store and restore any persisted state
    ///
    /// A missing or corrupt file leaves the store at its defaults.
    pub fn new(config: ManagerConfig, exposer: Box<dyn ObjectExposer>, notifier: Box<dyn EventNotifier>) -> Self {
        let persist_path = config.persist_path();
        let boot_options = BootOptionRegistry::new(&config.boot_options_path);

        let mut manager = Self {
            config,
            persist_path,
            schema: SchemaTable::new(),
            pending: PendingChangeSet::new(),
            enable_after_reset: false,
            reset_flag: ResetFlag::default(),
            boot_order: BootOrderState::new(),
            secure_boot: SecureBootState::default(),
            boot_options,
            exposer,
            notifier,
        };

        match persistence::load(&manager.persist_path) {
            LoadOutcome::Loaded(state) => manager.restore(state),
            LoadOutcome::Missing => log::info!("Starting with default BIOS settings"),
            LoadOutcome::Discarded => log::warn!("Persisted BIOS settings discarded, starting with defaults"),
        }
        manager
    }

    /// Store wired to [`NullExposer`] and [`LogNotifier`]
    pub fn with_defaults(config: ManagerConfig) -> Self {
        Self::new(config, Box::new(NullExposer), Box::new(LogNotifier))
    }

    fn restore(&mut self, state: PersistedState) {
        log::info!(
            "Restored {} attributes, {} pending changes and {} boot options",
            state.base_table.len(),
            state.pending.len(),
            state.boot_options.len()
        );

        self.schema = SchemaTable::from_table(state.base_table);
        self.pending = PendingChangeSet::from_changes(state.pending);
        self.enable_after_reset = state.enable_after_reset;
        self.boot_order = BootOrderState::from_parts(state.boot_order, state.pending_boot_order);
        self.secure_boot = SecureBootState::new(state.current_boot, state.secure_boot_enable, state.secure_boot_mode);
        self.boot_options.restore_all(state.boot_options, self.exposer.as_mut());
    }

    fn view(&self) -> StateView<'_> {
        StateView {
            base_table: self.schema.table(),
            pending: self.pending.changes(),
            enable_after_reset: self.enable_after_reset,
            boot_order: self.boot_order.order(),
            pending_boot_order: self.boot_order.pending(),
            boot_options: self.boot_options.options(),
            current_boot: self.secure_boot.current_boot,
            secure_boot_enable: self.secure_boot.enable,
            secure_boot_mode: self.secure_boot.mode,
        }
    }

    fn persist(&self) {
        if let Err(err) = persistence::save(&self.persist_path, &self.view()) {
            log::error!("Failed to persist BIOS settings: {}", err);
        }
    }

    fn notify(&self, property: &str, value: &str) {
        let value = events::property_value_suffix(value);
        self.notifier.property_changed(property, value, &self.config.object_path);
    }

    fn set_boot_option_field(&mut self, key: &str, field: BootOptionField, value: BootOptionProperty) -> Result<()> {
        self.boot_options.set_field(key, field, value, self.exposer.as_mut())?;
        self.persist();
        Ok(())
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Path of the persisted file
    pub fn persist_path(&self) -> &Path {
        &self.persist_path
    }
}

impl AttributeStore for Manager {
    fn get_attribute(&self, name: &str) -> Result<AttributeDetails> {
        self.schema.get(name, self.pending.changes())
    }

    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> Result<()> {
        let proposed = self.pending.with_single(name, value);
        self.pending.reconcile(&self.schema, proposed)?;
        self.persist();
        Ok(())
    }

    fn base_bios_table(&self) -> BaseTable {
        self.schema.table().clone()
    }

    fn set_base_bios_table(&mut self, table: BaseTable) -> BaseTable {
        self.pending.clear();
        let installed = self.schema.replace_all(table).clone();
        self.persist();
        self.set_reset_bios_settings(ResetFlag::NoAction);
        installed
    }

    fn pending_attributes(&self) -> PendingAttributes {
        self.pending.changes().clone()
    }

    fn set_pending_attributes(&mut self, changes: PendingAttributes) -> Result<PendingAttributes> {
        let accepted = self.pending.reconcile(&self.schema, changes)?.clone();
        self.persist();
        Ok(accepted)
    }

    fn enable_after_reset(&self) -> bool {
        self.enable_after_reset
    }

    fn set_enable_after_reset(&mut self, value: bool) -> bool {
        self.enable_after_reset = value;
        self.persist();
        value
    }

    fn reset_bios_settings(&self) -> ResetFlag {
        self.reset_flag
    }

    fn set_reset_bios_settings(&mut self, value: ResetFlag) -> ResetFlag {
        self.reset_flag = value;
        self.notify(property::RESET_BIOS_SETTINGS, value.as_bus_str());
        value
    }
}

impl BootOptionStore for Manager {
    fn create_boot_option(&mut self, id: &str) -> Result<String> {
        let key = self.boot_options.create(id, self.exposer.as_mut())?;
        self.persist();
        Ok(key)
    }

    fn delete_boot_option(&mut self, key: &str) -> Result<()> {
        self.boot_options.delete(key, self.exposer.as_mut());
        self.persist();
        Ok(())
    }

    fn boot_option(&self, key: &str) -> Option<BootOptionValues> {
        self.boot_options.get(key).cloned()
    }

    fn boot_options(&self) -> BootOptions {
        self.boot_options.options().clone()
    }

    fn set_boot_option_enabled(&mut self, key: &str, value: bool) -> Result<bool> {
        self.set_boot_option_field(key, BootOptionField::Enabled, value.into())?;
        Ok(value)
    }

    fn set_boot_option_pending_enabled(&mut self, key: &str, value: bool) -> Result<bool> {
        self.set_boot_option_field(key, BootOptionField::PendingEnabled, value.into())?;
        Ok(value)
    }

    fn set_boot_option_description(&mut self, key: &str, value: &str) -> Result<String> {
        self.set_boot_option_field(key, BootOptionField::Description, value.into())?;
        Ok(value.to_string())
    }

    fn set_boot_option_display_name(&mut self, key: &str, value: &str) -> Result<String> {
        self.set_boot_option_field(key, BootOptionField::DisplayName, value.into())?;
        Ok(value.to_string())
    }

    fn set_boot_option_uefi_device_path(&mut self, key: &str, value: &str) -> Result<String> {
        self.set_boot_option_field(key, BootOptionField::UefiDevicePath, value.into())?;
        Ok(value.to_string())
    }
}

impl BootOrderStore for Manager {
    fn boot_order(&self) -> BootOrder {
        self.boot_order.order().clone()
    }

    fn set_boot_order(&mut self, value: BootOrder) -> BootOrder {
        let accepted = self.boot_order.set_order(value, self.config.boot_order_policy).clone();
        self.persist();
        accepted
    }

    fn pending_boot_order(&self) -> BootOrder {
        self.boot_order.pending().clone()
    }

    fn set_pending_boot_order(&mut self, value: BootOrder) -> BootOrder {
        let accepted = self.boot_order.set_pending(value).clone();
        self.persist();
        accepted
    }
}

impl SecureBootStore for Manager {
    fn current_boot(&self) -> CurrentBoot {
        self.secure_boot.current_boot
    }

    fn set_current_boot(&mut self, value: CurrentBoot) -> CurrentBoot {
        self.secure_boot.current_boot = value;
        self.persist();
        self.notify(property::CURRENT_BOOT, value.as_bus_str());
        value
    }

    fn secure_boot_enable(&self) -> bool {
        self.secure_boot.enable
    }

    fn set_secure_boot_enable(&mut self, value: bool) -> bool {
        self.secure_boot.enable = value;
        self.persist();
        self.notify(property::ENABLE, if value { "true" } else { "false" });
        value
    }

    fn secure_boot_mode(&self) -> SecureBootMode {
        self.secure_boot.mode
    }

    fn set_secure_boot_mode(&mut self, value: SecureBootMode) -> SecureBootMode {
        self.secure_boot.mode = value;
        self.persist();
        self.notify(property::MODE, value.as_bus_str());
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootOrderPolicy;
    use biosconf_api::{Attribute, Bound};
    use tempfile::tempdir;

    fn table() -> BaseTable {
        let mut table = BaseTable::new();
        table.insert(
            "Cores".to_string(),
            Attribute::integer(4).with_bounds(vec![
                Bound::lower_bound(0),
                Bound::upper_bound(10),
                Bound::scalar_increment(2),
            ]),
        );
        table
    }

    #[test]
    fn test_write_through_survives_restart() {
        let dir = tempdir().unwrap();
        let config = ManagerConfig::with_persist_dir(dir.path());

        let mut manager = Manager::with_defaults(config.clone());
        manager.set_base_bios_table(table());
        manager.set_attribute("Cores", AttributeValue::Integer(6)).unwrap();
        manager.set_secure_boot_mode(SecureBootMode::Deployed);
        assert!(manager.persist_path().exists());

        let reloaded = Manager::with_defaults(config);
        assert_eq!(reloaded.get_attribute("Cores").unwrap().pending_value, AttributeValue::Integer(6));
        assert_eq!(reloaded.secure_boot_mode(), SecureBootMode::Deployed);
    }

    #[test]
    fn test_rejected_write_leaves_state() {
        let dir = tempdir().unwrap();
        let mut manager = Manager::with_defaults(ManagerConfig::with_persist_dir(dir.path()));
        manager.set_base_bios_table(table());

        let err = manager.set_attribute("Cores", AttributeValue::Integer(5)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(manager.pending_attributes().is_empty());

        let err = manager.set_attribute("Missing", AttributeValue::Integer(2)).unwrap_err();
        assert!(err.is_attribute_not_found());
    }

    #[test]
    fn test_boot_order_policy() {
        let dir = tempdir().unwrap();
        let order = vec!["disk".to_string(), "net".to_string()];

        let config = ManagerConfig::with_persist_dir(dir.path()).with_boot_order_policy(BootOrderPolicy::CopyToPending);
        let mut manager = Manager::with_defaults(config.clone());
        manager.set_boot_order(order.clone());
        assert_eq!(manager.pending_boot_order(), order);

        let mut manager = Manager::with_defaults(config.with_boot_order_policy(BootOrderPolicy::ClearPending));
        manager.set_pending_boot_order(vec!["net".to_string()]);
        manager.set_boot_order(order.clone());
        assert_eq!(manager.boot_order(), order);
        assert!(manager.pending_boot_order().is_empty());
    }

    #[test]
    fn test_save_failure_is_not_surfaced() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("not-created");
        let mut manager = Manager::with_defaults(ManagerConfig::with_persist_dir(missing));

        assert!(manager.set_enable_after_reset(true));
        assert!(manager.enable_after_reset());
        assert!(!manager.persist_path().exists());
    }
}
