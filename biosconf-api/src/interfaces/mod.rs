//! Store interfaces
//!
//! The bus transport calls the store through the capability traits below and
//! maps [`Error::AttributeNotFound`](crate::Error::AttributeNotFound) and
//! [`Error::InvalidArgument`](crate::Error::InvalidArgument) onto remote error
//! replies. The store in turn calls out through [`ObjectExposer`] and
//! [`EventNotifier`], which the transport implements.
//!
//! Every mutating method persists the whole store before it returns.

use crate::error::Result;
use crate::types::{
    AttributeDetails, AttributeValue, BaseTable, BootOptionValues, BootOptions, BootOrder,
    CurrentBoot, PendingAttributes, ResetFlag, SecureBootMode,
};

/// Attribute table and staged changes
pub trait AttributeStore {
    /// Look up an attribute's type, current value and effective pending value
    fn get_attribute(&self, name: &str) -> Result<AttributeDetails>;

    /// Stage a single attribute write, inferring its type from the value shape
    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> Result<()>;

    /// Snapshot of the base table
    fn base_bios_table(&self) -> BaseTable;

    /// Install a new base table; clears every staged change
    fn set_base_bios_table(&mut self, table: BaseTable) -> BaseTable;

    /// Snapshot of the staged changes
    fn pending_attributes(&self) -> PendingAttributes;

    /// Validate and merge staged changes; an empty set discards all of them
    fn set_pending_attributes(&mut self, changes: PendingAttributes) -> Result<PendingAttributes>;

    fn enable_after_reset(&self) -> bool;

    fn set_enable_after_reset(&mut self, value: bool) -> bool;

    fn reset_bios_settings(&self) -> ResetFlag;

    fn set_reset_bios_settings(&mut self, value: ResetFlag) -> ResetFlag;
}

/// Boot option registry
pub trait BootOptionStore {
    /// Create a boot option and return its sanitized key
    fn create_boot_option(&mut self, id: &str) -> Result<String>;

    /// Remove a boot option and its exposed object
    fn delete_boot_option(&mut self, key: &str) -> Result<()>;

    /// Snapshot of one boot option's fields
    fn boot_option(&self, key: &str) -> Option<BootOptionValues>;

    /// Snapshot of every boot option
    fn boot_options(&self) -> BootOptions;

    /// Set `Enabled`; `PendingEnabled` follows it
    fn set_boot_option_enabled(&mut self, key: &str, value: bool) -> Result<bool>;

    fn set_boot_option_pending_enabled(&mut self, key: &str, value: bool) -> Result<bool>;

    fn set_boot_option_description(&mut self, key: &str, value: &str) -> Result<String>;

    fn set_boot_option_display_name(&mut self, key: &str, value: &str) -> Result<String>;

    fn set_boot_option_uefi_device_path(&mut self, key: &str, value: &str) -> Result<String>;
}

/// Boot device order
pub trait BootOrderStore {
    fn boot_order(&self) -> BootOrder;

    /// Set the authoritative order; the pending order follows the configured policy
    fn set_boot_order(&mut self, value: BootOrder) -> BootOrder;

    fn pending_boot_order(&self) -> BootOrder;

    fn set_pending_boot_order(&mut self, value: BootOrder) -> BootOrder;
}

/// Secure boot selectors
pub trait SecureBootStore {
    fn current_boot(&self) -> CurrentBoot;

    fn set_current_boot(&mut self, value: CurrentBoot) -> CurrentBoot;

    fn secure_boot_enable(&self) -> bool;

    fn set_secure_boot_enable(&mut self, value: bool) -> bool;

    fn secure_boot_mode(&self) -> SecureBootMode;

    fn set_secure_boot_mode(&mut self, value: SecureBootMode) -> SecureBootMode;
}

/// Publishes boot options as externally addressable objects
pub trait ObjectExposer {
    /// Publish an object at `path` carrying `values`, or refresh an already published one
    fn expose(&mut self, path: &str, values: &BootOptionValues);

    /// Withdraw the object at `path`
    fn withdraw(&mut self, path: &str);
}

/// Fire-and-forget property change notification
pub trait EventNotifier {
    fn property_changed(&self, property: &str, value: &str, object_path: &str);
}
