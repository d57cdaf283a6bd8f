//! BIOS Config Manager
//!
//! This crate provides the persisted BIOS attribute store: a schema-validated
//! attribute table with staged changes, a boot option registry, boot order and
//! secure boot state.
//!
//! # Architecture
//!
//! The manager is organized into several functional domains:
//!
//! - **Schema**: Authoritative attribute definitions and current values
//! - **Validation**: Bound checks for enumeration, string and integer values
//! - **Pending**: Staged changes with all-or-nothing reconciliation
//! - **Boot Option**: Dynamic boot option records and their exposed objects
//! - **Boot Order / Secure Boot**: Small scalar records
//! - **Persistence**: Whole-store versioned archive with migration from version 1
//! - **Manager**: The owning store implementing the capability interfaces
//!
//! # Usage
//!
//! ```rust,no_run
//! use biosconf_api::{Attribute, AttributeStore, AttributeValue, BaseTable, Bound};
//! use biosconf_manager::{Manager, ManagerConfig};
//!
//! let mut manager = Manager::with_defaults(ManagerConfig::default());
//!
//! let mut table = BaseTable::new();
//! table.insert(
//!     "Cores".to_string(),
//!     Attribute::integer(4).with_bounds(vec![
//!         Bound::lower_bound(0),
//!         Bound::upper_bound(8),
//!         Bound::scalar_increment(2),
//!     ]),
//! );
//! manager.set_base_bios_table(table);
//! manager.set_attribute("Cores", AttributeValue::Integer(6))?;
//! # Ok::<(), biosconf_api::Error>(())
//! ```

pub mod boot_option;
pub mod boot_order;
pub mod config;
pub mod events;
pub mod manager;
pub mod pending;
pub mod persistence;
pub mod schema;
pub mod secure_boot;
pub mod validation;

// Re-export commonly used items
pub use boot_option::{sanitize_key, BootOptionRegistry};
pub use boot_order::BootOrderState;
pub use config::{BootOrderPolicy, ManagerConfig};
pub use events::{LogNotifier, NullExposer};
pub use manager::Manager;
pub use pending::PendingChangeSet;
pub use persistence::{LoadOutcome, PersistedState, StateView};
pub use schema::SchemaTable;
pub use secure_boot::SecureBootState;
