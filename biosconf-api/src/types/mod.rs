//! Store types
//!
//! This module provides the data model shared by the attribute store and its
//! transport: attributes and their bounds, staged changes, boot options, boot
//! order and secure boot selectors.
//!
//! Field order on [`Attribute`] and [`Bound`] is the persisted order.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MANAGER_NAMESPACE: &str = "xyz.openbmc_project.BIOSConfig.Manager";
const SECURE_BOOT_NAMESPACE: &str = "xyz.openbmc_project.BIOSConfig.SecureBoot";

/// Attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Encode, Decode, Serialize, Deserialize)]
pub enum AttributeType {
    /// Value must match one of the `OneOf` bounds
    Enumeration,
    /// Free text within length bounds
    String,
    /// Signed integer within range and increment bounds
    Integer,
}

impl AttributeType {
    /// Fully qualified bus name of this type
    pub fn as_bus_str(&self) -> &'static str {
        match self {
            Self::Enumeration => "xyz.openbmc_project.BIOSConfig.Manager.AttributeType.Enumeration",
            Self::String => "xyz.openbmc_project.BIOSConfig.Manager.AttributeType.String",
            Self::Integer => "xyz.openbmc_project.BIOSConfig.Manager.AttributeType.Integer",
        }
    }

    /// Parse a fully qualified bus name
    pub fn from_bus_str(value: &str) -> Option<Self> {
        match value.strip_prefix(MANAGER_NAMESPACE)?.strip_prefix(".AttributeType.")? {
            "Enumeration" => Some(Self::Enumeration),
            "String" => Some(Self::String),
            "Integer" => Some(Self::Integer),
            _ => None,
        }
    }
}

/// Bound kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Encode, Decode, Serialize, Deserialize)]
pub enum BoundType {
    /// Permitted enumeration value (textual), with an optional label in the selector
    OneOf,
    /// Minimum string length (integer)
    MinStringLength,
    /// Maximum string length (integer)
    MaxStringLength,
    /// Minimum integer value
    LowerBound,
    /// Maximum integer value
    UpperBound,
    /// Step between permitted integer values, counted from the lower bound
    ScalarIncrement,
}

impl BoundType {
    /// Fully qualified bus name of this bound kind
    pub fn as_bus_str(&self) -> &'static str {
        match self {
            Self::OneOf => "xyz.openbmc_project.BIOSConfig.Manager.BoundType.OneOf",
            Self::MinStringLength => "xyz.openbmc_project.BIOSConfig.Manager.BoundType.MinStringLength",
            Self::MaxStringLength => "xyz.openbmc_project.BIOSConfig.Manager.BoundType.MaxStringLength",
            Self::LowerBound => "xyz.openbmc_project.BIOSConfig.Manager.BoundType.LowerBound",
            Self::UpperBound => "xyz.openbmc_project.BIOSConfig.Manager.BoundType.UpperBound",
            Self::ScalarIncrement => "xyz.openbmc_project.BIOSConfig.Manager.BoundType.ScalarIncrement",
        }
    }

    /// Parse a fully qualified bus name
    pub fn from_bus_str(value: &str) -> Option<Self> {
        match value.strip_prefix(MANAGER_NAMESPACE)?.strip_prefix(".BoundType.")? {
            "OneOf" => Some(Self::OneOf),
            "MinStringLength" => Some(Self::MinStringLength),
            "MaxStringLength" => Some(Self::MaxStringLength),
            "LowerBound" => Some(Self::LowerBound),
            "UpperBound" => Some(Self::UpperBound),
            "ScalarIncrement" => Some(Self::ScalarIncrement),
            _ => None,
        }
    }
}

/// Attribute value: either an integer or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub enum AttributeValue {
    Integer(i64),
    String(String),
}

impl Default for AttributeValue {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl AttributeValue {
    /// Integer payload, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::String(_) => None,
        }
    }

    /// String payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Integer(_) => None,
            Self::String(value) => Some(value),
        }
    }

    /// Returns true if the value is textual
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Type inferred from the runtime shape: textual values are `String`,
    /// everything else is `Integer`. Never yields `Enumeration`.
    pub fn inferred_type(&self) -> AttributeType {
        match self {
            Self::Integer(_) => AttributeType::Integer,
            Self::String(_) => AttributeType::String,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Validation bound attached to an attribute
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Bound {
    /// Bound kind
    pub kind: BoundType,
    /// Bound value, typed per kind
    pub value: AttributeValue,
    /// Secondary label, used by `OneOf` bounds (empty for migrated bounds)
    pub selector: String,
}

impl Bound {
    /// Create a bound with an empty selector
    pub fn new(kind: BoundType, value: AttributeValue) -> Self {
        Self {
            kind,
            value,
            selector: String::new(),
        }
    }

    /// Permitted enumeration value with a display label
    pub fn one_of(value: &str, label: &str) -> Self {
        Self {
            kind: BoundType::OneOf,
            value: value.into(),
            selector: label.to_string(),
        }
    }

    pub fn min_string_length(len: i64) -> Self {
        Self::new(BoundType::MinStringLength, len.into())
    }

    pub fn max_string_length(len: i64) -> Self {
        Self::new(BoundType::MaxStringLength, len.into())
    }

    pub fn lower_bound(value: i64) -> Self {
        Self::new(BoundType::LowerBound, value.into())
    }

    pub fn upper_bound(value: i64) -> Self {
        Self::new(BoundType::UpperBound, value.into())
    }

    pub fn scalar_increment(value: i64) -> Self {
        Self::new(BoundType::ScalarIncrement, value.into())
    }
}

/// Base table entry: definition and current value of one attribute
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Attribute {
    /// Declared attribute type
    pub attribute_type: AttributeType,
    /// Read-only flag
    pub read_only: bool,
    /// Display name
    pub display_name: String,
    /// Description
    pub description: String,
    /// Menu path
    pub menu_path: String,
    /// Current value
    pub current_value: AttributeValue,
    /// Default value
    pub default_value: AttributeValue,
    /// Ordered validation bounds
    pub bounds: Vec<Bound>,
}

impl Attribute {
    /// Create an attribute with empty display metadata and no bounds
    pub fn new(attribute_type: AttributeType, current_value: AttributeValue) -> Self {
        Self {
            attribute_type,
            read_only: false,
            display_name: String::new(),
            description: String::new(),
            menu_path: String::new(),
            default_value: current_value.clone(),
            current_value,
            bounds: Vec::new(),
        }
    }

    pub fn integer(current: i64) -> Self {
        Self::new(AttributeType::Integer, current.into())
    }

    pub fn string(current: &str) -> Self {
        Self::new(AttributeType::String, current.into())
    }

    pub fn enumeration(current: &str) -> Self {
        Self::new(AttributeType::Enumeration, current.into())
    }

    /// Replace the bound list
    pub fn with_bounds(mut self, bounds: Vec<Bound>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set display name and description
    pub fn with_display(mut self, display_name: &str, description: &str) -> Self {
        self.display_name = display_name.to_string();
        self.description = description.to_string();
        self
    }

    pub fn with_menu_path(mut self, menu_path: &str) -> Self {
        self.menu_path = menu_path.to_string();
        self
    }

    pub fn with_default(mut self, default_value: AttributeValue) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Attribute name to definition
pub type BaseTable = BTreeMap<String, Attribute>;

/// Staged, not yet applied attribute write
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct PendingAttribute {
    /// Type the caller claims for the value
    pub attribute_type: AttributeType,
    /// Proposed value
    pub value: AttributeValue,
}

impl PendingAttribute {
    pub fn new(attribute_type: AttributeType, value: AttributeValue) -> Self {
        Self {
            attribute_type,
            value,
        }
    }
}

/// Attribute name to staged write
pub type PendingAttributes = BTreeMap<String, PendingAttribute>;

/// Result of an attribute lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDetails {
    pub attribute_type: AttributeType,
    pub current_value: AttributeValue,
    /// Staged value if any. Without one, string attributes report `""` and
    /// integer attributes report `Integer(0)`: presence is not signalled.
    pub pending_value: AttributeValue,
}

/// Reset request flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub enum ResetFlag {
    #[default]
    NoAction,
    FactoryDefaults,
    FailSafeDefaults,
}

impl ResetFlag {
    pub fn as_bus_str(&self) -> &'static str {
        match self {
            Self::NoAction => "xyz.openbmc_project.BIOSConfig.Manager.ResetFlag.NoAction",
            Self::FactoryDefaults => "xyz.openbmc_project.BIOSConfig.Manager.ResetFlag.FactoryDefaults",
            Self::FailSafeDefaults => "xyz.openbmc_project.BIOSConfig.Manager.ResetFlag.FailSafeDefaults",
        }
    }

    pub fn from_bus_str(value: &str) -> Option<Self> {
        match value.strip_prefix(MANAGER_NAMESPACE)?.strip_prefix(".ResetFlag.")? {
            "NoAction" => Some(Self::NoAction),
            "FactoryDefaults" => Some(Self::FactoryDefaults),
            "FailSafeDefaults" => Some(Self::FailSafeDefaults),
            _ => None,
        }
    }
}

/// Secure boot state of the current boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub enum CurrentBoot {
    #[default]
    Unknown,
    Disabled,
    Enabled,
}

impl CurrentBoot {
    pub fn as_bus_str(&self) -> &'static str {
        match self {
            Self::Unknown => "xyz.openbmc_project.BIOSConfig.SecureBoot.CurrentBootType.Unknown",
            Self::Disabled => "xyz.openbmc_project.BIOSConfig.SecureBoot.CurrentBootType.Disabled",
            Self::Enabled => "xyz.openbmc_project.BIOSConfig.SecureBoot.CurrentBootType.Enabled",
        }
    }

    pub fn from_bus_str(value: &str) -> Option<Self> {
        match value.strip_prefix(SECURE_BOOT_NAMESPACE)?.strip_prefix(".CurrentBootType.")? {
            "Unknown" => Some(Self::Unknown),
            "Disabled" => Some(Self::Disabled),
            "Enabled" => Some(Self::Enabled),
            _ => None,
        }
    }
}

/// Secure boot mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub enum SecureBootMode {
    #[default]
    Setup,
    User,
    Audit,
    Deployed,
}

impl SecureBootMode {
    pub fn as_bus_str(&self) -> &'static str {
        match self {
            Self::Setup => "xyz.openbmc_project.BIOSConfig.SecureBoot.ModeType.Setup",
            Self::User => "xyz.openbmc_project.BIOSConfig.SecureBoot.ModeType.User",
            Self::Audit => "xyz.openbmc_project.BIOSConfig.SecureBoot.ModeType.Audit",
            Self::Deployed => "xyz.openbmc_project.BIOSConfig.SecureBoot.ModeType.Deployed",
        }
    }

    pub fn from_bus_str(value: &str) -> Option<Self> {
        match value.strip_prefix(SECURE_BOOT_NAMESPACE)?.strip_prefix(".ModeType.")? {
            "Setup" => Some(Self::Setup),
            "User" => Some(Self::User),
            "Audit" => Some(Self::Audit),
            "Deployed" => Some(Self::Deployed),
            _ => None,
        }
    }
}

/// Boot option property value
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum BootOptionProperty {
    Boolean(bool),
    String(String),
}

impl BootOptionProperty {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            Self::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Boolean(_) => None,
            Self::String(value) => Some(value),
        }
    }
}

impl From<bool> for BootOptionProperty {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for BootOptionProperty {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for BootOptionProperty {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Named field of a boot option record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootOptionField {
    Enabled,
    PendingEnabled,
    Description,
    DisplayName,
    UefiDevicePath,
}

impl BootOptionField {
    /// Key used in the persisted field map
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::PendingEnabled => "PendingEnabled",
            Self::Description => "Description",
            Self::DisplayName => "DisplayName",
            Self::UefiDevicePath => "UefiDevicePath",
        }
    }
}

/// Field name to value for one boot option
pub type BootOptionValues = BTreeMap<String, BootOptionProperty>;

/// Boot option key to field map
pub type BootOptions = BTreeMap<String, BootOptionValues>;

/// Ordered list of boot option keys
pub type BootOrder = Vec<String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_shape() {
        assert_eq!(AttributeValue::default(), AttributeValue::Integer(0));
        assert_eq!(AttributeValue::from(7i64).as_integer(), Some(7));
        assert_eq!(AttributeValue::from("abc").as_str(), Some("abc"));
        assert!(AttributeValue::from("abc").is_string());
        assert_eq!(AttributeValue::from(1i64).inferred_type(), AttributeType::Integer);
        assert_eq!(AttributeValue::from("x").inferred_type(), AttributeType::String);
    }

    #[test]
    fn test_bus_names_round_trip() {
        for ty in [AttributeType::Enumeration, AttributeType::String, AttributeType::Integer] {
            assert_eq!(AttributeType::from_bus_str(ty.as_bus_str()), Some(ty));
        }
        for mode in [
            SecureBootMode::Setup,
            SecureBootMode::User,
            SecureBootMode::Audit,
            SecureBootMode::Deployed,
        ] {
            assert_eq!(SecureBootMode::from_bus_str(mode.as_bus_str()), Some(mode));
        }
        assert_eq!(
            CurrentBoot::from_bus_str(CurrentBoot::Disabled.as_bus_str()),
            Some(CurrentBoot::Disabled)
        );
        assert_eq!(
            ResetFlag::from_bus_str(ResetFlag::FailSafeDefaults.as_bus_str()),
            Some(ResetFlag::FailSafeDefaults)
        );
        assert_eq!(
            BoundType::from_bus_str(BoundType::ScalarIncrement.as_bus_str()),
            Some(BoundType::ScalarIncrement)
        );
    }

    #[test]
    fn test_bus_names_reject_foreign_namespace() {
        assert_eq!(AttributeType::from_bus_str("Integer"), None);
        assert_eq!(
            SecureBootMode::from_bus_str("xyz.openbmc_project.BIOSConfig.Manager.ModeType.User"),
            None
        );
        assert_eq!(ResetFlag::from_bus_str(""), None);
    }

    #[test]
    fn test_attribute_builder() {
        let attr = Attribute::integer(4)
            .with_bounds(vec![Bound::lower_bound(0), Bound::upper_bound(10)])
            .with_display("Cores", "Active core count")
            .with_menu_path("./Processor")
            .read_only();
        assert_eq!(attr.attribute_type, AttributeType::Integer);
        assert_eq!(attr.default_value, AttributeValue::Integer(4));
        assert_eq!(attr.bounds.len(), 2);
        assert_eq!(attr.display_name, "Cores");
        assert!(attr.read_only);
    }

    #[test]
    fn test_bound_one_of_label() {
        let bound = Bound::one_of("Enabled", "On");
        assert_eq!(bound.kind, BoundType::OneOf);
        assert_eq!(bound.value.as_str(), Some("Enabled"));
        assert_eq!(bound.selector, "On");
        assert!(Bound::lower_bound(3).selector.is_empty());
    }

    #[test]
    fn test_boot_option_field_names() {
        assert_eq!(BootOptionField::Enabled.name(), "Enabled");
        assert_eq!(BootOptionField::UefiDevicePath.name(), "UefiDevicePath");
        assert_eq!(BootOptionProperty::from(true).as_bool(), Some(true));
        assert_eq!(BootOptionProperty::from("disk").as_str(), Some("disk"));
    }
}
