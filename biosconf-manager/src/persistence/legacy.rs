//! Version 1 archive shapes
//!
//! Version 1 bounds carry no selector. Everything else matches version 2.

use bincode::{Decode, Encode};
use biosconf_api::{Attribute, AttributeType, AttributeValue, BaseTable, Bound, BoundType};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BoundV1 {
    pub kind: BoundType,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AttributeV1 {
    pub attribute_type: AttributeType,
    pub read_only: bool,
    pub display_name: String,
    pub description: String,
    pub menu_path: String,
    pub current_value: AttributeValue,
    pub default_value: AttributeValue,
    pub bounds: Vec<BoundV1>,
}

pub type BaseTableV1 = BTreeMap<String, AttributeV1>;

impl From<BoundV1> for Bound {
    fn from(bound: BoundV1) -> Self {
        Bound::new(bound.kind, bound.value)
    }
}

impl From<AttributeV1> for Attribute {
    fn from(attribute: AttributeV1) -> Self {
        Attribute {
            attribute_type: attribute.attribute_type,
            read_only: attribute.read_only,
            display_name: attribute.display_name,
            description: attribute.description,
            menu_path: attribute.menu_path,
            current_value: attribute.current_value,
            default_value: attribute.default_value,
            bounds: attribute.bounds.into_iter().map(Bound::from).collect(),
        }
    }
}

/// Upgrade a version 1 table, giving every bound an empty selector
pub fn upgrade(table: BaseTableV1) -> BaseTable {
    table.into_iter().map(|(name, attribute)| (name, attribute.into())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_appends_empty_selector() {
        let mut table = BaseTableV1::new();
        table.insert(
            "Mode".to_string(),
            AttributeV1 {
                attribute_type: AttributeType::Enumeration,
                read_only: false,
                display_name: "Mode".to_string(),
                description: String::new(),
                menu_path: String::new(),
                current_value: "On".into(),
                default_value: "On".into(),
                bounds: vec![
                    BoundV1 {
                        kind: BoundType::OneOf,
                        value: "On".into(),
                    },
                    BoundV1 {
                        kind: BoundType::OneOf,
                        value: "Off".into(),
                    },
                ],
            },
        );

        let upgraded = upgrade(table);
        let mode = &upgraded["Mode"];
        assert_eq!(mode.display_name, "Mode");
        assert_eq!(mode.bounds.len(), 2);
        assert!(mode.bounds.iter().all(|bound| bound.selector.is_empty()));
        assert_eq!(mode.bounds[1].value, AttributeValue::from("Off"));
    }
}
