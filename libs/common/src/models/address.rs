//! Address model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Server-assigned address identifier, unique within its user
pub type AddressId = i64;

/// Kind of postal address
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AddressType {
    #[default]
    #[serde(rename = "HOME")]
    Home,
    #[serde(rename = "WORK")]
    Work,
}

impl AddressType {
    /// Wire name of the address type
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Home => "HOME",
            AddressType::Work => "WORK",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            AddressType::Home => "Home Address",
            AddressType::Work => "Work Address",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HOME" => Ok(AddressType::Home),
            "WORK" => Ok(AddressType::Work),
            _ => Err(ModelError::InvalidAddressType(s.to_string())),
        }
    }
}

/// Address owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub address_type: AddressType,
    pub address_text: String,
}

/// Body of the address add/update calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub address_type: AddressType,
    pub address_text: String,
}

impl From<&Address> for AddressPayload {
    fn from(address: &Address) -> Self {
        Self {
            address_type: address.address_type,
            address_text: address.address_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_wire_shape() {
        let address: Address = serde_json::from_value(json!({
            "id": 4,
            "addressType": "WORK",
            "addressText": "1 Main St"
        }))
        .unwrap();
        assert_eq!(address.address_type, AddressType::Work);

        let payload = AddressPayload::from(&address);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"addressType": "WORK", "addressText": "1 Main St"})
        );
    }

    #[test]
    fn test_address_type_from_str() {
        assert_eq!("home".parse::<AddressType>().unwrap(), AddressType::Home);
        assert_eq!(" WORK ".parse::<AddressType>().unwrap(), AddressType::Work);
        assert!("OFFICE".parse::<AddressType>().is_err());
    }
}
