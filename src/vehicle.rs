use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VehicleError {
    #[error("missing vehicle field: {0}")]
    MissingField(&'static str),
}

/// Vehicle registration form. Serialized field names match the backend's
/// `POST /veiculo` contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "carro")]
    pub car: String,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "ano")]
    pub year: String,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "crlv")]
    pub registration: String,
    #[serde(rename = "documento")]
    pub license: String,
}

impl Vehicle {
    /// Every field must be filled in before submission.
    pub fn validate(&self) -> Result<(), VehicleError> {
        let fields = [
            ("carro", &self.car),
            ("marca", &self.brand),
            ("ano", &self.year),
            ("cor", &self.color),
            ("crlv", &self.registration),
            ("documento", &self.license),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(VehicleError::MissingField(name));
            }
        }
        Ok(())
    }
}
