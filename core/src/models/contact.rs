use serde::{Deserialize, Serialize};

use crate::model::ModelBase;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhoneNumberModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub number_type: String,
    pub phone_number: String,
    pub is_primary: bool,
}

/// A well contact (owner, operator, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub company_id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<PhoneNumberModel>,
}
