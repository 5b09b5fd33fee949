use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mock::Signature;
use crate::model::{Model, ModelBase, ModelFn, ModelMethod};
use crate::models::PhoneNumberModel;
use crate::service::ServiceSpec;

/// A licensed well driller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrillerModel {
    #[serde(flatten)]
    pub base: ModelBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_expiration_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_issuer_territory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub phone_numbers: Vec<PhoneNumberModel>,

    #[serde(skip)]
    save_fn: ModelFn<(DrillerModel,), DrillerModel>,
    #[serde(skip)]
    update_fn: ModelFn<(DrillerModel,), DrillerModel>,
    #[serde(skip)]
    delete_fn: ModelFn<(u64,), ()>,
}

impl DrillerModel {
    pub fn with_id(id: u64) -> Self {
        Self {
            base: ModelBase::with_id(id),
            ..Self::default()
        }
    }

    /// Persist this driller, returning the stored version.
    pub fn save(&self) -> Result<DrillerModel> {
        self.save_fn.call(ModelMethod::Save, (self.clone(),))
    }

    pub fn update(&self, updated: DrillerModel) -> Result<DrillerModel> {
        self.update_fn.call(ModelMethod::Update, (updated,))
    }

    pub fn delete(&self) -> Result<()> {
        self.delete_fn.call(ModelMethod::Delete, (self.id(),))
    }
}

impl Model for DrillerModel {
    const NAME: &'static str = "DrillerModel";

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }

    fn backing_signature(method: ModelMethod) -> Option<Signature> {
        match method {
            ModelMethod::Save | ModelMethod::Update => {
                Some(Signature::of::<(DrillerModel,), Result<DrillerModel>>())
            }
            ModelMethod::Delete => Some(Signature::of::<(u64,), Result<()>>()),
            _ => None,
        }
    }

    fn wire(&mut self, spec: &Arc<ServiceSpec>) {
        self.save_fn = ModelFn::bind(spec.model_backing(
            ModelMethod::Save,
            |_: DrillerModel| -> Result<DrillerModel> { Err(Error::NotImplemented) },
        ));
        self.update_fn = ModelFn::bind(spec.model_backing(
            ModelMethod::Update,
            |_: DrillerModel| -> Result<DrillerModel> { Err(Error::NotImplemented) },
        ));
        self.delete_fn = ModelFn::bind(spec.model_backing(
            ModelMethod::Delete,
            |_: u64| -> Result<()> { Err(Error::NotImplemented) },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_optional_contact_fields() {
        let driller: DrillerModel = serde_json::from_str(
            r#"{"id":7,"licenseNumber":"TX-5521","firstName":"Ada","streetAddress1":"1 Main St","phoneNumbers":[{"id":1,"numberType":"cell","phoneNumber":"555-0100","isPrimary":true}]}"#,
        )
        .unwrap();
        assert_eq!(driller.id(), 7);
        assert_eq!(driller.license_number.as_deref(), Some("TX-5521"));
        assert_eq!(driller.street_address1.as_deref(), Some("1 Main St"));
        assert!(driller.last_name.is_none());
        assert!(driller.phone_numbers[0].is_primary);
    }

    #[test]
    fn save_before_init_is_rejected() {
        let err = DrillerModel::with_id(1).save().unwrap_err();
        assert_eq!(err.to_string(), "Save called on a model that has not been initialized");
    }

    #[test]
    fn no_metrics_backing() {
        assert!(DrillerModel::backing_signature(ModelMethod::Metrics).is_none());
        assert!(DrillerModel::backing_signature(ModelMethod::Save).is_some());
    }
}
