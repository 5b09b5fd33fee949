use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::mock::Signature;
use crate::model::{live_spec, Model, ModelBase, ModelFn, ModelMethod};
use crate::models::{PermitModel, PhoneNumberModel};
use crate::service::ServiceSpec;

/// A registered water well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WellModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub serial: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<PhoneNumberModel>,

    #[serde(skip)]
    update_fn: ModelFn<(WellModel,), WellModel>,
    #[serde(skip)]
    delete_fn: ModelFn<(u64,), ()>,
    #[serde(skip)]
    permits_fn: ModelFn<(WellModel,), Vec<PermitModel>>,
}

/// One page of well search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WellSearchResults {
    pub total: u64,
    pub results: Vec<WellModel>,
}

impl WellModel {
    pub fn with_id(id: u64) -> Self {
        Self {
            base: ModelBase::with_id(id),
            ..Self::default()
        }
    }

    /// Replace this well with `updated`.
    pub fn update(&self, updated: WellModel) -> Result<WellModel> {
        self.update_fn.call(ModelMethod::Update, (updated,))
    }

    pub fn delete(&self) -> Result<()> {
        self.delete_fn.call(ModelMethod::Delete, (self.id(),))
    }

    /// Permits issued for this well.
    ///
    /// The returned permits are not initialized; bind them with the permit
    /// service's spec before calling their methods.
    pub fn permits(&self) -> Result<Vec<PermitModel>> {
        self.permits_fn.call(ModelMethod::Permits, (self.clone(),))
    }
}

impl Model for WellModel {
    const NAME: &'static str = "WellModel";

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }

    fn backing_signature(method: ModelMethod) -> Option<Signature> {
        match method {
            ModelMethod::Update => Some(Signature::of::<(WellModel,), Result<WellModel>>()),
            ModelMethod::Delete => Some(Signature::of::<(u64,), Result<()>>()),
            ModelMethod::Permits => {
                Some(Signature::of::<(WellModel,), Result<Vec<PermitModel>>>())
            }
            _ => None,
        }
    }

    fn wire(&mut self, spec: &Arc<ServiceSpec>) {
        self.update_fn = ModelFn::bind(spec.model_backing(
            ModelMethod::Update,
            |_: WellModel| -> Result<WellModel> { Err(Error::NotImplemented) },
        ));
        self.delete_fn = ModelFn::bind(spec.model_backing(
            ModelMethod::Delete,
            |_: u64| -> Result<()> { Err(Error::NotImplemented) },
        ));
        let weak = Arc::downgrade(spec);
        self.permits_fn = ModelFn::bind(spec.model_backing(
            ModelMethod::Permits,
            move |well: WellModel| fetch_permits(&weak, well.id()),
        ));
    }
}

fn fetch_permits(spec: &Weak<ServiceSpec>, well_id: u64) -> Result<Vec<PermitModel>> {
    let spec = live_spec(spec, "wells")?;
    let url = spec
        .core()
        .endpoint(&format!("{}/{well_id}/permits.json", spec.name()))?;
    spec.core().fetch(HttpMethod::Get, &url, None, 200)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_unbound() {
        let well: WellModel = serde_json::from_str(
            r#"{"id":12,"serial":"W-0012","createdAt":"2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(well.id(), 12);
        assert_eq!(well.serial, "W-0012");
        assert!(well.base.created_at.is_some());
        assert!(well.base.spec().is_none());
    }

    #[test]
    fn methods_fail_fast_before_init() {
        let well = WellModel::with_id(1);
        assert!(matches!(well.delete(), Err(Error::Uninitialized("Delete"))));
        assert!(matches!(
            well.update(WellModel::with_id(1)),
            Err(Error::Uninitialized("Update"))
        ));
        assert!(matches!(well.permits(), Err(Error::Uninitialized("Permits"))));
    }

    #[test]
    fn serializes_without_backing_state() {
        let json = serde_json::to_value(WellModel::with_id(3)).unwrap();
        assert_eq!(json["id"], 3);
        assert!(json.get("updateFn").is_none());
        assert!(json.get("phoneNumbers").is_none());
    }
}
