use std::sync::Arc;

use crate::client::ClientCore;
use crate::error::Result;
use crate::http::{to_json, HttpMethod};
use crate::mock::{Backing, Slot};
use crate::models::{AmendWellPermitsRequest, PermitModel};
use crate::query::PermitListQuery;
use crate::service::{fetch_models, not_implemented, ModelType, Service, ServiceSpec};

const METHODS: &[&str] = &[
    "Spec",
    "RegisterModelMock",
    "Get",
    "Count",
    "List",
    "AmendWellPermits",
];

/// Operations on `/permits`.
#[derive(Debug)]
pub struct PermitService {
    spec: Arc<ServiceSpec>,
    pub get_fn: Backing<(u64,), Result<PermitModel>>,
    pub count_fn: Backing<(), Result<u64>>,
    pub list_fn: Backing<(PermitListQuery,), Result<Vec<PermitModel>>>,
    pub amend_well_permits_fn: Backing<(u64, AmendWellPermitsRequest), Result<Vec<PermitModel>>>,
}

impl PermitService {
    pub fn new(core: Arc<ClientCore>) -> Self {
        Self::with_spec(ServiceSpec::new(
            "permits",
            core,
            ModelType::of::<PermitModel>(),
        ))
    }

    pub fn with_spec(spec: Arc<ServiceSpec>) -> Self {
        let amend_spec = Arc::clone(&spec);
        Self {
            get_fn: Backing::new(|_: u64| not_implemented()),
            count_fn: Backing::new(|| not_implemented()),
            list_fn: Backing::new(|_: PermitListQuery| not_implemented()),
            amend_well_permits_fn: Backing::new(
                move |well_id: u64, request: AmendWellPermitsRequest| {
                    fetch_models(
                        &amend_spec,
                        HttpMethod::Patch,
                        &format!("wells/{well_id}/{}/amend.json", amend_spec.name()),
                        Some(to_json(&request)?),
                        202,
                    )
                },
            ),
            spec,
        }
    }

    pub fn get(&self, id: u64) -> Result<PermitModel> {
        self.get_fn.call((id,))
    }

    pub fn count(&self) -> Result<u64> {
        self.count_fn.call(())
    }

    pub fn list(&self, query: PermitListQuery) -> Result<Vec<PermitModel>> {
        self.list_fn.call((query,))
    }

    /// Apply a JSON patch to every permit of a well. The server answers
    /// `202 Accepted` with the amended permits.
    pub fn amend_well_permits(
        &self,
        well_id: u64,
        request: AmendWellPermitsRequest,
    ) -> Result<Vec<PermitModel>> {
        self.amend_well_permits_fn.call((well_id, request))
    }
}

impl Service for PermitService {
    fn spec(&self) -> &Arc<ServiceSpec> {
        &self.spec
    }

    fn name(&self) -> &'static str {
        "Permit"
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn backing(&self, method: &str) -> Option<&dyn Slot> {
        match method {
            "Get" => Some(&self.get_fn),
            "Count" => Some(&self.count_fn),
            "List" => Some(&self.list_fn),
            "AmendWellPermits" => Some(&self.amend_well_permits_fn),
            _ => None,
        }
    }
}
