use std::sync::Arc;

use crate::client::ClientCore;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::mock::{Backing, Slot};
use crate::models::DrillerModel;
use crate::query::ListQuery;
use crate::service::{fetch_model, not_implemented, ModelType, Service, ServiceSpec};

const METHODS: &[&str] = &["Spec", "RegisterModelMock", "Get", "Count", "List", "Create"];

/// Operations on `/drillers`.
#[derive(Debug)]
pub struct DrillerService {
    spec: Arc<ServiceSpec>,
    pub get_fn: Backing<(u64,), Result<DrillerModel>>,
    pub count_fn: Backing<(), Result<u64>>,
    pub list_fn: Backing<(ListQuery,), Result<Vec<DrillerModel>>>,
    pub create_fn: Backing<(DrillerModel,), Result<DrillerModel>>,
}

impl DrillerService {
    pub fn new(core: Arc<ClientCore>) -> Self {
        Self::with_spec(ServiceSpec::new(
            "drillers",
            core,
            ModelType::of::<DrillerModel>(),
        ))
    }

    pub fn with_spec(spec: Arc<ServiceSpec>) -> Self {
        let get_spec = Arc::clone(&spec);
        Self {
            get_fn: Backing::new(move |id: u64| {
                fetch_model(
                    &get_spec,
                    HttpMethod::Get,
                    &format!("{}/{id}.json", get_spec.name()),
                    None,
                    200,
                )
            }),
            count_fn: Backing::new(|| not_implemented()),
            list_fn: Backing::new(|_: ListQuery| not_implemented()),
            create_fn: Backing::new(|_: DrillerModel| not_implemented()),
            spec,
        }
    }

    pub fn get(&self, id: u64) -> Result<DrillerModel> {
        self.get_fn.call((id,))
    }

    pub fn count(&self) -> Result<u64> {
        self.count_fn.call(())
    }

    pub fn list(&self, query: ListQuery) -> Result<Vec<DrillerModel>> {
        self.list_fn.call((query,))
    }

    pub fn create(&self, model: DrillerModel) -> Result<DrillerModel> {
        self.create_fn.call((model,))
    }
}

impl Service for DrillerService {
    fn spec(&self) -> &Arc<ServiceSpec> {
        &self.spec
    }

    fn name(&self) -> &'static str {
        "Driller"
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn backing(&self, method: &str) -> Option<&dyn Slot> {
        match method {
            "Get" => Some(&self.get_fn),
            "Count" => Some(&self.count_fn),
            "List" => Some(&self.list_fn),
            "Create" => Some(&self.create_fn),
            _ => None,
        }
    }
}
