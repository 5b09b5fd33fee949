use std::sync::Arc;

use uuid::Uuid;

use crate::client::ClientCore;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::mock::{Backing, Slot};
use crate::models::HistoryModel;
use crate::query::HistoryListQuery;
use crate::service::{fetch_model, not_implemented, ModelType, Service, ServiceSpec};

const METHODS: &[&str] = &["Spec", "RegisterModelMock", "Get", "Count", "List"];

/// Read access to the change history, keyed by update id.
#[derive(Debug)]
pub struct HistoryService {
    spec: Arc<ServiceSpec>,
    pub get_fn: Backing<(Uuid,), Result<HistoryModel>>,
    pub count_fn: Backing<(), Result<u64>>,
    pub list_fn: Backing<(HistoryListQuery,), Result<Vec<HistoryModel>>>,
}

impl HistoryService {
    pub fn new(core: Arc<ClientCore>) -> Self {
        Self::with_spec(ServiceSpec::new(
            "history",
            core,
            ModelType::of::<HistoryModel>(),
        ))
    }

    pub fn with_spec(spec: Arc<ServiceSpec>) -> Self {
        let get_spec = Arc::clone(&spec);
        Self {
            get_fn: Backing::new(move |update_id: Uuid| {
                fetch_model(
                    &get_spec,
                    HttpMethod::Get,
                    &format!("{}/{update_id}.json", get_spec.name()),
                    None,
                    200,
                )
            }),
            count_fn: Backing::new(|| not_implemented()),
            list_fn: Backing::new(|_: HistoryListQuery| not_implemented()),
            spec,
        }
    }

    pub fn get(&self, update_id: Uuid) -> Result<HistoryModel> {
        self.get_fn.call((update_id,))
    }

    pub fn count(&self) -> Result<u64> {
        self.count_fn.call(())
    }

    pub fn list(&self, query: HistoryListQuery) -> Result<Vec<HistoryModel>> {
        self.list_fn.call((query,))
    }
}

impl Service for HistoryService {
    fn spec(&self) -> &Arc<ServiceSpec> {
        &self.spec
    }

    fn name(&self) -> &'static str {
        "History"
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn backing(&self, method: &str) -> Option<&dyn Slot> {
        match method {
            "Get" => Some(&self.get_fn),
            "Count" => Some(&self.count_fn),
            "List" => Some(&self.list_fn),
            _ => None,
        }
    }
}
