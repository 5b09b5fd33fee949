use std::sync::Arc;

use serde_json::json;

use crate::client::ClientCore;
use crate::error::{Error, Result};
use crate::http::{to_json, HttpMethod};
use crate::mock::{Backing, Slot};
use crate::model::Model;
use crate::models::{WellModel, WellSearchResults};
use crate::query::{ListQuery, SearchQuery, MAX_SEARCH_SIZE};
use crate::service::{fetch_model, fetch_models, not_implemented, ModelType, Service, ServiceSpec};

const METHODS: &[&str] = &[
    "Spec",
    "RegisterModelMock",
    "Get",
    "GetWellsByIDs",
    "Count",
    "List",
    "Search",
    "Create",
    "TriggerUpdate",
];

/// Operations on `/wells`.
#[derive(Debug)]
pub struct WellService {
    spec: Arc<ServiceSpec>,
    pub get_fn: Backing<(u64,), Result<WellModel>>,
    pub get_wells_by_ids_fn: Backing<(Vec<u64>,), Result<Vec<WellModel>>>,
    pub count_fn: Backing<(), Result<u64>>,
    pub list_fn: Backing<(ListQuery,), Result<Vec<WellModel>>>,
    pub search_fn: Backing<(SearchQuery,), Result<WellSearchResults>>,
    pub create_fn: Backing<(WellModel,), Result<WellModel>>,
    pub trigger_update_fn: Backing<(u64,), Result<()>>,
}

impl WellService {
    pub fn new(core: Arc<ClientCore>) -> Self {
        Self::with_spec(ServiceSpec::new("wells", core, ModelType::of::<WellModel>()))
    }

    pub fn with_spec(spec: Arc<ServiceSpec>) -> Self {
        let get_spec = Arc::clone(&spec);
        let by_ids_spec = Arc::clone(&spec);
        let search_spec = Arc::clone(&spec);
        let trigger_spec = Arc::clone(&spec);

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
            get_wells_by_ids_fn: Backing::new(move |ids: Vec<u64>| {
                let body = to_json(&json!({ "ids": ids }))?;
                fetch_models(
                    &by_ids_spec,
                    HttpMethod::Post,
                    &format!("{}/wellsByIDs.json", by_ids_spec.name()),
                    Some(body),
                    200,
                )
            }),
            count_fn: Backing::new(|| not_implemented()),
            list_fn: Backing::new(|_: ListQuery| not_implemented()),
            search_fn: Backing::new(move |query: SearchQuery| search(&search_spec, &query)),
            create_fn: Backing::new(|_: WellModel| not_implemented()),
            trigger_update_fn: Backing::new(move |id: u64| {
                let url = trigger_spec
                    .core()
                    .endpoint(&format!("{}/{id}/triggerUpdate.json", trigger_spec.name()))?;
                trigger_spec
                    .core()
                    .fetch_empty(HttpMethod::Put, &url, None, 200)
            }),
            spec,
        }
    }

    pub fn get(&self, id: u64) -> Result<WellModel> {
        self.get_fn.call((id,))
    }

    pub fn get_wells_by_ids(&self, ids: &[u64]) -> Result<Vec<WellModel>> {
        self.get_wells_by_ids_fn.call((ids.to_vec(),))
    }

    pub fn count(&self) -> Result<u64> {
        self.count_fn.call(())
    }

    pub fn list(&self, query: ListQuery) -> Result<Vec<WellModel>> {
        self.list_fn.call((query,))
    }

    /// Search wells. `query.size` may not exceed 150.
    pub fn search(&self, query: SearchQuery) -> Result<WellSearchResults> {
        self.search_fn.call((query,))
    }

    pub fn create(&self, model: WellModel) -> Result<WellModel> {
        self.create_fn.call((model,))
    }

    /// Ask the server to recompute derived data for a well.
    pub fn trigger_update(&self, id: u64) -> Result<()> {
        self.trigger_update_fn.call((id,))
    }
}

fn search(spec: &Arc<ServiceSpec>, query: &SearchQuery) -> Result<WellSearchResults> {
    if query.size > MAX_SEARCH_SIZE {
        return Err(Error::InvalidArgument(format!(
            "size parameter must not exceed {MAX_SEARCH_SIZE}"
        )));
    }
    let mut url = spec
        .core()
        .endpoint(&format!("{}/search.json", spec.name()))?;
    query.apply(&mut url);

    let page: WellSearchResults = spec.core().fetch(HttpMethod::Get, &url, None, 200)?;
    Ok(WellSearchResults {
        total: page.total,
        results: page.results.into_iter().map(|w| w.init(spec)).collect(),
    })
}

impl Service for WellService {
    fn spec(&self) -> &Arc<ServiceSpec> {
        &self.spec
    }

    fn name(&self) -> &'static str {
        "Well"
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn backing(&self, method: &str) -> Option<&dyn Slot> {
        match method {
            "Get" => Some(&self.get_fn),
            "GetWellsByIDs" => Some(&self.get_wells_by_ids_fn),
            "Count" => Some(&self.count_fn),
            "List" => Some(&self.list_fn),
            "Search" => Some(&self.search_fn),
            "Create" => Some(&self.create_fn),
            "TriggerUpdate" => Some(&self.trigger_update_fn),
            _ => None,
        }
    }
}
