use std::sync::Arc;

use crate::client::ClientCore;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::mock::{Backing, Slot};
use crate::models::{MeterReadingModel, ProductionModel};
use crate::query::{ProductionQuery, ReadingQuery};
use crate::service::{fetch_model, not_implemented, ModelType, Service, ServiceSpec};

const METHODS: &[&str] = &[
    "Spec",
    "RegisterModelMock",
    "Get",
    "CountByWell",
    "CountByWellAndMeter",
    "ListByWell",
    "ListByWellAndMeter",
    "GetProductionByWell",
    "GetProductionByWellAndMeter",
];

/// Operations on meter readings and the production totals derived from them.
#[derive(Debug)]
pub struct MeterReadingService {
    spec: Arc<ServiceSpec>,
    pub get_fn: Backing<(u64, u64, u64), Result<MeterReadingModel>>,
    pub count_by_well_fn: Backing<(u64,), Result<u64>>,
    pub count_by_well_and_meter_fn: Backing<(u64, u64), Result<u64>>,
    pub list_by_well_fn: Backing<(u64, ReadingQuery), Result<Vec<MeterReadingModel>>>,
    pub list_by_well_and_meter_fn:
        Backing<(u64, u64, ReadingQuery), Result<Vec<MeterReadingModel>>>,
    pub get_production_by_well_fn: Backing<(u64, ProductionQuery), Result<Vec<ProductionModel>>>,
    pub get_production_by_well_and_meter_fn:
        Backing<(u64, u64, ProductionQuery), Result<ProductionModel>>,
}

impl MeterReadingService {
    pub fn new(core: Arc<ClientCore>) -> Self {
        Self::with_spec(ServiceSpec::new(
            "meterReadings",
            core,
            ModelType::of::<MeterReadingModel>(),
        ))
    }

    pub fn with_spec(spec: Arc<ServiceSpec>) -> Self {
        let get_spec = Arc::clone(&spec);
        let well_core = Arc::clone(spec.core());
        let meter_core = Arc::clone(spec.core());
        Self {
            get_fn: Backing::new(move |well_id: u64, meter_id: u64, id: u64| {
                fetch_model(
                    &get_spec,
                    HttpMethod::Get,
                    &format!("wells/{well_id}/meters/{meter_id}/readings/{id}.json"),
                    None,
                    200,
                )
            }),
            count_by_well_fn: Backing::new(|_: u64| not_implemented()),
            count_by_well_and_meter_fn: Backing::new(|_: u64, _: u64| not_implemented()),
            list_by_well_fn: Backing::new(|_: u64, _: ReadingQuery| not_implemented()),
            list_by_well_and_meter_fn: Backing::new(|_: u64, _: u64, _: ReadingQuery| {
                not_implemented()
            }),
            get_production_by_well_fn: Backing::new(
                move |well_id: u64, query: ProductionQuery| {
                    let mut url = well_core.endpoint(&format!("wells/{well_id}/production.json"))?;
                    query.apply(&mut url);
                    well_core.fetch(HttpMethod::Get, &url, None, 200)
                },
            ),
            get_production_by_well_and_meter_fn: Backing::new(
                move |well_id: u64, meter_id: u64, query: ProductionQuery| {
                    let mut url = meter_core
                        .endpoint(&format!("wells/{well_id}/meters/{meter_id}/production.json"))?;
                    query.apply(&mut url);
                    meter_core.fetch(HttpMethod::Get, &url, None, 200)
                },
            ),
            spec,
        }
    }

    pub fn get(&self, well_id: u64, meter_id: u64, id: u64) -> Result<MeterReadingModel> {
        self.get_fn.call((well_id, meter_id, id))
    }

    pub fn count_by_well(&self, well_id: u64) -> Result<u64> {
        self.count_by_well_fn.call((well_id,))
    }

    pub fn count_by_well_and_meter(&self, well_id: u64, meter_id: u64) -> Result<u64> {
        self.count_by_well_and_meter_fn.call((well_id, meter_id))
    }

    pub fn list_by_well(&self, well_id: u64, query: ReadingQuery) -> Result<Vec<MeterReadingModel>> {
        self.list_by_well_fn.call((well_id, query))
    }

    pub fn list_by_well_and_meter(
        &self,
        well_id: u64,
        meter_id: u64,
        query: ReadingQuery,
    ) -> Result<Vec<MeterReadingModel>> {
        self.list_by_well_and_meter_fn.call((well_id, meter_id, query))
    }

    /// Production totals for every meter on a well.
    pub fn get_production_by_well(
        &self,
        well_id: u64,
        query: ProductionQuery,
    ) -> Result<Vec<ProductionModel>> {
        self.get_production_by_well_fn.call((well_id, query))
    }

    pub fn get_production_by_well_and_meter(
        &self,
        well_id: u64,
        meter_id: u64,
        query: ProductionQuery,
    ) -> Result<ProductionModel> {
        self.get_production_by_well_and_meter_fn
            .call((well_id, meter_id, query))
    }
}

impl Service for MeterReadingService {
    fn spec(&self) -> &Arc<ServiceSpec> {
        &self.spec
    }

    fn name(&self) -> &'static str {
        "MeterReading"
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn backing(&self, method: &str) -> Option<&dyn Slot> {
        match method {
            "Get" => Some(&self.get_fn),
            "CountByWell" => Some(&self.count_by_well_fn),
            "CountByWellAndMeter" => Some(&self.count_by_well_and_meter_fn),
            "ListByWell" => Some(&self.list_by_well_fn),
            "ListByWellAndMeter" => Some(&self.list_by_well_and_meter_fn),
            "GetProductionByWell" => Some(&self.get_production_by_well_fn),
            "GetProductionByWellAndMeter" => Some(&self.get_production_by_well_and_meter_fn),
            _ => None,
        }
    }
}
