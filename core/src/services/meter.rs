use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::ClientCore;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::mock::{Backing, Slot};
use crate::models::MeterModel;
use crate::service::{fetch_model, fetch_models, not_implemented, ModelType, Service, ServiceSpec};

const METHODS: &[&str] = &[
    "Spec",
    "RegisterModelMock",
    "Get",
    "ListByWellID",
    "Create",
    "Update",
    "Decommission",
];

/// Operations on the meters attached to a well.
#[derive(Debug)]
pub struct MeterService {
    spec: Arc<ServiceSpec>,
    pub get_fn: Backing<(u64, u64), Result<MeterModel>>,
    pub list_by_well_id_fn: Backing<(u64,), Result<Vec<MeterModel>>>,
    pub create_fn: Backing<(MeterModel,), Result<MeterModel>>,
    pub update_fn: Backing<(MeterModel,), Result<MeterModel>>,
    pub decommission_fn: Backing<(u64, DateTime<Utc>), Result<MeterModel>>,
}

impl MeterService {
    pub fn new(core: Arc<ClientCore>) -> Self {
        Self::with_spec(ServiceSpec::new("meters", core, ModelType::of::<MeterModel>()))
    }

    pub fn with_spec(spec: Arc<ServiceSpec>) -> Self {
        let get_spec = Arc::clone(&spec);
        let list_spec = Arc::clone(&spec);
        Self {
            get_fn: Backing::new(move |well_id: u64, id: u64| {
                fetch_model(
                    &get_spec,
                    HttpMethod::Get,
                    &format!("wells/{well_id}/{}/{id}.json", get_spec.name()),
                    None,
                    200,
                )
            }),
            list_by_well_id_fn: Backing::new(move |well_id: u64| {
                fetch_models(
                    &list_spec,
                    HttpMethod::Get,
                    &format!("wells/{well_id}/{}.json", list_spec.name()),
                    None,
                    200,
                )
            }),
            create_fn: Backing::new(|_: MeterModel| not_implemented()),
            update_fn: Backing::new(|_: MeterModel| not_implemented()),
            decommission_fn: Backing::new(|_: u64, _: DateTime<Utc>| not_implemented()),
            spec,
        }
    }

    pub fn get(&self, well_id: u64, id: u64) -> Result<MeterModel> {
        self.get_fn.call((well_id, id))
    }

    pub fn list_by_well_id(&self, well_id: u64) -> Result<Vec<MeterModel>> {
        self.list_by_well_id_fn.call((well_id,))
    }

    pub fn create(&self, meter: MeterModel) -> Result<MeterModel> {
        self.create_fn.call((meter,))
    }

    pub fn update(&self, meter: MeterModel) -> Result<MeterModel> {
        self.update_fn.call((meter,))
    }

    /// Take a meter out of service as of `date`.
    pub fn decommission(&self, id: u64, date: DateTime<Utc>) -> Result<MeterModel> {
        self.decommission_fn.call((id, date))
    }
}

impl Service for MeterService {
    fn spec(&self) -> &Arc<ServiceSpec> {
        &self.spec
    }

    fn name(&self) -> &'static str {
        "Meter"
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn backing(&self, method: &str) -> Option<&dyn Slot> {
        match method {
            "Get" => Some(&self.get_fn),
            "ListByWellID" => Some(&self.list_by_well_id_fn),
            "Create" => Some(&self.create_fn),
            "Update" => Some(&self.update_fn),
            "Decommission" => Some(&self.decommission_fn),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Model;
    use crate::testing::{client, StubTransport, TEST_HOST};

    #[test]
    fn get_nests_under_the_well() {
        let stub = StubTransport::new();
        stub.respond(
            200,
            r#"{"id":4,"name":"North","unit":"gallons","decomissionDate":"2024-03-01T00:00:00Z"}"#,
        );
        let client = client(&stub);

        let meter = client.meter.get(1, 4).unwrap();
        assert_eq!(meter.id(), 4);
        assert_eq!(meter.unit, "gallons");
        assert!(meter.decommission_date.is_some());
        assert_eq!(stub.last_request().url, format!("{TEST_HOST}/wells/1/meters/4.json"));
    }

    #[test]
    fn list_by_well_id_binds_each_meter() {
        let stub = StubTransport::new();
        stub.respond(200, r#"[{"id":4},{"id":5}]"#);
        let client = client(&stub);

        let meters = client.meter.list_by_well_id(1).unwrap();
        assert_eq!(meters.iter().map(Model::id).collect::<Vec<_>>(), vec![4, 5]);
        assert!(meters.iter().all(|m| m.base.spec().is_some()));
        assert_eq!(stub.last_request().url, format!("{TEST_HOST}/wells/1/meters.json"));
    }

    #[test]
    fn decommission_defaults_to_not_implemented() {
        let client = client(&StubTransport::new());
        assert!(matches!(
            client.meter.decommission(4, Utc::now()),
            Err(Error::NotImplemented)
        ));
    }
}
