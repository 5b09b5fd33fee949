use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::http::HttpMethod;
use crate::mock::Signature;
use crate::model::{live_spec, Model, ModelBase, ModelFn, ModelMethod};
use crate::service::ServiceSpec;

const METRICS_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

type MetricsArgs = (PermitModel, Option<DateTime<Utc>>, Option<DateTime<Utc>>, bool);

/// A water-use permit attached to a well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermitModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub company_id: u64,
    pub well_id: u64,
    pub history_update_id: Option<Uuid>,
    pub permit_template_id: u64,
    pub permit_template: PermitTemplateModel,
    pub issued_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub termination_date: Option<DateTime<Utc>>,
    pub aggregate: bool,
    pub aggregate_permit_id: Option<u64>,
    pub aggregated_permits: Vec<PermitModel>,
    pub amended_by: Option<u64>,
    pub operator_first_name: Option<String>,
    pub operator_last_name: Option<String>,
    pub operator_company_name: Option<String>,
    pub operator_email: Option<String>,
    pub operator_phone_number1: Option<String>,
    pub operator_phone_number2: Option<String>,
    pub operator_street_address1: Option<String>,
    pub operator_street_address2: Option<String>,
    pub operator_city: Option<String>,
    pub operator_state: Option<String>,
    pub operator_postal_code: Option<String>,

    #[serde(skip)]
    metrics_fn: ModelFn<MetricsArgs, PermitMetricsModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermitTemplateModel {
    pub id: u64,
    pub company_id: u64,
    pub permit_name: String,
    pub condition: String,
    pub required_fields: String,
    pub duration_days: i32,
    pub can_aggregate: bool,
    pub aggregate_fields: String,
}

/// Production totals measured against a permit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermitMetricsModel {
    pub permits_count: i64,
    pub wells_count: i64,
    pub meters_count: i64,
    pub over_permitted_production: bool,
    pub total_estimated_annual_water_production: f64,
    pub total_volume_produced: f64,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub estimated: bool,
}

/// Body of `PATCH /wells/{id}/permits/amend.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendWellPermitsRequest {
    pub history_update_id: Uuid,
    pub patch: String,
}

impl PermitModel {
    pub fn with_id(id: u64) -> Self {
        Self {
            base: ModelBase::with_id(id),
            ..Self::default()
        }
    }

    /// Production metrics for this permit over an optional date window.
    pub fn metrics(
        &self,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        estimate_bounds: bool,
    ) -> Result<PermitMetricsModel> {
        self.metrics_fn.call(
            ModelMethod::Metrics,
            (self.clone(), from_date, to_date, estimate_bounds),
        )
    }
}

impl Model for PermitModel {
    const NAME: &'static str = "PermitModel";

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }

    fn backing_signature(method: ModelMethod) -> Option<Signature> {
        match method {
            ModelMethod::Metrics => Some(Signature::of::<MetricsArgs, Result<PermitMetricsModel>>()),
            _ => None,
        }
    }

    fn wire(&mut self, spec: &Arc<ServiceSpec>) {
        let weak = Arc::downgrade(spec);
        self.metrics_fn = ModelFn::bind(spec.model_backing(
            ModelMethod::Metrics,
            move |permit: PermitModel,
                  from: Option<DateTime<Utc>>,
                  to: Option<DateTime<Utc>>,
                  estimate_bounds: bool| {
                fetch_metrics(&weak, permit.id(), from, to, estimate_bounds)
            },
        ));
    }
}

fn fetch_metrics(
    spec: &Weak<ServiceSpec>,
    permit_id: u64,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    estimate_bounds: bool,
) -> Result<PermitMetricsModel> {
    let spec = live_spec(spec, "permits")?;
    let mut url = spec
        .core()
        .endpoint(&format!("{}/{permit_id}/metrics.json", spec.name()))?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(from) = from {
            pairs.append_pair("fromDate", &from.format(METRICS_DATE_FORMAT).to_string());
        }
        if let Some(to) = to {
            pairs.append_pair("toDate", &to.format(METRICS_DATE_FORMAT).to_string());
        }
        pairs.append_pair("estimateBounds", &estimate_bounds.to_string());
    }
    spec.core().fetch(HttpMethod::Get, &url, None, 200)
}
