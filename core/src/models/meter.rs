use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Model, ModelBase};
use crate::models::WellModel;

/// A flow meter installed on one or more wells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeterModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub name: String,
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub start_reading: i64,
    pub unit: String,
    pub active: bool,
    pub date_in_service: Option<DateTime<Utc>>,
    // The API spells it this way.
    #[serde(rename = "decomissionDate", skip_serializing_if = "Option::is_none")]
    pub decommission_date: Option<DateTime<Utc>>,
    pub wells: Vec<WellModel>,
}

impl MeterModel {
    pub fn with_id(id: u64) -> Self {
        Self {
            base: ModelBase::with_id(id),
            ..Self::default()
        }
    }
}

impl Model for MeterModel {
    const NAME: &'static str = "MeterModel";

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }
}
