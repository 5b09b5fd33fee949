use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Model, ModelBase};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeterReadingModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub meter_id: u64,
    pub reading: f64,
    pub reading_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub extra_data: Option<serde_json::Value>,
}

/// Volume produced through a meter over a date window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductionModel {
    pub meter_id: u64,
    pub volume: f64,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub estimated: bool,
}

impl MeterReadingModel {
    pub fn with_id(id: u64) -> Self {
        Self {
            base: ModelBase::with_id(id),
            ..Self::default()
        }
    }
}

impl Model for MeterReadingModel {
    const NAME: &'static str = "MeterReadingModel";

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }
}
