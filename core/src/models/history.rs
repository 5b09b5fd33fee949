use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Model, ModelBase};

/// One recorded change to a tracked resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub update_id: Uuid,
    pub company_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub operation: String,
    pub patch: String,
    pub snapshot: String,
}

impl HistoryModel {
    pub fn with_update_id(update_id: Uuid) -> Self {
        Self {
            update_id,
            ..Self::default()
        }
    }
}

impl Model for HistoryModel {
    const NAME: &'static str = "HistoryModel";

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }
}
