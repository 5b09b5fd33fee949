//! Seeded in-memory records served by the mock API.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Update id of the history entry every fresh store starts with.
pub const SEEDED_UPDATE_ID: Uuid = Uuid::from_u128(0x6f1c_2a0e_4b7d_4e0f_9a51_3c8d_2e6b_7f10);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Well {
    pub id: u64,
    pub serial: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driller {
    pub id: u64,
    pub license_number: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub id: u64,
    pub well_id: u64,
    pub company_id: u64,
    pub aggregate: bool,
    #[serde(default)]
    pub history_update_id: Option<Uuid>,
    #[serde(default)]
    pub issued_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    /// Permitted annual volume; production above it is flagged.
    pub allowed_volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meter {
    pub id: u64,
    pub well_id: u64,
    pub name: String,
    pub unit: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: u64,
    pub meter_id: u64,
    pub reading: f64,
    pub reading_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub id: u64,
    pub update_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub operation: String,
    pub patch: String,
    pub snapshot: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub meter_id: u64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<DateTime<Utc>>,
    pub estimated: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitMetrics {
    pub permits_count: i64,
    pub wells_count: i64,
    pub meters_count: i64,
    pub over_permitted_production: bool,
    pub total_volume_produced: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<DateTime<Utc>>,
    pub estimated: bool,
}

/// Inclusive date window; either end may be open.
#[derive(Clone, Copy, Debug, Default)]
pub struct Window {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Window {
    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub wells: BTreeMap<u64, Well>,
    pub drillers: BTreeMap<u64, Driller>,
    pub permits: BTreeMap<u64, Permit>,
    pub meters: BTreeMap<u64, Meter>,
    pub readings: BTreeMap<u64, Reading>,
    pub history: Vec<History>,
}

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

impl Store {
    /// A store holding three wells, one driller, two permits, two meters on
    /// well 1, a handful of readings, and one history entry.
    pub fn seeded() -> Self {
        let mut store = Store::default();

        for (id, serial) in [(1, "W-0001"), (2, "W-0002"), (3, "N-0003")] {
            store.wells.insert(
                id,
                Well {
                    id,
                    serial: serial.to_string(),
                    created_at: day(2023, 1, id as u32),
                    updated_at: None,
                },
            );
        }

        store.drillers.insert(
            7,
            Driller {
                id: 7,
                license_number: "TX-5581".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Byron".to_string(),
                company_name: "Byron Drilling".to_string(),
            },
        );

        for (id, well_id, allowed) in [(11, 1, 1000.0), (12, 2, 50.0)] {
            store.permits.insert(
                id,
                Permit {
                    id,
                    well_id,
                    company_id: 1,
                    aggregate: false,
                    history_update_id: None,
                    issued_date: Some(day(2023, 1, 1)),
                    expiration_date: Some(day(2033, 1, 1)),
                    allowed_volume: allowed,
                    updated_at: None,
                },
            );
        }

        for (id, name) in [(4, "North"), (5, "South")] {
            store.meters.insert(
                id,
                Meter {
                    id,
                    well_id: 1,
                    name: name.to_string(),
                    unit: "gallons".to_string(),
                    active: true,
                },
            );
        }

        let readings = [
            (9, 4, 100.0, day(2024, 1, 15)),
            (10, 4, 350.0, day(2024, 6, 15)),
            (13, 4, 400.0, day(2024, 11, 15)),
            (14, 5, 20.0, day(2024, 2, 1)),
            (15, 5, 45.0, day(2024, 8, 1)),
        ];
        for (id, meter_id, reading, reading_date) in readings {
            store.readings.insert(
                id,
                Reading {
                    id,
                    meter_id,
                    reading,
                    reading_date,
                },
            );
        }

        store.history.push(History {
            id: 1,
            update_id: SEEDED_UPDATE_ID,
            kind: "WellModel".to_string(),
            operation: "create".to_string(),
            patch: "[]".to_string(),
            snapshot: r#"{"id":1,"serial":"W-0001"}"#.to_string(),
        });

        store
    }

    pub fn meters_of(&self, well_id: u64) -> impl Iterator<Item = &Meter> {
        self.meters.values().filter(move |m| m.well_id == well_id)
    }

    /// Volume a meter recorded inside `window`: last reading minus first.
    pub fn production(&self, meter_id: u64, window: Window, estimated: bool) -> Production {
        let mut readings: Vec<&Reading> = self
            .readings
            .values()
            .filter(|r| r.meter_id == meter_id && window.contains(r.reading_date))
            .collect();
        readings.sort_by_key(|r| r.reading_date);

        let volume = match (readings.first(), readings.last()) {
            (Some(first), Some(last)) => last.reading - first.reading,
            _ => 0.0,
        };
        Production {
            meter_id,
            volume,
            from_date: window.from,
            to_date: window.to,
            estimated,
        }
    }

    pub fn metrics(&self, permit: &Permit, window: Window, estimated: bool) -> PermitMetrics {
        let meters: Vec<&Meter> = self.meters_of(permit.well_id).collect();
        let total: f64 = meters
            .iter()
            .map(|m| self.production(m.id, window, estimated).volume)
            .sum();
        PermitMetrics {
            permits_count: 1,
            wells_count: 1,
            meters_count: meters.len() as i64,
            over_permitted_production: total > permit.allowed_volume,
            total_volume_produced: total,
            from_date: window.from,
            to_date: window.to,
            estimated,
        }
    }

    pub fn record_history(
        &mut self,
        update_id: Uuid,
        kind: &str,
        operation: &str,
        patch: &str,
        snapshot: String,
    ) {
        let id = self.history.len() as u64 + 1;
        self.history.push(History {
            id,
            update_id,
            kind: kind.to_string(),
            operation: operation.to_string(),
            patch: patch.to_string(),
            snapshot,
        });
    }
}

/// Apply `add`/`replace`/`remove` operations on top-level members of a JSON
/// object. Other operations and nested paths are rejected.
pub fn apply_patch(target: &mut Value, patch: &str) -> Result<(), String> {
    #[derive(Deserialize)]
    struct Op {
        op: String,
        path: String,
        #[serde(default)]
        value: Value,
    }

    let ops: Vec<Op> = serde_json::from_str(patch).map_err(|e| format!("malformed patch: {e}"))?;
    let object = target
        .as_object_mut()
        .ok_or_else(|| "patch target is not an object".to_string())?;

    for op in ops {
        let key = op
            .path
            .strip_prefix('/')
            .filter(|k| !k.is_empty() && !k.contains('/'))
            .ok_or_else(|| format!("unsupported patch path '{}'", op.path))?;
        if key == "id" || key == "wellId" {
            return Err(format!("'{key}' cannot be patched"));
        }
        match op.op.as_str() {
            "add" | "replace" => {
                object.insert(key.to_string(), op.value);
            }
            "remove" => {
                object.remove(key);
            }
            other => return Err(format!("unsupported patch op '{other}'")),
        }
    }
    Ok(())
}

pub fn parse_day(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
