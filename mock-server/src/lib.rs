//! In-memory stand-in for the Hydros REST API.
//!
//! Serves the read paths, permit amendment, and well update trigger over a
//! seeded `Store`. Every request must carry a bearer token; errors use the
//! API's `{ "message", "description" }` payload.

mod store;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub use store::{
    Driller, History, Meter, Permit, PermitMetrics, Production, Reading, Store, Well,
    SEEDED_UPDATE_ID,
};
use store::{apply_patch, parse_day, Window};

/// Largest page `/wells/search.json` returns.
pub const MAX_SEARCH_SIZE: usize = 150;

const METRICS_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub type Db = Arc<RwLock<Store>>;

/// Error body shared by every failing route.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub message: String,
    pub description: String,
}

impl ApiError {
    fn new(status: StatusCode, message: &str, description: impl Into<String>) -> Self {
        Self {
            status,
            message: message.to_string(),
            description: description.into(),
        }
    }

    fn not_found(description: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found", description)
    }

    fn bad_request(description: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad request", description)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/wells/search.json", get(search_wells))
        .route("/wells/wellsByIDs.json", post(wells_by_ids))
        .route("/wells/{well}", get(get_well))
        .route("/wells/{well}/triggerUpdate.json", put(trigger_update))
        .route("/wells/{well}/permits.json", get(well_permits))
        .route("/wells/{well}/permits/amend.json", patch(amend_permits))
        .route("/wells/{well}/meters.json", get(well_meters))
        .route("/wells/{well}/production.json", get(well_production))
        .route("/wells/{well}/meters/{meter}", get(get_meter))
        .route("/wells/{well}/meters/{meter}/production.json", get(meter_production))
        .route("/wells/{well}/meters/{meter}/readings/{reading}", get(get_reading))
        .route("/drillers/{driller}", get(get_driller))
        .route("/permits/{permit}/metrics.json", get(permit_metrics))
        .route("/history/{update}", get(get_history))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock hydros api listening");
    }
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    debug!(method = %request.method(), uri = %request.uri(), "request");
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        return ApiError::new(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "a bearer token is required",
        )
        .into_response();
    }
    next.run(request).await
}

/// Parse an id path segment, with or without a trailing `.json`.
fn segment<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.strip_suffix(".json")
        .unwrap_or(raw)
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid id '{raw}'")))
}

fn find<'a, T>(
    items: &'a std::collections::BTreeMap<u64, T>,
    id: u64,
    kind: &str,
) -> Result<&'a T, ApiError> {
    items
        .get(&id)
        .ok_or_else(|| ApiError::not_found(format!("{kind} {id} does not exist")))
}

async fn get_well(State(db): State<Db>, Path(well): Path<String>) -> Result<Json<Well>, ApiError> {
    let id = segment(&well)?;
    let store = db.read().await;
    find(&store.wells, id, "well").cloned().map(Json)
}

#[derive(Deserialize)]
struct IdList {
    ids: Vec<u64>,
}

async fn wells_by_ids(State(db): State<Db>, Json(input): Json<IdList>) -> Json<Vec<Well>> {
    let store = db.read().await;
    Json(
        input
            .ids
            .iter()
            .filter_map(|id| store.wells.get(id).cloned())
            .collect(),
    )
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    #[serde(default)]
    filters: String,
    #[serde(default)]
    sort: String,
    #[serde(default)]
    from: usize,
    #[serde(default)]
    size: usize,
}

#[derive(Serialize, Deserialize)]
pub struct SearchResults {
    pub total: usize,
    pub results: Vec<Well>,
}

async fn search_wells(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    if params.size > MAX_SEARCH_SIZE {
        return Err(ApiError::bad_request(format!(
            "size must not exceed {MAX_SEARCH_SIZE}"
        )));
    }
    let store = db.read().await;
    let needle = params.query.to_lowercase();
    let mut matches: Vec<Well> = store
        .wells
        .values()
        .filter(|w| w.serial.to_lowercase().contains(&needle))
        .filter(|w| {
            params
                .filters
                .split(',')
                .filter(|f| !f.is_empty())
                .all(|prefix| w.serial.starts_with(prefix))
        })
        .cloned()
        .collect();
    if params.sort.starts_with("serial:desc") {
        matches.sort_by(|a, b| b.serial.cmp(&a.serial));
    } else if params.sort.starts_with("serial") {
        matches.sort_by(|a, b| a.serial.cmp(&b.serial));
    }

    let total = matches.len();
    let size = if params.size == 0 { MAX_SEARCH_SIZE } else { params.size };
    let results = matches.into_iter().skip(params.from).take(size).collect();
    Ok(Json(SearchResults { total, results }))
}

async fn trigger_update(
    State(db): State<Db>,
    Path(well): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: u64 = segment(&well)?;
    let mut store = db.write().await;
    let entry = store
        .wells
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found(format!("well {id} does not exist")))?;
    entry.updated_at = Some(Utc::now());
    info!(well = id, "well update triggered");
    Ok(StatusCode::OK)
}

async fn well_permits(
    State(db): State<Db>,
    Path(well): Path<String>,
) -> Result<Json<Vec<Permit>>, ApiError> {
    let id: u64 = segment(&well)?;
    let store = db.read().await;
    find(&store.wells, id, "well")?;
    Ok(Json(
        store
            .permits
            .values()
            .filter(|p| p.well_id == id)
            .cloned()
            .collect(),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmendRequest {
    history_update_id: Uuid,
    patch: String,
}

async fn amend_permits(
    State(db): State<Db>,
    Path(well): Path<String>,
    Json(input): Json<AmendRequest>,
) -> Result<(StatusCode, Json<Vec<Permit>>), ApiError> {
    let well_id: u64 = segment(&well)?;
    let mut store = db.write().await;
    find(&store.wells, well_id, "well")?;

    let ids: Vec<u64> = store
        .permits
        .values()
        .filter(|p| p.well_id == well_id)
        .map(|p| p.id)
        .collect();

    // Patch every permit first so a bad patch leaves the store untouched.
    let mut amended = Vec::with_capacity(ids.len());
    for id in &ids {
        let mut value = serde_json::to_value(&store.permits[id])
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        apply_patch(&mut value, &input.patch).map_err(ApiError::bad_request)?;
        let mut permit: Permit =
            serde_json::from_value(value).map_err(|e| ApiError::bad_request(e.to_string()))?;
        permit.history_update_id = Some(input.history_update_id);
        permit.updated_at = Some(Utc::now());
        amended.push(permit);
    }

    for permit in &amended {
        store.permits.insert(permit.id, permit.clone());
        let snapshot = serde_json::to_string(permit).unwrap_or_default();
        store.record_history(
            input.history_update_id,
            "PermitModel",
            "amend",
            &input.patch,
            snapshot,
        );
    }
    info!(well = well_id, permits = amended.len(), "permits amended");
    Ok((StatusCode::ACCEPTED, Json(amended)))
}

async fn well_meters(
    State(db): State<Db>,
    Path(well): Path<String>,
) -> Result<Json<Vec<Meter>>, ApiError> {
    let id: u64 = segment(&well)?;
    let store = db.read().await;
    find(&store.wells, id, "well")?;
    Ok(Json(store.meters_of(id).cloned().collect()))
}

fn meter_of_well<'a>(store: &'a Store, well: &str, meter: &str) -> Result<&'a Meter, ApiError> {
    let well_id: u64 = segment(well)?;
    let meter_id: u64 = segment(meter)?;
    find(&store.wells, well_id, "well")?;
    store
        .meters
        .get(&meter_id)
        .filter(|m| m.well_id == well_id)
        .ok_or_else(|| ApiError::not_found(format!("meter {meter_id} is not on well {well_id}")))
}

async fn get_meter(
    State(db): State<Db>,
    Path((well, meter)): Path<(String, String)>,
) -> Result<Json<Meter>, ApiError> {
    let store = db.read().await;
    meter_of_well(&store, &well, &meter).cloned().map(Json)
}

async fn get_reading(
    State(db): State<Db>,
    Path((well, meter, reading)): Path<(String, String, String)>,
) -> Result<Json<Reading>, ApiError> {
    let store = db.read().await;
    let meter = meter_of_well(&store, &well, &meter)?;
    let id: u64 = segment(&reading)?;
    store
        .readings
        .get(&id)
        .filter(|r| r.meter_id == meter.id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("reading {id} does not exist")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductionParams {
    from_date: Option<String>,
    to_date: Option<String>,
    #[serde(default)]
    estimate_bounds: bool,
}

impl ProductionParams {
    fn window(&self) -> Result<Window, ApiError> {
        let day = |raw: &Option<String>| match raw {
            Some(raw) => parse_day(raw)
                .map(Some)
                .ok_or_else(|| ApiError::bad_request(format!("invalid date '{raw}'"))),
            None => Ok(None),
        };
        Ok(Window {
            from: day(&self.from_date)?,
            to: day(&self.to_date)?,
        })
    }
}

async fn well_production(
    State(db): State<Db>,
    Path(well): Path<String>,
    Query(params): Query<ProductionParams>,
) -> Result<Json<Vec<Production>>, ApiError> {
    let id: u64 = segment(&well)?;
    let window = params.window()?;
    let store = db.read().await;
    find(&store.wells, id, "well")?;
    Ok(Json(
        store
            .meters_of(id)
            .map(|m| store.production(m.id, window, params.estimate_bounds))
            .collect(),
    ))
}

async fn meter_production(
    State(db): State<Db>,
    Path((well, meter)): Path<(String, String)>,
    Query(params): Query<ProductionParams>,
) -> Result<Json<Production>, ApiError> {
    let window = params.window()?;
    let store = db.read().await;
    let meter = meter_of_well(&store, &well, &meter)?;
    Ok(Json(store.production(meter.id, window, params.estimate_bounds)))
}

async fn get_driller(
    State(db): State<Db>,
    Path(driller): Path<String>,
) -> Result<Json<Driller>, ApiError> {
    let id = segment(&driller)?;
    let store = db.read().await;
    find(&store.drillers, id, "driller").cloned().map(Json)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricsParams {
    from_date: Option<String>,
    to_date: Option<String>,
    #[serde(default)]
    estimate_bounds: bool,
}

fn metrics_date(raw: &Option<String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw {
        Some(raw) => DateTime::parse_from_str(raw, METRICS_DATE_FORMAT)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|_| ApiError::bad_request(format!("invalid date '{raw}'"))),
        None => Ok(None),
    }
}

async fn permit_metrics(
    State(db): State<Db>,
    Path(permit): Path<String>,
    Query(params): Query<MetricsParams>,
) -> Result<Json<PermitMetrics>, ApiError> {
    let id: u64 = segment(&permit)?;
    let window = Window {
        from: metrics_date(&params.from_date)?,
        to: metrics_date(&params.to_date)?,
    };
    let store = db.read().await;
    let permit = find(&store.permits, id, "permit")?;
    Ok(Json(store.metrics(permit, window, params.estimate_bounds)))
}

async fn get_history(
    State(db): State<Db>,
    Path(update): Path<String>,
) -> Result<Json<History>, ApiError> {
    let update_id: Uuid = segment(&update)?;
    let store = db.read().await;
    store
        .history
        .iter()
        .find(|h| h.update_id == update_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no history for update {update_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_strips_the_json_suffix() {
        assert_eq!(segment::<u64>("12.json").unwrap(), 12);
        assert_eq!(segment::<u64>("12").unwrap(), 12);
        assert_eq!(
            segment::<Uuid>(&format!("{SEEDED_UPDATE_ID}.json")).unwrap(),
            SEEDED_UPDATE_ID
        );
    }

    #[test]
    fn segment_rejects_garbage() {
        let err = segment::<u64>("twelve.json").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.description, "invalid id 'twelve.json'");
    }

    #[test]
    fn api_error_serializes_message_and_description() {
        let json = serde_json::to_value(ApiError::not_found("well 9 does not exist")).unwrap();
        assert_eq!(json["message"], "not found");
        assert_eq!(json["description"], "well 9 does not exist");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn production_params_reject_bad_dates() {
        let params = ProductionParams {
            from_date: Some("yesterday".to_string()),
            to_date: None,
            estimate_bounds: false,
        };
        assert!(params.window().is_err());
    }

    #[test]
    fn metrics_dates_use_the_offset_format() {
        let parsed = metrics_date(&Some("2024-01-01T00:00:00+0000".to_string())).unwrap();
        assert_eq!(parsed, Some(DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap()));
    }
}
