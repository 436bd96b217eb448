use std::sync::Arc;

use aqi::{Classification, Color, Pollutant, SeverityTier};
use axum::Json;
use axum::Router;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use catalog::{
    CatalogError, DEFAULT_RANK_LIMIT, Dataset, Factory, FactoryStatus, InMemoryReadingStore,
    PollutionDataPoint, Rankings, ReadingStore, SortBy, Summary,
};
use layers::charts::{BarChart, ChartDatum, PieSlice, bar_chart, pie_chart};
use layers::factories::{FactoryLayer, FactoryLayerSnapshot};
use layers::labels::{LabelAnchor, LabelsLayer};
use layers::legend::{BandFilter, Legend};
use layers::provinces::{ProvinceFeature, ProvinceLayer, ProvinceView};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, warn};

const PROVINCE_LAYER_ID: u64 = 1;
const LABELS_LAYER_ID: u64 = 2;
const FACTORY_LAYER_ID: u64 = 3;

#[derive(Clone)]
pub struct ApiState {
    pub readings: Arc<RwLock<InMemoryReadingStore>>,
    pub factories: Arc<Vec<Factory>>,
}

impl ApiState {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, CatalogError> {
        Ok(Self {
            readings: Arc::new(RwLock::new(InMemoryReadingStore::from_dataset(dataset)?)),
            factories: Arc::new(dataset.factories.clone()),
        })
    }

    /// Copy of the current readings. The lock is released before returning.
    fn points(&self) -> ApiResult<Vec<PollutionDataPoint>> {
        self.readings.read().list().map_err(catalog_error)
    }
}

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<T, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn catalog_error(err: CatalogError) -> ApiError {
    match err {
        CatalogError::NotFound(_) => api_error(StatusCode::NOT_FOUND, err.to_string()),
        CatalogError::Invalid(_) | CatalogError::Corrupt(_) => {
            warn!("rejected reading: {err}");
            api_error(StatusCode::BAD_REQUEST, err.to_string())
        }
        CatalogError::Io(_) => {
            error!("store failure: {err}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn parse_pollutant(raw: Option<&str>) -> ApiResult<Pollutant> {
    match raw {
        None => Ok(Pollutant::Pm25),
        Some(raw) => raw.parse().map_err(|e: aqi::UnknownPollutant| {
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        }),
    }
}

fn parse_filter(raw: Option<&str>) -> ApiResult<Option<BandFilter>> {
    raw.map(str::parse::<BandFilter>)
        .transpose()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/classify", get(classify))
        .route("/api/readings", get(list_readings).post(ingest_reading))
        .route("/api/readings/:key", get(get_reading).delete(delete_reading))
        .route("/api/rankings", get(rankings))
        .route("/api/summary", get(summary))
        .route("/api/legend/:pollutant", get(legend))
        .route("/api/filters", get(filters))
        .route("/api/layers/provinces", get(province_layer))
        .route("/api/charts/:pollutant", get(charts))
        .route("/api/factories", get(factories))
        .route("/api/dataset", get(dataset))
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

#[derive(Debug, Deserialize)]
struct ClassifyParams {
    pollutant: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    pollutant: String,
    value: f64,
    classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<u32>,
}

async fn classify(Query(params): Query<ClassifyParams>) -> ApiResult<Json<ClassifyResponse>> {
    let raw = params.value.as_deref().unwrap_or_default().trim();
    let value: f64 = raw.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("value must be a number, got {raw:?}"),
        )
    })?;
    let key = params.pollutant.unwrap_or_default();
    Ok(Json(ClassifyResponse {
        classification: aqi::classify_key(&key, value),
        index: Pollutant::from_key(&key).map(|p| aqi::approximate_index(p, value)),
        pollutant: key,
        value,
    }))
}

#[derive(Debug, Deserialize)]
struct ReadingsParams {
    sort: Option<String>,
    filter: Option<String>,
}

async fn list_readings(
    State(state): State<ApiState>,
    Query(params): Query<ReadingsParams>,
) -> ApiResult<Json<Vec<PollutionDataPoint>>> {
    let sort_by = match params.sort.as_deref() {
        None => SortBy::default(),
        Some(raw) => raw
            .parse()
            .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e))?,
    };
    let filter = parse_filter(params.filter.as_deref())?;

    let mut points = state.points()?;
    if let Some(filter) = filter {
        points.retain(|p| filter.matches(p));
    }
    catalog::sort_points(&mut points, sort_by);
    Ok(Json(points))
}

/// Looks up by location key first, then by id.
async fn get_reading(
    State(state): State<ApiState>,
    AxumPath(key): AxumPath<String>,
) -> ApiResult<Json<PollutionDataPoint>> {
    let found = {
        let store = state.readings.read();
        match store.find_by_key(&key).map_err(catalog_error)? {
            Some(point) => Some(point),
            None => store.get(&key).map_err(catalog_error)?,
        }
    };
    found
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("no reading for {key:?}")))
}

/// A reading without an id replaces the current reading for its location
/// key, or gets a fresh UUID when the key is new.
async fn ingest_reading(
    State(state): State<ApiState>,
    Json(mut point): Json<PollutionDataPoint>,
) -> ApiResult<(StatusCode, Json<PollutionDataPoint>)> {
    {
        let mut store = state.readings.write();
        if point.id.trim().is_empty() {
            point.id = match store.find_by_key(&point.location.key).map_err(catalog_error)? {
                Some(existing) => existing.id,
                None => uuid::Uuid::new_v4().to_string(),
            };
        }
        store.upsert(point.clone()).map_err(catalog_error)?;
    }
    info!(id = %point.id, key = %point.location.key, "reading ingested");
    Ok((StatusCode::CREATED, Json(point)))
}

async fn delete_reading(
    State(state): State<ApiState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<StatusCode> {
    let removed = state.readings.write().delete(&id).map_err(catalog_error)?;
    if !removed {
        return Err(api_error(StatusCode::NOT_FOUND, "Reading not found"));
    }
    info!(id = %id, "reading deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct RankingParams {
    pollutant: Option<String>,
    limit: Option<usize>,
}

async fn rankings(
    State(state): State<ApiState>,
    Query(params): Query<RankingParams>,
) -> ApiResult<Json<Rankings>> {
    let pollutant = parse_pollutant(params.pollutant.as_deref())?;
    let limit = params.limit.unwrap_or(DEFAULT_RANK_LIMIT);
    let points = state.points()?;
    Ok(Json(catalog::rank(&points, pollutant, limit)))
}

async fn summary(State(state): State<ApiState>) -> ApiResult<Json<Summary>> {
    let points = state.points()?;
    Ok(Json(catalog::summary(&points)))
}

async fn legend(AxumPath(raw): AxumPath<String>) -> ApiResult<Json<Legend>> {
    let pollutant = Pollutant::from_key(&raw)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown pollutant {raw:?}")))?;
    Ok(Json(Legend::for_pollutant(pollutant)))
}

#[derive(Debug, Deserialize)]
struct FiltersParams {
    pollutant: Option<String>,
}

#[derive(Debug, Serialize)]
struct FilterChip {
    key: String,
    pollutant: Pollutant,
    tier: SeverityTier,
    label: String,
    color: Color,
}

async fn filters(Query(params): Query<FiltersParams>) -> ApiResult<Json<Vec<FilterChip>>> {
    let only = params
        .pollutant
        .as_deref()
        .map(|raw| parse_pollutant(Some(raw)))
        .transpose()?;
    let chips = BandFilter::all()
        .into_iter()
        .filter(|f| only.is_none_or(|p| f.pollutant == p))
        .map(|f| FilterChip {
            key: f.to_string(),
            pollutant: f.pollutant,
            tier: f.tier,
            label: f.label(),
            color: f.color(),
        })
        .collect();
    Ok(Json(chips))
}

#[derive(Debug, Deserialize)]
struct ProvinceParams {
    pollutant: Option<String>,
    active: Option<String>,
    hovered: Option<String>,
    filter: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProvinceLayerResponse {
    pollutant: Pollutant,
    features: Vec<ProvinceFeature>,
    labels: Vec<LabelAnchor>,
}

async fn province_layer(
    State(state): State<ApiState>,
    Query(params): Query<ProvinceParams>,
) -> ApiResult<Json<ProvinceLayerResponse>> {
    let pollutant = parse_pollutant(params.pollutant.as_deref())?;
    let view = ProvinceView {
        active: params.active.as_deref(),
        hovered: params.hovered.as_deref(),
        filter: parse_filter(params.filter.as_deref())?,
    };
    let points = state.points()?;

    let features = ProvinceLayer::new(PROVINCE_LAYER_ID, pollutant)
        .extract(&points, &view)
        .features;
    let labels = LabelsLayer::new(LABELS_LAYER_ID, pollutant)
        .extract(&features, view.active)
        .labels;
    Ok(Json(ProvinceLayerResponse {
        pollutant,
        features,
        labels,
    }))
}

#[derive(Debug, Serialize)]
struct ChartsResponse {
    pollutant: Pollutant,
    bar: BarChart,
    pie: Vec<PieSlice>,
}

/// Per-location bars plus a pie of how many locations fall in each tier.
async fn charts(
    State(state): State<ApiState>,
    AxumPath(raw): AxumPath<String>,
) -> ApiResult<Json<ChartsResponse>> {
    let pollutant = Pollutant::from_key(&raw)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown pollutant {raw:?}")))?;
    let mut points = state.points()?;
    catalog::sort_points(&mut points, SortBy::Name);
    Ok(Json(ChartsResponse {
        pollutant,
        bar: bar_chart(&ChartDatum::from_points(&points, pollutant), None),
        pie: pie_chart(&ChartDatum::tier_distribution(&points, pollutant)),
    }))
}

#[derive(Debug, Deserialize)]
struct FactoriesParams {
    status: Option<FactoryStatus>,
}

async fn factories(
    State(state): State<ApiState>,
    Query(params): Query<FactoriesParams>,
) -> Json<FactoryLayerSnapshot> {
    let mut layer = FactoryLayer::new(FACTORY_LAYER_ID);
    if let Some(status) = params.status {
        layer = layer.with_status(status);
    }
    Json(layer.extract(&state.factories))
}

/// Current readings and factories, tagged with the dataset fingerprint.
async fn dataset(State(state): State<ApiState>, headers: HeaderMap) -> ApiResult<Response> {
    let dataset = Dataset {
        readings: state.points()?,
        factories: state.factories.as_ref().clone(),
    };
    let fingerprint = dataset.fingerprint().map_err(catalog_error)?;
    let etag = HeaderValue::from_str(&format!("\"{fingerprint}\"")).map_err(|e| {
        error!("etag encoding failed: {e}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "etag error")
    })?;

    if headers
        .get_all(http::header::IF_NONE_MATCH)
        .iter()
        .any(|v| if_none_match(v, &fingerprint))
    {
        return Ok((StatusCode::NOT_MODIFIED, [(http::header::ETAG, etag)]).into_response());
    }
    Ok(([(http::header::ETAG, etag)], Json(dataset)).into_response())
}

/// Weak comparison against an `If-None-Match` list: `W/` prefixes are
/// ignored and `*` matches any current representation.
fn if_none_match(header: &HeaderValue, fingerprint: &str) -> bool {
    let Ok(raw) = header.to_str() else {
        return false;
    };
    raw.split(',').map(str::trim).any(|tag| {
        tag == "*"
            || tag
                .strip_prefix("W/")
                .unwrap_or(tag)
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                == Some(fingerprint)
    })
}
