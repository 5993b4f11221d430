use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dpg_report::{report_epoch, EpochReport, MemoryReporter};
use dpg_settlement::{ConsumerUnitStats, EventRecord};
use dpg_types::{Address, Amount, EpochIndex, Role, Timestamp, UnitId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::{with_engine, AppState, Deployment};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub name: String,
    pub description: String,
    pub variant: String,
    pub unit_price: Amount,
    pub epoch_length_secs: u64,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub variant: String,
    pub current_epoch: EpochIndex,
    pub epoch_start: Timestamp,
    pub deposit_pool: Amount,
    pub contract_balance: Amount,
    pub destroyed_units: u64,
    pub destroyed_in_current_epoch: u64,
    /// Agency fund, unclaimed rewards or seized penalties depending on the variant
    pub settlement_pool: Amount,
    pub events: usize,
    pub uptime_seconds: u64,
}

#[derive(Deserialize)]
pub struct CountRequest {
    pub count: u64,
    #[serde(default)]
    pub value: Amount,
}

#[derive(Serialize)]
pub struct ValueResponse {
    pub amount: Amount,
    pub epoch: EpochIndex,
}

#[derive(Deserialize)]
pub struct GarbageReportRequest {
    pub count: Option<u64>,
    pub ids: Option<Vec<UnitId>>,
}

#[derive(Deserialize)]
pub struct PurchaseRequest {
    pub consumer: Address,
    pub count: u64,
}

#[derive(Serialize)]
pub struct PurchaseResponse {
    pub consumer: Address,
    pub purchases_in_epoch: u64,
    pub epoch: EpochIndex,
}

#[derive(Deserialize)]
pub struct BuyUnitsRequest {
    pub ids: Vec<UnitId>,
    pub to: Address,
    #[serde(default)]
    pub value: Amount,
}

#[derive(Deserialize)]
pub struct ReturnUnitsRequest {
    pub ids: Vec<UnitId>,
    pub returned_by: Address,
}

#[derive(Serialize)]
pub struct UnitsResponse {
    pub processed: usize,
    pub total_supply: usize,
}

#[derive(Serialize)]
pub struct ConsumerResponse {
    pub consumer: Address,
    pub balance: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchases_in_epoch: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ConsumerUnitStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_per_unit: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<UnitId>>,
}

#[derive(Deserialize)]
pub struct ActorRequest {
    pub address: Address,
}

#[derive(Serialize)]
pub struct ActorResponse {
    pub role: Role,
    pub address: Address,
    pub approved: bool,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub epoch: Option<EpochIndex>,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn info(State(state): State<AppState>) -> ApiResult<InfoResponse> {
    let deployment = state.deployment()?;
    let config = with_engine!(&*deployment, |engine| engine.config().clone());

    Ok(Json(InfoResponse {
        name: "dpg".to_string(),
        description: "Deposit-return settlement engine".to_string(),
        variant: deployment.name().to_string(),
        unit_price: config.unit_price,
        epoch_length_secs: config.epoch_length_secs,
    }))
}

pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusResponse> {
    let deployment = state.deployment()?;
    let settlement_pool = match &*deployment {
        Deployment::Donation(engine) => engine.agency_fund(),
        Deployment::Reward(engine) => engine.unclaimed_rewards(),
        Deployment::Penalty(engine) => engine.seized_penalties(),
    };

    let status = with_engine!(&*deployment, |engine| StatusResponse {
        variant: deployment.name().to_string(),
        current_epoch: engine.current_epoch_index(),
        epoch_start: engine.current_epoch().start_time,
        deposit_pool: engine.deposit_pool(),
        contract_balance: engine.contract_balance(),
        destroyed_units: engine.destroyed_units(),
        destroyed_in_current_epoch: engine.destroyed_in_current_epoch(),
        settlement_pool,
        events: engine.events().len(),
        uptime_seconds: state.uptime_secs(),
    });
    Ok(Json(status))
}

pub async fn deposit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<CountRequest>,
) -> ApiResult<ValueResponse> {
    let call = state.call(caller).with_value(req.value);
    let mut deployment = state.deployment()?;

    let epoch = with_engine!(&mut *deployment, |engine| {
        engine.deposit(&call, req.count)?;
        engine.current_epoch_index()
    });
    Ok(Json(ValueResponse {
        amount: req.value,
        epoch,
    }))
}

pub async fn refund(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<CountRequest>,
) -> ApiResult<ValueResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;

    let (amount, epoch) = with_engine!(&mut *deployment, |engine| {
        (engine.refund(&call, req.count)?, engine.current_epoch_index())
    });
    Ok(Json(ValueResponse { amount, epoch }))
}

/// Destroyed units by count (donation, reward) or thrown-away units by id (penalty).
/// The returned amount is what the report accrued or seized.
pub async fn report_garbage(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<GarbageReportRequest>,
) -> ApiResult<ValueResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;
    let count = || {
        req.count
            .ok_or_else(|| ApiError::BadRequest("`count` is required".to_string()))
    };

    let (amount, epoch) = match &mut *deployment {
        Deployment::Donation(engine) => {
            let accrued = engine.report_destroyed(&call, count()?)?;
            (accrued, engine.current_epoch_index())
        }
        Deployment::Reward(engine) => {
            let accrued = engine.report_destroyed(&call, count()?)?;
            (accrued, engine.current_epoch_index())
        }
        Deployment::Penalty(engine) => {
            let ids = req
                .ids
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("`ids` is required".to_string()))?;
            let seized = engine.report_thrown_away(&call, ids)?;
            (seized, engine.current_epoch_index())
        }
    };
    Ok(Json(ValueResponse { amount, epoch }))
}

pub async fn claim_donation(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<ValueResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;
    let engine = match &mut *deployment {
        Deployment::Donation(engine) => engine,
        other => return Err(other.not_offered("claim_donation")),
    };

    let amount = engine.claim_donation(&call)?;
    Ok(Json(ValueResponse {
        amount,
        epoch: engine.current_epoch_index(),
    }))
}

pub async fn report_purchase(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<PurchaseRequest>,
) -> ApiResult<PurchaseResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;
    let engine = match &mut *deployment {
        Deployment::Reward(engine) => engine,
        other => return Err(other.not_offered("report_purchase")),
    };

    engine.report_purchase(&call, req.consumer, req.count)?;
    Ok(Json(PurchaseResponse {
        consumer: req.consumer,
        purchases_in_epoch: engine.purchases_of(&req.consumer),
        epoch: engine.current_epoch_index(),
    }))
}

pub async fn claim_reward(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<ValueResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;
    let engine = match &mut *deployment {
        Deployment::Reward(engine) => engine,
        other => return Err(other.not_offered("claim_reward")),
    };

    let amount = engine.claim_reward(&call)?;
    Ok(Json(ValueResponse {
        amount,
        epoch: engine.current_epoch_index(),
    }))
}

pub async fn buy_units(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<BuyUnitsRequest>,
) -> ApiResult<UnitsResponse> {
    let call = state.call(caller).with_value(req.value);
    let mut deployment = state.deployment()?;
    let engine = match &mut *deployment {
        Deployment::Penalty(engine) => engine,
        other => return Err(other.not_offered("buy_units")),
    };

    engine.buy_units(&call, &req.ids, req.to)?;
    Ok(Json(UnitsResponse {
        processed: req.ids.len(),
        total_supply: engine.units().total_supply(),
    }))
}

pub async fn return_units(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<ReturnUnitsRequest>,
) -> ApiResult<UnitsResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;
    let engine = match &mut *deployment {
        Deployment::Penalty(engine) => engine,
        other => return Err(other.not_offered("return_units")),
    };

    let processed = engine.return_units(&call, &req.ids, req.returned_by)?;
    Ok(Json(UnitsResponse {
        processed,
        total_supply: engine.units().total_supply(),
    }))
}

pub async fn get_consumer(
    State(state): State<AppState>,
    Path(consumer): Path<Address>,
) -> ApiResult<ConsumerResponse> {
    let deployment = state.deployment()?;

    let response = match &*deployment {
        Deployment::Reward(engine) => ConsumerResponse {
            consumer,
            balance: engine.balance_of(&consumer),
            purchases_in_epoch: Some(engine.purchases_of(&consumer)),
            stats: None,
            penalty_per_unit: None,
            units: None,
        },
        Deployment::Penalty(engine) => ConsumerResponse {
            consumer,
            balance: engine.balance_of(&consumer),
            purchases_in_epoch: None,
            stats: Some(engine.consumer_stats(&consumer)),
            penalty_per_unit: Some(engine.penalty_of(&consumer)?),
            units: Some(engine.units().units_of(&consumer)),
        },
        Deployment::Donation(_) => return Err(deployment.not_offered("consumer_view")),
    };
    Ok(Json(response))
}

pub async fn withdraw_penalty(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<ValueResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;
    let engine = match &mut *deployment {
        Deployment::Penalty(engine) => engine,
        other => return Err(other.not_offered("withdraw_penalty")),
    };

    let amount = engine.withdraw_penalty(&call)?;
    Ok(Json(ValueResponse {
        amount,
        epoch: engine.current_epoch_index(),
    }))
}

pub async fn withdraw_seized_penalties(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<ValueResponse> {
    let call = state.call(caller);
    let mut deployment = state.deployment()?;
    let engine = match &mut *deployment {
        Deployment::Penalty(engine) => engine,
        other => return Err(other.not_offered("withdraw_seized_penalties")),
    };

    let amount = engine.withdraw_seized_penalties(&call)?;
    Ok(Json(ValueResponse {
        amount,
        epoch: engine.current_epoch_index(),
    }))
}

fn grantable_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>()
        .ok()
        .filter(|role| Role::grantable().contains(role))
        .ok_or_else(|| ApiError::BadRequest(format!("unknown role `{}`", raw)))
}

pub async fn add_actor(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(role): Path<String>,
    Json(req): Json<ActorRequest>,
) -> Result<(StatusCode, Json<ActorResponse>), ApiError> {
    let role = grantable_role(&role)?;
    let call = state.call(caller);
    let mut deployment = state.deployment()?;

    with_engine!(&mut *deployment, |engine| engine
        .authorizer_mut()
        .add(&call, role, req.address))?;
    Ok((
        StatusCode::CREATED,
        Json(ActorResponse {
            role,
            address: req.address,
            approved: true,
        }),
    ))
}

pub async fn remove_actor(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((role, address)): Path<(String, Address)>,
) -> ApiResult<ActorResponse> {
    let role = grantable_role(&role)?;
    let call = state.call(caller);
    let mut deployment = state.deployment()?;

    with_engine!(&mut *deployment, |engine| engine
        .authorizer_mut()
        .remove(&call, role, address))?;
    Ok(Json(ActorResponse {
        role,
        address,
        approved: false,
    }))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Vec<EventRecord>> {
    let deployment = state.deployment()?;
    let events = with_engine!(&*deployment, |engine| match query.epoch {
        Some(epoch) => engine.events_in_epoch(epoch),
        None => engine.events().to_vec(),
    });
    Ok(Json(events))
}

pub async fn get_epoch_report(
    State(state): State<AppState>,
    Path(epoch): Path<EpochIndex>,
) -> ApiResult<EpochReport> {
    let deployment = state.deployment()?;
    let reporter = MemoryReporter::new();
    let report = with_engine!(&*deployment, |engine| report_epoch(&reporter, engine, epoch))?;
    Ok(Json(report))
}
