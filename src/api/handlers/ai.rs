use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::ToolCallRequest;
use crate::domain::services::booking_service::CreateBooking;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// Tool dispatch for the AI concierge. Failures come back as structured
/// `{ok: false, error}` objects with HTTP 200 so the concierge can relay
/// them conversationally instead of choking on a transport error.
pub async fn execute_tool(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Json(payload): Json<ToolCallRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("AI tool call: {}", payload.tool);

    match dispatch(&state, &payload.tool, payload.arguments).await {
        Ok(result) => Ok(Json(json!({ "ok": true, "result": result }))),
        Err(err) => Ok(Json(json!({ "ok": false, "error": err.to_body() }))),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, AppError> {
    serde_json::from_value(args).map_err(|e| AppError::Validation(format!("Invalid arguments: {e}")))
}

async fn dispatch(state: &Arc<AppState>, tool: &str, args: Value) -> Result<Value, AppError> {
    match tool {
        "check_availability" => {
            #[derive(Deserialize)]
            struct Args {
                service_type_id: String,
                start: NaiveDate,
                end: NaiveDate,
            }
            let args: Args = parse_args(args)?;
            let days = state.booking_service
                .check_availability(&args.service_type_id, args.start, args.end)
                .await?;
            serde_json::to_value(days).map_err(|_| AppError::Internal)
        }
        "create_booking" => {
            #[derive(Deserialize)]
            struct Args {
                customer_id: String,
                service_type_id: String,
                animal_ids: Vec<String>,
                start_date: NaiveDate,
                end_date: Option<NaiveDate>,
                start_time: Option<String>,
                notes: Option<String>,
            }
            let args: Args = parse_args(args)?;
            let start_time = args.start_time.as_deref()
                .map(|t| NaiveTime::parse_from_str(t, "%H:%M")
                    .map_err(|_| AppError::Validation("Invalid start time (HH:MM)".into())))
                .transpose()?;

            let (booking, animal_ids) = state.booking_service.create_booking(CreateBooking {
                customer_id: args.customer_id,
                service_type_id: args.service_type_id,
                animal_ids: args.animal_ids,
                start_date: args.start_date,
                end_date: args.end_date.unwrap_or(args.start_date),
                start_time,
                notes: args.notes,
            }).await?;

            let mut result = serde_json::to_value(&booking).map_err(|_| AppError::Internal)?;
            result["animal_ids"] = json!(animal_ids);
            Ok(result)
        }
        "cancel_booking" => {
            #[derive(Deserialize)]
            struct Args {
                booking_id: String,
                customer_id: String,
                reason: Option<String>,
            }
            let args: Args = parse_args(args)?;
            let booking = state.booking_service
                .cancel(&args.booking_id, &args.customer_id, args.reason)
                .await?;
            serde_json::to_value(booking).map_err(|_| AppError::Internal)
        }
        "get_service_types_and_pricing" => {
            let services = state.service_type_repo.list(false).await?;
            let mut out = Vec::with_capacity(services.len());
            for service in services {
                let rules = state.pricing_rule_repo.list_active_by_service(&service.id).await?;
                out.push(json!({ "service": service, "pricing_rules": rules }));
            }
            Ok(Value::Array(out))
        }
        other => Err(AppError::Validation(format!("Unknown tool: {other}"))),
    }
}
