use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for listing registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-property-request.ts"
)]
pub struct RegisterPropertyRequest {
    pub title: String,
    pub listing_type: String,
    #[ts(type = "string | null")]
    pub buy_price: Option<Decimal>,
    pub owner_first_name: Option<String>,
    pub owner_last_name: Option<String>,
    pub owner_contact: Option<String>,
    #[ts(type = "string | null")]
    pub brokerage_commission_percent: Option<Decimal>,
}

/// API representation of a listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/property-response.ts"
)]
pub struct PropertyResponse {
    pub id: String,
    pub title: String,
    pub status: String,
    pub listing_type: String,
    pub buy_price: Option<String>,
    pub owner_first_name: Option<String>,
    pub owner_last_name: Option<String>,
    pub owner_contact: Option<String>,
    pub brokerage_commission_percent: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}
