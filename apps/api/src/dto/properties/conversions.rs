use brokerly_domain::{NewPropertyInput, Property};

use super::types::{PropertyResponse, RegisterPropertyRequest};

impl From<RegisterPropertyRequest> for NewPropertyInput {
    fn from(value: RegisterPropertyRequest) -> Self {
        Self {
            title: value.title,
            listing_type: value.listing_type,
            buy_price: value.buy_price,
            owner_first_name: value.owner_first_name,
            owner_last_name: value.owner_last_name,
            owner_contact: value.owner_contact,
            brokerage_commission_percent: value.brokerage_commission_percent,
        }
    }
}

impl From<Property> for PropertyResponse {
    fn from(value: Property) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            status: value.status.as_str().to_owned(),
            listing_type: value.listing_type,
            buy_price: value.buy_price.map(|price| price.to_string()),
            owner_first_name: value.owner_first_name,
            owner_last_name: value.owner_last_name,
            owner_contact: value.owner_contact,
            brokerage_commission_percent: value
                .brokerage_commission_percent
                .map(|percent| percent.to_string()),
            created_by: value.created_by,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}
