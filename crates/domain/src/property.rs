use std::fmt::{Display, Formatter};

use brokerly_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ApprovalError;

/// Property identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(Uuid);

impl PropertyId {
    /// Creates a random property identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a property identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid property id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PropertyId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Listing lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    /// Awaiting approval.
    Pending,
    /// Publicly listed.
    Active,
    /// Rejected during review.
    Rejected,
    /// Withdrawn from the market.
    Archived,
    /// Sold.
    Sold,
}

impl PropertyStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
            Self::Sold => "sold",
        }
    }

    /// Parses storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            "archived" => Ok(Self::Archived),
            "sold" => Ok(Self::Sold),
            _ => Err(AppError::Validation(format!(
                "unknown property status '{value}'"
            ))),
        }
    }
}

impl Display for PropertyStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Who owns or sells the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    /// Owned by the agency itself.
    AgencyOwned,
    /// Owned by a branch office.
    BranchOwned,
    /// Third-party owner selling through the brokerage.
    Brokerage,
}

impl ListingType {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgencyOwned => "agency_owned",
            Self::BranchOwned => "branch_owned",
            Self::Brokerage => "brokerage",
        }
    }

    /// Parses storage value.
    pub fn parse(value: &str) -> Result<Self, ApprovalError> {
        match value {
            "agency_owned" => Ok(Self::AgencyOwned),
            "branch_owned" => Ok(Self::BranchOwned),
            "brokerage" => Ok(Self::Brokerage),
            _ => Err(ApprovalError::InvalidListingType(value.to_owned())),
        }
    }
}

impl Display for ListingType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Property record as held by the property store.
///
/// `listing_type` keeps the stored text so corrupted rows surface as
/// [`ApprovalError::InvalidListingType`] at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property identifier.
    pub id: PropertyId,
    /// Listing headline.
    pub title: String,
    /// Lifecycle status.
    pub status: PropertyStatus,
    /// Stored listing type value.
    pub listing_type: String,
    /// Purchase price for agency and branch owned listings.
    pub buy_price: Option<Decimal>,
    /// Owner first name for brokerage listings.
    pub owner_first_name: Option<String>,
    /// Owner last name for brokerage listings.
    pub owner_last_name: Option<String>,
    /// Owner phone or email for brokerage listings.
    pub owner_contact: Option<String>,
    /// Commission percent agreed with a brokerage owner.
    pub brokerage_commission_percent: Option<Decimal>,
    /// Actor that registered the listing.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Returns the parsed listing type.
    pub fn listing_type(&self) -> Result<ListingType, ApprovalError> {
        ListingType::parse(self.listing_type.as_str())
    }

    /// Returns a JSON snapshot used for audit before/after payloads.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "title": self.title,
            "status": self.status.as_str(),
            "listing_type": self.listing_type,
            "buy_price": self.buy_price,
            "owner_first_name": self.owner_first_name,
            "owner_last_name": self.owner_last_name,
            "owner_contact": self.owner_contact,
            "brokerage_commission_percent": self.brokerage_commission_percent,
            "updated_at": self.updated_at,
        })
    }
}

/// Input used to register a new pending property.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPropertyInput {
    /// Listing headline.
    pub title: String,
    /// Listing type transport value.
    pub listing_type: String,
    /// Purchase price.
    pub buy_price: Option<Decimal>,
    /// Owner first name.
    pub owner_first_name: Option<String>,
    /// Owner last name.
    pub owner_last_name: Option<String>,
    /// Owner contact.
    pub owner_contact: Option<String>,
    /// Brokerage commission percent.
    pub brokerage_commission_percent: Option<Decimal>,
}

impl Property {
    /// Builds a validated pending property from registration input.
    pub fn register(
        input: NewPropertyInput,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ApprovalError> {
        let title = NonEmptyString::new(input.title.trim())
            .map_err(|_| ApprovalError::ValidationFailed("title must not be empty".to_owned()))?;
        let listing_type = ListingType::parse(input.listing_type.trim())?;

        if input.buy_price.is_some_and(|price| price.is_sign_negative()) {
            return Err(ApprovalError::ValidationFailed(
                "buy_price must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            id: PropertyId::new(),
            title: title.into(),
            status: PropertyStatus::Pending,
            listing_type: listing_type.as_str().to_owned(),
            buy_price: input.buy_price,
            owner_first_name: trimmed(input.owner_first_name),
            owner_last_name: trimmed(input.owner_last_name),
            owner_contact: trimmed(input.owner_contact),
            brokerage_commission_percent: input.brokerage_commission_percent,
            created_by: created_by.to_owned(),
            created_at: now,
            updated_at: now,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim().to_owned();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}

/// Outcome of the listing-type specific completeness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidation {
    /// All required fields are present.
    Valid,
    /// A required field is missing.
    Invalid {
        /// Human-readable explanation.
        message: String,
    },
}

impl ListingValidation {
    /// Returns whether validation passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Converts an invalid outcome into [`ApprovalError::ValidationFailed`].
    pub fn into_result(self) -> Result<(), ApprovalError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid { message } => Err(ApprovalError::ValidationFailed(message)),
        }
    }
}

/// Checks the fields each listing type needs before it can go live.
#[must_use]
pub fn validate_listing_type_requirements(property: &Property) -> ListingValidation {
    match property.listing_type() {
        Ok(ListingType::AgencyOwned | ListingType::BranchOwned) => {
            if property.buy_price.is_some_and(|price| price > Decimal::ZERO) {
                ListingValidation::Valid
            } else {
                ListingValidation::Invalid {
                    message: "Buy price is required for agency-owned and branch-owned listings"
                        .to_owned(),
                }
            }
        }
        Ok(ListingType::Brokerage) => {
            let has_owner_data = [
                &property.owner_first_name,
                &property.owner_last_name,
                &property.owner_contact,
            ]
            .iter()
            .all(|value| value.as_deref().is_some_and(|value| !value.trim().is_empty()));
            let has_commission = property
                .brokerage_commission_percent
                .is_some_and(|percent| percent > Decimal::ZERO);

            if has_owner_data && has_commission {
                ListingValidation::Valid
            } else {
                ListingValidation::Invalid {
                    message: "Owner first name, last name, contact and brokerage commission are required for brokerage listings".to_owned(),
                }
            }
        }
        Err(_) => ListingValidation::Invalid {
            message: "Unknown property type".to_owned(),
        },
    }
}
