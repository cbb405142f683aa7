use brokerly_application::{ApprovalQueryService, ApprovalService, PropertyService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub property_service: PropertyService,
    pub approval_service: ApprovalService,
    pub approval_query_service: ApprovalQueryService,
}
