use std::sync::Arc;

use brokerly_application::{
    ApprovalQueryService, ApprovalService, ApprovalStore, PropertyService,
};

use crate::state::AppState;

pub fn build_app_state(store: Arc<dyn ApprovalStore>, pending_page_size_max: u32) -> AppState {
    AppState {
        property_service: PropertyService::new(store.clone()),
        approval_service: ApprovalService::new(store.clone()),
        approval_query_service: ApprovalQueryService::new(store)
            .with_max_page_size(pending_page_size_max),
    }
}
