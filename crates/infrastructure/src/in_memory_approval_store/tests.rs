use std::sync::Arc;

use brokerly_application::{
    ApprovalQueryService, ApprovalService, ApprovalStore, DirectApprovalOptions,
    PendingApprovalQuery, PropertyService,
};
use brokerly_core::{Actor, Role};
use brokerly_domain::{
    ApprovalDecision, ApprovalError, ApprovalRunStatus, AuditAction, NewPropertyInput, Property,
    PropertyStatus,
};
use rust_decimal::Decimal;

use super::InMemoryApprovalStore;

fn actor(role: Role) -> Actor {
    Actor::new(format!("{}-7", role.as_str()), role).unwrap_or_else(|_| unreachable!())
}

fn input(listing_type: &str) -> NewPropertyInput {
    NewPropertyInput {
        title: "Garden flat near the park".to_owned(),
        listing_type: listing_type.to_owned(),
        buy_price: None,
        owner_first_name: None,
        owner_last_name: None,
        owner_contact: None,
        brokerage_commission_percent: None,
    }
}

struct Harness {
    store: Arc<InMemoryApprovalStore>,
    properties: PropertyService,
    approvals: ApprovalService,
    queries: ApprovalQueryService,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryApprovalStore::new());
        Self {
            properties: PropertyService::new(store.clone()),
            approvals: ApprovalService::new(store.clone()),
            queries: ApprovalQueryService::new(store.clone()),
            store,
        }
    }

    async fn register(&self, input: NewPropertyInput) -> Property {
        self.properties
            .register_property(&actor(Role::Agent), input)
            .await
            .unwrap_or_else(|_| unreachable!())
    }
}

#[tokio::test]
async fn agency_owned_start_persists_four_pending_steps() {
    let harness = Harness::new();
    let property = harness.register(input("agency_owned")).await;

    let started = harness
        .approvals
        .start(&actor(Role::Manager), property.id)
        .await;
    assert!(started.is_ok());

    let run = harness.store.find_latest_run(property.id).await;
    assert!(matches!(
        run,
        Ok(Some(ref value)) if value.steps.len() == 4
            && value.status == ApprovalRunStatus::InProgress
            && value.current_step().map(|step| step.required_role) == Some(Role::Manager)
    ));
    assert!(matches!(
        harness.store.find_property(property.id).await,
        Ok(Some(ref stored)) if stored.status == PropertyStatus::Pending
    ));
}

#[tokio::test]
async fn manager_approval_hands_over_to_vp() {
    let harness = Harness::new();
    let property = harness.register(input("agency_owned")).await;
    assert!(
        harness
            .approvals
            .start(&actor(Role::Manager), property.id)
            .await
            .is_ok()
    );

    let decided = harness
        .approvals
        .decide(
            &actor(Role::Manager),
            property.id,
            ApprovalDecision::Approve,
            None,
        )
        .await;
    assert!(decided.is_ok());

    let status = harness.queries.status(property.id).await;
    assert!(matches!(
        status,
        Ok(ref view) if view.current_step().map(|step| step.required_role) == Some(Role::Vp)
    ));
}

#[tokio::test]
async fn director_is_refused_on_manager_step() {
    let harness = Harness::new();
    let property = harness.register(input("branch_owned")).await;
    assert!(
        harness
            .approvals
            .start(&actor(Role::Agent), property.id)
            .await
            .is_ok()
    );

    let result = harness
        .approvals
        .decide(
            &actor(Role::Director),
            property.id,
            ApprovalDecision::Approve,
            None,
        )
        .await;

    assert!(matches!(
        result,
        Err(ref error) if error.to_string() == "This step requires manager role"
    ));
}

#[tokio::test]
async fn director_rejection_ends_the_run() {
    let harness = Harness::new();
    let property = harness.register(input("brokerage")).await;
    assert!(
        harness
            .approvals
            .start(&actor(Role::Manager), property.id)
            .await
            .is_ok()
    );
    assert!(
        harness
            .approvals
            .decide(
                &actor(Role::Manager),
                property.id,
                ApprovalDecision::Approve,
                None,
            )
            .await
            .is_ok()
    );

    let rejected = harness
        .approvals
        .decide(
            &actor(Role::Director),
            property.id,
            ApprovalDecision::Reject,
            Some("Commission terms unsigned".to_owned()),
        )
        .await;
    assert!(matches!(
        rejected,
        Ok(ref output) if output.run_status == ApprovalRunStatus::Rejected
    ));

    let later = harness
        .approvals
        .decide(
            &actor(Role::Manager),
            property.id,
            ApprovalDecision::Approve,
            None,
        )
        .await;
    assert!(matches!(later, Err(ApprovalError::RunNotActive { .. })));

    let history = harness.queries.history(property.id).await;
    assert!(matches!(
        history,
        Ok(ref value) if value.history.first().map(|entry| entry.action)
            == Some(AuditAction::ApprovalRejected)
    ));
}

#[tokio::test]
async fn brokerage_without_contact_starts_but_fails_direct_approval() {
    let harness = Harness::new();
    let mut listing = input("brokerage");
    listing.owner_first_name = Some("Alan".to_owned());
    listing.owner_last_name = Some("Turing".to_owned());
    listing.brokerage_commission_percent = Some(Decimal::new(45, 1));
    let property = harness.register(listing).await;

    assert!(
        harness
            .approvals
            .start(&actor(Role::Agent), property.id)
            .await
            .is_ok()
    );
    let result = harness
        .approvals
        .approve_property(
            &actor(Role::Director),
            property.id,
            DirectApprovalOptions::default(),
        )
        .await;

    assert!(matches!(result, Err(ApprovalError::ValidationFailed(_))));
}

#[tokio::test]
async fn concurrent_starts_yield_exactly_one_conflict() {
    let harness = Harness::new();
    let property = harness.register(input("agency_owned")).await;
    let manager = actor(Role::Manager);
    let admin = actor(Role::Admin);

    let (first, second) = tokio::join!(
        harness.approvals.start(&manager, property.id),
        harness.approvals.start(&admin, property.id),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|result| matches!(result, Err(ApprovalError::ApprovalExists(_))))
            .count(),
        1
    );
}

#[tokio::test]
async fn dropped_transaction_discards_staged_writes() {
    let harness = Harness::new();
    let property = harness.register(input("branch_owned")).await;

    {
        let transaction = harness.store.begin().await;
        assert!(transaction.is_ok());
        let mut transaction = transaction.unwrap_or_else(|_| unreachable!());
        let updated = transaction
            .update_property_status(
                property.id,
                PropertyStatus::Pending,
                PropertyStatus::Archived,
                chrono::Utc::now(),
            )
            .await;
        assert!(updated.is_ok());
    }

    assert!(matches!(
        harness.store.find_property(property.id).await,
        Ok(Some(ref stored)) if stored.status == PropertyStatus::Pending
    ));
}

#[tokio::test]
async fn review_queue_lists_only_the_callers_steps() {
    let harness = Harness::new();
    let agency = harness.register(input("agency_owned")).await;
    let branch = harness.register(input("branch_owned")).await;
    for property in [&agency, &branch] {
        assert!(
            harness
                .approvals
                .start(&actor(Role::Manager), property.id)
                .await
                .is_ok()
        );
    }

    let director_queue = harness
        .queries
        .pending_for_role(&actor(Role::Director), PendingApprovalQuery::default())
        .await;
    assert!(matches!(director_queue, Ok(ref page) if page.items.is_empty()));

    let manager_queue = harness
        .queries
        .pending_for_role(&actor(Role::Manager), PendingApprovalQuery::default())
        .await;
    assert!(matches!(
        manager_queue,
        Ok(ref page) if page.pagination.total == 2 && page.items.iter().all(|item| item.days_pending == 0)
    ));
}
