use std::sync::Arc;

use brokerly_core::{Actor, Role};
use brokerly_domain::{
    ApprovalDecision, ApprovalError, AuditAction, NewPropertyInput, Property, PropertyId,
};
use chrono::{Duration, Utc};

use super::ApprovalQueryService;
use crate::ApprovalService;
use crate::approval_ports::{PendingApprovalQuery, PendingView};
use crate::test_support::FakeApprovalStore;

fn actor(role: Role) -> Actor {
    Actor::new(format!("{}-1", role.as_str()), role).unwrap_or_else(|_| unreachable!())
}

fn property(listing_type: &str, age_days: i64) -> Property {
    Property::register(
        NewPropertyInput {
            title: format!("{listing_type} listing"),
            listing_type: listing_type.to_owned(),
            buy_price: None,
            owner_first_name: None,
            owner_last_name: None,
            owner_contact: None,
            brokerage_commission_percent: None,
        },
        "agent-1",
        Utc::now() - Duration::days(age_days),
    )
    .unwrap_or_else(|_| unreachable!())
}

async fn store_with(properties: Vec<Property>) -> Arc<FakeApprovalStore> {
    let store = Arc::new(FakeApprovalStore::default());
    for property in properties {
        store.seed_property(property).await;
    }
    store
}

#[tokio::test]
async fn steps_view_is_filtered_by_role_and_admin_sees_all() {
    let agency = property("agency_owned", 0);
    let branch = property("branch_owned", 0);
    let (agency_id, branch_id) = (agency.id, branch.id);
    let store = store_with(vec![agency, branch]).await;
    let approvals = ApprovalService::new(store.clone());
    let queries = ApprovalQueryService::new(store);

    assert!(approvals.start(&actor(Role::Manager), agency_id).await.is_ok());
    assert!(approvals.start(&actor(Role::Manager), branch_id).await.is_ok());
    assert!(
        approvals
            .decide(
                &actor(Role::Manager),
                agency_id,
                ApprovalDecision::Approve,
                None,
            )
            .await
            .is_ok()
    );

    let vp_queue = queries
        .pending_for_role(&actor(Role::Vp), PendingApprovalQuery::default())
        .await;
    assert!(matches!(
        vp_queue,
        Ok(ref page) if page.items.len() == 1
            && page.items[0].property.id == agency_id
            && page.items[0].step.as_ref().map(|step| step.step_name.as_str()) == Some("budget")
    ));

    let manager_queue = queries
        .pending_for_role(&actor(Role::Manager), PendingApprovalQuery::default())
        .await;
    assert!(matches!(
        manager_queue,
        Ok(ref page) if page.items.len() == 1 && page.items[0].property.id == branch_id
    ));

    let admin_queue = queries
        .pending_for_role(&actor(Role::Admin), PendingApprovalQuery::default())
        .await;
    assert!(matches!(
        admin_queue,
        Ok(ref page) if page.pagination.total == 2
    ));
}

#[tokio::test]
async fn properties_view_paginates_with_days_pending() {
    let store = store_with(vec![
        property("branch_owned", 5),
        property("brokerage", 2),
        property("agency_owned", 0),
    ])
    .await;
    let queries = ApprovalQueryService::new(store).with_max_page_size(2);

    let page = queries
        .pending_for_role(
            &actor(Role::Director),
            PendingApprovalQuery {
                page: Some(1),
                limit: Some(50),
                view: PendingView::Properties,
            },
        )
        .await;
    assert!(page.is_ok());
    let page = page.unwrap_or_else(|_| unreachable!());

    assert_eq!(page.pagination.limit, 2);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    let days = page
        .items
        .iter()
        .map(|item| item.days_pending)
        .collect::<Vec<_>>();
    assert_eq!(days, vec![5, 2]);
    assert!(page.items.iter().all(|item| item.step.is_none()));
}

#[tokio::test]
async fn agents_cannot_read_review_queue() {
    let queries = ApprovalQueryService::new(store_with(Vec::new()).await);

    let result = queries
        .pending_for_role(&actor(Role::Agent), PendingApprovalQuery::default())
        .await;

    assert!(matches!(
        result,
        Err(ApprovalError::InsufficientPermissions(_))
    ));
}

#[tokio::test]
async fn history_is_newest_first_and_workflow_only() {
    let listing = property("brokerage", 1);
    let property_id = listing.id;
    let store = store_with(vec![listing]).await;
    let approvals = ApprovalService::new(store.clone());
    let queries = ApprovalQueryService::new(store);

    assert!(approvals.start(&actor(Role::Agent), property_id).await.is_ok());
    assert!(
        approvals
            .decide(
                &actor(Role::Manager),
                property_id,
                ApprovalDecision::Reject,
                Some("Owner details incomplete".to_owned()),
            )
            .await
            .is_ok()
    );

    let history = queries.history(property_id).await;
    assert!(history.is_ok());
    let history = history.unwrap_or_else(|_| unreachable!());

    let actions = history
        .history
        .iter()
        .map(|entry| entry.action)
        .collect::<Vec<_>>();
    assert_eq!(actions.first(), Some(&AuditAction::ApprovalRejected));
    assert_eq!(actions.len(), 3);
    assert!(actions.contains(&AuditAction::BudgetStepSkipped));
    assert!(
        history
            .history
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
}

#[tokio::test]
async fn history_and_status_report_unknown_property() {
    let queries = ApprovalQueryService::new(store_with(Vec::new()).await);

    assert!(matches!(
        queries.history(PropertyId::new()).await,
        Err(ApprovalError::PropertyNotFound(_))
    ));
    assert!(matches!(
        queries.status(PropertyId::new()).await,
        Err(ApprovalError::PropertyNotFound(_))
    ));
}

#[tokio::test]
async fn status_derives_current_step() {
    let listing = property("agency_owned", 0);
    let property_id = listing.id;
    let store = store_with(vec![listing]).await;
    let approvals = ApprovalService::new(store.clone());
    let queries = ApprovalQueryService::new(store);

    let before = queries.status(property_id).await;
    assert!(matches!(before, Ok(ref view) if view.run.is_none() && view.current_step().is_none()));

    assert!(approvals.start(&actor(Role::Manager), property_id).await.is_ok());
    let after = queries.status(property_id).await;
    assert!(matches!(
        after,
        Ok(ref view) if view.current_step().map(|step| step.required_role) == Some(Role::Manager)
    ));
}
