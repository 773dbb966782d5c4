//! End-to-end scenarios over the public session API.

use std::sync::Arc;
use std::time::Duration;

use atomic_crm::adapters::ai::{MockAIProvider, MockError};
use atomic_crm::application::{
    Collection, CrmSession, CrmStore, MutationOutcome, SubmitOutcome, ViewKey, UNKNOWN_CONTACT,
};
use atomic_crm::domain::activity::activities_for_deal;
use atomic_crm::domain::assistant::{
    AssistantContext, Tone, ANALYSIS_FAILURE_FALLBACK, EMAIL_FAILURE_FALLBACK,
};
use atomic_crm::domain::contact::{search_contacts, ContactDraft};
use atomic_crm::domain::dashboard::{stage_distribution, value_bars};
use atomic_crm::domain::deal::{group_by_stage, Deal, DealStage};
use atomic_crm::domain::foundation::{ContactId, DealId, Money, Probability};
use chrono::NaiveDate;

fn lead(id: &str, value: u64) -> Deal {
    Deal::new(
        DealId::new(id).unwrap(),
        format!("Deal {}", id),
        Money::new(value),
        DealStage::Lead,
        ContactId::new("c1").unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        Probability::new(20),
    )
}

fn seeded(provider: MockAIProvider) -> CrmSession {
    CrmSession::seeded(Arc::new(provider)).unwrap()
}

#[test]
fn moving_a_lead_to_proposal_regroups_the_board() {
    let store = Arc::new(CrmStore::new());
    store.replace_all(Collection::Deals(vec![lead("d1", 5_000), lead("d2", 3_000)]));
    let session = CrmSession::new(Arc::clone(&store), Arc::new(MockAIProvider::new()));

    let outcome = session.move_deal(&DealId::new("d1").unwrap(), DealStage::Proposal);
    assert_eq!(outcome, MutationOutcome::Applied);

    let deals = store.deals();
    let board = group_by_stage(&deals);

    let lead_column = board.column(DealStage::Lead);
    assert_eq!(lead_column.deals.len(), 1);
    assert_eq!(lead_column.deals[0].id().as_str(), "d2");
    assert_eq!(lead_column.total_value, Money::new(3_000));

    let proposal = board.column(DealStage::Proposal);
    assert_eq!(proposal.deals.len(), 1);
    assert_eq!(proposal.deals[0].id().as_str(), "d1");
    assert_eq!(proposal.total_value, Money::new(5_000));

    for stage in [DealStage::Contacted, DealStage::Negotiation, DealStage::Closed] {
        assert!(board.column(stage).is_empty());
        assert_eq!(board.column(stage).total_value, Money::ZERO);
    }
}

#[tokio::test]
async fn failing_collaborator_returns_email_fallback() {
    let provider = MockAIProvider::new().with_error(MockError::Network {
        message: "simulated outage".to_string(),
    });
    let session = seeded(provider);
    let sarah = session.store().contact(&ContactId::new("c1").unwrap()).unwrap();

    let text = session
        .request_draft(&AssistantContext::for_contact(&sarah, "Renewal", Tone::Formal))
        .await;

    assert_eq!(text, EMAIL_FAILURE_FALLBACK);
}

#[test]
fn deleting_a_referenced_contact_leaves_a_dangling_deal() {
    let session = seeded(MockAIProvider::new());
    let c3 = ContactId::new("c3").unwrap();
    let deals_before = session.store().deals();

    assert!(session.delete_contact(&c3).is_applied());

    let deals_after = session.store().deals();
    assert_eq!(*deals_after, *deals_before);
    let d3 = session.store().deal(&DealId::new("d3").unwrap()).unwrap();
    assert_eq!(d3.contact_id(), &c3);
    assert_eq!(session.store().contact_name(d3.contact_id()), UNKNOWN_CONTACT);
}

#[test]
fn repeated_delete_is_harmless() {
    let session = seeded(MockAIProvider::new());
    let c2 = ContactId::new("c2").unwrap();

    session.delete_contact(&c2);
    let revision = session.store().revision();

    assert_eq!(session.delete_contact(&c2), MutationOutcome::Unchanged);
    assert_eq!(session.store().revision(), revision);
}

#[test]
fn added_contact_is_searchable_and_first() {
    let session = seeded(MockAIProvider::new());

    let added = session
        .add_contact(ContactDraft::new("Harvey Specter", "harvey@psl.com", "Pearson Specter", "Senior Partner"))
        .unwrap();

    let contacts = session.store().contacts();
    assert_eq!(contacts.len(), 4);
    assert_eq!(contacts[0].id(), added.id());
    assert_eq!(contacts.iter().filter(|c| c.id() == added.id()).count(), 1);
    assert!(added.avatar().contains("name=Harvey%20Specter"));

    let hits = search_contacts(&contacts, "pearson");
    let names: Vec<&str> = hits.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Harvey Specter", "Jessica Pearson"]);
}

#[test]
fn dashboard_reflects_board_moves() {
    let mut session = seeded(MockAIProvider::new());

    session.begin_drag(DealId::new("d1").unwrap());
    session.drop_on(DealStage::Closed);

    let stats = session.stats();
    assert_eq!(stats.won_deals, 1);
    assert_eq!(stats.total_pipeline, Money::new(212_000));

    let deals = session.store().deals();
    let shares = stage_distribution(&deals);
    assert_eq!(shares[0].stage, DealStage::Closed);
    assert_eq!(shares.len(), 4);

    let bars = value_bars(&deals);
    assert_eq!(bars[0].name, "Enterprise...");
    assert_eq!(bars[0].stage, DealStage::Closed);
}

#[test]
fn activity_log_follows_deal_links() {
    let session = seeded(MockAIProvider::new());
    let activities = session.store().activities();

    let d1 = activities_for_deal(&activities, &DealId::new("d1").unwrap());
    let ids: Vec<&str> = d1.iter().map(|a| a.id().as_str()).collect();
    assert_eq!(ids, vec!["a1", "a4"]);

    let linked = session.store().deal_for_activity(&activities[1]).unwrap();
    assert_eq!(linked.title(), "Q4 Infrastructure Audit");
}

#[tokio::test]
async fn analysis_outstanding_across_a_stage_move_still_delivers() {
    let provider = MockAIProvider::new()
        .with_response("Offer a pilot to unlock the proposal.")
        .with_delay(Duration::from_millis(100));
    let session = seeded(provider.clone());
    let d4 = DealId::new("d4").unwrap();
    let view = ViewKey::DealInsight(d4.clone());
    let deal = session.store().deal(&d4).unwrap();

    assert_eq!(
        session.submit_draft(view.clone(), AssistantContext::for_deal(&deal)),
        SubmitOutcome::Submitted
    );

    // The store is not blocked by the outstanding request.
    assert!(session.move_deal(&d4, DealStage::Closed).is_applied());
    assert!(session.drafts().is_pending(&view));

    let tip = session.drafts().resolve(&view).await;

    assert_eq!(tip.as_deref(), Some("Offer a pilot to unlock the proposal."));
    assert!(provider.get_calls()[0].messages[0].content.contains("Current Stage: LEAD"));
    assert_eq!(session.store().deal(&d4).unwrap().stage(), DealStage::Closed);
}

#[tokio::test]
async fn failed_background_analysis_resolves_to_fallback() {
    let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 30 });
    let session = seeded(provider);
    let d2 = DealId::new("d2").unwrap();
    let deal = session.store().deal(&d2).unwrap();
    let view = ViewKey::DealInsight(d2);

    session.submit_draft(view.clone(), AssistantContext::for_deal(&deal));

    assert_eq!(
        session.drafts().resolve(&view).await.as_deref(),
        Some(ANALYSIS_FAILURE_FALLBACK)
    );
}
