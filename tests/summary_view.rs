//! Aggregate summary derivation: snapshot-vs-local count policy, the
//! count/value asymmetry, the spinner and error gates, and the bulk retry.

mod common;

use armory_core::app::AppState;
use armory_core::client::ApiClient;
use armory_core::counts::Domain;
use armory_core::error::ApiError;
use armory_core::summary;
use common::{gear_json, MockTransport};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

fn app_over(transport: &Arc<MockTransport>) -> AppState {
    AppState::new(ApiClient::new(transport.clone()))
}

fn domain(summary: &summary::ArmorySummary, d: Domain) -> &summary::DomainSummary {
    summary
        .domains
        .iter()
        .find(|s| s.domain == d)
        .expect("domain present")
}

#[tokio::test]
async fn count_uses_snapshot_while_value_uses_local_items() {
    let transport = MockTransport::new();
    transport.respond(Ok(
        json!({"firearms": 5, "ammo": 0, "gear": 2, "nfa": 0, "documents": 1}),
    ));
    transport.respond(Ok(json!([gear_json(7, "Plate Carrier", 100.0, 1)])));
    let app = app_over(&transport);

    app.counts.fetch(Some("tok")).await.unwrap();
    app.gear.fetch_all(Some("tok"), &[]).await.unwrap();

    let derived = summary::derive(&app);

    // Count comes from the authoritative snapshot even though only one gear
    // record has loaded; value comes from that one local record and is not
    // scaled to the snapshot count.
    let gear = domain(&derived, Domain::Gear);
    assert_eq!(gear.count, 2);
    assert_eq!(gear.total_value, 100.0);

    // Present-but-zero snapshot counts win over local length.
    assert_eq!(domain(&derived, Domain::Ammo).count, 0);
    assert_eq!(domain(&derived, Domain::Firearms).count, 5);
    assert_eq!(domain(&derived, Domain::Documents).count, 1);
    assert_eq!(derived.total_count, 8);
    assert_eq!(derived.total_value, 100.0);
}

#[tokio::test]
async fn counts_fall_back_to_local_length_without_a_snapshot() {
    let transport = MockTransport::new();
    transport.respond(Ok(json!([
        gear_json(1, "Plate Carrier", 250.0, 1),
        gear_json(2, "Range Bag", 30.0, 1)
    ])));
    let app = app_over(&transport);

    app.gear.fetch_all(Some("tok"), &[]).await.unwrap();

    let derived = summary::derive(&app);
    assert_eq!(domain(&derived, Domain::Gear).count, 2);
    assert_eq!(domain(&derived, Domain::Gear).total_value, 280.0);
}

#[tokio::test]
async fn spinner_blocks_only_while_loading_with_nothing_streamed_in() {
    let transport = MockTransport::new();
    let gate = Arc::new(Notify::new());
    transport.respond_gated(Ok(json!([gear_json(1, "Plate Carrier", 250.0, 1)])), gate.clone());
    let app = Arc::new(app_over(&transport));

    assert!(!summary::show_blocking_spinner(&app), "idle app has no spinner");

    let a = app.clone();
    let fetch = tokio::spawn(async move { a.gear.fetch_all(Some("tok"), &[]).await });
    while transport.request_count() < 1 {
        tokio::task::yield_now().await;
    }
    assert!(
        summary::show_blocking_spinner(&app),
        "loading with empty collections blocks"
    );

    gate.notify_one();
    fetch.await.unwrap().unwrap();
    assert!(!summary::show_blocking_spinner(&app));

    // A refresh after data has streamed in must not resurrect the spinner.
    let gate2 = Arc::new(Notify::new());
    transport.respond_gated(Ok(json!([gear_json(1, "Plate Carrier", 250.0, 1)])), gate2.clone());
    let a = app.clone();
    let refresh = tokio::spawn(async move { a.gear.fetch_all(Some("tok"), &[]).await });
    while transport.request_count() < 2 {
        tokio::task::yield_now().await;
    }
    assert!(!summary::show_blocking_spinner(&app));
    gate2.notify_one();
    refresh.await.unwrap().unwrap();
}

#[tokio::test]
async fn first_error_follows_the_fixed_domain_order() {
    let transport = MockTransport::new();
    let app = app_over(&transport);

    app.gear.set_error(Some("gear down".into()));
    app.ammo.set_error(Some("ammo down".into()));
    app.counts.set_error(Some("counts down".into()));

    // Ammo precedes gear and the counts snapshot in the check order.
    assert_eq!(summary::first_error(&app).as_deref(), Some("ammo down"));

    app.ammo.set_error(None);
    assert_eq!(summary::first_error(&app).as_deref(), Some("gear down"));

    app.gear.set_error(None);
    assert_eq!(summary::first_error(&app).as_deref(), Some("counts down"));
}

#[tokio::test]
async fn retry_clears_every_error_and_refetches_the_snapshot() {
    let transport = MockTransport::new();
    transport.respond(Err(ApiError::Http {
        status: 503,
        message: "warming up".into(),
    }));
    transport.respond(Ok(
        json!({"firearms": 1, "ammo": 0, "gear": 0, "nfa": 0, "documents": 0}),
    ));
    let app = app_over(&transport);

    app.counts.fetch(Some("tok")).await.unwrap();
    app.firearms.set_error(Some("stale".into()));
    assert!(summary::first_error(&app).is_some());

    summary::retry(&app, Some("tok")).await.unwrap();

    assert!(summary::first_error(&app).is_none());
    assert_eq!(app.counts.count(Domain::Firearms), Some(1));
    assert_eq!(transport.request_count(), 2);
}
