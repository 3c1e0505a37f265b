//! Drawer controller invariants, typed content resolution, and the
//! multi-step payment and presale flows.

mod common;

use armory_core::app::AppState;
use armory_core::client::ApiClient;
use armory_core::content::{
    self, DrawerContent, PaymentReceipt, PaymentRequest, ResolvedView,
};
use armory_core::drawer::SizeHints;
use armory_core::error::{ApiError, AuthRequired};
use armory_core::flows::{PaymentFlow, PaymentStep, RedeemPresaleFlow, RedeemStep};
use chrono::Utc;
use common::{gear_json, MockTransport};
use serde_json::json;
use std::sync::Arc;

fn app_over(transport: &Arc<MockTransport>) -> AppState {
    AppState::new(ApiClient::new(transport.clone()))
}

fn receipt() -> PaymentReceipt {
    PaymentReceipt {
        amount: "12.50".into(),
        recipient: "7x9k2".into(),
        recipient_label: Some("Front Sight Range".into()),
        message: None,
        signature: "5gW...sig".into(),
        timestamp: Utc::now(),
    }
}

#[tokio::test]
async fn reopening_replaces_content_and_only_the_latest_renders() {
    let transport = MockTransport::new();
    let app = app_over(&transport);

    app.drawer
        .open(DrawerContent::GearDetails { id: 7 }, SizeHints::default());
    app.drawer.open(DrawerContent::AddGear, SizeHints::default());

    let active = app.drawer.active().expect("drawer open");
    assert_eq!(active, DrawerContent::AddGear);
    assert!(matches!(
        content::resolve(&active, &app),
        ResolvedView::AddGear
    ));
}

#[tokio::test]
async fn details_views_re_resolve_through_the_store() {
    let transport = MockTransport::new();
    transport.respond(Ok(json!([gear_json(7, "Plate Carrier", 250.0, 1)])));
    transport.respond(Ok(serde_json::Value::Null)); // delete
    let app = app_over(&transport);

    app.gear.fetch_all(Some("tok"), &[]).await.unwrap();
    app.drawer
        .open(DrawerContent::GearDetails { id: 7 }, SizeHints::default());

    let active = app.drawer.active().unwrap();
    match content::resolve(&active, &app) {
        ResolvedView::GearDetails(Some(gear)) => assert_eq!(gear.name, "Plate Carrier"),
        other => panic!("expected resolved gear details, got {other:?}"),
    }

    // Record deleted while the drawer is open: the next resolve sees it gone
    // instead of rendering a stale copy.
    app.gear.delete(7, Some("tok")).await.unwrap();
    assert!(matches!(
        content::resolve(&active, &app),
        ResolvedView::GearDetails(None)
    ));
}

#[tokio::test]
async fn details_to_edit_is_an_explicit_sequential_replace() {
    let transport = MockTransport::new();
    let app = app_over(&transport);

    app.drawer
        .open(DrawerContent::GearDetails { id: 7 }, SizeHints::default());
    assert!(content::open_edit_from_details(&app.drawer));
    assert_eq!(app.drawer.active(), Some(DrawerContent::EditGear { id: 7 }));
    assert!(app.drawer.is_visible());

    // From anything that is not a details view the helper refuses.
    app.drawer.open(DrawerContent::AddAmmo, SizeHints::default());
    assert!(!content::open_edit_from_details(&app.drawer));
    assert_eq!(app.drawer.active(), Some(DrawerContent::AddAmmo));
}

#[tokio::test]
async fn payment_flow_reaches_a_receipt_inside_one_drawer() {
    let transport = MockTransport::new();
    let app = app_over(&transport);

    let request = PaymentRequest {
        recipient: "7x9k2".into(),
        amount: Some(12.5),
        label: Some("Front Sight Range".into()),
        message: None,
    };
    app.drawer.open(
        DrawerContent::ConfirmPayment(request.clone()),
        SizeHints::default(),
    );

    let mut flow = PaymentFlow::new(request);
    flow.advance();
    flow.set_password("hunter2");
    let expected = receipt();
    let sent = expected.clone();
    flow.submit(move |_, password| async move {
        assert_eq!(password, "hunter2");
        Ok(sent)
    })
    .await;

    assert_eq!(*flow.step(), PaymentStep::Done(expected));
    // The whole flow ran inside the one confirm-payment drawer.
    assert!(matches!(
        app.drawer.active(),
        Some(DrawerContent::ConfirmPayment(_))
    ));

    // The host then swaps to the receipt drawer, one drawer at a time.
    if let PaymentStep::Done(r) = flow.step().clone() {
        app.drawer
            .open(DrawerContent::PaymentReceipt(r), SizeHints::default());
    }
    assert!(matches!(
        app.drawer.active(),
        Some(DrawerContent::PaymentReceipt(_))
    ));
}

#[tokio::test]
async fn payment_failure_is_retryable_without_losing_the_request() {
    let request = PaymentRequest {
        recipient: "7x9k2".into(),
        amount: Some(5.0),
        label: None,
        message: None,
    };
    let mut flow = PaymentFlow::new(request);
    flow.advance();
    flow.set_password("wrong");
    flow.submit(|_, _| async { Err("invalid password".to_string()) })
        .await;
    assert_eq!(*flow.step(), PaymentStep::Failed("invalid password".into()));

    flow.retry();
    assert_eq!(*flow.step(), PaymentStep::Confirm);
    assert_eq!(flow.request().amount, Some(5.0));
}

#[tokio::test]
async fn presale_flow_rejects_invalid_codes_inline() {
    let transport = MockTransport::new();
    transport.respond(Ok(json!({
        "isValid": false,
        "redeemed": false,
        "message": "Code not found"
    })));
    let app = app_over(&transport);

    let mut flow = RedeemPresaleFlow::new();
    flow.code = "NOPE".into();
    flow.check(&app.presale, Some("tok")).await;

    assert_eq!(flow.step(), RedeemStep::EnterCode);
    assert_eq!(flow.message(), Some("Code not found"));
}

#[tokio::test]
async fn wallet_bound_codes_demand_an_address_before_redeeming() {
    let transport = MockTransport::new();
    transport.respond(Ok(json!({
        "isValid": true,
        "redeemed": false,
        "type": 2,
        "message": "Code is valid"
    })));
    transport.respond(Ok(json!({
        "success": true,
        "message": "Tokens allocated"
    })));
    let app = app_over(&transport);

    let mut flow = RedeemPresaleFlow::new();
    flow.code = "P2-CODE".into();
    flow.check(&app.presale, Some("tok")).await;
    assert_eq!(flow.step(), RedeemStep::AwaitWallet);

    // Redeeming without an address stays put with an inline message.
    flow.redeem(&app.presale, Some("tok")).await.unwrap();
    assert_eq!(flow.step(), RedeemStep::AwaitWallet);
    assert!(flow.message().unwrap().contains("wallet address"));

    flow.set_wallet_address("9qTb3...dest");
    assert_eq!(flow.step(), RedeemStep::Ready);
    flow.redeem(&app.presale, Some("tok")).await.unwrap();
    assert_eq!(flow.step(), RedeemStep::Done { success: true });
    assert_eq!(flow.message(), Some("Tokens allocated"));

    // The redeem request carried the destination address.
    let redeem_req = &transport.requests()[1];
    assert_eq!(redeem_req.path, "/presale/redeem");
    assert_eq!(redeem_req.body.as_ref().unwrap()["walletAddress"], "9qTb3...dest");
}

#[tokio::test]
async fn presale_redeem_requires_a_token() {
    let transport = MockTransport::new();
    transport.respond(Ok(json!({
        "isValid": true,
        "redeemed": false,
        "type": 1,
        "message": "Code is valid"
    })));
    let app = app_over(&transport);

    let mut flow = RedeemPresaleFlow::new();
    flow.code = "P1-CODE".into();
    flow.check(&app.presale, None).await;
    assert_eq!(flow.step(), RedeemStep::Ready);

    let err = flow.redeem(&app.presale, None).await.unwrap_err();
    assert_eq!(err, AuthRequired);
    // Only the check hit the transport.
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn presale_transport_failure_degrades_to_a_failed_outcome() {
    let transport = MockTransport::new();
    transport.respond(Err(ApiError::Network("connection refused".into())));
    let app = app_over(&transport);

    let outcome = app.presale.check("ANY", Some("tok")).await;
    assert!(!outcome.valid);
    assert!(outcome.message.contains("connection refused"));
}
