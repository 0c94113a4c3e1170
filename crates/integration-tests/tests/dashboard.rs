//! Integration tests for the dashboard state machine.
//!
//! These drive a [`DashboardSession`] with a wallet adapter, the way the
//! presentation layer would.

#![allow(clippy::unwrap_used)]

use itiza_core::ActivityFilter;
use itiza_integration_tests::{
    TestContext, product_form, public_key, registration_form, wallet,
};
use itiza_merchant::error::MerchantError;
use itiza_merchant::models::ProductPatch;
use itiza_merchant::services::{AssumeNo, AssumeYes, DashboardState, NotificationVariant};
use itiza_merchant::store::QueryState;

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_starts_disconnected() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();
    assert_eq!(h.session.sync(), &DashboardState::Disconnected);
    assert!(h.session.catalog().is_none());
}

#[tokio::test]
async fn test_pending_lookup_is_loading_not_unregistered() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();

    h.wallet.connect(public_key(1));
    // The lookup task has not run yet on this single-threaded runtime.
    assert_eq!(
        h.session.sync(),
        &DashboardState::ResolvingIdentity { wallet: wallet(1) }
    );

    assert_eq!(
        h.session.settle().await.unwrap(),
        &DashboardState::Unregistered { wallet: wallet(1) }
    );
}

#[tokio::test]
async fn test_existing_merchant_resolves_to_registered() {
    let ctx = TestContext::new();
    let merchant = ctx
        .registry
        .register(&itiza_integration_tests::identity(2), &registration_form("Roses"))
        .await
        .unwrap();

    let mut h = ctx.dashboard();
    h.wallet.connect(public_key(2));
    assert_eq!(
        h.session.settle().await.unwrap(),
        &DashboardState::Registered { merchant }
    );
}

#[tokio::test]
async fn test_disconnect_and_reconnect_skips_registration() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();
    h.wallet.connect(public_key(3));
    h.session.settle().await.unwrap();
    let merchant = h.session.register(&registration_form("Candles")).await.unwrap();

    h.wallet.disconnect();
    assert_eq!(h.session.sync(), &DashboardState::Disconnected);

    h.wallet.connect(public_key(3));
    assert_eq!(
        h.session.settle().await.unwrap(),
        &DashboardState::Registered {
            merchant: merchant.clone()
        }
    );

    // Still exactly one merchant for the wallet.
    assert_eq!(ctx.store.snapshot().await.merchants, vec![merchant]);
}

#[tokio::test]
async fn test_switching_wallet_re_resolves() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();
    h.wallet.connect(public_key(4));
    h.session.settle().await.unwrap();
    h.session.register(&registration_form("Four")).await.unwrap();

    h.wallet.connect(public_key(5));
    assert_eq!(
        h.session.settle().await.unwrap(),
        &DashboardState::Unregistered { wallet: wallet(5) }
    );
    assert!(h.session.catalog().is_none());
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_registration_is_immediately_registered() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();
    h.wallet.connect(public_key(6));
    h.session.settle().await.unwrap();

    let merchant = h.session.register(&registration_form("Six")).await.unwrap();
    // No lookup round-trip needed.
    assert_eq!(h.session.state(), &DashboardState::Registered { merchant });

    let notes = h.notifications.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].variant, NotificationVariant::Default);
}

#[tokio::test]
async fn test_failed_registration_returns_to_form() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();
    h.wallet.connect(public_key(7));
    h.session.settle().await.unwrap();

    let mut form = registration_form("Seven");
    form.email = "missing-at.example".to_owned();
    let err = h.session.register(&form).await.unwrap_err();
    assert!(matches!(err, MerchantError::InvalidField { field: "email", .. }));
    assert_eq!(
        h.session.state(),
        &DashboardState::Unregistered { wallet: wallet(7) }
    );

    let notes = h.notifications.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].variant, NotificationVariant::Destructive);

    h.session.register(&registration_form("Seven")).await.unwrap();
}

#[tokio::test]
async fn test_registration_race_between_two_dashboards() {
    let ctx = TestContext::new();
    let mut first = ctx.dashboard();
    let mut second = ctx.dashboard();
    first.wallet.connect(public_key(8));
    second.wallet.connect(public_key(8));
    first.session.settle().await.unwrap();
    second.session.settle().await.unwrap();

    first.session.register(&registration_form("Eight")).await.unwrap();
    let err = second
        .session
        .register(&registration_form("Eight"))
        .await
        .unwrap_err();
    assert_eq!(err, MerchantError::DuplicateIdentity);

    // The losing dashboard catches up through its lookup.
    while !matches!(second.session.state(), DashboardState::Registered { .. }) {
        assert!(second.session.next_change().await);
    }
}

// =============================================================================
// Catalog through the dashboard
// =============================================================================

#[tokio::test]
async fn test_catalog_is_unreachable_without_merchant() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();
    h.wallet.connect(public_key(9));
    h.session.settle().await.unwrap();

    assert_eq!(
        h.session
            .create_product(&product_form("Nope"))
            .await
            .unwrap_err(),
        MerchantError::NotRegistered
    );
    assert!(h.session.products(ActivityFilter::All).is_err());
    assert_eq!(ctx.store.version(), 0);
}

#[tokio::test]
async fn test_manage_products_through_dashboard() {
    let ctx = TestContext::new();
    let mut h = ctx.dashboard();
    h.wallet.connect(public_key(10));
    h.session.settle().await.unwrap();
    let merchant = h.session.register(&registration_form("Ten")).await.unwrap();

    let mut listing = h.session.products(ActivityFilter::All).unwrap();
    assert_eq!(listing.resolved().await, QueryState::Ready(Vec::new()));

    let product = h
        .session
        .create_product(&product_form("Scarf"))
        .await
        .unwrap();
    assert_eq!(product.merchant_id, merchant.id);

    let patch = ProductPatch {
        name: Some("Silk Scarf".to_owned()),
        ..ProductPatch::default()
    };
    let renamed = h.session.update_product(product.id, patch).await.unwrap();
    assert_eq!(renamed.name, "Silk Scarf");

    let err = h
        .session
        .delete_product(product.id, &AssumeNo)
        .await
        .unwrap_err();
    assert_eq!(err, MerchantError::Cancelled);

    let deleted = h
        .session
        .delete_product(product.id, &AssumeYes)
        .await
        .unwrap();
    assert!(!deleted.is_active);

    let descriptions: Vec<_> = h
        .notifications
        .drain()
        .into_iter()
        .map(|n| n.description)
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Your merchant account has been created.",
            "Product created successfully",
            "Product updated successfully",
            "Product deleted successfully",
        ]
    );

    let mut latest = listing.current();
    while latest.ready().is_none_or(|products| products.iter().any(|p| p.is_active)) {
        latest = listing.changed().await.unwrap();
    }
    assert_eq!(latest.ready().map(Vec::len), Some(1));
}
