//! Integration tests for store failures, using a mocked store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use mockall::predicate::eq;
use tokio::sync::watch;

use itiza_core::{ActivityFilter, MerchantId};
use itiza_integration_tests::{
    DashboardHarness, identity, product_form, public_key, registration_form, wallet,
};
use itiza_merchant::error::MerchantError;
use itiza_merchant::services::{
    DashboardState, MerchantRegistry, NotificationVariant, ProductCatalog,
};
use itiza_merchant::store::{MockReactiveStore, QueryState, StoreError};

fn offline() -> StoreError {
    StoreError::Unavailable("connection refused".to_owned())
}

#[tokio::test]
async fn test_registration_store_failure() {
    let mut store = MockReactiveStore::new();
    store
        .expect_insert_merchant()
        .times(1)
        .returning(|_| Err(offline()));

    let registry = MerchantRegistry::new(Arc::new(store));
    let err = registry
        .register(&identity(1), &registration_form("Down"))
        .await
        .unwrap_err();
    assert!(matches!(err, MerchantError::StoreUnavailable(_)));
}

#[tokio::test]
async fn test_create_never_writes_invalid_input() {
    let mut store = MockReactiveStore::new();
    store.expect_insert_product().never();

    let catalog = ProductCatalog::new(Arc::new(store));
    let mut form = product_form("Broken");
    form.price = "-1".to_owned();

    let err = catalog.create(&identity(1), &form).await.unwrap_err();
    assert!(matches!(err, MerchantError::InvalidField { field: "price", .. }));
}

#[tokio::test]
async fn test_create_sends_calling_wallet() {
    let mut store = MockReactiveStore::new();
    store
        .expect_insert_product()
        .withf(|caller, product| *caller == wallet(2) && product.name == "Mug")
        .times(1)
        .returning(|_, _| Err(offline()));

    let catalog = ProductCatalog::new(Arc::new(store));
    let err = catalog
        .create(&identity(2), &product_form("Mug"))
        .await
        .unwrap_err();
    assert!(err.is_store_failure());
}

#[tokio::test]
async fn test_failed_listing_is_delivered() {
    let (_version, changes) = watch::channel(0_u64);
    let merchant_id = MerchantId::generate();

    let mut store = MockReactiveStore::new();
    store.expect_changes().return_const(changes);
    store
        .expect_products_by_merchant()
        .with(eq(merchant_id))
        .returning(|_| Err(offline()));

    let catalog = ProductCatalog::new(Arc::new(store));
    let mut listing = catalog.list_by_merchant(merchant_id, ActivityFilter::All);
    assert_eq!(listing.resolved().await, QueryState::Failed(offline()));
}

#[tokio::test]
async fn test_dashboard_surfaces_lookup_failure() {
    let (_version, changes) = watch::channel(0_u64);

    let mut store = MockReactiveStore::new();
    store.expect_changes().return_const(changes);
    store
        .expect_merchant_by_wallet()
        .returning(|_| Err(offline()));

    let mut h = DashboardHarness::new(Arc::new(store));
    h.wallet.connect(public_key(3));

    while h.session.lookup_error().is_none() {
        assert!(h.session.next_change().await);
    }
    assert!(h.session.lookup_error().unwrap().is_store_failure());
    assert!(matches!(
        h.session.state(),
        DashboardState::ResolvingIdentity { .. }
    ));

    let notes = h.notifications.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].description, "Failed to load merchant account");
    assert_eq!(notes[0].variant, NotificationVariant::Destructive);

    let err = h.session.settle().await.unwrap_err();
    assert!(err.is_store_failure());
    assert!(h.notifications.entries().is_empty());
}

#[tokio::test]
async fn test_dashboard_lookup_failure_clears_on_disconnect() {
    let (_version, changes) = watch::channel(0_u64);

    let mut store = MockReactiveStore::new();
    store.expect_changes().return_const(changes);
    store
        .expect_merchant_by_wallet()
        .returning(|_| Err(offline()));

    let mut h = DashboardHarness::new(Arc::new(store));
    h.wallet.connect(public_key(5));
    assert!(h.session.settle().await.is_err());

    h.wallet.disconnect();
    assert_eq!(h.session.sync(), &DashboardState::Disconnected);
    assert!(h.session.lookup_error().is_none());
    assert_eq!(h.notifications.entries().len(), 1);
}

#[tokio::test]
async fn test_dashboard_notifies_registration_failure_once() {
    let (_version, changes) = watch::channel(0_u64);

    let mut store = MockReactiveStore::new();
    store.expect_changes().return_const(changes);
    store.expect_merchant_by_wallet().returning(|_| Ok(None));
    store
        .expect_insert_merchant()
        .times(1)
        .returning(|_| Err(offline()));

    let mut h = DashboardHarness::new(Arc::new(store));
    h.wallet.connect(public_key(4));
    h.session.settle().await.unwrap();

    let err = h
        .session
        .register(&registration_form("Flaky"))
        .await
        .unwrap_err();
    assert!(err.is_store_failure());
    assert_eq!(
        h.session.state(),
        &DashboardState::Unregistered { wallet: wallet(4) }
    );

    let notes = h.notifications.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].description, "Failed to create merchant account.");
    assert_eq!(notes[0].variant, NotificationVariant::Destructive);
}
