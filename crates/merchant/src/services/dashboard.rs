//! Merchant dashboard state machine.
//!
//! ```text
//! Disconnected ──connect──▶ ResolvingIdentity ──lookup: none──▶ Unregistered
//!       ▲                          │                               │ submit
//!       │                          └──lookup: merchant──┐          ▼
//!   disconnect                                          ├──── Registering
//!  (any state)                                          ▼          │ success
//!                                                   Registered ◀───┘
//! ```
//!
//! [`DashboardController`] is the pure transition function. It performs no
//! I/O and is driven by identity changes, lookup deliveries and registration
//! outcomes. [`DashboardSession`] owns the wallet resolver and the lookup
//! subscription and feeds the controller.
//!
//! Catalog operations are only reachable through a [`MerchantScope`], which
//! exists only in [`DashboardState::Registered`].

use std::sync::Arc;

use tracing::{debug, info, instrument};

use itiza_core::{ActivityFilter, MerchantId, ProductId, WalletAddress};

use crate::error::MerchantError;
use crate::forms::{ProductForm, RegistrationForm};
use crate::models::{Merchant, Product, ProductPatch};
use crate::services::catalog::ProductCatalog;
use crate::services::confirmation::Confirm;
use crate::services::identity::{Identity, IdentityResolver};
use crate::services::notifications::{Action, NotificationSink};
use crate::services::registry::MerchantRegistry;
use crate::store::{QueryState, ReactiveStore, Subscription};

/// What the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DashboardState {
    /// No wallet. Prompt to connect.
    #[default]
    Disconnected,
    /// Wallet connected, merchant lookup pending. Show a loading indicator.
    ResolvingIdentity { wallet: WalletAddress },
    /// Wallet has no merchant. Show the registration form.
    Unregistered { wallet: WalletAddress },
    /// Registration submitted and in flight.
    Registering { wallet: WalletAddress },
    /// Merchant known. Show the catalog views.
    Registered { merchant: Merchant },
}

impl DashboardState {
    /// The wallet the state belongs to.
    #[must_use]
    pub const fn wallet(&self) -> Option<&WalletAddress> {
        match self {
            Self::Disconnected => None,
            Self::ResolvingIdentity { wallet }
            | Self::Unregistered { wallet }
            | Self::Registering { wallet } => Some(wallet),
            Self::Registered { merchant } => Some(&merchant.wallet_address),
        }
    }

    /// Short state name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::ResolvingIdentity { .. } => "resolving_identity",
            Self::Unregistered { .. } => "unregistered",
            Self::Registering { .. } => "registering",
            Self::Registered { .. } => "registered",
        }
    }
}

/// Proof that the dashboard has a registered merchant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantScope {
    merchant_id: MerchantId,
    wallet: WalletAddress,
}

impl MerchantScope {
    #[must_use]
    pub const fn merchant_id(&self) -> MerchantId {
        self.merchant_id
    }

    #[must_use]
    pub const fn wallet(&self) -> &WalletAddress {
        &self.wallet
    }

    fn identity(&self) -> Identity {
        Identity::Connected(self.wallet.clone())
    }
}

/// Pure dashboard transition function.
#[derive(Debug, Clone, Default)]
pub struct DashboardController {
    state: DashboardState,
}

impl DashboardController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    fn transition(&mut self, next: DashboardState) {
        if self.state != next {
            debug!(from = self.state.name(), to = next.name(), "Dashboard transition");
            self.state = next;
        }
    }

    /// Apply an identity change.
    ///
    /// Returns `true` when the dashboard started resolving a new wallet,
    /// meaning the caller must subscribe a fresh merchant lookup for it.
    pub fn on_identity(&mut self, identity: &Identity) -> bool {
        match identity {
            Identity::Disconnected => {
                self.transition(DashboardState::Disconnected);
                false
            }
            Identity::Connected(wallet) if self.state.wallet() == Some(wallet) => false,
            Identity::Connected(wallet) => {
                self.transition(DashboardState::ResolvingIdentity {
                    wallet: wallet.clone(),
                });
                true
            }
        }
    }

    /// Apply a merchant lookup delivery.
    ///
    /// `Loading` changes nothing. Once registered, only a newer copy of the
    /// same merchant is accepted; an absent result never demotes the state.
    ///
    /// # Errors
    ///
    /// Returns the store failure of a failed lookup. The state is unchanged.
    pub fn on_lookup(&mut self, lookup: &QueryState<Option<Merchant>>) -> Result<(), MerchantError> {
        match lookup {
            QueryState::Loading => {}
            QueryState::Failed(err) => return Err(err.clone().into()),
            QueryState::Ready(None) => {
                if let DashboardState::ResolvingIdentity { wallet } = &self.state {
                    let wallet = wallet.clone();
                    self.transition(DashboardState::Unregistered { wallet });
                }
            }
            QueryState::Ready(Some(merchant)) => {
                let accept = match &self.state {
                    state if state.wallet() != Some(&merchant.wallet_address) => false,
                    DashboardState::Registered { merchant: current } => current.id == merchant.id,
                    _ => true,
                };
                if accept {
                    self.transition(DashboardState::Registered {
                        merchant: merchant.clone(),
                    });
                } else {
                    debug!(merchant_id = %merchant.id, "Ignoring stale merchant lookup");
                }
            }
        }
        Ok(())
    }

    /// Move from `Unregistered` to `Registering`.
    ///
    /// # Errors
    ///
    /// - [`MerchantError::IdentityMissing`] if no wallet is connected
    /// - [`MerchantError::DuplicateIdentity`] if the wallet is already registered
    /// - [`MerchantError::InvalidState`] while the lookup or a previous
    ///   registration is still pending
    pub fn begin_registration(&mut self) -> Result<WalletAddress, MerchantError> {
        match &self.state {
            DashboardState::Unregistered { wallet } => {
                let wallet = wallet.clone();
                self.transition(DashboardState::Registering {
                    wallet: wallet.clone(),
                });
                Ok(wallet)
            }
            DashboardState::Disconnected => Err(MerchantError::IdentityMissing),
            DashboardState::Registered { .. } => Err(MerchantError::DuplicateIdentity),
            state @ (DashboardState::ResolvingIdentity { .. }
            | DashboardState::Registering { .. }) => Err(MerchantError::InvalidState(
                format!("cannot register while {}", state.name()),
            )),
        }
    }

    /// Record a successful registration. Ignored if the wallet changed
    /// while the request was in flight.
    pub fn registration_succeeded(&mut self, merchant: Merchant) {
        let in_flight = matches!(
            &self.state,
            DashboardState::Registering { wallet } if *wallet == merchant.wallet_address
        );
        if in_flight {
            self.transition(DashboardState::Registered { merchant });
        }
    }

    /// Record a failed registration so the form can be resubmitted.
    pub fn registration_failed(&mut self) {
        if let DashboardState::Registering { wallet } = &self.state {
            let wallet = wallet.clone();
            self.transition(DashboardState::Unregistered { wallet });
        }
    }

    /// The merchant scope, present only when registered.
    #[must_use]
    pub fn merchant_scope(&self) -> Option<MerchantScope> {
        match &self.state {
            DashboardState::Registered { merchant } => Some(MerchantScope {
                merchant_id: merchant.id,
                wallet: merchant.wallet_address.clone(),
            }),
            _ => None,
        }
    }
}

/// Catalog operations bound to a registered merchant.
#[derive(Debug)]
pub struct ScopedCatalog<'a> {
    catalog: &'a ProductCatalog,
    scope: MerchantScope,
}

impl<'a> ScopedCatalog<'a> {
    #[must_use]
    pub const fn new(catalog: &'a ProductCatalog, scope: MerchantScope) -> Self {
        Self { catalog, scope }
    }

    #[must_use]
    pub const fn scope(&self) -> &MerchantScope {
        &self.scope
    }

    /// Live listing of this merchant's products.
    #[must_use]
    pub fn list(&self, filter: ActivityFilter) -> Subscription<Vec<Product>> {
        self.catalog.list_by_merchant(self.scope.merchant_id, filter)
    }

    /// Create a product for this merchant.
    ///
    /// # Errors
    ///
    /// See [`ProductCatalog::create`].
    pub async fn create(&self, form: &ProductForm) -> Result<Product, MerchantError> {
        let product = self.catalog.create(&self.scope.identity(), form).await?;
        debug_assert_eq!(product.merchant_id, self.scope.merchant_id);
        Ok(product)
    }

    /// Update one of this merchant's products.
    ///
    /// # Errors
    ///
    /// See [`ProductCatalog::update`].
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, MerchantError> {
        self.catalog.update(&self.scope.identity(), id, patch).await
    }

    /// Soft-delete one of this merchant's products after confirmation.
    ///
    /// # Errors
    ///
    /// See [`ProductCatalog::deactivate`].
    pub async fn deactivate(
        &self,
        id: ProductId,
        confirm: &dyn Confirm,
    ) -> Result<Product, MerchantError> {
        self.catalog
            .deactivate(&self.scope.identity(), id, confirm)
            .await
    }
}

/// Drives a [`DashboardController`] from a wallet and a store.
///
/// The session holds at most one merchant lookup, for the wallet currently
/// being shown. Re-targeting or dropping the session releases it.
pub struct DashboardSession {
    resolver: IdentityResolver,
    registry: MerchantRegistry,
    catalog: ProductCatalog,
    notifier: Arc<dyn NotificationSink>,
    controller: DashboardController,
    lookup: Option<Subscription<Option<Merchant>>>,
    lookup_error: Option<MerchantError>,
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("state", self.controller.state())
            .field("subscribed", &self.lookup.is_some())
            .finish_non_exhaustive()
    }
}

enum Event {
    Identity(Option<Identity>),
    Lookup(Option<QueryState<Option<Merchant>>>),
}

impl DashboardSession {
    /// Start a session for the wallet `resolver` follows.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        mut resolver: IdentityResolver,
        store: Arc<dyn ReactiveStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let identity = resolver.mark_seen();
        let mut session = Self {
            resolver,
            registry: MerchantRegistry::new(Arc::clone(&store)),
            catalog: ProductCatalog::new(store),
            notifier,
            controller: DashboardController::new(),
            lookup: None,
            lookup_error: None,
        };
        session.apply_identity(&identity);
        session
    }

    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        self.controller.state()
    }

    #[must_use]
    pub const fn registry(&self) -> &MerchantRegistry {
        &self.registry
    }

    fn apply_identity(&mut self, identity: &Identity) {
        if self.controller.on_identity(identity) {
            if let Some(wallet) = identity.address() {
                debug!(wallet = %wallet.short(), "Subscribing merchant lookup");
                self.lookup = Some(self.registry.lookup_by_identity(wallet));
            }
        } else if !identity.is_connected() {
            self.lookup = None;
        }
        self.lookup_error = None;
    }

    fn apply_lookup(&mut self, lookup: &QueryState<Option<Merchant>>) {
        match self.controller.on_lookup(lookup) {
            Ok(()) if matches!(lookup, QueryState::Ready(_)) => self.lookup_error = None,
            Ok(()) => {}
            Err(err) => {
                let result: Result<(), MerchantError> = Err(err.clone());
                self.notify(Action::LoadDashboard, &result);
                self.lookup_error = Some(err);
            }
        }
    }

    /// The failure of the current merchant lookup, if it failed.
    ///
    /// Cleared when the lookup recovers or the wallet changes.
    #[must_use]
    pub const fn lookup_error(&self) -> Option<&MerchantError> {
        self.lookup_error.as_ref()
    }

    /// Fold every pending identity and lookup change into the state.
    pub fn sync(&mut self) -> &DashboardState {
        if self.resolver.has_changed() {
            let identity = self.resolver.mark_seen();
            self.apply_identity(&identity);
        }
        if let Some(update) = self.lookup.as_mut().and_then(Subscription::poll_update) {
            self.apply_lookup(&update);
        }
        self.controller.state()
    }

    /// Wait for the next identity or lookup change and apply it.
    ///
    /// Returns `false` once neither source can change any more.
    pub async fn next_change(&mut self) -> bool {
        let resolver = &mut self.resolver;
        let lookup = &mut self.lookup;

        let event = tokio::select! {
            identity = resolver.changed() => Event::Identity(identity),
            update = async {
                match lookup {
                    Some(sub) => sub.changed().await,
                    None => std::future::pending().await,
                }
            } => Event::Lookup(update),
        };

        match event {
            Event::Identity(Some(identity)) => self.apply_identity(&identity),
            Event::Lookup(Some(update)) => self.apply_lookup(&update),
            Event::Identity(None) => {
                debug!("Wallet adapter gone");
                return false;
            }
            Event::Lookup(None) => {
                self.lookup = None;
                return false;
            }
        }
        true
    }

    /// Wait until the dashboard is no longer resolving the wallet.
    ///
    /// # Errors
    ///
    /// Returns the store failure if the merchant lookup fails.
    pub async fn settle(&mut self) -> Result<&DashboardState, MerchantError> {
        self.sync();
        while matches!(self.state(), DashboardState::ResolvingIdentity { .. }) {
            if let Some(err) = &self.lookup_error {
                return Err(err.clone());
            }
            if !self.next_change().await {
                break;
            }
        }
        if let Some(err) = &self.lookup_error {
            return Err(err.clone());
        }
        Ok(self.controller.state())
    }

    fn notify<T>(&self, action: Action, result: &Result<T, MerchantError>) {
        if let Err(err) = result {
            err.report();
        }
        if let Some(notification) = action.outcome(result) {
            self.notifier.notify(notification);
        }
    }

    /// Submit the registration form for the connected wallet.
    ///
    /// The outcome is notified once. On success the dashboard is
    /// `Registered` immediately.
    ///
    /// # Errors
    ///
    /// See [`DashboardController::begin_registration`] and
    /// [`MerchantRegistry::register`].
    #[instrument(skip(self, form))]
    pub async fn register(&mut self, form: &RegistrationForm) -> Result<Merchant, MerchantError> {
        self.sync();
        let result = self.try_register(form).await;
        self.notify(Action::RegisterMerchant, &result);
        result
    }

    async fn try_register(&mut self, form: &RegistrationForm) -> Result<Merchant, MerchantError> {
        let wallet = self.controller.begin_registration()?;
        let identity = Identity::Connected(wallet);

        match self.registry.register(&identity, form).await {
            Ok(merchant) => {
                info!(merchant_id = %merchant.id, "Dashboard registered");
                self.controller.registration_succeeded(merchant.clone());
                Ok(merchant)
            }
            Err(err) => {
                self.controller.registration_failed();
                Err(err)
            }
        }
    }

    /// Catalog operations for the registered merchant.
    #[must_use]
    pub fn catalog(&self) -> Option<ScopedCatalog<'_>> {
        self.controller
            .merchant_scope()
            .map(|scope| ScopedCatalog::new(&self.catalog, scope))
    }

    fn scoped(&mut self) -> Result<ScopedCatalog<'_>, MerchantError> {
        self.sync();
        self.catalog().ok_or(MerchantError::NotRegistered)
    }

    /// Live listing of the registered merchant's products.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::NotRegistered`] outside `Registered`.
    pub fn products(
        &mut self,
        filter: ActivityFilter,
    ) -> Result<Subscription<Vec<Product>>, MerchantError> {
        Ok(self.scoped()?.list(filter))
    }

    /// Create a product and notify the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::NotRegistered`] outside `Registered`,
    /// otherwise see [`ProductCatalog::create`].
    pub async fn create_product(&mut self, form: &ProductForm) -> Result<Product, MerchantError> {
        let result = match self.scoped() {
            Ok(catalog) => catalog.create(form).await,
            Err(err) => Err(err),
        };
        self.notify(Action::CreateProduct, &result);
        result
    }

    /// Update a product and notify the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::NotRegistered`] outside `Registered`,
    /// otherwise see [`ProductCatalog::update`].
    pub async fn update_product(
        &mut self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, MerchantError> {
        let result = match self.scoped() {
            Ok(catalog) => catalog.update(id, patch).await,
            Err(err) => Err(err),
        };
        self.notify(Action::UpdateProduct, &result);
        result
    }

    /// Soft-delete a product after confirmation and notify the outcome.
    ///
    /// A declined prompt issues no mutation and no notification.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::NotRegistered`] outside `Registered`,
    /// otherwise see [`ProductCatalog::deactivate`].
    pub async fn delete_product(
        &mut self,
        id: ProductId,
        confirm: &dyn Confirm,
    ) -> Result<Product, MerchantError> {
        let result = match self.scoped() {
            Ok(catalog) => catalog.deactivate(id, confirm).await,
            Err(err) => Err(err),
        };
        self.notify(Action::DeleteProduct, &result);
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use itiza_core::{Email, WalletPublicKey};

    use super::*;
    use crate::services::identity::WalletAdapter;
    use crate::services::notifications::NotificationLog;
    use crate::store::{MemoryStore, StoreError};

    fn wallet(seed: u8) -> WalletAddress {
        WalletPublicKey::from([seed; 32]).to_address().unwrap()
    }

    fn merchant(seed: u8) -> Merchant {
        Merchant {
            id: MerchantId::generate(),
            wallet_address: wallet(seed),
            business_name: "Rose Garden".to_owned(),
            business_address: "9 Petal Way".to_owned(),
            email: Email::parse("roses@example.com").unwrap(),
            created_at: Utc::now(),
        }
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            business_name: "Rose Garden".to_owned(),
            business_address: "9 Petal Way".to_owned(),
            email: "roses@example.com".to_owned(),
        }
    }

    // Controller

    #[test]
    fn test_connect_starts_resolving() {
        let mut controller = DashboardController::new();
        assert!(controller.on_identity(&Identity::Connected(wallet(1))));
        assert_eq!(
            controller.state(),
            &DashboardState::ResolvingIdentity { wallet: wallet(1) }
        );
        assert!(!controller.on_identity(&Identity::Connected(wallet(1))));
    }

    #[test]
    fn test_pending_lookup_stays_resolving() {
        let mut controller = DashboardController::new();
        controller.on_identity(&Identity::Connected(wallet(1)));
        controller.on_lookup(&QueryState::Loading).unwrap();
        assert!(matches!(
            controller.state(),
            DashboardState::ResolvingIdentity { .. }
        ));
        assert!(controller.merchant_scope().is_none());
    }

    #[test]
    fn test_absent_lookup_is_unregistered() {
        let mut controller = DashboardController::new();
        controller.on_identity(&Identity::Connected(wallet(1)));
        controller.on_lookup(&QueryState::Ready(None)).unwrap();
        assert_eq!(
            controller.state(),
            &DashboardState::Unregistered { wallet: wallet(1) }
        );
    }

    #[test]
    fn test_registration_round_trip() {
        let mut controller = DashboardController::new();
        controller.on_identity(&Identity::Connected(wallet(1)));
        controller.on_lookup(&QueryState::Ready(None)).unwrap();

        assert_eq!(controller.begin_registration().unwrap(), wallet(1));
        assert!(controller.begin_registration().is_err());

        let m = merchant(1);
        controller.registration_succeeded(m.clone());
        assert_eq!(controller.merchant_scope().unwrap().merchant_id(), m.id);

        // A late absent delivery does not demote a registered dashboard.
        controller.on_lookup(&QueryState::Ready(None)).unwrap();
        assert!(matches!(controller.state(), DashboardState::Registered { .. }));
    }

    #[test]
    fn test_failed_registration_returns_to_form() {
        let mut controller = DashboardController::new();
        controller.on_identity(&Identity::Connected(wallet(1)));
        controller.on_lookup(&QueryState::Ready(None)).unwrap();
        controller.begin_registration().unwrap();

        controller.registration_failed();
        assert_eq!(
            controller.state(),
            &DashboardState::Unregistered { wallet: wallet(1) }
        );
    }

    #[test]
    fn test_lookup_ignores_other_merchant() {
        let mut controller = DashboardController::new();
        let m = merchant(1);
        controller.on_identity(&Identity::Connected(wallet(1)));
        controller.on_lookup(&QueryState::Ready(Some(m.clone()))).unwrap();

        let impostor = Merchant {
            id: MerchantId::generate(),
            ..m.clone()
        };
        controller.on_lookup(&QueryState::Ready(Some(impostor))).unwrap();
        assert_eq!(controller.state(), &DashboardState::Registered { merchant: m });
    }

    #[test]
    fn test_failed_lookup_keeps_state() {
        let mut controller = DashboardController::new();
        controller.on_identity(&Identity::Connected(wallet(1)));
        let err = controller
            .on_lookup(&QueryState::Failed(StoreError::Unavailable("down".to_owned())))
            .unwrap_err();
        assert!(err.is_store_failure());
        assert!(matches!(
            controller.state(),
            DashboardState::ResolvingIdentity { .. }
        ));
    }

    #[test]
    fn test_begin_registration_needs_wallet() {
        let mut controller = DashboardController::new();
        assert_eq!(
            controller.begin_registration().unwrap_err(),
            MerchantError::IdentityMissing
        );
    }

    #[test]
    fn test_switching_wallet_re_resolves() {
        let mut controller = DashboardController::new();
        controller.on_identity(&Identity::Connected(wallet(1)));
        controller.on_lookup(&QueryState::Ready(Some(merchant(1)))).unwrap();

        assert!(controller.on_identity(&Identity::Connected(wallet(2))));
        assert_eq!(
            controller.state(),
            &DashboardState::ResolvingIdentity { wallet: wallet(2) }
        );
    }

    // Session

    struct Harness {
        adapter: WalletAdapter,
        log: Arc<NotificationLog>,
        session: DashboardSession,
    }

    fn harness() -> Harness {
        let adapter = WalletAdapter::new();
        let log = Arc::new(NotificationLog::new());
        let session = DashboardSession::new(
            adapter.resolver(),
            Arc::new(MemoryStore::new()),
            Arc::clone(&log) as Arc<dyn NotificationSink>,
        );
        Harness {
            adapter,
            log,
            session,
        }
    }

    #[tokio::test]
    async fn test_session_registers_once() {
        let mut h = harness();
        assert_eq!(h.session.state(), &DashboardState::Disconnected);

        h.adapter.connect(WalletPublicKey::from([1u8; 32]));
        assert_eq!(
            h.session.settle().await.unwrap(),
            &DashboardState::Unregistered { wallet: wallet(1) }
        );

        let merchant = h.session.register(&form()).await.unwrap();
        assert_eq!(
            h.session.state(),
            &DashboardState::Registered {
                merchant: merchant.clone()
            }
        );

        let notes = h.log.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].description, "Your merchant account has been created.");
    }

    #[tokio::test]
    async fn test_session_reconnect_restores_registration() {
        let mut h = harness();
        h.adapter.connect(WalletPublicKey::from([1u8; 32]));
        h.session.settle().await.unwrap();
        let merchant = h.session.register(&form()).await.unwrap();

        h.adapter.disconnect();
        assert_eq!(h.session.sync(), &DashboardState::Disconnected);
        assert!(h.session.catalog().is_none());

        h.adapter.connect(WalletPublicKey::from([1u8; 32]));
        assert_eq!(
            h.session.settle().await.unwrap(),
            &DashboardState::Registered { merchant }
        );
    }

    #[tokio::test]
    async fn test_session_catalog_requires_registration() {
        let mut h = harness();
        h.adapter.connect(WalletPublicKey::from([1u8; 32]));
        h.session.settle().await.unwrap();

        let form = ProductForm::default();
        assert_eq!(
            h.session.create_product(&form).await.unwrap_err(),
            MerchantError::NotRegistered
        );
        assert!(h.session.products(ActivityFilter::All).is_err());
    }

    #[tokio::test]
    async fn test_session_register_without_wallet() {
        let mut h = harness();
        assert_eq!(
            h.session.register(&form()).await.unwrap_err(),
            MerchantError::IdentityMissing
        );
        let notes = h.log.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].description, "Please connect your wallet first");
    }
}
