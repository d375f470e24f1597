//! Application state controller.
//!
//! [`AppState`] owns every repository and is the only thing front-ends
//! mutate. Lifecycle is load, run, [`AppState::shutdown`]. Each mutation
//! changes the in-memory entity and immediately rewrites it to the store; a
//! failed write is logged and the in-memory state is kept.

use rand::Rng;

use customshop_core::{IdGenerator, OrderId, Price, ProductId};

use crate::assistant::{Assistant, TextGenerator};
use crate::config::ShopConfig;
use crate::db::{
    CatalogRepository, OrderRepository, RepositoryError, SessionRepository, SettingsRepository,
    UserRepository, log_store_failure,
};
use crate::error::AppError;
use crate::models::{Order, Product, RegisteredUser, SettingsPatch, SiteSettings, User, ViewMode};
use crate::services::auth::{AuthService, RegistrationForm, resolve_admin};
use crate::services::forms::{CheckoutForm, ProductDraft, ProductForm};
use crate::services::orders::OrderService;
use crate::store::Storage;
use crate::surface::{Surface, SurfaceGate, Ticket};

/// A product form waiting on its generated description.
#[derive(Debug)]
pub struct PendingProduct {
    ticket: Ticket,
    draft: ProductDraft,
}

impl PendingProduct {
    /// The validated form.
    #[must_use]
    pub const fn draft(&self) -> &ProductDraft {
        &self.draft
    }
}

/// The storefront's in-memory state.
#[derive(Debug)]
pub struct AppState {
    storage: Storage,
    admin_email: String,
    catalog: CatalogRepository,
    orders: OrderRepository,
    settings: SettingsRepository,
    session: SessionRepository,
    users: UserRepository,
    view_mode: ViewMode,
    ids: IdGenerator,
    surfaces: SurfaceGate,
}

impl AppState {
    /// Hydrate every entity from `storage`.
    ///
    /// Never fails: anything missing or malformed falls back to its default.
    #[must_use]
    pub fn load(storage: Storage, config: &ShopConfig) -> Self {
        let mut state = Self {
            catalog: CatalogRepository::load(storage.clone(), config.catalog_seed),
            orders: OrderRepository::load(storage.clone()),
            settings: SettingsRepository::load(storage.clone()),
            session: SessionRepository::load(storage.clone()),
            users: UserRepository::load(storage.clone()),
            storage,
            admin_email: config.admin_email.clone(),
            view_mode: ViewMode::Customer,
            ids: IdGenerator::new(),
            surfaces: SurfaceGate::new(),
        };
        state.sync_view_mode();

        tracing::info!(
            products = state.catalog.len(),
            orders = state.orders.list().len(),
            logged_in = state.session.current().is_some(),
            "storefront state loaded"
        );
        state
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Catalog, newest first.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.catalog.list()
    }

    /// Look up a product.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        self.orders.list()
    }

    /// Effective site settings.
    #[must_use]
    pub const fn settings(&self) -> &SiteSettings {
        self.settings.current()
    }

    /// The logged-in user.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// Registered accounts.
    #[must_use]
    pub fn registered_users(&self) -> &[RegisteredUser] {
        self.users.list()
    }

    /// Current view mode.
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Whether the logged-in user is the administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        resolve_admin(self.session.current(), &self.admin_email)
    }

    /// Sum of all order prices.
    #[must_use]
    pub fn total_revenue(&self) -> Price {
        self.orders.total_revenue()
    }

    /// Busy tracking for assistant-backed surfaces.
    #[must_use]
    pub const fn surfaces(&self) -> &SurfaceGate {
        &self.surfaces
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Prepend a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Repository` if the id is already used.
    pub fn add_product(&mut self, product: Product) -> Result<(), AppError> {
        log_store_failure("products", self.catalog.add(product))?;
        Ok(())
    }

    /// Replace a product by id. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Currently never fails; write failures are logged.
    pub fn update_product(&mut self, product: Product) -> Result<bool, AppError> {
        let existed = self.catalog.contains(product.id.as_str());
        log_store_failure("products", self.catalog.update(product).map(drop))?;
        Ok(existed)
    }

    /// Delete a product by id. Returns whether it existed.
    ///
    /// Orders that reference it keep their snapshot.
    ///
    /// # Errors
    ///
    /// Currently never fails; write failures are logged.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<bool, AppError> {
        let existed = self.catalog.contains(id.as_str());
        log_store_failure("products", self.catalog.delete(id).map(drop))?;
        Ok(existed)
    }

    /// Validate the product form and mark the form surface busy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Form` if the form is invalid and `AppError::Busy`
    /// while a previous product is still being described.
    pub fn begin_product_creation(&self, form: &ProductForm) -> Result<PendingProduct, AppError> {
        let draft = form.validate()?;
        let ticket = self
            .surfaces
            .begin(Surface::ProductForm)
            .ok_or(AppError::Busy(Surface::ProductForm))?;
        Ok(PendingProduct { ticket, draft })
    }

    /// Add the pending product with its generated description.
    ///
    /// Returns `None`, adding nothing, if the form was closed while the
    /// description was being generated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Repository` if the product cannot be added.
    pub fn finish_product_creation(
        &mut self,
        pending: PendingProduct,
        description: String,
    ) -> Result<Option<Product>, AppError> {
        let Some(draft) = self.surfaces.complete(pending.ticket, pending.draft) else {
            return Ok(None);
        };

        let catalog = &self.catalog;
        let id: ProductId = self.ids.next_unique(|candidate| catalog.contains(candidate));
        let product = draft.into_product(id, description);
        self.add_product(product.clone())?;
        tracing::info!(product_id = %product.id, title = %product.title, "product created");
        Ok(Some(product))
    }

    /// Validate the form, generate a description, and prepend the product.
    ///
    /// # Errors
    ///
    /// Same as [`AppState::begin_product_creation`] and
    /// [`AppState::finish_product_creation`].
    pub async fn create_product<G: TextGenerator>(
        &mut self,
        form: &ProductForm,
        assistant: &Assistant<G>,
    ) -> Result<Option<Product>, AppError> {
        let pending = self.begin_product_creation(form)?;
        let description = assistant
            .describe_product(&pending.draft.title, &pending.draft.category)
            .await;
        self.finish_product_creation(pending, description)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Prepend an order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Repository` if the id is already used.
    pub fn add_order(&mut self, order: Order) -> Result<(), AppError> {
        log_store_failure("orders", self.orders.add(order))?;
        Ok(())
    }

    /// Delete an order by id. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Currently never fails; write failures are logged.
    pub fn delete_order(&mut self, id: &OrderId) -> Result<bool, AppError> {
        let existed = self.orders.contains(id.as_str());
        log_store_failure("orders", self.orders.delete(id).map(drop))?;
        Ok(existed)
    }

    /// Place an order for a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Order` if the product is gone or the form is
    /// invalid.
    pub fn checkout(&mut self, product_id: &ProductId, form: &CheckoutForm) -> Result<Order, AppError> {
        let order = OrderService::new(&self.catalog, &mut self.orders, &self.ids).checkout(product_id, form)?;
        Ok(order)
    }

    /// Record a made-up order for a random product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Order` if the catalog is empty.
    pub fn simulate_sale<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Order, AppError> {
        let order = OrderService::new(&self.catalog, &mut self.orders, &self.ids).simulate_sale(rng)?;
        Ok(order)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Merge a settings patch.
    ///
    /// # Errors
    ///
    /// Currently never fails; write failures are logged.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<(), AppError> {
        log_store_failure("settings", self.settings.update(patch))?;
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` if the credentials are rejected; the session
    /// is unchanged.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AppError> {
        let user = AuthService::new(&mut self.users, &self.admin_email).login(email, password)?;
        self.start_session(user)
    }

    /// Register an account and log it in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` if registration is rejected; nothing changes.
    pub fn register(&mut self, form: &RegistrationForm) -> Result<&User, AppError> {
        let user = AuthService::new(&mut self.users, &self.admin_email).register(form)?;
        self.start_session(user)
    }

    /// Log out.
    ///
    /// # Errors
    ///
    /// Currently never fails; write failures are logged.
    pub fn logout(&mut self) -> Result<(), AppError> {
        if let Some(user) = self.session.current() {
            tracing::info!(email = %user.email, "logged out");
        }
        log_store_failure("session", self.session.clear())?;
        self.sync_view_mode();
        Ok(())
    }

    /// Switch between the customer and admin views.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` if a non-administrator asks for the
    /// admin view.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<(), AppError> {
        if mode == ViewMode::Admin && !self.is_admin() {
            return Err(AppError::Forbidden("admin view requires the administrator"));
        }
        self.view_mode = mode;
        Ok(())
    }

    fn start_session(&mut self, user: User) -> Result<&User, AppError> {
        log_store_failure("session", self.session.set(user))?;
        self.sync_view_mode();
        self.session
            .current()
            .ok_or(AppError::Forbidden("session was not established"))
    }

    /// Administrators land on the admin view; everyone else on the shop.
    fn sync_view_mode(&mut self) {
        self.view_mode = if self.is_admin() {
            ViewMode::Admin
        } else {
            ViewMode::Customer
        };
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Ask the shop assistant a question.
    ///
    /// Returns `None` for a blank message, or when the chat was closed
    /// before the reply arrived.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` while a previous message is unanswered.
    pub async fn send_chat<G: TextGenerator>(
        &self,
        message: &str,
        assistant: &Assistant<G>,
    ) -> Result<Option<String>, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(None);
        }
        let ticket = self
            .surfaces
            .begin(Surface::Chat)
            .ok_or(AppError::Busy(Surface::Chat))?;

        let reply = assistant
            .chat_reply(message, self.catalog.list(), &self.settings.current().shop_name)
            .await;
        Ok(self.surfaces.complete(ticket, reply))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Write every entity and flush the store.
    ///
    /// # Errors
    ///
    /// Returns the first write or flush failure; later writes are still
    /// attempted.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let results: [Result<(), RepositoryError>; 5] = [
            self.catalog.persist(),
            self.orders.persist(),
            self.settings.persist(),
            self.session.persist(),
            self.users.persist(),
        ];

        let mut first_error: Option<AppError> = None;
        for result in results {
            if let Err(e) = result {
                tracing::error!(error = %e, "failed to persist on shutdown");
                first_error.get_or_insert(e.into());
            }
        }
        if let Err(e) = self.storage.flush() {
            tracing::error!(error = %e, "failed to flush store on shutdown");
            first_error.get_or_insert(e.into());
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::info!("storefront state saved");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::assistant::{AssistantError, ConfiguredGenerator, FALLBACK_DESCRIPTION, GenerationRequest};
    use crate::db::{CatalogSeed, keys};
    use crate::store::MemoryStore;

    const ADMIN: &str = "admin@shop.com";

    struct Echo;

    impl TextGenerator for Echo {
        async fn generate(&self, request: GenerationRequest) -> Result<String, AssistantError> {
            Ok(format!("re: {}", request.prompt.len()))
        }
    }

    /// Never answers.
    struct Stall;

    impl TextGenerator for Stall {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, AssistantError> {
            std::future::pending().await
        }
    }

    fn config(seed: CatalogSeed) -> ShopConfig {
        ShopConfig {
            admin_email: ADMIN.to_owned(),
            catalog_seed: seed,
            ..ShopConfig::default()
        }
    }

    fn state_with(store: &Arc<MemoryStore>, seed: CatalogSeed) -> AppState {
        AppState::load(Storage::shared(store.clone()), &config(seed))
    }

    fn registration(email: &str) -> RegistrationForm {
        RegistrationForm {
            username: String::new(),
            email: email.to_owned(),
            password: "pass".to_owned(),
        }
    }

    fn product_form(title: &str) -> ProductForm {
        ProductForm {
            title: title.to_owned(),
            price: "10".to_owned(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_fresh_state() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(&store, CatalogSeed::Example);
        assert_eq!(state.products().len(), 1);
        assert!(state.orders().is_empty());
        assert!(state.current_user().is_none());
        assert_eq!(state.view_mode(), ViewMode::Customer);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_admin_registration_switches_to_admin_view() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Example);
        let user = state.register(&registration(" Admin@Shop.com ")).unwrap();
        assert_eq!(user.username, "Administrator");
        assert!(state.is_admin());
        assert_eq!(state.view_mode(), ViewMode::Admin);

        state.logout().unwrap();
        assert_eq!(state.view_mode(), ViewMode::Customer);
        assert!(!state.is_admin());
    }

    #[test]
    fn test_persisted_admin_session_loads_in_admin_view() {
        let store = Arc::new(MemoryStore::new());
        state_with(&store, CatalogSeed::Example)
            .register(&registration(ADMIN))
            .unwrap();

        let reloaded = state_with(&store, CatalogSeed::Example);
        assert_eq!(reloaded.view_mode(), ViewMode::Admin);
    }

    #[test]
    fn test_customer_cannot_switch_to_admin() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Example);
        state.register(&registration("jane@example.com")).unwrap();

        let err = state.set_view_mode(ViewMode::Admin).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(state.view_mode(), ViewMode::Customer);
    }

    #[test]
    fn test_admin_can_toggle_views() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Example);
        state.register(&registration(ADMIN)).unwrap();
        state.set_view_mode(ViewMode::Customer).unwrap();
        assert_eq!(state.view_mode(), ViewMode::Customer);
        state.set_view_mode(ViewMode::Admin).unwrap();
        assert_eq!(state.view_mode(), ViewMode::Admin);
    }

    #[test]
    fn test_failed_login_changes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Example);
        let err = state.login("ghost@example.com", "pass").unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
        assert!(state.current_user().is_none());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_each_mutation_writes_once() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Empty);
        let mut rng = StdRng::seed_from_u64(11);

        let pending = state.begin_product_creation(&product_form("Lamp")).unwrap();
        let lamp = state
            .finish_product_creation(pending, "Bright.".to_owned())
            .unwrap()
            .unwrap();
        let mut renamed = lamp.clone();
        renamed.title = "Desk Lamp".to_owned();
        state.update_product(renamed).unwrap();
        let order = state.simulate_sale(&mut rng).unwrap();
        state
            .update_settings(SettingsPatch {
                shop_name: Some("Lumen".to_owned()),
                ..SettingsPatch::default()
            })
            .unwrap();
        state.delete_order(&order.id).unwrap();
        state.delete_product(&lamp.id).unwrap();

        assert_eq!(store.writes(), 6);
    }

    #[test]
    fn test_deleting_product_keeps_order_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Example);
        let form = CheckoutForm {
            name: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
            address: "1 Main St".to_owned(),
        };
        let order = state.checkout(&ProductId::new("1"), &form).unwrap();
        assert!(state.delete_product(&ProductId::new("1")).unwrap());

        assert_eq!(state.orders()[0], order);
        assert_eq!(state.orders()[0].product_title, "Example Product");
        assert_eq!(state.total_revenue(), Product::example().price);
    }

    #[test]
    fn test_simulate_sale_on_empty_catalog() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Empty);
        let err = state.simulate_sale(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err.user_message(), "Add at least one product to simulate a sale!");
        assert!(state.orders().is_empty());
    }

    #[tokio::test]
    async fn test_create_product_with_disabled_assistant() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Example);
        let assistant = Assistant::new(ConfiguredGenerator::Disabled);

        let product = state
            .create_product(&product_form("Vase"), &assistant)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.description, FALLBACK_DESCRIPTION);
        assert_eq!(state.products()[0], product);
        assert_eq!(state.products().len(), 2);
        assert!(!state.surfaces().is_busy(Surface::ProductForm));
    }

    #[test]
    fn test_product_form_is_busy_while_pending() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Empty);
        let pending = state.begin_product_creation(&product_form("A")).unwrap();
        assert!(matches!(
            state.begin_product_creation(&product_form("B")),
            Err(AppError::Busy(Surface::ProductForm))
        ));
        state.finish_product_creation(pending, String::new()).unwrap();
        assert!(state.begin_product_creation(&product_form("B")).is_ok());
    }

    #[test]
    fn test_invalid_form_does_not_occupy_surface() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(&store, CatalogSeed::Empty);
        assert!(matches!(
            state.begin_product_creation(&product_form(" ")),
            Err(AppError::Form(_))
        ));
        assert!(!state.surfaces().is_busy(Surface::ProductForm));
    }

    #[test]
    fn test_closed_form_discards_late_description() {
        let store = Arc::new(MemoryStore::new());
        let mut state = state_with(&store, CatalogSeed::Empty);
        let pending = state.begin_product_creation(&product_form("A")).unwrap();
        state.surfaces().close(Surface::ProductForm);

        assert!(state.finish_product_creation(pending, "late".to_owned()).unwrap().is_none());
        assert!(state.products().is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_discarded_pending_product_frees_form() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(&store, CatalogSeed::Empty);
        let pending = state.begin_product_creation(&product_form("A")).unwrap();
        drop(pending);
        assert!(!state.surfaces().is_busy(Surface::ProductForm));
        assert!(state.begin_product_creation(&product_form("B")).is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_chat_frees_surface() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(&store, CatalogSeed::Example);
        let assistant = Assistant::new(Stall);

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            state.send_chat("hello", &assistant),
        )
        .await;
        assert!(timed_out.is_err());
        assert!(!state.surfaces().is_busy(Surface::Chat));
    }

    #[tokio::test]
    async fn test_send_chat() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(&store, CatalogSeed::Example);
        let assistant = Assistant::new(Echo);

        assert_eq!(state.send_chat("   ", &assistant).await.unwrap(), None);
        assert_eq!(
            state.send_chat(" hello ", &assistant).await.unwrap().as_deref(),
            Some("re: 5")
        );
        assert!(!state.surfaces().is_busy(Surface::Chat));
    }

    #[test]
    fn test_shutdown_writes_every_entity() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(&store, CatalogSeed::Example);
        state.shutdown().unwrap();

        for key in [keys::PRODUCTS, keys::ORDERS, keys::SETTINGS, keys::REGISTERED_USERS] {
            assert!(store.raw(key).is_some(), "{key} not written");
        }
        assert!(store.raw(keys::SESSION).is_none());
    }
}
