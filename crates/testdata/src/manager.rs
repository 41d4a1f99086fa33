//! Test-data lifecycle: generate, register, persist and clean up

use chrono::Utc;
use fixturekit_common::config::DataConfig;
use fixturekit_common::{
    generate_secure_password, CleanupStrategy, Error, FixtureConfig, PasswordOptions,
    SecureTokenCodec, SymmetricCipher,
};
use futures::FutureExt;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cleanup::{
    CleanupBackend, CleanupHook, CleanupReport, HookError, LoggingBackend, Registry,
};
use crate::entities::*;
use crate::error::{DataError, DataResult};
use crate::faker;
use crate::store::{fixture_path, DataStore, FileStore};

/// Sales tax applied to generated orders
pub const ORDER_TAX_RATE: f64 = 0.08;

/// Per-type counts over the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStatistics {
    pub counts: BTreeMap<String, usize>,
    pub total_generated: usize,
}

/// Generates synthetic entities and tears them down again.
///
/// Every `generate_*` call appends to an in-memory registry; only
/// [`TestDataManager::cleanup`] empties it.
pub struct TestDataManager {
    cipher: SymmetricCipher,
    tokens: SecureTokenCodec,
    store: Arc<dyn DataStore>,
    database: Box<dyn CleanupBackend>,
    api: Box<dyn CleanupBackend>,
    default_strategy: CleanupStrategy,
    encrypt_passwords: bool,
    registry: Registry,
    hooks: Vec<CleanupHook>,
    persisted: Vec<PathBuf>,
}

impl TestDataManager {
    /// Create a manager writing fixtures under `config.data_dir`
    pub fn new(cipher: SymmetricCipher, config: &DataConfig) -> Self {
        Self {
            tokens: SecureTokenCodec::new(cipher.clone()),
            cipher,
            store: Arc::new(FileStore::new(&config.data_dir)),
            database: Box::new(LoggingBackend::new("database")),
            api: Box::new(LoggingBackend::new("api")),
            default_strategy: config.cleanup_strategy,
            encrypt_passwords: config.encrypt_passwords,
            registry: Registry::new(),
            hooks: Vec::new(),
            persisted: Vec::new(),
        }
    }

    /// Create a manager from a full configuration, resolving the key
    pub fn from_config(config: &FixtureConfig) -> DataResult<Self> {
        Ok(Self::new(config.cipher()?, &config.data))
    }

    /// Replace the fixture store
    pub fn with_store(mut self, store: Arc<dyn DataStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace the database cleanup backend
    pub fn with_database_backend(mut self, backend: Box<dyn CleanupBackend>) -> Self {
        self.database = backend;
        self
    }

    /// Replace the API cleanup backend
    pub fn with_api_backend(mut self, backend: Box<dyn CleanupBackend>) -> Self {
        self.api = backend;
        self
    }

    pub fn cipher(&self) -> &SymmetricCipher {
        &self.cipher
    }

    pub fn tokens(&self) -> &SecureTokenCodec {
        &self.tokens
    }

    // -- generation --------------------------------------------------------

    /// Generate and register a user
    pub fn generate_user(&mut self, opts: &UserOptions) -> DataResult<User> {
        let user = self.build_user(opts)?;
        self.register(user.clone());
        Ok(user)
    }

    /// Generate and register `count` users
    pub fn generate_users(&mut self, count: usize, opts: &UserOptions) -> DataResult<Vec<User>> {
        (0..count).map(|_| self.generate_user(opts)).collect()
    }

    /// Generate and register a product
    pub fn generate_product(&mut self, opts: &ProductOptions) -> DataResult<Product> {
        let product = build_product(opts)?;
        self.register(product.clone());
        Ok(product)
    }

    /// Generate and register `count` products
    pub fn generate_products(
        &mut self,
        count: usize,
        opts: &ProductOptions,
    ) -> DataResult<Vec<Product>> {
        validate_price_range(opts)?;
        (0..count).map(|_| self.generate_product(opts)).collect()
    }

    /// Generate and register an order.
    ///
    /// Line items reference freshly generated products, which are registered
    /// too. Without `opts.user_id` the most recent user owns the order.
    pub fn generate_order(&mut self, opts: &OrderOptions) -> DataResult<Order> {
        if opts.item_count == 0 {
            return Err(Error::Validation("an order needs at least one item".to_string()).into());
        }
        let products = self.generate_products(opts.item_count, &opts.product)?;
        let user_id = opts
            .user_id
            .or_else(|| self.latest_user_id())
            .unwrap_or_else(Uuid::new_v4);

        let order = build_order(user_id, &products, opts);
        self.register(order.clone());
        Ok(order)
    }

    /// Generate and register a request fixture for `endpoint`
    pub fn generate_api_data(
        &mut self,
        endpoint: &str,
        opts: &ApiDataOptions,
    ) -> DataResult<ApiData> {
        let id = Uuid::new_v4();
        let method = opts.method.to_uppercase();

        let mut body = if matches!(method.as_str(), "GET" | "HEAD" | "DELETE") {
            Value::Null
        } else {
            self.api_body(endpoint)?
        };
        if !opts.overrides.is_empty() {
            if !body.is_object() {
                body = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(map) = &mut body {
                for (k, v) in &opts.overrides {
                    map.insert(k.clone(), v.clone());
                }
            }
        }

        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("X-Request-Id".to_string(), id.to_string());
        if opts.authenticated {
            let token = self.tokens.create_token(
                &json!({"endpoint": endpoint, "requestId": id}),
                opts.token_ttl_minutes,
            )?;
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        let api = ApiData {
            id,
            endpoint: endpoint.to_string(),
            method,
            headers,
            body,
            created_at: Utc::now(),
        };
        self.register(api.clone());
        Ok(api)
    }

    fn build_user(&self, opts: &UserOptions) -> DataResult<User> {
        let plain_password = match &opts.password {
            Some(password) => password.clone(),
            None => generate_secure_password(opts.password_length, &PasswordOptions::default())?,
        };
        let encrypt = opts.encrypt_password.unwrap_or(self.encrypt_passwords);
        let password = if encrypt {
            self.cipher.encrypt(&plain_password)?
        } else {
            plain_password.clone()
        };

        let first_name = faker::first_name();
        let last_name = faker::last_name();
        Ok(User {
            id: Uuid::new_v4(),
            email: faker::email(&first_name, &last_name, &opts.domain),
            username: faker::username(&first_name, &last_name),
            first_name,
            last_name,
            password,
            plain_password,
            password_encrypted: encrypt,
            role: opts.role.clone(),
            phone: faker::phone_number(),
            address: faker::address(),
            is_active: opts.is_active,
            created_at: Utc::now(),
        })
    }

    fn api_body(&self, endpoint: &str) -> DataResult<Value> {
        let resource = endpoint
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        let body = match resource.as_str() {
            "users" | "user" | "register" | "signup" => {
                let user = self.build_user(&UserOptions {
                    encrypt_password: Some(false),
                    ..UserOptions::default()
                })?;
                json!({
                    "firstName": user.first_name,
                    "lastName": user.last_name,
                    "email": user.email,
                    "username": user.username,
                    "password": user.plain_password,
                    "role": user.role,
                })
            }
            "products" | "product" => {
                let product = build_product(&ProductOptions::default())?;
                json!({
                    "name": product.name,
                    "description": product.description,
                    "category": product.category,
                    "sku": product.sku,
                    "price": product.price,
                    "stock": product.stock,
                })
            }
            "orders" | "order" => {
                let mut rng = rand::thread_rng();
                let items: Vec<Value> = (0..rng.gen_range(1..=3))
                    .map(|_| {
                        json!({"productId": Uuid::new_v4(), "quantity": rng.gen_range(1..=3)})
                    })
                    .collect();
                json!({
                    "userId": self.latest_user_id().unwrap_or_else(Uuid::new_v4),
                    "items": items,
                    "shippingAddress": faker::address(),
                })
            }
            _ => json!({
                "name": faker::sentence(2),
                "description": faker::sentence(8),
                "value": rand::thread_rng().gen_range(1..1000),
            }),
        };
        Ok(body)
    }

    // -- registry ----------------------------------------------------------

    fn register(&mut self, entity: impl Into<GeneratedEntity>) {
        let entity = entity.into();
        debug!(kind = entity.kind(), id = %entity.id(), "Registered generated entity");
        self.registry
            .entry(entity.kind().to_string())
            .or_default()
            .push(entity);
    }

    fn latest_user_id(&self) -> Option<Uuid> {
        self.registry
            .get(USERS)
            .and_then(|users| users.last())
            .map(GeneratedEntity::id)
    }

    /// Registered entities of one type, in generation order
    pub fn entities(&self, kind: &str) -> &[GeneratedEntity] {
        self.registry.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Counts per type plus the total
    pub fn get_data_statistics(&self) -> DataStatistics {
        let counts: BTreeMap<String, usize> = self
            .registry
            .iter()
            .map(|(kind, entities)| (kind.clone(), entities.len()))
            .collect();
        let total_generated = counts.values().sum();
        DataStatistics {
            counts,
            total_generated,
        }
    }

    // -- persistence -------------------------------------------------------

    /// Encrypt the sensitive fields of `value` and write it as a fixture
    pub async fn save_test_data(
        &mut self,
        category: &str,
        name: &str,
        value: &Value,
    ) -> DataResult<PathBuf> {
        let path = fixture_path(category, name)?;
        let encrypted = self.cipher.encrypt_sensitive_fields(value)?;
        self.store.write(&path, &encrypted).await?;

        if !self.persisted.contains(&path) {
            self.persisted.push(path.clone());
        }
        info!(category, name, "Saved test data");
        Ok(path)
    }

    /// Read a fixture and decrypt its sensitive fields
    pub async fn load_test_data(&self, category: &str, name: &str) -> DataResult<Value> {
        let path = fixture_path(category, name)?;
        let value = self.store.read(&path).await?;
        Ok(self.cipher.decrypt_sensitive_fields(&value))
    }

    /// Persist every registered entity of `kind` as one fixture
    pub async fn save_generated(&mut self, kind: &str, name: &str) -> DataResult<PathBuf> {
        if ![USERS, PRODUCTS, ORDERS, API_DATA].contains(&kind) {
            return Err(DataError::UnknownEntityType(kind.to_string()));
        }
        let value = serde_json::to_value(self.entities(kind))?;
        self.save_test_data(kind, name, &value).await
    }

    /// Fixture paths written since the last cleanup
    pub fn persisted_paths(&self) -> &[PathBuf] {
        &self.persisted
    }

    // -- cleanup -----------------------------------------------------------

    /// Append a hook run on every cleanup cycle, after the backends
    pub fn register_cleanup_hook<F, Fut>(&mut self, hook: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.hooks.push(Box::new(move || hook().boxed()));
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Resolve `auto` to the configured default
    pub fn resolve_strategy(&self, strategy: CleanupStrategy) -> CleanupStrategy {
        match (strategy, self.default_strategy) {
            (CleanupStrategy::Auto, CleanupStrategy::Auto) => CleanupStrategy::All,
            (CleanupStrategy::Auto, default) => default,
            (explicit, _) => explicit,
        }
    }

    /// Run a cleanup cycle.
    ///
    /// Backends selected by the strategy run first, then every hook in
    /// registration order. Failures are logged and counted but never stop
    /// the cycle, and the registry is always emptied at the end.
    pub async fn cleanup(&mut self, strategy: CleanupStrategy) -> CleanupReport {
        let strategy = self.resolve_strategy(strategy);
        let total = self.get_data_statistics().total_generated;
        info!(%strategy, entities = total, hooks = self.hooks.len(), "Starting cleanup");

        let mut report = CleanupReport {
            strategy,
            ..CleanupReport::default()
        };

        if matches!(strategy, CleanupStrategy::Database | CleanupStrategy::All) {
            run_backend(self.database.as_ref(), &self.registry, &mut report).await;
        }
        if matches!(strategy, CleanupStrategy::Api | CleanupStrategy::All) {
            run_backend(self.api.as_ref(), &self.registry, &mut report).await;
        }
        if matches!(strategy, CleanupStrategy::File | CleanupStrategy::All) {
            self.cleanup_files(&mut report).await;
        }

        for (index, hook) in self.hooks.iter().enumerate() {
            report.hook_count += 1;
            // A panicking hook counts as a failure like any other
            let outcome = match std::panic::catch_unwind(AssertUnwindSafe(|| hook())) {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(panic) => Err(panic),
            };
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    report.hook_failures += 1;
                    warn!(hook = index, "Cleanup hook failed: {}", e);
                }
                Err(_) => {
                    report.hook_failures += 1;
                    warn!(hook = index, "Cleanup hook panicked");
                }
            }
        }

        report.entities_cleared = total;
        self.registry.clear();

        info!(
            backends = report.backends.len(),
            hook_failures = report.hook_failures,
            "Cleanup complete"
        );
        report
    }

    async fn cleanup_files(&mut self, report: &mut CleanupReport) {
        report.backends.push("file".to_string());
        let paths = std::mem::take(&mut self.persisted);
        for path in paths {
            if let Err(e) = self.store.remove(&path).await {
                warn!("Failed to remove fixture {:?}: {}", path, e);
                // kept so the next file cleanup retries it
                self.persisted.push(path);
            }
        }
        if !self.persisted.is_empty() {
            report.backend_failures.push("file".to_string());
        }
    }
}

async fn run_backend(
    backend: &dyn CleanupBackend,
    registry: &Registry,
    report: &mut CleanupReport,
) {
    let name = backend.name().to_string();
    match AssertUnwindSafe(backend.cleanup(registry)).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(backend = %name, "Cleanup backend failed: {}", e);
            report.backend_failures.push(name.clone());
        }
        Err(_) => {
            warn!(backend = %name, "Cleanup backend panicked");
            report.backend_failures.push(name.clone());
        }
    }
    report.backends.push(name);
}

/// Price bounds must be finite and span a finite range
fn validate_price_range(opts: &ProductOptions) -> DataResult<()> {
    let (min, max) = (opts.min_price, opts.max_price);
    if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
        return Err(Error::Validation(format!(
            "price range must be finite, got {} to {}",
            min, max
        ))
        .into());
    }
    Ok(())
}

fn build_product(opts: &ProductOptions) -> DataResult<Product> {
    validate_price_range(opts)?;
    let category = opts
        .category
        .clone()
        .unwrap_or_else(faker::product_category);
    let stock = if opts.in_stock {
        rand::thread_rng().gen_range(1..=500)
    } else {
        0
    };
    Ok(Product {
        id: Uuid::new_v4(),
        name: faker::product_name(),
        description: faker::sentence(10),
        sku: faker::sku(&category),
        category,
        price: faker::price(opts.min_price, opts.max_price),
        stock,
        in_stock: stock > 0,
        created_at: Utc::now(),
    })
}

fn build_order(user_id: Uuid, products: &[Product], opts: &OrderOptions) -> Order {
    let mut rng = rand::thread_rng();
    let items: Vec<OrderItem> = products
        .iter()
        .map(|product| {
            let quantity = rng.gen_range(1..=opts.max_quantity.max(1));
            OrderItem {
                product_id: product.id,
                name: product.name.clone(),
                quantity,
                unit_price: product.price,
                line_total: faker::round_cents(product.price * f64::from(quantity)),
            }
        })
        .collect();

    let subtotal = faker::round_cents(items.iter().map(|i| i.line_total).sum());
    let tax = faker::round_cents(subtotal * ORDER_TAX_RATE);
    Order {
        id: Uuid::new_v4(),
        user_id,
        items,
        subtotal,
        tax,
        total: faker::round_cents(subtotal + tax),
        status: opts.status,
        shipping_address: faker::address(),
        created_at: Utc::now(),
    }
}
