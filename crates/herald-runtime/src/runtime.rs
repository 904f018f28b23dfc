//! The Herald runtime.
//!
//! [`HeraldRuntime`] owns the configuration and the registered controllers.
//! [`start`](HeraldRuntime::start) turns them into a [`Dispatcher`]: it
//! validates the configuration, aggregates the command schema, validates
//! every handler mapping, publishes the commands once and brings up the REST
//! endpoint. Afterwards inbound events are dispatched one tokio task each.
//!
//! ```rust,ignore
//! let mut runtime = HeraldRuntime::new();
//! runtime.register_controller(GeneralListener);
//! runtime.register_controller(FormListener);
//!
//! // Runs until the stream ends, Ctrl+C, SIGTERM or the shutdown token fires
//! runtime.run(client, events).await?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use futures::{Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use herald_core::{BoxedClient, InboundEvent};
use herald_framework::{
    BoxedController, CommandSchema, Controller, DispatchReport, Dispatcher, Registrar,
};

use crate::config::{ConfigLoader, ConfigResult, HeraldConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use crate::rest::{self, ClientSlot, RestState};

/// The Herald runtime.
pub struct HeraldRuntime {
    config: HeraldConfig,
    controllers: Vec<BoxedController>,
    started: AtomicBool,
    dispatcher: OnceLock<Arc<Dispatcher>>,
    client: ClientSlot,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl HeraldRuntime {
    /// Creates a runtime from the default configuration sources.
    ///
    /// Falls back to the built-in defaults if loading fails.
    pub fn new() -> Self {
        match RuntimeBuilder::new().build() {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}, using defaults");
                Self::from_config(HeraldConfig::default())
            }
        }
    }

    /// Returns a builder for custom configuration sources.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration and
    /// initializes logging from it.
    pub fn from_config(config: HeraldConfig) -> Self {
        logging::init_from_config(&config.logging);
        info!(
            publish = config.commands.publish,
            rest = config.rest.enabled,
            "Herald runtime created"
        );

        Self {
            config,
            controllers: Vec::new(),
            started: AtomicBool::new(false),
            dispatcher: OnceLock::new(),
            client: ClientSlot::default(),
            shutdown: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    /// Adds a controller. Controllers registered after `start` are ignored.
    pub fn register_controller<C: Controller + 'static>(&mut self, controller: C) -> &mut Self {
        self.register_boxed(Arc::new(controller))
    }

    /// Adds an already shared controller.
    pub fn register_boxed(&mut self, controller: BoxedController) -> &mut Self {
        if self.is_started() {
            warn!(
                controller = controller.name(),
                "Runtime already started, controller ignored"
            );
            return self;
        }
        debug!(controller = controller.name(), "Registered controller");
        self.controllers.push(controller);
        self
    }

    /// Number of registered controllers.
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Returns whether `start` completed successfully.
    pub fn is_started(&self) -> bool {
        self.dispatcher.get().is_some()
    }

    /// The dispatcher, once started.
    pub fn dispatcher(&self) -> Option<&Arc<Dispatcher>> {
        self.dispatcher.get()
    }

    /// A token that stops [`run`](Self::run) and the REST endpoint when
    /// cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Router of the REST endpoint, sharing this runtime's client handle.
    ///
    /// Answers `503` until the runtime is started.
    pub fn rest_router(&self) -> RuntimeResult<axum::Router> {
        validate_config(&self.config)?;
        Ok(rest::router(
            &self.config.rest.path,
            RestState::new(Arc::clone(&self.client), self.config.rest.message.as_str()),
        ))
    }

    /// Validates everything, publishes the command schema and makes the
    /// runtime ready to dispatch.
    ///
    /// Runs at most once; later calls fail with
    /// [`RuntimeError::AlreadyStarted`] without publishing again.
    pub async fn start(&self, client: BoxedClient) -> RuntimeResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Runtime is already started");
            return Err(RuntimeError::AlreadyStarted);
        }

        let result = self.start_inner(client).await;
        if let Err(e) = &result {
            error!(error = %e, "Failed to start runtime");
            self.started.store(false, Ordering::SeqCst);
        }
        result
    }

    async fn start_inner(&self, client: BoxedClient) -> RuntimeResult<()> {
        info!(controllers = self.controllers.len(), "Starting Herald runtime");

        validate_config(&self.config)?;

        let schema = CommandSchema::collect(&self.controllers)?;
        let mut registrar = Registrar::new();
        for controller in &self.controllers {
            registrar.register(controller.as_ref());
        }
        let dispatcher = Arc::new(registrar.build(&schema)?);
        info!(
            handlers = dispatcher.handler_count(),
            commands = schema.commands().len(),
            modals = schema.modals().len(),
            "Handlers validated"
        );

        // Bind before publishing commands
        let rest = if self.config.rest.enabled {
            let listener = TcpListener::bind(self.config.rest.bind_address()).await?;
            Some((listener, self.rest_router()?))
        } else {
            None
        };

        if self.config.commands.publish {
            let scope = self.config.commands.scope();
            client
                .publish_commands(scope, schema.commands())
                .await
                .map_err(RuntimeError::Publish)?;
            info!(?scope, count = schema.commands().len(), "Published commands");
        } else {
            debug!("Command publishing disabled");
        }

        *self.client.write() = Some(client);
        // `started` guards this, so the cell is always empty here
        let _ = self.dispatcher.set(dispatcher);

        if let Some((listener, router)) = rest {
            let shutdown = self.shutdown.clone();
            self.tasks.spawn(async move {
                if let Err(e) = rest::serve(listener, router, shutdown).await {
                    error!(error = %e, "REST endpoint failed");
                }
            });
        }

        info!("Runtime started");
        Ok(())
    }

    fn ready(&self) -> RuntimeResult<(Arc<Dispatcher>, BoxedClient)> {
        let dispatcher = self.dispatcher.get().ok_or(RuntimeError::NotStarted)?;
        let client = self.client.read().clone().ok_or(RuntimeError::NotStarted)?;
        Ok((Arc::clone(dispatcher), client))
    }

    /// Dispatches one event and waits for its handlers, not for their
    /// replies.
    pub async fn handle_event(&self, event: InboundEvent) -> RuntimeResult<DispatchReport> {
        let (dispatcher, client) = self.ready()?;
        Ok(dispatcher.dispatch(event, client).await)
    }

    /// Dispatches one event on its own task.
    pub fn spawn_event(&self, event: InboundEvent) -> RuntimeResult<()> {
        let (dispatcher, client) = self.ready()?;
        self.tasks.spawn(async move {
            dispatcher.dispatch(event, client).await;
        });
        Ok(())
    }

    /// Starts the runtime and dispatches `events` until the stream ends or a
    /// shutdown is requested, then waits for in-flight handlers.
    pub async fn run<S>(&self, client: BoxedClient, events: S) -> RuntimeResult<()>
    where
        S: Stream<Item = InboundEvent> + Send,
    {
        self.start(client).await?;
        info!("Herald runtime is now running. Press Ctrl+C to stop.");

        let mut events = std::pin::pin!(events);
        let signal = wait_for_shutdown_signal();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                _ = &mut signal => break,
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                next = events.next() => match next {
                    Some(event) => self.spawn_event(event)?,
                    None => {
                        info!("Event stream ended");
                        break;
                    }
                },
            }
        }

        self.stop().await;
        Ok(())
    }

    /// Cancels the shutdown token and waits for spawned tasks and the
    /// replies they issued.
    pub async fn stop(&self) {
        info!("Stopping Herald runtime");
        self.shutdown.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        if let Some(dispatcher) = self.dispatcher.get() {
            debug!(pending = dispatcher.pending_replies(), "Waiting for replies");
            dispatcher.flush_replies().await;
        }
        info!("Runtime stopped");
    }
}

impl Default for HeraldRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeraldRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeraldRuntime")
            .field("controllers", &self.controllers.len())
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}

/// Waits for Ctrl+C or SIGTERM.
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`HeraldRuntime`] with custom configuration sources.
///
/// ```rust,ignore
/// let runtime = HeraldRuntime::builder()
///     .config_file("config/herald.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir().with_user_config_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g. "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges configuration values programmatically, overriding files and
    /// environment variables.
    pub fn merge(mut self, config: HeraldConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> ConfigResult<HeraldRuntime> {
        let config = self.config_loader.load()?;
        Ok(HeraldRuntime::from_config(config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::testing::{Call, RecordingClient};
    use herald_core::{ApiError, CommandData, CommandScope, SlashCommand};
    use herald_framework::{Context, Mapping, RegistrationError};
    use serde_json::json;

    struct PingController;

    impl Controller for PingController {
        fn register(&self, registrar: &mut Registrar) {
            registrar.map(Mapping::id("ping"), |_ctx: Context<SlashCommand>| async {
                "pong"
            });
        }

        fn commands(&self) -> Vec<CommandData> {
            vec![CommandData::slash("ping", "Replies with pong")]
        }
    }

    struct BrokenController;

    impl Controller for BrokenController {
        fn register(&self, registrar: &mut Registrar) {
            registrar.map(Mapping::id("missing"), |_ctx: Context<SlashCommand>| async {});
        }
    }

    fn offline_config() -> HeraldConfig {
        let mut config = HeraldConfig::default();
        config.rest.enabled = false;
        config
    }

    fn runtime_with(config: HeraldConfig) -> HeraldRuntime {
        let mut runtime = HeraldRuntime::from_config(config);
        runtime.register_controller(PingController);
        runtime
    }

    fn ping_event(id: u64) -> InboundEvent {
        serde_json::from_value(json!({
            "type": "slash_command",
            "interaction": { "id": id, "token": "t", "user": { "id": 1, "name": "ada" } },
            "command": "ping"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_start_publishes_once() {
        let runtime = runtime_with(offline_config());
        let client = RecordingClient::new();

        runtime.start(client.boxed()).await.unwrap();
        let err = runtime.start(client.boxed()).await.unwrap_err();

        assert!(matches!(err, RuntimeError::AlreadyStarted));
        let published = client.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, CommandScope::Global);
        assert_eq!(published[0].1[0].name, "ping");
    }

    #[tokio::test]
    async fn test_guild_scoped_publish() {
        let mut config = offline_config();
        config.commands.guild_id = Some(99);
        let runtime = runtime_with(config);
        let client = RecordingClient::new();

        runtime.start(client.boxed()).await.unwrap();

        assert_eq!(client.published()[0].0, CommandScope::Guild(99));
    }

    #[tokio::test]
    async fn test_publish_disabled() {
        let mut config = offline_config();
        config.commands.publish = false;
        let runtime = runtime_with(config);
        let client = RecordingClient::new();

        runtime.start(client.boxed()).await.unwrap();

        assert!(client.published().is_empty());
        assert!(runtime.is_started());
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_runtime_stopped() {
        let runtime = runtime_with(offline_config());
        let client = RecordingClient::new().failing_publish();

        let err = runtime.start(client.boxed()).await.unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Publish(ApiError::Rejected { code: 50035, .. })
        ));
        assert!(!runtime.is_started());
        assert!(matches!(
            runtime.handle_event(ping_event(1)).await,
            Err(RuntimeError::NotStarted)
        ));
    }

    #[tokio::test]
    async fn test_registration_error_publishes_nothing() {
        let mut runtime = runtime_with(offline_config());
        runtime.register_controller(BrokenController);
        let client = RecordingClient::new();

        let err = runtime.start(client.boxed()).await.unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Registration(RegistrationError::UnknownIdentifier { .. })
        ));
        assert_eq!(client.count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_start() {
        let mut config = HeraldConfig::default();
        config.rest.path = "ping".into();
        let runtime = runtime_with(config);

        let err = runtime.start(RecordingClient::new().boxed()).await.unwrap_err();

        assert!(matches!(err, RuntimeError::Config(_)));
    }

    #[tokio::test]
    async fn test_route_pattern_path_is_a_config_error() {
        let mut config = HeraldConfig::default();
        config.rest.path = "/{broken".into();
        let runtime = runtime_with(config);

        assert!(matches!(
            runtime.rest_router(),
            Err(RuntimeError::Config(_))
        ));
        let err = runtime.start(RecordingClient::new().boxed()).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
        assert!(!runtime.is_started());
    }

    #[tokio::test]
    async fn test_handle_event_after_start() {
        let runtime = runtime_with(offline_config());
        let client = RecordingClient::new();
        runtime.start(client.boxed()).await.unwrap();

        let report = runtime.handle_event(ping_event(5)).await.unwrap();
        runtime.dispatcher().unwrap().flush_replies().await;

        assert_eq!(report.invoked, 1);
        assert_eq!(client.replies(), vec!["pong".to_string()]);
    }

    #[tokio::test]
    async fn test_run_until_stream_ends() {
        let runtime = runtime_with(offline_config());
        let client = RecordingClient::new();
        let events = futures::stream::iter(vec![ping_event(1), ping_event(2)]);

        runtime.run(client.boxed(), events).await.unwrap();

        let replies = client
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Reply { .. }))
            .count();
        assert_eq!(replies, 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_token() {
        let runtime = runtime_with(offline_config());
        let token = runtime.shutdown_token();
        token.cancel();

        let events = futures::stream::pending::<InboundEvent>();
        runtime
            .run(RecordingClient::new().boxed(), events)
            .await
            .unwrap();

        assert!(runtime.is_started());
    }

    #[tokio::test]
    async fn test_rest_router_shares_client() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let runtime = runtime_with(offline_config());
        let router = runtime.rest_router().unwrap();
        let request = || Request::builder().uri("/ping").body(Body::empty()).unwrap();

        let before = router.clone().oneshot(request()).await.unwrap();
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        runtime.start(RecordingClient::new().boxed()).await.unwrap();
        let after = router.oneshot(request()).await.unwrap();
        assert_eq!(after.status(), StatusCode::OK);
    }
}
