//! # Bootstrap
//!
//! One-time process wiring: the failure sink, the robots, the HTTP surface.
//!
//! ## Lifecycle
//!
//! ```text
//! Hookbot::new(config)
//!   ├── with_failure_sink / with_plugin   (optional)
//!   ├── setup(extra plugins)
//!   │     ├── install unhandled-failure sink (process-wide panic hook)
//!   │     ├── load built-ins: stats, default
//!   │     └── load extras, in order
//!   └── start()  → axum server until ctrl-c
//! ```
//!
//! The registry and sink belong to the [`Hookbot`] instance, so tests can run
//! isolated instances side by side. The panic hook is the only process-global
//! piece; it forwards to the sink of the most recent `setup`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cache::SharedCache;
use crate::config::HookbotConfig;
use crate::credentials::AppCredentials;
use crate::dispatch::{
    install_unhandled_failure_sink, DispatchResult, Dispatcher, FailureSink, TracingFailureSink,
};
use crate::error::HookbotResult;
use crate::events::{normalize, InboundEvent};
use crate::logging::{log_error, log_registry_operation};
use crate::plugins::BUILTIN_PLUGINS;
use crate::registry::{HandlerRegistry, PluginLoader, PluginSource};
use crate::robot::{Robot, RobotContext};
use crate::web::{create_app, AppState};

/// Handle owning one application's robots and failure sink
pub struct Hookbot {
    config: HookbotConfig,
    registry: Arc<HandlerRegistry>,
    sink: Arc<dyn FailureSink>,
    loader: PluginLoader,
    context: RobotContext,
    routes: Mutex<Vec<Router>>,
}

impl Hookbot {
    /// Validate `config` and prepare an empty application.
    ///
    /// Fails if the configuration is invalid or a configured private key
    /// file cannot be read.
    pub fn new(config: HookbotConfig) -> HookbotResult<Self> {
        config.validate()?;
        let credentials = AppCredentials::from_config(&config)?;
        let cache = SharedCache::new(config.cache_ttl());
        let context = RobotContext::new(cache, Arc::new(credentials));

        Ok(Self {
            config,
            registry: Arc::new(HandlerRegistry::new()),
            sink: Arc::new(TracingFailureSink),
            loader: PluginLoader::with_builtins(),
            context,
            routes: Mutex::new(Vec::new()),
        })
    }

    /// Replace the default tracing sink
    pub fn with_failure_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Make an additional named plugin loadable
    pub fn with_plugin<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&RobotContext) -> anyhow::Result<Arc<dyn Robot>> + Send + Sync + 'static,
    {
        self.loader = self.loader.with_plugin(name, factory);
        self
    }

    pub fn config(&self) -> &HookbotConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    pub fn context(&self) -> &RobotContext {
        &self.context
    }

    pub fn failure_sink(&self) -> &Arc<dyn FailureSink> {
        &self.sink
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.registry.clone(), self.sink.clone())
    }

    /// Install the unhandled-failure sink, then load the built-in robots
    /// followed by `extra`, in order.
    ///
    /// Call once. A second call registers every robot again.
    pub fn setup<I, S>(&self, extra: I) -> HookbotResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<PluginSource>,
    {
        install_unhandled_failure_sink(self.sink.clone());

        let builtins = BUILTIN_PLUGINS.iter().map(|name| PluginSource::named(*name));
        let extras = extra.into_iter().map(Into::into);
        for source in builtins.chain(extras) {
            self.load(source)?;
        }

        info!(robots = ?self.registry.names(), "🤖 Setup complete");
        Ok(())
    }

    /// Load one plugin source, register its robot and mount its routes
    pub fn load(&self, source: impl Into<PluginSource>) -> HookbotResult<Arc<dyn Robot>> {
        let source = source.into();
        let robot = self.loader.load(&source, &self.context).inspect_err(|e| {
            log_registry_operation("load", source.name(), None, "failed", Some(e.to_string().as_str()));
        })?;

        if let Some(routes) = robot.routes() {
            self.routes.lock().push(routes);
        }

        Ok(self.registry.register(source.name(), robot))
    }

    /// Normalize a raw record and dispatch it to every robot
    pub async fn receive(&self, raw: impl Into<InboundEvent>) -> DispatchResult {
        let event = normalize(raw.into());
        self.dispatcher().dispatch(&event).await
    }

    /// HTTP surface: the webhook route plus every loaded robot's routes
    pub fn router(&self) -> Router {
        let state = AppState::new(
            self.dispatcher(),
            self.sink.clone(),
            self.config.webhook_secret.as_str(),
        );
        create_app(state, &self.config.webhook_path, self.routes.lock().clone())
    }

    /// Serve on the configured port until ctrl-c
    pub async fn start(&self) -> HookbotResult<()> {
        let address = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(address).await?;

        info!(
            address = %address,
            webhook_path = %self.config.webhook_path,
            "🚀 Listening for webhooks"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            log_error("bootstrap", "shutdown_signal", &e.to_string(), None);
            warn!("Ctrl-c handler unavailable; serving until the process is killed");
            std::future::pending::<()>().await;
        }
    }
}

impl std::fmt::Debug for Hookbot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hookbot")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}
