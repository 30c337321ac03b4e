use crate::comment_thread::CommentThreadManager;
use crate::configuration::{Configuration, DatabaseConfigs};
use crate::notifier::StoreNotifier;
use crate::repository::{
    InMemoryStore, NotificationStore, PgStore, ThreadStore, TokenVerifier, UserDirectory,
};
use crate::routes::{comment_routes, health_check, notification_routes};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/// The storage seams the application is wired with.
#[derive(Clone)]
pub struct Stores {
    pub threads: Arc<dyn ThreadStore>,
    pub users: Arc<dyn UserDirectory>,
    pub notifications: Arc<dyn NotificationStore>,
    pub tokens: Arc<dyn TokenVerifier>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            threads: store.clone(),
            users: store.clone(),
            notifications: store.clone(),
            tokens: store,
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            threads: store.clone(),
            users: store.clone(),
            notifications: store.clone(),
            tokens: store,
        }
    }

    pub fn comment_thread_manager(&self) -> CommentThreadManager {
        let notifier = StoreNotifier::new(self.notifications.clone(), self.users.clone());
        CommentThreadManager::new(self.threads.clone(), self.users.clone(), Arc::new(notifier))
    }
}

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Configuration) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);
        migrate_database(&connection_pool).await?;
        Self::build_with_stores(config, Stores::postgres(connection_pool)).await
    }

    pub async fn build_with_stores(
        config: Configuration,
        stores: Stores,
    ) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)
            .with_context(|| "Failed to bind TCP listener for application")?;
        let port = listener
            .local_addr()
            .with_context(|| "Failed to read local address of TCP listener")?
            .port();
        let server = run(listener, stores).context("Failed to run Actix web server")?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        // run returns a Server type, which implements Future trait
        self.server.await.context("Server stopped with an error")
    }
}

pub fn get_connection_pool(config: &DatabaseConfigs) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.connect_options())
}

/// Applies the embedded `migrations/` that have not run yet.
#[tracing::instrument(name = "Run database migrations", skip_all)]
pub async fn migrate_database(pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to migrate the database")
}

fn run(tcp_listener: TcpListener, stores: Stores) -> Result<Server, anyhow::Error> {
    let manager = web::Data::new(stores.comment_thread_manager());
    let users = web::Data::from(stores.users);
    let notifications = web::Data::from(stores.notifications);
    let tokens = web::Data::from(stores.tokens);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(configure_routes)
            // register the stores as part of the application state
            .app_data(manager.clone())
            .app_data(users.clone())
            .app_data(notifications.clone())
            .app_data(tokens.clone())
    })
    .listen(tcp_listener)
    .with_context(|| "Failed to bind Actix server to TCP listener")?
    .run();

    Ok(server)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check))
        .service(web::scope("/posts").configure(comment_routes))
        .configure(notification_routes);
}
