//! CommunityFix server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use communityfix_api::{
    middleware::{AppState, auth_middleware},
    router as api_router,
};
use communityfix_common::{
    Config,
    config::StorageSettings,
    storage::{LocalStorage, StorageBackend},
};
use communityfix_core::{
    BadgeService, CommentService, FollowService, ModerationService, NotificationService,
    ReportService, UploadService, UserService,
};
use communityfix_db::repositories::{
    AttachmentRepository, BadgeRepository, CommentRepository, FollowRepository,
    NotificationRepository, ReportRepository, UserProfileRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Build the storage backend from configuration.
async fn build_storage(config: &Config) -> anyhow::Result<Arc<dyn StorageBackend>> {
    match &config.storage {
        StorageSettings::Local { base_path, base_url } => Ok(Arc::new(LocalStorage::new(
            base_path.clone(),
            base_url.clone(),
        ))),
        #[cfg(feature = "s3")]
        StorageSettings::S3 {
            endpoint,
            bucket,
            region,
            access_key_id,
            secret_access_key,
            public_url,
        } => {
            let storage = communityfix_common::storage::S3Storage::new(
                endpoint,
                bucket.clone(),
                region,
                access_key_id,
                secret_access_key,
                public_url.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }
        #[cfg(not(feature = "s3"))]
        StorageSettings::S3 { .. } => {
            anyhow::bail!("S3 storage configured but the server was built without the s3 feature")
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "communityfix=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting CommunityFix server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = communityfix_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    communityfix_db::migrate(&db).await?;
    info!("Migrations completed");

    // Storage backend for report images
    let storage = build_storage(&config).await?;

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let user_profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let badge_repo = BadgeRepository::new(Arc::clone(&db));
    let attachment_repo = AttachmentRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone(), user_profile_repo.clone());
    let notification_service = NotificationService::new(notification_repo.clone());
    let badge_service = BadgeService::new(
        badge_repo.clone(),
        report_repo.clone(),
        user_repo.clone(),
        notification_service.clone(),
    );
    let report_service = ReportService::new(
        report_repo.clone(),
        user_repo.clone(),
        follow_repo.clone(),
        attachment_repo.clone(),
        notification_service.clone(),
        badge_service.clone(),
    );
    let follow_service = FollowService::new(follow_repo.clone(), report_repo.clone());
    let comment_service = CommentService::new(
        comment_repo.clone(),
        report_repo.clone(),
        user_repo.clone(),
        follow_repo.clone(),
        notification_service.clone(),
        badge_service.clone(),
    );
    let moderation_service = ModerationService::new(report_repo.clone(), user_repo.clone());
    let upload_service = UploadService::new(attachment_repo.clone(), storage);

    let state = AppState {
        user_service,
        report_service,
        follow_service,
        comment_service,
        notification_service,
        badge_service,
        moderation_service,
        upload_service,
    };

    // Build the router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Serve locally-stored uploads
    if let StorageSettings::Local { base_path, base_url } = &config.storage {
        app = app.nest_service(base_url.as_str(), ServeDir::new(base_path));
    }

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(addr = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
