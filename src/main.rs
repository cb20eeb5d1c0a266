use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendascore::achievement::InMemoryAchievementLedger;
use vendascore::badge::InMemoryBadgeCatalog;
use vendascore::event::{EventBus, StoreEventHandler};
use vendascore::gamification::{self, GamificationService, StoreEventSubscriber};
use vendascore::goals::InMemoryGoalsRepository;
use vendascore::sales::InMemorySalesRepository;
use vendascore::score::InMemoryScoreRepository;
use vendascore::shared::AppState;
use vendascore::store::InMemoryStoreSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendascore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gamification scoring service");

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let badge_catalog = Arc::new(InMemoryBadgeCatalog::new());
    let achievement_ledger = Arc::new(InMemoryAchievementLedger::new());
    let score_repository = Arc::new(InMemoryScoreRepository::new());
    let sales_reader = Arc::new(InMemorySalesRepository::new());
    let goals_reader = Arc::new(InMemoryGoalsRepository::new());
    let store_settings = Arc::new(InMemoryStoreSettings::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let achievement_ledger = Arc::new(PostgresAchievementLedger::new(pool.clone()));
    // let score_repository = Arc::new(PostgresScoreRepository::new(pool));

    let event_bus = EventBus::new(100);
    let app_state = AppState::new(
        badge_catalog.clone(),
        achievement_ledger.clone(),
        score_repository.clone(),
        sales_reader.clone(),
        goals_reader.clone(),
        store_settings.clone(),
        event_bus.clone(),
    );

    // Wire the gamification pipeline to sale/goal events
    let service = Arc::new(GamificationService::new(
        badge_catalog,
        achievement_ledger,
        score_repository,
        sales_reader,
        goals_reader,
        store_settings,
    ));
    let subscriber = StoreEventSubscriber::new(service);
    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(err) = subscriber.handle_event(event).await {
                        error!(?err, "Store event handler failed");
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event subscriber lagged behind");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // build our application with the gamification routes
    let app = Router::new()
        .route("/", get(|| async { "vendascore" }))
        .route(
            "/badges",
            get(gamification::list_badges).post(gamification::create_badge),
        )
        .route(
            "/stores/:store_id/sellers/:seller_id/achievements",
            get(gamification::list_achievements),
        )
        .route(
            "/stores/:store_id/leaderboard/:year/:month",
            get(gamification::get_leaderboard),
        )
        .route(
            "/stores/:store_id/sellers/:seller_id/scores/:year/:month/recompute",
            post(gamification::recompute_score),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
