// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rokto API Server
//!
//! Blood donor registry for the University of Chittagong campus: donor
//! accounts, blood-group search, and automatic availability cycling.

use rokto::{
    config::Config,
    db,
    services::{accounts, AvailabilityService, Mailer},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Rokto donor registry API");

    // Connect to Postgres and bring the schema up to date
    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");
    db::run_migrations(&pool).await.expect("Failed to run migrations");
    tracing::info!("Database ready");

    let donors = db::DonorStore::new(pool.clone());
    let profiles = db::ProfileStore::new(pool);
    let mailer = Mailer::new(&config);

    let state = Arc::new(AppState {
        config: config.clone(),
        donors: donors.clone(),
        profiles,
        mailer,
    });

    // Seed the bootstrap superuser if configured and absent
    accounts::seed_first_superuser(&state)
        .await
        .expect("Failed to seed first superuser");

    // Start the periodic availability sweep; the handle must outlive main
    let _scheduler = AvailabilityService::new(donors, &config)
        .start()
        .await
        .expect("Failed to start availability scheduler");

    // Build router
    let app = rokto::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rokto=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
