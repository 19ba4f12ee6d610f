/**
 * Server Initialization
 *
 * 1. Load the database (Postgres + migrations) or fall back to memory
 * 2. Connect the optional article cache
 * 3. Build the token issuer and the services
 * 4. Create the router
 */

use axum::Router;

use crate::backend::auth::TokenIssuer;
use crate::backend::db::Repositories;
use crate::backend::routes::create_router;
use crate::backend::server::config::{load_cache, load_database, Config, StartupError};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: &Config) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing Conduit backend server");

    let repos = match load_database(config).await? {
        Some(pool) => Repositories::postgres(pool),
        None => Repositories::in_memory(),
    };
    let cache = load_cache(config).await;
    let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_ttl);

    let app_state = AppState::new(repos, cache, tokens, bcrypt::DEFAULT_COST);
    tracing::info!("Router configured");
    Ok(create_router(app_state))
}
