/**
 * Application State Management
 *
 * `AppState` holds the three services. Each is cheap to clone (its
 * dependencies sit behind `Arc`s), and each has a `FromRef` impl so handlers
 * extract only the service they use:
 *
 * ```rust,ignore
 * async fn handler(State(articles): State<ArticleService>) { /* ... */ }
 * ```
 */

use axum::extract::FromRef;

use crate::backend::articles::ArticleService;
use crate::backend::auth::{AuthService, TokenIssuer};
use crate::backend::cache::Cache;
use crate::backend::db::Repositories;
use crate::backend::users::UserService;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub users: UserService,
    pub articles: ArticleService,
}

impl AppState {
    /// Wire the services over one set of repositories
    pub fn new(repos: Repositories, cache: Cache, tokens: TokenIssuer, hash_cost: u32) -> Self {
        let users = UserService::new(repos.clone(), hash_cost);
        let articles = ArticleService::new(repos, users.clone(), cache);
        let auth = AuthService::new(users.clone(), tokens);
        Self {
            auth,
            users,
            articles,
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for ArticleService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.articles.clone()
    }
}
