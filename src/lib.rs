pub mod api;
pub mod error;
pub mod forms;
pub mod mail;
pub mod pagination;
pub mod state;
pub mod storage;

use std::env;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use state::AppState;

pub async fn run() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("BLOGD_LOG"))
        .init();

    let app = AppState::new(
        storage::init_db_from_env().await,
        mail::SmtpMailer::from_env(),
        &base_url(),
    );

    api::run_server(app).await
}

fn base_url() -> String {
    env::var("BLOG_BASE_URL").expect("BLOG_BASE_URL not set")
}
