mod config;
mod currency;
mod db;
mod oracle;
mod routes;
mod services;
mod state;
mod telegram;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let bot_config = config::BotConfig::from_env().expect("bot config");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    let transport = telegram::TelegramClient::new(&bot_config.bot_token, bot_config.timeouts)
        .expect("telegram client init failed");
    let price_oracle = oracle::CoinGeckoOracle::new(&bot_config.oracle_base_url, bot_config.timeouts)
        .expect("price oracle init failed");
    let store = services::ledger::PgTransactionStore::new(pool);

    let state = state::AppState::new(Arc::new(store), Arc::new(transport), Arc::new(price_oracle), bot_config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "kurbot listening");
    axum::serve(listener, app).await.expect("server failed");
}
