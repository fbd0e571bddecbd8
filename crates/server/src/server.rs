use axum::{
    Router,
    routing::{get, patch},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{balances, categories, reports, transactions, transfer_groups, wallets};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Every route of the API, bound to `state`.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wallets", get(wallets::list).post(wallets::wallet_new))
        .route("/wallets/summaries", get(wallets::summaries))
        .route(
            "/wallets/{id}",
            patch(wallets::rename).delete(wallets::delete),
        )
        .route("/wallets/{id}/summary", get(wallets::summary))
        .route(
            "/categories",
            get(categories::list).post(categories::category_new),
        )
        .route(
            "/categories/{id}",
            axum::routing::delete(categories::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::transaction_new),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route("/transfer-groups/{id}", get(transfer_groups::get))
        .route("/balances", get(balances::get))
        .route("/reports/monthly-summary", get(reports::monthly_summary))
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
