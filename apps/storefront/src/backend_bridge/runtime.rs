//! Runtime bridge between the view's command queue and the cart synchronizer.

use std::{sync::Arc, thread};

use client_core::{CartSync, HttpStorefrontApi, SyncEvent};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::domain::UserId;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};

use crate::{
    backend_bridge::commands::BackendCommand, config::Settings, controller::events::UiEvent,
};

/// Spawns the backend worker thread. It exits once the command sender is dropped.
pub fn launch(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                send_ui(
                    &ui_tx,
                    UiEvent::BackendFailed(format!(
                        "backend worker startup failure: failed to build runtime: {err}"
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let api = match HttpStorefrontApi::with_timeout(
                &settings.api_base_url,
                settings.request_timeout(),
            ) {
                Ok(api) => api,
                Err(err) => {
                    send_ui(
                        &ui_tx,
                        UiEvent::BackendFailed(format!("backend worker startup failure: {err}")),
                    );
                    tracing::error!("failed to build storefront api client: {err}");
                    return;
                }
            };
            tracing::info!(
                api_base_url = %api.base_url(),
                user_id = %settings.user_id,
                "backend worker ready"
            );
            let sync = CartSync::new(Arc::new(api), UserId::new(settings.user_id.clone()));
            run_worker(sync, cmd_rx, ui_tx).await;
        });
    })
}

async fn run_worker(
    sync: Arc<CartSync>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let forwarder = tokio::spawn(forward_sync_events(sync.subscribe_events(), ui_tx.clone()));
    let (mutation_tx, mutation_rx) = mpsc::unbounded_channel();
    let mutations = tokio::spawn(run_mutations(
        Arc::clone(&sync),
        mutation_rx,
        ui_tx.clone(),
    ));

    // Mutations keep receive order on one task; reads run concurrently.
    while let Ok(cmd) = cmd_rx.recv() {
        if cmd.is_mutation() {
            if mutation_tx.send(cmd).is_err() {
                tracing::error!("mutation task stopped; dropping backend command");
            }
            continue;
        }
        let sync = Arc::clone(&sync);
        let ui_tx = ui_tx.clone();
        tokio::spawn(async move { execute(&sync, cmd, &ui_tx).await });
    }

    drop(mutation_tx);
    if let Err(err) = mutations.await {
        tracing::error!("mutation task failed: {err}");
    }
    forwarder.abort();
    tracing::info!("backend worker stopped");
}

async fn run_mutations(
    sync: Arc<CartSync>,
    mut mutation_rx: mpsc::UnboundedReceiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    while let Some(cmd) = mutation_rx.recv().await {
        execute(&sync, cmd, &ui_tx).await;
    }
}

async fn execute(sync: &CartSync, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    tracing::debug!(command = cmd.name(), "executing backend command");
    match cmd {
        BackendCommand::Mount => {
            let (products, cart) = sync.mount().await;
            send_ui(ui_tx, UiEvent::Ready { products, cart });
        }
        BackendCommand::AddItem {
            product_id,
            quantity,
        } => sync.add_item(&product_id, quantity).await,
        BackendCommand::SetQuantity {
            product_id,
            quantity,
        } => sync.set_quantity(&product_id, quantity).await,
        BackendCommand::RemoveItem { product_id } => sync.remove_item(&product_id).await,
        BackendCommand::ClearCart => sync.clear_cart().await,
        BackendCommand::Refresh => {
            tokio::join!(sync.load_products(), sync.load_cart());
        }
        BackendCommand::CheckHealth => {
            let healthy = sync.health().await;
            send_ui(ui_tx, UiEvent::HealthChecked(healthy));
        }
    }
}

async fn forward_sync_events(mut events: broadcast::Receiver<SyncEvent>, ui_tx: Sender<UiEvent>) {
    loop {
        let event = match events.recv().await {
            Ok(SyncEvent::ProductsUpdated(products)) => UiEvent::ProductsUpdated(products),
            Ok(SyncEvent::CartUpdated(cart)) => UiEvent::CartUpdated(cart),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "view lagged behind sync events");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        send_ui(&ui_tx, event);
    }
}

fn send_ui(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => tracing::warn!("view event queue is full; dropping event"),
        Err(TrySendError::Disconnected(_)) => tracing::debug!("view is gone; dropping event"),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
