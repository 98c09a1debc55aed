//! Forwarding tasks that feed the event loop: one pumps crossterm input,
//! one ticks the redraw/animation clock. Both exit on the shutdown signal.

use crate::shutdown::ShutdownHandle;
use crate::tui::UiMsg;
use std::time::Duration;
use tokio::{sync::mpsc, time};

pub fn spawn_feeders(tx: mpsc::Sender<UiMsg>, shutdown: ShutdownHandle) {
    let tx_in = tx.clone();
    let mut shutdown_input = shutdown.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown_input.recv() => break,
                ev = tokio::task::spawn_blocking(crossterm::event::read) => {
                    match ev {
                        Ok(Ok(e)) => {
                            if tx_in.send(UiMsg::InputEvent(e)).await.is_err() {
                                break;
                            }
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(error = %e, "input read failed");
                        }
                        Err(_) => break,
                    }
                }
            }
        }
    });

    let tx_tick = tx;
    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(80));
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    let _ = tx_tick.try_send(UiMsg::Tick);
                }
            }
        }
    });
}
