use log::{debug, info};
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::flags::FlagStore;

/// Which top-level surface the shell should present. The three presented
/// surfaces are mutually exclusive; `Loading` only exists before the first
/// resolution completes.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Loading,
    Onboarding,
    AuthRequired,
    MainApp,
}

/// Derive the surface from the persisted flags. Onboarding gates auth: the
/// authenticated flag is only consulted once onboarding is complete, so a
/// stale auth value can never skip the first-run flow.
pub fn resolve(flags: &FlagStore) -> SessionState {
    if !flags.onboarding_complete() {
        return SessionState::Onboarding;
    }

    if flags.authenticated() {
        SessionState::MainApp
    } else {
        SessionState::AuthRequired
    }
}

/// Keeps the session surface current for the lifetime of the app session.
///
/// Flag mutations happen in decoupled screens (login, logout, onboarding
/// completion); rather than polling the flags on a timer, the worker waits on
/// the flag store's revision channel and re-resolves on every write. Once
/// `MainApp` is reached the state only regresses to `Onboarding` when the
/// flag is externally cleared.
pub struct SessionResolver {
    state_tx: watch::Sender<SessionState>,
    worker: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl SessionResolver {
    /// Resolves once immediately, then re-resolves on each flag write. The
    /// worker runs until `shutdown`.
    pub fn spawn(flags: FlagStore) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Loading);
        let cancel = CancellationToken::new();

        let tx = state_tx.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut revisions = flags.subscribe();

            publish(&tx, resolve(&flags));

            loop {
                tokio::select! {
                    changed = revisions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        publish(&tx, resolve(&flags));
                    }
                    _ = token.cancelled() => {
                        debug!("Session resolver shutting down");
                        break;
                    }
                }
            }
        });

        Self {
            state_tx,
            worker: Mutex::new(Some(handle)),
            cancel,
        }
    }

    pub fn current(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Receiver for surface changes; `borrow` yields the current state and
    /// `changed` resolves when it moves.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Cancel the worker and wait for it to exit. Must run on teardown so no
    /// callback outlives the owning app session.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.worker.lock().await.take() {
            let _ = handle.await;
        }
    }
}

fn publish(tx: &watch::Sender<SessionState>, next: SessionState) {
    tx.send_if_modified(|state| {
        if *state == next {
            return false;
        }
        info!("Session surface: {:?} -> {:?}", state, next);
        *state = next;
        true
    });
}
