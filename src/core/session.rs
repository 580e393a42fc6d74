use crate::core::aggregator::{self, CostSummary};
use crate::core::store::SubscriptionStore;
use crate::domain::model::{NewSubscription, Subscription, SubscriptionId};
use crate::domain::ports::SubscriptionProvider;
use crate::utils::error::{Result, TryoutError};
use crate::utils::validation::validate_email;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    LoggedOut,
    Discovering,
    LoggedIn,
}

/// Result of a cancel request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// Record has no programmatic cancellation; nothing was done.
    NotCancellable,
    /// Record was no longer in the store when the request started or finished.
    AlreadyRemoved,
    /// Another cancel for the same id has not completed yet.
    InProgress,
}

#[derive(Debug, Default)]
struct SessionState {
    phase: SessionPhase,
    email: Option<String>,
    store: SubscriptionStore,
    pending_cancellations: HashSet<SubscriptionId>,
    last_error: Option<String>,
    // 每次登入/登出遞增，讓舊的取消結果不會作用到新的清單
    generation: u64,
}

impl SessionState {
    fn reset(&mut self) {
        self.phase = SessionPhase::LoggedOut;
        self.email = None;
        self.store.clear();
        self.pending_cancellations.clear();
        self.generation += 1;
    }

    /// 呼叫端放棄了進行中的 provider 呼叫，撤銷它留下的標記
    fn abandon(&mut self, generation: u64, work: &InFlight) {
        if self.generation != generation {
            return;
        }
        match work {
            InFlight::Discovery if self.phase == SessionPhase::Discovering => {
                tracing::warn!("Discovery was abandoned, returning to logged out");
                self.reset();
            }
            InFlight::Discovery => {}
            InFlight::Cancellation(id) => {
                tracing::warn!("Cancellation of {} was abandoned", id);
                self.pending_cancellations.remove(id);
            }
        }
    }
}

#[derive(Debug)]
enum InFlight {
    Discovery,
    Cancellation(SubscriptionId),
}

/// Undoes the in-flight marker of a provider call whose future is dropped
/// before it completes. Disarmed once the result has been applied.
struct InFlightGuard {
    state: Arc<Mutex<SessionState>>,
    generation: u64,
    work: Option<InFlight>,
}

impl InFlightGuard {
    fn new(state: &Arc<Mutex<SessionState>>, generation: u64, work: InFlight) -> Self {
        Self {
            state: Arc::clone(state),
            generation,
            work: Some(work),
        }
    }

    fn disarm(mut self) {
        self.work = None;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let Some(work) = self.work.take() else {
            return;
        };
        let generation = self.generation;

        if let Ok(mut state) = self.state.try_lock() {
            state.abandon(generation, &work);
            return;
        }

        // 鎖被占用時交給 runtime 稍後處理
        let state = Arc::clone(&self.state);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    state.lock().await.abandon(generation, &work);
                });
            }
            Err(_) => tracing::error!("Could not release abandoned {:?}: no runtime", work),
        }
    }
}

/// Read-only copy of the session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub is_logged_in: bool,
    pub email: Option<String>,
    pub subscriptions: Vec<Subscription>,
    pub summary: CostSummary,
    pub last_error: Option<String>,
}

/// One user's session: login gate plus the subscription store it seeds.
///
/// State sits behind an async mutex that is released before every provider
/// call, so discovery and cancellations only interleave at those awaits.
pub struct Session<P: SubscriptionProvider> {
    provider: P,
    state: Arc<Mutex<SessionState>>,
}

impl<P: SubscriptionProvider> Session<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub async fn login(&self, email: &str) -> Result<()> {
        validate_email("email", email)?;
        let email = email.trim().to_string();

        let guard = {
            let mut state = self.state.lock().await;
            match state.phase {
                SessionPhase::Discovering => return Err(TryoutError::DiscoveryInProgress),
                SessionPhase::LoggedIn => {
                    return Err(TryoutError::AlreadyLoggedIn {
                        email: state.email.clone().unwrap_or_default(),
                    })
                }
                SessionPhase::LoggedOut => {}
            }
            state.phase = SessionPhase::Discovering;
            state.last_error = None;
            InFlightGuard::new(&self.state, state.generation, InFlight::Discovery)
        };

        tracing::info!("🔍 Discovering subscriptions for {}", email);
        let discovered = self.provider.discover_subscriptions(&email).await;

        let mut state = self.state.lock().await;
        guard.disarm();
        match discovered {
            Ok(subscriptions) => {
                tracing::info!(
                    "✅ Discovered {} subscriptions for {}",
                    subscriptions.len(),
                    email
                );
                state.store.replace_all(subscriptions);
                state.pending_cancellations.clear();
                state.email = Some(email);
                state.phase = SessionPhase::LoggedIn;
                state.generation += 1;
                Ok(())
            }
            Err(e) => {
                let err = match e {
                    TryoutError::DiscoveryFailed { .. } => e,
                    other => TryoutError::DiscoveryFailed {
                        message: other.to_string(),
                    },
                };
                tracing::error!("❌ {}", err);
                state.reset();
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn logout(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.phase == SessionPhase::Discovering {
            return Err(TryoutError::DiscoveryInProgress);
        }
        if let Some(email) = state.email.as_deref() {
            tracing::info!("Logging out {}", email);
        }
        state.reset();
        state.last_error = None;
        Ok(())
    }

    /// Adds a user-entered subscription. It gets a fresh id and no cancellation method.
    pub async fn add(&self, candidate: NewSubscription) -> Result<Subscription> {
        let mut state = self.state.lock().await;
        if state.phase != SessionPhase::LoggedIn {
            return Err(TryoutError::NotLoggedIn);
        }
        let created = state.store.add(candidate).clone();
        tracing::info!("➕ Added {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn cancel(&self, subscription: &Subscription) -> Result<CancelOutcome> {
        if !subscription.can_cancel_programmatically {
            tracing::debug!(
                "{} cannot be cancelled programmatically, ignoring",
                subscription.id
            );
            return Ok(CancelOutcome::NotCancellable);
        }
        let id = subscription.id.clone();

        let (generation, guard) = {
            let mut state = self.state.lock().await;
            match state.store.get(&id) {
                None => return Ok(CancelOutcome::AlreadyRemoved),
                Some(stored) if !stored.can_cancel_programmatically => {
                    return Ok(CancelOutcome::NotCancellable)
                }
                Some(_) => {}
            }
            if !state.pending_cancellations.insert(id.clone()) {
                tracing::debug!("Cancellation of {} already in flight", id);
                return Ok(CancelOutcome::InProgress);
            }
            let guard = InFlightGuard::new(
                &self.state,
                state.generation,
                InFlight::Cancellation(id.clone()),
            );
            (state.generation, guard)
        };

        tracing::info!("Cancelling subscription {}", id);
        let result = self.provider.cancel_subscription(&id).await;

        let mut state = self.state.lock().await;
        guard.disarm();
        if state.generation != generation {
            tracing::warn!("Session changed while cancelling {}, dropping result", id);
            return Ok(CancelOutcome::AlreadyRemoved);
        }
        state.pending_cancellations.remove(&id);

        match result {
            Ok(()) => match state.store.remove(&id) {
                Some(removed) => {
                    tracing::info!("🗑️ Cancelled {} ({})", removed.name, removed.id);
                    Ok(CancelOutcome::Cancelled)
                }
                None => Ok(CancelOutcome::AlreadyRemoved),
            },
            Err(e) => {
                let err = match e {
                    TryoutError::CancellationFailed { .. } => e,
                    other => TryoutError::CancellationFailed {
                        id: id.to_string(),
                        message: other.to_string(),
                    },
                };
                tracing::error!("❌ {}", err);
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    pub async fn is_logged_in(&self) -> bool {
        self.phase().await == SessionPhase::LoggedIn
    }

    pub async fn email(&self) -> Option<String> {
        self.state.lock().await.email.clone()
    }

    pub async fn subscriptions(&self) -> Vec<Subscription> {
        self.state.lock().await.store.as_slice().to_vec()
    }

    pub async fn subscription(&self, id: &SubscriptionId) -> Option<Subscription> {
        self.state.lock().await.store.get(id).cloned()
    }

    pub async fn summary(&self) -> CostSummary {
        aggregator::summarize(self.state.lock().await.store.as_slice())
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            phase: state.phase,
            is_logged_in: state.phase == SessionPhase::LoggedIn,
            email: state.email.clone(),
            subscriptions: state.store.as_slice().to_vec(),
            summary: aggregator::summarize(state.store.as_slice()),
            last_error: state.last_error.clone(),
        }
    }
}
