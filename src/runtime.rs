//! The event-loop shell around the session controller.
//!
//! [`CheckInRuntime`] owns the live sessions. Timed transitions fire on the
//! tokio runtime but never touch a session directly: the callback only posts
//! a [`FiredTransition`] back to the runtime's channel, and the runtime
//! applies it when it next processes events. All session mutation therefore
//! happens on whichever task owns the runtime, one event at a time.

use crate::config::CheckInConfig;
use crate::error::FlowError;
use crate::graph::{FlowCatalog, FlowVariant};
use crate::scheduler::TransitionScheduler;
use crate::session::{Input, ScreenView, Session, SessionController, SessionId};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Message posted when a scheduled transition's delay has elapsed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FiredTransition {
    pub session: SessionId,
    pub ticket: u64,
}

/// Live sessions plus the timers that advance them.
///
/// Must be used from within a tokio runtime; a current-thread runtime is
/// enough.
pub struct CheckInRuntime {
    controller: SessionController,
    sessions: HashMap<SessionId, Session>,
    scheduler: TransitionScheduler<SessionId>,
    fired_tx: mpsc::UnboundedSender<FiredTransition>,
    fired_rx: mpsc::UnboundedReceiver<FiredTransition>,
}

impl CheckInRuntime {
    pub fn new(controller: SessionController) -> Self {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            sessions: HashMap::new(),
            scheduler: TransitionScheduler::new(),
            fired_tx,
            fired_rx,
        }
    }

    /// Runtime with the built-in flows, the configured delays and the
    /// configured preference store.
    pub fn from_config(config: &CheckInConfig) -> Result<Self, FlowError> {
        let store = config.open_store()?;
        let controller = SessionController::new(FlowCatalog::standard()?, store)
            .with_delays(config.delay_policy());
        Ok(Self::new(controller))
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Start a new session of `variant`.
    pub fn enter(&mut self, variant: FlowVariant) -> Result<SessionId, FlowError> {
        let session = self.controller.begin(variant)?;
        let id = session.id();
        self.sessions.insert(id, session);
        Ok(id)
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn view(&self, id: SessionId) -> Result<ScreenView, FlowError> {
        self.controller.view(self.get(id)?)
    }

    /// Submit `input` on the session's current screen and schedule the
    /// resulting transition.
    ///
    /// # Errors
    ///
    /// As [`SessionController::submit`], plus
    /// [`FlowError::UnknownSession`] for discarded or unknown ids.
    pub fn submit(&mut self, id: SessionId, input: Input) -> Result<&Session, FlowError> {
        let updated = self.controller.submit(self.get(id)?, input)?;

        if let Some(pending) = updated.pending() {
            let tx = self.fired_tx.clone();
            let fired = FiredTransition {
                session: id,
                ticket: pending.ticket,
            };
            self.scheduler.schedule(id, pending.delay, move || {
                // The receiver only goes away with the runtime itself.
                let _ = tx.send(fired);
            });
        }

        self.sessions.insert(id, updated);
        self.get(id)
    }

    /// Apply a fired transition. Returns the session if it moved.
    ///
    /// Messages for discarded sessions and superseded tickets are dropped.
    pub fn apply(&mut self, fired: FiredTransition) -> Option<&Session> {
        self.scheduler.prune();

        let Some(session) = self.sessions.get(&fired.session) else {
            tracing::warn!(session = %fired.session, "transition fired for discarded session");
            return None;
        };

        match self.controller.complete_transition(session, fired.ticket) {
            Ok(updated) => {
                self.sessions.insert(fired.session, updated);
                self.sessions.get(&fired.session)
            }
            Err(e) => {
                tracing::warn!(session = %fired.session, error = %e, "transition dropped");
                None
            }
        }
    }

    /// Wait for the next scheduled transition and apply it. Returns the id
    /// of the session that moved.
    ///
    /// Waits indefinitely if nothing is scheduled.
    pub async fn next_transition(&mut self) -> Option<SessionId> {
        loop {
            let fired = self.fired_rx.recv().await?;
            if let Some(id) = self.apply(fired).map(Session::id) {
                return Some(id);
            }
        }
    }

    /// Apply every transition that has already fired, without waiting.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(fired) = self.fired_rx.try_recv() {
            if self.apply(fired).is_some() {
                applied += 1;
            }
        }
        applied
    }

    /// Acknowledge the terminal screen and end the session.
    ///
    /// # Errors
    ///
    /// [`FlowError::NotFinished`] if the session is not on a terminal screen.
    pub fn finish(&mut self, id: SessionId) -> Result<Session, FlowError> {
        let view = self.view(id)?;
        if !view.terminal {
            return Err(FlowError::NotFinished {
                screen: view.screen,
            });
        }

        self.scheduler.cancel(&id);
        let session = self
            .sessions
            .remove(&id)
            .ok_or(FlowError::UnknownSession { id })?;
        tracing::info!(session = %id, "session finished");
        Ok(session)
    }

    /// Abandon a session. Any pending transition is cancelled and will not
    /// fire. Returns whether the session existed.
    pub fn discard(&mut self, id: SessionId) -> bool {
        let cancelled = self.scheduler.cancel(&id);
        let existed = self.sessions.remove(&id).is_some();
        if existed {
            tracing::info!(session = %id, cancelled_transition = cancelled, "session discarded");
        }
        existed
    }

    /// Number of sessions still open.
    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Whether `id` has a transition waiting to fire.
    pub fn is_transition_pending(&self, id: SessionId) -> bool {
        self.scheduler.is_pending(&id)
    }

    fn get(&self, id: SessionId) -> Result<&Session, FlowError> {
        self.sessions
            .get(&id)
            .ok_or(FlowError::UnknownSession { id })
    }
}
