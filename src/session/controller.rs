//! The session controller: the single entry point for changing a session.

use super::validation::{validate, Input};
use super::{PendingTransition, ScreenView, Session};
use crate::calculator::DerivedFigures;
use crate::core::{Display, ScreenNode, ScreenStep};
use crate::error::FlowError;
use crate::graph::{FlowCatalog, FlowDefinition, FlowVariant};
use crate::ledger::{Answer, AnswerLedger};
use crate::preference::{PackCost, PreferenceStore};
use crate::scheduler::DelayPolicy;
use chrono::Utc;
use std::sync::Arc;

/// Validates input, records answers, writes the pack cost and decides
/// transitions.
///
/// The controller itself is stateless apart from its collaborators; all
/// per-session state travels in the [`Session`] value.
///
/// # Example
///
/// ```rust
/// use checkin_flow::graph::{FlowCatalog, FlowVariant};
/// use checkin_flow::preference::MemoryPreferenceStore;
/// use checkin_flow::session::{Input, SessionController};
/// use std::sync::Arc;
///
/// let controller = SessionController::new(
///     FlowCatalog::standard().unwrap(),
///     Arc::new(MemoryPreferenceStore::new()),
/// );
///
/// let session = controller.begin(FlowVariant::QuickCheckIn).unwrap();
/// let session = controller.submit_now(&session, Input::choose("No")).unwrap();
/// assert_eq!(session.current_screen(), &"no-end");
/// ```
pub struct SessionController {
    catalog: FlowCatalog,
    store: Arc<dyn PreferenceStore>,
    delays: DelayPolicy,
}

impl SessionController {
    pub fn new(catalog: FlowCatalog, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            catalog,
            store,
            delays: DelayPolicy::default(),
        }
    }

    pub fn with_delays(mut self, delays: DelayPolicy) -> Self {
        self.delays = delays;
        self
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    pub fn catalog(&self) -> &FlowCatalog {
        &self.catalog
    }

    pub fn delays(&self) -> DelayPolicy {
        self.delays
    }

    /// Start a session at the flow's start screen with no answers.
    pub fn begin(&self, variant: FlowVariant) -> Result<Session, FlowError> {
        let flow = self.flow(variant)?;
        let start = flow.start();

        let mut session = Session::new(variant, start.id.clone(), self.store.get());
        session.figures = derive(start, &session.answers, session.preference);

        tracing::info!(session = %session.id, flow = %variant, "session started");
        Ok(session)
    }

    /// Validate and record `input` on the current screen, then decide the
    /// next screen.
    ///
    /// The returned session still shows the same screen, with a
    /// [`PendingTransition`] attached; the transition is applied by
    /// [`complete_transition`](Self::complete_transition) once its delay has
    /// passed. Completing a pack-cost screen writes the store before the
    /// next screen is resolved.
    ///
    /// # Errors
    ///
    /// - [`FlowError::Validation`] if the input does not fit the screen
    /// - [`FlowError::TransitionPending`] if a transition is already pending
    /// - [`FlowError::SessionComplete`] on a terminal screen
    /// - [`FlowError::Graph`] if no edge matches (a flow definition defect)
    ///
    /// On any error the session is unchanged and the store is not written.
    pub fn submit(&self, session: &Session, input: Input) -> Result<Session, FlowError> {
        let flow = self.flow(session.flow)?;
        let screen = current_screen(&flow, session)?;

        if session.pending.is_some() {
            tracing::warn!(session = %session.id, screen = %screen.id, "input ignored, transition pending");
            return Err(FlowError::TransitionPending {
                screen: screen.id.clone(),
            });
        }
        if screen.is_terminal() {
            return Err(FlowError::SessionComplete {
                screen: screen.id.clone(),
            });
        }

        let answer = validate(screen, &input).inspect_err(|e| {
            tracing::debug!(session = %session.id, screen = %screen.id, error = %e, "input rejected");
        })?;

        let new_cost = match &answer {
            Answer::PackCost(cost) => Some(*cost),
            _ => None,
        };
        let preference_set = new_cost.is_some() || self.store.is_set();

        let next = flow
            .next_screen(&screen.id, Some(&answer), preference_set)
            .inspect_err(|e| {
                tracing::error!(session = %session.id, flow = %session.flow, error = %e, "flow graph integrity failure");
            })?;

        let mut updated = session.clone();
        if let Some(cost) = new_cost {
            updated.preference = Some(self.store.set(cost.value())?);
        }

        let delay = self.delays.delay_for(&answer);
        updated.answers = session.answers.record(screen.id.clone(), answer);
        updated.pending = Some(PendingTransition {
            ticket: session.next_ticket,
            to: next.id.clone(),
            delay,
        });
        updated.next_ticket = session.next_ticket + 1;

        tracing::debug!(
            session = %session.id,
            from = %screen.id,
            to = %next.id,
            delay_ms = delay.as_millis() as u64,
            "transition scheduled"
        );
        Ok(updated)
    }

    /// Apply the pending transition identified by `ticket`.
    ///
    /// Entering a screen re-reads the pack cost from the store and computes
    /// any derived figures the screen displays.
    ///
    /// # Errors
    ///
    /// [`FlowError::StaleTransition`] if `ticket` is not the pending one.
    pub fn complete_transition(&self, session: &Session, ticket: u64) -> Result<Session, FlowError> {
        let pending = match &session.pending {
            Some(pending) if pending.ticket == ticket => pending,
            _ => return Err(FlowError::StaleTransition { ticket }),
        };

        let flow = self.flow(session.flow)?;
        let target = flow
            .screen(&pending.to)
            .ok_or_else(|| FlowError::UnknownScreen {
                screen: pending.to.clone(),
            })?;

        let mut updated = session.clone();
        updated.preference = self.store.get();
        updated.figures = derive(target, &session.answers, updated.preference);
        updated.trail = session.trail.record(ScreenStep {
            from: session.current.clone(),
            to: target.id.clone(),
            entered_at: Utc::now(),
        });
        updated.current = target.id.clone();
        updated.pending = None;

        tracing::debug!(session = %session.id, screen = %target.id, "screen entered");
        if target.is_terminal() {
            tracing::info!(session = %session.id, flow = %session.flow, "check-in complete");
        }
        Ok(updated)
    }

    /// Submit and immediately apply the resulting transition, ignoring its
    /// delay. For hosts that drive the flow synchronously.
    pub fn submit_now(&self, session: &Session, input: Input) -> Result<Session, FlowError> {
        let submitted = self.submit(session, input)?;
        match submitted.pending.as_ref().map(|p| p.ticket) {
            Some(ticket) => self.complete_transition(&submitted, ticket),
            None => Ok(submitted),
        }
    }

    /// Render data for the session's current screen.
    pub fn view(&self, session: &Session) -> Result<ScreenView, FlowError> {
        let flow = self.flow(session.flow)?;
        let screen = current_screen(&flow, session)?;

        Ok(ScreenView {
            flow: session.flow,
            screen: screen.id.clone(),
            prompt: screen.prompt.clone(),
            requirement: screen.requirement.clone(),
            selected: session.answers.get(&screen.id).cloned(),
            figures: session.figures,
            locked: session.is_locked(),
            terminal: screen.is_terminal(),
        })
    }

    fn flow(&self, variant: FlowVariant) -> Result<Arc<FlowDefinition>, FlowError> {
        self.catalog
            .definition(variant)
            .ok_or(FlowError::UnknownFlow { flow: variant })
    }
}

fn current_screen<'a>(
    flow: &'a FlowDefinition,
    session: &Session,
) -> Result<&'a ScreenNode, FlowError> {
    flow.screen(&session.current)
        .ok_or_else(|| FlowError::UnknownScreen {
            screen: session.current.clone(),
        })
}

/// Figures for `screen`, computed from the answers so far and the pack cost
/// read at entry time.
fn derive(
    screen: &ScreenNode,
    answers: &AnswerLedger,
    preference: Option<PackCost>,
) -> Option<DerivedFigures> {
    match screen.display.as_ref()? {
        Display::Spend { count_screen } => {
            let bucket = answers.choice(count_screen).unwrap_or_default();
            Some(DerivedFigures::spend(bucket, preference))
        }
        Display::Savings => Some(DerivedFigures::savings(preference)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::MemoryPreferenceStore;
    use crate::session::ValidationError;

    fn controller(store: Arc<MemoryPreferenceStore>) -> SessionController {
        SessionController::new(FlowCatalog::standard().unwrap(), store)
    }

    #[test]
    fn begin_places_session_at_start() {
        let ctl = controller(Arc::new(MemoryPreferenceStore::new()));
        for variant in FlowVariant::ALL {
            let session = ctl.begin(variant).unwrap();
            assert_eq!(session.current_screen(), &"start");
            assert!(session.answers().is_empty());
            assert!(session.pending().is_none());
        }
    }

    #[test]
    fn begin_snapshots_preference() {
        let store = Arc::new(MemoryPreferenceStore::with_value(200.0).unwrap());
        let session = controller(store).begin(FlowVariant::SmokeCheckFinancial).unwrap();

        assert_eq!(session.preference().map(PackCost::value), Some(200.0));
    }

    #[test]
    fn submit_leaves_screen_until_completed() {
        let ctl = controller(Arc::new(MemoryPreferenceStore::new()));
        let session = ctl.begin(FlowVariant::QuickCheckIn).unwrap();

        let submitted = ctl.submit(&session, Input::choose("Yes")).unwrap();
        assert_eq!(submitted.current_screen(), &"start");
        let pending = submitted.pending().unwrap();
        assert_eq!(pending.to, "what");
        assert_eq!(pending.delay, ctl.delays().choice_confirmation);

        let entered = ctl.complete_transition(&submitted, pending.ticket).unwrap();
        assert_eq!(entered.current_screen(), &"what");
        assert!(!entered.is_locked());
    }

    #[test]
    fn submit_while_pending_is_refused() {
        let ctl = controller(Arc::new(MemoryPreferenceStore::new()));
        let session = ctl.begin(FlowVariant::QuickCheckIn).unwrap();
        let submitted = ctl.submit(&session, Input::choose("Yes")).unwrap();

        let err = ctl.submit(&submitted, Input::choose("No")).unwrap_err();
        assert!(matches!(err, FlowError::TransitionPending { .. }));
        assert_eq!(submitted.answer("start"), Some(&Answer::Choice("Yes".into())));
    }

    #[test]
    fn stale_ticket_is_refused() {
        let ctl = controller(Arc::new(MemoryPreferenceStore::new()));
        let session = ctl.begin(FlowVariant::QuickCheckIn).unwrap();
        let submitted = ctl.submit(&session, Input::choose("Yes")).unwrap();
        let ticket = submitted.pending().unwrap().ticket;

        assert!(matches!(
            ctl.complete_transition(&submitted, ticket + 1),
            Err(FlowError::StaleTransition { .. })
        ));
        let entered = ctl.complete_transition(&submitted, ticket).unwrap();
        assert!(matches!(
            ctl.complete_transition(&entered, ticket),
            Err(FlowError::StaleTransition { .. })
        ));
    }

    #[test]
    fn validation_failure_keeps_session_and_store() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let ctl = controller(Arc::clone(&store));
        let mut session = ctl.begin(FlowVariant::SmokeCheckFinancial).unwrap();
        for input in [Input::choose("Yes"), Input::choose("1")] {
            session = ctl.submit_now(&session, input).unwrap();
        }
        assert_eq!(session.current_screen(), &"pack-cost");

        let err = ctl.submit(&session, Input::enter("0")).unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::InvalidNumber { .. })
        ));
        assert!(store.get().is_none());
        assert!(session.answer("pack-cost").is_none());
        assert!(!session.is_locked());
    }

    #[test]
    fn terminal_screen_refuses_input() {
        let ctl = controller(Arc::new(MemoryPreferenceStore::new()));
        let mut session = ctl.begin(FlowVariant::QuickCheckIn).unwrap();
        for input in [Input::choose("No"), Input::Continue] {
            session = ctl.submit_now(&session, input).unwrap();
        }

        assert_eq!(session.current_screen(), &"done");
        assert!(matches!(
            ctl.submit(&session, Input::Continue),
            Err(FlowError::SessionComplete { .. })
        ));
    }

    #[test]
    fn view_reports_selection_and_lock() {
        let ctl = controller(Arc::new(MemoryPreferenceStore::new()));
        let session = ctl.begin(FlowVariant::SmokeCheckBasic).unwrap();
        let submitted = ctl.submit(&session, Input::choose("No")).unwrap();

        let view = ctl.view(&submitted).unwrap();
        assert_eq!(view.screen, "start");
        assert_eq!(view.selected, Some(Answer::Choice("No".into())));
        assert!(view.locked);
        assert!(!view.terminal);
    }

    #[test]
    fn unknown_flow_is_reported() {
        let ctl = SessionController::new(
            FlowCatalog::default(),
            Arc::new(MemoryPreferenceStore::new()),
        );

        assert!(matches!(
            ctl.begin(FlowVariant::QuickCheckIn),
            Err(FlowError::UnknownFlow { .. })
        ));
    }
}
