//! Conflict resolution for event writes.
//!
//! A create, update or approval that collides with an existing event comes
//! back as HTTP 409. [`ConflictFlow`] holds both records, asks the
//! [`Navigator`] to show them side by side, and then either replaces the
//! existing event with a single resolve call or discards the proposal.

mod backend;
mod navigator;

pub use backend::EventsBackend;
pub use navigator::{NavigationEvent, Navigator, RecordingNavigator};

use thiserror::Error;

use crate::api::{ApiError, ConflictRecord, Submission};
use crate::models::{Event, EventPayload, PendingEvent};

/// The write that was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    Create {
        payload: EventPayload,
    },
    Update {
        event_id: String,
        payload: EventPayload,
    },
    Approval {
        pending: PendingEvent,
    },
}

impl ConflictKind {
    /// The event the user wants to keep.
    pub const fn proposed(&self) -> &EventPayload {
        match self {
            Self::Create { payload } | Self::Update { payload, .. } => payload,
            Self::Approval { pending } => &pending.details,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Create { .. } => "criação",
            Self::Update { .. } => "atualização",
            Self::Approval { .. } => "aprovação",
        }
    }
}

/// Both sides of a 409, kept by value for the comparison screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub existing: Event,
    pub body: serde_json::Value,
}

impl Conflict {
    fn from_record(kind: ConflictKind, record: ConflictRecord) -> Self {
        Self {
            kind,
            existing: record.existing,
            body: record.body,
        }
    }

    pub const fn proposed(&self) -> &EventPayload {
        self.kind.proposed()
    }
}

/// Discriminant of [`FlowState`], used for logging and the transition log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Submitting,
    Success,
    ConflictDetected,
    AwaitingUserDecision,
    Replaced,
    Cancelled,
}

impl Stage {
    const fn accepts_submit(self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Success | Self::Replaced | Self::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Idle,
    Submitting,
    Success(Option<Event>),
    ConflictDetected(Conflict),
    AwaitingUserDecision(Conflict),
    Replaced,
    Cancelled,
}

impl FlowState {
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Idle => Stage::Idle,
            Self::Submitting => Stage::Submitting,
            Self::Success(_) => Stage::Success,
            Self::ConflictDetected(_) => Stage::ConflictDetected,
            Self::AwaitingUserDecision(_) => Stage::AwaitingUserDecision,
            Self::Replaced => Stage::Replaced,
            Self::Cancelled => Stage::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Replace,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success(Option<Event>),
    Conflict(Conflict),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Replaced,
    Cancelled,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Cannot {action} while the flow is {stage:?}")]
    InvalidTransition { action: &'static str, stage: Stage },
}

pub type FlowResult<T> = Result<T, FlowError>;

#[derive(Debug)]
pub struct ConflictFlow {
    state: FlowState,
    transitions: Vec<Stage>,
}

impl Default for ConflictFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            transitions: vec![Stage::Idle],
        }
    }

    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    pub const fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Stages visited since the last submission started.
    pub fn transitions(&self) -> &[Stage] {
        &self.transitions
    }

    /// The conflict waiting on a [`Decision`], if any.
    pub const fn pending_conflict(&self) -> Option<&Conflict> {
        match &self.state {
            FlowState::ConflictDetected(conflict) | FlowState::AwaitingUserDecision(conflict) => {
                Some(conflict)
            }
            _ => None,
        }
    }

    fn transition(&mut self, next: FlowState) {
        tracing::debug!(from = ?self.state.stage(), to = ?next.stage(), "conflict flow transition");
        self.transitions.push(next.stage());
        self.state = next;
    }

    fn fail<N: Navigator + ?Sized>(&mut self, navigator: &mut N, error: ApiError) -> FlowError {
        tracing::warn!(%error, "event write failed");
        navigator.alert(&error.user_message());
        self.transition(FlowState::Idle);
        FlowError::Api(error)
    }

    /// Send the write described by `kind`.
    ///
    /// On success the navigator goes back one level. On a 409 the comparison
    /// screen is shown and the flow waits for [`ConflictFlow::decide`].
    pub async fn submit<B, N>(
        &mut self,
        backend: &B,
        navigator: &mut N,
        kind: ConflictKind,
    ) -> FlowResult<SubmitOutcome>
    where
        B: EventsBackend + ?Sized,
        N: Navigator + ?Sized,
    {
        let stage = self.stage();
        if !stage.accepts_submit() {
            return Err(FlowError::InvalidTransition {
                action: "submit",
                stage,
            });
        }
        if stage != Stage::Idle {
            self.state = FlowState::Idle;
            self.transitions = vec![Stage::Idle];
        }

        self.transition(FlowState::Submitting);
        let result = match &kind {
            ConflictKind::Create { payload } => backend.create_event(payload).await,
            ConflictKind::Update { event_id, payload } => {
                backend.update_event(event_id, payload).await
            }
            ConflictKind::Approval { pending } => backend.approve_pending_event(&pending.id).await,
        };

        match result {
            Err(error) => Err(self.fail(navigator, error)),
            Ok(Submission::Accepted(event)) => {
                tracing::info!(operation = kind.label(), "event write accepted");
                self.transition(FlowState::Success(event.clone()));
                navigator.go_back(1);
                Ok(SubmitOutcome::Success(event))
            }
            Ok(Submission::Conflict(record)) => {
                let conflict = Conflict::from_record(kind, record);
                tracing::info!(
                    operation = conflict.kind.label(),
                    existing_id = %conflict.existing.id,
                    "event write conflicts with an existing event"
                );
                self.transition(FlowState::ConflictDetected(conflict.clone()));
                navigator.show_comparison(&conflict);
                self.transition(FlowState::AwaitingUserDecision(conflict.clone()));
                Ok(SubmitOutcome::Conflict(conflict))
            }
        }
    }

    /// Apply the user's answer to the pending conflict.
    ///
    /// `Replace` issues exactly one resolve call and goes back two levels on
    /// success. `Cancel` makes no call and goes back one level.
    pub async fn decide<B, N>(
        &mut self,
        backend: &B,
        navigator: &mut N,
        decision: Decision,
    ) -> FlowResult<DecisionOutcome>
    where
        B: EventsBackend + ?Sized,
        N: Navigator + ?Sized,
    {
        let FlowState::AwaitingUserDecision(conflict) = &self.state else {
            return Err(FlowError::InvalidTransition {
                action: "decide",
                stage: self.stage(),
            });
        };
        let conflict = conflict.clone();

        if decision == Decision::Cancel {
            tracing::info!(existing_id = %conflict.existing.id, "conflict cancelled");
            self.transition(FlowState::Cancelled);
            navigator.go_back(1);
            return Ok(DecisionOutcome::Cancelled);
        }

        let existing_id = conflict.existing.id.as_str();
        let result = match &conflict.kind {
            ConflictKind::Create { payload } => {
                backend.resolve_event_conflict(existing_id, payload).await
            }
            ConflictKind::Update { payload, .. } => {
                backend.resolve_update_conflict(existing_id, payload).await
            }
            ConflictKind::Approval { pending } => {
                backend
                    .resolve_pending_event_conflict(existing_id, &pending.id)
                    .await
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(existing_id, "existing event replaced");
                self.transition(FlowState::Replaced);
                navigator.go_back(2);
                Ok(DecisionOutcome::Replaced)
            }
            Err(error) => Err(self.fail(navigator, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::{ApiClient, ApiResult, GENERIC_FAILURE_MESSAGE};
    use crate::models::event::fixtures::{event, payload};

    #[derive(Debug, Clone, Copy)]
    enum Reply {
        Accepted,
        Conflict(&'static str),
        Fail(u16),
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Create(String),
        Update(String, String),
        Approve(String),
        ResolveCreate(String, String),
        ResolveUpdate(String, String),
        ResolvePending(String, String),
    }

    struct FakeBackend {
        reply: Reply,
        resolve_status: Option<u16>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeBackend {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                resolve_status: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_resolve(mut self, status: u16) -> Self {
            self.resolve_status = Some(status);
            self
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn submission(&self) -> ApiResult<Submission<Event>> {
            match self.reply {
                Reply::Accepted => Ok(Submission::Accepted(Some(event("NEW", "Aceito")))),
                Reply::Conflict(id) => {
                    let existing = event(id, "Existente");
                    Ok(Submission::Conflict(ConflictRecord {
                        body: json!({ "existingEvent": existing.clone() }),
                        existing,
                    }))
                }
                Reply::Fail(status) => Err(ApiError::Status {
                    status,
                    message: format!("HTTP {status}"),
                }),
            }
        }

        fn resolution(&self) -> ApiResult<()> {
            match self.resolve_status {
                None => Ok(()),
                Some(status) => Err(ApiError::Status {
                    status,
                    message: format!("HTTP {status}"),
                }),
            }
        }
    }

    #[async_trait]
    impl EventsBackend for FakeBackend {
        async fn create_event(&self, payload: &EventPayload) -> ApiResult<Submission<Event>> {
            self.record(Call::Create(payload.name.clone()));
            self.submission()
        }

        async fn update_event(
            &self,
            event_id: &str,
            payload: &EventPayload,
        ) -> ApiResult<Submission<Event>> {
            self.record(Call::Update(event_id.to_string(), payload.name.clone()));
            self.submission()
        }

        async fn approve_pending_event(&self, pending_id: &str) -> ApiResult<Submission<Event>> {
            self.record(Call::Approve(pending_id.to_string()));
            self.submission()
        }

        async fn resolve_event_conflict(
            &self,
            existing_id: &str,
            new_event: &EventPayload,
        ) -> ApiResult<()> {
            self.record(Call::ResolveCreate(
                existing_id.to_string(),
                new_event.name.clone(),
            ));
            self.resolution()
        }

        async fn resolve_update_conflict(
            &self,
            conflicting_id: &str,
            updated_event: &EventPayload,
        ) -> ApiResult<()> {
            self.record(Call::ResolveUpdate(
                conflicting_id.to_string(),
                updated_event.name.clone(),
            ));
            self.resolution()
        }

        async fn resolve_pending_event_conflict(
            &self,
            existing_id: &str,
            pending_id: &str,
        ) -> ApiResult<()> {
            self.record(Call::ResolvePending(
                existing_id.to_string(),
                pending_id.to_string(),
            ));
            self.resolution()
        }
    }

    fn create(name: &str) -> ConflictKind {
        ConflictKind::Create {
            payload: payload(name),
        }
    }

    fn pending(id: &str, name: &str) -> PendingEvent {
        PendingEvent {
            id: id.to_string(),
            event_requester_id: "7".to_string(),
            details: payload(name),
            created_at: None,
            last_modified_at: None,
        }
    }

    #[tokio::test]
    async fn accepted_write_goes_back_once() {
        let backend = FakeBackend::new(Reply::Accepted);
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let outcome = flow
            .submit(&backend, &mut navigator, create("Semana"))
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Success(Some(ref e)) if e.id == "NEW"));
        assert_eq!(flow.stage(), Stage::Success);
        assert_eq!(navigator.events, vec![NavigationEvent::Back(1)]);
        assert_eq!(backend.calls(), vec![Call::Create("Semana".to_string())]);
        assert_eq!(
            flow.transitions(),
            &[Stage::Idle, Stage::Submitting, Stage::Success]
        );
    }

    #[tokio::test]
    async fn create_conflict_replace_resolves_once_and_goes_back_twice() {
        let backend = FakeBackend::new(Reply::Conflict("E1"));
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let outcome = flow
            .submit(&backend, &mut navigator, create("Semana"))
            .await
            .unwrap();
        let SubmitOutcome::Conflict(conflict) = outcome else {
            panic!("expected a conflict");
        };
        assert_eq!(conflict.existing.id, "E1");
        assert_eq!(conflict.proposed(), &payload("Semana"));
        assert_eq!(flow.stage(), Stage::AwaitingUserDecision);
        assert_eq!(flow.pending_conflict(), Some(&conflict));

        let decided = flow
            .decide(&backend, &mut navigator, Decision::Replace)
            .await
            .unwrap();

        assert_eq!(decided, DecisionOutcome::Replaced);
        assert_eq!(flow.stage(), Stage::Replaced);
        assert!(flow.pending_conflict().is_none());
        assert_eq!(
            backend.calls(),
            vec![
                Call::Create("Semana".to_string()),
                Call::ResolveCreate("E1".to_string(), "Semana".to_string()),
            ]
        );
        assert_eq!(
            navigator.events,
            vec![
                NavigationEvent::ShowComparison {
                    existing_id: "E1".to_string(),
                    proposed_name: "Semana".to_string(),
                },
                NavigationEvent::Back(2),
            ]
        );
        assert_eq!(
            flow.transitions(),
            &[
                Stage::Idle,
                Stage::Submitting,
                Stage::ConflictDetected,
                Stage::AwaitingUserDecision,
                Stage::Replaced,
            ]
        );
    }

    #[tokio::test]
    async fn cancel_makes_no_call_and_goes_back_once() {
        let backend = FakeBackend::new(Reply::Conflict("E1"));
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        flow.submit(&backend, &mut navigator, create("Semana"))
            .await
            .unwrap();
        let decided = flow
            .decide(&backend, &mut navigator, Decision::Cancel)
            .await
            .unwrap();

        assert_eq!(decided, DecisionOutcome::Cancelled);
        assert_eq!(flow.stage(), Stage::Cancelled);
        assert_eq!(backend.calls(), vec![Call::Create("Semana".to_string())]);
        assert_eq!(navigator.events.last(), Some(&NavigationEvent::Back(1)));
    }

    #[tokio::test]
    async fn update_conflict_resolves_against_conflicting_event() {
        let backend = FakeBackend::new(Reply::Conflict("E5"));
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let kind = ConflictKind::Update {
            event_id: "E2".to_string(),
            payload: payload("Remarcada"),
        };
        flow.submit(&backend, &mut navigator, kind).await.unwrap();
        flow.decide(&backend, &mut navigator, Decision::Replace)
            .await
            .unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                Call::Update("E2".to_string(), "Remarcada".to_string()),
                Call::ResolveUpdate("E5".to_string(), "Remarcada".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn approval_conflict_pairs_existing_and_pending_ids() {
        let backend = FakeBackend::new(Reply::Conflict("E1"));
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let kind = ConflictKind::Approval {
            pending: pending("P1", "Oficina"),
        };
        flow.submit(&backend, &mut navigator, kind).await.unwrap();
        flow.decide(&backend, &mut navigator, Decision::Replace)
            .await
            .unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                Call::Approve("P1".to_string()),
                Call::ResolvePending("E1".to_string(), "P1".to_string()),
            ]
        );
        assert_eq!(navigator.events.last(), Some(&NavigationEvent::Back(2)));
    }

    #[tokio::test]
    async fn failed_submit_alerts_and_returns_to_idle() {
        let backend = FakeBackend::new(Reply::Fail(500));
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let error = flow
            .submit(&backend, &mut navigator, create("Semana"))
            .await
            .unwrap_err();

        assert!(matches!(error, FlowError::Api(ApiError::Status { status: 500, .. })));
        assert_eq!(flow.stage(), Stage::Idle);
        assert_eq!(
            navigator.events,
            vec![NavigationEvent::Alert(GENERIC_FAILURE_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn failed_resolve_alerts_and_returns_to_idle() {
        let backend = FakeBackend::new(Reply::Conflict("E1")).failing_resolve(500);
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        flow.submit(&backend, &mut navigator, create("Semana"))
            .await
            .unwrap();
        let result = flow
            .decide(&backend, &mut navigator, Decision::Replace)
            .await;

        assert!(result.is_err());
        assert_eq!(flow.stage(), Stage::Idle);
        assert_eq!(backend.calls().len(), 2);
        assert_eq!(
            navigator.events.last(),
            Some(&NavigationEvent::Alert(GENERIC_FAILURE_MESSAGE.to_string()))
        );
    }

    #[tokio::test]
    async fn rejects_out_of_order_calls() {
        let backend = FakeBackend::new(Reply::Conflict("E1"));
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let early = flow
            .decide(&backend, &mut navigator, Decision::Replace)
            .await;
        assert!(matches!(
            early,
            Err(FlowError::InvalidTransition {
                stage: Stage::Idle,
                ..
            })
        ));

        flow.submit(&backend, &mut navigator, create("Semana"))
            .await
            .unwrap();
        let again = flow
            .submit(&backend, &mut navigator, create("Outra"))
            .await;
        assert!(matches!(
            again,
            Err(FlowError::InvalidTransition {
                stage: Stage::AwaitingUserDecision,
                ..
            })
        ));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn finished_flow_can_submit_again() {
        let backend = FakeBackend::new(Reply::Accepted);
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        flow.submit(&backend, &mut navigator, create("Um"))
            .await
            .unwrap();
        flow.submit(&backend, &mut navigator, create("Dois"))
            .await
            .unwrap();

        assert_eq!(
            flow.transitions(),
            &[Stage::Idle, Stage::Submitting, Stage::Success]
        );
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn api_client_replaces_existing_event_over_http() {
        let server = MockServer::start().await;
        let existing = serde_json::to_value(event("E1", "Existente")).unwrap();
        let proposed = payload("Semana");

        Mock::given(method("POST"))
            .and(path("/api/events"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "existingEvent": existing })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/events/resolve/E1"))
            .and(body_json(serde_json::to_value(&proposed).unwrap()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap().with_token("tok");
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        flow.submit(
            &client,
            &mut navigator,
            ConflictKind::Create {
                payload: proposed.clone(),
            },
        )
        .await
        .unwrap();
        flow.decide(&client, &mut navigator, Decision::Replace)
            .await
            .unwrap();

        assert_eq!(flow.stage(), Stage::Replaced);
    }

    #[tokio::test]
    async fn conflict_with_null_fields_awaits_decision() {
        let server = MockServer::start().await;
        let mut existing = serde_json::to_value(event("E3", "Existente")).unwrap();
        existing["environment"] = serde_json::Value::Null;
        existing["courses"] = serde_json::Value::Null;

        Mock::given(method("POST"))
            .and(path("/api/events"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "existingEvent": existing })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap().with_token("tok");
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let outcome = flow
            .submit(&client, &mut navigator, create("Semana"))
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Conflict(ref c) if c.existing.id == "E3"));
        assert_eq!(flow.stage(), Stage::AwaitingUserDecision);
        assert!(matches!(
            navigator.events.first(),
            Some(NavigationEvent::ShowComparison { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_conflict_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "x" })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap().with_token("tok");
        let mut navigator = RecordingNavigator::default();
        let mut flow = ConflictFlow::new();

        let result = flow
            .submit(&client, &mut navigator, create("Semana"))
            .await;

        assert!(matches!(
            result,
            Err(FlowError::Api(ApiError::MalformedConflict(_)))
        ));
        assert_eq!(flow.stage(), Stage::Idle);
    }
}
