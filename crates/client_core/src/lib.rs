use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::domain::ChatMessage;
use shared::protocol::RENDERED_SOW_FILENAME;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod form;
pub mod transcript;
pub mod transport;

pub use form::{FormValidation, SowForm, SowFormField};
pub use transcript::RefinementLog;
pub use transport::{HttpSowBackend, MissingSowBackend, SowBackend, TransportError};

/// Lifecycle of the one generate-or-refine slot.
///
/// The in-flight guard is carried by the tag itself: while the state is
/// `GeneratingInitial` or `RefiningContent`, no new generate/refine request
/// may be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No content generated yet, no request in flight.
    Idle,
    /// A generate request is in flight, no content yet.
    GeneratingInitial,
    /// Content is available for display; no request in flight.
    Ready { content: String },
    /// A chat-refinement request is in flight; prior content remains
    /// displayable until the replacement arrives.
    RefiningContent { prior_content: String },
    /// The most recent request failed. Content from before the failure is
    /// retained so the user does not lose prior work.
    Failed {
        last_content: Option<String>,
        error: TransportError,
    },
}

impl SessionState {
    pub fn is_request_in_flight(&self) -> bool {
        matches!(
            self,
            SessionState::GeneratingInitial | SessionState::RefiningContent { .. }
        )
    }
}

/// Like acknowledgment status, orthogonal to [`SessionState`]; liking never
/// mutates generated content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeAckState {
    NotLiked,
    Liking,
    Liked,
    LikeFailed { message: String },
}

/// Local rejections and surfaced transport failures.
///
/// The local variants never touch [`SessionState`] and never dispatch a
/// network call; `Transport` accompanies the state transition already
/// applied by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{reason}")]
    InvalidForm { reason: String },
    #[error("another generate or refine request is already in flight")]
    RequestInFlight,
    #[error("chat message must not be empty")]
    EmptyChatMessage,
    #[error("no generated document available to refine")]
    NothingToRefine,
    #[error("no generated document available to like")]
    NothingToLike,
    #[error("a like request is already in flight")]
    LikeInFlight,
    #[error("failed to save rendered document: {0}")]
    SaveDocument(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Notifications for front-ends; rendered UIs subscribe instead of polling.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(SessionState),
    TranscriptAppended(ChatMessage),
    LikeStateChanged(LikeAckState),
}

struct SessionInner {
    form: SowForm,
    state: SessionState,
    transcript: RefinementLog,
    like: LikeAckState,
}

impl SessionInner {
    fn reject_if_request_in_flight(&self) -> Result<(), SessionError> {
        if self.state.is_request_in_flight() {
            Err(SessionError::RequestInFlight)
        } else {
            Ok(())
        }
    }

    /// The content a front-end is currently showing, independent of any
    /// in-flight refinement.
    fn displayed_content(&self) -> Option<String> {
        match &self.state {
            SessionState::Ready { content } => Some(content.clone()),
            SessionState::RefiningContent { prior_content } => Some(prior_content.clone()),
            SessionState::Failed { last_content, .. } => last_content.clone(),
            SessionState::Idle | SessionState::GeneratingInitial => None,
        }
    }
}

/// Controller for one SOW authoring session: form snapshotting, request
/// dispatch, and the idle/loading/ready/error transitions.
///
/// At most one generate-or-refine request is outstanding at any instant;
/// requests attempted while one is in flight are rejected locally, never
/// queued. Like and download are independent of that serialization. The
/// session lock is never held across a transport await.
pub struct SowSession {
    backend: Arc<dyn SowBackend>,
    inner: Mutex<SessionInner>,
    events: broadcast::Sender<SessionEvent>,
}

impl SowSession {
    pub fn new(backend: Arc<dyn SowBackend>) -> Arc<Self> {
        Self::with_form(backend, SowForm::default())
    }

    pub fn with_form(backend: Arc<dyn SowBackend>, form: SowForm) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            inner: Mutex::new(SessionInner {
                form,
                state: SessionState::Idle,
                transcript: RefinementLog::new(),
                like: LikeAckState::NotLiked,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    /// Sets exactly one form field. Edits made while a request is in flight
    /// never affect the already-dispatched payload; generation works from a
    /// snapshot.
    pub async fn set_field(&self, field: SowFormField, value: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.form.set_field(field, value);
    }

    /// Replaces the whole form, e.g. after loading one from a file.
    pub async fn replace_form(&self, form: SowForm) {
        let mut inner = self.inner.lock().await;
        inner.form = form;
    }

    pub async fn form(&self) -> SowForm {
        self.inner.lock().await.form.clone()
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    pub async fn like_state(&self) -> LikeAckState {
        self.inner.lock().await.like.clone()
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.transcript.all().to_vec()
    }

    pub async fn displayed_content(&self) -> Option<String> {
        self.inner.lock().await.displayed_content()
    }

    /// Dispatches a generate request from the current form.
    ///
    /// A new generate always supersedes previous content regardless of the
    /// current state; the form is the single source of truth, not the chat
    /// log. Validation failures and the in-flight guard reject locally
    /// without dispatching or touching state.
    pub async fn generate(&self) -> Result<String, SessionError> {
        let snapshot = {
            let mut inner = self.inner.lock().await;
            inner.reject_if_request_in_flight()?;
            if let FormValidation::Invalid { reason } = inner.form.validate_for_submission() {
                return Err(SessionError::InvalidForm { reason });
            }
            inner.state = SessionState::GeneratingInitial;
            self.emit(SessionEvent::StateChanged(inner.state.clone()));
            inner.form.clone()
        };

        match self.backend.generate(&snapshot).await {
            Ok(document) => {
                let content = document.message;
                let mut inner = self.inner.lock().await;
                inner.state = SessionState::Ready {
                    content: content.clone(),
                };
                inner.like = LikeAckState::NotLiked;
                self.emit(SessionEvent::StateChanged(inner.state.clone()));
                self.emit(SessionEvent::LikeStateChanged(inner.like.clone()));
                info!("session: generate succeeded ({} bytes)", content.len());
                Ok(content)
            }
            Err(error) => {
                let mut inner = self.inner.lock().await;
                inner.state = SessionState::Failed {
                    last_content: None,
                    error: error.clone(),
                };
                self.emit(SessionEvent::StateChanged(inner.state.clone()));
                warn!("session: generate failed: {error}");
                Err(error.into())
            }
        }
    }

    /// Sends one chat message asking the backend to revise the current
    /// document.
    ///
    /// Refinement proceeds from `Ready` content, or from the retained
    /// content of a `Failed` state when a prior success exists. The user
    /// entry is appended to the transcript before dispatch; the assistant
    /// entry only on success. On failure the content rolls back to the
    /// pre-refinement value.
    pub async fn send_chat(&self, message: &str) -> Result<String, SessionError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyChatMessage);
        }

        let prior = {
            let mut inner = self.inner.lock().await;
            inner.reject_if_request_in_flight()?;
            let prior = match &inner.state {
                SessionState::Ready { content } => content.clone(),
                SessionState::Failed {
                    last_content: Some(content),
                    ..
                } => content.clone(),
                _ => return Err(SessionError::NothingToRefine),
            };
            let user_message = ChatMessage::user(trimmed);
            inner.transcript.append(user_message.clone());
            self.emit(SessionEvent::TranscriptAppended(user_message));
            inner.state = SessionState::RefiningContent {
                prior_content: prior.clone(),
            };
            self.emit(SessionEvent::StateChanged(inner.state.clone()));
            prior
        };

        match self.backend.refine(trimmed, &prior).await {
            Ok(document) => {
                let content = document.message;
                let mut inner = self.inner.lock().await;
                let assistant_message = ChatMessage::assistant(content.clone());
                inner.transcript.append(assistant_message.clone());
                self.emit(SessionEvent::TranscriptAppended(assistant_message));
                inner.state = SessionState::Ready {
                    content: content.clone(),
                };
                inner.like = LikeAckState::NotLiked;
                self.emit(SessionEvent::StateChanged(inner.state.clone()));
                self.emit(SessionEvent::LikeStateChanged(inner.like.clone()));
                info!("session: refine succeeded ({} bytes)", content.len());
                Ok(content)
            }
            Err(error) => {
                let mut inner = self.inner.lock().await;
                inner.state = SessionState::Failed {
                    last_content: Some(prior),
                    error: error.clone(),
                };
                self.emit(SessionEvent::StateChanged(inner.state.clone()));
                warn!("session: refine failed: {error}");
                Err(error.into())
            }
        }
    }

    /// Marks the currently-displayed document as liked. Runs independently
    /// of any in-flight generate/refine and never alters [`SessionState`].
    pub async fn like(&self) -> Result<(), SessionError> {
        let content = {
            let mut inner = self.inner.lock().await;
            if matches!(inner.like, LikeAckState::Liking) {
                return Err(SessionError::LikeInFlight);
            }
            let Some(content) = inner.displayed_content() else {
                return Err(SessionError::NothingToLike);
            };
            inner.like = LikeAckState::Liking;
            self.emit(SessionEvent::LikeStateChanged(inner.like.clone()));
            content
        };

        match self.backend.like(&content).await {
            Ok(()) => {
                let mut inner = self.inner.lock().await;
                inner.like = LikeAckState::Liked;
                self.emit(SessionEvent::LikeStateChanged(inner.like.clone()));
                Ok(())
            }
            Err(error) => {
                let mut inner = self.inner.lock().await;
                inner.like = LikeAckState::LikeFailed {
                    message: error.message.clone(),
                };
                self.emit(SessionEvent::LikeStateChanged(inner.like.clone()));
                warn!("session: like failed: {error}");
                Err(error.into())
            }
        }
    }

    /// Fetches the backend's most recently rendered binary artifact. This
    /// reflects the backend's last successful render, which may lag the
    /// content displayed here; failures never alter [`SessionState`].
    pub async fn fetch_rendered_document(&self) -> Result<Vec<u8>, SessionError> {
        let bytes = self.backend.fetch_rendered_document().await?;
        Ok(bytes)
    }

    /// Fetches the rendered artifact and saves it under the fixed filename
    /// in `dir`, returning the written path.
    pub async fn save_rendered_document(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let bytes = self.backend.fetch_rendered_document().await?;
        let path = dir.join(RENDERED_SOW_FILENAME);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|err| SessionError::SaveDocument(format!("{}: {err}", path.display())))?;
        info!("session: saved rendered document to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
