use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Instant, sleep_until, timeout},
};
use tracing::{debug, warn};

use crate::{domain::Component, form::FormCommand};

use super::{
    error::EditorError,
    gateway::{TestResult, ValidationGateway, run_test},
    options::EditorOptions,
    session::{EditorSession, SessionSnapshot, TestTicket},
};

const QUEUE_DEPTH: usize = 64;

type Reply<T> = oneshot::Sender<Result<T, EditorError>>;

enum EditorEvent {
    Command(FormCommand, Reply<()>),
    Text(String),
    TextMode(bool, Reply<()>),
    StartTest(Reply<bool>),
    TestFinished(TestTicket, TestResult),
    DismissTest,
    Reseed(Arc<Component>, Reply<()>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Save(Reply<Arc<Component>>),
    Cancel(Reply<()>),
}

/// How a runtime session ended.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Saved(Arc<Component>),
    Cancelled,
    /// Every handle was dropped before save or cancel.
    Abandoned,
}

/// Cloneable handle to an editor session running on its own task.
///
/// All events (form commands, text edits, test completions) go through one
/// queue, so they are applied strictly one after another.
#[derive(Debug, Clone)]
pub struct EditorHandle {
    tx: mpsc::Sender<EditorEvent>,
}

impl std::fmt::Debug for EditorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EditorEvent::Command(..) => "Command",
            EditorEvent::Text(_) => "Text",
            EditorEvent::TextMode(..) => "TextMode",
            EditorEvent::StartTest(_) => "StartTest",
            EditorEvent::TestFinished(..) => "TestFinished",
            EditorEvent::DismissTest => "DismissTest",
            EditorEvent::Reseed(..) => "Reseed",
            EditorEvent::Snapshot(_) => "Snapshot",
            EditorEvent::Save(_) => "Save",
            EditorEvent::Cancel(_) => "Cancel",
        };
        f.write_str(name)
    }
}

impl EditorHandle {
    /// Open a session on `component` and run it on a new task.
    pub fn spawn(
        component: impl Into<Arc<Component>>,
        options: EditorOptions,
        gateway: Arc<dyn ValidationGateway>,
    ) -> (EditorHandle, JoinHandle<SessionOutcome>) {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let session = EditorSession::open(component, options);
        let actor = EditorActor {
            session,
            rx,
            completions: tx.downgrade(),
            gateway,
        };
        let join = tokio::spawn(actor.run());
        (EditorHandle { tx }, join)
    }

    pub async fn dispatch(&self, command: FormCommand) -> Result<(), EditorError> {
        self.request(|reply| EditorEvent::Command(command, reply)).await
    }

    /// Replace the text draft. Parsed after the debounce interval.
    pub async fn edit_text(&self, text: impl Into<String>) -> Result<(), EditorError> {
        self.send(EditorEvent::Text(text.into())).await
    }

    pub async fn set_text_mode(&self, enabled: bool) -> Result<(), EditorError> {
        self.request(|reply| EditorEvent::TextMode(enabled, reply)).await
    }

    /// Start testing the current node. `false` when the request was ignored.
    pub async fn start_test(&self) -> Result<bool, EditorError> {
        self.request(EditorEvent::StartTest).await
    }

    pub async fn dismiss_test_result(&self) -> Result<(), EditorError> {
        self.send(EditorEvent::DismissTest).await
    }

    pub async fn reseed(&self, component: impl Into<Arc<Component>>) -> Result<(), EditorError> {
        let component = component.into();
        self.request(|reply| EditorEvent::Reseed(component, reply)).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, EditorError> {
        let (reply, rx) = oneshot::channel();
        self.send(EditorEvent::Snapshot(reply)).await?;
        rx.await.map_err(|_| EditorError::RuntimeStopped)
    }

    pub async fn save(&self) -> Result<Arc<Component>, EditorError> {
        self.request(EditorEvent::Save).await
    }

    pub async fn cancel(&self) -> Result<(), EditorError> {
        self.request(EditorEvent::Cancel).await
    }

    async fn send(&self, event: EditorEvent) -> Result<(), EditorError> {
        self.tx.send(event).await.map_err(|_| EditorError::Closed)
    }

    async fn request<T>(
        &self,
        event: impl FnOnce(Reply<T>) -> EditorEvent,
    ) -> Result<T, EditorError> {
        let (reply, rx) = oneshot::channel();
        self.send(event(reply)).await?;
        rx.await.map_err(|_| EditorError::RuntimeStopped)?
    }
}

struct EditorActor {
    session: EditorSession,
    rx: mpsc::Receiver<EditorEvent>,
    completions: mpsc::WeakSender<EditorEvent>,
    gateway: Arc<dyn ValidationGateway>,
}

impl EditorActor {
    async fn run(mut self) -> SessionOutcome {
        loop {
            let deadline = self.session.text_deadline();
            let wake = deadline.unwrap_or_else(Instant::now);
            // A due draft is applied before anything queued behind it.
            let event = tokio::select! {
                biased;
                _ = sleep_until(wake), if deadline.is_some() => {
                    if let Err(err) = self.session.poll_text(Instant::now()) {
                        warn!(error = %err, "debounced text flush failed");
                    }
                    continue;
                }
                event = self.rx.recv() => event,
            };
            let Some(event) = event else {
                debug!("all editor handles dropped");
                return SessionOutcome::Abandoned;
            };
            if let Some(outcome) = self.handle(event) {
                return outcome;
            }
        }
    }

    fn handle(&mut self, event: EditorEvent) -> Option<SessionOutcome> {
        debug!(?event, "editor event");
        match event {
            EditorEvent::Command(command, reply) => {
                let _ = reply.send(self.session.dispatch(command));
            }
            EditorEvent::Text(text) => {
                if let Err(err) = self.session.edit_text(text, Instant::now()) {
                    warn!(error = %err, "text edit rejected");
                }
            }
            EditorEvent::TextMode(enabled, reply) => {
                let _ = reply.send(self.session.set_text_mode(enabled));
            }
            EditorEvent::StartTest(reply) => {
                let started = self.session.begin_test().map(|started| match started {
                    Some((ticket, node)) => {
                        self.spawn_test(ticket, node);
                        true
                    }
                    None => false,
                });
                let _ = reply.send(started);
            }
            EditorEvent::TestFinished(ticket, result) => {
                self.session.complete_test(ticket, result);
            }
            EditorEvent::DismissTest => self.session.dismiss_test_result(),
            EditorEvent::Reseed(component, reply) => {
                let _ = reply.send(self.session.reseed(component));
            }
            EditorEvent::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
            }
            EditorEvent::Save(reply) => {
                let saved = self.session.save();
                let outcome = saved.as_ref().ok().cloned().map(SessionOutcome::Saved);
                let _ = reply.send(saved);
                return outcome;
            }
            EditorEvent::Cancel(reply) => {
                let cancelled = self.session.cancel();
                let outcome = cancelled.is_ok().then_some(SessionOutcome::Cancelled);
                let _ = reply.send(cancelled);
                return outcome;
            }
        }
        None
    }

    fn spawn_test(&self, ticket: TestTicket, node: Arc<Component>) {
        let gateway = Arc::clone(&self.gateway);
        let completions = self.completions.clone();
        let limit = self.session.options().test_timeout;
        tokio::spawn(async move {
            let result = match timeout(limit, run_test(gateway.as_ref(), &node)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(?limit, "component test timed out");
                    TestResult::failed(format!("test timed out after {}s", limit.as_secs()))
                }
            };
            // The session may be gone by now; then there is nobody to tell.
            if let Some(tx) = completions.upgrade() {
                let _ = tx.send(EditorEvent::TestFinished(ticket, result)).await;
            }
        });
    }
}
