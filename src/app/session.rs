use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    domain::{Component, ComponentPatch, EditPath, EditSegment},
    form::{self, FieldEdit, FormCommand, Panel},
    tree::{apply_at, resolve},
};

use super::{
    error::EditorError,
    gateway::TestResult,
    options::EditorOptions,
    status::StatusLine,
    sync::{DraftError, TextSync},
};

/// Where the draft stands relative to what the caller last committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Clean,
    Dirty,
    Closed,
}

/// Identifies the node a test was started against.
///
/// A completion is applied only if its ticket still matches the session's
/// current one; navigation, reseeding and text replacement all move it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestTicket {
    session: u64,
    node: u64,
}

/// Read-only view handed to whatever renders the editor.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub working_copy: Arc<Component>,
    pub current: Arc<Component>,
    pub breadcrumbs: Vec<String>,
    pub test_result: Option<TestResult>,
    pub is_dirty: bool,
    pub is_testing: bool,
    pub text_mode: bool,
    pub status: String,
}

/// Synchronous editor controller: working copy, navigation stack, text view and test state.
///
/// Every mutation swaps the working-copy root for a new one built by
/// [`apply_at`]; nothing below the root is changed in place.
#[derive(Debug)]
pub struct EditorSession {
    options: EditorOptions,
    committed: Arc<Component>,
    working: Arc<Component>,
    path: EditPath,
    text: TextSync,
    text_mode: bool,
    test_result: Option<TestResult>,
    in_flight: Option<TestTicket>,
    session_epoch: u64,
    node_epoch: u64,
    closed: bool,
    status: StatusLine,
}

impl EditorSession {
    pub fn open(component: impl Into<Arc<Component>>, options: EditorOptions) -> Self {
        let root = component.into();
        let text = TextSync::new(options.text_format, options.debounce);
        let mut status = StatusLine::new();
        status.editing(root.display_name());
        debug!(root = root.display_name(), "editor session opened");
        Self {
            options,
            committed: Arc::clone(&root),
            working: root,
            path: EditPath::new(),
            text,
            text_mode: false,
            test_result: None,
            in_flight: None,
            session_epoch: 0,
            node_epoch: 0,
            closed: false,
            status,
        }
    }

    /// Replace the component being edited, as if the session had just been opened with it.
    pub fn reseed(&mut self, component: impl Into<Arc<Component>>) -> Result<(), EditorError> {
        self.ensure_open()?;
        let root = component.into();
        self.committed = Arc::clone(&root);
        self.working = root;
        self.path.clear();
        self.session_epoch += 1;
        self.node_epoch = 0;
        self.test_result = None;
        if self.text_mode {
            self.text.reset(&self.working);
        }
        self.status.editing(self.working.display_name());
        debug!(root = self.working.display_name(), "editor session reseeded");
        Ok(())
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn working_copy(&self) -> &Arc<Component> {
        &self.working
    }

    pub fn path(&self) -> &EditPath {
        &self.path
    }

    /// The node being edited. Falls back to the root when the stack no longer matches the tree.
    pub fn current(&self) -> &Arc<Component> {
        self.resolved().unwrap_or(&self.working)
    }

    /// Whether the navigation stack still resolves against the working copy.
    pub fn is_resolved(&self) -> bool {
        self.resolved().is_some()
    }

    pub fn panel(&self) -> Option<Panel> {
        form::render_panel(self.current())
    }

    pub fn state(&self) -> SessionState {
        if self.closed {
            SessionState::Closed
        } else if self.is_dirty() {
            SessionState::Dirty
        } else {
            SessionState::Clean
        }
    }

    pub fn is_dirty(&self) -> bool {
        !Arc::ptr_eq(&self.working, &self.committed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Result<(), EditorError> {
        match command {
            FormCommand::Edit(edit) => self.apply_edit(edit),
            FormCommand::Patch(patch) => self.apply_patch(&patch),
            FormCommand::Navigate(segment) => self.navigate(segment).map(|_| ()),
            FormCommand::NavigateBack => self.navigate_back().map(|_| ()),
            FormCommand::NavigateTo(depth) => self.navigate_to(depth),
        }
    }

    /// Apply a partial update to the current node.
    pub fn apply_patch(&mut self, patch: &ComponentPatch) -> Result<(), EditorError> {
        self.ensure_open()?;
        let target: &[EditSegment] = if self.is_resolved() {
            self.path.segments()
        } else {
            &[]
        };
        let next = apply_at(&self.working, target, patch);
        if Arc::ptr_eq(&next, &self.working) {
            debug!(depth = target.len(), "patch left the tree unchanged");
            return Ok(());
        }
        debug!(depth = target.len(), "patch applied");
        self.replace_working(next);
        if self.text_mode && !self.text.has_pending() {
            self.text.reset(&self.working);
        }
        self.status.value_updated();
        Ok(())
    }

    /// Coerce a field edit through the current node's variant and apply it.
    ///
    /// Edits on a node of unknown variant are ignored.
    pub fn apply_edit(&mut self, edit: FieldEdit) -> Result<(), EditorError> {
        self.ensure_open()?;
        match form::apply_field_edit(self.current(), &edit)? {
            Some(patch) => self.apply_patch(&patch),
            None => {
                debug!(pointer = %edit.target.pointer(), "edit ignored on unknown variant");
                Ok(())
            }
        }
    }

    /// Open a nested component. Returns `false` when the request was ignored, either
    /// because deep navigation is off or because the child does not exist.
    pub fn navigate(&mut self, segment: EditSegment) -> Result<bool, EditorError> {
        self.ensure_open()?;
        if !self.options.allow_deep_navigation {
            debug!(field = %segment.parent_field, "navigation disabled, request ignored");
            return Ok(false);
        }
        let mut next = self.path.clone();
        next.push(segment);
        if resolve(&self.working, next.segments()).is_none() {
            debug!("navigation target not found, request ignored");
            return Ok(false);
        }
        self.path = next;
        self.node_changed();
        Ok(true)
    }

    pub fn navigate_back(&mut self) -> Result<bool, EditorError> {
        self.ensure_open()?;
        if self.path.pop().is_none() {
            return Ok(false);
        }
        self.node_changed();
        Ok(true)
    }

    /// Truncate the stack to `depth` segments (breadcrumb click). `0` returns to the root.
    pub fn navigate_to(&mut self, depth: usize) -> Result<(), EditorError> {
        self.ensure_open()?;
        if depth >= self.path.len() {
            return Ok(());
        }
        self.path.truncate(depth);
        self.node_changed();
        Ok(())
    }

    /// First crumb names the root, then one per segment.
    pub fn breadcrumbs(&self) -> Vec<String> {
        let root = self
            .working
            .label
            .clone()
            .unwrap_or_else(|| "Root".to_string());
        std::iter::once(root)
            .chain(self.path.segments().iter().map(|segment| segment.crumb().to_string()))
            .collect()
    }

    pub fn is_text_mode(&self) -> bool {
        self.text_mode
    }

    /// Switch views. Entering text mode renders the working copy; leaving it
    /// flushes any pending draft first.
    pub fn set_text_mode(&mut self, enabled: bool) -> Result<(), EditorError> {
        self.ensure_open()?;
        if enabled == self.text_mode {
            return Ok(());
        }
        if enabled {
            self.text.reset(&self.working);
        } else {
            self.flush_text()?;
        }
        self.text_mode = enabled;
        Ok(())
    }

    pub fn text(&self) -> &str {
        self.text.text()
    }

    /// Record a text edit. It is parsed once `now + debounce` passes without further edits.
    pub fn edit_text(&mut self, text: impl Into<String>, now: Instant) -> Result<(), EditorError> {
        self.ensure_open()?;
        if !self.text_mode {
            self.set_text_mode(true)?;
        }
        self.text.edit(text, now);
        Ok(())
    }

    pub fn text_deadline(&self) -> Option<Instant> {
        self.text.deadline()
    }

    /// Flush the draft once its debounce deadline has passed.
    /// Returns whether the working copy changed.
    pub fn poll_text(&mut self, now: Instant) -> Result<bool, EditorError> {
        if !self.text.is_due(now) {
            return Ok(false);
        }
        self.flush_text()
    }

    /// Parse the pending draft now. A malformed draft leaves the working copy untouched.
    pub fn flush_text(&mut self) -> Result<bool, EditorError> {
        self.ensure_open()?;
        match self.text.take_pending() {
            None => Ok(false),
            Some(Err(_)) => {
                self.status.draft_rejected();
                Ok(false)
            }
            Some(Ok(component)) => {
                self.replace_working(Arc::new(component));
                // The node under test may no longer exist.
                self.node_changed();
                self.status.value_updated();
                Ok(true)
            }
        }
    }

    pub fn last_draft_error(&self) -> Option<&DraftError> {
        self.text.last_error()
    }

    pub fn test_result(&self) -> Option<&TestResult> {
        self.test_result.as_ref()
    }

    pub fn is_testing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_test(&self) -> bool {
        !self.closed && self.in_flight.is_none() && form::is_testable(self.current())
    }

    /// Start a test of the current node. `None` when one is already running or the
    /// node is not testable.
    pub fn begin_test(&mut self) -> Result<Option<(TestTicket, Arc<Component>)>, EditorError> {
        self.ensure_open()?;
        if self.in_flight.is_some() {
            debug!("test already in flight, request ignored");
            return Ok(None);
        }
        let node = Arc::clone(self.current());
        if !form::is_testable(&node) {
            debug!(variant = %node.component_type, "component is not testable");
            return Ok(None);
        }
        let ticket = self.ticket();
        self.test_result = None;
        self.in_flight = Some(ticket);
        self.status.testing(node.display_name());
        info!(node = node.display_name(), "component test started");
        Ok(Some((ticket, node)))
    }

    /// Deliver a test outcome. Returns whether it was stored; a result for a node the
    /// user has since left, or for a closed session, is dropped.
    pub fn complete_test(&mut self, ticket: TestTicket, result: TestResult) -> bool {
        if self.closed {
            debug!("test finished after session closed, result dropped");
            return false;
        }
        self.in_flight = None;
        if ticket != self.ticket() {
            debug!("stale test result dropped");
            return false;
        }
        if result.status {
            self.status.test_passed();
        } else {
            self.status.test_failed(result.message.as_deref());
        }
        self.test_result = Some(result);
        true
    }

    pub fn dismiss_test_result(&mut self) {
        self.test_result = None;
    }

    /// Close the session and hand back the working copy. A pending text draft is flushed first.
    pub fn save(&mut self) -> Result<Arc<Component>, EditorError> {
        self.ensure_open()?;
        if self.text_mode {
            self.flush_text()?;
        }
        let saved = Arc::clone(&self.working);
        self.committed = Arc::clone(&saved);
        self.close();
        self.status.saved();
        info!(root = saved.display_name(), "component saved");
        Ok(saved)
    }

    /// Close the session, discarding the working copy.
    pub fn cancel(&mut self) -> Result<(), EditorError> {
        self.ensure_open()?;
        let dirty = self.is_dirty();
        self.working = Arc::clone(&self.committed);
        self.close();
        self.status.discarded();
        info!(dirty, "component edit cancelled");
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            working_copy: Arc::clone(&self.working),
            current: Arc::clone(self.current()),
            breadcrumbs: self.breadcrumbs(),
            test_result: self.test_result.clone(),
            is_dirty: self.is_dirty(),
            is_testing: self.is_testing(),
            text_mode: self.text_mode,
            status: self.status.message().to_string(),
        }
    }

    fn resolved(&self) -> Option<&Arc<Component>> {
        resolve(&self.working, self.path.segments())
    }

    fn replace_working(&mut self, next: Arc<Component>) {
        self.working = next;
        if !self.is_resolved() && !self.path.is_empty() {
            warn!(depth = self.path.len(), "navigation path no longer resolves, editing root");
        }
    }

    fn node_changed(&mut self) {
        self.node_epoch += 1;
        self.test_result = None;
        let name = self.current().display_name().to_string();
        debug!(depth = self.path.len(), "editing {name}");
        self.status.editing(&name);
    }

    fn ticket(&self) -> TestTicket {
        TestTicket {
            session: self.session_epoch,
            node: self.node_epoch,
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.in_flight = None;
        self.text_mode = false;
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.closed {
            warn!("operation on closed editor session");
            return Err(EditorError::Closed);
        }
        Ok(())
    }
}
