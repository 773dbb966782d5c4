//! PendingDrafts - outstanding assistant requests, one per view.
//!
//! Each submission runs as its own Tokio task so store mutations are never
//! blocked by a slow provider. A view may have at most one request in
//! flight; a second submission for the same view is refused until the first
//! result has been taken. Nothing cancels a request implicitly: if the deal
//! behind an analysis moves stage while the request is outstanding, the
//! result for the old stage is still delivered.

use futures::FutureExt;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use super::DraftAssistant;
use crate::domain::assistant::{AssistantContext, DraftKind};
use crate::domain::foundation::{ContactId, DealId};

/// Identity of the view waiting on a draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// Email composer opened for a contact.
    EmailComposer(ContactId),
    /// Analysis panel of a deal.
    DealInsight(DealId),
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKey::EmailComposer(id) => write!(f, "email-composer:{}", id),
            ViewKey::DealInsight(id) => write!(f, "deal-insight:{}", id),
        }
    }
}

/// Result of [`PendingDrafts::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was started for the view.
    Submitted,
    /// The view already has a request whose result has not been taken.
    AlreadyPending,
    /// No Tokio runtime is running on the calling thread; nothing was started.
    NoRuntime,
}

struct PendingDraft {
    kind: DraftKind,
    handle: JoinHandle<String>,
}

/// Registry of in-flight draft requests keyed by view.
pub struct PendingDrafts {
    assistant: Arc<DraftAssistant>,
    pending: Mutex<HashMap<ViewKey, PendingDraft>>,
}

impl PendingDrafts {
    pub fn new(assistant: Arc<DraftAssistant>) -> Self {
        Self {
            assistant,
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<ViewKey, PendingDraft>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a request for `view` on the current Tokio runtime.
    ///
    /// Outside a runtime the request is refused with
    /// [`SubmitOutcome::NoRuntime`] and the view stays idle.
    pub fn submit(&self, view: ViewKey, context: AssistantContext) -> SubmitOutcome {
        let mut pending = self.pending();
        if pending.contains_key(&view) {
            debug!(%view, "Draft already pending");
            return SubmitOutcome::AlreadyPending;
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(error) => {
                warn!(%view, %error, "Draft not submitted: no async runtime");
                return SubmitOutcome::NoRuntime;
            }
        };

        let kind = context.kind();
        let assistant = Arc::clone(&self.assistant);
        let handle = runtime.spawn(async move { assistant.request_draft(&context).await });

        debug!(%view, %kind, "Draft submitted");
        pending.insert(view, PendingDraft { kind, handle });
        SubmitOutcome::Submitted
    }

    /// True while `view` has a request whose result has not been taken.
    pub fn is_pending(&self, view: &ViewKey) -> bool {
        self.pending().contains_key(view)
    }

    /// Number of views with an outstanding request.
    pub fn len(&self) -> usize {
        self.pending().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending().is_empty()
    }

    /// Takes the result for `view` if the request has finished.
    ///
    /// Returns `None` when nothing was submitted or the request is still
    /// running; in the latter case it stays pending.
    pub fn try_take(&self, view: &ViewKey) -> Option<String> {
        let mut pending = self.pending();
        if !pending.get(view)?.handle.is_finished() {
            return None;
        }
        let draft = pending.remove(view)?;
        drop(pending);

        let kind = draft.kind;
        match draft.handle.now_or_never() {
            Some(result) => Some(Self::settle(view, kind, result)),
            None => Some(kind.failure_fallback().to_string()),
        }
    }

    /// Waits for the result for `view`. `None` if nothing was submitted.
    pub async fn resolve(&self, view: &ViewKey) -> Option<String> {
        let draft = self.pending().remove(view)?;
        let result = draft.handle.await;
        Some(Self::settle(view, draft.kind, result))
    }

    /// Aborts the request for `view`. Returns false if none was pending.
    pub fn cancel(&self, view: &ViewKey) -> bool {
        match self.pending().remove(view) {
            Some(draft) => {
                draft.handle.abort();
                debug!(%view, "Draft cancelled");
                true
            }
            None => false,
        }
    }

    fn settle(view: &ViewKey, kind: DraftKind, result: Result<String, JoinError>) -> String {
        result.unwrap_or_else(|error| {
            warn!(%view, %kind, %error, "Draft task did not complete");
            kind.failure_fallback().to_string()
        })
    }
}

impl Drop for PendingDrafts {
    fn drop(&mut self) {
        for (_, draft) in self.pending().drain() {
            draft.handle.abort();
        }
    }
}
