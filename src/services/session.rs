//! The single study session the page renders from.
//!
//! Every submission is stamped with a ticket. Only the reply carrying the
//! newest ticket is applied, so a slow earlier call can never overwrite a
//! later one, and nothing lands after `clear`.

use serde::Serialize;

use crate::error::{GENERATION_FAILED_MESSAGE, GenerationError, InputError, ViewError};
use crate::models::{AiResponse, AppMode, SubmitRequest};
use crate::services::results::{QuizState, ResultsView, Tab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What the user last typed and picked, echoed back into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub prompt: String,
    pub mode: AppMode,
    pub file_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    draft: Draft,
    last_issued: u64,
    pending: Option<Ticket>,
    result: Option<AiResponse>,
    view: Option<ResultsView>,
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub draft: Draft,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<AiResponse>,
    pub tabs: Vec<Tab>,
    pub active_tab: Tab,
    pub quiz: QuizState,
    pub solved: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a submission, or records the input error without issuing a ticket.
    pub fn begin(&mut self, request: &SubmitRequest) -> Result<Ticket, InputError> {
        self.draft = Draft {
            prompt: request.prompt.clone(),
            mode: request.mode,
            file_name: request
                .attachment
                .as_ref()
                .and_then(|file| file.file_name.clone()),
        };

        if let Err(err) = request.validate() {
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.last_issued += 1;
        let ticket = Ticket(self.last_issued);
        self.pending = Some(ticket);
        self.result = None;
        self.view = None;
        self.error = None;
        Ok(ticket)
    }

    /// Applies a finished call. Returns `false` when the ticket is stale.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<AiResponse, GenerationError>) -> bool {
        if self.pending != Some(ticket) {
            tracing::warn!(
                ticket = ticket.id(),
                latest = self.last_issued,
                "Discarding stale generation result"
            );
            return false;
        }

        self.pending = None;
        match outcome {
            Ok(response) => {
                self.view = Some(ResultsView::new(&response));
                self.result = Some(response);
                self.error = None;
            }
            Err(err) => {
                tracing::error!(
                    ticket = ticket.id(),
                    error = %err,
                    transport = err.is_transport(),
                    "Generation failed"
                );
                self.view = None;
                self.result = None;
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Drops input, result and quiz state; any call still in flight is ignored when it lands.
    pub fn clear(&mut self) {
        self.draft = Draft::default();
        self.last_issued += 1;
        self.pending = None;
        self.result = None;
        self.view = None;
        self.error = None;
    }

    /// Picks another mode. The typed prompt survives; the shown result and error do not.
    pub fn switch_mode(&mut self, prompt: String, mode: AppMode) {
        tracing::debug!(from = %self.draft.mode, to = %mode, "Switching mode");
        self.draft = Draft {
            prompt,
            mode,
            file_name: None,
        };
        self.result = None;
        self.view = None;
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn result(&self) -> Option<&AiResponse> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> Option<&ResultsView> {
        self.view.as_ref()
    }

    pub fn active_tab(&self) -> Tab {
        self.view
            .as_ref()
            .map(ResultsView::active_tab)
            .unwrap_or_default()
    }

    pub fn select_tab(&mut self, tab: Tab) -> Result<(), ViewError> {
        self.view.as_mut().ok_or(ViewError::NoResult)?.select_tab(tab)
    }

    pub fn select_option(&mut self, index: usize, option: &str) -> Result<(), ViewError> {
        match (self.result.as_ref(), self.view.as_mut()) {
            (Some(result), Some(view)) => view.select_option(result, index, option),
            _ => Err(ViewError::NoResult),
        }
    }

    pub fn reveal(&mut self, index: usize) -> Result<(), ViewError> {
        match (self.result.as_ref(), self.view.as_mut()) {
            (Some(result), Some(view)) => view.reveal(result, index),
            _ => Err(ViewError::NoResult),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            draft: self.draft.clone(),
            loading: self.is_loading(),
            error: self.error.clone(),
            result: self.result.clone(),
            tabs: self
                .view
                .as_ref()
                .map(|view| view.tabs().to_vec())
                .unwrap_or_default(),
            active_tab: self.active_tab(),
            quiz: self
                .view
                .as_ref()
                .map(|view| view.quiz().clone())
                .unwrap_or_default(),
            solved: self.view.as_ref().map_or(0, ResultsView::solved_count),
        }
    }
}
