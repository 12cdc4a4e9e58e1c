use std::sync::Arc;

use crate::cache::AccountCache;
use crate::events::{AppCommand, DataEvent};
use crate::state::post::PostKey;
use crate::state::{
    account_form::AccountForm, reducer, transaction::TransactionDraft, validators, AppState,
    Form, FormId,
};

/// Trait for handling command execution (production = background tasks, test = mock)
///
/// This trait abstracts the side effects of command execution, allowing tests
/// to inject a mock implementation that doesn't spawn tasks or make API calls.
pub trait DataEventHandler {
    /// Execute a command with access to mutable state
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState);
}

/// Form logic without any I/O
///
/// Generic over H (handler). Validation happens here, synchronously; only
/// commands that passed it reach the handler.
pub struct AppCore<H: DataEventHandler> {
    ui_state: AppState,
    handler: H,
}

impl<H: DataEventHandler> AppCore<H> {
    pub fn new(handler: H, cache: Arc<AccountCache>) -> Self {
        Self {
            ui_state: AppState::new(cache),
            handler,
        }
    }

    fn dispatch(&mut self, command: AppCommand) {
        self.handler.execute_with_context(command, &mut self.ui_state);
    }

    /// Ask for the account cache to be filled (no-op once it is)
    pub fn load_accounts(&mut self) {
        self.dispatch(AppCommand::LoadAccounts);
    }

    /// Mount a draft. Account autocomplete needs the cache, so this also
    /// starts loading it.
    pub fn mount_transaction_form(&mut self, draft: TransactionDraft) -> FormId {
        let id = self.ui_state.mount(Form::Transaction(draft));
        self.load_accounts();
        id
    }

    pub fn mount_account_form(&mut self) -> FormId {
        self.ui_state.mount(Form::Account(AccountForm::new()))
    }

    /// Drop a form and anything it still has in flight
    pub fn unmount(&mut self, form_id: FormId) -> Option<Form> {
        let form = self.ui_state.unmount(form_id)?;
        self.dispatch(AppCommand::CancelForm { form_id });
        Some(form)
    }

    /// Feed a keystroke's worth of text to a post's account field
    pub fn type_post_account(&mut self, form_id: FormId, key: PostKey, typed: &str) -> bool {
        let accounts = self.ui_state.cache.accounts();
        match self
            .ui_state
            .transaction_mut(form_id)
            .and_then(|draft| draft.post_mut(key))
        {
            Some(post) => {
                post.type_account(typed, &accounts);
                true
            }
            None => false,
        }
    }

    /// Validate a form and, if it passes, dispatch its submission.
    ///
    /// Returns whether a command was dispatched. Validation errors are left
    /// on the form.
    pub fn submit(&mut self, form_id: FormId) -> bool {
        let command = match self.ui_state.form_mut(form_id) {
            Some(Form::Transaction(draft)) => {
                if draft.is_submitting() {
                    return false;
                }
                match validators::validate_journal(draft) {
                    Ok(journal) => {
                        draft.begin_submit();
                        AppCommand::SubmitJournal { form_id, journal }
                    }
                    Err(error) => {
                        tracing::debug!("Journal validation failed: {}", error);
                        draft.set_error(error);
                        return false;
                    }
                }
            }
            Some(Form::Account(form)) => {
                if form.is_submitting() {
                    return false;
                }
                match validators::validate_new_account(form) {
                    Ok(account) => {
                        form.begin_submit();
                        AppCommand::CreateAccount { form_id, account }
                    }
                    Err(error) => {
                        tracing::debug!("Account validation failed: {}", error);
                        form.set_error(error);
                        return false;
                    }
                }
            }
            None => return false,
        };

        self.dispatch(command);
        true
    }

    /// Handle a data event (async results, or injected by tests)
    pub fn handle_data_event(&mut self, event: DataEvent) {
        reducer::reduce_data_event(&mut self.ui_state, event);
    }

    pub fn state(&self) -> &AppState {
        &self.ui_state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.ui_state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}
