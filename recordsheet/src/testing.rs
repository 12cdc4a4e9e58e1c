use std::sync::Arc;

use recordsheet_api::endpoints::accounts::Account;

use crate::app_core::{AppCore, DataEventHandler};
use crate::cache::AccountCache;
use crate::events::{AppCommand, DataEvent};
use crate::state::post::{Post, PostKey};
use crate::state::transaction::TransactionDraft;
use crate::state::{AppState, FormId};

/// Mock data event handler for tests (no real async tasks)
///
/// Records every command it is asked to execute so tests can assert on what
/// would have been sent to the server.
#[derive(Default)]
pub struct MockDataHandler {
    pub commands: Vec<AppCommand>,
}

impl MockDataHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, _state: &mut AppState) {
        self.commands.push(command);
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
}

impl TestApp {
    /// Test app with an empty, not yet loaded account cache
    pub fn new() -> Self {
        Self::with_cache(AccountCache::new())
    }

    /// Test app whose cache is already loaded with `accounts`
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self::with_cache(AccountCache::with_accounts(accounts))
    }

    fn with_cache(cache: AccountCache) -> Self {
        Self {
            core: AppCore::new(MockDataHandler::new(), Arc::new(cache)),
        }
    }

    /// Mount an editable draft and return its id
    pub fn mount_transaction(&mut self) -> FormId {
        self.core.mount_transaction_form(TransactionDraft::new(true))
    }

    pub fn mount_draft(&mut self, draft: TransactionDraft) -> FormId {
        self.core.mount_transaction_form(draft)
    }

    pub fn mount_account_form(&mut self) -> FormId {
        self.core.mount_account_form()
    }

    pub fn unmount(&mut self, form_id: FormId) {
        self.core.unmount(form_id);
    }

    /// Add a post, typing its account one character at a time like a user would
    pub fn add_post(&mut self, form_id: FormId, account: &str, amount: &str) -> PostKey {
        let draft = self
            .core
            .state_mut()
            .transaction_mut(form_id)
            .expect("transaction form is mounted");
        let key = draft.add_post(Post::new().with_amount(amount.parse().expect("valid amount")));

        let mut typed = String::new();
        for c in account.chars() {
            typed.push(c);
            self.core.type_post_account(form_id, key, &typed);
        }
        key
    }

    pub fn draft_mut(&mut self, form_id: FormId) -> &mut TransactionDraft {
        self.core
            .state_mut()
            .transaction_mut(form_id)
            .expect("transaction form is mounted")
    }

    pub fn type_account(&mut self, form_id: FormId, key: PostKey, typed: &str) {
        assert!(
            self.core.type_post_account(form_id, key, typed),
            "No post {:?} in form {}",
            key,
            form_id
        );
    }

    pub fn submit(&mut self, form_id: FormId) -> bool {
        self.core.submit(form_id)
    }

    /// Inject a data event (simulate a server answer)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    /// Get read-only access to current state
    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        self.core.state_mut()
    }

    /// Commands dispatched so far, oldest first
    pub fn commands(&self) -> &[AppCommand] {
        &self.core.handler().commands
    }

    /// Submission commands only (loads and cancellations filtered out)
    pub fn submissions(&self) -> Vec<&AppCommand> {
        self.commands()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    AppCommand::SubmitJournal { .. } | AppCommand::CreateAccount { .. }
                )
            })
            .collect()
    }

    pub fn clear_commands(&mut self) {
        self.core.handler_mut().commands.clear();
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
