use crate::cache::AccountCache;
use crate::events::DataEvent;
use crate::state::FormId;
use recordsheet_api::{
    endpoints::{accounts::NewAccount, journal::NewJournal},
    Client, Request,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs server calls and reports their outcome as [`DataEvent`]s
#[derive(Clone)]
pub struct DataLoader {
    pub api_client: Arc<Client>,
    pub cache: Arc<AccountCache>,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl DataLoader {
    pub fn new(
        api_client: Arc<Client>,
        cache: Arc<AccountCache>,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self {
            api_client,
            cache,
            data_tx,
        }
    }

    /// Make sure the account cache is filled
    pub async fn load_accounts(&self) {
        match self.cache.ensure_loaded(self.api_client.as_ref()).await {
            Ok(accounts) => {
                let _ = self.data_tx.send(DataEvent::AccountsLoaded {
                    count: accounts.len(),
                });
            }
            Err(e) => {
                let _ = self.data_tx.send(DataEvent::AccountsLoadFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    pub async fn submit_journal(&self, form_id: FormId, journal: NewJournal) {
        tracing::info!(
            "Submitting journal '{}' with {} posts (form {})",
            journal.memo,
            journal.posts.len(),
            form_id
        );

        match self.api_client.send(Request::journal().create(journal)).await {
            Ok(journal) => {
                let _ = self
                    .data_tx
                    .send(DataEvent::JournalPosted { form_id, journal });
            }
            Err(e) => {
                tracing::error!("Failed to submit journal: {}", e);
                let _ = self.data_tx.send(DataEvent::JournalPostFailed {
                    form_id,
                    error: e.user_message(),
                });
            }
        }
    }

    pub async fn create_account(&self, form_id: FormId, account: NewAccount) {
        tracing::info!("Creating account {} (form {})", account.name, form_id);

        let req = Request::accounts().create(account.name, account.description);
        match self.api_client.send(req).await {
            Ok(account) => {
                tracing::info!("Created account {} ({})", account.name, account.id);
                let _ = self
                    .data_tx
                    .send(DataEvent::AccountCreated { form_id, account });
            }
            Err(e) => {
                tracing::error!("Failed to create account: {}", e);
                let _ = self.data_tx.send(DataEvent::AccountCreateFailed {
                    form_id,
                    error: e.user_message(),
                });
            }
        }
    }
}
