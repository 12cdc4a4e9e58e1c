use recordsheet_api::{
    endpoints::{accounts::Account, AccountId},
    ApiError, Client, Request,
};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::state::autocomplete;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Failed to load accounts: {0}")]
    LoadFailed(String),

    #[error("Account load was abandoned before it finished")]
    Abandoned,
}

/// Where the full account list comes from.
pub trait AccountSource {
    fn fetch_accounts(&self) -> impl Future<Output = Result<Vec<Account>, ApiError>> + Send;
}

impl AccountSource for Client {
    fn fetch_accounts(&self) -> impl Future<Output = Result<Vec<Account>, ApiError>> + Send {
        async move {
            let response = self.send(Request::accounts().list()).await?;
            Ok(response.accounts)
        }
    }
}

type Waiter = oneshot::Sender<Result<Vec<Account>, CacheError>>;

enum LoadState {
    NotLoaded,
    Loading(Vec<Waiter>),
    Loaded,
    Failed(String),
}

struct Inner {
    accounts: Vec<Account>,
    state: LoadState,
}

enum Role {
    Ready(Vec<Account>),
    Waiter(oneshot::Receiver<Result<Vec<Account>, CacheError>>),
    Loader,
}

/// In-memory account list shared by every form in the process.
///
/// Grows only. The first `ensure_loaded` fetches the full list; callers that
/// arrive while that fetch is in flight wait on it instead of issuing their
/// own request.
pub struct AccountCache {
    inner: Mutex<Inner>,
}

impl AccountCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                accounts: Vec::new(),
                state: LoadState::NotLoaded,
            }),
        }
    }

    /// A cache that is already considered loaded with `accounts`.
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let cache = Self::new();
        {
            let mut inner = cache.lock();
            merge_accounts(&mut inner.accounts, accounts);
            inner.state = LoadState::Loaded;
        }
        cache
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn ensure_loaded<S>(&self, source: &S) -> Result<Vec<Account>, CacheError>
    where
        S: AccountSource + Sync + ?Sized,
    {
        let role = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match inner.state {
                LoadState::Loaded => Role::Ready(inner.accounts.clone()),
                LoadState::Loading(ref mut waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Role::Waiter(rx)
                }
                LoadState::NotLoaded | LoadState::Failed(_) => {
                    inner.state = LoadState::Loading(Vec::new());
                    Role::Loader
                }
            }
        };

        match role {
            Role::Ready(accounts) => {
                tracing::debug!("Account cache hit ({} accounts)", accounts.len());
                Ok(accounts)
            }
            Role::Waiter(rx) => {
                tracing::debug!("Joining in-flight account load");
                rx.await.unwrap_or(Err(CacheError::Abandoned))
            }
            Role::Loader => {
                tracing::info!("Loading accounts");
                let mut guard = LoadGuard {
                    cache: self,
                    armed: true,
                };
                let result = source.fetch_accounts().await;
                guard.armed = false;
                self.finish_load(result)
            }
        }
    }

    fn finish_load(
        &self,
        result: Result<Vec<Account>, ApiError>,
    ) -> Result<Vec<Account>, CacheError> {
        let mut inner = self.lock();
        let waiters = match std::mem::replace(&mut inner.state, LoadState::NotLoaded) {
            LoadState::Loading(waiters) => waiters,
            _ => Vec::new(),
        };

        let outcome = match result {
            Ok(fetched) => {
                let fetched_count = fetched.len();
                let added = merge_accounts(&mut inner.accounts, fetched);
                inner.state = LoadState::Loaded;
                tracing::info!(
                    "Loaded {} accounts ({} new, {} waiters)",
                    fetched_count,
                    added,
                    waiters.len()
                );
                Ok(inner.accounts.clone())
            }
            Err(e) => {
                tracing::error!("Failed to load accounts: {}", e);
                let message = e.user_message();
                inner.state = LoadState::Failed(message.clone());
                Err(CacheError::LoadFailed(message))
            }
        };
        drop(inner);

        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
        outcome
    }

    /// Append a single account. Returns `false` if its id is already cached.
    pub fn insert(&self, account: Account) -> bool {
        merge_accounts(&mut self.lock().accounts, vec![account]) == 1
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.lock().accounts.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().accounts.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.lock().state, LoadState::Loaded)
    }

    /// Message from the last failed load, cleared once a retry starts.
    pub fn load_error(&self) -> Option<String> {
        match &self.lock().state {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn find_by_id(&self, id: AccountId) -> Option<Account> {
        self.lock().accounts.iter().find(|a| a.id == id).cloned()
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Option<Account> {
        let inner = self.lock();
        autocomplete::match_account(&inner.accounts, prefix).cloned()
    }
}

impl Default for AccountCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AccountCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        let state = match &inner.state {
            LoadState::NotLoaded => "not loaded",
            LoadState::Loading(_) => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Failed(_) => "failed",
        };
        f.debug_struct("AccountCache")
            .field("accounts", &inner.accounts.len())
            .field("state", &state)
            .finish()
    }
}

/// Puts the cache back to `NotLoaded` if the loading future is dropped
/// before the fetch completes, releasing any waiters.
struct LoadGuard<'a> {
    cache: &'a AccountCache,
    armed: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.cache.lock();
        if let LoadState::Loading(waiters) =
            std::mem::replace(&mut inner.state, LoadState::NotLoaded)
        {
            tracing::debug!("Account load abandoned with {} waiters", waiters.len());
            for waiter in waiters {
                let _ = waiter.send(Err(CacheError::Abandoned));
            }
        }
    }
}

/// Append accounts whose ids are not already present. Returns how many were added.
fn merge_accounts(existing: &mut Vec<Account>, incoming: Vec<Account>) -> usize {
    let before = existing.len();
    for account in incoming {
        if !existing.iter().any(|a| a.id == account.id) {
            existing.push(account);
        }
    }
    existing.len() - before
}
