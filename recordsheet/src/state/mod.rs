pub mod account_form;
pub mod autocomplete;
pub mod post;
pub mod reducer;
pub mod transaction;
pub mod validators;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AccountCache;
use account_form::AccountForm;
use transaction::TransactionDraft;

/// Represents loading state separate from data state
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading,
    Loaded,
    Error(String),
}

/// Identity of a mounted form. Results carry it so late answers for a form
/// that has gone away can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(Uuid);

impl FormId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub enum Form {
    Transaction(TransactionDraft),
    Account(AccountForm),
}

pub struct AppState {
    pub cache: Arc<AccountCache>,
    pub accounts_loading: LoadingState,
    forms: HashMap<FormId, Form>,
}

impl AppState {
    pub fn new(cache: Arc<AccountCache>) -> Self {
        let accounts_loading = if cache.is_loaded() {
            LoadingState::Loaded
        } else {
            LoadingState::NotStarted
        };

        Self {
            cache,
            accounts_loading,
            forms: HashMap::new(),
        }
    }

    pub fn mount(&mut self, form: Form) -> FormId {
        let id = FormId::new();
        self.forms.insert(id, form);
        id
    }

    pub fn unmount(&mut self, id: FormId) -> Option<Form> {
        self.forms.remove(&id)
    }

    pub fn is_mounted(&self, id: FormId) -> bool {
        self.forms.contains_key(&id)
    }

    pub fn mounted_count(&self) -> usize {
        self.forms.len()
    }

    pub fn form(&self, id: FormId) -> Option<&Form> {
        self.forms.get(&id)
    }

    pub fn form_mut(&mut self, id: FormId) -> Option<&mut Form> {
        self.forms.get_mut(&id)
    }

    pub fn transaction(&self, id: FormId) -> Option<&TransactionDraft> {
        match self.forms.get(&id) {
            Some(Form::Transaction(draft)) => Some(draft),
            _ => None,
        }
    }

    pub fn transaction_mut(&mut self, id: FormId) -> Option<&mut TransactionDraft> {
        match self.forms.get_mut(&id) {
            Some(Form::Transaction(draft)) => Some(draft),
            _ => None,
        }
    }

    pub fn account_form(&self, id: FormId) -> Option<&AccountForm> {
        match self.forms.get(&id) {
            Some(Form::Account(form)) => Some(form),
            _ => None,
        }
    }

    pub fn account_form_mut(&mut self, id: FormId) -> Option<&mut AccountForm> {
        match self.forms.get_mut(&id) {
            Some(Form::Account(form)) => Some(form),
            _ => None,
        }
    }
}
