use recordsheet_api::endpoints::{
    accounts::{Account, NewAccount},
    journal::{Journal, NewJournal},
};

use crate::state::FormId;

/// Commands to execute (validated user actions → background tasks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // Data loading
    LoadAccounts,

    // Submissions
    SubmitJournal {
        form_id: FormId,
        journal: NewJournal,
    },
    CreateAccount {
        form_id: FormId,
        account: NewAccount,
    },

    // A form went away; drop its in-flight journal submission
    CancelForm {
        form_id: FormId,
    },
}

/// Events from background tasks (responses to commands)
#[derive(Debug, Clone)]
pub enum DataEvent {
    // Account cache
    AccountsLoaded {
        count: usize,
    },
    AccountsLoadFailed {
        error: String,
    },

    // Journal submission
    JournalPosted {
        form_id: FormId,
        journal: Journal,
    },
    JournalPostFailed {
        form_id: FormId,
        error: String,
    },

    // Account creation
    AccountCreated {
        form_id: FormId,
        account: Account,
    },
    AccountCreateFailed {
        form_id: FormId,
        error: String,
    },
}

impl DataEvent {
    /// The form this event answers, if any.
    pub fn form_id(&self) -> Option<FormId> {
        match self {
            DataEvent::AccountsLoaded { .. } | DataEvent::AccountsLoadFailed { .. } => None,
            DataEvent::JournalPosted { form_id, .. }
            | DataEvent::JournalPostFailed { form_id, .. }
            | DataEvent::AccountCreated { form_id, .. }
            | DataEvent::AccountCreateFailed { form_id, .. } => Some(*form_id),
        }
    }
}
