use super::{AppState, LoadingState};
use crate::events::DataEvent;

/// Pure state transition function for data events
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        // Account cache filled (the accounts themselves live in the cache)
        DataEvent::AccountsLoaded { count } => {
            tracing::debug!("Account cache ready with {} accounts", count);
            state.accounts_loading = LoadingState::Loaded;
        }

        DataEvent::AccountsLoadFailed { error } => {
            state.accounts_loading = LoadingState::Error(error);
        }

        // Journal accepted: the draft goes back to empty
        DataEvent::JournalPosted { form_id, journal } => match state.transaction_mut(form_id) {
            Some(draft) => {
                let posted = draft.mark_posted();
                tracing::info!(
                    "Journal {:?} posted with {} posts (form {})",
                    journal.id,
                    posted.len(),
                    form_id
                );
            }
            None => {
                tracing::debug!("Discarding journal result for unmounted form {}", form_id);
            }
        },

        // Journal rejected: posts stay, message is shown
        DataEvent::JournalPostFailed { form_id, error } => match state.transaction_mut(form_id) {
            Some(draft) => draft.fail_submit(error),
            None => {
                tracing::debug!("Discarding journal failure for unmounted form {}", form_id);
            }
        },

        // The account exists on the server whether or not the form is still around
        DataEvent::AccountCreated { form_id, account } => {
            if !state.cache.insert(account.clone()) {
                tracing::debug!("Account {} already cached", account.id);
            }
            match state.account_form_mut(form_id) {
                Some(form) => form.complete(account),
                None => {
                    tracing::debug!("Discarding account result for unmounted form {}", form_id);
                }
            }
        }

        DataEvent::AccountCreateFailed { form_id, error } => {
            match state.account_form_mut(form_id) {
                Some(form) => form.fail_submit(error),
                None => {
                    tracing::debug!("Discarding account failure for unmounted form {}", form_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::AccountCache;
    use crate::state::{
        account_form::AccountForm, post::Post, transaction::TransactionDraft, Form, FormId,
    };
    use recordsheet_api::endpoints::{accounts::Account, journal::Journal, AccountId};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Arc::new(AccountCache::new()))
    }

    fn journal() -> Journal {
        Journal {
            id: Some(1),
            memo: Some("Lunch".to_string()),
            void: false,
        }
    }

    fn savings() -> Account {
        Account {
            id: AccountId::new(5),
            name: "SAVINGS".to_string(),
            description: String::new(),
            closed: false,
        }
    }

    fn two_post_draft() -> TransactionDraft {
        let mut draft = TransactionDraft::new(true);
        draft.add_post(Post::new().with_account("CASH", &[]).with_amount("-3".parse().unwrap()));
        draft.add_balancing_post().unwrap();
        draft.set_memo("Lunch");
        draft
    }

    #[test]
    fn posted_journal_empties_draft() {
        let mut state = state();
        let id = state.mount(Form::Transaction(two_post_draft()));
        state.transaction_mut(id).unwrap().begin_submit();

        reduce_data_event(&mut state, DataEvent::JournalPosted { form_id: id, journal: journal() });

        let draft = state.transaction(id).unwrap();
        assert!(draft.posts().is_empty());
        assert!(!draft.is_submitting());
        assert_eq!(draft.error_msg(), None);
    }

    #[test]
    fn failed_journal_keeps_posts_and_shows_message() {
        let mut state = state();
        let id = state.mount(Form::Transaction(two_post_draft()));

        reduce_data_event(
            &mut state,
            DataEvent::JournalPostFailed {
                form_id: id,
                error: "Bad Request".to_string(),
            },
        );

        let draft = state.transaction(id).unwrap();
        assert_eq!(draft.posts().len(), 2);
        assert!(draft.posts().iter().all(|p| !p.is_posted()));
        assert_eq!(draft.error_msg(), Some("Bad Request"));
    }

    #[test]
    fn results_for_unknown_forms_are_ignored() {
        let mut state = state();
        let id = state.mount(Form::Transaction(two_post_draft()));

        reduce_data_event(
            &mut state,
            DataEvent::JournalPosted {
                form_id: FormId::new(),
                journal: journal(),
            },
        );
        reduce_data_event(
            &mut state,
            DataEvent::AccountCreateFailed {
                form_id: id,
                error: "wrong form kind".to_string(),
            },
        );

        let draft = state.transaction(id).unwrap();
        assert_eq!(draft.posts().len(), 2);
        assert_eq!(draft.error_msg(), None);
    }

    #[test]
    fn created_account_lands_in_cache_even_after_unmount() {
        let mut state = state();
        let id = state.mount(Form::Account(AccountForm::new()));
        state.unmount(id);

        reduce_data_event(&mut state, DataEvent::AccountCreated { form_id: id, account: savings() });

        assert_eq!(state.cache.accounts(), vec![savings()]);
    }

    #[test]
    fn created_account_completes_form() {
        let mut state = state();
        let mut form = AccountForm::new();
        form.name = "savings".to_string();
        let id = state.mount(Form::Account(form));

        reduce_data_event(&mut state, DataEvent::AccountCreated { form_id: id, account: savings() });

        let form = state.account_form_mut(id).unwrap();
        assert_eq!(form.name, "");
        assert_eq!(form.take_created(), Some(savings()));
    }

    #[test]
    fn account_load_status_is_tracked() {
        let mut state = state();
        reduce_data_event(
            &mut state,
            DataEvent::AccountsLoadFailed {
                error: "Unable to reach the server".to_string(),
            },
        );
        assert_eq!(
            state.accounts_loading,
            LoadingState::Error("Unable to reach the server".to_string())
        );

        reduce_data_event(&mut state, DataEvent::AccountsLoaded { count: 3 });
        assert_eq!(state.accounts_loading, LoadingState::Loaded);
    }
}
