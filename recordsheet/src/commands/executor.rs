use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::events::AppCommand;
use crate::state::{AppState, FormId, LoadingState};

const LOAD_ACCOUNTS_TASK: &str = "load_accounts";

pub(crate) fn submit_task_id(form_id: FormId) -> String {
    format!("submit_{}", form_id)
}

pub(crate) fn create_account_task_id(form_id: FormId) -> String {
    format!("create_account_{}", form_id)
}

/// Execute a command by spawning background tasks
pub fn execute_command(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
) {
    match command {
        AppCommand::LoadAccounts => {
            // Already filled, or a load task is still running
            if state.cache.is_loaded() || task_manager.is_running(LOAD_ACCOUNTS_TASK) {
                return;
            }
            state.accounts_loading = LoadingState::Loading;

            let data_loader = data_loader.clone();
            let future = async move {
                data_loader.load_accounts().await;
            };
            task_manager.spawn_task(LOAD_ACCOUNTS_TASK.to_string(), future);
        }

        AppCommand::SubmitJournal { form_id, journal } => {
            let data_loader = data_loader.clone();
            let future = async move {
                data_loader.submit_journal(form_id, journal).await;
            };
            task_manager.spawn_task(submit_task_id(form_id), future);
        }

        AppCommand::CreateAccount { form_id, account } => {
            let data_loader = data_loader.clone();
            let future = async move {
                data_loader.create_account(form_id, account).await;
            };
            task_manager.spawn_task(create_account_task_id(form_id), future);
        }

        // Account creation runs to completion so the new account reaches the cache
        AppCommand::CancelForm { form_id } => {
            if task_manager.cancel(&submit_task_id(form_id)) {
                tracing::debug!("Cancelled in-flight submission for form {}", form_id);
            }
        }
    }
}
