use anyhow::{anyhow, bail, Result};
use itertools::Itertools;
use std::sync::Arc;
use tokio::sync::mpsc;

use recordsheet_api::{Client, Request};

use crate::app_core::AppCore;
use crate::background::{data_loader::DataLoader, TaskHandler};
use crate::cache::AccountCache;
use crate::cli::{Command, PostLine};
use crate::events::DataEvent;
use crate::settings::Settings;
use crate::state::{
    post::{Post, PostKey},
    transaction::TransactionDraft,
    Form, FormId, LoadingState,
};

type Core = AppCore<TaskHandler>;

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        tracing::info!("recordsheet starting ({:?})", self.settings);

        let api_client = Arc::new(self.settings.client());
        let cache = Arc::new(AccountCache::new());
        let (data_tx, mut data_rx) = mpsc::unbounded_channel();
        let data_loader = DataLoader::new(api_client.clone(), cache.clone(), data_tx);
        let mut core = AppCore::new(TaskHandler::new(data_loader), cache);

        let result = match command {
            Command::Accounts => self.list_accounts(&mut core, &mut data_rx).await,
            Command::Match { prefix } => self.match_prefix(&mut core, &mut data_rx, &prefix).await,
            Command::AddAccount { name, desc } => {
                self.add_account(&mut core, &mut data_rx, name, desc).await
            }
            Command::Post {
                memo,
                datetime,
                lines,
                balance,
            } => {
                self.post(&mut core, &mut data_rx, memo, datetime, lines, balance)
                    .await
            }
            Command::Template { name } => self.print_template(&api_client, &name).await,
        };

        core.handler_mut().shutdown();
        result
    }

    async fn list_accounts(
        &self,
        core: &mut Core,
        data_rx: &mut mpsc::UnboundedReceiver<DataEvent>,
    ) -> Result<()> {
        wait_for_accounts(core, data_rx).await?;

        let accounts = core.state().cache.accounts();
        let width = accounts.iter().map(|a| a.name.len()).max().unwrap_or(0);
        for account in accounts.iter().sorted_by(|a, b| a.name.cmp(&b.name)) {
            let closed = if account.closed { " (closed)" } else { "" };
            println!(
                "{:>6}  {:<width$}  {}{}",
                account.id,
                account.name,
                account.description,
                closed,
                width = width
            );
        }
        Ok(())
    }

    async fn match_prefix(
        &self,
        core: &mut Core,
        data_rx: &mut mpsc::UnboundedReceiver<DataEvent>,
        prefix: &str,
    ) -> Result<()> {
        wait_for_accounts(core, data_rx).await?;

        match core.state().cache.find_by_prefix(prefix) {
            Some(account) => println!("{}", account.name),
            None => println!("No account matches '{}'", prefix),
        }
        Ok(())
    }

    async fn add_account(
        &self,
        core: &mut Core,
        data_rx: &mut mpsc::UnboundedReceiver<DataEvent>,
        name: String,
        desc: String,
    ) -> Result<()> {
        let form_id = core.mount_account_form();
        if let Some(form) = core.state_mut().account_form_mut(form_id) {
            form.name = name;
            form.desc = desc;
        }

        if !core.submit(form_id) {
            bail!("{}", form_error(core, form_id));
        }
        wait_for_form(core, data_rx, form_id).await?;

        let created = core
            .state_mut()
            .account_form_mut(form_id)
            .and_then(|form| form.take_created());
        match created {
            Some(account) => {
                println!("Created {} ({})", account.name, account.id);
                Ok(())
            }
            None => bail!("{}", form_error(core, form_id)),
        }
    }

    async fn post(
        &self,
        core: &mut Core,
        data_rx: &mut mpsc::UnboundedReceiver<DataEvent>,
        memo: String,
        datetime: Option<String>,
        lines: Vec<PostLine>,
        balance: Option<String>,
    ) -> Result<()> {
        let form_id = core.mount_transaction_form(TransactionDraft::new(true));
        // Autocomplete needs the cache; carry on with raw names if it failed.
        if let Err(e) = wait_for_accounts(core, data_rx).await {
            tracing::warn!("{}", e);
        }

        for line in lines {
            let key = draft(core, form_id)?.add_post(
                Post::new()
                    .with_amount(line.amount)
                    .with_memo(line.memo),
            );
            type_account(core, form_id, key, &line.account);
        }

        if let Some(account) = balance {
            let key = draft(core, form_id)?
                .add_balancing_post()
                .map_err(|e| anyhow!(e))?;
            type_account(core, form_id, key, &account);
        }

        let draft = draft(core, form_id)?;
        draft.set_memo(memo);
        if let Some(input) = datetime {
            draft.set_datetime_input(&input).map_err(|e| anyhow!(e))?;
        }
        let summary = draft
            .posts()
            .iter()
            .map(|p| format!("{} {}", p.account.account_id(), p.amount))
            .join(", ");

        if !core.submit(form_id) {
            bail!("{}", form_error(core, form_id));
        }
        wait_for_form(core, data_rx, form_id).await?;

        let draft = core
            .state()
            .transaction(form_id)
            .ok_or_else(|| anyhow!("Form {} went away", form_id))?;
        match draft.error_msg() {
            Some(error) => bail!("{}", error),
            None => {
                println!("Posted: {}", summary);
                Ok(())
            }
        }
    }

    async fn print_template(&self, api_client: &Client, name: &str) -> Result<()> {
        let markup = api_client
            .fetch_template(Request::templates().get(name))
            .await?;
        println!("{}", markup);
        Ok(())
    }
}

fn draft(core: &mut Core, form_id: FormId) -> Result<&mut TransactionDraft> {
    core.state_mut()
        .transaction_mut(form_id)
        .ok_or_else(|| anyhow!("Form {} is not mounted", form_id))
}

/// Replay the account name a character at a time, as autocomplete sees typing
fn type_account(core: &mut Core, form_id: FormId, key: PostKey, name: &str) {
    let mut typed = String::new();
    for c in name.chars() {
        typed.push(c);
        core.type_post_account(form_id, key, &typed);
    }
}

fn form_error(core: &Core, form_id: FormId) -> String {
    let error = match core.state().form(form_id) {
        Some(Form::Transaction(draft)) => draft.error_msg().map(str::to_string),
        Some(Form::Account(form)) => form.error_msg().map(str::to_string),
        None => None,
    };
    error.unwrap_or_else(|| "Submission failed".to_string())
}

/// Pump events until the account cache has either loaded or failed
async fn wait_for_accounts(
    core: &mut Core,
    data_rx: &mut mpsc::UnboundedReceiver<DataEvent>,
) -> Result<()> {
    core.load_accounts();
    loop {
        match &core.state().accounts_loading {
            LoadingState::Loaded => return Ok(()),
            LoadingState::Error(error) => bail!("Could not load accounts: {}", error),
            LoadingState::NotStarted | LoadingState::Loading => {}
        }
        let event = data_rx
            .recv()
            .await
            .ok_or_else(|| anyhow!("Background tasks stopped"))?;
        core.handle_data_event(event);
    }
}

/// Pump events until one answers `form_id`
async fn wait_for_form(
    core: &mut Core,
    data_rx: &mut mpsc::UnboundedReceiver<DataEvent>,
    form_id: FormId,
) -> Result<()> {
    while let Some(event) = data_rx.recv().await {
        let answered = event.form_id() == Some(form_id);
        core.handle_data_event(event);
        if answered {
            return Ok(());
        }
    }
    bail!("Background tasks stopped")
}
