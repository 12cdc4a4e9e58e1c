use crate::endpoints::{
    SortOrder,
    accounts::{CreateAccount, ListAccounts, NewAccount},
    journal::{CreateJournal, NewJournal},
    templates::GetTemplate,
};

pub struct AccountRepository;

impl AccountRepository {
    pub fn new() -> Self {
        Self {}
    }

    /// All accounts, sorted by name ascending.
    pub fn list(&self) -> ListAccounts {
        ListAccounts::new().sort_by("name", SortOrder::Asc)
    }

    pub fn create(&self, name: impl Into<String>, description: impl Into<String>) -> CreateAccount {
        CreateAccount::new(NewAccount {
            name: name.into(),
            description: description.into(),
        })
    }
}

pub struct JournalRepository;

impl JournalRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn create(&self, journal: NewJournal) -> CreateJournal {
        CreateJournal::new(journal)
    }
}

pub struct TemplateRepository;

impl TemplateRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn get(&self, name: impl Into<String>) -> GetTemplate {
        GetTemplate::new(name)
    }
}
