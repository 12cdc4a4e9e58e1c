use chrono::{DateTime, Utc};
use recordsheet_api::endpoints::{
    accounts::Account,
    journal::NewPost,
    Amount, AmountParseError,
};
use serde::Serialize;
use uuid::Uuid;

use super::autocomplete::AccountInput;

/// Local identity of a post within a draft, independent of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PostKey(Uuid);

impl PostKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PostKey {
    fn default() -> Self {
        Self::new()
    }
}

/// One debit or credit line of a journal draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    #[serde(rename = "_key")]
    key: PostKey,
    /// Server id, set for posts seeded from an imported transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "account_id")]
    pub account: AccountInput,
    pub amount: Amount,
    pub memo: String,
    #[serde(rename = "_datetime")]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(rename = "_posted")]
    posted: bool,
}

impl Post {
    pub fn new() -> Self {
        Self {
            key: PostKey::new(),
            id: None,
            account: AccountInput::new(),
            amount: Amount::ZERO,
            memo: String::new(),
            datetime: None,
            posted: false,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Account by name or id, shown the way the cache knows it.
    pub fn with_account(mut self, reference: &str, accounts: &[Account]) -> Self {
        self.account = AccountInput::from_account_ref(reference, accounts);
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = Some(datetime);
        self
    }

    pub fn key(&self) -> PostKey {
        self.key
    }

    pub fn is_posted(&self) -> bool {
        self.posted
    }

    pub(crate) fn mark_posted(&mut self) {
        self.posted = true;
    }

    pub fn type_account(&mut self, typed: &str, accounts: &[Account]) {
        self.account.on_input(typed, accounts);
    }

    /// Parse the amount field. Leaves the current amount on error.
    pub fn set_amount_input(&mut self, input: &str) -> Result<(), AmountParseError> {
        self.amount = input.parse()?;
        Ok(())
    }

    pub fn to_new_post(&self) -> NewPost {
        NewPost {
            id: self.id,
            account_id: self.account.account_id().to_string(),
            amount: self.amount,
            memo: self.memo.clone(),
        }
    }
}

impl Default for Post {
    fn default() -> Self {
        Self::new()
    }
}
