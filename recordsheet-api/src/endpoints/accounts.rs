use super::{AccountId, ListQuery, SortOrder};
use crate::macros::setter;
use crate::request::{ApiRequest, RequestData};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique; the server stores names upper-cased and uses `:` as a
    /// hierarchy separator.
    pub name: String,
    #[serde(rename = "desc", alias = "description", default)]
    pub description: String,
    #[serde(default)]
    pub closed: bool,
}

// Requests

#[derive(Debug, Clone, Default)]
pub struct ListAccounts {
    query: ListQuery,
}

impl ListAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_by(mut self, column: &str, order: SortOrder) -> Self {
        self.query.sort = Some(format!("{}.{}", column, order));
        self
    }

    setter!(opt query.limit: u32);
    setter!(opt query.offset: u32);
}

impl ApiRequest for ListAccounts {
    type Data = ListQuery;
    type Response = AccountsResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/json/accounts".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(&self.query)
    }
}

#[derive(Debug, Clone)]
pub struct CreateAccount {
    account: NewAccount,
}

impl CreateAccount {
    pub fn new(account: NewAccount) -> Self {
        Self { account }
    }
}

impl ApiRequest for CreateAccount {
    type Data = NewAccount;
    type Response = Account;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        "/json/accounts".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.account)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_query_carries_sort_and_paging() {
        let req = ListAccounts::new().sort_by("name", SortOrder::Asc).limit(50u32);
        let RequestData::Query(query) = req.data() else {
            panic!("expected query data");
        };
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({"sort": "name.asc", "limit": 50})
        );
    }

    #[test]
    fn account_accepts_either_description_key() {
        let a: Account =
            serde_json::from_value(json!({"id": 1, "name": "CASH", "desc": "Wallet"})).unwrap();
        let b: Account =
            serde_json::from_value(json!({"id": 1, "name": "CASH", "description": "Wallet"}))
                .unwrap();
        assert_eq!(a, b);
        assert!(!a.closed);
    }
}
