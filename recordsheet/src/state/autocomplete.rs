use recordsheet_api::endpoints::{accounts::Account, AccountId};
use serde::{Serialize, Serializer};
use std::ops::Range;

/// First account, in cache order, whose name starts with `prefix`.
/// Matching is case-insensitive; an empty prefix matches nothing.
pub fn match_account<'a>(accounts: &'a [Account], prefix: &str) -> Option<&'a Account> {
    if prefix.is_empty() {
        return None;
    }

    let needle = prefix.to_uppercase();
    accounts
        .iter()
        .find(|a| a.name.to_uppercase().starts_with(&needle))
}

/// Inline-autocomplete state for a post's account field.
///
/// `value` is what the field shows, `selection` the char range of the
/// suggested remainder, and `account_id` what is sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInput {
    value: String,
    prev_text: String,
    selection: Option<Range<usize>>,
    account_id: String,
}

impl AccountInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state for an existing reference. A numeric id is shown as the
    /// account's name when the cache knows it.
    pub fn from_account_ref(reference: &str, accounts: &[Account]) -> Self {
        let value = reference
            .parse::<AccountId>()
            .ok()
            .and_then(|id| accounts.iter().find(|a| a.id == id))
            .map(|a| a.name.clone())
            .unwrap_or_else(|| reference.to_string());

        Self {
            prev_text: value.clone(),
            account_id: value.clone(),
            value,
            selection: None,
        }
    }

    /// Apply the field's text after a keystroke.
    pub fn on_input(&mut self, typed: &str, accounts: &[Account]) {
        // Typed text that is a prefix of the last input means the user is
        // backspacing through a suggestion.
        let deleting = self
            .prev_text
            .to_uppercase()
            .starts_with(&typed.to_uppercase());

        let suggestion = if deleting {
            None
        } else {
            match_account(accounts, typed)
        };

        match suggestion {
            Some(account) => {
                let typed_len = typed.chars().count();
                let name_len = account.name.chars().count();
                self.value = account.name.clone();
                self.selection = (typed_len < name_len).then_some(typed_len..name_len);
                self.account_id = account.name.clone();
            }
            None => {
                self.value = typed.to_string();
                self.selection = None;
                self.account_id = typed.to_string();
            }
        }

        self.prev_text = typed.to_string();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

// Only the resolved reference goes on the wire.
impl Serialize for AccountInput {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.account_id)
    }
}
