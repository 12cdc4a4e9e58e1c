use recordsheet_api::endpoints::accounts::Account;
use serde::Serialize;

/// Fields of the "new account" form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountForm {
    pub name: String,
    pub desc: String,
    #[serde(rename = "_errorMsg")]
    error_msg: Option<String>,
    #[serde(rename = "_created")]
    created: Option<Account>,
    #[serde(rename = "_submitting")]
    submitting: bool,
}

impl AccountForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_msg = Some(message.into());
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submitting = true;
        self.error_msg = None;
    }

    /// Server rejected the account; the user's input is kept for correction.
    pub(crate) fn fail_submit(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error_msg = Some(message.into());
    }

    pub(crate) fn complete(&mut self, account: Account) {
        self.name.clear();
        self.desc.clear();
        self.error_msg = None;
        self.submitting = false;
        self.created = Some(account);
    }

    /// The account created by the last successful submit, once.
    pub fn take_created(&mut self) -> Option<Account> {
        self.created.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordsheet_api::{clean_json, endpoints::AccountId};
    use serde_json::json;

    #[test]
    fn complete_resets_fields_and_keeps_result_once() {
        let mut form = AccountForm {
            name: "savings".to_string(),
            desc: "Rainy day".to_string(),
            ..AccountForm::new()
        };
        form.set_error("old");

        form.complete(Account {
            id: AccountId::new(4),
            name: "SAVINGS".to_string(),
            description: "Rainy day".to_string(),
            closed: false,
        });

        assert_eq!(form.name, "");
        assert_eq!(form.desc, "");
        assert_eq!(form.error_msg(), None);
        assert_eq!(form.take_created().unwrap().name, "SAVINGS");
        assert!(form.take_created().is_none());
    }

    #[test]
    fn wire_form_is_name_and_desc() {
        let mut form = AccountForm {
            name: "SAVINGS".to_string(),
            ..AccountForm::new()
        };
        form.fail_submit("Bad Request");

        assert_eq!(clean_json(&form).unwrap(), json!({"name": "SAVINGS", "desc": ""}));
        assert_eq!(form.name, "SAVINGS");
    }
}
