use recordsheet_api::endpoints::{accounts::NewAccount, journal::NewJournal};

use super::account_form::AccountForm;
use super::transaction::TransactionDraft;

pub const BAD_MEMO: &str = "Bad memo";
pub const TOO_FEW_POSTS: &str = "Must have at least 2 posts";
pub const AMOUNT_OUT_OF_RANGE: &str = "Amounts are too large to total";

/// Validate a draft and build the journal payload from it.
///
/// An unbalanced draft is still accepted; the server has the final say.
pub fn validate_journal(draft: &TransactionDraft) -> Result<NewJournal, String> {
    if draft.memo().trim().is_empty() {
        return Err(BAD_MEMO.to_string());
    }

    if draft.posts().len() < 2 {
        return Err(TOO_FEW_POSTS.to_string());
    }

    if let Some(index) = draft
        .posts()
        .iter()
        .position(|p| p.account.account_id().trim().is_empty())
    {
        return Err(format!("Post {} needs an account", index + 1));
    }

    let total = draft.sum().ok_or_else(|| AMOUNT_OUT_OF_RANGE.to_string())?;
    if !total.is_zero() {
        tracing::warn!("Submitting unbalanced journal (sum {})", total);
    }

    Ok(NewJournal {
        datetime: draft.datetime(),
        memo: draft.memo().to_string(),
        posts: draft.posts().iter().map(|p| p.to_new_post()).collect(),
    })
}

pub fn validate_new_account(form: &AccountForm) -> Result<NewAccount, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Account name is required".to_string());
    }

    Ok(NewAccount {
        name: name.to_string(),
        description: form.desc.trim().to_string(),
    })
}
