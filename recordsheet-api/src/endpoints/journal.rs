use super::Amount;
use crate::request::{ApiRequest, RequestData};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Requests

#[derive(Debug, Clone)]
pub struct CreateJournal {
    journal: NewJournal,
}

impl CreateJournal {
    pub fn new(journal: NewJournal) -> Self {
        Self { journal }
    }
}

impl ApiRequest for CreateJournal {
    type Data = NewJournal;
    type Response = Journal;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        "/json/journal".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.journal)
    }
}

/// A balanced (or at least two-sided) journal entry ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournal {
    pub datetime: DateTime<Utc>,
    pub memo: String,
    pub posts: Vec<NewPost>,
}

impl NewJournal {
    /// Sum of all post amounts, `None` if it is out of range.
    pub fn total(&self) -> Option<Amount> {
        Amount::checked_sum(self.posts.iter().map(|p| p.amount))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    /// Links the post to an imported transaction it settles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Account name or id.
    pub account_id: String,
    pub amount: Amount,
    pub memo: String,
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub void: bool,
}
