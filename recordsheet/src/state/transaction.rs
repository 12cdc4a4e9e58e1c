use chrono::{DateTime, Utc};
use recordsheet_api::endpoints::Amount;
use serde::Serialize;

use super::post::{Post, PostKey};
use super::validators::AMOUNT_OUT_OF_RANGE;
use crate::utils::dates;

/// Where a draft is in its life, derived from the number of posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    Empty,
    Partial,
    Ready,
}

/// A journal entry being composed.
///
/// The header (memo and datetime) follows the first post: it is filled in
/// when the first post arrives and re-derived whenever posts are removed.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDraft {
    datetime: DateTime<Utc>,
    memo: String,
    posts: Vec<Post>,
    #[serde(rename = "_errorMsg")]
    error_msg: Option<String>,
    #[serde(rename = "_dateEditable")]
    date_editable: bool,
    #[serde(rename = "_submitting")]
    submitting: bool,
    #[serde(skip)]
    clock: fn() -> DateTime<Utc>,
}

impl TransactionDraft {
    pub fn new(date_editable: bool) -> Self {
        Self::with_clock(date_editable, Utc::now)
    }

    pub fn with_clock(date_editable: bool, clock: fn() -> DateTime<Utc>) -> Self {
        Self {
            datetime: clock(),
            memo: String::new(),
            posts: Vec::new(),
            error_msg: None,
            date_editable,
            submitting: false,
            clock,
        }
    }

    /// Seed the draft, e.g. with posts built from imported transactions.
    pub fn with_posts(mut self, posts: impl IntoIterator<Item = Post>) -> Self {
        for post in posts {
            self.add_post(post);
        }
        self
    }

    pub fn add_post(&mut self, post: Post) -> PostKey {
        let key = post.key();
        self.posts.push(post);
        if self.posts.len() == 1 {
            self.derive_header();
        }
        key
    }

    /// Append a post that brings the running sum to exactly zero.
    ///
    /// Fails, adding nothing, when the posts are too large to total.
    pub fn add_balancing_post(&mut self) -> Result<PostKey, String> {
        let amount = self
            .balancing_amount()
            .ok_or_else(|| AMOUNT_OUT_OF_RANGE.to_string())?;
        Ok(self.add_post(Post::new().with_amount(amount)))
    }

    /// A new blank row, pre-filled with the balancing amount when there is one.
    pub fn add_row(&mut self) -> PostKey {
        let amount = self.balancing_amount().unwrap_or(Amount::ZERO);
        self.add_post(Post::new().with_amount(amount))
    }

    fn balancing_amount(&self) -> Option<Amount> {
        self.sum()?.checked_neg()
    }

    pub fn remove_post(&mut self, key: PostKey) -> Option<Post> {
        let index = self.posts.iter().position(|p| p.key() == key)?;
        let removed = self.posts.remove(index);
        self.derive_header();
        Some(removed)
    }

    fn derive_header(&mut self) {
        let now = self.clock;
        match self.posts.first() {
            Some(first) => {
                self.memo = first.memo.clone();
                if self.date_editable {
                    self.datetime = first.datetime.unwrap_or_else(now);
                }
            }
            None => {
                self.memo.clear();
                if self.date_editable {
                    self.datetime = now();
                }
            }
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post_mut(&mut self, key: PostKey) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.key() == key)
    }

    /// Exact total of the posts, `None` when it does not fit an `Amount`.
    pub fn sum(&self) -> Option<Amount> {
        Amount::checked_sum(self.posts.iter().map(|p| p.amount))
    }

    pub fn is_balanced(&self) -> bool {
        self.sum().is_some_and(|total| total.is_zero())
    }

    pub fn phase(&self) -> DraftPhase {
        match self.posts.len() {
            0 => DraftPhase::Empty,
            1 => DraftPhase::Partial,
            _ => DraftPhase::Ready,
        }
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.memo = memo.into();
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    pub fn is_date_editable(&self) -> bool {
        self.date_editable
    }

    pub fn set_datetime(&mut self, datetime: DateTime<Utc>) -> Result<(), String> {
        if !self.date_editable {
            return Err("Date is not editable".to_string());
        }
        self.datetime = datetime;
        Ok(())
    }

    pub fn set_datetime_input(&mut self, input: &str) -> Result<(), String> {
        let datetime = dates::parse_input(input)?;
        self.set_datetime(datetime)
    }

    /// Input-style text when the date can be edited, locale text otherwise.
    pub fn formatted_datetime(&self) -> String {
        if self.date_editable {
            dates::format_input(&self.datetime)
        } else {
            dates::format_display(&self.datetime)
        }
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

    /// Server rejected the journal. Posts stay as they were.
    pub(crate) fn fail_submit(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error_msg = Some(message.into());
    }

    /// Server accepted the journal: every post is marked posted and the draft
    /// goes back to empty. Returns the posted lines.
    pub fn mark_posted(&mut self) -> Vec<Post> {
        let mut posted = std::mem::take(&mut self.posts);
        for post in &mut posted {
            post.mark_posted();
        }
        self.derive_header();
        self.error_msg = None;
        self.submitting = false;
        posted
    }
}
