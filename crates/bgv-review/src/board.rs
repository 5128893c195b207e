//! Local review state: items plus the set of keys with an action in flight
//!
//! A verify flips the item optimistically and remembers the prior status so a
//! failed request can be rolled back. A reject changes nothing until the backend
//! confirms it. While a key is in flight every further action on it is refused;
//! other keys are unaffected.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::error::{ReviewError, ReviewResult};
use crate::progress::CoverageReport;
use crate::projection::ReviewItem;
use crate::record::{Decision, ItemKey, VerificationStatus};

#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    fresher_id: String,
    items: Vec<ReviewItem>,
    in_flight: HashSet<ItemKey>,
    prior: HashMap<ItemKey, VerificationStatus>,
}

impl ReviewBoard {
    pub fn new(fresher_id: impl Into<String>, items: Vec<ReviewItem>) -> Self {
        Self {
            fresher_id: fresher_id.into(),
            items,
            in_flight: HashSet::new(),
            prior: HashMap::new(),
        }
    }

    pub fn fresher_id(&self) -> &str {
        &self.fresher_id
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn item(&self, key: &ItemKey) -> Option<&ReviewItem> {
        self.items.iter().find(|i| &i.key() == key)
    }

    fn item_mut(&mut self, key: &ItemKey) -> Option<&mut ReviewItem> {
        self.items.iter_mut().find(|i| &i.key() == key)
    }

    pub fn is_in_flight(&self, key: &ItemKey) -> bool {
        self.in_flight.contains(key)
    }

    pub fn in_flight(&self) -> impl Iterator<Item = &ItemKey> {
        self.in_flight.iter()
    }

    pub fn progress(&self) -> CoverageReport {
        CoverageReport::from_items(&self.items)
    }

    fn admit(&self, key: &ItemKey) -> ReviewResult<VerificationStatus> {
        let item = self.item(key).ok_or_else(|| ReviewError::UnknownItem(key.clone()))?;
        if self.in_flight.contains(key) {
            warn!(item = %key, "Action refused, already in flight");
            return Err(ReviewError::InFlight(key.clone()));
        }
        if item.status.is_terminal() {
            return Err(ReviewError::Terminal {
                key: key.clone(),
                status: item.status,
            });
        }
        Ok(item.status)
    }

    /// Mark the item verified locally and take the in-flight slot
    pub fn begin_verify(&mut self, key: &ItemKey) -> ReviewResult<()> {
        let prior = self.admit(key)?;
        self.prior.insert(key.clone(), prior);
        self.in_flight.insert(key.clone());
        if let Some(item) = self.item_mut(key) {
            item.status = VerificationStatus::Verified;
        }
        debug!(item = %key, "Verify started");
        Ok(())
    }

    /// Take the in-flight slot for a rejection; returns the trimmed comments
    pub fn begin_reject(&mut self, key: &ItemKey, comments: &str) -> ReviewResult<String> {
        let comments = comments.trim();
        if comments.is_empty() {
            return Err(ReviewError::MissingComments);
        }
        let prior = self.admit(key)?;
        self.prior.insert(key.clone(), prior);
        self.in_flight.insert(key.clone());
        debug!(item = %key, "Reject started");
        Ok(comments.to_string())
    }

    /// The backend accepted the decision
    pub fn complete(&mut self, key: &ItemKey, decision: &Decision) {
        self.in_flight.remove(key);
        self.prior.remove(key);
        if let Some(item) = self.item_mut(key) {
            item.status = decision.status();
            item.comments = decision.comments().map(str::to_string);
            item.attachment_url = decision.attachment_url().map(str::to_string);
        }
    }

    /// The request failed; restore what was there before
    pub fn rollback(&mut self, key: &ItemKey) {
        self.in_flight.remove(key);
        if let Some(prior) = self.prior.remove(key) {
            if let Some(item) = self.item_mut(key) {
                item.status = prior;
            }
        }
        warn!(item = %key, "Action rolled back");
    }

    /// Replace items with the authoritative projection
    ///
    /// Keys still in flight keep their local status until their own request settles.
    pub fn reconcile(&mut self, mut items: Vec<ReviewItem>) {
        for item in items.iter_mut() {
            let key = item.key();
            if self.in_flight.contains(&key) {
                if let Some(local) = self.item(&key) {
                    item.status = local.status;
                }
            }
        }
        self.items = items;
    }
}
