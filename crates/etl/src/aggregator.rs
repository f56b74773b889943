//! Per-user aggregation of cart activity.
//!
//! Each user gets one [`UserAggregator`]. While accumulating it tracks the
//! latest cart timestamp and how many cart products fell into each category.
//! [`UserAggregator::finalize`] turns that state into a [`UserSummary`]
//! exactly once.
//!
//! # Tie-break
//!
//! When several categories share the highest count, the one first counted
//! for this user wins. First-seen order is recorded explicitly in
//! [`UserState`], so the choice never depends on map iteration order.

use std::collections::HashMap;

use cart_summary_core::{CartRecord, Category, UserId, UserSummary};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::CategoryLookup;
use crate::resolver::CategoryResolver;

/// Misuse of a [`UserAggregator`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregatorError {
    /// `observe` or `finalize` was called after `finalize`.
    #[error("aggregator for user {user_id} is already finalized")]
    AlreadyFinalized { user_id: UserId },

    /// A record for another user was routed to this aggregator.
    #[error("aggregator for user {expected} received a record for user {found}")]
    UserMismatch { expected: UserId, found: UserId },
}

/// Accumulated state for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    user_id: UserId,
    latest_timestamp: DateTime<Utc>,
    category_counts: HashMap<Category, u64>,
    first_seen_order: Vec<Category>,
}

impl UserState {
    fn new(user_id: UserId, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id,
            latest_timestamp: timestamp,
            category_counts: HashMap::new(),
            first_seen_order: Vec::new(),
        }
    }

    fn record_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.latest_timestamp = self.latest_timestamp.max(timestamp);
    }

    fn record_category(&mut self, category: Category) {
        if let Some(count) = self.category_counts.get_mut(&category) {
            *count += 1;
        } else {
            self.first_seen_order.push(category.clone());
            self.category_counts.insert(category, 1);
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn latest_timestamp(&self) -> DateTime<Utc> {
        self.latest_timestamp
    }

    /// How many products in `category` this user has added so far.
    #[must_use]
    pub fn count(&self, category: &Category) -> u64 {
        self.category_counts.get(category).copied().unwrap_or(0)
    }

    /// Categories in the order they were first counted.
    #[must_use]
    pub fn first_seen_order(&self) -> &[Category] {
        &self.first_seen_order
    }

    /// Highest-count category, earliest first-seen on ties.
    #[must_use]
    pub fn top_category(&self) -> Option<&Category> {
        let mut top: Option<(&Category, u64)> = None;
        for category in &self.first_seen_order {
            let count = self.count(category);
            // Strictly greater keeps the earlier category on a tie.
            if top.is_none_or(|(_, best)| count > best) {
                top = Some((category, count));
            }
        }
        top.map(|(category, _)| category)
    }

    fn into_summary(self) -> UserSummary {
        let top_category = self.top_category().cloned();
        UserSummary::new(self.user_id, self.latest_timestamp, top_category)
    }
}

#[derive(Debug)]
enum Phase {
    Accumulating(UserState),
    Finalized,
}

/// Incremental per-user accumulator.
///
/// Starts out accumulating and becomes finalized on the first successful
/// call to [`finalize`](Self::finalize). Any further call fails with
/// [`AggregatorError::AlreadyFinalized`].
#[derive(Debug)]
pub struct UserAggregator {
    user_id: UserId,
    phase: Phase,
}

impl UserAggregator {
    /// Start accumulating for `user_id`, seeded with the timestamp of the
    /// record that first mentioned the user.
    #[must_use]
    pub fn new(user_id: UserId, first_timestamp: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Accumulating(UserState::new(user_id.clone(), first_timestamp)),
            user_id,
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        matches!(self.phase, Phase::Finalized)
    }

    /// Current state, or `None` once finalized.
    #[must_use]
    pub const fn state(&self) -> Option<&UserState> {
        match &self.phase {
            Phase::Accumulating(state) => Some(state),
            Phase::Finalized => None,
        }
    }

    /// Fold one cart record into this user's state.
    ///
    /// Every product is resolved through `resolver`; products whose category
    /// cannot be resolved are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::AlreadyFinalized`] after `finalize`, whoever
    /// the record belongs to. Otherwise returns
    /// [`AggregatorError::UserMismatch`] if the record belongs to someone else.
    pub async fn observe<L: CategoryLookup>(
        &mut self,
        record: &CartRecord,
        resolver: &CategoryResolver<L>,
    ) -> Result<(), AggregatorError> {
        let Phase::Accumulating(state) = &mut self.phase else {
            return Err(AggregatorError::AlreadyFinalized {
                user_id: self.user_id.clone(),
            });
        };

        if record.user_id() != &self.user_id {
            return Err(AggregatorError::UserMismatch {
                expected: self.user_id.clone(),
                found: record.user_id().clone(),
            });
        }

        state.record_timestamp(record.timestamp());
        for product in record.products() {
            if let Some(category) = resolver.resolve(&product.product_id).await {
                state.record_category(category);
            }
        }

        Ok(())
    }

    /// Produce this user's summary and stop accumulating.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::AlreadyFinalized`] if called twice.
    pub fn finalize(&mut self) -> Result<UserSummary, AggregatorError> {
        match std::mem::replace(&mut self.phase, Phase::Finalized) {
            Phase::Accumulating(state) => Ok(state.into_summary()),
            Phase::Finalized => Err(AggregatorError::AlreadyFinalized {
                user_id: self.user_id.clone(),
            }),
        }
    }
}
