//! Repository interfaces for commit history and subscriptions.
//!
//! The orchestration core never touches a concrete store; routes get an
//! `Arc<dyn CommitStore>` / `Arc<dyn SubscriptionStore>` chosen at
//! composition time. The in-memory implementations reproduce the shapes
//! the UI already consumes (empty commit history, a free/active
//! subscription, mock usage) so a database-backed store can be swapped in
//! without touching any handler.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::RwLock;

/// Review outcome recorded against a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Rejected,
    Pending,
}

impl FromStr for ReviewStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            "pending" => Ok(ReviewStatus::Pending),
            _ => Err(()),
        }
    }
}

/// A reviewed commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author_email: String,
    pub author_name: String,
    pub message: String,
    pub timestamp: String,
    pub status: ReviewStatus,
    /// Unified diff, when captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// One page of commits plus the total matching count.
#[derive(Debug, Clone, Default)]
pub struct CommitPage {
    pub commits: Vec<CommitRecord>,
    pub total: usize,
}

/// Aggregate commit statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStats {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
    pub top_authors: Vec<String>,
    pub recent_activity: Vec<String>,
}

/// Commit history repository.
pub trait CommitStore: Send + Sync {
    fn list(&self, page: usize, limit: usize) -> CommitPage;
    fn get(&self, hash: &str) -> Option<CommitRecord>;
    fn diff(&self, hash: &str) -> Option<String>;
    fn by_author(&self, email: &str, page: usize, limit: usize) -> CommitPage;
    fn by_status(&self, status: ReviewStatus, page: usize, limit: usize) -> CommitPage;
    fn stats(&self) -> CommitStats;
}

/// In-memory commit store. Starts empty, matching the service's current
/// no-persistence contract; `push` exists for tests and future wiring.
#[derive(Default)]
pub struct InMemoryCommitStore {
    commits: RwLock<Vec<CommitRecord>>,
}

impl InMemoryCommitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: CommitRecord) {
        if let Ok(mut commits) = self.commits.write() {
            commits.push(record);
        }
    }

    fn page_of(records: Vec<CommitRecord>, page: usize, limit: usize) -> CommitPage {
        let total = records.len();
        let page = page.max(1);
        let start = (page - 1).saturating_mul(limit);
        let commits = records.into_iter().skip(start).take(limit).collect();
        CommitPage { commits, total }
    }

    fn snapshot(&self) -> Vec<CommitRecord> {
        self.commits.read().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommitStore for InMemoryCommitStore {
    fn list(&self, page: usize, limit: usize) -> CommitPage {
        Self::page_of(self.snapshot(), page, limit)
    }

    fn get(&self, hash: &str) -> Option<CommitRecord> {
        self.snapshot().into_iter().find(|c| c.hash == hash)
    }

    fn diff(&self, hash: &str) -> Option<String> {
        self.get(hash).and_then(|c| c.diff)
    }

    fn by_author(&self, email: &str, page: usize, limit: usize) -> CommitPage {
        let matching = self
            .snapshot()
            .into_iter()
            .filter(|c| c.author_email == email)
            .collect();
        Self::page_of(matching, page, limit)
    }

    fn by_status(&self, status: ReviewStatus, page: usize, limit: usize) -> CommitPage {
        let matching = self
            .snapshot()
            .into_iter()
            .filter(|c| c.status == status)
            .collect();
        Self::page_of(matching, page, limit)
    }

    fn stats(&self) -> CommitStats {
        let commits = self.snapshot();
        CommitStats {
            total: commits.len(),
            approved: commits
                .iter()
                .filter(|c| c.status == ReviewStatus::Approved)
                .count(),
            rejected: commits
                .iter()
                .filter(|c| c.status == ReviewStatus::Rejected)
                .count(),
            pending: commits
                .iter()
                .filter(|c| c.status == ReviewStatus::Pending)
                .count(),
            top_authors: Vec::new(),
            recent_activity: Vec::new(),
        }
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// A subscription plan offered to users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub period: String,
    pub features: Vec<String>,
}

/// The two offered plans.
pub fn plan_catalog() -> Vec<Plan> {
    vec![
        Plan {
            id: "free".to_string(),
            name: "Free Plan".to_string(),
            price: 0,
            period: "forever".to_string(),
            features: [
                "10 code reviews per month",
                "Basic code analysis",
                "Security vulnerability detection",
                "Standard AI models",
                "Community support",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
        Plan {
            id: "pro".to_string(),
            name: "Pro Plan".to_string(),
            price: 29,
            period: "month".to_string(),
            features: [
                "Unlimited code reviews",
                "Advanced code analysis",
                "Security vulnerability detection",
                "Architecture recommendations",
                "Testing & CI/CD analysis",
                "Priority AI models",
                "Custom coding standards",
                "Documentation recommendations",
                "Priority support",
                "API access",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
    ]
}

/// True when `plan_id` names an offered plan.
pub fn is_valid_plan(plan_id: &str) -> bool {
    plan_catalog().iter().any(|p| p.id == plan_id)
}

/// Current subscription state. Serialized camelCase; the UI reads these
/// fields as `startsAt`/`billingPeriod`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: String,
    pub status: String,
    pub starts_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    pub billing_period: String,
}

/// Usage within the current billing period. Serialized camelCase like
/// [`Subscription`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub plan: String,
    pub reviews_used: u32,
    pub reviews_limit: u32,
    pub period_start: String,
    pub period_end: String,
}

/// Subscription repository.
pub trait SubscriptionStore: Send + Sync {
    fn status(&self) -> Subscription;
    fn subscribe(&self, plan_id: &str);
    fn cancel(&self);
    fn update(&self, plan_id: &str);
    fn usage(&self) -> Usage;
}

/// In-memory subscription store holding one account's state.
pub struct InMemorySubscriptionStore {
    subscription: RwLock<Subscription>,
    reviews_used: RwLock<u32>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self {
            subscription: RwLock::new(Subscription {
                plan: "free".to_string(),
                status: "active".to_string(),
                starts_at: Utc::now().to_rfc3339(),
                ends_at: None,
                billing_period: "monthly".to_string(),
            }),
            reviews_used: RwLock::new(3),
        }
    }

    /// First and last day of the current calendar month, RFC 3339.
    fn current_period() -> (String, String) {
        let today = Utc::now().date_naive();
        let start = today.with_day(1).unwrap_or(today);
        let (next_year, next_month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .map(|d| d - Duration::days(1))
            .unwrap_or(today);
        (
            format!("{}T00:00:00Z", start),
            format!("{}T00:00:00Z", end),
        )
    }
}

impl Default for InMemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn status(&self) -> Subscription {
        self.subscription
            .read()
            .map(|s| s.clone())
            .unwrap_or_else(|_| Subscription {
                plan: "free".to_string(),
                status: "active".to_string(),
                starts_at: Utc::now().to_rfc3339(),
                ends_at: None,
                billing_period: "monthly".to_string(),
            })
    }

    fn subscribe(&self, plan_id: &str) {
        if let Ok(mut sub) = self.subscription.write() {
            sub.plan = plan_id.to_string();
            sub.status = "active".to_string();
            sub.starts_at = Utc::now().to_rfc3339();
            sub.ends_at = None;
        }
    }

    fn cancel(&self) {
        if let Ok(mut sub) = self.subscription.write() {
            sub.status = "cancelled".to_string();
            sub.ends_at = Some(Utc::now().to_rfc3339());
        }
    }

    fn update(&self, plan_id: &str) {
        if let Ok(mut sub) = self.subscription.write() {
            sub.plan = plan_id.to_string();
        }
    }

    fn usage(&self) -> Usage {
        let (period_start, period_end) = Self::current_period();
        let sub = self.status();
        let reviews_limit = if sub.plan == "pro" { u32::MAX } else { 10 };
        Usage {
            plan: sub.plan,
            reviews_used: self.reviews_used.read().map(|u| *u).unwrap_or(0),
            reviews_limit,
            period_start,
            period_end,
        }
    }
}
