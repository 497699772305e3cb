//! Plan quota - the delivery target hanging over the settlement
//!
//! One quota is active at a time. Compulsory deliveries credit progress
//! when the resource matches. At the deadline year the plan is reviewed:
//! fulfilled plans retarget upward and reset; missed plans count a
//! failure and get a one-year extension.

use serde::{Deserialize, Serialize};

use crate::economy::resources::ResourceKind;

#[derive(Debug, Clone, PartialEq)]
pub enum QuotaReview {
    Met {
        new_target: i64,
        new_deadline_year: i32,
    },
    Missed {
        consecutive_failures: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quota {
    pub resource: ResourceKind,
    pub target: i64,
    pub progress: i64,
    pub deadline_year: i32,
    pub consecutive_failures: u32,
    pub plans_completed: u32,
}

impl Quota {
    pub fn new(resource: ResourceKind, target: i64, deadline_year: i32) -> Self {
        Self {
            resource,
            target,
            progress: 0,
            deadline_year,
            consecutive_failures: 0,
            plans_completed: 0,
        }
    }

    /// Credit extracted deliveries toward the plan
    pub fn record_progress(&mut self, kind: ResourceKind, amount: i64) {
        if kind == self.resource && amount > 0 {
            self.progress += amount;
        }
    }

    /// Blat effect: the target quietly shrinks (never below 1)
    pub fn reduce_target(&mut self, amount: i64) {
        self.target = (self.target - amount).max(1);
    }

    /// Year-end review; only acts once the deadline year is reached.
    pub fn review_year_end(
        &mut self,
        year: i32,
        growth_percent: i64,
        plan_years: i32,
    ) -> Option<QuotaReview> {
        if year < self.deadline_year {
            return None;
        }
        if self.progress >= self.target {
            self.plans_completed += 1;
            self.consecutive_failures = 0;
            self.target = self.target * (100 + growth_percent) / 100;
            self.progress = 0;
            self.deadline_year = year + plan_years;
            tracing::info!(target = self.target, deadline = self.deadline_year, "plan fulfilled");
            Some(QuotaReview::Met {
                new_target: self.target,
                new_deadline_year: self.deadline_year,
            })
        } else {
            self.consecutive_failures += 1;
            self.deadline_year = year + 1;
            tracing::warn!(
                progress = self.progress,
                target = self.target,
                failures = self.consecutive_failures,
                "plan missed"
            );
            Some(QuotaReview::Missed {
                consecutive_failures: self.consecutive_failures,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_only_for_matching_resource() {
        let mut quota = Quota::new(ResourceKind::Food, 100, 1922);
        quota.record_progress(ResourceKind::Food, 30);
        quota.record_progress(ResourceKind::Steel, 30);
        assert_eq!(quota.progress, 30);
    }

    #[test]
    fn test_review_before_deadline_is_noop() {
        let mut quota = Quota::new(ResourceKind::Food, 100, 1922);
        assert!(quota.review_year_end(1921, 20, 5).is_none());
    }

    #[test]
    fn test_met_plan_retargets_and_resets() {
        let mut quota = Quota::new(ResourceKind::Food, 100, 1922);
        quota.record_progress(ResourceKind::Food, 120);
        let review = quota.review_year_end(1922, 20, 5).expect("deadline reached");
        assert_eq!(
            review,
            QuotaReview::Met {
                new_target: 120,
                new_deadline_year: 1927
            }
        );
        assert_eq!(quota.progress, 0);
        assert_eq!(quota.plans_completed, 1);
        assert_eq!(quota.consecutive_failures, 0);
    }

    #[test]
    fn test_missed_plan_counts_failure_and_extends() {
        let mut quota = Quota::new(ResourceKind::Food, 100, 1922);
        quota.record_progress(ResourceKind::Food, 50);
        let review = quota.review_year_end(1922, 20, 5).expect("deadline reached");
        assert_eq!(
            review,
            QuotaReview::Missed {
                consecutive_failures: 1
            }
        );
        assert_eq!(quota.deadline_year, 1923);
        // Progress carries over into the extension
        assert_eq!(quota.progress, 50);

        let review = quota.review_year_end(1923, 20, 5).expect("extension reached");
        assert_eq!(
            review,
            QuotaReview::Missed {
                consecutive_failures: 2
            }
        );
    }

    #[test]
    fn test_success_clears_failure_streak() {
        let mut quota = Quota::new(ResourceKind::Food, 100, 1922);
        quota.review_year_end(1922, 20, 5);
        assert_eq!(quota.consecutive_failures, 1);
        quota.record_progress(ResourceKind::Food, 200);
        quota.review_year_end(1923, 20, 5);
        assert_eq!(quota.consecutive_failures, 0);
    }

    #[test]
    fn test_reduce_target_floors_at_one() {
        let mut quota = Quota::new(ResourceKind::Food, 10, 1922);
        quota.reduce_target(50);
        assert_eq!(quota.target, 1);
    }
}
