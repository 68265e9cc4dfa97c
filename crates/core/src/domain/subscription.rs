use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlanTier {
    Free,
    Pro,
    Premium,
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [PlanTier::Free, PlanTier::Pro, PlanTier::Premium];

    pub fn code(self) -> &'static str {
        match self {
            PlanTier::Free => "FREE",
            PlanTier::Pro => "PRO",
            PlanTier::Premium => "PREMIUM",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Pro => "Pro",
            PlanTier::Premium => "Premium",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PlanTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvalidPlanTier(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_active: bool,
}

impl SubscriptionWindow {
    /// 从 `now` 起持续 `duration_days` 天的有效订阅。
    pub fn starting(now: DateTime<Utc>, duration_days: u32) -> Self {
        Self {
            start: now,
            end: now + Duration::days(i64::from(duration_days)),
            is_active: true,
        }
    }

    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.end >= now
    }
}

pub fn has_premium_access<'a>(
    is_staff: bool,
    subscriptions: impl IntoIterator<Item = &'a SubscriptionWindow>,
    now: DateTime<Utc>,
) -> bool {
    is_staff || subscriptions.into_iter().any(|s| s.is_current(now))
}
