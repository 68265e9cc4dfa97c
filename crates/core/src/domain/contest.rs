use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ContestWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// 两端均包含。
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }
}

/// 奖金，单位为卢比。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prizes {
    pub first: i64,
    pub second: i64,
    pub third: i64,
}

impl Prizes {
    pub fn summary(&self) -> String {
        let prizes: Vec<String> = [("🥇", self.first), ("🥈", self.second), ("🥉", self.third)]
            .into_iter()
            .filter(|(_, amount)| *amount != 0)
            .map(|(medal, amount)| format!("{medal} ₹{amount}"))
            .collect();

        if prizes.is_empty() {
            "No prizes announced".to_string()
        } else {
            prizes.join(", ")
        }
    }
}
