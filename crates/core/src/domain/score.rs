use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u32);

impl Score {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = 10_000;

    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidScore(value))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// 求和，上限为 [`Score::MAX`]。
    pub fn saturating_add(self, other: Score) -> Self {
        Self(self.0.saturating_add(other.0).min(Self::MAX))
    }
}

impl Default for Score {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u32> for Score {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for u32 {
    fn from(value: Score) -> Self {
        value.value()
    }
}
