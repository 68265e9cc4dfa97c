use std::cmp::Ordering;

use super::{Difficulty, ProblemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: ProblemId,
    pub title: String,
    pub difficulty: Difficulty,
    pub company_tag: String,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogSort {
    #[default]
    Title,
    EasyToHard,
    HardToEasy,
}

impl CatalogSort {
    /// 未知取值按标题排序。
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("easy-hard") => CatalogSort::EasyToHard,
            Some("hard-easy") => CatalogSort::HardToEasy,
            _ => CatalogSort::Title,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            CatalogSort::Title => "title",
            CatalogSort::EasyToHard => "easy-hard",
            CatalogSort::HardToEasy => "hard-easy",
        }
    }

    fn compare(self, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
        let by_rank = match self {
            CatalogSort::Title => Ordering::Equal,
            CatalogSort::EasyToHard => a.difficulty.rank().cmp(&b.difficulty.rank()),
            CatalogSort::HardToEasy => b.difficulty.rank().cmp(&a.difficulty.rank()),
        };
        by_rank.then_with(|| a.title.cmp(&b.title))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PremiumFilter {
    /// `None` 表示列出所有公司。
    pub company: Option<String>,
    pub sort: CatalogSort,
}

impl PremiumFilter {
    pub fn new(company: Option<&str>, sort: Option<&str>) -> Self {
        let company = company
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .map(str::to_string);

        Self {
            company,
            sort: CatalogSort::parse(sort),
        }
    }

    pub fn apply(&self, entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        let mut selected: Vec<CatalogEntry> = entries
            .into_iter()
            .filter(|entry| match &self.company {
                Some(company) => entry.company_tag == *company,
                None => true,
            })
            .collect();

        selected.sort_by(|a, b| self.sort.compare(a, b));
        selected
    }
}

/// 去重、排序且非空的公司标签。
pub fn company_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut companies: Vec<String> = tags
        .into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();
    companies.sort();
    companies.dedup();
    companies
}
