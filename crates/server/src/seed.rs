//! 示例比赛与默认订阅套餐。
//!
//! 可重复执行：比赛按标题、套餐按档位判断是否已存在。

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use hackide_core::domain::{
    ContestWindow, Difficulty, PlanTier, Prizes, Score, TestCase,
};
use tracing::info;

use crate::api::AppState;
use crate::repository::{NewContest, NewPlan, NewProblem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub contests_created: usize,
    pub problems_created: usize,
    pub plans_created: usize,
}

struct SampleProblem {
    title: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    points: u32,
    time_limit_ms: i32,
    tests: &'static [(&'static str, &'static str)],
}

struct SampleContest {
    title: &'static str,
    description: &'static str,
    starts_in: Duration,
    lasts: Duration,
    problems: &'static [SampleProblem],
}

const BEGINNER_PROBLEMS: &[SampleProblem] = &[
    SampleProblem {
        title: "Hello World",
        description: "Write a program that prints \"Hello, World!\" to the console.",
        difficulty: Difficulty::Easy,
        points: 50,
        time_limit_ms: 1000,
        tests: &[("", "Hello, World!")],
    },
    SampleProblem {
        title: "Sum of Two Numbers",
        description: "Write a program that takes two numbers as input and prints their sum.",
        difficulty: Difficulty::Easy,
        points: 75,
        time_limit_ms: 1000,
        tests: &[("5\n3", "8"), ("10\n20", "30")],
    },
    SampleProblem {
        title: "Find Maximum",
        description: "Write a program that finds the maximum of three numbers.",
        difficulty: Difficulty::Medium,
        points: 100,
        time_limit_ms: 1000,
        tests: &[("5\n3\n9", "9"), ("1\n1\n1", "1")],
    },
    SampleProblem {
        title: "Two Sum",
        description: "Given an array and a target, return indices of the two numbers such that they add up to target.",
        difficulty: Difficulty::Medium,
        points: 120,
        time_limit_ms: 2000,
        tests: &[("4\n2 7 11 15\n9", "0 1"), ("3\n3 2 4\n6", "1 2")],
    },
    SampleProblem {
        title: "DP - Longest Increasing Subsequence",
        description: "Compute the length of the longest strictly increasing subsequence of a given array.",
        difficulty: Difficulty::Hard,
        points: 200,
        time_limit_ms: 2000,
        tests: &[("6\n10 9 2 5 3 7", "3"), ("8\n0 1 0 3 2 3 4 5", "6")],
    },
];

const ADVANCED_PROBLEMS: &[SampleProblem] = &[SampleProblem {
    title: "Binary Search",
    description: "Implement binary search to find an element in a sorted array.",
    difficulty: Difficulty::Hard,
    points: 150,
    time_limit_ms: 2000,
    tests: &[("5\n1 3 5 7 9\n5", "2"), ("5\n1 3 5 7 9\n10", "-1")],
}];

fn sample_contests() -> [SampleContest; 2] {
    [
        SampleContest {
            title: "Beginner Coding Challenge",
            description: "A beginner-friendly coding contest with easy problems. Perfect for new programmers!",
            starts_in: Duration::zero(),
            lasts: Duration::days(7),
            problems: BEGINNER_PROBLEMS,
        },
        SampleContest {
            title: "Algorithm Master",
            description: "Advanced algorithmic problems for experienced programmers. Test your problem-solving skills!",
            starts_in: Duration::hours(1),
            lasts: Duration::days(3),
            problems: ADVANCED_PROBLEMS,
        },
    ]
}

fn default_plans() -> [NewPlan; 3] {
    [
        NewPlan {
            tier: PlanTier::Free,
            display_name: PlanTier::Free.display_name().to_string(),
            description: "Contests and the online IDE.".to_string(),
            price_inr: 0,
            duration_days: 30,
        },
        NewPlan {
            tier: PlanTier::Pro,
            display_name: PlanTier::Pro.display_name().to_string(),
            description: "Premium problem library with company tags.".to_string(),
            price_inr: 499,
            duration_days: 30,
        },
        NewPlan {
            tier: PlanTier::Premium,
            display_name: PlanTier::Premium.display_name().to_string(),
            description: "Everything in Pro, for serious interview preparation.".to_string(),
            price_inr: 999,
            duration_days: 30,
        },
    ]
}

/// 写入缺失的示例比赛和默认套餐。
pub async fn seed(state: &AppState, now: DateTime<Utc>) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for sample in sample_contests() {
        if state.contests.find_by_title(sample.title).await?.is_some() {
            info!(title = sample.title, "contest already exists");
            continue;
        }

        let start = now + sample.starts_in;
        let contest = state
            .contests
            .create(NewContest {
                title: sample.title.to_string(),
                description: sample.description.to_string(),
                window: ContestWindow::new(start, start + sample.lasts),
                is_active: true,
                prizes: Prizes::default(),
                requires_proctoring: true,
            })
            .await?;
        report.contests_created += 1;
        info!(contest_id = %contest.id, title = %contest.title, "created contest");

        for problem in sample.problems {
            let mut new_problem = NewProblem::new(
                problem.title,
                problem.difficulty,
                Score::new(problem.points)?,
            );
            new_problem.contest_id = Some(contest.id);
            new_problem.description = problem.description.to_string();
            new_problem.time_limit_ms = problem.time_limit_ms;
            new_problem.test_cases = problem
                .tests
                .iter()
                .map(|(input, output)| TestCase {
                    input: input.to_string(),
                    output: output.to_string(),
                })
                .collect();

            let created = state.problems.create(new_problem).await?;
            report.problems_created += 1;
            info!(problem_id = %created.id, title = %created.title, "created problem");
        }
    }

    for plan in default_plans() {
        if state.subscriptions.find_plan_by_tier(plan.tier).await?.is_some() {
            continue;
        }
        let created = state.subscriptions.create_plan(plan).await?;
        report.plans_created += 1;
        info!(tier = %created.tier, price_inr = created.price_inr, "created plan");
    }

    Ok(report)
}
