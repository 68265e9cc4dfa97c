use super::UserId;

/// 排名前的参赛者汇总数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub user_id: UserId,
    pub username: String,
    pub total_score: u32,
    pub problems_solved: u32,
    pub has_final_submitted: bool,
    pub non_practice_submissions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub total_score: u32,
    pub problems_solved: u32,
    pub has_final_submitted: bool,
}

/// 按总分、再按解题数排序，名次从 1 开始。
///
/// 只有练习提交的参赛者不参与排名。
pub fn rank_participants(standings: Vec<Standing>) -> Vec<LeaderboardRow> {
    let mut ranked: Vec<Standing> = standings
        .into_iter()
        .filter(|s| s.non_practice_submissions > 0)
        .collect();

    ranked.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| b.problems_solved.cmp(&a.problems_solved))
    });

    ranked
        .into_iter()
        .zip(1..)
        .map(|(s, rank)| LeaderboardRow {
            rank,
            user_id: s.user_id,
            username: s.username,
            total_score: s.total_score,
            problems_solved: s.problems_solved,
            has_final_submitted: s.has_final_submitted,
        })
        .collect()
}
