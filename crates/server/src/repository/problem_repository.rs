use crate::entity::problem;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use hackide_core::domain::{
    ContestId, Difficulty, FunctionSignature, ProblemId, Score, TestCase, parse_boilerplate,
    parse_test_cases,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ProblemRecord {
    pub id: ProblemId,
    pub contest_id: Option<ContestId>,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub time_limit_ms: i32,
    pub memory_limit_mb: i32,
    pub test_cases: Vec<TestCase>,
    pub points: Score,
    pub is_premium: bool,
    pub boilerplate: BTreeMap<String, String>,
    pub company_tag: String,
    pub signature: Option<FunctionSignature>,
}

#[derive(Debug, Clone)]
pub struct NewProblem {
    pub contest_id: Option<ContestId>,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub time_limit_ms: i32,
    pub memory_limit_mb: i32,
    pub test_cases: Vec<TestCase>,
    pub points: Score,
    pub is_premium: bool,
    pub boilerplate: BTreeMap<String, String>,
    pub company_tag: String,
    pub signature: Option<FunctionSignature>,
}

impl NewProblem {
    pub fn new(title: impl Into<String>, difficulty: Difficulty, points: Score) -> Self {
        Self {
            contest_id: None,
            title: title.into(),
            description: String::new(),
            difficulty,
            time_limit_ms: 1000,
            memory_limit_mb: 256,
            test_cases: Vec::new(),
            points,
            is_premium: false,
            boilerplate: BTreeMap::new(),
            company_tag: String::new(),
            signature: None,
        }
    }
}

#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn create(&self, new_problem: NewProblem) -> Result<ProblemRecord>;
    async fn find_by_id(&self, problem_id: ProblemId) -> Result<Option<ProblemRecord>>;
    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<ProblemRecord>>;
    async fn list_premium(&self) -> Result<Vec<ProblemRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmProblemRepository {
    db: DatabaseConnection,
}

impl SeaOrmProblemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_difficulty(code: i16) -> Result<Difficulty> {
        match code {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            _ => Err(anyhow!("invalid problem.difficulty code from database: {code}")),
        }
    }

    fn map_difficulty_code(difficulty: Difficulty) -> i16 {
        match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    fn map_model(model: problem::Model) -> Result<ProblemRecord> {
        let id = ProblemId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid problem.id '{}' from database: {e}", model.id))?;
        let contest_id = model
            .contest_id
            .as_deref()
            .map(ContestId::from_str)
            .transpose()
            .map_err(|e| anyhow!("invalid problem.contest_id from database: {e}"))?;
        let points = u32::try_from(model.points).map_err(|_| {
            anyhow!(
                "invalid problem.points from database: {} (must be non-negative)",
                model.points
            )
        })?;
        let signature = FunctionSignature::from_columns(
            model.signature_enabled,
            &model.signature_name,
            &model.signature_params,
            &model.signature_return,
        );

        Ok(ProblemRecord {
            id,
            contest_id,
            title: model.title,
            description: model.description,
            difficulty: Self::map_difficulty(model.difficulty)?,
            time_limit_ms: model.time_limit_ms,
            memory_limit_mb: model.memory_limit_mb,
            test_cases: parse_test_cases(&model.test_cases),
            points: Score::new(points)?,
            is_premium: model.is_premium,
            boilerplate: parse_boilerplate(&model.boilerplate),
            company_tag: model.company_tag,
            signature,
        })
    }
}

#[async_trait]
impl ProblemRepository for SeaOrmProblemRepository {
    async fn create(&self, new_problem: NewProblem) -> Result<ProblemRecord> {
        let id = ProblemId::new();
        let (signature_enabled, signature_name, signature_params, signature_return) =
            match &new_problem.signature {
                Some(sig) => (
                    true,
                    sig.name.clone(),
                    serde_json::to_string(&sig.params)?,
                    sig.return_type.clone(),
                ),
                None => (false, String::new(), String::new(), String::new()),
            };

        let active_model = problem::ActiveModel {
            id: Set(id.to_string()),
            contest_id: Set(new_problem.contest_id.map(|c| c.to_string())),
            title: Set(new_problem.title),
            description: Set(new_problem.description),
            difficulty: Set(Self::map_difficulty_code(new_problem.difficulty)),
            time_limit_ms: Set(new_problem.time_limit_ms),
            memory_limit_mb: Set(new_problem.memory_limit_mb),
            test_cases: Set(serde_json::to_string(&new_problem.test_cases)?),
            points: Set(i32::try_from(new_problem.points.value())?),
            is_premium: Set(new_problem.is_premium),
            boilerplate: Set(serde_json::to_string(&new_problem.boilerplate)?),
            company_tag: Set(new_problem.company_tag),
            signature_enabled: Set(signature_enabled),
            signature_name: Set(signature_name),
            signature_params: Set(signature_params),
            signature_return: Set(signature_return),
            created_at: Set(Utc::now().naive_utc()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, problem_id: ProblemId) -> Result<Option<ProblemRecord>> {
        let model = problem::Entity::find_by_id(problem_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<ProblemRecord>> {
        let models = problem::Entity::find()
            .filter(problem::Column::ContestId.eq(contest_id.to_string()))
            .order_by_asc(problem::Column::Points)
            .order_by_asc(problem::Column::Title)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_premium(&self) -> Result<Vec<ProblemRecord>> {
        let models = problem::Entity::find()
            .filter(problem::Column::IsPremium.eq(true))
            .order_by_asc(problem::Column::Title)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
