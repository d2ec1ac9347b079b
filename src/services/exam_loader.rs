//! 试卷加载服务 - 业务能力层
//!
//! 只负责"拿到一份可用的试卷"能力，不关心会话流程

use crate::clients::ExamClient;
use crate::error::LoadError;
use crate::models::exam::ExamDefinition;
use crate::models::loaders::load_exam_from_toml;
use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 试卷加载服务
///
/// 职责：
/// - 从平台接口或本地 TOML 文件拉取试卷
/// - 校验试卷可用（没有题目的试卷直接报致命错误）
/// - 按考试设置做一次性乱序（题目顺序和每题选项顺序）
pub struct ExamLoader {
    client: Arc<ExamClient>,
}

impl ExamLoader {
    /// 创建新的试卷加载服务
    pub fn new(client: Arc<ExamClient>) -> Self {
        Self { client }
    }

    /// 从平台接口加载试卷
    ///
    /// # 参数
    /// - `exam_id`: 考试 ID
    ///
    /// # 返回
    /// 返回校验并乱序后的试卷定义
    pub async fn load(&self, exam_id: &str) -> Result<ExamDefinition, LoadError> {
        let mut exam = self.client.fetch_exam(exam_id).await?;
        Self::validate(&exam)?;
        if exam.settings.shuffle_questions {
            let mut rng = SmallRng::from_entropy();
            Self::shuffle(&mut exam, &mut rng);
        }
        info!(
            "📋 试卷加载完成: {} ({} 题 / {} 分钟{})",
            exam.title,
            exam.question_count(),
            exam.settings.duration_minutes,
            if exam.settings.shuffle_questions {
                " / 已乱序"
            } else {
                ""
            }
        );
        Ok(exam)
    }

    /// 从本地 TOML 文件加载试卷（离线演示和测试）
    ///
    /// 数据走和线上一样的校验、乱序流程。
    pub async fn load_from_file(&self, path: &str) -> Result<ExamDefinition> {
        let mut exam = load_exam_from_toml(Path::new(path))
            .await
            .with_context(|| format!("无法加载本地试卷: {}", path))?;
        Self::validate(&exam)?;
        if exam.settings.shuffle_questions {
            let mut rng = SmallRng::from_entropy();
            Self::shuffle(&mut exam, &mut rng);
        }
        Ok(exam)
    }

    /// 校验试卷可用
    fn validate(exam: &ExamDefinition) -> Result<(), LoadError> {
        if exam.questions.is_empty() {
            return Err(LoadError::EmptyExam {
                exam_id: exam.id.clone(),
            });
        }
        Ok(())
    }

    /// 乱序：题目顺序和每题的选项顺序各打乱一次
    ///
    /// 答案记录全部按 ID，乱序不影响作答和交卷。
    /// RNG 作为参数传入，测试时用固定种子。
    pub fn shuffle<R: Rng>(exam: &mut ExamDefinition, rng: &mut R) {
        exam.questions.shuffle(rng);
        for question in &mut exam.questions {
            question.choices.shuffle(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::{Choice, ExamSettings, Question, QuestionType};
    use std::collections::BTreeSet;

    fn exam_with_questions(n: usize) -> ExamDefinition {
        let questions = (0..n)
            .map(|i| Question {
                id: format!("q{}", i),
                content: format!("题目 {}", i),
                kind: QuestionType::SingleChoice,
                choices: (0..4)
                    .map(|j| Choice {
                        id: format!("q{}c{}", i, j),
                        content: format!("选项 {}", j),
                    })
                    .collect(),
            })
            .collect();
        ExamDefinition {
            id: "e1".to_string(),
            title: "打乱测试".to_string(),
            questions,
            settings: ExamSettings {
                duration_minutes: 30,
                password: None,
                shuffle_questions: true,
                max_attempts: 1,
                requires_approval: false,
                show_result_immediately: true,
            },
        }
    }

    #[test]
    fn test_validate_rejects_empty_exam() {
        let exam = ExamDefinition {
            questions: Vec::new(),
            ..exam_with_questions(1)
        };
        assert!(matches!(
            ExamLoader::validate(&exam),
            Err(LoadError::EmptyExam { .. })
        ));
    }

    #[test]
    fn test_shuffle_is_deterministic_per_seed() {
        let mut a = exam_with_questions(10);
        let mut b = exam_with_questions(10);
        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        ExamLoader::shuffle(&mut a, &mut rng_a);
        ExamLoader::shuffle(&mut b, &mut rng_b);

        let order_a: Vec<&str> = a.questions.iter().map(|q| q.id.as_str()).collect();
        let order_b: Vec<&str> = b.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(order_a, order_b);
    }

    #[test]
    fn test_shuffle_keeps_every_question_and_choice() {
        let original = exam_with_questions(10);
        let mut shuffled = original.clone();
        let mut rng = SmallRng::seed_from_u64(7);
        ExamLoader::shuffle(&mut shuffled, &mut rng);

        let ids = |e: &ExamDefinition| -> BTreeSet<String> {
            e.questions.iter().map(|q| q.id.clone()).collect()
        };
        assert_eq!(ids(&original), ids(&shuffled));

        // 乱序后按 ID 仍能找到原来的题，且每题选项齐全
        for question in &original.questions {
            let found = shuffled.question(&question.id).expect("按ID应该能找到题目");
            assert_eq!(found.choices.len(), question.choices.len());
        }
    }
}
