use serde::{Deserialize, Serialize};

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 单选题：选择即替换
    SingleChoice,
    /// 多选题：选择即切换
    MultipleChoice,
}

impl QuestionType {
    /// 中文名称（用于界面展示）
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "单选题",
            QuestionType::MultipleChoice => "多选题",
        }
    }
}

/// 选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub content: String,
}

/// 题目
///
/// 题干内容来自富文本编辑器，可能包含 HTML 标签和图片。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub choices: Vec<Choice>,
}

impl Question {
    /// 按 ID 查找选项
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

/// 考试设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSettings {
    /// 考试时长（分钟）
    pub duration_minutes: u64,
    /// 进入考试的密码，None 表示无密码直接进入
    #[serde(default)]
    pub password: Option<String>,
    /// 是否打乱题目和选项顺序
    #[serde(default)]
    pub shuffle_questions: bool,
    /// 允许的答题次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// 是否需要审批后才能参加
    #[serde(default)]
    pub requires_approval: bool,
    /// 交卷后是否立即展示成绩
    #[serde(default = "default_show_result")]
    pub show_result_immediately: bool,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_show_result() -> bool {
    true
}

/// 试卷定义
///
/// 加载完成后不可变；乱序只在加载时做一次。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDefinition {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
    pub settings: ExamSettings,
}

impl ExamDefinition {
    /// 按 ID 查找题目
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// 题目总数
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// 考试总时长（秒）
    pub fn duration_secs(&self) -> u64 {
        self.settings.duration_minutes * 60
    }
}

// Helper function to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_exam_with_mixed_id_types() {
        let json = r#"{
            "id": 20250823001,
            "title": "期中测验",
            "questions": [
                {
                    "id": "q1",
                    "content": "<p>下列哪个是正确的？</p>",
                    "type": "single_choice",
                    "choices": [
                        {"id": 101, "content": "选项A"},
                        {"id": "102", "content": "选项B"}
                    ]
                },
                {
                    "id": 2,
                    "content": "多选题题干",
                    "type": "multiple_choice",
                    "choices": [
                        {"id": "a", "content": "甲"},
                        {"id": "b", "content": "乙"}
                    ]
                }
            ],
            "settings": {
                "duration_minutes": 30,
                "password": "ks2025"
            }
        }"#;

        let exam: ExamDefinition = serde_json::from_str(json).expect("试卷JSON解析应该成功");
        assert_eq!(exam.id, "20250823001");
        assert_eq!(exam.question_count(), 2);
        assert_eq!(exam.questions[0].kind, QuestionType::SingleChoice);
        assert_eq!(exam.questions[0].choices[0].id, "101");
        assert_eq!(exam.questions[1].id, "2");
        assert_eq!(exam.questions[1].kind, QuestionType::MultipleChoice);
        assert_eq!(exam.settings.password.as_deref(), Some("ks2025"));
        assert_eq!(exam.duration_secs(), 1800);
    }

    #[test]
    fn test_settings_defaults() {
        let json = r#"{"duration_minutes": 60}"#;
        let settings: ExamSettings = serde_json::from_str(json).expect("设置JSON解析应该成功");
        assert!(settings.password.is_none());
        assert!(!settings.shuffle_questions);
        assert_eq!(settings.max_attempts, 1);
        assert!(!settings.requires_approval);
        assert!(settings.show_result_immediately);
    }

    #[test]
    fn test_question_lookup_by_id() {
        let question = Question {
            id: "q9".to_string(),
            content: "题干".to_string(),
            kind: QuestionType::SingleChoice,
            choices: vec![
                Choice {
                    id: "c1".to_string(),
                    content: "A".to_string(),
                },
                Choice {
                    id: "c2".to_string(),
                    content: "B".to_string(),
                },
            ],
        };
        assert!(question.choice("c2").is_some());
        assert!(question.choice("c3").is_none());
    }
}
