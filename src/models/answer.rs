use crate::models::exam::QuestionType;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// 交卷回执
///
/// 交卷成功后服务端返回，只用于跳转成绩页。
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(deserialize_with = "crate::models::exam::deserialize_id")]
    pub submission_id: String,
}

/// 答题卡
///
/// 以题目 ID 为键记录已选选项 ID 集合。用 BTreeMap/BTreeSet 保证
/// 序列化快照的字节序稳定，批量保存的脏检查直接比较快照字符串。
///
/// 选择语义：
/// - 单选题：替换，最多保留一个选项
/// - 多选题：切换，已选则取消，未选则加入
/// - 某题的最后一个选项被取消后，整个条目删除（恢复"未作答"）
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    selections: BTreeMap<String, BTreeSet<String>>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次选择
    pub fn select(&mut self, question_id: &str, choice_id: &str, kind: QuestionType) {
        match kind {
            QuestionType::SingleChoice => {
                let mut set = BTreeSet::new();
                set.insert(choice_id.to_string());
                self.selections.insert(question_id.to_string(), set);
            }
            QuestionType::MultipleChoice => {
                let set = self.selections.entry(question_id.to_string()).or_default();
                if !set.remove(choice_id) {
                    set.insert(choice_id.to_string());
                }
                if set.is_empty() {
                    self.selections.remove(question_id);
                }
            }
        }
    }

    /// 某题当前已选的选项集合
    pub fn selected(&self, question_id: &str) -> Option<&BTreeSet<String>> {
        self.selections.get(question_id)
    }

    /// 某题是否已作答（至少选了一个选项）
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.selections.contains_key(question_id)
    }

    /// 已作答题目数
    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// 序列化快照（字节序稳定，用于脏检查）
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.selections).unwrap_or_default()
    }

    /// 展平为 (题目ID, 选项ID) 对列表（交卷和批量保存的载荷）
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.selections
            .iter()
            .flat_map(|(question_id, choices)| {
                choices
                    .iter()
                    .map(move |choice_id| (question_id.clone(), choice_id.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_choice_replaces() {
        let mut sheet = AnswerSheet::new();
        sheet.select("q1", "a", QuestionType::SingleChoice);
        sheet.select("q1", "b", QuestionType::SingleChoice);

        let selected = sheet.selected("q1").expect("q1 应该已作答");
        assert_eq!(selected.len(), 1);
        assert!(selected.contains("b"));
    }

    #[test]
    fn test_multiple_choice_toggles() {
        let mut sheet = AnswerSheet::new();
        sheet.select("q1", "a", QuestionType::MultipleChoice);
        sheet.select("q1", "b", QuestionType::MultipleChoice);
        sheet.select("q1", "a", QuestionType::MultipleChoice);

        let selected = sheet.selected("q1").expect("q1 应该已作答");
        assert_eq!(selected.len(), 1);
        assert!(selected.contains("b"));
    }

    #[test]
    fn test_deselecting_last_choice_removes_entry() {
        let mut sheet = AnswerSheet::new();
        sheet.select("q1", "a", QuestionType::MultipleChoice);
        sheet.select("q1", "a", QuestionType::MultipleChoice);

        assert!(!sheet.is_answered("q1"));
        assert_eq!(sheet.answered_count(), 0);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_snapshot_is_insertion_order_independent() {
        let mut a = AnswerSheet::new();
        a.select("q1", "x", QuestionType::MultipleChoice);
        a.select("q2", "y", QuestionType::SingleChoice);

        let mut b = AnswerSheet::new();
        b.select("q2", "y", QuestionType::SingleChoice);
        b.select("q1", "x", QuestionType::MultipleChoice);

        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_to_pairs_flattens_all_selections() {
        let mut sheet = AnswerSheet::new();
        sheet.select("q2", "c", QuestionType::SingleChoice);
        sheet.select("q1", "a", QuestionType::MultipleChoice);
        sheet.select("q1", "b", QuestionType::MultipleChoice);

        let pairs = sheet.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("q1".to_string(), "a".to_string()),
                ("q1".to_string(), "b".to_string()),
                ("q2".to_string(), "c".to_string()),
            ]
        );
    }
}
