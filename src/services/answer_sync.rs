//! 答案同步服务 - 业务能力层
//!
//! 只负责"把选择送到服务端"能力和脏检查记账，不关心调度节奏

use crate::clients::ExamClient;
use std::sync::Arc;
use tracing::debug;

/// 答案同步服务
///
/// 职责：
/// - 即时保存：每次选择后发一次保存请求，失败静默（本地状态是权威）
/// - 脏检查记账：记住最近一次"整卷送达"的快照，内容没变就跳过批量保存
///
/// 批量保存的循环调度在编排层，这里只提供能力和判断。
pub struct AnswerSync {
    client: Arc<ExamClient>,
    exam_id: String,
    last_synced: Option<String>,
}

impl AnswerSync {
    /// 创建新的答案同步服务
    ///
    /// `initial_snapshot` 是加载完成时答题卡的快照：
    /// 还没答过题就到点的批量保存直接跳过。
    pub fn new(client: Arc<ExamClient>, exam_id: impl Into<String>, initial_snapshot: String) -> Self {
        Self {
            client,
            exam_id: exam_id.into(),
            last_synced: Some(initial_snapshot),
        }
    }

    /// 即时保存一次选择（后台任务，不等待、不重试）
    pub fn spawn_instant(&self, question_id: &str, choice_id: &str) {
        let client = Arc::clone(&self.client);
        let exam_id = self.exam_id.clone();
        let question_id = question_id.to_string();
        let choice_id = choice_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = client.save_answer(&exam_id, &question_id, &choice_id).await {
                debug!("即时保存失败（忽略）: {}", e);
            }
        });
    }

    /// 当前快照和最近送达的快照是否不同
    pub fn needs_flush(&self, snapshot: &str) -> bool {
        self.last_synced.as_deref() != Some(snapshot)
    }

    /// 记录一次整卷送达成功
    pub fn mark_synced(&mut self, snapshot: String) {
        self.last_synced = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::answer::AnswerSheet;
    use crate::models::exam::QuestionType;

    fn sync_with_empty_snapshot() -> AnswerSync {
        let client = Arc::new(ExamClient::new(&Config::default()));
        AnswerSync::new(client, "e1", AnswerSheet::new().snapshot())
    }

    #[test]
    fn test_unchanged_snapshot_skips_flush() {
        let sync = sync_with_empty_snapshot();
        let sheet = AnswerSheet::new();
        assert!(!sync.needs_flush(&sheet.snapshot()));
    }

    #[test]
    fn test_changed_snapshot_requires_flush_until_marked() {
        let mut sync = sync_with_empty_snapshot();
        let mut sheet = AnswerSheet::new();
        sheet.select("q1", "a", QuestionType::SingleChoice);
        let snapshot = sheet.snapshot();

        assert!(sync.needs_flush(&snapshot));
        sync.mark_synced(snapshot.clone());
        assert!(!sync.needs_flush(&snapshot));

        // 再次变化后又需要保存
        sheet.select("q1", "b", QuestionType::SingleChoice);
        assert!(sync.needs_flush(&sheet.snapshot()));
    }
}
