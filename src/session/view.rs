use crate::session::phase::SessionPhase;

/// 会话快照
///
/// 供展示层读取的不可变视图，通过 watch 通道发布。
/// 展示层永远拿不到状态机本体，只拿快照。
#[derive(Debug, Clone)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub exam_title: String,
    /// 剩余秒数（观察值永远不为负）
    pub remaining_secs: u64,
    /// 当前题目下标（按展示顺序）
    pub current_index: usize,
    pub total_questions: usize,
    /// 每题已选的选项 ID（按展示顺序）
    pub selected: Vec<Vec<String>>,
    pub answered_count: usize,
    pub violation_count: u32,
    pub violation_limit: u32,
    /// 最近一次交卷失败的提示，交卷重新发起时清空
    pub last_submit_error: Option<String>,
    /// 交卷成功后服务端返回的提交 ID
    pub submission_id: Option<String>,
}

impl SessionView {
    /// 某题是否已作答
    pub fn is_answered(&self, index: usize) -> bool {
        self.selected.get(index).map(|s| !s.is_empty()).unwrap_or(false)
    }

    /// 剩余时间格式化为 mm:ss（超过一小时为 h:mm:ss）
    pub fn format_remaining(&self) -> String {
        let h = self.remaining_secs / 3600;
        let m = (self.remaining_secs % 3600) / 60;
        let s = self.remaining_secs % 60;
        if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{:02}:{:02}", m, s)
        }
    }

    /// 一行进度摘要
    pub fn progress_line(&self) -> String {
        format!(
            "[{}] ⏱ {} · 已答 {}/{} · 违规 {}/{}",
            self.phase,
            self.format_remaining(),
            self.answered_count,
            self.total_questions,
            self.violation_count,
            self.violation_limit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_view(remaining_secs: u64) -> SessionView {
        SessionView {
            phase: SessionPhase::Active,
            exam_title: "测验".to_string(),
            remaining_secs,
            current_index: 0,
            total_questions: 0,
            selected: Vec::new(),
            answered_count: 0,
            violation_count: 0,
            violation_limit: 3,
            last_submit_error: None,
            submission_id: None,
        }
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(empty_view(0).format_remaining(), "00:00");
        assert_eq!(empty_view(59).format_remaining(), "00:59");
        assert_eq!(empty_view(1800).format_remaining(), "30:00");
        assert_eq!(empty_view(3661).format_remaining(), "1:01:01");
    }
}
