/// 会话阶段
///
/// 状态只朝一个方向走：`Locked → Active → Submitting → Terminal`。
/// 唯一的例外是用户主动交卷失败时 `Submitting → Active`，允许重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// 未解锁（等待密码）
    Locked,
    /// 答题中（计时、监控、作答都只在此阶段生效）
    Active,
    /// 交卷请求进行中
    Submitting,
    /// 终态，不再接受任何操作
    Terminal(SubmitOutcome),
}

impl SessionPhase {
    pub fn is_active(self) -> bool {
        matches!(self, SessionPhase::Active)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Terminal(_))
    }

    /// 获取中文名称
    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::Locked => "未解锁",
            SessionPhase::Active => "答题中",
            SessionPhase::Submitting => "交卷中",
            SessionPhase::Terminal(SubmitOutcome::Submitted) => "已交卷",
            SessionPhase::Terminal(SubmitOutcome::ForcedSubmitted) => "已强制交卷",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 交卷结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 用户主动交卷
    Submitted,
    /// 超时或违规导致的强制交卷
    ForcedSubmitted,
}

/// 交卷原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    /// 用户点击交卷
    User,
    /// 考试时间耗尽
    Timeout,
    /// 违规次数达到上限
    ViolationLimit,
}

impl SubmitReason {
    /// 该原因对应的终态
    pub fn outcome(self) -> SubmitOutcome {
        match self {
            SubmitReason::User => SubmitOutcome::Submitted,
            SubmitReason::Timeout | SubmitReason::ViolationLimit => SubmitOutcome::ForcedSubmitted,
        }
    }

    /// 是否强制交卷（失败后不允许用户重试）
    pub fn is_forced(self) -> bool {
        !matches!(self, SubmitReason::User)
    }

    /// 获取中文名称
    pub fn label(self) -> &'static str {
        match self {
            SubmitReason::User => "用户主动交卷",
            SubmitReason::Timeout => "时间到自动交卷",
            SubmitReason::ViolationLimit => "违规强制交卷",
        }
    }
}

impl std::fmt::Display for SubmitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_maps_to_outcome() {
        assert_eq!(SubmitReason::User.outcome(), SubmitOutcome::Submitted);
        assert_eq!(SubmitReason::Timeout.outcome(), SubmitOutcome::ForcedSubmitted);
        assert_eq!(
            SubmitReason::ViolationLimit.outcome(),
            SubmitOutcome::ForcedSubmitted
        );
    }

    #[test]
    fn test_only_user_reason_allows_retry() {
        assert!(!SubmitReason::User.is_forced());
        assert!(SubmitReason::Timeout.is_forced());
        assert!(SubmitReason::ViolationLimit.is_forced());
    }
}
