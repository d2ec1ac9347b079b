use crate::models::violation::ViolationKind;
use crate::session::phase::SubmitReason;

/// 状态机产出的副作用
///
/// `ExamAttempt` 本身是纯同步的：每次命令返回一组副作用，
/// 由编排层负责真正执行（网络调用、全屏控制、界面提示）。
/// 状态变更永远发生在副作用执行之前。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// 请求进入全屏
    EnterFullscreen,
    /// 请求退出全屏（只在终态之后产出）
    ExitFullscreen,
    /// 即时保存一次选择
    SyncAnswer {
        question_id: String,
        choice_id: String,
    },
    /// 上报一次计入的违规
    LogViolation { kind: ViolationKind, count: u32 },
    /// 提示用户某操作已被拦截（不计入违规）
    WarnBlocked { kind: ViolationKind },
    /// 发起交卷请求
    SubmitAnswers {
        reason: SubmitReason,
        answers: Vec<(String, String)>,
    },
    /// 跳转到成绩页
    RedirectToResult { submission_id: String },
}
