//! 考试会话状态机 - 会话层
//!
//! 核心职责：管理一次考试从解锁到交卷的完整生命周期
//!
//! 设计要点：
//! 1. 纯同步：每个命令方法立即完成状态变更，返回一组 [`SideEffect`]
//!    交给编排层执行，网络和界面永远不在这里发生
//! 2. 阶段守卫：计时、违规、作答只在 `Active` 阶段生效，
//!    其余阶段的事件直接吞掉
//! 3. 先计数后上报：违规计数在产出任何副作用之前完成，
//!    同一轮的连续事件不会漏计

use tracing::{debug, error, info, warn};

use crate::models::answer::{AnswerSheet, SubmissionReceipt};
use crate::models::exam::ExamDefinition;
use crate::models::violation::ViolationKind;
use crate::error::SubmitError;
use crate::session::effect::SideEffect;
use crate::session::phase::{SessionPhase, SubmitReason};
use crate::session::view::SessionView;

/// 一次考试会话
pub struct ExamAttempt {
    exam: ExamDefinition,
    phase: SessionPhase,
    remaining_secs: u64,
    answers: AnswerSheet,
    violation_count: u32,
    violation_limit: u32,
    current_index: usize,
    pending_reason: Option<SubmitReason>,
    last_submit_error: Option<String>,
    submission_id: Option<String>,
}

impl ExamAttempt {
    /// 创建新的考试会话
    ///
    /// 初始阶段为 `Locked`，时间预算为 `duration_minutes * 60` 秒。
    pub fn new(exam: ExamDefinition, violation_limit: u32) -> Self {
        let remaining_secs = exam.duration_secs();
        Self {
            exam,
            phase: SessionPhase::Locked,
            remaining_secs,
            answers: AnswerSheet::new(),
            violation_count: 0,
            violation_limit,
            current_index: 0,
            pending_reason: None,
            last_submit_error: None,
            submission_id: None,
        }
    }

    // ========== 解锁 ==========

    /// 开始会话
    ///
    /// 无密码的考试直接进入 `Active`；有密码则停在 `Locked` 等待输入。
    pub fn start(&mut self) -> Vec<SideEffect> {
        if self.phase != SessionPhase::Locked {
            return Vec::new();
        }
        if self.exam.settings.password.is_none() {
            return self.activate();
        }
        info!("🔒 本场考试需要密码，请输入后开始");
        Vec::new()
    }

    /// 尝试用密码解锁
    ///
    /// 明文比对加载到的试卷密码。密码跟着试卷载荷一起下发，
    /// 这是已知的弱点，这里只负责忠实复现门禁语义。
    pub fn try_unlock(&mut self, input: &str) -> Vec<SideEffect> {
        if self.phase != SessionPhase::Locked {
            return Vec::new();
        }
        match &self.exam.settings.password {
            Some(password) if password == input => self.activate(),
            Some(_) => {
                warn!("❌ 密码错误，考试仍未解锁");
                Vec::new()
            }
            // 无密码的考试在 start() 就已进入 Active，这里只剩防御分支
            None => self.activate(),
        }
    }

    fn activate(&mut self) -> Vec<SideEffect> {
        self.phase = SessionPhase::Active;
        info!(
            "▶️ 考试开始: {} ({} 题 / {} 分钟)",
            self.exam.title,
            self.exam.question_count(),
            self.exam.settings.duration_minutes
        );
        vec![SideEffect::EnterFullscreen]
    }

    // ========== 计时 ==========

    /// 消费一个计时节拍（每秒一次）
    ///
    /// 剩余时间恰好减一，减到零的那一拍触发超时交卷。
    /// 非 `Active` 阶段的节拍是空操作。
    pub fn tick(&mut self) -> Vec<SideEffect> {
        if !self.phase.is_active() {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            info!("⏰ 考试时间到，自动交卷");
            return self.begin_submit(SubmitReason::Timeout);
        }
        Vec::new()
    }

    // ========== 作答 ==========

    /// 选择某题的某个选项
    ///
    /// 单选题替换已选项，多选题切换选中状态。
    /// 每次有效选择都产出一次即时保存副作用。
    pub fn select(&mut self, question_id: &str, choice_id: &str) -> Vec<SideEffect> {
        if !self.phase.is_active() {
            debug!("非答题阶段的选择被忽略: {} / {}", question_id, choice_id);
            return Vec::new();
        }
        let kind = match self.exam.question(question_id) {
            Some(question) => {
                if question.choice(choice_id).is_none() {
                    warn!("⚠️ 未知选项被忽略: 题目 {} 选项 {}", question_id, choice_id);
                    return Vec::new();
                }
                question.kind
            }
            None => {
                warn!("⚠️ 未知题目被忽略: {}", question_id);
                return Vec::new();
            }
        };
        self.answers.select(question_id, choice_id, kind);
        vec![SideEffect::SyncAnswer {
            question_id: question_id.to_string(),
            choice_id: choice_id.to_string(),
        }]
    }

    /// 跳转到指定题目（按展示顺序，越界时收到最后一题）
    pub fn navigate(&mut self, index: usize) {
        if !self.phase.is_active() {
            return;
        }
        self.current_index = index.min(self.exam.question_count().saturating_sub(1));
    }

    // ========== 诚信监控 ==========

    /// 处理一个诚信信号
    ///
    /// 切屏 / 退出全屏：计数加一（先计数再产出副作用）、上报服务端，
    /// 达到上限立刻强制交卷，且只触发一次。
    /// 复制 / 粘贴 / 右键：拦截并警告，不计数也不上报。
    pub fn report_violation(&mut self, kind: ViolationKind) -> Vec<SideEffect> {
        if !self.phase.is_active() {
            debug!("非答题阶段的诚信信号被忽略: {}", kind);
            return Vec::new();
        }
        if !kind.is_counted() {
            debug!("拦截类信号: {}（不计数、不上报）", kind.label());
            return vec![SideEffect::WarnBlocked { kind }];
        }

        self.violation_count += 1;
        warn!(
            "⚠️ 检测到违规: {} ({}/{})",
            kind.label(),
            self.violation_count,
            self.violation_limit
        );
        let mut effects = vec![SideEffect::LogViolation {
            kind,
            count: self.violation_count,
        }];
        if self.violation_count >= self.violation_limit {
            error!("🛑 违规次数达到上限，强制交卷");
            effects.extend(self.begin_submit(SubmitReason::ViolationLimit));
        }
        effects
    }

    // ========== 交卷 ==========

    /// 用户主动交卷
    pub fn submit_now(&mut self) -> Vec<SideEffect> {
        if !self.phase.is_active() {
            debug!("非答题阶段的交卷请求被忽略");
            return Vec::new();
        }
        self.begin_submit(SubmitReason::User)
    }

    /// 进入交卷流程
    ///
    /// 三个触发来源（用户、超时、违规上限）都汇聚到这里。
    /// 调用前提是 `Active`，因此并发触发天然幂等：
    /// 第一个触发把阶段切到 `Submitting`，其余触发被阶段守卫吞掉。
    fn begin_submit(&mut self, reason: SubmitReason) -> Vec<SideEffect> {
        self.phase = SessionPhase::Submitting;
        self.pending_reason = Some(reason);
        self.last_submit_error = None;
        let answers = self.answers.to_pairs();
        info!(
            "📤 交卷中 ({}): 已答 {}/{} 题",
            reason,
            self.answers.answered_count(),
            self.exam.question_count()
        );
        vec![SideEffect::SubmitAnswers { reason, answers }]
    }

    /// 交卷网络调用完成
    ///
    /// 成功：进入终态，然后才退出全屏、跳转成绩页。
    /// 失败：用户主动交卷回到 `Active` 允许重试；
    /// 强制交卷停留在 `Submitting`，不自动重试（已知缺口）。
    pub fn complete_submit(
        &mut self,
        result: Result<SubmissionReceipt, SubmitError>,
    ) -> Vec<SideEffect> {
        if self.phase != SessionPhase::Submitting {
            debug!("迟到的交卷结果被忽略");
            return Vec::new();
        }
        let reason = match self.pending_reason {
            Some(reason) => reason,
            None => return Vec::new(),
        };
        match result {
            Ok(receipt) => {
                self.phase = SessionPhase::Terminal(reason.outcome());
                self.submission_id = Some(receipt.submission_id.clone());
                info!("✅ 交卷成功: submission_id={}", receipt.submission_id);
                vec![
                    SideEffect::ExitFullscreen,
                    SideEffect::RedirectToResult {
                        submission_id: receipt.submission_id,
                    },
                ]
            }
            Err(e) => {
                let message = e.to_string();
                self.last_submit_error = Some(message.clone());
                if reason.is_forced() {
                    error!("❌ 强制交卷失败，停留在交卷中状态: {}", message);
                } else {
                    warn!("❌ 交卷失败，可重新尝试: {}", message);
                    self.phase = SessionPhase::Active;
                    self.pending_reason = None;
                }
                Vec::new()
            }
        }
    }

    // ========== 读取 ==========

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn exam(&self) -> &ExamDefinition {
        &self.exam
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn violation_count(&self) -> u32 {
        self.violation_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// 产出展示层快照
    pub fn view(&self) -> SessionView {
        let selected = self
            .exam
            .questions
            .iter()
            .map(|q| {
                self.answers
                    .selected(&q.id)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default()
            })
            .collect();
        SessionView {
            phase: self.phase,
            exam_title: self.exam.title.clone(),
            remaining_secs: self.remaining_secs,
            current_index: self.current_index,
            total_questions: self.exam.question_count(),
            selected,
            answered_count: self.answers.answered_count(),
            violation_count: self.violation_count,
            violation_limit: self.violation_limit,
            last_submit_error: self.last_submit_error.clone(),
            submission_id: self.submission_id.clone(),
        }
    }
}
