//! 会话运行器 - 编排层
//!
//! ## 职责
//!
//! 本模块是一次考试会话的唯一推进者，负责命令队列和时间调度。
//!
//! ## 核心功能
//!
//! 1. **命令队列**：多生产者 mpsc，运行器是唯一消费者，
//!    所有状态变更串行发生，和浏览器事件循环同构
//! 2. **计时调度**：每秒一个节拍驱动倒计时；到点触发批量保存
//! 3. **副作用执行**：网络调用一律 `tokio::spawn` 后台执行，
//!    完成结果通过回环发送端送回队列，绝不直接改状态机
//! 4. **视图发布**：每处理一个事件就向 watch 通道发布一份快照
//! 5. **资源管理**：持有状态机、HTTP 客户端和全屏控制器
//!
//! ## 设计特点
//!
//! - **串行核心**：状态机只在本任务里被触碰
//! - **阶段门控**：离开 `Active` 后节拍和批量保存不再被轮询
//! - **终态即停**：进入 `Terminal` 后退出循环并返回最终快照

use crate::clients::ExamClient;
use crate::config::Config;
use crate::error::SubmitError;
use crate::infrastructure::Fullscreen;
use crate::models::answer::SubmissionReceipt;
use crate::models::exam::ExamDefinition;
use crate::models::violation::ViolationKind;
use crate::services::AnswerSync;
use crate::session::{ExamAttempt, SessionView, SideEffect};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{debug, info, warn};

/// 会话命令
///
/// 展示层、诚信信号源和运行器自己的后台任务都是生产者，
/// 全部汇聚到同一条队列。
#[derive(Debug)]
pub enum SessionCommand {
    /// 提交密码尝试解锁
    Unlock { password: String },
    /// 选择/切换某题的选项
    Select {
        question_id: String,
        choice_id: String,
    },
    /// 跳转到某题（按展示顺序）
    Navigate { index: usize },
    /// 用户主动交卷
    SubmitNow,
    /// 诚信信号
    Signal { kind: ViolationKind },
    /// 交卷网络调用完成（内部回传）
    SubmitFinished {
        result: Result<SubmissionReceipt, SubmitError>,
    },
    /// 批量保存整卷送达（内部回传）
    BatchSynced { snapshot: String },
}

/// 会话操作句柄
///
/// 命令进、快照出，展示层只通过它和会话交互。
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    view: watch::Receiver<SessionView>,
}

impl SessionHandle {
    pub async fn unlock(&self, password: impl Into<String>) {
        self.send(SessionCommand::Unlock {
            password: password.into(),
        })
        .await;
    }

    pub async fn select(&self, question_id: impl Into<String>, choice_id: impl Into<String>) {
        self.send(SessionCommand::Select {
            question_id: question_id.into(),
            choice_id: choice_id.into(),
        })
        .await;
    }

    pub async fn navigate(&self, index: usize) {
        self.send(SessionCommand::Navigate { index }).await;
    }

    pub async fn submit_now(&self) {
        self.send(SessionCommand::SubmitNow).await;
    }

    pub async fn signal(&self, kind: ViolationKind) {
        self.send(SessionCommand::Signal { kind }).await;
    }

    async fn send(&self, command: SessionCommand) {
        if self.commands.send(command).await.is_err() {
            debug!("会话已结束，命令被丢弃");
        }
    }

    /// 当前快照
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// 等待下一次快照更新
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.view.changed().await
    }
}

/// 会话运行器
pub struct SessionRunner {
    attempt: ExamAttempt,
    client: Arc<ExamClient>,
    sync: AnswerSync,
    fullscreen: Box<dyn Fullscreen + Send>,
    exam_id: String,
    api_base_url: String,
    commands: mpsc::Receiver<SessionCommand>,
    loopback: mpsc::Sender<SessionCommand>,
    view_tx: watch::Sender<SessionView>,
    autosave_period: Duration,
}

impl SessionRunner {
    /// 创建会话运行器和配套的操作句柄
    pub fn new(
        exam: ExamDefinition,
        client: Arc<ExamClient>,
        fullscreen: Box<dyn Fullscreen + Send>,
        config: &Config,
    ) -> (Self, SessionHandle) {
        let attempt = ExamAttempt::new(exam, config.violation_limit);
        let exam_id = attempt.exam().id.clone();
        let sync = AnswerSync::new(
            Arc::clone(&client),
            exam_id.clone(),
            attempt.answers().snapshot(),
        );
        let (command_tx, command_rx) = mpsc::channel(64);
        let (view_tx, view_rx) = watch::channel(attempt.view());

        let runner = Self {
            attempt,
            client,
            sync,
            fullscreen,
            exam_id,
            api_base_url: config.api_base_url.clone(),
            commands: command_rx,
            loopback: command_tx.clone(),
            view_tx,
            autosave_period: Duration::from_secs(config.autosave_interval_secs),
        };
        let handle = SessionHandle {
            commands: command_tx,
            view: view_rx,
        };
        (runner, handle)
    }

    /// 运行会话直到终态，返回最终快照
    pub async fn run(mut self) -> SessionView {
        let effects = self.attempt.start();
        self.apply_effects(effects);
        self.publish_view();

        // interval_at 让第一拍落在 +1s，而不是立刻
        let tick_period = Duration::from_secs(1);
        let mut ticker = time::interval_at(time::Instant::now() + tick_period, tick_period);
        let mut autosave = time::interval_at(
            time::Instant::now() + self.autosave_period,
            self.autosave_period,
        );

        while !self.attempt.phase().is_terminal() {
            let was_active = self.attempt.phase().is_active();
            tokio::select! {
                maybe_command = self.commands.recv() => {
                    match maybe_command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }
                _ = ticker.tick(), if was_active => {
                    let effects = self.attempt.tick();
                    self.apply_effects(effects);
                }
                _ = autosave.tick(), if was_active => {
                    self.flush_answers();
                }
            }
            // 非活跃期错过的节拍不补发：解锁或交卷失败回退后
            // 两个定时器都从当前时刻重新起拍
            if !was_active && self.attempt.phase().is_active() {
                ticker.reset();
                autosave.reset();
            }
            self.publish_view();
        }

        self.publish_view();
        info!("🏁 会话结束: {}", self.attempt.phase());
        self.attempt.view()
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let effects = match command {
            SessionCommand::Unlock { password } => self.attempt.try_unlock(&password),
            SessionCommand::Select {
                question_id,
                choice_id,
            } => self.attempt.select(&question_id, &choice_id),
            SessionCommand::Navigate { index } => {
                self.attempt.navigate(index);
                Vec::new()
            }
            SessionCommand::SubmitNow => self.attempt.submit_now(),
            SessionCommand::Signal { kind } => self.attempt.report_violation(kind),
            SessionCommand::SubmitFinished { result } => self.attempt.complete_submit(result),
            SessionCommand::BatchSynced { snapshot } => {
                debug!("💾 批量保存整卷送达");
                self.sync.mark_synced(snapshot);
                Vec::new()
            }
        };
        self.apply_effects(effects);
    }

    /// 执行状态机产出的副作用
    ///
    /// 状态变更此刻已经完成，这里只做外部动作。
    fn apply_effects(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::EnterFullscreen => {
                    if let Err(e) = self.fullscreen.enter() {
                        warn!("⚠️ 进入全屏失败（继续考试）: {}", e);
                    }
                }
                SideEffect::ExitFullscreen => {
                    if let Err(e) = self.fullscreen.exit() {
                        warn!("⚠️ 退出全屏失败: {}", e);
                    }
                }
                SideEffect::SyncAnswer {
                    question_id,
                    choice_id,
                } => {
                    self.sync.spawn_instant(&question_id, &choice_id);
                }
                SideEffect::LogViolation { kind, count } => {
                    let client = Arc::clone(&self.client);
                    let exam_id = self.exam_id.clone();
                    tokio::spawn(async move {
                        if let Err(e) = client.log_violation(&exam_id, kind).await {
                            debug!("违规上报失败（忽略，第 {} 次）: {}", count, e);
                        }
                    });
                }
                SideEffect::WarnBlocked { kind } => {
                    warn!("🚫 {}已被拦截，考试期间禁止该操作", kind.label());
                }
                SideEffect::SubmitAnswers { reason: _, answers } => {
                    let client = Arc::clone(&self.client);
                    let exam_id = self.exam_id.clone();
                    let loopback = self.loopback.clone();
                    tokio::spawn(async move {
                        let result = client.submit(&exam_id, &answers).await;
                        let _ = loopback
                            .send(SessionCommand::SubmitFinished { result })
                            .await;
                    });
                }
                SideEffect::RedirectToResult { submission_id } => {
                    info!(
                        "🔗 成绩页: {}/exam/result/{}",
                        self.api_base_url, submission_id
                    );
                }
            }
        }
    }

    /// 批量保存：快照没变就整轮跳过，不发任何请求
    fn flush_answers(&mut self) {
        let snapshot = self.attempt.answers().snapshot();
        if !self.sync.needs_flush(&snapshot) {
            debug!("🔁 答案无变化，跳过本轮批量保存");
            return;
        }
        let pairs = self.attempt.answers().to_pairs();
        debug!("📦 批量保存 {} 条选择", pairs.len());
        let client = Arc::clone(&self.client);
        let exam_id = self.exam_id.clone();
        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            for (question_id, choice_id) in &pairs {
                if let Err(e) = client.save_answer(&exam_id, question_id, choice_id).await {
                    debug!("批量保存中断，等下一轮重试: {}", e);
                    return;
                }
            }
            let _ = loopback
                .send(SessionCommand::BatchSynced { snapshot })
                .await;
        });
    }

    fn publish_view(&self) {
        self.view_tx.send_replace(self.attempt.view());
    }
}
