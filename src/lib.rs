//! # Take Exam Submit
//!
//! 一个用于在线考试答题的 Rust 会话控制器
//!
//! 管理一次限时、带诚信监控的考试：密码门禁 → 全屏答题 →
//! 自动保存 → 违规检测 → 交卷。展示层可以替换，核心不依赖任何界面框架。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有展示面能力，只暴露能力
//! - `Fullscreen` - 进入/退出全屏的能力接口（终端备用屏 / 无操作实现）
//!
//! ### ② 业务能力层（Services / Clients）
//! - `clients/ExamClient` - 考试平台 API（拉卷 / 保存 / 上报 / 交卷）
//! - `services/ExamLoader` - 拉卷、校验、一次性乱序能力
//! - `services/AnswerSync` - 即时保存能力和批量保存的脏检查记账
//!
//! ### ③ 会话层（Session）
//! - `session/` - 定义"一次考试"的完整生命周期
//! - `ExamAttempt` - 纯同步状态机（命令进、副作用出）
//! - `SessionPhase` - `Locked → Active → Submitting → Terminal` 单向推进
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/runner` - 会话运行器，唯一消费命令队列，
//!   驱动计时节拍和批量保存，执行副作用，发布展示快照
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod utils;

// 重新导出常用类型
pub use clients::ExamClient;
pub use config::Config;
pub use error::{ConfigError, LoadError, SubmitError, SyncError, ViolationLogError};
pub use infrastructure::{Fullscreen, NoopFullscreen, TerminalFullscreen};
pub use models::{AnswerSheet, ExamDefinition, Question, QuestionType, ViolationKind};
pub use orchestrator::{SessionCommand, SessionHandle, SessionRunner};
pub use services::{AnswerSync, ExamLoader};
pub use session::{ExamAttempt, SessionPhase, SessionView, SideEffect, SubmitOutcome, SubmitReason};
