//! 会话层（Session Layer）
//!
//! ## 职责
//!
//! 本层定义"一次考试"的完整生命周期，是整个系统的核心状态机。
//!
//! ## 模块划分
//!
//! ### `phase` - 会话阶段
//! - `Locked → Active → Submitting → Terminal` 单向推进
//! - 唯一例外：用户主动交卷失败时回到 `Active` 重试
//!
//! ### `attempt` - 考试会话状态机
//! - 门禁（密码解锁）、计时、作答、诚信监控、交卷
//! - 纯同步，命令进、副作用出，不碰网络和界面
//!
//! ### `effect` - 副作用描述
//! - 状态机的输出语言，由编排层解释执行
//!
//! ### `view` - 展示快照
//! - 展示层唯一能看到的东西
//!
//! ## 设计原则
//!
//! 1. **状态先行**：所有状态变更在产出副作用之前完成
//! 2. **阶段守卫**：非 `Active` 阶段的命令一律吞掉，不报错
//! 3. **快照隔离**：读侧只拿不可变快照，拿不到状态机本体

pub mod attempt;
pub mod effect;
pub mod phase;
pub mod view;

// 重新导出主要类型
pub use attempt::ExamAttempt;
pub use effect::SideEffect;
pub use phase::{SessionPhase, SubmitOutcome, SubmitReason};
pub use view::SessionView;
