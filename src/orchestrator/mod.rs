//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责会话的推进和调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `runner` - 会话运行器
//! - 持有状态机、HTTP 客户端和全屏控制器
//! - 消费命令队列（唯一消费者）
//! - 驱动每秒节拍和批量保存节奏
//! - 把副作用翻译成网络调用和全屏动作
//! - 通过 watch 通道向展示层发布快照
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::SessionRunner (推进一次会话)
//!     ↓
//! session::ExamAttempt (状态机，命令进、副作用出)
//!     ↓
//! services (能力层：loader / sync)
//!     ↓
//! clients::ExamClient (平台 API)
//!     ↓
//! infrastructure (基础设施：Fullscreen)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一消费者**：状态机只在运行器任务里被触碰
//! 2. **资源隔离**：只有编排层持有全屏控制器和命令队列收端
//! 3. **向下依赖**：编排层 → session → services → infrastructure
//! 4. **无业务判断**：交卷时机、违规判定都在状态机里，这里只调度

pub mod runner;

// 重新导出主要类型
pub use runner::{SessionCommand, SessionHandle, SessionRunner};
