use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、会话日志文件和横幅输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::session::SessionView;

/// 初始化全局日志
///
/// RUST_LOG 优先；没设置时 verbose 决定 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n考试会话日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 考试客户端启动");
    info!("📝 考试 ID: {}", config.exam_id);
    info!("👤 考生: {}", config.user_id);
    info!("💾 批量保存间隔: {} 秒", config.autosave_interval_secs);
    info!("🛡 违规上限: {} 次", config.violation_limit);
    info!("{}", "=".repeat(60));
}

/// 打印最终会话摘要
///
/// # 参数
/// - `view`: 会话最终快照
/// - `log_file_path`: 日志文件路径
pub fn print_final_summary(view: &SessionView, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 会话结束统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🧾 最终状态: {}", view.phase);
    info!(
        "✅ 已答题目: {}/{}",
        view.answered_count, view.total_questions
    );
    info!(
        "⚠️ 违规次数: {}/{}",
        view.violation_count, view.violation_limit
    );
    if let Some(submission_id) = &view.submission_id {
        info!("🎫 提交编号: {}", submission_id);
    }
    if let Some(error) = &view.last_submit_error {
        info!("❌ 最后一次交卷错误: {}", error);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于终端和日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
