use crate::models::exam::ExamDefinition;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载试卷定义
///
/// 离线演示和测试用：不依赖考试平台接口，数据走同一套校验和乱序流程。
pub async fn load_exam_from_toml(toml_file_path: &Path) -> Result<ExamDefinition> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let exam: ExamDefinition = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "📄 从本地文件加载试卷: {} ({} 题)",
        exam.title,
        exam.question_count()
    );

    Ok(exam)
}
