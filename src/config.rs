use crate::error::ConfigError;
use serde::Deserialize;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 考试平台 API 基础地址
    pub api_base_url: String,
    /// 考试平台访问令牌
    pub exam_token: String,
    /// 本次考试 ID
    pub exam_id: String,
    /// 考生用户 ID
    pub user_id: String,
    /// 本地试卷文件（设置后离线加载，不走网络）
    pub exam_file: Option<String>,
    /// 答案批量保存间隔（秒）
    pub autosave_interval_secs: u64,
    /// 违规次数上限，达到后强制交卷
    pub violation_limit: u32,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://tps-exam-api.staff.xdf.cn".to_string(),
            exam_token: "8A41E3C507FD2B9164F0A3DE81C55B27".to_string(),
            exam_id: "20250823001".to_string(),
            user_id: "stu_1024".to_string(),
            exam_file: None,
            autosave_interval_secs: 30,
            violation_limit: 3,
            request_timeout_secs: 10,
            verbose_logging: false,
            output_log_file: "exam_session.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("EXAM_API_BASE_URL").unwrap_or(default.api_base_url),
            exam_token: std::env::var("EXAM_TOKEN").unwrap_or(default.exam_token),
            exam_id: std::env::var("EXAM_ID").unwrap_or(default.exam_id),
            user_id: std::env::var("EXAM_USER_ID").unwrap_or(default.user_id),
            exam_file: std::env::var("EXAM_FILE").ok(),
            autosave_interval_secs: std::env::var("AUTOSAVE_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.autosave_interval_secs),
            violation_limit: std::env::var("VIOLATION_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.violation_limit),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 从 TOML 配置文件加载
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.to_string(),
            source: Box::new(e),
        })?;
        let config = toml::from_str(&content).map_err(|e| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source: Box::new(e),
        })?;
        Ok(config)
    }

    /// 加载配置：CONFIG_FILE 指定文件时读文件，否则读环境变量
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(&path),
            Err(_) => Ok(Self::from_env()),
        }
    }
}
