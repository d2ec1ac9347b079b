use std::fmt;

/// 试卷加载错误
///
/// 加载失败是致命错误：没有试卷就没有会话，直接终止并告知用户。
#[derive(Debug)]
pub enum LoadError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 接口返回错误响应
    BadResponse {
        endpoint: String,
        code: Option<u64>,
        message: Option<String>,
    },
    /// 试卷没有任何题目
    EmptyExam {
        exam_id: String,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::RequestFailed { endpoint, source } => {
                write!(f, "试卷加载请求失败 ({}): {}", endpoint, source)
            }
            LoadError::BadResponse {
                endpoint,
                code,
                message,
            } => {
                write!(
                    f,
                    "试卷接口返回错误响应 ({}): code={:?}, message={:?}",
                    endpoint, code, message
                )
            }
            LoadError::EmptyExam { exam_id } => {
                write!(f, "试卷 {} 没有任何题目", exam_id)
            }
            LoadError::JsonParseFailed { source } => {
                write!(f, "试卷数据JSON解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::RequestFailed { source, .. } | LoadError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 答案同步错误
///
/// 同步失败是可恢复错误：本地答案仍然是权威状态，静默记录即可，
/// 不打断答题。
#[derive(Debug)]
pub enum SyncError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 接口返回错误响应
    BadResponse {
        endpoint: String,
        code: Option<u64>,
        message: Option<String>,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::RequestFailed { endpoint, source } => {
                write!(f, "答案保存请求失败 ({}): {}", endpoint, source)
            }
            SyncError::BadResponse {
                endpoint,
                code,
                message,
            } => {
                write!(
                    f,
                    "答案保存接口返回错误响应 ({}): code={:?}, message={:?}",
                    endpoint, code, message
                )
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 违规上报错误
///
/// 上报失败不影响本地计数和强制交卷判定，静默记录。
#[derive(Debug)]
pub enum ViolationLogError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 接口返回错误响应
    BadResponse {
        endpoint: String,
        code: Option<u64>,
        message: Option<String>,
    },
}

impl fmt::Display for ViolationLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationLogError::RequestFailed { endpoint, source } => {
                write!(f, "违规上报请求失败 ({}): {}", endpoint, source)
            }
            ViolationLogError::BadResponse {
                endpoint,
                code,
                message,
            } => {
                write!(
                    f,
                    "违规上报接口返回错误响应 ({}): code={:?}, message={:?}",
                    endpoint, code, message
                )
            }
        }
    }
}

impl std::error::Error for ViolationLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViolationLogError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 交卷错误
///
/// 交卷失败必须呈现给用户。用户主动交卷失败后允许重试；
/// 强制交卷失败则停留在提交中状态（已知缺口，不自动重试）。
#[derive(Debug)]
pub enum SubmitError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 接口返回错误响应
    BadResponse {
        endpoint: String,
        code: Option<u64>,
        message: Option<String>,
    },
    /// 响应中缺少 submission_id
    MissingSubmissionId,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::RequestFailed { endpoint, source } => {
                write!(f, "交卷请求失败 ({}): {}", endpoint, source)
            }
            SubmitError::BadResponse {
                endpoint,
                code,
                message,
            } => {
                write!(
                    f,
                    "交卷接口返回错误响应 ({}): code={:?}, message={:?}",
                    endpoint, code, message
                )
            }
            SubmitError::MissingSubmissionId => {
                write!(f, "交卷响应中缺少 submission_id")
            }
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 读取配置文件失败
    FileReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileReadFailed { path, source } => {
                write!(f, "读取配置文件失败 ({}): {}", path, source)
            }
            ConfigError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileReadFailed { source, .. }
            | ConfigError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 便捷构造函数 ==========

impl LoadError {
    /// 创建加载请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LoadError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建错误响应错误
    pub fn bad_response(
        endpoint: impl Into<String>,
        code: Option<u64>,
        message: Option<String>,
    ) -> Self {
        LoadError::BadResponse {
            endpoint: endpoint.into(),
            code,
            message,
        }
    }
}

impl SyncError {
    /// 创建保存请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SyncError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建错误响应错误
    pub fn bad_response(
        endpoint: impl Into<String>,
        code: Option<u64>,
        message: Option<String>,
    ) -> Self {
        SyncError::BadResponse {
            endpoint: endpoint.into(),
            code,
            message,
        }
    }
}

impl ViolationLogError {
    /// 创建上报请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ViolationLogError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建错误响应错误
    pub fn bad_response(
        endpoint: impl Into<String>,
        code: Option<u64>,
        message: Option<String>,
    ) -> Self {
        ViolationLogError::BadResponse {
            endpoint: endpoint.into(),
            code,
            message,
        }
    }
}

impl SubmitError {
    /// 创建交卷请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SubmitError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建错误响应错误
    pub fn bad_response(
        endpoint: impl Into<String>,
        code: Option<u64>,
        message: Option<String>,
    ) -> Self {
        SubmitError::BadResponse {
            endpoint: endpoint.into(),
            code,
            message,
        }
    }
}
