/// 考试平台 API 客户端
///
/// 封装所有与考试平台相关的调用逻辑
use crate::config::Config;
use crate::error::{LoadError, SubmitError, SyncError, ViolationLogError};
use crate::models::answer::SubmissionReceipt;
use crate::models::exam::ExamDefinition;
use crate::models::violation::ViolationKind;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// 平台统一响应信封
///
/// `message` 和 `data` 缺省时解析为 `None`，不要求 `T: Default`。
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    code: u64,
    message: Option<String>,
    data: Option<T>,
}

/// 考试平台 API 客户端
pub struct ExamClient {
    http: Client,
    base_url: String,
    token: String,
    user_id: String,
    timeout: Duration,
}

impl ExamClient {
    /// 创建新的考试平台客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.clone(),
            token: config.exam_token.clone(),
            user_id: config.user_id.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// 拉取试卷定义
    ///
    /// # 参数
    /// - `exam_id`: 考试 ID
    ///
    /// # 返回
    /// 返回完整的试卷定义（含题目、选项和考试设置）
    pub async fn fetch_exam(&self, exam_id: &str) -> Result<ExamDefinition, LoadError> {
        let endpoint = format!("{}/exam/attempt/{}", self.base_url, exam_id);

        let response = self
            .http
            .get(&endpoint)
            .header("examtoken", &self.token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LoadError::request_failed(&endpoint, e))?;

        let body: ApiResponse<ExamDefinition> = response
            .json()
            .await
            .map_err(|e| LoadError::JsonParseFailed {
                source: Box::new(e),
            })?;

        if !Self::is_success_response(body.code) {
            return Err(LoadError::bad_response(
                &endpoint,
                Some(body.code),
                body.message,
            ));
        }
        body.data
            .ok_or_else(|| LoadError::bad_response(&endpoint, Some(body.code), body.message))
    }

    /// 保存单个选择（即时保存和批量保存共用）
    ///
    /// # 参数
    /// - `exam_id`: 考试 ID
    /// - `question_id`: 题目 ID
    /// - `choice_id`: 选项 ID
    pub async fn save_answer(
        &self,
        exam_id: &str,
        question_id: &str,
        choice_id: &str,
    ) -> Result<(), SyncError> {
        let endpoint = format!("{}/exam/attempt/answer/save", self.base_url);
        let payload = json!({
            "exam_id": exam_id,
            "question_id": question_id,
            "choice_id": choice_id,
        });

        debug!("保存答案 Payload: {}", payload);

        let response = self
            .http
            .post(&endpoint)
            .header("examtoken", &self.token)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::request_failed(&endpoint, e))?;

        let body: ApiResponse<Value> = response
            .json()
            .await
            .map_err(|e| SyncError::request_failed(&endpoint, e))?;

        if !Self::is_success_response(body.code) {
            return Err(SyncError::bad_response(
                &endpoint,
                Some(body.code),
                body.message,
            ));
        }
        Ok(())
    }

    /// 上报一次计入的违规
    pub async fn log_violation(
        &self,
        exam_id: &str,
        kind: ViolationKind,
    ) -> Result<(), ViolationLogError> {
        let endpoint = format!("{}/exam/attempt/violation/log", self.base_url);
        let payload = json!({
            "exam_id": exam_id,
            "violation_type": kind.as_str(),
        });

        debug!("违规上报 Payload: {}", payload);

        let response = self
            .http
            .post(&endpoint)
            .header("examtoken", &self.token)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ViolationLogError::request_failed(&endpoint, e))?;

        let body: ApiResponse<Value> = response
            .json()
            .await
            .map_err(|e| ViolationLogError::request_failed(&endpoint, e))?;

        if !Self::is_success_response(body.code) {
            return Err(ViolationLogError::bad_response(
                &endpoint,
                Some(body.code),
                body.message,
            ));
        }
        Ok(())
    }

    /// 提交整卷
    ///
    /// # 参数
    /// - `exam_id`: 考试 ID
    /// - `answers`: 展平的 (题目ID, 选项ID) 对列表
    ///
    /// # 返回
    /// 返回交卷回执（含 submission_id）
    pub async fn submit(
        &self,
        exam_id: &str,
        answers: &[(String, String)],
    ) -> Result<SubmissionReceipt, SubmitError> {
        let endpoint = format!("{}/exam/attempt/submit", self.base_url);
        let payload = json!({
            "exam_id": exam_id,
            "user_id": self.user_id,
            "answers": answers
                .iter()
                .map(|(question_id, choice_id)| {
                    json!({ "question_id": question_id, "choice_id": choice_id })
                })
                .collect::<Vec<_>>(),
        });

        debug!("交卷 Payload: {}", payload);

        let response = self
            .http
            .post(&endpoint)
            .header("examtoken", &self.token)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmitError::request_failed(&endpoint, e))?;

        let body: ApiResponse<SubmissionReceipt> = response
            .json()
            .await
            .map_err(|e| SubmitError::request_failed(&endpoint, e))?;

        if !Self::is_success_response(body.code) {
            return Err(SubmitError::bad_response(
                &endpoint,
                Some(body.code),
                body.message,
            ));
        }
        body.data.ok_or(SubmitError::MissingSubmissionId)
    }

    /// 检查 API 响应是否成功
    pub fn is_success_response(code: u64) -> bool {
        code == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses_with_and_without_data() {
        let body: ApiResponse<SubmissionReceipt> =
            serde_json::from_str(r#"{"code":200,"message":"ok","data":{"submission_id":9001}}"#)
                .expect("回执信封解析应该成功");
        assert!(ExamClient::is_success_response(body.code));
        assert_eq!(
            body.data.expect("data 应该存在").submission_id,
            "9001"
        );

        let body: ApiResponse<SubmissionReceipt> =
            serde_json::from_str(r#"{"code":500,"message":"服务器内部错误"}"#)
                .expect("错误信封解析应该成功");
        assert!(!ExamClient::is_success_response(body.code));
        assert!(body.data.is_none());

        // SubmissionReceipt 没有 Default，裸信封也必须能解析
        let body: ApiResponse<SubmissionReceipt> = serde_json::from_str(r#"{"code":200}"#)
            .expect("裸信封解析应该成功");
        assert!(body.message.is_none());
        assert!(body.data.is_none());
    }
}
