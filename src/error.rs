use thiserror::Error;

use crate::models::document::DocumentKind;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 上传文件校验错误
    #[error("上传校验错误: {0}")]
    Upload(#[from] UploadError),
    /// 文本提取错误
    #[error("文本提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 题目生成错误
    #[error("题目生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件读取错误
    #[error("读取文件失败 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 上传文件集合的校验错误
///
/// 这些都是"整批拒绝"的错误，发生时不会进行任何文本提取
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// 没有上传任何文件
    #[error("没有上传任何文件")]
    NoDocuments,
    /// 文件数量超出上限
    #[error("文件数量 {count} 超出上限 {max}")]
    TooManyDocuments { count: usize, max: usize },
    /// 文件总大小超出上限
    #[error("文件总大小 {total_bytes} 字节超出上限 {max_bytes} 字节")]
    PayloadTooLarge { total_bytes: u64, max_bytes: u64 },
}

/// 单个文件的文本提取错误（只影响该文件）
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 无法识别的文件类型
    #[error("不支持的文件类型: {document}")]
    Unsupported { document: String },
    /// 文件内容损坏或无法解码
    #[error("无法解析 {kind} 文件 {document}: {reason}")]
    Corrupt {
        document: String,
        kind: DocumentKind,
        reason: String,
    },
    /// 外部转换工具执行失败
    #[error("外部工具 {program} 处理 {document} 失败: {reason}")]
    ToolFailed {
        program: String,
        document: String,
        reason: String,
    },
}

impl ExtractionError {
    /// 创建文件损坏错误
    pub fn corrupt(
        document: impl Into<String>,
        kind: DocumentKind,
        reason: impl std::fmt::Display,
    ) -> Self {
        ExtractionError::Corrupt {
            document: document.into(),
            kind,
            reason: reason.to_string(),
        }
    }
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建 LLM 请求失败 (模型: {model}): {reason}")]
    RequestBuildFailed { model: String, reason: String },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

impl LlmError {
    /// 创建 API 调用错误
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

/// 模型响应解析错误
#[derive(Debug, Error)]
pub enum ResponseParseError {
    /// 不是合法的 JSON，或缺少必填字段
    #[error("响应不符合题目 JSON 结构: {0}")]
    Json(#[from] serde_json::Error),
    /// 题目数量不足
    #[error("需要 {expected} 道题目，实际只返回了 {actual} 道")]
    TooFewQuestions { expected: usize, actual: usize },
    /// 选项键不在 A-D 范围内
    #[error("第 {question} 题的选项键 '{key}' 无效")]
    InvalidOptionKey { question: usize, key: String },
    /// 两个选项键规范化后相同（如 "A" 与 "a"）
    #[error("第 {question} 题的选项键 '{key}' 重复")]
    DuplicateOptionKey { question: usize, key: String },
    /// 选项不是完整的 A-D
    #[error("第 {question} 题缺少选项 {missing}")]
    MissingOptions { question: usize, missing: String },
    /// 正确答案不在选项中
    #[error("第 {question} 题的正确答案 '{key}' 不在选项中")]
    CorrectAnswerNotInOptions { question: usize, key: String },
    /// 必填文本为空
    #[error("第 {question} 题的 {field} 字段为空")]
    EmptyField { question: usize, field: &'static str },
}

/// 题目生成错误
///
/// 任何一个批次失败都会让整个生成请求失败，已完成的批次全部丢弃
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 源文本为空
    #[error("没有可用于出题的文本内容")]
    EmptySource,
    /// 题目数量不在可选范围内
    #[error("题目数量 {requested} 不在可选范围 {allowed:?} 内")]
    UnsupportedQuestionCount {
        requested: usize,
        allowed: &'static [usize],
    },
    /// 模型调用失败
    #[error("第 {batch} 批调用模型失败: {source}")]
    ModelCall {
        batch: usize,
        #[source]
        source: LlmError,
    },
    /// 模型响应无法解析
    #[error("第 {batch} 批响应解析失败: {source}")]
    MalformedResponse {
        batch: usize,
        #[source]
        source: ResponseParseError,
    },
}

/// 会话状态错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 尚未生成测验
    #[error("尚未生成测验")]
    NoQuiz,
    /// 测验已提交
    #[error("测验已提交，请先重置")]
    AlreadySubmitted,
    /// 题号不存在
    #[error("题号 {number} 不存在")]
    UnknownQuestion { number: usize },
    /// 选项不存在
    #[error("第 {number} 题没有选项 {key}")]
    UnknownOption { number: usize, key: String },
    /// 没有可用的文本内容
    #[error("尚未提取任何文本内容")]
    NoContent,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 缺少 API 密钥
    #[error("缺少 LLM API 密钥 (LLM_API_KEY)")]
    MissingCredential,
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 难度名称无法识别
    #[error("无法识别的难度: {value}")]
    UnknownDifficulty { value: String },
    /// 题目数量不在可选范围内
    #[error("题目数量 {value} 不在可选范围 {allowed:?} 内")]
    UnsupportedQuestionCount {
        value: usize,
        allowed: &'static [usize],
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
