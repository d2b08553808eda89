use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Difficulty;

// ========== 固定常量（不可配置） ==========

/// 每次模型调用生成的题目数量
pub const QUESTION_BATCH_SIZE: usize = 5;
/// 模型每分钟允许的调用次数
pub const MODEL_CALLS_PER_MINUTE: u32 = 15;
/// 可选的题目总数
pub const QUESTION_COUNT_CHOICES: &[usize] = &[5, 10, 15, 20, 30];
/// 单次上传的最大文件数量
pub const MAX_UPLOAD_DOCUMENTS: usize = 10;
/// 单次上传的最大总字节数（100 MiB）
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// 两次模型调用之间的最小间隔
pub fn min_call_interval(calls_per_minute: u32) -> Duration {
    Duration::from_secs(60) / calls_per_minute.max(1)
}

/// 程序配置
#[derive(Clone)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 出题配置 ---
    /// 题目难度
    pub difficulty: Difficulty,
    /// 题目总数
    pub total_questions: usize,
    // --- 文本提取 ---
    /// PDF 转文本工具
    pub pdftotext_program: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-flash".to_string(),
            difficulty: Difficulty::Medium,
            total_questions: 10,
            pdftotext_program: "pdftotext".to_string(),
            verbose_logging: false,
        }
    }
}

// 密钥不出现在 Debug 输出中
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.llm_api_key.is_empty() { "" } else { "***" };
        f.debug_struct("Config")
            .field("llm_api_key", &api_key)
            .field("llm_api_base_url", &self.llm_api_base_url)
            .field("llm_model_name", &self.llm_model_name)
            .field("difficulty", &self.difficulty)
            .field("total_questions", &self.total_questions)
            .field("pdftotext_program", &self.pdftotext_program)
            .field("verbose_logging", &self.verbose_logging)
            .finish()
    }
}

/// TOML 配置文件结构，所有字段都可省略，拼错的键会报错
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    difficulty: Option<String>,
    total_questions: Option<usize>,
    pdftotext_program: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置：默认值 → 配置文件（QUIZ_CONFIG_FILE）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("QUIZ_CONFIG_FILE") {
            config = config.merge_file(Path::new(&path))?;
        }
        config.apply_env()?;
        Ok(config)
    }

    /// 只从环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 用 TOML 配置文件覆盖当前配置
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_toml(&content, &path.display().to_string())
    }

    fn merge_toml(mut self, content: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })?;

        if let Some(v) = file.llm_api_key {
            self.llm_api_key = v;
        }
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if let Some(v) = file.difficulty {
            self.difficulty = parse_difficulty(&v)?;
        }
        if let Some(v) = file.total_questions {
            self.total_questions = check_question_count(v)?;
        }
        if let Some(v) = file.pdftotext_program {
            self.pdftotext_program = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(v) = std::env::var("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Ok(v) = std::env::var("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Ok(v) = std::env::var("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Ok(v) = std::env::var("QUIZ_DIFFICULTY") {
            self.difficulty = parse_difficulty(&v)?;
        }
        if let Some(v) = env_parse::<usize>("QUIZ_TOTAL_QUESTIONS", "usize")? {
            self.total_questions = check_question_count(v)?;
        }
        if let Ok(v) = std::env::var("PDFTOTEXT_PROGRAM") {
            self.pdftotext_program = v;
        }
        if let Some(v) = env_parse::<bool>("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        Ok(())
    }

    /// 取出 API 密钥，缺失时报错
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        let key = self.llm_api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(key)
    }
}

fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_difficulty(value: &str) -> Result<Difficulty, ConfigError> {
    value.parse().map_err(|_| ConfigError::UnknownDifficulty {
        value: value.to_string(),
    })
}

/// 校验题目总数是否在可选范围内
pub fn check_question_count(value: usize) -> Result<usize, ConfigError> {
    if QUESTION_COUNT_CHOICES.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::UnsupportedQuestionCount {
            value,
            allowed: QUESTION_COUNT_CHOICES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_call_interval_is_four_seconds() {
        assert_eq!(
            min_call_interval(MODEL_CALLS_PER_MINUTE),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn test_merge_toml_overrides_defaults() {
        let content = r#"
            llm_model_name = "gemini-2.0-flash"
            difficulty = "hard"
            total_questions = 20
        "#;
        let config = Config::default().merge_toml(content, "inline").unwrap();

        assert_eq!(config.llm_model_name, "gemini-2.0-flash");
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.total_questions, 20);
        // 未出现的字段保持默认值
        assert_eq!(config.pdftotext_program, "pdftotext");
    }

    #[test]
    fn test_merge_toml_rejects_unsupported_count() {
        let err = Config::default()
            .merge_toml("total_questions = 7", "inline")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedQuestionCount { value: 7, .. }
        ));
    }

    #[test]
    fn test_merge_toml_rejects_unknown_difficulty() {
        let err = Config::default()
            .merge_toml(r#"difficulty = "impossible""#, "inline")
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDifficulty { .. }));
    }

    #[test]
    fn test_merge_toml_rejects_misspelled_key() {
        let err = Config::default()
            .merge_toml("total_question = 20", "inline")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseFailed { .. }));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config {
            llm_api_key: "sk-very-secret".to_string(),
            ..Config::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("gemini-1.5-flash"));
    }

    #[test]
    fn test_require_api_key() {
        let mut config = Config::default();
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::MissingCredential)
        ));

        config.llm_api_key = "  secret  ".to_string();
        assert_eq!(config.require_api_key().unwrap(), "secret");
    }
}
