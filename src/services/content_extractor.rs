//! 文本提取服务 - 业务能力层
//!
//! 只负责"多个文件 → 一段带分隔标题的文本"，不关心出题

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ExtractionError, UploadError};
use crate::infrastructure::{default_decoders, DocumentDecoder};
use crate::models::document::{
    ExtractedContent, ExtractionReport, ExtractionWarning, UploadLimits, UploadedDocument,
};

/// 文本提取服务
///
/// 职责：
/// - 校验上传文件的数量和总大小
/// - 按文件类型分派给对应的解码器
/// - 单个文件失败只记录告警，不影响其他文件
pub struct ContentExtractor {
    decoders: Vec<Box<dyn DocumentDecoder>>,
    limits: UploadLimits,
}

impl ContentExtractor {
    /// 使用默认解码器创建
    pub fn new(config: &Config) -> Self {
        Self::with_decoders(default_decoders(&config.pdftotext_program), UploadLimits::default())
    }

    /// 使用自定义解码器和上限创建
    pub fn with_decoders(decoders: Vec<Box<dyn DocumentDecoder>>, limits: UploadLimits) -> Self {
        Self { decoders, limits }
    }

    /// 提取单个文件的文本
    ///
    /// 无法识别的类型返回 `ExtractionError::Unsupported`
    pub async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        let decoder = document
            .kind()
            .and_then(|kind| self.decoders.iter().find(|d| d.kind() == kind))
            .ok_or_else(|| ExtractionError::Unsupported {
                document: document.name.clone(),
            })?;

        debug!(
            "解码 {} ({}，{} 字节)",
            document.name,
            decoder.kind(),
            document.bytes.len()
        );
        decoder.decode(document).await
    }

    /// 处理一批文件，按输入顺序拼接
    ///
    /// 数量或总大小超限时整批拒绝，不做任何提取
    pub async fn process(&self, documents: &[UploadedDocument]) -> Result<ExtractionReport, UploadError> {
        self.limits.check_documents(documents)?;

        let mut content = String::new();
        let mut warnings = Vec::new();
        let mut extracted_documents = 0;

        for document in documents {
            match self.extract(document).await {
                Ok(text) if text.trim().is_empty() => {
                    warn!("⚠️ 文件 {} 没有可用文本", document.name);
                    warnings.push(ExtractionWarning {
                        document: document.name.clone(),
                        message: "没有可用的文本内容".to_string(),
                    });
                }
                Ok(text) => {
                    content.push_str(&frame(&document.name, &text));
                    extracted_documents += 1;
                    info!("✓ 已提取 {} ({} 字符)", document.name, text.chars().count());
                }
                Err(e) => {
                    warn!("⚠️ {}", e);
                    warnings.push(ExtractionWarning {
                        document: document.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(ExtractionReport {
            content: ExtractedContent::new(content),
            warnings,
            extracted_documents,
        })
    }
}

/// 为单个文件的文本加上分隔标题
fn frame(name: &str, text: &str) -> String {
    format!("\n\n--- Content from {} ---\n{}", name, text)
}
