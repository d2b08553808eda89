use std::fmt;
use std::path::Path;

use phf::phf_map;

use crate::config::{MAX_UPLOAD_BYTES, MAX_UPLOAD_DOCUMENTS};
use crate::error::UploadError;

/// 上传的原始文件
///
/// 只在一次生成请求内存在，提取完文本后即可丢弃
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// 文件名（含扩展名）
    pub name: String,
    /// 上传方声明的媒体类型
    pub media_type: Option<String>,
    /// 原始字节
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            bytes: bytes.into(),
        }
    }

    /// 附加声明的媒体类型
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// 原始字节数
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// 识别文件类型，无法识别时返回 None
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::detect(&self.name, self.media_type.as_deref())
    }
}

/// 支持的文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// 纯文本（txt / md）
    PlainText,
    /// 源代码文本
    SourceCode,
    /// Word 文档（docx）
    WordDocument,
    /// PDF
    Pdf,
    /// 分隔符文本（csv / tsv）
    Delimited,
    /// 电子表格（xlsx / xls / ods）
    Spreadsheet,
}

static MEDIA_TYPE_KINDS: phf::Map<&'static str, DocumentKind> = phf_map! {
    "text/plain" => DocumentKind::PlainText,
    "text/markdown" => DocumentKind::PlainText,
    "text/x-python" => DocumentKind::SourceCode,
    "text/x-c" => DocumentKind::SourceCode,
    "text/x-c++src" => DocumentKind::SourceCode,
    "text/x-java-source" => DocumentKind::SourceCode,
    "text/x-rust" => DocumentKind::SourceCode,
    "text/javascript" => DocumentKind::SourceCode,
    "application/javascript" => DocumentKind::SourceCode,
    "application/json" => DocumentKind::SourceCode,
    "application/xml" => DocumentKind::SourceCode,
    "text/html" => DocumentKind::SourceCode,
    "text/css" => DocumentKind::SourceCode,
    "application/pdf" => DocumentKind::Pdf,
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => DocumentKind::WordDocument,
    "text/csv" => DocumentKind::Delimited,
    "text/tab-separated-values" => DocumentKind::Delimited,
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => DocumentKind::Spreadsheet,
    "application/vnd.ms-excel" => DocumentKind::Spreadsheet,
    "application/vnd.ms-excel.sheet.macroenabled.12" => DocumentKind::Spreadsheet,
    "application/vnd.oasis.opendocument.spreadsheet" => DocumentKind::Spreadsheet,
};

static EXTENSION_KINDS: phf::Map<&'static str, DocumentKind> = phf_map! {
    "txt" => DocumentKind::PlainText,
    "md" => DocumentKind::PlainText,
    "markdown" => DocumentKind::PlainText,
    "rst" => DocumentKind::PlainText,
    "log" => DocumentKind::PlainText,
    "py" => DocumentKind::SourceCode,
    "js" => DocumentKind::SourceCode,
    "ts" => DocumentKind::SourceCode,
    "java" => DocumentKind::SourceCode,
    "c" => DocumentKind::SourceCode,
    "h" => DocumentKind::SourceCode,
    "cpp" => DocumentKind::SourceCode,
    "hpp" => DocumentKind::SourceCode,
    "cs" => DocumentKind::SourceCode,
    "go" => DocumentKind::SourceCode,
    "rs" => DocumentKind::SourceCode,
    "rb" => DocumentKind::SourceCode,
    "php" => DocumentKind::SourceCode,
    "sql" => DocumentKind::SourceCode,
    "sh" => DocumentKind::SourceCode,
    "html" => DocumentKind::SourceCode,
    "css" => DocumentKind::SourceCode,
    "json" => DocumentKind::SourceCode,
    "xml" => DocumentKind::SourceCode,
    "yaml" => DocumentKind::SourceCode,
    "yml" => DocumentKind::SourceCode,
    "docx" => DocumentKind::WordDocument,
    "pdf" => DocumentKind::Pdf,
    "csv" => DocumentKind::Delimited,
    "tsv" => DocumentKind::Delimited,
    "xlsx" => DocumentKind::Spreadsheet,
    "xlsm" => DocumentKind::Spreadsheet,
    "xls" => DocumentKind::Spreadsheet,
    "ods" => DocumentKind::Spreadsheet,
};

impl DocumentKind {
    /// 识别文件类型：优先使用声明的媒体类型，其次使用扩展名
    pub fn detect(name: &str, media_type: Option<&str>) -> Option<Self> {
        if let Some(kind) = media_type.and_then(Self::from_media_type) {
            return Some(kind);
        }

        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();
        EXTENSION_KINDS.get(extension.as_str()).copied()
    }

    /// 从媒体类型识别（忽略 charset 等参数）
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        MEDIA_TYPE_KINDS.get(essence.as_str()).copied()
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::PlainText => "plain text",
            DocumentKind::SourceCode => "source code",
            DocumentKind::WordDocument => "Word",
            DocumentKind::Pdf => "PDF",
            DocumentKind::Delimited => "delimited text",
            DocumentKind::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 上传数量与大小上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_documents: usize,
    pub max_total_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_documents: MAX_UPLOAD_DOCUMENTS,
            max_total_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadLimits {
    /// 校验文件数量和总大小，任何一项超限都拒绝整批
    pub fn check(&self, count: usize, total_bytes: u64) -> Result<(), UploadError> {
        if count == 0 {
            return Err(UploadError::NoDocuments);
        }
        if count > self.max_documents {
            return Err(UploadError::TooManyDocuments {
                count,
                max: self.max_documents,
            });
        }
        if total_bytes > self.max_total_bytes {
            return Err(UploadError::PayloadTooLarge {
                total_bytes,
                max_bytes: self.max_total_bytes,
            });
        }
        Ok(())
    }

    /// 校验一组已读入内存的文件
    pub fn check_documents(&self, documents: &[UploadedDocument]) -> Result<(), UploadError> {
        let total_bytes = documents.iter().map(UploadedDocument::size).sum();
        self.check(documents.len(), total_bytes)
    }
}

/// 所有文件拼接后的文本，构建后不再修改
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent(String);

impl ExtractedContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 去掉空白后是否没有任何内容
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExtractedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 单个文件的提取告警
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionWarning {
    /// 文件名
    pub document: String,
    /// 可读的告警信息
    pub message: String,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.document, self.message)
    }
}

/// 一批文件的提取结果
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// 拼接后的文本
    pub content: ExtractedContent,
    /// 每个出问题的文件一条告警
    pub warnings: Vec<ExtractionWarning>,
    /// 成功贡献文本的文件数
    pub extracted_documents: usize,
}
