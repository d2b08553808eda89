//! 文件解码器 - 基础设施层
//!
//! 每种文件类型一个解码器，只暴露"字节 → 文本"的能力

use std::io::{Cursor, Read};
use std::process::Stdio;

use async_trait::async_trait;
use calamine::Reader as _;
use quick_xml::events::Event;
use quick_xml::Reader;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::document::{DocumentKind, UploadedDocument};

/// 文件解码器
///
/// 职责：
/// - 把某一种类型的文件转换为纯文本
/// - 不认识 Quiz / Question
/// - 不处理多个文件
#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    /// 负责的文件类型
    fn kind(&self) -> DocumentKind;

    /// 解码为文本
    async fn decode(&self, document: &UploadedDocument) -> Result<String, ExtractionError>;
}

/// 创建全部默认解码器
pub fn default_decoders(pdftotext_program: &str) -> Vec<Box<dyn DocumentDecoder>> {
    vec![
        Box::new(TextDecoder::new(DocumentKind::PlainText)),
        Box::new(TextDecoder::new(DocumentKind::SourceCode)),
        Box::new(DelimitedDecoder),
        Box::new(WordDecoder),
        Box::new(SpreadsheetDecoder),
        Box::new(PdfDecoder::new(pdftotext_program)),
    ]
}

/// 严格按 UTF-8 解码，去掉开头的 BOM
fn decode_utf8(document: &UploadedDocument, kind: DocumentKind) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(&document.bytes)
        .map_err(|e| ExtractionError::corrupt(&document.name, kind, e))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

// ========== 纯文本 / 源代码 ==========

/// 纯文本解码器（纯文本与源代码共用）
pub struct TextDecoder {
    kind: DocumentKind,
}

impl TextDecoder {
    pub fn new(kind: DocumentKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl DocumentDecoder for TextDecoder {
    fn kind(&self) -> DocumentKind {
        self.kind
    }

    async fn decode(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        decode_utf8(document, self.kind)
    }
}

// ========== CSV / TSV ==========

/// 分隔符文本解码器：统一换行符并去掉空行，行内容保持原样
pub struct DelimitedDecoder;

#[async_trait]
impl DocumentDecoder for DelimitedDecoder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Delimited
    }

    async fn decode(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        let text = decode_utf8(document, DocumentKind::Delimited)?;
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .collect();
        Ok(rows.join("\n"))
    }
}

// ========== Word (docx) ==========

/// Word 文档解码器：读取 word/document.xml 中的正文
pub struct WordDecoder;

impl WordDecoder {
    fn body_text(bytes: &[u8]) -> Result<String, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| e.to_string())?
            .read_to_string(&mut xml)
            .map_err(|e| e.to_string())?;

        let mut reader = Reader::from_str(&xml);
        let mut text = String::new();
        let mut in_text_run = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"t" => in_text_run = false,
                    b"p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"tab" => text.push('\t'),
                    b"br" | b"cr" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Text(t)) if in_text_run => {
                    text.push_str(&t.unescape().map_err(|e| e.to_string())?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.to_string()),
                _ => {}
            }
        }

        Ok(text.trim_end().to_string())
    }
}

#[async_trait]
impl DocumentDecoder for WordDecoder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::WordDocument
    }

    async fn decode(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        Self::body_text(&document.bytes)
            .map_err(|reason| ExtractionError::corrupt(&document.name, DocumentKind::WordDocument, reason))
    }
}

// ========== 电子表格 ==========

/// 电子表格解码器：逐个工作表输出，单元格之间用 " | " 分隔
pub struct SpreadsheetDecoder;

impl SpreadsheetDecoder {
    fn sheets_text(bytes: Vec<u8>) -> Result<String, calamine::Error> {
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let mut out = String::new();

        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;
            out.push_str(&format!("Sheet: {}\n", sheet_name));
            for row in range.rows() {
                let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
                if cells.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                out.push_str(&cells.join(" | "));
                out.push('\n');
            }
            out.push('\n');
        }

        Ok(out.trim_end().to_string())
    }
}

#[async_trait]
impl DocumentDecoder for SpreadsheetDecoder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Spreadsheet
    }

    async fn decode(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        Self::sheets_text(document.bytes.clone())
            .map_err(|e| ExtractionError::corrupt(&document.name, DocumentKind::Spreadsheet, e))
    }
}

// ========== PDF ==========

/// PDF 解码器：通过 pdftotext 从标准输入读取、向标准输出写文本
pub struct PdfDecoder {
    program: String,
}

impl PdfDecoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn tool_failed(&self, document: &UploadedDocument, reason: impl std::fmt::Display) -> ExtractionError {
        ExtractionError::ToolFailed {
            program: self.program.clone(),
            document: document.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl DocumentDecoder for PdfDecoder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    async fn decode(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        debug!("调用 {} 解析 PDF: {}", self.program, document.name);

        let mut child = Command::new(&self.program)
            .args(["-q", "-enc", "UTF-8", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.tool_failed(document, e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.tool_failed(document, "无法打开标准输入"))?;

        // 写入与读取同时进行，避免管道写满后互相等待
        let bytes = document.bytes.clone();
        let writer = tokio::spawn(async move {
            stdin.write_all(&bytes).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.tool_failed(document, e))?;
        // 工具提前退出时写入会遇到断开的管道，以退出码为准
        let _ = writer.await;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::corrupt(
                &document.name,
                DocumentKind::Pdf,
                stderr.trim(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}
