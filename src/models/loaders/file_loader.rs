use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::document::{ExtractionWarning, UploadLimits, UploadedDocument};

/// 从磁盘读取单个文件为 UploadedDocument
pub async fn load_document(path: &Path) -> AppResult<UploadedDocument> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(UploadedDocument::new(name, bytes))
}

/// 一组文件的读取结果
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    /// 成功读入的文件，保持输入顺序
    pub documents: Vec<UploadedDocument>,
    /// 每个无法读取的文件一条告警
    pub warnings: Vec<ExtractionWarning>,
}

/// 读取一组文件
///
/// 先根据文件数量和磁盘上的总大小做校验，超限时一个文件都不读取；
/// 单个文件读取失败只记录告警，其余文件继续读取
pub async fn load_documents(paths: &[PathBuf], limits: &UploadLimits) -> AppResult<LoadedDocuments> {
    // 数量超限时连元数据都不读取
    limits.check(paths.len(), 0)?;

    let mut total_bytes = 0u64;
    for path in paths {
        // 读不到元数据的文件稍后会在读取时记录告警
        if let Ok(metadata) = fs::metadata(path).await {
            if metadata.is_file() {
                total_bytes += metadata.len();
            }
        }
    }
    limits.check(paths.len(), total_bytes)?;

    let mut loaded = LoadedDocuments::default();
    for path in paths {
        info!("正在加载: {}", display_name(path));
        match load_document(path).await {
            Ok(document) => loaded.documents.push(document),
            Err(e) => {
                warn!("⚠️ {}", e);
                loaded.warnings.push(ExtractionWarning {
                    document: display_name(path),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(loaded)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "doc_quiz_loader_{}_{}",
            label,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_documents_reads_in_order() {
        let dir = temp_dir("order");
        let first = dir.join("a.txt");
        let second = dir.join("b.md");
        std::fs::write(&first, "alpha").unwrap();
        std::fs::write(&second, "beta").unwrap();

        let docs = load_documents(&[first, second], &UploadLimits::default())
            .await
            .unwrap()
            .documents;

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "a.txt");
        assert_eq!(docs[0].bytes, b"alpha");
        assert_eq!(docs[1].name, "b.md");

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_load_documents_rejects_oversize_before_reading() {
        let dir = temp_dir("oversize");
        let path = dir.join("big.txt");
        std::fs::write(&path, vec![b'x'; 64]).unwrap();

        let limits = UploadLimits {
            max_documents: 10,
            max_total_bytes: 32,
        };
        let err = load_documents(&[path], &limits).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Upload(UploadError::PayloadTooLarge { total_bytes: 64, .. })
        ));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_warning() {
        let dir = temp_dir("unreadable");
        let folder = dir.join("sub.txt");
        let good = dir.join("good.txt");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(&good, "still here").unwrap();
        let missing = dir.join("missing.txt");

        let loaded = load_documents(&[folder, good, missing], &UploadLimits::default())
            .await
            .unwrap();

        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].name, "good.txt");
        assert_eq!(loaded.documents[0].bytes, b"still here");
        let skipped: Vec<&str> = loaded.warnings.iter().map(|w| w.document.as_str()).collect();
        assert_eq!(skipped, vec!["sub.txt", "missing.txt"]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_load_document_missing_file() {
        let err = load_document(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File { .. }));
    }
}
