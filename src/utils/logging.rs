/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::ExtractionReport;

/// 记录程序启动信息
pub fn log_startup(config: &Config, document_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 文档测验生成");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🤖 模型: {}", config.llm_model_name);
    info!(
        "📊 难度: {} / 题目数: {}",
        config.difficulty, config.total_questions
    );
    info!("📁 待处理文件: {} 个", document_count);
    info!("{}", "=".repeat(60));
}

/// 记录内容提取结果
pub fn log_extraction(report: &ExtractionReport) {
    info!(
        "✓ 提取完成: {} 个文件贡献了内容，共 {} 字符",
        report.extracted_documents,
        report.content.len()
    );
    if !report.warnings.is_empty() {
        info!("⚠️ 有 {} 个文件被跳过", report.warnings.len());
    }
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号（从 1 开始）
/// - `total_batches`: 批次总数
/// - `first_number`: 本批第一道题的题号
/// - `batch_size`: 每批题目数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    first_number: usize,
    batch_size: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始生成第 {}/{} 批", batch_num, total_batches);
    info!(
        "📄 本批题号: {}-{}",
        first_number,
        first_number + batch_size - 1
    );
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, question_count: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: {} 道题", batch_num, question_count);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `title`: 测验标题
/// - `question_count`: 最终题目数
/// - `batches`: 调用模型的次数
pub fn print_final_stats(title: &str, question_count: usize, batches: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 测验生成完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📝 标题: {}", truncate_text(title, 40));
    info!("✅ 题目: {} 道（共 {} 次模型调用）", question_count, batches);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
