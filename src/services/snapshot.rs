//! # JSON 快照服务
//!
//! 单份实验报告与 JSON 文本之间的互转：
//! - **导出**：美化缩进的完整报告快照，前端触发浏览器式下载
//! - **导入**：解析用户选择的文件内容；解析失败返回用户可见错误，
//!   当前内存状态保持不变
//!
//! 快照格式就是报告模型本身的 serde 表示，导出再导入深度相等。

use crate::models::report::LabReport;

/// 把报告序列化为美化缩进的 JSON 快照
///
/// # 错误
/// 序列化失败时返回用户可见的错误信息
pub fn export_report_json(report: &LabReport) -> Result<String, String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| format!("Не вдалося серіалізувати звіт: {}", e))
}

/// 解析 JSON 快照为报告
///
/// 仅做形状校验（serde 反序列化），不做内容层面的额外校验。
///
/// # 错误
/// 内容不是合法的报告 JSON 时返回用户可见的错误信息
pub fn parse_report_json(content: &str) -> Result<LabReport, String> {
    serde_json::from_str(content)
        .map_err(|e| format!("Не вдалося розібрати файл звіту: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::defaults;
    use crate::models::report::WorkProgressItem;

    #[test]
    fn test_snapshot_round_trip_is_deep_equal() {
        let mut report = defaults::new_report("5");
        report.topic = "Кодування даних".to_string();
        report.work_progress.items.push(WorkProgressItem {
            id: "42".to_string(),
            text: "Закодувати рядок".to_string(),
            item_code: Some("huffman(s)".to_string()),
            code_caption: Some("Лістинг".to_string()),
            image_base64: Some("data:image/png;base64,AAAA".to_string()),
            image_caption: Some("Дерево".to_string()),
        });

        let json = export_report_json(&report).unwrap();
        let back = parse_report_json(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_parse_failure_is_a_user_visible_error() {
        let result = parse_report_json("{це не звіт");
        let message = result.unwrap_err();
        assert!(message.contains("Не вдалося розібрати файл звіту"));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        // 合法 JSON、但不是报告形状
        assert!(parse_report_json(r#"{"id": "1"}"#).is_err());
    }
}
