//! # 导出文件名工具
//!
//! 从实验报告的编号和主题推导人类可读的导出文件名，
//! 并过滤掉文件系统不安全的字符。
//! 对应前端 `App.tsx` 中 `handleExport` 的文件名推导逻辑。

/// 文件名为空时的兜底名称
const FALLBACK_NAME: &str = "звіт";

/// 判断字符是否允许出现在导出文件名中
///
/// 允许集合：ASCII 字母数字、西里尔字母（含乌克兰语特有的 іїєґ）、
/// 空格、短横线和下划线。其余字符一律剥离。
fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('а'..='я').contains(&c)
        || ('А'..='Я').contains(&c)
        || matches!(c, 'і' | 'ї' | 'є' | 'ґ' | 'І' | 'Ї' | 'Є' | 'Ґ' | 'ё' | 'Ё')
        || matches!(c, ' ' | '-' | '_')
}

/// 过滤字符串，仅保留文件名安全字符
///
/// # 参数
/// - `raw` - 原始字符串
///
/// # 返回值
/// 过滤并去除首尾空白后的字符串；结果为空时返回兜底名称
pub fn sanitize(raw: &str) -> String {
    let filtered: String = raw.chars().filter(|c| is_safe_char(*c)).collect();
    let trimmed = filtered.trim();
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 推导 DOCX 导出文件名（不含扩展名）
///
/// 格式：`Лаб_{labNumber}_{topic}`；主题为空时用兜底名称代替。
///
/// # 参数
/// - `lab_number` - 实验编号（自由文本）
/// - `topic` - 实验主题（可为空）
pub fn report_file_name(lab_number: &str, topic: &str) -> String {
    let topic_part = if topic.trim().is_empty() {
        FALLBACK_NAME
    } else {
        topic
    };
    sanitize(&format!("Лаб_{}_{}", lab_number, topic_part))
}

/// 推导 JSON 快照导出文件名（不含扩展名）
///
/// 格式：`Лаб_{labNumber}`。
pub fn snapshot_file_name(lab_number: &str) -> String {
    sanitize(&format!("Лаб_{}", lab_number))
}
