//! # AI 草稿助手服务
//!
//! 为单个章节组装自然语言提示词、调用 Gemini 生成文本、
//! 拆分变体并把选中的变体映射回章节载荷。
//! 提示词文案与拆分/应用语义从前端 `utils/aiPrompts.ts` 和
//! `App.tsx` 的 `handleApplyToBlock` 平移而来。
//!
//! ## 提示词组装顺序
//! 1. 固定风格指令（官方学术乌克兰语、ДСТУ 标准）
//! 2. 章节专属指令（期望的内容与篇幅）
//! 3. 实验编号与主题
//! 4. 可选的方法指导文本
//! 5. 可选的用户自定义规则（全局设置）
//! 6. 可选的风格示例（同空间内已完成的旧报告的同名章节）
//! 7. 固定的"恰好 3 个变体"指令与分隔符约定
//!
//! ## 网络调用
//! 每次生成一条独立的无状态 REST 请求；服务端错误信息原样透传给用户，
//! 文档状态不变。

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::models::report::{BlockType, LabReport, WorkProgressData, WorkProgressItem};
use crate::utils::id;

/// 调用的 Gemini 模型标识
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini generateContent REST 端点前缀
const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// 变体之间的固定分隔符（提示词要求模型原样输出）
pub const VARIANT_DELIMITER: &str = "===VARIANT===";

/// 「填充全部章节」的固定生成顺序
pub const FILL_ORDER: [BlockType; 3] =
    [BlockType::Abstract, BlockType::WorkProgress, BlockType::Conclusion];

/// 章节专属的生成指令（乌克兰语，嵌入提示词）
///
/// # 错误
/// 标题页没有可生成的文本，返回错误
fn block_description(block: BlockType) -> Result<&'static str, String> {
    match block {
        BlockType::Abstract => {
            Ok("мету роботи — короткий опис цілей лабораторної роботи (2–4 речення)")
        }
        BlockType::WorkProgress => Ok(
            "хід роботи — пронумерований список кроків виконання лабораторної роботи (5–8 пунктів)",
        ),
        BlockType::Conclusion => {
            Ok("висновок — підсумок результатів лабораторної роботи (2–4 речення)")
        }
        BlockType::Appendix => Ok("вміст додатку (код програми або інший матеріал)"),
        BlockType::TitlePage => {
            Err("Для титульної сторінки генерація тексту недоступна".to_string())
        }
    }
}

/// 提取报告中某章节的纯文本表示
///
/// 用于两处：把旧报告作为风格示例嵌入提示词，以及聊天面板的上下文展示。
/// 工作进度渲染为 "1. ..." 的编号行。
pub fn extract_section_text(report: &LabReport, block: BlockType) -> String {
    match block {
        BlockType::Abstract => report.abstract_.content.clone(),
        BlockType::Conclusion => report.conclusion.content.clone(),
        BlockType::WorkProgress => report
            .work_progress
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item.text))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockType::Appendix => report.appendix.code.clone(),
        BlockType::TitlePage => String::new(),
    }
}

/// 从同一空间挑选风格示例报告
///
/// 仅取已标记完成的报告，排除当前报告本身；调用方在
/// `useOldReportsAsExamples` 关闭时直接传空列表。
pub fn example_reports<'a>(reports: &'a [LabReport], current_id: &str) -> Vec<&'a LabReport> {
    reports
        .iter()
        .filter(|r| r.is_done && r.id != current_id)
        .collect()
}

/// 组装一次生成请求的完整提示词
///
/// # 参数
/// - `block` - 目标章节
/// - `report` - 当前报告（编号、主题、方法指导文本的来源）
/// - `examples` - 风格示例报告（可为空）
/// - `custom_prompt` - 全局设置里的用户自定义规则（可为空）
///
/// # 错误
/// 目标章节不支持生成（标题页）时返回错误
pub fn build_prompt(
    block: BlockType,
    report: &LabReport,
    examples: &[&LabReport],
    custom_prompt: &str,
) -> Result<String, String> {
    let desc = block_description(block)?;

    let topic_part = if report.topic.is_empty() {
        String::new()
    } else {
        format!(" на тему \"{}\"", report.topic)
    };

    let mut parts: Vec<String> = vec![
        "Ти асистент для написання академічних звітів. Стиль: офіційний, науковий, \
         українська мова. Дотримуйся стандартів ДСТУ."
            .to_string(),
        format!(
            "Напиши {} для лабораторної роботи №{}{}.",
            desc, report.lab_number, topic_part
        ),
    ];

    if let Some(methodical) = report.methodical_text.as_deref() {
        if !methodical.trim().is_empty() {
            parts.push(format!("\nМетодичні вказівки:\n{}", methodical.trim()));
        }
    }

    if !custom_prompt.trim().is_empty() {
        parts.push(format!("\nДодаткові правила:\n{}", custom_prompt.trim()));
    }

    // 示例只嵌入同名章节非空的报告
    let example_texts: Vec<String> = examples
        .iter()
        .filter_map(|example| {
            let section_text = extract_section_text(example, block);
            if section_text.trim().is_empty() {
                return None;
            }
            let topic = if example.topic.is_empty() {
                String::new()
            } else {
                format!(" ({})", example.topic)
            };
            Some(format!(
                "Лабораторна №{}{}:\n{}",
                example.lab_number,
                topic,
                section_text.trim()
            ))
        })
        .collect();
    if !example_texts.is_empty() {
        parts.push(format!(
            "\nПриклади з попередніх виконаних звітів (орієнтуйся на стиль та структуру):\n{}",
            example_texts.join("\n\n")
        ));
    }

    parts.push(format!(
        "\nСтвори РІВНО 3 різних варіанти. Розділяй їх рядком \"{}\". \
         Пиши тільки текст розділу без зайвих пояснень та заголовків.",
        VARIANT_DELIMITER
    ));

    Ok(parts.join("\n"))
}

/// 把模型的原始响应拆分为变体列表
///
/// 按固定分隔符拆分、去除首尾空白、丢弃空段；
/// 拆出的段落少于 2 个时退化为"整个响应即唯一变体"，而不是报错。
pub fn split_variants(raw: &str) -> Vec<String> {
    let parts: Vec<String> = raw
        .split(VARIANT_DELIMITER)
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() >= 2 {
        parts
    } else {
        vec![raw.trim().to_string()]
    }
}

/// 剥离行首的编号前缀（如 "1. "）
///
/// 模型生成的工作进度通常自带编号，导出时会重新编号，
/// 因此入库前剥掉，避免出现 "1. 1. текст"。
fn strip_enumeration_prefix(line: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = PREFIX.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("valid regex"));
    re.replace(line, "").to_string()
}

/// 把选中的变体文本应用到目标章节，返回替换后的报告
///
/// 映射规则逐章节不同：
/// - 目的/结论：文本原样进入单一 content 字段
/// - 附录：文本进入 code，标题保留
/// - 工作进度：按换行拆分、丢弃空行、剥离编号前缀，每行一个全新条目；
///   旧条目的附件一并丢弃
///
/// # 错误
/// 目标章节不支持生成（标题页）时返回错误
pub fn apply_variant(
    report: &LabReport,
    block: BlockType,
    text: &str,
) -> Result<LabReport, String> {
    let mut updated = report.clone();
    match block {
        BlockType::Abstract => {
            updated.abstract_.content = text.to_string();
        }
        BlockType::Conclusion => {
            updated.conclusion.content = text.to_string();
        }
        BlockType::Appendix => {
            updated.appendix.code = text.to_string();
        }
        BlockType::WorkProgress => {
            let items: Vec<WorkProgressItem> = text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| WorkProgressItem {
                    id: id::next_id(),
                    text: strip_enumeration_prefix(line.trim()),
                    ..WorkProgressItem::default()
                })
                .collect();
            updated.work_progress = WorkProgressData { items };
        }
        BlockType::TitlePage => {
            return Err("Для титульної сторінки генерація тексту недоступна".to_string());
        }
    }
    Ok(updated)
}

/// 调用 Gemini generateContent 接口生成文本
///
/// 每次调用都是独立的无状态请求，不维护会话历史。
///
/// # 参数
/// - `api_key` - 调用方提供的 Gemini API 密钥（非空，由 command 层先校验）
/// - `prompt` - 组装完成的提示词
///
/// # 返回值
/// 返回模型响应中全部文本分片拼接后的字符串
///
/// # 错误
/// - 网络失败：带上下文的连接错误信息
/// - 服务端错误：`error.message` 原样透传
/// - 响应缺少文本内容
pub async fn generate_text(api_key: &str, prompt: &str) -> Result<String, String> {
    let url = format!(
        "{}/{}:generateContent?key={}",
        GEMINI_ENDPOINT, GEMINI_MODEL, api_key
    );
    let body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("Помилка з'єднання з Gemini API: {}", e))?;

    let status = response.status();
    let payload: Value = response
        .json()
        .await
        .map_err(|e| format!("Не вдалося розібрати відповідь Gemini API: {}", e))?;

    // 服务端错误：把 error.message 原样交给用户
    if !status.is_success() {
        let message = payload
            .get("error")
            .and_then(|err| err.get("message"))
            .and_then(|msg| msg.as_str())
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| format!("Gemini API повернув статус {}", status));
        return Err(message);
    }

    // 拼接首个候选的全部文本分片
    let text = payload
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err("Gemini повернув порожню відповідь".to_string());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::defaults;

    fn report_with_topic() -> LabReport {
        let mut report = defaults::new_report("3");
        report.topic = "Сортування".to_string();
        report
    }

    #[test]
    fn test_split_two_segments_gives_two_variants() {
        let raw = format!("Перший варіант.\n{}\nДругий варіант.", VARIANT_DELIMITER);
        let variants = split_variants(&raw);
        assert_eq!(variants, vec!["Перший варіант.", "Другий варіант."]);
    }

    #[test]
    fn test_split_without_delimiter_gives_single_trimmed_variant() {
        let variants = split_variants("  Єдиний варіант.  \n");
        assert_eq!(variants, vec!["Єдиний варіант."]);
    }

    #[test]
    fn test_split_with_empty_tail_segment() {
        // 模型有时在结尾再输出一次分隔符
        let raw = format!("Один.\n{}\nДва.\n{}\n", VARIANT_DELIMITER, VARIANT_DELIMITER);
        assert_eq!(split_variants(&raw).len(), 2);
    }

    #[test]
    fn test_apply_abstract_takes_text_verbatim() {
        let report = report_with_topic();
        let updated =
            apply_variant(&report, BlockType::Abstract, "Дослідити алгоритми сортування.").unwrap();
        assert_eq!(updated.abstract_.content, "Дослідити алгоритми сортування.");
    }

    #[test]
    fn test_apply_work_progress_splits_lines_and_strips_numbering() {
        let mut report = report_with_topic();
        // 旧条目带附件：应用变体后必须全部丢弃
        report.work_progress.items[0].item_code = Some("print(1)".to_string());
        report.work_progress.items[0].image_base64 = Some("data:image/png;base64,AA".to_string());

        let text = "1. Реалізувати бульбашкове сортування\n\n2. Порівняти з швидким сортуванням\nБез номера";
        let updated = apply_variant(&report, BlockType::WorkProgress, text).unwrap();

        let texts: Vec<&str> = updated.work_progress.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Реалізувати бульбашкове сортування",
                "Порівняти з швидким сортуванням",
                "Без номера"
            ]
        );
        assert!(updated.work_progress.items.iter().all(|i| i.item_code.is_none()));
        assert!(updated.work_progress.items.iter().all(|i| i.image_base64.is_none()));
    }

    #[test]
    fn test_apply_appendix_preserves_title() {
        let report = report_with_topic();
        let updated = apply_variant(&report, BlockType::Appendix, "print('ok')").unwrap();
        assert_eq!(updated.appendix.code, "print('ok')");
        assert_eq!(updated.appendix.title, report.appendix.title);
    }

    #[test]
    fn test_build_prompt_includes_report_context() {
        let mut report = report_with_topic();
        report.methodical_text = Some("Використати Python".to_string());
        let prompt = build_prompt(BlockType::Abstract, &report, &[], "уникай слова 'даний'").unwrap();

        assert!(prompt.contains("лабораторної роботи №3"));
        assert!(prompt.contains("на тему \"Сортування\""));
        assert!(prompt.contains("Методичні вказівки:\nВикористати Python"));
        assert!(prompt.contains("Додаткові правила:\nуникай слова 'даний'"));
        assert!(prompt.contains(VARIANT_DELIMITER));
    }

    #[test]
    fn test_build_prompt_examples_only_done_and_non_empty() {
        let mut current = report_with_topic();
        current.id = "current".to_string();

        let mut done = defaults::new_report("1");
        done.is_done = true;
        done.abstract_.content = "Зразкова мета.".to_string();

        let mut not_done = defaults::new_report("2");
        not_done.abstract_.content = "Не завершено.".to_string();

        let mut done_empty = defaults::new_report("4");
        done_empty.is_done = true;

        let reports = vec![done.clone(), not_done, done_empty, current.clone()];
        let examples = example_reports(&reports, &current.id);
        assert_eq!(examples.len(), 2);

        let prompt = build_prompt(BlockType::Abstract, &current, &examples, "").unwrap();
        assert!(prompt.contains("Зразкова мета."));
        assert!(!prompt.contains("Не завершено."));
        // 同名章节为空的已完成报告不出现在示例里
        assert_eq!(prompt.matches("Лабораторна №").count(), 1);
    }

    #[test]
    fn test_title_page_is_not_generatable() {
        let report = report_with_topic();
        assert!(build_prompt(BlockType::TitlePage, &report, &[], "").is_err());
        assert!(apply_variant(&report, BlockType::TitlePage, "текст").is_err());
    }
}
