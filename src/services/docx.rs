//! # DOCX 导出服务
//!
//! 把（全局设置、课程空间、实验报告）确定性地序列化为符合 ДСТУ 学术版式的
//! Word 文档字节流。无副作用：同样的输入（含导出年份）产出同样的段落序列。
//! 版式常量与标题页布局从前端 `utils/docxExport.ts` 平移而来。
//!
//! ## 版式契约（必须精确匹配）
//! - 正文 Times New Roman 14 pt、1.5 倍行距、首行缩进 1.25 см
//! - 代码 Courier New 12 pt、单倍行距、无缩进
//! - 页边距：左 30 мм、右 15 мм、上 25 мм、下 25 мм
//!
//! ## 章节发射条件
//! 仅当章节已启用且内容非空时发射；目的与结论渲染为带行内粗体前缀的
//! 单个两端对齐段落，而不是独立标题。

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Datelike;
use docx_rs::{
    AlignmentType, Docx, LineSpacing, LineSpacingType, PageMargin, Paragraph, Pic, Run, RunFonts,
    SpecialIndentType,
};

use crate::models::report::{BlockType, LabReport, Space, WorkProgressData};
use crate::models::settings::GlobalSettings;

// ─── 字体 ───
/// 正文字体（ДСТУ）
const FONT: &str = "Times New Roman";
/// 正文字号：14 pt（半点单位）
const FONT_SIZE: usize = 28;
/// 代码块字体
const CODE_FONT: &str = "Courier New";
/// 代码块字号：12 pt（半点单位）
const CODE_SIZE: usize = 24;

// ─── 间距 ───
/// 1.5 倍行距（240 = 单倍）
const LINE_150: u32 = 360;
/// 代码块单倍行距
const LINE_100: u32 = 240;
/// 首行缩进：1.25 см（twip 单位）
const FIRST_LINE_INDENT: i32 = 709;
/// 标题段前间距（twip）
const HEADING_BEFORE: u32 = 240;
/// 标题段后间距（twip）
const HEADING_AFTER: u32 = 120;

// ─── 页边距（ДСТУ，twip 单位）───
/// 左 30 мм
const MARGIN_LEFT: i32 = 1701;
/// 右 15 мм
const MARGIN_RIGHT: i32 = 850;
/// 上 25 мм
const MARGIN_TOP: i32 = 1417;
/// 下 25 мм
const MARGIN_BOTTOM: i32 = 1417;

// ─── 内嵌图片 ───
/// 图片最大显示宽度（px）
const IMAGE_MAX_WIDTH_PX: u32 = 530;
/// 图片最大显示高度（px）
const IMAGE_MAX_HEIGHT_PX: u32 = 400;
/// EMU 换算系数：1 px（96 dpi）= 9525 EMU
const EMU_PER_PX: u32 = 9525;

/// 构建正文字体的文本 Run
fn body_run(text: &str) -> Run {
    Run::new()
        .add_text(text)
        .fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT).cs(FONT))
        .size(FONT_SIZE)
}

/// 1.5 倍行距、无段前后间距
fn spacing_150() -> LineSpacing {
    LineSpacing::new()
        .before(0)
        .after(0)
        .line_rule(LineSpacingType::Auto)
        .line(LINE_150 as i32)
}

/// 居中标题段落（粗体、段前后留白）
fn make_heading(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(body_run(text).bold())
        .align(AlignmentType::Center)
        .line_spacing(
            LineSpacing::new()
                .before(HEADING_BEFORE)
                .after(HEADING_AFTER)
                .line_rule(LineSpacingType::Auto)
                .line(LINE_150 as i32),
        )
}

/// 两端对齐的正文段落
///
/// # 参数
/// - `indent` - 是否带首行缩进（编号列表行不缩进）
fn make_body(text: &str, indent: bool) -> Paragraph {
    let paragraph = Paragraph::new()
        .add_run(body_run(text))
        .align(AlignmentType::Both)
        .line_spacing(spacing_150());
    if indent {
        paragraph.indent(None, Some(SpecialIndentType::FirstLine(FIRST_LINE_INDENT)), None, None)
    } else {
        paragraph
    }
}

/// 带行内粗体前缀的正文段落（"Мета роботи: ..." / "Висновок: ..."）
fn make_labeled_body(label: &str, text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(body_run(label).bold())
        .add_run(body_run(text))
        .align(AlignmentType::Both)
        .line_spacing(spacing_150())
        .indent(None, Some(SpecialIndentType::FirstLine(FIRST_LINE_INDENT)), None, None)
}

/// 居中段落
fn make_centered(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(body_run(text))
        .align(AlignmentType::Center)
        .line_spacing(spacing_150())
}

/// 右对齐段落（标题页"Виконав:"/"Перевірив:"栏）
fn make_right(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(body_run(text))
        .align(AlignmentType::Right)
        .line_spacing(spacing_150())
}

/// 等宽代码段落：单倍行距、无缩进、左对齐
fn make_monospace(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(
            Run::new()
                .add_text(text)
                .fonts(RunFonts::new().ascii(CODE_FONT).hi_ansi(CODE_FONT).cs(CODE_FONT))
                .size(CODE_SIZE),
        )
        .align(AlignmentType::Left)
        .line_spacing(
            LineSpacing::new()
                .before(0)
                .after(0)
                .line_rule(LineSpacingType::Auto)
                .line(LINE_100 as i32),
        )
}

/// 空白段落（标题页竖向排布）
fn make_empty() -> Paragraph {
    Paragraph::new().add_run(body_run("")).line_spacing(spacing_150())
}

/// 把 data URL 图片转换为居中的图片段落
///
/// 解码失败（data URL 畸形、base64 损坏、非图片内容）时返回 `None`，
/// 调用方静默跳过该图片——导出不应因单张坏图而失败。
/// 显示尺寸按比例收缩到 530×400 px 的上限内，不放大小图。
fn make_image_paragraph(data_url: &str) -> Option<Paragraph> {
    let (_, payload) = data_url.split_once(',')?;
    let bytes = BASE64.decode(payload.trim()).ok()?;

    // 预先解码确认是合法图片并取得像素尺寸
    let decoded = image::load_from_memory(&bytes).ok()?;
    let (width_px, height_px) = (decoded.width(), decoded.height());
    if width_px == 0 || height_px == 0 {
        return None;
    }

    let scale = f64::min(
        1.0,
        f64::min(
            IMAGE_MAX_WIDTH_PX as f64 / width_px as f64,
            IMAGE_MAX_HEIGHT_PX as f64 / height_px as f64,
        ),
    );
    let width_emu = (width_px as f64 * scale) as u32 * EMU_PER_PX;
    let height_emu = (height_px as f64 * scale) as u32 * EMU_PER_PX;

    let pic = Pic::new(&bytes).size(width_emu, height_emu);
    Some(
        Paragraph::new()
            .add_run(Run::new().add_image(pic))
            .align(AlignmentType::Center)
            .line_spacing(LineSpacing::new().before(120).after(120)),
    )
}

/// 标题页段落序列
///
/// 布局顺序固定：两行固定机构抬头、院系、竖向留白、居中的
/// "ЛАБОРАТОРНА РОБОТА № {n}"、可选课程行、可选主题行、留白、
/// 右对齐的"Виконав:"与"Перевірив:"栏、留白、居中的"Львів {рік}"。
fn title_page_paragraphs(
    settings: &GlobalSettings,
    space: &Space,
    report: &LabReport,
    year: i32,
) -> Vec<Paragraph> {
    let mut paragraphs = vec![
        make_centered("Міністерство освіти і науки України"),
        make_centered("Львівський національний університет імені Івана Франка"),
        make_centered(&settings.faculty),
    ];
    paragraphs.extend((0..7).map(|_| make_empty()));

    paragraphs.push(make_centered(&format!(
        "ЛАБОРАТОРНА РОБОТА № {}",
        report.lab_number
    )));
    if !space.course_name.is_empty() {
        paragraphs.push(make_centered(&format!("з курсу \"{}\"", space.course_name)));
    }
    if !report.topic.is_empty() {
        paragraphs.push(make_centered(&format!("\"{}\"", report.topic)));
    }
    paragraphs.extend((0..7).map(|_| make_empty()));

    paragraphs.push(make_right("Виконав:"));
    paragraphs.push(make_right(&format!("Ст. {}", settings.student_group)));
    paragraphs.push(make_right(&settings.student_name));
    paragraphs.push(make_right("Перевірив:"));
    paragraphs.push(make_right(&format!(
        "{} {}",
        space.teacher_title, space.teacher_name
    )));
    paragraphs.push(make_empty());
    paragraphs.push(make_empty());
    paragraphs.push(make_centered(&format!("Львів {}", year)));

    paragraphs
}

/// 工作进度是否有可导出的内容
///
/// 至少一个条目有非空文本或任一附件才算非空。
fn has_progress_content(data: &WorkProgressData) -> bool {
    data.items.iter().any(|item| {
        !item.text.trim().is_empty()
            || item.item_code.as_deref().is_some_and(|c| !c.trim().is_empty())
            || item.image_base64.is_some()
    })
}

/// 整份报告的段落序列（标题页 + 按条件发射的各章节）
///
/// 纯函数：不做 IO、不取当前时间（年份由调用方注入），
/// 便于对发射顺序与条件做单元测试。
fn report_paragraphs(
    settings: &GlobalSettings,
    space: &Space,
    report: &LabReport,
    year: i32,
) -> Vec<Paragraph> {
    let mut children = title_page_paragraphs(settings, space, report, year);

    // ── Мета роботи ──
    if report.is_enabled(BlockType::Abstract) && !report.abstract_.content.trim().is_empty() {
        children.push(make_empty());
        children.push(make_labeled_body("Мета роботи: ", &report.abstract_.content));
        children.push(make_empty());
    }

    // ── Хід роботи ──
    // 每个条目一段 "{n}. {текст}"；空文本条目跳过但编号保留原位；
    // 附件紧跟在所属条目之下，不集中到章节末尾
    if report.is_enabled(BlockType::WorkProgress) && has_progress_content(&report.work_progress) {
        children.push(make_heading("Хід роботи"));
        for (i, item) in report.work_progress.items.iter().enumerate() {
            if !item.text.trim().is_empty() {
                children.push(make_body(&format!("{}. {}", i + 1, item.text), false));
            }
            if let Some(code) = item.item_code.as_deref() {
                if !code.trim().is_empty() {
                    if let Some(caption) = item.code_caption.as_deref() {
                        if !caption.trim().is_empty() {
                            children.push(make_body(caption, true));
                        }
                    }
                    for line in code.lines() {
                        children.push(make_monospace(line));
                    }
                }
            }
            if let Some(data_url) = item.image_base64.as_deref() {
                if let Some(image_paragraph) = make_image_paragraph(data_url) {
                    children.push(image_paragraph);
                    if let Some(caption) = item.image_caption.as_deref() {
                        if !caption.trim().is_empty() {
                            children.push(make_centered(caption));
                        }
                    }
                }
            }
        }
        children.push(make_empty());
    }

    // ── Висновок ──
    // 与"Мета роботи:"相同的行内前缀排版，不用独立居中标题
    if report.is_enabled(BlockType::Conclusion) && !report.conclusion.content.trim().is_empty() {
        children.push(make_empty());
        children.push(make_labeled_body("Висновок: ", &report.conclusion.content));
        children.push(make_empty());
    }

    // ── Додаток ──
    if report.is_enabled(BlockType::Appendix) && !report.appendix.code.trim().is_empty() {
        children.push(make_heading("Додаток"));
        if !report.appendix.title.trim().is_empty() {
            children.push(make_body(&format!("{}:", report.appendix.title), true));
        }
        for line in report.appendix.code.lines() {
            children.push(make_monospace(line));
        }
        children.push(make_empty());
    }

    children
}

/// 把报告序列化为 DOCX 字节流
///
/// 年份取导出时刻的当前日历年（不入库存储）。
///
/// # 参数
/// - `settings` - 全局设置（院系、学生）
/// - `space` - 所属课程空间（课程名、教师）
/// - `report` - 要导出的报告
///
/// # 返回值
/// 打包完成的 DOCX 文件内容
///
/// # 错误
/// 打包失败时返回用户可见的错误信息
pub fn build_report_docx(
    settings: &GlobalSettings,
    space: &Space,
    report: &LabReport,
) -> Result<Vec<u8>, String> {
    let year = chrono::Local::now().year();

    let mut docx = Docx::new()
        .default_fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT).cs(FONT))
        .default_size(FONT_SIZE)
        .page_margin(
            PageMargin::new()
                .left(MARGIN_LEFT)
                .right(MARGIN_RIGHT)
                .top(MARGIN_TOP)
                .bottom(MARGIN_BOTTOM),
        );

    for paragraph in report_paragraphs(settings, space, report, year) {
        docx = docx.add_paragraph(paragraph);
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| format!("Не вдалося сформувати DOCX: {}", e))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::defaults;
    use crate::models::report::{WorkProgressItem};
    use serde_json::Value;

    /// 递归收集段落树里全部 "text" 字段，得到纯文本表示
    fn collect_text(value: &Value, out: &mut String) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if key == "text" {
                        if let Some(s) = child.as_str() {
                            out.push_str(s);
                        }
                    }
                    collect_text(child, out);
                }
            }
            Value::Array(items) => {
                for child in items {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    fn paragraph_texts(paragraphs: &[Paragraph]) -> Vec<String> {
        paragraphs
            .iter()
            .map(|p| {
                let value = serde_json::to_value(p).expect("paragraph serializes");
                let mut text = String::new();
                collect_text(&value, &mut text);
                text
            })
            .collect()
    }

    fn scenario_report() -> (GlobalSettings, Space, LabReport) {
        let settings = GlobalSettings {
            student_name: "Шевченко Т.Г.".to_string(),
            student_group: "ФЕІ-33".to_string(),
            ..GlobalSettings::default()
        };
        let mut space = defaults::new_space("Алгоритми", "Асист.", "Іжик О.В.");
        let mut report = defaults::new_report("3");
        report.topic = "Сортування".to_string();
        report.abstract_.content = "Дослідити алгоритми сортування.".to_string();
        report.work_progress.items = vec![WorkProgressItem {
            id: "10".to_string(),
            text: "Реалізувати бульбашкове сортування".to_string(),
            ..WorkProgressItem::default()
        }];
        report.conclusion.content = "Алгоритм реалізовано успішно.".to_string();
        space.reports.push(report.clone());
        (settings, space, report)
    }

    #[test]
    fn test_scenario_emission_order() {
        let (settings, space, report) = scenario_report();
        let texts = paragraph_texts(&report_paragraphs(&settings, &space, &report, 2026));
        let joined = texts.join("\n");

        let expected_in_order = [
            "ЛАБОРАТОРНА РОБОТА № 3",
            "з курсу \"Алгоритми\"",
            "\"Сортування\"",
            "Львів 2026",
            "Мета роботи: Дослідити алгоритми сортування.",
            "Хід роботи",
            "1. Реалізувати бульбашкове сортування",
            "Висновок: Алгоритм реалізовано успішно.",
        ];
        let mut position = 0;
        for needle in expected_in_order {
            let found = joined[position..]
                .find(needle)
                .unwrap_or_else(|| panic!("не знайдено '{}' після позиції {}", needle, position));
            position += found + needle.len();
        }

        // 附录已禁用：标题不得出现
        assert!(!joined.contains("Додаток"));
    }

    #[test]
    fn test_all_optional_blocks_disabled_yields_title_page_only() {
        let (settings, space, mut report) = scenario_report();
        report.enabled_blocks.clear();
        let paragraphs = report_paragraphs(&settings, &space, &report, 2026);
        let title_only = title_page_paragraphs(&settings, &space, &report, 2026);
        assert_eq!(paragraphs.len(), title_only.len());
        let joined = paragraph_texts(&paragraphs).join("\n");
        assert!(!joined.contains("Мета роботи"));
        assert!(!joined.contains("Хід роботи"));
        assert!(!joined.contains("Висновок"));
    }

    #[test]
    fn test_enabled_but_empty_sections_are_not_emitted() {
        let (settings, space, mut report) = scenario_report();
        report.abstract_.content = "   ".to_string();
        report.conclusion.content = String::new();
        report.work_progress.items = vec![WorkProgressItem {
            id: "1".to_string(),
            ..WorkProgressItem::default()
        }];
        let joined = paragraph_texts(&report_paragraphs(&settings, &space, &report, 2026)).join("\n");
        assert!(!joined.contains("Мета роботи"));
        assert!(!joined.contains("Хід роботи"));
        assert!(!joined.contains("Висновок"));
    }

    #[test]
    fn test_empty_item_skipped_but_numbering_keeps_position() {
        let (settings, space, mut report) = scenario_report();
        report.work_progress.items = vec![
            WorkProgressItem {
                id: "1".to_string(),
                text: "Перший крок".to_string(),
                ..WorkProgressItem::default()
            },
            WorkProgressItem {
                id: "2".to_string(),
                ..WorkProgressItem::default()
            },
            WorkProgressItem {
                id: "3".to_string(),
                text: "Третій крок".to_string(),
                ..WorkProgressItem::default()
            },
        ];
        let joined = paragraph_texts(&report_paragraphs(&settings, &space, &report, 2026)).join("\n");
        assert!(joined.contains("1. Перший крок"));
        assert!(joined.contains("3. Третій крок"));
        assert!(!joined.contains("2. "));
    }

    #[test]
    fn test_item_code_renders_under_its_item() {
        let (settings, space, mut report) = scenario_report();
        report.work_progress.items[0].item_code = Some("print(1)\nprint(2)".to_string());
        report.work_progress.items[0].code_caption = Some("Лістинг".to_string());
        let texts = paragraph_texts(&report_paragraphs(&settings, &space, &report, 2026));

        let item_pos = texts
            .iter()
            .position(|t| t.contains("1. Реалізувати"))
            .unwrap();
        assert_eq!(texts[item_pos + 1], "Лістинг");
        assert_eq!(texts[item_pos + 2], "print(1)");
        assert_eq!(texts[item_pos + 3], "print(2)");
    }

    #[test]
    fn test_appendix_emitted_only_with_code() {
        let (settings, space, mut report) = scenario_report();
        report.enabled_blocks.push(BlockType::Appendix);
        // 默认标题在、代码为空：不发射
        let joined = paragraph_texts(&report_paragraphs(&settings, &space, &report, 2026)).join("\n");
        assert!(!joined.contains("Додаток"));

        report.appendix.code = "import math\nprint(math.pi)".to_string();
        let texts = paragraph_texts(&report_paragraphs(&settings, &space, &report, 2026));
        let joined = texts.join("\n");
        assert!(joined.contains("Додаток"));
        assert!(joined.contains("Код програми:"));
        assert!(texts.contains(&"import math".to_string()));
    }

    #[test]
    fn test_malformed_image_is_skipped_silently() {
        let (settings, space, mut report) = scenario_report();
        report.work_progress.items[0].image_base64 = Some("data:image/png;base64,не-base64".to_string());
        // 不 panic、不失败，仅跳过图片
        let paragraphs = report_paragraphs(&settings, &space, &report, 2026);
        assert!(!paragraphs.is_empty());
    }

    #[test]
    fn test_packed_docx_is_a_zip() {
        let (settings, space, report) = scenario_report();
        let bytes = build_report_docx(&settings, &space, &report).unwrap();
        // DOCX 是 ZIP 容器：PK 魔数开头
        assert_eq!(&bytes[..2], b"PK");
    }
}
