//! # 章节结构操作服务
//!
//! 前端编辑器对每次输入都回传完整的载荷替换；必须无条件成立的结构规则
//! 则集中在这里实现，与 command 层解耦：
//! - 工作进度条目的追加/删除（列表永不为空：删空时替补一个空条目）
//! - 图片附件校验（仅 image/* MIME、不超过 5 MB）与 data URL 编码
//! - 附件原子对的开关（代码+标题、图片+标题一起设置或一起清空）
//! - 可选章节的显示开关（非破坏性：载荷原样保留）
//!
//! 所有函数都是纯函数：输入当前载荷，输出替换后的新载荷，
//! 校验失败时返回用户可见的错误且不产生任何变更。

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::models::defaults;
use crate::models::report::{BlockType, LabReport, WorkProgressData};

/// 图片附件的体积上限（字节）
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// 切换报告的可选章节显示状态
///
/// 启用 → 禁用 → 再启用的往返不触碰章节载荷。
///
/// # 参数
/// - `report` - 当前报告
/// - `block` - 要切换的章节
///
/// # 错误
/// 标题页固定存在，尝试切换时返回错误
pub fn toggle_block(report: &LabReport, block: BlockType) -> Result<LabReport, String> {
    if block == BlockType::TitlePage {
        return Err("Титульну сторінку не можна вимкнути".to_string());
    }

    let mut updated = report.clone();
    if updated.enabled_blocks.contains(&block) {
        updated.enabled_blocks.retain(|b| *b != block);
    } else {
        updated.enabled_blocks.push(block);
    }
    Ok(updated)
}

/// 在工作进度列表末尾追加一个空条目
pub fn add_progress_item(data: &WorkProgressData) -> WorkProgressData {
    let mut items = data.items.clone();
    items.push(defaults::empty_progress_item());
    WorkProgressData { items }
}

/// 按 id 删除一个工作进度条目
///
/// 如果删除会使列表为空，则用一个新的空条目替补——列表长度永不为 0。
pub fn remove_progress_item(data: &WorkProgressData, item_id: &str) -> WorkProgressData {
    let mut items: Vec<_> = data
        .items
        .iter()
        .filter(|item| item.id != item_id)
        .cloned()
        .collect();
    if items.is_empty() {
        items.push(defaults::empty_progress_item());
    }
    WorkProgressData { items }
}

/// 给指定条目附加图片
///
/// 校验通过后把原始字节编码为自包含的 data URL 存入 `imageBase64`；
/// 既有的图片标题保持不变（替换图片不清空说明文字）。
///
/// # 参数
/// - `data` - 当前工作进度载荷
/// - `item_id` - 目标条目 id
/// - `mime` - 所选文件的 MIME 类型
/// - `bytes` - 所选文件的原始内容
///
/// # 错误
/// - 非图片 MIME 类型
/// - 文件超过 5 MB
/// - 条目不存在
///
/// 任何错误都不产生状态变更。
pub fn attach_progress_image(
    data: &WorkProgressData,
    item_id: &str,
    mime: &str,
    bytes: &[u8],
) -> Result<WorkProgressData, String> {
    if !mime.starts_with("image/") {
        return Err("Можна прикріпити лише зображення".to_string());
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err("Файл завеликий: максимальний розмір зображення — 5 МБ".to_string());
    }

    let data_url = format!("data:{};base64,{}", mime, BASE64.encode(bytes));
    map_item(data, item_id, |mut item| {
        item.image_base64 = Some(data_url.clone());
        item
    })
}

/// 移除指定条目的图片附件
///
/// 图片与其标题是原子对：一起清空。
pub fn detach_progress_image(
    data: &WorkProgressData,
    item_id: &str,
) -> Result<WorkProgressData, String> {
    map_item(data, item_id, |mut item| {
        item.image_base64 = None;
        item.image_caption = None;
        item
    })
}

/// 开关指定条目的代码附件
///
/// 开启 → 空代码串 + 空标题；关闭 → 两者一起清空。
pub fn set_code_attachment(
    data: &WorkProgressData,
    item_id: &str,
    enabled: bool,
) -> Result<WorkProgressData, String> {
    map_item(data, item_id, |mut item| {
        if enabled {
            item.item_code = Some(String::new());
            item.code_caption = Some(String::new());
        } else {
            item.item_code = None;
            item.code_caption = None;
        }
        item
    })
}

/// 对目标条目应用变换，返回替换后的载荷
///
/// # 错误
/// 条目不存在时返回错误
fn map_item<F>(
    data: &WorkProgressData,
    item_id: &str,
    transform: F,
) -> Result<WorkProgressData, String>
where
    F: Fn(crate::models::report::WorkProgressItem) -> crate::models::report::WorkProgressItem,
{
    if !data.items.iter().any(|item| item.id == item_id) {
        return Err("Пункт не знайдено".to_string());
    }

    let items = data
        .items
        .iter()
        .cloned()
        .map(|item| if item.id == item_id { transform(item) } else { item })
        .collect();
    Ok(WorkProgressData { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::WorkProgressItem;

    fn one_item(id: &str, text: &str) -> WorkProgressData {
        WorkProgressData {
            items: vec![WorkProgressItem {
                id: id.to_string(),
                text: text.to_string(),
                ..WorkProgressItem::default()
            }],
        }
    }

    #[test]
    fn test_removing_last_item_substitutes_empty_placeholder() {
        let data = one_item("1", "Єдиний пункт");
        let updated = remove_progress_item(&data, "1");
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].text, "");
        assert_ne!(updated.items[0].id, "1");
    }

    #[test]
    fn test_removing_one_of_many_keeps_the_rest() {
        let mut data = one_item("1", "Перший");
        data.items.push(WorkProgressItem {
            id: "2".to_string(),
            text: "Другий".to_string(),
            ..WorkProgressItem::default()
        });
        let updated = remove_progress_item(&data, "1");
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].text, "Другий");
    }

    #[test]
    fn test_toggle_off_and_on_preserves_payload() {
        let mut report = crate::models::defaults::new_report("3");
        report.abstract_.content = "Дослідити алгоритми сортування.".to_string();

        let toggled_off = toggle_block(&report, BlockType::Abstract).unwrap();
        assert!(!toggled_off.is_enabled(BlockType::Abstract));
        let toggled_on = toggle_block(&toggled_off, BlockType::Abstract).unwrap();
        assert!(toggled_on.is_enabled(BlockType::Abstract));
        assert_eq!(toggled_on.abstract_, report.abstract_);
    }

    #[test]
    fn test_title_page_cannot_be_toggled() {
        let report = crate::models::defaults::new_report("1");
        assert!(toggle_block(&report, BlockType::TitlePage).is_err());
    }

    #[test]
    fn test_oversize_image_is_rejected_without_state_change() {
        let data = one_item("1", "Пункт");
        let six_mb = vec![0u8; 6 * 1024 * 1024];
        let result = attach_progress_image(&data, "1", "image/png", &six_mb);
        assert!(result.is_err());
        assert!(data.items[0].image_base64.is_none());
    }

    #[test]
    fn test_non_image_mime_is_rejected() {
        let data = one_item("1", "Пункт");
        let result = attach_progress_image(&data, "1", "application/pdf", &[1, 2, 3]);
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_png_produces_data_url() {
        let data = one_item("1", "Пункт");
        let two_mb = vec![0u8; 2 * 1024 * 1024];
        let updated = attach_progress_image(&data, "1", "image/png", &two_mb).unwrap();
        let url = updated.items[0].image_base64.as_deref().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_detach_image_clears_blob_and_caption_together() {
        let mut data = one_item("1", "Пункт");
        data.items[0].image_base64 = Some("data:image/png;base64,AAAA".to_string());
        data.items[0].image_caption = Some("Графік".to_string());
        let updated = detach_progress_image(&data, "1").unwrap();
        assert!(updated.items[0].image_base64.is_none());
        assert!(updated.items[0].image_caption.is_none());
    }

    #[test]
    fn test_code_attachment_toggles_as_atomic_pair() {
        let data = one_item("1", "Пункт");
        let enabled = set_code_attachment(&data, "1", true).unwrap();
        assert_eq!(enabled.items[0].item_code.as_deref(), Some(""));
        assert_eq!(enabled.items[0].code_caption.as_deref(), Some(""));

        let mut with_code = enabled;
        with_code.items[0].item_code = Some("print(1)".to_string());
        let disabled = set_code_attachment(&with_code, "1", false).unwrap();
        assert!(disabled.items[0].item_code.is_none());
        assert!(disabled.items[0].code_caption.is_none());
    }

    #[test]
    fn test_unknown_item_is_an_error() {
        let data = one_item("1", "Пункт");
        assert!(set_code_attachment(&data, "404", true).is_err());
    }
}
