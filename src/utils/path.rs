//! # 路径工具函数
//!
//! 提供与文件路径相关的工具函数：
//! - 获取 Reporter 数据目录路径（`~/.mo/Reporter/`）
//!
//! 文档库的三个持久化键（settings.json、spaces.json、api-key.txt）
//! 均存放在该目录下，互相独立读写。

use std::path::PathBuf;

/// 获取 Reporter 数据目录的绝对路径
///
/// Reporter 的全部用户数据独立存储在 `~/.mo/Reporter/` 目录下，
/// 与其它应用的数据分离，避免意外污染。
/// 使用 `dirs` crate 获取跨平台的主目录路径。
///
/// # 返回值
/// 返回 `~/.mo/Reporter/` 目录的绝对路径。
///
/// # 错误
/// 如果无法确定用户主目录（极端情况，如无 HOME 环境变量），返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\.mo\Reporter`
/// - Linux/macOS: `/home/username/.mo/Reporter`
pub fn get_reporter_data_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "Не вдалося визначити домашній каталог користувача".to_string())?;
    Ok(home.join(".mo").join("Reporter"))
}
