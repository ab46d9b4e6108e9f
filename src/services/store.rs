//! # 文档库服务
//!
//! 持有全局设置、课程空间集合和 Gemini API 密钥的唯一内存副本，
//! 并负责它们与持久化存储之间的同步：
//! - **加载**：应用启动时一次性读取三个互相独立的存储键
//! - **写透（write-through）**：每次被接受的变更先落盘、再更新内存、才返回调用方，
//!   不做批处理也不做去抖
//!
//! ## 存储键
//! 数据目录 `~/.mo/Reporter/` 下的三个文件，任何一个缺失或损坏都不影响其余两个：
//! - `settings.json` - 全局设置（JSON 对象）
//! - `spaces.json` - 课程空间集合（JSON 数组）
//! - `api-key.txt` - 纯文本凭据字符串
//!
//! ## 加载容错
//! 存储解析失败只记录日志、绝不向调用方抛错：
//! 设置损坏时逐字段尽力合并，空间集合损坏时回落到空集合。
//!
//! ## 变更原子性
//! 每次变更基于当前快照构造全新的集合，序列化并写盘成功后才替换内存副本；
//! 落盘失败时内存保持变更前的状态，调用方收到错误信息。
//!
//! ## 线程安全
//! 使用 `std::sync::RwLock` 保证多线程安全访问。
//! Tauri 的 command 可能在不同线程上并发执行，RwLock 允许多个读操作并发进行；
//! 锁从不跨越 `.await` 持有。

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::models::defaults;
use crate::models::report::{LabReport, Space};
use crate::models::settings::GlobalSettings;
use crate::utils::id;

/// 设置存储键对应的文件名
const SETTINGS_FILE: &str = "settings.json";

/// 空间集合存储键对应的文件名
const SPACES_FILE: &str = "spaces.json";

/// API 密钥存储键对应的文件名
const API_KEY_FILE: &str = "api-key.txt";

/// 首次启动（spaces 键不存在）时是否预置演示空间
///
/// 编译期策略开关：关闭后首次启动得到空集合。
const SEED_DEMO_SPACE: bool = true;

/// 文档库：应用的唯一权威文档状态
///
/// 通过 Tauri 的 `manage()` 方法注册为应用状态，
/// 所有 command 函数可以通过 `State<DocumentStore>` 参数访问。
pub struct DocumentStore {
    /// 数据目录：三个存储键所在的目录
    dir: PathBuf,

    /// 全局设置的内存副本
    settings: RwLock<GlobalSettings>,

    /// 课程空间集合的内存副本
    spaces: RwLock<Vec<Space>>,

    /// Gemini API 密钥的内存副本
    api_key: RwLock<String>,
}

impl DocumentStore {
    /// 从数据目录加载文档库
    ///
    /// 同步读取三个存储键，仅在应用启动时调用一次。
    /// 解析失败按键各自回落（设置 → 尽力合并/默认值，空间 → 空集合，
    /// 密钥 → 空字符串），绝不返回错误。
    ///
    /// # 参数
    /// - `dir` - 数据目录路径（`~/.mo/Reporter/`）
    pub fn load(dir: PathBuf) -> Self {
        let settings = load_settings(&dir);
        let spaces = load_spaces(&dir);
        let api_key = std::fs::read_to_string(dir.join(API_KEY_FILE))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        Self {
            dir,
            settings: RwLock::new(settings),
            spaces: RwLock::new(spaces),
            api_key: RwLock::new(api_key),
        }
    }

    // ======== 快照读取方法 ========

    /// 获取全局设置的快照
    pub fn settings(&self) -> GlobalSettings {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// 获取课程空间集合的快照
    pub fn spaces(&self) -> Vec<Space> {
        self.spaces
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// 获取 API 密钥的快照
    pub fn api_key(&self) -> String {
        self.api_key
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// 按标识符查找课程空间
    ///
    /// # 错误
    /// 空间不存在时返回用户可见的错误信息
    pub fn space(&self, space_id: &str) -> Result<Space, String> {
        self.spaces()
            .into_iter()
            .find(|s| s.id == space_id)
            .ok_or_else(|| "Предмет не знайдено".to_string())
    }

    /// 按标识符查找实验报告
    ///
    /// # 错误
    /// 空间或报告不存在时返回用户可见的错误信息
    pub fn report(&self, space_id: &str, report_id: &str) -> Result<LabReport, String> {
        self.space(space_id)?
            .reports
            .into_iter()
            .find(|r| r.id == report_id)
            .ok_or_else(|| "Звіт не знайдено".to_string())
    }

    // ======== 设置与凭据变更方法 ========

    /// 整体替换并持久化全局设置
    ///
    /// # 错误
    /// 序列化或落盘失败时返回错误，内存保持原值
    pub async fn save_settings(&self, settings: GlobalSettings) -> Result<(), String> {
        let content = serde_json::to_string_pretty(&settings)
            .map_err(|e| format!("Не вдалося серіалізувати налаштування: {}", e))?;
        self.write_key(SETTINGS_FILE, &content).await?;

        if let Ok(mut guard) = self.settings.write() {
            *guard = settings;
        }
        Ok(())
    }

    /// 替换并持久化 API 密钥
    ///
    /// # 错误
    /// 落盘失败时返回错误，内存保持原值
    pub async fn save_api_key(&self, api_key: String) -> Result<(), String> {
        self.write_key(API_KEY_FILE, &api_key).await?;

        if let Ok(mut guard) = self.api_key.write() {
            *guard = api_key;
        }
        Ok(())
    }

    // ======== 空间集合变更方法 ========
    //
    // 每个方法都基于当前快照构造全新集合，经 `commit_spaces` 写透落盘。

    /// 创建一个新的课程空间
    ///
    /// # 返回值
    /// 返回新建的空间（含生成的 id）
    pub async fn create_space(
        &self,
        course_name: &str,
        teacher_title: &str,
        teacher_name: &str,
    ) -> Result<Space, String> {
        let space = defaults::new_space(course_name, teacher_title, teacher_name);
        let mut spaces = self.spaces();
        spaces.push(space.clone());
        self.commit_spaces(spaces).await?;
        Ok(space)
    }

    /// 删除课程空间（级联删除其中全部报告）
    pub async fn delete_space(&self, space_id: &str) -> Result<(), String> {
        let spaces: Vec<Space> = self
            .spaces()
            .into_iter()
            .filter(|s| s.id != space_id)
            .collect();
        self.commit_spaces(spaces).await
    }

    /// 在指定空间内新建一份默认报告
    ///
    /// 实验编号默认为该空间现有报告数 + 1。
    ///
    /// # 返回值
    /// 返回新建的报告（含生成的 id）
    pub async fn add_report(&self, space_id: &str) -> Result<LabReport, String> {
        let space = self.space(space_id)?;
        let report = defaults::new_report(&(space.reports.len() + 1).to_string());

        let spaces = self.map_space(space_id, |mut s| {
            s.reports.push(report.clone());
            s
        });
        self.commit_spaces(spaces).await?;
        Ok(report)
    }

    /// 删除指定空间内的一份报告
    pub async fn delete_report(&self, space_id: &str, report_id: &str) -> Result<(), String> {
        let spaces = self.map_space(space_id, |mut s| {
            s.reports.retain(|r| r.id != report_id);
            s
        });
        self.commit_spaces(spaces).await
    }

    /// 切换报告的完成标记
    ///
    /// # 返回值
    /// 返回更新后的报告
    pub async fn toggle_report_done(
        &self,
        space_id: &str,
        report_id: &str,
    ) -> Result<LabReport, String> {
        let mut report = self.report(space_id, report_id)?;
        report.is_done = !report.is_done;
        self.replace_report(space_id, report).await
    }

    /// 按 id 匹配替换空间内的一份报告
    ///
    /// 只重建目标报告所在的空间；兄弟报告与其余空间原样保留。
    /// 这是所有章节编辑、AI 应用和附件操作的统一落点。
    ///
    /// # 错误
    /// 空间或报告不存在时返回错误，不做任何变更
    pub async fn replace_report(
        &self,
        space_id: &str,
        report: LabReport,
    ) -> Result<LabReport, String> {
        // 先验证目标存在，避免静默丢失编辑
        self.report(space_id, &report.id)?;

        let spaces = self.map_space(space_id, |mut s| {
            s.reports = s
                .reports
                .into_iter()
                .map(|r| if r.id == report.id { report.clone() } else { r })
                .collect();
            s
        });
        self.commit_spaces(spaces).await?;
        Ok(report)
    }

    /// 将外部导入的报告插入指定空间
    ///
    /// 导入的报告追加到列表末尾；如果它的 id 与空间内现有报告冲突，
    /// 重新生成一个 id 以维持"集合内唯一"的约束。
    ///
    /// # 返回值
    /// 返回实际插入的报告（id 可能已更换）
    pub async fn insert_report(
        &self,
        space_id: &str,
        mut report: LabReport,
    ) -> Result<LabReport, String> {
        let space = self.space(space_id)?;
        if space.reports.iter().any(|r| r.id == report.id) {
            report.id = id::next_id();
        }

        let spaces = self.map_space(space_id, |mut s| {
            s.reports.push(report.clone());
            s
        });
        self.commit_spaces(spaces).await?;
        Ok(report)
    }

    // ======== 内部辅助方法 ========

    /// 对目标空间应用变换，返回重建后的完整集合
    fn map_space<F>(&self, space_id: &str, transform: F) -> Vec<Space>
    where
        F: Fn(Space) -> Space,
    {
        self.spaces()
            .into_iter()
            .map(|s| if s.id == space_id { transform(s) } else { s })
            .collect()
    }

    /// 序列化空间集合并写透落盘，成功后替换内存副本
    async fn commit_spaces(&self, spaces: Vec<Space>) -> Result<(), String> {
        let content = serde_json::to_string_pretty(&spaces)
            .map_err(|e| format!("Не вдалося серіалізувати предмети: {}", e))?;
        self.write_key(SPACES_FILE, &content).await?;

        if let Ok(mut guard) = self.spaces.write() {
            *guard = spaces;
        }
        Ok(())
    }

    /// 将一个存储键的内容写入数据目录
    ///
    /// 数据目录不存在时自动递归创建。
    async fn write_key(&self, file_name: &str, content: &str) -> Result<(), String> {
        if !self.dir.exists() {
            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| format!("Не вдалося створити каталог даних: {}", e))?;
        }

        tokio::fs::write(self.dir.join(file_name), content)
            .await
            .map_err(|e| format!("Не вдалося записати файл {}: {}", file_name, e))
    }
}

/// 读取并解析设置键
///
/// 文件缺失 → 默认值；JSON 语法损坏 → 默认值；
/// JSON 可解析但形状不符 → 逐字段尽力合并。
fn load_settings(dir: &Path) -> GlobalSettings {
    let path = dir.join(SETTINGS_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return GlobalSettings::default();
    };

    match serde_json::from_str::<GlobalSettings>(&content) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("settings.json 形状异常，逐字段恢复: {}", e);
            serde_json::from_str::<serde_json::Value>(&content)
                .map(|value| GlobalSettings::from_partial_value(&value))
                .unwrap_or_default()
        }
    }
}

/// 读取并解析空间集合键
///
/// 文件缺失 → 按策略预置演示空间或空集合；解析失败 → 空集合。
fn load_spaces(dir: &Path) -> Vec<Space> {
    let path = dir.join(SPACES_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return if SEED_DEMO_SPACE {
            vec![defaults::demo_space()]
        } else {
            vec![]
        };
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("spaces.json 解析失败，回落到空集合: {}", e);
        vec![]
    })
}
