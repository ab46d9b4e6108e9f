//! # 标识符生成工具
//!
//! 生成基于时间戳的字符串标识符，对应前端 TypeScript 中的
//! `Date.now().toString()` 习惯用法。
//!
//! 前端在快速连续创建多个条目时会出现 `Date.now() + i` 这种手工偏移；
//! Rust 端改为进程内单调递增：同一毫秒内的多次调用也保证产出不同的 id，
//! 满足"标识符在其所属集合内创建时唯一"的约束。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 上一次发出的 id 数值，用于保证单调递增
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// 生成一个新的字符串标识符
///
/// 取当前 Unix 毫秒时间戳；若与上一次发出的值相同或更小（同一毫秒内
/// 连续调用、或系统时钟回拨），则在上一次的基础上加一。
///
/// # 返回值
/// 十进制数字字符串（如 "1719859200000"），与前端既有数据格式兼容
pub fn next_id() -> String {
    let now_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let mut prev = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now_millis.max(prev + 1);
        match LAST_ID.compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => prev = actual,
        }
    }
}
