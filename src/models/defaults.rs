//! # 默认值构造器
//!
//! 新建空间/报告时的默认载荷，以及首次启动时预置的演示空间。
//! 从前端 `utils/defaults.ts` 的工厂函数平移而来。

use crate::models::report::{
    AbstractData, AppendixData, BlockType, ConclusionData, LabReport, Space, WorkProgressData,
    WorkProgressItem,
};
use crate::utils::id;

/// 新附录的默认标题
const DEFAULT_APPENDIX_TITLE: &str = "Код програми";

/// 创建一份默认实验报告
///
/// 所有章节载荷均为空（工作进度带一个空条目，列表永不为空）；
/// 默认启用目的、进度、结论三个章节，附录需要手动开启。
///
/// # 参数
/// - `lab_number` - 实验编号（自由文本）
pub fn new_report(lab_number: &str) -> LabReport {
    LabReport {
        id: id::next_id(),
        lab_number: lab_number.to_string(),
        topic: String::new(),
        methodical_text: None,
        is_done: false,
        enabled_blocks: vec![BlockType::Abstract, BlockType::WorkProgress, BlockType::Conclusion],
        abstract_: AbstractData::default(),
        work_progress: WorkProgressData {
            items: vec![empty_progress_item()],
        },
        conclusion: ConclusionData::default(),
        appendix: AppendixData {
            title: DEFAULT_APPENDIX_TITLE.to_string(),
            code: String::new(),
        },
    }
}

/// 创建一个空的工作进度条目
pub fn empty_progress_item() -> WorkProgressItem {
    WorkProgressItem {
        id: id::next_id(),
        ..WorkProgressItem::default()
    }
}

/// 创建一个空课程空间
///
/// # 参数
/// - `course_name` - 课程名称
/// - `teacher_title` - 教师职称
/// - `teacher_name` - 教师姓名
pub fn new_space(course_name: &str, teacher_title: &str, teacher_name: &str) -> Space {
    Space {
        id: id::next_id(),
        course_name: course_name.to_string(),
        teacher_title: teacher_title.to_string(),
        teacher_name: teacher_name.to_string(),
        reports: vec![],
    }
}

/// 创建首次启动时预置的演示空间
///
/// 内容取自一门真实课程的两份完整报告，让新用户打开应用即可看到
/// 编辑器各章节和 DOCX 导出的实际效果。
pub fn demo_space() -> Space {
    let report1 = LabReport {
        id: id::next_id(),
        lab_number: "6".to_string(),
        topic: "Кількісна оцінка інформації".to_string(),
        methodical_text: None,
        is_done: true,
        enabled_blocks: vec![
            BlockType::Abstract,
            BlockType::WorkProgress,
            BlockType::Conclusion,
            BlockType::Appendix,
        ],
        abstract_: AbstractData {
            content: "Ознайомитися з поняттям кількісної оцінки інформації, вивчити формулу \
                      Шеннона для визначення ентропії, навчитися обчислювати ентропію випадкових \
                      подій та будувати залежність ентропії від частоти появи певних чисел."
                .to_string(),
        },
        work_progress: WorkProgressData {
            items: vec![
                WorkProgressItem {
                    id: id::next_id(),
                    text: "Здійснити вибірку чисел сформувавши масив випадкових чисел від 1 до 10 \
                           розміром 100 елементів."
                        .to_string(),
                    ..WorkProgressItem::default()
                },
                WorkProgressItem {
                    id: id::next_id(),
                    text: "За формулою Шеннона обчислити ентропію появи певних чисел.".to_string(),
                    ..WorkProgressItem::default()
                },
                WorkProgressItem {
                    id: id::next_id(),
                    text: "Побудувати залежність ентропії появи чисел як функцію їх значень."
                        .to_string(),
                    ..WorkProgressItem::default()
                },
                WorkProgressItem {
                    id: id::next_id(),
                    text: "Оцінити отриманий результат з точки зору теорії інформації. Отримані \
                           значення ентропії показують наскільки невизначеною є система."
                        .to_string(),
                    item_code: Some(
                        "# Оцінка ентропії\nprint(f\"Ентропія = {H:.4f} біт\")".to_string(),
                    ),
                    code_caption: None,
                    ..WorkProgressItem::default()
                },
            ],
        },
        conclusion: ConclusionData {
            content: "У ході виконання лабораторної роботи було досліджено поняття ентропії як \
                      міри невизначеності інформаційної системи. Реалізовано програму на Python \
                      для генерації випадкових чисел, обчислення ентропії за формулою Шеннона та \
                      побудови графіка. Результати підтвердили, що ентропія зростає із \
                      рівномірністю розподілу."
                .to_string(),
        },
        appendix: AppendixData {
            title: DEFAULT_APPENDIX_TITLE.to_string(),
            code: r#"import random
import matplotlib.pyplot as plt
import math

def shenonFormula(arr, SIZE):
    total = 0
    for N in range(1, 11):
        Pi = arr.count(N) / SIZE
        if Pi > 0:
            total += Pi * math.log2(Pi)
    return -total

myArray = [random.randint(1, 10) for _ in range(100)]
SIZE = len(myArray)

print(f"Ентропія = {shenonFormula(myArray, SIZE):.4f} біт")

HArray = [-myArray.count(N)/SIZE * math.log2(myArray.count(N)/SIZE)
          for N in range(1, 11) if myArray.count(N) > 0]

plt.plot(range(1, len(HArray)+1), HArray)
plt.xlabel("Значення числа")
plt.ylabel("H(x)")
plt.title("Ентропія")
plt.show()"#
                .to_string(),
        },
    };

    let report2 = LabReport {
        id: id::next_id(),
        lab_number: "7".to_string(),
        topic: "Кодування даних".to_string(),
        methodical_text: None,
        is_done: false,
        enabled_blocks: vec![BlockType::Abstract, BlockType::WorkProgress, BlockType::Conclusion],
        abstract_: AbstractData {
            content: "Ознайомитися з основними методами кодування даних: кодом Хафмана та кодом \
                      Хеммінга."
                .to_string(),
        },
        work_progress: WorkProgressData {
            items: vec![
                WorkProgressItem {
                    id: id::next_id(),
                    text: "Реалізувати алгоритм побудови дерева Хафмана для заданого набору \
                           символів."
                        .to_string(),
                    ..WorkProgressItem::default()
                },
                WorkProgressItem {
                    id: id::next_id(),
                    text: "Закодувати рядок та порівняти розмір з оригінальним.".to_string(),
                    ..WorkProgressItem::default()
                },
                WorkProgressItem {
                    id: id::next_id(),
                    text: "Перевірити правильність декодування.".to_string(),
                    ..WorkProgressItem::default()
                },
            ],
        },
        conclusion: ConclusionData {
            content: "В результаті роботи було реалізовано алгоритм Хафмана, який дозволяє \
                      досягти стиснення даних залежно від частоти входження символів."
                .to_string(),
        },
        appendix: AppendixData {
            title: DEFAULT_APPENDIX_TITLE.to_string(),
            code: String::new(),
        },
    };

    Space {
        id: id::next_id(),
        course_name: "Цифрова обробка інформації".to_string(),
        teacher_title: "Асист.".to_string(),
        teacher_name: "Іжик О.В.".to_string(),
        reports: vec![report1, report2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_defaults() {
        let report = new_report("1");
        assert_eq!(report.lab_number, "1");
        assert_eq!(report.work_progress.items.len(), 1);
        assert_eq!(report.work_progress.items[0].text, "");
        assert_eq!(report.appendix.title, DEFAULT_APPENDIX_TITLE);
        assert!(report.is_enabled(BlockType::Abstract));
        assert!(report.is_enabled(BlockType::WorkProgress));
        assert!(report.is_enabled(BlockType::Conclusion));
        assert!(!report.is_enabled(BlockType::Appendix));
    }

    #[test]
    fn test_demo_space_ids_are_unique() {
        let space = demo_space();
        let mut ids: Vec<&str> = space.reports.iter().map(|r| r.id.as_str()).collect();
        ids.push(space.id.as_str());
        for report in &space.reports {
            for item in &report.work_progress.items {
                ids.push(item.id.as_str());
            }
        }
        let unique: std::collections::HashSet<&&str> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_demo_space_first_report_is_done() {
        // 演示数据要能立刻演示"以旧报告为示例"的 AI 功能
        let space = demo_space();
        assert!(space.reports[0].is_done);
        assert!(!space.reports[1].is_done);
    }
}
