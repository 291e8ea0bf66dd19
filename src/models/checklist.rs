//! 核对单记录
//!
//! 每次提交（CLI 运行或表单提交）构造一个记录，交给文档组装器后即丢弃

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// 日期字段的显示格式（日/月/年）
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// 货物移动核对单记录
///
/// 字段一经构造不可修改，`notes` 在构造时已完成去空白和去空项。
/// 反序列化同样经过构建器。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChecklistRecordBuilder")]
pub struct ChecklistRecord {
    id: String,
    dock: String,
    date: String,
    checker_name: String,
    shift: String,
    driver_name: String,
    plate: String,
    destination: String,
    notes: Vec<String>,
}

impl ChecklistRecord {
    /// 创建构建器，日期默认为今天
    pub fn builder() -> ChecklistRecordBuilder {
        ChecklistRecordBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dock(&self) -> &str {
        &self.dock
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn checker_name(&self) -> &str {
        &self.checker_name
    }

    pub fn shift(&self) -> &str {
        &self.shift
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// 已规范化的票据列表
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// 收到的票据总数
    pub fn total_notes(&self) -> usize {
        self.notes.len()
    }
}

/// `ChecklistRecord` 构建器
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ChecklistRecordBuilder {
    id: String,
    dock: String,
    date: Option<String>,
    checker_name: String,
    shift: String,
    driver_name: String,
    plate: String,
    destination: String,
    notes: Vec<String>,
}

impl ChecklistRecordBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn dock(mut self, dock: impl Into<String>) -> Self {
        self.dock = dock.into();
        self
    }

    /// 设置日期；传入空字符串等同于未设置
    pub fn date(mut self, date: impl Into<String>) -> Self {
        let date = date.into();
        self.date = (!date.trim().is_empty()).then_some(date);
        self
    }

    pub fn checker_name(mut self, name: impl Into<String>) -> Self {
        self.checker_name = name.into();
        self
    }

    pub fn shift(mut self, shift: impl Into<String>) -> Self {
        self.shift = shift.into();
        self
    }

    pub fn driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self
    }

    pub fn plate(mut self, plate: impl Into<String>) -> Self {
        self.plate = plate.into();
        self
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.notes = notes.into_iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// 使用今天作为默认日期构建记录
    pub fn build(self) -> ChecklistRecord {
        self.build_on(Local::now().date_naive())
    }

    /// 使用指定日期作为默认日期构建记录
    pub fn build_on(self, today: NaiveDate) -> ChecklistRecord {
        ChecklistRecord {
            id: self.id,
            dock: self.dock,
            date: self
                .date
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| today.format(DISPLAY_DATE_FORMAT).to_string()),
            checker_name: self.checker_name,
            shift: self.shift,
            driver_name: self.driver_name,
            plate: self.plate,
            destination: self.destination,
            notes: normalize_notes(self.notes),
        }
    }
}

impl From<ChecklistRecordBuilder> for ChecklistRecord {
    fn from(builder: ChecklistRecordBuilder) -> Self {
        builder.build()
    }
}

/// 去除每项首尾空白并丢弃空项，保持原有顺序
pub fn normalize_notes<I, S>(notes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    notes
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}
