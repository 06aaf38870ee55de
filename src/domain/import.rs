// ==========================================
// 供应商目录 - 导入领域模型
// ==========================================
// 职责: 原始行 / 校验记录 / 提交结果
// 生命周期: 仅在一次导入流程内，不落库
// ==========================================

use crate::domain::supplier::SupplierDraft;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ==========================================
// RawValue - 单元格原始值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Empty,
}

impl RawValue {
    /// 空值判定（空白字符串视为空）
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(_) => false,
            RawValue::Empty => true,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => f.write_str(s),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value.to_string())
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

// ==========================================
// RawRow - 解析器产出的原始行
// ==========================================
// 列顺序即表头顺序；键为表头原文（未校验）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<(String, RawValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一列；同名表头保留先出现者
    pub fn insert(&mut self, header: impl Into<String>, value: RawValue) {
        let header = header.into();
        if self.cells.iter().any(|(h, _)| *h == header) {
            return;
        }
        self.cells.push((header, value));
    }

    pub fn get(&self, header: &str) -> Option<&RawValue> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 所有单元格均为空
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_empty())
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v.into());
        }
        row
    }
}

// ==========================================
// SupplierField - 规范字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplierField {
    Name,
    Kind,
    Region,
    MinimumOrder,
    SocialHandle,
    Categories,
}

impl SupplierField {
    /// 校验顺序
    pub const ALL: [SupplierField; 6] = [
        SupplierField::Name,
        SupplierField::Kind,
        SupplierField::Region,
        SupplierField::MinimumOrder,
        SupplierField::SocialHandle,
        SupplierField::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierField::Name => "name",
            SupplierField::Kind => "kind",
            SupplierField::Region => "region",
            SupplierField::MinimumOrder => "minimum_order",
            SupplierField::SocialHandle => "social_handle",
            SupplierField::Categories => "categories",
        }
    }
}

impl fmt::Display for SupplierField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// RowError - 单行校验错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub field: SupplierField, // 出错字段
    pub message: String,      // 面向用户的描述（已本地化）
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ==========================================
// ValidatedImportRecord - 校验后的导入记录
// ==========================================
// 每个原始行生成一条，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedImportRecord {
    pub row_number: usize,        // 数据行号（从 1 开始，不含表头）
    pub draft: SupplierDraft,
    pub valid: bool,
    pub errors: Vec<RowError>,
}

impl ValidatedImportRecord {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn has_error_for(&self, field: SupplierField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

// ==========================================
// RowCommitError - 单行提交错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowCommitError {
    pub row_number: usize,
    pub supplier_name: String,
    pub message: String,
}

// ==========================================
// ImportOutcome - 提交过程计数器
// ==========================================
// 由唯一的提交循环修改，无需加锁
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<RowCommitError>,
}

impl ImportOutcome {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, row_number: usize, supplier_name: &str, message: String) {
        self.failed += 1;
        self.errors.push(RowCommitError {
            row_number,
            supplier_name: supplier_name.to_string(),
            message,
        });
    }
}

// ==========================================
// ImportSummary - 批次汇总（向上汇报）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_name: String,
    pub total_rows: usize,        // 解析出的行数
    pub skipped_invalid: usize,   // 校验未通过、未提交的行数
    pub outcome: ImportOutcome,   // 提交计数 + 逐行错误
    pub elapsed_time: Duration,
}
