// ==========================================
// 供应商目录 - 供应商领域模型
// ==========================================
// 职责: 供应商草稿 / 供应商类型 / 标识符
// 红线: 不含数据访问逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SupplierKind - 供应商类型
// ==========================================
// 落库值与目录其余页面保持一致（葡语）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplierKind {
    Manufacturer, // Fabricante
    Wholesaler,   // Atacadista
}

impl SupplierKind {
    /// suppliers.type 列的存储值
    pub fn as_db_value(&self) -> &'static str {
        match self {
            SupplierKind::Manufacturer => "Fabricante",
            SupplierKind::Wholesaler => "Atacadista",
        }
    }
}

impl fmt::Display for SupplierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_value())
    }
}

// ==========================================
// NormalizedKind - 归一化后的类型字段
// ==========================================
// 无法映射时保留原始输入，供校验报错展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NormalizedKind {
    Known(SupplierKind),
    Unrecognized(String),
}

impl NormalizedKind {
    pub fn known(&self) -> Option<SupplierKind> {
        match self {
            NormalizedKind::Known(kind) => Some(*kind),
            NormalizedKind::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for NormalizedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedKind::Known(kind) => write!(f, "{}", kind),
            NormalizedKind::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

// ==========================================
// SupplierDraft - 归一化后、尚未提交的供应商记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,              // 名称（已 TRIM）
    pub kind: NormalizedKind,      // 类型
    pub region_code: String,       // 州代码（2 位）
    pub minimum_order: f64,        // 最低起订金额
    pub social_handle: String,     // @账号
    pub categories: Vec<String>,   // 分类（保序，不去重）
}

// ==========================================
// 标识符
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
