// ==========================================
// 供应商目录 - 列名解析器
// ==========================================
// 职责: 用户表头（任意拼写）→ 规范字段
// 匹配: 小写 + 去重音 + 去除 _ - 空白与标点；先精确，后包含
// 说明: 列位置无关，只看表头拼写
// ==========================================

use crate::domain::import::{RawRow, RawValue, SupplierField};
use crate::importer::normalizer::fold_accents;

// 包含匹配的最短别名长度（"uf"/"ig" 只参与精确匹配）
const MIN_CONTAINS_ALIAS_LEN: usize = 4;

const NAME_ALIASES: &[&str] = &[
    "nome",
    "name",
    "nome do fornecedor",
    "fornecedor",
    "supplier",
    "supplier name",
    "razao social",
    "empresa",
    "loja",
];

const KIND_ALIASES: &[&str] = &["tipo", "type", "kind", "tipo de fornecedor", "supplier type"];

const REGION_ALIASES: &[&str] = &[
    "regiao",
    "region",
    "estado",
    "uf",
    "state",
    "localizacao",
    "local",
];

const MINIMUM_ORDER_ALIASES: &[&str] = &[
    "pedido minimo",
    "minimum order",
    "min order",
    "pedido min",
    "valor minimo",
    "minimo",
    "moq",
];

const SOCIAL_HANDLE_ALIASES: &[&str] = &[
    "instagram",
    "insta",
    "ig",
    "social handle",
    "handle",
    "perfil",
    "social",
];

const CATEGORIES_ALIASES: &[&str] = &[
    "categorias",
    "categoria",
    "categories",
    "category",
    "segmentos",
    "segmento",
    "nicho",
];

/// 字段的有序别名列表
pub fn aliases_for(field: SupplierField) -> &'static [&'static str] {
    match field {
        SupplierField::Name => NAME_ALIASES,
        SupplierField::Kind => KIND_ALIASES,
        SupplierField::Region => REGION_ALIASES,
        SupplierField::MinimumOrder => MINIMUM_ORDER_ALIASES,
        SupplierField::SocialHandle => SOCIAL_HANDLE_ALIASES,
        SupplierField::Categories => CATEGORIES_ALIASES,
    }
}

/// 表头/别名的比较形式: "Pedido_Mínimo " → "pedidominimo"
pub fn normalize_header(header: &str) -> String {
    fold_accents(&header.to_lowercase())
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// 命中列的下标: 先精确匹配，后包含匹配
///
/// 两轮均按别名优先级遍历，列顺序不影响结果
fn matching_position(row: &RawRow, aliases: &[&str]) -> Option<usize> {
    let normalized_aliases: Vec<String> = aliases.iter().map(|a| normalize_header(a)).collect();
    let keys: Vec<String> = row.iter().map(|(header, _)| normalize_header(header)).collect();

    normalized_aliases
        .iter()
        .find_map(|alias| keys.iter().position(|key| key == alias))
        .or_else(|| {
            normalized_aliases
                .iter()
                .filter(|alias| alias.chars().count() >= MIN_CONTAINS_ALIAS_LEN)
                .find_map(|alias| {
                    keys.iter()
                        .position(|key| !key.is_empty() && key.contains(alias.as_str()))
                })
        })
}

/// 在行中查找与任一别名匹配的第一列
///
/// # 返回
/// - 第一个匹配列的值（即使为空也不继续查找）
/// - 无匹配: RawValue::Empty
pub fn resolve_column(row: &RawRow, aliases: &[&str]) -> RawValue {
    matching_position(row, aliases)
        .and_then(|idx| row.iter().nth(idx))
        .map(|(_, value)| value.clone())
        .unwrap_or(RawValue::Empty)
}

// ==========================================
// ColumnResolver - 按规范字段解析
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnResolver;

impl ColumnResolver {
    pub fn resolve(&self, row: &RawRow, field: SupplierField) -> RawValue {
        resolve_column(row, aliases_for(field))
    }

    /// 报告表头与字段的对应关系（预览用）
    ///
    /// 返回 (字段, 命中的表头原文)；未命中的字段不出现
    pub fn matched_headers(&self, row: &RawRow) -> Vec<(SupplierField, String)> {
        SupplierField::ALL
            .iter()
            .filter_map(|field| {
                matching_position(row, aliases_for(*field))
                    .and_then(|idx| row.iter().nth(idx))
                    .map(|(header, _)| (*field, header.to_string()))
            })
            .collect()
    }
}
