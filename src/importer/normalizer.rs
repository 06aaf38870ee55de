// ==========================================
// 供应商目录 - 字段归一化
// ==========================================
// 职责: 单个原始值 → 规范值（州代码 / 类型 / 账号 / 金额 / 分类）
// 约束: 纯函数、全函数，无法映射时透传原值，交由校验器报错
// 约束: 别名表为有序列表，先登记者优先（不使用 HashMap）
// ==========================================

use crate::domain::import::RawValue;
use crate::domain::supplier::{NormalizedKind, SupplierKind};
use once_cell::sync::Lazy;
use regex::Regex;

// ==========================================
// 州别名表（别名 → 州代码）
// ==========================================
// 顺序即优先级: 长名在前（"mato grosso do sul" 先于 "mato grosso"，
// "paraiba"/"parana" 先于 "para"），其次城市别名，最后两位代码
pub const REGION_ALIASES: &[(&str, &str)] = &[
    // 州全称
    ("mato grosso do sul", "MS"),
    ("mato grosso", "MT"),
    ("rio grande do norte", "RN"),
    ("rio grande do sul", "RS"),
    ("rio de janeiro", "RJ"),
    ("sao paulo", "SP"),
    ("minas gerais", "MG"),
    ("espirito santo", "ES"),
    ("santa catarina", "SC"),
    ("distrito federal", "DF"),
    ("paraiba", "PB"),
    ("parana", "PR"),
    ("para", "PA"),
    ("pernambuco", "PE"),
    ("bahia", "BA"),
    ("goias", "GO"),
    ("acre", "AC"),
    ("alagoas", "AL"),
    ("amapa", "AP"),
    ("amazonas", "AM"),
    ("ceara", "CE"),
    ("maranhao", "MA"),
    ("piaui", "PI"),
    ("rondonia", "RO"),
    ("roraima", "RR"),
    ("sergipe", "SE"),
    ("tocantins", "TO"),
    // 城市 / 俗称
    ("belo horizonte", "MG"),
    ("porto alegre", "RS"),
    ("florianopolis", "SC"),
    ("juazeiro do norte", "CE"),
    ("curitiba", "PR"),
    ("salvador", "BA"),
    ("recife", "PE"),
    ("fortaleza", "CE"),
    ("brasilia", "DF"),
    ("goiania", "GO"),
    ("manaus", "AM"),
    ("belem", "PA"),
    ("vitoria", "ES"),
    ("niteroi", "RJ"),
    ("limeira", "SP"),
    ("campinas", "SP"),
    ("guarulhos", "SP"),
    ("sampa", "SP"),
    ("minas", "MG"),
    ("rio", "RJ"),
    ("poa", "RS"),
    ("bh", "MG"),
    // 两位代码
    ("ac", "AC"),
    ("al", "AL"),
    ("ap", "AP"),
    ("am", "AM"),
    ("ba", "BA"),
    ("ce", "CE"),
    ("df", "DF"),
    ("es", "ES"),
    ("go", "GO"),
    ("ma", "MA"),
    ("mt", "MT"),
    ("ms", "MS"),
    ("mg", "MG"),
    ("pa", "PA"),
    ("pb", "PB"),
    ("pr", "PR"),
    ("pe", "PE"),
    ("pi", "PI"),
    ("rj", "RJ"),
    ("rn", "RN"),
    ("rs", "RS"),
    ("ro", "RO"),
    ("rr", "RR"),
    ("sc", "SC"),
    ("sp", "SP"),
    ("se", "SE"),
    ("to", "TO"),
];

// ==========================================
// 类型同义词表
// ==========================================
pub const KIND_SYNONYMS: &[(&str, SupplierKind)] = &[
    ("fabricante", SupplierKind::Manufacturer),
    ("fabrica", SupplierKind::Manufacturer),
    ("fabricacao", SupplierKind::Manufacturer),
    ("industria", SupplierKind::Manufacturer),
    ("manufatura", SupplierKind::Manufacturer),
    ("produtor", SupplierKind::Manufacturer),
    ("manufacturer", SupplierKind::Manufacturer),
    ("atacadista", SupplierKind::Wholesaler),
    ("atacado", SupplierKind::Wholesaler),
    ("distribuidor", SupplierKind::Wholesaler),
    ("distribuidora", SupplierKind::Wholesaler),
    ("revendedor", SupplierKind::Wholesaler),
    ("revenda", SupplierKind::Wholesaler),
    ("importador", SupplierKind::Wholesaler),
    ("importadora", SupplierKind::Wholesaler),
    ("wholesaler", SupplierKind::Wholesaler),
    ("wholesale", SupplierKind::Wholesaler),
    ("distributor", SupplierKind::Wholesaler),
];

// 子串匹配的最短长度: 两位代码只参与精确匹配
const MIN_SUBSTRING_LEN: usize = 3;

// 关键词启发式（输入已转小写并去重音）
static MANUFACTURING_ROOTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"fabri|indust|manufa|produ|confec|ourives|joalheri").expect("valid regex")
});
static DISTRIBUTION_ROOTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"atac|distrib|revend|wholesal|import|varej").expect("valid regex"));

// 社交平台链接前缀
static HANDLE_URL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(instagram\.com|instagr\.am)/").expect("valid regex")
});

// 1.500 / 12.345.678 形式的千分位
static DOT_THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+$").expect("valid regex"));

// ==========================================
// 文本辅助
// ==========================================

/// 去除葡语常见重音（输入应已小写）
pub(crate) fn fold_accents(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// 小写 + 去重音 + TRIM + 合并连续空白
fn match_key(raw: &str) -> String {
    fold_accents(&raw.to_lowercase())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 有序别名表查找: 精确 → 子串（双向）
fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    if key.is_empty() {
        return None;
    }

    if let Some((_, value)) = table.iter().find(|(alias, _)| *alias == key) {
        return Some(*value);
    }

    table
        .iter()
        .find(|(alias, _)| {
            (alias.len() >= MIN_SUBSTRING_LEN && key.contains(alias))
                || (key.len() >= MIN_SUBSTRING_LEN && alias.contains(key))
        })
        .map(|(_, value)| *value)
}

// ==========================================
// 州代码
// ==========================================
pub fn normalize_region(raw: &str) -> String {
    let key = match_key(raw);

    if let Some(code) = lookup(REGION_ALIASES, &key) {
        return code.to_string();
    }

    // 兜底: 已是两位则直接大写，否则截断为两位（可能不准确，校验器只检查长度）
    let trimmed = raw.trim();
    if trimmed.chars().count() == 2 {
        trimmed.to_uppercase()
    } else {
        trimmed.to_uppercase().chars().take(2).collect()
    }
}

// ==========================================
// 供应商类型
// ==========================================
pub fn normalize_kind(raw: &str) -> NormalizedKind {
    let key = match_key(raw);

    if let Some(kind) = lookup(KIND_SYNONYMS, &key) {
        return NormalizedKind::Known(kind);
    }

    if !key.is_empty() {
        if MANUFACTURING_ROOTS.is_match(&key) {
            return NormalizedKind::Known(SupplierKind::Manufacturer);
        }
        if DISTRIBUTION_ROOTS.is_match(&key) {
            return NormalizedKind::Known(SupplierKind::Wholesaler);
        }
    }

    NormalizedKind::Unrecognized(raw.trim().to_string())
}

// ==========================================
// 社交账号（幂等）
// ==========================================
pub fn normalize_handle(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let without_url = HANDLE_URL_PREFIX.replace(&compact, "");

    // 去掉链接参数（?igshid=...）
    let without_query = without_url
        .split('?')
        .next()
        .unwrap_or_default();

    let trimmed = without_query.trim_end_matches('/');
    let username = trimmed.strip_prefix('@').unwrap_or(trimmed);

    format!("@{}", username)
}

// ==========================================
// 金额 / 数量
// ==========================================
pub fn extract_number(raw: &RawValue) -> f64 {
    match raw {
        RawValue::Number(n) if n.is_finite() => *n,
        RawValue::Number(_) | RawValue::Empty => 0.0,
        RawValue::Text(text) => parse_localized_number(text),
    }
}

fn parse_localized_number(text: &str) -> f64 {
    // 去掉货币符号、空白及其他非数字字符
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // 两种分隔符都有: 靠后的是小数点
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if cleaned.matches(',').count() > 1 => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        (None, Some(_)) if DOT_THOUSANDS.is_match(&cleaned) => cleaned.replace('.', ""),
        _ => cleaned,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

// ==========================================
// 分类
// ==========================================
pub fn normalize_categories(raw: &RawValue) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.to_string()
        .split([',', ';', '|'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(title_case)
        .collect()
}

/// 首字母大写，其余小写
fn title_case(piece: &str) -> String {
    let mut chars = piece.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_region_alias_maps_to_its_code() {
        for (alias, code) in REGION_ALIASES {
            // 精确命中时返回该别名首次登记的代码
            let expected = REGION_ALIASES
                .iter()
                .find(|(a, _)| a == alias)
                .map(|(_, c)| *c)
                .unwrap();
            assert_eq!(expected, *code, "别名重复登记: {}", alias);

            assert_eq!(normalize_region(alias), *code, "alias: {}", alias);
            assert_eq!(
                normalize_region(&format!("  {}  ", alias.to_uppercase())),
                *code,
                "alias: {}",
                alias
            );
        }
    }

    #[test]
    fn test_region_accents_and_spacing() {
        assert_eq!(normalize_region("São Paulo"), "SP");
        assert_eq!(normalize_region("Espírito   Santo"), "ES");
        assert_eq!(normalize_region("Goiânia"), "GO");
        assert_eq!(normalize_region("sp"), "SP");
    }

    #[test]
    fn test_region_substring_prefers_first_registered() {
        // "estado do paraná" 应命中 parana 而不是 para
        assert_eq!(normalize_region("Estado do Paraná"), "PR");
        assert_eq!(normalize_region("Mato Grosso do Sul - Campo Grande"), "MS");
        assert_eq!(normalize_region("Interior de Minas"), "MG");
    }

    #[test]
    fn test_region_fallbacks() {
        // 未知两位代码: 直接大写
        assert_eq!(normalize_region("xx"), "XX");
        // 未知长文本: 截断
        assert_eq!(normalize_region("Lisboa"), "LI");
        assert_eq!(normalize_region(""), "");
    }

    #[test]
    fn test_kind_synonyms_and_heuristics() {
        assert_eq!(
            normalize_kind("Fabricante"),
            NormalizedKind::Known(SupplierKind::Manufacturer)
        );
        assert_eq!(
            normalize_kind("  ATACADO "),
            NormalizedKind::Known(SupplierKind::Wholesaler)
        );
        assert_eq!(
            normalize_kind("Indústria"),
            NormalizedKind::Known(SupplierKind::Manufacturer)
        );
        // 子串
        assert_eq!(
            normalize_kind("fab"),
            NormalizedKind::Known(SupplierKind::Manufacturer)
        );
        // 关键词启发式
        assert_eq!(
            normalize_kind("Confecção própria"),
            NormalizedKind::Known(SupplierKind::Manufacturer)
        );
        assert_eq!(
            normalize_kind("Varejo e atacarejo"),
            NormalizedKind::Known(SupplierKind::Wholesaler)
        );
    }

    #[test]
    fn test_kind_unrecognized_keeps_raw() {
        assert_eq!(
            normalize_kind(" Loja física "),
            NormalizedKind::Unrecognized("Loja física".to_string())
        );
        assert_eq!(normalize_kind(""), NormalizedKind::Unrecognized(String::new()));
    }

    #[test]
    fn test_handle_variants() {
        assert_eq!(normalize_handle("@pratas_cy"), "@pratas_cy");
        assert_eq!(normalize_handle("Pratas_CY"), "@pratas_cy");
        assert_eq!(
            normalize_handle("https://www.instagram.com/pratas_cy/"),
            "@pratas_cy"
        );
        assert_eq!(
            normalize_handle("instagram.com/pratas_cy?igshid=abc123"),
            "@pratas_cy"
        );
        assert_eq!(normalize_handle(" @ pratas cy "), "@pratascy");
        assert_eq!(normalize_handle(""), "@");
    }

    #[test]
    fn test_handle_is_idempotent() {
        let inputs = [
            "@pratas_cy",
            "https://instagram.com/@Foo/",
            "x/ /",
            "@ @foo",
            "@",
            "",
            "///",
            "http://www.instagram.com/a?b=c",
            "  MiXeD Case  ",
        ];
        for input in inputs {
            let once = normalize_handle(input);
            assert_eq!(normalize_handle(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_extract_number_formats() {
        assert_eq!(extract_number(&RawValue::Number(500.0)), 500.0);
        assert_eq!(extract_number(&RawValue::from("R$ 500")), 500.0);
        assert_eq!(extract_number(&RawValue::from("R$ 1.500,50")), 1500.5);
        assert_eq!(extract_number(&RawValue::from("1,500.50")), 1500.5);
        assert_eq!(extract_number(&RawValue::from("1.500")), 1500.0);
        assert_eq!(extract_number(&RawValue::from("250,75")), 250.75);
        assert_eq!(extract_number(&RawValue::from("99.9")), 99.9);
    }

    #[test]
    fn test_extract_number_never_fails() {
        assert_eq!(extract_number(&RawValue::from("sem mínimo")), 0.0);
        assert_eq!(extract_number(&RawValue::from("--")), 0.0);
        assert_eq!(extract_number(&RawValue::Empty), 0.0);
        assert_eq!(extract_number(&RawValue::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn test_normalize_categories_order_and_case() {
        assert_eq!(
            normalize_categories(&RawValue::from("Prata, ouro ; folheado")),
            vec!["Prata", "Ouro", "Folheado"]
        );
        assert_eq!(
            normalize_categories(&RawValue::from("PRATA|| prata")),
            vec!["Prata", "Prata"]
        );
        assert!(normalize_categories(&RawValue::Empty).is_empty());
        assert!(normalize_categories(&RawValue::from(" ; , ")).is_empty());
    }
}
