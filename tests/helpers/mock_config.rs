// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use std::error::Error;
use supplier_import::config::ImportConfigReader;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub locale: String,
    pub max_import_rows: usize,
    pub imported_by: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            locale: "pt-BR".to_string(),
            max_import_rows: 5_000,
            imported_by: "import".to_string(),
        }
    }
}

impl MockConfig {
    /// 指定行数上限
    pub fn with_max_rows(max_import_rows: usize) -> Self {
        Self {
            max_import_rows,
            ..Self::default()
        }
    }

    /// 指定操作人
    pub fn with_imported_by(imported_by: &str) -> Self {
        Self {
            imported_by: imported_by.to_string(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.locale.clone())
    }

    async fn get_max_import_rows(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.max_import_rows)
    }

    async fn get_imported_by(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.imported_by.clone())
    }
}
