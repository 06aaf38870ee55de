// ==========================================
// Mock 提交仓储 - 用于控制器测试
// ==========================================
// 内存实现，记录每次调用，可按名称注入失败
// 建分类对重名返回 UniqueConstraintViolation（模拟裸插入）
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use supplier_import::domain::{CategoryId, SupplierDraft, SupplierId};
use supplier_import::repository::{RepositoryError, RepositoryResult, SupplierCommitRepository};

#[derive(Debug, Default)]
struct MockState {
    categories: Vec<(String, CategoryId)>,
    suppliers: Vec<(SupplierId, SupplierDraft, String)>,
    links: Vec<(SupplierId, CategoryId)>,
    calls: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MockCommitRepository {
    state: Mutex<MockState>,
    failing_suppliers: HashSet<String>,
    stalling_suppliers: HashSet<String>,
    failing_categories: HashSet<String>,
    fail_list_categories: bool,
    fail_link: bool,
}

impl MockCommitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置已知分类
    pub fn with_categories(self, names: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for name in names {
                let id = CategoryId(format!("cat-{}", state.categories.len() + 1));
                state.categories.push((name.to_string(), id));
            }
        }
        self
    }

    /// 指定名称的供应商插入失败
    pub fn failing_supplier(mut self, name: &str) -> Self {
        self.failing_suppliers.insert(name.to_string());
        self
    }

    /// 指定名称的供应商插入永不完成
    pub fn stalling_supplier(mut self, name: &str) -> Self {
        self.stalling_suppliers.insert(name.to_string());
        self
    }

    /// 指定名称的分类创建失败（非重名错误）
    pub fn failing_category(mut self, name: &str) -> Self {
        self.failing_categories.insert(name.to_string());
        self
    }

    pub fn failing_list_categories(mut self) -> Self {
        self.fail_list_categories = true;
        self
    }

    pub fn failing_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    // ===== 断言辅助 =====

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn supplier_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .suppliers
            .iter()
            .map(|(_, d, _)| d.name.clone())
            .collect()
    }

    pub fn created_by_values(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .suppliers
            .iter()
            .map(|(_, _, by)| by.clone())
            .collect()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .categories
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// 供应商已关联的分类名（按关联顺序）
    pub fn linked_categories(&self, supplier_name: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let supplier_id = match state
            .suppliers
            .iter()
            .find(|(_, d, _)| d.name == supplier_name)
        {
            Some((id, _, _)) => id.clone(),
            None => return Vec::new(),
        };

        state
            .links
            .iter()
            .filter(|(sid, _)| *sid == supplier_id)
            .filter_map(|(_, cid)| {
                state
                    .categories
                    .iter()
                    .find(|(_, id)| id == cid)
                    .map(|(n, _)| n.clone())
            })
            .collect()
    }
}

#[async_trait]
impl SupplierCommitRepository for MockCommitRepository {
    async fn list_categories(&self) -> RepositoryResult<HashSet<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_categories".to_string());

        if self.fail_list_categories {
            return Err(RepositoryError::DatabaseQueryError("categories offline".to_string()));
        }
        Ok(state.categories.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn create_supplier(
        &self,
        draft: &SupplierDraft,
        created_by: &str,
    ) -> RepositoryResult<SupplierId> {
        if self.stalling_suppliers.contains(&draft.name) {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_supplier:{}", draft.name));

        if self.failing_suppliers.contains(&draft.name) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "insert rejected: {}",
                draft.name
            )));
        }

        let id = SupplierId(format!("sup-{}", state.suppliers.len() + 1));
        state
            .suppliers
            .push((id.clone(), draft.clone(), created_by.to_string()));
        Ok(id)
    }

    async fn ensure_category(&self, name: &str) -> RepositoryResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("ensure_category:{}", name));

        if self.failing_categories.contains(name) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "category insert failed: {}",
                name
            )));
        }
        if state.categories.iter().any(|(n, _)| n == name) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "UNIQUE constraint failed: categories.name ({})",
                name
            )));
        }

        let id = CategoryId(format!("cat-{}", state.categories.len() + 1));
        state.categories.push((name.to_string(), id));
        Ok(true)
    }

    async fn resolve_category_ids(
        &self,
        names: &[String],
    ) -> RepositoryResult<HashMap<String, CategoryId>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("resolve_category_ids:{}", names.join(",")));

        Ok(state
            .categories
            .iter()
            .filter(|(n, _)| names.contains(n))
            .map(|(n, id)| (n.clone(), id.clone()))
            .collect())
    }

    async fn link_categories(
        &self,
        supplier_id: &SupplierId,
        category_ids: &[CategoryId],
    ) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("link_categories:{}", supplier_id));

        if self.fail_link {
            return Err(RepositoryError::ForeignKeyViolation(
                "FOREIGN KEY constraint failed".to_string(),
            ));
        }

        for category_id in category_ids {
            state.links.push((supplier_id.clone(), category_id.clone()));
        }
        Ok(())
    }
}
