// ==========================================
// 供应商目录 - 供应商提交 Repository Trait
// ==========================================
// 职责: 定义导入提交阶段所需的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::supplier::{CategoryId, SupplierDraft, SupplierId};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

// ==========================================
// SupplierCommitRepository Trait
// ==========================================
// 用途: 导入控制器的持久化协作者
// 实现者: SupplierCommitRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait SupplierCommitRepository: Send + Sync {
    /// 当前已知分类名（每批次提交前读取一次）
    async fn list_categories(&self) -> RepositoryResult<HashSet<String>>;

    /// 插入供应商
    ///
    /// # 参数
    /// - draft: 已校验的草稿（kind 必须为 Known）
    /// - created_by: 写入 created_by 列
    ///
    /// # 返回
    /// - Ok(SupplierId): 新记录 ID
    async fn create_supplier(
        &self,
        draft: &SupplierDraft,
        created_by: &str,
    ) -> RepositoryResult<SupplierId>;

    /// 确保分类存在（不存在则创建，已存在不算错误）
    ///
    /// # 返回
    /// - Ok(true): 本次新建
    /// - Ok(false): 已存在
    async fn ensure_category(&self, name: &str) -> RepositoryResult<bool>;

    /// 分类名 → 分类 ID（未找到的名称不出现在结果中）
    async fn resolve_category_ids(
        &self,
        names: &[String],
    ) -> RepositoryResult<HashMap<String, CategoryId>>;

    /// 插入供应商-分类关联
    async fn link_categories(
        &self,
        supplier_id: &SupplierId,
        category_ids: &[CategoryId],
    ) -> RepositoryResult<()>;
}
