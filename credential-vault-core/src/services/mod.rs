//! 业务逻辑服务层

mod credential_service;
mod duplicate_checker;
mod health_service;
mod import_export_service;

pub use credential_service::CredentialService;
pub use duplicate_checker::DuplicateChecker;
pub use health_service::HealthService;
pub use import_export_service::{render_error_report, ImportExportService, CSV_COLUMNS};

use std::sync::Arc;

use crate::traits::CredentialRepository;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    credential_repository: Arc<dyn CredentialRepository>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(credential_repository: Arc<dyn CredentialRepository>) -> Self {
        Self {
            credential_repository,
        }
    }

    /// 凭证仓库
    #[must_use]
    pub fn credential_repository(&self) -> &Arc<dyn CredentialRepository> {
        &self.credential_repository
    }
}
