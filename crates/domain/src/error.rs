use thiserror::Error;

/// 核心错误分类：只有客户端可见的两类，存储错误走 anyhow。
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{kind} {id} doesn't exist")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid {kind} ID format: {id}")]
    InvalidReference { kind: &'static str, id: String },
}

impl DomainError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_reference(kind: &'static str, id: impl Into<String>) -> Self {
        Self::InvalidReference {
            kind,
            id: id.into(),
        }
    }
}
