use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::providers::role_provider::validate_status;
use crate::stores::EntityGraph;
use crate::types::internal::PermissionId;
use crate::types::internal::graph::{NewPermission, PermissionRecord, PermissionUpdate, compose_code};

/// Permission catalogue rules: well-formed codes, immutable once referenced
pub struct PermissionProvider {
    graph: Arc<dyn EntityGraph>,
}

impl PermissionProvider {
    pub fn new(graph: Arc<dyn EntityGraph>) -> Self {
        Self { graph }
    }

    pub async fn create_permission(&self, new_permission: NewPermission) -> Result<PermissionRecord, InternalError> {
        validate_segments(&new_permission.module_name, &new_permission.resource, &new_permission.action)?;
        self.graph.create_permission(new_permission).await
    }

    /// Look up a code, registering it as auto-registered when absent
    pub async fn ensure_registered(&self, code: &str, display_name: &str) -> Result<PermissionRecord, InternalError> {
        if let Some(existing) = self.graph.find_permission_by_code(code).await? {
            return Ok(existing);
        }

        let (module_name, resource, action) = split_code(code)?;
        let created = self
            .create_permission(NewPermission {
                module_name,
                resource,
                action,
                display_name: display_name.to_string(),
                description: String::new(),
                auto_registered: true,
            })
            .await?;
        tracing::info!(code, "permission auto-registered");
        Ok(created)
    }

    pub async fn update_permission(
        &self,
        id: PermissionId,
        changes: PermissionUpdate,
    ) -> Result<PermissionRecord, InternalError> {
        if changes.touches_code() {
            let current = self.graph.get_permission(id).await?;
            validate_segments(
                changes.module_name.as_deref().unwrap_or(&current.module_name),
                changes.resource.as_deref().unwrap_or(&current.resource),
                changes.action.as_deref().unwrap_or(&current.action),
            )?;
        }
        if let Some(status) = &changes.status {
            validate_status(status)?;
        }

        self.graph.update_permission(id, changes).await
    }

    pub async fn delete_permission(&self, id: PermissionId) -> Result<(), InternalError> {
        self.graph.delete_permission(id).await
    }
}

/// Each segment must be non-empty, dot-free and free of whitespace
pub fn validate_segments(module_name: &str, resource: &str, action: &str) -> Result<(), EntityError> {
    for (segment, value) in [("module_name", module_name), ("resource", resource), ("action", action)] {
        if value.is_empty() || value.contains('.') || value.chars().any(char::is_whitespace) {
            return Err(EntityError::InvalidPermissionCode {
                code: compose_code(module_name, resource, action),
                reason: format!("{} must be a non-empty word without dots", segment),
            });
        }
    }
    Ok(())
}

/// Split `<module>.<resource>.<action>` into its segments
pub fn split_code(code: &str) -> Result<(String, String, String), EntityError> {
    let parts: Vec<&str> = code.split('.').collect();
    match parts.as_slice() {
        [module_name, resource, action] => {
            validate_segments(module_name, resource, action)?;
            Ok((module_name.to_string(), resource.to_string(), action.to_string()))
        }
        _ => Err(EntityError::InvalidPermissionCode {
            code: code.to_string(),
            reason: "expected <module>.<resource>.<action>".to_string(),
        }),
    }
}
