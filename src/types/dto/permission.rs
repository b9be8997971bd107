use poem_openapi::Object;

use crate::types::internal::graph::PermissionRecord;

#[derive(Object, Debug)]
pub struct CreatePermissionRequest {
    pub module_name: String,
    pub resource: String,
    pub action: String,

    /// Defaults to the composed code
    pub display_name: Option<String>,

    pub description: Option<String>,
}

/// Code reported by a module at startup
#[derive(Object, Debug)]
pub struct RegisterPermissionRequest {
    /// `<module>.<resource>.<action>`
    pub code: String,

    /// Defaults to the code; ignored when the code already exists
    pub display_name: Option<String>,
}

/// Segment changes are rejected while any role references the permission
#[derive(Object, Debug)]
pub struct UpdatePermissionRequest {
    pub module_name: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,

    /// `active` or `inactive`
    pub status: Option<String>,
}

#[derive(Object, Debug)]
pub struct PermissionResponse {
    pub id: i32,
    pub code: String,
    pub module_name: String,
    pub resource: String,
    pub action: String,
    pub display_name: String,
    pub description: String,
    pub status: String,
    pub auto_registered: bool,
    pub registered_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PermissionRecord> for PermissionResponse {
    fn from(p: PermissionRecord) -> Self {
        Self {
            id: p.id,
            code: p.code,
            module_name: p.module_name,
            resource: p.resource,
            action: p.action,
            display_name: p.display_name,
            description: p.description,
            status: p.status,
            auto_registered: p.auto_registered,
            registered_at: p.registered_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
