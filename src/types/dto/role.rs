use poem_openapi::Object;

use crate::types::internal::graph::RoleRecord;

#[derive(Object, Debug)]
pub struct CreateRoleRequest {
    /// Unique role name
    pub name: String,

    /// Defaults to `name`
    pub display_name: Option<String>,

    pub description: Option<String>,

    /// System roles can only be created or changed by a super_admin
    #[oai(default)]
    pub is_system: bool,
}

#[derive(Object, Debug)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,

    /// `active` or `inactive`
    pub status: Option<String>,
}

#[derive(Object, Debug)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub is_system: bool,
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<RoleRecord> for RoleResponse {
    fn from(r: RoleRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            display_name: r.display_name,
            description: r.description,
            is_system: r.is_system,
            status: r.status,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
