use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::BearerAuth;
use crate::api::helpers;
use crate::coordinators::AdminCoordinator;
use crate::errors::AdminError;
use crate::providers::TokenProvider;
use crate::types::dto::common::{DeletedResponse, MembershipResponse};
use crate::types::dto::permission::{CreatePermissionRequest, PermissionResponse, RegisterPermissionRequest, UpdatePermissionRequest};
use crate::types::dto::role::RoleResponse;
use crate::types::internal::graph::{NewPermission, PermissionUpdate, compose_code};

/// Permission catalogue and role-permission grant endpoints
pub struct PermissionsApi {
    admin_coordinator: Arc<AdminCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl PermissionsApi {
    pub fn new(admin_coordinator: Arc<AdminCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            admin_coordinator,
            token_provider,
        }
    }
}

#[derive(Tags)]
enum PermissionTags {
    /// Permission catalogue and grants
    Permissions,
}

#[OpenApi]
impl PermissionsApi {
    /// Register a permission; its code is `<module>.<resource>.<action>`
    #[oai(path = "/permissions", method = "post", tag = "PermissionTags::Permissions")]
    async fn create_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreatePermissionRequest>,
    ) -> Result<Json<PermissionResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let body = body.0;
        let display_name = body
            .display_name
            .unwrap_or_else(|| compose_code(&body.module_name, &body.resource, &body.action));

        let new_permission = NewPermission {
            module_name: body.module_name,
            resource: body.resource,
            action: body.action,
            display_name,
            description: body.description.unwrap_or_default(),
            auto_registered: false,
        };

        let permission = self.admin_coordinator.create_permission(&ctx, new_permission).await?;
        Ok(Json(permission.into()))
    }

    /// Register a code if absent; existing codes are returned unchanged
    #[oai(path = "/permissions/register", method = "post", tag = "PermissionTags::Permissions")]
    async fn register_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<RegisterPermissionRequest>,
    ) -> Result<Json<PermissionResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let body = body.0;
        let display_name = body.display_name.unwrap_or_else(|| body.code.clone());

        let permission = self
            .admin_coordinator
            .register_permission(&ctx, &body.code, &display_name)
            .await?;
        Ok(Json(permission.into()))
    }

    #[oai(path = "/permissions", method = "get", tag = "PermissionTags::Permissions")]
    async fn list_permissions(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<PermissionResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let permissions = self.admin_coordinator.list_permissions(&ctx).await?;
        Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
    }

    #[oai(path = "/permissions/:id", method = "get", tag = "PermissionTags::Permissions")]
    async fn get_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<PermissionResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let permission = self.admin_coordinator.get_permission(&ctx, id.0).await?;
        Ok(Json(permission.into()))
    }

    #[oai(path = "/permissions/:id", method = "put", tag = "PermissionTags::Permissions")]
    async fn update_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdatePermissionRequest>,
    ) -> Result<Json<PermissionResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let body = body.0;
        let changes = PermissionUpdate {
            module_name: body.module_name,
            resource: body.resource,
            action: body.action,
            display_name: body.display_name,
            description: body.description,
            status: body.status,
        };

        let permission = self.admin_coordinator.update_permission(&ctx, id.0, changes).await?;
        Ok(Json(permission.into()))
    }

    /// Soft-delete a permission; its code stays reserved
    #[oai(path = "/permissions/:id", method = "delete", tag = "PermissionTags::Permissions")]
    async fn delete_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<DeletedResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        self.admin_coordinator.delete_permission(&ctx, id.0).await?;
        Ok(Json(DeletedResponse {
            success: true,
            message: format!("permission {} deleted", id.0),
        }))
    }

    #[oai(path = "/permissions/:id/roles", method = "get", tag = "PermissionTags::Permissions")]
    async fn roles_of_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<Vec<RoleResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let roles = self.admin_coordinator.roles_of_permission(&ctx, id.0).await?;
        Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
    }

    /// Grant the permission to a role (idempotent)
    #[oai(path = "/permissions/:id/roles/:role_id", method = "post", tag = "PermissionTags::Permissions")]
    async fn grant_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        role_id: Path<i32>,
    ) -> Result<Json<MembershipResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let change = self.admin_coordinator.grant_permission(&ctx, id.0, role_id.0).await?;
        Ok(Json(change.into()))
    }

    #[oai(path = "/permissions/:id/roles/:role_id", method = "delete", tag = "PermissionTags::Permissions")]
    async fn revoke_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        role_id: Path<i32>,
    ) -> Result<Json<MembershipResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let change = self.admin_coordinator.revoke_permission(&ctx, id.0, role_id.0).await?;
        Ok(Json(change.into()))
    }
}
