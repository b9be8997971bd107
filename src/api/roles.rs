use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::BearerAuth;
use crate::api::helpers;
use crate::coordinators::AdminCoordinator;
use crate::errors::AdminError;
use crate::providers::TokenProvider;
use crate::providers::role_provider::CreateRoleInput;
use crate::types::dto::common::{DeletedResponse, MembershipResponse};
use crate::types::dto::permission::PermissionResponse;
use crate::types::dto::role::{CreateRoleRequest, RoleResponse, UpdateRoleRequest};
use crate::types::dto::user::UserResponse;
use crate::types::internal::graph::RoleUpdate;

/// Role management and user-role assignment endpoints
pub struct RolesApi {
    admin_coordinator: Arc<AdminCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl RolesApi {
    pub fn new(admin_coordinator: Arc<AdminCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            admin_coordinator,
            token_provider,
        }
    }
}

#[derive(Tags)]
enum RoleTags {
    /// Roles and role membership
    Roles,
}

#[OpenApi]
impl RolesApi {
    #[oai(path = "/roles", method = "post", tag = "RoleTags::Roles")]
    async fn create_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateRoleRequest>,
    ) -> Result<Json<RoleResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let body = body.0;
        let input = CreateRoleInput {
            name: body.name,
            display_name: body.display_name.unwrap_or_default(),
            description: body.description.unwrap_or_default(),
            is_system: body.is_system,
        };

        let role = self.admin_coordinator.create_role(&ctx, input).await?;
        Ok(Json(role.into()))
    }

    #[oai(path = "/roles", method = "get", tag = "RoleTags::Roles")]
    async fn list_roles(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<RoleResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let roles = self.admin_coordinator.list_roles(&ctx).await?;
        Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
    }

    #[oai(path = "/roles/:id", method = "get", tag = "RoleTags::Roles")]
    async fn get_role(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<RoleResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let role = self.admin_coordinator.get_role(&ctx, id.0).await?;
        Ok(Json(role.into()))
    }

    #[oai(path = "/roles/:id", method = "put", tag = "RoleTags::Roles")]
    async fn update_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateRoleRequest>,
    ) -> Result<Json<RoleResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let body = body.0;
        let changes = RoleUpdate {
            name: body.name,
            display_name: body.display_name,
            description: body.description,
            status: body.status,
        };

        let role = self.admin_coordinator.update_role(&ctx, id.0, changes).await?;
        Ok(Json(role.into()))
    }

    /// Soft-delete a role; its name stays reserved
    #[oai(path = "/roles/:id", method = "delete", tag = "RoleTags::Roles")]
    async fn delete_role(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<DeletedResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        self.admin_coordinator.delete_role(&ctx, id.0).await?;
        Ok(Json(DeletedResponse {
            success: true,
            message: format!("role {} deleted", id.0),
        }))
    }

    #[oai(path = "/roles/:id/users", method = "get", tag = "RoleTags::Roles")]
    async fn users_of_role(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<Vec<UserResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let users = self.admin_coordinator.users_of_role(&ctx, id.0).await?;
        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    #[oai(path = "/roles/:id/permissions", method = "get", tag = "RoleTags::Roles")]
    async fn permissions_of_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<Vec<PermissionResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let permissions = self.admin_coordinator.permissions_of_role(&ctx, id.0).await?;
        Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
    }

    /// Assign the role to a user (idempotent)
    #[oai(path = "/roles/:id/users/:user_id", method = "post", tag = "RoleTags::Roles")]
    async fn assign_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        user_id: Path<i32>,
    ) -> Result<Json<MembershipResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let change = self.admin_coordinator.assign_role(&ctx, id.0, user_id.0).await?;
        Ok(Json(change.into()))
    }

    /// Revoke the role from a user; revoking an absent pair succeeds
    #[oai(path = "/roles/:id/users/:user_id", method = "delete", tag = "RoleTags::Roles")]
    async fn revoke_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        user_id: Path<i32>,
    ) -> Result<Json<MembershipResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let change = self.admin_coordinator.revoke_role(&ctx, id.0, user_id.0).await?;
        Ok(Json(change.into()))
    }
}
