use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::BearerAuth;
use crate::api::helpers;
use crate::coordinators::UserCoordinator;
use crate::errors::AdminError;
use crate::providers::TokenProvider;
use crate::providers::user_provider::{CreateUserInput, UpdateUserInput};
use crate::types::dto::common::DeletedResponse;
use crate::types::dto::permission::PermissionResponse;
use crate::types::dto::role::RoleResponse;
use crate::types::dto::user::{CreateUserRequest, SetLevelRequest, UpdateUserRequest, UserResponse};

/// User management endpoints
pub struct UsersApi {
    user_coordinator: Arc<UserCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl UsersApi {
    pub fn new(user_coordinator: Arc<UserCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            user_coordinator,
            token_provider,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// User accounts and levels
    Users,
}

#[OpenApi]
impl UsersApi {
    /// Create a user at or below the caller's level
    #[oai(path = "/users", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let body = body.0;
        let input = CreateUserInput {
            username: body.username,
            email: body.email,
            password: body.password,
            level: body.level,
        };

        let user = self.user_coordinator.create_user(&ctx, input).await?;
        Ok(Json(user.into()))
    }

    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list_users(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<UserResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let users = self.user_coordinator.list_users(&ctx).await?;
        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    #[oai(path = "/users/:id", method = "get", tag = "UserTags::Users")]
    async fn get_user(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<UserResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let user = self.user_coordinator.get_user(&ctx, id.0).await?;
        Ok(Json(user.into()))
    }

    /// Change username, email or password (self, or an admin at or above the target's level)
    #[oai(path = "/users/:id", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let body = body.0;
        let input = UpdateUserInput {
            username: body.username,
            email: body.email,
            password: body.password,
        };

        let user = self.user_coordinator.update_user(&ctx, id.0, input).await?;
        Ok(Json(user.into()))
    }

    /// Set a user's level
    #[oai(path = "/users/:id/level", method = "put", tag = "UserTags::Users")]
    async fn set_level(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<SetLevelRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let user = self.user_coordinator.set_level(&ctx, id.0, &body.level).await?;
        Ok(Json(user.into()))
    }

    /// Soft-delete a user
    #[oai(path = "/users/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<DeletedResponse>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        self.user_coordinator.delete_user(&ctx, id.0).await?;
        Ok(Json(DeletedResponse {
            success: true,
            message: format!("user {} deleted", id.0),
        }))
    }

    #[oai(path = "/users/:id/roles", method = "get", tag = "UserTags::Users")]
    async fn roles_of_user(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<Vec<RoleResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let roles = self.user_coordinator.roles_of_user(&ctx, id.0).await?;
        Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
    }

    /// Effective permissions of a user through active roles
    #[oai(path = "/users/:id/permissions", method = "get", tag = "UserTags::Users")]
    async fn permissions_of_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<Vec<PermissionResponse>>, AdminError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let permissions = self.user_coordinator.permissions_of_user(&ctx, id.0).await?;
        Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
    }
}
