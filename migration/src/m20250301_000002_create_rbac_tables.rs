use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Roles::Name).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Roles::DisplayName).string_len(100).not_null())
                    .col(ColumnDef::new(Roles::Description).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(Roles::IsSystem).boolean().not_null().default(false))
                    .col(ColumnDef::new(Roles::Status).string_len(20).not_null().default("active"))
                    .col(ColumnDef::new(Roles::CreatedBy).integer().null())
                    .col(ColumnDef::new(Roles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Roles::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Roles::DeletedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // Create permissions table
        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Permissions::ModuleName).string_len(100).not_null())
                    .col(ColumnDef::new(Permissions::Resource).string_len(100).not_null())
                    .col(ColumnDef::new(Permissions::Action).string_len(100).not_null())
                    .col(ColumnDef::new(Permissions::Code).string_len(500).not_null().unique_key())
                    .col(ColumnDef::new(Permissions::DisplayName).string_len(200).not_null())
                    .col(ColumnDef::new(Permissions::Description).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(Permissions::Status).string_len(20).not_null().default("active"))
                    .col(ColumnDef::new(Permissions::AutoRegistered).boolean().not_null().default(false))
                    .col(ColumnDef::new(Permissions::RegisteredAt).big_integer().null())
                    .col(ColumnDef::new(Permissions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Permissions::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Permissions::DeletedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_permissions_module_name")
                    .table(Permissions::Table)
                    .col(Permissions::ModuleName)
                    .to_owned(),
            )
            .await?;

        // Create user_roles join table
        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRoles::UserId).integer().not_null())
                    .col(ColumnDef::new(UserRoles::RoleId).integer().not_null())
                    .col(ColumnDef::new(UserRoles::CreatedAt).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserRoles::UserId)
                            .col(UserRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_user_id")
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_role_id")
                            .from(UserRoles::Table, UserRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_roles_role_id")
                    .table(UserRoles::Table)
                    .col(UserRoles::RoleId)
                    .to_owned(),
            )
            .await?;

        // Create role_permissions join table
        manager
            .create_table(
                Table::create()
                    .table(RolePermissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RolePermissions::RoleId).integer().not_null())
                    .col(ColumnDef::new(RolePermissions::PermissionId).integer().not_null())
                    .col(ColumnDef::new(RolePermissions::CreatedAt).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(RolePermissions::RoleId)
                            .col(RolePermissions::PermissionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permissions_role_id")
                            .from(RolePermissions::Table, RolePermissions::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permissions_permission_id")
                            .from(RolePermissions::Table, RolePermissions::PermissionId)
                            .to(Permissions::Table, Permissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_role_permissions_permission_id")
                    .table(RolePermissions::Table)
                    .col(RolePermissions::PermissionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    DisplayName,
    Description,
    IsSystem,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    Id,
    ModuleName,
    Resource,
    Action,
    Code,
    DisplayName,
    Description,
    Status,
    AutoRegistered,
    RegisteredAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum UserRoles {
    Table,
    UserId,
    RoleId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RolePermissions {
    Table,
    RoleId,
    PermissionId,
    CreatedAt,
}
