// Types layer
//
// db: sea-orm entities; dto: poem-openapi request/response objects;
// internal: domain types shared by stores, providers and coordinators.
pub mod db;
pub mod dto;
pub mod internal;
