pub mod audit;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod filters;
pub mod media;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod serializers;
pub mod services;
pub mod state;
pub mod validation;
