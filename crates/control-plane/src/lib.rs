// Schedulink Control Plane Library
// Decision: Shared library for binaries (API server, OpenAPI export)

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Router assembly and server configuration
pub mod app;
pub mod config;

// Services layer
pub mod services;
pub use services::Services;

// Storage layer
pub mod storage;

// OpenAPI document generation
pub mod openapi;
