//! MCP server for OpenProject work package management.
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! a subset of the OpenProject REST API as callable tools for AI
//! assistants like Claude, over stdio transport.
//!
//! # Architecture
//!
//! The server uses the `rmcp` crate for MCP protocol handling and wraps
//! the [`openproject_api::OpenProjectClient`]. Each invocation is an
//! independent pass-through HTTP call; the server holds no state beyond
//! the immutable connection configuration.
//!
//! # Tools
//!
//! ## Project Queries
//! - `list_projects` - List all visible projects
//! - `get_project` - Get one project by id
//!
//! ## Work Package Queries
//! - `list_work_packages` - List every work package in a project
//!   (paginated exhaustively)
//! - `get_work_package` - Get one work package by id
//!
//! ## Work Package Modification
//! - `create_work_package` - Create a work package in a project
//! - `update_work_package` - Update fields with optimistic-lock checking;
//!   status changes are validated against the legal transitions first
//! - `add_comment` - Append a markdown comment to the activity stream
//!
//! ## Workflow
//! - `list_statuses` - Enumerate the instance-wide status catalog
//! - `get_available_statuses` - Current status and legal next statuses
//!   for a work package

pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::OpenProjectMcpServer;
