//! `tasks-handler` is an AWS Lambda function serving a small task CRUD API.
//!
//! API Gateway (HTTP API v2 or REST API v1) delivers a proxy event; the handler normalizes it,
//! routes it to one of five operations and answers with a proxy response. Tasks live in a
//! DynamoDB table keyed by `id`.
//!
//! Core modules:
//! - [`config`]: handler configuration read from the Lambda environment
//! - [`event`]: normalizes both API Gateway event shapes into a [`event::TaskRequest`]
//! - [`task`]: the task record and request body
//! - [`store`]: storage abstraction + in-memory implementation
//! - [`dynamodb`]: DynamoDB implementation of [`store::TaskStore`]
//! - [`router`]: operation classification and dispatch
//! - [`response`]: proxy response shape

pub mod config;
pub mod dynamodb;
pub mod event;
pub mod response;
pub mod router;
pub mod store;
pub mod task;

pub use router::handle_event;
