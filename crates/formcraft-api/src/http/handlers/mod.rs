//! HTTP request handlers for the REST API.

pub mod backup;
pub mod blobs;
pub mod collect;
pub mod design;
pub mod embed;
pub mod forms;
pub mod health;
pub mod submit;
