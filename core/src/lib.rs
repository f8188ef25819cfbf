//! Catalog consistency engine for the admin console: payload validation,
//! the bulk import planner and committer, the tool/category relationship
//! maintainer and single-entity catalog operations.

pub mod catalog;
pub mod error;
pub mod feedback;
pub mod import;
pub mod model;
pub mod relationships;
pub mod store;
pub mod validation;
