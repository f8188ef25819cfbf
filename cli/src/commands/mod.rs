pub mod banner;
pub mod catalog;
pub mod category;
pub mod health;
pub mod imports;
pub mod post;
pub mod privacy;
pub mod stats;
pub mod tool;
pub mod workflow;
