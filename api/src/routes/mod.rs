pub mod banners;
pub mod categories;
pub mod health;
pub mod imports;
pub mod posts;
pub mod settings;
pub mod stats;
pub mod tools;
pub mod workflows;

use serde::Deserialize;

/// `?search=` filter shared by the listing endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring filter
    pub search: Option<String>,
}
