mod api;
mod config;
mod error;

pub mod data_objects;
pub mod helpers;

pub use api::{ProductApi, ShopifyApi};
pub use config::ShopifyConfig;
pub use data_objects::{ImageInput, Location, Product, ProductInput, Variant, VariantInput};
pub use error::ShopifyApiError;
