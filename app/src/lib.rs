pub mod config;
pub mod dashboard;
pub mod error;
pub mod gate;
pub mod landing;
pub mod lifecycle;
pub mod navigation;
