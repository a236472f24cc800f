pub mod api_endpoint;
pub mod config;
pub mod constants;
pub mod text_panels;
pub mod uploaded_audio;
