mod backend;
mod conversions;
mod dev_backend;

pub use backend::HttpBackend;
pub use dev_backend::DevBackend;
