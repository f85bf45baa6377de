pub mod backend;
pub mod session_file;

pub use backend::HttpBackend;
pub use session_file::FileSessionStorage;
