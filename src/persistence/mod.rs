pub mod bridge;
pub mod codec;
pub mod error;
pub mod files;
pub mod storage;

pub use bridge::PersistenceBridge;
pub use error::ImportError;
pub use files::{atomic_write, ensure_data_dir, export_file_name, init_local_data_dir, log_file};
pub use storage::{FileStore, MemoryStore};
