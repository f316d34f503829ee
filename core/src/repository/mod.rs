pub mod file;
pub mod traits;

pub use file::FileDataSource;
pub use traits::DataSource;
