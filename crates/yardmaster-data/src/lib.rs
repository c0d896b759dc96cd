pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, LayoutData, load_layout, write_layout};
