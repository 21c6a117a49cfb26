pub mod context;
pub mod error;

pub use context::{AppContext, ReaderSession};
pub use error::{MushafError, Result};
