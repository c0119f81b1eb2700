pub mod categories;
pub mod envelope;
pub mod error;
pub mod service;

pub use categories::*;
pub use envelope::*;
pub use error::*;
pub use service::*;
