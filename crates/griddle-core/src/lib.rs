mod error;
pub use error::Error;

pub mod driver;
pub use driver::Connection;

pub mod record;
pub use record::Record;

pub mod schema;
pub use schema::Schema;

pub mod value;
pub use value::Value;

/// A Result type alias that uses Griddle's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
