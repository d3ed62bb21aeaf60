mod decode;
pub use decode::ScanTarget;

mod generator;
pub use generator::{
    BindOrder, BoundInsert, BoundQuery, BoundUpdate, Generator, IdentityStrategy, Placeholder,
    TransactionOp, TypeClass,
};

mod render;

mod postgres;
pub use postgres::Postgres;

mod sqlite;
pub use sqlite::Sqlite;
