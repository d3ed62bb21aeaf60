use crate::{Generator, Placeholder};

/// The reference dialect. SQLite is close to the base capability table:
/// it keeps the base rendering, ANSI-ish type names, and driver-reported
/// last-insert-id, overriding only the placeholder spelling.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite;

impl Generator for Sqlite {
    fn placeholder(&self) -> Placeholder {
        Placeholder::QuestionNumbered
    }
}
