#![allow(dead_code)]

use griddle::driver::{Connection, ExecResponse, Rows};
use griddle::schema::{Column, Table};
use griddle::{Record, Schema, Value};

use griddle_core::async_trait;

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

/// A scripted connection: records every statement it is handed and replies
/// with canned responses, so tests can assert on rendered SQL, bind
/// arguments, and transaction boundaries without a live database.
#[derive(Debug, Default)]
pub struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
pub struct MockState {
    /// Every statement executed, in order, with its bind arguments
    pub log: Vec<(String, Vec<Value>)>,

    /// Queued replies for non-transaction `exec` calls; an empty queue
    /// replies with one row affected and no insert id
    pub exec: VecDeque<Result<ExecResponse, String>>,

    /// Queued replies for `query` calls; an empty queue replies with an
    /// empty result set
    pub query: VecDeque<Result<Rows, String>>,

    /// 1-based index of the `exec` call to park on its first poll
    pub pend_on_exec: Option<usize>,

    exec_calls: usize,
}

/// Pends once, so a test can observe an operation mid-flight and drop it.
#[derive(Debug, Default)]
struct YieldOnce {
    yielded: bool,
}

impl std::future::Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockConnection {
    pub fn new() -> (Self, MockHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: state.clone(),
            },
            MockHandle { state },
        )
    }
}

impl MockHandle {
    pub fn push_exec(&self, rows_affected: u64, last_insert_id: Option<i64>) {
        self.state.lock().unwrap().exec.push_back(Ok(ExecResponse {
            rows_affected,
            last_insert_id,
        }));
    }

    pub fn push_exec_error(&self, message: &str) {
        self.state
            .lock()
            .unwrap()
            .exec
            .push_back(Err(message.to_string()));
    }

    pub fn push_query(&self, rows: Rows) {
        self.state.lock().unwrap().query.push_back(Ok(rows));
    }

    /// Park the `n`th executed statement (1-based) before it is logged,
    /// leaving its future pending at that point.
    pub fn pend_on_exec(&self, n: usize) {
        self.state.lock().unwrap().pend_on_exec = Some(n);
    }

    /// The executed statements, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    /// Bind arguments of the `i`th executed statement.
    pub fn params(&self, i: usize) -> Vec<Value> {
        self.state.lock().unwrap().log[i].1.clone()
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn exec(&mut self, sql: &str, params: &[Value]) -> griddle::Result<ExecResponse> {
        let parked = {
            let mut state = self.state.lock().unwrap();
            state.exec_calls += 1;
            state.pend_on_exec == Some(state.exec_calls)
        };
        if parked {
            YieldOnce::default().await;
        }

        let mut state = self.state.lock().unwrap();
        state.log.push((sql.to_string(), params.to_vec()));

        if matches!(sql, "BEGIN" | "COMMIT" | "ROLLBACK") {
            return Ok(ExecResponse::default());
        }

        match state.exec.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(griddle_core::err!("{message}")),
            None => Ok(ExecResponse {
                rows_affected: 1,
                last_insert_id: None,
            }),
        }
    }

    async fn query(&mut self, sql: &str, params: &[Value]) -> griddle::Result<Rows> {
        let mut state = self.state.lock().unwrap();
        state.log.push((sql.to_string(), params.to_vec()));

        match state.query.pop_front() {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(griddle_core::err!("{message}")),
            None => Ok(Rows::default()),
        }
    }
}

/// `people(PersonID identity, Name text)` with a `pets` child table.
pub fn people_schema() -> Schema {
    let mut schema = Schema::new();

    let mut people = Table::new("people", "PersonID");
    people.add_column(Column::identity("PersonID", "INTEGER"));
    people.add_column(Column::new("Name", "TEXT"));
    people.essential_columns = vec!["PersonID".into(), "Name".into()];
    people.children = vec!["pets".into()];
    schema.add_table(people);

    let mut pets = Table::new("pets", "PetID");
    pets.add_column(Column::identity("PetID", "INTEGER"));
    pets.add_column(Column::new("PersonID", "INTEGER").numeric().foreign_key());
    pets.add_column(Column::new("Name", "TEXT"));
    pets.essential_columns = vec!["PetID".into(), "PersonID".into(), "Name".into()];
    pets.parent_tables = vec!["people".into()];
    schema.add_table(pets);

    schema
}

pub fn person(name: &str) -> Record {
    let mut record = Record::new("people");
    record.set("Name", name);
    record
}
