use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use proptest::{collection::SizeRange, prelude::*};
use tally_api::v1::{Todo, TodoFields};
use tokio::sync::Notify;

use crate::{api::RemoteTodos, error::ClientError};

pub fn todo(id: u64, text: &str, completed: bool, user_id: u64) -> Todo {
    Todo {
        id,
        text: text.to_owned(),
        completed,
        user_id,
    }
}

pub fn fields(text: &str, completed: bool, user_id: u64) -> TodoFields {
    TodoFields {
        text: text.to_owned(),
        completed,
        user_id,
    }
}

/// Todos with unique ids in arbitrary order.
pub fn collection(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::btree_map(
        1u64..200,
        ("[a-zA-Z ]{1,10}", any::<bool>(), 1u64..10),
        size,
    )
    .prop_map(|todos| {
        todos
            .into_iter()
            .map(|(id, (text, completed, user_id))| todo(id, &text, completed, user_id))
            .collect::<Vec<_>>()
    })
    .prop_shuffle()
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

/// Answers like the real service, except that it trims text on update and
/// can be told to fail or to hold mutations until a gate is opened.
#[derive(Debug)]
pub struct MockRemote {
    seed: Vec<Todo>,
    next_id: AtomicU64,
    failures: AtomicUsize,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    renumber: Option<u64>,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self {
            seed: Vec::new(),
            next_id: AtomicU64::new(1),
            failures: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            gate: None,
            renumber: None,
        }
    }
}

impl MockRemote {
    pub fn seeded(seed: Vec<Todo>) -> Self {
        let next_id = seed.iter().map(|todo| todo.id).max().unwrap_or(0) + 1;

        Self {
            seed,
            next_id: AtomicU64::new(next_id),
            ..Self::default()
        }
    }

    pub fn with_next_id(next_id: u64) -> Self {
        Self {
            next_id: AtomicU64::new(next_id),
            ..Self::default()
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    /// Answers every update as if it were for todo `id`.
    pub fn renumbering(id: u64) -> Self {
        Self {
            renumber: Some(id),
            ..Self::default()
        }
    }

    /// Makes the next `count` calls fail with a decode error.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn settle(&self) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        match failing {
            true => Err(serde_json::from_str::<Todo>("not json").unwrap_err().into()),
            false => Ok(()),
        }
    }
}

impl RemoteTodos for MockRemote {
    async fn list_all(&self) -> Result<Vec<Todo>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(serde_json::from_str::<Todo>("").unwrap_err().into());
        }

        Ok(self.seed.clone())
    }

    async fn create(&self, fields: TodoFields) -> Result<Todo, ClientError> {
        self.settle().await?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Todo::with_fields(id, fields))
    }

    async fn update(&self, id: u64, fields: TodoFields) -> Result<Todo, ClientError> {
        self.settle().await?;

        Ok(Todo {
            id: self.renumber.unwrap_or(id),
            text: fields.text.trim().to_owned(),
            completed: fields.completed,
            user_id: fields.user_id,
        })
    }

    async fn delete(&self, _id: u64) -> Result<(), ClientError> {
        self.settle().await
    }
}
