use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tally_api::v1::{Todo, TodoFields};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::{
    api::RemoteTodos,
    error::{ClientError, StoreError},
};

pub type StoreResult<T> = Result<T, StoreError>;

pub struct TodoStore<R> {
    remote: R,
    todos: RwLock<Vec<Todo>>,
    lanes: Lanes,
}

impl<R: RemoteTodos> TodoStore<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            todos: RwLock::new(Vec::new()),
            lanes: Lanes::default(),
        }
    }

    /// Fetches the full list and builds a store around it.
    pub async fn load(remote: R) -> Result<Self, ClientError> {
        let todos = remote.list_all().await?;

        let store = Self::new(remote);
        store.initialize(todos);

        Ok(store)
    }

    /// Replaces the collection wholesale. Later duplicates of an id are dropped.
    pub fn initialize(&self, todos: Vec<Todo>) {
        let mut seen = HashSet::new();
        let todos: Vec<_> = todos
            .into_iter()
            .filter(|todo| seen.insert(todo.id))
            .collect();

        info!(count = todos.len(), "initialized todos");

        *self.write() = todos;
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.read().clone()
    }

    pub fn get(&self, id: u64) -> Option<Todo> {
        self.read().iter().find(|todo| todo.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Creates a todo remotely and appends the server's record.
    ///
    /// Nothing is written locally before the server has assigned an id.
    pub async fn add(&self, fields: TodoFields) -> StoreResult<Todo> {
        let todo = self.remote.create(fields).await.map_err(|err| {
            warn!(error = %err, "failed to create todo");
            err
        })?;

        let mut todos = self.write();
        match todos.iter_mut().find(|existing| existing.id == todo.id) {
            Some(existing) => {
                warn!(
                    id = %todo.id,
                    replaced = %existing.text,
                    "server reused an existing id, replacing record"
                );
                *existing = todo.clone();
            }
            None => todos.push(todo.clone()),
        }

        info!(
            id = %todo.id,
            text = %todo.text,
            "created todo"
        );

        Ok(todo)
    }

    /// Updates a todo, showing the new values before the server confirms them.
    pub async fn edit(&self, id: u64, fields: TodoFields) -> StoreResult<Todo> {
        let _lane = self.lanes.enter(id).await;

        let snapshot = {
            let mut todos = self.write();
            let todo = todos
                .iter_mut()
                .find(|todo| todo.id == id)
                .ok_or(StoreError::NotFound(id))?;

            let snapshot = todo.clone();
            *todo = Todo::with_fields(id, fields.clone());
            snapshot
        };

        debug!(id, "applied optimistic update");

        match self.remote.update(id, fields).await {
            Ok(todo) if todo.id != id => {
                warn!(id, returned = todo.id, "update answered for another id, rolling back");
                self.replace(id, snapshot);

                Err(StoreError::Mismatched {
                    expected: id,
                    returned: todo.id,
                })
            }
            Ok(todo) => {
                self.replace(id, todo.clone());

                info!(
                    id = %todo.id,
                    text = ?todo.text,
                    completed = todo.completed,
                    "updated todo"
                );

                Ok(todo)
            }
            Err(err) => {
                warn!(id, error = %err, "update failed, rolling back");
                self.replace(id, snapshot);

                Err(err.into())
            }
        }
    }

    /// Removes a todo, hiding it before the server confirms the deletion.
    pub async fn remove(&self, id: u64) -> StoreResult<()> {
        let _lane = self.lanes.enter(id).await;

        let (index, removed) = {
            let mut todos = self.write();
            let index = todos
                .iter()
                .position(|todo| todo.id == id)
                .ok_or(StoreError::NotFound(id))?;

            (index, todos.remove(index))
        };

        debug!(id, "applied optimistic removal");

        match self.remote.delete(id).await {
            Ok(()) => {
                info!(id, "deleted todo");
                Ok(())
            }
            Err(err) => {
                warn!(id, error = %err, "delete failed, rolling back");

                let mut todos = self.write();
                let index = index.min(todos.len());
                todos.insert(index, removed);

                Err(err.into())
            }
        }
    }

    fn replace(&self, id: u64, todo: Todo) {
        let mut todos = self.write();
        if let Some(existing) = todos.iter_mut().find(|todo| todo.id == id) {
            *existing = todo;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Todo>> {
        self.todos.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Todo>> {
        self.todos.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serializes mutations that target the same id.
#[derive(Default)]
struct Lanes {
    lanes: Mutex<HashMap<u64, Arc<AsyncMutex<()>>>>,
}

impl Lanes {
    async fn enter(&self, id: u64) -> LaneGuard<'_> {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
            lanes.entry(id).or_default().clone()
        };

        LaneGuard {
            lanes: self,
            id,
            guard: Some(lane.lock_owned().await),
        }
    }
}

struct LaneGuard<'a> {
    lanes: &'a Lanes,
    id: u64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LaneGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();

        let mut lanes = self.lanes.lanes.lock().unwrap_or_else(PoisonError::into_inner);
        if lanes.get(&self.id).is_some_and(|lane| Arc::strong_count(lane) == 1) {
            lanes.remove(&self.id);
        }
    }
}
