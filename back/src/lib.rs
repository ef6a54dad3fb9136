//! Local stand-in for the remote todo API.

pub mod v1;

use std::{
    collections::BTreeMap,
    fs, io,
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::Router;
use serde::{Deserialize, Serialize};
use tally_api::v1::Todo;
use tokio::sync::Mutex;

#[derive(Default, Debug)]
pub struct AppState {
    pub last_id: AtomicU64,
    pub todos: Mutex<BTreeMap<u64, Todo>>,
}

impl AppState {
    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => eyre::bail!(err),
        };
        let data: DataOwned = ron::de::from_reader(file)?;

        match data {
            DataOwned::V1 { todos } => Ok(Self::seeded(todos)),
        }
    }

    /// Builds a state holding `todos`; later ids continue after the highest one.
    pub fn seeded(todos: impl IntoIterator<Item = Todo>) -> Self {
        let todos: BTreeMap<_, _> = todos.into_iter().map(|todo| (todo.id, todo)).collect();
        let last_id = todos.keys().next_back().copied().unwrap_or(0);

        Self {
            last_id: AtomicU64::new(last_id),
            todos: Mutex::new(todos),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.last_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub async fn store(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        let todos = self.todos.lock().await;
        let data = DataBorrowed::V1 {
            todos: todos.values().collect(),
        };

        let file = fs::File::create(path)?;
        let mut ron = ron::Serializer::new(file, Some(Default::default()))?;
        data.serialize(&mut ron)?;

        Ok(())
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new().merge(v1::router()).with_state(state)
}

#[derive(Serialize)]
enum DataBorrowed<'a> {
    V1 { todos: Vec<&'a Todo> },
}

#[derive(Deserialize)]
enum DataOwned {
    V1 { todos: Vec<Todo> },
}
