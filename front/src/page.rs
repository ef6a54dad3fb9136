use tally_api::v1::Todo;

use crate::{
    api::RemoteTodos,
    error::ClientError,
    form::TodoForm,
    notify::{Notifier, Toast},
    store::TodoStore,
    view::{ListQuery, StatusFilter},
};

/// The todo table: list query state, forms and row actions on top of a store.
pub struct Page<R, N> {
    store: TodoStore<R>,
    notifier: N,
    query: ListQuery,
}

impl<R: RemoteTodos, N: Notifier> Page<R, N> {
    /// Loads the initial list. A failure here means there is nothing to show.
    pub async fn load(remote: R, notifier: N) -> Result<Self, ClientError> {
        let store = TodoStore::load(remote).await?;
        Ok(Self::new(store, notifier))
    }

    pub fn new(store: TodoStore<R>, notifier: N) -> Self {
        Self {
            store,
            notifier,
            query: ListQuery::default(),
        }
    }

    pub fn store(&self) -> &TodoStore<R> {
        &self.store
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.query.filter = filter;
    }

    pub fn toggle_sort(&mut self) {
        self.query.toggle_order();
    }

    /// Rows to render, derived fresh from the store on every call.
    pub fn rows(&self) -> Vec<Todo> {
        self.query.derive(&self.store.todos())
    }

    pub fn create_form(&self) -> TodoForm {
        TodoForm::create()
    }

    pub fn edit_form(&self, id: u64) -> Option<TodoForm> {
        self.store.get(id).map(|todo| TodoForm::edit(&todo))
    }

    pub async fn submit(&self, form: &mut TodoForm) -> Option<Todo> {
        form.submit(&self.store, &self.notifier).await
    }

    pub async fn delete(&self, id: u64) -> bool {
        match self.store.remove(id).await {
            Ok(()) => {
                self.notifier.notify(Toast::success("Todo deleted!"));
                true
            }
            Err(_) => {
                self.notifier.notify(Toast::failure());
                false
            }
        }
    }
}
