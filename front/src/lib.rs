pub mod api;
pub mod error;
pub mod form;
pub mod notify;
pub mod page;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{ClientConfig, RemoteTodos, TodoClient};
pub use error::{ClientError, StoreError, ValidationError};
pub use page::Page;
pub use store::TodoStore;

pub const API_URL: &str = "https://dummyjson.com";
