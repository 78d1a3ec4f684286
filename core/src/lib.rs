//! Client core for the todo list app.
//!
//! # Overview
//! Everything between the page and the network: the API client, the list
//! store, HTML rendering and the view model that ties them together. Nothing
//! here performs I/O. The view model hands out `HttpRequest`s and the host
//! (the browser glue in `todo-web`, or a test harness) executes them and
//! reports back, which keeps every flow deterministic under test.
//!
//! # Design
//! - `TodoClient` is stateless; each CRUD call is a `build_*` / `parse_*` pair.
//! - `TodoStore` notifies any number of subscribers on every list replacement.
//! - `view::render` is a pure function from the list to two HTML fragments.
//! - `ViewModel` owns the store and turns `UiEvent`s and completions into
//!   store changes plus a `Reaction` for the host.

pub mod client;
pub mod error;
pub mod http;
pub mod store;
pub mod types;
pub mod view;
pub mod view_model;

pub use client::{TodoClient, DEFAULT_BASE_URL};
pub use error::{ApiError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{SubscriptionId, TodoStore};
pub use types::{CreateTodo, EmptyTodoId, Todo, TodoId, UpdateTodo};
pub use view::{render, Command, Rendered};
pub use view_model::{Dispatch, Notice, Reaction, Ticket, UiEvent, ViewModel};
