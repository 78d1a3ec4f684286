//! Coordinator between UI events, the backend and the store.
//!
//! # Design
//! The view model never performs I/O. Every backend call it wants is handed
//! to the host as a [`Dispatch`]: a [`Ticket`] plus the `HttpRequest` to run.
//! The host runs the round trip and feeds the outcome back through
//! [`ViewModel::complete`]. Requests may complete in any order.
//!
//! The store only changes after the matching call succeeded, except for
//! entering edit mode, which is purely local. Every change replaces the whole
//! list, so the presentation subscriber re-renders each time.
//!
//! Updates are sequenced per item by ticket. A successful update applies only
//! if it was issued after the last update already applied to that item, so a
//! slow response never overwrites a newer confirmed write. An older success
//! that lands while a newer update is still in flight is applied right away;
//! if the newer one then fails, the list keeps that older confirmed record,
//! matching what the server last accepted.
//!
//! Add and remove failures are reported as alerts; update and fetch failures
//! are only logged.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::{ApiError, TransportError, ValidationError};
use crate::http::{HttpRequest, HttpResponse};
use crate::store::TodoStore;
use crate::types::{CreateTodo, Todo, TodoId};
use crate::view::{self, Command, Rendered};

/// Correlates a dispatched request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request the host must execute, then report via `complete`.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

/// User-facing feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Modal message (`window.alert` in the browser).
    Alert(String),
    /// Console-only diagnostic.
    Log(String),
}

/// What the host has to do after an event or a completion.
#[derive(Debug, Default)]
pub struct Reaction {
    pub dispatch: Vec<Dispatch>,
    pub notice: Option<Notice>,
    /// Clear the new-todo input.
    pub clear_input: bool,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn alert(message: String) -> Self {
        Self {
            notice: Some(Notice::Alert(message)),
            ..Self::default()
        }
    }

    fn log(message: String) -> Self {
        Self {
            notice: Some(Notice::Log(message)),
            ..Self::default()
        }
    }

    fn send(ticket: Ticket, request: HttpRequest) -> Self {
        Self {
            dispatch: vec![Dispatch { ticket, request }],
            ..Self::default()
        }
    }
}

/// Input from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The new-todo form was submitted.
    Submit { title: String },
    /// A control inside the list was clicked. `input` is the current value
    /// of the item's inline text field, when it has one.
    Click {
        command: Command,
        id: TodoId,
        input: Option<String>,
    },
}

impl UiEvent {
    /// Decode a clicked control from its `data-command` and `data-id`
    /// attribute values. `input` is only kept for `Submit`.
    pub fn from_control(command: &str, id: &str, input: Option<String>) -> Option<Self> {
        let command: Command = command.parse().ok()?;
        let id: TodoId = id.parse().ok()?;
        let input = match command {
            Command::Submit => input,
            _ => None,
        };
        Some(UiEvent::Click { command, id, input })
    }
}

#[derive(Debug, Clone, Copy)]
enum UpdateKind {
    Toggle,
    Commit,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateKind::Toggle => f.write_str("toggle todo"),
            UpdateKind::Commit => f.write_str("edit todo"),
        }
    }
}

#[derive(Debug)]
enum Pending {
    FetchAll,
    Create,
    Remove(TodoId),
    Update { record: Todo, kind: UpdateKind },
}

pub struct ViewModel {
    client: TodoClient,
    store: TodoStore,
    pending: HashMap<Ticket, Pending>,
    applied_update: HashMap<TodoId, Ticket>,
    next_ticket: u64,
}

impl ViewModel {
    pub fn new(client: TodoClient, store: TodoStore) -> Self {
        Self {
            client,
            store,
            pending: HashMap::new(),
            applied_update: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn todos(&self) -> &[Todo] {
        self.store.list()
    }

    /// Number of dispatched requests not yet completed.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Wire the presentation layer to the store and start the initial fetch.
    ///
    /// `sink` receives the rendered containers once immediately and then
    /// after every store change.
    pub fn bootstrap(&mut self, mut sink: impl FnMut(&Rendered) + 'static) -> Reaction {
        sink(&view::render(self.store.list()));
        self.store.subscribe(move |todos| sink(&view::render(todos)));
        self.fetch_all()
    }

    pub fn fetch_all(&mut self) -> Reaction {
        let request = self.client.build_list_todos();
        self.issue(Pending::FetchAll, request)
    }

    pub fn handle(&mut self, event: UiEvent) -> Reaction {
        match event {
            UiEvent::Submit { title } => self.add(title),
            UiEvent::Click { command, id, input } => self.click(command, id, input),
        }
    }

    /// Apply the outcome of a dispatched request. Unknown tickets are ignored.
    pub fn complete(&mut self, ticket: Ticket, result: Result<HttpResponse, TransportError>) -> Reaction {
        let Some(op) = self.pending.remove(&ticket) else {
            debug!(%ticket, "completion for unknown ticket ignored");
            return Reaction::none();
        };
        let response = result.map_err(ApiError::from);

        match op {
            Pending::FetchAll => match response.and_then(|r| self.client.parse_list_todos(r)) {
                Ok(todos) => {
                    debug!(count = todos.len(), "loaded todos");
                    self.store.set_list(todos);
                    Reaction::none()
                }
                Err(err) => {
                    warn!(%err, "fetch todos failed");
                    Reaction::log(format!("fetch todos failed: {err}"))
                }
            },
            Pending::Create => match response.and_then(|r| self.client.parse_create_todo(r)) {
                Ok(todo) => {
                    let mut next = Vec::with_capacity(self.store.list().len() + 1);
                    next.push(todo);
                    next.extend(self.store.list().iter().cloned());
                    self.store.set_list(next);
                    Reaction {
                        clear_input: true,
                        ..Reaction::none()
                    }
                }
                Err(err) => Reaction::alert(format!("add new task failed: {err}")),
            },
            Pending::Remove(id) => match response.and_then(|r| self.client.parse_delete_todo(r)) {
                Ok(()) => {
                    self.applied_update.remove(&id);
                    let next = self.store.list().iter().filter(|t| t.id != id).cloned().collect();
                    self.store.set_list(next);
                    Reaction::none()
                }
                Err(err) => Reaction::alert(format!("delete todo failed: {err}")),
            },
            Pending::Update { record, kind } => {
                match response.and_then(|r| self.client.parse_update_todo(r)) {
                    Ok(()) => {
                        let superseded = self
                            .applied_update
                            .get(&record.id)
                            .is_some_and(|applied| *applied > ticket);
                        if superseded {
                            debug!(%ticket, id = %record.id, "stale update result dropped");
                        } else {
                            let id = record.id.clone();
                            if self.replace(record) {
                                self.applied_update.insert(id, ticket);
                            }
                        }
                        Reaction::none()
                    }
                    Err(err) => {
                        warn!(%err, id = %record.id, "{kind} failed");
                        Reaction::log(format!("{kind} failed: {err}"))
                    }
                }
            }
        }
    }

    fn add(&mut self, title: String) -> Reaction {
        if title.trim().is_empty() {
            return Reaction::alert(ValidationError::BlankTitle.to_string());
        }
        let input = CreateTodo {
            title,
            completed: false,
        };
        match self.client.build_create_todo(&input) {
            Ok(request) => self.issue(Pending::Create, request),
            Err(err) => Reaction::alert(format!("add new task failed: {err}")),
        }
    }

    fn click(&mut self, command: Command, id: TodoId, input: Option<String>) -> Reaction {
        let Some(current) = self.store.list().iter().find(|t| t.id == id).cloned() else {
            debug!(%id, ?command, "click on unknown todo ignored");
            return Reaction::none();
        };

        match command {
            Command::Delete => {
                let request = self.client.build_delete_todo(&id);
                self.issue(Pending::Remove(id), request)
            }
            Command::Toggle if !current.editable => {
                let record = Todo {
                    completed: !current.completed,
                    editable: false,
                    ..current
                };
                self.update(record, UpdateKind::Toggle)
            }
            Command::Submit if current.editable => {
                let title = input.unwrap_or_else(|| current.title.clone());
                let record = Todo {
                    title,
                    editable: false,
                    ..current
                };
                self.update(record, UpdateKind::Commit)
            }
            Command::Edit if !current.editable => {
                self.replace(Todo {
                    editable: true,
                    ..current
                });
                Reaction::none()
            }
            _ => {
                debug!(%id, ?command, editable = current.editable, "command does not apply");
                Reaction::none()
            }
        }
    }

    fn update(&mut self, record: Todo, kind: UpdateKind) -> Reaction {
        match self.client.build_update_todo(&record.id, &record.to_update()) {
            Ok(request) => self.issue(Pending::Update { record, kind }, request),
            Err(err) => Reaction::log(format!("{kind} failed: {err}")),
        }
    }

    /// Swap in `record` for the item with the same id. Returns `false`, and
    /// leaves the list alone, if the item is gone.
    fn replace(&mut self, record: Todo) -> bool {
        if !self.store.list().iter().any(|t| t.id == record.id) {
            return false;
        }
        let next = self
            .store
            .list()
            .iter()
            .map(|t| if t.id == record.id { record.clone() } else { t.clone() })
            .collect();
        self.store.set_list(next);
        true
    }

    fn issue(&mut self, op: Pending, request: HttpRequest) -> Reaction {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        debug!(%ticket, method = request.method.as_str(), path = %request.path, "dispatching");
        self.pending.insert(ticket, op);
        Reaction::send(ticket, request)
    }
}

impl fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("client", &self.client)
            .field("store", &self.store)
            .field("in_flight", &self.pending.len())
            .finish()
    }
}
