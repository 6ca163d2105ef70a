//! Client-side state of the todo list.
//!
//! All changes to [`Model`] go through [`update`]. User actions move the model
//! out of [`Status::Idle`] and return the [`Cmd`] to send; the server's answer
//! comes back as another [`Msg`] and returns the model to `Idle`. Local todos
//! only change after a successful response.

use crate::{ApiError, Todo, TodoId};
use indexmap::IndexMap;
use log::{debug, error, warn};

type Store = IndexMap<TodoId, Todo>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    LoadingList,
    Creating,
    /// A toggle or delete of this todo is in flight.
    Mutating(TodoId),
}

impl Default for Status {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Default)]
pub struct Model {
    todos: Store,
    new_todo_description: String,
    status: Status,
}

impl Model {
    /// Todos in the order the server returned or created them.
    pub fn todos(&self) -> impl Iterator<Item = &Todo> {
        self.todos.values()
    }

    pub fn todo(&self, id: TodoId) -> Option<&Todo> {
        self.todos.get(&id)
    }

    pub fn new_todo_description(&self) -> &str {
        &self.new_todo_description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status != Status::Idle
    }

    pub fn total_count(&self) -> usize {
        self.todos.len()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.values().filter(|todo| todo.completed).count()
    }

    /// Share of completed todos, rounded; `None` for an empty list.
    pub fn progress_percent(&self) -> Option<u8> {
        match self.total_count() {
            0 => None,
            total => Some(((self.completed_count() * 100 + total / 2) / total) as u8),
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    FetchTodos,
    TodosFetched(Result<Vec<Todo>, ApiError>),

    NewTodoDescriptionChanged(String),
    CreateNewTodo,
    NewTodoCreated(Result<Todo, ApiError>),

    ToggleTodo(TodoId),
    TodoToggled(Result<Todo, ApiError>),

    /// Sent only once the user has confirmed the delete.
    RemoveTodo(TodoId),
    TodoRemoved(TodoId, Result<bool, ApiError>),
}

/// A remote call requested by [`update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    GetTodos,
    CreateTodo(String),
    UpdateTodo { id: TodoId, completed: bool },
    DeleteTodo(TodoId),
}

pub fn update(msg: Msg, model: &mut Model) -> Option<Cmd> {
    use Msg::*;
    match msg {
        FetchTodos | CreateNewTodo | ToggleTodo(_) | RemoveTodo(_) if model.is_busy() => {
            warn!("Ignoring {:?} while {:?}", msg, model.status);
            None
        }

        FetchTodos => {
            model.status = Status::LoadingList;
            Some(Cmd::GetTodos)
        }
        TodosFetched(result) => {
            model.status = Status::Idle;
            match result {
                Ok(todos) => {
                    model.todos = todos.into_iter().map(|todo| (todo.id, todo)).collect();
                    debug!("Loaded {} todos", model.todos.len());
                }
                Err(e) => error!("Failed to load todos: {}", e),
            }
            None
        }

        NewTodoDescriptionChanged(description) => {
            if model.status == Status::Creating {
                warn!("Ignoring input while a todo is being created");
            } else {
                model.new_todo_description = description;
            }
            None
        }
        CreateNewTodo => {
            let description = model.new_todo_description.trim();
            if description.is_empty() {
                return None;
            }
            let description = description.to_owned();
            model.status = Status::Creating;
            Some(Cmd::CreateTodo(description))
        }
        NewTodoCreated(result) => {
            model.status = Status::Idle;
            match result {
                Ok(todo) => {
                    debug!("Created todo {}", todo.id);
                    model.new_todo_description.clear();
                    model.todos.insert(todo.id, todo);
                }
                Err(e) => error!("Failed to create todo: {}", e),
            }
            None
        }

        ToggleTodo(id) => {
            let todo = match model.todos.get(&id) {
                Some(todo) => todo,
                None => {
                    warn!("No todo with id {}", id);
                    return None;
                }
            };
            let completed = !todo.completed;
            model.status = Status::Mutating(id);
            Some(Cmd::UpdateTodo { id, completed })
        }
        TodoToggled(result) => {
            model.status = Status::Idle;
            match result {
                Ok(updated) => match model.todos.get_mut(&updated.id) {
                    Some(todo) => *todo = updated,
                    None => warn!("Updated todo {} is not in the list", updated.id),
                },
                Err(e) => error!("Failed to update todo: {}", e),
            }
            None
        }

        RemoveTodo(id) => {
            if !model.todos.contains_key(&id) {
                return None;
            }
            model.status = Status::Mutating(id);
            Some(Cmd::DeleteTodo(id))
        }
        TodoRemoved(id, result) => {
            model.status = Status::Idle;
            match result {
                Ok(existed) => {
                    if !existed {
                        debug!("Todo {} was already gone on the server", id);
                    }
                    model.todos.shift_remove(&id);
                }
                Err(e) => error!("Failed to delete todo: {}", e),
            }
            None
        }
    }
}
