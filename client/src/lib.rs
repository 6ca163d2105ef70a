use chrono::{DateTime, Utc};

pub mod api;
pub mod app;
pub mod model;
pub mod view;

pub use api::{ApiError, GraphQlApi, TodoApi};
pub use app::App;
pub use model::{update, Cmd, Model, Msg, Status};

pub type TodoId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}
