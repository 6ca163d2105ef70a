use super::db;
use crate::error::{Result, TodoError, VALIDATION_ERROR};
use async_graphql::{
    http::GraphiQLSource, Context, EmptySubscription, ErrorExtensions, InputObject, Object,
    Schema, SimpleObject,
};
use chrono::{DateTime, Utc};
use log::{debug, error};
use sqlx::SqlitePool as Pool;
use tide::{http::mime, Body, Request, Response, StatusCode};

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// A todo
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct Todo {
    /// The id of the todo
    id: i32,
    /// What needs to be done
    description: String,
    /// Is the todo completed?
    completed: bool,
    /// When the todo was created
    created_at: DateTime<Utc>,
}

impl From<db::Todo> for Todo {
    fn from(d: db::Todo) -> Self {
        Self {
            id: d.id,
            description: d.description,
            completed: d.completed,
            created_at: d.created_at,
        }
    }
}

/// Outcome of a delete
#[derive(SimpleObject, Debug, Clone, Copy, PartialEq)]
pub struct DeleteResult {
    /// True if a todo existed and was removed
    success: bool,
}

#[derive(InputObject)]
pub struct CreateTodoInput {
    description: String,
}

impl CreateTodoInput {
    /// Returns the trimmed description, rejecting blank text.
    fn validate(self) -> Result<String> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(TodoError::Validation(
                "description must not be empty".to_owned(),
            ));
        }
        Ok(description.to_owned())
    }
}

#[derive(InputObject)]
pub struct UpdateTodoInput {
    id: i32,
    completed: bool,
}

#[derive(InputObject)]
pub struct DeleteTodoInput {
    id: i32,
}

#[derive(Clone)]
pub struct State {
    pub schema: TodoSchema,
}

impl State {
    pub fn new(pool: Pool) -> State {
        State {
            schema: schema(pool),
        }
    }
}

pub fn schema(pool: Pool) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(pool)
        .finish()
}

/// Logs a failed procedure and converts it into a GraphQL error.
fn reject(procedure: &str, err: TodoError) -> async_graphql::Error {
    error!("{} failed: {}", procedure, err);
    err.extend()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get all todos, oldest first
    async fn get_todos(&self, context: &Context<'_>) -> async_graphql::Result<Vec<Todo>> {
        let pool = context.data::<Pool>()?;
        let todos = db::Todo::find_all(pool)
            .await
            .map_err(|e| reject("getTodos", e))?;
        Ok(todos.into_iter().map(Into::into).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a new todo (returns the created todo)
    async fn create_todo(
        &self,
        context: &Context<'_>,
        input: CreateTodoInput,
    ) -> async_graphql::Result<Todo> {
        let pool = context.data::<Pool>()?;
        let description = input.validate().map_err(|e| reject("createTodo", e))?;
        let todo = db::Todo::create(&description, pool)
            .await
            .map_err(|e| reject("createTodo", e))?;
        debug!("created todo {}", todo.id);
        Ok(todo.into())
    }

    /// Set the completion flag of a todo (returns the updated todo)
    async fn update_todo(
        &self,
        context: &Context<'_>,
        input: UpdateTodoInput,
    ) -> async_graphql::Result<Todo> {
        let pool = context.data::<Pool>()?;
        let todo = db::Todo::set_completed(input.id, input.completed, pool)
            .await
            .map_err(|e| reject("updateTodo", e))?;
        debug!("todo {} completed = {}", todo.id, todo.completed);
        Ok(todo.into())
    }

    /// Delete a todo (success is false if there was nothing to delete)
    async fn delete_todo(
        &self,
        context: &Context<'_>,
        input: DeleteTodoInput,
    ) -> async_graphql::Result<DeleteResult> {
        let pool = context.data::<Pool>()?;
        let success = db::Todo::delete(input.id, pool)
            .await
            .map_err(|e| reject("deleteTodo", e))?;
        debug!("delete todo {}: success = {}", input.id, success);
        Ok(DeleteResult { success })
    }
}

/// Runs a request, giving errors raised by the schema itself (unknown fields,
/// wrong argument types) the validation code resolver errors already carry.
pub async fn execute(
    schema: &TodoSchema,
    request: impl Into<async_graphql::Request>,
) -> async_graphql::Response {
    let mut response = schema.execute(request).await;

    for err in &mut response.errors {
        let extensions = err.extensions.get_or_insert_with(Default::default);
        if extensions.get("code").is_none() {
            error!("request rejected: {}", err.message);
            extensions.set("code", VALIDATION_ERROR);
        }
    }

    response
}

pub async fn handle_graphql(mut req: Request<State>) -> tide::Result {
    let query: async_graphql::Request = req.body_json().await?;

    let response = execute(&req.state().schema, query).await;

    let mut res = Response::new(StatusCode::Ok);
    res.set_body(Body::from_json(&response)?);
    Ok(res)
}

pub async fn handle_graphiql(_: Request<State>) -> tide::Result {
    let mut response = Response::new(StatusCode::Ok);
    response.set_body(Body::from_string(
        GraphiQLSource::build().endpoint("/").finish(),
    ));
    response.set_content_type(mime::HTML);

    Ok(response)
}
