use crate::{Todo, TodoId};
use async_trait::async_trait;
use graphql_client::{GraphQLQuery, Response};
use surf::{StatusCode, Url};
use thiserror::Error;

type DateTime = chrono::DateTime<chrono::Utc>;

macro_rules! generate_query {
    ($query:ident) => {
        #[derive(GraphQLQuery)]
        #[graphql(
            schema_path = "graphql/schema.graphql",
            query_path = "graphql/queries.graphql",
            response_derives = "Debug"
        )]
        struct $query;
    };
}
generate_query!(GetTodos);
generate_query!(CreateTodo);
generate_query!(UpdateTodo);
generate_query!(DeleteTodo);

macro_rules! impl_from_todo {
    ($($todo:ty),*) => {
        $(
            impl From<$todo> for Todo {
                fn from(t: $todo) -> Self {
                    Self {
                        id: t.id,
                        description: t.description,
                        completed: t.completed,
                        created_at: t.created_at,
                    }
                }
            }
        )*
    };
}
impl_from_todo!(
    get_todos::GetTodosGetTodos,
    create_todo::CreateTodoCreateTodo,
    update_todo::UpdateTodoUpdateTodo
);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(surf::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("{message}")]
    Remote {
        message: String,
        code: Option<String>,
    },
    #[error("response carried no data")]
    EmptyResponse,
}

impl ApiError {
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Remote { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// The four remote procedures exposed by the todo API.
#[async_trait]
pub trait TodoApi {
    async fn get_todos(&self) -> Result<Vec<Todo>, ApiError>;
    async fn create_todo(&self, description: String) -> Result<Todo, ApiError>;
    async fn update_todo(&self, id: TodoId, completed: bool) -> Result<Todo, ApiError>;
    /// Resolves to `false` when there was no such todo.
    async fn delete_todo(&self, id: TodoId) -> Result<bool, ApiError>;
}

/// `TodoApi` over GraphQL/HTTP.
#[derive(Debug, Clone)]
pub struct GraphQlApi {
    api_url: Url,
}

impl GraphQlApi {
    pub fn new(api_url: Url) -> Self {
        Self { api_url }
    }

    async fn send_graphql_request<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ApiError> {
        let request = Q::build_query(variables);
        let mut res = surf::post(self.api_url.as_str())
            .body_json(&request)
            .map_err(ApiError::Transport)?
            .await
            .map_err(ApiError::Transport)?;

        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }

        let response: Response<Q::ResponseData> =
            res.body_json().await.map_err(ApiError::Transport)?;
        into_data(response)
    }
}

fn into_data<T>(response: Response<T>) -> Result<T, ApiError> {
    if let Some(error) = response.errors.and_then(|errors| errors.into_iter().next()) {
        let code = error
            .extensions
            .as_ref()
            .and_then(|extensions| extensions.get("code"))
            .and_then(|code| code.as_str())
            .map(str::to_owned);
        return Err(ApiError::Remote {
            message: error.message,
            code,
        });
    }

    response.data.ok_or(ApiError::EmptyResponse)
}

#[async_trait]
impl TodoApi for GraphQlApi {
    async fn get_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let data = self
            .send_graphql_request::<GetTodos>(get_todos::Variables)
            .await?;
        Ok(data.get_todos.into_iter().map(Into::into).collect())
    }

    async fn create_todo(&self, description: String) -> Result<Todo, ApiError> {
        let variables = create_todo::Variables {
            input: create_todo::CreateTodoInput { description },
        };
        let data = self.send_graphql_request::<CreateTodo>(variables).await?;
        Ok(data.create_todo.into())
    }

    async fn update_todo(&self, id: TodoId, completed: bool) -> Result<Todo, ApiError> {
        let variables = update_todo::Variables {
            input: update_todo::UpdateTodoInput { id, completed },
        };
        let data = self.send_graphql_request::<UpdateTodo>(variables).await?;
        Ok(data.update_todo.into())
    }

    async fn delete_todo(&self, id: TodoId) -> Result<bool, ApiError> {
        let variables = delete_todo::Variables {
            input: delete_todo::DeleteTodoInput { id },
        };
        let data = self.send_graphql_request::<DeleteTodo>(variables).await?;
        Ok(data.delete_todo.success)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response<T>(body: serde_json::Value) -> Response<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn data_is_converted_into_todos() {
        let response = response::<get_todos::ResponseData>(json!({
            "data": {
                "getTodos": [{
                    "id": 1,
                    "description": "Buy milk",
                    "completed": false,
                    "createdAt": "2026-10-15T09:30:00.125Z"
                }]
            }
        }));

        let todos: Vec<Todo> = into_data(response)
            .unwrap()
            .get_todos
            .into_iter()
            .map(Into::into)
            .collect();

        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);
        assert_eq!(todos[0].description, "Buy milk");
        assert!(!todos[0].completed);
        assert_eq!(
            todos[0].created_at.to_rfc3339(),
            "2026-10-15T09:30:00.125+00:00"
        );
    }

    #[test]
    fn first_error_becomes_remote_error() {
        let response = response::<update_todo::ResponseData>(json!({
            "data": null,
            "errors": [{
                "message": "todo with id 999 not found",
                "extensions": { "code": "NOT_FOUND" }
            }]
        }));

        match into_data(response) {
            Err(err @ ApiError::Remote { .. }) => {
                assert_eq!(err.code(), Some("NOT_FOUND"));
                assert_eq!(err.to_string(), "todo with id 999 not found");
            }
            other => panic!("expected a remote error, got {:?}", other),
        }
    }

    #[test]
    fn missing_data_is_an_error() {
        let response = response::<delete_todo::ResponseData>(json!({ "data": null }));

        assert!(matches!(into_data(response), Err(ApiError::EmptyResponse)));
    }

    #[test]
    fn variables_use_the_schema_field_names() {
        let request = UpdateTodo::build_query(update_todo::Variables {
            input: update_todo::UpdateTodoInput {
                id: 3,
                completed: true,
            },
        });

        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["operationName"], "UpdateTodo");
        assert_eq!(body["variables"], json!({ "input": { "id": 3, "completed": true } }));
    }
}
