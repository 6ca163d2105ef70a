use crate::{
    api::TodoApi,
    model::{update, Cmd, Model, Msg},
    Todo, TodoId,
};
use log::warn;

/// Owns the client model and performs the remote calls it asks for.
pub struct App<A> {
    api: A,
    model: Model,
}

impl<A: TodoApi> App<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            model: Model::default(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Feeds `msg` through [`update`], performing each requested command
    /// until the model settles.
    pub async fn dispatch(&mut self, msg: Msg) {
        let mut next = update(msg, &mut self.model);
        while let Some(cmd) = next {
            let msg = self.perform(cmd).await;
            next = update(msg, &mut self.model);
        }
    }

    async fn perform(&self, cmd: Cmd) -> Msg {
        match cmd {
            Cmd::GetTodos => Msg::TodosFetched(self.api.get_todos().await),
            Cmd::CreateTodo(description) => {
                Msg::NewTodoCreated(self.api.create_todo(description).await)
            }
            Cmd::UpdateTodo { id, completed } => {
                Msg::TodoToggled(self.api.update_todo(id, completed).await)
            }
            Cmd::DeleteTodo(id) => Msg::TodoRemoved(id, self.api.delete_todo(id).await),
        }
    }

    pub async fn mount(&mut self) {
        self.dispatch(Msg::FetchTodos).await;
    }

    pub async fn create(&mut self, description: impl Into<String>) {
        self.dispatch(Msg::NewTodoDescriptionChanged(description.into()))
            .await;
        self.dispatch(Msg::CreateNewTodo).await;
    }

    pub async fn toggle(&mut self, id: TodoId) {
        self.dispatch(Msg::ToggleTodo(id)).await;
    }

    /// Deletes `id` if `confirm` approves it. Returns whether the delete was
    /// attempted.
    pub async fn remove(&mut self, id: TodoId, confirm: impl FnOnce(&Todo) -> bool) -> bool {
        let todo = match self.model.todo(id) {
            Some(todo) => todo,
            None => {
                warn!("No todo with id {}", id);
                return false;
            }
        };
        if !confirm(todo) {
            return false;
        }
        self.dispatch(Msg::RemoveTodo(id)).await;
        true
    }
}
