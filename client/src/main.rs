use anyhow::Result;
use std::io::{self, Write};
use structopt::StructOpt;
use surf::Url;
use todo_client::{view::view, App, GraphQlApi, Todo, TodoId};

#[derive(Debug, StructOpt)]
#[structopt(name = "todo", about = "Keep track of things to do")]
struct Config {
    #[structopt(long, env = "API_URL", default_value = "http://localhost:3030")]
    api_url: Url,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Show every todo
    List,
    /// Add a todo
    Add {
        #[structopt(required = true)]
        description: Vec<String>,
    },
    /// Mark a todo as completed, or as not completed again
    Toggle { id: TodoId },
    /// Delete a todo
    Delete {
        id: TodoId,
        /// Don't ask for confirmation
        #[structopt(long, short)]
        yes: bool,
    },
}

#[async_std::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = Config::from_args();

    let mut app = App::new(GraphQlApi::new(config.api_url));
    app.mount().await;

    match config.command {
        Command::List => {}
        Command::Add { description } => app.create(description.join(" ")).await,
        Command::Toggle { id } => app.toggle(id).await,
        Command::Delete { id, yes } => {
            app.remove(id, |todo| yes || confirm(todo)).await;
        }
    }

    print!("{}", view(app.model()));

    Ok(())
}

fn confirm(todo: &Todo) -> bool {
    print!(
        "Delete \"{}\"? This cannot be undone. [y/N] ",
        todo.description
    );
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}
