use anyhow::Result;
use http_types::headers::HeaderValue;
use log::LevelFilter;
use sqlx::SqlitePool;
use structopt::StructOpt;
use tide::{
    security::{CorsMiddleware, Origin},
    Response, Server,
};

pub mod db;
pub mod error;
pub mod graphql;

#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "todo-api", about = "Serves the todo list over GraphQL")]
pub struct Config {
    #[structopt(long, env = "DATABASE_URL", default_value = "sqlite://todos.db")]
    pub database_url: String,
    #[structopt(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3030")]
    pub listen: String,
    #[structopt(long, env = "MAX_CONNECTIONS", default_value = "5")]
    pub max_connections: u32,
    #[structopt(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

pub async fn create_app(config: &Config) -> Result<Server<graphql::State>> {
    let pool = db::connect(&config.database_url, config.max_connections).await?;

    Ok(app_with_pool(pool))
}

pub fn app_with_pool(pool: SqlitePool) -> Server<graphql::State> {
    let mut app = tide::with_state(graphql::State::new(pool));

    app.with(
        CorsMiddleware::new()
            .allow_methods(
                "GET, POST, OPTIONS"
                    .parse::<HeaderValue>()
                    .expect("could not parse as HTTP header value"),
            )
            .allow_origin(Origin::from("*"))
            .allow_credentials(false),
    );

    app.at("/healthz").get(|_| async { Ok(Response::new(204)) });
    app.at("/").post(graphql::handle_graphql);
    app.at("/").get(graphql::handle_graphiql);

    app
}
