use anyhow::Result;
use structopt::StructOpt;
use todo_api::Config;

#[async_std::main]
async fn main() -> Result<()> {
    let config = Config::from_args();

    tide::log::with_level(config.log_level);
    let app = todo_api::create_app(&config).await?;
    log::info!("listening on {}", config.listen);
    app.listen(config.listen).await?;

    Ok(())
}
