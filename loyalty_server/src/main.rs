use clap::Parser;
use dotenvy::dotenv;
use log::info;
use loyalty_server::{
    cli::{display_envs, Arguments},
    config::ServerConfig,
    server::run_server,
};

#[actix_web::main]
async fn main() {
    // Load .env before parsing, so that its values can stand in for missing arguments
    dotenv().ok();
    env_logger::init();
    let args = Arguments::parse();
    if args.show_env {
        display_envs();
        return;
    }
    let config = ServerConfig::from_args_and_env(args);

    info!("🚀️ Starting server on {}", config.run_address);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
