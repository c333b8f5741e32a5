use log::LevelFilter;
use snapshotter::app;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    // https://docs.rs/env_logger/latest/env_logger/
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .target(env_logger::Target::Stdout)
        .init();

    let code = app::run(std::env::args_os()).await;
    std::process::exit(code);
}

