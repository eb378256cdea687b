mod anim;
mod app;
mod assets;
mod composite;
mod config;
mod debug;
mod error;
mod input;
mod render;
mod scene;

use clap::Parser;

fn main() {
    env_logger::init();
    let args = config::Args::parse();
    log::info!("spritewalk starting up ({:?} variant)", args.variant);

    if let Err(e) = app::run(args) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
