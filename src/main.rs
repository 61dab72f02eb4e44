mod catalog;
mod config;
mod engine;
mod player;
mod runtime;
mod timeline;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
