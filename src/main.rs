use crate::cli::run;

pub mod cddb;
pub mod cli;
mod config;
pub mod domain;
mod error;
pub mod reconcile;
pub mod rip;
pub mod system;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    std::process::exit(run());
}
