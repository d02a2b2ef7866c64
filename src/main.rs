use clap::Parser;
use lequel::app::{logger_builder, run};
use lequel::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let _ = logger_builder(config.log_level.as_deref(), env_logger::Env::default()).try_init();

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())
}
