use orbitviz::config::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    orbitviz::run(Config::default())
}
