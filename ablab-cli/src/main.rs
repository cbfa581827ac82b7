//! ablab binary entry point

fn main() -> anyhow::Result<()> {
    ablab_cli::run()
}
