use anyhow::Result;
use marea_cli::app;

fn main() -> Result<()> {
    app::run()
}
