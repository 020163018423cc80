use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = synchronize::cli::parse();
    app::run(args)
}
