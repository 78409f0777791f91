// A marching band drill editor made with the Bevy game engine.

use anyhow::Result;
use clap::Parser;
use drillcraft::logger::init_custom_logger;
use drillcraft::{create_app, CliArgs};

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init_custom_logger(cli_args.debug);
    create_app(cli_args)?.run();
    Ok(())
}
