//! The zkIoT setup toolchain.

use clap::Parser;
use zkiot_asm::utils::init_logger;
use zkiot_setup::Cli;

fn main() -> anyhow::Result<()> {
    init_logger();
    Cli::parse().exec()
}
