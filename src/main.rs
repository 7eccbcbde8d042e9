use clap::Parser;

use imretrieve::cli::SubCommandExtend;
use imretrieve::config::{Opts, SubCommand};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();

    match &opts.subcmd {
        SubCommand::Init(config) => config.run(&opts),
        SubCommand::Add(config) => config.run(&opts),
        SubCommand::Search(config) => config.run(&opts),
        SubCommand::Show(config) => config.run(&opts),
        SubCommand::Remove(config) => config.run(&opts),
        SubCommand::List(config) => config.run(&opts),
    }
}
