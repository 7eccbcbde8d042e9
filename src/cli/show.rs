use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::cli::SubCommandExtend;
use crate::config::{DescriptorOptions, Opts, OutputFormat};
use crate::factory::{DescriptorConfig, DescriptorFactory, DescriptorKind};
use crate::utils;

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    #[command(flatten)]
    pub descriptor: DescriptorOptions,
    /// 图片路径
    pub image: PathBuf,
    /// 要计算的描述符
    #[arg(short = 'd', long = "descriptor", value_enum, default_value_t = DescriptorKind::DominantColor)]
    pub kind: DescriptorKind,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for ShowCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let image = utils::imread(&self.image)?;
        let factory = DescriptorFactory::new(DescriptorConfig::from(&self.descriptor));
        let descriptor = factory.create(self.kind, &image)?;
        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&descriptor)?),
            OutputFormat::Table => print!("{}", descriptor),
        }
        Ok(())
    }
}
