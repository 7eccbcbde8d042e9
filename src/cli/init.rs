use std::fs;

use anyhow::{Result, bail};
use clap::Parser;
use log::info;

use crate::cli::SubCommandExtend;
use crate::config::{DescriptorOptions, Opts};
use crate::db::ListDB;
use crate::factory::{DescriptorConfig, DescriptorKind};

#[derive(Parser, Debug, Clone)]
pub struct InitCommand {
    #[command(flatten)]
    pub descriptor: DescriptorOptions,
    /// 每条记录包含的描述符，按顺序比较
    #[arg(short, long = "descriptor", value_enum, num_args = 1.., required = true)]
    pub descriptors: Vec<DescriptorKind>,
    /// 覆盖已存在的数据库
    #[arg(long)]
    pub overwrite: bool,
}

impl SubCommandExtend for InitCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let path = opts.conf_dir.database();
        if path.exists() && !self.overwrite {
            bail!("数据库已存在: {}", path.display());
        }
        fs::create_dir_all(opts.conf_dir.path())?;

        let db = ListDB::new(self.descriptors.clone(), DescriptorConfig::from(&self.descriptor));
        db.save(&path)?;
        info!("创建数据库 {}，描述符: {:?}", path.display(), self.descriptors);
        Ok(())
    }
}
