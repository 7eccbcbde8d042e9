use anyhow::{Result, bail};
use clap::Parser;
use log::info;

use crate::cli::{SubCommandExtend, open_db};
use crate::config::Opts;

#[derive(Parser, Debug, Clone)]
pub struct RemoveCommand {
    /// 添加图片时记录的路径
    pub locator: String,
}

impl SubCommandExtend for RemoveCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let mut db = open_db(opts)?;
        let Some(index) = db.position(&self.locator) else {
            bail!("数据库中没有该图片: {}", self.locator);
        };
        db.remove(index)?;
        db.save(opts.conf_dir.database())?;
        info!("已删除 {}", self.locator);
        Ok(())
    }
}
