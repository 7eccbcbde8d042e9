use anyhow::Result;
use clap::Parser;

use crate::cli::{SubCommandExtend, open_db};
use crate::config::Opts;

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// 只显示数量和描述符
    #[arg(long)]
    pub summary: bool,
}

impl SubCommandExtend for ListCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let db = open_db(opts)?;
        if self.summary {
            let schema: Vec<_> = db.schema().iter().map(|k| k.to_string()).collect();
            println!("{}\t{}", db.len(), schema.join(","));
            return Ok(());
        }
        for (i, record) in db.iter().enumerate() {
            println!("{}\t{}", i, record.locator().unwrap_or("-"));
        }
        Ok(())
    }
}
