mod add;
mod init;
mod list;
mod remove;
mod search;
mod show;

pub use add::*;
pub use init::*;
pub use list::*;
pub use remove::*;
pub use search::*;
pub use show::*;

use anyhow::{Context, Result};
use log::debug;

use crate::config::Opts;
use crate::db::ListDB;

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> Result<()>;
}

/// 打开配置目录中的数据库
fn open_db(opts: &Opts) -> Result<ListDB> {
    let path = opts.conf_dir.database();
    debug!("打开数据库: {}", path.display());
    ListDB::open(&path).with_context(|| format!("无法打开数据库 {}，请先运行 init", path.display()))
}
