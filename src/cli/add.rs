use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use indicatif::{ParallelProgressIterator, ProgressBar};
use log::info;
use rayon::prelude::*;
use regex::Regex;
use walkdir::WalkDir;

use crate::cli::{SubCommandExtend, open_db};
use crate::config::Opts;
use crate::utils::{self, pb_style};

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// 图片或目录的路径
    pub path: PathBuf,
    /// 扫描的文件后缀名，多个后缀用逗号分隔
    #[arg(short, long, default_value = "jpg,png")]
    pub suffix: String,
}

impl SubCommandExtend for AddCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let re_suf = Regex::new(&format!("(?i)^({})$", self.suffix.replace(',', "|")))?;
        let mut db = open_db(opts)?;

        info!("开始扫描目录: {}", self.path.display());
        let known: HashSet<String> = db.iter().filter_map(|r| r.locator().map(str::to_string)).collect();
        let entries: Vec<PathBuf> = WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && re_suf.is_match(&path.extension().unwrap_or_default().to_string_lossy()))
            .filter(|path| !known.contains(&*path.to_string_lossy()))
            .collect();
        info!("扫描完成，共 {} 张新图片", entries.len());

        let pb = ProgressBar::new(entries.len() as u64).with_style(pb_style()).with_message("计算描述符中...");
        let records: Vec<_> = entries
            .par_iter()
            .progress_with(pb.clone())
            .filter_map(|path| {
                let locator = path.to_string_lossy().to_string();
                match utils::imread(path).and_then(|image| Ok(db.record_from_media(&image, Some(locator))?)) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        pb.println(format!("处理失败: {}: {}", path.display(), e));
                        None
                    }
                }
            })
            .collect();
        pb.finish_with_message("描述符计算完成");

        let added = records.len();
        for record in records {
            db.add(record)?;
        }
        db.save(opts.conf_dir.database())?;
        info!("添加了 {} 张图片，数据库共 {} 张", added, db.len());
        Ok(())
    }
}
