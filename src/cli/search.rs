use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use crate::cli::{SubCommandExtend, open_db};
use crate::config::{Opts, OutputFormat, SearchOptions};
use crate::db::ResultMetadata;
use crate::utils;

#[derive(Parser, Debug, Clone)]
pub struct SearchCommand {
    #[command(flatten)]
    pub search: SearchOptions,
    /// 被搜索的图片路径
    pub image: PathBuf,
}

#[derive(Serialize)]
struct SearchResult<'a> {
    distance: f64,
    locator: Option<&'a str>,
}

impl SubCommandExtend for SearchCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let image = utils::imread(&self.image)?;
        let db = open_db(opts)?;
        let result = db.query_media(&image, Some(self.search.count))?;
        print_result(&result, &self.search.output_format)
    }
}

fn print_result(result: &[ResultMetadata<'_>], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let result: Vec<_> =
                result.iter().map(|m| SearchResult { distance: m.distance, locator: m.record.locator() }).collect();
            println!("{}", serde_json::to_string_pretty(&result)?)
        }
        OutputFormat::Table => {
            for m in result {
                println!("{:.2}\t{}", m.distance, m.record.locator().unwrap_or("-"));
            }
        }
    }
    Ok(())
}
