use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;

use crate::cli::*;
use crate::colorspace::ColorSpace;
use crate::descriptor::{
    DEFAULT_BITPLANES_DISCARDED, DEFAULT_COEFFICIENTS, DEFAULT_Q_LEVELS, DominantColorComparator, DominantColorParams,
    DominantColorPolicy,
};
use crate::factory::{DescriptorConfig, DescriptorKind};

static CONF_DIR: LazyLock<ConfDir> = LazyLock::new(|| {
    let proj_dirs = ProjectDirs::from("", "", "imretrieve").expect("failed to get project dir");
    ConfDir { path: proj_dirs.config_dir().to_path_buf() }
});

fn default_config_dir() -> &'static str {
    CONF_DIR.path().to_str().unwrap()
}

#[derive(Parser, Debug, Clone)]
pub struct DescriptorOptions {
    /// 主色聚类阈值系数，越小得到的主色越多
    #[arg(long, value_name = "RO", default_value_t = 0.3)]
    pub dcd_ro: f32,
    /// 主色最小像素占比，低于该值的主色会被丢弃，0 表示不过滤
    #[arg(long, value_name = "RATIO", default_value_t = 0.01)]
    pub dcd_min_percentage: f32,
    /// 主色聚类使用的颜色空间
    #[arg(long, value_enum, default_value_t = ColorSpace::Srgb)]
    pub dcd_color_space: ColorSpace,
    /// 主色比较策略
    #[arg(long, value_enum, default_value_t = DominantColorPolicy::ContainColors)]
    pub dcd_policy: DominantColorPolicy,
    /// 两个主色的距离不小于该值时视为不匹配
    #[arg(long, value_name = "DISTANCE", default_value_t = f32::MAX as f64)]
    pub dcd_td: f64,
    /// 提取主色前把宽度超过 200 的图片等比缩小
    #[arg(long)]
    pub dcd_resize: bool,
    /// 颜色结构描述符的量化级数，可选 32、64、128、256
    #[arg(long, value_name = "N", default_value_t = DEFAULT_Q_LEVELS)]
    pub csd_levels: usize,
    /// 可伸缩颜色描述符保留的系数数量，可选 16、32、64、128、256
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COEFFICIENTS)]
    pub scd_coefficients: usize,
    /// 可伸缩颜色描述符丢弃的低位平面数量
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BITPLANES_DISCARDED, value_parser = clap::value_parser!(u8).range(0..=8))]
    pub scd_bitplanes_discarded: u8,
    /// 网格描述符的网格大小
    #[arg(long, value_name = "COLUMNSxROWS", value_parser = parse_size, default_value = "2x2")]
    pub grid_size: (usize, usize),
    /// 网格描述符每个格子使用的描述符
    #[arg(long, value_enum, default_value_t = DescriptorKind::ScalableColor)]
    pub grid_tile: DescriptorKind,
}

impl From<&DescriptorOptions> for DescriptorConfig {
    fn from(opts: &DescriptorOptions) -> Self {
        Self {
            dominant_color: DominantColorParams {
                ro: opts.dcd_ro,
                min_percentage: opts.dcd_min_percentage,
                color_space: opts.dcd_color_space,
            },
            dominant_color_comparator: DominantColorComparator { policy: opts.dcd_policy, td: opts.dcd_td },
            dominant_color_resize: opts.dcd_resize,
            color_structure_levels: opts.csd_levels,
            scalable_color_coefficients: opts.scd_coefficients,
            scalable_color_bitplanes_discarded: opts.scd_bitplanes_discarded,
            grid_size: opts.grid_size,
            grid_tile_kind: opts.grid_tile,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// 显示的结果数量
    #[arg(long, value_name = "COUNT", default_value_t = 10)]
    pub count: usize,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "imretrieve", version)]
pub struct Opts {
    #[command(subcommand)]
    pub subcmd: SubCommand,
    /// imretrieve 配置文件目录
    #[arg(short, long, default_value = default_config_dir())]
    pub conf_dir: ConfDir,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// 使用指定的描述符创建空数据库
    Init(InitCommand),
    /// 计算图片描述符并添加到数据库
    Add(AddCommand),
    /// 从数据库中搜索相似图片
    Search(SearchCommand),
    /// 显示图片的描述符
    Show(ShowCommand),
    /// 从数据库中删除图片
    Remove(RemoveCommand),
    /// 列出数据库中的所有图片
    List(ListCommand),
}

#[derive(Debug, Clone)]
pub struct ConfDir {
    path: PathBuf,
}

impl ConfDir {
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// 返回数据库文件的路径
    pub fn database(&self) -> PathBuf {
        self.path.join("imretrieve.db")
    }
}

impl FromStr for ConfDir {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { path: PathBuf::from(s) })
    }
}

fn parse_size(s: &str) -> anyhow::Result<(usize, usize)> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!("无效的尺寸: {}", s));
    }
    Ok((parts[0].parse()?, parts[1].parse()?))
}

#[derive(ValueEnum, Debug, Clone)]
pub enum OutputFormat {
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => unreachable!(),
        }
    }
}
