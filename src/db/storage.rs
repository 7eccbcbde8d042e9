use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::{Error, Result};
use crate::factory::{DescriptorConfig, DescriptorKind};

const MAGIC: &[u8; 8] = b"IMRLSTDB";
const VERSION: u32 = 1;

/// 文件中保存的数据库内容，比较器与分类器不会保存
#[derive(Serialize, Deserialize)]
pub(super) struct Snapshot {
    pub schema: Vec<DescriptorKind>,
    pub config: DescriptorConfig,
    pub records: Vec<Record>,
}

#[derive(Serialize)]
pub(super) struct SnapshotRef<'a> {
    pub schema: &'a [DescriptorKind],
    pub config: &'a DescriptorConfig,
    pub records: &'a [Record],
}

pub(super) fn write(path: &Path, snapshot: &SnapshotRef<'_>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    bincode::serialize_into(&mut writer, snapshot).map_err(|e| match *e {
        bincode::ErrorKind::Io(e) => Error::Io(e),
        e => Error::Encode(e.to_string()),
    })?;
    writer.flush()?;
    Ok(())
}

pub(super) fn read(path: &Path) -> Result<Snapshot> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(Error::Decode(format!("{} is not a descriptor database", path.display())));
    }

    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;
    let version = u32::from_le_bytes(version);
    if version != VERSION {
        return Err(Error::Decode(format!("unsupported database version {}, expected {}", version, VERSION)));
    }

    bincode::deserialize_from(reader).map_err(|e| match *e {
        bincode::ErrorKind::Io(e) => Error::Io(e),
        e => Error::Decode(e.to_string()),
    })
}
