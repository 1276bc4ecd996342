use std::{fmt::Debug, io::BufWriter, path::PathBuf};

use anyhow::Context;
use fs_err::File;
use serde::{Deserialize, Serialize};

pub fn write_json_pretty<P: Into<PathBuf> + Debug, T: Serialize>(
    path: P,
    value: &T,
) -> anyhow::Result<()> {
    let path = path.into();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    (|| {
        serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), value)
            .map_err(anyhow::Error::new)
    })()
    .with_context(|| format!("While trying to write {path:?}"))
}

pub fn read_toml<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    let path = path.into();
    (|| toml::from_str(&fs_err::read_to_string(&path)?).map_err(anyhow::Error::new))().with_context(
        || {
            format!(
                "While trying to parse {path:?} as {}",
                std::any::type_name::<T>()
            )
        },
    )
}

/// Reads `path` as TOML if given, otherwise falls back to `T::default()`.
pub fn read_toml_or_default<P: Into<PathBuf> + Debug, T: Default + for<'de> Deserialize<'de>>(
    path: Option<P>,
) -> anyhow::Result<T> {
    match path {
        Some(path) => read_toml(path),
        None => Ok(T::default()),
    }
}
