#![cfg(feature = "opencv")]

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use assert_cmd::prelude::*;
use opencv::core::{CV_8UC3, Mat, Scalar, Vector};
use opencv::imgcodecs;
use predicates::prelude::*;
use rstest::*;

macro_rules! cargo_run {
    ($cmd:expr, $($args:expr),*) => {
        {
            let mut cmd = Command::cargo_bin($cmd)?;
            $(cmd.arg($args);)*
            cmd.assert()
        }
    };
}

/// 写入纯色图片，颜色为 RGB
fn write_image(dir: &Path, name: &str, rgb: [u8; 3]) -> Result<PathBuf> {
    let path = dir.join(name);
    let [r, g, b] = rgb.map(f64::from);
    let mat = Mat::new_rows_cols_with_default(64, 64, CV_8UC3, Scalar::new(b, g, r, 0.))?;
    imgcodecs::imwrite(&path.to_string_lossy(), &mat, &Vector::new())?;
    Ok(path)
}

#[fixture]
fn dataset() -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().unwrap();
    write_image(dir.path(), "red.png", [255, 0, 0]).unwrap();
    write_image(dir.path(), "green.png", [0, 255, 0]).unwrap();
    write_image(dir.path(), "blue.png", [0, 0, 255]).unwrap();
    dir
}

#[rstest]
#[case::single_color("single-color")]
#[case::scalable_color("scalable-color")]
#[case::gridded("gridded")]
fn add_then_search(dataset: assert_fs::TempDir, #[case] kind: &str) -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;
    let red = dataset.path().join("red.png");

    cargo_run!("imretrieve", "-c", conf_dir.path(), "init", "-d", kind).success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "add", dataset.path()).success();

    cargo_run!("imretrieve", "-c", conf_dir.path(), "list", "--summary")
        .success()
        .stdout(predicate::str::starts_with("3\t"));

    cargo_run!("imretrieve", "-c", conf_dir.path(), "search", &red, "--count", "1")
        .success()
        .stdout(predicate::str::contains("red.png").and(predicate::str::contains("blue.png").not()));

    Ok(())
}

#[rstest]
fn add_skips_known_images(dataset: assert_fs::TempDir) -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;

    cargo_run!("imretrieve", "-c", conf_dir.path(), "init", "-d", "single-color").success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "add", dataset.path()).success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "add", dataset.path()).success();

    cargo_run!("imretrieve", "-c", conf_dir.path(), "list", "--summary")
        .success()
        .stdout(predicate::str::starts_with("3\t"));

    Ok(())
}

#[rstest]
fn remove_image(dataset: assert_fs::TempDir) -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;
    let green = dataset.path().join("green.png");

    cargo_run!("imretrieve", "-c", conf_dir.path(), "init", "-d", "single-color").success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "add", dataset.path()).success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "remove", &green).success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "remove", &green).failure();

    cargo_run!("imretrieve", "-c", conf_dir.path(), "list")
        .success()
        .stdout(predicate::str::contains("green.png").not());

    Ok(())
}

#[rstest]
fn search_json(dataset: assert_fs::TempDir) -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;
    let blue = dataset.path().join("blue.png");

    cargo_run!("imretrieve", "-c", conf_dir.path(), "init", "-d", "single-color", "dominant-color").success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "add", dataset.path()).success();

    cargo_run!("imretrieve", "-c", conf_dir.path(), "search", &blue, "--output-format", "json")
        .success()
        .stdout(predicate::str::contains("\"distance\": 0.0"));

    Ok(())
}

#[test]
fn init_twice_fails() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;

    cargo_run!("imretrieve", "-c", conf_dir.path(), "init", "-d", "label").success();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "init", "-d", "label").failure();
    cargo_run!("imretrieve", "-c", conf_dir.path(), "init", "-d", "label", "--overwrite").success();

    Ok(())
}

#[test]
fn search_without_database() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;
    let dataset = assert_fs::TempDir::new()?;
    let red = write_image(dataset.path(), "red.png", [255, 0, 0])?;

    cargo_run!("imretrieve", "-c", conf_dir.path(), "search", red).failure();

    Ok(())
}

#[rstest]
fn show_descriptor(dataset: assert_fs::TempDir) -> Result<()> {
    let red = dataset.path().join("red.png");

    cargo_run!("imretrieve", "show", &red, "-d", "single-color")
        .success()
        .stdout(predicate::str::contains("255"));

    Ok(())
}
