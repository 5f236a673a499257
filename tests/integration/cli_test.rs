use std::path::Path;
use std::process::{Command, Output};
use anyhow::Result;
use tempfile::TempDir;

fn hdb(data_dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_hdb"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()?;
    Ok(output)
}

fn stdout_of(output: &Output) -> Result<String> {
    assert!(
        output.status.success(),
        "hdb failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout.clone())?)
}

#[test]
fn test_cli_create_insert_scan() -> Result<()> {
    let dir = TempDir::new()?;
    let data = dir.path();

    let out = stdout_of(&hdb(data, &["create-table", "people", "id:INT", "name:VARCHAR"])?)?;
    assert!(out.contains("Table people created"));
    assert!(data.join("people-schema.json").exists());

    let out = stdout_of(&hdb(data, &["insert", "people", "id=1", "name=Ann"])?)?;
    assert!(out.contains("Inserted at 0"));
    let out = stdout_of(&hdb(data, &["insert", "people", "id=2", "name=Bo"])?)?;
    // 4-byte prefix + INT + 2-byte length + "Ann"
    assert!(out.contains("Inserted at 13"));

    let out = stdout_of(&hdb(data, &["scan", "people"])?)?;
    assert!(out.contains("0\t{id: 1, name: \"Ann\"}"));
    assert!(out.contains("13\t{id: 2, name: \"Bo\"}"));
    assert!(out.contains("(2 rows)"));

    let out = stdout_of(&hdb(data, &["scan", "people", "--raw"])?)?;
    assert!(out.contains("0\t000000010003416e6e"));
    Ok(())
}

#[test]
fn test_cli_get_find_usage_drop() -> Result<()> {
    let dir = TempDir::new()?;
    let data = dir.path();

    stdout_of(&hdb(data, &["create-table", "people", "id:INT", "name:VARCHAR"])?)?;
    for (id, name) in [("1", "Olivia"), ("2", "Emma"), ("3", "Olivia")] {
        stdout_of(&hdb(data, &["insert", "people", &format!("id={}", id), &format!("name={}", name)])?)?;
    }

    let out = stdout_of(&hdb(data, &["get", "people", "16"])?)?;
    assert!(out.contains("{id: 2, name: \"Emma\"}"));

    let out = stdout_of(&hdb(data, &["find", "people", "name", "Olivia"])?)?;
    assert!(out.contains("Locations: [0, 30]"));
    assert!(out.contains("{id: 3, name: \"Olivia\"}"));

    // The second Olivia fits in the space left in block 0
    let out = stdout_of(&hdb(data, &["usage", "people"])?)?;
    assert!(out.contains("0\t46"));
    assert!(out.contains("file size: 46 bytes"));

    let out = stdout_of(&hdb(data, &["drop-table", "people"])?)?;
    assert!(out.contains("Table people dropped"));
    assert!(!data.join("people.data").exists());
    Ok(())
}

#[test]
fn test_cli_rejects_bad_input() -> Result<()> {
    let dir = TempDir::new()?;
    let data = dir.path();

    assert!(!hdb(data, &["insert", "missing", "id=1"])?.status.success());

    stdout_of(&hdb(data, &["create-table", "people", "id:INT"])?)?;
    assert!(!hdb(data, &["insert", "people", "id=abc"])?.status.success());
    assert!(!hdb(data, &["create-table", "bad", "id:FLOAT"])?.status.success());
    Ok(())
}

#[test]
fn test_cli_rejects_zero_block_size() -> Result<()> {
    let dir = TempDir::new()?;
    let data = dir.path();

    let output = hdb(data, &["--block-size", "0", "create-table", "people", "id:INT"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("block size"));
    assert!(!data.join("people-schema.json").exists());
    Ok(())
}
