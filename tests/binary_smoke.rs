use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;
use std::process::Command;

fn bin(td: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("synchronize"));
    // Keep a real user config out of the picture.
    cmd.env("SYNCHRONIZE_CONFIG", td.path().join("no-config.xml"));
    cmd
}

#[test]
fn binary_print_config_succeeds() {
    let td = TempDir::new().unwrap();
    let out = bin(&td).arg("--print-config").output().expect("spawn binary");
    assert!(out.status.success(), "binary should succeed with --print-config");
}

#[test]
fn missing_source_exits_one_with_message() {
    let td = TempDir::new().unwrap();
    td.child("dst").create_dir_all().unwrap();
    let out = bin(&td)
        .args(["--src"])
        .arg(td.path().join("missing"))
        .arg("--dst")
        .arg(td.path().join("dst"))
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error: Source path does not exist"), "{stderr}");
}

#[test]
fn preview_lists_changes_without_touching_destination() {
    let td = TempDir::new().unwrap();
    td.child("src/a.txt").write_str("a").unwrap();
    td.child("dst/b.txt").write_str("b").unwrap();

    let out = bin(&td)
        .arg("-s")
        .arg(td.path().join("src"))
        .arg("-d")
        .arg(td.path().join("dst"))
        .args(["-v", "0"])
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("new: a.txt"), "{stdout}");
    assert!(stdout.contains("deleted: b.txt"), "{stdout}");
    assert!(td.path().join("dst/b.txt").exists());
    assert!(!td.path().join("dst/a.txt").exists());
}

#[test]
fn forced_apply_mirrors_source() {
    let td = TempDir::new().unwrap();
    td.child("src/nested/a.txt").write_str("alpha").unwrap();
    td.child("dst/b.txt").write_str("b").unwrap();

    let out = bin(&td)
        .arg("--src")
        .arg(td.path().join("src"))
        .arg("--dst")
        .arg(td.path().join("dst"))
        .args(["--apply", "--force", "--verbose", "2"])
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Copying: nested/a.txt"), "{stdout}");
    assert!(stdout.contains("Removing: b.txt"), "{stdout}");
    assert_eq!(fs::read_to_string(td.path().join("dst/nested/a.txt")).unwrap(), "alpha");
    assert!(!td.path().join("dst/b.txt").exists());
}

#[test]
fn nothing_to_do_reports_up_to_date() {
    let td = TempDir::new().unwrap();
    td.child("src").create_dir_all().unwrap();
    td.child("dst").create_dir_all().unwrap();

    let out = bin(&td)
        .arg("-s")
        .arg(td.path().join("src"))
        .arg("-d")
        .arg(td.path().join("dst"))
        .args(["-a"])
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Backup is up-to-date"));
}

#[test]
fn lone_empty_dir_is_still_up_to_date_and_kept() {
    let td = TempDir::new().unwrap();
    td.child("src").create_dir_all().unwrap();
    td.child("dst/hollow").create_dir_all().unwrap();

    let out = bin(&td)
        .arg("--src")
        .arg(td.path().join("src"))
        .arg("--dst")
        .arg(td.path().join("dst"))
        .args(["--apply", "--force", "--empty"])
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Backup is up-to-date"), "{stdout}");
    assert!(td.path().join("dst/hollow").is_dir());
}

#[test]
fn nested_roots_fail() {
    let td = TempDir::new().unwrap();
    td.child("outer/inner").create_dir_all().unwrap();
    let out = bin(&td)
        .arg("-s")
        .arg(td.path().join("outer"))
        .arg("-d")
        .arg(td.path().join("outer/inner"))
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Destination cannot be a subdirectory of source"));
}
