use filetime::{FileTime, set_file_mtime};
use std::fs;
use tempfile::tempdir;

use synchronize::{
    ExecOptions, Exclusions, PlanScope, Sha256Hasher, SyncRoots, apply_plan, build_plan,
};

#[test]
fn second_pass_after_apply_finds_nothing_to_do() {
    let td = tempdir().unwrap();
    let r = SyncRoots::new(td.path().join("src"), td.path().join("dst"));
    fs::create_dir_all(r.source.join("docs/sub")).unwrap();
    fs::create_dir_all(r.destination.join("stale/dir")).unwrap();
    fs::create_dir_all(r.source.join("hollow")).unwrap();

    fs::write(r.source.join("docs/sub/a.txt"), "alpha").unwrap();
    fs::write(r.source.join("docs/b.txt"), "beta v2").unwrap();
    fs::create_dir_all(r.destination.join("docs")).unwrap();
    fs::write(r.destination.join("docs/b.txt"), "beta").unwrap();
    set_file_mtime(r.destination.join("docs/b.txt"), FileTime::from_unix_time(1_000, 0)).unwrap();
    fs::write(r.destination.join("stale/dir/old.txt"), "old").unwrap();
    fs::write(r.source.join("same.txt"), "same").unwrap();
    fs::write(r.destination.join("same.txt"), "same").unwrap();
    set_file_mtime(r.destination.join("same.txt"), FileTime::from_unix_time(1_000, 0)).unwrap();

    let scope = PlanScope {
        empty_dirs: true,
        metadata: true,
    };
    let ex = Exclusions::default();
    let hasher = Sha256Hasher::default();

    let first = build_plan(&r, &ex, &hasher, true).unwrap();
    assert!(!first.is_up_to_date(scope));
    let opts = ExecOptions {
        scope,
        ..Default::default()
    };
    apply_plan(&first, &r, &ex, &opts).unwrap();

    let second = build_plan(&r, &ex, &hasher, true).unwrap();
    assert!(second.changes.add.is_empty());
    assert!(second.changes.update.is_empty());
    assert!(second.changes.remove.is_empty());
    assert!(second.is_up_to_date(scope), "leftover work: {second:?}");
    assert!(!r.destination.join("stale").exists());
    assert!(!r.source.join("hollow").exists());
}

#[test]
fn excluded_destination_content_survives_apply() {
    let td = tempdir().unwrap();
    let r = SyncRoots::new(td.path().join("src"), td.path().join("dst"));
    fs::create_dir_all(&r.source).unwrap();
    fs::create_dir_all(r.destination.join("private")).unwrap();
    fs::write(r.destination.join("private/keep.me"), "mine").unwrap();
    fs::write(r.source.join("a.txt"), "a").unwrap();

    let ex = Exclusions::parse_list("private/");
    let plan = build_plan(&r, &ex, &Sha256Hasher::default(), false).unwrap();
    let opts = ExecOptions {
        scope: PlanScope {
            empty_dirs: true,
            metadata: true,
        },
        ..Default::default()
    };
    apply_plan(&plan, &r, &ex, &opts).unwrap();

    assert_eq!(fs::read_to_string(r.destination.join("private/keep.me")).unwrap(), "mine");
    assert!(r.destination.join("a.txt").exists());
}
