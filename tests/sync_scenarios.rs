use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use synchronize::{Exclusions, RelPath, Sha256Hasher, SyncPlan, SyncRoots, build_plan};

fn write_at(root: &Path, rel: &str, body: &str, secs: i64) {
    let p = root.join(rel);
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&p, body).unwrap();
    set_file_mtime(&p, FileTime::from_unix_time(secs, 0)).unwrap();
}

fn roots(base: &Path) -> SyncRoots {
    let r = SyncRoots::new(base.join("src"), base.join("dst"));
    fs::create_dir_all(&r.source).unwrap();
    fs::create_dir_all(&r.destination).unwrap();
    r
}

fn plan(r: &SyncRoots, ex: &Exclusions) -> SyncPlan {
    build_plan(r, ex, &Sha256Hasher::default(), true).unwrap()
}

fn names<'a>(set: impl IntoIterator<Item = &'a RelPath>) -> Vec<&'a str> {
    set.into_iter().map(RelPath::as_str).collect()
}

#[test]
fn source_only_is_added_destination_only_is_removed() {
    let td = tempdir().unwrap();
    let r = roots(td.path());
    write_at(&r.source, "a.txt", "a", 1_000);
    write_at(&r.destination, "b.txt", "b", 1_000);

    let p = plan(&r, &Exclusions::default());
    assert_eq!(names(&p.changes.add), ["a.txt"]);
    assert_eq!(names(&p.changes.remove), ["b.txt"]);
    assert!(p.changes.update.is_empty());
}

#[test]
fn identical_files_with_older_source_need_source_repair() {
    let td = tempdir().unwrap();
    let r = roots(td.path());
    write_at(&r.source, "c.txt", "same bytes", 1_000);
    write_at(&r.destination, "c.txt", "same bytes", 2_000);

    let p = plan(&r, &Exclusions::default());
    assert_eq!(names(&p.changes.repair_src), ["c.txt"]);
    assert!(p.changes.repair_dst.is_empty());
    assert_eq!(p.changes.content_changes(), 0);
}

#[test]
fn differing_bytes_are_updates_whichever_side_is_newer() {
    let td = tempdir().unwrap();
    let r = roots(td.path());
    write_at(&r.source, "d.txt", "new", 1_000);
    write_at(&r.destination, "d.txt", "old content", 9_000);
    write_at(&r.source, "e.txt", "new", 9_000);
    write_at(&r.destination, "e.txt", "old content", 1_000);

    let p = plan(&r, &Exclusions::default());
    assert_eq!(names(&p.changes.update), ["d.txt", "e.txt"]);
    assert_eq!(p.changes.metadata_repairs(), 0);
}

#[test]
fn untouched_files_appear_in_no_set() {
    let td = tempdir().unwrap();
    let r = roots(td.path());
    for rel in ["c1.txt", "deep/c2.txt"] {
        write_at(&r.source, rel, rel, 4_000);
        write_at(&r.destination, rel, rel, 4_000);
    }
    write_at(&r.source, "a.txt", "a", 4_000);
    write_at(&r.destination, "b/b.txt", "b", 4_000);

    let p = plan(&r, &Exclusions::default());
    let c = &p.changes;
    assert_eq!(names(&c.add), ["a.txt"]);
    assert_eq!(names(&c.remove), ["b/b.txt"]);
    for set in [&c.add, &c.update, &c.remove, &c.repair_src, &c.repair_dst] {
        assert!(!set.contains("c1.txt"));
        assert!(!set.contains("deep/c2.txt"));
    }
}

#[test]
fn exclusion_is_a_literal_prefix_on_both_sides() {
    let td = tempdir().unwrap();
    let r = roots(td.path());
    write_at(&r.source, "logs", "file named logs", 1_000);
    write_at(&r.source, "keep.txt", "k", 1_000);
    write_at(&r.source, "logs2/x", "x", 1_000);
    write_at(&r.destination, "logs/old.log", "o", 1_000);
    write_at(&r.destination, "catalog.txt", "c", 1_000);

    let p = plan(&r, &Exclusions::parse_list("logs"));
    assert_eq!(names(&p.changes.add), ["keep.txt"]);
    assert_eq!(names(&p.changes.remove), ["catalog.txt"]);
}

#[test]
fn question_mark_separates_several_exclusions() {
    let td = tempdir().unwrap();
    let r = roots(td.path());
    write_at(&r.source, "tmp/a", "a", 1_000);
    write_at(&r.source, "cache/b", "b", 1_000);
    write_at(&r.source, "docs/c", "c", 1_000);

    let p = plan(&r, &Exclusions::parse_list("tmp?cache/"));
    assert_eq!(names(&p.changes.add), ["docs/c"]);
}

#[test]
fn empty_dirs_include_dirs_holding_only_empty_dirs() {
    let td = tempdir().unwrap();
    let r = roots(td.path());
    fs::create_dir_all(r.source.join("outer/inner")).unwrap();
    write_at(&r.source, "full/f.txt", "f", 1_000);
    write_at(&r.destination, "full/f.txt", "f", 1_000);

    let p = plan(&r, &Exclusions::default());
    assert_eq!(names(&p.source_empty_dirs), ["outer", "outer/inner"]);
    assert!(p.dest_empty_dirs.is_empty());
}
