//! Plan rendering.
//! One change per line as `<category>: <relative-path>`, plus a totals block.
//! Both writers take any `io::Write` so the prompt and tests can capture output.

use std::io::{self, Write};

use crate::plan::{PlanScope, SyncPlan};
use crate::tree::RelPath;

pub const NEW: &str = "new";
pub const MODIFIED: &str = "modified";
pub const DELETED: &str = "deleted";
pub const SOURCE_EMPTY_DIR: &str = "source empty dir";
pub const DEST_EMPTY_DIR: &str = "dest empty dir";
pub const SOURCE_REPAIR: &str = "source repair";
pub const DEST_REPAIR: &str = "dest repair";

fn section<'a, W, I>(w: &mut W, category: &str, paths: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a RelPath>,
{
    for p in paths {
        writeln!(w, "{category}: {p}")?;
    }
    Ok(())
}

/// Write every pending change. Empty-dir and repair categories appear only when
/// `scope` includes them.
pub fn write_listing<W: Write>(w: &mut W, plan: &SyncPlan, scope: PlanScope) -> io::Result<()> {
    let c = &plan.changes;
    section(w, NEW, &c.add)?;
    section(w, MODIFIED, &c.update)?;
    section(w, DELETED, &c.remove)?;
    if scope.empty_dirs {
        section(w, SOURCE_EMPTY_DIR, &plan.source_empty_dirs)?;
        section(w, DEST_EMPTY_DIR, &plan.dest_empty_dirs)?;
    }
    if scope.metadata {
        section(w, SOURCE_REPAIR, &c.repair_src)?;
        section(w, DEST_REPAIR, &c.repair_dst)?;
    }
    Ok(())
}

/// Write the per-category counts.
pub fn write_totals<W: Write>(w: &mut W, plan: &SyncPlan, scope: PlanScope) -> io::Result<()> {
    let c = &plan.changes;
    writeln!(w, "Search found a total of:")?;
    writeln!(w, "\t{} new files", c.add.len())?;
    writeln!(w, "\t{} modified files", c.update.len())?;
    writeln!(w, "\t{} deleted files", c.remove.len())?;
    if scope.empty_dirs {
        writeln!(w, "\t{} source empty dirs", plan.source_empty_dirs.len())?;
        writeln!(w, "\t{} dest empty dirs", plan.dest_empty_dirs.len())?;
    }
    if scope.metadata {
        writeln!(w, "\t{} source metadata repairs", c.repair_src.len())?;
        writeln!(w, "\t{} dest metadata repairs", c.repair_dst.len())?;
    }
    if !plan.skipped.is_empty() {
        writeln!(w, "\t{} unreadable dirs skipped", plan.skipped.len())?;
    }
    Ok(())
}
