//! Confirmation prompt.
//! A small synchronous state machine: Prompting -> {Totals, List, Apply, Abort}.
//! Totals and List print and return to Prompting; Apply and Abort end the loop.
//! Unrecognized input re-prompts. End of input counts as Abort.

use std::io::{self, BufRead, Write};

use crate::plan::{PlanScope, SyncPlan};
use crate::report::{write_listing, write_totals};

pub const PROMPT: &str = "Do you want to apply the changes?
\ty - yes\t\tapply the changes
\tn - no\t\tabort without changing anything
\tt - totals\tshow the total number of changes
\tl - list\tlist every change
";

/// One answer at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Apply,
    Abort,
    Totals,
    List,
}

impl Choice {
    /// Parse an answer by its first non-blank character, case-insensitively.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().chars().next()?.to_ascii_lowercase() {
            'y' => Some(Choice::Apply),
            'n' => Some(Choice::Abort),
            't' => Some(Choice::Totals),
            'l' => Some(Choice::List),
            _ => None,
        }
    }
}

/// Run the prompt until the user decides. Returns true to apply.
pub fn confirm<R, W>(input: &mut R, out: &mut W, plan: &SyncPlan, scope: PlanScope) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        out.write_all(PROMPT.as_bytes())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match Choice::parse(&line) {
            Some(Choice::Apply) => return Ok(true),
            Some(Choice::Abort) => return Ok(false),
            Some(Choice::Totals) => write_totals(out, plan, scope)?,
            Some(Choice::List) => write_listing(out, plan, scope)?,
            None => {}
        }
    }
}
