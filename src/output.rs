//! User-facing console messages.
//! Tagged messages (`info:`, `warn:`, ...) are colored only when the target stream
//! is a TTY. Plain lines (`print_user`) carry the scriptable report.

use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Warn,
    Error,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Tone::Info => "info:",
            Tone::Warn => "warn:",
            Tone::Error => "Error:",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Tone::Warn | Tone::Error)
    }
}

fn emit(tone: Tone, msg: &str) {
    let stream = if tone.to_stderr() {
        atty::Stream::Stderr
    } else {
        atty::Stream::Stdout
    };
    let line = if atty::is(stream) {
        let tag = match tone {
            Tone::Info => tone.tag().cyan().bold().to_string(),
            Tone::Warn => tone.tag().yellow().bold().to_string(),
            Tone::Error => tone.tag().red().bold().to_string(),
        };
        format!("{tag} {msg}")
    } else {
        format!("{} {msg}", tone.tag())
    };
    if tone.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn print_info(msg: &str) {
    emit(Tone::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Tone::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Tone::Error, msg);
}

/// Plain line on stdout, no prefix. Used for report lines such as `new: a.txt`.
pub fn print_user(msg: &str) {
    println!("{msg}");
}
