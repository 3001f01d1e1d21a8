//! Line-oriented command shell over a `Session`

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::core::SortKey;
use crate::error::AppError;
use crate::output::{ExportFormat, write_export};
use crate::render::{ChartSurface, RenderReport, TableAdapter};
use crate::session::{Event, Session};

const HELP: &str = "\
Commands:
  open <path>                 load a statistics file
  sort <title|authors|duration>
                              sort the book table (same column again flips direction)
  min <minutes>               hide books read for less than <minutes>
  export <csv|json> [path]    export the book table (stdout without a path)
  show                        render again
  help                        this text
  quit                        leave the shell";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Event(Event),
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    Help,
    Quit,
    Nothing,
}

fn parse_line(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(Command::Nothing),
        "open" | "load" => {
            if rest.is_empty() {
                return Err("usage: open <path>".to_string());
            }
            Ok(Command::Event(Event::FileSelected(PathBuf::from(rest))))
        }
        "sort" => rest
            .parse::<SortKey>()
            .map(|key| Command::Event(Event::SortSelected(key)))
            .map_err(|e| e.to_string()),
        "min" => rest
            .parse::<i64>()
            .map(|minutes| Command::Event(Event::ThresholdChanged(minutes)))
            .map_err(|_| format!("Invalid minutes: \"{rest}\"")),
        "export" => {
            let (format, path) = match rest.split_once(char::is_whitespace) {
                Some((format, path)) => (format, Some(PathBuf::from(path.trim()))),
                None => (rest, None),
            };
            let format = ExportFormat::parse(format)
                .ok_or_else(|| "usage: export <csv|json> [path]".to_string())?;
            Ok(Command::Export { format, path })
        }
        "show" | "refresh" => Ok(Command::Event(Event::Refresh)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command: {other} (try \"help\")")),
    }
}

fn report_status<W: Write>(status: &mut W, report: &RenderReport) -> std::io::Result<()> {
    if report.is_ok() {
        return Ok(());
    }
    for failure in &report.failures {
        writeln!(status, "warning: {failure}")?;
    }
    Ok(())
}

/// Read commands until EOF or `quit`.
///
/// Bad input prints a status line and changes nothing; a failed load keeps
/// whatever was displayed before.
pub(crate) fn run<T, C, R, W>(
    session: &mut Session<T, C>,
    input: R,
    mut status: W,
    prompt: bool,
) -> Result<(), AppError>
where
    T: TableAdapter,
    C: ChartSurface,
    R: BufRead,
    W: Write,
{
    writeln!(
        status,
        "readstats shell (SQLite {}), \"help\" for commands",
        session.engine().version()
    )?;

    let mut lines = input.lines();
    loop {
        if prompt {
            write!(status, "> ")?;
            status.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let command = match parse_line(&line?) {
            Ok(command) => command,
            Err(message) => {
                writeln!(status, "{message}")?;
                continue;
            }
        };

        match command {
            Command::Nothing => {}
            Command::Help => writeln!(status, "{HELP}")?,
            Command::Quit => break,
            Command::Export { format, path } => {
                if let Err(e) = write_export(&session.book_rows(), format, path.as_deref()) {
                    writeln!(status, "error: {e}")?;
                } else if let Some(path) = path {
                    writeln!(status, "Exported to {}", path.display())?;
                }
            }
            Command::Event(event) => {
                let opened = matches!(event, Event::FileSelected(_));
                let sorted = matches!(event, Event::SortSelected(_));
                match session.handle(event) {
                    Ok(report) => {
                        report_status(&mut status, &report)?;
                        if sorted {
                            let state = session.state();
                            let direction = if state.ascending() {
                                "ascending"
                            } else {
                                "descending"
                            };
                            writeln!(status, "Sorted by {} ({direction})", state.sort_key())?;
                        }
                        if opened && let Some(path) = session.source() {
                            let relations = session.relations();
                            writeln!(
                                status,
                                "Loaded {} books, {} reading events from {}",
                                relations.books.len(),
                                relations.events.len(),
                                path.display()
                            )?;
                        }
                    }
                    Err(e) => writeln!(status, "error: {e}")?,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ViewState;
    use crate::render::Dispatcher;
    use crate::render::testing::{RecordingCharts, RecordingTable};
    use crate::session::fixtures::sample_db;
    use crate::source::Engine;
    use crate::utils::Timezone;
    use tempfile::TempDir;

    fn session() -> Session<RecordingTable, RecordingCharts> {
        let dispatcher = Dispatcher::new(RecordingTable::default(), RecordingCharts::default());
        Session::new(
            Engine::init().unwrap(),
            dispatcher,
            ViewState::default(),
            Timezone::Named(chrono_tz::UTC),
        )
    }

    fn run_script(session: &mut Session<RecordingTable, RecordingCharts>, script: &str) -> String {
        let mut status = Vec::new();
        run(session, script.as_bytes(), &mut status, false).unwrap();
        String::from_utf8(status).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            parse_line("sort title").unwrap(),
            Command::Event(Event::SortSelected(SortKey::Title))
        );
        assert_eq!(
            parse_line("  MIN 15 ").unwrap(),
            Command::Event(Event::ThresholdChanged(15))
        );
        assert_eq!(
            parse_line("open /tmp/my stats.sqlite3").unwrap(),
            Command::Event(Event::FileSelected(PathBuf::from("/tmp/my stats.sqlite3")))
        );
        assert_eq!(
            parse_line("export json out.json").unwrap(),
            Command::Export {
                format: ExportFormat::Json,
                path: Some(PathBuf::from("out.json")),
            }
        );
        assert_eq!(parse_line("").unwrap(), Command::Nothing);
        assert_eq!(parse_line("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_line("sort pages").unwrap_err().contains("pages"));
        assert!(parse_line("min ten").unwrap_err().contains("Invalid minutes"));
        assert!(parse_line("open").is_err());
        assert!(parse_line("export xml").is_err());
        assert!(parse_line("dance").unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn script_drives_session() {
        let dir = TempDir::new().unwrap();
        let db = sample_db(&dir);
        let mut s = session();
        let out = run_script(
            &mut s,
            &format!("open {}\nmin 30\nsort title\nquit\nmin 0\n", db.display()),
        );

        assert!(out.contains("SQLite"));
        assert!(out.contains("Loaded 2 books, 3 reading events"));
        assert_eq!(s.state().threshold_secs(), 1800);
        assert_eq!(s.state().sort_key(), SortKey::Title);
        assert!(out.contains("Sorted by title (ascending)"));
        assert_eq!(s.dispatcher().table().summaries.len(), 3);
    }

    #[test]
    fn bad_commands_change_nothing() {
        let dir = TempDir::new().unwrap();
        let db = sample_db(&dir);
        let mut s = session();
        let out = run_script(
            &mut s,
            &format!(
                "open {}\nsort pages\nmin lots\nopen {}\n",
                db.display(),
                dir.path().join("missing.db").display()
            ),
        );

        assert!(out.contains("Invalid sort column \"pages\""));
        assert!(out.contains("Invalid minutes"));
        assert!(out.contains("error: Cannot open"));
        assert_eq!(*s.state(), ViewState::default());
        assert_eq!(s.relations().books.len(), 2);
        assert_eq!(s.dispatcher().table().summaries.len(), 1);
    }

    #[test]
    fn export_writes_current_table() {
        let dir = TempDir::new().unwrap();
        let db = sample_db(&dir);
        let target = dir.path().join("books.csv");
        let mut s = session();
        let out = run_script(
            &mut s,
            &format!("open {}\nmin 30\nexport csv {}\n", db.display(), target.display()),
        );

        assert!(out.contains("Exported to"));
        let csv = std::fs::read_to_string(&target).unwrap();
        assert_eq!(
            csv,
            "title,authors,total_read_time\n\"Dune\",\"Frank Herbert\",\"5400\"\n"
        );
    }
}
