use std::io::{self, IsTerminal};
use std::path::Path;

use crate::cli::{Cli, Commands, ViewCommand};
use crate::core::{
    ViewState, book_distribution, book_table, cumulative_totals, daily_totals, summary_total,
    weekday_totals,
};
use crate::error::AppError;
use crate::output::{
    ChartOptions, ExportFormat, NumberFormat, TableOptions, TerminalCharts, TerminalTable,
    render_chart, summary_json, summary_line, view_json, views_json, write_export,
};
use crate::render::{
    Dispatcher, TableAdapter, Views, cumulative_chart, daily_chart, distribution_chart,
    weekday_chart,
};
use crate::session::{Event, Session};
use crate::shell;
use crate::source::{Engine, LoadResult};
use crate::utils::{JqFilter, Timezone};

/// Print JSON output, optionally filtering through jq
fn print_json(json: &str, jq_filter: Option<JqFilter<'_>>) -> Result<(), AppError> {
    match jq_filter {
        Some(filter) => print!("{}", filter.apply(json)?),
        None => println!("{json}"),
    }
    Ok(())
}

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) state: ViewState,
    pub(crate) timezone: Timezone,
    pub(crate) number_format: NumberFormat,
}

impl CommandContext<'_> {
    fn json(&self) -> bool {
        self.cli.json || self.cli.jq.is_some()
    }

    fn jq_filter(&self) -> Option<JqFilter<'_>> {
        self.cli
            .jq
            .as_deref()
            .map(|program| JqFilter::new(program, self.cli.use_color()))
    }

    fn table_options(&self) -> TableOptions {
        TableOptions {
            use_color: self.cli.use_color(),
            compact: self.cli.compact,
            number_format: self.number_format,
        }
    }

    fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            use_color: self.cli.use_color(),
            number_format: self.number_format,
        }
    }

    fn input_file(&self) -> Result<&Path, AppError> {
        self.cli.file.as_deref().ok_or(AppError::NoInput)
    }
}

fn handle_json(view: ViewCommand, views: &Views, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let json = match view {
        ViewCommand::All => views_json(views, &ctx.state)?,
        ViewCommand::Summary => summary_json(views.summary_seconds)?,
        ViewCommand::Books => view_json(&views.books)?,
        ViewCommand::Distribution => view_json(&views.distribution)?,
        ViewCommand::Daily => view_json(&views.daily)?,
        ViewCommand::Cumulative => view_json(&views.cumulative)?,
        ViewCommand::Weekday => view_json(&views.weekday)?,
    };
    print_json(&json, ctx.jq_filter())
}

fn handle_all(path: &Path, loaded: &LoadResult, ctx: &CommandContext<'_>) {
    let relations = &loaded.relations;
    if relations.books.is_empty() && relations.events.is_empty() {
        println!("No reading data found in {}.", path.display());
        return;
    }

    let report = {
        let mut dispatcher = Dispatcher::new(
            TerminalTable::new(io::stdout(), ctx.table_options()),
            TerminalCharts::new(io::stdout(), ctx.chart_options()),
        );
        dispatcher.render(relations, &ctx.state, ctx.timezone)
    };
    for failure in &report.failures {
        eprintln!("Warning: {failure}");
    }

    println!(
        "\n  {} ({:.0}ms)",
        summary_line(relations.books.len(), relations.events.len(), ctx.number_format),
        loaded.elapsed_ms
    );
}

fn handle_view(
    engine: &Engine,
    path: &Path,
    view: ViewCommand,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let loaded = engine.load(path)?;
    let relations = &loaded.relations;

    if ctx.json() {
        let views = Views::compute(relations, &ctx.state, ctx.timezone);
        return handle_json(view, &views, ctx);
    }

    // Text output computes only what the selected view shows
    let state = &ctx.state;
    let chart = match view {
        ViewCommand::All => {
            handle_all(path, &loaded, ctx);
            return Ok(());
        }
        ViewCommand::Summary => {
            let mut table = TerminalTable::new(io::stdout(), ctx.table_options());
            return table.show_summary(summary_total(&relations.books));
        }
        ViewCommand::Books => {
            let rows = book_table(
                &relations.books,
                state.threshold_secs(),
                state.sort_key(),
                state.ascending(),
            );
            let mut table = TerminalTable::new(io::stdout(), ctx.table_options());
            return table.show_books(&rows, state);
        }
        ViewCommand::Distribution => distribution_chart(&book_distribution(
            &relations.books,
            state.threshold_secs(),
        )),
        ViewCommand::Daily => daily_chart(&daily_totals(&relations.events, ctx.timezone)),
        ViewCommand::Cumulative => {
            cumulative_chart(&cumulative_totals(&relations.events, ctx.timezone))
        }
        ViewCommand::Weekday => weekday_chart(&weekday_totals(&relations.events, ctx.timezone)),
    };

    match chart {
        Some(chart) => print!("{}", render_chart(&chart, ctx.chart_options())),
        None => println!("No reading data found."),
    }
    Ok(())
}

fn handle_export(
    engine: &Engine,
    path: &Path,
    format: ExportFormat,
    output: Option<&Path>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let loaded = engine.load(path)?;
    let rows = book_table(
        &loaded.relations.books,
        ctx.state.threshold_secs(),
        ctx.state.sort_key(),
        ctx.state.ascending(),
    );
    write_export(&rows, format, output)?;
    if let Some(output) = output {
        eprintln!("Exported {} books to {}", rows.len(), output.display());
    }
    Ok(())
}

fn run_shell(engine: Engine, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let dispatcher = Dispatcher::new(
        TerminalTable::new(io::stdout(), ctx.table_options()),
        TerminalCharts::new(io::stdout(), ctx.chart_options()),
    );
    let mut session = Session::new(engine, dispatcher, ctx.state, ctx.timezone);

    if let Some(path) = ctx.cli.file.clone()
        && let Err(e) = session.handle(Event::FileSelected(path))
    {
        eprintln!("Error: {e}");
    }

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    shell::run(&mut session, stdin.lock(), io::stdout(), prompt)
}

/// Resolve shared options, then dispatch the selected command
pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let ctx = CommandContext {
        cli,
        state: cli.view_state()?,
        timezone: Timezone::parse(cli.timezone.as_deref())?,
        number_format: NumberFormat::from_locale(cli.locale.as_deref())?,
    };
    let engine = Engine::init()?;

    if let Some(view) = ViewCommand::from_command(cli.command.as_ref()) {
        return handle_view(&engine, ctx.input_file()?, view, &ctx);
    }

    match &cli.command {
        Some(Commands::Export { format, output }) => handle_export(
            &engine,
            ctx.input_file()?,
            *format,
            output.as_deref(),
            &ctx,
        ),
        _ => run_shell(engine, &ctx),
    }
}
