#![cfg(not(tarpaulin_include))]

use clap::Parser;
use score_graphs::{
    App, AppView, ChartOptions, Config, DEFAULT_ENDPOINT, DEFAULT_EXPORT_DIR, SearchBar,
    Student, UploadError, UploadOutcome, UploadTicket,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

type UploadResult = (UploadTicket, Result<Vec<Student>, UploadError>);

/// Upload a spreadsheet of student scores and chart each student
#[derive(Parser, Debug)]
#[command(name = "score-graphs", version)]
struct Cli {
    /// Upload endpoint receiving the spreadsheet
    #[arg(long, env = "SCORE_GRAPHS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Directory exported PNG charts are written to
    #[arg(long, env = "SCORE_GRAPHS_EXPORT_DIR", default_value = DEFAULT_EXPORT_DIR)]
    export_dir: PathBuf,

    /// Chart width in pixels
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 400, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Spreadsheet to select on startup
    #[arg(long)]
    file: Option<PathBuf>,

    /// Initial search query
    #[arg(long)]
    query: Option<String>,

    /// Upload, filter, export every visible chart and exit
    #[arg(long, requires = "file")]
    batch: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            endpoint: self.endpoint.clone(),
            export_dir: self.export_dir.clone(),
            chart: ChartOptions {
                width: self.width,
                height: self.height,
            },
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// One line of user input
#[derive(Debug, PartialEq)]
enum Command {
    Select(PathBuf),
    Upload,
    Search(String),
    List,
    Export(String),
    ExportAll,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };

    match word {
        "select" if !rest.trim().is_empty() => Command::Select(PathBuf::from(rest.trim())),
        "upload" => Command::Upload,
        // The rest of the line is the raw input value, spaces included
        "search" => Command::Search(rest.to_string()),
        "list" | "ls" => Command::List,
        "export" if !rest.trim().is_empty() => Command::Export(rest.trim().to_string()),
        "export-all" => Command::ExportAll,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

const HELP: &str = "\
Commands:
  select <path>   choose the spreadsheet to upload
  upload          send the selected spreadsheet
  search [text]   filter by name or ID (empty shows everyone)
  list            show the visible students
  export <id>     save one visible chart as <name>_<id>.png
  export-all      save every visible chart
  help            show this message
  quit            leave";

fn print_view(view: &AppView) {
    println!("== {} ==", view.title);
    match &view.selected {
        Some(path) => println!("File: {}", path.display()),
        None => println!("File: (none selected)"),
    }
    if view.uploading {
        println!("Uploading...");
    }
    if let Some(error) = &view.error {
        println!("Upload failed: {}", error);
    }
    if view.query.is_empty() {
        println!("Search: ({})", SearchBar::PLACEHOLDER);
    } else {
        println!("Search: {:?}", view.query);
    }

    if view.graphs.is_empty() {
        println!("(no students)");
    }
    for graph in &view.graphs {
        let config = graph.config();
        let points: Vec<String> = config
            .labels
            .iter()
            .zip(&config.data)
            .map(|(label, score)| format!("{}: {}", label, score))
            .collect();
        println!("  {}  [{}]", graph.heading(), points.join(", "));
    }
}

fn prompt(app: &App) {
    let marker = if app.state().is_uploading() { "uploading" } else { "ok" };
    print!("({}) > ", marker);
    let _ = io::stdout().flush();
}

fn export_one(app: &App, id: &str) {
    let Some(graph) = app.view().graphs.into_iter().find(|graph| graph.key() == id) else {
        println!("No visible student with ID {}", id);
        return;
    };

    match graph.render(&app.config().chart).and_then(|chart| app.export(&chart)) {
        Ok(path) => println!("Saved {}", path.display()),
        Err(e) => println!("Export failed: {}", e),
    }
}

fn export_all(app: &App) -> Result<usize, score_graphs::ChartError> {
    let charts = app.render_charts()?;
    for chart in &charts {
        let path = app.export(chart)?;
        println!("Saved {}", path.display());
    }
    Ok(charts.len())
}

async fn run_interactive(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<UploadResult>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_view(&app.view());
    println!("{}", HELP);
    prompt(&app);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match parse_command(&line) {
                    Command::Select(path) => {
                        app.select_file(path);
                        print_view(&app.view());
                    }
                    Command::Upload => match app.start_upload().await {
                        Ok(pending) => {
                            println!("Uploading {}...", pending.file_name());
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let _ = tx.send(pending.send().await);
                            });
                        }
                        Err(e) => println!("Upload not started: {}", e),
                    },
                    Command::Search(query) => {
                        app.search(query);
                        print_view(&app.view());
                    }
                    Command::List => print_view(&app.view()),
                    Command::Export(id) => export_one(&app, &id),
                    Command::ExportAll => match export_all(&app) {
                        Ok(count) => println!("Exported {} charts", count),
                        Err(e) => println!("Export failed: {}", e),
                    },
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                    Command::Unknown(input) if input.trim().is_empty() => {}
                    Command::Unknown(input) => println!("Unknown command: {} (try help)", input),
                }
                prompt(&app);
            }
            Some((ticket, result)) = rx.recv() => {
                match app.finish_upload(ticket, result) {
                    UploadOutcome::Applied { students } => println!("\nLoaded {} students", students),
                    UploadOutcome::Failed => println!(),
                    UploadOutcome::Stale => continue,
                }
                print_view(&app.view());
                prompt(&app);
            }
        }
    }

    Ok(())
}

async fn run_batch(mut app: App, query: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    if let UploadOutcome::Failed = app.upload().await? {
        let message = app.state().last_error().unwrap_or("upload failed").to_string();
        return Err(message.into());
    }
    if let Some(query) = query {
        app.search(query);
    }

    print_view(&app.view());
    let count = export_all(&app)?;
    println!("Exported {} charts to {}", count, app.config().export_dir.display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut app = App::new(cli.config())?;
    if let Some(file) = &cli.file {
        app.select_file(file.clone());
    }

    if cli.batch {
        return run_batch(app, cli.query).await;
    }

    if let Some(query) = cli.query {
        app.search(query);
    }
    run_interactive(app).await
}
