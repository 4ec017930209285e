use std::{
    env,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{anyhow, bail, Context, Result};
use canvas_data::math::{
    bpm_to_tempo_name, parse_arithmetic_with, parse_metronome, parse_unit_conversion_with,
    MAX_BPM, MIN_BPM,
};
use canvas_data::{Catalog, CatalogSnapshot};
use canvas_search_core::{SearchConfig, SearchEngine};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use output::{OutputFormat, Renderer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

const BINARY_NAME: &str = "canvas-search";
const CONFIG_DIR_ENV: &str = "CANVAS_CONFIG_DIR";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "canvas-search",
    version,
    about = "Rank launcher results, calculate and convert units from the shell."
)]
struct Cli {
    /// Preferred renderer for command output.
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,
    /// Configuration file to load instead of the platform default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Language tag used for number formatting, e.g. `de-CH`.
    #[arg(long, global = true)]
    locale: Option<String>,
    /// Disable ANSI colors in CLI output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Run a full search as the launcher would for one keystroke.
    Search {
        term: String,
        /// JSON catalog snapshot with activities, shortcuts, contacts and calendar events.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Current time in epoch milliseconds, used to drop past calendar events.
        #[arg(long)]
        now: Option<i64>,
    },
    /// Evaluate an arithmetic expression.
    Calc { expression: String },
    /// Convert between units, e.g. `5 ft 3 in to cm`.
    Convert { expression: String },
    /// Parse a metronome specification, e.g. `120bpm in 4` or `allegro/3`.
    Metronome { specification: String },
    /// Print the tempo name for a number of beats per minute.
    Tempo { bpm: u32 },
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    if cli.no_color {
        env::set_var("NO_COLOR", "1");
    }

    if let Command::Completions { shell } = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(*shell, &mut command, BINARY_NAME, &mut std::io::stdout());
        return Ok(());
    }

    let explicit = cli.config.as_deref();
    let config = load_config(
        explicit.map(Path::to_path_buf).or_else(default_config_path),
        explicit.is_some(),
        cli.locale.as_deref(),
        environment(),
    )?;
    debug!(
        target: "canvas_search_cli",
        locale = %config.locale,
        initial_results = %config.settings.initial_results,
        "configuration loaded"
    );

    let renderer = Renderer::new(cli.format, cli.quiet);
    let engine = SearchEngine::builder(config).build();
    let locale = engine.locale();

    match &cli.command {
        Command::Search { term, catalog, now } => {
            let catalog = load_catalog(
                catalog.as_deref(),
                engine.config(),
                now.unwrap_or_else(current_millis),
            )?;
            let page = engine.search(term, &catalog);
            info!(
                target: "canvas_search_cli",
                term = %term,
                entries = page.len(),
                "search finished"
            );
            renderer.search_page(&page, locale)?;
        }
        Command::Calc { expression } => {
            let result = parse_arithmetic_with(expression, locale)
                .ok_or_else(|| anyhow!("`{expression}` is not an arithmetic expression"))?;
            renderer.parse_result(&result, locale)?;
        }
        Command::Convert { expression } => {
            let result = parse_unit_conversion_with(expression, locale)
                .ok_or_else(|| anyhow!("`{expression}` is not a unit conversion"))?;
            renderer.parse_result(&result, locale)?;
        }
        Command::Metronome { specification } => {
            let metronome = parse_metronome(specification)
                .ok_or_else(|| anyhow!("`{specification}` is not a metronome specification"))?;
            renderer.metronome(&metronome)?;
        }
        Command::Tempo { bpm } => {
            let Some(name) = bpm_to_tempo_name(*bpm) else {
                bail!("tempo must be between {MIN_BPM} and {MAX_BPM} bpm, got {bpm}");
            };
            renderer.tempo(*bpm, name)?;
        }
        Command::Completions { .. } => {}
    }
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,canvas_search_cli=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join(CONFIG_FILE_NAME));
    }
    ProjectDirs::from("com", "RecordAndLearn", BINARY_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn environment() -> Environment {
    Environment::with_prefix("CANVAS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Layers built-in defaults, the TOML file and the environment, in that order.
fn load_config(
    file: Option<PathBuf>,
    required: bool,
    locale: Option<&str>,
    environment: Environment,
) -> Result<SearchConfig> {
    let defaults = Config::try_from(&SearchConfig::default())
        .context("failed to encode default configuration")?;
    let mut builder = Config::builder().add_source(defaults);
    if let Some(path) = file {
        debug!(
            target: "canvas_search_cli",
            path = %path.display(),
            required,
            "reading configuration file"
        );
        let file = File::from(path).format(FileFormat::Toml).required(required);
        builder = builder.add_source(file);
    }
    builder
        .add_source(environment)
        .set_override_option("locale", locale.map(str::to_string))
        .context("invalid locale override")?
        .build()
        .context("failed to load configuration")?
        .try_deserialize()
        .context("invalid configuration")
}

fn load_catalog(path: Option<&Path>, config: &SearchConfig, now_millis: i64) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::default());
    };
    let snapshot = CatalogSnapshot::from_path(path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))?;
    let catalog = snapshot.into_catalog(&config.settings, now_millis);
    debug!(
        target: "canvas_search_cli",
        path = %path.display(),
        entries = catalog.len(),
        "catalog assembled"
    );
    Ok(catalog)
}

fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}

mod output {
    use std::fmt::Write;

    use anyhow::Result;
    use canvas_data::math::{Metronome, NumberLocale, ParseResult, TempoName};
    use canvas_data::{Labeled, SearchResult};
    use canvas_search_core::strings::{self, fill, render};
    use canvas_search_core::{SearchPage, SpecialResult};
    use clap::ValueEnum;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
    pub enum OutputFormat {
        Json,
        Markdown,
        Table,
        Text,
    }

    #[derive(Copy, Clone, Debug)]
    pub struct Renderer {
        format: OutputFormat,
        quiet: bool,
    }

    /// One displayed entry of a search page.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct Row {
        pub kind: &'static str,
        pub uid: String,
        pub text: String,
        pub link: Option<String>,
        pub error: bool,
    }

    impl Renderer {
        pub fn new(format: OutputFormat, quiet: bool) -> Self {
            Self { format, quiet }
        }

        pub fn search_page(&self, page: &SearchPage<'_>, locale: &NumberLocale) -> Result<()> {
            if let OutputFormat::Json = self.format {
                println!("{}", serde_json::to_string_pretty(page)?);
                return Ok(());
            }
            let rows = page_rows(page, locale);
            if rows.is_empty() {
                if !self.quiet {
                    println!("No results for “{}”.", page.term);
                }
                return Ok(());
            }
            match self.format {
                OutputFormat::Json => {}
                OutputFormat::Markdown => {
                    println!("| Kind | Result | Link |");
                    println!("| --- | --- | --- |");
                    for row in &rows {
                        println!(
                            "| {} | {} | {} |",
                            row.kind,
                            sanitize(&row.text),
                            row.link.as_deref().unwrap_or("")
                        );
                    }
                }
                OutputFormat::Table => {
                    let cells: Vec<Vec<String>> = rows
                        .iter()
                        .map(|row| {
                            vec![
                                row.kind.to_string(),
                                row.uid.clone(),
                                truncate(&sanitize(&row.text), 60),
                            ]
                        })
                        .collect();
                    render_table(&["Kind", "Uid", "Result"], &cells);
                }
                OutputFormat::Text => {
                    for row in &rows {
                        let marker = if row.error { "!" } else { "•" };
                        match &row.link {
                            Some(link) => println!("{marker} {} <{link}>", row.text),
                            None => println!("{marker} {}", row.text),
                        }
                    }
                }
            }
            Ok(())
        }

        pub fn parse_result(&self, result: &ParseResult, locale: &NumberLocale) -> Result<()> {
            let text = render(result, locale);
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({ "result": result, "text": text });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => println!("{text}"),
                OutputFormat::Table => {
                    let rows = vec![
                        vec!["Message".to_string(), result.key.to_string()],
                        vec!["Successful".to_string(), result.successful.to_string()],
                        vec!["Text".to_string(), text],
                    ];
                    render_table(&["Field", "Value"], &rows);
                }
            }
            Ok(())
        }

        pub fn metronome(&self, metronome: &Metronome) -> Result<()> {
            let tempo = metronome.tempo_name().map_or("", strings::tempo_name);
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({
                        "metronome": metronome,
                        "tempo": metronome.tempo_name(),
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown => {
                    println!(
                        "**{}**: {} bpm, {} beats per bar ({tempo})",
                        strings::METRONOME,
                        metronome.bpm,
                        metronome.beats
                    );
                }
                OutputFormat::Table => {
                    let rows = vec![
                        vec!["BPM".to_string(), metronome.bpm.to_string()],
                        vec!["Beats".to_string(), metronome.beats.to_string()],
                        vec!["Tempo".to_string(), tempo.to_string()],
                    ];
                    render_table(&["Field", "Value"], &rows);
                }
                OutputFormat::Text => {
                    println!("{} bpm, {} beats per bar ({tempo})", metronome.bpm, metronome.beats);
                }
            }
            Ok(())
        }

        pub fn tempo(&self, bpm: u32, name: TempoName) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({ "bpm": bpm, "tempo": name });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    println!("{}", strings::tempo_name(name));
                }
                OutputFormat::Table => {
                    let name = strings::tempo_name(name);
                    let rows = vec![vec![bpm.to_string(), name.to_string()]];
                    render_table(&["BPM", "Tempo"], &rows);
                }
            }
            Ok(())
        }
    }

    pub fn page_rows(page: &SearchPage<'_>, locale: &NumberLocale) -> Vec<Row> {
        let mut rows = Vec::with_capacity(page.len());
        for special in &page.special {
            let (text, link) = match special {
                SpecialResult::OpenUrl { url } => {
                    (strings::OPEN_URL.to_string(), Some(url.to_string()))
                }
                SpecialResult::Math { result } | SpecialResult::UnitConversion { result } => {
                    (render(result, locale), None)
                }
                SpecialResult::Metronome { metronome } => (
                    format!(
                        "{}: {} bpm, {} beats per bar",
                        strings::METRONOME,
                        metronome.bpm,
                        metronome.beats
                    ),
                    None,
                ),
            };
            rows.push(Row {
                kind: "special",
                uid: special.uid().to_string(),
                text,
                link,
                error: special.is_error(),
            });
        }
        for candidate in &page.results {
            rows.push(Row {
                kind: candidate.kind(),
                uid: candidate.uid().to_string(),
                text: candidate.label().to_string(),
                link: None,
                error: false,
            });
        }
        for search in &page.external {
            rows.push(Row {
                kind: "external",
                uid: search.uid().to_string(),
                text: fill(
                    strings::external_search(search.provider),
                    &[search.term.clone()],
                ),
                link: search.url().map(String::from),
                error: false,
            });
        }
        rows
    }

    fn render_table(headers: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = headers
            .iter()
            .map(|header| header.chars().count())
            .collect();
        for row in rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.chars().count());
            }
        }

        fn render_line(columns: &[&str], widths: &[usize]) -> String {
            let mut line = String::new();
            for (idx, value) in columns.iter().enumerate() {
                let width = widths[idx];
                let _ = write!(line, "| {value:width$} ");
            }
            line.push('|');
            line
        }

        let header_line = render_line(headers, &widths);
        println!("{header_line}");
        let separator: String = widths
            .iter()
            .map(|width| format!("|{:-^1$}", "", width + 2))
            .collect::<Vec<_>>()
            .join("");
        println!("{separator}|");

        for row in rows {
            let cols: Vec<&str> = row.iter().map(String::as_str).collect();
            println!("{}", render_line(&cols, &widths));
        }
    }

    fn sanitize(value: &str) -> String {
        value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .replace('|', "\\|")
    }

    pub(crate) fn truncate(value: &str, max: usize) -> String {
        if value.chars().count() <= max {
            value.to_string()
        } else {
            let mut truncated = value
                .chars()
                .take(max.saturating_sub(1))
                .collect::<String>();
            truncated.push('…');
            truncated
        }
    }
}
