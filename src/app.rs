use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{CliArgs, Command, ContactArgs, RecentAction, SearchArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::contact::{ContactDetails, ContactForm};
use crate::deeplink::{self, FallbackPolicy};
use crate::filter::{FilterCriteria, SortOrder};
use crate::model::ListingStatus;
use crate::output::{self, OutputFormat, PageState};
use crate::page::{price_bound, HomeTab};
use crate::recent::{FileStorage, RecentSearches, SEARCH_PAGE_CAP};
use crate::render::escape_html;
use crate::runner::{Options, PageRequest, Runner, DEFAULT_AGENTS, DEFAULT_PROPERTIES};
use crate::store::DataSource;

const FALLBACK_STORAGE_PATH: &str = "./.homescout-storage.json";

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn help_target() -> clap::Command {
    let cmd = CliArgs::command();
    let requested = std::env::args()
        .skip(1)
        .filter(|a| !a.starts_with('-'))
        .find_map(|a| cmd.find_subcommand(&a).cloned());
    requested.unwrap_or(cmd)
}

fn render_custom_help() -> String {
    let root = CliArgs::command();
    let cmd = help_target();
    let is_sub = cmd.get_name() != root.get_name();
    let mut out = String::new();

    out.push_str(root.get_name());
    if is_sub {
        out.push(' ');
        out.push_str(cmd.get_name());
    } else if let Some(version) = root.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(root.get_name());
    if is_sub {
        out.push(' ');
        out.push_str(cmd.get_name());
        out.push_str(" [OPTIONS]");
        for positional in cmd.get_positionals() {
            let name = positional
                .get_value_names()
                .and_then(|names| names.first())
                .map(|name| name.as_str())
                .unwrap_or("VALUE");
            out.push_str(&format!(" [{name}]"));
        }
        if cmd.has_subcommands() {
            out.push_str(" <COMMAND>");
        }
        out.push_str("\n\n");
    } else {
        out.push_str(" [OPTIONS] <COMMAND>\n\n");
    }

    if cmd.has_subcommands() {
        out.push_str("Commands:\n");
        for sub in cmd.get_subcommands() {
            let mut names = vec![sub.get_name().to_string()];
            names.extend(sub.get_visible_aliases().map(str::to_string));
            out.push_str(&format!("  {:<14}", names.join(", ")));
            if let Some(about) = sub.get_about() {
                out.push_str(&about.to_string());
            }
            out.push('\n');
        }
        out.push('\n');
    }

    let mut args: Vec<&clap::Arg> = cmd.get_arguments().collect();
    if is_sub {
        args.extend(root.get_arguments().filter(|a| a.is_global_set()));
    }

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in args {
        if arg.is_hide_set() {
            continue;
        }

        let heading = arg.get_help_heading().unwrap_or("Options").to_string();

        let idx = match section_idx.get(&heading).copied() {
            Some(i) => i,
            None => {
                sections.push((heading.clone(), Vec::new()));
                let i = sections.len() - 1;
                section_idx.insert(heading, i);
                i
            }
        };

        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();

            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }

            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }

            let value_name = arg
                .get_value_names()
                .and_then(|names| names.first())
                .map(|name| name.as_str())
                .unwrap_or("VALUE");
            let placeholder = format!("<{value_name}>");

            let flags = if parts.is_empty() {
                placeholder
            } else if arg.get_action().takes_values() {
                format!("{} {placeholder}", parts.join(", "))
            } else {
                parts.join(", ")
            };

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }
        }

        out.push('\n');
    }

    out
}

fn format_opt_value<'a>(v: &'a str, default: &'a str) -> &'a str {
    if v.trim().is_empty() {
        default
    } else {
        v
    }
}

/// Collects the non-default filters for the run summary.
fn summarize_filters(criteria: &FilterCriteria) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().cloned().collect::<Vec<_>>().join(",")
    };
    if !criteria.types.is_empty() {
        parts.push(format!("type={}", join(&criteria.types)));
    }
    if !criteria.beds.is_empty() {
        parts.push(format!("beds={}", join(&criteria.beds)));
    }
    if !criteria.baths.is_empty() {
        parts.push(format!("baths={}", join(&criteria.baths)));
    }
    if !criteria.statuses.is_empty() {
        parts.push(format!("status={}", join(&criteria.statuses)));
    }
    if let Some(min) = criteria.min_price {
        parts.push(format!("min={min}"));
    }
    if let Some(max) = criteria.max_price {
        parts.push(format!("max={max}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    command: Command,
    properties: DataSource,
    agents: DataSource,
    timeout: u64,
    output: Option<String>,
    output_format: OutputFormat,
    fallback: FallbackPolicy,
    sort: SortOrder,
    recent_cap: usize,
    storage_path: PathBuf,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout in config, expected positive integer".to_string());
    }

    let properties_raw = args
        .properties
        .or(cfg.properties)
        .unwrap_or_else(|| DEFAULT_PROPERTIES.to_string());
    let agents_raw = args
        .agents_data
        .or(cfg.agents)
        .unwrap_or_else(|| DEFAULT_AGENTS.to_string());
    let properties = DataSource::parse(&config::expand_tilde_string(&properties_raw));
    let agents = DataSource::parse(&config::expand_tilde_string(&agents_raw));

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.format.or(cfg.format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let fallback = match args.fallback.or(cfg.fallback) {
        Some(raw) => FallbackPolicy::parse(&raw)
            .ok_or_else(|| format!("invalid fallback '{raw}', expected first-record or not-found"))?,
        None => FallbackPolicy::default(),
    };

    let sort = match cfg.sort.as_deref() {
        Some(raw) => SortOrder::parse(raw)
            .ok_or_else(|| format!("invalid sort '{raw}' in config"))?,
        None => SortOrder::default(),
    };

    let recent_cap = match &args.command {
        Command::Recent(recent) => recent.cap,
        _ => None,
    }
    .or(cfg.recent_cap)
    .unwrap_or(SEARCH_PAGE_CAP);
    if recent_cap == 0 {
        return Err("invalid recent_cap in config, expected positive integer".to_string());
    }

    let storage_path = args
        .storage
        .or(cfg.storage_path)
        .map(|p| config::expand_tilde(&p))
        .or_else(config::default_storage_path)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STORAGE_PATH));

    Ok(RunConfig {
        command: args.command,
        properties,
        agents,
        timeout,
        output,
        output_format,
        fallback,
        sort,
        recent_cap,
        storage_path,
        no_color,
        verbose: args.verbose,
    })
}

fn init_logging(verbose: u8, no_color: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn search_criteria(search: &SearchArgs) -> FilterCriteria {
    let mut criteria = FilterCriteria::with_search(search.query.clone().unwrap_or_default());
    criteria.types = search
        .types
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    criteria.beds = search.beds.iter().map(|b| b.trim().to_string()).collect();
    criteria.baths = search.baths.iter().map(|b| b.trim().to_string()).collect();
    criteria.statuses = search
        .statuses
        .iter()
        .map(|s| ListingStatus::parse(s).slug().to_string())
        .collect();
    criteria.min_price = search.min_price.as_deref().and_then(price_bound);
    criteria.max_price = search.max_price.as_deref().and_then(price_bound);
    criteria
}

/// The page request and page address a subcommand stands for.
fn page_request(command: &Command, default_sort: SortOrder) -> Option<(PageRequest, Option<String>)> {
    match command {
        Command::Search(search) => {
            let sort = search
                .sort
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or(default_sort);
            Some((
                PageRequest::PropertyListing {
                    criteria: search_criteria(search),
                    sort,
                },
                search.url.clone(),
            ))
        }
        Command::Agents(agents) => Some((
            PageRequest::AgentDirectory {
                name: agents.name.clone(),
                location: agents.location.clone(),
            },
            agents.url.clone(),
        )),
        Command::Property(page) => Some((PageRequest::PropertyDetail, page.url.clone())),
        Command::Agent(page) => Some((PageRequest::AgentProfile, page.url.clone())),
        Command::Suggest(suggest) => Some((
            PageRequest::Suggestions {
                query: suggest.query.clone(),
                agents: suggest.agents,
            },
            None,
        )),
        Command::Home(home) => Some((
            PageRequest::HomeSearch {
                query: home.query.clone(),
                tab: if home.sell { HomeTab::Sell } else { HomeTab::Buy },
                strip_ticks: home.ticks,
                strip_hovered: home.hover,
            },
            None,
        )),
        Command::Valuation(valuation) => Some((
            PageRequest::Valuation,
            valuation
                .url
                .clone()
                .or_else(|| valuation.address.as_deref().map(deeplink::valuation_href)),
        )),
        Command::Recent(_) | Command::Contact(_) => None,
    }
}

fn render_recent(terms: &[String], format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => terms
            .iter()
            .map(|t| format!("{t}\n"))
            .collect::<String>()
            .into_bytes(),
        OutputFormat::Json => {
            serde_json::to_vec_pretty(terms).unwrap_or_else(|_| b"[]\n".to_vec())
        }
        OutputFormat::Html => {
            let mut out = String::from("<ol class=\"recent-searches\">\n");
            for t in terms {
                out.push_str(&format!("  <li>{}</li>\n", escape_html(t)));
            }
            out.push_str("</ol>\n");
            out.into_bytes()
        }
    }
}

async fn write_output(path: Option<&str>, rendered: &[u8]) -> Result<(), String> {
    match path {
        Some(outfile_path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(outfile_path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(rendered)
                .await
                .map_err(|_| "failed to write output file".to_string())?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to flush stdout: {e}"))?;
        }
    }
    Ok(())
}

async fn run_recent(run: &RunConfig, action: &RecentAction) -> Result<(), String> {
    let storage = FileStorage::new(run.storage_path.clone());
    let mut recent = RecentSearches::new(storage, run.recent_cap);
    let terms = match action {
        RecentAction::List => recent.list(),
        RecentAction::Record { term } => recent.record(term),
        RecentAction::Clear => {
            recent.clear();
            Vec::new()
        }
    };
    debug!(
        storage = %run.storage_path.display(),
        cap = run.recent_cap,
        count = terms.len(),
        "recent searches"
    );
    write_output(run.output.as_deref(), &render_recent(&terms, run.output_format)).await
}

fn contact_details(contact: &ContactArgs) -> ContactDetails {
    let mut details = match contact.address.as_deref() {
        Some(address) => ContactDetails::prefilled(address),
        None => ContactDetails::default(),
    };
    details.name = contact.name.clone().unwrap_or_default();
    details.email = contact.email.clone().unwrap_or_default();
    details.phone = contact.phone.clone().unwrap_or_default();
    if let Some(message) = contact.message.as_deref() {
        details.message = message.to_string();
    }
    details
}

async fn run_contact(run: &RunConfig, contact: &ContactArgs) -> Result<(), String> {
    let mut form = if contact.no_delay {
        ContactForm::with_timings(contact.to.trim(), Duration::ZERO, Duration::ZERO)
    } else {
        ContactForm::new(contact.to.trim())
    };
    format_kv_line("Contact", &form.heading());
    let details = contact_details(contact);
    let confirmation = form
        .submit(&details, |state| format_kv_line("Button", state.button_label()))
        .await
        .map_err(|e| e.to_string())?;

    let rendered = match run.output_format {
        OutputFormat::Json => serde_json::to_vec_pretty(&serde_json::json!({
            "recipient": contact.to.trim(),
            "confirmation": confirmation,
        }))
        .map_err(|e| format!("failed to encode confirmation: {e}"))?,
        OutputFormat::Html => format!(
            "<div class=\"contact-confirmation\">{}</div>\n",
            escape_html(&confirmation)
        )
        .into_bytes(),
        OutputFormat::Text => format!("{confirmation}\n").into_bytes(),
    };
    write_output(run.output.as_deref(), &rendered).await
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let now = Instant::now();

    let Some((request, page_url)) = page_request(&run.command, run.sort) else {
        return match &run.command {
            Command::Recent(recent) => run_recent(&run, &recent.action).await,
            Command::Contact(contact) => run_contact(&run, contact).await,
            _ => Ok(()),
        };
    };

    let options = Options {
        properties: run.properties.clone(),
        agents: run.agents.clone(),
        page_url: page_url.clone(),
        fallback: run.fallback,
        timeout_seconds: run.timeout,
    };
    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    format_kv_line("Page", request.kind().as_str());
    format_kv_line("URL", format_opt_value(page_url.as_deref().unwrap_or(""), "-"));
    format_kv_line("Properties", &run.properties.describe());
    format_kv_line("Agents", &run.agents.describe());
    if let PageRequest::PropertyListing { criteria, sort } = &request {
        format_kv_line("Search", format_opt_value(&criteria.search, "-"));
        format_kv_line("Sort", sort.as_str());
        if let Some(filters) = summarize_filters(criteria) {
            format_kv_line("Filters", &filters);
        }
    }
    format_kv_line("Fallback", run.fallback.as_str());
    format_kv_line("Storage", &run.storage_path.display().to_string());
    eprintln!();

    let storage = FileStorage::new(run.storage_path.clone());
    let result = runner.run(request, storage).await;
    let page = result.output;

    let rendered = output::render(&page, run.output_format);
    write_output(run.output.as_deref(), &rendered).await?;

    let state = match page.state {
        PageState::Ready => page.state.as_str().green(),
        PageState::Empty | PageState::NotFound => page.state.as_str().yellow(),
        PageState::LoadError => page.state.as_str().red(),
    };
    eprintln!();
    format_kv_line("State", &state.to_string());
    format_kv_line("Results", &page.result_count.to_string());
    if let Some(target) = page.navigate_to.as_deref() {
        format_kv_line("Navigate", target);
    }
    if let Some(path) = run.output.as_deref() {
        format_kv_line("Output", path);
    }
    eprintln!(
        ":: Completed :: page took {}ms ::",
        now.elapsed().as_millis()
    );

    if page.is_failure() {
        return Err(page
            .message
            .unwrap_or_else(|| format!("{} page failed", page.page.as_str())));
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => {
                if let Err(e) = config::ensure_default_config_file(&path) {
                    eprintln!("{} {e}", "warning:".yellow());
                }
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_logging(run.verbose, run.no_color);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    fn run_config(argv: &[&str], cfg: ConfigFile) -> Result<RunConfig, String> {
        let args = CliArgs::parse_from(argv.iter().copied());
        build_run_config(args, cfg)
    }

    #[test]
    fn defaults_point_at_bundled_fixtures() {
        let run = run_config(&["homescout", "search"], ConfigFile::default()).unwrap();
        assert_eq!(run.properties, DataSource::FilePath(DEFAULT_PROPERTIES.to_string()));
        assert_eq!(run.agents, DataSource::FilePath(DEFAULT_AGENTS.to_string()));
        assert_eq!(run.output_format, OutputFormat::Text);
        assert_eq!(run.fallback, FallbackPolicy::FirstRecord);
        assert_eq!(run.recent_cap, SEARCH_PAGE_CAP);
        assert_eq!(run.timeout, 10);
    }

    #[test]
    fn args_override_config_and_format_follows_output_path() {
        let cfg = ConfigFile {
            properties: Some("https://cdn.example.com/properties.json".to_string()),
            timeout: Some(30),
            fallback: Some("not-found".to_string()),
            ..ConfigFile::default()
        };
        let run = run_config(
            &["homescout", "--timeout", "5", "-o", "page.html", "property"],
            cfg,
        )
        .unwrap();
        assert_eq!(
            run.properties,
            DataSource::Url("https://cdn.example.com/properties.json".to_string())
        );
        assert_eq!(run.timeout, 5);
        assert_eq!(run.output_format, OutputFormat::Html);
        assert_eq!(run.fallback, FallbackPolicy::NotFound);
    }

    #[test]
    fn explicit_format_beats_output_extension() {
        let run = run_config(
            &["homescout", "-f", "json", "-o", "page.html", "agents"],
            ConfigFile::default(),
        )
        .unwrap();
        assert_eq!(run.output_format, OutputFormat::Json);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(run_config(&["homescout", "search", "--sort", "cheapest"], ConfigFile::default()).is_err());
        assert!(run_config(&["homescout", "--fallback", "random", "agent"], ConfigFile::default()).is_err());
        assert!(run_config(&["homescout", "search", "--max-price", "lots"], ConfigFile::default()).is_err());
        assert!(run_config(&["homescout", "valuation", "--url", "http://[::1"], ConfigFile::default()).is_err());
        let cfg = ConfigFile {
            sort: Some("cheapest".to_string()),
            ..ConfigFile::default()
        };
        assert!(run_config(&["homescout", "search"], cfg).is_err());
    }

    #[test]
    fn search_args_become_criteria() {
        let args = CliArgs::parse_from([
            "homescout",
            "search",
            "miami",
            "--type",
            "Condo",
            "--beds",
            "3",
            "--beds",
            "2",
            "--status",
            "Coming Soon",
            "--min-price",
            "$500,000",
            "--max-price",
            "any",
            "--sort",
            "price_asc",
        ]);
        let (request, url) = page_request(&args.command, SortOrder::Newest).unwrap();
        assert!(url.is_none());
        let PageRequest::PropertyListing { criteria, sort } = request else {
            panic!("expected listing request");
        };
        assert_eq!(sort, SortOrder::PriceAsc);
        assert_eq!(criteria.search, "miami");
        assert!(criteria.types.contains("condo"));
        assert!(criteria.statuses.contains("coming-soon"));
        assert_eq!(criteria.min_price, Some(500_000));
        assert_eq!(criteria.max_price, None);
        assert_eq!(crate::filter::min_threshold(&criteria.beds), Some(2.0));
    }

    #[test]
    fn config_sort_is_the_listing_default() {
        let cfg = ConfigFile {
            sort: Some("featured".to_string()),
            ..ConfigFile::default()
        };
        let run = run_config(&["homescout", "search"], cfg).unwrap();
        let (request, _) = page_request(&run.command, run.sort).unwrap();
        assert!(matches!(
            request,
            PageRequest::PropertyListing {
                sort: SortOrder::Featured,
                ..
            }
        ));
    }

    #[test]
    fn recent_cap_comes_from_flag() {
        let run = run_config(&["homescout", "recent", "--cap", "3", "list"], ConfigFile::default()).unwrap();
        assert_eq!(run.recent_cap, 3);
        assert!(page_request(&run.command, run.sort).is_none());
    }

    #[test]
    fn recent_terms_render_per_format() {
        let terms = vec!["Miami".to_string(), "<b>".to_string()];
        assert_eq!(render_recent(&terms, OutputFormat::Text), b"Miami\n<b>\n".to_vec());
        let html = String::from_utf8(render_recent(&terms, OutputFormat::Html)).unwrap();
        assert!(html.contains("<li>&lt;b&gt;</li>"));
    }

    #[tokio::test]
    async fn recent_record_persists_to_storage_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("storage.json");
        let out = dir.path().join("recent.json");
        let storage_arg = storage.to_string_lossy().to_string();
        let out_arg = out.to_string_lossy().to_string();
        let run = run_config(
            &["homescout", "--storage", &storage_arg, "-o", &out_arg, "recent", "record", "Miami"],
            ConfigFile::default(),
        )
        .unwrap();
        run_async(run).await.unwrap();

        let written: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, vec!["Miami".to_string()]);
        let listed = RecentSearches::new(FileStorage::new(storage), SEARCH_PAGE_CAP).list();
        assert_eq!(listed, vec!["Miami".to_string()]);
    }

    #[test]
    fn contact_address_prefills_message_unless_given() {
        let args = CliArgs::parse_from([
            "homescout",
            "contact",
            "--to",
            "Sarah Jenkins",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--address",
            "12 Elm St",
        ]);
        let Command::Contact(contact) = &args.command else {
            panic!("expected contact command");
        };
        let details = contact_details(contact);
        assert_eq!(details.message, "Hi, I would like to know more about 12 Elm St");
        assert_eq!(details.phone, "");
    }

    #[tokio::test]
    async fn contact_without_email_fails() {
        let run = run_config(
            &["homescout", "contact", "--to", "Sarah Jenkins", "--name", "Ada", "--message", "hi", "--no-delay"],
            ConfigFile::default(),
        )
        .unwrap();
        let err = run_async(run).await.unwrap_err();
        assert_eq!(err, "email is required");
    }

    #[test]
    fn home_sell_flag_selects_tab() {
        let args = CliArgs::parse_from(["homescout", "home", "--sell", "9 Elm St"]);
        let (request, _) = page_request(&args.command, SortOrder::Newest).unwrap();
        assert!(matches!(
            request,
            PageRequest::HomeSearch {
                tab: HomeTab::Sell,
                ..
            }
        ));
    }

    #[test]
    fn open_ended_price_entry_is_accepted() {
        let run = run_config(
            &["homescout", "search", "--min-price", "$500,000+"],
            ConfigFile::default(),
        )
        .unwrap();
        let (request, _) = page_request(&run.command, SortOrder::Newest).unwrap();
        let PageRequest::PropertyListing { criteria, .. } = request else {
            panic!("expected listing request");
        };
        assert_eq!(criteria.min_price, Some(500_000));
    }

    #[test]
    fn home_strip_flags_reach_the_request() {
        let args = CliArgs::parse_from(["homescout", "home", "--ticks", "3", "--hover"]);
        let (request, _) = page_request(&args.command, SortOrder::Newest).unwrap();
        assert!(matches!(
            request,
            PageRequest::HomeSearch {
                strip_ticks: 3,
                strip_hovered: true,
                ..
            }
        ));
    }

    #[test]
    fn valuation_address_becomes_page_url() {
        let args = CliArgs::parse_from(["homescout", "valuation", "9 Elm St, Austin, TX"]);
        let (request, url) = page_request(&args.command, SortOrder::Newest).unwrap();
        assert!(matches!(request, PageRequest::Valuation));
        assert_eq!(
            url.as_deref(),
            Some("home-valuation.html?address=9+Elm+St%2C+Austin%2C+TX")
        );
    }

    #[tokio::test]
    async fn valuation_command_renders_heading_from_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("valuation.html");
        let out_arg = out.to_string_lossy().to_string();
        let storage = dir.path().join("storage.json");
        let storage_arg = storage.to_string_lossy().to_string();
        let properties = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/properties.json");
        let agents = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/agents.json");
        let run = run_config(
            &[
                "homescout", "-p", properties, "-a", agents, "--storage", &storage_arg, "-f", "json",
                "-o", &out_arg, "valuation", "9 Elm St, Austin, TX",
            ],
            ConfigFile::default(),
        )
        .unwrap();
        run_async(run).await.unwrap();
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(written["page"], "valuation");
        assert_eq!(written["title"], "Home Valuation for 9 Elm St | Raya Homes");
        assert_eq!(written["records"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn help_lists_subcommands_and_headings() {
        let help = render_custom_help();
        assert!(help.contains("Commands:"));
        assert!(help.contains("search, s"));
        assert!(help.contains("Output:"));
        assert!(help.contains("--agents-data <SRC>"));
    }
}
