use crate::cli::args::{CliArgs, Command};
use crate::deeplink::{DeepLink, FallbackPolicy};
use crate::filter::SortOrder;
use crate::output::OutputFormat;
use crate::page::clean_price;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --format '{raw}', expected text, json or html"));
        }
    }
    if let Some(raw) = args.fallback.as_deref() {
        if FallbackPolicy::parse(raw).is_none() {
            return Err(format!(
                "invalid --fallback '{raw}', expected first-record or not-found"
            ));
        }
    }
    if args.timeout == Some(0) {
        return Err("invalid --timeout, expected positive integer".to_string());
    }
    match &args.command {
        Command::Search(search) => {
            if let Some(raw) = search.sort.as_deref() {
                if SortOrder::parse(raw).is_none() {
                    return Err(format!(
                        "invalid --sort '{raw}', expected newest, price_asc, price_desc or featured"
                    ));
                }
            }
            for (flag, raw) in [("--min-price", &search.min_price), ("--max-price", &search.max_price)] {
                if let Some(raw) = raw.as_deref() {
                    validate_price(flag, raw)?;
                }
            }
            validate_url(search.url.as_deref())?;
        }
        Command::Agents(agents) => validate_url(agents.url.as_deref())?,
        Command::Property(page) | Command::Agent(page) => validate_url(page.url.as_deref())?,
        Command::Valuation(valuation) => validate_url(valuation.url.as_deref())?,
        Command::Recent(recent) => {
            if recent.cap == Some(0) {
                return Err("invalid --cap, expected positive integer".to_string());
            }
        }
        Command::Contact(contact) => {
            if contact.to.trim().is_empty() {
                return Err("missing --to, expected an agent name".to_string());
            }
        }
        Command::Suggest(_) | Command::Home(_) => {}
    }
    Ok(())
}

fn validate_price(flag: &str, raw: &str) -> Result<(), String> {
    let cleaned = clean_price(raw);
    if cleaned.eq_ignore_ascii_case("any") || cleaned.parse::<u64>().is_ok() {
        return Ok(());
    }
    Err(format!("invalid {flag} '{raw}', expected a whole dollar amount or 'any'"))
}

fn validate_url(raw: Option<&str>) -> Result<(), String> {
    if let Some(raw) = raw {
        DeepLink::parse(raw).map_err(|e| format!("invalid --url '{raw}': {e}"))?;
    }
    Ok(())
}
