use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "homescout",
    version,
    about = "listing search, filtering and page rendering for real-estate fixtures",
    long_about = "Homescout loads the property and agent JSON fixtures, applies the page address a page was opened with, replays the search and filter inputs and writes the rendered page.\n\nExamples:\n  homescout search miami --sort price_asc\n  homescout search --beds 3 --status for-sale --max-price 2000000\n  homescout property --url 'property-detail.html?id=schnoor-road-ct'\n  homescout agent --url /agent/sarah-jenkins -o sarah.html\n  homescout suggest park\n\nTip: Use --config to persist data sources and output settings."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored terminal output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Output format: text, json or html (inferred from -o when omitted)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        global = true,
        help_heading = "Output",
        help = "Write the rendered page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'p',
        long = "properties",
        value_name = "SRC",
        global = true,
        help_heading = "Data",
        help = "Properties fixture: file path or http(s) URL."
    )]
    pub properties: Option<String>,

    #[arg(
        short = 'a',
        long = "agents-data",
        value_name = "SRC",
        global = true,
        help_heading = "Data",
        help = "Agents fixture: file path or http(s) URL."
    )]
    pub agents_data: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Data",
        help = "Timeout for URL fixture sources."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.homescout/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "storage",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Recent-search storage file (defaults to ~/.homescout/storage.json)."
    )]
    pub storage: Option<String>,

    #[arg(
        long = "fallback",
        value_name = "POLICY",
        global = true,
        help_heading = "Pages",
        help = "Detail page without an identifier: first-record or not-found."
    )]
    pub fallback: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Property listing page: filter, sort and render the grid.
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// Agent directory filtered by name and location.
    Agents(AgentsArgs),

    /// Property detail page (`?id=<slug>`).
    Property(PageUrlArgs),

    /// Agent profile page (path slug, `?agent=` or `?id=`).
    Agent(PageUrlArgs),

    /// Search-box suggestions for a partial query.
    Suggest(SuggestArgs),

    /// Home page search box: buy searches listings, sell asks for a valuation.
    Home(HomeArgs),

    /// Home valuation page for an address.
    Valuation(ValuationArgs),

    /// Send a (simulated) message to an agent.
    Contact(ContactArgs),

    /// Show or edit the recent-search history.
    Recent(RecentArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", help = "Search text matched against address, title and location.")]
    pub query: Option<String>,

    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Property type (repeatable)."
    )]
    pub types: Vec<String>,

    #[arg(
        long = "beds",
        value_name = "N",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Minimum bedrooms; the smallest value wins, 'any' disables (repeatable)."
    )]
    pub beds: Vec<String>,

    #[arg(
        long = "baths",
        value_name = "N",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Minimum bathrooms; the smallest value wins, 'any' disables (repeatable)."
    )]
    pub baths: Vec<String>,

    #[arg(
        long = "status",
        value_name = "STATUS",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Listing status: for-sale, coming-soon, sold, pending (repeatable)."
    )]
    pub statuses: Vec<String>,

    #[arg(
        long = "min-price",
        value_name = "PRICE",
        help_heading = "Filters",
        help = "Inclusive lower price bound ('0' means none)."
    )]
    pub min_price: Option<String>,

    #[arg(
        long = "max-price",
        value_name = "PRICE",
        help_heading = "Filters",
        help = "Inclusive upper price bound ('any' means none)."
    )]
    pub max_price: Option<String>,

    #[arg(
        long = "sort",
        value_name = "ORDER",
        help_heading = "Filters",
        help = "newest, price_asc, price_desc or featured."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help = "Page address to apply (e.g. 'property.html?search=miami')."
    )]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AgentsArgs {
    #[arg(long = "name", value_name = "TEXT", help = "Agent name contains TEXT.")]
    pub name: Option<String>,

    #[arg(long = "location", value_name = "TEXT", help = "Agent location contains TEXT.")]
    pub location: Option<String>,

    #[arg(short = 'u', long = "url", value_name = "URL", help = "Page address to apply.")]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageUrlArgs {
    #[arg(short = 'u', long = "url", value_name = "URL", help = "Page address to apply.")]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SuggestArgs {
    #[arg(value_name = "QUERY", default_value = "", help = "Partial search text.")]
    pub query: String,

    #[arg(long = "agents", help = "Suggest agent names instead of properties.")]
    pub agents: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct HomeArgs {
    #[arg(value_name = "QUERY", default_value = "", help = "Search text or home address.")]
    pub query: String,

    #[arg(long = "sell", help = "Use the sell tab (valuation request) instead of buy.")]
    pub sell: bool,

    #[arg(
        long = "ticks",
        value_name = "N",
        default_value_t = 0,
        help_heading = "Featured",
        help = "Autoplay intervals to replay on the featured strip."
    )]
    pub ticks: u32,

    #[arg(
        long = "hover",
        help_heading = "Featured",
        help = "Hold the pointer over the featured strip (pauses autoplay)."
    )]
    pub hover: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ValuationArgs {
    #[arg(value_name = "ADDRESS", help = "Home address to value.")]
    pub address: Option<String>,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        conflicts_with = "address",
        help = "Page address to apply (e.g. 'home-valuation.html?address=...')."
    )]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ContactArgs {
    #[arg(long = "to", value_name = "AGENT", help = "Agent the message is addressed to.")]
    pub to: String,

    #[arg(long = "name", value_name = "NAME", help = "Your name.")]
    pub name: Option<String>,

    #[arg(long = "email", value_name = "EMAIL", help = "Your email address.")]
    pub email: Option<String>,

    #[arg(long = "phone", value_name = "PHONE", help = "Your phone number (optional).")]
    pub phone: Option<String>,

    #[arg(long = "message", value_name = "TEXT", help = "Message body.")]
    pub message: Option<String>,

    #[arg(
        long = "address",
        value_name = "ADDRESS",
        help = "Prefill the message with an inquiry about this listing."
    )]
    pub address: Option<String>,

    #[arg(long = "no-delay", help = "Skip the sending and sent pauses.")]
    pub no_delay: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RecentArgs {
    #[command(subcommand)]
    pub action: RecentAction,

    #[arg(
        long = "cap",
        value_name = "N",
        help = "History size (3 on the home page, 5 on search pages)."
    )]
    pub cap: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RecentAction {
    /// Print the stored terms, most recent first.
    List,
    /// Record a term as if it had been searched.
    Record {
        #[arg(value_name = "TERM")]
        term: String,
    },
    /// Remove the stored history.
    Clear,
}
