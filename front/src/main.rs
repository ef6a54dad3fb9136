use clap::Parser;
use tally_front::{
    notify::LogNotifier,
    view::{self, SortOrder, StatusFilter},
    ClientConfig, Page, TodoClient, API_URL,
};
use tracing_subscriber::EnvFilter;

/// Shows the remote todo list as a table.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Base URL of the todo API.
    #[arg(long, default_value = API_URL)]
    api_url: String,

    /// Only show todos whose text contains this, ignoring case.
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    filter: StatusFilter,

    /// Sort direction of the ID column.
    #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
    sort: SortOrder,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let client = TodoClient::new(ClientConfig::with_base_url(args.api_url))?;
    let mut page = Page::load(client, LogNotifier).await?;

    page.set_search(args.search);
    page.set_filter(args.filter);
    if args.sort != page.query().order {
        page.toggle_sort();
    }

    print!("{}", view::render_table(&page.rows()));

    Ok(())
}
