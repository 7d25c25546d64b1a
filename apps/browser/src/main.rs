use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    CatalogClient, CatalogSource, ListEvent, ProductDetailController, ProductListController,
};
use shared::domain::{ProductId, SortSpec};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{BrowseCommand, HELP};
use config::load_settings;
use render::{render_detail, render_list};

#[derive(Parser, Debug)]
#[command(name = "catalog_browser", about = "Browse a paginated product catalog")]
struct Args {
    /// Settings file; defaults to ./catalog.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page, optionally searched, filtered and sorted.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// `field` or `field:asc|desc`
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortSpec>,
    },
    /// Print a single product by its S.No.
    Show { id: u64 },
    /// Interactive session reading commands from stdin.
    Browse,
}

fn parse_sort(raw: &str) -> Result<SortSpec, String> {
    SortSpec::parse(raw).ok_or_else(|| format!("unknown sort '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    settings.validate()?;
    info!(base_url = %settings.base_url, page_size = settings.page_size, "catalog browser starting");

    let client = CatalogClient::new(settings.client_config()).context("failed to build catalog client")?;
    let source: Arc<dyn CatalogSource> = Arc::new(client);
    let mut controller = ProductListController::new(Arc::clone(&source), settings.list_config());

    match args.command {
        Command::List {
            page,
            search,
            category,
            sort,
        } => {
            load_page(&mut controller, page).await;
            if let Some(search) = search {
                controller.dispatch(ListEvent::SearchSettled(search));
            }
            if category.is_some() {
                controller.set_category(category);
            }
            if sort.is_some() {
                controller.set_sort(sort);
            }
            print!("{}", render_list(&controller.view()));
        }
        Command::Show { id } => {
            let mut detail = ProductDetailController::for_id(ProductId(id));
            detail.load(source.as_ref()).await;
            let view = detail.view();
            if let Some(reason) = &view.error {
                eprintln!("lookup failed: {reason}");
            }
            print!("{}", render_detail(&view));
        }
        Command::Browse => browse(&mut controller, source.as_ref()).await?,
    }

    Ok(())
}

async fn load_page(controller: &mut ProductListController, page: u32) {
    if page <= 1 {
        controller.mount();
    } else {
        controller.set_page(page);
    }
    controller.wait_until_loaded().await;
}

enum Input {
    Line(Option<String>),
    ListUpdated,
}

async fn browse(controller: &mut ProductListController, source: &dyn CatalogSource) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{HELP}");
    controller.mount();
    println!("Loading page 1...");

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line.context("failed to read stdin")?),
            () = controller.next_event() => Input::ListUpdated,
        };

        let line = match input {
            Input::ListUpdated => {
                let view = controller.view();
                if !view.loading {
                    print!("{}", render_list(&view));
                }
                continue;
            }
            Input::Line(None) => break,
            Input::Line(Some(line)) => line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        debug!(?command, "browse: command");

        match command {
            BrowseCommand::Search(text) => controller.set_search_text(text),
            BrowseCommand::Category(category) => {
                controller.set_category(category);
                print!("{}", render_list(&controller.view()));
            }
            BrowseCommand::Sort(sort) => {
                controller.set_sort(sort);
                print!("{}", render_list(&controller.view()));
            }
            BrowseCommand::Page(page) => {
                controller.set_page(page);
                print!("{}", render_list(&controller.view()));
            }
            BrowseCommand::Refresh => {
                controller.refresh();
                print!("{}", render_list(&controller.view()));
            }
            BrowseCommand::Open(id) => match controller.row_clicked(id) {
                Some(navigation) => {
                    let mut detail = ProductDetailController::open(navigation);
                    detail.load(source).await;
                    print!("{}", render_detail(&detail.view()));
                    controller.detail_closed();
                }
                None => println!("Product {id} is already open"),
            },
            BrowseCommand::Show => print!("{}", render_list(&controller.view())),
            BrowseCommand::Help => print!("{HELP}"),
            BrowseCommand::Quit => break,
        }
    }

    Ok(())
}
