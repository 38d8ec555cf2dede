use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cliclack as cli;
use console::style;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trip_planner::{
    Config, OpenAiClient, Planner, TavilyClient, form::TripArgs, install_search_client,
};

const TITLE: &str = "QikTravlPlan: Your Personal Travel Itinerary Planner";
const SUBTITLE: &str = "Plan your perfect trip with ease! Enter your travel details below, and let our AI-powered planner find the best flights and hotels for you.";

#[derive(Parser)]
#[command(name = "trip_planner", version, about)]
struct Args {
    #[command(flatten)]
    trip: TripArgs,

    /// Model to plan with (defaults to TRIP_PLANNER_MODEL, then gpt-4.1-nano)
    #[arg(short, long)]
    model: Option<String>,

    /// Don't prompt for trip details
    ///
    /// Every trip field must then be given as a flag.
    #[arg(short, long)]
    yes: bool,
}

fn init_tracing() {
    // Log lines would break up the prompts, so only warnings by default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(model) = args.model {
        config.model = model;
    }
    tracing::debug!(?config, "loaded configuration");

    install_search_client(Arc::new(TavilyClient::new(&config.tavily_api_key)));
    let chat = OpenAiClient::new(&config.openai_api_key).with_model(&config.model);
    let tools = fntool::collect_tools();
    tracing::info!(tools = ?tools.names().collect::<Vec<_>>(), "tools registered");
    let planner = Planner::new(chat, tools).with_max_tool_rounds(config.max_tool_rounds);

    cli::intro(style(TITLE).bold())?;
    cli::log::remark(SUBTITLE)?;

    let request = args.trip.resolve(args.yes, |field| {
        cli::Input::new(field.label)
            .placeholder(field.placeholder)
            .interact()
    })?;

    let spinner = cli::spinner();
    spinner.start("Planning your trip...");
    match planner.plan(&request).await {
        Ok(itinerary) => {
            spinner.stop("Trip planned");
            cli::note("Your Itinerary", itinerary)?;
            cli::outro(style("Done").green().bright())?;
            Ok(())
        }
        Err(err) => {
            spinner.clear();
            cli::outro_cancel("Planning failed")?;
            Err(err).context("failed to plan the trip")
        }
    }
}
