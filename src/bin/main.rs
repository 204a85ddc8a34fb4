use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "marquee-server")]
#[command(about = "Movie browsing and natural-language search server", long_about = None)]
struct Args {
    /// YAML config file. Without one, defaults and environment variables are used.
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    debug: bool,

    /// Run a single search, print the results and exit.
    #[arg(short, long, value_name = "TEXT")]
    search: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "marquee_rs=debug,tower_http=debug"
    } else {
        "marquee_rs=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match marquee_rs::load_config(args.config.as_deref(), args.debug) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.search {
        Some(text) => marquee_rs::search_once(config, &text).await.map(|movies| {
            for movie in &movies.results {
                println!(
                    "{} ({}) \u{2605} {:.1}",
                    movie.title,
                    movie.year().unwrap_or("????"),
                    movie.vote_average
                );
            }
        }),
        None => marquee_rs::run(config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
