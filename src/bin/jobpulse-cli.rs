use clap::Parser;

use jobpulse::report::MARKER;
use jobpulse::routing::DIAGNOSTIC_PREFIX;

#[derive(Parser)]
#[command(name = "jobpulse-cli")]
#[command(about = "Verify a jobpulse installation from the outside", long_about = None)]
#[command(after_help = "Example:\n  jobpulse-cli http://localhost:3000\n\nFetches http://localhost:3000/jobpulse/test and prints the self-test report.")]
struct Cli {
    /// Base URL of the application to probe, e.g. http://localhost:3000
    url: String,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Err(error) = url::Url::parse(&cli.url) {
        eprintln!("Error: invalid URL {:?}: {error}", cli.url);
        std::process::exit(2);
    }

    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure)
        .build()?;

    let endpoint = format!(
        "{}{DIAGNOSTIC_PREFIX}/test",
        cli.url.trim_end_matches('/')
    );

    match fetch_report(&client, &endpoint).await {
        Some(body) if body.contains(MARKER) => println!("{body}"),
        _ => {
            eprintln!("could not find jobpulse at {}", cli.url);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn fetch_report(client: &reqwest::Client, endpoint: &str) -> Option<String> {
    let response = client.get(endpoint).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.text().await.ok()
}
