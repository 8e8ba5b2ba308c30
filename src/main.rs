use anyhow::Result;
use tracing_subscriber::EnvFilter;

use oai_conformance_rs::client::OpenAICompatibleClient;
use oai_conformance_rs::harness::{default_probes, report, run_suite, HarnessConfig};

// Run against a local server with the stock defaults:
//   oai-conformance
// Or point it elsewhere:
//   OAI_CONFORMANCE_BASE_URL=https://api.example.com/v1 \
//   OAI_CONFORMANCE_API_KEY=sk-... oai-conformance --json

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let json_output = std::env::args().any(|arg| arg == "--json");
    let cfg = HarnessConfig::from_env();

    let client = match OpenAICompatibleClient::new(cfg.client_config()) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("failed to construct API client: {err}");
            std::process::exit(2);
        }
    };

    if !json_output {
        println!("OpenAI-Compatible API Conformance Suite");
        println!("Server URL: {}", client.base_url());
    }

    let probes = default_probes(&cfg);
    let outcome = run_suite(&client, &probes).await;

    if json_output {
        println!("{}", report::render_json(&outcome)?);
    } else {
        print!("{}", report::render_text(&outcome));
    }

    std::process::exit(report::exit_code(&outcome));
}
