//! Fetch a URL and print the decoded JSON.
//!
//! ```text
//! cargo run -p rxhttp-client --features cli --bin fetch -- [--log] [--body] <url>
//! ```
//!
//! `--log` prints the curl command and the outcome line of the request.
//! `--body` prints the raw body instead of decoding it as JSON.

use futures::StreamExt;
use rxhttp_client::{HttpClient, Request};

const USAGE: &str = "usage: fetch [--log] [--body] <url>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut log = false;
    let mut raw_body = false;
    let mut url = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--log" => log = true,
            "--body" => raw_body = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ if url.is_none() => url = Some(arg),
            _ => anyhow::bail!("unexpected argument: {arg}\n{USAGE}"),
        }
    }
    let Some(url) = url else {
        anyhow::bail!(USAGE);
    };

    let client = HttpClient::builder().log_requests(log).build()?;

    if raw_body {
        let mut stream = client.fetch_body(Request::get(url));
        if let Some(body) = stream.next().await {
            println!("{}", String::from_utf8_lossy(&body?));
        }
    } else {
        let mut stream = client.fetch_json_url(url);
        if let Some(value) = stream.next().await {
            println!("{}", serde_json::to_string_pretty(&value?)?);
        }
    }

    Ok(())
}
