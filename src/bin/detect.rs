// src/bin/detect.rs
// Probe a running reward-cards service with a GPS fix and print the detected card.
//
// Usage: detect <latitude> <longitude> [accuracy] [--coordinates | --place]
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Serialize, Debug)]
struct DetectPayload {
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CardSummary {
    id: String,
    store_name: String,
}

#[derive(Deserialize, Debug)]
struct DetectReply {
    status: String,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    card: Option<CardSummary>,
    #[serde(default)]
    distance_m: Option<f64>,
    #[serde(default)]
    rule: Option<String>,
}

#[derive(Debug)]
struct ProbeArgs {
    payload: DetectPayload,
    route: &'static str,
}

fn parse_args(args: &[String]) -> Result<ProbeArgs> {
    let mut route = "/detect";
    let mut numbers = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--coordinates" => route = "/detect/coordinates",
            "--place" => route = "/detect/place",
            value => numbers.push(
                value
                    .parse::<f64>()
                    .with_context(|| format!("not a number: {}", value))?,
            ),
        }
    }

    let (latitude, longitude, accuracy) = match numbers.as_slice() {
        [lat, lon] => (*lat, *lon, None),
        [lat, lon, acc] => (*lat, *lon, Some(*acc)),
        _ => bail!("usage: detect <latitude> <longitude> [accuracy] [--coordinates | --place]"),
    };

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        bail!("coordinates out of range: {}, {}", latitude, longitude);
    }

    Ok(ProbeArgs {
        payload: DetectPayload {
            latitude,
            longitude,
            accuracy,
        },
        route,
    })
}

fn base_url() -> String {
    if let Ok(url) = env::var("REWARD_CARDS_URL") {
        return url;
    }
    let address = env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("SERVER_PORT").unwrap_or_else(|_| "8003".to_string());
    format!("http://{}:{}", address, port)
}

fn print_reply(reply: &DetectReply, elapsed: Duration) {
    match (reply.status.as_str(), &reply.card) {
        ("matched", Some(card)) => {
            println!(
                "{}{}✅ {}{} ({})",
                GREEN, BOLD, card.store_name, RESET, card.id
            );
            if let Some(strategy) = &reply.strategy {
                println!("  • Strategy: {}", strategy);
            }
            if let Some(distance) = reply.distance_m {
                println!("  • Distance: {:.1} m", distance);
            }
            if let Some(rule) = &reply.rule {
                println!("  • Rule: {}", rule);
            }
        }
        ("no_fix", _) => println!("{}⚠️  No location fix{}", YELLOW, RESET),
        _ => println!("{}No nearby card{}", YELLOW, RESET),
    }
    println!("  • Took {:.0} ms", elapsed.as_secs_f64() * 1000.0);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let probe = match parse_args(&args) {
        Ok(probe) => probe,
        Err(e) => {
            eprintln!("{}{}{}", RED, e, RESET);
            std::process::exit(2);
        }
    };

    let url = format!("{}{}", base_url(), probe.route);
    println!(
        "{}🔍 {} ({}, {}){}",
        CYAN, url, probe.payload.latitude, probe.payload.longitude, RESET
    );

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to create HTTP client")?;

    let started = Instant::now();
    let response = client
        .post(&url)
        .json(&probe.payload)
        .send()
        .await
        .with_context(|| format!("service unavailable at {}", url))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("HTTP {} - {}", status, body);
    }

    let reply: DetectReply = response
        .json()
        .await
        .context("failed to parse detection response")?;
    print_reply(&reply, started.elapsed());

    Ok(())
}
