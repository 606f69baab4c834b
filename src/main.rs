#![allow(dead_code)]

mod api;
mod app;
mod engine;
mod infra;
mod ui;

use api::client::ApiClient;
use infra::config::AppConfig;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::from_env();

    if args.len() <= 1 {
        if let Err(error) = ui::app_shell::launch(config) {
            eprintln!("failed to start visitdesk: {error}");
            std::process::exit(1);
        }
        return;
    }

    match args[1].as_str() {
        "cards" => list_cards(&config),
        "logs" => list_logs(&config),
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }
}

fn list_cards(config: &AppConfig) {
    let client = build_client(config);
    match client.get_business_cards() {
        Ok(cards) => {
            if cards.is_empty() {
                println!("no business card records");
                return;
            }
            for card in cards {
                println!(
                    "{}\t{}\t{}",
                    card.id,
                    card.created_at.as_deref().unwrap_or("-"),
                    card.name.as_deref().unwrap_or("-")
                );
            }
        }
        Err(error) => {
            eprintln!("fetch failed: {error}");
            std::process::exit(1);
        }
    }
}

fn list_logs(config: &AppConfig) {
    let client = build_client(config);
    match client.get_visitor_logs() {
        Ok(logs) => {
            if logs.is_empty() {
                println!("no visitor log entries");
                return;
            }
            for log in logs {
                println!(
                    "{}\t{}\t{}\t{}",
                    log.id,
                    log.batch_id,
                    log.created_at.as_deref().unwrap_or("-"),
                    log.visitor_name.as_deref().unwrap_or("-")
                );
            }
        }
        Err(error) => {
            eprintln!("fetch failed: {error}");
            std::process::exit(1);
        }
    }
}

fn build_client(config: &AppConfig) -> ApiClient {
    match ApiClient::from_config(config) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("failed to build API client: {error}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("usage:");
    println!("  visitdesk          launch the desktop app");
    println!("  visitdesk cards    print stored business card records");
    println!("  visitdesk logs     print stored visitor log entries");
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("visitdesk=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
