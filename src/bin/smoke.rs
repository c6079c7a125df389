// src/bin/smoke.rs
// Smoke checks against a running travel-lists instance.
// Usage: SMOKE_BASE_URL=http://localhost:5001 cargo run --bin smoke
// Set SMOKE_EMAIL and SMOKE_PASSWORD to also exercise the authenticated routes.
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug)]
struct CheckResult {
    name: String,
    success: bool,
    detail: String,
    duration_secs: f64,
}

struct SmokeRunner {
    base_url: String,
    client: Client,
    token: Option<String>,
    results: Vec<CheckResult>,
}

impl SmokeRunner {
    fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: None,
            results: Vec::new(),
        })
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            request = request.header("x-auth-token", token);
        }

        let response = request.send().await.context("request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP {} - {}", status, body);
        }
        response.json().await.context("invalid JSON body")
    }

    async fn check_health(&self) -> Result<String> {
        let health = self.get_json("/health").await?;
        Ok(format!("status {}", health["status"]))
    }

    async fn check_countries(&self) -> Result<String> {
        let countries = self.get_json("/api/countries").await?;
        let count = countries.as_array().map(Vec::len).unwrap_or(0);
        if count == 0 {
            bail!("no countries returned");
        }
        Ok(format!("{} countries", count))
    }

    /// Searches by the first country and returns the first hit's ID
    async fn check_search(&self) -> Result<String> {
        let countries = self.get_json("/api/countries").await?;
        let country = countries[0]
            .as_str()
            .context("countries response is empty")?
            .to_string();

        let url = format!("{}/api/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("country", country.as_str())])
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            bail!("HTTP {} searching for {}", response.status(), country);
        }

        let hits: Value = response.json().await?;
        let id = hits[0]["ID"].as_str().context("search hit without ID")?;
        Ok(id.to_string())
    }

    async fn check_destination(&self, id: &str) -> Result<String> {
        let destination = self.get_json(&format!("/api/destinations/{}", id)).await?;
        let coordinates = self
            .get_json(&format!("/api/destinations/{}/coordinates", id))
            .await?;
        Ok(format!(
            "{} at ({}, {})",
            destination["Destination"], coordinates["latitude"], coordinates["longitude"]
        ))
    }

    async fn check_public_lists(&self) -> Result<String> {
        let page = self.get_json("/api/lists?limit=5").await?;
        Ok(format!("{} public lists", page["totalLists"]))
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {} - {}", status, response.text().await?);
        }

        let login: LoginResponse = response.json().await?;
        self.token = Some(login.token);
        Ok(format!("logged in as {}", email))
    }

    async fn check_protected(&self) -> Result<String> {
        let me = self.get_json("/api/protected").await?;
        Ok(format!("user {}", me["user"]["email"]))
    }

    async fn check_my_lists(&self) -> Result<String> {
        let lists = self.get_json("/api/lists/mine").await?;
        let count = lists.as_array().map(Vec::len).unwrap_or(0);
        Ok(format!("{} lists owned", count))
    }

    fn record(&mut self, name: &str, started: Instant, outcome: Result<String>) -> Option<String> {
        let duration_secs = started.elapsed().as_secs_f64();
        let (success, detail) = match &outcome {
            Ok(detail) => (true, detail.clone()),
            Err(e) => (false, format!("{:#}", e)),
        };

        if success {
            println!("{}✅ {}: {} ({:.2}s){}", GREEN, name, detail, duration_secs, RESET);
        } else {
            println!("{}❌ {}: {}{}", RED, name, detail, RESET);
        }

        self.results.push(CheckResult {
            name: name.to_string(),
            success,
            detail,
            duration_secs,
        });
        outcome.ok()
    }

    async fn run(&mut self) {
        println!("\n{}🔍 Checking {}...{}\n", CYAN, self.base_url, RESET);

        let started = Instant::now();
        let health = self.check_health().await;
        if self.record("health", started, health).is_none() {
            println!("{}Please ensure travel-lists is running (cargo run){}", YELLOW, RESET);
            process::exit(1);
        }

        let started = Instant::now();
        let countries = self.check_countries().await;
        self.record("countries", started, countries);

        let started = Instant::now();
        let search = self.check_search().await;
        if let Some(id) = self.record("search", started, search) {
            let started = Instant::now();
            let destination = self.check_destination(&id).await;
            self.record("destination", started, destination);
        }

        let started = Instant::now();
        let lists = self.check_public_lists().await;
        self.record("public lists", started, lists);

        match (env::var("SMOKE_EMAIL"), env::var("SMOKE_PASSWORD")) {
            (Ok(email), Ok(password)) => {
                let started = Instant::now();
                let login = self.login(&email, &password).await;
                if self.record("login", started, login).is_some() {
                    let started = Instant::now();
                    let protected = self.check_protected().await;
                    self.record("protected", started, protected);

                    let started = Instant::now();
                    let mine = self.check_my_lists().await;
                    self.record("my lists", started, mine);
                }
            }
            _ => println!(
                "{}⚠️  SMOKE_EMAIL/SMOKE_PASSWORD not set, skipping authenticated checks{}",
                YELLOW, RESET
            ),
        }

        self.print_summary();
    }

    fn print_summary(&self) {
        println!("\n{}📋 Smoke Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────");
        println!("{:<20} {:<8} {:>10}  {}", "Check", "Status", "Duration", "Detail");
        println!("──────────────────────────────────────────────────────────────");

        for res in &self.results {
            let status_icon = if res.success { "✅" } else { "❌" };
            println!(
                "{:<20} {:<8} {:>9.2}s  {}",
                res.name, status_icon, res.duration_secs, res.detail
            );
        }
        println!("──────────────────────────────────────────────────────────────");

        let failed = self.results.iter().filter(|r| !r.success).count();
        if failed == 0 {
            println!("\n{}✨ All {} checks passed{}", GREEN, self.results.len(), RESET);
        } else {
            println!("\n{}{} of {} checks failed{}", RED, failed, self.results.len(), RESET);
        }
    }

    fn failed(&self) -> bool {
        self.results.iter().any(|r| !r.success)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let base_url = env::var("SMOKE_BASE_URL").unwrap_or_else(|_| {
        let port = env::var("SERVER_PORT").unwrap_or_else(|_| "5001".to_string());
        format!("http://localhost:{}", port)
    });

    let mut runner = SmokeRunner::new(base_url)?;
    runner.run().await;

    if runner.failed() {
        process::exit(1);
    }
    Ok(())
}
