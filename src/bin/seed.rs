// src/bin/seed.rs
// Seeds a running picjourni-pins instance with a demo account and a
// handful of pins, so the map and timeline have something to show.

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;

// --- Terminal colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Smallest valid PNG (1x1 transparent pixel) used as the demo photo
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

struct SamplePin {
    lat: f64,
    lng: f64,
    title: &'static str,
    description: &'static str,
    visit_date: &'static str,
    with_photo: bool,
}

fn sample_pins() -> Vec<SamplePin> {
    vec![
        SamplePin {
            lat: 41.6488,
            lng: -0.8891,
            title: "Basílica del Pilar",
            description: "Sunset over the Ebro, best views from the stone bridge.",
            visit_date: "2024-04-12",
            with_photo: true,
        },
        SamplePin {
            lat: 48.8584,
            lng: 2.2945,
            title: "Eiffel Tower picnic",
            description: "Baguettes on the Champ de Mars, queue skipped entirely.",
            visit_date: "2024-06-03",
            with_photo: true,
        },
        SamplePin {
            lat: 35.0116,
            lng: 135.7681,
            title: "Kyoto backstreets",
            description: "Got lost between temples and found the best coffee of the trip.",
            visit_date: "2023-11-21",
            with_photo: false,
        },
        SamplePin {
            lat: -13.1631,
            lng: -72.5450,
            title: "Machu Picchu at dawn",
            description: "Four days on the Inca Trail for this one view. Worth it.",
            visit_date: "2023-05-30",
            with_photo: true,
        },
    ]
}

#[derive(Deserialize)]
struct AuthPayload {
    token: String,
}

struct SeedClient {
    base_url: String,
    client: Client,
}

impl SeedClient {
    fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    async fn check_service_health(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Sign the demo account up, falling back to login when it exists
    async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let signup = self
            .client
            .post(format!("{}/auth/signup", self.base_url))
            .json(&json!({
                "email": email,
                "password": password,
                "display_name": "Demo Traveler"
            }))
            .send()
            .await
            .context("Signup request failed")?;

        if signup.status().is_success() {
            let payload: AuthPayload = signup.json().await.context("Bad signup response")?;
            println!("{}✅ Created demo account {}{}", GREEN, email, RESET);
            return Ok(payload.token);
        }

        if signup.status() == reqwest::StatusCode::CONFLICT {
            println!("{}ℹ️  Account exists, logging in instead{}", YELLOW, RESET);
            let login = self
                .client
                .post(format!("{}/auth/login", self.base_url))
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await
                .context("Login request failed")?;

            if !login.status().is_success() {
                bail!("Login failed with HTTP {}", login.status());
            }

            let payload: AuthPayload = login.json().await.context("Bad login response")?;
            return Ok(payload.token);
        }

        let status = signup.status();
        let body = signup.text().await.unwrap_or_else(|_| "?".to_string());
        bail!("Signup failed with HTTP {} - {}", status, body);
    }

    async fn create_pin(&self, token: &str, pin: &SamplePin) -> Result<()> {
        let mut form = Form::new()
            .text("lat", pin.lat.to_string())
            .text("lng", pin.lng.to_string())
            .text("title", pin.title)
            .text("description", pin.description)
            .text("visit_date", pin.visit_date);

        if pin.with_photo {
            let part = Part::bytes(PIXEL_PNG.to_vec())
                .file_name(format!("{}.png", pin.title.to_lowercase().replace(' ', "-")))
                .mime_str("image/png")
                .context("Invalid photo mime type")?;
            form = form.part("photos", part);
        }

        let response = self
            .client
            .post(format!("{}/pins", self.base_url))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .context("Create pin request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "?".to_string());
            bail!("HTTP {} - {}", status, body);
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let base_url =
        env::var("PINS_API_URL").unwrap_or_else(|_| "http://localhost:8003".to_string());
    let email = env::var("SEED_EMAIL").unwrap_or_else(|_| "demo@picjourni.app".to_string());
    let password =
        env::var("SEED_PASSWORD").unwrap_or_else(|_| "wanderlust-demo-1".to_string());

    let seeder = SeedClient::new(base_url)?;

    println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
    if !seeder.check_service_health().await {
        println!("{}❌ Service unavailable.{}", RED, RESET);
        println!(
            "{}Please ensure picjourni-pins is running (cargo run){}",
            YELLOW, RESET
        );
        std::process::exit(1);
    }
    println!("{}✅ Service available{}\n", GREEN, RESET);

    let token = seeder.sign_in(&email, &password).await?;

    let pins = sample_pins();
    let mut created = 0;

    println!("{}🚀 Creating {} demo pins...{}\n", BOLD, pins.len(), RESET);
    for pin in &pins {
        match seeder.create_pin(&token, pin).await {
            Ok(()) => {
                println!("{}✅ {}{}", GREEN, pin.title, RESET);
                created += 1;
            }
            Err(e) => println!("{}❌ {}: {}{}", RED, pin.title, e, RESET),
        }
    }

    println!(
        "\n{}✨ Done: {}/{} pins created for {}{}",
        BOLD,
        created,
        pins.len(),
        email,
        RESET
    );

    Ok(())
}
