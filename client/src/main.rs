//! Babynap CLI
//!
//! Terminal front end over the day pipeline: lists babies, renders a
//! day's five segments with their estimated times and totals, and keeps
//! the versioned offline cache warm so a dead network still shows the
//! last fetched day (read-only).

use anyhow::{bail, Result};
use babynap_client::{config::AppConfig, load_day, routes, session, DayApi, HttpNetwork};
use babynap_client::{DaySchedule, LoadOutcome, Navigator};
use babynap_shared::offline::{self, CacheRegistry};
use babynap_shared::schedule::format_duration;
use babynap_shared::NapSegment;
use chrono::{NaiveDate, NaiveTime};
use std::env;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        "Starting Babynap client"
    );

    if let Some(cookie) = &config.session.cookie {
        match session::username_from_cookies(cookie) {
            Some(username) => info!(%username, "session marker present"),
            None => warn!("session cookie configured but no username marker found"),
        }
    }

    // Open the versioned cache store and install the app shell
    let registry = CacheRegistry::new();
    let store_name = config.cache.store_name();
    let store = registry.open(&store_name)?;

    let network = HttpNetwork::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
        config.session.cookie.clone(),
    )?;

    match offline::precache(store.as_ref(), &offline::SHELL_MANIFEST, &network).await {
        Ok(()) => info!(cache = %store_name, "shell assets cached"),
        Err(e) => warn!(
            "Failed to pre-cache shell assets: {}. Continuing with live network only.",
            e
        ),
    }
    registry.activate(&store_name)?;

    let api = DayApi::new(network, store);

    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [] => list_babies(&api).await,
        [baby_id] => {
            let baby_id = baby_id.parse()?;
            show_day(&api, baby_id, today()).await
        }
        [baby_id, day] => {
            let baby_id = baby_id.parse()?;
            let day: NaiveDate = day.parse()?;
            show_day(&api, baby_id, day).await
        }
        _ => bail!("usage: babynap [baby-id] [day]"),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn list_babies(api: &DayApi) -> Result<()> {
    let babies = api.list_babies().await?;
    if babies.is_empty() {
        println!("no babies registered");
        return Ok(());
    }
    for baby in babies {
        println!(
            "{:>4}  {}  {}",
            baby.id,
            baby.name,
            routes::day_view_path(baby.id, today())
        );
    }
    Ok(())
}

async fn show_day(api: &DayApi, baby_id: i64, day: NaiveDate) -> Result<()> {
    let navigator = Navigator::new();
    let ticket = navigator.navigate(baby_id, day);
    match load_day(api, &navigator, ticket).await? {
        LoadOutcome::Loaded(schedule) => {
            render_day(&schedule);
            Ok(())
        }
        // a single-shot CLI never re-navigates, but the pipeline can
        LoadOutcome::Superseded => Ok(()),
    }
}

fn render_day(schedule: &DaySchedule) {
    let name = schedule.baby_name().unwrap_or("(no record yet)");
    println!("{}  {}", name, schedule.day());
    if let (Some(prev), Some(next)) = (
        routes::previous_day(schedule.day()),
        routes::next_day(schedule.day()),
    ) {
        println!("  <- {}    {} ->", prev, next);
    }
    println!();

    if schedule.offline() {
        println!("offline mode; saving disabled");
        println!();
    }

    let segments = schedule.segments();
    println!("morning (...{})", fmt_wake(&segments[0]));
    for i in 1..segments.len() {
        println!(
            "{} ({} - {})",
            segments[i - 1].label(),
            fmt_sleep(&segments[i - 1]),
            fmt_wake(&segments[i]),
        );
    }
    println!("night ({}...)", fmt_sleep(&segments[4]));
    println!();

    for segment in segments {
        println!("[{}]", segment.label());
        println!("  {}: {}", segment.wake_label(), fmt_wake(segment));
        println!("  awake window: {} minutes", segment.awake_window);
        println!("  calm-down time: {} minutes", segment.calm_down);
        if let Some(estimate) = &segment.estimate {
            println!("  estimated baby sleep time: {}", estimate.sleep_time_display);
            println!(
                "  estimated baby put-down time: {}",
                estimate.put_down_time_display
            );
        }
    }

    println!();
    let totals = schedule.totals();
    println!("total naptime: {}", format_duration(totals.total_nap_minutes));
    println!(
        "total awake time: {}",
        format_duration(totals.total_awake_minutes)
    );
}

fn fmt_wake(segment: &NapSegment) -> String {
    segment.wake_up_time.map(fmt_time).unwrap_or_default()
}

fn fmt_sleep(segment: &NapSegment) -> String {
    segment
        .estimate
        .as_ref()
        .map(|e| e.sleep_time_display.clone())
        .unwrap_or_default()
}

fn fmt_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "babynap=info".into()
        } else {
            "babynap=debug,babynap_client=debug,babynap_shared=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
