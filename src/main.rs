use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caronas_client::backend::{HttpRideApi, RideApi};
use caronas_client::directions::HttpDirections;
use caronas_client::history::{filter_rides, group_by_day, HistoryFilter};
use caronas_client::location::ConfiguredLocation;
use caronas_client::selection::{AcceptOutcome, Notice};
use caronas_client::vehicle::Vehicle;
use caronas_client::{ClientConfig, FlowError, RideBoard, Session};

#[derive(Parser)]
#[command(name = "caronas", about = "Inspect and drive the ride-request flow from a terminal")]
struct Cli {
    /// Logged-in driver id.
    #[arg(long, default_value_t = 1)]
    driver_id: i64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List open ride requests with requester names.
    Requests,
    /// Preview the route to a request's pickup point.
    Preview { ride_id: i64 },
    /// Accept a ride request.
    Accept { ride_id: i64 },
    /// Show a passenger's finished rides, grouped by day.
    History {
        passenger_id: i64,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Register the driver's vehicle.
    RegisterVehicle {
        #[arg(long)]
        car: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        color: String,
        #[arg(long)]
        registration: String,
        #[arg(long)]
        license: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), FlowError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caronas_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    let api = Arc::new(HttpRideApi::new(&config.backend_url, config.request_timeout)?);

    match cli.command {
        Command::Requests => {
            let board = build_board(&config, cli.driver_id, Arc::clone(&api));
            let snapshot = board.open().await;
            if let Some(err) = snapshot.location_error {
                eprintln!("map disabled: {err}");
            }
            for entry in &snapshot.requests {
                println!(
                    "#{} {} — pickup ({:.5}, {:.5}) {}",
                    entry.request.id,
                    entry.requester_name,
                    entry.request.origin.lat,
                    entry.request.origin.lon,
                    entry.request.address
                );
            }
        }
        Command::Preview { ride_id } => {
            let board = build_board(&config, cli.driver_id, Arc::clone(&api));
            let snapshot = board.open().await;
            let Some(entry) = snapshot.requests.iter().find(|e| e.request.id == ride_id) else {
                eprintln!("no open request #{ride_id}");
                std::process::exit(1);
            };
            board.tap(entry.clone()).await;
            match board.controller().route_preview().await {
                Some(preview) => {
                    println!(
                        "route to pickup: {} points, viewport ({:.5}, {:.5}) span {:.5}x{:.5}",
                        preview.path.len(),
                        preview.viewport.lat,
                        preview.viewport.lon,
                        preview.viewport.lat_delta,
                        preview.viewport.lon_delta
                    );
                }
                None => println!("no route preview available"),
            }
        }
        Command::Accept { ride_id } => {
            let board = build_board(&config, cli.driver_id, Arc::clone(&api));
            let snapshot = board.open().await;
            let Some(entry) = snapshot.requests.iter().find(|e| e.request.id == ride_id) else {
                eprintln!("no open request #{ride_id}");
                std::process::exit(1);
            };
            board.tap(entry.clone()).await;
            let outcome = board.controller().confirm().await;
            for notice in board.controller().take_notices().await {
                match notice {
                    Notice::AcceptanceConfirmed { ride_id } => {
                        println!("ride #{ride_id} accepted")
                    }
                    Notice::AcceptanceFailed { ride_id } => {
                        println!("ride #{ride_id} could not be accepted")
                    }
                }
            }
            if outcome != AcceptOutcome::Accepted {
                std::process::exit(1);
            }
        }
        Command::History {
            passenger_id,
            year,
            month,
        } => {
            let rides = api.finished_rides(passenger_id).await?;
            let filtered = filter_rides(&rides, HistoryFilter { year, month });
            if filtered.is_empty() {
                println!("no rides found");
            }
            for (day, rides) in group_by_day(&filtered) {
                println!("{day}:");
                for ride in rides {
                    println!(
                        "  #{} {} — {}",
                        ride.id,
                        ride.departed_at.time(),
                        ride.address
                    );
                }
            }
        }
        Command::RegisterVehicle {
            car,
            brand,
            year,
            color,
            registration,
            license,
        } => {
            let vehicle = Vehicle {
                car,
                brand,
                year,
                color,
                registration,
                license,
            };
            vehicle.validate()?;
            api.register_vehicle(&vehicle).await?;
            println!("vehicle registered");
        }
    }

    Ok(())
}

fn build_board(
    config: &ClientConfig,
    driver_id: i64,
    api: Arc<HttpRideApi>,
) -> RideBoard<ConfiguredLocation, HttpDirections, HttpRideApi> {
    let provider = HttpDirections::new(
        &config.directions_url,
        &config.directions_api_key,
        config.request_timeout,
    )
    .expect("build directions client");
    RideBoard::new(
        Session::new(driver_id, "driver"),
        ConfiguredLocation::new(config.start_position),
        provider,
        api,
    )
}
