use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fleetiq::{
    catalog::{self, VehicleKind},
    dispatch::{self, DispatchOverrides},
    report::{HtmlSurface, OptimizationReport, Surface, TextSurface},
    scenario::{Scenario, ScenarioLoader},
    selection::{Action, Service, View},
    web::{self, WebServerConfig},
    Weather,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Fleetiq simulated fleet dashboard")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, global = true, default_value = "scenarios/chennai.yaml")]
    scenario: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Run the ride-request dispatch simulation and print its log
    Dispatch {
        /// Override tick count (uses scenario default when omitted)
        #[arg(long)]
        ticks: Option<u64>,
        /// Override snapshot interval in ticks
        #[arg(long)]
        snapshot_interval: Option<u64>,
        /// Directory for snapshots
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the route recommendation for a vehicle type and density area
    Recommend {
        #[arg(long)]
        vehicle: Option<VehicleKind>,
        #[arg(long)]
        area: String,
        #[arg(long, default_value = "clear")]
        weather: Weather,
        /// Emit the standalone HTML report instead of text
        #[arg(long)]
        html: bool,
    },
    /// Show the ambulance route plan from a unit to an accident zone
    Plan {
        #[arg(long)]
        zone: String,
        #[arg(long)]
        unit: String,
    },
}

fn load_scenario(path: &PathBuf) -> Result<Scenario> {
    if path.exists() {
        ScenarioLoader::new(".").load(path)
    } else {
        log::warn!(
            "scenario {} not found, using built-in defaults",
            path.display()
        );
        Ok(Scenario::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let scenario = load_scenario(&cli.scenario)?;

    match cli.command {
        Command::Serve { host, port } => {
            web::run(WebServerConfig {
                scenario,
                host,
                port,
            })
            .await?;
        }
        Command::Dispatch {
            ticks,
            snapshot_interval,
            snapshot_dir,
            json,
        } => {
            let overrides = DispatchOverrides {
                ticks,
                snapshot_interval_ticks: snapshot_interval,
                snapshot_dir,
            };
            let report = tokio::task::spawn_blocking(move || dispatch::run(&scenario, &overrides))
                .await
                .context("dispatch task panicked")??;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in &report.simulation_log {
                    println!("{line}");
                }
                println!(
                    "Scenario '{}' completed for {} ticks. Requests completed: {}/{}",
                    report.scenario,
                    report.ticks,
                    report.requests_completed,
                    report.requests_opened
                );
            }
        }
        Command::Recommend {
            vehicle,
            area,
            weather,
            html,
        } => {
            let mut view = View::default()
                .apply(Action::Open(Service::Fleet))?
                .apply(Action::SetWeather(weather))?
                .apply(Action::SelectArea(area.clone()))?;
            if let Some(kind) = vehicle {
                view = view.apply(Action::SelectVehicle(kind))?;
            }
            let View::Fleet(selection) = view else {
                anyhow::bail!("fleet view expected");
            };
            let area = catalog::area(&area)?;
            let report = OptimizationReport::new(area, selection.vehicle, selection.weather);
            let rendered = if html {
                HtmlSurface.render(&report)
            } else {
                TextSurface.render(&report)
            };
            print!("{rendered}");
        }
        Command::Plan { zone, unit } => {
            let view = View::default()
                .apply(Action::Open(Service::Emergency))?
                .apply(Action::SelectZone(zone))?
                .apply(Action::SelectUnit(unit))?;
            let View::Emergency(selection) = view else {
                anyhow::bail!("emergency view expected");
            };
            let plan = selection
                .plan(scenario.feed.initial.clamped().weather_impact)
                .context("both a zone and a unit are required")?;
            println!("Route from {} to {}", plan.from, plan.to);
            for (title, option) in [
                ("Recommended", &plan.recommended),
                ("Alternative", &plan.alternative),
            ] {
                println!("{title} route ({} minutes):", option.eta_minutes);
                for segment in option.segments {
                    println!(
                        "  {} - {} [{}]",
                        segment.road,
                        segment.condition.label(),
                        segment.condition.color()
                    );
                }
            }
            println!(
                "Weather Impact: {}% delay expected",
                plan.weather_delay_pct
            );
        }
    }
    Ok(())
}
