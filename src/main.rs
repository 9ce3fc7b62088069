mod analytics;
mod archive;
mod cache;
mod cli;
mod error;
mod models;
mod stations;

use clap::Parser;
use cli::{App, Cli, CityArgs, Commands, ForecastArgs, TrendsArgs};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Initializing air quality analytics app...");

    let cli = Cli::parse();

    // Initialize the application state (archive, station directory, cache)
    let mut app = match App::new().await {
        Ok(app) => {
            info!("Application initialized successfully.");
            app
        },
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!(
                "{}",
                "Error: Failed to initialize application. Check logs.".red()
            );
            return Err(e);
        },
    };

    // One-shot mode: run the given subcommand and exit.
    if let Some(command) = cli.command {
        return app.run(command, cli.json).await;
    }

    println!(
        "{}",
        "Welcome to the HealthGuard Air Quality CLI!".cyan().bold()
    );

    // Main interactive loop
    loop {
        let options = &[
            "Monitoring Stations Overview",
            "Historical Trends",
            "AQI Forecast",
            "Pattern Analysis",
            "Risk Assessment",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()? // Use interact_opt to handle potential cancellation (e.g., Ctrl+C)
            .unwrap_or(options.len() - 1); // Default to Exit if cancelled

        println!("\n---\n"); // Add spacing

        // Handle the user's choice
        let command_result = match selection {
            0 => app.run(Commands::Stations, cli.json).await,
            1 => {
                let city = match cli::prompt_city(app.default_city()) {
                    Ok(city) => city,
                    Err(e) => {
                        println!("{} {}", "Failed to get city:".red(), e);
                        continue;
                    },
                };
                let range = match cli::prompt_time_range() {
                    Ok(range) => range,
                    Err(e) => {
                        println!("{} {}", "Failed to get time range:".red(), e);
                        continue;
                    },
                };
                app.run(
                    Commands::Trends(TrendsArgs {
                        city: Some(city),
                        time_range: range.label().to_string(),
                    }),
                    cli.json,
                )
                .await
            },
            2 => {
                let city = match cli::prompt_city(app.default_city()) {
                    Ok(city) => city,
                    Err(e) => {
                        println!("{} {}", "Failed to get city:".red(), e);
                        continue;
                    },
                };
                let days = match cli::prompt_days() {
                    Ok(days) => days,
                    Err(e) => {
                        println!("{} {}", "Failed to get days:".red(), e);
                        continue;
                    },
                };
                app.run(
                    Commands::Forecast(ForecastArgs {
                        city: Some(city),
                        days,
                    }),
                    cli.json,
                )
                .await
            },
            3 => {
                match cli::prompt_city(app.default_city()) {
                    Ok(city) => {
                        app.run(Commands::Patterns(CityArgs { city: Some(city) }), cli.json)
                            .await
                    },
                    Err(e) => {
                        println!("{} {}", "Failed to get city:".red(), e);
                        continue;
                    },
                }
            },
            4 => {
                match cli::prompt_city(app.default_city()) {
                    Ok(city) => {
                        app.run(Commands::Risk(CityArgs { city: Some(city) }), cli.json)
                            .await
                    },
                    Err(e) => {
                        println!("{} {}", "Failed to get city:".red(), e);
                        continue;
                    },
                }
            },
            5 => {
                println!("{}", "Exiting application. Goodbye!".green());
                break; // Exit the loop
            },
            _ => unreachable!(), // Should not happen with the current setup
        };

        // Handle potential errors from command execution
        if let Err(e) = command_result {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!("\n---\n"); // Add spacing before next prompt
    }

    Ok(())
}
