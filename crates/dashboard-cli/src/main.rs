//! Command-line interface for the stock dashboard

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use dashboard_stock::catalog::{Market, display_name};
use dashboard_stock::engine::indicators::Column;
use dashboard_stock::engine::recommendation::{describe, signal_score};
use dashboard_stock::engine::{compute_indicators, recommend, support_resistance};
use dashboard_stock::forecast::{self, ForecastMethod};
use dashboard_stock::{DashboardConfig, DataProvider, HybridSource, MarketDataSource, market};
use dashboard_utils::{or_na, signed, signed_percent, thousands};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-dashboard")]
#[command(about = "Quotes, indicators and forecasts for US and Indian stocks", long_about = None)]
struct Cli {
    /// Preferred data provider (yahoo, alphavantage)
    #[arg(short, long, global = true)]
    provider: Option<DataProvider>,

    /// History range requested from Yahoo Finance
    #[arg(short, long, global = true)]
    range: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Latest quote
    Quote { symbol: String },
    /// Indicator columns for the most recent bars
    Indicators {
        symbol: String,
        /// Number of trailing rows to show
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,
    },
    /// Buy/sell recommendation from the latest indicators
    Recommend { symbol: String },
    /// Forecast future closes
    Forecast {
        symbol: String,
        /// Forecasting strategy (forest, linear)
        #[arg(short, long, default_value = "forest")]
        method: ForecastMethod,
        /// Business days to forecast
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Recent support and resistance
    Levels { symbol: String },
    /// Major market indices
    Overview,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dashboard_utils::init_tracing("warn,dashboard_stock=info");

    let cli = Cli::parse();

    let mut builder = DashboardConfig::builder()
        .with_env_api_key()
        .with_env_provider()?;
    if let Some(provider) = cli.provider {
        builder = builder.provider(provider);
    }
    if let Some(range) = &cli.range {
        builder = builder.history_range(range.clone());
    }
    let config = builder.build().context("invalid configuration")?;
    let source = HybridSource::from_config(&config)?;

    info!(sources = ?source.source_names(), "Starting stock-dashboard");

    match cli.command {
        Commands::Quote { symbol } => {
            let quote = source.fetch_quote(&symbol).await?;
            if cli.json {
                return print_json(&quote);
            }

            let cur = Market::of(&quote.symbol).currency();
            let mut table = new_table(vec!["Field", "Value"]);
            table.add_row(vec!["Name".to_string(), display_name(&quote.symbol)]);
            table.add_row(vec!["Price".to_string(), format!("{cur}{:.2}", quote.price)]);
            table.add_row(vec![
                "Change".to_string(),
                format!("{cur}{} ({})", signed(quote.change, 2), signed_percent(quote.change_percent)),
            ]);
            table.add_row(vec!["Open".to_string(), format!("{cur}{:.2}", quote.open)]);
            table.add_row(vec!["High".to_string(), format!("{cur}{:.2}", quote.high)]);
            table.add_row(vec!["Low".to_string(), format!("{cur}{:.2}", quote.low)]);
            table.add_row(vec!["Volume".to_string(), thousands(quote.volume)]);
            table.add_row(vec!["Trading day".to_string(), quote.trading_day.to_string()]);
            println!("{table}");
        }
        Commands::Indicators { symbol, rows } => {
            let series = source.fetch_series(&symbol).await?;
            let frame = compute_indicators(&series);
            if !frame.has_indicators() {
                println!("Only {} bars for {symbol}; indicators need more history.", frame.len());
            }

            let start = frame.len().saturating_sub(rows);
            let tail = &frame.rows[start..];
            if cli.json {
                return print_json(tail);
            }

            let mut header = vec!["Date", "Close"];
            header.extend(Column::ALL.iter().map(Column::name));
            let mut table = new_table(header);
            for row in tail {
                let mut cells = vec![row.bar.date.to_string(), format!("{:.2}", row.close())];
                cells.extend(Column::ALL.iter().map(|c| or_na(row.get(*c), 2)));
                table.add_row(cells);
            }
            println!("{table}");
        }
        Commands::Recommend { symbol } => {
            let series = source.fetch_series(&symbol).await?;
            let frame = compute_indicators(&series);
            let recommendation = recommend(&frame);
            if cli.json {
                return print_json(&recommendation);
            }

            println!("{} ({symbol})", display_name(&symbol));
            println!("Recommendation: {}", describe(recommendation));
            if let (Some(_), Some(latest)) = (recommendation, frame.latest()) {
                println!("Signal score: {}", signal_score(latest));
            }
        }
        Commands::Forecast {
            symbol,
            method,
            horizon,
        } => {
            let series = source.fetch_series(&symbol).await?;
            let horizon = horizon.unwrap_or(config.forecast.default_horizon);
            let Some(result) = forecast::run(method, &series, horizon, &config.forecast) else {
                println!(
                    "Not enough history to forecast {symbol} ({} bars).",
                    series.len()
                );
                return Ok(());
            };
            if cli.json {
                return print_json(&result);
            }

            let cur = Market::of(&symbol).currency();
            let mut table = new_table(vec!["Date", "Predicted close"]);
            for point in &result.points {
                table.add_row(vec![point.date.to_string(), format!("{cur}{:.2}", point.price)]);
            }
            println!("{table}");
            println!("Method: {method}");
            println!("Current price: {cur}{:.2}", result.current_price);
            println!("Predicted change: {}", signed_percent(result.predicted_change_percent));
            println!("Confidence: {}%", forecast::prediction_confidence(&series));
        }
        Commands::Levels { symbol } => {
            let series = source.fetch_series(&symbol).await?;
            let Some(levels) = support_resistance(&series) else {
                println!("Not enough history for support/resistance on {symbol}.");
                return Ok(());
            };
            if cli.json {
                return print_json(&levels);
            }

            let cur = Market::of(&symbol).currency();
            let mut table = new_table(vec!["Level", "Price", "Distance"]);
            table.add_row(vec![
                "Resistance".to_string(),
                format!("{cur}{:.2}", levels.resistance),
                format!("{:.2}%", levels.distance_to_resistance),
            ]);
            table.add_row(vec![
                "Current".to_string(),
                format!("{cur}{:.2}", levels.current),
                String::new(),
            ]);
            table.add_row(vec![
                "Support".to_string(),
                format!("{cur}{:.2}", levels.support),
                format!("{:.2}%", levels.distance_to_support),
            ]);
            println!("{table}");
        }
        Commands::Overview => {
            let snapshots = market::overview(&source).await;
            if cli.json {
                return print_json(&snapshots);
            }

            let mut table = new_table(vec!["Index", "Symbol", "Level", "Change", "Change %"]);
            for snap in &snapshots {
                table.add_row(vec![
                    snap.name.clone(),
                    snap.symbol.clone(),
                    format!("{:.2}", snap.price),
                    signed(snap.change, 2),
                    signed_percent(snap.change_percent),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forecast_args() {
        let cli = Cli::try_parse_from([
            "stock-dashboard",
            "forecast",
            "AAPL",
            "--method",
            "linear",
            "--horizon",
            "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Forecast {
                symbol,
                method,
                horizon,
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(method, ForecastMethod::Linear);
                assert_eq!(horizon, Some(10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["stock-dashboard", "quote", "TCS.NS", "--json", "-p", "yahoo"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.provider, Some(DataProvider::Yahoo));
        assert!(matches!(cli.command, Commands::Quote { symbol } if symbol == "TCS.NS"));
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(Cli::try_parse_from(["stock-dashboard", "forecast", "AAPL", "-m", "arima"]).is_err());
    }
}
