// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Administrative CLI for the application catalog registry.

use appcat_registry_db::{create_pool, run_migrations, CatalogRegistry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod version;

/// appcat-registry - inspect and edit the application catalog.
#[derive(Parser, Debug)]
#[command(
	name = "appcat-registry",
	about = "Application catalog registry administration",
	version
)]
struct Args {
	/// Config file to load instead of /etc/appcat/registry.toml
	#[arg(long, env = "APPCAT_REGISTRY_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
	/// Apply the catalog schema
	Migrate,
	#[command(flatten)]
	Catalog(cli::CatalogCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => appcat_registry_config::load_config_with_file(path)?,
		None => appcat_registry_config::load_config()?,
	};

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
	let registry = tracing_subscriber::registry().with(filter);
	if config.logging.json {
		registry
			.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init();
	}

	tracing::debug!(database = %config.database.url, "opening catalog");
	let pool = create_pool(
		&config.database.url,
		config.database.max_connections,
		config.database.busy_timeout(),
	)
	.await?;
	run_migrations(&pool).await?;

	match args.command {
		Command::Version => {}
		Command::Migrate => {
			tracing::info!(database = %config.database.url, "catalog schema is up to date");
		}
		Command::Catalog(command) => {
			let output = cli::execute(&CatalogRegistry::new(pool.clone()), command).await?;
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
	}

	pool.close().await;
	Ok(())
}
