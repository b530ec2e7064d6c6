//! Catalog CLI
//!
//! Command-line interface operating directly on a catalog file.

use std::process::ExitCode;

use catalog::query::ListQuery;
use catalog::{CatalogStore, Config, NewProduct, ProductFields};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Catalog CLI
#[derive(Parser, Debug)]
#[command(name = "catalog-cli")]
#[command(about = "CLI for a file-backed product catalog")]
#[command(version)]
struct Args {
    /// Catalog file
    #[arg(short, long, default_value = "./productos.json")]
    catalog: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List products
    List {
        /// Keep at most this many products
        #[arg(long)]
        limit: Option<usize>,

        /// Drop products priced below this
        #[arg(long)]
        min_price: Option<f64>,

        /// Drop products priced above this
        #[arg(long)]
        max_price: Option<f64>,
    },

    /// Get a product by id
    Get {
        /// The product id
        id: u64,
    },

    /// Add a product (fields left out are reported as missing)
    Add(AddArgs),

    /// Replace every field of a product
    Update {
        /// The product id
        id: u64,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a product
    Delete {
        /// The product id
        id: u64,
    },

    /// Add numbered sample products, skipping any that are rejected
    Seed {
        /// How many products to add
        #[arg(default_value = "15")]
        count: u64,
    },
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_parser = parse_price)]
    price: Option<f64>,
    #[arg(long)]
    thumbnail: Option<String>,
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    stock: Option<u64>,
}

#[derive(ClapArgs, Debug)]
struct FieldArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long, value_parser = parse_price)]
    price: f64,
    #[arg(long)]
    thumbnail: String,
    #[arg(long)]
    code: String,
    #[arg(long)]
    stock: u64,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let config = Config::builder().catalog_path(&args.catalog).build();
    let store = match CatalogStore::open(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&store, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(store: &CatalogStore, command: Commands) -> catalog::Result<()> {
    match command {
        Commands::List { limit, min_price, max_price } => {
            let query = ListQuery { limit, min_price, max_price };
            print_json(&query.apply(store.list()?))
        }
        Commands::Get { id } => print_json(&store.get_by_id(id)?),
        Commands::Add(add) => {
            let candidate = NewProduct {
                title: add.title,
                description: add.description,
                price: add.price,
                thumbnail: add.thumbnail,
                code: add.code,
                stock: add.stock,
            };
            print_json(&store.add(candidate)?)
        }
        Commands::Update { id, fields } => {
            let replacement = ProductFields {
                title: fields.title,
                description: fields.description,
                price: fields.price,
                thumbnail: fields.thumbnail,
                code: fields.code,
                stock: fields.stock,
            };
            print_json(&store.update(id, replacement)?)
        }
        Commands::Delete { id } => print_json(&store.delete(id)?),
        Commands::Seed { count } => {
            // A rejected sample (e.g. its code is already taken) is skipped
            let mut added = Vec::new();
            for i in 1..=count {
                let candidate = NewProduct {
                    title: Some(format!("Producto {}", i)),
                    description: Some(format!("Descripción del producto {}", i)),
                    price: Some((i * 10) as f64),
                    thumbnail: Some(format!("thumbnail{}.jpg", i)),
                    code: Some(format!("CODE{}", i)),
                    stock: Some(i * 5),
                };
                match store.add(candidate) {
                    Ok(product) => added.push(product),
                    Err(e) => eprintln!("skipped CODE{}: {}", i, e),
                }
            }
            print_json(&added)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> catalog::Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| catalog::CatalogError::Encode(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Prices must be finite so they survive the JSON round trip
fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err("price must be a finite number".to_string())
    }
}
