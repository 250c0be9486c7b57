use clap::Parser;
use role_stresscheck::{evaluate_stress, read_bulk, Error};
use std::fs::File;
use std::io::BufReader;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// CSV file with an `id,role,a1..a8` header
    path: String,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let reader = BufReader::new(File::open(&args.path)?);
    for row in read_bulk(reader) {
        match row {
            Ok(row) => match evaluate_stress(&row.role, &row.answers) {
                Ok(result) => {
                    println!(
                        "id = {}, role = {}, total_score = {}, category = {}",
                        row.id, result.role, result.total_score, result.category
                    );
                }
                Err(e) => warn!(id = %row.id, error = %e, "skipping row"),
            },
            Err(e) => warn!(error = %e, "skipping row"),
        }
    }
    Ok(())
}
