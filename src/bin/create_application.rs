use clap::Parser;
use rand::distr::Alphanumeric;
use rand::Rng;
use sqlx::Row;
use std::io::{self, Write};

use identity_hub::{args::Args, db_persistence::DbPersistence, AppError, Config};

const APIKEY_LENGTH: usize = 32;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Config::load(&args.config).map_err(AppError::Config)?;

    let db = DbPersistence::new(config.get_database_url()).await?;

    println!("--- Create Application (Tenant) ---");

    print!("Enter Application Name: ");
    io::stdout().flush()?;
    let mut name = String::new();
    io::stdin().read_line(&mut name)?;
    let name = name.trim();

    if name.is_empty() {
        eprintln!("Error: Application name cannot be empty.");
        return Ok(());
    }

    print!("Enter X OAuth2 Client ID: ");
    io::stdout().flush()?;
    let mut client_id = String::new();
    io::stdin().read_line(&mut client_id)?;
    let client_id = client_id.trim();

    print!("Enter X OAuth2 Client Secret: ");
    io::stdout().flush()?;
    let mut client_secret = String::new();
    io::stdin().read_line(&mut client_secret)?;
    let client_secret = client_secret.trim();

    let apikey: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(APIKEY_LENGTH)
        .map(char::from)
        .collect();

    println!("Inserting application into database...");

    let result = sqlx::query(
        r#"
        INSERT INTO applications (name, apikey, twitter_client_id, twitter_client_secret)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(&apikey)
    .bind(client_id)
    .bind(client_secret)
    .fetch_one(db.pool())
    .await;

    match result {
        Ok(row) => {
            let id: i32 = row.try_get("id")?;
            println!("✅ Success! Application created.");
            println!("ID: {}", id);
            println!("Name: {}", name);
            println!("API Key: {}", apikey);
        }
        Err(e) => {
            if e.to_string().contains("duplicate key")
                || e.to_string().contains("unique constraint")
            {
                eprintln!("❌ Error: Application '{}' already exists.", name);
            } else {
                eprintln!("❌ Database Error: {}", e);
            }
        }
    }

    Ok(())
}
