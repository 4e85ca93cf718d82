use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

use service_hours::services::time_service::{self, DiscountPolicy};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let discount = args.iter().any(|a| a == "--discount");
    let Some(user_id) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("usage: account-time <user-id> [--discount]");
        std::process::exit(2);
    };

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("cannot connect to database");

    let policy = if discount {
        DiscountPolicy::enabled()
    } else {
        DiscountPolicy::default()
    };

    match time_service::account_time(&pool, user_id, policy).await {
        Ok(summary) => {
            let json = serde_json::to_string_pretty(&summary)
                .expect("summary serializes");
            println!("{json}");
        }
        Err(e) => {
            eprintln!("time accounting failed for {user_id}: {e}");
            std::process::exit(1);
        }
    }
}
