// Database connection and initialization

use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::{Build, Rocket};
use rocket_sync_db_pools::database;

/// Database connection pool for the polls app
#[database("polls_db")]
pub struct PollsDb(diesel::SqliteConnection);

// Embed migrations from the migrations directory
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn database_url(rocket: &Rocket<Build>) -> String {
    rocket
        .figment()
        .extract_inner("databases.polls_db.url")
        .expect("databases.polls_db.url must be configured")
}

/// Run pending database migrations
pub async fn run_migrations(rocket: Rocket<Build>) -> Rocket<Build> {
    let url = database_url(&rocket);

    // Run migrations in a blocking task since MigrationHarness requires a sync connection
    let result: Result<Vec<String>, String> = rocket::tokio::task::spawn_blocking(move || {
        let mut sync_conn = SqliteConnection::establish(&url)
            .map_err(|e| format!("Failed to establish connection: {}", e))?;

        let versions = sync_conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| format!("Failed to run migrations: {}", e))?
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<String>>();

        Ok(versions)
    })
    .await
    .expect("Migration task panicked");

    match result {
        Ok(versions) => {
            if versions.is_empty() {
                println!("✅ Database is up to date");
            } else {
                println!("✅ Applied {} migration(s):", versions.len());
                for version in versions {
                    println!("   - {}", version);
                }
            }
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            panic!("Database migration failed");
        }
    }

    rocket
}

/// Seed database with initial data
pub async fn run_seeding(rocket: Rocket<Build>) -> Rocket<Build> {
    let url = database_url(&rocket);

    let result: Result<(), String> = rocket::tokio::task::spawn_blocking(move || {
        let mut sync_conn = SqliteConnection::establish(&url)
            .map_err(|e| format!("Failed to establish connection: {}", e))?;

        if let Ok(seed) = std::env::var("SEED_QUESTIONS") {
            use crate::schema::{choices, questions};

            let count: i64 = questions::table
                .count()
                .get_result(&mut sync_conn)
                .unwrap_or(0);

            if count == 0 {
                let today = chrono::Utc::now().date_naive();
                let mut seeded = 0usize;

                // Format: "Question text|Choice A,Choice B;Next question|X,Y"
                for entry in seed.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                    let (text, choice_list) = entry.split_once('|').unwrap_or((entry, ""));

                    let new_question = crate::models::NewQuestion {
                        question_text: text.trim().to_string(),
                        pub_date: today,
                    };
                    let question_id: i32 = diesel::insert_into(questions::table)
                        .values(&new_question)
                        .returning(questions::id)
                        .get_result(&mut sync_conn)
                        .map_err(|e| format!("Failed to seed questions: {}", e))?;

                    let new_choices: Vec<crate::models::NewChoice> = choice_list
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| crate::models::NewChoice {
                            question_id,
                            choice_text: s.to_string(),
                        })
                        .collect();

                    if !new_choices.is_empty() {
                        diesel::insert_into(choices::table)
                            .values(&new_choices)
                            .execute(&mut sync_conn)
                            .map_err(|e| format!("Failed to seed choices: {}", e))?;
                    }

                    seeded += 1;
                }

                if seeded > 0 {
                    println!("🌱 Seeded {} question(s) from environment variable", seeded);
                }
            }
        }
        Ok(())
    })
    .await
    .expect("Seeding task panicked");

    if let Err(e) = result {
        eprintln!("❌ Seeding failed: {}", e);
    }

    rocket
}
