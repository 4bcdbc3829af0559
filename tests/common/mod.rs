#![allow(dead_code)]

use chrono::{Duration, Utc};
use diesel::prelude::*;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use tempfile::TempDir;

use polls_backend::config::AppConfig;
use polls_backend::models::{NewChoice, NewQuestion};
use polls_backend::schema::{choices, questions};

pub const ADMIN_PASSWORD: &str = "open-sesame";

pub struct TestApp {
    pub client: Client,
    pub database_url: String,
    _tmp: TempDir,
}

/// Build a fully wired application against a fresh temp-dir database.
pub fn spawn() -> TestApp {
    let tmp = TempDir::new().expect("create temp dir");
    let database_url = tmp
        .path()
        .join("polls.sqlite")
        .to_str()
        .expect("utf-8 temp path")
        .to_string();

    let config = AppConfig {
        database_url: database_url.clone(),
        admin_password_hash: bcrypt::hash(ADMIN_PASSWORD, 4).expect("hash test password"),
        rocket_port: 8000,
    };

    let client = Client::tracked(polls_backend::build(config)).expect("valid rocket instance");

    TestApp {
        client,
        database_url,
        _tmp: tmp,
    }
}

pub fn connect(app: &TestApp) -> SqliteConnection {
    SqliteConnection::establish(&app.database_url).expect("open test database")
}

/// Insert a question published `days_offset` days from today (negative for
/// the past, positive for questions that have yet to be published).
pub fn create_question(conn: &mut SqliteConnection, text: &str, days_offset: i64) -> i32 {
    let pub_date = Utc::now().date_naive() + Duration::days(days_offset);
    diesel::insert_into(questions::table)
        .values(&NewQuestion {
            question_text: text.to_string(),
            pub_date,
        })
        .returning(questions::id)
        .get_result(conn)
        .expect("insert question")
}

pub fn create_choice(conn: &mut SqliteConnection, question_id: i32, text: &str) -> i32 {
    diesel::insert_into(choices::table)
        .values(&NewChoice {
            question_id,
            choice_text: text.to_string(),
        })
        .returning(choices::id)
        .get_result(conn)
        .expect("insert choice")
}

pub fn detail_path(question_id: i32) -> String {
    format!(
        "/polls/{}/detail/thebestappintheworld/oliverius/thebestdev",
        question_id
    )
}

pub fn login(app: &TestApp) {
    let response = app
        .client
        .post("/admin/login")
        .header(ContentType::Form)
        .body(format!("password={}", ADMIN_PASSWORD))
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);
}
