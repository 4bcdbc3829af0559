#[macro_use]
extern crate rocket;

pub mod admin;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod schema;

use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

use config::AppConfig;
use db::PollsDb;

/// Shared application state available to request handlers.
pub struct AppState {
    pub admin_password_hash: String,
}

/// Assemble the Rocket instance from a loaded configuration.
pub fn build(config: AppConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", config.rocket_port))
        .merge(("databases.polls_db.url", config.database_url.clone()));

    rocket::custom(figment)
        .manage(AppState {
            admin_password_hash: config.admin_password_hash,
        })
        .attach(PollsDb::fairing())
        .attach(Template::fairing())
        .attach(AdHoc::on_ignite("Database Migrations", db::run_migrations))
        .attach(AdHoc::on_ignite("Database Seeding", db::run_seeding))
        .mount(
            "/polls",
            routes![
                routes::polls::client::index,
                routes::polls::client::detail,
                routes::polls::client::results,
                routes::polls::client::vote,
            ],
        )
        .mount(
            "/",
            routes![
                routes::polls::admin::login_page,
                routes::polls::admin::login,
                routes::polls::admin::logout,
                routes::polls::admin::question_list,
                routes::polls::admin::question_new,
                routes::polls::admin::question_create,
                routes::polls::admin::question_edit,
                routes::polls::admin::question_save,
                routes::polls::admin::question_delete,
            ],
        )
        .register("/", catchers![routes::not_found, routes::unauthorized])
}
