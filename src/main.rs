// Main application entry point

use polls_backend::build;
use polls_backend::config::AppConfig;

#[rocket::launch]
fn rocket() -> _ {
    let config = AppConfig::load();
    build(config)
}
