// Routes module - organizes all HTTP route handlers

pub mod polls;

use rocket::http::Status;
use rocket::response::status;
use rocket_dyn_templates::{context, Template};

/// 404 error handler - renders the not-found page
#[catch(404)]
pub fn not_found() -> Template {
    Template::render("404", context! { message: "Page not found" })
}

#[catch(401)]
pub fn unauthorized() -> status::Custom<()> {
    status::Custom(Status::Unauthorized, ())
}
