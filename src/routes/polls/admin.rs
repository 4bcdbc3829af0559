use bcrypt::verify;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::{context, Template};
use serde::Serialize;
use uuid::Uuid;

use crate::admin::{display_value, run_validators, AdminRow, QUESTION_ADMIN};
use crate::db::PollsDb;
use crate::models::{
    AdminLoginForm, Choice, NewAdminSession, NewChoice, NewQuestion, Question, QuestionForm,
};
use crate::schema::{admin_sessions, choices, questions};
use crate::AppState;

// Helper function to check if an admin is authenticated
async fn is_admin_authenticated(cookies: &CookieJar<'_>, db: &PollsDb) -> bool {
    let token = match cookies.get("admin_auth") {
        Some(cookie) => cookie.value().to_string(),
        None => return false,
    };

    db.run(move |conn| {
        admin_sessions::table
            .find(token)
            .count()
            .get_result::<i64>(conn)
            .unwrap_or(0)
            > 0
    })
    .await
}

/// One inline choice row as the form template renders it.
#[derive(Serialize)]
struct ChoiceRowCtx {
    id: String,
    choice_text: String,
    delete: bool,
}

impl ChoiceRowCtx {
    fn blank() -> Self {
        ChoiceRowCtx {
            id: String::new(),
            choice_text: String::new(),
            delete: false,
        }
    }
}

// Re-render the question form with the submitted values and an error message
fn form_template(question_id: Option<i32>, form: &QuestionForm, error: Option<String>) -> Template {
    let form_action = match question_id {
        Some(id) => format!("/admin/questions/{}", id),
        None => "/admin/questions".to_string(),
    };

    let rows: Vec<ChoiceRowCtx> = form
        .choices
        .iter()
        .map(|row| ChoiceRowCtx {
            id: row.id.clone(),
            choice_text: row.choice_text.clone(),
            delete: row.delete,
        })
        .collect();

    Template::render(
        "admin/question_form",
        context! {
            form_action: &form_action,
            question_id: question_id,
            question_text: &form.question_text,
            pub_date: &form.pub_date,
            rows: &rows,
            error: &error,
        },
    )
}

/// Outcome of a form submission: either persisted and redirected, or the
/// form re-rendered with a validation error.
#[derive(Responder)]
pub enum SaveOutcome {
    Saved(Redirect),
    Invalid(Template),
}

// Admin login page
#[get("/admin/login")]
pub fn login_page() -> Template {
    Template::render("admin/login", context! { error: Option::<String>::None })
}

// Admin login endpoint
#[post("/admin/login", data = "<login>")]
pub async fn login(
    db: PollsDb,
    state: &State<AppState>,
    cookies: &CookieJar<'_>,
    login: Form<AdminLoginForm>,
) -> Result<Redirect, (Status, Template)> {
    if verify(&login.password, &state.admin_password_hash).unwrap_or(false) {
        let token = Uuid::new_v4().to_string();
        let new_session = NewAdminSession {
            session_token: token.clone(),
        };

        db.run(move |conn| {
            diesel::insert_into(admin_sessions::table)
                .values(&new_session)
                .execute(conn)
        })
        .await
        .map_err(|e| {
            eprintln!("Error creating admin session: {}", e);
            (
                Status::InternalServerError,
                Template::render(
                    "admin/login",
                    context! { error: Some("Something went wrong, try again.") },
                ),
            )
        })?;

        let mut cookie = Cookie::new("admin_auth", token);
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookies.add(cookie);

        Ok(Redirect::to("/admin/questions"))
    } else {
        // Clear any existing invalid cookie
        cookies.remove(Cookie::from("admin_auth"));
        Err((
            Status::Unauthorized,
            Template::render("admin/login", context! { error: Some("Wrong password.") }),
        ))
    }
}

// Admin logout endpoint
#[post("/admin/logout")]
pub async fn logout(db: PollsDb, cookies: &CookieJar<'_>) -> Redirect {
    if let Some(cookie) = cookies.get("admin_auth") {
        let token = cookie.value().to_string();
        db.run(move |conn| diesel::delete(admin_sessions::table.find(token)).execute(conn))
            .await
            .ok();
        cookies.remove(Cookie::from("admin_auth"));
    }
    Redirect::to("/admin/login")
}

// Question list view with search box and date filter
#[get("/admin/questions?<q>&<date>")]
pub async fn question_list(
    db: PollsDb,
    cookies: &CookieJar<'_>,
    q: Option<String>,
    date: Option<String>,
) -> Result<Template, Status> {
    if !is_admin_authenticated(cookies, &db).await {
        return Err(Status::Unauthorized);
    }

    let search = q.clone().unwrap_or_default();
    let date_echo = date.clone().unwrap_or_default();
    let date_filter = date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());
    let term = q.filter(|t| !t.trim().is_empty());

    let question_rows = db
        .run(move |conn| {
            let mut query = questions::table.into_boxed::<Sqlite>();

            if QUESTION_ADMIN.search_fields.contains(&"question_text") {
                if let Some(term) = &term {
                    query = query
                        .filter(questions::question_text.like(format!("%{}%", term.trim())));
                }
            }
            if QUESTION_ADMIN.list_filter.contains(&"pub_date") {
                if let Some(day) = date_filter {
                    query = query.filter(questions::pub_date.eq(day));
                }
            }

            query
                .order(questions::pub_date.desc())
                .load::<Question>(conn)
        })
        .await
        .map_err(|e| {
            eprintln!("Error loading questions: {}", e);
            Status::InternalServerError
        })?;

    let rows: Vec<AdminRow> = question_rows
        .iter()
        .map(|question| AdminRow {
            id: question.id,
            cells: QUESTION_ADMIN
                .list_display
                .iter()
                .map(|field| display_value(question, field))
                .collect(),
        })
        .collect();

    Ok(Template::render(
        "admin/question_list",
        context! {
            columns: QUESTION_ADMIN.list_display,
            rows: &rows,
            search: &search,
            date: &date_echo,
        },
    ))
}

// Blank question form
#[get("/admin/questions/new")]
pub async fn question_new(db: PollsDb, cookies: &CookieJar<'_>) -> Result<Template, Status> {
    if !is_admin_authenticated(cookies, &db).await {
        return Err(Status::Unauthorized);
    }

    let rows: Vec<ChoiceRowCtx> = (0..QUESTION_ADMIN.extra_choice_rows)
        .map(|_| ChoiceRowCtx::blank())
        .collect();

    Ok(Template::render(
        "admin/question_form",
        context! {
            form_action: "/admin/questions",
            question_id: Option::<i32>::None,
            question_text: "",
            pub_date: Utc::now().date_naive().to_string(),
            rows: &rows,
            error: Option::<String>::None,
        },
    ))
}

// Create a question together with its inline choices
#[post("/admin/questions", data = "<form>")]
pub async fn question_create(
    db: PollsDb,
    cookies: &CookieJar<'_>,
    form: Form<QuestionForm>,
) -> Result<SaveOutcome, Status> {
    if !is_admin_authenticated(cookies, &db).await {
        return Err(Status::Unauthorized);
    }

    let form = form.into_inner();

    let pub_date = match NaiveDate::parse_from_str(form.pub_date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return Ok(SaveOutcome::Invalid(form_template(
                None,
                &form,
                Some("Enter a valid date.".to_string()),
            )))
        }
    };

    if let Err(message) = run_validators(&QUESTION_ADMIN, &form) {
        return Ok(SaveOutcome::Invalid(form_template(None, &form, Some(message))));
    }

    let text = form.question_text.trim().to_string();
    let rows = form.choices.clone();

    db.run(move |conn| -> QueryResult<i32> {
        let question_id: i32 = diesel::insert_into(questions::table)
            .values(&NewQuestion {
                question_text: text,
                pub_date,
            })
            .returning(questions::id)
            .get_result(conn)?;

        for row in &rows {
            if row.delete || row.choice_text.trim().is_empty() {
                continue;
            }
            diesel::insert_into(choices::table)
                .values(&NewChoice {
                    question_id,
                    choice_text: row.choice_text.trim().to_string(),
                })
                .execute(conn)?;
        }

        Ok(question_id)
    })
    .await
    .map_err(|e| {
        eprintln!("Error creating question: {}", e);
        Status::InternalServerError
    })?;

    Ok(SaveOutcome::Saved(Redirect::to("/admin/questions")))
}

// Edit form for an existing question
#[get("/admin/questions/<id>")]
pub async fn question_edit(
    db: PollsDb,
    cookies: &CookieJar<'_>,
    id: i32,
) -> Result<Template, Status> {
    if !is_admin_authenticated(cookies, &db).await {
        return Err(Status::Unauthorized);
    }

    let found = db
        .run(move |conn| -> QueryResult<Option<(Question, Vec<Choice>)>> {
            let question = questions::table
                .find(id)
                .first::<Question>(conn)
                .optional()?;

            let question = match question {
                Some(question) => question,
                None => return Ok(None),
            };

            let question_choices = choices::table
                .filter(choices::question_id.eq(id))
                .order(choices::id.asc())
                .load::<Choice>(conn)?;

            Ok(Some((question, question_choices)))
        })
        .await
        .map_err(|e| {
            eprintln!("Error loading question: {}", e);
            Status::InternalServerError
        })?;

    let (question, question_choices) = found.ok_or(Status::NotFound)?;

    let mut rows: Vec<ChoiceRowCtx> = question_choices
        .iter()
        .map(|choice| ChoiceRowCtx {
            id: choice.id.to_string(),
            choice_text: choice.choice_text.clone(),
            delete: false,
        })
        .collect();
    for _ in 0..QUESTION_ADMIN.extra_choice_rows {
        rows.push(ChoiceRowCtx::blank());
    }

    Ok(Template::render(
        "admin/question_form",
        context! {
            form_action: format!("/admin/questions/{}", id),
            question_id: Some(id),
            question_text: &question.question_text,
            pub_date: question.pub_date.to_string(),
            rows: &rows,
            error: Option::<String>::None,
        },
    ))
}

// Apply edits to a question and its inline choices
#[post("/admin/questions/<id>", data = "<form>")]
pub async fn question_save(
    db: PollsDb,
    cookies: &CookieJar<'_>,
    id: i32,
    form: Form<QuestionForm>,
) -> Result<SaveOutcome, Status> {
    if !is_admin_authenticated(cookies, &db).await {
        return Err(Status::Unauthorized);
    }

    let form = form.into_inner();

    let pub_date = match NaiveDate::parse_from_str(form.pub_date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return Ok(SaveOutcome::Invalid(form_template(
                Some(id),
                &form,
                Some("Enter a valid date.".to_string()),
            )))
        }
    };

    if let Err(message) = run_validators(&QUESTION_ADMIN, &form) {
        return Ok(SaveOutcome::Invalid(form_template(
            Some(id),
            &form,
            Some(message),
        )));
    }

    let text = form.question_text.trim().to_string();
    let rows = form.choices.clone();

    let found = db
        .run(move |conn| -> QueryResult<bool> {
            let existing = questions::table
                .find(id)
                .first::<Question>(conn)
                .optional()?;
            if existing.is_none() {
                return Ok(false);
            }

            diesel::update(questions::table.find(id))
                .set((
                    questions::question_text.eq(&text),
                    questions::pub_date.eq(pub_date),
                ))
                .execute(conn)?;

            for row in &rows {
                let choice_id: Option<i32> = row.id.trim().parse().ok();
                match choice_id {
                    Some(cid) if row.delete => {
                        diesel::delete(
                            choices::table
                                .filter(choices::id.eq(cid))
                                .filter(choices::question_id.eq(id)),
                        )
                        .execute(conn)?;
                    }
                    Some(cid) => {
                        if !row.choice_text.trim().is_empty() {
                            diesel::update(
                                choices::table
                                    .filter(choices::id.eq(cid))
                                    .filter(choices::question_id.eq(id)),
                            )
                            .set(choices::choice_text.eq(row.choice_text.trim()))
                            .execute(conn)?;
                        }
                    }
                    None => {
                        if !row.delete && !row.choice_text.trim().is_empty() {
                            diesel::insert_into(choices::table)
                                .values(&NewChoice {
                                    question_id: id,
                                    choice_text: row.choice_text.trim().to_string(),
                                })
                                .execute(conn)?;
                        }
                    }
                }
            }

            Ok(true)
        })
        .await
        .map_err(|e| {
            eprintln!("Error saving question: {}", e);
            Status::InternalServerError
        })?;

    if !found {
        return Err(Status::NotFound);
    }

    Ok(SaveOutcome::Saved(Redirect::to("/admin/questions")))
}

// Delete a question and every choice that belongs to it
#[post("/admin/questions/<id>/delete")]
pub async fn question_delete(
    db: PollsDb,
    cookies: &CookieJar<'_>,
    id: i32,
) -> Result<Redirect, Status> {
    if !is_admin_authenticated(cookies, &db).await {
        return Err(Status::Unauthorized);
    }

    let deleted = db
        .run(move |conn| -> QueryResult<usize> {
            diesel::delete(choices::table.filter(choices::question_id.eq(id))).execute(conn)?;
            diesel::delete(questions::table.find(id)).execute(conn)
        })
        .await
        .map_err(|e| {
            eprintln!("Error deleting question: {}", e);
            Status::InternalServerError
        })?;

    if deleted == 0 {
        return Err(Status::NotFound);
    }

    Ok(Redirect::to("/admin/questions"))
}
