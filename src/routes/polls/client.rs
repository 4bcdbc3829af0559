use chrono::Utc;
use diesel::prelude::*;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::Redirect;
use rocket_dyn_templates::{context, Template};

use crate::db::PollsDb;
use crate::models::{Choice, Question, VoteForm};
use crate::schema::{choices, questions};

// Route to list the latest published questions
#[get("/")]
pub async fn index(db: PollsDb) -> Result<Template, Status> {
    let today = Utc::now().date_naive();

    let latest_question_list = db
        .run(move |conn| {
            questions::table
                .filter(questions::pub_date.le(today))
                .order(questions::pub_date.desc())
                .load::<Question>(conn)
        })
        .await
        .map_err(|e| {
            eprintln!("Error loading questions: {}", e);
            Status::InternalServerError
        })?;

    Ok(Template::render(
        "polls/index",
        context! { latest_question_list: &latest_question_list },
    ))
}

// Fetch a question together with its choices, None when it does not exist
async fn load_question(
    db: &PollsDb,
    question_id: i32,
) -> Result<Option<(Question, Vec<Choice>)>, Status> {
    db.run(move |conn| -> QueryResult<Option<(Question, Vec<Choice>)>> {
        let question = questions::table
            .find(question_id)
            .first::<Question>(conn)
            .optional()?;

        let question = match question {
            Some(question) => question,
            None => return Ok(None),
        };

        let question_choices = choices::table
            .filter(choices::question_id.eq(question_id))
            .order(choices::id.asc())
            .load::<Choice>(conn)?;

        Ok(Some((question, question_choices)))
    })
    .await
    .map_err(|e| {
        eprintln!("Error loading question: {}", e);
        Status::InternalServerError
    })
}

// Route to show a question with its vote form
#[get("/<question_id>/detail/thebestappintheworld/oliverius/thebestdev")]
pub async fn detail(db: PollsDb, question_id: i32) -> Result<Template, Status> {
    let (question, question_choices) = load_question(&db, question_id)
        .await?
        .ok_or(Status::NotFound)?;

    // Future-dated questions are not publishable yet
    if question.pub_date > Utc::now().date_naive() {
        return Err(Status::NotFound);
    }

    Ok(Template::render(
        "polls/detail",
        context! { question: &question, choices: &question_choices },
    ))
}

// Route to show the vote tally of a question
#[get("/<question_id>/results")]
pub async fn results(db: PollsDb, question_id: i32) -> Result<Template, Status> {
    let (question, question_choices) = load_question(&db, question_id)
        .await?
        .ok_or(Status::NotFound)?;

    if question.pub_date > Utc::now().date_naive() {
        return Err(Status::NotFound);
    }

    Ok(Template::render(
        "polls/results",
        context! { question: &question, choices: &question_choices },
    ))
}

// Route to cast a vote
#[post("/<question_id>/vote", data = "<vote_form>")]
pub async fn vote(
    db: PollsDb,
    question_id: i32,
    vote_form: Form<VoteForm>,
) -> Result<Redirect, Status> {
    let choice_id = vote_form.choice;

    let updated = db
        .run(move |conn| {
            diesel::update(
                choices::table
                    .filter(choices::id.eq(choice_id))
                    .filter(choices::question_id.eq(question_id)),
            )
            .set(choices::votes.eq(choices::votes + 1))
            .execute(conn)
        })
        .await
        .map_err(|e| {
            eprintln!("Error recording vote: {}", e);
            Status::InternalServerError
        })?;

    if updated == 0 {
        return Err(Status::NotFound);
    }

    Ok(Redirect::to(format!("/polls/{}/results", question_id)))
}
