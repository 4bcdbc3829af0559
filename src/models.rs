use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use rocket::FromForm;
use serde::{Deserialize, Serialize};

use crate::schema::{admin_sessions, choices, questions};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = questions)]
pub struct Question {
    pub id: i32,
    pub question_text: String,
    pub pub_date: NaiveDate,
}

impl Question {
    /// True when the publication date falls within the trailing one-day
    /// window ending today (inclusive on both ends).
    pub fn was_published_recently(&self) -> bool {
        let today = Utc::now().date_naive();
        self.pub_date <= today && self.pub_date >= today - Duration::days(1)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questions)]
pub struct NewQuestion {
    pub question_text: String,
    pub pub_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = choices)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub choice_text: String,
    pub votes: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = choices)]
pub struct NewChoice {
    pub question_id: i32,
    pub choice_text: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = admin_sessions)]
pub struct AdminSession {
    pub session_token: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admin_sessions)]
pub struct NewAdminSession {
    pub session_token: String,
}

#[derive(Debug, FromForm)]
pub struct AdminLoginForm {
    pub password: String,
}

#[derive(Debug, FromForm)]
pub struct VoteForm {
    pub choice: i32,
}

/// One inline row of the question form. `id` is empty for rows that do not
/// exist in the database yet.
#[derive(Debug, Clone, FromForm)]
pub struct ChoiceRowForm {
    pub id: String,
    pub choice_text: String,
    pub delete: bool,
}

#[derive(Debug, Clone, FromForm)]
pub struct QuestionForm {
    pub question_text: String,
    pub pub_date: String,
    pub choices: Vec<ChoiceRowForm>,
}
