//! Back-office configuration.
//!
//! Each managed entity gets one explicit [`ModelAdmin`] value enumerating the
//! columns its list view shows, the fields it can be searched and filtered
//! by, and the validation rules a save must pass. The admin route handlers
//! consume these values; nothing is discovered at runtime.

use serde::Serialize;

use crate::models::{Question, QuestionForm};

pub type Validator<F> = fn(&F) -> Result<(), String>;

pub struct ModelAdmin<F: 'static> {
    /// Field names rendered as list-view columns, in order.
    pub list_display: &'static [&'static str],
    /// Field names the list view can be narrowed by.
    pub list_filter: &'static [&'static str],
    /// Field names the search box matches against.
    pub search_fields: &'static [&'static str],
    /// Blank inline choice rows appended to the form.
    pub extra_choice_rows: usize,
    /// Rules applied, in order, before any save is accepted.
    pub validators: &'static [Validator<F>],
}

pub static QUESTION_ADMIN: ModelAdmin<QuestionForm> = ModelAdmin {
    list_display: &["question_text", "pub_date", "was_published_recently"],
    list_filter: &["pub_date"],
    search_fields: &["question_text"],
    extra_choice_rows: 3,
    validators: &[at_least_one_choice],
};

/// A question must keep at least one choice once deletions are applied.
/// Rows marked for deletion and rows with blank text do not count.
pub fn at_least_one_choice(form: &QuestionForm) -> Result<(), String> {
    let survives = form
        .choices
        .iter()
        .any(|row| !row.delete && !row.choice_text.trim().is_empty());

    if survives {
        Ok(())
    } else {
        Err("At least one choice required.".to_string())
    }
}

pub fn run_validators<F>(admin: &ModelAdmin<F>, form: &F) -> Result<(), String> {
    for validator in admin.validators {
        validator(form)?;
    }
    Ok(())
}

/// Render one list-view cell for a question.
pub fn display_value(question: &Question, field: &str) -> String {
    match field {
        "question_text" => question.question_text.clone(),
        "pub_date" => question.pub_date.to_string(),
        "was_published_recently" => if question.was_published_recently() {
            "yes"
        } else {
            "no"
        }
        .to_string(),
        _ => String::new(),
    }
}

/// One row of the list view: the record id plus its rendered cells.
#[derive(Serialize)]
pub struct AdminRow {
    pub id: i32,
    pub cells: Vec<String>,
}
