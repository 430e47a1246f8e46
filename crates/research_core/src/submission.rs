use crate::FormInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingTopic,
    MissingQuestions,
}

/// A validated create-job payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub topic: String,
    pub questions: Vec<String>,
}

impl Submission {
    pub fn from_form(form: &FormInput) -> Result<Self, ValidationError> {
        let topic = form.topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::MissingTopic);
        }
        let questions = parse_questions(&form.questions);
        if questions.is_empty() {
            return Err(ValidationError::MissingQuestions);
        }
        Ok(Self {
            topic: topic.to_owned(),
            questions,
        })
    }
}

/// One question per line; blank lines are dropped.
pub fn parse_questions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
