use serde::{Deserialize, Serialize};

/// A stored question with all of its options, correctness included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub stem: String,
    pub explanation: Option<String>,
    pub tags: Option<Vec<String>>,
    pub options: Vec<Choice>,
}

impl Question {
    /// The option flagged as correct, if any.
    pub fn correct_choice(&self) -> Option<&Choice> {
        self.options.iter().find(|c| c.is_correct)
    }

    /// Strip correctness before the question leaves the server.
    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.id,
            stem: self.stem.clone(),
            explanation: self.explanation.clone(),
            tags: self.tags.clone(),
            options: self.options.iter().map(Choice::to_public).collect(),
        }
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
    pub question_id: i64,
}

impl Choice {
    pub fn to_public(&self) -> PublicChoice {
        PublicChoice {
            id: self.id,
            text: self.text.clone(),
        }
    }
}

/// Question as served to clients: options carry no correctness flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub stem: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub options: Vec<PublicChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicChoice {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSummary {
    pub id: i64,
    pub stem: String,
}

/// A question row from a seed file, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub stem: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub options: Vec<NewChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChoice {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl NewQuestion {
    /// A servable question has a stem, at least one option and exactly one
    /// option flagged correct.
    pub fn validate(&self) -> Result<(), String> {
        if self.stem.trim().is_empty() {
            return Err("question stem must not be empty".to_string());
        }
        if self.options.is_empty() {
            return Err(format!("question {:?} has no options", self.stem));
        }

        let correct = self.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(format!(
                "question {:?} must have exactly one correct option, found {}",
                self.stem, correct
            ));
        }

        Ok(())
    }
}
