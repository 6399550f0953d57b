use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Journal,
    Survey,
    WeeklySurvey,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Journal => "journal",
            DocumentType::Survey => "survey",
            DocumentType::WeeklySurvey => "weekly_survey",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "journal" => Some(DocumentType::Journal),
            "survey" => Some(DocumentType::Survey),
            "weekly_survey" => Some(DocumentType::WeeklySurvey),
            _ => None,
        }
    }

    pub fn is_survey(&self) -> bool {
        matches!(self, DocumentType::Survey | DocumentType::WeeklySurvey)
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
