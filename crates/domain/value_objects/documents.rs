use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::documents::{DocumentAuditEntity, DocumentEntity, SurveyEntity},
    value_objects::{
        enums::document_types::DocumentType,
        validation::{ValidationError, required},
    },
};

pub const AUDIT_ACTION_UPDATE: &str = "update";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: String,
    pub document_content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentEntity> for DocumentModel {
    fn from(entity: DocumentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            document_type: entity.document_type,
            document_content: entity.document_content,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentAuditModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub old_content: Option<serde_json::Value>,
    pub new_content: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentAuditEntity> for DocumentAuditModel {
    fn from(entity: DocumentAuditEntity) -> Self {
        Self {
            id: entity.id,
            document_id: entity.document_id,
            user_id: entity.user_id,
            action: entity.action,
            old_content: entity.old_content,
            new_content: entity.new_content,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SurveyModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Uuid,
    pub survey_type: String,
    pub document_content: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<(SurveyEntity, DocumentEntity)> for SurveyModel {
    fn from((survey, document): (SurveyEntity, DocumentEntity)) -> Self {
        Self {
            id: survey.id,
            user_id: survey.user_id,
            document_id: survey.document_id,
            survey_type: document.document_type,
            document_content: document.document_content,
            created_at: survey.created_at,
        }
    }
}

/// Body of journal create and any document update.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentContentModel {
    pub document_content: Option<serde_json::Value>,
}

impl DocumentContentModel {
    pub fn validate(self) -> Result<serde_json::Value, ValidationError> {
        let content = required(self.document_content, "document_content")?;
        ensure_content(content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSurveyModel {
    pub survey_type: Option<String>,
    pub document_content: Option<serde_json::Value>,
}

impl CreateSurveyModel {
    /// Survey type defaults to `survey`; journals are not accepted here.
    pub fn validate(self) -> Result<(DocumentType, serde_json::Value), ValidationError> {
        let survey_type = match self.survey_type.as_deref() {
            None => DocumentType::Survey,
            Some(raw) => DocumentType::from_str(raw)
                .filter(DocumentType::is_survey)
                .ok_or_else(|| {
                    ValidationError::Invalid(
                        "survey_type must be survey or weekly_survey".to_string(),
                    )
                })?,
        };
        let content = ensure_content(required(self.document_content, "document_content")?)?;

        Ok((survey_type, content))
    }
}

fn ensure_content(content: serde_json::Value) -> Result<serde_json::Value, ValidationError> {
    match &content {
        serde_json::Value::Null => Err(ValidationError::Missing("document_content")),
        serde_json::Value::Object(map) if map.is_empty() => Err(ValidationError::Invalid(
            "document_content must not be empty".to_string(),
        )),
        _ => Ok(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn journal_type_is_not_a_survey() {
        let model = CreateSurveyModel {
            survey_type: Some("journal".to_string()),
            document_content: Some(json!({"mood": 3})),
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn weekly_survey_is_accepted() {
        let model = CreateSurveyModel {
            survey_type: Some("weekly_survey".to_string()),
            document_content: Some(json!({"sleep": 7})),
        };
        let (survey_type, _) = model.validate().unwrap();
        assert_eq!(survey_type, DocumentType::WeeklySurvey);
    }

    #[test]
    fn empty_object_content_is_rejected() {
        let model = DocumentContentModel {
            document_content: Some(json!({})),
        };
        assert!(model.validate().is_err());
    }
}
