use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{activity::Activity, location::Location, parse_date, present};
use crate::error::{ApiError, ApiResult};

/// A trip as returned to clients. `_id` is the hex form of the ObjectId.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub begin_date: String,
    pub end_date: String,
    pub owner: String,
    pub participants: Vec<String>,
    pub activities: Vec<Activity>,
    pub current_locations: Vec<Location>,
    pub planned_locations: Vec<Location>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.owner == user_id || self.participants.iter().any(|p| p == user_id)
    }
}

/// Validated input for a trip insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub title: String,
    pub description: String,
    pub begin_date: String,
    pub end_date: String,
    pub owner: String,
    pub participants: Vec<String>,
}

/*
    Body of POST /api/new-trip and POST /api/trips
*/
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub begin_date: Option<String>,
    pub end_date: Option<String>,
    pub owner: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl CreateTripRequest {
    /// Field-by-field checks used by the trip creation form.
    pub fn validate_form(self) -> ApiResult<NewTrip> {
        let missing = |msg: &str| ApiError::Validation(msg.to_string());

        let title = present(self.title).ok_or_else(|| missing("Missing title"))?;
        let description =
            present(self.description).ok_or_else(|| missing("Missing description"))?;
        let (begin_date, end_date) = present(self.begin_date)
            .zip(present(self.end_date))
            .ok_or_else(|| missing("Missing one or more dates"))?;
        let owner = present(self.owner).ok_or_else(|| missing("Missing auth"))?;

        build(title, description, begin_date, end_date, owner, self.participants)
    }

    pub fn validate(self) -> ApiResult<NewTrip> {
        match (
            present(self.title),
            present(self.begin_date),
            present(self.end_date),
            present(self.owner),
        ) {
            (Some(title), Some(begin_date), Some(end_date), Some(owner)) => build(
                title,
                self.description.unwrap_or_default(),
                begin_date,
                end_date,
                owner,
                self.participants,
            ),
            _ => Err(ApiError::Validation("Missing required fields".to_string())),
        }
    }
}

fn build(
    title: String,
    description: String,
    begin_date: String,
    end_date: String,
    owner: String,
    participants: Vec<String>,
) -> ApiResult<NewTrip> {
    match parse_date(&begin_date).zip(parse_date(&end_date)) {
        Some((begin, end)) if begin <= end => {}
        Some(_) => {
            return Err(ApiError::Validation(
                "beginDate must not be after endDate".to_string(),
            ))
        }
        None => return Err(ApiError::Validation("Invalid date format".to_string())),
    }

    let owner = owner.trim().to_string();
    let mut unique: Vec<String> = Vec::with_capacity(participants.len());
    for participant in participants {
        let participant = participant.trim();
        if participant.is_empty() || participant == owner {
            continue;
        }
        if !unique.iter().any(|u| u == participant) {
            unique.push(participant.to_string());
        }
    }

    Ok(NewTrip {
        title: title.trim().to_string(),
        description,
        begin_date,
        end_date,
        owner,
        participants: unique,
    })
}

/*
    GET /api/trips?userId=
*/
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTripsQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedTrip {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CreateTripRequest {
        serde_json::from_value(json!({
            "title": "Portugal",
            "description": "Coast road",
            "beginDate": "2025-06-01",
            "endDate": "2025-06-10",
            "owner": "auth0|alice"
        }))
        .unwrap()
    }

    #[test]
    fn form_validation_reports_first_missing_field() {
        let mut req = request();
        req.title = None;
        assert_eq!(req.validate_form().unwrap_err().to_string(), "Missing title");

        let mut req = request();
        req.description = Some("".to_string());
        assert_eq!(
            req.validate_form().unwrap_err().to_string(),
            "Missing description"
        );

        let mut req = request();
        req.end_date = None;
        assert_eq!(
            req.validate_form().unwrap_err().to_string(),
            "Missing one or more dates"
        );

        let mut req = request();
        req.owner = None;
        assert_eq!(req.validate_form().unwrap_err().to_string(), "Missing auth");
    }

    #[test]
    fn description_is_optional_for_documents() {
        let mut req = request();
        req.description = None;
        let trip = req.validate().unwrap();
        assert_eq!(trip.description, "");
    }

    #[test]
    fn rejects_inverted_or_garbled_dates() {
        let mut req = request();
        req.begin_date = Some("2025-07-01".to_string());
        assert!(req.validate().is_err());

        let mut req = request();
        req.begin_date = Some("first of june".to_string());
        assert_eq!(req.validate().unwrap_err().to_string(), "Invalid date format");
    }

    #[test]
    fn owner_is_not_listed_as_participant() {
        let mut req = request();
        req.participants = vec![
            "auth0|alice".to_string(),
            "auth0|bob".to_string(),
            " ".to_string(),
        ];
        let trip = req.validate().unwrap();
        assert_eq!(trip.participants, vec!["auth0|bob".to_string()]);
    }

    #[test]
    fn owner_and_title_are_trimmed() {
        let mut req = request();
        req.owner = Some(" auth0|alice ".to_string());
        req.title = Some("  Portugal".to_string());
        req.participants = vec!["auth0|alice".to_string()];
        let trip = req.validate().unwrap();
        assert_eq!(trip.owner, "auth0|alice");
        assert_eq!(trip.title, "Portugal");
        assert!(trip.participants.is_empty());
    }
}
