use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::Result, ids::RecordId, presence::MissingFields};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: RecordId,
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Free-form rover designation(s) assigned to the mission
    pub rovers: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDraft {
    pub country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rovers: Option<String>,
}

impl Mission {
    pub fn from_draft(id: RecordId, draft: MissionDraft) -> Result<Self> {
        let mut missing = MissingFields::default();
        let country = missing.text("country", draft.country);
        let start_date = missing.value("startDate", draft.start_date);
        let end_date = missing.value("endDate", draft.end_date);
        let rovers = missing.text("rovers", draft.rovers);

        let (Some(country), Some(start_date), Some(end_date), Some(rovers)) =
            (country, start_date, end_date, rovers)
        else {
            return Err(missing.into_error());
        };

        Ok(Self {
            id,
            country,
            start_date,
            end_date,
            rovers,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rovers: Option<String>,
}

impl MissionPatch {
    pub fn check_not_blank(&self) -> Result<()> {
        let mut missing = MissingFields::default();
        missing.not_blank("country", self.country.as_ref());
        missing.not_blank("rovers", self.rovers.as_ref());
        missing.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_from_complete_draft() {
        let draft: MissionDraft = serde_json::from_value(json!({
            "country": "France",
            "startDate": "2000-01-01",
            "endDate": "2001-01-01",
            "rovers": "Rover"
        }))
        .unwrap();

        let mission = Mission::from_draft(RecordId::generate(), draft).unwrap();
        assert_eq!(mission.country, "France");
        assert_eq!(mission.end_date, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
    }

    #[test]
    fn stored_shape_uses_camel_case() {
        let mission = Mission {
            id: RecordId::parse("507f1f77bcf86cd799439011").unwrap(),
            country: "USA".into(),
            start_date: NaiveDate::from_ymd_opt(2012, 8, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            rovers: "Curiosity".into(),
        };

        let value = serde_json::to_value(&mission).unwrap();
        assert_eq!(value["id"], "507f1f77bcf86cd799439011");
        assert_eq!(value["startDate"], "2012-08-06");
    }
}
