use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::Result, ids::RecordId, presence::MissingFields};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rover {
    pub id: RecordId,
    pub name: String,
    pub launch_date: NaiveDate,
    pub construction_date: NaiveDate,
    pub rover_constructor: String,
    /// Image URL
    pub image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoverDraft {
    pub name: Option<String>,
    pub launch_date: Option<NaiveDate>,
    pub construction_date: Option<NaiveDate>,
    pub rover_constructor: Option<String>,
    pub image: Option<String>,
}

impl Rover {
    pub fn from_draft(id: RecordId, draft: RoverDraft) -> Result<Self> {
        let mut missing = MissingFields::default();
        let name = missing.text("name", draft.name);
        let launch_date = missing.value("launchDate", draft.launch_date);
        let construction_date =
            missing.value("constructionDate", draft.construction_date);
        let rover_constructor =
            missing.text("roverConstructor", draft.rover_constructor);
        let image = missing.text("image", draft.image);

        let (
            Some(name),
            Some(launch_date),
            Some(construction_date),
            Some(rover_constructor),
            Some(image),
        ) = (name, launch_date, construction_date, rover_constructor, image)
        else {
            return Err(missing.into_error());
        };

        Ok(Self {
            id,
            name,
            launch_date,
            construction_date,
            rover_constructor,
            image,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoverPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construction_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rover_constructor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl RoverPatch {
    pub fn check_not_blank(&self) -> Result<()> {
        let mut missing = MissingFields::default();
        missing.not_blank("name", self.name.as_ref());
        missing.not_blank("roverConstructor", self.rover_constructor.as_ref());
        missing.not_blank("image", self.image.as_ref());
        missing.finish()
    }
}
