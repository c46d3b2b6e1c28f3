//! Shows and their episodes.
//!
//! Field names follow the persistence API (camelCase on the wire).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Artwork variants for a show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub medium: Option<String>,
    pub original: Option<String>,
}

/// A TV show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    /// Persistence id. Empty when the show has not been stored.
    #[serde(default)]
    pub id: String,
    /// Id in the upstream TV listings catalogue.
    #[serde(default)]
    pub external_id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub image: Option<Image>,
}

impl Show {
    /// Medium-resolution artwork, if any.
    pub fn medium_image(&self) -> Option<&str> {
        self.image.as_ref().and_then(|i| i.medium.as_deref())
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// A single airing of a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub number: Option<i32>,
    #[serde(default)]
    pub airstamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub show: Option<Show>,
}

impl Episode {
    /// Short label such as `S02E05`; `Special` for unnumbered episodes.
    pub fn number_label(&self) -> String {
        match (self.season, self.number) {
            (Some(season), Some(number)) => format!("S{season:02}E{number:02}"),
            (None, Some(number)) => format!("E{number:02}"),
            (_, None) => "Special".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: Option<i32>, number: Option<i32>) -> Episode {
        Episode {
            id: "ep1".into(),
            name: "Pilot".into(),
            season,
            number,
            airstamp: None,
            show: None,
        }
    }

    #[test]
    fn number_label_pads_season_and_number() {
        assert_eq!(episode(Some(2), Some(5)).number_label(), "S02E05");
        assert_eq!(episode(Some(12), Some(110)).number_label(), "S12E110");
    }

    #[test]
    fn number_label_without_season() {
        assert_eq!(episode(None, Some(3)).number_label(), "E03");
    }

    #[test]
    fn number_label_special() {
        assert_eq!(episode(Some(1), None).number_label(), "Special");
    }

    #[test]
    fn deserializes_persistence_shape() {
        let json = serde_json::json!({
            "id": "ep1",
            "name": "Pilot",
            "season": 1,
            "number": 1,
            "airstamp": "2008-01-20T22:00:00Z",
            "show": {
                "id": "s1",
                "externalId": 169,
                "name": "Breaking Bad",
                "image": { "medium": "https://img/medium.jpg", "original": null }
            }
        });
        let ep: Episode = serde_json::from_value(json).unwrap();
        let show = ep.show.expect("show");
        assert_eq!(show.external_id, Some(169));
        assert_eq!(show.medium_image(), Some("https://img/medium.jpg"));
        assert_eq!(ep.airstamp.unwrap().to_rfc3339(), "2008-01-20T22:00:00+00:00");
    }

    #[test]
    fn show_without_id() {
        let show: Show = serde_json::from_value(serde_json::json!({ "name": "Unsaved" })).unwrap();
        assert!(!show.has_id());
        assert!(show.medium_image().is_none());
    }
}
