use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::ids::RecordId;
use crate::image::ImageData;
use crate::self_exam::SelfExamFlag;

/// One self-examination entry as presentation code sees it.
///
/// `id` is `None` until the store assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(
        default,
        deserialize_with = "empty_image_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_data: Option<ImageData>,
    pub body_part_name: String,
    pub body_part_type: String,
    pub risk: String,
    pub has_asymmetry: bool,
    pub has_irregular_borders: bool,
    pub has_varied_colors: bool,
    pub diameter_over_6mm: bool,
    pub selected_skin_color: String,
    pub analyzed: String,
    /// Epoch milliseconds. The store never bumps this on update.
    pub timestamp: i64,
    pub is_selected: bool,
    #[serde(default)]
    pub self_exam_flag: SelfExamFlag,
}

/// The entry form sends `""` when no photo was picked.
fn empty_image_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ImageData>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.is_empty() => Ok(None),
        Some(text) => ImageData::from_base64(text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl ScanRecord {
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Number of ABCDE criteria flagged on this entry.
    pub fn abcde_count(&self) -> usize {
        [
            self.has_asymmetry,
            self.has_irregular_borders,
            self.has_varied_colors,
            self.diameter_over_6mm,
        ]
        .iter()
        .filter(|flag| **flag)
        .count()
    }

    /// Entry form check: a body part and a risk label are required before
    /// saving. Only empty text is refused. The store does not enforce this.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.body_part_name.is_empty() {
            return Err(CoreError::MissingField("bodyPartName"));
        }
        if self.risk.is_empty() {
            return Err(CoreError::MissingField("risk"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forearm() -> ScanRecord {
        ScanRecord {
            body_part_name: "Forearm".into(),
            risk: "Low".into(),
            has_asymmetry: true,
            timestamp: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn validate_requires_body_part_and_risk() {
        assert!(forearm().validate().is_ok());

        let no_name = ScanRecord {
            body_part_name: String::new(),
            ..forearm()
        };
        assert!(matches!(
            no_name.validate(),
            Err(CoreError::MissingField("bodyPartName"))
        ));

        let no_risk = ScanRecord {
            risk: String::new(),
            ..forearm()
        };
        assert!(matches!(
            no_risk.validate(),
            Err(CoreError::MissingField("risk"))
        ));

        // Only empty text counts as missing, as on the entry form.
        let spaces = ScanRecord {
            body_part_name: "  ".into(),
            ..forearm()
        };
        assert!(spaces.validate().is_ok());
    }

    fn form_json(image: &str) -> String {
        format!(
            r#"{{
                "imageData": {image},
                "bodyPartName": "Forearm",
                "bodyPartType": "Arm",
                "risk": "Low",
                "hasAsymmetry": true,
                "hasIrregularBorders": false,
                "hasVariedColors": false,
                "diameterOver6mm": false,
                "selectedSkinColor": "",
                "analyzed": "",
                "timestamp": 1000,
                "isSelected": false,
                "selfExamFlag": "1"
            }}"#
        )
    }

    #[test]
    fn empty_image_text_means_no_image() {
        let record: ScanRecord = serde_json::from_str(&form_json(r#""""#)).unwrap();
        assert_eq!(record.image_data, None);
        assert_eq!(record.body_part_name, "Forearm");
        assert!(record.has_asymmetry);

        let record: ScanRecord = serde_json::from_str(&form_json("null")).unwrap();
        assert_eq!(record.image_data, None);
    }

    #[test]
    fn non_empty_image_text_is_still_validated() {
        let record: ScanRecord = serde_json::from_str(&form_json(r#""aGVsbG8=""#)).unwrap();
        assert_eq!(record.image_data.unwrap().to_bytes().unwrap(), b"hello");

        assert!(serde_json::from_str::<ScanRecord>(&form_json(r#""%%%""#)).is_err());
        assert!(ImageData::from_base64("").is_err());
    }

    #[test]
    fn abcde_count_tallies_flags() {
        let mut record = forearm();
        assert_eq!(record.abcde_count(), 1);
        record.has_varied_colors = true;
        record.diameter_over_6mm = true;
        assert_eq!(record.abcde_count(), 3);
    }

    #[test]
    fn json_shape_uses_camel_case() {
        let json = serde_json::to_value(forearm()).unwrap();
        assert_eq!(json["bodyPartName"], "Forearm");
        assert_eq!(json["hasAsymmetry"], true);
        assert_eq!(json["selfExamFlag"], "1");
        assert!(json.get("id").is_none());
        assert!(json.get("imageData").is_none());

        let back: ScanRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, forearm());
        assert!(back.is_draft());
    }
}
