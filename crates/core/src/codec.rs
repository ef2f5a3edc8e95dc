//! Mapping between [`ScanRecord`] and the integer/text row the store persists.
//!
//! Booleans are written as `0`/`1`. On read only an exact `1` counts as true,
//! so any other stored integer quietly becomes `false`. The self-exam flag is
//! written as text and read back as whatever text was stored.

use crate::ids::RecordId;
use crate::image::ImageData;
use crate::record::ScanRecord;
use crate::self_exam::SelfExamFlag;

pub const FLAG_TRUE: i64 = 1;
pub const FLAG_FALSE: i64 = 0;

/// Storage-facing shape of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRow {
    pub id: Option<RecordId>,
    pub image_data: Option<String>,
    pub body_part_name: String,
    pub body_part_type: String,
    pub risk: String,
    pub has_asymmetry: i64,
    pub has_irregular_borders: i64,
    pub has_varied_colors: i64,
    pub diameter_over_6mm: i64,
    pub selected_skin_color: String,
    pub analyzed: String,
    pub timestamp: i64,
    pub is_selected: i64,
    pub self_exam_flag: String,
}

impl PersistedRow {
    /// Column names whose stored flag value is neither `0` nor `1`.
    pub fn flag_anomalies(&self) -> Vec<&'static str> {
        [
            ("assymetry", self.has_asymmetry),
            ("irregularBorders", self.has_irregular_borders),
            ("variedColors", self.has_varied_colors),
            ("diameterLargerThanSix", self.diameter_over_6mm),
            ("isSelected", self.is_selected),
        ]
        .into_iter()
        .filter(|(_, value)| *value != FLAG_TRUE && *value != FLAG_FALSE)
        .map(|(column, _)| column)
        .collect()
    }
}

pub fn encode_flag(value: bool) -> i64 {
    if value { FLAG_TRUE } else { FLAG_FALSE }
}

pub fn decode_flag(value: i64) -> bool {
    value == FLAG_TRUE
}

pub fn encode_self_exam(flag: &SelfExamFlag) -> String {
    match flag {
        SelfExamFlag::Bool(true) => "1".to_string(),
        SelfExamFlag::Bool(false) => "0".to_string(),
        SelfExamFlag::Raw(s) => s.clone(),
    }
}

pub fn encode(record: &ScanRecord) -> PersistedRow {
    PersistedRow {
        id: record.id,
        image_data: record.image_data.as_ref().map(|img| img.as_str().to_string()),
        body_part_name: record.body_part_name.clone(),
        body_part_type: record.body_part_type.clone(),
        risk: record.risk.clone(),
        has_asymmetry: encode_flag(record.has_asymmetry),
        has_irregular_borders: encode_flag(record.has_irregular_borders),
        has_varied_colors: encode_flag(record.has_varied_colors),
        diameter_over_6mm: encode_flag(record.diameter_over_6mm),
        selected_skin_color: record.selected_skin_color.clone(),
        analyzed: record.analyzed.clone(),
        timestamp: record.timestamp,
        is_selected: encode_flag(record.is_selected),
        self_exam_flag: encode_self_exam(&record.self_exam_flag),
    }
}

pub fn decode(row: PersistedRow) -> ScanRecord {
    ScanRecord {
        id: row.id,
        image_data: row
            .image_data
            .filter(|text| !text.is_empty())
            .map(ImageData::from_stored),
        body_part_name: row.body_part_name,
        body_part_type: row.body_part_type,
        risk: row.risk,
        has_asymmetry: decode_flag(row.has_asymmetry),
        has_irregular_borders: decode_flag(row.has_irregular_borders),
        has_varied_colors: decode_flag(row.has_varied_colors),
        diameter_over_6mm: decode_flag(row.diameter_over_6mm),
        selected_skin_color: row.selected_skin_color,
        analyzed: row.analyzed,
        timestamp: row.timestamp,
        is_selected: decode_flag(row.is_selected),
        self_exam_flag: SelfExamFlag::Raw(row.self_exam_flag),
    }
}
