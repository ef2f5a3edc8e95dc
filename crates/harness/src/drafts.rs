use dermlog_core::{ImageData, ScanRecord, SelfExamFlag};

/// A minimal valid draft: body part, risk and timestamp set, every flag off.
pub fn draft(body_part_name: &str, risk: &str, timestamp: i64) -> ScanRecord {
    ScanRecord {
        body_part_name: body_part_name.to_string(),
        risk: risk.to_string(),
        timestamp,
        ..Default::default()
    }
}

/// A draft with every field populated, including a small photo.
pub fn full_draft(timestamp: i64) -> ScanRecord {
    ScanRecord {
        id: None,
        image_data: Some(ImageData::from_bytes(&[0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x43])),
        body_part_name: "Left shoulder".into(),
        body_part_type: "Upper body".into(),
        risk: "Medium".into(),
        has_asymmetry: true,
        has_irregular_borders: true,
        has_varied_colors: false,
        diameter_over_6mm: true,
        selected_skin_color: "Type II".into(),
        analyzed: "Needs review".into(),
        timestamp,
        is_selected: false,
        self_exam_flag: SelfExamFlag::Raw("1".into()),
    }
}
