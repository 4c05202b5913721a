use crate::domain::model::{CategoryAggregate, CategoryScore, EvaluationStandard, Grade, SubTypeScore};
use std::collections::HashMap;

/// 評分組裝結果
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSheet {
    pub total_score: f64,
    pub grade: Grade,
    pub category_scores: Vec<CategoryScore>,
}

impl ScoreSheet {
    pub fn summary(&self) -> &'static str {
        self.grade.description()
    }
}

/// 明細可能是 JSON 陣列或字串化的 JSON；格式不對時視為沒有明細
pub fn parse_details(raw: Option<&serde_json::Value>) -> Vec<SubTypeScore> {
    let parsed = match raw {
        None | Some(serde_json::Value::Null) => return Vec::new(),
        Some(serde_json::Value::String(text)) => serde_json::from_str::<Vec<SubTypeScore>>(text),
        Some(value) => serde_json::from_value::<Vec<SubTypeScore>>(value.clone()),
    };

    parsed.unwrap_or_else(|e| {
        tracing::warn!("⚠️ Ignoring malformed sub-type details: {}", e);
        Vec::new()
    })
}

/// 分類內每個必備子類型的 15 分鐘數量都達標才算滿足；沒有必備項目時視為滿足
pub fn meets_required(category: &str, details: &[SubTypeScore], standards: &[EvaluationStandard]) -> bool {
    let counts: HashMap<&str, u32> = details.iter().map(|d| (d.sub_type.as_str(), d.count)).collect();

    standards
        .iter()
        .filter(|s| s.required && s.category == category)
        .all(|s| counts.get(s.sub_type.as_str()).copied().unwrap_or(0) >= s.min_count_15)
}

/// 總分與加權分由空間引擎計算，這裡只負責組裝。
///
/// 每列都帶同一個總分與等級，以最後一列為準；等級碼去除空白後無法辨識時，改由總分推算。
pub fn assemble_scores(rows: Vec<CategoryAggregate>, standards: &[EvaluationStandard]) -> ScoreSheet {
    let mut total_score = 0.0;
    let mut grade_code = String::new();
    let mut category_scores = Vec::with_capacity(rows.len());

    for row in rows {
        total_score = row.total_score;
        grade_code = row.grade.trim().to_string();

        let details = parse_details(row.details.as_ref());
        let has_required = meets_required(&row.category, &details, standards);

        category_scores.push(CategoryScore {
            category: row.category,
            name: row.category_name,
            score: row.category_score,
            weight: row.weight,
            weighted_score: row.weighted_score,
            poi_count: row.poi_count,
            has_required,
            details,
        });
    }

    let grade = grade_code.parse::<Grade>().unwrap_or_else(|_| {
        if !grade_code.is_empty() {
            tracing::warn!("⚠️ Unknown grade code '{}', deriving from total score", grade_code);
        }
        Grade::from_score(total_score)
    });

    ScoreSheet {
        total_score,
        grade,
        category_scores,
    }
}
