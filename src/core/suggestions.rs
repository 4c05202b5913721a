use crate::domain::model::CategoryScore;

/// 低於此分數的分類會產生建議
pub const SUGGESTION_THRESHOLD: f64 = 60.0;

pub const WELL_SERVED_SUGGESTION: &str = "当前区域生活圈配套较为完善，建议保持现有服务水平";

pub fn category_display_name(code: &str) -> Option<&'static str> {
    match code {
        "medical" => Some("医疗卫生"),
        "education" => Some("教育设施"),
        "commerce" => Some("商业服务"),
        "culture" => Some("文化体育"),
        "public" => Some("公共服务"),
        "transport" => Some("交通设施"),
        "elderly" => Some("养老服务"),
        "child" => Some("托幼托育"),
        _ => None,
    }
}

/// 依輸入順序為每個低分分類產生一句建議；全部達標時只回傳一句總結
pub fn generate_suggestions(scores: &[CategoryScore]) -> Vec<String> {
    let mut suggestions: Vec<String> = scores
        .iter()
        .filter(|cs| cs.score < SUGGESTION_THRESHOLD)
        .map(|cs| {
            let name = category_display_name(&cs.category).unwrap_or(cs.name.as_str());
            format!("【{}】设施覆盖不足（得分{:.1}），建议增设相关配套设施", name, cs.score)
        })
        .collect();

    if suggestions.is_empty() {
        suggestions.push(WELL_SERVED_SUGGESTION.to_string());
    }

    suggestions
}
