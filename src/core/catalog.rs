use crate::domain::defaults::{default_categories, default_standards};
use crate::domain::model::{EvaluationStandard, PoiCategory};
use crate::domain::ports::{PoiStore, ScoringStore};

/// 標準庫出錯或沒有資料時改用內建標準
pub async fn standards_or_default<S>(store: &S) -> Vec<EvaluationStandard>
where
    S: ScoringStore + ?Sized,
{
    match store.fetch_evaluation_standards().await {
        Ok(standards) if !standards.is_empty() => standards,
        Ok(_) => {
            tracing::info!("Evaluation standard store is empty, using built-in defaults");
            default_standards().to_vec()
        }
        Err(e) => {
            tracing::warn!("⚠️ Evaluation standard store unavailable, using built-in defaults: {}", e);
            default_standards().to_vec()
        }
    }
}

pub async fn categories_or_default<S>(store: &S) -> Vec<PoiCategory>
where
    S: PoiStore + ?Sized,
{
    match store.fetch_categories().await {
        Ok(categories) if !categories.is_empty() => categories,
        Ok(_) => {
            tracing::info!("POI category store is empty, using built-in defaults");
            default_categories().to_vec()
        }
        Err(e) => {
            tracing::warn!("⚠️ POI category store unavailable, using built-in defaults: {}", e);
            default_categories().to_vec()
        }
    }
}
