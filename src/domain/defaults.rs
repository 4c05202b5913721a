//! 內建的預設評價標準與 POI 分類體系。
//!
//! 標準庫或分類庫不可用（或為空）時使用。只在第一次存取時建立，之後以共享參照傳出。
//!
//! 參考：
//!   - 《城市居住區規劃設計標準》GB 50180-2018
//!   - 《社區生活圈規劃技術指南》TD/T 1062-2021

use crate::domain::model::{EvaluationStandard, PoiCategory, PoiSubType};
use std::sync::OnceLock;

static DEFAULT_STANDARDS: OnceLock<Vec<EvaluationStandard>> = OnceLock::new();
static DEFAULT_CATEGORIES: OnceLock<Vec<PoiCategory>> = OnceLock::new();

pub fn default_standards() -> &'static [EvaluationStandard] {
    DEFAULT_STANDARDS.get_or_init(|| {
        // (category, sub_type, min_15, min_10, min_5, required, base_score)
        const ROWS: &[(&str, &str, u32, u32, u32, bool, f64)] = &[
            ("medical", "clinic", 1, 1, 0, true, 30.0),
            ("medical", "pharmacy", 2, 1, 1, false, 10.0),
            ("medical", "hospital", 1, 0, 0, false, 10.0),
            ("medical", "dentist", 1, 0, 0, false, 5.0),
            ("education", "kindergarten", 1, 1, 0, true, 25.0),
            ("education", "school", 1, 0, 0, true, 25.0),
            ("education", "college", 1, 0, 0, false, 10.0),
            ("education", "library", 1, 0, 0, false, 10.0),
            ("commerce", "supermarket", 1, 1, 0, true, 20.0),
            ("commerce", "convenience", 3, 2, 1, false, 10.0),
            ("commerce", "marketplace", 1, 0, 0, false, 10.0),
            ("commerce", "restaurant", 2, 1, 0, false, 5.0),
            ("culture", "park", 1, 0, 0, true, 20.0),
            ("culture", "playground", 1, 0, 0, false, 10.0),
            ("culture", "sports_centre", 1, 0, 0, false, 10.0),
            ("culture", "community_centre", 1, 0, 0, false, 10.0),
            ("culture", "cinema", 1, 0, 0, false, 5.0),
            ("public", "police", 1, 0, 0, false, 15.0),
            ("public", "post_office", 1, 0, 0, false, 15.0),
            ("public", "townhall", 1, 0, 0, false, 20.0),
            ("transport", "platform", 2, 1, 1, true, 15.0),
            ("transport", "stop_position", 2, 1, 1, false, 10.0),
            ("transport", "station", 1, 0, 0, false, 20.0),
            ("transport", "bus_station", 1, 0, 0, false, 10.0),
            ("elderly", "social_facility", 1, 0, 0, false, 25.0),
            // 本地資料庫沒有托育資料，靠外部地圖服務補充
            ("child", "nursery", 1, 0, 0, false, 25.0),
        ];

        ROWS.iter()
            .map(
                |&(category, sub_type, min_15, min_10, min_5, required, base_score)| {
                    EvaluationStandard {
                        category: category.to_string(),
                        sub_type: sub_type.to_string(),
                        min_count_5: min_5,
                        min_count_10: min_10,
                        min_count_15: min_15,
                        required,
                        base_score,
                    }
                },
            )
            .collect()
    })
}

fn sub_types(rows: &[(&str, &str, &str)]) -> Vec<PoiSubType> {
    rows.iter()
        .map(|&(code, name, osm_tag)| PoiSubType {
            code: code.to_string(),
            name: name.to_string(),
            osm_tag: osm_tag.to_string(),
        })
        .collect()
}

fn category(code: &str, name: &str, description: &str, weight: f64, subs: &[(&str, &str, &str)]) -> PoiCategory {
    PoiCategory {
        code: code.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        weight,
        sub_types: sub_types(subs),
    }
}

pub fn default_categories() -> &'static [PoiCategory] {
    DEFAULT_CATEGORIES.get_or_init(|| {
        vec![
            category(
                "medical",
                "医疗卫生",
                "社区卫生服务中心/站、诊所、药店等基层医疗设施",
                0.18,
                &[
                    ("community_health", "社区卫生服务中心/站", "amenity=clinic"),
                    ("hospital", "医院", "amenity=hospital"),
                    ("pharmacy", "药店", "amenity=pharmacy"),
                ],
            ),
            category(
                "education",
                "教育设施",
                "幼儿园、小学、中学等基础教育设施",
                0.18,
                &[
                    ("kindergarten", "幼儿园", "amenity=kindergarten"),
                    ("primary", "小学", "amenity=school"),
                    ("secondary", "初中", "amenity=school"),
                ],
            ),
            category(
                "elderly",
                "养老服务",
                "社区养老服务中心、日间照料中心、老年活动室",
                0.12,
                &[
                    ("elderly_center", "社区养老服务中心", "amenity=social_facility"),
                    ("daycare", "日间照料中心", "amenity=social_facility"),
                    ("elderly_activity", "老年活动室", "amenity=community_centre"),
                ],
            ),
            category(
                "commerce",
                "商业服务",
                "菜市场/生鲜超市、综合超市、便利店、餐饮等",
                0.15,
                &[
                    ("market", "菜市场/生鲜超市", "amenity=marketplace"),
                    ("supermarket", "综合超市", "shop=supermarket"),
                    ("convenience", "便利店", "shop=convenience"),
                    ("restaurant", "餐饮服务", "amenity=restaurant"),
                ],
            ),
            category(
                "culture",
                "文化体育",
                "社区文化活动中心、健身场地、公园绿地、阅览室",
                0.12,
                &[
                    ("culture_center", "文化活动中心", "amenity=community_centre"),
                    ("sports_field", "健身场地/球场", "leisure=pitch"),
                    ("park", "公园绿地", "leisure=park"),
                    ("library", "图书室/阅览室", "amenity=library"),
                ],
            ),
            category(
                "public",
                "公共管理",
                "社区服务中心、派出所、银行网点、邮政服务",
                0.10,
                &[
                    ("community_service", "社区服务中心", "amenity=townhall"),
                    ("police", "派出所/警务室", "amenity=police"),
                    ("bank", "银行网点", "amenity=bank"),
                    ("post", "邮政服务", "amenity=post_office"),
                ],
            ),
            category(
                "transport",
                "交通设施",
                "公交站点、轨道交通站点、公共停车场",
                0.10,
                &[
                    ("bus_stop", "公交站点", "highway=bus_stop"),
                    ("metro", "轨道交通站", "railway=station"),
                    ("parking", "公共停车场", "amenity=parking"),
                    ("bike_parking", "非机动车停车", "amenity=bicycle_parking"),
                ],
            ),
            category(
                "child",
                "托幼托育",
                "托儿所、托育机构、儿童游乐设施",
                0.05,
                &[
                    ("nursery", "托儿所/托育机构", "amenity=childcare"),
                    ("playground", "儿童游乐设施", "leisure=playground"),
                ],
            ),
        ]
    })
}
