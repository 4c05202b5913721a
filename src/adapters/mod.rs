// 對外部系統的具體實作：空間引擎、外部地圖服務、本機儲存與報表輸出

pub mod amap;
pub mod geo_engine;
pub mod report;
pub mod storage;

pub use amap::AmapClient;
pub use geo_engine::GeoEngineClient;
pub use report::{ReportPaths, ReportWriter};
pub use storage::LocalStorage;
