use serde::{Deserialize, Serialize};

/// 统一的地理位置记录
///
/// 所有字段要么是字符串，要么是 `null`；上游缺失的字段映射为 `null`。
/// 序列化时保留全部键，前端按固定字段名读取。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRecord {
    pub ip: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub continent: Option<String>,
    pub continent_code: Option<String>,
    /// 纬度在前
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// Human readable, e.g. `AS15169 Google LLC`
    pub asn: Option<String>,
    pub asn_code: Option<String>,
    pub timezone: Option<String>,
}
