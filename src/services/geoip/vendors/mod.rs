//! 上游 provider 字段映射表
//!
//! 每个 vendor 只描述差异部分：URL 模板、拒绝标记、必需字段和字段映射函数。
//! 请求、解析和错误包装由 `RemoteProvider` 统一完成。

mod ip2location;
mod ipdata;
mod ipgeo;
mod ipinfo;

use super::payload::Payload;
use super::provider::ProviderKind;
use super::record::GeoRecord;
use crate::services::edge::EdgeMetadata;

/// Substring every vendor puts in its rejection bodies ("invalid key", "not a valid IP").
pub const DEFAULT_SENTINEL: &str = "valid";

/// What a mapping function knows about the lookup besides the payload.
pub struct LookupTarget<'a> {
    pub ip: &'a str,
    /// The target is the caller's own address, so edge metadata describes it too.
    pub own_address: bool,
    pub edge: &'a EdgeMetadata,
}

pub struct VendorSpec {
    pub kind: ProviderKind,
    /// `{ip}` and `{token}` are substituted, percent-encoded.
    pub url_template: &'static str,
    pub sentinel: &'static str,
    /// Paths that must be present; otherwise the payload is rejected.
    pub required: &'static [&'static [&'static str]],
    pub normalize: fn(&Payload<'_>, &LookupTarget<'_>) -> GeoRecord,
}

pub static VENDORS: [&VendorSpec; 4] = [
    &ipinfo::SPEC,
    &ipdata::SPEC,
    &ipgeo::SPEC,
    &ip2location::SPEC,
];

pub fn vendor_spec(kind: ProviderKind) -> Option<&'static VendorSpec> {
    VENDORS.iter().copied().find(|spec| spec.kind == kind)
}

/// Continent display name: vendor-supplied name wins, else the code table.
fn continent_display(payload: &Payload<'_>, name: &[&str], code: &[&str]) -> Option<String> {
    payload.text(name).or_else(|| {
        payload
            .text(code)
            .map(|c| crate::services::regions::continent_name(&c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_remote_kind_has_a_spec() {
        for kind in ProviderKind::ALL {
            assert_eq!(vendor_spec(kind).is_some(), kind.is_remote(), "{}", kind);
        }
    }

    #[test]
    fn test_templates_carry_placeholders() {
        for spec in VENDORS {
            assert!(spec.url_template.contains("{ip}"), "{}", spec.kind);
            assert!(spec.url_template.contains("{token}"), "{}", spec.kind);
            assert!(spec.url_template.starts_with("https://"), "{}", spec.kind);
        }
    }
}
