use super::{DEFAULT_SENTINEL, LookupTarget, VendorSpec};
use crate::services::geoip::payload::Payload;
use crate::services::geoip::{GeoRecord, ProviderKind};

/// ip2location.io
///
/// `as` carries the operator name and `asn` the bare number.
pub static SPEC: VendorSpec = VendorSpec {
    kind: ProviderKind::Ip2Location,
    url_template: "https://api.ip2location.io/{ip}?key={token}",
    sentinel: DEFAULT_SENTINEL,
    required: &[&["latitude"], &["longitude"]],
    normalize,
};

fn normalize(p: &Payload<'_>, target: &LookupTarget<'_>) -> GeoRecord {
    GeoRecord {
        ip: Some(target.ip.to_string()),
        city: p.text(&["city_name"]),
        region: p.text(&["region_name"]),
        country: p.text(&["country_name"]),
        country_code: p.text(&["country_code"]),
        continent: None,
        continent_code: None,
        latitude: p.coordinate(&["latitude"]),
        longitude: p.coordinate(&["longitude"]),
        asn: p.text(&["as"]),
        asn_code: p.text(&["asn"]),
        timezone: p.text(&["time_zone"]),
    }
}
