use super::{DEFAULT_SENTINEL, LookupTarget, VendorSpec, continent_display};
use crate::services::geoip::payload::{Payload, join_asn};
use crate::services::geoip::{GeoRecord, ProviderKind};

/// ipdata.co
///
/// Coordinates arrive as floats; `asn` and `time_zone` are nested objects.
pub static SPEC: VendorSpec = VendorSpec {
    kind: ProviderKind::IpData,
    url_template: "https://api.ipdata.co/{ip}?api-key={token}",
    sentinel: DEFAULT_SENTINEL,
    required: &[&["latitude"], &["longitude"]],
    normalize,
};

fn normalize(p: &Payload<'_>, target: &LookupTarget<'_>) -> GeoRecord {
    let asn_code = p.text(&["asn", "asn"]);
    let asn_name = p.text(&["asn", "name"]);

    GeoRecord {
        ip: Some(target.ip.to_string()),
        city: p.text(&["city"]),
        region: p.text(&["region"]),
        country: p.text(&["country_name"]),
        country_code: p.text(&["country_code"]),
        continent: continent_display(p, &["continent_name"], &["continent_code"]),
        continent_code: p.text(&["continent_code"]),
        latitude: p.coordinate(&["latitude"]),
        longitude: p.coordinate(&["longitude"]),
        asn: join_asn(asn_code.as_deref(), asn_name.as_deref()),
        asn_code,
        timezone: p.text(&["time_zone", "name"]),
    }
}
