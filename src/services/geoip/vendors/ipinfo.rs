use super::{DEFAULT_SENTINEL, LookupTarget, VendorSpec};
use crate::services::geoip::payload::{Payload, asn_code, split_location};
use crate::services::geoip::{GeoRecord, ProviderKind};
use crate::services::regions::country_name;

/// ipinfo.io
///
/// `{"city": "..", "region": "..", "country": "US", "loc": "37.4056,-122.0775",
///   "org": "AS15169 Google LLC", "timezone": "America/Los_Angeles"}`
pub static SPEC: VendorSpec = VendorSpec {
    kind: ProviderKind::IpInfo,
    url_template: "https://ipinfo.io/{ip}?token={token}",
    sentinel: DEFAULT_SENTINEL,
    // bogon 地址只返回 {"ip": .., "bogon": true}
    required: &[&["loc"]],
    normalize,
};

fn normalize(p: &Payload<'_>, target: &LookupTarget<'_>) -> GeoRecord {
    let (latitude, longitude) = p
        .text(&["loc"])
        .map(|loc| split_location(&loc))
        .unwrap_or((None, None));
    let org = p.text(&["org"]);
    let country_code = p.text(&["country"]);

    GeoRecord {
        ip: Some(target.ip.to_string()),
        city: p.text(&["city"]),
        region: p.text(&["region"]),
        country: country_code.as_deref().map(country_name),
        country_code,
        continent: None,
        continent_code: None,
        latitude,
        longitude,
        asn_code: org.as_deref().and_then(asn_code),
        asn: org,
        timezone: p.text(&["timezone"]),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::normalize_with;
    use super::*;
    use crate::services::edge::EdgeMetadata;
    use serde_json::json;

    #[test]
    fn test_normalize_ipinfo() {
        let payload = json!({
            "ip": "8.8.8.8",
            "hostname": "dns.google",
            "city": "Mountain View",
            "region": "California",
            "country": "US",
            "loc": "37.4056,-122.0775",
            "org": "AS15169 Google LLC",
            "postal": "94043",
            "timezone": "America/Los_Angeles"
        });

        let record = normalize_with(&SPEC, &payload, "8.8.8.8", false, &EdgeMetadata::default());

        assert_eq!(record.ip.as_deref(), Some("8.8.8.8"));
        assert_eq!(record.city.as_deref(), Some("Mountain View"));
        assert_eq!(record.region.as_deref(), Some("California"));
        assert_eq!(record.country.as_deref(), Some("United States"));
        assert_eq!(record.country_code.as_deref(), Some("US"));
        assert_eq!(record.latitude.as_deref(), Some("37.4056"));
        assert_eq!(record.longitude.as_deref(), Some("-122.0775"));
        assert_eq!(record.asn.as_deref(), Some("AS15169 Google LLC"));
        assert_eq!(record.asn_code.as_deref(), Some("15169"));
        assert_eq!(record.timezone.as_deref(), Some("America/Los_Angeles"));
        assert!(record.continent.is_none());
    }

    #[test]
    fn test_normalize_ipinfo_without_org() {
        let payload = json!({ "loc": "1.0,2.0", "country": "ZZ" });
        let record = normalize_with(&SPEC, &payload, "1.1.1.1", false, &EdgeMetadata::default());

        assert!(record.asn.is_none());
        assert!(record.asn_code.is_none());
        assert_eq!(record.country.as_deref(), Some("ZZ"));
        assert!(record.city.is_none());
    }
}
