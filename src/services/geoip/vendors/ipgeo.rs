use super::{DEFAULT_SENTINEL, LookupTarget, VendorSpec, continent_display};
use crate::services::geoip::payload::{Payload, join_asn};
use crate::services::geoip::{GeoRecord, ProviderKind};

/// ipgeolocation.io
///
/// Coordinates arrive as strings. The free plan has no `asn`; for the caller's own
/// address the edge-observed ASN stands in.
pub static SPEC: VendorSpec = VendorSpec {
    kind: ProviderKind::IpGeo,
    url_template: "https://api.ipgeolocation.io/ipgeo?apiKey={token}&ip={ip}",
    sentinel: DEFAULT_SENTINEL,
    required: &[&["latitude"], &["longitude"]],
    normalize,
};

fn normalize(p: &Payload<'_>, target: &LookupTarget<'_>) -> GeoRecord {
    let asn_code = p.text(&["asn"]).or_else(|| {
        target
            .own_address
            .then(|| target.edge.asn.as_ref().map(|n| format!("AS{}", n)))
            .flatten()
    });
    let isp = p.text(&["isp"]);

    GeoRecord {
        ip: Some(target.ip.to_string()),
        city: p.text(&["city"]),
        region: p.text(&["state_prov"]),
        country: p.text(&["country_name"]),
        country_code: p.text(&["country_code2"]),
        continent: continent_display(p, &["continent_name"], &["continent_code"]),
        continent_code: p.text(&["continent_code"]),
        latitude: p.coordinate(&["latitude"]),
        longitude: p.coordinate(&["longitude"]),
        asn: join_asn(asn_code.as_deref(), isp.as_deref()),
        asn_code,
        timezone: p.text(&["time_zone", "name"]),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::normalize_with;
    use super::*;
    use crate::services::edge::EdgeMetadata;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "ip": "8.8.8.8",
            "continent_code": "NA",
            "continent_name": "North America",
            "country_code2": "US",
            "country_name": "United States",
            "state_prov": "California",
            "city": "Mountain View",
            "latitude": "37.42240",
            "longitude": "-122.08421",
            "isp": "Google LLC",
            "time_zone": { "name": "America/Los_Angeles", "offset": -8 }
        })
    }

    #[test]
    fn test_normalize_ipgeo_query() {
        let edge = EdgeMetadata {
            asn: Some("13335".to_string()),
            ..Default::default()
        };
        let record = normalize_with(&SPEC, &payload(), "8.8.8.8", false, &edge);

        assert_eq!(record.region.as_deref(), Some("California"));
        assert_eq!(record.country_code.as_deref(), Some("US"));
        assert_eq!(record.latitude.as_deref(), Some("37.4224"));
        assert_eq!(record.longitude.as_deref(), Some("-122.0842"));
        // 查询他人地址时不借用边缘 ASN
        assert_eq!(record.asn.as_deref(), Some("Google LLC"));
        assert!(record.asn_code.is_none());
        assert_eq!(record.timezone.as_deref(), Some("America/Los_Angeles"));
    }

    #[test]
    fn test_normalize_ipgeo_own_address_borrows_edge_asn() {
        let edge = EdgeMetadata {
            asn: Some("15169".to_string()),
            ..Default::default()
        };
        let record = normalize_with(&SPEC, &payload(), "8.8.8.8", true, &edge);

        assert_eq!(record.asn.as_deref(), Some("AS15169 Google LLC"));
        assert_eq!(record.asn_code.as_deref(), Some("AS15169"));
    }

    #[test]
    fn test_normalize_ipgeo_prefers_payload_asn() {
        let mut value = payload();
        value["asn"] = json!("AS15169");
        let edge = EdgeMetadata {
            asn: Some("13335".to_string()),
            ..Default::default()
        };
        let record = normalize_with(&SPEC, &value, "8.8.8.8", true, &edge);

        assert_eq!(record.asn_code.as_deref(), Some("AS15169"));
    }
}
