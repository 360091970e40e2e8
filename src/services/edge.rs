//! 边缘平台请求元数据
//!
//! 边缘代理（默认按 Cloudflare 的头名）在转发时为每个请求注入访客的地理与网络信息，
//! 这里把这些头收拢成 `EdgeMetadata`，并提供不发起外部请求的本地 provider。

use std::net::SocketAddr;

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::EdgeHeaders;
use crate::services::geoip::{GeoLookup, GeoRecord, ResolveError};
use crate::services::regions::{continent_name, country_name};
use crate::utils::ip::extract_client_ip_from_headers;

/// Per-request metadata observed by the edge proxy.
///
/// Serialised as-is by `/cf`; absent headers stay `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMetadata {
    pub client_ip: Option<String>,
    /// ISO 3166-1 alpha-2, or the edge's own markers (`XX`, `T1`)
    pub country: Option<String>,
    pub city: Option<String>,
    pub continent: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub postal_code: Option<String>,
    pub timezone: Option<String>,
    /// Bare AS number
    pub asn: Option<String>,
    pub as_organization: Option<String>,
    pub tls_version: Option<String>,
    pub colo: Option<String>,
}

impl EdgeMetadata {
    pub fn from_headers(
        headers: &HeaderMap,
        peer_addr: Option<SocketAddr>,
        names: &EdgeHeaders,
    ) -> Self {
        let read = |name: &str| edge_header(headers, name);

        Self {
            client_ip: extract_client_ip_from_headers(headers, &names.connecting_ip, peer_addr),
            country: read(&names.country),
            city: read(&names.city),
            continent: read(&names.continent),
            latitude: read(&names.latitude),
            longitude: read(&names.longitude),
            region: read(&names.region),
            region_code: read(&names.region_code),
            postal_code: read(&names.postal_code),
            timezone: read(&names.timezone),
            asn: read(&names.asn),
            as_organization: read(&names.as_organization),
            tls_version: read(&names.tls_version),
            colo: read(&names.colo),
        }
    }

    pub fn from_request(req: &HttpRequest, names: &EdgeHeaders) -> Self {
        Self::from_headers(req.headers(), req.peer_addr(), names)
    }

    /// The edge terminated TLS for this request.
    pub fn has_tls(&self) -> bool {
        self.tls_version.is_some()
    }

    /// Normalised view of the edge metadata.
    ///
    /// City and region fall back to coarser fields so a browser always has something to
    /// show: city → region → region code → country name.
    pub fn to_geo_record(&self) -> GeoRecord {
        let country = self.country.as_deref().map(country_name);
        let region = self
            .region
            .clone()
            .or_else(|| self.region_code.clone())
            .or_else(|| country.clone());
        let city = self.city.clone().or_else(|| region.clone());
        let asn = self.asn.as_ref().map(|n| match &self.as_organization {
            Some(org) => format!("AS{} {}", n, org),
            None => format!("AS{}", n),
        });

        GeoRecord {
            ip: self.client_ip.clone(),
            city,
            region,
            country,
            country_code: self.country.clone(),
            continent: self.continent.as_deref().map(continent_name),
            continent_code: self.continent.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            asn,
            asn_code: self.asn.clone(),
            timezone: self.timezone.clone(),
        }
    }
}

/// Header value, trimmed. Non-UTF-8 bytes (city names) are replaced rather than dropped.
fn edge_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?;
    let text = String::from_utf8_lossy(value.as_bytes());
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Local provider backed by the edge metadata; never leaves the process.
pub struct EdgeProvider;

#[async_trait]
impl GeoLookup for EdgeProvider {
    async fn resolve(
        &self,
        ip: Option<&str>,
        edge: &EdgeMetadata,
    ) -> Result<GeoRecord, ResolveError> {
        // 边缘只知道调用方自己的位置
        if let Some(ip) = ip
            && edge.client_ip.as_deref() != Some(ip)
        {
            return Err(ResolveError::Unavailable(format!(
                "edge metadata does not describe {}",
                ip
            )));
        }
        Ok(edge.to_geo_record())
    }

    fn name(&self) -> &'static str {
        "cf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn cf_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in [
            ("cf-connecting-ip", "203.0.113.7"),
            ("cf-ipcountry", "DE"),
            ("cf-ipcity", "Frankfurt am Main"),
            ("cf-ipcontinent", "EU"),
            ("cf-iplatitude", "50.11090"),
            ("cf-iplongitude", "8.68213"),
            ("cf-region", "Hesse"),
            ("cf-region-code", "HE"),
            ("cf-timezone", "Europe/Berlin"),
            ("cf-asn", "3320"),
            ("cf-as-organization", "Deutsche Telekom AG"),
            ("cf-tls-version", "TLSv1.3"),
            ("cf-colo", "FRA"),
        ] {
            map.insert(HeaderName::from_static(k), HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_from_headers_reads_configured_names() {
        let edge = EdgeMetadata::from_headers(&cf_headers(), None, &EdgeHeaders::default());

        assert_eq!(edge.client_ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(edge.country.as_deref(), Some("DE"));
        assert_eq!(edge.colo.as_deref(), Some("FRA"));
        assert!(edge.postal_code.is_none());
        assert!(edge.has_tls());
    }

    #[test]
    fn test_custom_header_names() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-geo-country"),
            HeaderValue::from_static("FR"),
        );
        let names = EdgeHeaders {
            country: "x-geo-country".to_string(),
            ..Default::default()
        };

        let edge = EdgeMetadata::from_headers(&headers, "192.0.2.1:5000".parse().ok(), &names);

        assert_eq!(edge.country.as_deref(), Some("FR"));
        assert_eq!(edge.client_ip.as_deref(), Some("192.0.2.1"));
        assert!(!edge.has_tls());
    }

    #[test]
    fn test_non_utf8_header_is_lossy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("cf-ipcity"),
            HeaderValue::from_bytes(b"M\xfcnchen").unwrap(),
        );
        let edge = EdgeMetadata::from_headers(&headers, None, &EdgeHeaders::default());
        assert_eq!(edge.city.as_deref(), Some("M\u{fffd}nchen"));
    }

    #[test]
    fn test_to_geo_record() {
        let edge = EdgeMetadata::from_headers(&cf_headers(), None, &EdgeHeaders::default());
        let record = edge.to_geo_record();

        assert_eq!(record.ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(record.city.as_deref(), Some("Frankfurt am Main"));
        assert_eq!(record.region.as_deref(), Some("Hesse"));
        assert_eq!(record.country.as_deref(), Some("Germany"));
        assert_eq!(record.country_code.as_deref(), Some("DE"));
        assert_eq!(record.continent.as_deref(), Some("Europe"));
        assert_eq!(record.continent_code.as_deref(), Some("EU"));
        assert_eq!(record.latitude.as_deref(), Some("50.11090"));
        assert_eq!(record.asn.as_deref(), Some("AS3320 Deutsche Telekom AG"));
        assert_eq!(record.asn_code.as_deref(), Some("3320"));
        assert_eq!(record.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn test_to_geo_record_fallbacks() {
        let edge = EdgeMetadata {
            country: Some("JP".to_string()),
            region_code: Some("13".to_string()),
            asn: Some("2516".to_string()),
            ..Default::default()
        };
        let record = edge.to_geo_record();
        assert_eq!(record.city.as_deref(), Some("13"));
        assert_eq!(record.region.as_deref(), Some("13"));
        assert_eq!(record.asn.as_deref(), Some("AS2516"));

        let only_country = EdgeMetadata {
            country: Some("JP".to_string()),
            ..Default::default()
        };
        let record = only_country.to_geo_record();
        assert_eq!(record.city.as_deref(), Some("Japan"));
        assert_eq!(record.region.as_deref(), Some("Japan"));
        assert!(record.asn.is_none());
    }

    #[tokio::test]
    async fn test_edge_provider_only_knows_the_caller() {
        let edge = EdgeMetadata::from_headers(&cf_headers(), None, &EdgeHeaders::default());

        let own = EdgeProvider.resolve(None, &edge).await.unwrap();
        assert_eq!(own.ip.as_deref(), Some("203.0.113.7"));

        let same = EdgeProvider.resolve(Some("203.0.113.7"), &edge).await;
        assert!(same.is_ok());

        let other = EdgeProvider.resolve(Some("8.8.8.8"), &edge).await;
        assert!(matches!(other, Err(ResolveError::Unavailable(_))));
    }
}
