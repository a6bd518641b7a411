//! IP 地理位置查询服务
//!
//! 三个服务的返回格式与失败标记各不相同：
//! - ipapi.co: `{"error": true, "reason": ...}`
//! - ipwho.is: `{"success": false, "message": ...}`
//! - ip-api.com: `{"status": "fail", "message": ...}`

use serde::Deserialize;
use std::time::Duration;

use crate::errors::{PortalError, Result};
use crate::models::sessions::entities::{GeoLocation, UNKNOWN_LOCATION};

#[async_trait::async_trait]
pub trait GeoProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn lookup(&self, ip: &str) -> Result<GeoLocation>;
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

async fn fetch_text(client: &reqwest::Client, provider: &str, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(PortalError::external_service(format!(
            "{provider} returned {}",
            response.status()
        )));
    }
    Ok(response.text().await?)
}

fn field(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

fn location(
    provider: &str,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> GeoLocation {
    GeoLocation {
        city: field(city),
        region: field(region),
        country: field(country),
        latitude,
        longitude,
        provider: provider.to_string(),
    }
}

// ipapi.co
pub struct IpapiCo {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IpapiCoBody {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl IpapiCo {
    pub const NAME: &'static str = "ipapi.co";

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn parse(body: &str) -> Result<GeoLocation> {
        let body: IpapiCoBody = serde_json::from_str(body)?;
        if body.error {
            return Err(PortalError::external_service(format!(
                "{}: {}",
                Self::NAME,
                body.reason.unwrap_or_default()
            )));
        }
        Ok(location(
            Self::NAME,
            body.city,
            body.region,
            body.country_name,
            body.latitude,
            body.longitude,
        ))
    }
}

#[async_trait::async_trait]
impl GeoProvider for IpapiCo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn lookup(&self, ip: &str) -> Result<GeoLocation> {
        let url = format!("{}/{ip}/json/", self.base_url.trim_end_matches('/'));
        Self::parse(&fetch_text(&self.client, Self::NAME, &url).await?)
    }
}

// ipwho.is
pub struct IpWhoIs {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IpWhoIsBody {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl IpWhoIs {
    pub const NAME: &'static str = "ipwho.is";

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn parse(body: &str) -> Result<GeoLocation> {
        let body: IpWhoIsBody = serde_json::from_str(body)?;
        if !body.success {
            return Err(PortalError::external_service(format!(
                "{}: {}",
                Self::NAME,
                body.message.unwrap_or_default()
            )));
        }
        Ok(location(
            Self::NAME,
            body.city,
            body.region,
            body.country,
            body.latitude,
            body.longitude,
        ))
    }
}

#[async_trait::async_trait]
impl GeoProvider for IpWhoIs {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn lookup(&self, ip: &str) -> Result<GeoLocation> {
        let url = format!("{}/{ip}", self.base_url.trim_end_matches('/'));
        Self::parse(&fetch_text(&self.client, Self::NAME, &url).await?)
    }
}

// ip-api.com
pub struct IpApiCom {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiComBody {
    status: String,
    message: Option<String>,
    city: Option<String>,
    region_name: Option<String>,
    country: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpApiCom {
    pub const NAME: &'static str = "ip-api.com";

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn parse(body: &str) -> Result<GeoLocation> {
        let body: IpApiComBody = serde_json::from_str(body)?;
        if body.status != "success" {
            return Err(PortalError::external_service(format!(
                "{}: {}",
                Self::NAME,
                body.message.unwrap_or(body.status)
            )));
        }
        Ok(location(
            Self::NAME,
            body.city,
            body.region_name,
            body.country,
            body.lat,
            body.lon,
        ))
    }
}

#[async_trait::async_trait]
impl GeoProvider for IpApiCom {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn lookup(&self, ip: &str) -> Result<GeoLocation> {
        let url = format!("{}/{ip}", self.base_url.trim_end_matches('/'));
        Self::parse(&fetch_text(&self.client, Self::NAME, &url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipapi_co() {
        let body = r#"{"ip":"8.8.8.8","city":"Mountain View","region":"California",
            "country_name":"United States","latitude":37.42301,"longitude":-122.083352}"#;
        let loc = IpapiCo::parse(body).unwrap();
        assert_eq!(loc.city, "Mountain View");
        assert_eq!(loc.region, "California");
        assert_eq!(loc.country, "United States");
        assert_eq!(loc.latitude, Some(37.42301));
        assert_eq!(loc.provider, "ipapi.co");

        let failed = r#"{"ip":"8.8.8.8","error":true,"reason":"RateLimited"}"#;
        assert!(IpapiCo::parse(failed).is_err());
    }

    #[test]
    fn test_parse_ipwho_is() {
        let body = r#"{"ip":"1.1.1.1","success":true,"city":"Sydney","region":"New South Wales",
            "country":"Australia","latitude":-33.86,"longitude":151.2}"#;
        let loc = IpWhoIs::parse(body).unwrap();
        assert_eq!(loc.city, "Sydney");
        assert_eq!(loc.country, "Australia");
        assert_eq!(loc.provider, "ipwho.is");

        let failed = r#"{"ip":"1.1.1.1","success":false,"message":"Invalid IP address"}"#;
        assert!(IpWhoIs::parse(failed).is_err());
    }

    #[test]
    fn test_parse_ip_api_com() {
        let body = r#"{"status":"success","country":"Philippines","regionName":"Metro Manila",
            "city":"Quezon City","lat":14.676,"lon":121.0437}"#;
        let loc = IpApiCom::parse(body).unwrap();
        assert_eq!(loc.region, "Metro Manila");
        assert_eq!(loc.longitude, Some(121.0437));
        assert_eq!(loc.provider, "ip-api.com");

        let failed = r#"{"status":"fail","message":"reserved range"}"#;
        assert!(IpApiCom::parse(failed).is_err());
    }

    #[test]
    fn test_blank_fields_become_unknown() {
        let body = r#"{"success":true,"city":"","region":"  ","country":"Japan"}"#;
        let loc = IpWhoIs::parse(body).unwrap();
        assert_eq!(loc.city, UNKNOWN_LOCATION);
        assert_eq!(loc.region, UNKNOWN_LOCATION);
        assert_eq!(loc.country, "Japan");
        assert!(!loc.is_unknown());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(IpapiCo::parse("<html>").is_err());
        assert!(IpApiCom::parse("{}").is_err());
    }
}
