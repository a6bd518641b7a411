use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::providers::{GeoProvider, IpApiCom, IpWhoIs, IpapiCo, http_client};
use crate::config::AppConfig;
use crate::models::sessions::entities::GeoLocation;

/// 按固定顺序依次尝试各个服务，全部失败时返回 "Unknown"
pub struct GeoLocator {
    providers: Vec<Arc<dyn GeoProvider>>,
}

impl GeoLocator {
    pub fn with_providers(providers: Vec<Arc<dyn GeoProvider>>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let geo = &config.geolocation;
        if !geo.enabled {
            return Self::with_providers(Vec::new());
        }

        let client = http_client(Duration::from_millis(geo.timeout_ms));
        Self::with_providers(vec![
            Arc::new(IpapiCo::with_base_url(client.clone(), geo.ipapi_url.as_str())),
            Arc::new(IpWhoIs::with_base_url(client.clone(), geo.ipwho_url.as_str())),
            Arc::new(IpApiCom::with_base_url(client, geo.ip_api_url.as_str())),
        ])
    }

    pub async fn locate(&self, ip: &str) -> GeoLocation {
        let Some(addr) = public_ip(ip) else {
            debug!("Skipping geolocation for non-public address {}", ip);
            return GeoLocation::unknown();
        };
        let ip = addr.to_string();

        for provider in &self.providers {
            match provider.lookup(&ip).await {
                Ok(location) => return location,
                Err(e) => warn!("Geolocation via {} failed for {}: {}", provider.name(), ip, e),
            }
        }
        GeoLocation::unknown()
    }
}

/// 可以对外查询的公网地址；回环、内网、链路本地等地址返回 `None`
pub fn public_ip(ip: &str) -> Option<IpAddr> {
    let addr: IpAddr = ip.trim().parse().ok()?;
    let routable = match addr {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_multicast()
                || v4.is_documentation()
                // 100.64.0.0/10 运营商级 NAT
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xc0) == 64))
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return public_ip(&v4.to_string());
            }
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_multicast()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80
                // 2001:db8::/32 文档地址
                || (first == 0x2001 && v6.segments()[1] == 0x0db8))
        }
    };
    routable.then_some(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{PortalError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        name: &'static str,
        city: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(name: &'static str, city: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                city,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl GeoProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn lookup(&self, _ip: &str) -> Result<GeoLocation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.city {
                Some(city) => Ok(GeoLocation {
                    city: city.to_string(),
                    region: "Region".to_string(),
                    country: "Country".to_string(),
                    latitude: None,
                    longitude: None,
                    provider: self.name.to_string(),
                }),
                None => Err(PortalError::external_service("down")),
            }
        }
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins() {
        let first = FakeProvider::new("first", None);
        let second = FakeProvider::new("second", Some("Cebu"));
        let third = FakeProvider::new("third", Some("Davao"));
        let locator =
            GeoLocator::with_providers(vec![first.clone(), second.clone(), third.clone()]);

        let loc = locator.locate("8.8.8.8").await;
        assert_eq!(loc.city, "Cebu");
        assert_eq!(loc.provider, "second");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(third.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failing_gives_unknown() {
        let locator = GeoLocator::with_providers(vec![
            FakeProvider::new("a", None),
            FakeProvider::new("b", None),
        ]);
        let loc = locator.locate("8.8.4.4").await;
        assert!(loc.is_unknown());
        assert_eq!(loc, GeoLocation::unknown());
    }

    #[tokio::test]
    async fn test_private_addresses_skip_providers() {
        let provider = FakeProvider::new("a", Some("Manila"));
        let locator = GeoLocator::with_providers(vec![provider.clone()]);

        for ip in ["127.0.0.1", "10.1.2.3", "192.168.0.10", "::1", "fd00::1", "not-an-ip", ""] {
            assert!(locator.locate(ip).await.is_unknown(), "{ip}");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_public_ip_classification() {
        assert!(public_ip("8.8.8.8").is_some());
        assert!(public_ip(" 1.1.1.1 ").is_some());
        assert!(public_ip("2001:4860:4860::8888").is_some());
        assert!(public_ip("100.64.1.1").is_none());
        assert!(public_ip("169.254.1.1").is_none());
        assert!(public_ip("::ffff:192.168.1.1").is_none());
        assert!(public_ip("fe80::1").is_none());
        assert!(public_ip("192.0.2.10").is_none());
        assert!(public_ip("2001:db8::1").is_none());
        assert!(public_ip("2001:db8:ffff::42").is_none());
        assert!(public_ip("2001:db9::1").is_some());
    }
}
