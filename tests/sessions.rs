mod common;

use std::sync::Arc;

use school_portal::errors::{PortalError, Result};
use school_portal::models::{
    sessions::{entities::GeoLocation, requests::SessionListQuery},
    users::entities::UserRole,
};
use school_portal::services::sessions::{GeoLocator, GeoProvider, record_login};

struct Fixed(Option<GeoLocation>);

#[async_trait::async_trait]
impl GeoProvider for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn lookup(&self, _ip: &str) -> Result<GeoLocation> {
        self.0
            .clone()
            .ok_or_else(|| PortalError::external_service("lookup failed"))
    }
}

fn manila() -> GeoLocation {
    GeoLocation {
        city: "Manila".to_string(),
        region: "Metro Manila".to_string(),
        country: "Philippines".to_string(),
        latitude: Some(14.5995),
        longitude: Some(120.9842),
        provider: "fixed".to_string(),
    }
}

#[tokio::test]
async fn test_login_is_recorded_with_first_successful_location() {
    let storage = common::storage().await;
    let user = common::user(&storage, "juan", UserRole::Student).await;
    let locator = GeoLocator::with_providers(vec![
        Arc::new(Fixed(None)),
        Arc::new(Fixed(Some(manila()))),
    ]);

    let session = record_login(
        &storage,
        &locator,
        user.id,
        "8.8.8.8",
        Some("Mozilla/5.0".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(session.user_id, user.id);
    assert_eq!(session.location.city, "Manila");
    assert_eq!(session.user_agent.as_deref(), Some("Mozilla/5.0"));

    let listed = storage
        .list_login_sessions_with_pagination(SessionListQuery {
            user_id: Some(user.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].location.country, "Philippines");
}

#[tokio::test]
async fn test_login_from_private_address_is_stored_as_unknown() {
    let storage = common::storage().await;
    let user = common::user(&storage, "maria", UserRole::Teacher).await;
    let locator = GeoLocator::with_providers(vec![Arc::new(Fixed(Some(manila())))]);

    let session = record_login(&storage, &locator, user.id, "192.168.1.20", None)
        .await
        .unwrap();

    assert_eq!(session.location.city, "Unknown");
    assert_eq!(session.location.country, "Unknown");
    assert!(session.location.is_unknown());
    assert_eq!(session.ip_address, "192.168.1.20");
}

#[tokio::test]
async fn test_failed_record_does_not_panic() {
    let storage = common::storage().await;
    let locator = GeoLocator::with_providers(Vec::new());

    // 用户不存在，外键约束使写入失败
    let session = record_login(&storage, &locator, 9999, "8.8.8.8", None).await;
    assert!(session.is_none());
}
