use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{error, info};

use super::locator::GeoLocator;
use crate::config::AppConfig;
use crate::models::sessions::{entities::LoginSession, requests::NewLoginSession};
use crate::storage::Storage;

static GEO_LOCATOR: Lazy<Arc<GeoLocator>> =
    Lazy::new(|| Arc::new(GeoLocator::from_config(AppConfig::get())));

pub fn default_locator() -> Arc<GeoLocator> {
    GEO_LOCATOR.clone()
}

/// 解析登录地点并写入登录记录，失败只记录日志
pub async fn record_login(
    storage: &Arc<dyn Storage>,
    locator: &GeoLocator,
    user_id: i64,
    ip: &str,
    user_agent: Option<String>,
) -> Option<LoginSession> {
    let location = locator.locate(ip).await;

    match storage
        .create_login_session(NewLoginSession {
            user_id,
            ip_address: ip.to_string(),
            user_agent,
            location,
        })
        .await
    {
        Ok(session) => {
            info!(
                "Login session {} recorded for user {} ({}, {})",
                session.id, user_id, session.location.city, session.location.country
            );
            Some(session)
        }
        Err(e) => {
            error!("Failed to record login session for user {}: {}", user_id, e);
            None
        }
    }
}

/// 在后台记录登录，不阻塞登录响应
pub fn spawn_record_login(
    storage: Arc<dyn Storage>,
    user_id: i64,
    ip: String,
    user_agent: Option<String>,
) {
    let locator = default_locator();
    tokio::spawn(async move {
        record_login(&storage, &locator, user_id, &ip, user_agent).await;
    });
}
