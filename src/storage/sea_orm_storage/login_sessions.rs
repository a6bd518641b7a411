use super::SeaOrmStorage;
use crate::entity::login_sessions::{ActiveModel, Column, Entity as LoginSessions};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    sessions::{
        entities::LoginSession,
        requests::{NewLoginSession, SessionListQuery},
        responses::SessionListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 写入登录记录
    pub async fn create_login_session_impl(&self, session: NewLoginSession) -> Result<LoginSession> {
        let location = session.location;

        let model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(session.user_id),
            ip_address: Set(session.ip_address),
            user_agent: Set(session.user_agent),
            city: Set(location.city),
            region: Set(location.region),
            country: Set(location.country),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            geo_provider: Set(location.provider),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("写入登录记录失败: {e}")))?;

        Ok(result.into_login_session())
    }

    /// 分页列出登录记录，最新的在前
    pub async fn list_login_sessions_with_pagination_impl(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = LoginSessions::find();

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询登录记录总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询登录记录页数失败: {e}")))?;

        let sessions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询登录记录失败: {e}")))?;

        Ok(SessionListResponse {
            items: sessions
                .into_iter()
                .map(|m| m.into_login_session())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn count_logins_since_impl(&self, since: i64) -> Result<u64> {
        LoginSessions::find()
            .filter(Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计登录次数失败: {e}")))
    }
}
