use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SectionService, with_occupancy};
use crate::models::{
    ApiResponse,
    sections::{requests::SectionListQuery, responses::SectionListResponse},
};

pub async fn list_sections(
    service: &SectionService,
    mut query: SectionListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let capacity = service.capacity();

    query.program = query.program.map(|p| p.trim().to_uppercase());

    match storage.list_sections_with_occupancy(query).await {
        Ok(sections) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SectionListResponse {
                items: sections
                    .into_iter()
                    .map(|(section, occupants)| with_occupancy(section, occupants, capacity))
                    .collect(),
            },
            "Section list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(
            "Failed to retrieve section list",
            e,
        )),
    }
}
