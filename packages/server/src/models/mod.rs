pub mod item;

use serde::Serialize;

/// Plain message payload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Hello, world!")]
    pub message: String,
}
