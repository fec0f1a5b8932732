//! OpenAPI schema aggregation for the pet API.
use crate::api::{
    pets, system,
    types::{DeleteResponse, ErrorResponse, HealthStatus},
};
use crate::model::{MedicalInfo, NewPet, Pet, PetPatch};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "petcare-api",
        version = "v1",
        description = "Pet care record HTTP API"
    ),
    paths(
        system::system_health,
        system::openapi_json,
        pets::list_pets,
        pets::create_pet,
        pets::get_pet,
        pets::update_pet,
        pets::delete_pet
    ),
    components(schemas(
        HealthStatus,
        ErrorResponse,
        DeleteResponse,
        Pet,
        NewPet,
        PetPatch,
        MedicalInfo
    )),
    tags(
        (name = "system", description = "Health and discovery endpoints"),
        (name = "pets", description = "Pet profile management")
    )
)]
pub struct ApiDoc;
