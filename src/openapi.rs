//! OpenAPI document for the client API, served at `/openapi.json`.

use crate::error::{ErrorBody, FieldError};
use crate::handlers::clients;
use crate::model::{Client, ClientPayload};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Client Records API", description = "Client records with soft deletion and pagination"),
    paths(clients::list, clients::read, clients::create, clients::update, clients::delete),
    components(schemas(Client, ClientPayload, ErrorBody, FieldError)),
    tags((name = "clients", description = "Client records"))
)]
pub struct ApiDoc;
