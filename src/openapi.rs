use utoipa::OpenApi;

use crate::models::{
    AssignSlotRequest, Class, CreateClassRequest, CreatedResponse, ErrorBody, MessageResponse,
    TimeSlot,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::list_classes,
        crate::handlers::get_class,
        crate::handlers::create_class,
        crate::handlers::duplicate_class,
        crate::handlers::delete_class,
        crate::handlers::assign_slot
    ),
    components(schemas(
        Class,
        TimeSlot,
        CreateClassRequest,
        AssignSlotRequest,
        CreatedResponse,
        MessageResponse,
        ErrorBody
    )),
    tags(
        (name = "classes", description = "Classes and time slot assignment"),
        (name = "health", description = "Service probes")
    ),
)]
pub struct ApiDoc;
