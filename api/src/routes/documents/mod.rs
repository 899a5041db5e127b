pub mod document_request;
pub mod document_response;
pub mod set_text_route;
pub mod upload_document_route;
