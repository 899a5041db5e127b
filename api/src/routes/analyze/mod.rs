pub mod analyze_response;
pub mod analyze_route;
