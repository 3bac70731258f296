pub mod analyze_request;
pub mod analyze_response;
pub mod analyze_route;
pub mod segments_request;
pub mod segments_response;
pub mod segments_route;
