/// Custom middleware for the API server
///
/// - `security`: Security response headers, applied to every response
///   including error bodies

pub mod security;
