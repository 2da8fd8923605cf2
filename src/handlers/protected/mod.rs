// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here takes a `BearerToken`, so a missing or malformed
// Authorization header is answered with 401 before the handler body runs.
// The token is then verified against Supabase on each request.

pub mod auth;
