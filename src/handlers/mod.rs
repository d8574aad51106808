// handlers/mod.rs - two tiers of routes
//
// site:     no session required (/health, /ui, /ui/sessions/new)
// resource: session cookie required (/ui/:resource/*), guarded by middleware::require_session

pub mod resource;
pub mod site;
