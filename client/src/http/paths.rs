//! REST paths of the control plane

/// Root of the REST API
pub const API_BASE: &str = "/v2";
/// Applications endpoint
pub const API_APPS: &str = "/v2/apps/";
/// Groups endpoint
pub const API_GROUPS: &str = "/v2/groups/";
/// Deployments endpoint
pub const API_DEPLOYMENTS: &str = "/v2/deployments/";
/// Connectivity check
pub const API_PING: &str = "/ping";

/// Strip one leading `/` so ids can be appended to an endpoint
pub fn del_initial_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

pub fn app(id: &str) -> String {
    format!("{}{}", API_APPS, del_initial_slash(id))
}

pub fn app_restart(id: &str) -> String {
    format!("{}/restart", app(id))
}

pub fn app_versions(id: &str) -> String {
    format!("{}/versions", app(id))
}

pub fn app_version(id: &str, version: &str) -> String {
    format!("{}/versions/{}", app(id), version)
}

pub fn group(id: &str) -> String {
    format!("{}{}", API_GROUPS, del_initial_slash(id))
}

pub fn deployment(id: &str) -> String {
    format!("{}{}", API_DEPLOYMENTS, del_initial_slash(id))
}
