//! Registry domain resolution for image references.

/// Registry used for images that name no registry.
const DEFAULT_REGISTRY: &str = "docker.io";

/// Server address under which Docker Hub credentials are stored.
const DOCKER_HUB_SERVER_ADDRESS: &str = "https://index.docker.io/v1/";

/// Returns the registry domain an image reference pulls from.
///
/// The first path component is a registry when it looks like a host: it
/// contains a `.` or a `:` port separator, or is `localhost`. Otherwise the
/// image lives on Docker Hub.
///
/// ```
/// use taskdock::credentials::registry_for_image;
///
/// assert_eq!(registry_for_image("ghcr.io/owner/app:1.0"), "ghcr.io");
/// assert_eq!(registry_for_image("alpine:3.20"), "docker.io");
/// ```
#[must_use]
pub fn registry_for_image(image: &str) -> &str {
    match image.split_once('/') {
        Some((first, _))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            first
        }
        _ => DEFAULT_REGISTRY,
    }
}

/// Returns the server address credentials for `registry` are stored under.
///
/// Docker Hub credentials use the legacy index URL; every other registry is
/// keyed by its domain.
#[must_use]
pub fn server_address_for_registry(registry: &str) -> &str {
    match registry {
        "docker.io" | "index.docker.io" | "registry-1.docker.io" => DOCKER_HUB_SERVER_ADDRESS,
        other => other,
    }
}
