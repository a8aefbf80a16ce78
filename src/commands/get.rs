use std::fs;
use std::path::Path;

use calendar_resource_core::protocol::{InRequest, InResponse, metadata_fields};
use calendar_resource_core::{CalendarProvider, ResourceError, ResourceResult};
use tracing::{debug, info};

/// Name of the file `in` leaves in its target directory.
pub const INPUT_FILE: &str = "input";

/// Fetch the requested version and record it under `target`.
///
/// Nothing is written when the fetch fails.
pub async fn run<P: CalendarProvider>(
    request: &InRequest,
    target: &Path,
    provider: &P,
) -> ResourceResult<InResponse> {
    let source = &request.source;
    source.validate()?;

    let version = request
        .version
        .as_ref()
        .filter(|v| v.is_complete())
        .ok_or_else(|| ResourceError::Input("a version is required".into()))?;
    source.version_type.check(version)?;

    let fetched = provider.fetch(version).await?;
    debug!(id = %fetched.event.id, "fetched event");

    let response = InResponse {
        version: version.clone(),
        metadata: metadata_fields(fetched.metadata),
    };

    fs::create_dir_all(target)?;
    let path = target.join(INPUT_FILE);
    fs::write(&path, serde_json::to_vec(&response)?)?;
    info!(path = %path.display(), "wrote event metadata");

    Ok(response)
}
