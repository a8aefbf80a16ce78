use std::path::Path;

use calendar_resource_core::protocol::{OutRequest, OutResponse, metadata_fields};
use calendar_resource_core::{CalendarProvider, ResourceError, ResourceResult};
use tracing::info;

/// Create the event described by `request.params`.
pub async fn run<P: CalendarProvider>(
    request: &OutRequest,
    sources: &Path,
    provider: &P,
) -> ResourceResult<OutResponse> {
    let source = &request.source;
    source.validate()?;

    if !sources.exists() {
        return Err(ResourceError::Input(format!(
            "build sources path {} does not exist",
            sources.display()
        )));
    }

    let created = provider.create(&request.params).await?;
    info!(id = %created.event.id, "created event");

    Ok(OutResponse {
        version: source.version_type.version_for(&created.event),
        metadata: metadata_fields(created.metadata),
    })
}
