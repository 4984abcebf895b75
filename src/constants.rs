//! Shared constants for the API gateway CI toolkit

use std::time::Duration;

/// Path prefix of the API definitions REST surface
pub const API_DEFINITIONS_PREFIX: &str = "/api-definitions/v2/endpoints";

/// Credentials file looked up in the home directory when `--config` is not given
pub const DEFAULT_EDGERC_FILE: &str = ".edgerc";
pub const DEFAULT_EDGERC_SECTION: &str = "default";

/// Largest request body prefix covered by the EdgeGrid content hash
pub const DEFAULT_MAX_BODY: usize = 131_072;

/// Version selector meaning "first entry of the backend's version list"
pub const LATEST_VERSION: &str = "latest";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Status literal the backend reports once an activation has converged
pub const ACTIVE_STATUS: &str = "ACTIVE";
