//! Hard-coded defaults applied by `init()`

use std::time::Duration;

use super::value::{HeaderLimits, Http2Upgrade};

/// Library defaults for every tunable that has one
pub struct ConfigDefaults;

impl ConfigDefaults {
    /// Zero means "use the platform default", not "no timeout"
    pub const CONNECT_TIMEOUT: Duration = Duration::ZERO;
    pub const READ_TIMEOUT: Duration = Duration::ZERO;
    pub const FOLLOW_REDIRECTS: bool = true;
    pub const MAX_REDIRECTS: u32 = 5;
    pub const CHUNK_SIZE: usize = 4096;
    pub const HEADER_LIMITS: HeaderLimits = HeaderLimits::new(8192, 4096, 8192);
    pub const EXPECT_CONTINUE_THRESHOLD: u64 = 65536;
    pub const ALLOW_RESTRICTED_HEADERS: bool = false;

    pub const MAX_CONNECTIONS_TOTAL: usize = 60;
    pub const MAX_CONNECTIONS_PER_DESTINATION: usize = 5;
    pub const IDLE_PRUNE_TIMEOUT: Duration = Duration::from_secs(60);
    pub const HTTP2_UPGRADE: Http2Upgrade = Http2Upgrade::Disabled;
}
