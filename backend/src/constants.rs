// =============================================================================
// Oracle Challenger Backend Constants
// =============================================================================
// Tunables shared by the server, the stores and the operational binaries.

// =============================================================================
// STAR POLICY
// =============================================================================

/// Maximum stars a single address may give per UTC day
pub const DAILY_STAR_LIMIT: u64 = 5;

/// Seconds in one star-limit day
pub const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// RANKING
// =============================================================================

/// Number of users returned by the leaderboard when no limit is given
pub const DEFAULT_TOP_USERS_LIMIT: usize = 10;

/// Upper bound on the leaderboard size served over HTTP
pub const MAX_TOP_USERS_LIMIT: usize = 100;

/// Ranks that receive a medal (gold, silver, bronze)
pub const MEDAL_RANKS: usize = 3;

// =============================================================================
// PROFILE VALIDATION
// =============================================================================

/// Domain a LinkedIn URL must contain
pub const LINKEDIN_DOMAIN: &str = "linkedin.com";

/// Domain a GitHub URL must contain
pub const GITHUB_DOMAIN: &str = "github.com";

/// Domains accepted for a Twitter URL
pub const TWITTER_DOMAINS: [&str; 2] = ["twitter.com", "x.com"];

/// Maximum length of any single profile field
pub const PROFILE_FIELD_MAX_LENGTH: usize = 256;

// =============================================================================
// ADDRESS VALIDATION
// =============================================================================

/// Maximum accepted wallet address length
pub const ADDRESS_MAX_LENGTH: usize = 128;

// =============================================================================
// HTTP
// =============================================================================

/// Header carrying the connected wallet address
pub const WALLET_ADDRESS_HEADER: &str = "x-wallet-address";

/// Header carrying the wallet's opaque signature for a write
pub const WALLET_SIGNATURE_HEADER: &str = "x-wallet-signature";

// =============================================================================
// CHAIN GATEWAY
// =============================================================================

/// Default MultiversX gateway used when CHAIN_GATEWAY_URL is unset
pub const DEFAULT_CHAIN_GATEWAY_URL: &str = "https://gateway.multiversx.com";

/// Request timeout for gateway probes
pub const GATEWAY_TIMEOUT_SECS: u64 = 10;

/// How often the gateway checker probes the gateway
pub const GATEWAY_CHECK_INTERVAL_SECS: u64 = 30;

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default database pool size
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
