pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_MAX_HEIGHT: u32 = 600;
pub const DEFAULT_QUALITY: f32 = 0.85;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Anchor ids for timelines synthesized from a project's legacy cover fields.
pub const INITIAL_IMAGE_ID: &str = "initial-image";
pub const INITIAL_DESCRIPTION_ID: &str = "initial-desc";

pub const IMAGE_ENTRY_PREFIX: &str = "image";
pub const DESCRIPTION_ENTRY_PREFIX: &str = "desc";

pub const ROLE_ME: &str = "Me";
pub const ROLE_ADMIN: &str = "Admin";
