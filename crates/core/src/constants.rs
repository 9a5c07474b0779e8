/// Upload size ceiling for PPR and CEPLAN workbooks.
pub const MAX_SCHEDULE_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Upload size ceiling for service portfolio (cartera) workbooks.
pub const MAX_CARTERA_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Accepted workbook extensions, lowercase.
pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// Absolute monthly difference above which a comparison is flagged.
pub const COMPARISON_TOLERANCE: f64 = 0.1;

/// Progress percentage below which a sub-product is critical.
pub const CRITICAL_PROGRESS_THRESHOLD: f64 = 70.0;

/// Progress percentage below which a sub-product needs attention.
pub const ATTENTION_PROGRESS_THRESHOLD: f64 = 90.0;

/// Default primary administrator account, which cannot be deleted.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@monitorppr.com";

/// Fallback unit of measure for sub-products that declare none.
pub const DEFAULT_UNIT_OF_MEASURE: &str = "UNIDAD";

/// Maximum lengths of stored codes and names.
pub const PPR_CODE_MAX_LEN: usize = 10;
pub const PPR_NAME_MAX_LEN: usize = 255;
pub const USER_NAME_MAX_LEN: usize = 100;
pub const USER_EMAIL_MAX_LEN: usize = 150;
