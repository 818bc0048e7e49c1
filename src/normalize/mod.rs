//! Normalizers turning host tokens into canonical rule lines.

mod domain;
mod ip;

pub use domain::DomainNormalizer;
pub use ip::IpNormalizer;

/// Normalizer converts one host token into a canonical rule line.
///
/// Rejection is not an error: a token that does not fit the grammar
/// simply yields `None` and the line is dropped.
pub trait Normalizer: Send + Sync {
    /// Normalize a host token.
    ///
    /// # Arguments
    /// * `token` - First column of a data line, inline comment stripped and trimmed
    ///
    /// # Returns
    /// The canonical rule line, or `None` when no rule can be extracted.
    fn normalize(&self, token: &str) -> Option<String>;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}
