/// Errors from analysis configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A parameter is out of range
    #[error("Invalid analysis parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        message: String,
    },
}
