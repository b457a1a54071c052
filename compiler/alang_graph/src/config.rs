//! Lowering configuration.

/// Options for [`lower_program`](crate::lower_program).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LowerConfig {
    /// Name recorded on the produced [`Module`](crate::Module).
    pub module_name: String,
    /// Register the arity of every top-level `defun` before lowering any
    /// call site. Call sites that disagree with a known definition then fail
    /// during lowering instead of at verification.
    pub resolve_signatures_first: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            module_name: "alang".to_string(),
            resolve_signatures_first: true,
        }
    }
}
