//! # Dispatcher
//!
//! Pure mapping from operation names to handlers. The mutating and query entry
//! points have separate tables.
//!
//! | Entry | Name | Handler |
//! |-------|------|---------|
//! | dispatch | `init` | initialize ledger |
//! | dispatch | `init_contract_terms` | create contract terms |
//! | dispatch | anything else | unrouted: counter advances, then `UnknownOperation` |
//! | query | `query` | query key |
//! | query | anything else | `UnknownOperation`, counter untouched |

/// Name routed to ledger initialization.
pub const OP_INIT: &str = "init";

/// Name routed to contract-terms creation.
pub const OP_INIT_CONTRACT_TERMS: &str = "init_contract_terms";

/// The only name the query entry point accepts.
pub const OP_QUERY: &str = "query";

/// Handler selected by the mutating entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    Initialize,
    CreateContractTerms,
    Unrouted(&'a str),
}

impl<'a> Operation<'a> {
    /// Map a mutating operation name.
    #[must_use]
    pub fn from_name(name: &'a str) -> Self {
        match name {
            OP_INIT => Self::Initialize,
            OP_INIT_CONTRACT_TERMS => Self::CreateContractTerms,
            other => Self::Unrouted(other),
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Initialize => OP_INIT,
            Self::CreateContractTerms => OP_INIT_CONTRACT_TERMS,
            Self::Unrouted(name) => name,
        }
    }
}

/// Handler selected by the query entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperation<'a> {
    QueryKey,
    Unrouted(&'a str),
}

impl<'a> QueryOperation<'a> {
    /// Map a query operation name.
    #[must_use]
    pub fn from_name(name: &'a str) -> Self {
        if name == OP_QUERY {
            Self::QueryKey
        } else {
            Self::Unrouted(name)
        }
    }
}
