//! ABI registry for the governed contract suite, keyed by logical role.
//! Every driver builds its calldata from these signatures; none carries an
//! inline ABI of its own.

use alloy_primitives::{keccak256, B256};
use clap::ValueEnum;

/// The governed contracts a driver can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContractRole {
    Token,
    Staking,
    Sale,
}

impl ContractRole {
    pub fn as_str(&self) -> &str {
        match self {
            ContractRole::Token => "token",
            ContractRole::Staking => "staking",
            ContractRole::Sale => "sale",
        }
    }
}

/// Access-control role names used by grant/revoke drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleName {
    Admin,
    Pauser,
    Minter,
    Proposer,
    Executor,
}

impl RoleName {
    /// The on-chain role identifier: zero for the default admin role,
    /// keccak256 of the role constant's name otherwise.
    pub fn hash(&self) -> B256 {
        match self {
            RoleName::Admin => B256::ZERO,
            RoleName::Pauser => keccak256("PAUSER_ROLE"),
            RoleName::Minter => keccak256("MINTER_ROLE"),
            RoleName::Proposer => keccak256("PROPOSER_ROLE"),
            RoleName::Executor => keccak256("EXECUTOR_ROLE"),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Pauser => "pauser",
            RoleName::Minter => "minter",
            RoleName::Proposer => "proposer",
            RoleName::Executor => "executor",
        }
    }
}

/// Function signatures of the privileged entry points.
pub mod sig {
    pub const PAUSE: &str = "pause()";
    pub const UNPAUSE: &str = "unpause()";
    pub const SET_RATE: &str = "setRate(uint256)";
    pub const GRANT_ROLE: &str = "grantRole(bytes32,address)";
    pub const REVOKE_ROLE: &str = "revokeRole(bytes32,address)";
    pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(address)";
    pub const WITHDRAW_TOKENS: &str = "withdrawTokens(address,uint256)";
    pub const FINALIZE: &str = "finalize()";
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn admin_role_is_the_zero_hash() {
        assert_eq!(RoleName::Admin.hash(), B256::ZERO);
    }

    #[test]
    fn named_roles_hash_their_constant_names() {
        assert_eq!(
            RoleName::Pauser.hash(),
            b256!("65d7a28e3265b37a6474929f336521b332c1681b933f6cb9f3376673440d862a")
        );
        assert_ne!(RoleName::Minter.hash(), RoleName::Proposer.hash());
    }
}
