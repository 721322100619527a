pub mod finalize_sale;
pub mod grant_role;
pub mod list;
pub mod pause;
pub mod resume;
pub mod revoke_role;
pub mod set_rate;
pub mod status;
pub mod transfer_ownership;
pub mod unpause;
pub mod withdraw_tokens;

pub(crate) mod utils;
